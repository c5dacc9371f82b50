use std::{collections::HashMap, sync::Arc};

use crate::{
    content::model::{SectionRegistry, index_label},
    foundation::{
        core::Viewport,
        error::{PlacescapeError, PlacescapeResult},
    },
    page::layout::{PageConfig, PageLayout},
    scroll::{
        transformer::{ScrollTransformer, VisualSignals},
        value::{MotionValue, Subscription},
        window::{ContainerGeometry, ScrollProgress},
    },
};

/// One mounted section: its own transformer, container and signal value.
#[derive(Debug)]
pub struct SectionInstance {
    id: String,
    index: usize,
    transformer: ScrollTransformer,
    container: ContainerGeometry,
    progress: Option<ScrollProgress>,
    signals: MotionValue<VisualSignals>,
}

impl SectionInstance {
    fn new(id: String, index: usize, transformer: ScrollTransformer) -> Self {
        let initial = transformer.signals(None);
        Self {
            id,
            index,
            transformer,
            container: ContainerGeometry::new(0.0, 0.0),
            progress: None,
            signals: MotionValue::new(initial),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> String {
        index_label(self.index)
    }

    pub fn container(&self) -> ContainerGeometry {
        self.container
    }

    pub fn progress(&self) -> Option<ScrollProgress> {
        self.progress
    }

    pub fn signals(&self) -> VisualSignals {
        *self.signals.get()
    }

    /// Recompute from the shared scroll offset; returns whether the signals changed.
    fn observe(&mut self, viewport: Viewport, scroll_y: f64) -> bool {
        let (progress, signals) = self
            .transformer
            .evaluate(self.container, viewport, scroll_y);
        self.progress = progress;
        self.signals.set(signals)
    }
}

/// Live page state: one scroll offset observed by every section instance.
///
/// Instances never read each other's state; the only shared input is the scroll offset and the
/// viewport.
#[derive(Debug)]
pub struct PageSession {
    config: PageConfig,
    layout: PageLayout,
    scroll_y: f64,
    instances: Vec<SectionInstance>,
    by_id: HashMap<String, usize>,
}

impl PageSession {
    pub fn new(registry: &SectionRegistry, config: PageConfig) -> PlacescapeResult<Self> {
        let layout = PageLayout::compute(registry, &config)?;
        let policy = Arc::new(config.policy.clone());

        let mut instances = Vec::with_capacity(registry.len());
        let mut by_id = HashMap::with_capacity(registry.len());
        for (index, section) in registry.iter().enumerate() {
            let transformer = ScrollTransformer::new(config.offset, Arc::clone(&policy));
            instances.push(SectionInstance::new(section.id.clone(), index, transformer));
            by_id.insert(section.id.clone(), index);
        }

        let mut session = Self {
            config,
            layout,
            scroll_y: 0.0,
            instances,
            by_id,
        };
        session.mount();
        Ok(session)
    }

    /// Bind every instance to its laid-out container and observe at the clamped offset.
    fn mount(&mut self) -> usize {
        for (inst, slot) in self.instances.iter_mut().zip(self.layout.sections()) {
            inst.container = slot.container;
        }
        self.scroll_y = self.layout.clamp_scroll(self.scroll_y);
        self.observe_all()
    }

    fn observe_all(&mut self) -> usize {
        let viewport = self.layout.viewport();
        let scroll_y = self.scroll_y;
        self.instances
            .iter_mut()
            .map(|inst| inst.observe(viewport, scroll_y))
            .filter(|changed| *changed)
            .count()
    }

    /// Move the shared scroll offset; returns how many sections' signals changed.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn scroll_to(&mut self, scroll_y: f64) -> usize {
        self.scroll_y = self.layout.clamp_scroll(scroll_y);
        self.observe_all()
    }

    pub fn scroll_by(&mut self, delta: f64) -> usize {
        self.scroll_to(self.scroll_y + delta)
    }

    /// Re-lay out every instance for a new viewport and re-observe at the clamped offset.
    pub fn resize(&mut self, viewport: Viewport) -> PlacescapeResult<usize> {
        viewport.validate()?;
        let mut config = self.config.clone();
        config.viewport = viewport;
        let ids: Vec<String> = self.instances.iter().map(|i| i.id.clone()).collect();
        self.layout = PageLayout::from_ids(ids.iter().map(String::as_str), &config)?;
        self.config = config;
        Ok(self.mount())
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn instances(&self) -> &[SectionInstance] {
        &self.instances
    }

    pub fn instance(&self, id: &str) -> Option<&SectionInstance> {
        self.by_id.get(id).map(|&i| &self.instances[i])
    }

    pub fn signals(&self, id: &str) -> Option<VisualSignals> {
        self.instance(id).map(SectionInstance::signals)
    }

    pub fn progress(&self, id: &str) -> Option<ScrollProgress> {
        self.instance(id).and_then(SectionInstance::progress)
    }

    /// Scroll offset at which section `id` reaches progress `p`, clamped to the document.
    pub fn scroll_for(&self, id: &str, p: ScrollProgress) -> Option<f64> {
        let inst = self.instance(id)?;
        let window = inst
            .transformer
            .window(inst.container, self.layout.viewport())?;
        Some(self.layout.clamp_scroll(window.scroll_for(p)))
    }

    /// Listen for signal changes of section `id`.
    pub fn subscribe(
        &mut self,
        id: &str,
        f: impl FnMut(&VisualSignals) + 'static,
    ) -> PlacescapeResult<Subscription> {
        let inst = self.instance_mut(id)?;
        Ok(inst.signals.subscribe(f))
    }

    pub fn unsubscribe(&mut self, id: &str, sub: Subscription) -> bool {
        match self.instance_mut(id) {
            Ok(inst) => inst.signals.unsubscribe(sub),
            Err(_) => false,
        }
    }

    fn instance_mut(&mut self, id: &str) -> PlacescapeResult<&mut SectionInstance> {
        let &i = self
            .by_id
            .get(id)
            .ok_or_else(|| PlacescapeError::validation(format!("unknown section id '{id}'")))?;
        Ok(&mut self.instances[i])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/session.rs"]
mod tests;
