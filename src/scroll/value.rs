use std::fmt;

/// Handle returned by [`MotionValue::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// A single owned value plus change listeners.
///
/// Listeners run synchronously inside [`MotionValue::set`], and only when the new value differs
/// from the current one. Re-setting the same value is a no-op, so repeated recomputation from the
/// same scroll offset never notifies twice.
pub struct MotionValue<T> {
    current: T,
    next_id: u64,
    listeners: Vec<(Subscription, Listener<T>)>,
}

impl<T> MotionValue<T>
where
    T: PartialEq,
{
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.current
    }

    /// Store `value`; returns whether it changed (and listeners ran).
    pub fn set(&mut self, value: T) -> bool {
        if self.current == value {
            return false;
        }
        self.current = value;
        for (_, f) in &mut self.listeners {
            f(&self.current);
        }
        true
    }

    pub fn subscribe(&mut self, f: impl FnMut(&T) + 'static) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, sub: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != sub);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for MotionValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionValue")
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/value.rs"]
mod tests;
