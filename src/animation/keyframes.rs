use crate::{
    animation::ease::Ease,
    foundation::core::Rgba8Premul,
    foundation::error::{PlacescapeError, PlacescapeResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Rgba8Premul {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe<T> {
    /// Input position of this stop (scroll progress for signal tracks).
    pub at: f64,
    pub value: T,
    #[serde(default)]
    pub ease: Ease, // ease applied toward next key
}

impl<T> Keyframe<T> {
    pub fn linear(at: f64, value: T) -> Self {
        Self {
            at,
            value,
            ease: Ease::Linear,
        }
    }
}

/// Piecewise interpolation track over a scalar input.
///
/// Inputs before the first stop or after the last stop clamp to that stop's value, so sampling is
/// total: a validated track never fails to produce a value. Construction is the only fallible
/// step, which is why the stop list is private.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct Keyframes<T> {
    keys: Vec<Keyframe<T>>, // strictly increasing `at`, never empty
}

impl<T> Keyframes<T>
where
    T: Lerp + Clone,
{
    pub fn new(keys: Vec<Keyframe<T>>) -> PlacescapeResult<Self> {
        validate_keys(&keys)?;
        Ok(Self { keys })
    }

    /// Build a linear track from `(input, output)` stop pairs.
    pub fn linear(stops: impl IntoIterator<Item = (f64, T)>) -> PlacescapeResult<Self> {
        Self::new(
            stops
                .into_iter()
                .map(|(at, value)| Keyframe::linear(at, value))
                .collect(),
        )
    }

    /// Caller guarantees `stops` is non-empty with strictly increasing finite inputs.
    pub(crate) fn linear_unchecked(stops: &[(f64, T)]) -> Self {
        debug_assert!(validate_keys(&stops_to_keys(stops)).is_ok());
        Self {
            keys: stops_to_keys(stops),
        }
    }

    pub fn constant(value: T) -> Self {
        Self {
            keys: vec![Keyframe::linear(0.0, value)],
        }
    }

    pub fn keys(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// Input positions of every stop, ascending.
    pub fn stops(&self) -> impl Iterator<Item = f64> + '_ {
        self.keys.iter().map(|k| k.at)
    }

    /// Value at the first stop; what an unobserved input resolves to.
    pub fn initial(&self) -> T {
        self.keys[0].value.clone()
    }

    pub fn sample(&self, x: f64) -> T {
        let first = &self.keys[0];
        let last = &self.keys[self.keys.len() - 1];
        if x.is_nan() || x <= first.at {
            return first.value.clone();
        }
        if x >= last.at {
            return last.value.clone();
        }

        let idx = self.keys.partition_point(|k| k.at <= x);
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let t = (x - a.at) / (b.at - a.at);
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }
}

fn stops_to_keys<T: Clone>(stops: &[(f64, T)]) -> Vec<Keyframe<T>> {
    stops
        .iter()
        .map(|(at, value)| Keyframe::linear(*at, value.clone()))
        .collect()
}

fn validate_keys<T>(keys: &[Keyframe<T>]) -> PlacescapeResult<()> {
    if keys.is_empty() {
        return Err(PlacescapeError::animation(
            "Keyframes must have at least one stop",
        ));
    }
    if keys.iter().any(|k| !k.at.is_finite()) {
        return Err(PlacescapeError::animation(
            "Keyframes stops must be finite",
        ));
    }
    if !keys.windows(2).all(|w| w[0].at < w[1].at) {
        return Err(PlacescapeError::animation(
            "Keyframes stops must be strictly increasing",
        ));
    }
    Ok(())
}

impl<'de, T> serde::Deserialize<'de> for Keyframes<T>
where
    T: serde::Deserialize<'de> + Lerp + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let keys = Vec::<Keyframe<T>>::deserialize(deserializer)?;
        Self::new(keys).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
