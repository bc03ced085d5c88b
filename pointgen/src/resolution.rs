use serde::{Deserialize, Serialize};

/// Map resolution: number of projected map units per screen pixel.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Resolution(f64);

impl Resolution {
    /// Creates a new resolution. Returns `None` unless the value is finite and positive.
    pub fn new(resolution: f64) -> Option<Self> {
        if resolution.is_finite() && resolution > 0.0 {
            Some(Self(resolution))
        } else {
            None
        }
    }

    /// Map units per pixel.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Map units per pixel with the fractional part dropped.
    pub fn truncated(&self) -> f64 {
        self.0.trunc()
    }
}

impl TryFrom<f64> for Resolution {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("invalid resolution: {value}"))
    }
}

impl From<Resolution> for f64 {
    fn from(value: Resolution) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_resolution_creation() {
        assert!(Resolution::new(76.437).is_some());
        assert!(Resolution::new(0.0).is_none());
        assert!(Resolution::new(-1.0).is_none());
        assert!(Resolution::new(f64::NAN).is_none());
        assert!(Resolution::new(f64::INFINITY).is_none());
        assert!(Resolution::new(f64::NEG_INFINITY).is_none());
    }

    #[test]
    fn resolution_comparison() {
        assert_eq!(Resolution::new(1.0), Resolution::new(1.0));
        assert!(Resolution::new(2.0) > Resolution::new(1.0));
    }

    #[test]
    fn truncation() {
        let resolution = Resolution::new(76.437).unwrap();
        assert_eq!(resolution.value(), 76.437);
        assert_eq!(resolution.truncated(), 76.0);
    }
}
