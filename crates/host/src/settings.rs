use pcx_core::BoxRegion;
use serde::{Deserialize, Serialize};

use crate::HostError;

/// User-editable renderer fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Multiplied with every point color by the point shader.
    pub tint: [f32; 4],
    /// Disk diameter. Zero draws raw point primitives.
    pub point_size: f32,
    pub corner1: [f32; 3],
    pub corner2: [f32; 3],
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            tint: [0.5, 0.5, 0.5, 1.0],
            point_size: 0.05,
            corner1: [0.0; 3],
            corner2: [0.0; 3],
        }
    }
}

impl RendererSettings {
    /// Parses settings from JSON. Missing fields take their defaults and the
    /// result is already validated.
    pub fn from_json(json: &str) -> Result<Self, HostError> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.validate();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, HostError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamps `point_size` to be non-negative. A NaN size becomes zero.
    pub fn validate(&mut self) {
        self.point_size = self.point_size.max(0.0);
    }

    pub fn region(&self) -> BoxRegion {
        BoxRegion::new(self.corner1, self.corner2)
    }

    pub fn set_region(&mut self, region: BoxRegion) {
        self.corner1 = region.corner1;
        self.corner2 = region.corner2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = RendererSettings::default();
        assert_eq!(s.tint, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(s.point_size, 0.05);
        assert!(s.region().is_degenerate());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s = RendererSettings::from_json(r#"{ "corner2": [6.0, 6.0, 6.0] }"#).unwrap();
        assert_eq!(s.corner2, [6.0; 3]);
        assert_eq!(s.point_size, 0.05);
    }

    #[test]
    fn negative_size_is_clamped() {
        let s = RendererSettings::from_json(r#"{ "point_size": -2.0 }"#).unwrap();
        assert_eq!(s.point_size, 0.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            RendererSettings::from_json("{ tint: "),
            Err(HostError::Settings(_))
        ));
    }

    #[test]
    fn json_roundtrip() {
        let mut s = RendererSettings::default();
        s.set_region(BoxRegion::new([1.0; 3], [2.0; 3]));
        let back = RendererSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }
}
