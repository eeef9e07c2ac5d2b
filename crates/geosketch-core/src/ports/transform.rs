//! Port for the coordinate transform engine.
//!
//! The sketch model never talks to a projection library directly; it asks a
//! [`TransformProvider`] for a transform between two CRS and applies it to
//! X/Y pairs. `geosketch-geo` ships the PROJ-backed implementation.

use crate::error::Result;
use crate::models::Crs;

/// A ready-to-use transform between two fixed CRS
pub trait CoordinateTransform {
    /// Transform a single X/Y pair
    fn transform_xy(&self, x: f64, y: f64) -> Result<(f64, f64)>;
}

/// Port for obtaining coordinate transforms
pub trait TransformProvider {
    /// Build a transform from `source` to `target`
    fn between(&self, source: &Crs, target: &Crs) -> Result<Box<dyn CoordinateTransform>>;
}

/// A transform that returns coordinates unchanged
pub struct IdentityTransform;

impl CoordinateTransform for IdentityTransform {
    fn transform_xy(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok((x, y))
    }
}

/// Provider that always hands out the identity transform.
///
/// The default for freshly constructed models and the natural choice in
/// tests and in hosts that keep everything in a single CRS.
pub struct IdentityTransforms;

impl TransformProvider for IdentityTransforms {
    fn between(&self, _source: &Crs, _target: &Crs) -> Result<Box<dyn CoordinateTransform>> {
        Ok(Box::new(IdentityTransform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform_returns_input() {
        let transform = IdentityTransforms
            .between(&Crs::wgs84(), &Crs::web_mercator())
            .unwrap();
        assert_eq!(transform.transform_xy(11.5, -47.25).unwrap(), (11.5, -47.25));
    }
}
