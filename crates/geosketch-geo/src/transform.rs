//! PROJ-backed implementation of the coordinate transform port

use geosketch_core::error::{GeosketchError, Result};
use geosketch_core::models::Crs;
use geosketch_core::ports::{CoordinateTransform, IdentityTransform, TransformProvider};
use proj::Proj;

/// Check if two CRS are the same
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.epsg == crs2.epsg
}

/// A transform between two fixed CRS backed by PROJ
pub struct ProjTransform {
    proj: Proj,
    from: String,
    to: String,
}

impl CoordinateTransform for ProjTransform {
    fn transform_xy(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        self.proj.convert((x, y)).map_err(|e| GeosketchError::Transform {
            from: self.from.clone(),
            to: self.to.clone(),
            reason: e.to_string(),
        })
    }
}

/// Transform provider backed by PROJ.
///
/// Matching CRS pairs short-circuit to the identity transform without
/// touching PROJ at all.
pub struct ProjTransforms;

impl TransformProvider for ProjTransforms {
    fn between(&self, source: &Crs, target: &Crs) -> Result<Box<dyn CoordinateTransform>> {
        if crs_match(source, target) {
            return Ok(Box::new(IdentityTransform));
        }

        let from = source.authority_code();
        let to = target.authority_code();

        let proj = Proj::new_known_crs(&from, &to, None).map_err(|e| {
            GeosketchError::TransformSetup {
                from: from.clone(),
                to: to.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Box::new(ProjTransform { proj, from, to }))
    }
}
