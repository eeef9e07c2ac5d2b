//! Vertex and coordinate-dimension types.
//!
//! A vertex is a 2D point with optional elevation (Z) and measure (M)
//! components. Presence is tracked per vertex rather than globally: a
//! sequence may legally mix vertices captured with and without a GNSS
//! elevation fix.

use serde::{Deserialize, Serialize};

/// Which coordinate components an output shape carries beyond X/Y
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CoordinateDims {
    /// Plain 2D
    #[default]
    Xy,
    /// 2D plus elevation
    Xyz,
    /// 2D plus measure
    Xym,
    /// 2D plus elevation and measure
    Xyzm,
}

impl CoordinateDims {
    /// Whether this shape carries an elevation component
    pub fn has_z(&self) -> bool {
        matches!(self, CoordinateDims::Xyz | CoordinateDims::Xyzm)
    }

    /// Whether this shape carries a measure component
    pub fn has_m(&self) -> bool {
        matches!(self, CoordinateDims::Xym | CoordinateDims::Xyzm)
    }

    /// Build from component flags
    pub fn from_flags(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => CoordinateDims::Xy,
            (true, false) => CoordinateDims::Xyz,
            (false, true) => CoordinateDims::Xym,
            (true, true) => CoordinateDims::Xyzm,
        }
    }
}

/// A single editable coordinate with optional Z and M components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub m: Option<f64>,
}

impl Vertex {
    /// Create a 2D vertex
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None, m: None }
    }

    /// The origin, the initial content of a fresh sketch
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Attach an elevation component
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Attach a measure component
    pub fn with_m(mut self, m: f64) -> Self {
        self.m = Some(m);
        self
    }

    /// Whether this vertex carries an elevation value
    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    /// Whether this vertex carries a measure value
    pub fn has_m(&self) -> bool {
        self.m.is_some()
    }

    /// The dimensionality of this vertex
    pub fn dims(&self) -> CoordinateDims {
        CoordinateDims::from_flags(self.has_z(), self.has_m())
    }

    /// Replace the X/Y components, keeping Z and M untouched
    pub fn with_xy(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Reshape to exactly `dims`: a component is present in the result iff
    /// `dims` declares it. Components the source lacks are filled with 0.0,
    /// components `dims` lacks are dropped. Z and M are handled
    /// independently.
    ///
    /// This is the batch-output reshaping used by full sequence projection,
    /// where downstream consumers expect every point to match the requested
    /// shape.
    pub fn conformed(self, dims: CoordinateDims) -> Self {
        Self {
            x: self.x,
            y: self.y,
            z: dims.has_z().then(|| self.z.unwrap_or(0.0)),
            m: dims.has_m().then(|| self.m.unwrap_or(0.0)),
        }
    }

    /// Reshape by intersection: a component is present in the result iff
    /// both the source vertex and `dims` declare it. No zero-fill. Z and M
    /// are handled independently.
    ///
    /// This is the single-point reshaping used when projecting the live
    /// vertex, where a component the source never captured must not be
    /// invented.
    pub fn restricted(self, dims: CoordinateDims) -> Self {
        Self {
            x: self.x,
            y: self.y,
            z: if dims.has_z() { self.z } else { None },
            m: if dims.has_m() { self.m } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_flags() {
        assert!(!CoordinateDims::Xy.has_z());
        assert!(!CoordinateDims::Xy.has_m());
        assert!(CoordinateDims::Xyz.has_z());
        assert!(CoordinateDims::Xym.has_m());
        assert!(CoordinateDims::Xyzm.has_z());
        assert!(CoordinateDims::Xyzm.has_m());

        assert_eq!(CoordinateDims::from_flags(true, false), CoordinateDims::Xyz);
        assert_eq!(CoordinateDims::from_flags(false, true), CoordinateDims::Xym);
    }

    #[test]
    fn test_vertex_dims_follow_components() {
        assert_eq!(Vertex::new(1.0, 2.0).dims(), CoordinateDims::Xy);
        assert_eq!(Vertex::new(1.0, 2.0).with_z(3.0).dims(), CoordinateDims::Xyz);
        assert_eq!(Vertex::new(1.0, 2.0).with_m(4.0).dims(), CoordinateDims::Xym);
        assert_eq!(Vertex::new(1.0, 2.0).with_z(3.0).with_m(4.0).dims(), CoordinateDims::Xyzm);
    }

    #[test]
    fn test_conformed_zero_fills_missing_components() {
        let flat = Vertex::new(1.0, 2.0);
        let shaped = flat.conformed(CoordinateDims::Xyzm);
        assert_eq!(shaped.z, Some(0.0));
        assert_eq!(shaped.m, Some(0.0));
    }

    #[test]
    fn test_conformed_drops_undeclared_components() {
        let full = Vertex::new(1.0, 2.0).with_z(10.0).with_m(20.0);
        let flat = full.conformed(CoordinateDims::Xy);
        assert_eq!(flat, Vertex::new(1.0, 2.0));
    }

    #[test]
    fn test_conformed_carries_components_independently() {
        let z_only = Vertex::new(1.0, 2.0).with_z(10.0);
        let shaped = z_only.conformed(CoordinateDims::Xyzm);
        assert_eq!(shaped.z, Some(10.0));
        assert_eq!(shaped.m, Some(0.0));
    }

    #[test]
    fn test_restricted_never_invents_components() {
        let flat = Vertex::new(1.0, 2.0);
        let shaped = flat.restricted(CoordinateDims::Xyzm);
        assert_eq!(shaped, flat);

        let z_only = Vertex::new(1.0, 2.0).with_z(10.0);
        let shaped = z_only.restricted(CoordinateDims::Xyzm);
        assert_eq!(shaped.z, Some(10.0));
        assert_eq!(shaped.m, None);
    }

    #[test]
    fn test_restricted_drops_unrequested_components() {
        let full = Vertex::new(1.0, 2.0).with_z(10.0).with_m(20.0);
        let shaped = full.restricted(CoordinateDims::Xym);
        assert_eq!(shaped.z, None);
        assert_eq!(shaped.m, Some(20.0));
    }

    #[test]
    fn test_vertex_serialization_skips_absent_components() {
        let flat = Vertex::new(1.0, 2.0);
        let json = serde_json::to_string(&flat).unwrap();
        assert!(!json.contains("\"z\""));
        assert!(!json.contains("\"m\""));

        let full = Vertex::new(1.0, 2.0).with_z(3.0);
        let json = serde_json::to_string(&full).unwrap();
        assert!(json.contains("\"z\""));

        let parsed: Vertex = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, full);
    }
}
