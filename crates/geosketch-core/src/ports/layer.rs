//! Port for the target feature-store layer.
//!
//! The sketch model only ever reads two facts from the layer it digitizes
//! for: what kind of geometry it stores and which coordinate components it
//! declares. The model holds the layer as a `Weak` reference; it must stay
//! usable after the layer is dropped.

use crate::models::{CoordinateDims, GeometryType};

/// Read-only view of a vector layer in the feature store
pub trait VectorLayer {
    /// The geometry type this layer stores
    fn geometry_type(&self) -> GeometryType;

    /// The coordinate components this layer declares (Z and/or M capability)
    fn dimensions(&self) -> CoordinateDims;

    /// Whether this layer can store measure values
    fn supports_m(&self) -> bool {
        self.dimensions().has_m()
    }
}
