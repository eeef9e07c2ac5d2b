//! Geosketch Geo - CRS transforms and geometry conversions
//!
//! This crate plugs the geo ecosystem into the sketch model: the
//! PROJ-backed implementation of the core's transform port, and conversions
//! between the canonical geometry types and the `geo`/`geojson` types the
//! storage and rendering layers speak.

pub mod convert;
pub mod transform;

pub use convert::{
    from_geo_geometry, geometry_from_geojson, geometry_to_geojson, to_geo_geometry,
};
pub use transform::{crs_match, ProjTransforms};
