//! Geosketch Core - The vertex-editing state model and its ports
//!
//! This crate contains the sketch model (the in-memory digitizing buffer),
//! its domain types, change notifications, and the port definitions for the
//! coordinate transform engine and the target feature-store layer.

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod ports;
pub mod sketch;

pub use error::{GeosketchError, Result};
pub use events::{SketchEvent, SubscriptionToken};
pub use models::{CoordinateDims, Crs, Geometry, GeometryType, Vertex};
pub use sketch::SketchModel;
