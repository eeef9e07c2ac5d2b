//! The vertex-editing state model for map digitizing.
//!
//! A [`SketchModel`] is the authoritative in-memory buffer while a point,
//! line, or polygon is being captured: an ordered vertex sequence, a live
//! "rubber band" vertex that follows the cursor or GNSS fix, and CRS-aware
//! projections of the buffer for rendering and feature commit. It is
//! single-threaded and synchronous; observers receive change notifications
//! inside the mutating call.

use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::events::{EventDispatcher, SketchEvent, SubscriptionToken};
use crate::models::{CoordinateDims, Crs, Geometry, GeometryType, Vertex};
use crate::ports::{IdentityTransforms, TransformProvider, VectorLayer};

/// In-memory vertex buffer for an interactive digitizing session.
///
/// Invariants, upheld by every operation:
/// - the vertex sequence is never empty,
/// - the current index is always within bounds.
pub struct SketchModel {
    vertices: Vec<Vertex>,
    current_index: usize,
    geometry_type: GeometryType,
    crs: Crs,
    frozen: bool,
    position_timestamp: Option<DateTime<Utc>>,
    layer: Option<Weak<dyn VectorLayer>>,
    transforms: Rc<dyn TransformProvider>,
    events: EventDispatcher,
}

impl SketchModel {
    /// A fresh sketch: one vertex at the origin, line geometry, WGS 84,
    /// identity transforms.
    pub fn new() -> Self {
        Self::with_transforms(Rc::new(IdentityTransforms))
    }

    /// A fresh sketch using the given transform provider
    pub fn with_transforms(transforms: Rc<dyn TransformProvider>) -> Self {
        Self {
            vertices: vec![Vertex::origin()],
            current_index: 0,
            geometry_type: GeometryType::default(),
            crs: Crs::default(),
            frozen: false,
            position_timestamp: None,
            layer: None,
            transforms,
            events: EventDispatcher::new(),
        }
    }

    /// Register a change listener
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&SketchEvent) + 'static,
    ) -> SubscriptionToken {
        self.events.subscribe(callback)
    }

    /// Remove a change listener
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.events.unsubscribe(token)
    }

    // --- Vertex sequence & cursor ---

    /// Number of vertices in the buffer
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Snapshot of the full vertex sequence
    pub fn vertices(&self) -> Vec<Vertex> {
        self.vertices.clone()
    }

    /// Snapshot of the sequence, optionally without the live vertex.
    ///
    /// Renderers use `skip_current` to draw the shape captured so far
    /// without the still-moving point.
    pub fn flat_vertices(&self, skip_current: bool) -> Vec<Vertex> {
        let mut vertices = self.vertices.clone();
        if skip_current && self.current_index < vertices.len() {
            vertices.remove(self.current_index);
        }
        vertices
    }

    /// Replace the vertex at `index`. No-op on out-of-bounds index or
    /// unchanged value.
    pub fn set_vertex(&mut self, index: usize, vertex: Vertex) {
        let Some(existing) = self.vertices.get(index).copied() else {
            return;
        };
        if existing == vertex {
            return;
        }
        self.vertices[index] = vertex;
        self.events.emit(SketchEvent::VertexChanged { index });
    }

    /// Insert `count` copies of the current coordinate at `index` (clamped
    /// to the end of the sequence)
    pub fn insert_vertices(&mut self, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        let index = index.min(self.vertices.len());
        let current = self.current_coordinate();
        for _ in 0..count {
            self.vertices.insert(index, current);
        }
        self.events.emit(SketchEvent::VerticesInserted { index, count });
        self.events.emit(SketchEvent::VertexCountChanged { count: self.vertices.len() });
    }

    /// Remove `count` vertices starting at `index`. The removal is a no-op
    /// if it would empty the buffer; the current index is re-clamped
    /// afterwards.
    pub fn remove_vertices(&mut self, index: usize, count: usize) {
        if self.vertices.len() <= 1 || count == 0 || index >= self.vertices.len() {
            return;
        }
        let count = count.min(self.vertices.len() - index);
        if count == self.vertices.len() {
            return;
        }
        self.vertices.drain(index..index + count);
        self.events.emit(SketchEvent::VerticesRemoved { index, count });
        self.events.emit(SketchEvent::VertexCountChanged { count: self.vertices.len() });

        if self.current_index >= self.vertices.len() {
            self.set_current_vertex_index(self.vertices.len() - 1);
        }
    }

    /// Position of the live vertex in the sequence
    pub fn current_vertex_index(&self) -> usize {
        self.current_index
    }

    /// Move the live vertex to `index` (clamped into bounds). Emits both an
    /// index and a coordinate notification, since consumers may track
    /// either independently.
    pub fn set_current_vertex_index(&mut self, index: usize) {
        let index = index.min(self.vertices.len().saturating_sub(1));
        if index == self.current_index {
            return;
        }
        self.current_index = index;
        self.events.emit(SketchEvent::CurrentVertexIndexChanged { index });
        self.events.emit(SketchEvent::CurrentCoordinateChanged);
    }

    /// Fix the live vertex in place and start a new one after it.
    ///
    /// Guard against accidental double-clicks: when the last two vertices
    /// are already coordinate-equal, nothing happens.
    pub fn add_vertex(&mut self) {
        if self.vertices.len() > 1
            && self.vertices[self.vertices.len() - 1] == self.vertices[self.vertices.len() - 2]
        {
            return;
        }
        self.insert_vertices(self.current_index + 1, 1);
        self.set_current_vertex_index(self.current_index + 1);
    }

    /// Drop the live vertex at `vertex` and start a new one after it
    pub fn add_vertex_from_point(&mut self, vertex: Vertex) {
        self.set_current_coordinate(vertex);
        self.add_vertex();
    }

    /// Delete the current vertex and make its predecessor current. At the
    /// start of the sequence the successor becomes current instead.
    pub fn remove_vertex(&mut self) {
        let vacated = self.current_index;
        self.set_current_vertex_index(vacated.saturating_sub(1));
        self.remove_vertices(vacated, 1);
    }

    /// Collapse back to a single vertex and release the frozen guard
    pub fn reset(&mut self) {
        let count = self.vertices.len();
        self.remove_vertices(0, count.saturating_sub(1));
        self.set_frozen(false);
    }

    // --- Current coordinate, Z/M ---

    /// Coordinate of the live vertex
    pub fn current_coordinate(&self) -> Vertex {
        self.vertices[self.current_index]
    }

    /// Move the live vertex. No-op when the buffer is empty, the value is
    /// unchanged, or the model is frozen; freezing protects the live
    /// coordinate without blocking structural edits.
    pub fn set_current_coordinate(&mut self, vertex: Vertex) {
        if self.vertices.is_empty() {
            return;
        }
        if self.vertices[self.current_index] == vertex {
            return;
        }
        if self.frozen {
            return;
        }
        self.vertices[self.current_index] = vertex;
        self.events.emit(SketchEvent::CurrentCoordinateChanged);
        self.events.emit(SketchEvent::VertexChanged { index: self.current_index });
    }

    /// The live vertex projected into `target_crs`, shaped to carry a
    /// component only where both the source vertex and `dims` declare it.
    ///
    /// Transform failures here are non-fatal: the interactive edit must
    /// never abort because a single fix could not be projected, so the
    /// failure is logged and the untransformed X/Y is returned instead.
    pub fn current_point(&self, target_crs: &Crs, dims: CoordinateDims) -> Vertex {
        let vertex = self.current_coordinate();
        let (x, y) = match self
            .transforms
            .between(&self.crs, target_crs)
            .and_then(|transform| transform.transform_xy(vertex.x, vertex.y))
        {
            Ok(xy) => xy,
            Err(error) => {
                tracing::warn!(
                    "Live vertex transform to {} failed, keeping untransformed coordinates: {}",
                    target_crs.authority_code(),
                    error
                );
                (vertex.x, vertex.y)
            }
        };
        vertex.restricted(dims).with_xy(x, y)
    }

    /// Measure value of the live vertex, 0.0 when absent
    pub fn measure_value(&self) -> f64 {
        self.current_coordinate().m.unwrap_or(0.0)
    }

    /// Write the measure component of the live vertex.
    ///
    /// Applies only when the target layer declares M capability and `value`
    /// is a real number; GNSS and sensor feeds routinely deliver NaN for
    /// invalid readings, which must not clobber a captured value. Routed
    /// through [`set_current_coordinate`](Self::set_current_coordinate), so
    /// a frozen model ignores it too.
    pub fn set_measure_value(&mut self, value: f64) {
        let Some(layer) = self.layer() else {
            return;
        };
        if !layer.supports_m() || value.is_nan() {
            return;
        }
        let updated = self.current_coordinate().with_m(value);
        self.set_current_coordinate(updated);
    }

    /// Timestamp associated with the live vertex, e.g. from a position
    /// source
    pub fn position_timestamp(&self) -> Option<DateTime<Utc>> {
        self.position_timestamp
    }

    pub fn set_position_timestamp(&mut self, timestamp: Option<DateTime<Utc>>) {
        self.position_timestamp = timestamp;
    }

    // --- CRS projection ---

    /// The full sequence projected into `target_crs` and shaped to `dims`:
    /// every output vertex carries exactly the components `dims` declares,
    /// with source values carried over and missing ones read as 0.0. With
    /// `close_line`, the first point is appended again at the end (ring
    /// closure) whenever the sequence has more than one point.
    ///
    /// Unlike [`current_point`](Self::current_point), transform failures
    /// propagate: a failing batch projection indicates a misconfigured CRS
    /// pair, which the caller must handle.
    pub fn point_sequence(
        &self,
        target_crs: &Crs,
        dims: CoordinateDims,
        close_line: bool,
    ) -> Result<Vec<Vertex>> {
        let transform = self.transforms.between(&self.crs, target_crs)?;
        let mut sequence = Vec::with_capacity(self.vertices.len() + usize::from(close_line));
        for vertex in &self.vertices {
            let (x, y) = transform.transform_xy(vertex.x, vertex.y)?;
            sequence.push(vertex.conformed(dims).with_xy(x, y));
        }
        if close_line && sequence.len() > 1 {
            sequence.push(sequence[0]);
        }
        Ok(sequence)
    }

    /// XY-only projection of the full sequence into `target_crs`. Transform
    /// failures propagate, as in [`point_sequence`](Self::point_sequence).
    pub fn flat_point_sequence(&self, target_crs: &Crs) -> Result<Vec<geo::Point<f64>>> {
        let transform = self.transforms.between(&self.crs, target_crs)?;
        self.vertices
            .iter()
            .map(|vertex| {
                transform
                    .transform_xy(vertex.x, vertex.y)
                    .map(|(x, y)| geo::Point::new(x, y))
            })
            .collect()
    }

    // --- Geometry ingestion ---

    /// Replace the buffer with the vertices of a store geometry.
    ///
    /// Rejected silently when the geometry's type does not match the
    /// buffer's. Only the first part (for polygons: the exterior ring of
    /// the first polygon) is loaded; a polygon ring's repeated start vertex
    /// is dropped so the buffer holds no duplicate. The live vertex ends up
    /// on the last loaded vertex.
    pub fn set_data_from_geometry(&mut self, geometry: &Geometry, source_crs: &Crs) {
        if geometry.geometry_type() != self.geometry_type {
            return;
        }

        let mut vertices = geometry.primary_vertices();
        if self.geometry_type == GeometryType::Polygon && !vertices.is_empty() {
            // the ring start repeats as the ring end; keep only one of them
            vertices.remove(0);
        }
        if vertices.is_empty() {
            tracing::debug!("Ignoring geometry with no editable vertices");
            return;
        }

        match self.transforms.between(source_crs, &self.crs) {
            Ok(transform) => {
                for vertex in &mut vertices {
                    match transform.transform_xy(vertex.x, vertex.y) {
                        Ok((x, y)) => {
                            vertex.x = x;
                            vertex.y = y;
                        }
                        Err(error) => {
                            tracing::warn!(
                                "Ingest transform from {} failed, keeping source coordinates: {}",
                                source_crs.authority_code(),
                                error
                            );
                        }
                    }
                }
            }
            Err(error) => {
                tracing::warn!(
                    "No ingest transform from {} to {}, keeping source coordinates: {}",
                    source_crs.authority_code(),
                    self.crs.authority_code(),
                    error
                );
            }
        }

        let count = vertices.len();
        self.vertices = vertices;
        self.current_index = count - 1;

        self.events.emit(SketchEvent::VerticesInserted { index: 0, count });
        self.events.emit(SketchEvent::VertexCountChanged { count });
    }

    // --- Property state ---

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    pub fn set_geometry_type(&mut self, geometry_type: GeometryType) {
        if self.geometry_type == geometry_type {
            return;
        }
        self.geometry_type = geometry_type;
        self.events.emit(SketchEvent::GeometryTypeChanged);
    }

    /// CRS the buffered coordinates are expressed in
    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn set_crs(&mut self, crs: Crs) {
        if self.crs == crs {
            return;
        }
        self.crs = crs;
        self.events.emit(SketchEvent::CrsChanged);
    }

    /// The target layer, if set and still alive
    pub fn layer(&self) -> Option<Rc<dyn VectorLayer>> {
        self.layer.as_ref().and_then(Weak::upgrade)
    }

    /// Point the model at a target layer. The reference is held weakly; a
    /// live layer's declared geometry type wins over any prior value.
    pub fn set_layer(&mut self, layer: Option<Rc<dyn VectorLayer>>) {
        let unchanged = match (&self.layer(), &layer) {
            (None, None) => true,
            (Some(current), Some(new)) => Rc::ptr_eq(current, new),
            _ => false,
        };
        if unchanged {
            return;
        }

        self.layer = layer.as_ref().map(Rc::downgrade);
        if let Some(layer) = &layer {
            self.set_geometry_type(layer.geometry_type());
        }
        self.events.emit(SketchEvent::LayerChanged);
    }

    /// Whether the live coordinate is protected from overwrites
    pub fn frozen(&self) -> bool {
        self.frozen
    }

    pub fn set_frozen(&mut self, frozen: bool) {
        if self.frozen == frozen {
            return;
        }
        self.frozen = frozen;
        self.events.emit(SketchEvent::FrozenChanged);
    }
}

impl Default for SketchModel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SketchModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SketchModel")
            .field("vertices", &self.vertices)
            .field("current_index", &self.current_index)
            .field("geometry_type", &self.geometry_type)
            .field("crs", &self.crs)
            .field("frozen", &self.frozen)
            .finish_non_exhaustive()
    }
}
