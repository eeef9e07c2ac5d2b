//! Canonical geometry types used across the geosketch crates.
//!
//! These types carry vertex sequences with optional Z/M components and
//! bridge to the `geo`/`geojson` ecosystem through `geosketch-geo`.

use serde::{Deserialize, Serialize};

use crate::models::vertex::Vertex;

/// Coordinate Reference System identified by EPSG code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self { epsg, name: name.into() }
    }

    /// WGS 84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::new(3857, "Web Mercator")
    }

    /// The EPSG authority string, e.g. "EPSG:4326"
    pub fn authority_code(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

/// Geometry type classification of an editing buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryType {
    Point,
    #[default]
    Line,
    Polygon,
}

/// A geometry exchanged with the feature store, carrying Z/M-capable
/// vertices.
///
/// Multi variants exist so that store geometries can be ingested, but the
/// editing buffer only ever works on the first part (and, for polygons, the
/// exterior ring); see [`Geometry::primary_vertices`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { vertex: Vertex },
    Line { vertices: Vec<Vertex> },
    Polygon { rings: Vec<Vec<Vertex>> },
    MultiPoint { vertices: Vec<Vertex> },
    MultiLine { parts: Vec<Vec<Vertex>> },
    MultiPolygon { polygons: Vec<Vec<Vec<Vertex>>> },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(vertex: Vertex) -> Self {
        Geometry::Point { vertex }
    }

    /// Create a Line geometry
    pub fn line(vertices: Vec<Vertex>) -> Self {
        Geometry::Line { vertices }
    }

    /// Create a Polygon geometry from rings (exterior first)
    pub fn polygon(rings: Vec<Vec<Vertex>>) -> Self {
        Geometry::Polygon { rings }
    }

    /// The editing classification of this geometry. Multi variants map to
    /// their base type.
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } | Geometry::MultiPoint { .. } => GeometryType::Point,
            Geometry::Line { .. } | Geometry::MultiLine { .. } => GeometryType::Line,
            Geometry::Polygon { .. } | Geometry::MultiPolygon { .. } => GeometryType::Polygon,
        }
    }

    /// The vertices of the first part only: the point itself, the first
    /// line part, or the exterior ring of the first polygon. Further parts
    /// and interior rings are not editable and are dropped by ingestion.
    pub fn primary_vertices(&self) -> Vec<Vertex> {
        match self {
            Geometry::Point { vertex } => vec![*vertex],
            Geometry::Line { vertices } => vertices.clone(),
            Geometry::Polygon { rings } => rings.first().cloned().unwrap_or_default(),
            Geometry::MultiPoint { vertices } => {
                vertices.first().map(|v| vec![*v]).unwrap_or_default()
            }
            Geometry::MultiLine { parts } => parts.first().cloned().unwrap_or_default(),
            Geometry::MultiPolygon { polygons } => polygons
                .first()
                .and_then(|rings| rings.first())
                .cloned()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_authority_code() {
        assert_eq!(Crs::wgs84().authority_code(), "EPSG:4326");
        assert_eq!(Crs::web_mercator().authority_code(), "EPSG:3857");
        assert_eq!(Crs::default(), Crs::wgs84());
    }

    #[test]
    fn test_geometry_type_maps_multi_to_base() {
        let multi = Geometry::MultiLine {
            parts: vec![vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 1.0)]],
        };
        assert_eq!(multi.geometry_type(), GeometryType::Line);

        let multi = Geometry::MultiPolygon { polygons: vec![] };
        assert_eq!(multi.geometry_type(), GeometryType::Polygon);
    }

    #[test]
    fn test_primary_vertices_takes_first_part_only() {
        let first = vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 0.0)];
        let second = vec![Vertex::new(5.0, 5.0), Vertex::new(6.0, 5.0)];
        let multi = Geometry::MultiLine { parts: vec![first.clone(), second] };
        assert_eq!(multi.primary_vertices(), first);
    }

    #[test]
    fn test_primary_vertices_takes_exterior_ring() {
        let exterior = vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(4.0, 0.0),
            Vertex::new(4.0, 4.0),
            Vertex::new(0.0, 0.0),
        ];
        let hole = vec![
            Vertex::new(1.0, 1.0),
            Vertex::new(2.0, 1.0),
            Vertex::new(2.0, 2.0),
            Vertex::new(1.0, 1.0),
        ];
        let polygon = Geometry::polygon(vec![exterior.clone(), hole]);
        assert_eq!(polygon.primary_vertices(), exterior);
    }

    #[test]
    fn test_geometry_serialization_round_trip() {
        let line = Geometry::line(vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(1.0, 1.0).with_z(12.5),
        ]);
        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"Line\""));

        let parsed: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, line);
    }
}
