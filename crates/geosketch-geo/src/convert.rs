//! Conversions between the canonical geometry types and the `geo`/`geojson`
//! ecosystem types.
//!
//! The `geo` types are 2D; Z and M components are dropped on the way out.
//! GeoJSON positions may carry a third component, which maps to Z in both
//! directions. M has no GeoJSON representation and is dropped.

use geo::Geometry as GeoGeometry;
use geosketch_core::models::{Geometry, Vertex};

fn coords(vertices: &[Vertex]) -> Vec<geo::Coord> {
    vertices.iter().map(|v| geo::Coord { x: v.x, y: v.y }).collect()
}

fn ring_to_line_string(ring: &[Vertex]) -> geo::LineString {
    geo::LineString::new(coords(ring))
}

fn polygon_to_geo(rings: &[Vec<Vertex>]) -> geo::Polygon {
    let mut iter = rings.iter();
    let exterior = iter.next().map(|r| ring_to_line_string(r)).unwrap_or_else(|| {
        geo::LineString::new(vec![])
    });
    let interiors: Vec<geo::LineString> = iter.map(|r| ring_to_line_string(r)).collect();
    geo::Polygon::new(exterior, interiors)
}

/// Convert a canonical Geometry to a geo::Geometry (XY only)
pub fn to_geo_geometry(geometry: &Geometry) -> GeoGeometry {
    match geometry {
        Geometry::Point { vertex } => GeoGeometry::Point(geo::Point::new(vertex.x, vertex.y)),
        Geometry::Line { vertices } => GeoGeometry::LineString(ring_to_line_string(vertices)),
        Geometry::Polygon { rings } => GeoGeometry::Polygon(polygon_to_geo(rings)),
        Geometry::MultiPoint { vertices } => GeoGeometry::MultiPoint(geo::MultiPoint::new(
            vertices.iter().map(|v| geo::Point::new(v.x, v.y)).collect(),
        )),
        Geometry::MultiLine { parts } => GeoGeometry::MultiLineString(geo::MultiLineString::new(
            parts.iter().map(|p| ring_to_line_string(p)).collect(),
        )),
        Geometry::MultiPolygon { polygons } => GeoGeometry::MultiPolygon(geo::MultiPolygon::new(
            polygons.iter().map(|rings| polygon_to_geo(rings)).collect(),
        )),
    }
}

fn vertices_from_line_string(line: &geo::LineString) -> Vec<Vertex> {
    line.coords().map(|c| Vertex::new(c.x, c.y)).collect()
}

fn rings_from_polygon(polygon: &geo::Polygon) -> Vec<Vec<Vertex>> {
    let mut rings = vec![vertices_from_line_string(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(vertices_from_line_string));
    rings
}

/// Convert a geo::Geometry to a canonical Geometry.
///
/// Returns None for geo types the editing buffer has no counterpart for
/// (lines-as-segments, rects, triangles, collections).
pub fn from_geo_geometry(geometry: &GeoGeometry) -> Option<Geometry> {
    match geometry {
        GeoGeometry::Point(p) => Some(Geometry::point(Vertex::new(p.x(), p.y()))),
        GeoGeometry::LineString(ls) => Some(Geometry::line(vertices_from_line_string(ls))),
        GeoGeometry::Polygon(poly) => Some(Geometry::polygon(rings_from_polygon(poly))),
        GeoGeometry::MultiPoint(mp) => Some(Geometry::MultiPoint {
            vertices: mp.iter().map(|p| Vertex::new(p.x(), p.y())).collect(),
        }),
        GeoGeometry::MultiLineString(mls) => Some(Geometry::MultiLine {
            parts: mls.iter().map(vertices_from_line_string).collect(),
        }),
        GeoGeometry::MultiPolygon(mp) => Some(Geometry::MultiPolygon {
            polygons: mp.iter().map(rings_from_polygon).collect(),
        }),
        _ => None,
    }
}

fn vertex_from_position(position: &[f64]) -> Option<Vertex> {
    let (&x, &y) = (position.first()?, position.get(1)?);
    let mut vertex = Vertex::new(x, y);
    if let Some(&z) = position.get(2) {
        vertex = vertex.with_z(z);
    }
    Some(vertex)
}

fn position_from_vertex(vertex: &Vertex) -> Vec<f64> {
    match vertex.z {
        Some(z) => vec![vertex.x, vertex.y, z],
        None => vec![vertex.x, vertex.y],
    }
}

fn line_from_positions(positions: &[Vec<f64>]) -> Option<Vec<Vertex>> {
    positions.iter().map(|p| vertex_from_position(p)).collect()
}

fn rings_from_positions(rings: &[Vec<Vec<f64>>]) -> Option<Vec<Vec<Vertex>>> {
    rings.iter().map(|r| line_from_positions(r)).collect()
}

/// Convert a GeoJSON geometry to a canonical Geometry. A third position
/// component becomes Z. Returns None for geometry collections and malformed
/// positions.
pub fn geometry_from_geojson(geometry: &geojson::Geometry) -> Option<Geometry> {
    match &geometry.value {
        geojson::Value::Point(position) => {
            Some(Geometry::point(vertex_from_position(position)?))
        }
        geojson::Value::LineString(positions) => {
            Some(Geometry::line(line_from_positions(positions)?))
        }
        geojson::Value::Polygon(rings) => Some(Geometry::polygon(rings_from_positions(rings)?)),
        geojson::Value::MultiPoint(positions) => Some(Geometry::MultiPoint {
            vertices: line_from_positions(positions)?,
        }),
        geojson::Value::MultiLineString(lines) => Some(Geometry::MultiLine {
            parts: rings_from_positions(lines)?,
        }),
        geojson::Value::MultiPolygon(polygons) => Some(Geometry::MultiPolygon {
            polygons: polygons
                .iter()
                .map(|rings| rings_from_positions(rings))
                .collect::<Option<Vec<_>>>()?,
        }),
        geojson::Value::GeometryCollection(_) => None,
    }
}

/// Convert a canonical Geometry to a GeoJSON geometry. Z becomes the third
/// position component; M is dropped.
pub fn geometry_to_geojson(geometry: &Geometry) -> geojson::Geometry {
    let value = match geometry {
        Geometry::Point { vertex } => geojson::Value::Point(position_from_vertex(vertex)),
        Geometry::Line { vertices } => {
            geojson::Value::LineString(vertices.iter().map(position_from_vertex).collect())
        }
        Geometry::Polygon { rings } => geojson::Value::Polygon(
            rings
                .iter()
                .map(|r| r.iter().map(position_from_vertex).collect())
                .collect(),
        ),
        Geometry::MultiPoint { vertices } => {
            geojson::Value::MultiPoint(vertices.iter().map(position_from_vertex).collect())
        }
        Geometry::MultiLine { parts } => geojson::Value::MultiLineString(
            parts
                .iter()
                .map(|p| p.iter().map(position_from_vertex).collect())
                .collect(),
        ),
        Geometry::MultiPolygon { polygons } => geojson::Value::MultiPolygon(
            polygons
                .iter()
                .map(|rings| {
                    rings
                        .iter()
                        .map(|r| r.iter().map(position_from_vertex).collect())
                        .collect()
                })
                .collect(),
        ),
    };
    geojson::Geometry::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_ring() -> Vec<Vertex> {
        vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(4.0, 0.0),
            Vertex::new(4.0, 4.0),
            Vertex::new(0.0, 4.0),
            Vertex::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_to_geo_line() {
        let line = Geometry::line(vec![Vertex::new(0.0, 0.0), Vertex::new(1.0, 2.0)]);
        let geo_geom = to_geo_geometry(&line);

        match geo_geom {
            GeoGeometry::LineString(ls) => {
                assert_eq!(ls.0.len(), 2);
                assert_eq!(ls.0[1], geo::Coord { x: 1.0, y: 2.0 });
            }
            other => panic!("Expected LineString, got {:?}", other),
        }
    }

    #[test]
    fn test_geo_round_trip_polygon() {
        let polygon = Geometry::polygon(vec![square_ring()]);
        let round_tripped = from_geo_geometry(&to_geo_geometry(&polygon)).unwrap();
        assert_eq!(round_tripped, polygon);
    }

    #[test]
    fn test_to_geo_drops_z_and_m() {
        let point = Geometry::point(Vertex::new(1.0, 2.0).with_z(3.0).with_m(4.0));
        match to_geo_geometry(&point) {
            GeoGeometry::Point(p) => {
                assert_eq!(p.x(), 1.0);
                assert_eq!(p.y(), 2.0);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }

    #[test]
    fn test_from_geo_rejects_unsupported_types() {
        let rect = GeoGeometry::Rect(geo::Rect::new(
            geo::Coord { x: 0.0, y: 0.0 },
            geo::Coord { x: 1.0, y: 1.0 },
        ));
        assert!(from_geo_geometry(&rect).is_none());
    }

    #[test]
    fn test_geojson_third_component_becomes_z() {
        let geojson_geom = geojson::Geometry::new(geojson::Value::LineString(vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0, 250.0],
        ]));

        let geometry = geometry_from_geojson(&geojson_geom).unwrap();
        match geometry {
            Geometry::Line { ref vertices } => {
                assert_eq!(vertices[0].z, None);
                assert_eq!(vertices[1].z, Some(250.0));
            }
            other => panic!("Expected Line, got {:?}", other),
        }
    }

    #[test]
    fn test_geojson_round_trip_preserves_z() {
        let line = Geometry::line(vec![
            Vertex::new(0.0, 0.0).with_z(10.0),
            Vertex::new(1.0, 1.0).with_z(20.0),
        ]);

        let round_tripped = geometry_from_geojson(&geometry_to_geojson(&line)).unwrap();
        assert_eq!(round_tripped, line);
    }

    #[test]
    fn test_geojson_drops_m() {
        let point = Geometry::point(Vertex::new(1.0, 2.0).with_m(99.0));
        let geojson_geom = geometry_to_geojson(&point);
        assert_eq!(geojson_geom.value, geojson::Value::Point(vec![1.0, 2.0]));
    }

    #[test]
    fn test_geojson_malformed_position_is_rejected() {
        let geojson_geom = geojson::Geometry::new(geojson::Value::Point(vec![1.0]));
        assert!(geometry_from_geojson(&geojson_geom).is_none());
    }

    #[test]
    fn test_geojson_collection_is_rejected() {
        let geojson_geom =
            geojson::Geometry::new(geojson::Value::GeometryCollection(vec![]));
        assert!(geometry_from_geojson(&geojson_geom).is_none());
    }
}
