//! Text encoders for place geometries: WKT, SVG path data and KML fragments.
//!
//! Coordinates print with Rust's shortest round-trip float formatting, so the
//! WKT output is lossless.

use geo_types::{Coord, Geometry, Polygon};
use wkt::ToWkt;

/// Well-known text.
pub fn to_wkt(geometry: &Geometry<f64>) -> String {
    geometry.wkt_string()
}

/// SVG path data with latitude negated (screen y grows downwards).
///
/// Points become `cx="…" cy="…"` attributes; closed rings end with `Z` instead
/// of repeating their first vertex.
pub fn to_svg(geometry: &Geometry<f64>) -> String {
    match geometry {
        Geometry::Point(p) => format!("cx=\"{}\" cy=\"{}\"", p.x(), flip(p.y())),
        Geometry::Line(l) => svg_path(&[l.start, l.end], false),
        Geometry::LineString(ls) => svg_path(&ls.0, false),
        Geometry::Polygon(p) => svg_polygon(p),
        Geometry::MultiPoint(mp) => mp
            .0
            .iter()
            .map(|p| format!("cx=\"{}\" cy=\"{}\"", p.x(), flip(p.y())))
            .collect::<Vec<_>>()
            .join(","),
        Geometry::MultiLineString(mls) => mls
            .0
            .iter()
            .map(|ls| svg_path(&ls.0, false))
            .collect::<Vec<_>>()
            .join(" "),
        Geometry::MultiPolygon(mp) => mp.0.iter().map(svg_polygon).collect::<Vec<_>>().join(" "),
        Geometry::GeometryCollection(gc) => {
            gc.0.iter().map(to_svg).collect::<Vec<_>>().join(";")
        }
        Geometry::Rect(r) => svg_polygon(&r.to_polygon()),
        Geometry::Triangle(t) => svg_polygon(&t.to_polygon()),
    }
}

fn svg_path(coords: &[Coord<f64>], closed: bool) -> String {
    let coords = if closed && coords.len() > 1 && coords.first() == coords.last() {
        &coords[..coords.len() - 1]
    } else {
        coords
    };

    let mut out = String::new();
    for (i, c) in coords.iter().enumerate() {
        let prefix = match i {
            0 => "M ",
            1 => " L ",
            _ => " ",
        };
        out.push_str(&format!("{}{} {}", prefix, c.x, flip(c.y)));
    }
    if closed && !coords.is_empty() {
        out.push_str(" Z");
    }
    out
}

/// Negate a latitude without producing `-0`.
fn flip(y: f64) -> f64 {
    if y == 0.0 {
        0.0
    } else {
        -y
    }
}

fn svg_polygon(p: &Polygon<f64>) -> String {
    std::iter::once(p.exterior())
        .chain(p.interiors())
        .map(|ring| svg_path(&ring.0, true))
        .collect::<Vec<_>>()
        .join(" ")
}

/// KML geometry element.
pub fn to_kml(geometry: &Geometry<f64>) -> String {
    match geometry {
        Geometry::Point(p) => format!("<Point><coordinates>{}</coordinates></Point>", kml_coord(&p.0)),
        Geometry::Line(l) => kml_line(&[l.start, l.end]),
        Geometry::LineString(ls) => kml_line(&ls.0),
        Geometry::Polygon(p) => kml_polygon(p),
        Geometry::MultiPoint(mp) => kml_multi(mp.0.iter().map(|p| to_kml(&Geometry::Point(*p)))),
        Geometry::MultiLineString(mls) => kml_multi(mls.0.iter().map(|ls| kml_line(&ls.0))),
        Geometry::MultiPolygon(mp) => kml_multi(mp.0.iter().map(kml_polygon)),
        Geometry::GeometryCollection(gc) => kml_multi(gc.0.iter().map(to_kml)),
        Geometry::Rect(r) => kml_polygon(&r.to_polygon()),
        Geometry::Triangle(t) => kml_polygon(&t.to_polygon()),
    }
}

fn kml_coord(c: &Coord<f64>) -> String {
    format!("{},{}", c.x, c.y)
}

fn kml_coords(coords: &[Coord<f64>]) -> String {
    coords.iter().map(kml_coord).collect::<Vec<_>>().join(" ")
}

fn kml_line(coords: &[Coord<f64>]) -> String {
    format!(
        "<LineString><coordinates>{}</coordinates></LineString>",
        kml_coords(coords)
    )
}

fn kml_polygon(p: &Polygon<f64>) -> String {
    let mut out = format!(
        "<Polygon><outerBoundaryIs><LinearRing><coordinates>{}</coordinates></LinearRing></outerBoundaryIs>",
        kml_coords(&p.exterior().0)
    );
    for ring in p.interiors() {
        out.push_str(&format!(
            "<innerBoundaryIs><LinearRing><coordinates>{}</coordinates></LinearRing></innerBoundaryIs>",
            kml_coords(&ring.0)
        ));
    }
    out.push_str("</Polygon>");
    out
}

fn kml_multi(parts: impl Iterator<Item = String>) -> String {
    format!("<MultiGeometry>{}</MultiGeometry>", parts.collect::<String>())
}

/// Boundary vertices as `[lon, lat]` pairs: the exterior ring of the first
/// polygon, the vertices of a line, or the point itself.
pub fn to_points(geometry: &Geometry<f64>) -> Vec<[f64; 2]> {
    let coords: Vec<Coord<f64>> = match geometry {
        Geometry::Point(p) => vec![p.0],
        Geometry::Line(l) => vec![l.start, l.end],
        Geometry::LineString(ls) => ls.0.clone(),
        Geometry::Polygon(p) => p.exterior().0.clone(),
        Geometry::MultiPoint(mp) => mp.0.iter().map(|p| p.0).collect(),
        Geometry::MultiLineString(mls) => mls.0.first().map(|ls| ls.0.clone()).unwrap_or_default(),
        Geometry::MultiPolygon(mp) => mp
            .0
            .first()
            .map(|p| p.exterior().0.clone())
            .unwrap_or_default(),
        Geometry::GeometryCollection(gc) => {
            return gc.0.first().map(to_points).unwrap_or_default();
        }
        Geometry::Rect(r) => r.to_polygon().exterior().0.clone(),
        Geometry::Triangle(t) => t.to_polygon().exterior().0.clone(),
    };
    coords.iter().map(|c| [c.x, c.y]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, point, polygon, MultiPolygon};

    fn square() -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: 1.5, y: 0.0),
            (x: 1.5, y: 1.0),
            (x: 0.0, y: 1.0),
        ]
    }

    #[test]
    fn test_wkt_point_is_lossless() {
        let p = Geometry::Point(point!(x: 107.69828796387, y: 14.271104294939));
        assert_eq!(to_wkt(&p), "POINT(107.69828796387 14.271104294939)");
    }

    #[test]
    fn test_wkt_multipolygon() {
        let mp = Geometry::MultiPolygon(MultiPolygon::new(vec![square()]));
        assert_eq!(to_wkt(&mp), "MULTIPOLYGON(((0 0,1.5 0,1.5 1,0 1,0 0)))");
    }

    #[test]
    fn test_svg_polygon_negates_lat_and_closes() {
        let svg = to_svg(&Geometry::Polygon(square()));
        assert_eq!(svg, "M 0 0 L 1.5 0 1.5 -1 0 -1 Z");
    }

    #[test]
    fn test_svg_point_attributes() {
        let svg = to_svg(&Geometry::Point(point!(x: 9.5, y: 47.1)));
        assert_eq!(svg, "cx=\"9.5\" cy=\"-47.1\"");
    }

    #[test]
    fn test_svg_line_is_open() {
        let line = Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]);
        assert_eq!(to_svg(&line), "M 0 0 L 1 -1");
    }

    #[test]
    fn test_kml_polygon() {
        let kml = to_kml(&Geometry::Polygon(square()));
        assert_eq!(
            kml,
            "<Polygon><outerBoundaryIs><LinearRing><coordinates>0,0 1.5,0 1.5,1 0,1 0,0</coordinates></LinearRing></outerBoundaryIs></Polygon>"
        );
    }

    #[test]
    fn test_kml_point() {
        let kml = to_kml(&Geometry::Point(point!(x: 9.5, y: 47.1)));
        assert_eq!(kml, "<Point><coordinates>9.5,47.1</coordinates></Point>");
    }

    #[test]
    fn test_points_of_polygon_follow_exterior() {
        let points = to_points(&Geometry::Polygon(square()));
        assert_eq!(points.len(), 5);
        assert_eq!(points[1], [1.5, 0.0]);
    }
}
