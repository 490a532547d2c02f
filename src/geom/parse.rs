use crate::util::error::DigipinError;
use geo_types::{Geometry, GeometryCollection};
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// GeoJSON is detected by a leading `{`, everything else is tried as WKT.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, DigipinError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

/// Parses a GeoJSON string into a `geo_types::Geometry`.
///
/// A FeatureCollection becomes a `GeometryCollection` of its features'
/// geometries; features without geometry are skipped.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, DigipinError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| DigipinError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => convert_geojson(geom),
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| DigipinError::GeometryParseError("Feature has no geometry".to_string()))
            .and_then(convert_geojson),
        GeoJson::FeatureCollection(fc) => {
            let geometries = fc
                .features
                .into_iter()
                .filter_map(|feat| feat.geometry)
                .map(convert_geojson)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::GeometryCollection(GeometryCollection(geometries)))
        }
    }
}

fn convert_geojson(geom: geojson::Geometry) -> Result<Geometry<f64>, DigipinError> {
    Geometry::try_from(geom).map_err(|e| DigipinError::GeometryParseError(e.to_string()))
}

/// Parses a WKT string into a `geo_types::Geometry`.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, DigipinError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| DigipinError::GeometryParseError(e.to_string()))?;

    wkt.try_into().map_err(|_| {
        DigipinError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geojson_point() -> Result<(), DigipinError> {
        let json = r#"{"type":"Point","coordinates":[77.2167,28.6448]}"#;
        let geom = parse_geometry(json)?;
        match geom {
            Geometry::Point(pt) => {
                assert!((pt.x() - 77.2167).abs() < 0.001);
                assert!((pt.y() - 28.6448).abs() < 0.001);
            }
            _ => panic!("Expected Point"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_geojson_feature() -> Result<(), DigipinError> {
        let json = r#"{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[72.8777,19.076]}}"#;
        let geom = parse_geometry(json)?;
        assert!(matches!(geom, Geometry::Point(_)));
        Ok(())
    }

    #[test]
    fn test_parse_geojson_feature_collection() -> Result<(), DigipinError> {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[72.8777,19.076]}},
            {"type":"Feature","properties":{},"geometry":null},
            {"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[70,10],[80,10],[80,20],[70,10]]]}}
        ]}"#;
        let geom = parse_geometry(json)?;
        match geom {
            Geometry::GeometryCollection(gc) => assert_eq!(gc.0.len(), 2),
            _ => panic!("Expected GeometryCollection"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_feature_without_geometry() {
        let json = r#"{"type":"Feature","properties":{},"geometry":null}"#;
        assert!(matches!(
            parse_geometry(json),
            Err(DigipinError::GeometryParseError(_))
        ));
    }

    #[test]
    fn test_parse_wkt_point() -> Result<(), DigipinError> {
        let geom = parse_geometry("POINT(77.5946 12.9716)")?;
        match geom {
            Geometry::Point(pt) => {
                assert!((pt.x() - 77.5946).abs() < 0.001);
                assert!((pt.y() - 12.9716).abs() < 0.001);
            }
            _ => panic!("Expected Point"),
        }
        Ok(())
    }

    #[test]
    fn test_parse_wkt_polygon() -> Result<(), DigipinError> {
        let geom = parse_geometry("POLYGON((70 10, 80 10, 80 20, 70 20, 70 10))")?;
        assert!(matches!(geom, Geometry::Polygon(_)));
        Ok(())
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_geometry("not a geometry").is_err());
        assert!(parse_geometry("{not json").is_err());
    }
}
