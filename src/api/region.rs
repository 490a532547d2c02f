use crate::core::bounds::{BoundingBox, REGION};
use crate::core::codec::encode;
use crate::geom::parse::parse_geojson;
use crate::util::code::Digipin;
use crate::util::error::DigipinError;
use geo::{BoundingRect, Intersects};
use geo_types::{Coord, Geometry, MultiPolygon, Polygon, Rect, coord};
use std::path::Path;

/// A geofence that can answer whether a coordinate lies inside it.
///
/// Points on a region's boundary count as inside.
pub trait Region {
    fn contains_point(&self, latitude: f64, longitude: f64) -> bool;
}

impl Region for BoundingBox {
    fn contains_point(&self, latitude: f64, longitude: f64) -> bool {
        self.contains(latitude, longitude)
    }
}

impl Region for Polygon<f64> {
    fn contains_point(&self, latitude: f64, longitude: f64) -> bool {
        self.intersects(&coord! { x: longitude, y: latitude })
    }
}

impl Region for MultiPolygon<f64> {
    fn contains_point(&self, latitude: f64, longitude: f64) -> bool {
        self.intersects(&coord! { x: longitude, y: latitude })
    }
}

/// A boundary polygon set, such as a country outline loaded from GeoJSON.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRegion {
    polygons: MultiPolygon<f64>,
    extent: Rect<f64>,
}

impl BoundaryRegion {
    /// Builds a region from any geometry made of polygons.
    ///
    /// Polygons, MultiPolygons and GeometryCollections of them are accepted.
    pub fn from_geometry(geometry: Geometry<f64>) -> Result<Self, DigipinError> {
        let mut polygons = Vec::new();
        collect_polygons(geometry, &mut polygons)?;

        let polygons = MultiPolygon::new(polygons);
        let extent = polygons.bounding_rect().ok_or_else(|| {
            DigipinError::GeometryParseError("Boundary contains no polygons".to_string())
        })?;

        Ok(Self { polygons, extent })
    }

    /// Parses a GeoJSON Geometry, Feature or FeatureCollection.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::{BoundaryRegion, Region};
    ///
    /// # fn main() -> Result<(), digipin_rs::DigipinError> {
    /// let region = BoundaryRegion::from_geojson_str(
    ///     r#"{"type":"Polygon","coordinates":[[[70,10],[80,10],[80,20],[70,20],[70,10]]]}"#,
    /// )?;
    /// assert!(region.contains_point(15.0, 75.0));
    /// assert!(!region.contains_point(25.0, 75.0));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_geojson_str(s: &str) -> Result<Self, DigipinError> {
        Self::from_geometry(parse_geojson(s)?)
    }

    /// Reads and parses a GeoJSON file.
    pub fn from_geojson_file(path: impl AsRef<Path>) -> Result<Self, DigipinError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| DigipinError::IoError(e.to_string()))?;
        Self::from_geojson_str(&contents)
    }

    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    /// Bounding rectangle of all polygons (x = longitude, y = latitude).
    pub fn extent(&self) -> Rect<f64> {
        self.extent
    }
}

impl Region for BoundaryRegion {
    fn contains_point(&self, latitude: f64, longitude: f64) -> bool {
        let point: Coord<f64> = coord! { x: longitude, y: latitude };
        self.extent.intersects(&point) && self.polygons.intersects(&point)
    }
}

fn collect_polygons(
    geometry: Geometry<f64>,
    out: &mut Vec<Polygon<f64>>,
) -> Result<(), DigipinError> {
    match geometry {
        Geometry::Polygon(poly) => out.push(poly),
        Geometry::MultiPolygon(mp) => out.extend(mp.0),
        Geometry::Rect(rect) => out.push(rect.to_polygon()),
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                collect_polygons(g, out)?;
            }
        }
        _ => {
            return Err(DigipinError::GeometryParseError(
                "Boundary must be made of polygons".to_string(),
            ));
        }
    }
    Ok(())
}

/// Encodes a coordinate after checking it against a geofence.
///
/// Coordinates outside the supported region fail with
/// [`DigipinError::OutOfBounds`] as in [`encode`]; coordinates inside it but
/// outside `region` fail with [`DigipinError::OutsideRegion`].
pub fn encode_within(
    region: &impl Region,
    latitude: f64,
    longitude: f64,
) -> Result<Digipin, DigipinError> {
    if !REGION.contains(latitude, longitude) {
        return Err(DigipinError::OutOfBounds {
            latitude,
            longitude,
        });
    }
    if !region.contains_point(latitude, longitude) {
        return Err(DigipinError::OutsideRegion {
            latitude,
            longitude,
        });
    }
    encode(latitude, longitude)
}
