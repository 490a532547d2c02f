use crate::api::digipin_arrow::DigipinCellsToArrow;
use crate::api::digipin_parquet::DigipinCellsToGeoParquet;
use crate::core::bounds::BoundingBox;
use crate::core::codec::{cell_bounds, encode};
use crate::util::code::Digipin;
use crate::util::coord::{Coordinate, LatLng};
use crate::util::error::DigipinError;
use arrow_array::RecordBatch;
use geo_types::{Point, Polygon, Rect};
use geoarrow_array::array::{PointArray, PolygonArray};
use serde::Serialize;
use std::path::Path;

/// A single DIGIPIN cell: its code, center point and bounds.
///
/// Coordinates follow geo-types conventions, x = longitude, y = latitude (WGS84).
///
/// # Example
///
/// ```
/// use digipin_rs::DigipinCell;
///
/// # fn main() -> Result<(), digipin_rs::DigipinError> {
/// let cell = DigipinCell::from_lat_lng(28.622788, 77.213033)?;
/// println!("Code: {}", cell.code);
/// println!("Center: ({}, {})", cell.latitude(), cell.longitude());
///
/// // Convert to polygon for GIS operations
/// let polygon = cell.to_polygon();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigipinCell {
    /// The cell's code
    pub code: Digipin,
    /// Center point of the cell (x = longitude, y = latitude)
    pub center: Point<f64>,
    /// Extent of the cell
    pub bounds: BoundingBox,
}

impl DigipinCell {
    /// Create a DigipinCell from a latitude/longitude pair.
    pub fn from_lat_lng(latitude: f64, longitude: f64) -> Result<Self, DigipinError> {
        let code = encode(latitude, longitude)?;
        Ok(Self::from_digipin(code))
    }

    /// Create a DigipinCell from WGS84 coordinates.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::DigipinCell;
    /// use geo_types::Point;
    ///
    /// # fn main() -> Result<(), digipin_rs::DigipinError> {
    /// // From (lon, lat) tuple
    /// let a = DigipinCell::from_wgs84(&(77.213033, 28.622788))?;
    /// // From Point
    /// let b = DigipinCell::from_wgs84(&Point::new(77.213033, 28.622788))?;
    /// assert_eq!(a.code, b.code);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_wgs84(coord: &impl Coordinate) -> Result<Self, DigipinError> {
        Self::from_lat_lng(coord.latitude(), coord.longitude())
    }

    /// Create a DigipinCell from a code, with or without separators.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::DigipinCell;
    ///
    /// # fn main() -> Result<(), digipin_rs::DigipinError> {
    /// let cell = DigipinCell::from_lat_lng(12.9716, 77.5946)?;
    /// let restored = DigipinCell::from_code(&cell.code.to_string())?;
    /// assert_eq!(cell, restored);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_code(code: &str) -> Result<Self, DigipinError> {
        let code: Digipin = code.parse()?;
        Ok(Self::from_digipin(code))
    }

    pub fn from_digipin(code: Digipin) -> Self {
        let bounds = cell_bounds(&code);
        Self {
            code,
            center: bounds.center(),
            bounds,
        }
    }

    /// Returns the latitude of the cell center.
    pub fn latitude(&self) -> f64 {
        self.center.y()
    }

    /// Returns the longitude of the cell center.
    pub fn longitude(&self) -> f64 {
        self.center.x()
    }

    /// Returns the cell center as a [`LatLng`].
    pub fn lat_lng(&self) -> LatLng {
        LatLng::from(self.center)
    }

    /// Returns true if the coordinate encodes to this cell.
    pub fn contains(&self, coord: &impl Coordinate) -> bool {
        encode(coord.latitude(), coord.longitude()).is_ok_and(|code| code == self.code)
    }

    /// Converts this cell to a rectangle.
    pub fn to_rect(&self) -> Rect<f64> {
        self.bounds.to_rect()
    }

    /// Converts this cell to a closed rectangular polygon,
    /// suitable for spatial operations or GeoJSON export.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.bounds.to_polygon()
    }

    /// Converts this cell's center to an Arrow PointArray.
    pub fn to_arrow_points(&self) -> PointArray {
        std::slice::from_ref(self).to_arrow_points()
    }

    /// Converts this cell to an Arrow PolygonArray.
    pub fn to_arrow_polygons(&self) -> PolygonArray {
        std::slice::from_ref(self).to_arrow_polygons()
    }

    /// Converts this cell to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, DigipinError> {
        std::slice::from_ref(self).to_record_batch()
    }

    /// Writes this cell to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), DigipinError> {
        std::slice::from_ref(self).to_geoparquet(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lat_lng() -> Result<(), DigipinError> {
        let cell = DigipinCell::from_lat_lng(28.622788, 77.213033)?;

        assert_eq!(cell.code.to_string(), "39J-49L-L8T4");
        assert!((cell.latitude() - 28.622788).abs() < 1e-4);
        assert!((cell.longitude() - 77.213033).abs() < 1e-4);
        Ok(())
    }

    #[test]
    fn test_tuple_and_point_same_result() -> Result<(), DigipinError> {
        let from_tuple = DigipinCell::from_wgs84(&(77.5946, 12.9716))?;
        let from_point = DigipinCell::from_wgs84(&Point::new(77.5946, 12.9716))?;

        assert_eq!(from_tuple, from_point);
        assert_eq!(from_tuple.code.as_str(), "4P3JK852C9");
        Ok(())
    }

    #[test]
    fn test_from_code_matches_encode() -> Result<(), DigipinError> {
        let cell = DigipinCell::from_lat_lng(19.076, 72.8777)?;
        let restored = DigipinCell::from_code("4FK595-8823")?;

        assert_eq!(cell, restored);
        Ok(())
    }

    #[test]
    fn test_from_code_invalid() {
        assert!(matches!(
            DigipinCell::from_code("4FK"),
            Err(DigipinError::InvalidFormat { length: 3 })
        ));
    }

    #[test]
    fn test_same_point_same_cell() -> Result<(), DigipinError> {
        let cell1 = DigipinCell::from_lat_lng(28.6448, 77.2167)?;
        let cell2 = DigipinCell::from_lat_lng(28.6448, 77.2167)?;
        assert_eq!(cell1, cell2);

        // The center of a cell is always inside it
        assert!(cell1.contains(&cell1.center));
        assert!(!cell1.contains(&(77.3, 28.7)));
        Ok(())
    }

    #[test]
    fn test_to_polygon() -> Result<(), DigipinError> {
        let cell = DigipinCell::from_lat_lng(28.6448, 77.2167)?;
        let polygon = cell.to_polygon();

        assert_eq!(polygon.exterior().coords().count(), 5);
        assert_eq!(cell.to_rect().center(), cell.center.0);
        Ok(())
    }

    #[test]
    fn test_serialize() -> Result<(), Box<dyn std::error::Error>> {
        let cell = DigipinCell::from_code("39J-49L-L8T4")?;
        let json = serde_json::to_value(&cell)?;
        assert_eq!(json["code"], "39J-49L-L8T4");
        Ok(())
    }
}
