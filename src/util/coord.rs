use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize, Serializer};

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>`,
/// `geo_types::Coord<f64>` and [`LatLng`]. As in geo-types, x is the
/// longitude and y the latitude, so tuples are `(lon, lat)`.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude).
    fn y(&self) -> f64;

    fn longitude(&self) -> f64 {
        self.x()
    }

    fn latitude(&self) -> f64 {
        self.y()
    }
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

impl Coordinate for Coord<f64> {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
}

/// A decoded coordinate, serialised as `{"latitude": .., "longitude": ..}`.
///
/// Values serialise rounded to six decimal places (about 0.1 m), below the
/// resolution of a full-length code. They are emitted as JSON numbers, not as
/// the fixed-point strings (`"28.622793"`) some DIGIPIN web services return;
/// callers comparing against those must parse the strings first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    #[serde(serialize_with = "six_decimals")]
    pub latitude: f64,
    #[serde(serialize_with = "six_decimals")]
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl Coordinate for LatLng {
    fn x(&self) -> f64 {
        self.longitude
    }
    fn y(&self) -> f64 {
        self.latitude
    }
}

impl From<Point<f64>> for LatLng {
    fn from(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

fn six_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1e6).round() / 1e6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_trait_tuple() {
        let tuple = (77.2167, 28.6448);
        assert_eq!(tuple.longitude(), 77.2167);
        assert_eq!(tuple.latitude(), 28.6448);
    }

    #[test]
    fn test_coordinate_trait_point() {
        let point = Point::new(77.2167, 28.6448);
        assert_eq!(point.x(), 77.2167);
        assert_eq!(point.latitude(), 28.6448);
    }

    #[test]
    fn test_lat_lng_point_conversion() {
        let ll = LatLng::new(28.6448, 77.2167);
        let point = ll.to_point();
        assert_eq!(point.x(), 77.2167);
        assert_eq!(LatLng::from(point), ll);
    }

    #[test]
    fn test_lat_lng_json_shape() -> Result<(), serde_json::Error> {
        let ll = LatLng::new(28.622793197631836, 77.21304893493652);
        let json = serde_json::to_value(ll)?;
        assert_eq!(json["latitude"], 28.622793);
        assert_eq!(json["longitude"], 77.213049);
        assert!(json["latitude"].is_f64() && !json["latitude"].is_string());
        Ok(())
    }

    #[test]
    fn test_lat_lng_display() {
        let ll = LatLng::new(12.9716, 77.5946);
        assert_eq!(ll.to_string(), "12.971600, 77.594600");
    }
}
