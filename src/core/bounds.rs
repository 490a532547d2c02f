use crate::core::constants::{GRID_SIZE, REGION_EXTENTS};
use crate::util::error::DigipinError;
use geo_types::{Point, Polygon, Rect, coord};
use serde::Serialize;

/// A rectangular region in degrees, with `south < north` and `west < east`.
///
/// Each box splits into a 4x4 grid of children. Row 0 is the northernmost
/// band and column 0 the westernmost. Every child is half-open on its low
/// side, so a point on an internal boundary belongs to the child to its
/// north (for latitude) or east (for longitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    south: f64,
    north: f64,
    west: f64,
    east: f64,
}

/// The supported region covering India.
pub const REGION: BoundingBox = BoundingBox {
    south: REGION_EXTENTS[0],
    north: REGION_EXTENTS[1],
    west: REGION_EXTENTS[2],
    east: REGION_EXTENTS[3],
};

impl BoundingBox {
    /// Creates a bounding box, validating that the bounds are finite and ordered.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::BoundingBox;
    ///
    /// # fn main() -> Result<(), digipin_rs::DigipinError> {
    /// let bbox = BoundingBox::new(10.0, 20.0, 70.0, 80.0)?;
    /// assert_eq!(bbox.center().y(), 15.0);
    /// assert!(BoundingBox::new(20.0, 10.0, 70.0, 80.0).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Result<Self, DigipinError> {
        if ![south, north, west, east].iter().all(|v| v.is_finite()) {
            return Err(DigipinError::InvalidBounds(
                "Bounds must be finite".to_string(),
            ));
        }
        if south >= north {
            return Err(DigipinError::InvalidBounds(format!(
                "South ({}) must be less than north ({})",
                south, north
            )));
        }
        if west >= east {
            return Err(DigipinError::InvalidBounds(format!(
                "West ({}) must be less than east ({})",
                west, east
            )));
        }

        Ok(Self {
            south,
            north,
            west,
            east,
        })
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    /// Latitude extent in degrees.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude extent in degrees.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Half the latitude extent, the largest latitude error of a point decoded to the center.
    pub fn half_height(&self) -> f64 {
        self.height() / 2.0
    }

    /// Half the longitude extent, the largest longitude error of a point decoded to the center.
    pub fn half_width(&self) -> f64 {
        self.width() / 2.0
    }

    /// Center as a `Point` with x = longitude, y = latitude.
    pub fn center(&self) -> Point<f64> {
        Point::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// Returns true if the point lies inside the box, edges included.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south..=self.north).contains(&latitude) && (self.west..=self.east).contains(&longitude)
    }

    /// Returns the child occupying grid cell `(row, col)`.
    pub fn child_box(&self, row: usize, col: usize) -> BoundingBox {
        debug_assert!(row < GRID_SIZE && col < GRID_SIZE);

        let lat_div = self.height() / GRID_SIZE as f64;
        let lon_div = self.width() / GRID_SIZE as f64;
        let band = (GRID_SIZE - 1 - row) as f64;
        let col = col as f64;

        BoundingBox {
            south: self.south + lat_div * band,
            north: self.south + lat_div * (band + 1.0),
            west: self.west + lon_div * col,
            east: self.west + lon_div * (col + 1.0),
        }
    }

    /// Returns the `(row, col)` of the child containing the point.
    ///
    /// Points on the outer north or east edge are assigned to the edge cells.
    pub fn locate_child(&self, latitude: f64, longitude: f64) -> (usize, usize) {
        let last = (GRID_SIZE - 1) as f64;
        let lat_div = self.height() / GRID_SIZE as f64;
        let lon_div = self.width() / GRID_SIZE as f64;

        let band = ((latitude - self.south) / lat_div).floor();
        let row = (last - band).clamp(0.0, last) as usize;
        let col = ((longitude - self.west) / lon_div).floor().clamp(0.0, last) as usize;

        (row, col)
    }

    /// Converts to a `geo_types::Rect` with x = longitude, y = latitude.
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.west, y: self.south },
            coord! { x: self.east, y: self.north },
        )
    }

    /// Converts to a closed rectangular polygon.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            south: self.south.min(other.south),
            north: self.north.max(other.north),
            west: self.west.min(other.west),
            east: self.east.max(other.east),
        }
    }

    /// Bounds as `[west, south, east, north]`, the order GeoJSON and GeoParquet use.
    pub fn to_bbox_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }
}
