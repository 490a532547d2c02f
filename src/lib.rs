//! # digipin-rs
//!
//! DIGIPIN splits the region covering India (2.5°N to 38.5°N, 63.5°E to
//! 99.5°E) into a 4x4 grid, labels each cell with one of 16 symbols, and
//! repeats ten times. The ten symbols, displayed as `XXX-XXX-XXXX`, name a
//! cell about 4 m across.
//!
//! There are currently four main entry points.
//!
//! ### 1. `encode` / `decode` - The Codec
//!
//! ```
//! use digipin_rs::{decode, encode};
//!
//! # fn main() -> Result<(), digipin_rs::DigipinError> {
//! let code = encode(28.622788, 77.213033)?;
//! assert_eq!(code.to_string(), "39J-49L-L8T4");
//!
//! let ll = decode("39J-49L-L8T4")?;
//! println!("{}", ll);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `DigipinCell` - Cell Geometry
//!
//! ```
//! use digipin_rs::DigipinCell;
//!
//! # fn main() -> Result<(), digipin_rs::DigipinError> {
//! let cell = DigipinCell::from_code("39J-49L-L8T4")?;
//! let polygon = cell.to_polygon();
//! println!("half-height: {}°", cell.bounds.half_height());
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `Region` - Geofencing
//!
//! ```no_run
//! use digipin_rs::{BoundaryRegion, encode_within};
//!
//! let india = BoundaryRegion::from_geojson_file("india_boundary.geojson").unwrap();
//! let code = encode_within(&india, 28.6448, 77.2167).unwrap();
//! ```
//!
//! ### 4. `CsvToDigipin` - CSV File Conversion
//!
//! ```no_run
//! use digipin_rs::{CsvDigipinConfig, CsvToDigipin, GeometryFormat};
//!
//! let config = CsvDigipinConfig::encode_coords("Latitude", "Longitude")
//!     .with_cell_geometry(GeometryFormat::Wkt);
//!
//! "input.csv".to_digipin_csv("output.csv", &config).unwrap();
//! ```
//!

pub mod api;
pub mod core;
pub mod geom;
pub mod util;

pub use api::{
    BoundaryRegion, CsvDigipinConfig, CsvSource, CsvSummary, CsvToDigipin, DigipinCell,
    DigipinCellsToArrow, DigipinCellsToGeoParquet, GeoParquetOptions, GeometryFormat, Region,
    covering_bounds, csv_to_digipin_csv, encode_within, write_geoparquet,
};
pub use crate::core::{
    BoundingBox, CODE_LENGTH, DIGIPIN_GRID, GRID_SIZE, REGION, REGION_EXTENTS, SEPARATOR,
    decode, decode_bounds, encode, is_symbol, locate, symbol_at, symbols,
};
pub use geom::{parse_geojson, parse_geometry, parse_wkt};
pub use util::{
    Coordinate, Digipin, DigipinError, EncodeResponse, LatLng, format_code, normalize,
};

pub use geo_types;
