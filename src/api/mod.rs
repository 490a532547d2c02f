pub mod cell;
pub mod digipin_arrow;
pub mod digipin_csv;
pub mod digipin_parquet;
pub mod region;

pub use cell::DigipinCell;
pub use digipin_arrow::DigipinCellsToArrow;
pub use digipin_csv::{
    CsvDigipinConfig, CsvSource, CsvSummary, CsvToDigipin, GeometryFormat, csv_to_digipin_csv,
};
pub use digipin_parquet::{
    DigipinCellsToGeoParquet, GeoParquetOptions, covering_bounds, write_geoparquet,
};
pub use region::{BoundaryRegion, Region, encode_within};
