use crate::api::cell::DigipinCell;
use crate::geom::parse::parse_geometry;
use crate::util::error::DigipinError;
use csv::StringRecord;
use geo::Centroid;
use geo_types::Geometry;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Rows read and converted in parallel before being written out.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// For the type of location source in the file
enum SourceIndices {
    Geometry(usize),
    Coordinates { lat_idx: usize, lon_idx: usize },
    Code(usize),
}

/// Output format for cell polygon geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Specifies how to read location data from CSV rows.
#[derive(Debug, Clone)]
pub enum CsvSource {
    /// A single column containing WKT or GeoJSON geometry (WGS84), encoded to codes
    GeometryColumn(String),
    /// Separate latitude and longitude columns, encoded to codes
    CoordinateColumns {
        latitude_column: String,
        longitude_column: String,
    },
    /// A column of DIGIPIN codes, decoded to latitude and longitude
    CodeColumn(String),
}

/// Configuration for batch CSV conversion.
#[derive(Debug, Clone)]
pub struct CsvDigipinConfig {
    pub source: CsvSource,
    pub exclude_columns: Vec<String>,
    pub include_cell_geometry: Option<GeometryFormat>,
    pub skip_invalid: bool,
    pub chunk_size: usize,
}

impl CsvDigipinConfig {
    fn with_source(source: CsvSource) -> Self {
        Self {
            source,
            exclude_columns: Vec::new(),
            include_cell_geometry: None,
            skip_invalid: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create config for encoding a CSV with latitude and longitude columns.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::CsvDigipinConfig;
    ///
    /// let config = CsvDigipinConfig::encode_coords("Latitude", "Longitude");
    /// ```
    pub fn encode_coords(
        latitude_column: impl Into<String>,
        longitude_column: impl Into<String>,
    ) -> Self {
        Self::with_source(CsvSource::CoordinateColumns {
            latitude_column: latitude_column.into(),
            longitude_column: longitude_column.into(),
        })
    }

    /// Create config for encoding a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// Points are encoded directly, multi-points once per point, and any
    /// other geometry by its centroid.
    pub fn encode_geometry(geometry_column: impl Into<String>) -> Self {
        Self::with_source(CsvSource::GeometryColumn(geometry_column.into()))
    }

    /// Create config for decoding a CSV with a column of codes.
    ///
    /// # Example
    /// ```
    /// use digipin_rs::{CsvDigipinConfig, GeometryFormat};
    ///
    /// let config = CsvDigipinConfig::decode("digipin")
    ///     .with_cell_geometry(GeometryFormat::Wkt)
    ///     .skip_invalid(true);
    /// ```
    pub fn decode(code_column: impl Into<String>) -> Self {
        Self::with_source(CsvSource::CodeColumn(code_column.into()))
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    /// Include the cell polygon in output.
    pub fn with_cell_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_cell_geometry = Some(format);
        self
    }

    /// Log and drop rows that fail to convert instead of aborting.
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn is_decode(&self) -> bool {
        matches!(self.source, CsvSource::CodeColumn(_))
    }
}

pub trait CsvToDigipin {
    fn to_digipin_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvDigipinConfig,
    ) -> Result<CsvSummary, DigipinError>;
}

impl<P: AsRef<Path>> CsvToDigipin for P {
    fn to_digipin_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvDigipinConfig,
    ) -> Result<CsvSummary, DigipinError> {
        csv_to_digipin_csv(self, output_path, config)
    }
}

/// Counts reported after a conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvSummary {
    /// Input data rows read
    pub rows_read: usize,
    /// Output rows written (a multi-point row writes several)
    pub rows_written: usize,
    /// Input rows dropped under `skip_invalid`
    pub rows_skipped: usize,
}

fn polygon_to_wkt(polygon: &geo_types::Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &geo_types::Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

fn collect_cells(geom: Geometry<f64>, cells: &mut Vec<DigipinCell>) -> Result<(), DigipinError> {
    match geom {
        Geometry::Point(pt) => cells.push(DigipinCell::from_wgs84(&pt)?),
        Geometry::MultiPoint(mp) => {
            for pt in &mp.0 {
                cells.push(DigipinCell::from_wgs84(pt)?);
            }
        }
        Geometry::GeometryCollection(gc) => {
            for g in gc.0 {
                collect_cells(g, cells)?;
            }
        }
        other => {
            if let Some(centroid) = other.centroid() {
                cells.push(DigipinCell::from_wgs84(&centroid)?);
            }
        }
    }
    Ok(())
}

/// Encodes a geometry: one cell per point, or the centroid's cell for lines and polygons.
///
/// Fails with `GeometryParseError` when the geometry yields no location at all.
fn geometry_to_cells(geom: Geometry<f64>) -> Result<Vec<DigipinCell>, DigipinError> {
    let mut cells = Vec::new();
    collect_cells(geom, &mut cells)?;
    if cells.is_empty() {
        return Err(DigipinError::GeometryParseError(
            "Geometry is empty, no location to encode".to_string(),
        ));
    }
    Ok(cells)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, DigipinError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DigipinError::CsvError(format!("Column '{}' not found", name)))
}

fn field<'r>(record: &'r StringRecord, idx: usize) -> Result<&'r str, DigipinError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| DigipinError::CsvError(format!("Missing column at index {}", idx)))
}

fn parse_coordinate(value: &str, name: &str) -> Result<f64, DigipinError> {
    value
        .parse()
        .map_err(|_| DigipinError::CsvError(format!("Invalid {}: '{}'", name, value)))
}

/// Converts one input record into zero or more output rows.
fn convert_record(
    record: &StringRecord,
    source: &SourceIndices,
    exclude_indices: &HashSet<usize>,
    config: &CsvDigipinConfig,
) -> Result<Vec<Vec<String>>, DigipinError> {
    let cells = match source {
        SourceIndices::Geometry(idx) => geometry_to_cells(parse_geometry(field(record, *idx)?)?)?,
        SourceIndices::Coordinates { lat_idx, lon_idx } => {
            let lat = parse_coordinate(field(record, *lat_idx)?, "latitude")?;
            let lon = parse_coordinate(field(record, *lon_idx)?, "longitude")?;
            vec![DigipinCell::from_lat_lng(lat, lon)?]
        }
        SourceIndices::Code(idx) => vec![DigipinCell::from_code(field(record, *idx)?)?],
    };

    let rows = cells
        .into_iter()
        .map(|cell| {
            let mut row: Vec<String> = if config.is_decode() {
                vec![
                    format!("{:.6}", cell.latitude()),
                    format!("{:.6}", cell.longitude()),
                ]
            } else {
                vec![cell.code.to_string()]
            };

            if let Some(format) = config.include_cell_geometry {
                let polygon = cell.to_polygon();
                row.push(match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                });
            }

            row.extend(
                record
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !exclude_indices.contains(i))
                    .map(|(_, f)| f.to_string()),
            );
            row
        })
        .collect();

    Ok(rows)
}

// ============================================================================
// CSV Conversion
// ============================================================================

/// Converts a CSV file by encoding its locations to codes, or decoding its codes to locations.
///
/// Rows are read in chunks, converted in parallel, and written in input order.
/// Output goes to a temporary file beside `output_path` that replaces it only
/// once every row is written, so a failed conversion leaves any existing
/// output untouched.
/// The source columns are replaced by `digipin` (encode) or `latitude` and
/// `longitude` (decode), followed by an optional `cell_geometry` column and
/// the remaining input columns.
///
/// # Example with coordinate columns
///
/// ```no_run
/// use digipin_rs::{csv_to_digipin_csv, CsvDigipinConfig};
///
/// let config = CsvDigipinConfig::encode_coords("Latitude", "Longitude");
///
/// csv_to_digipin_csv("post_offices.csv", "output.csv", &config).unwrap();
/// ```
///
/// # Example decoding codes
///
/// ```no_run
/// use digipin_rs::{CsvDigipinConfig, CsvToDigipin};
///
/// let config = CsvDigipinConfig::decode("digipin").skip_invalid(true);
///
/// let summary = "addresses.csv".to_digipin_csv("located.csv", &config).unwrap();
/// println!("{} rows skipped", summary.rows_skipped);
/// ```
pub fn csv_to_digipin_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvDigipinConfig,
) -> Result<CsvSummary, DigipinError> {
    let file = File::open(csv_path).map_err(|e| DigipinError::IoError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| DigipinError::CsvError(e.to_string()))?
        .clone();

    // Source columns are always dropped from the output
    let (source_indices, mut exclude_indices) = match &config.source {
        CsvSource::GeometryColumn(col) => {
            let idx = column_index(&headers, col)?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CsvSource::CoordinateColumns {
            latitude_column,
            longitude_column,
        } => {
            let lat_idx = column_index(&headers, latitude_column)?;
            let lon_idx = column_index(&headers, longitude_column)?;
            (
                SourceIndices::Coordinates { lat_idx, lon_idx },
                HashSet::from([lat_idx, lon_idx]),
            )
        }
        CsvSource::CodeColumn(col) => {
            let idx = column_index(&headers, col)?;
            (SourceIndices::Code(idx), HashSet::from([idx]))
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let output_path = output_path.as_ref();
    let output_dir = match output_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let out_file =
        NamedTempFile::new_in(output_dir).map_err(|e| DigipinError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = if config.is_decode() {
        vec!["latitude", "longitude"]
    } else {
        vec!["digipin"]
    };
    if config.include_cell_geometry.is_some() {
        header_row.push("cell_geometry");
    }
    header_row.extend(
        headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !exclude_indices.contains(i))
            .map(|(_, h)| h),
    );
    writer
        .write_record(&header_row)
        .map_err(|e| DigipinError::CsvError(e.to_string()))?;

    let chunk_size = config.chunk_size.max(1);
    let mut summary = CsvSummary::default();
    let mut records = reader.records();

    loop {
        let chunk: Vec<StringRecord> = records
            .by_ref()
            .take(chunk_size)
            .collect::<Result<_, _>>()
            .map_err(|e| DigipinError::CsvError(e.to_string()))?;
        if chunk.is_empty() {
            break;
        }

        let converted: Vec<_> = chunk
            .par_iter()
            .map(|record| convert_record(record, &source_indices, &exclude_indices, config))
            .collect();

        for (i, result) in converted.into_iter().enumerate() {
            let row_number = summary.rows_read + i + 1;
            match result {
                Ok(rows) => {
                    for row in rows {
                        writer
                            .write_record(&row)
                            .map_err(|e| DigipinError::CsvError(e.to_string()))?;
                        summary.rows_written += 1;
                    }
                }
                Err(e) if config.skip_invalid => {
                    warn!(row = row_number, error = %e, "Skipping invalid row");
                    summary.rows_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        summary.rows_read += chunk.len();
        debug!(rows = chunk.len(), total = summary.rows_read, "Converted chunk");
    }

    writer
        .into_inner()
        .map_err(|e| DigipinError::IoError(e.to_string()))?
        .persist(output_path)
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    info!(
        rows_read = summary.rows_read,
        rows_written = summary.rows_written,
        rows_skipped = summary.rows_skipped,
        "CSV conversion complete"
    );

    Ok(summary)
}
