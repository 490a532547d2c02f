use crate::api::cell::DigipinCell;
use crate::api::digipin_arrow::DigipinCellsToArrow;
use crate::core::bounds::BoundingBox;
use crate::core::constants::CODE_LENGTH;
use crate::util::error::DigipinError;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use rayon::prelude::*;
use serde_json::json;
use std::fs::File;
use std::path::Path;

/// File metadata key holding the code length, sort order and covering bbox of the cells.
pub const DIGIPIN_METADATA_KEY: &str = "digipin";

/// Parquet's own default row group size.
pub const DEFAULT_ROW_GROUP_SIZE: usize = 1024 * 1024;

/// Options for writing cells to GeoParquet.
///
/// Cells are sorted by code by default. Codes sharing a prefix share a
/// parent cell, so each row group then covers a compact patch of the grid
/// and its column statistics stay tight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoParquetOptions {
    pub row_group_size: usize,
    pub sort_by_code: bool,
}

impl Default for GeoParquetOptions {
    fn default() -> Self {
        Self {
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            sort_by_code: true,
        }
    }
}

impl GeoParquetOptions {
    pub fn row_group_size(mut self, rows: usize) -> Self {
        self.row_group_size = rows;
        self
    }

    /// Keep the input order instead of sorting by code.
    pub fn sort_by_code(mut self, sort: bool) -> Self {
        self.sort_by_code = sort;
        self
    }
}

/// Writes a RecordBatch with a GeoArrow geometry column to a GeoParquet file (WKB encoded).
pub fn write_geoparquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), DigipinError> {
    write_batch(batch, path.as_ref(), DEFAULT_ROW_GROUP_SIZE, Vec::new())
}

fn write_batch(
    batch: &RecordBatch,
    path: &Path,
    row_group_size: usize,
    extra_metadata: Vec<KeyValue>,
) -> Result<(), DigipinError> {
    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();

    let schema = batch.schema();
    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&schema, &options)
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    let props = WriterProperties::builder()
        .set_max_row_group_size(row_group_size.max(1))
        .build();

    let file = File::create(path).map_err(|e| DigipinError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), Some(props))
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    let encoded_batch = encoder
        .encode_record_batch(batch)
        .map_err(|e| DigipinError::IoError(e.to_string()))?;
    writer
        .write(&encoded_batch)
        .map_err(|e| DigipinError::IoError(e.to_string()))?;

    let geo_metadata = encoder
        .into_keyvalue()
        .map_err(|e| DigipinError::IoError(e.to_string()))?;
    writer.append_key_value_metadata(geo_metadata);
    for kv in extra_metadata {
        writer.append_key_value_metadata(kv);
    }

    writer
        .finish()
        .map_err(|e| DigipinError::IoError(e.to_string()))?;
    Ok(())
}

/// Smallest box covering every cell, `None` for no cells.
pub fn covering_bounds(cells: &[DigipinCell]) -> Option<BoundingBox> {
    cells
        .iter()
        .map(|c| c.bounds)
        .reduce(|acc, b| acc.union(&b))
}

fn digipin_metadata(
    cells: &[DigipinCell],
    options: &GeoParquetOptions,
) -> Result<KeyValue, DigipinError> {
    let value = json!({
        "code_length": CODE_LENGTH,
        "sorted_by_code": options.sort_by_code,
        "bbox": covering_bounds(cells).map(|b| b.to_bbox_array()),
    });
    let value =
        serde_json::to_string(&value).map_err(|e| DigipinError::IoError(e.to_string()))?;
    Ok(KeyValue::new(DIGIPIN_METADATA_KEY.to_string(), value))
}

pub trait DigipinCellsToGeoParquet: DigipinCellsToArrow {
    /// Writes the cells with [`GeoParquetOptions::default`].
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), DigipinError> {
        self.to_geoparquet_with_options(path, &GeoParquetOptions::default())
    }

    fn to_geoparquet_with_options(
        &self,
        path: impl AsRef<Path>,
        options: &GeoParquetOptions,
    ) -> Result<(), DigipinError>;
}

impl DigipinCellsToGeoParquet for [DigipinCell] {
    fn to_geoparquet_with_options(
        &self,
        path: impl AsRef<Path>,
        options: &GeoParquetOptions,
    ) -> Result<(), DigipinError> {
        let mut cells = self.to_vec();
        if options.sort_by_code {
            cells.par_sort_unstable_by(|a, b| a.code.cmp(&b.code));
        }

        let batch = cells.to_record_batch()?;
        let metadata = digipin_metadata(&cells, options)?;
        write_batch(&batch, path.as_ref(), options.row_group_size, vec![metadata])
    }
}

impl DigipinCellsToGeoParquet for Vec<DigipinCell> {
    fn to_geoparquet_with_options(
        &self,
        path: impl AsRef<Path>,
        options: &GeoParquetOptions,
    ) -> Result<(), DigipinError> {
        self.as_slice().to_geoparquet_with_options(path, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::{Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use tempfile::tempdir;

    fn io_err(e: impl std::fmt::Display) -> DigipinError {
        DigipinError::IoError(e.to_string())
    }

    fn unsorted_cells() -> Result<Vec<DigipinCell>, DigipinError> {
        Ok(vec![
            DigipinCell::from_code("4P3-JK8-52C9")?,
            DigipinCell::from_lat_lng(28.622788, 77.213033)?,
            DigipinCell::from_code("4FK-595-8823")?,
        ])
    }

    fn read_codes(path: &Path) -> Result<Vec<String>, DigipinError> {
        let file = File::open(path).map_err(io_err)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(io_err)?
            .build()
            .map_err(io_err)?;

        let mut codes = Vec::new();
        for batch in reader {
            let batch = batch.map_err(io_err)?;
            let column = batch
                .column_by_name("digipin")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| io_err("digipin column missing"))?;
            codes.extend(column.iter().flatten().map(str::to_string));
        }
        Ok(codes)
    }

    fn read_digipin_metadata(path: &Path) -> Result<serde_json::Value, DigipinError> {
        let file = File::open(path).map_err(io_err)?;
        let reader = SerializedFileReader::new(file).map_err(io_err)?;
        let value = reader
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .and_then(|kvs| kvs.iter().find(|kv| kv.key == DIGIPIN_METADATA_KEY))
            .and_then(|kv| kv.value.clone())
            .ok_or_else(|| io_err("digipin metadata missing"))?;
        serde_json::from_str(&value).map_err(io_err)
    }

    #[test]
    fn test_cells_to_geoparquet() -> Result<(), DigipinError> {
        let cells = unsorted_cells()?;

        let dir = tempdir().map_err(io_err)?;
        let path = dir.path().join("cells.parquet");

        cells.to_geoparquet(&path)?;

        let metadata = std::fs::metadata(&path).map_err(io_err)?;
        assert!(metadata.len() > 0);
        Ok(())
    }

    #[test]
    fn test_rows_sorted_by_code() -> Result<(), DigipinError> {
        let dir = tempdir().map_err(io_err)?;
        let path = dir.path().join("sorted.parquet");

        unsorted_cells()?.to_geoparquet(&path)?;

        assert_eq!(
            read_codes(&path)?,
            vec!["39J-49L-L8T4", "4FK-595-8823", "4P3-JK8-52C9"]
        );
        Ok(())
    }

    #[test]
    fn test_input_order_kept_when_unsorted() -> Result<(), DigipinError> {
        let dir = tempdir().map_err(io_err)?;
        let path = dir.path().join("unsorted.parquet");
        let options = GeoParquetOptions::default().sort_by_code(false);

        unsorted_cells()?.to_geoparquet_with_options(&path, &options)?;

        assert_eq!(
            read_codes(&path)?,
            vec!["4P3-JK8-52C9", "39J-49L-L8T4", "4FK-595-8823"]
        );
        assert_eq!(read_digipin_metadata(&path)?["sorted_by_code"], false);
        Ok(())
    }

    #[test]
    fn test_row_groups_follow_configured_size() -> Result<(), DigipinError> {
        let dir = tempdir().map_err(io_err)?;
        let path = dir.path().join("groups.parquet");
        let options = GeoParquetOptions::default().row_group_size(1);

        unsorted_cells()?.to_geoparquet_with_options(&path, &options)?;

        let file = File::open(&path).map_err(io_err)?;
        let reader = SerializedFileReader::new(file).map_err(io_err)?;
        assert_eq!(reader.metadata().num_row_groups(), 3);
        Ok(())
    }

    #[test]
    fn test_metadata_records_covering_bbox() -> Result<(), DigipinError> {
        let cells = unsorted_cells()?;
        let dir = tempdir().map_err(io_err)?;
        let path = dir.path().join("bbox.parquet");

        cells.to_geoparquet(&path)?;

        let meta = read_digipin_metadata(&path)?;
        assert_eq!(meta["code_length"], CODE_LENGTH);
        assert_eq!(meta["sorted_by_code"], true);

        let expected = covering_bounds(&cells)
            .ok_or_else(|| io_err("no cells"))?
            .to_bbox_array();
        let bbox: Vec<f64> = meta["bbox"]
            .as_array()
            .ok_or_else(|| io_err("bbox is not an array"))?
            .iter()
            .filter_map(|v| v.as_f64())
            .collect();
        assert_eq!(bbox.len(), 4);
        for (got, want) in bbox.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }

        // Mumbai is the westernmost sample, Delhi the northernmost.
        assert!(bbox[0] < 72.9 && bbox[3] > 28.6);
        Ok(())
    }

    #[test]
    fn test_covering_bounds_empty() {
        assert!(covering_bounds(&[]).is_none());
    }

    #[test]
    fn test_single_cell_to_geoparquet() -> Result<(), DigipinError> {
        let cell = DigipinCell::from_code("39J-49J-29M7")?;

        let dir = tempdir().map_err(io_err)?;
        let path = dir.path().join("cell.parquet");

        cell.to_geoparquet(&path)?;
        assert_eq!(read_codes(&path)?, vec!["39J-49J-29M7"]);
        Ok(())
    }
}
