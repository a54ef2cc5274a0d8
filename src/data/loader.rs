use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, Outcome};

/// Required source columns. Extra columns are ignored.
pub const COL_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_BOOSTER: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";

/// Schema-level problems shared by all three input formats.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: invalid '{column}' value: {message}")]
    BadValue {
        row: usize,
        column: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch-records table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the canonical export, header row required
/// * `.json`    – records-oriented array (`df.to_json(orient='records')`)
/// * `.parquet` – pandas / polars export
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Row shape shared by the CSV and JSON paths
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version Category")]
    booster_category: String,
    class: i64,
}

impl RawRow {
    fn into_record(self, row: usize) -> Result<LaunchRecord, SchemaError> {
        let outcome = Outcome::from_class(self.class).ok_or(SchemaError::BadValue {
            row,
            column: COL_CLASS,
            message: format!("expected 0 or 1, got {}", self.class),
        })?;
        Ok(LaunchRecord {
            launch_site: self.launch_site,
            payload_mass_kg: self.payload_mass_kg,
            booster_category: self.booster_category,
            outcome,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    let headers = reader.headers().context("reading CSV headers")?;
    for required in [COL_SITE, COL_PAYLOAD, COL_BOOSTER, COL_CLASS] {
        if !headers.iter().any(|h| h == required) {
            return Err(SchemaError::MissingColumn(required).into());
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRow>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(raw.into_record(row_no)?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 2500.0,
///     "Booster Version Category": "FT",
///     "class": 1
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<RawRow> = serde_json::from_str(&text).context("parsing JSON records")?;

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, raw) in rows.into_iter().enumerate() {
        records.push(raw.into_record(row_no)?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let index_of = |col: &'static str| {
            schema
                .index_of(col)
                .map_err(|_| SchemaError::MissingColumn(col))
        };
        let site_col = batch.column(index_of(COL_SITE)?);
        let payload_col = batch.column(index_of(COL_PAYLOAD)?);
        let booster_col = batch.column(index_of(COL_BOOSTER)?);
        let class_col = batch.column(index_of(COL_CLASS)?);

        for row in 0..batch.num_rows() {
            let class = extract_i64(class_col, row)
                .with_context(|| format!("row {row}: failed to read '{COL_CLASS}'"))?;
            let outcome = Outcome::from_class(class).ok_or(SchemaError::BadValue {
                row,
                column: COL_CLASS,
                message: format!("expected 0 or 1, got {class}"),
            })?;

            records.push(LaunchRecord {
                launch_site: extract_string(site_col, row)
                    .with_context(|| format!("row {row}: failed to read '{COL_SITE}'"))?,
                payload_mass_kg: extract_f64(payload_col, row)
                    .with_context(|| format!("row {row}: failed to read '{COL_PAYLOAD}'"))?,
                booster_category: extract_string(booster_col, row)
                    .with_context(|| format!("row {row}: failed to read '{COL_BOOSTER}'"))?,
                outcome,
            });
        }
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Int64 => Ok(extract_i64(col, row)? as f64),
        other => bail!("expected a float column, got {other:?}"),
    }
}

fn extract_i64(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    match col.data_type() {
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row))
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as i64)
        }
        // Some exports store the 0/1 outcome as a boolean.
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            Ok(arr.value(row) as i64)
        }
        other => bail!("expected an integer column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_temp(name: &str, contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("creating temp dir");
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("creating temp file");
        file.write_all(contents.as_bytes()).expect("writing temp file");
        (dir, path)
    }

    #[test]
    fn csv_with_extra_columns_loads() {
        let (_dir, path) = write_temp(
            "launches.csv",
            "Flight Number,Launch Site,class,Payload Mass (kg),Booster Version Category\n\
             1,CCAFS LC-40,0,500.5,v1.0\n\
             2,KSC LC-39A,1,4200,FT\n",
        );

        let ds = load_file(&path).expect("loading CSV");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].launch_site, "CCAFS LC-40");
        assert_eq!(ds.records[0].payload_mass_kg, 500.5);
        assert_eq!(ds.records[0].outcome, Outcome::Failure);
        assert_eq!(ds.records[1].booster_category, "FT");
        assert_eq!(ds.payload_bounds, (500.5, 4200.0));
    }

    #[test]
    fn csv_missing_column_is_an_error() {
        let (_dir, path) = write_temp(
            "launches.csv",
            "Launch Site,class,Booster Version Category\nCCAFS LC-40,1,FT\n",
        );

        let err = load_file(&path).expect_err("should fail");
        assert!(err.to_string().contains(COL_PAYLOAD));
    }

    #[test]
    fn csv_bad_class_value_is_an_error() {
        let (_dir, path) = write_temp(
            "launches.csv",
            "Launch Site,Payload Mass (kg),Booster Version Category,class\n\
             CCAFS LC-40,500,v1.0,2\n",
        );

        let err = load_file(&path).expect_err("should fail");
        assert!(err.to_string().contains("expected 0 or 1"));
    }

    #[test]
    fn json_records_load() {
        let (_dir, path) = write_temp(
            "launches.json",
            r#"[
                {"Launch Site": "VAFB SLC-4E", "Payload Mass (kg)": 3000.0,
                 "Booster Version Category": "B4", "class": 1}
            ]"#,
        );

        let ds = load_file(&path).expect("loading JSON");
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].launch_site, "VAFB SLC-4E");
        assert_eq!(ds.records[0].outcome, Outcome::Success);
    }

    #[test]
    fn parquet_scalar_columns_load() {
        let dir = tempfile::tempdir().expect("creating temp dir");
        let path = dir.path().join("launches.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD, DataType::Float64, false),
            Field::new(COL_BOOSTER, DataType::Utf8, false),
            Field::new(COL_CLASS, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["CCAFS SLC-40", "KSC LC-39A"])),
                Arc::new(Float64Array::from(vec![2000.0, 5300.0])),
                Arc::new(StringArray::from(vec!["FT", "B5"])),
                Arc::new(Int64Array::from(vec![0, 1])),
            ],
        )
        .expect("building record batch");

        let file = std::fs::File::create(&path).expect("creating parquet file");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("creating writer");
        writer.write(&batch).expect("writing batch");
        writer.close().expect("closing writer");

        let ds = load_file(&path).expect("loading parquet");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].launch_site, "KSC LC-39A");
        assert_eq!(ds.records[1].outcome, Outcome::Success);
        assert_eq!(ds.sites, vec!["CCAFS SLC-40", "KSC LC-39A"]);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let (_dir, path) = write_temp("launches.xlsx", "");
        assert!(load_file(&path).is_err());
    }
}
