use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use crate::error::{LoadError, LoadResult};

use super::model::{Dataset, RawRecord};
use super::normalize::normalize;

/// Columns every source must provide, by their verbatim names.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "work_year",
    "seniority",
    "employment_type",
    "company_size",
    "job_title",
    "remote_ratio",
    "employee_residence_iso3",
    "salary_in_usd",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Where a dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// CSV document fetched with a single HTTP GET.
    Remote(String),
    /// Local file, format chosen by extension.
    File(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load and normalize a dataset. One attempt, no retries.
pub fn load(source: &DataSource) -> LoadResult<Dataset> {
    let rows = match source {
        DataSource::Remote(url) => fetch_remote(url)?,
        DataSource::File(path) => load_file(path)?,
    };
    check_salaries(&rows)?;
    Ok(normalize(rows))
}

/// Reject salaries that are negative or not finite.
pub fn check_salaries(rows: &[RawRecord]) -> LoadResult<()> {
    match rows
        .iter()
        .position(|r| !(r.salary_in_usd.is_finite() && r.salary_in_usd >= 0.0))
    {
        Some(row) => Err(invalid_value(
            row,
            "salary_in_usd",
            &format!("{} is not a non-negative amount", rows[row].salary_in_usd),
        )),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Remote CSV
// ---------------------------------------------------------------------------

/// Fetch a CSV document over HTTP(S) and parse it.
pub fn fetch_remote(url: &str) -> LoadResult<Vec<RawRecord>> {
    log::info!("Fetching dataset from {url}");
    let response = reqwest::blocking::get(url)?;
    if !response.status().is_success() {
        return Err(LoadError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    let body = response.bytes()?;
    read_csv(body.as_ref())
}

// ---------------------------------------------------------------------------
// Local files
// ---------------------------------------------------------------------------

/// Load rows from a local file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the source column names
/// * `.json`    – `[{ "work_year": 2024, "seniority": "Senior", ... }, ...]`
/// * `.parquet` – one column per field, as written by pandas or polars
pub fn load_file(path: &Path) -> LoadResult<Vec<RawRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?),
        "json" => read_json(&std::fs::read_to_string(path)?),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse CSV text with a header row. Extra columns are ignored.
pub fn read_csv<R: Read>(reader: R) -> LoadResult<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == *col))
    {
        return Err(LoadError::MissingColumn {
            column: missing.to_string(),
        });
    }

    reader
        .deserialize::<RawRecord>()
        .enumerate()
        .map(|(row, result)| result.map_err(|e| csv_row_error(e, row, &headers)))
        .collect()
}

/// Name the offending column when the csv error points at a field.
fn csv_row_error(err: csv::Error, row: usize, headers: &[String]) -> LoadError {
    if let csv::ErrorKind::Deserialize { err: de, .. } = err.kind() {
        let column = de
            .field()
            .and_then(|idx| headers.get(idx as usize))
            .cloned()
            .unwrap_or_default();
        return LoadError::InvalidValue {
            row,
            column,
            message: de.to_string(),
        };
    }
    LoadError::Csv(err)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
pub fn read_json(text: &str) -> LoadResult<Vec<RawRecord>> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root.as_array().ok_or_else(|| LoadError::InvalidValue {
        row: 0,
        column: String::new(),
        message: "expected a top-level JSON array".to_string(),
    })?;

    rows.iter()
        .enumerate()
        .map(|(row, value)| {
            let obj = value.as_object().ok_or_else(|| LoadError::InvalidValue {
                row,
                column: String::new(),
                message: "row is not a JSON object".to_string(),
            })?;
            json_row(obj, row)
        })
        .collect()
}

fn json_row(obj: &Map<String, JsonValue>, row: usize) -> LoadResult<RawRecord> {
    let year = match obj.get("year") {
        None | Some(JsonValue::Null) => None,
        Some(_) => Some(json_i32(obj, row, "year")?),
    };

    Ok(RawRecord {
        year,
        work_year: json_i32(obj, row, "work_year")?,
        seniority: json_text(obj, row, "seniority")?,
        employment_type: json_text(obj, row, "employment_type")?,
        company_size: json_text(obj, row, "company_size")?,
        job_title: json_text(obj, row, "job_title")?,
        remote_ratio: json_text(obj, row, "remote_ratio")?,
        employee_residence_iso3: json_text(obj, row, "employee_residence_iso3")?,
        salary_in_usd: json_field(obj, "salary_in_usd")?
            .as_f64()
            .ok_or_else(|| invalid_value(row, "salary_in_usd", "expected a number"))?,
    })
}

fn invalid_value(row: usize, column: &str, message: &str) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: column.to_string(),
        message: message.to_string(),
    }
}

fn json_field<'a>(obj: &'a Map<String, JsonValue>, column: &str) -> LoadResult<&'a JsonValue> {
    obj.get(column).ok_or_else(|| LoadError::MissingColumn {
        column: column.to_string(),
    })
}

/// Strings as-is, numbers rendered as text, null as empty.
fn json_text(obj: &Map<String, JsonValue>, row: usize, column: &str) -> LoadResult<String> {
    match json_field(obj, column)? {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Null => Ok(String::new()),
        JsonValue::Number(n) => Ok(n.to_string()),
        _ => Err(invalid_value(row, column, "expected a string")),
    }
}

fn json_i32(obj: &Map<String, JsonValue>, row: usize, column: &str) -> LoadResult<i32> {
    json_field(obj, column)?
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid_value(row, column, "expected an integer"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per source field.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns may be any
/// integer or float width pandas and polars commonly write.
fn load_parquet(path: &Path) -> LoadResult<Vec<RawRecord>> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let year_col = schema.index_of("year").ok().map(|idx| batch.column(idx));
        let work_year = required_column(&batch, "work_year")?;
        let seniority = required_column(&batch, "seniority")?;
        let employment_type = required_column(&batch, "employment_type")?;
        let company_size = required_column(&batch, "company_size")?;
        let job_title = required_column(&batch, "job_title")?;
        let remote_ratio = required_column(&batch, "remote_ratio")?;
        let residence = required_column(&batch, "employee_residence_iso3")?;
        let salary = required_column(&batch, "salary_in_usd")?;

        let offset = rows.len();
        for i in 0..batch.num_rows() {
            let row = offset + i;
            let year = match year_col {
                Some(col) if !col.is_null(i) => Some(to_i32(cell_i64(col, i, row, "year")?, row, "year")?),
                _ => None,
            };
            rows.push(RawRecord {
                year,
                work_year: to_i32(cell_i64(work_year, i, row, "work_year")?, row, "work_year")?,
                seniority: cell_text(seniority, i, row, "seniority")?,
                employment_type: cell_text(employment_type, i, row, "employment_type")?,
                company_size: cell_text(company_size, i, row, "company_size")?,
                job_title: cell_text(job_title, i, row, "job_title")?,
                remote_ratio: cell_text(remote_ratio, i, row, "remote_ratio")?,
                employee_residence_iso3: cell_text(residence, i, row, "employee_residence_iso3")?,
                salary_in_usd: cell_f64(salary, i, row, "salary_in_usd")?,
            });
        }
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> LoadResult<&'a ArrayRef> {
    batch
        .schema()
        .index_of(name)
        .map(|idx| batch.column(idx))
        .map_err(|_| LoadError::MissingColumn {
            column: name.to_string(),
        })
}

fn unsupported(col: &ArrayRef, row: usize, column: &str) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: column.to_string(),
        message: format!("unsupported column type {:?}", col.data_type()),
    }
}

fn downcast<'a, T: 'static>(col: &'a ArrayRef, row: usize, column: &str) -> LoadResult<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| unsupported(col, row, column))
}

fn to_i32(v: i64, row: usize, column: &str) -> LoadResult<i32> {
    i32::try_from(v).map_err(|_| LoadError::InvalidValue {
        row,
        column: column.to_string(),
        message: format!("{v} is out of range"),
    })
}

/// Text cell; numbers are rendered as text and nulls become empty strings.
fn cell_text(col: &ArrayRef, i: usize, row: usize, column: &str) -> LoadResult<String> {
    if col.is_null(i) {
        return Ok(String::new());
    }
    Ok(match col.data_type() {
        DataType::Utf8 => downcast::<StringArray>(col, row, column)?.value(i).to_string(),
        DataType::LargeUtf8 => downcast::<LargeStringArray>(col, row, column)?.value(i).to_string(),
        DataType::Int16 => downcast::<Int16Array>(col, row, column)?.value(i).to_string(),
        DataType::Int32 => downcast::<Int32Array>(col, row, column)?.value(i).to_string(),
        DataType::Int64 => downcast::<Int64Array>(col, row, column)?.value(i).to_string(),
        DataType::Float32 => downcast::<Float32Array>(col, row, column)?.value(i).to_string(),
        DataType::Float64 => downcast::<Float64Array>(col, row, column)?.value(i).to_string(),
        DataType::Boolean => downcast::<BooleanArray>(col, row, column)?.value(i).to_string(),
        _ => return Err(unsupported(col, row, column)),
    })
}

fn cell_i64(col: &ArrayRef, i: usize, row: usize, column: &str) -> LoadResult<i64> {
    if col.is_null(i) {
        return Err(LoadError::InvalidValue {
            row,
            column: column.to_string(),
            message: "null value".to_string(),
        });
    }
    match col.data_type() {
        DataType::Int16 => Ok(i64::from(downcast::<Int16Array>(col, row, column)?.value(i))),
        DataType::Int32 => Ok(i64::from(downcast::<Int32Array>(col, row, column)?.value(i))),
        DataType::Int64 => Ok(downcast::<Int64Array>(col, row, column)?.value(i)),
        DataType::Float64 => {
            let v = downcast::<Float64Array>(col, row, column)?.value(i);
            if v.fract() == 0.0 {
                Ok(v as i64)
            } else {
                Err(LoadError::InvalidValue {
                    row,
                    column: column.to_string(),
                    message: format!("{v} is not a whole number"),
                })
            }
        }
        _ => Err(unsupported(col, row, column)),
    }
}

fn cell_f64(col: &ArrayRef, i: usize, row: usize, column: &str) -> LoadResult<f64> {
    if col.is_null(i) {
        return Err(LoadError::InvalidValue {
            row,
            column: column.to_string(),
            message: "null value".to_string(),
        });
    }
    match col.data_type() {
        DataType::Float32 => Ok(f64::from(downcast::<Float32Array>(col, row, column)?.value(i))),
        DataType::Float64 => Ok(downcast::<Float64Array>(col, row, column)?.value(i)),
        DataType::Int32 | DataType::Int16 | DataType::Int64 => {
            cell_i64(col, i, row, column).map(|v| v as f64)
        }
        _ => Err(unsupported(col, row, column)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RemoteRatio;

    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    const CSV: &str = "\
work_year,year,seniority,employment_type,company_size,job_title,salary,salary_in_usd,remote_ratio,employee_residence_iso3
2020,2020,Senior,FT,L,Data Scientist,150000,150000,100,USA
2021,2021,Junior,FT,S,Data Analyst,200000,40000,0,BRA
";

    #[test]
    fn csv_with_extra_columns_parses() {
        let rows = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].work_year, 2020);
        assert_eq!(rows[0].year, Some(2020));
        assert_eq!(rows[1].salary_in_usd, 40_000.0);
        assert_eq!(rows[1].remote_ratio, "0");
        assert_eq!(rows[1].employee_residence_iso3, "BRA");
    }

    #[test]
    fn csv_without_year_column_is_accepted() {
        let input = "work_year,seniority,employment_type,company_size,job_title,remote_ratio,employee_residence_iso3,salary_in_usd\n\
                     2022,Mid,CT,M,ML Engineer,50,DEU,90000\n";
        let rows = read_csv(input.as_bytes()).unwrap();
        assert_eq!(rows[0].year, None);
        assert_eq!(rows[0].job_title, "ML Engineer");
    }

    #[test]
    fn csv_missing_required_column_is_reported() {
        let input = "work_year,seniority,employment_type,company_size,job_title,remote_ratio,salary_in_usd\n";
        let err = read_csv(input.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn { ref column } if column == "employee_residence_iso3"));
        assert!(err.to_string().contains("missing required column"));
    }

    #[test]
    fn csv_bad_cell_names_row_and_column() {
        let input = "work_year,seniority,employment_type,company_size,job_title,remote_ratio,employee_residence_iso3,salary_in_usd\n\
                     2022,Mid,CT,M,ML Engineer,50,DEU,90000\n\
                     2022,Mid,CT,M,ML Engineer,50,DEU,lots\n";
        let err = read_csv(input.as_bytes()).unwrap_err();
        match err {
            LoadError::InvalidValue { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, "salary_in_usd");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nan_and_negative_salaries_are_rejected() {
        let header = "work_year,seniority,employment_type,company_size,job_title,remote_ratio,employee_residence_iso3,salary_in_usd\n";
        for (bad, expected_row) in [("NaN", 1), ("-1", 1), ("inf", 1)] {
            let input = format!(
                "{header}2022,Mid,CT,M,ML Engineer,50,DEU,90000\n2022,Mid,CT,M,ML Engineer,50,DEU,{bad}\n"
            );
            let rows = read_csv(input.as_bytes()).unwrap();
            match check_salaries(&rows).unwrap_err() {
                LoadError::InvalidValue { row, column, .. } => {
                    assert_eq!(row, expected_row, "{bad}");
                    assert_eq!(column, "salary_in_usd");
                }
                other => panic!("unexpected error for {bad}: {other}"),
            }
        }
    }

    #[test]
    fn load_refuses_file_with_negative_salary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salaries.csv");
        std::fs::write(&path, CSV.replace("40000", "-40000")).unwrap();

        let err = load(&DataSource::File(path)).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, ref column, .. } if column == "salary_in_usd"));
    }

    #[test]
    fn zero_salary_is_accepted() {
        let rows = read_csv(CSV.replace("40000,0,BRA", "0,0,BRA").as_bytes()).unwrap();
        assert_eq!(rows[1].salary_in_usd, 0.0);
        assert!(check_salaries(&rows).is_ok());
    }

    #[test]
    fn json_records_parse_numeric_remote_ratio() {
        let text = r#"[
            {"work_year": 2023, "seniority": "Senior", "employment_type": "FT", "company_size": "M",
             "job_title": "Data Scientist", "remote_ratio": 50, "employee_residence_iso3": "FRA",
             "salary_in_usd": 85000.5, "extra": true}
        ]"#;
        let rows = read_json(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].remote_ratio, "50");
        assert_eq!(rows[0].salary_in_usd, 85_000.5);
        assert_eq!(rows[0].year, None);
    }

    #[test]
    fn json_missing_field_is_reported() {
        let text = r#"[{"work_year": 2023}]"#;
        assert!(matches!(read_json(text), Err(LoadError::MissingColumn { .. })));
        assert!(read_json(r#"{"not": "an array"}"#).is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("salaries.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ref ext) if ext == "xlsx"));
    }

    #[test]
    fn local_csv_file_loads_into_normalized_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salaries.csv");
        std::fs::write(&path, CSV).unwrap();

        let ds = load(&DataSource::File(path)).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].remote_ratio, RemoteRatio::FullyRemote);
        assert_eq!(ds.records()[1].remote_ratio, RemoteRatio::NotRemote);
    }

    #[test]
    fn parquet_file_loads_with_mixed_column_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("work_year", DataType::Int64, false),
            Field::new("seniority", DataType::Utf8, false),
            Field::new("employment_type", DataType::Utf8, false),
            Field::new("company_size", DataType::Utf8, false),
            Field::new("job_title", DataType::Utf8, false),
            Field::new("remote_ratio", DataType::Int64, false),
            Field::new("employee_residence_iso3", DataType::Utf8, true),
            Field::new("salary_in_usd", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![2020, 2024])),
                Arc::new(StringArray::from(vec!["Senior", "Mid"])),
                Arc::new(StringArray::from(vec!["FT", "PT"])),
                Arc::new(StringArray::from(vec!["L", "M"])),
                Arc::new(StringArray::from(vec!["Data Scientist", "Data Engineer"])),
                Arc::new(Int64Array::from(vec![100, 75])),
                Arc::new(StringArray::from(vec![Some("USA"), None])),
                Arc::new(Int64Array::from(vec![150_000, 98_000])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("salaries.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load(&DataSource::File(path)).unwrap();
        assert_eq!(ds.len(), 2);
        let second = &ds.records()[1];
        assert_eq!(second.work_year, 2024);
        assert_eq!(second.salary_in_usd, 98_000.0);
        assert_eq!(second.employee_residence_iso3, "");
        assert_eq!(second.remote_ratio, RemoteRatio::Unmapped("75".into()));
    }
}
