use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CustomerRecord, CustomerTable, SalesRecord, SalesTable, Snapshot};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Schema and cell validation failures. Any of these aborts the load.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': '{value}' is not a valid number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}, column '{column}': value is required")]
    MissingValue { row: usize, column: String },

    #[error("row {0} is not a JSON object")]
    NotAnObject(usize),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load both sources into one snapshot. Either failing is fatal.
pub fn load_snapshot(sales_path: &Path, customers_path: &Path) -> Result<Snapshot> {
    let sales = load_sales(sales_path)
        .with_context(|| format!("loading sales data from {}", sales_path.display()))?;
    let customers = load_customers(customers_path)
        .with_context(|| format!("loading customer data from {}", customers_path.display()))?;
    log::info!(
        "Loaded {} sales rows ({} categories) and {} customer rows ({} countries)",
        sales.len(),
        sales.categories.len(),
        customers.len(),
        customers.countries.len()
    );
    Ok(Snapshot { sales, customers })
}

pub fn load_sales(path: &Path) -> Result<SalesTable> {
    Ok(SalesTable::from_records(load_file(path)?))
}

pub fn load_customers(path: &Path) -> Result<CustomerTable> {
    Ok(CustomerTable::from_records(load_file(path)?))
}

/// Load typed records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line (recommended)
/// * `.json`    – `[{ "Date": "...", "SKU": "...", ... }, ...]`
/// * `.parquet` – flat columns; strings and numbers are both accepted
pub fn load_file<R: TabularRecord>(path: &Path) -> Result<Vec<R>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// Row access shared by every format
// ---------------------------------------------------------------------------

/// Cell text read as a missing value, as pandas does by default.
const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_MARKERS.contains(&cell)
}

/// Column name → position, validated once per source.
pub struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn new(names: Vec<String>) -> Self {
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        ColumnIndex { names, positions }
    }

    fn require(&self, columns: &[&str]) -> Result<(), DataError> {
        match columns.iter().find(|c| !self.positions.contains_key(**c)) {
            Some(missing) => Err(DataError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }
}

/// One source row as text cells.
pub struct Row<'a> {
    columns: &'a ColumnIndex,
    cells: &'a [String],
    /// Zero-based data row number, for error messages.
    pub number: usize,
}

impl<'a> Row<'a> {
    /// Trimmed cell text; empty when the column is absent in this row.
    pub fn text(&self, column: &str) -> &'a str {
        self.columns
            .positions
            .get(column)
            .and_then(|&i| self.cells.get(i))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    pub fn optional_text(&self, column: &str) -> Option<String> {
        let s = self.text(column);
        (!is_missing(s)).then(|| s.to_string())
    }

    /// Empty cell, missing marker or non-finite value → `None`; anything
    /// else must parse as a float.
    pub fn optional_number(&self, column: &str) -> Result<Option<f64>, DataError> {
        let s = self.text(column);
        if is_missing(s) {
            return Ok(None);
        }
        s.parse::<f64>()
            .map(|v| v.is_finite().then_some(v))
            .map_err(|_| self.invalid_number(column, s))
    }

    /// Integer cell. Accepts float text with no fractional part (`3.0`).
    pub fn integer(&self, column: &str) -> Result<i64, DataError> {
        let s = self.text(column);
        if is_missing(s) {
            return Err(DataError::MissingValue {
                row: self.number,
                column: column.to_string(),
            });
        }
        if let Ok(i) = s.parse::<i64>() {
            return Ok(i);
        }
        match s.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
            _ => Err(self.invalid_number(column, s)),
        }
    }

    /// Every column not in `used`, verbatim as text. No type inference is
    /// attempted, so mixed-type columns survive unchanged.
    pub fn extra(&self, used: &[&str]) -> BTreeMap<String, String> {
        if self.cells.len() > self.columns.names.len() {
            log::warn!(
                "row {}: {} cells beyond the {} header columns ignored",
                self.number,
                self.cells.len() - self.columns.names.len(),
                self.columns.names.len()
            );
        }
        self.columns
            .names
            .iter()
            .zip(self.cells.iter())
            .filter(|(name, _)| !used.contains(&name.as_str()))
            .map(|(name, cell)| (name.clone(), cell.clone()))
            .collect()
    }

    fn invalid_number(&self, column: &str, value: &str) -> DataError {
        DataError::InvalidNumber {
            row: self.number,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

/// A strongly-typed record decoded from one source row.
pub trait TabularRecord: Sized {
    /// Columns that must be present in the source header.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> Result<Self, DataError>;
}

impl TabularRecord for SalesRecord {
    const COLUMNS: &'static [&'static str] =
        &["Date", "Category", "Fulfilment", "Amount", "Qty", "SKU"];

    fn from_row(row: &Row<'_>) -> Result<Self, DataError> {
        Ok(SalesRecord {
            date: row.text("Date").to_string(),
            category: row.text("Category").to_string(),
            fulfilment: row.text("Fulfilment").to_string(),
            amount: row.optional_number("Amount")?,
            quantity: row.integer("Qty")?,
            sku: row.text("SKU").to_string(),
            extra: row.extra(Self::COLUMNS),
        })
    }
}

impl TabularRecord for CustomerRecord {
    const COLUMNS: &'static [&'static str] =
        &["CustomerID", "Country", "StockCode", "UnitPrice", "Quantity"];

    fn from_row(row: &Row<'_>) -> Result<Self, DataError> {
        Ok(CustomerRecord {
            customer_id: row.optional_text("CustomerID"),
            country: row.text("Country").to_string(),
            stock_code: row.text("StockCode").to_string(),
            unit_price: row.optional_number("UnitPrice")?,
            quantity: row.integer("Quantity")?,
            extra: row.extra(Self::COLUMNS),
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, extra columns allowed.
/// Every cell is read as text; typing happens in [`TabularRecord::from_row`].
fn load_csv<R: TabularRecord>(path: &Path) -> Result<Vec<R>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let columns = ColumnIndex::new(headers);
    columns.require(R::COLUMNS)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        let row = Row {
            columns: &columns,
            cells: &cells,
            number: row_no,
        };
        records.push(R::from_row(&row)?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": "04-30-22", "Category": "Set", "Fulfilment": "Merchant",
///     "Amount": 647.62, "Qty": 1, "SKU": "SET389-KR-NP-S" },
///   ...
/// ]
/// ```
///
/// The column set is the union of keys across all objects.
fn load_json<R: TabularRecord>(path: &Path) -> Result<Vec<R>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(rows.len());
    let mut names: Vec<String> = Vec::new();
    for (i, rec) in rows.iter().enumerate() {
        let obj = rec.as_object().ok_or(DataError::NotAnObject(i))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let columns = ColumnIndex::new(names);
    columns.require(R::COLUMNS)?;

    let mut records = Vec::with_capacity(objects.len());
    for (i, obj) in objects.into_iter().enumerate() {
        let cells: Vec<String> = columns
            .names
            .iter()
            .map(|name| obj.get(name).map(json_to_text).unwrap_or_default())
            .collect();
        let row = Row {
            columns: &columns,
            cells: &cells,
            number: i,
        };
        records.push(R::from_row(&row)?);
    }

    Ok(records)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per source column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Cells are rendered to text with the
/// Arrow display formatter, then typed like CSV cells.
fn load_parquet<R: TabularRecord>(path: &Path) -> Result<Vec<R>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    // Validate against the file schema so files without row groups are checked too.
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let columns = ColumnIndex::new(names);
    columns.require(R::COLUMNS)?;

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for i in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| {
                    if col.is_null(i) {
                        Ok(String::new())
                    } else {
                        array_value_to_string(col, i)
                    }
                })
                .collect::<Result<Vec<String>, _>>()
                .with_context(|| format!("Row {}: failed to render cell", row_offset + i))?;
            let row = Row {
                columns: &columns,
                cells: &cells,
                number: row_offset + i,
            };
            records.push(R::from_row(&row)?);
        }
        row_offset += batch.num_rows();
    }

    Ok(records)
}
