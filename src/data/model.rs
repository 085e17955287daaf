use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

// ---------------------------------------------------------------------------
// SalesRecord – one row of the order-level sales log
// ---------------------------------------------------------------------------

/// A single order line from the sales source.
///
/// Field names serialize back to the source column names so the filtered
/// table can be displayed as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    /// Raw date text. Parsed lazily by the resampler so a bad date only
    /// drops the row from the time series.
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Fulfilment")]
    pub fulfilment: String,
    /// Order amount; negative for returns, `None` when the cell is empty.
    #[serde(rename = "Amount")]
    pub amount: Option<f64>,
    #[serde(rename = "Qty")]
    pub quantity: i64,
    #[serde(rename = "SKU")]
    pub sku: String,
    /// Every other source column, kept verbatim as text.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// CustomerRecord – one row of the retail transaction log
// ---------------------------------------------------------------------------

/// A single retail transaction line. `customer_id` repeats across lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    #[serde(rename = "CustomerID")]
    pub customer_id: Option<String>,
    #[serde(rename = "Country")]
    pub country: String,
    /// Join key against [`SalesRecord::sku`].
    #[serde(rename = "StockCode")]
    pub stock_code: String,
    #[serde(rename = "UnitPrice")]
    pub unit_price: Option<f64>,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Tables – immutable snapshots with pre-computed distinct values
// ---------------------------------------------------------------------------

/// The full sales table plus the distinct values offered for selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    pub records: Vec<SalesRecord>,
    pub categories: BTreeSet<String>,
    pub fulfilment_methods: BTreeSet<String>,
}

impl SalesTable {
    /// Build the distinct-value sets from the loaded records.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let mut categories = BTreeSet::new();
        let mut fulfilment_methods = BTreeSet::new();
        for rec in &records {
            categories.insert(rec.category.clone());
            fulfilment_methods.insert(rec.fulfilment.clone());
        }
        SalesTable {
            records,
            categories,
            fulfilment_methods,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The full customer table plus its distinct countries.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerTable {
    pub records: Vec<CustomerRecord>,
    pub countries: BTreeSet<String>,
}

impl CustomerTable {
    pub fn from_records(records: Vec<CustomerRecord>) -> Self {
        let countries = records.iter().map(|r| r.country.clone()).collect();
        CustomerTable { records, countries }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Both source tables, loaded once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub sales: SalesTable,
    pub customers: CustomerTable,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn distinct_values_are_collected_once() {
        let table = SalesTable::from_records(vec![
            sale("04-30-22", "Set", "Amazon", 10.0, 1, "A"),
            sale("04-30-22", "kurta", "Merchant", 20.0, 1, "B"),
            sale("04-29-22", "Set", "Amazon", 5.0, 2, "C"),
        ]);
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.categories.iter().map(String::as_str).collect::<Vec<_>>(),
            ["Set", "kurta"]
        );
        assert_eq!(table.fulfilment_methods.len(), 2);

        let customers = CustomerTable::from_records(vec![
            customer(Some("1"), "UK", "A", 1.0, 1),
            customer(None, "France", "B", 1.0, 1),
            customer(Some("2"), "UK", "A", 1.0, 1),
        ]);
        assert_eq!(customers.countries.len(), 2);
    }

    #[test]
    fn records_serialize_with_source_column_names() {
        let mut rec = sale("04-30-22", "Set", "Amazon", 10.5, 1, "A");
        rec.extra.insert("Status".into(), "Shipped".into());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["SKU"], "A");
        assert_eq!(json["Amount"], 10.5);
        assert_eq!(json["Status"], "Shipped");
    }
}
