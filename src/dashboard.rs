use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::analytics::group::{group_by_country_category, GroupedResult};
use crate::analytics::join::inner_join;
use crate::analytics::metrics::{
    customer_metrics, customers_per_country, sales_metrics, sum_by_key, CustomerMetrics,
    SalesMetrics,
};
use crate::analytics::resample::{resample_monthly, MonthlySeries};
use crate::data::filter::{filter_customers, filter_sales, FilterSpec};
use crate::data::model::{CustomerRecord, SalesRecord, Snapshot};

// ---------------------------------------------------------------------------
// View selector
// ---------------------------------------------------------------------------

/// Which analysis the caller asked for. Set once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Sales,
    Customers,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Everything the sales view displays.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport<'a> {
    pub metrics: SalesMetrics,
    /// `Qty` per category (pie chart).
    pub quantity_by_category: BTreeMap<String, i64>,
    /// `Amount` per fulfilment method (bar chart); empty amounts count as 0.
    pub amount_by_fulfilment: BTreeMap<String, f64>,
    pub monthly: MonthlySeries,
    /// Total filtered rows, before any display cap.
    pub row_count: usize,
    pub rows: Vec<&'a SalesRecord>,
}

/// A unit-price / quantity point for the scatter chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint<'a> {
    pub country: &'a str,
    pub unit_price: f64,
    pub quantity: i64,
}

/// Everything the customers view displays.
#[derive(Debug, Clone, Serialize)]
pub struct CustomersReport<'a> {
    pub metrics: CustomerMetrics,
    pub customers_by_country: BTreeMap<String, usize>,
    /// Joined over the raw tables, restricted to the selected countries.
    pub quantity_by_country_category: GroupedResult,
    pub price_quantity: Vec<PricePoint<'a>>,
    pub row_count: usize,
    pub rows: Vec<&'a CustomerRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Report<'a> {
    Sales(SalesReport<'a>),
    Customers(CustomersReport<'a>),
}

impl Report<'_> {
    /// Cap the record table shown to the user. Summaries are unaffected.
    pub fn limit_rows(&mut self, max: usize) {
        match self {
            Report::Sales(r) => r.rows.truncate(max),
            Report::Customers(r) => r.rows.truncate(max),
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Explicit handle on the loaded snapshot; every pipeline runs against it.
#[derive(Debug, Clone)]
pub struct Dashboard {
    snapshot: Arc<Snapshot>,
}

impl Dashboard {
    pub fn new(snapshot: Arc<Snapshot>) -> Self {
        Dashboard { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Selection with everything selected and the first fulfilment method.
    pub fn default_selection(&self) -> FilterSpec {
        FilterSpec::select_all(&self.snapshot)
    }

    pub fn report(&self, view: View, spec: &FilterSpec) -> Report<'_> {
        match view {
            View::Sales => Report::Sales(self.sales_report(spec)),
            View::Customers => Report::Customers(self.customers_report(spec)),
        }
    }

    /// Sales pipeline: filter → {metrics, monthly series, chart tables}.
    pub fn sales_report(&self, spec: &FilterSpec) -> SalesReport<'_> {
        let rows = filter_sales(&self.snapshot.sales.records, spec);
        log::debug!(
            "sales view: {} of {} rows selected",
            rows.len(),
            self.snapshot.sales.len()
        );

        SalesReport {
            metrics: sales_metrics(&rows),
            quantity_by_category: sum_by_key(
                rows.iter().copied(),
                |r: &SalesRecord| r.category.clone(),
                |r: &SalesRecord| r.quantity,
            ),
            amount_by_fulfilment: sum_by_key(
                rows.iter().copied(),
                |r: &SalesRecord| r.fulfilment.clone(),
                |r: &SalesRecord| r.amount.unwrap_or(0.0),
            ),
            monthly: resample_monthly(&rows),
            row_count: rows.len(),
            rows,
        }
    }

    /// Customers pipeline: filter for the metrics and table, plus the
    /// unfiltered join grouped by country and category.
    pub fn customers_report(&self, spec: &FilterSpec) -> CustomersReport<'_> {
        let rows = filter_customers(&self.snapshot.customers.records, spec);
        log::debug!(
            "customers view: {} of {} rows selected",
            rows.len(),
            self.snapshot.customers.len()
        );

        let joined = inner_join(
            &self.snapshot.sales.records,
            &self.snapshot.customers.records,
        );
        let grouped = group_by_country_category(&joined, &spec.countries);

        let price_quantity = rows
            .iter()
            .copied()
            .filter_map(|r| {
                r.unit_price.map(|unit_price| PricePoint {
                    country: &r.country,
                    unit_price,
                    quantity: r.quantity,
                })
            })
            .collect();

        CustomersReport {
            metrics: customer_metrics(&rows),
            customers_by_country: customers_per_country(&rows),
            quantity_by_country_category: grouped,
            price_quantity,
            row_count: rows.len(),
            rows,
        }
    }
}
