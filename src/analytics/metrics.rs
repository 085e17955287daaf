use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::data::model::{CustomerRecord, SalesRecord};

// ---------------------------------------------------------------------------
// Scalar aggregation
// ---------------------------------------------------------------------------

/// Sum, count and mean of a numeric measure.
///
/// `count` is the number of values aggregated, not the number of rows they
/// came from; callers that skip missing values report rows separately.
/// `mean` is `None` when nothing was counted, which keeps "undefined"
/// distinct from a real mean of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateResult {
    pub total: f64,
    pub mean: Option<f64>,
    pub count: usize,
}

/// Aggregate a stream of measure values. Never fails; empty input gives
/// `total = 0`, `count = 0`, `mean = None`.
pub fn aggregate<I>(values: I) -> AggregateResult
where
    I: IntoIterator<Item = f64>,
{
    let (total, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    let mean = (count > 0).then(|| total / count as f64);
    AggregateResult { total, mean, count }
}

/// Sum `value` per `key`, keys in sorted order.
pub fn sum_by_key<'a, R, K, V, I, FK, FV>(rows: I, key: FK, value: FV) -> BTreeMap<K, V>
where
    R: 'a,
    I: IntoIterator<Item = &'a R>,
    K: Ord,
    V: Default + std::ops::AddAssign,
    FK: Fn(&'a R) -> K,
    FV: Fn(&'a R) -> V,
{
    let mut totals: BTreeMap<K, V> = BTreeMap::new();
    for row in rows {
        *totals.entry(key(row)).or_default() += value(row);
    }
    totals
}

// ---------------------------------------------------------------------------
// Sales view metrics
// ---------------------------------------------------------------------------

/// Headline numbers for the sales view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalesMetrics {
    /// Statistics over `Amount`; rows with an empty amount are not counted.
    pub amount: AggregateResult,
    /// Selected rows, including those with an empty amount.
    pub rows: usize,
    /// Sum of `Qty`.
    pub units: i64,
}

pub fn sales_metrics(rows: &[&SalesRecord]) -> SalesMetrics {
    SalesMetrics {
        amount: aggregate(rows.iter().filter_map(|r| r.amount)),
        rows: rows.len(),
        units: rows.iter().map(|r| r.quantity).sum(),
    }
}

// ---------------------------------------------------------------------------
// Customer view metrics
// ---------------------------------------------------------------------------

/// Headline numbers for the customer view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerMetrics {
    /// Distinct non-missing customer ids.
    pub distinct_customers: usize,
    /// Country with the most distinct customers; ties go to the country
    /// that sorts first. `None` when no row carries a customer id.
    pub top_country: Option<String>,
    /// Sum of `Quantity`.
    pub total_quantity: i64,
}

/// Number of distinct customer ids per country. Every country present in
/// `rows` gets an entry, possibly zero.
pub fn customers_per_country(rows: &[&CustomerRecord]) -> BTreeMap<String, usize> {
    let mut ids: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for rec in rows {
        let entry = ids.entry(rec.country.as_str()).or_default();
        if let Some(id) = &rec.customer_id {
            entry.insert(id.as_str());
        }
    }
    ids.into_iter()
        .map(|(country, set)| (country.to_string(), set.len()))
        .collect()
}

pub fn customer_metrics(rows: &[&CustomerRecord]) -> CustomerMetrics {
    let distinct_customers = rows
        .iter()
        .filter_map(|r| r.customer_id.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let mut top_country: Option<(String, usize)> = None;
    for (country, n) in customers_per_country(rows) {
        if n == 0 {
            continue;
        }
        if top_country.as_ref().map_or(true, |(_, best)| n > *best) {
            top_country = Some((country, n));
        }
    }

    CustomerMetrics {
        distinct_customers,
        top_country: top_country.map(|(country, _)| country),
        total_quantity: rows.iter().map(|r| r.quantity).sum(),
    }
}
