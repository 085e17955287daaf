use std::collections::BTreeSet;

use serde::Serialize;

use super::model::{CustomerRecord, SalesRecord, Snapshot};

// ---------------------------------------------------------------------------
// Filter predicate: the user's current selection
// ---------------------------------------------------------------------------

/// Selected values for every filterable column.
///
/// Selecting every distinct value of a column means "no filter"; an empty
/// set hides everything. Values unknown to the dataset simply match nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub categories: BTreeSet<String>,
    /// Single-select: must match exactly.
    pub fulfilment: String,
    pub countries: BTreeSet<String>,
}

impl FilterSpec {
    /// Initialise a [`FilterSpec`] with all values selected and the first
    /// fulfilment method chosen, the way the selection widgets start out.
    pub fn select_all(snapshot: &Snapshot) -> Self {
        FilterSpec {
            categories: snapshot.sales.categories.clone(),
            fulfilment: snapshot
                .sales
                .fulfilment_methods
                .iter()
                .next()
                .cloned()
                .unwrap_or_default(),
            countries: snapshot.customers.countries.clone(),
        }
    }

    pub fn keeps_sale(&self, rec: &SalesRecord) -> bool {
        self.categories.contains(&rec.category) && rec.fulfilment == self.fulfilment
    }

    pub fn keeps_customer(&self, rec: &CustomerRecord) -> bool {
        self.countries.contains(&rec.country)
    }
}

/// Return the sales rows that pass the category and fulfilment filters.
///
/// Accepts any row source, so an already-filtered result can be filtered
/// again (`filter_sales(prev.iter().copied(), spec)`).
pub fn filter_sales<'a, I>(rows: I, spec: &FilterSpec) -> Vec<&'a SalesRecord>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    rows.into_iter().filter(|rec| spec.keeps_sale(rec)).collect()
}

/// Return the customer rows whose country is selected.
pub fn filter_customers<'a, I>(rows: I, spec: &FilterSpec) -> Vec<&'a CustomerRecord>
where
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    rows.into_iter().filter(|rec| spec.keeps_customer(rec)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{customer, sale};
    use crate::data::model::{CustomerTable, SalesTable};

    fn snapshot() -> Snapshot {
        Snapshot {
            sales: SalesTable::from_records(vec![
                sale("04-30-22", "Set", "Amazon", 10.0, 1, "A"),
                sale("04-30-22", "kurta", "Amazon", 20.0, 2, "B"),
                sale("04-29-22", "Top", "Amazon", 5.0, 1, "C"),
            ]),
            customers: CustomerTable::from_records(vec![
                customer(Some("1"), "UK", "A", 1.0, 1),
                customer(Some("2"), "France", "B", 1.0, 1),
                customer(Some("3"), "Germany", "C", 1.0, 1),
            ]),
        }
    }

    #[test]
    fn full_selection_is_identity() {
        let snap = snapshot();
        let spec = FilterSpec::select_all(&snap);

        let sales = filter_sales(&snap.sales.records, &spec);
        assert_eq!(sales.len(), snap.sales.len());
        assert!(sales.iter().zip(&snap.sales.records).all(|(a, b)| *a == b));

        let customers = filter_customers(&snap.customers.records, &spec);
        assert_eq!(customers.len(), snap.customers.len());
    }

    #[test]
    fn filtering_is_idempotent() {
        let snap = snapshot();
        let mut spec = FilterSpec::select_all(&snap);
        spec.categories = ["Set", "Top"].iter().map(|s| s.to_string()).collect();
        spec.countries = ["UK"].iter().map(|s| s.to_string()).collect();

        let once = filter_sales(&snap.sales.records, &spec);
        let twice = filter_sales(once.iter().copied(), &spec);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);

        let once = filter_customers(&snap.customers.records, &spec);
        let twice = filter_customers(once.iter().copied(), &spec);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn fulfilment_must_match_exactly() {
        let snap = snapshot();
        let mut spec = FilterSpec::select_all(&snap);
        spec.fulfilment = "Merchant".into();
        assert!(filter_sales(&snap.sales.records, &spec).is_empty());
        spec.fulfilment = "amazon".into();
        assert!(filter_sales(&snap.sales.records, &spec).is_empty());
    }

    #[test]
    fn empty_or_unknown_selection_yields_empty_result() {
        let snap = snapshot();
        let mut spec = FilterSpec::select_all(&snap);
        spec.categories.clear();
        spec.countries = ["Atlantis"].iter().map(|s| s.to_string()).collect();
        assert!(filter_sales(&snap.sales.records, &spec).is_empty());
        assert!(filter_customers(&snap.customers.records, &spec).is_empty());
    }
}
