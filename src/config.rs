use std::path::PathBuf;

use clap::Parser;

use crate::dashboard::{Dashboard, View};
use crate::data::filter::FilterSpec;

/// Command-line configuration for the dashboard binary.
#[derive(Debug, Clone, Parser)]
#[command(about = "Compute the sales or customers dashboard view and print it as JSON.")]
pub struct DashboardConfig {
    /// Order-level sales source (.csv, .json or .parquet).
    #[arg(long, value_name = "PATH", default_value = "Amazon Sale Report.csv")]
    pub sales: PathBuf,

    /// Retail transaction source (.csv, .json or .parquet).
    #[arg(long, value_name = "PATH", default_value = "online_retail.csv")]
    pub customers: PathBuf,

    #[arg(long, value_enum, default_value_t = View::Sales)]
    pub view: View,

    /// Category to include (repeatable). Defaults to every category.
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Fulfilment method. Defaults to the first one in sorted order.
    #[arg(long)]
    pub fulfilment: Option<String>,

    /// Country to include (repeatable). Defaults to every country.
    #[arg(long = "country")]
    pub countries: Vec<String>,

    /// Maximum number of record rows to include in the output.
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

impl DashboardConfig {
    /// Overlay the explicit selections on the dashboard defaults. Values
    /// unknown to the data are kept and simply match nothing.
    pub fn selection(&self, dashboard: &Dashboard) -> FilterSpec {
        let mut spec = dashboard.default_selection();
        if !self.categories.is_empty() {
            spec.categories = self.categories.iter().cloned().collect();
        }
        if let Some(f) = &self.fulfilment {
            spec.fulfilment = f.clone();
        }
        if !self.countries.is_empty() {
            spec.countries = self.countries.iter().cloned().collect();
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::model::fixtures::{customer, sale};
    use crate::data::model::{CustomerTable, SalesTable, Snapshot};

    fn dashboard() -> Dashboard {
        Dashboard::new(Arc::new(Snapshot {
            sales: SalesTable::from_records(vec![
                sale("01-05-22", "Set", "Merchant", 5.0, 1, "A"),
                sale("01-05-22", "Top", "Amazon", 5.0, 1, "A"),
            ]),
            customers: CustomerTable::from_records(vec![
                customer(Some("1"), "UK", "A", 2.0, 10),
                customer(Some("2"), "France", "A", 2.0, 10),
            ]),
        }))
    }

    #[test]
    fn defaults_select_everything() {
        let config = DashboardConfig::parse_from(["sales-dashboard"]);
        assert_eq!(config.view, View::Sales);
        assert_eq!(config.sales, PathBuf::from("Amazon Sale Report.csv"));

        let dash = dashboard();
        let spec = config.selection(&dash);
        assert_eq!(spec, dash.default_selection());
        assert_eq!(spec.fulfilment, "Amazon");
    }

    #[test]
    fn explicit_selection_overrides_defaults() {
        let config = DashboardConfig::parse_from([
            "sales-dashboard",
            "--view",
            "customers",
            "--category",
            "Set",
            "--category",
            "Gown",
            "--fulfilment",
            "Merchant",
            "--country",
            "UK",
            "--rows",
            "5",
        ]);
        assert_eq!(config.view, View::Customers);
        assert_eq!(config.rows, Some(5));

        let spec = config.selection(&dashboard());
        assert_eq!(spec.categories.len(), 2);
        assert!(spec.categories.contains("Gown"));
        assert_eq!(spec.fulfilment, "Merchant");
        assert_eq!(spec.countries.iter().collect::<Vec<_>>(), ["UK"]);
    }
}
