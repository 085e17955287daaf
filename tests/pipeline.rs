use std::path::PathBuf;

use sales_dashboard::{Dashboard, Report, SnapshotCache, View};
use tempfile::TempDir;

const SALES: &str = "\
index,Order ID,Date,Status,Fulfilment,Sales Channel,Category,Size,Qty,currency,Amount,SKU,ship-country,fulfilled-by
0,405-8078784-5731545,04-30-22,Cancelled,Merchant,Amazon.in,Set,S,0,INR,647.62,SET389-KR-NP-S,IN,Easy Ship
1,171-9198151-1101146,04-30-22,Shipped,Merchant,Amazon.in,kurta,3XL,1,INR,406,JNE3781-KR-XXXL,IN,Easy Ship
2,404-0687676-7273146,04-30-22,Shipped,Amazon,Amazon.in,kurta,XL,1,INR,329,JNE3371-KR-XL,IN,
3,403-9615377-8133951,04-30-22,Cancelled,Merchant,Amazon.in,Western Dress,L,0,,,J0341-DR-L,IN,Easy Ship
4,407-1069790-7240320,06-15-22,Shipped,Amazon,Amazon.in,Top,3XL,1,INR,574,JNE3671-TU-XXXL,IN,
5,404-1490984-4578765,06-01-22,Shipped,Amazon,Amazon.in,Set,XL,2,INR,824,SET264-KR-NP-XL,IN,
6,408-5748499-6859555,not-a-date,Shipped,Amazon,Amazon.in,kurta,XXL,1,INR,653,JNE3371-KR-XL,IN,
";

const RETAIL: &str = "\
InvoiceNo,StockCode,Description,Quantity,InvoiceDate,UnitPrice,CustomerID,Country
536365,JNE3371-KR-XL,KURTA,6,12/1/2010 8:26,2.55,17850,United Kingdom
536366,JNE3371-KR-XL,KURTA,6,12/1/2010 8:28,1.85,17850,United Kingdom
536367,SET264-KR-NP-XL,SET,32,12/1/2010 8:34,1.69,13047,France
536368,85123A,HEART,8,12/1/2010 8:34,2.75,,Germany
536369,SET389-KR-NP-S,SET,4,12/1/2010 8:35,3.39,12583,France
";

fn sources(dir: &TempDir) -> (PathBuf, PathBuf) {
    let sales = dir.path().join("Amazon Sale Report.csv");
    let retail = dir.path().join("online_retail.csv");
    std::fs::write(&sales, SALES).unwrap();
    std::fs::write(&retail, RETAIL).unwrap();
    (sales, retail)
}

#[test]
fn sales_view_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (sales, retail) = sources(&dir);
    let cache = SnapshotCache::new();
    let dashboard = Dashboard::new(cache.load(&sales, &retail).unwrap());

    let snapshot = dashboard.snapshot();
    assert_eq!(snapshot.sales.len(), 7);
    assert_eq!(snapshot.sales.categories.len(), 4);

    let spec = dashboard.default_selection();
    assert_eq!(spec.fulfilment, "Amazon");

    let Report::Sales(report) = dashboard.report(View::Sales, &spec) else {
        panic!("expected a sales report");
    };
    assert_eq!(report.row_count, 4);
    assert_eq!(report.metrics.amount.total, 329.0 + 574.0 + 824.0 + 653.0);
    assert_eq!(report.metrics.units, 5);
    assert_eq!(report.monthly.skipped_rows, 1);

    let months: Vec<String> = report.monthly.buckets.iter().map(|b| b.label()).collect();
    assert_eq!(months, ["2022-04", "2022-06"]);
    assert_eq!(report.monthly.buckets[1].sum, 574.0 + 824.0);
}

#[test]
fn merchant_view_keeps_missing_amounts_out_of_the_mean() {
    let dir = TempDir::new().unwrap();
    let (sales, retail) = sources(&dir);
    let cache = SnapshotCache::new();
    let dashboard = Dashboard::new(cache.load(&sales, &retail).unwrap());

    let mut spec = dashboard.default_selection();
    spec.fulfilment = "Merchant".to_string();
    let report = dashboard.sales_report(&spec);

    assert_eq!(report.row_count, 3);
    assert_eq!(report.metrics.amount.count, 2);
    assert_eq!(report.metrics.rows, 3);
    assert_eq!(report.metrics.amount.mean, Some((647.62 + 406.0) / 2.0));
    // The blank cell of the mixed-type column survives as text.
    assert_eq!(report.rows[0].extra["fulfilled-by"], "Easy Ship");
    assert_eq!(report.rows[2].extra["currency"], "");
}

#[test]
fn customers_view_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (sales, retail) = sources(&dir);
    let cache = SnapshotCache::new();
    let dashboard = Dashboard::new(cache.load(&sales, &retail).unwrap());

    let mut spec = dashboard.default_selection();
    let report = dashboard.customers_report(&spec);
    assert_eq!(report.metrics.distinct_customers, 3);
    assert_eq!(report.metrics.top_country.as_deref(), Some("France"));
    assert_eq!(report.metrics.total_quantity, 56);
    assert_eq!(report.customers_by_country["Germany"], 0);

    // JNE3371-KR-XL: 2 sales rows (qty 1 each) × 2 UK rows.
    let grouped = &report.quantity_by_country_category;
    assert_eq!(grouped.get("United Kingdom", "kurta"), Some(4));
    assert_eq!(grouped.get("France", "Set"), Some(2));
    assert_eq!(grouped.get("Germany", "Set"), None);

    spec.countries = ["France".to_string()].into_iter().collect();
    let report = dashboard.customers_report(&spec);
    assert_eq!(report.row_count, 2);
    assert_eq!(report.quantity_by_country_category.len(), 1);
    assert_eq!(report.metrics.total_quantity, 36);
}

#[test]
fn repeated_loads_are_equal_in_content() {
    let dir = TempDir::new().unwrap();
    let (sales, retail) = sources(&dir);
    let cache = SnapshotCache::new();

    let first = cache.load(&sales, &retail).unwrap();
    let second = cache.load(&sales, &retail).unwrap();
    assert_eq!(first, second);

    let fresh = SnapshotCache::new().load(&sales, &retail).unwrap();
    assert_eq!(*first, *fresh);
}

#[test]
fn unknown_selection_values_match_nothing() {
    let dir = TempDir::new().unwrap();
    let (sales, retail) = sources(&dir);
    let dashboard = Dashboard::new(SnapshotCache::new().load(&sales, &retail).unwrap());

    let mut spec = dashboard.default_selection();
    spec.fulfilment = "Drone".to_string();
    spec.countries = ["Atlantis".to_string()].into_iter().collect();

    let sales = dashboard.sales_report(&spec);
    assert_eq!(sales.row_count, 0);
    assert_eq!(sales.metrics.amount.mean, None);

    let customers = dashboard.customers_report(&spec);
    assert_eq!(customers.row_count, 0);
    assert!(customers.quantity_by_country_category.is_empty());
}
