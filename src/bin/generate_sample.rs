use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

#[derive(Serialize)]
struct SaleRow {
    #[serde(rename = "Order ID")]
    order_id: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "Fulfilment")]
    fulfilment: &'static str,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Qty")]
    qty: i64,
    #[serde(rename = "Amount")]
    amount: Option<f64>,
    #[serde(rename = "SKU")]
    sku: String,
    /// Mostly text with the occasional number, as in the real export.
    #[serde(rename = "fulfilled-by")]
    fulfilled_by: String,
}

#[derive(Serialize)]
struct RetailRow {
    #[serde(rename = "InvoiceNo")]
    invoice_no: u64,
    #[serde(rename = "StockCode")]
    stock_code: String,
    #[serde(rename = "Quantity")]
    quantity: i64,
    #[serde(rename = "InvoiceDate")]
    invoice_date: String,
    #[serde(rename = "UnitPrice")]
    unit_price: f64,
    #[serde(rename = "CustomerID")]
    customer_id: Option<u32>,
    #[serde(rename = "Country")]
    country: &'static str,
}

const CATEGORIES: &[&str] = &["Set", "kurta", "Western Dress", "Top", "Ethnic Dress"];
const FULFILMENT: &[&str] = &["Amazon", "Merchant"];
const STATUSES: &[&str] = &["Shipped", "Shipped - Delivered to Buyer", "Cancelled", "Pending"];
const COUNTRIES: &[&str] = &[
    "United Kingdom",
    "France",
    "Germany",
    "EIRE",
    "Spain",
    "Netherlands",
];

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut rng = SimpleRng::new(42);

    let skus: Vec<String> = (0..40).map(|i| format!("SKU{:04}", 100 + i)).collect();
    // April through June, skipping May, so the monthly series has a gap.
    let start = NaiveDate::from_ymd_opt(2022, 4, 1).context("invalid start date")?;
    let days: Vec<NaiveDate> = (0..91)
        .map(|d| start + Duration::days(d))
        .filter(|d| d.month() != 5)
        .collect();

    let sales_path = out_dir.join("sample_sales.csv");
    let mut sales = csv::Writer::from_path(&sales_path)
        .with_context(|| format!("creating {}", sales_path.display()))?;
    let n_sales = 2000;
    for i in 0..n_sales {
        let status = *rng.pick(STATUSES);
        let qty = if status == "Cancelled" { 0 } else { 1 + rng.below(3) as i64 };
        let amount = if status == "Cancelled" && rng.next_f64() < 0.5 {
            None
        } else {
            Some(((200.0 + rng.next_f64() * 1200.0) * 100.0).round() / 100.0)
        };
        let fulfilled_by = if rng.next_f64() < 0.1 {
            format!("{}", rng.below(1000))
        } else {
            "Easy Ship".to_string()
        };
        sales.serialize(SaleRow {
            order_id: format!("405-{:07}", i),
            date: rng.pick(&days).format("%m-%d-%y").to_string(),
            status,
            fulfilment: *rng.pick(FULFILMENT),
            category: *rng.pick(CATEGORIES),
            qty,
            amount,
            sku: rng.pick(&skus).clone(),
            fulfilled_by,
        })?;
    }
    sales.flush()?;

    let retail_path = out_dir.join("sample_retail.csv");
    let mut retail = csv::Writer::from_path(&retail_path)
        .with_context(|| format!("creating {}", retail_path.display()))?;
    let n_retail = 1500;
    for i in 0..n_retail {
        // A quarter of stock codes never appear in the sales log.
        let stock_code = if rng.next_f64() < 0.25 {
            format!("{}", 84000 + rng.below(500))
        } else {
            rng.pick(&skus).clone()
        };
        let customer_id = if rng.next_f64() < 0.15 {
            None
        } else {
            Some(12000 + rng.below(300) as u32)
        };
        let quantity = if rng.next_f64() < 0.05 {
            -(1 + rng.below(5) as i64)
        } else {
            1 + rng.below(24) as i64
        };
        retail.serialize(RetailRow {
            invoice_no: 536365 + i / 4,
            stock_code,
            quantity,
            invoice_date: format!(
                "{} {}:{:02}",
                rng.pick(&days).format("%-m/%-d/%Y"),
                8 + rng.below(10),
                rng.below(60)
            ),
            unit_price: ((0.5 + rng.next_f64() * 10.0) * 100.0).round() / 100.0,
            customer_id,
            country: *rng.pick(COUNTRIES),
        })?;
    }
    retail.flush()?;

    println!(
        "Wrote {n_sales} sales rows to {} and {n_retail} retail rows to {}",
        sales_path.display(),
        retail_path.display()
    );
    Ok(())
}
