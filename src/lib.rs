//! Analytics core for a two-table sales dashboard.
//!
//! An order-level sales log and a retail transaction log are loaded once
//! into an immutable [`Snapshot`](data::model::Snapshot). Each request then
//! picks a [`View`](dashboard::View) and a
//! [`FilterSpec`](data::filter::FilterSpec) and gets back a serializable
//! report: filtered rows, scalar metrics, a monthly series, or the
//! country × category totals of the sales/customer join.

pub mod analytics;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod data;

pub use cache::SnapshotCache;
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, Report, View};
pub use data::filter::FilterSpec;
