/// Data layer: typed records, loading, and filtering.
///
/// Architecture:
/// ```text
///  sales .csv / .json / .parquet     retail .csv / .json / .parquet
///        │                                  │
///        ▼                                  ▼
///   ┌──────────┐
///   │  loader   │  parse + validate once → SalesTable, CustomerTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Snapshot  │  immutable tables + distinct selection values
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSpec → borrowed row views
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
