/// Analytics over filtered or raw snapshots. Every function borrows its
/// input and returns a freshly derived structure.
///
/// ```text
///   filtered sales ──► metrics   (total / mean / count, units)
///          │
///          └───────► resample  (monthly sums, ascending)
///
///   raw sales + raw customers ──► join ──► group (country × category)
/// ```

pub mod group;
pub mod join;
pub mod metrics;
pub mod resample;
