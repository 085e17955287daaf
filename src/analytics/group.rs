use std::collections::{BTreeMap, BTreeSet};

use serde::ser::{Serialize, Serializer};

use super::join::JoinedRecord;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub country: String,
    pub category: String,
}

/// Summed quantity per `(country, category)`. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedResult {
    totals: BTreeMap<GroupKey, i64>,
}

impl GroupedResult {
    pub fn get(&self, country: &str, category: &str) -> Option<i64> {
        self.totals
            .get(&GroupKey {
                country: country.to_string(),
                category: category.to_string(),
            })
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, i64)> {
        self.totals.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

#[derive(serde::Serialize)]
struct GroupRow<'a> {
    country: &'a str,
    category: &'a str,
    quantity: i64,
}

/// Serialized as a flat list of `{country, category, quantity}` rows,
/// since JSON object keys cannot be pairs.
impl Serialize for GroupedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.totals.iter().map(|(k, &quantity)| GroupRow {
            country: &k.country,
            category: &k.category,
            quantity,
        }))
    }
}

/// Group joined rows by `(country, category)` summing the sales quantity,
/// then keep only groups whose country is selected.
///
/// The country restriction runs after grouping, on the full join; no row
/// predicate is applied beforehand.
pub fn group_by_country_category(
    joined: &[JoinedRecord<'_>],
    countries: &BTreeSet<String>,
) -> GroupedResult {
    let mut totals: BTreeMap<GroupKey, i64> = BTreeMap::new();
    for row in joined {
        let key = GroupKey {
            country: row.country().to_string(),
            category: row.category().to_string(),
        };
        *totals.entry(key).or_default() += row.quantity();
    }

    totals.retain(|key, _| countries.contains(&key.country));
    GroupedResult { totals }
}
