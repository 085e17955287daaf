use std::collections::HashMap;

use crate::data::model::{CustomerRecord, SalesRecord};

/// One matched `(sale, customer)` pair; carries every field of both rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedRecord<'a> {
    pub sale: &'a SalesRecord,
    pub customer: &'a CustomerRecord,
}

impl<'a> JoinedRecord<'a> {
    pub fn country(&self) -> &'a str {
        &self.customer.country
    }

    pub fn category(&self) -> &'a str {
        &self.sale.category
    }

    /// The sales-side `Qty`.
    pub fn quantity(&self) -> i64 {
        self.sale.quantity
    }
}

/// Inner equality join on `sales.sku == customers.stock_code`.
///
/// Multiplicity: a key appearing `k` times in sales and `m` times in
/// customers yields `k × m` rows; unmatched keys yield none.
/// Ordering: sales rows in input order, and for each of them the matching
/// customer rows in input order.
pub fn inner_join<'a, S, C>(sales: S, customers: C) -> Vec<JoinedRecord<'a>>
where
    S: IntoIterator<Item = &'a SalesRecord>,
    C: IntoIterator<Item = &'a CustomerRecord>,
{
    let mut by_stock_code: HashMap<&'a str, Vec<&'a CustomerRecord>> = HashMap::new();
    for customer in customers {
        by_stock_code
            .entry(customer.stock_code.as_str())
            .or_default()
            .push(customer);
    }

    let mut joined = Vec::new();
    for sale in sales {
        if let Some(matches) = by_stock_code.get(sale.sku.as_str()) {
            joined.extend(matches.iter().map(|&customer| JoinedRecord { sale, customer }));
        }
    }
    log::debug!("inner join produced {} rows", joined.len());
    joined
}
