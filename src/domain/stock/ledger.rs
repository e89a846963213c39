use std::collections::HashMap;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockTransactionType {
    Incoming,
    OutgoingOrder,
    Adjustment,
}

impl StockTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockTransactionType::Incoming => "INCOMING",
            StockTransactionType::OutgoingOrder => "OUTGOING_ORDER",
            StockTransactionType::Adjustment => "ADJUSTMENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INCOMING" => Some(StockTransactionType::Incoming),
            "OUTGOING_ORDER" => Some(StockTransactionType::OutgoingOrder),
            "ADJUSTMENT" => Some(StockTransactionType::Adjustment),
            _ => None,
        }
    }
}

/// One row of the append-only stock ledger. `quantity` is signed; the
/// current stock of a product is the sum over all of its rows.
#[derive(Debug, Clone)]
pub struct StockTransaction {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub tx_type: StockTransactionType,
    pub reference_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortage {
    pub product_id: Uuid,
    pub available: i64,
    pub requested: i64,
}

/// Compares requested quantities against available stock and returns one
/// shortage per under-stocked product, in first-request order. Requests for
/// the same product are summed before the comparison, so a basket cannot
/// pass the check line by line while overdrawing in aggregate. Products
/// absent from `available` count as zero stock.
pub fn find_shortages(
    available: &HashMap<Uuid, i64>,
    requested: &[(Uuid, i32)],
) -> Vec<StockShortage> {
    let mut totals: Vec<(Uuid, i64)> = Vec::new();
    for (product_id, quantity) in requested {
        match totals.iter_mut().find(|(id, _)| id == product_id) {
            Some((_, total)) => *total += i64::from(*quantity),
            None => totals.push((*product_id, i64::from(*quantity))),
        }
    }

    totals
        .into_iter()
        .filter_map(|(product_id, requested)| {
            let available = available.get(&product_id).copied().unwrap_or(0);
            (available < requested).then_some(StockShortage {
                product_id,
                available,
                requested,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn availability(entries: &[(Uuid, i64)]) -> HashMap<Uuid, i64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn no_shortage_when_stock_covers_every_line() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let shortages = find_shortages(&availability(&[(a, 10), (b, 5)]), &[(a, 2), (b, 5)]);
        assert!(shortages.is_empty());
    }

    #[test]
    fn reports_every_under_stocked_product_not_just_the_first() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let shortages = find_shortages(
            &availability(&[(a, 1), (b, 100), (c, 0)]),
            &[(a, 2), (b, 3), (c, 4)],
        );
        assert_eq!(shortages.len(), 2);
        assert_eq!(shortages[0].product_id, a);
        assert_eq!(shortages[0].available, 1);
        assert_eq!(shortages[0].requested, 2);
        assert_eq!(shortages[1].product_id, c);
        assert_eq!(shortages[1].available, 0);
        assert_eq!(shortages[1].requested, 4);
    }

    #[test]
    fn duplicate_lines_are_checked_in_aggregate() {
        // 3 + 4 exceeds the available 5 even though each line alone fits.
        let a = Uuid::new_v4();
        let shortages = find_shortages(&availability(&[(a, 5)]), &[(a, 3), (a, 4)]);
        assert_eq!(
            shortages,
            vec![StockShortage {
                product_id: a,
                available: 5,
                requested: 7,
            }]
        );
    }

    #[test]
    fn unknown_product_counts_as_zero_stock() {
        let a = Uuid::new_v4();
        let shortages = find_shortages(&HashMap::new(), &[(a, 1)]);
        assert_eq!(shortages.len(), 1);
        assert_eq!(shortages[0].available, 0);
    }

    #[test]
    fn exact_fit_is_not_a_shortage() {
        let a = Uuid::new_v4();
        let shortages = find_shortages(&availability(&[(a, 4)]), &[(a, 4)]);
        assert!(shortages.is_empty());
    }

    #[test]
    fn transaction_type_round_trips_through_db_strings() {
        for tx_type in [
            StockTransactionType::Incoming,
            StockTransactionType::OutgoingOrder,
            StockTransactionType::Adjustment,
        ] {
            assert_eq!(StockTransactionType::parse(tx_type.as_str()), Some(tx_type));
        }
        assert_eq!(StockTransactionType::parse("OUTGOING"), None);
    }
}
