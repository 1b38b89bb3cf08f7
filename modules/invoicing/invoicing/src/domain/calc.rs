//! Pure arithmetic for the invoice write path.
//!
//! Both storage backends call these helpers so the stored total and date
//! cannot drift between them.

use chrono::{DateTime, NaiveDate, Utc};
use invoicing_sdk::models::NewInvoiceItem;
use rust_decimal::Decimal;

/// Exact decimal total over all lines: the sum of `price * quantity`.
///
/// Money is never summed in binary floating point; `0.10 * 3` is exactly
/// `0.30` here.
#[must_use]
pub fn invoice_total(items: &[NewInvoiceItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}

/// The UTC calendar date of `timestamp`.
///
/// UTC is the fixed reference zone: the same instant maps to the same
/// stored date regardless of where the process runs.
#[must_use]
pub fn invoice_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::prelude::FromPrimitive;

    use super::*;

    fn item(price: Decimal, quantity: i32) -> NewInvoiceItem {
        NewInvoiceItem {
            product_name: "test".to_owned(),
            price,
            quantity,
        }
    }

    #[test]
    fn total_sums_fractional_cents_exactly() {
        // 3 x 0.10 each, quantity 3: binary floats would give 0.899999...
        let items = vec![
            item(Decimal::new(10, 2), 3),
            item(Decimal::new(10, 2), 3),
            item(Decimal::new(10, 2), 3),
        ];
        assert_eq!(invoice_total(&items), Decimal::new(90, 2));
    }

    #[test]
    fn total_multiplies_price_by_quantity() {
        let items = vec![item(Decimal::new(1250, 2), 2)];
        assert_eq!(invoice_total(&items), Decimal::new(2500, 2));
    }

    #[test]
    fn total_of_no_items_is_zero() {
        assert_eq!(invoice_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_accepts_prices_arriving_from_binary_floats() {
        // The REST layer converts incoming doubles with `from_f64`, which
        // picks the shortest round-trippable decimal: 0.1f64 becomes 0.1.
        let price = Decimal::from_f64(0.1).unwrap();
        let items = vec![item(price, 3)];
        assert_eq!(invoice_total(&items), Decimal::new(3, 1));
    }

    #[test]
    fn date_is_taken_in_utc() {
        // 23:30 UTC stays on the 7th even though many local zones would
        // already be on the 8th.
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 23, 30, 0).unwrap();
        assert_eq!(
            invoice_date(ts),
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
        );
    }

    #[test]
    fn midnight_boundary_maps_to_the_new_day() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap();
        assert_eq!(
            invoice_date(ts),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
        );
    }
}
