//! Money calculation utilities using rust_decimal for precision
//!
//! All pricing arithmetic is done in `Decimal` internally, then
//! converted to `f64` for storage/serialization.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
pub const MAX_QUANTITY: i64 = 9999;

/// Convert an f64 to Decimal, falling back to zero on non-finite input
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert a Decimal back to f64, rounded to 2 decimal places half-up
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Line total: unit price × quantity
pub fn line_total(price: f64, quantity: i64) -> Decimal {
    to_decimal(price) * Decimal::from(quantity)
}

/// Compute order totals over (price, quantity) pairs.
///
/// Returns `(total_amount, total_items)` with the amount rounded to
/// 2 decimal places.
pub fn order_totals<I>(items: I) -> (f64, i64)
where
    I: IntoIterator<Item = (f64, i64)>,
{
    let mut amount = Decimal::ZERO;
    let mut count: i64 = 0;
    for (price, quantity) in items {
        amount += line_total(price, quantity);
        count += quantity;
    }
    (to_f64(amount), count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let a = 0.1_f64;
        let b = 0.2_f64;
        let sum_f64 = a + b;

        // f64 fails
        assert_ne!(sum_f64, 0.3);

        // Decimal succeeds
        let sum_dec = to_decimal(a) + to_decimal(b);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        // Sum 0.01 one thousand times
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(to_f64(line_total(10.99, 3)), 32.97);
    }

    #[test]
    fn test_order_totals() {
        let (amount, count) = order_totals(vec![(5.0, 2), (1.5, 3)]);
        assert_eq!(amount, 14.5);
        assert_eq!(count, 5);
    }

    #[test]
    fn test_order_totals_empty() {
        let (amount, count) = order_totals(Vec::<(f64, i64)>::new());
        assert_eq!(amount, 0.0);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_rounding_half_up() {
        // 33.33% of 100 = 33.335 rounds away from zero
        let value = Decimal::new(33335, 3); // 33.335
        assert_eq!(to_f64(value), 33.34);
        assert_eq!(to_f64(Decimal::new(33334, 3)), 33.33);
    }
}
