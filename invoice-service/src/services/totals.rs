//! Line-item totaling.
//!
//! All money math runs on `rust_decimal::Decimal`; the caller-facing API and
//! the store both receive the exact values computed here, so subtotal and
//! grand total can never drift apart from the item set.

use rust_decimal::Decimal;

/// Derived totals for one invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTotals {
    /// Sum of `quantity × price` over all items.
    pub subtotal: Decimal,
    /// `subtotal + tax - discount`. May be negative when the discount
    /// exceeds subtotal plus tax; no clamping is applied.
    pub total: Decimal,
    /// Per-item `quantity × price`, in input order.
    pub line_totals: Vec<Decimal>,
}

/// Amount for a single line: `quantity × price`.
///
/// `None` when the product does not fit in a `Decimal`.
pub fn line_total(quantity: i32, price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(price)
}

/// Compute subtotal and grand total for an ordered item sequence.
///
/// All arithmetic is checked; `None` means some intermediate value overflowed
/// and the input must be rejected. An empty sequence yields a zero subtotal;
/// rejecting empty item sets is the caller's job, not this function's.
pub fn compute_totals(
    items: &[(i32, Decimal)],
    tax: Decimal,
    discount: Decimal,
) -> Option<InvoiceTotals> {
    let mut line_totals = Vec::with_capacity(items.len());
    let mut subtotal = Decimal::ZERO;
    for &(quantity, price) in items {
        let amount = line_total(quantity, price)?;
        subtotal = subtotal.checked_add(amount)?;
        line_totals.push(amount);
    }
    let total = subtotal.checked_add(tax)?.checked_sub(discount)?;

    Some(InvoiceTotals {
        subtotal,
        total,
        line_totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn design_and_hosting_scenario() {
        // 2×50 + 1×20, tax 10, discount 5 => subtotal 120, total 125.
        let totals = compute_totals(&[(2, dec!(50)), (1, dec!(20))], dec!(10), dec!(5)).unwrap();
        assert_eq!(totals.subtotal, dec!(120));
        assert_eq!(totals.total, dec!(125));
        assert_eq!(totals.line_totals, vec![dec!(100), dec!(20)]);
    }

    #[test]
    fn subtotal_is_order_independent() {
        let items = [(3, dec!(19.99)), (1, dec!(250)), (7, dec!(0.35))];
        let reversed: Vec<_> = items.iter().rev().copied().collect();
        let a = compute_totals(&items, Decimal::ZERO, Decimal::ZERO).unwrap();
        let b = compute_totals(&reversed, Decimal::ZERO, Decimal::ZERO).unwrap();
        assert_eq!(a.subtotal, b.subtotal);
        assert_eq!(a.total, b.total);
    }

    #[test]
    fn discount_may_push_total_negative() {
        let totals = compute_totals(&[(1, dec!(10))], dec!(2), dec!(20)).unwrap();
        assert_eq!(totals.subtotal, dec!(10));
        assert_eq!(totals.total, dec!(-8));
    }

    #[test]
    fn empty_items_yield_zero_subtotal() {
        let totals = compute_totals(&[], dec!(5), dec!(1)).unwrap();
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.total, dec!(4));
    }

    #[test]
    fn decimal_math_does_not_drift() {
        // 0.1 + 0.2 style inputs stay exact with Decimal.
        let totals =
            compute_totals(&[(3, dec!(0.10)), (1, dec!(0.20))], Decimal::ZERO, Decimal::ZERO)
                .unwrap();
        assert_eq!(totals.subtotal, dec!(0.50));
    }

    #[test]
    fn line_overflow_is_reported_not_panicked() {
        assert_eq!(line_total(2, Decimal::MAX), None);
        assert_eq!(
            compute_totals(&[(2, Decimal::MAX)], Decimal::ZERO, Decimal::ZERO),
            None
        );
    }

    #[test]
    fn subtotal_and_tax_overflow_are_reported() {
        // Two maximal lines overflow the running subtotal.
        assert_eq!(
            compute_totals(
                &[(1, Decimal::MAX), (1, Decimal::MAX)],
                Decimal::ZERO,
                Decimal::ZERO
            ),
            None
        );
        // A maximal tax on a maximal subtotal overflows the grand total.
        assert_eq!(
            compute_totals(&[(1, Decimal::MAX)], Decimal::MAX, Decimal::ZERO),
            None
        );
    }
}
