//! # Order Module
//!
//! The checkout aggregate and its line items.
//!
//! ## Add Item Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_order_item(product, units)                                         │
//! │       │                                                                 │
//! │       ├── units < 1? ──────────────► Err(MustBePositive), no change     │
//! │       │                                                                 │
//! │       ├── line for product.id() exists?                                 │
//! │       │        └── yes ──► line.add_units(units)                        │
//! │       │                                                                 │
//! │       └── no ──► factory.create(product.id())                           │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │                 ProductOrder::new(.., strategy, units) ──► items.push   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Freezing
//! A line captures the product's unit price and its pricing strategy when it
//! is created. Adding more of the same product later only bumps the unit
//! count; a rule that appears in the repository after the first unit was
//! scanned does not change that line.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::{regular_total, total_overflow, PricingStrategy, PricingStrategyFactory};
use crate::rules::VolumePricingRulesRepository;
use crate::types::{LineId, OrderId, Product, ProductId};
use crate::validation::{validate_price, validate_units, ValidationResult};

// =============================================================================
// Product Order (line item)
// =============================================================================

/// One product's entry in an order.
///
/// ## Invariants
/// - `units >= 1`, and only ever grows
/// - `unit_price >= 0`
/// - the strategy never changes after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductOrder {
    id: LineId,
    product_id: ProductId,
    unit_price: Money,
    units: i64,
    strategy: PricingStrategy,
}

impl ProductOrder {
    /// Creates a line item.
    ///
    /// ## Errors
    /// - `MustBePositive { field: "units" }` when `units < 1`
    /// - `Negative { field: "unit_price" }` when `unit_price < 0`
    pub fn new(
        id: LineId,
        product_id: ProductId,
        unit_price: Money,
        strategy: PricingStrategy,
        units: i64,
    ) -> ValidationResult<Self> {
        validate_units("units", units)?;
        validate_price("unit_price", unit_price)?;

        Ok(ProductOrder {
            id,
            product_id,
            unit_price,
            units,
            strategy,
        })
    }

    /// Creates a line item holding a single unit.
    pub fn single(
        id: LineId,
        product_id: ProductId,
        unit_price: Money,
        strategy: PricingStrategy,
    ) -> ValidationResult<Self> {
        ProductOrder::new(id, product_id, unit_price, strategy, 1)
    }

    /// Adds `units` to this line.
    ///
    /// ## Errors
    /// - `MustBePositive { field: "units" }` when `units < 1`
    /// - `Overflow { field: "units" }` when the new count would not fit
    ///
    /// The count is left untouched on error.
    pub fn add_units(&mut self, units: i64) -> ValidationResult<()> {
        validate_units("units", units)?;
        self.units = self
            .units
            .checked_add(units)
            .ok_or_else(|| ValidationError::Overflow {
                field: "units".to_string(),
            })?;
        Ok(())
    }

    #[inline]
    pub fn id(&self) -> LineId {
        self.id
    }

    #[inline]
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    #[inline]
    pub fn units(&self) -> i64 {
        self.units
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    #[inline]
    pub fn strategy(&self) -> &PricingStrategy {
        &self.strategy
    }

    /// The line total under its bound strategy.
    ///
    /// Worked out from the current unit count on every call.
    ///
    /// ## Errors
    /// - `Overflow { field: "total_price" }` when the total leaves the range
    ///   of `Money`
    pub fn total_price(&self) -> ValidationResult<Money> {
        self.strategy.compute_total(self.units, self.unit_price)
    }

    /// What the line would cost with no discount.
    pub fn regular_price(&self) -> ValidationResult<Money> {
        regular_total(self.units, self.unit_price)
    }
}

// =============================================================================
// Check Out Order
// =============================================================================

/// An order at the till.
///
/// ## Invariants
/// - At most one line per product id (adding a product twice merges)
/// - Lines keep insertion order
///
/// ## Usage
/// ```rust
/// use tally_core::{CheckOutOrder, Money, NoVolumeRules, PricingStrategyFactory, Product};
/// use uuid::Uuid;
///
/// let factory = PricingStrategyFactory::new(NoVolumeRules);
/// let mut order = CheckOutOrder::new(Uuid::new_v4(), factory);
/// let product_c = Product::new(Uuid::new_v4(), "C", Money::from_cents(70)).unwrap();
///
/// order.add_order_item(&product_c, 3).unwrap();
/// assert_eq!(order.total_price(), Ok(Money::from_cents(210)));
/// ```
#[derive(Debug, Clone)]
pub struct CheckOutOrder<R> {
    id: OrderId,
    items: Vec<ProductOrder>,
    factory: PricingStrategyFactory<R>,
    created_at: DateTime<Utc>,
}

impl<R: VolumePricingRulesRepository> CheckOutOrder<R> {
    /// Creates an empty order that resolves strategies through `factory`.
    pub fn new(id: OrderId, factory: PricingStrategyFactory<R>) -> Self {
        CheckOutOrder {
            id,
            items: Vec::new(),
            factory,
            created_at: Utc::now(),
        }
    }

    /// Adds `units` of `product`, merging into its existing line if present.
    ///
    /// ## Errors
    /// - `MustBePositive { field: "units" }` when `units < 1`; the order is
    ///   left exactly as it was and no rule lookup happens
    /// - `Overflow { field: "units" }` when the merged count would not fit in
    ///   an `i64`; the existing line keeps its count
    pub fn add_order_item(&mut self, product: &Product, units: i64) -> ValidationResult<()> {
        validate_units("units", units)?;

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id() == product.id())
        {
            line.add_units(units)?;
            debug!(
                order_id = %self.id,
                product_id = %product.id(),
                added = units,
                units = line.units(),
                "Merged units into existing line"
            );
            return Ok(());
        }

        let strategy = self.factory.create(product.id());
        let line = ProductOrder::new(
            Uuid::new_v4(),
            product.id(),
            product.unit_price(),
            strategy,
            units,
        )?;

        debug!(
            order_id = %self.id,
            product_id = %product.id(),
            units,
            volume = strategy.is_volume(),
            "Added new line"
        );
        self.items.push(line);
        Ok(())
    }

    /// Adds a single unit of `product`.
    pub fn add_product(&mut self, product: &Product) -> ValidationResult<()> {
        self.add_order_item(product, 1)
    }

    /// Sum of every line total. Zero for an empty order.
    ///
    /// ## Errors
    /// - `Overflow { field: "total_price" }` when a line total or the sum
    ///   leaves the range of `Money`
    pub fn total_price(&self) -> ValidationResult<Money> {
        sum_lines(&self.items, ProductOrder::total_price)
    }

    /// Sum of every line at its undiscounted price.
    pub fn regular_subtotal(&self) -> ValidationResult<Money> {
        sum_lines(&self.items, ProductOrder::regular_price)
    }

    /// Summary of the order's lines and totals.
    pub fn totals(&self) -> ValidationResult<OrderTotals> {
        OrderTotals::try_from(self)
    }
}

fn sum_lines(
    items: &[ProductOrder],
    price: impl Fn(&ProductOrder) -> ValidationResult<Money>,
) -> ValidationResult<Money> {
    items.iter().try_fold(Money::zero(), |sum, line| {
        sum.checked_add(price(line)?).ok_or_else(total_overflow)
    })
}

impl<R> CheckOutOrder<R> {
    #[inline]
    pub fn id(&self) -> OrderId {
        self.id
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The lines in the order they were first added.
    #[inline]
    pub fn items(&self) -> &[ProductOrder] {
        &self.items
    }

    /// The line for `product_id`, if the product has been added.
    pub fn line_for(&self, product_id: ProductId) -> Option<&ProductOrder> {
        self.items.iter().find(|line| line.product_id() == product_id)
    }

    /// Number of distinct products.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units across all lines.
    ///
    /// ## Errors
    /// - `Overflow { field: "total_units" }` when the sum does not fit in an
    ///   `i64`
    pub fn total_units(&self) -> ValidationResult<i64> {
        self.items.iter().try_fold(0i64, |sum, line| {
            sum.checked_add(line.units())
                .ok_or_else(|| ValidationError::Overflow {
                    field: "total_units".to_string(),
                })
        })
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Order summary for receipts and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub line_count: usize,
    pub total_units: i64,
    pub regular_subtotal: Money,
    /// `regular_subtotal - total`.
    pub discount: Money,
    pub total: Money,
}

impl<R: VolumePricingRulesRepository> TryFrom<&CheckOutOrder<R>> for OrderTotals {
    type Error = ValidationError;

    fn try_from(order: &CheckOutOrder<R>) -> Result<Self, Self::Error> {
        let regular_subtotal = order.regular_subtotal()?;
        let total = order.total_price()?;
        let discount = regular_subtotal
            .checked_sub(total)
            .ok_or_else(total_overflow)?;

        Ok(OrderTotals {
            line_count: order.len(),
            total_units: order.total_units()?,
            regular_subtotal,
            discount,
            total,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::NoVolumeRules;
    use crate::types::VolumePricingRule;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn money(amount: rust_decimal::Decimal) -> Money {
        Money::from_decimal(amount)
    }

    fn product(name: &str, price: rust_decimal::Decimal) -> Product {
        Product::new(Uuid::new_v4(), name, money(price)).unwrap()
    }

    fn rule(product: &Product, units: i64, price: rust_decimal::Decimal) -> VolumePricingRule {
        VolumePricingRule::new(Uuid::new_v4(), product.id(), units, money(price)).unwrap()
    }

    fn order_with<R: VolumePricingRulesRepository>(rules: R) -> CheckOutOrder<R> {
        CheckOutOrder::new(Uuid::new_v4(), PricingStrategyFactory::new(rules))
    }

    /// Rules lookup that can gain rules while an order borrows it.
    #[derive(Default)]
    struct GrowingRules {
        rules: RefCell<HashMap<ProductId, VolumePricingRule>>,
    }

    impl GrowingRules {
        fn add(&self, rule: VolumePricingRule) {
            self.rules.borrow_mut().insert(rule.product_id(), rule);
        }
    }

    impl VolumePricingRulesRepository for GrowingRules {
        fn get_by_product_id(&self, product_id: ProductId) -> Option<VolumePricingRule> {
            self.rules.borrow().get(&product_id).cloned()
        }
    }

    /// The supermarket shelf: A and B on offer, C and D at full price.
    struct Shelf {
        a: Product,
        b: Product,
        c: Product,
        d: Product,
        rules: HashMap<ProductId, VolumePricingRule>,
    }

    fn shelf() -> Shelf {
        let a = product("A", dec!(0.50));
        let b = product("B", dec!(0.30));
        let c = product("C", dec!(0.70));
        let d = product("D", dec!(0.20));
        let rules = HashMap::from([
            (a.id(), rule(&a, 3, dec!(1.30))),
            (b.id(), rule(&b, 2, dec!(0.45))),
        ]);
        Shelf { a, b, c, d, rules }
    }

    fn regular_line(unit_price: Money) -> ProductOrder {
        ProductOrder::single(
            Uuid::new_v4(),
            Uuid::new_v4(),
            unit_price,
            PricingStrategy::Regular,
        )
        .unwrap()
    }

    // -------------------------------------------------------------------------
    // ProductOrder
    // -------------------------------------------------------------------------

    #[test]
    fn test_line_rejects_invalid_units() {
        let err = ProductOrder::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            money(dec!(12)),
            PricingStrategy::Regular,
            -1,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MustBePositive {
                field: "units".to_string()
            }
        );
        let zero = ProductOrder::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            money(dec!(12)),
            PricingStrategy::Regular,
            0,
        );
        assert!(zero.is_err());
    }

    #[test]
    fn test_line_rejects_negative_price() {
        let err = ProductOrder::single(
            Uuid::new_v4(),
            Uuid::new_v4(),
            money(dec!(-0.01)),
            PricingStrategy::Regular,
        )
        .unwrap_err();
        assert_eq!(err.field(), "unit_price");
    }

    #[test]
    fn test_line_add_invalid_units_leaves_count() {
        let mut line = regular_line(money(dec!(12)));

        assert!(line.add_units(-1).is_err());
        assert!(line.add_units(0).is_err());
        assert_eq!(line.units(), 1);
    }

    #[test]
    fn test_line_add_units_past_i64_max_leaves_count() {
        let mut line = regular_line(money(dec!(12)));
        line.add_units(i64::MAX - 1).unwrap();

        let err = line.add_units(1).unwrap_err();

        assert_eq!(
            err,
            ValidationError::Overflow {
                field: "units".to_string()
            }
        );
        assert_eq!(line.units(), i64::MAX);
    }

    #[test]
    fn test_line_total_out_of_range_is_an_error() {
        let mut line = regular_line(money(rust_decimal::Decimal::MAX));

        assert_eq!(line.total_price(), Ok(money(rust_decimal::Decimal::MAX)));

        line.add_units(1).unwrap();
        assert_eq!(line.total_price().unwrap_err().field(), "total_price");
        assert!(line.regular_price().is_err());
    }

    #[test]
    fn test_line_add_units_updates_units() {
        let mut line = regular_line(money(dec!(12)));

        line.add_units(1).unwrap();
        assert_eq!(line.units(), 2);
        assert_eq!(line.unit_price(), money(dec!(12)));
    }

    #[test]
    fn test_line_total_follows_unit_count() {
        let strategy = PricingStrategy::volume(3, money(dec!(1.30))).unwrap();
        let mut line =
            ProductOrder::new(Uuid::new_v4(), Uuid::new_v4(), money(dec!(0.50)), strategy, 2)
                .unwrap();

        assert_eq!(line.total_price(), Ok(money(dec!(1.00))));
        assert_eq!(line.total_price(), Ok(money(dec!(1.00))));

        line.add_units(1).unwrap();
        assert_eq!(line.total_price(), Ok(money(dec!(1.30))));
        assert_eq!(line.regular_price(), Ok(money(dec!(1.50))));
    }

    // -------------------------------------------------------------------------
    // CheckOutOrder scenarios
    // -------------------------------------------------------------------------

    #[test]
    fn test_single_product_no_discount() {
        let c = product("C", dec!(0.70));
        let mut order = order_with(NoVolumeRules);

        order.add_order_item(&c, 3).unwrap();

        assert_eq!(order.total_price(), Ok(money(dec!(2.10))));
    }

    #[test]
    fn test_multiple_products_no_discount() {
        let c = product("C", dec!(0.70));
        let d = product("D", dec!(0.20));
        let mut order = order_with(NoVolumeRules);

        order.add_order_item(&c, 5).unwrap();
        order.add_order_item(&d, 2).unwrap();

        assert_eq!(order.total_price(), Ok(money(dec!(3.90))));
    }

    #[test]
    fn test_single_product_applies_discount() {
        let shelf = shelf();
        let mut order = order_with(&shelf.rules);

        order.add_order_item(&shelf.a, 10).unwrap();

        assert_eq!(order.total_price(), Ok(money(dec!(4.40))));
    }

    #[test]
    fn test_mixed_scan_applies_discounts() {
        let shelf = shelf();
        let mut order = order_with(&shelf.rules);

        let scans = [&shelf.a, &shelf.b, &shelf.c, &shelf.d, &shelf.a, &shelf.b, &shelf.a];
        for product in scans {
            order.add_product(product).unwrap();
        }

        assert_eq!(order.len(), 4);
        assert_eq!(order.total_price(), Ok(money(dec!(2.65))));
    }

    #[test]
    fn test_single_units_below_thresholds() {
        let shelf = shelf();
        let mut order = order_with(&shelf.rules);

        for product in [&shelf.a, &shelf.b, &shelf.c, &shelf.d] {
            order.add_product(product).unwrap();
        }

        assert_eq!(order.total_price(), Ok(money(dec!(1.70))));
    }

    #[test]
    fn test_invalid_units_leave_order_unchanged() {
        let shelf = shelf();
        let mut order = order_with(&shelf.rules);

        assert!(order.add_order_item(&shelf.a, -1).is_err());
        assert!(order.is_empty());

        order.add_order_item(&shelf.a, 2).unwrap();
        let err = order.add_order_item(&shelf.a, -1).unwrap_err();

        assert!(matches!(err, ValidationError::MustBePositive { .. }));
        assert_eq!(order.len(), 1);
        assert_eq!(order.items()[0].units(), 2);
        assert_eq!(order.total_price(), Ok(money(dec!(1.00))));
    }

    #[test]
    fn test_merge_past_i64_max_leaves_line() {
        let d = product("D", dec!(0.20));
        let mut order = order_with(NoVolumeRules);

        order.add_order_item(&d, i64::MAX).unwrap();
        let err = order.add_order_item(&d, 1).unwrap_err();

        assert!(matches!(err, ValidationError::Overflow { .. }));
        assert_eq!(order.len(), 1);
        assert_eq!(order.line_for(d.id()).unwrap().units(), i64::MAX);
    }

    #[test]
    fn test_order_sums_out_of_range_are_errors() {
        let c = product("C", dec!(0.70));
        let d = product("D", dec!(0.20));
        let dearest = product("dearest", rust_decimal::Decimal::MAX);
        let also_dearest = product("also dearest", rust_decimal::Decimal::MAX);
        let mut order = order_with(NoVolumeRules);

        order.add_order_item(&c, i64::MAX).unwrap();
        order.add_order_item(&d, i64::MAX).unwrap();
        assert_eq!(order.total_units().unwrap_err().field(), "total_units");

        let mut order = order_with(NoVolumeRules);
        order.add_product(&dearest).unwrap();
        order.add_product(&also_dearest).unwrap();
        assert!(order.items().iter().all(|line| line.total_price().is_ok()));
        assert_eq!(order.total_price().unwrap_err().field(), "total_price");
        assert!(order.totals().is_err());
    }

    #[test]
    fn test_existing_line_updates_units() {
        let product = product("product", dec!(12));
        let mut order = order_with(NoVolumeRules);

        order.add_product(&product).unwrap();
        order.add_product(&product).unwrap();

        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].units(), 2);
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let shelf = shelf();
        let mut order = order_with(&shelf.rules);

        order.add_product(&shelf.c).unwrap();
        order.add_product(&shelf.a).unwrap();
        order.add_product(&shelf.c).unwrap();
        order.add_product(&shelf.b).unwrap();

        let ids: Vec<ProductId> = order.items().iter().map(ProductOrder::product_id).collect();
        assert_eq!(ids, vec![shelf.c.id(), shelf.a.id(), shelf.b.id()]);
    }

    #[test]
    fn test_empty_order_totals_zero() {
        let order = order_with(NoVolumeRules);

        assert_eq!(order.total_price(), Ok(Money::zero()));
        assert_eq!(order.total_units(), Ok(0));
        assert!(order.line_for(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_line_strategy_is_frozen_at_creation() {
        let a = product("A", dec!(0.50));
        let rules = GrowingRules::default();
        let mut order = order_with(&rules);

        order.add_order_item(&a, 1).unwrap();
        rules.add(rule(&a, 3, dec!(1.30)));
        order.add_order_item(&a, 2).unwrap();

        let line = order.line_for(a.id()).unwrap();
        assert_eq!(line.strategy(), &PricingStrategy::Regular);
        assert_eq!(order.total_price(), Ok(money(dec!(1.50))));

        // A fresh order sees the new rule.
        let mut fresh = order_with(&rules);
        fresh.add_order_item(&a, 3).unwrap();
        assert_eq!(fresh.total_price(), Ok(money(dec!(1.30))));
    }

    #[test]
    fn test_merge_keeps_first_unit_price() {
        let id = Uuid::new_v4();
        let cheap = Product::new(id, "A", money(dec!(0.50))).unwrap();
        let repriced = Product::new(id, "A", money(dec!(0.60))).unwrap();
        let mut order = order_with(NoVolumeRules);

        order.add_product(&cheap).unwrap();
        order.add_product(&repriced).unwrap();

        assert_eq!(order.line_for(id).unwrap().unit_price(), money(dec!(0.50)));
        assert_eq!(order.total_price(), Ok(money(dec!(1.00))));
    }

    #[test]
    fn test_totals_summary() {
        let shelf = shelf();
        let mut order = order_with(&shelf.rules);

        order.add_order_item(&shelf.a, 3).unwrap();
        order.add_order_item(&shelf.b, 2).unwrap();
        order.add_order_item(&shelf.c, 1).unwrap();
        order.add_order_item(&shelf.d, 1).unwrap();

        let totals = order.totals().unwrap();
        assert_eq!(totals.line_count, 4);
        assert_eq!(totals.total_units, 7);
        assert_eq!(totals.regular_subtotal, money(dec!(3.00)));
        assert_eq!(totals.discount, money(dec!(0.35)));
        assert_eq!(totals.total, money(dec!(2.65)));

        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["lineCount"], 4);
        assert_eq!(json["total"], "2.65");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 200,
                ..ProptestConfig::default()
            })]

            /// Adding one product twice yields one line holding both counts.
            #[test]
            fn merging_sums_units(first in 1i64..1_000, second in 1i64..1_000) {
                let shelf = shelf();
                let mut order = order_with(&shelf.rules);

                order.add_order_item(&shelf.b, first).unwrap();
                order.add_order_item(&shelf.b, second).unwrap();

                prop_assert_eq!(order.len(), 1);
                prop_assert_eq!(order.items()[0].units(), first + second);
            }

            /// The order total is the sum of its line totals, however the units
            /// were scanned.
            #[test]
            fn total_is_sum_of_lines(
                scans in proptest::collection::vec((0usize..4, 1i64..20), 0..30),
            ) {
                let shelf = shelf();
                let products = [&shelf.a, &shelf.b, &shelf.c, &shelf.d];
                let mut order = order_with(&shelf.rules);

                for (index, units) in scans {
                    order.add_order_item(products[index], units).unwrap();
                }

                let by_line: Money = order
                    .items()
                    .iter()
                    .map(|line| line.total_price().unwrap())
                    .sum();
                prop_assert_eq!(order.total_price(), Ok(by_line));
                prop_assert_eq!(order.total_price(), order.total_price());
            }
        }
    }
}
