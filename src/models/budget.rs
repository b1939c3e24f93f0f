//! Budget model
//!
//! A budget is a positive total optionally split into per-category
//! allocations. Each category tracks how much of its allocation has been
//! spent; only the expense manager moves those running totals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::category::ExpenseCategory;
use super::money::Money;
use crate::error::{TravelError, TravelResult};

/// Allocated vs. spent tracking for one expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryBudget {
    /// Amount set aside for this category
    pub allocated_amount: Money,

    /// Sum of all expenses currently recorded in this category
    pub spent_amount: Money,
}

impl CategoryBudget {
    /// Create a category budget with nothing spent yet
    pub fn new(allocated_amount: Money) -> Self {
        Self {
            allocated_amount,
            spent_amount: Money::zero(),
        }
    }

    /// Allocation left after spending (negative when overspent)
    pub fn remaining(&self) -> Money {
        self.allocated_amount - self.spent_amount
    }

    /// Spending as a percentage of the allocation
    ///
    /// An unallocated category reports 0% until something is spent, then 100%.
    pub fn percentage_used(&self) -> f64 {
        if self.allocated_amount.is_zero() {
            if self.spent_amount.is_positive() {
                100.0
            } else {
                0.0
            }
        } else {
            self.spent_amount.percentage_of(self.allocated_amount)
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent_amount > self.allocated_amount
    }

    pub(crate) fn record_spending(&mut self, amount: Money) {
        self.spent_amount += amount;
    }

    /// Take `amount` back out of the running total, flooring at zero
    ///
    /// Returns true when the floor had to be applied.
    pub(crate) fn release_spending(&mut self, amount: Money) -> bool {
        let next = self.spent_amount - amount;
        self.spent_amount = next.clamp_zero();
        next.is_negative()
    }
}

impl fmt::Display for CategoryBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Allocated: {} | Spent: {} | Remaining: {}",
            self.allocated_amount,
            self.spent_amount,
            self.remaining()
        )
    }
}

/// The inputs a budget was built from, without running totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetDefinition {
    pub total: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<Money>,

    pub allocations: BTreeMap<ExpenseCategory, Money>,
}

impl BudgetDefinition {
    /// Build a fresh budget (all spending at zero) from this definition
    pub fn build(&self) -> TravelResult<Budget> {
        Budget::new(self.total, self.daily_limit, Some(self.allocations.clone()))
    }
}

/// A trip budget with per-category allocations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Budget {
    total: Money,
    daily_limit: Option<Money>,
    categories: BTreeMap<ExpenseCategory, CategoryBudget>,
}

impl Budget {
    /// Create a budget
    ///
    /// With explicit allocations, each listed category gets exactly that
    /// amount and their sum may not exceed `total`. Without them (or with an
    /// empty map), `total` is split by [`ExpenseCategory::default_percentage`].
    pub fn new(
        total: Money,
        daily_limit: Option<Money>,
        category_allocations: Option<BTreeMap<ExpenseCategory, Money>>,
    ) -> TravelResult<Self> {
        if !total.is_positive() {
            return Err(TravelError::InvalidBudget(total));
        }
        if total > Money::MAX {
            return Err(TravelError::AmountOutOfRange(total));
        }

        if let Some(limit) = daily_limit {
            if limit.is_negative() {
                return Err(TravelError::InvalidAmount(limit));
            }
            if limit > Money::MAX {
                return Err(TravelError::AmountOutOfRange(limit));
            }
        }

        let categories = match category_allocations {
            Some(allocations) if !allocations.is_empty() => {
                Self::explicit_categories(total, allocations)?
            }
            _ => Self::default_categories(total),
        };

        Ok(Self {
            total,
            daily_limit,
            categories,
        })
    }

    /// Create a budget split by the default percentage table
    pub fn with_defaults(total: Money) -> TravelResult<Self> {
        Self::new(total, None, None)
    }

    fn explicit_categories(
        total: Money,
        allocations: BTreeMap<ExpenseCategory, Money>,
    ) -> TravelResult<BTreeMap<ExpenseCategory, CategoryBudget>> {
        if let Some(negative) = allocations.values().find(|a| a.is_negative()) {
            return Err(TravelError::InvalidAmount(*negative));
        }
        if let Some(oversized) = allocations.values().find(|a| **a > Money::MAX) {
            return Err(TravelError::AmountOutOfRange(*oversized));
        }

        let allocated: Money = allocations.values().sum();
        if allocated > total {
            return Err(TravelError::AllocationExceedsTotal { allocated, total });
        }

        Ok(allocations
            .into_iter()
            .map(|(category, amount)| (category, CategoryBudget::new(amount)))
            .collect())
    }

    fn default_categories(total: Money) -> BTreeMap<ExpenseCategory, CategoryBudget> {
        let mut categories: BTreeMap<ExpenseCategory, CategoryBudget> = ExpenseCategory::ALL
            .iter()
            .map(|c| (*c, CategoryBudget::new(total.percent(c.default_percentage()))))
            .collect();

        // Truncated shares leave a few hundredths over; the catch-all absorbs them
        let allocated: Money = categories.values().map(|c| c.allocated_amount).sum();
        if let Some(misc) = categories.get_mut(&ExpenseCategory::Miscellaneous) {
            misc.allocated_amount += total - allocated;
        }

        categories
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn daily_limit(&self) -> Option<Money> {
        self.daily_limit
    }

    /// The budget for `category`, or a zero-allocation placeholder if it has none
    pub fn get_category_budget(&self, category: ExpenseCategory) -> CategoryBudget {
        self.categories.get(&category).copied().unwrap_or_default()
    }

    /// Whether `category` has an entry (allocated or tracking spending)
    pub fn has_category(&self, category: ExpenseCategory) -> bool {
        self.categories.contains_key(&category)
    }

    /// All tracked categories in stable order
    pub fn categories(&self) -> impl Iterator<Item = (ExpenseCategory, &CategoryBudget)> {
        self.categories.iter().map(|(c, b)| (*c, b))
    }

    pub fn get_total_allocated(&self) -> Money {
        self.categories.values().map(|c| c.allocated_amount).sum()
    }

    pub fn get_unallocated(&self) -> Money {
        self.total - self.get_total_allocated()
    }

    /// The inputs needed to rebuild this budget
    pub fn definition(&self) -> BudgetDefinition {
        BudgetDefinition {
            total: self.total,
            daily_limit: self.daily_limit,
            allocations: self
                .categories
                .iter()
                .map(|(c, b)| (*c, b.allocated_amount))
                .collect(),
        }
    }

    /// Mutable entry for `category`, created with a zero allocation on first use
    pub(crate) fn category_entry(&mut self, category: ExpenseCategory) -> &mut CategoryBudget {
        self.categories.entry(category).or_default()
    }

    pub(crate) fn category_mut(
        &mut self,
        category: ExpenseCategory,
    ) -> Option<&mut CategoryBudget> {
        self.categories.get_mut(&category)
    }

    pub(crate) fn reset_spending(&mut self) {
        for budget in self.categories.values_mut() {
            budget.spent_amount = Money::zero();
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Allocated: {} | Unallocated: {}",
            self.total,
            self.get_total_allocated(),
            self.get_unallocated()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocations(pairs: &[(ExpenseCategory, i64)]) -> BTreeMap<ExpenseCategory, Money> {
        pairs
            .iter()
            .map(|(c, a)| (*c, Money::from_major(*a)))
            .collect()
    }

    #[test]
    fn test_non_positive_total_rejected() {
        assert!(matches!(
            Budget::new(Money::zero(), None, None),
            Err(TravelError::InvalidBudget(_))
        ));
        assert!(matches!(
            Budget::new(Money::from_major(-5), None, None),
            Err(TravelError::InvalidBudget(_))
        ));
    }

    #[test]
    fn test_allocation_exceeds_total() {
        let result = Budget::new(
            Money::from_major(1000),
            None,
            Some(allocations(&[
                (ExpenseCategory::Accommodation, 700),
                (ExpenseCategory::FoodBeverage, 400),
            ])),
        );
        assert!(matches!(
            result,
            Err(TravelError::AllocationExceedsTotal { .. })
        ));
    }

    #[test]
    fn test_negative_allocation_rejected() {
        let result = Budget::new(
            Money::from_major(1000),
            None,
            Some(allocations(&[(ExpenseCategory::Shopping, -1)])),
        );
        assert!(matches!(result, Err(TravelError::InvalidAmount(_))));
    }

    #[test]
    fn test_explicit_allocations() {
        let budget = Budget::new(
            Money::from_major(5_000_000),
            Some(Money::from_major(800_000)),
            Some(allocations(&[(ExpenseCategory::Accommodation, 2_000_000)])),
        )
        .unwrap();

        assert_eq!(
            budget
                .get_category_budget(ExpenseCategory::Accommodation)
                .allocated_amount,
            Money::from_major(2_000_000)
        );
        assert_eq!(budget.get_total_allocated(), Money::from_major(2_000_000));
        assert_eq!(budget.get_unallocated(), Money::from_major(3_000_000));
        assert_eq!(budget.daily_limit(), Some(Money::from_major(800_000)));
    }

    #[test]
    fn test_unallocated_category_placeholder() {
        let budget = Budget::new(
            Money::from_major(1000),
            None,
            Some(allocations(&[(ExpenseCategory::Flight, 500)])),
        )
        .unwrap();

        let placeholder = budget.get_category_budget(ExpenseCategory::Shopping);
        assert_eq!(placeholder, CategoryBudget::default());
        assert!(!budget.has_category(ExpenseCategory::Shopping));
    }

    #[test]
    fn test_default_split_covers_total() {
        let budget = Budget::with_defaults(Money::from_major(5_000_000)).unwrap();
        assert_eq!(budget.get_total_allocated(), budget.total());
        assert!(budget.get_unallocated().is_zero());
        assert_eq!(
            budget
                .get_category_budget(ExpenseCategory::Accommodation)
                .allocated_amount,
            Money::from_major(1_500_000)
        );
    }

    #[test]
    fn test_default_split_absorbs_rounding() {
        let budget = Budget::with_defaults(Money::from_cents(333)).unwrap();
        assert_eq!(budget.get_total_allocated(), Money::from_cents(333));
    }

    #[test]
    fn test_empty_allocation_map_uses_defaults() {
        let budget = Budget::new(Money::from_major(100), None, Some(BTreeMap::new())).unwrap();
        assert_eq!(budget.categories().count(), ExpenseCategory::ALL.len());
    }

    #[test]
    fn test_category_budget_derivations() {
        let mut cb = CategoryBudget::new(Money::from_major(2_000_000));
        cb.record_spending(Money::from_major(1_800_000));
        assert_eq!(cb.remaining(), Money::from_major(200_000));
        assert!((cb.percentage_used() - 90.0).abs() < 1e-9);
        assert!(!cb.is_over_budget());

        cb.record_spending(Money::from_major(300_000));
        assert!(cb.is_over_budget());
        assert_eq!(cb.remaining(), Money::from_major(-100_000));
    }

    #[test]
    fn test_release_spending_clamps() {
        let mut cb = CategoryBudget::new(Money::from_major(100));
        cb.record_spending(Money::from_major(10));
        assert!(cb.release_spending(Money::from_major(25)));
        assert_eq!(cb.spent_amount, Money::zero());

        cb.record_spending(Money::from_major(10));
        assert!(!cb.release_spending(Money::from_major(4)));
        assert_eq!(cb.spent_amount, Money::from_major(6));
    }

    #[test]
    fn test_percentage_used_without_allocation() {
        let mut cb = CategoryBudget::default();
        assert_eq!(cb.percentage_used(), 0.0);
        cb.record_spending(Money::from_major(1));
        assert_eq!(cb.percentage_used(), 100.0);
        assert!(cb.is_over_budget());
    }

    #[test]
    fn test_definition_round_trip() {
        let budget = Budget::new(
            Money::from_major(1000),
            Some(Money::from_major(100)),
            Some(allocations(&[(ExpenseCategory::Flight, 400)])),
        )
        .unwrap();

        let definition = budget.definition();
        let json = serde_json::to_string(&definition).unwrap();
        let restored: BudgetDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.build().unwrap(), budget);
    }

    #[test]
    fn test_amounts_above_max_rejected() {
        let too_much = Money::MAX + Money::from_cents(1);
        assert!(matches!(
            Budget::new(too_much, None, None),
            Err(TravelError::AmountOutOfRange(_))
        ));
        assert!(matches!(
            Budget::new(Money::from_major(1000), Some(too_much), None),
            Err(TravelError::AmountOutOfRange(_))
        ));

        let mut oversized = BTreeMap::new();
        oversized.insert(ExpenseCategory::Flight, too_much);
        assert!(matches!(
            Budget::new(Money::MAX, None, Some(oversized)),
            Err(TravelError::AmountOutOfRange(_))
        ));
    }
}
