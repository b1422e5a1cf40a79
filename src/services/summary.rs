//! The aggregation engine: joins a month of expenses against budgets and
//! rolls spending up by category, payment method, and day.
//!
//! Everything here is pure in-memory computation over rows the query layer
//! already scoped to one user and one month window. Money stays in integer
//! cents until the final conversion into response values.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::{cents_to_decimal, Budget, BudgetHealth, BudgetStatusRow, Expense};
use crate::services::categories;

/// Sum expense amounts per normalized category.
pub fn spent_by_category(expenses: &[Expense]) -> HashMap<String, i64> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for expense in expenses {
        *totals
            .entry(categories::normalize(&expense.category))
            .or_insert(0) += expense.amount_cents;
    }
    totals
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One status row per budget. Categories with spending but no budget do not
/// appear; categories with a budget but no spending show zero spent.
pub fn budget_status(budgets: &[Budget], expenses: &[Expense]) -> Vec<BudgetStatusRow> {
    let spent_map = spent_by_category(expenses);

    budgets
        .iter()
        .map(|budget| {
            let key = categories::normalize(&budget.category);
            let spent = spent_map.get(&key).copied().unwrap_or(0);
            let health = BudgetHealth::classify(spent, budget.amount_cents);

            let percentage = if spent == 0 {
                0.0
            } else if budget.amount_cents == 0 {
                // no meaningful ratio against a zero budget
                100.0
            } else {
                round2(spent as f64 / budget.amount_cents as f64 * 100.0)
            };

            BudgetStatusRow {
                category: budget.category.clone(),
                budget: cents_to_decimal(budget.amount_cents),
                spent: cents_to_decimal(spent),
                remaining: cents_to_decimal((budget.amount_cents - spent).max(0)),
                percentage,
                status: health.label(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodTotal {
    pub method: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyTotal {
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_spent: f64,
    pub category_totals: BTreeMap<String, f64>,
    pub payment_totals: BTreeMap<String, f64>,
    pub daily_totals: BTreeMap<String, f64>,
    pub top_category: Option<String>,
    pub top_payment_methods: Vec<PaymentMethodTotal>,
    pub spending_by_category: Vec<CategoryTotal>,
    pub spending_over_time: Vec<DailyTotal>,
}

/// Roll one month of expenses up into the dashboard summary.
///
/// Categories are grouped on their normalized form, the same policy the
/// budget status report uses. Payment methods are grouped case-sensitively
/// on the stored string. Ties for top category and top payment methods are
/// broken arbitrarily.
pub fn dashboard_summary(expenses: &[Expense]) -> DashboardSummary {
    let mut category_cents: BTreeMap<String, i64> = BTreeMap::new();
    let mut payment_cents: BTreeMap<String, i64> = BTreeMap::new();
    let mut daily_cents: BTreeMap<String, i64> = BTreeMap::new();
    let mut total_cents: i64 = 0;

    for expense in expenses {
        total_cents += expense.amount_cents;
        *category_cents
            .entry(categories::normalize(&expense.category))
            .or_insert(0) += expense.amount_cents;
        *payment_cents
            .entry(expense.payment_method.clone())
            .or_insert(0) += expense.amount_cents;
        *daily_cents.entry(expense.date.clone()).or_insert(0) += expense.amount_cents;
    }

    let top_category = category_cents
        .iter()
        .max_by_key(|(_, cents)| **cents)
        .map(|(category, _)| category.clone());

    let mut methods: Vec<(String, i64)> = payment_cents
        .iter()
        .map(|(method, cents)| (method.clone(), *cents))
        .collect();
    methods.sort_by(|a, b| b.1.cmp(&a.1));
    let top_payment_methods = methods
        .into_iter()
        .take(3)
        .map(|(method, cents)| PaymentMethodTotal {
            method,
            amount: cents_to_decimal(cents),
        })
        .collect();

    let spending_by_category = category_cents
        .iter()
        .map(|(category, cents)| CategoryTotal {
            category: category.clone(),
            amount: cents_to_decimal(*cents),
        })
        .collect();

    // Dates are fixed-width YYYY-MM-DD, so the BTreeMap's lexicographic
    // order is chronological.
    let spending_over_time = daily_cents
        .iter()
        .map(|(date, cents)| DailyTotal {
            date: date.clone(),
            amount: cents_to_decimal(*cents),
        })
        .collect();

    DashboardSummary {
        total_spent: cents_to_decimal(total_cents),
        category_totals: category_cents
            .into_iter()
            .map(|(category, cents)| (category, cents_to_decimal(cents)))
            .collect(),
        payment_totals: payment_cents
            .into_iter()
            .map(|(method, cents)| (method, cents_to_decimal(cents)))
            .collect(),
        daily_totals: daily_cents
            .into_iter()
            .map(|(date, cents)| (date, cents_to_decimal(cents)))
            .collect(),
        top_category,
        top_payment_methods,
        spending_by_category,
        spending_over_time,
    }
}
