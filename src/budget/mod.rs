//! Budgets: spending limits for a category over a weekly, monthly or yearly period.

mod core;
mod create;
mod delete;
mod edit;
mod list;

pub use core::{
    Budget, BudgetBuilder, BudgetPeriod, create_budget, create_budget_table, get_all_budgets,
};
pub use create::create_budget_endpoint;
pub use delete::delete_budget_endpoint;
pub use edit::update_budget_endpoint;
pub use list::{get_budget_endpoint, get_budgets_endpoint};
