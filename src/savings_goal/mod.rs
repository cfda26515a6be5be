//! Savings goals: a target amount the user is working towards, with optional deadline.

mod core;
mod create;
mod delete;
mod edit;
mod list;

pub use core::{
    SavingsGoal, SavingsGoalBuilder, SavingsSummary, create_savings_goal,
    create_savings_goal_table,
};
pub use create::create_savings_goal_endpoint;
pub use delete::delete_savings_goal_endpoint;
pub use edit::update_savings_goal_endpoint;
pub use list::{
    get_savings_goal_endpoint, get_savings_goals_endpoint, get_savings_summary_endpoint,
};
