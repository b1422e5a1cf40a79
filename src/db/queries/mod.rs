pub mod budgets;
pub mod expenses;
pub mod reports;
pub mod users;
