pub mod add_expense;
pub mod categories;
pub mod dashboard;
pub mod expenses;
