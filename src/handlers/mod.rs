// Handlers module

pub mod advice;
pub mod expenses;
pub mod health;
pub mod influencers;
pub mod rejection;

pub use advice::{advice_handler, advice_stream_handler};
pub use expenses::{add_expense_handler, delete_expense_handler, list_expenses_handler};
pub use health::{home_handler, test_db_handler};
pub use influencers::influencers_handler;
pub use rejection::handle_rejection;
