//! Display formatting for terminal output

pub mod ledger;
pub mod report;
pub mod transaction;

pub use ledger::{format_goal_list, format_template_list};
pub use transaction::{format_transaction_details, format_transaction_table, status_label};
