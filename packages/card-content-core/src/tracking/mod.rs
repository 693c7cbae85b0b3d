pub mod card_identity;
pub mod change_log;
pub mod diff;

pub use change_log::{ChangeDetails, ChangeLog, ChangeRecord, ChangeType};
pub use diff::{diff_documents, is_dirty, CardChange};
