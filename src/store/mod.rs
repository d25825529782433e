//! Record store: where question rows are read from and appended to.

pub mod memory;
pub mod sheets;

pub use memory::MemoryStore;
pub use sheets::GoogleSheetsStore;

use crate::error::BankError;
use crate::questions::{QuestionRow, StoredRow};
use async_trait::async_trait;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every data row, keyed by header name, in sheet order.
    async fn read_all(&self) -> Result<Vec<StoredRow>, BankError>;

    /// Append one positional row. Single attempt; the caller decides what to tell the user.
    async fn append(&self, row: QuestionRow) -> Result<(), BankError>;
}
