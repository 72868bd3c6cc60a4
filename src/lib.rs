pub mod config;
pub mod constants;
pub mod error;
pub mod fifo;
pub mod instruction;
pub mod io;
pub mod page_table;
pub mod translation;

// Re-export commonly used items for convenience
pub use config::PagingConfig;
pub use error::{ConfigurationError, Error, OutOfRangeError, ParseError, Result};
pub use page_table::PageTableEntry;
pub use translation::{AccessResult, PagingEngine, VirtualAddress, WriteBack};
