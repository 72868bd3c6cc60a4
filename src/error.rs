//! Error types for the paging simulator.

use thiserror::Error;

/// Rejected engine or geometry configuration. Fatal to construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("frame budget is {budget} but {supplied} frame identifiers were supplied")]
    FrameCountMismatch { budget: usize, supplied: usize },

    #[error("frame budget must be positive")]
    ZeroFrameBudget,

    #[error("frame budget {budget} exceeds the {blocks} physical blocks of memory")]
    BudgetExceedsMemory { budget: usize, blocks: usize },

    #[error("frame identifier {0} is negative")]
    NegativeFrame(i64),

    #[error("frame identifier {frame} is outside physical memory (0..{blocks})")]
    FrameOutOfRange { frame: u32, blocks: usize },

    #[error("frame identifier {0} appears more than once")]
    DuplicateFrame(u32),

    #[error("page size {0} is not a positive power of two")]
    InvalidPageSize(usize),

    #[error("job size {size} is not a positive multiple of the page size {page_size}")]
    InvalidJobSize { size: usize, page_size: usize },

    #[error("memory size {size} is not a positive multiple of the page size {page_size}")]
    InvalidMemorySize { size: usize, page_size: usize },
}

/// Access outside the job's address space. Recoverable; the engine is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OutOfRangeError {
    #[error("page {page} is outside the job (0..{num_pages})")]
    PageOutOfRange { page: usize, num_pages: usize },

    #[error("offset {offset} is outside the page (0..{page_size})")]
    OffsetOutOfRange { offset: usize, page_size: usize },
}

/// Malformed text input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: invalid {field}: {token:?}")]
    InvalidField {
        line: usize,
        field: &'static str,
        token: String,
    },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: unknown operation {token:?}")]
    UnknownOperation { line: usize, token: String },

    #[error("invalid frame identifier: {0:?}")]
    InvalidFrame(String),
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
