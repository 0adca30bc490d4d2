pub mod di;
pub mod error;
pub mod storage;
