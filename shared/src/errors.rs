//! Shared error types for the emulator test harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid test node id: '{input}'")]
    InvalidNodeId { input: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
