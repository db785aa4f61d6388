//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - Command execution with error handling
//! - `io` - File I/O with consistent error handling
//! - `parser` - Text extraction and manipulation
//! - `validation` - Input validation helpers

pub mod command;
pub mod io;
pub mod parser;
pub mod validation;
