//! Diagnostic system for the Lua recognizer.
//!
//! - Error codes for searchability ([`ErrorCode`])
//! - Clear messages with labeled spans ([`Diagnostic`], [`Label`])
//! - A terminal emitter ([`emitter::render`])
//! - Span-to-line/column mapping ([`span_utils`])

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
