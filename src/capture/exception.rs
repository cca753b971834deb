//! Error introspection for `$exception` events
//!
//! Rust errors carry no runtime class name, so the type is taken from
//! `std::any::type_name` of the concrete error and trimmed down to the bare
//! type identifier. Stack traces come from `std::backtrace`, which only
//! records frames when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` is enabled.

use serde::Serialize;
use serde_json::Value;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;

use super::payload::Properties;

/// What gets reported about a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionInfo {
    pub exception_type: String,
    pub message: String,
    pub stack_trace: String,
}

impl ExceptionInfo {
    /// Build from explicit parts, with no stack trace
    pub fn new(exception_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            exception_type: exception_type.into(),
            message: message.into(),
            stack_trace: String::new(),
        }
    }

    /// Describe an error value, capturing a backtrace at this call site
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        Self {
            exception_type: short_type_name(std::any::type_name::<E>()),
            message: error.to_string(),
            stack_trace: format_backtrace(&Backtrace::capture()),
        }
    }

    /// Describe a panic payload as delivered by `catch_unwind` or a `JoinError`
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_default();

        Self {
            exception_type: "panic".to_string(),
            message,
            stack_trace: format_backtrace(&Backtrace::capture()),
        }
    }

    /// Replace the stack trace with one captured where the failure happened
    pub fn with_backtrace(mut self, backtrace: &Backtrace) -> Self {
        self.stack_trace = format_backtrace(backtrace);
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = stack_trace.into();
        self
    }

    /// Exception properties with `context` merged on top
    pub fn to_properties(&self, context: Option<Properties>) -> Properties {
        let mut properties = Properties::new();
        properties.insert("exception_type".to_string(), Value::String(self.exception_type.clone()));
        properties.insert("exception_message".to_string(), Value::String(self.message.clone()));
        properties.insert("stack_trace".to_string(), Value::String(self.stack_trace.clone()));
        properties.insert("is_exception".to_string(), Value::Bool(true));
        properties.extend(context.unwrap_or_default());
        properties
    }
}

/// `core::num::error::ParseIntError` -> `ParseIntError`, `my::Wrapper<a::B>` -> `Wrapper`
fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).trim_start_matches('&').to_string()
}

fn format_backtrace(backtrace: &Backtrace) -> String {
    match backtrace.status() {
        BacktraceStatus::Captured => backtrace.to_string(),
        _ => String::new(),
    }
}
