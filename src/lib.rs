//! Fire-and-forget PostHog reporting for server-side handlers
//!
//! ```no_run
//! # async fn handler() {
//! use phcap::{ExceptionInfo, ProcessEnv};
//!
//! phcap::report_event(&ProcessEnv, "login", None, Some("user-42")).await;
//!
//! if let Err(e) = "x".parse::<i32>() {
//!     phcap::report_exception(&ProcessEnv, &ExceptionInfo::from_error(&e), None, None).await;
//! }
//! # }
//! ```

pub mod capture;
pub mod error;

pub use capture::{
    Env, EventPayload, ExceptionInfo, Layered, Outcome, ProcessEnv, Properties, Reporter, ReporterConfig,
    Transport, UreqTransport, report_event, report_exception,
};
pub use error::CaptureError;
