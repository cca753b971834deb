//! PostHog event capture
//!
//! Two entry points, [`Reporter::report_event`] and
//! [`Reporter::report_exception`], build a `/capture/` payload and POST it to
//! the configured collector. Configuration is read from an [`Env`] on every
//! call. Reporting is silently skipped when no usable API key is set, and any
//! delivery failure is logged and swallowed so the caller's request handling
//! carries on unaffected.

pub mod config;
pub mod env;
pub mod exception;
pub mod payload;
pub mod transport;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{CaptureError, Result};

pub use config::{
    API_KEY_VAR, DEFAULT_DISTINCT_ID, DEFAULT_HOST, EXCEPTION_EVENT, HOST_VAR, PLACEHOLDER_API_KEY, ReporterConfig,
};
pub use env::{Env, Layered, ProcessEnv};
pub use exception::ExceptionInfo;
pub use payload::{EventPayload, Properties};
pub use transport::{Transport, UreqTransport};

/// What happened to a capture request that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No usable API key; nothing was sent
    Disabled,
    /// The collector accepted the request
    Sent { status: u16 },
}

/// Dispatches capture requests through a [`Transport`]
#[derive(Clone)]
pub struct Reporter {
    transport: Arc<dyn Transport>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

impl Reporter {
    /// Create a reporter that sends over HTTP with ureq
    pub fn new() -> Self {
        Self::with_transport(Arc::new(UreqTransport))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a named event. Never fails; errors are logged.
    pub async fn report_event<E: Env + ?Sized>(
        &self,
        env: &E,
        event_name: &str,
        properties: Option<Properties>,
        distinct_id: Option<&str>,
    ) {
        if let Err(e) = self.try_report_event(env, event_name, properties, distinct_id).await {
            log::warn!("PostHog capture error: {}", e);
        }
    }

    /// Send an `$exception` event. Never fails; errors are logged.
    pub async fn report_exception<E: Env + ?Sized>(
        &self,
        env: &E,
        exception: &ExceptionInfo,
        context: Option<Properties>,
        distinct_id: Option<&str>,
    ) {
        self.report_event(env, EXCEPTION_EVENT, Some(exception.to_properties(context)), distinct_id)
            .await
    }

    /// Like [`Self::report_event`] but hands the result back
    pub async fn try_report_event<E: Env + ?Sized>(
        &self,
        env: &E,
        event_name: &str,
        properties: Option<Properties>,
        distinct_id: Option<&str>,
    ) -> Result<Outcome> {
        let config = ReporterConfig::from_env(env);
        self.deliver(&config, event_name, properties, distinct_id).await
    }

    pub async fn try_report_exception<E: Env + ?Sized>(
        &self,
        env: &E,
        exception: &ExceptionInfo,
        context: Option<Properties>,
        distinct_id: Option<&str>,
    ) -> Result<Outcome> {
        self.try_report_event(env, EXCEPTION_EVENT, Some(exception.to_properties(context)), distinct_id)
            .await
    }

    /// Send a named event in the background.
    ///
    /// Configuration is read before this returns. Inside a tokio runtime the
    /// request is spawned and the handle returned, to be awaited or handed to
    /// whatever keeps work alive past the response; the task itself never
    /// fails. Outside a runtime the request is sent inline and `None` is
    /// returned.
    pub fn spawn_event<E: Env + ?Sized>(
        &self,
        env: &E,
        event_name: impl Into<String>,
        properties: Option<Properties>,
        distinct_id: Option<&str>,
    ) -> Option<JoinHandle<()>> {
        let config = ReporterConfig::from_env(env);
        let event_name = event_name.into();

        let Ok(handle) = Handle::try_current() else {
            log::debug!("No tokio runtime, sending '{}' inline", event_name);
            if let Err(e) = self.deliver_blocking(&config, &event_name, properties, distinct_id) {
                log::warn!("PostHog capture error: {}", e);
            }
            return None;
        };

        let distinct_id = distinct_id.map(str::to_string);
        let reporter = self.clone();

        Some(handle.spawn(async move {
            if let Err(e) = reporter
                .deliver(&config, &event_name, properties, distinct_id.as_deref())
                .await
            {
                log::warn!("PostHog capture error: {}", e);
            }
        }))
    }

    pub fn spawn_exception<E: Env + ?Sized>(
        &self,
        env: &E,
        exception: &ExceptionInfo,
        context: Option<Properties>,
        distinct_id: Option<&str>,
    ) -> Option<JoinHandle<()>> {
        self.spawn_event(env, EXCEPTION_EVENT, Some(exception.to_properties(context)), distinct_id)
    }

    /// Send on tokio's blocking pool when a runtime is present, inline otherwise
    async fn deliver(
        &self,
        config: &ReporterConfig,
        event_name: &str,
        properties: Option<Properties>,
        distinct_id: Option<&str>,
    ) -> Result<Outcome> {
        let Some((url, body)) = self.prepare(config, event_name, properties, distinct_id)? else {
            return Ok(Outcome::Disabled);
        };

        let status = match Handle::try_current() {
            Ok(handle) => {
                let reporter = self.clone();
                let target = url.clone();
                handle
                    .spawn_blocking(move || reporter.post(&target, &body))
                    .await??
            }
            Err(_) => self.post(&url, &body)?,
        };

        log::debug!("Captured '{}' at {} (HTTP {})", event_name, url, status);
        Ok(Outcome::Sent { status })
    }

    fn deliver_blocking(
        &self,
        config: &ReporterConfig,
        event_name: &str,
        properties: Option<Properties>,
        distinct_id: Option<&str>,
    ) -> Result<Outcome> {
        let Some((url, body)) = self.prepare(config, event_name, properties, distinct_id)? else {
            return Ok(Outcome::Disabled);
        };

        let status = self.post(&url, &body)?;
        log::debug!("Captured '{}' at {} (HTTP {})", event_name, url, status);
        Ok(Outcome::Sent { status })
    }

    /// Capture URL and serialized body, or `None` when reporting is disabled
    fn prepare(
        &self,
        config: &ReporterConfig,
        event_name: &str,
        properties: Option<Properties>,
        distinct_id: Option<&str>,
    ) -> Result<Option<(String, Vec<u8>)>> {
        let Some(api_key) = config.enabled_key() else {
            log::debug!("PostHog reporting disabled, skipping event '{}'", event_name);
            return Ok(None);
        };

        if event_name.is_empty() {
            return Err(CaptureError::EmptyEvent);
        }

        let payload = EventPayload::new(
            api_key,
            event_name,
            properties,
            distinct_id.unwrap_or(DEFAULT_DISTINCT_ID),
        );

        Ok(Some((config.capture_url(), payload.to_json()?)))
    }

    /// A panicking transport is turned into an error
    fn post(&self, url: &str, body: &[u8]) -> Result<u16> {
        panic::catch_unwind(AssertUnwindSafe(|| self.transport.post_json(url, body)))
            .unwrap_or_else(|payload| Err(CaptureError::Panicked(ExceptionInfo::from_panic(payload.as_ref()).message)))
    }
}

/// Send a named event with the default HTTP reporter
pub async fn report_event<E: Env + ?Sized>(
    env: &E,
    event_name: &str,
    properties: Option<Properties>,
    distinct_id: Option<&str>,
) {
    Reporter::new()
        .report_event(env, event_name, properties, distinct_id)
        .await
}

/// Send an `$exception` event with the default HTTP reporter
pub async fn report_exception<E: Env + ?Sized>(
    env: &E,
    exception: &ExceptionInfo,
    context: Option<Properties>,
    distinct_id: Option<&str>,
) {
    Reporter::new()
        .report_exception(env, exception, context, distinct_id)
        .await
}
