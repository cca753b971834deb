//! Environment-like key/value lookup
//!
//! The reporter never owns its configuration. Callers hand it anything that
//! can answer "what is the value of this key", which is usually the process
//! environment but can be a request-scoped binding map in tests or embedders.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Read-only key/value access to configuration
pub trait Env {
    /// Look up a key; `None` when it is not set
    fn var(&self, key: &str) -> Option<String>;
}

/// The current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher> Env for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl Env for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl Env for [(&str, &str)] {
    fn var(&self, key: &str) -> Option<String> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }
}

impl<const N: usize> Env for [(&str, &str); N] {
    fn var(&self, key: &str) -> Option<String> {
        self.as_slice().var(key)
    }
}

impl<E: Env + ?Sized> Env for &E {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// Two sources consulted in order; the first non-empty value wins
#[derive(Debug, Clone)]
pub struct Layered<A, B> {
    primary: A,
    fallback: B,
}

impl<A: Env, B: Env> Layered<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: Env, B: Env> Env for Layered<A, B> {
    fn var(&self, key: &str) -> Option<String> {
        self.primary
            .var(key)
            .filter(|v| !v.is_empty())
            .or_else(|| self.fallback.var(key))
    }
}
