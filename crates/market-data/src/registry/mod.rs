//! Provider registry module.
//!
//! This module provides orchestration for equity market data providers:
//! - Provider registration and priority ordering
//! - Per-call timeouts
//! - Skip and failure diagnostics

mod registry;
mod skip_reason;

pub use registry::{call_with_timeout, ProviderRegistry, DEFAULT_PROVIDER_TIMEOUT};
pub use skip_reason::{FetchDiagnostics, ProviderAttempt, SkipReason};
