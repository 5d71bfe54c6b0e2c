//! Runtime management for async operations.
//!
//! Suggestion lookups run as tokio tasks. Hosts that already run inside a
//! tokio runtime use it directly (see [`handle`]); everyone else gets a
//! small process-wide multi-threaded runtime created on first use.

use std::sync::OnceLock;

use tokio::runtime::{Handle, Runtime};

use crate::logging::targets;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Initialize the fallback runtime.
///
/// If not called explicitly, the runtime is created on first use.
pub fn init() -> &'static Runtime {
    RUNTIME.get_or_init(|| {
        tracing::debug!(target: targets::CORE, "creating fallback tokio runtime");
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("insight-runtime")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Get a reference to the fallback runtime.
pub fn get() -> &'static Runtime {
    init()
}

/// Handle of the runtime the caller is running in, or of the fallback runtime.
pub fn handle() -> Handle {
    Handle::try_current().unwrap_or_else(|_| get().handle().clone())
}
