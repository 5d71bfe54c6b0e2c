//! Core systems for Insight.
//!
//! This crate provides the foundational pieces shared by the Insight
//! dashboard crates:
//!
//! - **Signal/Slot System**: Type-safe change notification between components
//! - **Logging**: Tracing target names and a performance span guard
//! - **Runtime**: A lazily created tokio runtime for hosts that don't run one
//!
//! # Signal/Slot Example
//!
//! ```
//! use insight_core::Signal;
//!
//! // Create a signal that notifies when a suggestion is picked
//! let activated = Signal::<String>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = activated.connect(|text| {
//!     println!("Picked: {}", text);
//! });
//!
//! // Emit the signal
//! activated.emit("Banking".to_string());
//!
//! // Disconnect when done
//! activated.disconnect(conn_id);
//! ```

pub mod logging;
pub mod runtime;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
