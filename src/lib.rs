// src/lib.rs
// Public library surface for the binary, demos and integration tests.

pub mod config;
pub mod direction;
pub mod metrics;
pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod traffic;

// Notification sinks (console, ntfy, Discord)
pub mod notify;

// ---- Re-exports for stable public API ----
pub use crate::config::Config;
pub use crate::notify::{Notifier, NotifierMux};
pub use crate::orchestrator::{AdapterSet, SourceBundle};
pub use crate::pipeline::{produce_report, produce_report_at};
pub use crate::report::{Action, Report};
pub use crate::sources::{Absence, SourceResult};
