//! Decision tracing for tactical shooter bots.
//!
//! Bots record small, deterministic events ("target acquired", "combat started") into their
//! blackboard so tests and replay tooling can assert on decisions without a logging backend.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{emit, TraceEvent, TraceLog, TraceSink, TRACE_LOG, TRACE_SINK};
