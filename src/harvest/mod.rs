//! Harvest orchestration core
//!
//! This module owns all timing and concurrency in the crate:
//! - [`FetchOrchestrator`] drives fetch -> normalize -> store for each
//!   configured source, sequentially with pacing or as a bounded fan-out
//! - [`TickScheduler`] fires the orchestrator on a fixed interval until a
//!   stop signal arrives
//! - [`Pacing`] is the inter-source rate-limiting policy

mod orchestrator;
mod pacing;
mod scheduler;

pub use orchestrator::{FetchOrchestrator, MAX_CONCURRENT_SOURCES};
pub use pacing::{Pacing, DEFAULT_INTER_SOURCE_PAUSE};
pub use scheduler::{SchedulerHandle, SchedulerState, TickScheduler};
