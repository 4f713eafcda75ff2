//! # Aging Scheduler
//!
//! An allocation scheduler for scarce, typed resources (beds, bays, imaging
//! machines, staff stations) where a request's urgency grows the longer it
//! waits.
//!
//! ## Core Problem Solved
//!
//! Strict priority scheduling starves low-priority work when urgent work
//! keeps arriving. Here every queued request carries a base priority
//! (smaller is more urgent) that improves by one for every aging interval it
//! waits, down to a floor of 1. The allocator always serves the most urgent
//! request first, and waiting long enough makes any request the most urgent.
//!
//! ## Key Features
//!
//! - **Aging priority**: `max(1, base - floor(wait_secs / aging_interval))`
//! - **Greedy matching**: one ordered pass binds each request to the
//!   lowest-id free resource of its type; unmatched requests stay queued
//! - **Deterministic ties**: equal effective priority is served
//!   first-come-first-served
//! - **Single serialization point**: queue, registry and ledger live behind
//!   one lock, so no resource is ever allocated twice
//! - **Periodic re-evaluation**: a cancellable ticker (tokio task or OS
//!   thread) re-runs matching as priorities age
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aging_scheduler::builders::SchedulerBuilder;
//! use aging_scheduler::config::SchedulerConfig;
//! use aging_scheduler::core::Submission;
//!
//! let scheduler = SchedulerBuilder::new(SchedulerConfig::default()).build()?;
//! let request = scheduler.submit(&Submission::new("Ada", 2, "ICU_BED", 90))?;
//!
//! for allocation in scheduler.list_allocations() {
//!     println!("{} holds {}", allocation.name, allocation.resource_label);
//! }
//!
//! let mut ticker = scheduler.start_ticker_thread()?;
//! // ...
//! ticker.shutdown();
//! ```
//!
//! For end-to-end usage, see:
//! - `tests/scheduler_algorithm_test.rs` - matching, aging and release flows
//! - `tests/concurrency_test.rs` - invariants under concurrent callers

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: aging, matching and the service façade.
pub mod core;
/// Configuration models for the scheduler and its fleet.
pub mod config;
/// Builders to construct the scheduler from configuration.
pub mod builders;
/// Infrastructure adapters for queue storage.
pub mod infra;
/// Runtime adapters and API surface.
pub mod runtime;
/// Shared utilities: clock, identifiers, telemetry.
pub mod util;
