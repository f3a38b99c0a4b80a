//! Agents, checkpoint synchronization, and task coordination for the
//! treasure hunt simulation.
//!
//! This crate drives a hunt: it launches a cohort of exploring agents as
//! tokio tasks over a shared [`GridStore`], lets them spawn new agents
//! mid-run, holds them at periodic checkpoints, and joins the whole set
//! before reporting a winner.
//!
//! # Modules
//!
//! - [`agent`] -- [`Explorer`], the per-agent random-walk loop.
//! - [`barrier`] -- [`CheckpointBarrier`], a generation-counted barrier
//!   with dynamic membership, and the double-wait checkpoint policy.
//! - [`config`] -- Configuration loading from `hunt-config.yaml` into
//!   strongly-typed structs.
//! - [`coordinator`] -- [`Coordinator`], which launches and joins agents.
//! - [`events`] -- [`HuntEvent`] and the [`EventSink`] trait.
//!
//! [`GridStore`]: hunt_world::GridStore
//! [`Explorer`]: agent::Explorer
//! [`CheckpointBarrier`]: barrier::CheckpointBarrier
//! [`Coordinator`]: coordinator::Coordinator
//! [`HuntEvent`]: events::HuntEvent
//! [`EventSink`]: events::EventSink

pub mod agent;
pub mod barrier;
pub mod config;
pub mod coordinator;
pub mod events;

pub use agent::{AgentReport, AgentSpec, ExplorationPolicy, Explorer};
pub use barrier::{CheckpointBarrier, CheckpointPass, Membership, rendezvous_at_checkpoint};
pub use config::{ConfigError, HuntConfig};
pub use coordinator::{Coordinator, HuntError, HuntResult};
pub use events::{EventSink, HuntEvent, NoOpSink};
