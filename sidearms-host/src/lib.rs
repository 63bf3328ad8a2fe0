//! # sidearms-host — Host Simulation Integration for Sidearms
//!
//! This crate provides the integration layer between the game-agnostic
//! `sidearms-core` library and a host colony simulation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Host simulation               │
//! │  ┌───────────────────────────────────┐  │
//! │  │       sidearms-host               │  │
//! │  │  ┌─────────────┐ ┌─────────────┐ │  │
//! │  │  │ Hooks/Events│ │   Systems   │ │  │
//! │  │  └──────┬──────┘ └──────┬──────┘ │  │
//! │  │         │               │         │  │
//! │  │         ▼               ▼         │  │
//! │  │    ┌─────────────────────────┐    │  │
//! │  │    │     sidearms-core       │    │  │
//! │  │    └─────────────────────────┘    │  │
//! │  └───────────────────────────────────┘  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `events` — Equipment events and player choices fed into weapon memories
//! - `hooks` — Translate raw host notifications into events
//! - `systems` — Route events and choices through the registry
//! - `telemetry` — `tracing` subscriber setup from config

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod events;
pub mod hooks;
pub mod systems;
pub mod telemetry;

pub use events::{PlayerChoice, SidearmEvent};
