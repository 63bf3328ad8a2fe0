//! # Sidearms Core Library
//!
//! Game-agnostic weapon memory for characters in a colony simulation.
//!
//! Every character gets a [`WeaponMemory`] that decides which weapon it
//! *should* be wielding and why:
//!
//! - **Forced** — a hard override, separate for drafted and undrafted
//! - **Preferred** — a melee preference (unarmed or a weapon) and a default
//!   ranged weapon, consulted when nothing is forced
//! - **Remembered** — every weapon instance carried as a sidearm
//!
//! Memories are reached through the [`Registry`], which creates them lazily
//! and repairs loaded ones whose weapon references went stale.
//!
//! The host simulation stays a black box behind the [`Character`] and
//! [`WeaponCatalog`] traits. This crate never swaps equipment; it only
//! remembers and answers.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod host;
pub mod memory;
pub mod persistence;
pub mod registry;
pub mod types;

pub use catalog::DefCatalog;
pub use config::SidearmsConfig;
pub use error::SidearmsError;
pub use host::{Character, PawnSnapshot, WeaponCatalog};
pub use memory::{RepairReport, RepairedField, WeaponMemory};
pub use registry::{Registry, SaveData, SharedRegistry};
pub use types::*;
