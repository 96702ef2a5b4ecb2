//! Data model for jump list items and their typed properties.
//!
//! # Responsibility
//! - Define the tagged variant value used for every link property.
//! - Define list items, their shell links and committed snapshots.
//!
//! # Invariants
//! - Variant payloads always match their reported kind.
//! - Each shell link has exactly one owning `ListItem`.

pub mod list_item;
pub mod property;
pub mod variant;
