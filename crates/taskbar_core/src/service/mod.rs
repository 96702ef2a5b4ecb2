//! Jump list use-case services.
//!
//! # Responsibility
//! - Turn in-memory list items into shell transactions.
//! - Keep callers independent of the concrete shell binding.

pub mod jump_list;
