//! Input: keyboard and widget events mapped to editor actions.
//!
//! # Invariants
//! - The session consumes actions, never raw input events.
//! - Camera step sizes come from configuration, not from the key table.

pub mod action;
pub mod keys;

pub use action::Action;
pub use keys::{Key, action_for_key};
