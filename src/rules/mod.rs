//! Parchís rules.
//!
//! - `movegen`: path function, landing rules, legal move generation
//! - `engine`: `Rules` and the roll/move/turn transitions
//! - `bonus`: capture and goal awards, queued and resolved in order
//! - `dispatch`: the total action entry point for hosts

pub mod movegen;
pub mod engine;
pub mod bonus;
pub mod dispatch;

pub use engine::{Advance, Rules};
pub use movegen::legal_moves;
