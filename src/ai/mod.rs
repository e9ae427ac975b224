//! CPU players.
//!
//! - `policy`: the `Strategy` trait and a uniform-random baseline
//! - `heuristic`: greedy scoring (capture > goal > safety > progress)
//! - `autoplay`: turns a strategy into dispatcher actions

pub mod policy;
pub mod heuristic;
pub mod autoplay;

pub use autoplay::{choose_action, next_cpu_action, play_out, PlayOut};
pub use heuristic::HeuristicStrategy;
pub use policy::{RandomStrategy, Strategy};
