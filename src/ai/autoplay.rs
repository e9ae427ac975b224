//! CPU driver.
//!
//! Turns a strategy into actions for the dispatcher. Dice come from the
//! supplied `GameRng`, so a seeded driver replays a match exactly.

use tracing::trace;

use crate::core::{Action, GameRng, GameState, Phase};
use crate::rules::Rules;

use super::policy::Strategy;

/// Result of driving a match.
#[derive(Clone, Debug)]
pub struct PlayOut {
    pub state: GameState,
    /// Actions dispatched.
    pub actions: usize,
}

/// Next action for the seat whose input is awaited, if that seat is a CPU.
///
/// A pending bonus is answered by its grantee; otherwise the current player
/// selects a move or rolls. `None` for human seats and finished games.
#[must_use]
pub fn next_cpu_action(
    rules: &Rules,
    state: &GameState,
    strategy: &dyn Strategy,
    rng: &mut GameRng,
) -> Option<Action> {
    let seat = state
        .bonus_pending()
        .map_or(state.current_player(), |b| b.grantee);
    if !state.player(seat).is_cpu() {
        return None;
    }
    choose_action(rules, state, strategy, rng)
}

/// Next action for whoever is to act, regardless of seat kind.
#[must_use]
pub fn choose_action(
    rules: &Rules,
    state: &GameState,
    strategy: &dyn Strategy,
    rng: &mut GameRng,
) -> Option<Action> {
    if state.is_terminal() {
        return None;
    }
    if state.bonus_pending().is_some() {
        return strategy
            .choose_bonus(rules, state, rng)
            .map(Action::ApplyBonus);
    }
    match state.phase() {
        Phase::Select => strategy
            .choose_move(rules, state, rng)
            .map(|m| Action::SelectMove(m.id)),
        Phase::Roll => Some(Action::Roll(rng.roll_die())),
    }
}

/// Play every seat with `strategy` until someone wins or `max_actions`
/// actions have been dispatched. `observe` sees each resulting state.
pub fn play_out(
    rules: &Rules,
    state: &GameState,
    strategy: &dyn Strategy,
    rng: &mut GameRng,
    max_actions: usize,
    mut observe: impl FnMut(&GameState),
) -> PlayOut {
    let mut current = state.clone();
    let mut actions = 0;

    while actions < max_actions {
        let Some(action) = choose_action(rules, &current, strategy, rng) else {
            break;
        };
        trace!(turn = current.turn(), ?action, "autoplay");
        current = rules.dispatch(&current, action);
        actions += 1;
        observe(&current);
    }

    PlayOut {
        state: current,
        actions,
    }
}
