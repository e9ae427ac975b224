//! Rule scenarios on the standard board.
//!
//! Each test builds an exact piece layout and drives it through the
//! dispatcher the way a host would.

use parchis_engine::core::BonusKind;
use parchis_engine::{
    Action, Die, GameState, Phase, PieceId, PlayerId, PlayersConfig, Position, Rules, SeatConfig,
};

fn red(slot: u8) -> PieceId {
    PieceId::new(PlayerId::Red, slot)
}

fn blue(slot: u8) -> PieceId {
    PieceId::new(PlayerId::Blue, slot)
}

fn yellow(slot: u8) -> PieceId {
    PieceId::new(PlayerId::Yellow, slot)
}

fn die(value: u8) -> Die {
    Die::new(value).unwrap()
}

fn layout(rules: &Rules, current: PlayerId, pieces: &[(PieceId, Position)]) -> GameState {
    GameState::from_layout(rules.board(), &PlayersConfig::new(), current, pieces.iter().copied()).unwrap()
}

// =============================================================================
// Spawning
// =============================================================================

/// Rolling a six on a fresh board brings a second red piece onto the start
/// square and keeps the turn with red.
#[test]
fn test_six_spawns_onto_start_square() {
    let rules = Rules::default();
    let state = rules.new_game(&PlayersConfig::new());

    let next = rules.dispatch(&state, Action::Roll(Die::SIX));

    assert_eq!(next.position(red(2)), Position::Track(14));
    assert_eq!(next.occupants(14), &[red(1), red(2)]);
    assert_eq!(next.current_player(), PlayerId::Red);
    assert_eq!(next.phase(), Phase::Roll);
    assert!(next.check_invariants(rules.board()).is_ok());
}

/// A non-six never releases a yard piece.
#[test]
fn test_yard_needs_six() {
    let rules = Rules::default();
    let state = layout(&rules, PlayerId::Red, &[]);

    for value in 1..=5 {
        assert!(rules.legal_moves(&state, PlayerId::Red, die(value)).is_empty());
    }
}

// =============================================================================
// Capture and bonus
// =============================================================================

/// Red lands on a lone blue piece on a plain square: blue goes back to the
/// yard and red is offered a 20-step capture bonus.
#[test]
fn test_capture_offers_bonus() {
    let rules = Rules::default();
    let state = layout(
        &rules,
        PlayerId::Red,
        &[
            (red(1), Position::Track(13)),
            (red(2), Position::Track(50)),
            (blue(1), Position::Track(10)),
        ],
    );

    let selecting = rules.dispatch(&state, Action::Roll(die(3)));
    assert_eq!(selecting.phase(), Phase::Select);
    let capture = selecting
        .legal_moves()
        .iter()
        .find(|m| m.piece == red(1))
        .unwrap();
    assert_eq!(capture.to, Position::Track(10));
    assert_eq!(capture.captures.as_slice(), &[blue(1)]);

    let next = rules.dispatch(&selecting, Action::SelectMove(capture.id));

    assert_eq!(next.position(blue(1)), Position::Yard);
    assert_eq!(next.occupants(10), &[red(1)]);
    let pending = next.bonus_pending().unwrap();
    assert_eq!(pending.kind, BonusKind::Capture);
    assert_eq!(pending.steps, 20);
    assert_eq!(pending.grantee, PlayerId::Red);
    assert!(!pending.choices.is_empty());
}

/// While a bonus is pending, rolls are ignored.
#[test]
fn test_roll_ignored_while_bonus_pending() {
    let rules = Rules::default();
    let state = layout(
        &rules,
        PlayerId::Red,
        &[
            (red(1), Position::Track(13)),
            (red(2), Position::Track(50)),
            (blue(1), Position::Track(10)),
        ],
    );
    let selecting = rules.dispatch(&state, Action::Roll(die(3)));
    let id = selecting.legal_moves().iter().find(|m| m.is_capture()).unwrap().id;
    let pending = rules.dispatch(&selecting, Action::SelectMove(id));

    assert_eq!(rules.dispatch(&pending, Action::Roll(die(5))), pending);
}

// =============================================================================
// Safe squares and blocks
// =============================================================================

/// A safe square holding two pieces takes no third, capturing or not.
#[test]
fn test_full_safe_square_rejects_landing() {
    let rules = Rules::default();
    let state = layout(
        &rules,
        PlayerId::Red,
        &[
            (red(1), Position::Track(10)),
            (blue(1), Position::Track(7)),
            (yellow(1), Position::Track(7)),
        ],
    );

    assert!(rules.legal_moves(&state, PlayerId::Red, die(3)).is_empty());
}

/// Two opponents on red's start square stop a spawn.
#[test]
fn test_full_start_square_blocks_spawn() {
    let rules = Rules::default();
    let state = layout(
        &rules,
        PlayerId::Red,
        &[(blue(1), Position::Track(14)), (yellow(1), Position::Track(14))],
    );

    assert!(rules.legal_moves(&state, PlayerId::Red, Die::SIX).is_empty());
}

/// Two red pieces on a safe square: a third red piece cannot join them.
#[test]
fn test_own_pair_on_safe_square_rejects_third() {
    let rules = Rules::default();
    let state = layout(
        &rules,
        PlayerId::Red,
        &[
            (red(1), Position::Track(7)),
            (red(2), Position::Track(7)),
            (red(3), Position::Track(10)),
        ],
    );

    let moves = rules.legal_moves(&state, PlayerId::Red, die(3));
    assert!(moves.iter().all(|m| m.piece != red(3)));
}

/// An opponent block stops every piece behind it.
#[test]
fn test_block_cannot_be_passed() {
    let rules = Rules::default();
    let state = layout(
        &rules,
        PlayerId::Red,
        &[
            (red(1), Position::Track(13)),
            (blue(1), Position::Track(12)),
            (blue(2), Position::Track(12)),
        ],
    );

    for value in 1..=6 {
        let moves = rules.legal_moves(&state, PlayerId::Red, die(value));
        assert!(moves.iter().all(|m| m.piece != red(1)));
    }
}

/// A pair on a safe square blocks just like a pair on a plain square.
#[test]
fn test_block_on_safe_square_cannot_be_passed() {
    let rules = Rules::default();
    let state = layout(
        &rules,
        PlayerId::Red,
        &[
            (red(1), Position::Track(10)),
            (blue(1), Position::Track(7)),
            (blue(2), Position::Track(7)),
        ],
    );

    assert_eq!(rules.legal_moves(&state, PlayerId::Red, die(2)).len(), 1);
    for value in 3..=6 {
        let moves = rules.legal_moves(&state, PlayerId::Red, die(value));
        assert!(
            moves.iter().all(|m| m.piece != red(1)),
            "red passed or landed on the pair with {value}"
        );
    }
}

// =============================================================================
// Home stretch and winning
// =============================================================================

/// Two short of the goal: a two finishes, a three overshoots.
#[test]
fn test_exact_roll_to_goal() {
    let rules = Rules::default();
    let state = layout(&rules, PlayerId::Red, &[(red(1), Position::Home(5))]);

    let moves = rules.legal_moves(&state, PlayerId::Red, die(2));
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].to, Position::Goal);
    assert!(moves[0].reaches_goal);

    assert!(rules.legal_moves(&state, PlayerId::Red, die(3)).is_empty());
}

/// A piece on its home-entry square turns into the home stretch.
#[test]
fn test_entry_square_leads_home() {
    let rules = Rules::default();
    let state = layout(&rules, PlayerId::Red, &[(red(1), Position::Track(16))]);

    let moves = rules.legal_moves(&state, PlayerId::Red, die(4));
    assert_eq!(moves[0].to, Position::Home(2));
}

/// The fourth piece home wins at once and the state freezes.
#[test]
fn test_last_piece_home_wins() {
    let rules = Rules::default();
    let state = layout(
        &rules,
        PlayerId::Red,
        &[
            (red(1), Position::Goal),
            (red(2), Position::Goal),
            (red(3), Position::Goal),
            (red(4), Position::Home(4)),
            (blue(1), Position::Track(40)),
        ],
    );

    let won = rules.dispatch(&state, Action::Roll(die(3)));

    assert_eq!(won.winner(), Some(PlayerId::Red));
    assert!(won.is_terminal());
    assert!(won.bonus_pending().is_none());
    assert_eq!(won.bonus_queue().count(), 0);

    for action in [
        Action::Roll(Die::SIX),
        Action::Roll(die(1)),
        Action::ApplyBonus(red(4)),
    ] {
        assert_eq!(rules.dispatch(&won, action), won);
    }
    assert_eq!(rules.advance_turn(&won), won);
    assert!(rules.legal_actions(&won).is_empty());
}

// =============================================================================
// Turn order
// =============================================================================

/// Inactive seats are skipped when the turn passes.
#[test]
fn test_turn_skips_inactive_players() {
    let rules = Rules::default();
    let config = PlayersConfig::new()
        .with_seat(PlayerId::Blue, SeatConfig::inactive())
        .with_seat(PlayerId::Green, SeatConfig::inactive());
    let state = rules.new_game(&config);
    assert_eq!(state.current_player(), PlayerId::Red);

    let next = rules.advance_turn(&state);
    assert_eq!(next.current_player(), PlayerId::Yellow);
    assert_eq!(rules.advance_turn(&next).current_player(), PlayerId::Red);

    // A plain single move also hands over straight to yellow.
    let moved = rules.dispatch(&state, Action::Roll(die(1)));
    assert_eq!(moved.position(red(1)), Position::Track(13));
    assert_eq!(moved.current_player(), PlayerId::Yellow);
}

/// Capturing keeps the turn even without a six.
#[test]
fn test_capture_grants_extra_turn() {
    let rules = Rules::default();
    let state = layout(&rules, PlayerId::Red, &[(red(1), Position::Track(13)), (blue(1), Position::Track(10))]);

    let next = rules.dispatch(&state, Action::Roll(die(3)));

    assert_eq!(next.position(blue(1)), Position::Yard);
    assert_eq!(next.current_player(), PlayerId::Red);
    assert_eq!(next.phase(), Phase::Roll);
}
