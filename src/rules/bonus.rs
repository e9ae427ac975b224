//! Bonus awards.
//!
//! Capturing grants a 20-step award, reaching the goal a 10-step award
//! (the finished piece itself excluded). Awards are granted only if some
//! piece could use them, queue FIFO in the order earned, and activate one
//! at a time:
//!
//! - eligibility is recomputed on activation, since earlier awards may have
//!   moved pieces;
//! - nobody eligible: the award is dropped;
//! - exactly one eligible piece: it moves at once;
//! - otherwise the award waits as `bonus_pending` for `apply_bonus`.
//!
//! A bonus move can itself capture or finish a piece, which grants further
//! awards. A win ends the chain and clears everything queued.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{BonusAward, BonusKind, BonusStatus, GameState, PieceId, PlayerId};

use super::engine::Rules;
use super::movegen;

impl Rules {
    /// Resolve the pending bonus by advancing `piece`.
    ///
    /// If the grantee is no longer the current player the award is dropped
    /// and the next queued award activates.
    #[must_use]
    pub fn apply_bonus(&self, state: &GameState, piece: PieceId) -> GameState {
        if state.winner.is_some() {
            debug!(piece = %piece, "bonus ignored: game is over");
            return state.clone();
        }
        let Some(pending) = state.bonus_pending.as_ref() else {
            debug!(piece = %piece, "bonus ignored: nothing pending");
            return state.clone();
        };

        if pending.grantee != state.current_player {
            debug!(
                id = %pending.id,
                grantee = %pending.grantee,
                current = %state.current_player,
                "bonus dropped: grantee is not the current player"
            );
            let mut next = state.clone();
            next.bonus_pending = None;
            self.activate_next_bonus(&mut next);
            return next;
        }

        if !pending.choices.contains(&piece) {
            debug!(id = %pending.id, piece = %piece, "bonus ignored: piece is not eligible");
            return state.clone();
        }

        let mut next = state.clone();
        self.resolve_bonus(&mut next, piece);
        next
    }

    /// Pieces of `grantee` that could advance `steps` right now.
    #[must_use]
    pub fn bonus_choices(
        &self,
        state: &GameState,
        grantee: PlayerId,
        steps: u16,
        exclude: Option<PieceId>,
    ) -> SmallVec<[PieceId; 4]> {
        state
            .pieces_of(grantee)
            .map(|p| p.id)
            .filter(|&id| Some(id) != exclude)
            .filter(|&id| movegen::advance_destination(self.board(), state, id, steps).is_some())
            .collect()
    }

    pub(super) fn grant_bonus(
        &self,
        next: &mut GameState,
        grantee: PlayerId,
        kind: BonusKind,
        exclude: Option<PieceId>,
    ) {
        let steps = kind.steps();
        let choices = self.bonus_choices(next, grantee, steps, exclude);
        if choices.is_empty() {
            trace!(grantee = %grantee, ?kind, "no piece can use the bonus; not granted");
            return;
        }

        let award = BonusAward {
            id: next.alloc_bonus_id(),
            grantee,
            kind,
            steps,
            choices,
            exclude,
            status: BonusStatus::Queued,
        };
        trace!(id = %award.id, grantee = %grantee, ?kind, "bonus queued");
        next.bonus_queue.push_back(award);
    }

    /// Promote queued awards until one needs a choice, the queue is empty, or
    /// the game is won.
    pub(super) fn activate_next_bonus(&self, next: &mut GameState) {
        while next.winner.is_none() && next.bonus_pending.is_none() {
            let Some(mut award) = next.bonus_queue.pop_front() else {
                return;
            };

            award.choices = self.bonus_choices(next, award.grantee, award.steps, award.exclude);
            award.status = BonusStatus::Pending;

            match award.choices.len() {
                0 => {
                    trace!(id = %award.id, "bonus dropped: no eligible piece left");
                }
                1 => {
                    let only = award.choices[0];
                    trace!(id = %award.id, piece = %only, "bonus auto-resolved");
                    next.bonus_pending = Some(award);
                    self.resolve_bonus(next, only);
                    return;
                }
                _ => {
                    trace!(id = %award.id, choices = award.choices.len(), "bonus pending");
                    next.bonus_pending = Some(award);
                }
            }
        }
    }

    fn resolve_bonus(&self, next: &mut GameState, piece: PieceId) {
        let Some(award) = next.bonus_pending.take() else {
            return;
        };

        match movegen::advance_destination(self.board(), next, piece, award.steps) {
            None => {
                debug!(id = %award.id, piece = %piece, "bonus advance no longer legal; dropped");
            }
            Some(to) => {
                let captures = self.relocate(next, piece, to);
                if self.check_winner(next, award.grantee) {
                    return;
                }
                if !captures.is_empty() {
                    self.grant_bonus(next, award.grantee, BonusKind::Capture, None);
                }
                if to.is_goal() {
                    self.grant_bonus(next, award.grantee, BonusKind::Goal, Some(piece));
                }
            }
        }

        self.activate_next_bonus(next);
        debug_assert_eq!(next.check_invariants(self.board()), Ok(()));
    }
}
