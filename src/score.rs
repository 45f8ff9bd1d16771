//! Round scoring: team totals, contract verdict and per-seat deltas.
//!
//! Base score = |taker points - threshold|, truncated to whole points, then
//! multiplied by the contract level (petite x1, garde x2, garde sans x4,
//! garde contre x6). Petit au bout moves 10 points (times the multiplier)
//! toward the side that wins the final trick when the Petit is in it.
//! Deltas are zero-sum: each defender gains or loses the score once; the
//! taker balances them, with a called partner taking one of the taker's
//! shares.

use serde::{Deserialize, Serialize};

use crate::card::{Card, TOTAL_CARD_POINTS};
use crate::contract::{Contract, ContractLevel, Seat};
use crate::error::RoundError;
use crate::state::RoundSettings;
use crate::trick::ClosedTrick;

/// Which side a scoring event credits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TeamSide {
    Taker,
    Defense,
}

/// Final accounting of a completed round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub contract: Contract,
    pub taker_team_points: f32,
    pub defense_team_points: f32,
    pub contract_won: bool,
    /// Side that took the last trick with the Petit in it, when it happened.
    pub petit_au_bout: Option<TeamSide>,
    /// Signed score movement per seat; sums to zero.
    pub score_deltas: Vec<i64>,
}

/// Computes the outcome of a finished round from its closed tricks and the
/// side the dog fell to.
pub fn score_round(
    settings: &RoundSettings,
    contract: &Contract,
    tricks: &[ClosedTrick],
    dog: &[Card],
) -> Result<RoundOutcome, RoundError> {
    let side_of = |seat: Seat| {
        if contract.is_taker_team(seat) {
            TeamSide::Taker
        } else {
            TeamSide::Defense
        }
    };

    let mut taker_points = 0.0f32;
    let mut defense_points = 0.0f32;
    let mut credit = |side: TeamSide, points: f32| match side {
        TeamSide::Taker => taker_points += points,
        TeamSide::Defense => defense_points += points,
    };

    let last = tricks.len().saturating_sub(1);
    for (index, trick) in tricks.iter().enumerate() {
        let winner_side = side_of(trick.winner);
        credit(winner_side, trick.points);
        // The Excuse stays with its owner's side against a half-point chip,
        // unless it fell on the final trick.
        if index < last {
            if let Some(owner) = trick.seat_of(Card::Excuse) {
                let owner_side = side_of(owner);
                if owner_side != winner_side {
                    let restitution = Card::Excuse.points() - 0.5;
                    credit(winner_side, -restitution);
                    credit(owner_side, restitution);
                }
            }
        }
    }

    let dog_points: f32 = dog.iter().map(Card::points).sum();
    let dog_side = match contract.level {
        ContractLevel::GardeContre => TeamSide::Defense,
        _ => TeamSide::Taker,
    };
    credit(dog_side, dog_points);

    if taker_points + defense_points != TOTAL_CARD_POINTS {
        return Err(RoundError::InconsistentPoints {
            taker: taker_points,
            defense: defense_points,
        });
    }

    let petit_au_bout = tricks
        .last()
        .filter(|trick| trick.contains(Card::Trump(1)))
        .map(|trick| side_of(trick.winner));

    let margin = taker_points - contract.points_needed;
    let contract_won = margin >= 0.0;
    let multiplier = contract.level.multiplier();
    let magnitude = margin.abs() as i64 * multiplier;
    let bout_bonus = match petit_au_bout {
        Some(TeamSide::Taker) => 10 * multiplier,
        Some(TeamSide::Defense) => -10 * multiplier,
        None => 0,
    };
    let taker_score = if contract_won { magnitude } else { -magnitude } + bout_bonus;

    let score_deltas = split_deltas(settings.num_players, contract, taker_score);

    Ok(RoundOutcome {
        contract: contract.clone(),
        taker_team_points: taker_points,
        defense_team_points: defense_points,
        contract_won,
        petit_au_bout,
        score_deltas,
    })
}

/// Zero-sum split: every defender moves by the score once; the taker
/// balances them, handing one share to the called partner when there is one.
fn split_deltas(num_players: usize, contract: &Contract, taker_score: i64) -> Vec<i64> {
    let defenders = contract.defender_count(num_players) as i64;
    let partner_share = i64::from(contract.called_partner.is_some());
    (0..num_players)
        .map(|seat| {
            if seat == contract.taker {
                taker_score * (defenders - partner_share)
            } else if contract.called_partner == Some(seat) {
                taker_score * partner_share
            } else {
                -taker_score
            }
        })
        .collect()
}
