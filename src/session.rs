use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::error::RoundError;
use crate::score::RoundOutcome;
use crate::state::RoundSettings;

/// What the session keeps of a finished round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_number: usize,
    pub contract: Contract,
    pub taker_team_points: f32,
    pub defense_team_points: f32,
    pub contract_won: bool,
    pub score_deltas: Vec<i64>,
}

/// Cross-round state: an ordered list of round records and a per-seat
/// cumulative leaderboard. Appending a completed round is the only
/// mutation; nothing is ever rolled back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    settings: RoundSettings,
    scores: Vec<i64>,
    rounds: Vec<RoundRecord>,
}

impl GameSession {
    pub fn new(num_players: usize) -> Result<Self, RoundError> {
        let settings = RoundSettings::new(num_players)?;
        Ok(Self {
            settings,
            scores: vec![0; num_players],
            rounds: Vec::new(),
        })
    }

    pub fn settings(&self) -> RoundSettings {
        self.settings
    }

    pub fn record_round(&mut self, outcome: &RoundOutcome) -> Result<(), RoundError> {
        if outcome.score_deltas.len() != self.settings.num_players {
            return Err(RoundError::InvalidPlayerCount(outcome.score_deltas.len()));
        }
        for (score, delta) in self.scores.iter_mut().zip(&outcome.score_deltas) {
            *score += delta;
        }
        self.rounds.push(RoundRecord {
            round_number: self.rounds.len() + 1,
            contract: outcome.contract.clone(),
            taker_team_points: outcome.taker_team_points,
            defense_team_points: outcome.defense_team_points,
            contract_won: outcome.contract_won,
            score_deltas: outcome.score_deltas.clone(),
        });
        Ok(())
    }

    /// Cumulative score per seat.
    pub fn leaderboard(&self) -> &[i64] {
        &self.scores
    }

    pub fn rounds(&self) -> &[RoundRecord] {
        &self.rounds
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }
}
