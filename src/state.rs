use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::contract::{Contract, Seat};
use crate::deal::{dog_size, hand_size, tricks_per_round};
use crate::error::RoundError;
use crate::trick::Trick;

/// Fixed parameters of a running round.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSettings {
    pub num_players: usize,
    pub hand_size: usize,
    pub dog_size: usize,
    pub trick_count: usize,
}

impl RoundSettings {
    pub fn new(num_players: usize) -> Result<Self, RoundError> {
        Ok(Self {
            num_players,
            hand_size: hand_size(num_players)?,
            dog_size: dog_size(num_players)?,
            trick_count: tricks_per_round(num_players)?,
        })
    }
}

/// Coarse lifecycle of a round.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoundStatus {
    AwaitingAuction,
    AwaitingDiscard,
    Playing,
    Complete,
}

/// Fine-grained turn state while cards are being played.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingLead,
    AwaitingFollow { position: usize },
    RoundComplete,
}

/// Portion of a seat's state every other seat may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPublicState {
    pub seat: Seat,
    pub cards_left: usize,
    pub tricks_won: usize,
    pub is_taker: bool,
    pub is_current: bool,
}

/// Round state as seen from one seat, tailored for bots and ML agents.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundView {
    pub settings: RoundSettings,
    pub status: RoundStatus,
    pub self_seat: Seat,
    pub current_seat: Seat,
    pub contract: Option<Contract>,
    pub hand: Vec<Card>,
    pub current_trick: Trick,
    pub players: Vec<PlayerPublicState>,
    pub tricks_played: usize,
}

impl RoundView {
    pub fn is_taker_team(&self) -> bool {
        self.contract
            .as_ref()
            .is_some_and(|contract| contract.is_taker_team(self.self_seat))
    }
}

/// One card of a persisted trick record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayedCard {
    pub seat: Seat,
    pub card: String,
    pub position: usize,
}

/// Persistence-shaped record of a closed trick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrickRecord {
    pub trick_number: usize,
    pub cards_played: Vec<PlayedCard>,
    pub winner_seat: Seat,
    pub trick_points: f32,
}

/// Full round snapshot matching the external `game_rounds`/`tricks` field
/// shapes. Cards are carried in the textual encoding so the snapshot
/// round-trips through JSON storage unchanged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RoundSnapshot {
    pub num_players: usize,
    pub taker_seat: Seat,
    pub contract_type: String,
    pub called_seat: Option<Seat>,
    pub dog_cards: Vec<String>,
    pub initial_hands: Vec<Vec<String>>,
    pub hand_strengths: Vec<f32>,
    pub contract_points_needed: f32,
    pub taker_team_points: f32,
    pub defense_team_points: f32,
    pub contract_won: bool,
    pub tricks: Vec<TrickRecord>,
}

impl RoundSnapshot {
    /// Canonical byte encoding; identical rounds encode to identical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .expect("round snapshots always encode")
    }
}
