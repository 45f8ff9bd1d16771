use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::RoundError;

/// Zero-based seat index within the round.
pub type Seat = usize;

/// Contract levels in auction order; a later level outbids an earlier one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum ContractLevel {
    Petite,
    Garde,
    GardeSans,
    GardeContre,
}

impl ContractLevel {
    pub const ALL: [ContractLevel; 4] = [
        ContractLevel::Petite,
        ContractLevel::Garde,
        ContractLevel::GardeSans,
        ContractLevel::GardeContre,
    ];

    /// Score multiplier per the canonical table.
    pub fn multiplier(&self) -> i64 {
        match self {
            ContractLevel::Petite => 1,
            ContractLevel::Garde => 2,
            ContractLevel::GardeSans => 4,
            ContractLevel::GardeContre => 6,
        }
    }

    /// Whether the taker picks up the dog and returns an ecart.
    pub fn taker_sees_dog(&self) -> bool {
        matches!(self, ContractLevel::Petite | ContractLevel::Garde)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractLevel::Petite => "petite",
            ContractLevel::Garde => "garde",
            ContractLevel::GardeSans => "garde_sans",
            ContractLevel::GardeContre => "garde_contre",
        }
    }
}

impl fmt::Display for ContractLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractLevel {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "petite" => Ok(ContractLevel::Petite),
            "garde" => Ok(ContractLevel::Garde),
            "garde_sans" => Ok(ContractLevel::GardeSans),
            "garde_contre" => Ok(ContractLevel::GardeContre),
            _ => Err(RoundError::InvalidContract("unknown contract level")),
        }
    }
}

/// Result of the auction, supplied by the bidding collaborator. The engine
/// validates and consumes it, it never produces one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuctionOutcome {
    pub taker: Seat,
    pub level: ContractLevel,
    /// Partner called by the taker, five-player variant only.
    pub called_partner: Option<Seat>,
}

impl AuctionOutcome {
    pub fn new(taker: Seat, level: ContractLevel) -> Self {
        Self {
            taker,
            level,
            called_partner: None,
        }
    }

    pub fn with_partner(mut self, partner: Seat) -> Self {
        self.called_partner = Some(partner);
        self
    }

    pub fn validate(&self, num_players: usize) -> Result<(), RoundError> {
        if self.taker >= num_players {
            return Err(RoundError::InvalidContract("taker seat does not exist"));
        }
        match self.called_partner {
            Some(_) if num_players != 5 => Err(RoundError::InvalidContract(
                "called partners only exist in five-player games",
            )),
            Some(partner) if partner >= num_players => {
                Err(RoundError::InvalidContract("called partner seat does not exist"))
            }
            Some(partner) if partner == self.taker => {
                Err(RoundError::InvalidContract("the taker cannot call themself"))
            }
            _ => Ok(()),
        }
    }
}

/// Resolved contract: teams are fixed for the rest of the round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub taker: Seat,
    pub level: ContractLevel,
    pub called_partner: Option<Seat>,
    /// Oudlers held by the taker side once the dog is resolved.
    pub oudlers: u8,
    pub points_needed: f32,
}

impl Contract {
    pub fn new(outcome: AuctionOutcome, oudlers: u8) -> Self {
        Self {
            taker: outcome.taker,
            level: outcome.level,
            called_partner: outcome.called_partner,
            oudlers,
            points_needed: points_needed(oudlers),
        }
    }

    /// Whether a seat plays for the taker side. The called partner keeps
    /// their own hand and plays independently, but scores with the taker.
    pub fn is_taker_team(&self, seat: Seat) -> bool {
        seat == self.taker || self.called_partner == Some(seat)
    }

    pub fn defender_count(&self, num_players: usize) -> usize {
        (0..num_players).filter(|&seat| !self.is_taker_team(seat)).count()
    }
}

/// Point threshold the taker side must reach, by oudlers held: the more
/// oudlers the taker side retains, the higher the bar.
pub fn points_needed(oudlers: u8) -> f32 {
    match oudlers {
        0 => 36.0,
        1 => 41.0,
        2 => 51.0,
        _ => 56.0,
    }
}

pub fn count_oudlers(cards: &[Card]) -> u8 {
    cards.iter().filter(|card| card.is_oudler()).count() as u8
}
