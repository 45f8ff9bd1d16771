use serde::{Deserialize, Serialize};

use crate::card::{Card, Suit};
use crate::contract::Seat;

/// What the first non-Excuse card of a trick demands from the other seats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Lead {
    Suit(Suit),
    Trump,
}

/// One trick in progress: the ordered `(seat, card)` plays of the current
/// turn-cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trick {
    plays: Vec<(Seat, Card)>,
}

impl Trick {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> &[(Seat, Card)] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn leader(&self) -> Option<Seat> {
        self.plays.first().map(|(seat, _)| *seat)
    }

    pub(crate) fn push(&mut self, seat: Seat, card: Card) {
        self.plays.push((seat, card));
    }

    /// The demanded lead. `None` while the trick is empty or only the Excuse
    /// has been played.
    pub fn lead(&self) -> Option<Lead> {
        self.plays.iter().find_map(|(_, card)| match card {
            Card::Excuse => None,
            Card::Trump(_) => Some(Lead::Trump),
            Card::Suited(suit, _) => Some(Lead::Suit(*suit)),
        })
    }

    /// Highest trump rank played so far.
    pub fn highest_trump(&self) -> Option<u8> {
        self.plays
            .iter()
            .filter_map(|(_, card)| match card {
                Card::Trump(rank) => Some(*rank),
                _ => None,
            })
            .max()
    }

    /// Sum of card points in the trick.
    pub fn points(&self) -> f32 {
        self.plays.iter().map(|(_, card)| card.points()).sum()
    }

    /// Seat holding the strongest card under the led-suit/trump ordering.
    /// The Excuse is excluded from winning consideration.
    pub fn winner(&self) -> Option<Seat> {
        let contenders: Vec<&(Seat, Card)> = self
            .plays
            .iter()
            .filter(|(_, card)| !card.is_excuse())
            .collect();
        let Some((first_seat, first_card)) = contenders.first() else {
            // Degenerate trick with nothing but the Excuse: the leader keeps it.
            return self.leader();
        };

        if self.highest_trump().is_some() {
            return contenders
                .iter()
                .filter(|(_, card)| card.is_trump())
                .max_by_key(|(_, card)| card.rank())
                .map(|(seat, _)| *seat);
        }
        let lead_suit = first_card.suit()?;
        contenders
            .iter()
            .filter(|(_, card)| card.suit() == Some(lead_suit))
            .max_by_key(|(_, card)| card.rank())
            .map(|(seat, _)| *seat)
            .or(Some(*first_seat))
    }

    /// Cards a player may legally play into this trick.
    ///
    /// Leading allows anything. Following demands the led colour; a void
    /// hand must trump, and must overtrump the highest trump already played
    /// when able (under-trumping only when not). The same overtrump
    /// obligation applies on a trump lead. The Excuse is always legal.
    pub fn legal_moves(&self, hand: &[Card]) -> Vec<Card> {
        if hand.is_empty() {
            return Vec::new();
        }
        let lead = match self.lead() {
            Some(lead) if !self.is_empty() => lead,
            // Leading, or only the Excuse on the table: free choice.
            _ => return hand.to_vec(),
        };

        let excuse: Vec<Card> = hand.iter().copied().filter(Card::is_excuse).collect();
        let trumps: Vec<Card> = hand.iter().copied().filter(Card::is_trump).collect();

        if let Lead::Suit(suit) = lead {
            let same_suit: Vec<Card> = hand
                .iter()
                .copied()
                .filter(|card| card.suit() == Some(suit))
                .collect();
            if !same_suit.is_empty() {
                return with_excuse(same_suit, excuse);
            }
        }
        if trumps.is_empty() {
            // Void in the led colour and out of trumps: free discard.
            return hand.to_vec();
        }
        if let Some(highest) = self.highest_trump() {
            let higher: Vec<Card> = trumps
                .iter()
                .copied()
                .filter(|card| card.rank() > highest)
                .collect();
            if !higher.is_empty() {
                return with_excuse(higher, excuse);
            }
        }
        with_excuse(trumps, excuse)
    }
}

fn with_excuse(mut cards: Vec<Card>, excuse: Vec<Card>) -> Vec<Card> {
    cards.extend(excuse);
    cards
}

/// A trick once all seats have played; immutable from here on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrick {
    pub plays: Vec<(Seat, Card)>,
    pub winner: Seat,
    pub points: f32,
}

impl ClosedTrick {
    pub(crate) fn close(trick: Trick) -> Option<Self> {
        let winner = trick.winner()?;
        let points = trick.points();
        Some(Self {
            plays: trick.plays,
            winner,
            points,
        })
    }

    pub fn contains(&self, card: Card) -> bool {
        self.plays.iter().any(|(_, played)| *played == card)
    }

    pub fn seat_of(&self, card: Card) -> Option<Seat> {
        self.plays
            .iter()
            .find(|(_, played)| *played == card)
            .map(|(seat, _)| *seat)
    }
}
