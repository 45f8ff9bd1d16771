use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseCardError, RoundError};

/// The four ordinary colours of the Tarot deck. Trumps and the Excuse are
/// modelled as their own [`Card`] variants rather than as suits.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Spades,
    Diamonds,
    Clubs,
}

pub const SUITS: [Suit; 4] = [Suit::Hearts, Suit::Spades, Suit::Diamonds, Suit::Clubs];

impl Suit {
    /// Two-letter code used by the textual card encoding.
    pub fn code(&self) -> &'static str {
        match self {
            Suit::Hearts => "co",
            Suit::Spades => "pi",
            Suit::Diamonds => "ca",
            Suit::Clubs => "tr",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "co" => Some(Suit::Hearts),
            "pi" => Some(Suit::Spades),
            "ca" => Some(Suit::Diamonds),
            "tr" => Some(Suit::Clubs),
            _ => None,
        }
    }
}

/// Representation of a Tarot card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Card {
    /// Colour card: rank 1 (ace) through 14 (king).
    Suited(Suit, u8),
    /// Trump card: rank 1 (the Petit) through 21.
    Trump(u8),
    /// The Excuse. Exempt from follow rules, never wins a trick.
    Excuse,
}

pub const DECK_SIZE: usize = 78;
pub const TRUMP_COUNT: u8 = 21;
pub const MAX_SUIT_RANK: u8 = 14;
pub const RANK_JACK: u8 = 11;
pub const RANK_KNIGHT: u8 = 12;
pub const RANK_QUEEN: u8 = 13;
pub const RANK_KING: u8 = 14;

/// Sum of `points()` over the full deck. Every card value is a multiple of
/// 0.5, so f32 sums over the deck are exact.
pub const TOTAL_CARD_POINTS: f32 = 91.0;

impl Card {
    #[inline]
    pub fn is_trump(&self) -> bool {
        matches!(self, Card::Trump(_))
    }

    #[inline]
    pub fn is_excuse(&self) -> bool {
        matches!(self, Card::Excuse)
    }

    /// The three oudlers: Excuse, Petit (trump 1) and trump 21.
    #[inline]
    pub fn is_oudler(&self) -> bool {
        matches!(self, Card::Excuse | Card::Trump(1) | Card::Trump(TRUMP_COUNT))
    }

    /// Colour of the card, when it has one.
    #[inline]
    pub fn suit(&self) -> Option<Suit> {
        match self {
            Card::Suited(suit, _) => Some(*suit),
            _ => None,
        }
    }

    /// Numeric rank used for trick comparison. The Excuse compares as 0.
    #[inline]
    pub fn rank(&self) -> u8 {
        match self {
            Card::Suited(_, rank) | Card::Trump(rank) => *rank,
            Card::Excuse => 0,
        }
    }

    /// Point value per the standard counting table.
    pub fn points(&self) -> f32 {
        match self {
            Card::Excuse => 4.5,
            Card::Trump(rank) if *rank == 1 || *rank == TRUMP_COUNT => 4.5,
            Card::Trump(_) => 0.5,
            Card::Suited(_, RANK_KING) => 4.5,
            Card::Suited(_, RANK_QUEEN) => 3.5,
            Card::Suited(_, RANK_KNIGHT) => 2.5,
            Card::Suited(_, RANK_JACK) => 1.5,
            Card::Suited(_, _) => 0.5,
        }
    }
}

/// Hand-sorting order: Excuse lowest, then colours grouped by suit, trumps on
/// top. This is a display/bookkeeping order, not the trick-taking order.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        fn key(card: &Card) -> (u8, u8, u8) {
            match card {
                Card::Excuse => (0, 0, 0),
                Card::Suited(suit, rank) => (1, *suit as u8, *rank),
                Card::Trump(rank) => (2, 0, *rank),
            }
        }
        key(self).cmp(&key(other))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Textual encoding shared with persistence and logging: `"(co,14)"` is the
/// king of hearts, `"(at,21)"` the 21 of trump, `"(ex,0)"` the Excuse.
impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Suited(suit, rank) => write!(f, "({},{})", suit.code(), rank),
            Card::Trump(rank) => write!(f, "(at,{rank})"),
            Card::Excuse => write!(f, "(ex,0)"),
        }
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCardError(s.to_string());
        let inner = s
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let (code, rank) = inner.split_once(',').ok_or_else(err)?;
        let rank: u8 = rank.trim().parse().map_err(|_| err())?;
        match code.trim() {
            "ex" if rank == 0 => Ok(Card::Excuse),
            "at" if (1..=TRUMP_COUNT).contains(&rank) => Ok(Card::Trump(rank)),
            code => {
                let suit = Suit::from_code(code).ok_or_else(err)?;
                if (1..=MAX_SUIT_RANK).contains(&rank) {
                    Ok(Card::Suited(suit, rank))
                } else {
                    Err(err())
                }
            }
        }
    }
}

/// Builds the full 78-card deck in deterministic order (unshuffled): colours
/// first, then trumps 1-21, then the Excuse.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in SUITS {
        for rank in 1..=MAX_SUIT_RANK {
            deck.push(Card::Suited(suit, rank));
        }
    }
    for rank in 1..=TRUMP_COUNT {
        deck.push(Card::Trump(rank));
    }
    deck.push(Card::Excuse);
    deck
}

/// Rejects anything that is not a complete, duplicate-free deck.
pub fn validate_deck(cards: &[Card]) -> Result<(), RoundError> {
    if cards.len() != DECK_SIZE {
        return Err(RoundError::InvalidDeck);
    }
    let mut sorted: Vec<Card> = cards.to_vec();
    sorted.sort();
    sorted.dedup();
    if sorted.len() != DECK_SIZE {
        return Err(RoundError::InvalidDeck);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_deck_is_complete_and_unique() {
        let deck = full_deck();
        assert_eq!(deck.len(), DECK_SIZE);
        validate_deck(&deck).expect("canonical deck must validate");
    }

    #[test]
    fn deck_points_sum_to_pool() {
        let total: f32 = full_deck().iter().map(Card::points).sum();
        assert_eq!(total, TOTAL_CARD_POINTS);
    }

    #[test]
    fn oudlers_are_exactly_three() {
        let oudlers: Vec<Card> = full_deck().into_iter().filter(Card::is_oudler).collect();
        assert_eq!(
            oudlers,
            vec![Card::Trump(1), Card::Trump(21), Card::Excuse]
        );
        assert!(oudlers.iter().all(|card| card.points() == 4.5));
    }

    #[test]
    fn text_codec_round_trips() {
        for card in full_deck() {
            let text = card.to_string();
            let parsed: Card = text.parse().expect("encoded card must parse");
            assert_eq!(parsed, card);
            assert_eq!(parsed.to_string(), text);
        }
    }

    #[test]
    fn king_of_hearts_encoding() {
        let card: Card = "(co,14)".parse().expect("king of hearts");
        assert_eq!(card, Card::Suited(Suit::Hearts, RANK_KING));
        assert_eq!(card.to_string(), "(co,14)");
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["co,14", "(co,15)", "(at,22)", "(at,0)", "(ex,1)", "(xx,3)", "(co,)"] {
            assert!(text.parse::<Card>().is_err(), "{text} should not parse");
        }
    }

    #[test]
    fn rejects_short_and_duplicated_decks() {
        let mut deck = full_deck();
        deck.pop();
        assert!(matches!(validate_deck(&deck), Err(RoundError::InvalidDeck)));
        deck.push(Card::Excuse);
        assert!(matches!(validate_deck(&deck), Err(RoundError::InvalidDeck)));
    }

    #[test]
    fn hand_order_groups_suits_below_trumps() {
        let mut cards = vec![
            Card::Trump(3),
            Card::Suited(Suit::Clubs, 2),
            Card::Excuse,
            Card::Suited(Suit::Hearts, RANK_KING),
        ];
        cards.sort();
        assert_eq!(
            cards,
            vec![
                Card::Excuse,
                Card::Suited(Suit::Hearts, RANK_KING),
                Card::Suited(Suit::Clubs, 2),
                Card::Trump(3),
            ]
        );
    }
}
