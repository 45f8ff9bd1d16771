use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::card::{full_deck, validate_deck, Card, DECK_SIZE};
use crate::error::RoundError;

/// Cards dealt to each player in one go. Tarot tradition deals in packets
/// of three.
const PACKET: usize = 3;

/// A full partition of the deck into hands plus the dog.
#[derive(Clone, Debug, PartialEq)]
pub struct Deal {
    pub hands: Vec<Vec<Card>>,
    pub dog: Vec<Card>,
}

pub fn dog_size(num_players: usize) -> Result<usize, RoundError> {
    match num_players {
        3 | 4 => Ok(6),
        5 => Ok(3),
        other => Err(RoundError::InvalidPlayerCount(other)),
    }
}

pub fn hand_size(num_players: usize) -> Result<usize, RoundError> {
    Ok((DECK_SIZE - dog_size(num_players)?) / num_players)
}

/// Number of tricks in a round equals the hand size: 24 / 18 / 15.
pub fn tricks_per_round(num_players: usize) -> Result<usize, RoundError> {
    hand_size(num_players)
}

/// Shuffles a fresh deck with the caller's RNG and partitions it. The RNG is
/// the only source of randomness, so a seeded `StdRng` reproduces the deal.
pub fn deal(num_players: usize, rng: &mut StdRng) -> Result<Deal, RoundError> {
    let mut deck = full_deck();
    deck.shuffle(rng);
    deal_from_deck(num_players, deck)
}

/// Partitions an explicit deck order: the dog comes off the top, then hands
/// are dealt three cards at a time around the table. Rejects anything that
/// is not a complete 78-card deck.
pub fn deal_from_deck(num_players: usize, deck: Vec<Card>) -> Result<Deal, RoundError> {
    let dog_size = dog_size(num_players)?;
    validate_deck(&deck)?;

    let mut rest = deck;
    let dog: Vec<Card> = rest.drain(..dog_size).collect();
    let mut hands = vec![Vec::with_capacity(hand_size(num_players)?); num_players];
    let mut seat = 0;
    for packet in rest.chunks(PACKET) {
        hands[seat].extend_from_slice(packet);
        seat = (seat + 1) % num_players;
    }
    for hand in &mut hands {
        hand.sort();
    }
    Ok(Deal { hands, dog })
}
