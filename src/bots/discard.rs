use rand::seq::SliceRandom;
use rand::Rng;

use crate::bot::DiscardStrategy;
use crate::card::{Card, RANK_KING};

fn is_plain_discard(card: &Card) -> bool {
    matches!(card, Card::Suited(_, rank) if *rank != RANK_KING)
}

/// Pads a short ecart with the cheapest non-oudler trumps, the only case
/// where trumps may legally go down.
fn pad_with_trumps(hand: &[Card], ecart: &mut Vec<Card>, dog_size: usize) {
    let mut trumps: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|card| card.is_trump() && !card.is_oudler())
        .collect();
    trumps.sort_by_key(Card::rank);
    for trump in trumps {
        if ecart.len() == dog_size {
            break;
        }
        ecart.push(trump);
    }
}

/// Buries as many points as possible: highest-value queens, knights and
/// jacks first. Kings, oudlers and (while avoidable) trumps stay in hand.
pub struct MaxPointsDiscard;

impl DiscardStrategy for MaxPointsDiscard {
    fn choose_discard(&mut self, hand: &[Card], dog_size: usize) -> Vec<Card> {
        let mut discardable: Vec<Card> = hand.iter().copied().filter(is_plain_discard).collect();
        discardable.sort_by(|a, b| {
            b.points()
                .partial_cmp(&a.points())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.rank().cmp(&a.rank()))
        });
        let mut ecart: Vec<Card> = discardable.into_iter().take(dog_size).collect();
        if ecart.len() < dog_size {
            pad_with_trumps(hand, &mut ecart, dog_size);
        }
        ecart
    }
}

/// Uniformly random legal ecart, for baselines and shuffled playouts.
pub struct RandomDiscard<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomDiscard<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DiscardStrategy for RandomDiscard<R> {
    fn choose_discard(&mut self, hand: &[Card], dog_size: usize) -> Vec<Card> {
        let mut discardable: Vec<Card> = hand.iter().copied().filter(is_plain_discard).collect();
        discardable.shuffle(&mut self.rng);
        let mut ecart: Vec<Card> = discardable.into_iter().take(dog_size).collect();
        if ecart.len() < dog_size {
            pad_with_trumps(hand, &mut ecart, dog_size);
        }
        ecart
    }
}
