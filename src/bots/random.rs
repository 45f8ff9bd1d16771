use rand::seq::SliceRandom;
use rand::Rng;

use crate::bot::Bot;
use crate::card::Card;
use crate::state::RoundView;

/// Baseline bot that samples uniformly from the legal card set.
pub struct RandomBot<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomBot<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Bot for RandomBot<R> {
    fn select_card(&mut self, _view: &RoundView, legal: &[Card]) -> Card {
        legal
            .choose(&mut self.rng)
            .copied()
            .expect("at least one legal card must be available")
    }
}
