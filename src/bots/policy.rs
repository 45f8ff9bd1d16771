use burn::tensor::backend::Backend;

use crate::bot::Bot;
use crate::card::Card;
use crate::ml::{ActionSpace, PolicyNetwork};
use crate::state::RoundView;

/// Learned-policy bot backed by a Burn network. Greedy over the masked
/// logits; exploration belongs to the training harness, not the engine.
pub struct PolicyBot<B: Backend> {
    policy: PolicyNetwork<B>,
}

impl<B> PolicyBot<B>
where
    B: Backend,
    B::Device: Default,
{
    pub fn new(policy: PolicyNetwork<B>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyNetwork<B> {
        &self.policy
    }
}

impl<B> Bot for PolicyBot<B>
where
    B: Backend,
    B::Device: Default,
{
    fn select_card(&mut self, view: &RoundView, legal: &[Card]) -> Card {
        assert!(
            !legal.is_empty(),
            "policy bot requires at least one legal card"
        );
        let logits = self.policy.forward_view(view, legal);
        let values: Vec<f32> = logits
            .into_data()
            .to_vec::<f32>()
            .expect("tensor conversion");
        let mut best: Option<(f32, Card)> = None;
        for card in legal {
            let value = values[ActionSpace::card_index(*card)];
            match &mut best {
                Some((best_value, best_card)) => {
                    if value > *best_value {
                        *best_value = value;
                        *best_card = *card;
                    }
                }
                None => best = Some((value, *card)),
            }
        }
        best.map(|(_, card)| card).unwrap_or(legal[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{AuctionOutcome, ContractLevel};
    use crate::round::Round;
    use burn_ndarray::NdArray;

    #[test]
    fn selects_only_legal_cards() {
        let mut bot = PolicyBot::<NdArray<f32>>::new(PolicyNetwork::default());
        let mut round = Round::builder(4).unwrap().with_seed(13).build().unwrap();
        round
            .resolve_auction(AuctionOutcome::new(2, ContractLevel::GardeContre))
            .unwrap();
        for _ in 0..4 {
            let seat = round.current_seat();
            let view = round.view(seat).unwrap();
            let legal = round.legal_moves(seat).unwrap();
            let card = bot.select_card(&view, &legal);
            assert!(legal.contains(&card));
            round.play_card(seat, card).unwrap();
        }
        assert_eq!(round.tricks().len(), 1);
    }
}
