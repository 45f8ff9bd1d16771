use burn::tensor::{backend::Backend, Tensor, TensorData};

use crate::card::{Card, Suit, MAX_SUIT_RANK, TRUMP_COUNT};
use crate::state::RoundView;
use crate::trick::Lead;

/// Size of the flat action space: one slot per deck card.
pub const NUM_CARDS: usize = 78;

/// Maximum seats a round can hold; trick slots are padded to this.
pub const MAX_PLAYERS: usize = 5;

pub const HAND_FEATURES: usize = NUM_CARDS;
pub const LEGAL_FEATURES: usize = NUM_CARDS;
pub const TRICK_SLOT_FEATURES: usize = MAX_PLAYERS * NUM_CARDS;
pub const POSITION_FEATURES: usize = MAX_PLAYERS;
/// Trump-led flag, led-colour one-hot, highest-trump one-hot (0 = none).
pub const TRICK_CONTEXT_FEATURES: usize = 1 + 4 + (TRUMP_COUNT as usize + 1);
/// Taker flag, contract one-hot, oudlers in hand, round progress.
pub const GAME_CONTEXT_FEATURES: usize = 1 + 4 + 1 + 1;
pub const STATE_FEATURES: usize = HAND_FEATURES
    + LEGAL_FEATURES
    + TRICK_SLOT_FEATURES
    + POSITION_FEATURES
    + TRICK_CONTEXT_FEATURES
    + GAME_CONTEXT_FEATURES;

/// Index order inherited from the persistence/training card space: trumps
/// 1-21 first, then the Excuse, then clubs, diamonds, hearts, spades.
const SUIT_ORDER: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
const EXCUSE_INDEX: usize = TRUMP_COUNT as usize;
const SUITED_BASE: usize = EXCUSE_INDEX + 1;

/// Flat 78-slot action space: every card has a fixed index, legality is a
/// mask over the full space. This is the hook RL action masking consumes.
pub struct ActionSpace;

impl ActionSpace {
    pub const MAX: usize = NUM_CARDS;

    pub fn card_index(card: Card) -> usize {
        match card {
            Card::Trump(rank) => rank as usize - 1,
            Card::Excuse => EXCUSE_INDEX,
            Card::Suited(suit, rank) => {
                let suit_offset = SUIT_ORDER
                    .iter()
                    .position(|candidate| *candidate == suit)
                    .expect("every colour appears in the suit order");
                SUITED_BASE + suit_offset * MAX_SUIT_RANK as usize + rank as usize - 1
            }
        }
    }

    pub fn card_from_index(index: usize) -> Option<Card> {
        match index {
            0..EXCUSE_INDEX => Some(Card::Trump(index as u8 + 1)),
            EXCUSE_INDEX => Some(Card::Excuse),
            SUITED_BASE..NUM_CARDS => {
                let relative = index - SUITED_BASE;
                let suit = SUIT_ORDER[relative / MAX_SUIT_RANK as usize];
                let rank = (relative % MAX_SUIT_RANK as usize) as u8 + 1;
                Some(Card::Suited(suit, rank))
            }
            _ => None,
        }
    }

    /// Binary legality mask over the full action space.
    pub fn mask_bits(legal: &[Card]) -> [bool; NUM_CARDS] {
        let mut mask = [false; NUM_CARDS];
        for card in legal {
            mask[Self::card_index(*card)] = true;
        }
        mask
    }

    /// Additive logits mask: 0 for legal cards, a large negative value
    /// everywhere else.
    pub fn mask(legal: &[Card]) -> [f32; NUM_CARDS] {
        const NEGATIVE: f32 = -1.0e9;
        let mut mask = [NEGATIVE; NUM_CARDS];
        for card in legal {
            mask[Self::card_index(*card)] = 0.0;
        }
        mask
    }

    pub fn mask_tensor<B>(legal: &[Card]) -> Tensor<B, 2>
    where
        B: Backend,
        B::Device: Default,
    {
        let mask = Self::mask(legal);
        Tensor::<B, 2>::from_data(TensorData::from([mask]), &B::Device::default())
    }
}

/// Fixed-size feature encoding of a seat's view for neural policies.
pub struct StateEncoder;

impl StateEncoder {
    pub fn encode(view: &RoundView, legal: &[Card]) -> [f32; STATE_FEATURES] {
        let mut out = [0.0; STATE_FEATURES];
        let mut offset = 0;

        for card in &view.hand {
            out[offset + ActionSpace::card_index(*card)] = 1.0;
        }
        offset += HAND_FEATURES;

        for card in legal {
            out[offset + ActionSpace::card_index(*card)] = 1.0;
        }
        offset += LEGAL_FEATURES;

        for (slot, (_, card)) in view.current_trick.plays().iter().enumerate() {
            out[offset + slot * NUM_CARDS + ActionSpace::card_index(*card)] = 1.0;
        }
        offset += TRICK_SLOT_FEATURES;

        out[offset + view.current_trick.len().min(MAX_PLAYERS - 1)] = 1.0;
        offset += POSITION_FEATURES;

        match view.current_trick.lead() {
            Some(Lead::Trump) => out[offset] = 1.0,
            Some(Lead::Suit(suit)) => {
                let suit_offset = SUIT_ORDER
                    .iter()
                    .position(|candidate| *candidate == suit)
                    .expect("every colour appears in the suit order");
                out[offset + 1 + suit_offset] = 1.0;
            }
            None => {}
        }
        let highest = view.current_trick.highest_trump().unwrap_or(0) as usize;
        out[offset + 5 + highest] = 1.0;
        offset += TRICK_CONTEXT_FEATURES;

        out[offset] = if view.is_taker_team() { 1.0 } else { 0.0 };
        if let Some(contract) = &view.contract {
            out[offset + 1 + contract.level as usize] = 1.0;
        }
        out[offset + 5] = view.hand.iter().filter(|card| card.is_oudler()).count() as f32;
        out[offset + 6] = (view.tricks_played as f32 + 1.0) / view.settings.trick_count as f32;
        offset += GAME_CONTEXT_FEATURES;

        debug_assert_eq!(offset, STATE_FEATURES);
        out
    }

    pub fn encode_tensor<B>(view: &RoundView, legal: &[Card]) -> Tensor<B, 2>
    where
        B: Backend,
        B::Device: Default,
    {
        let features = Self::encode(view, legal);
        let data = TensorData::from([features]);
        Tensor::<B, 2>::from_data(data, &B::Device::default())
    }
}
