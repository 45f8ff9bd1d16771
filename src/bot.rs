use crate::card::Card;
use crate::contract::ContractLevel;
use crate::state::RoundView;

/// Interface for card-play strategies. The engine only ever hands a bot its
/// own view and the exact legal set; the bot must return one of those cards.
pub trait Bot {
    fn select_card(&mut self, view: &RoundView, legal: &[Card]) -> Card;
}

/// Interface for bidding strategies. `None` passes; a returned level must
/// outbid `current_highest` to take.
pub trait BidStrategy {
    fn propose_bid(
        &mut self,
        hand: &[Card],
        current_highest: Option<ContractLevel>,
    ) -> Option<ContractLevel>;
}

/// Interface for choosing the taker's ecart after picking up the dog.
pub trait DiscardStrategy {
    fn choose_discard(&mut self, hand: &[Card], dog_size: usize) -> Vec<Card>;
}
