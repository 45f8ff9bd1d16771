use crate::bot::BidStrategy;
use crate::card::Card;
use crate::contract::ContractLevel;

/// Bids from hand strength measured against a 51-point reference
/// threshold: petite from 40%, garde from 60%, garde sans from 80%, garde
/// contre from 95%. Only bids when it can outbid the current highest.
pub struct PointBasedBidding;

const BASE_CONTRACT_POINTS: f32 = 51.0;

impl PointBasedBidding {
    pub fn new() -> Self {
        Self
    }

    fn desired_bid(hand_points: f32) -> Option<ContractLevel> {
        let percentage = hand_points / BASE_CONTRACT_POINTS * 100.0;
        if percentage >= 95.0 {
            Some(ContractLevel::GardeContre)
        } else if percentage >= 80.0 {
            Some(ContractLevel::GardeSans)
        } else if percentage >= 60.0 {
            Some(ContractLevel::Garde)
        } else if percentage >= 40.0 {
            Some(ContractLevel::Petite)
        } else {
            None
        }
    }
}

impl Default for PointBasedBidding {
    fn default() -> Self {
        Self::new()
    }
}

impl BidStrategy for PointBasedBidding {
    fn propose_bid(
        &mut self,
        hand: &[Card],
        current_highest: Option<ContractLevel>,
    ) -> Option<ContractLevel> {
        let hand_points: f32 = hand.iter().map(Card::points).sum();
        let desired = Self::desired_bid(hand_points)?;
        match current_highest {
            Some(highest) if desired <= highest => None,
            _ => Some(desired),
        }
    }
}

/// Baseline strategy that never takes.
pub struct PassBidding;

impl BidStrategy for PassBidding {
    fn propose_bid(
        &mut self,
        _hand: &[Card],
        _current_highest: Option<ContractLevel>,
    ) -> Option<ContractLevel> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    /// A hand stacked with the requested court cards; every rank comes once
    /// per suit so the hand stays duplicate-free.
    fn court_hand(kings: usize, queens: usize, knights: usize) -> Vec<Card> {
        let mut hand = Vec::new();
        for (count, rank) in [(kings, 14u8), (queens, 13), (knights, 12)] {
            for suit in crate::card::SUITS.into_iter().take(count) {
                hand.push(Card::Suited(suit, rank));
            }
        }
        hand
    }

    #[test]
    fn weak_hands_pass() {
        let mut strategy = PointBasedBidding::new();
        let hand = vec![Card::Suited(Suit::Hearts, 2), Card::Suited(Suit::Clubs, 3)];
        assert_eq!(strategy.propose_bid(&hand, None), None);
    }

    #[test]
    fn stronger_hands_escalate() {
        let mut strategy = PointBasedBidding::new();
        // 4 kings + a queen = 22.0 points, 43% of the base contract.
        assert_eq!(
            strategy.propose_bid(&court_hand(4, 1, 0), None),
            Some(ContractLevel::Petite)
        );
        // 4 kings + 4 queens = 32.0 points, 62%.
        assert_eq!(
            strategy.propose_bid(&court_hand(4, 4, 0), None),
            Some(ContractLevel::Garde)
        );
        // Full court = 42.0 points, 82%.
        assert_eq!(
            strategy.propose_bid(&court_hand(4, 4, 4), None),
            Some(ContractLevel::GardeSans)
        );
    }

    #[test]
    fn never_underbids_the_table() {
        let mut strategy = PointBasedBidding::new();
        assert_eq!(
            strategy.propose_bid(&court_hand(4, 1, 0), Some(ContractLevel::Garde)),
            None
        );
        assert_eq!(
            strategy.propose_bid(&court_hand(4, 4, 4), Some(ContractLevel::Garde)),
            Some(ContractLevel::GardeSans)
        );
    }
}
