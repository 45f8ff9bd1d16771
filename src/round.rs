use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::card::{Card, RANK_KING};
use crate::contract::{count_oudlers, AuctionOutcome, Contract, ContractLevel, Seat};
use crate::deal::{deal, deal_from_deck, Deal};
use crate::error::{IllegalMove, RoundError};
use crate::score::{score_round, RoundOutcome};
use crate::state::{
    PlayedCard, PlayerPublicState, RoundSettings, RoundSnapshot, RoundStatus, RoundView,
    TrickRecord, TurnPhase,
};
use crate::trick::{ClosedTrick, Lead, Trick};

const DEFAULT_SEED: u64 = 0x7A40_7B07_5EED_0001;

/// Configuration required to bootstrap a round.
#[derive(Clone, Copy, Debug)]
pub struct RoundConfig {
    pub num_players: usize,
    pub seed: u64,
}

impl RoundConfig {
    pub fn new(num_players: usize, seed: u64) -> Result<Self, RoundError> {
        RoundSettings::new(num_players)?;
        Ok(Self { num_players, seed })
    }
}

/// Builder that enables deterministic deck or deal injection for tests and
/// RL experiments.
pub struct RoundBuilder {
    config: RoundConfig,
    deck: Option<Vec<Card>>,
    deal: Option<Deal>,
}

impl RoundBuilder {
    pub fn new(num_players: usize) -> Result<Self, RoundError> {
        Ok(Self {
            config: RoundConfig::new(num_players, DEFAULT_SEED)?,
            deck: None,
            deal: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Deal from an explicit deck order instead of shuffling.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Use a pre-partitioned deal. The hands and dog must still repartition
    /// the full deck.
    pub fn with_deal(mut self, hands: Vec<Vec<Card>>, dog: Vec<Card>) -> Self {
        self.deal = Some(Deal { hands, dog });
        self
    }

    pub fn build(self) -> Result<Round, RoundError> {
        Round::from_builder(self)
    }
}

/// What a successful `play_card` did to the trick in progress.
#[derive(Clone, Debug, PartialEq)]
pub enum TrickOutcome {
    /// The trick is still open; play passes to the next seat.
    Pending { next_seat: Seat },
    /// The trick closed; the winner leads next unless the round ended.
    Closed {
        winner: Seat,
        points: f32,
        round_complete: bool,
    },
}

/// One round of Tarot: an owned value with no external aliases, safe to run
/// in parallel with other rounds. Randomness enters only through the seed.
pub struct Round {
    settings: RoundSettings,
    status: RoundStatus,
    initial_hands: Vec<Vec<Card>>,
    hands: Vec<Vec<Card>>,
    /// The dog as dealt; revealed per the contract's visibility rule.
    dealt_dog: Vec<Card>,
    /// Cards currently set aside: the dealt dog until the taker's ecart
    /// replaces it under petite and garde.
    dog: Vec<Card>,
    contract: Option<Contract>,
    current_trick: Trick,
    closed_tricks: Vec<ClosedTrick>,
    current_seat: Seat,
}

impl Round {
    pub fn builder(num_players: usize) -> Result<RoundBuilder, RoundError> {
        RoundBuilder::new(num_players)
    }

    fn from_builder(builder: RoundBuilder) -> Result<Self, RoundError> {
        let RoundBuilder { config, deck, deal: injected } = builder;
        let settings = RoundSettings::new(config.num_players)?;
        let deal = if let Some(deal) = injected {
            let mut all: Vec<Card> = deal.dog.clone();
            if deal.hands.len() != settings.num_players
                || deal.dog.len() != settings.dog_size
                || deal.hands.iter().any(|hand| hand.len() != settings.hand_size)
            {
                return Err(RoundError::InvalidDeck);
            }
            for hand in &deal.hands {
                all.extend_from_slice(hand);
            }
            crate::card::validate_deck(&all)?;
            deal
        } else if let Some(deck) = deck {
            deal_from_deck(settings.num_players, deck)?
        } else {
            let mut rng = StdRng::seed_from_u64(config.seed);
            deal(settings.num_players, &mut rng)?
        };

        Ok(Self {
            settings,
            status: RoundStatus::AwaitingAuction,
            initial_hands: deal.hands.clone(),
            hands: deal.hands,
            dealt_dog: deal.dog.clone(),
            dog: deal.dog,
            contract: None,
            current_trick: Trick::new(),
            closed_tricks: Vec::new(),
            current_seat: 0,
        })
    }

    pub fn settings(&self) -> RoundSettings {
        self.settings
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    pub fn current_seat(&self) -> Seat {
        self.current_seat
    }

    pub fn is_complete(&self) -> bool {
        self.status == RoundStatus::Complete
    }

    /// Turn state while cards are on the table; `None` before play starts.
    pub fn turn_phase(&self) -> Option<TurnPhase> {
        match self.status {
            RoundStatus::Playing => Some(if self.current_trick.is_empty() {
                TurnPhase::AwaitingLead
            } else {
                TurnPhase::AwaitingFollow {
                    position: self.current_trick.len(),
                }
            }),
            RoundStatus::Complete => Some(TurnPhase::RoundComplete),
            _ => None,
        }
    }

    pub fn hand(&self, seat: Seat) -> Result<&[Card], RoundError> {
        self.hands
            .get(seat)
            .map(Vec::as_slice)
            .ok_or(RoundError::UnknownSeat(seat))
    }

    pub fn initial_hands(&self) -> &[Vec<Card>] {
        &self.initial_hands
    }

    /// The dog as dealt, once its visibility rule allows: immediately after
    /// the auction when the taker picks it up, only at round end for garde
    /// sans and garde contre.
    pub fn dog(&self) -> Option<&[Card]> {
        match &self.contract {
            Some(contract) if contract.level.taker_sees_dog() => Some(&self.dealt_dog),
            Some(_) if self.status == RoundStatus::Complete => Some(&self.dealt_dog),
            _ => None,
        }
    }

    pub fn tricks(&self) -> &[ClosedTrick] {
        &self.closed_tricks
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    /// Validates and consumes the auction result. For petite and garde the
    /// dog joins the taker's hand and the round waits for the ecart; the
    /// face-down contracts go straight to play.
    pub fn resolve_auction(&mut self, outcome: AuctionOutcome) -> Result<(), RoundError> {
        if self.status != RoundStatus::AwaitingAuction {
            return Err(RoundError::WrongPhase);
        }
        outcome.validate(self.settings.num_players)?;

        let taker_hand = &self.hands[outcome.taker];
        let oudlers = match outcome.level {
            // The dog never reaches the taker's side under garde contre.
            ContractLevel::GardeContre => count_oudlers(taker_hand),
            _ => count_oudlers(taker_hand) + count_oudlers(&self.dog),
        };
        let contract = Contract::new(outcome, oudlers);

        if contract.level.taker_sees_dog() {
            let dog = std::mem::take(&mut self.dog);
            self.hands[contract.taker].extend(dog);
            self.hands[contract.taker].sort();
            self.status = RoundStatus::AwaitingDiscard;
        } else {
            self.status = RoundStatus::Playing;
        }
        self.contract = Some(contract);
        Ok(())
    }

    /// The taker's ecart after picking up the dog. Kings and oudlers never
    /// go down; plain trumps only when the hand has nothing else left.
    pub fn submit_discard(&mut self, cards: &[Card]) -> Result<(), RoundError> {
        if self.status != RoundStatus::AwaitingDiscard {
            return Err(RoundError::WrongPhase);
        }
        let taker = self
            .contract
            .as_ref()
            .map(|contract| contract.taker)
            .ok_or(RoundError::WrongPhase)?;

        let expected = self.settings.dog_size;
        if cards.len() != expected {
            return Err(IllegalMove::WrongDiscardSize { expected }.into());
        }
        for (index, card) in cards.iter().enumerate() {
            if cards[..index].contains(card) {
                return Err(IllegalMove::DuplicateDiscard(*card).into());
            }
        }

        let hand = &self.hands[taker];
        let plain_available = hand
            .iter()
            .filter(|card| matches!(card, Card::Suited(_, rank) if *rank != RANK_KING))
            .count();
        for card in cards {
            if !hand.contains(card) {
                return Err(IllegalMove::NotInHand(*card).into());
            }
            match card {
                Card::Excuse | Card::Trump(1) | Card::Trump(21) => {
                    return Err(IllegalMove::ProtectedDiscard(*card).into());
                }
                Card::Suited(_, RANK_KING) => {
                    return Err(IllegalMove::ProtectedDiscard(*card).into());
                }
                Card::Trump(_) if plain_available >= expected => {
                    return Err(IllegalMove::UnforcedTrumpDiscard(*card).into());
                }
                _ => {}
            }
        }

        let hand = &mut self.hands[taker];
        for card in cards {
            let position = hand.iter().position(|held| held == card);
            if let Some(position) = position {
                hand.remove(position);
            }
        }
        self.dog = cards.to_vec();
        self.status = RoundStatus::Playing;
        Ok(())
    }

    /// The exact legal-card set for the seat to act. Empty only once the
    /// round is complete.
    pub fn legal_moves(&self, seat: Seat) -> Result<Vec<Card>, RoundError> {
        if seat >= self.settings.num_players {
            return Err(RoundError::UnknownSeat(seat));
        }
        match self.status {
            RoundStatus::Complete => Ok(Vec::new()),
            RoundStatus::Playing => {
                if seat != self.current_seat {
                    return Err(RoundError::NotSeatsTurn);
                }
                Ok(self.current_trick.legal_moves(&self.hands[seat]))
            }
            _ => Err(RoundError::WrongPhase),
        }
    }

    /// Plays one card for the seat whose turn it is. Rejects anything
    /// outside the legal set; never coerces an illegal play.
    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<TrickOutcome, RoundError> {
        if seat >= self.settings.num_players {
            return Err(RoundError::UnknownSeat(seat));
        }
        match self.status {
            RoundStatus::Complete => return Err(RoundError::RoundOver),
            RoundStatus::Playing => {}
            _ => return Err(RoundError::WrongPhase),
        }
        if seat != self.current_seat {
            return Err(RoundError::NotSeatsTurn);
        }
        let hand = &self.hands[seat];
        if !hand.contains(&card) {
            return Err(IllegalMove::NotInHand(card).into());
        }
        let legal = self.current_trick.legal_moves(hand);
        if !legal.contains(&card) {
            return Err(self.rejection_reason(hand, card).into());
        }

        let hand = &mut self.hands[seat];
        if let Some(position) = hand.iter().position(|held| *held == card) {
            hand.remove(position);
        }
        self.current_trick.push(seat, card);

        if self.current_trick.len() < self.settings.num_players {
            self.current_seat = (self.current_seat + 1) % self.settings.num_players;
            return Ok(TrickOutcome::Pending {
                next_seat: self.current_seat,
            });
        }

        let trick = std::mem::take(&mut self.current_trick);
        let closed = ClosedTrick::close(trick).expect("a full trick always has a winner");
        let winner = closed.winner;
        let points = closed.points;
        self.closed_tricks.push(closed);
        self.current_seat = winner;
        let round_complete = self.closed_tricks.len() == self.settings.trick_count;
        if round_complete {
            self.status = RoundStatus::Complete;
        }
        Ok(TrickOutcome::Closed {
            winner,
            points,
            round_complete,
        })
    }

    /// Pins the specific obligation a rejected card violated.
    fn rejection_reason(&self, hand: &[Card], card: Card) -> IllegalMove {
        let trick = &self.current_trick;
        if let Some(Lead::Suit(suit)) = trick.lead() {
            let holds_suit = hand.iter().any(|held| held.suit() == Some(suit));
            if holds_suit && card.suit() != Some(suit) {
                return IllegalMove::MustFollowSuit;
            }
        }
        let holds_trump = hand.iter().any(Card::is_trump);
        if holds_trump && !card.is_trump() {
            return IllegalMove::MustTrump;
        }
        if let Some(highest) = trick.highest_trump() {
            let can_overtrump = hand
                .iter()
                .any(|held| held.is_trump() && held.rank() > highest);
            if can_overtrump && card.rank() <= highest {
                return IllegalMove::MustOvertrump(highest);
            }
        }
        IllegalMove::MustFollowSuit
    }

    /// Observable state from one seat's perspective.
    pub fn view(&self, seat: Seat) -> Result<RoundView, RoundError> {
        if seat >= self.settings.num_players {
            return Err(RoundError::UnknownSeat(seat));
        }
        let mut tricks_won = vec![0usize; self.settings.num_players];
        for trick in &self.closed_tricks {
            tricks_won[trick.winner] += 1;
        }
        let players = (0..self.settings.num_players)
            .map(|other| PlayerPublicState {
                seat: other,
                cards_left: self.hands[other].len(),
                tricks_won: tricks_won[other],
                is_taker: self
                    .contract
                    .as_ref()
                    .is_some_and(|contract| contract.taker == other),
                is_current: other == self.current_seat,
            })
            .collect();
        Ok(RoundView {
            settings: self.settings,
            status: self.status,
            self_seat: seat,
            current_seat: self.current_seat,
            contract: self.contract.clone(),
            hand: self.hands[seat].clone(),
            current_trick: self.current_trick.clone(),
            players,
            tricks_played: self.closed_tricks.len(),
        })
    }

    /// Scores the completed round.
    pub fn outcome(&self) -> Result<RoundOutcome, RoundError> {
        if self.status != RoundStatus::Complete {
            return Err(RoundError::WrongPhase);
        }
        let contract = self.contract.as_ref().ok_or(RoundError::WrongPhase)?;
        score_round(&self.settings, contract, &self.closed_tricks, &self.dog)
    }

    /// Persistence-shaped snapshot of the completed round. Identical seeds
    /// and action sequences produce byte-identical snapshots.
    pub fn snapshot(&self) -> Result<RoundSnapshot, RoundError> {
        let outcome = self.outcome()?;
        let contract = &outcome.contract;
        let tricks = self
            .closed_tricks
            .iter()
            .enumerate()
            .map(|(index, trick)| TrickRecord {
                trick_number: index + 1,
                cards_played: trick
                    .plays
                    .iter()
                    .enumerate()
                    .map(|(position, (seat, card))| PlayedCard {
                        seat: *seat,
                        card: card.to_string(),
                        position,
                    })
                    .collect(),
                winner_seat: trick.winner,
                trick_points: trick.points,
            })
            .collect();
        Ok(RoundSnapshot {
            num_players: self.settings.num_players,
            taker_seat: contract.taker,
            contract_type: contract.level.to_string(),
            called_seat: contract.called_partner,
            dog_cards: self.dealt_dog.iter().map(Card::to_string).collect(),
            initial_hands: self
                .initial_hands
                .iter()
                .map(|hand| hand.iter().map(Card::to_string).collect())
                .collect(),
            hand_strengths: self
                .initial_hands
                .iter()
                .map(|hand| hand.iter().map(Card::points).sum())
                .collect(),
            contract_points_needed: contract.points_needed,
            taker_team_points: outcome.taker_team_points,
            defense_team_points: outcome.defense_team_points,
            contract_won: outcome.contract_won,
            tricks,
        })
    }
}
