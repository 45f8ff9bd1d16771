use crate::bot::{BidStrategy, Bot, DiscardStrategy};
use crate::card::Card;
use crate::contract::{AuctionOutcome, Seat};
use crate::error::RoundError;
use crate::round::Round;
use crate::state::RoundStatus;

use super::encoding::{ActionSpace, StateEncoder, NUM_CARDS, STATE_FEATURES};

/// Reward signal shape for the learning collaborator.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RewardMode {
    /// 1.0 when the agent's seat ends the round with a positive delta.
    Sparse,
    /// The agent's signed score delta, scaled down to roughly [-1, 1].
    Dense,
}

#[derive(Copy, Clone, Debug)]
pub struct EnvConfig {
    pub num_players: usize,
    pub agent_seat: Seat,
    pub reward_mode: RewardMode,
    /// Re-deals attempted when every seat passes before giving up.
    pub max_auction_attempts: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            agent_seat: 0,
            reward_mode: RewardMode::Sparse,
            max_auction_attempts: 64,
        }
    }
}

/// One step's worth of feedback to the learning agent.
#[derive(Clone, Debug)]
pub struct StepOutcome {
    pub observation: Box<[f32; STATE_FEATURES]>,
    pub reward: f32,
    pub done: bool,
    pub legal_mask: [bool; NUM_CARDS],
}

/// Single-agent environment: one seat is driven through `step`, every other
/// seat by the supplied bots. Bidding and the ecart run through the strategy
/// interfaces for all seats, the agent's included. Identical seeds and
/// action sequences reproduce identical episodes as long as the supplied
/// strategies are deterministic.
pub struct TarotEnv {
    config: EnvConfig,
    opponents: Vec<Box<dyn Bot>>,
    bidding: Box<dyn BidStrategy>,
    discard: Box<dyn DiscardStrategy>,
    round: Option<Round>,
    done: bool,
}

impl TarotEnv {
    pub fn new(
        config: EnvConfig,
        opponents: Vec<Box<dyn Bot>>,
        bidding: Box<dyn BidStrategy>,
        discard: Box<dyn DiscardStrategy>,
    ) -> Result<Self, RoundError> {
        if config.agent_seat >= config.num_players {
            return Err(RoundError::UnknownSeat(config.agent_seat));
        }
        if opponents.len() != config.num_players - 1 {
            return Err(RoundError::InvalidPlayerCount(opponents.len() + 1));
        }
        Ok(Self {
            config,
            opponents,
            bidding,
            discard,
            round: None,
            done: true,
        })
    }

    /// Deals a fresh round from the seed, runs the auction and ecart, then
    /// plays bots forward until the agent must act.
    pub fn reset(&mut self, seed: u64) -> Result<StepOutcome, RoundError> {
        let mut round = self.deal_with_taker(seed)?;
        self.play_bots(&mut round)?;
        self.round = Some(round);
        self.done = false;
        self.observe(0.0)
    }

    /// Applies the agent's card by action index. An index outside the legal
    /// mask ends the episode with a penalty instead of being coerced.
    pub fn step(&mut self, action: usize) -> Result<StepOutcome, RoundError> {
        if self.done {
            return Err(RoundError::RoundOver);
        }
        let agent = self.config.agent_seat;
        let card = ActionSpace::card_from_index(action);
        let legal = self
            .round
            .as_ref()
            .expect("reset precedes step")
            .legal_moves(agent)?;
        let Some(card) = card.filter(|card| legal.contains(card)) else {
            self.done = true;
            return self.observe(-1.0);
        };

        let round = self.round.as_mut().expect("reset precedes step");
        round.play_card(agent, card)?;
        if round.status() != RoundStatus::Complete {
            let mut round = self.round.take().expect("round in play");
            self.play_bots(&mut round)?;
            self.round = Some(round);
        }

        let round = self.round.as_ref().expect("round in play");
        if round.status() == RoundStatus::Complete {
            self.done = true;
            let reward = self.final_reward()?;
            return self.observe(reward);
        }
        self.observe(0.0)
    }

    /// Current legality bitset for the agent, for external action masking.
    pub fn action_mask(&self) -> Result<[bool; NUM_CARDS], RoundError> {
        let round = self.round.as_ref().ok_or(RoundError::WrongPhase)?;
        if round.status() == RoundStatus::Complete {
            return Ok([false; NUM_CARDS]);
        }
        let legal = round.legal_moves(self.config.agent_seat)?;
        Ok(ActionSpace::mask_bits(&legal))
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    fn deal_with_taker(&mut self, seed: u64) -> Result<Round, RoundError> {
        for attempt in 0..self.config.max_auction_attempts {
            let round_seed = seed.wrapping_add(attempt.wrapping_mul(0x9E37_79B9_7F4A_7C15));
            let mut round = Round::builder(self.config.num_players)?
                .with_seed(round_seed)
                .build()?;

            let mut highest: Option<(Seat, crate::contract::ContractLevel)> = None;
            for seat in 0..self.config.num_players {
                let hand = round.hand(seat)?;
                let current = highest.map(|(_, level)| level);
                if let Some(bid) = self.bidding.propose_bid(hand, current) {
                    if current.is_none_or(|level| bid > level) {
                        highest = Some((seat, bid));
                    }
                }
            }
            let Some((taker, level)) = highest else {
                continue;
            };
            round.resolve_auction(AuctionOutcome::new(taker, level))?;
            if round.status() == RoundStatus::AwaitingDiscard {
                let hand = round.hand(taker)?.to_vec();
                let ecart = self
                    .discard
                    .choose_discard(&hand, round.settings().dog_size);
                round.submit_discard(&ecart)?;
            }
            return Ok(round);
        }
        Err(RoundError::InvalidContract(
            "no seat took within the attempt budget",
        ))
    }

    fn play_bots(&mut self, round: &mut Round) -> Result<(), RoundError> {
        let agent = self.config.agent_seat;
        while round.status() == RoundStatus::Playing && round.current_seat() != agent {
            let seat = round.current_seat();
            let view = round.view(seat)?;
            let legal = round.legal_moves(seat)?;
            let opponent_index = if seat < agent { seat } else { seat - 1 };
            let card = self.opponents[opponent_index].select_card(&view, &legal);
            round.play_card(seat, card)?;
        }
        Ok(())
    }

    fn final_reward(&self) -> Result<f32, RoundError> {
        let round = self.round.as_ref().ok_or(RoundError::WrongPhase)?;
        let outcome = round.outcome()?;
        let delta = outcome.score_deltas[self.config.agent_seat] as f32;
        Ok(match self.config.reward_mode {
            RewardMode::Sparse => {
                if delta > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            RewardMode::Dense => delta / 100.0,
        })
    }

    fn observe(&self, reward: f32) -> Result<StepOutcome, RoundError> {
        let round = self.round.as_ref().ok_or(RoundError::WrongPhase)?;
        let agent = self.config.agent_seat;
        let view = round.view(agent)?;
        let (legal, legal_mask) = if round.status() == RoundStatus::Complete || self.done {
            (Vec::new(), [false; NUM_CARDS])
        } else {
            let legal = round.legal_moves(agent)?;
            let mask = ActionSpace::mask_bits(&legal);
            (legal, mask)
        };
        Ok(StepOutcome {
            observation: Box::new(StateEncoder::encode(&view, &legal)),
            reward,
            done: self.done,
            legal_mask,
        })
    }
}
