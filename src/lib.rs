//! French Tarot rules engine tailored for reinforcement learning workloads
//! and bot experimentation: deal and dog, contract resolution, the trick
//! state machine with exact legal-move sets, round scoring and a
//! multi-round session leaderboard. Deterministic under injected seeds so
//! rollouts replay byte for byte.

pub mod bot;
pub mod bots;
pub mod card;
pub mod contract;
pub mod deal;
pub mod error;
pub mod ml;
pub mod round;
pub mod score;
pub mod session;
pub mod state;
pub mod trick;
pub mod visualize;

pub use crate::bot::{BidStrategy, Bot, DiscardStrategy};
pub use crate::bots::{
    create_bot_from_spec, label_for_spec, HumanBot, MaxPointsDiscard, NaiveBot, PassBidding,
    PointBasedBidding, PolicyBot, RandomBot, RandomDiscard,
};
pub use crate::card::{full_deck, Card, Suit, DECK_SIZE, TOTAL_CARD_POINTS};
pub use crate::contract::{AuctionOutcome, Contract, ContractLevel, Seat};
pub use crate::deal::{deal, deal_from_deck, Deal};
pub use crate::error::{IllegalMove, ParseCardError, RoundError};
pub use crate::ml::{ActionSpace, StateEncoder, TarotEnv, NUM_CARDS, STATE_FEATURES};
pub use crate::round::{Round, RoundBuilder, RoundConfig, TrickOutcome};
pub use crate::score::{score_round, RoundOutcome, TeamSide};
pub use crate::session::{GameSession, RoundRecord};
pub use crate::state::{
    PlayerPublicState, RoundSettings, RoundSnapshot, RoundStatus, RoundView, TurnPhase,
};
pub use crate::trick::{ClosedTrick, Lead, Trick};
pub use crate::visualize::{card_name, describe_card, render_view};
