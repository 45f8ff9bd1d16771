pub mod encoding;
pub mod env;
pub mod policy;

pub use encoding::{ActionSpace, StateEncoder, NUM_CARDS, STATE_FEATURES};
pub use env::{EnvConfig, RewardMode, StepOutcome, TarotEnv};
pub use policy::{PolicyNetwork, DEFAULT_HIDDEN, DEFAULT_STACK};
