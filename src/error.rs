use thiserror::Error;

use crate::card::Card;
use crate::contract::Seat;

/// Errors that can occur while driving a round.
#[derive(Debug, Error)]
pub enum RoundError {
    #[error("deck must contain exactly 78 unique cards")]
    InvalidDeck,
    #[error("player count {0} is out of range (3-5)")]
    InvalidPlayerCount(usize),
    #[error("invalid contract: {0}")]
    InvalidContract(&'static str),
    #[error("seat index {0} is out of range")]
    UnknownSeat(Seat),
    #[error("not the specified seat's turn")]
    NotSeatsTurn,
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),
    #[error("round is already complete")]
    RoundOver,
    #[error("operation is not valid in the current round phase")]
    WrongPhase,
    #[error("team points {taker} + {defense} do not sum to the 91-point pool")]
    InconsistentPoints { taker: f32, defense: f32 },
}

/// Details of rejected card plays and discards.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IllegalMove {
    #[error("card {0} is not in the player's hand")]
    NotInHand(Card),
    #[error("must follow the led suit")]
    MustFollowSuit,
    #[error("must play a trump when void in the led suit")]
    MustTrump,
    #[error("must play a trump higher than {0}")]
    MustOvertrump(u8),
    #[error("the ecart must contain exactly {expected} cards")]
    WrongDiscardSize { expected: usize },
    #[error("card {0} appears twice in the ecart")]
    DuplicateDiscard(Card),
    #[error("kings and oudlers cannot be put in the ecart")]
    ProtectedDiscard(Card),
    #[error("trumps may only go to the ecart when no other card is available")]
    UnforcedTrumpDiscard(Card),
}

/// Failure to parse the textual card encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid card text: {0}")]
pub struct ParseCardError(pub String);
