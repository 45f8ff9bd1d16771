use crate::bot::Bot;
use crate::card::Card;
use crate::state::RoundView;
use crate::trick::{Lead, Trick};

/// Rule-based bot that plays the strongest legal card with special handling
/// for the Petit and the Excuse:
///
/// 1. Cash the Petit when it is safe (last to play, no trump on the table).
/// 2. Otherwise keep the Petit back while any alternative exists.
/// 3. Throw the Excuse into tricks it cannot win anyway.
/// 4. Default to the highest-value card.
pub struct NaiveBot;

impl NaiveBot {
    pub fn new() -> Self {
        Self
    }

    fn plays_last(view: &RoundView) -> bool {
        view.current_trick.len() + 1 == view.settings.num_players
    }

    fn petit_is_safe(view: &RoundView) -> bool {
        Self::plays_last(view) && view.current_trick.highest_trump().is_none()
    }

    /// Whether the card would take the trick as it currently stands.
    fn would_win(trick: &Trick, card: Card) -> bool {
        if card.is_excuse() {
            return false;
        }
        if let Some(highest) = trick.highest_trump() {
            return card.is_trump() && card.rank() > highest;
        }
        match trick.lead() {
            None => true,
            Some(Lead::Trump) => card.is_trump(),
            Some(Lead::Suit(suit)) => {
                if card.is_trump() {
                    return true;
                }
                let best_followed = trick
                    .plays()
                    .iter()
                    .filter(|(_, played)| played.suit() == Some(suit))
                    .map(|(_, played)| played.rank())
                    .max()
                    .unwrap_or(0);
                card.suit() == Some(suit) && card.rank() > best_followed
            }
        }
    }

    fn strength(card: &Card) -> (u32, u8, bool) {
        ((card.points() * 2.0) as u32, card.rank(), card.is_trump())
    }
}

impl Default for NaiveBot {
    fn default() -> Self {
        Self::new()
    }
}

impl Bot for NaiveBot {
    fn select_card(&mut self, view: &RoundView, legal: &[Card]) -> Card {
        assert!(
            !legal.is_empty(),
            "naive bot requires at least one legal card"
        );
        let petit = legal.iter().copied().find(|card| *card == Card::Trump(1));
        if let Some(petit) = petit {
            if Self::petit_is_safe(view) {
                return petit;
            }
        }
        let safe: Vec<Card> = if petit.is_some() && legal.len() > 1 {
            legal
                .iter()
                .copied()
                .filter(|card| *card != Card::Trump(1))
                .collect()
        } else {
            legal.to_vec()
        };

        let trick = &view.current_trick;
        let cannot_win = !trick.is_empty()
            && safe
                .iter()
                .all(|card| !Self::would_win(trick, *card));
        if cannot_win {
            if let Some(excuse) = safe.iter().copied().find(Card::is_excuse) {
                // A lost trick is the moment to place the Excuse: it comes
                // back to our side anyway.
                if view.tricks_played + 1 < view.settings.trick_count {
                    return excuse;
                }
            }
        }

        safe.iter()
            .copied()
            .max_by_key(Self::strength)
            .unwrap_or(legal[0])
    }
}
