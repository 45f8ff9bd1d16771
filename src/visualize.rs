use std::fmt::Write;

use crate::card::Card;
use crate::state::{RoundStatus, RoundView};

/// Human-readable card name alongside the wire code.
pub fn card_name(card: Card) -> String {
    match card {
        Card::Excuse => String::from("Excuse"),
        Card::Trump(rank) => format!("Trump {rank}"),
        Card::Suited(suit, rank) => {
            let suit_name = match suit {
                crate::card::Suit::Hearts => "Hearts",
                crate::card::Suit::Spades => "Spades",
                crate::card::Suit::Diamonds => "Diamonds",
                crate::card::Suit::Clubs => "Clubs",
            };
            let rank_name = match rank {
                1 => String::from("Ace"),
                11 => String::from("Jack"),
                12 => String::from("Knight"),
                13 => String::from("Queen"),
                14 => String::from("King"),
                other => other.to_string(),
            };
            format!("{rank_name} of {suit_name}")
        }
    }
}

pub fn describe_card(card: Card) -> String {
    format!("{card} {}", card_name(card))
}

/// Multi-line textual summary of a seat's view, used by the CLI binaries
/// and the interactive bot.
pub fn render_view(view: &RoundView) -> String {
    let mut out = String::new();
    let status = match view.status {
        RoundStatus::AwaitingAuction => "Awaiting auction",
        RoundStatus::AwaitingDiscard => "Awaiting ecart",
        RoundStatus::Playing => "Playing",
        RoundStatus::Complete => "Complete",
    };
    let _ = writeln!(out, "Round status: {status}");
    if let Some(contract) = &view.contract {
        let partner = contract
            .called_partner
            .map(|seat| format!(", partner seat {seat}"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "Contract: {} by seat {}{partner} ({} oudlers, needs {})",
            contract.level, contract.taker, contract.oudlers, contract.points_needed
        );
    }
    let _ = writeln!(
        out,
        "Trick {}/{}  |  Current seat: {}{}",
        view.tricks_played + 1,
        view.settings.trick_count,
        view.current_seat,
        if view.current_seat == view.self_seat {
            " (You)"
        } else {
            ""
        }
    );
    if view.current_trick.is_empty() {
        let _ = writeln!(out, "Table: (empty, you lead)");
    } else {
        let _ = writeln!(out, "Table:");
        for (seat, card) in view.current_trick.plays() {
            let _ = writeln!(out, "  seat {seat}: {}", describe_card(*card));
        }
    }
    let _ = writeln!(out, "Players:");
    for player in &view.players {
        let tags = [
            (player.is_taker, "taker"),
            (player.is_current, "to play"),
            (player.seat == view.self_seat, "you"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, tag)| *tag)
        .collect::<Vec<_>>()
        .join(", ");
        let suffix = if tags.is_empty() {
            String::new()
        } else {
            format!("  [{tags}]")
        };
        let _ = writeln!(
            out,
            "  seat {} - {} cards, {} tricks{suffix}",
            player.seat, player.cards_left, player.tricks_won
        );
    }
    let mut hand = view.hand.clone();
    hand.sort();
    let hand_display = hand
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "Hand: {hand_display}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;
    use crate::contract::{AuctionOutcome, ContractLevel};
    use crate::round::Round;

    #[test]
    fn render_includes_contract_and_hand() {
        let mut round = Round::builder(4).unwrap().with_seed(2).build().unwrap();
        round
            .resolve_auction(AuctionOutcome::new(0, ContractLevel::GardeSans))
            .unwrap();
        let view = round.view(0).unwrap();
        let text = render_view(&view);
        assert!(text.contains("garde_sans"));
        assert!(text.contains("Hand:"));
        assert!(text.contains("(You)"));
    }

    #[test]
    fn card_names_read_naturally() {
        assert_eq!(card_name(Card::Suited(Suit::Hearts, 14)), "King of Hearts");
        assert_eq!(card_name(Card::Trump(21)), "Trump 21");
        assert_eq!(card_name(Card::Excuse), "Excuse");
        assert_eq!(describe_card(Card::Suited(Suit::Spades, 1)), "(pi,1) Ace of Spades");
    }
}
