use std::io::{self, Write};

use crate::bot::Bot;
use crate::card::Card;
use crate::state::RoundView;
use crate::visualize::{describe_card, render_view};

/// Interactive bot that queries a human via standard input. Accepts either
/// the listed index or a card code such as `(co,14)`.
pub struct HumanBot {
    name: String,
}

impl HumanBot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for HumanBot {
    fn default() -> Self {
        Self::new("Human")
    }
}

impl Bot for HumanBot {
    fn select_card(&mut self, view: &RoundView, legal: &[Card]) -> Card {
        assert!(!legal.is_empty(), "at least one legal card must exist");
        loop {
            println!("\n=== {}'s turn (seat {}) ===", self.name, view.self_seat);
            println!("{}", render_view(view));
            println!("Legal cards:");
            for (index, card) in legal.iter().enumerate() {
                println!("  [{index}] {}", describe_card(*card));
            }
            println!("Type an index or a card code like (co,14); 'q' quits.");
            print!("Selection: ");
            if io::stdout().flush().is_err() {
                eprintln!("failed to flush stdout");
            }
            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_err() {
                eprintln!("failed to read input");
                continue;
            }
            let trimmed = input.trim();
            if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
                println!("Exiting game at user's request.");
                std::process::exit(0);
            }
            if let Ok(choice) = trimmed.parse::<usize>() {
                if let Some(card) = legal.get(choice) {
                    println!("You play {}", describe_card(*card));
                    return *card;
                }
                println!("Index out of range. Please choose a listed option.");
                continue;
            }
            match trimmed.parse::<Card>() {
                Ok(card) if legal.contains(&card) => {
                    println!("You play {}", describe_card(card));
                    return card;
                }
                Ok(card) => {
                    println!("{} is not legal right now.", describe_card(card));
                }
                Err(_) => {
                    println!("Invalid input: '{trimmed}'. Enter an index or a card code.");
                }
            }
        }
    }
}
