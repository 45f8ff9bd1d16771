use std::env;
use std::error::Error;
use std::process;

use tarotbot::{
    create_bot_from_spec, render_view, AuctionOutcome, Bot, GameSession, MaxPointsDiscard,
    PointBasedBidding, Round, RoundStatus, Seat,
};
use tarotbot::{BidStrategy, ContractLevel, DiscardStrategy};

const DEFAULT_SEED: u64 = 0xDEA1_0F78_CA4D_5EED;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let mut visualize = false;
    let mut seed = DEFAULT_SEED;
    let mut rounds = 1usize;
    let mut bot_specs: Vec<String> = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--visualize" => visualize = true,
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed value: {value}"))?;
            }
            "--rounds" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--rounds requires a value".to_string())?;
                rounds = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid rounds value: {value}"))?;
            }
            "--help" => {
                print_usage();
                return Ok(());
            }
            other => bot_specs.push(other.to_string()),
        }
    }

    if bot_specs.is_empty() {
        bot_specs = vec![
            String::from("human"),
            String::from("naive"),
            String::from("naive"),
            String::from("random"),
        ];
    }
    if bot_specs.len() < 3 || bot_specs.len() > 5 {
        return Err(format!(
            "expected between 3 and 5 players, received {}",
            bot_specs.len()
        )
        .into());
    }

    let num_players = bot_specs.len();
    let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(num_players);
    for (index, spec) in bot_specs.iter().enumerate() {
        bots.push(create_bot_from_spec(spec, index, seed)?);
    }

    let mut session = GameSession::new(num_players)?;
    let mut bidding = PointBasedBidding::new();
    let mut discard = MaxPointsDiscard;

    println!("Starting Tarot simulation with {num_players} players for {rounds} round(s).\n");
    for round_number in 1..=rounds {
        let round_seed = mix_seed(seed, round_number as u64);
        let Some(mut round) =
            deal_until_taken(num_players, round_seed, &mut bidding, &mut discard)?
        else {
            println!("Round {round_number}: every seat passed repeatedly, skipping.");
            continue;
        };
        let contract = round.contract().expect("contract resolved").clone();
        println!(
            "Round {round_number}: seat {} takes a {} ({} oudlers, needs {}).",
            contract.taker, contract.level, contract.oudlers, contract.points_needed
        );

        while round.status() == RoundStatus::Playing {
            let seat = round.current_seat();
            let view = round.view(seat)?;
            let legal = round.legal_moves(seat)?;
            if visualize {
                println!("{}", render_view(&view));
            }
            let card = bots[seat].select_card(&view, &legal);
            round.play_card(seat, card)?;
        }

        let outcome = round.outcome()?;
        println!(
            "  Taker side {:.1} vs defense {:.1} -> contract {}.",
            outcome.taker_team_points,
            outcome.defense_team_points,
            if outcome.contract_won { "made" } else { "lost" }
        );
        session.record_round(&outcome)?;
        print_leaderboard(&session, &bot_specs);
    }

    Ok(())
}

/// Runs the auction, re-dealing with derived seeds until some seat takes.
fn deal_until_taken(
    num_players: usize,
    seed: u64,
    bidding: &mut PointBasedBidding,
    discard: &mut MaxPointsDiscard,
) -> Result<Option<Round>, Box<dyn Error>> {
    for attempt in 0..32u64 {
        let mut round = Round::builder(num_players)?
            .with_seed(mix_seed(seed, attempt))
            .build()?;
        let mut highest: Option<(Seat, ContractLevel)> = None;
        for seat in 0..num_players {
            let current = highest.map(|(_, level)| level);
            if let Some(bid) = bidding.propose_bid(round.hand(seat)?, current) {
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
            let ecart = discard.choose_discard(&hand, round.settings().dog_size);
            round.submit_discard(&ecart)?;
        }
        return Ok(Some(round));
    }
    Ok(None)
}

fn print_leaderboard(session: &GameSession, specs: &[String]) {
    println!("  Leaderboard:");
    for (seat, score) in session.leaderboard().iter().enumerate() {
        println!("    seat {seat} ({}): {score:+}", specs[seat]);
    }
    println!();
}

fn mix_seed(base: u64, salt: u64) -> u64 {
    let mut z = base ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}

fn print_usage() {
    println!("Usage: simulate [OPTIONS] [BOT ...]");
    println!("  --visualize        Show each seat's view before it plays");
    println!("  --seed <u64>       Seed for dealing (default: {DEFAULT_SEED:#x})");
    println!("  --rounds <usize>   Rounds to play in the session (default: 1)");
    println!("  --help             Show this help message");
    println!("Bot entries (3-5 total):");
    println!("  human[:name]       Interactive human-controlled seat");
    println!("  random[:seed]      Random bot with optional per-bot seed");
    println!("  naive              Point-greedy bot with Petit/Excuse handling");
    println!("If no bots are provided, defaults to one human and three bots.");
}
