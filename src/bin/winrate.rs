use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser};
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use tarotbot::{
    create_bot_from_spec, label_for_spec, AuctionOutcome, BidStrategy, Bot, ContractLevel,
    DiscardStrategy, MaxPointsDiscard, PointBasedBidding, Round, RoundStatus, Seat,
};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;

#[derive(Parser, Debug)]
#[command(
    name = "winrate",
    about = "Run multiple Tarot rounds and plot per-bot average score deltas."
)]
struct Args {
    /// Number of rounds to simulate
    #[arg(short = 'r', long = "rounds", default_value_t = 200)]
    rounds: usize,

    /// Base RNG seed (deal + bot RNGs are derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output chart file (png)
    #[arg(short = 'o', long = "out", default_value = "scores.png")]
    out: PathBuf,

    /// Show a textual summary only (no chart)
    #[arg(long = "no-chart", action = ArgAction::SetTrue)]
    no_chart: bool,

    /// Player bot specs: e.g., naive random random (3-5 total)
    bots: Vec<String>,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if args.bots.len() < 3 || args.bots.len() > 5 {
        return Err(format!(
            "expected between 3 and 5 bot specs, received {}",
            args.bots.len()
        )
        .into());
    }
    // Disallow humans in batch sims; they would block waiting for input.
    if args
        .bots
        .iter()
        .any(|spec| spec.to_ascii_lowercase().starts_with("human"))
    {
        return Err("human players are not supported in winrate runs".into());
    }

    let num_players = args.bots.len();
    let labels_for_spec: Vec<String> = args.bots.iter().map(|spec| label_for_spec(spec)).collect();

    // Aggregates per bot label.
    let mut score_per_label: HashMap<String, i64> = HashMap::new();
    let mut seats_per_label: HashMap<String, usize> = HashMap::new();
    let mut positive_rounds_per_label: HashMap<String, usize> = HashMap::new();
    let mut taker_rounds: usize = 0;
    let mut taker_wins: usize = 0;
    let mut skipped_rounds: usize = 0;
    let mut decision_time_ns: HashMap<String, u128> = HashMap::new();
    let mut decision_counts: HashMap<String, usize> = HashMap::new();

    let mut bidding = PointBasedBidding::new();
    let mut discard = MaxPointsDiscard;

    for round_idx in 0..args.rounds {
        // Permute seating each round for fairness.
        let mut indices: Vec<usize> = (0..num_players).collect();
        let mut seat_rng = StdRng::seed_from_u64(args.seed ^ 0x9E37_79B9 ^ round_idx as u64);
        indices.shuffle(&mut seat_rng);

        let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(num_players);
        let mut labels: Vec<String> = Vec::with_capacity(num_players);
        for (seat, src_idx) in indices.iter().enumerate() {
            let bot_seed = mix_seed(args.seed, round_idx as u64, seat as u64);
            bots.push(create_bot_from_spec(&args.bots[*src_idx], seat, bot_seed)?);
            labels.push(labels_for_spec[*src_idx].clone());
        }

        let deal_seed = mix_seed(args.seed, round_idx as u64, 0x5EED_15);
        let Some(mut round) =
            deal_until_taken(num_players, deal_seed, &mut bidding, &mut discard)?
        else {
            skipped_rounds += 1;
            continue;
        };
        for label in &labels {
            *seats_per_label.entry(label.clone()).or_default() += 1;
        }

        while round.status() == RoundStatus::Playing {
            let seat = round.current_seat();
            let view = round.view(seat)?;
            let legal = round.legal_moves(seat)?;
            let label = labels[seat].clone();
            let t0 = Instant::now();
            let card = bots[seat].select_card(&view, &legal);
            let dt = t0.elapsed();
            *decision_time_ns.entry(label.clone()).or_default() += dt.as_nanos();
            *decision_counts.entry(label).or_default() += 1;
            round.play_card(seat, card)?;
        }

        let outcome = round.outcome()?;
        taker_rounds += 1;
        if outcome.contract_won {
            taker_wins += 1;
        }
        for (seat, delta) in outcome.score_deltas.iter().enumerate() {
            let label = labels[seat].clone();
            *score_per_label.entry(label.clone()).or_default() += delta;
            if *delta > 0 {
                *positive_rounds_per_label.entry(label).or_default() += 1;
            }
        }
    }

    // Per-seat averages per label.
    let mut results: Vec<(String, f64, f64)> = seats_per_label
        .iter()
        .map(|(label, &seats)| {
            let total = *score_per_label.get(label).unwrap_or(&0);
            let positive = *positive_rounds_per_label.get(label).unwrap_or(&0);
            (
                label.clone(),
                total as f64 / seats as f64,
                positive as f64 / seats as f64,
            )
        })
        .collect();
    results.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    println!("Average score delta per round (per-seat):");
    for (label, avg, positive_rate) in &results {
        println!(
            "  {label:<12}  avg: {avg:>8.2}   positive rounds: {:.2}%",
            positive_rate * 100.0
        );
    }
    if taker_rounds > 0 {
        println!(
            "\nContracts made: {taker_wins}/{taker_rounds} ({:.2}%)",
            taker_wins as f64 / taker_rounds as f64 * 100.0
        );
    }
    if skipped_rounds > 0 {
        println!("Note: {skipped_rounds} round(s) skipped because every seat passed.");
    }

    if !decision_counts.is_empty() {
        println!("\nDecision time (per bot label):");
        for (label, _avg, _) in &results {
            if let Some(&count) = decision_counts.get(label) {
                let total_ns = *decision_time_ns.get(label).unwrap_or(&0u128);
                let total_ms = total_ns as f64 / 1.0e6;
                let avg_ms = if count > 0 { total_ms / count as f64 } else { 0.0 };
                println!(
                    "  {label:<12}  decisions: {count:<7}  total: {total_ms:.3} ms  avg: {avg_ms:.3} ms"
                );
            }
        }
    }

    if !args.no_chart {
        render_bar_chart(&args.out, &results)?;
        println!("\nChart written to {}", args.out.display());
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
            .with_seed(mix_seed(seed, attempt, 0xD06))
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

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    // Simple reversible mixer (xorshift-like mix).
    let mut z =
        base ^ a.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ b.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}

fn render_bar_chart(out: &PathBuf, data: &[(String, f64, f64)]) -> Result<(), Box<dyn Error>> {
    let labels: Vec<String> = data.iter().map(|(label, _, _)| label.clone()).collect();
    let values: Vec<f64> = data.iter().map(|(_, avg, _)| *avg).collect();
    let max_value = values.iter().cloned().fold(0.0_f64, f64::max).max(10.0);
    let min_value = values.iter().cloned().fold(0.0_f64, f64::min).min(-10.0);

    let root = BitMapBackend::new(out, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| format!("{e}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Tarot Bot Average Score Delta (per-seat)",
            ("sans-serif", 28).into_font(),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..labels.len(), min_value..max_value)
        .map_err(|e| format!("{e}"))?;

    chart
        .configure_mesh()
        .y_desc("Average score delta")
        .x_desc("Bot type")
        .x_labels(labels.len())
        .x_label_formatter(&|idx| {
            if *idx < labels.len() {
                labels[*idx].clone()
            } else {
                idx.to_string()
            }
        })
        .y_label_formatter(&|v| format!("{v:.0}"))
        .light_line_style(&WHITE.mix(0.0))
        .draw()
        .map_err(|e| format!("{e}"))?;

    for (i, value) in values.iter().enumerate() {
        let rect = Rectangle::new([(i, 0.0), (i, *value)], BLUE.filled());
        chart
            .draw_series(std::iter::once(rect))
            .map_err(|e| format!("{e}"))?;
    }

    root.present().map_err(|e| format!("{e}"))?;
    Ok(())
}
