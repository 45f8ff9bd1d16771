use rand::rngs::StdRng;
use rand::SeedableRng;

use tarotbot::card::validate_deck;
use tarotbot::{
    deal, AuctionOutcome, Bot, Card, ContractLevel, IllegalMove, MaxPointsDiscard,
    PointBasedBidding, RandomBot, Round, RoundError, RoundStatus, Suit, TrickOutcome,
    TOTAL_CARD_POINTS,
};
use tarotbot::{BidStrategy, DiscardStrategy, Seat};

/// Runs the auction with the point-based strategy, re-dealing on derived
/// seeds until some seat takes, and resolves the ecart when one is due.
fn start_round(num_players: usize, seed: u64) -> Round {
    let mut bidding = PointBasedBidding::new();
    let mut discard = MaxPointsDiscard;
    for attempt in 0..64u64 {
        let mut round = Round::builder(num_players)
            .expect("player count")
            .with_seed(seed.wrapping_add(attempt.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
            .build()
            .expect("deal");
        let mut highest: Option<(Seat, ContractLevel)> = None;
        for seat in 0..num_players {
            let current = highest.map(|(_, level)| level);
            if let Some(bid) = bidding.propose_bid(round.hand(seat).expect("hand"), current) {
                if current.is_none_or(|level| bid > level) {
                    highest = Some((seat, bid));
                }
            }
        }
        let Some((taker, level)) = highest else {
            continue;
        };
        round
            .resolve_auction(AuctionOutcome::new(taker, level))
            .expect("auction");
        if round.status() == RoundStatus::AwaitingDiscard {
            let hand = round.hand(taker).expect("taker hand").to_vec();
            let ecart = discard.choose_discard(&hand, round.settings().dog_size);
            round.submit_discard(&ecart).expect("ecart");
        }
        return round;
    }
    panic!("no seat took within the attempt budget");
}

/// Plays the round to completion with a seeded random bot per seat,
/// asserting the legal-move contract at every decision point.
fn random_playout(round: &mut Round, bot_seed: u64) {
    let num_players = round.settings().num_players;
    let mut bots: Vec<RandomBot<StdRng>> = (0..num_players)
        .map(|seat| RandomBot::new(StdRng::seed_from_u64(bot_seed ^ seat as u64)))
        .collect();
    while round.status() == RoundStatus::Playing {
        let seat = round.current_seat();
        let view = round.view(seat).expect("view");
        let legal = round.legal_moves(seat).expect("legal moves");
        assert!(!legal.is_empty(), "a seat to act always has a legal card");
        let hand = round.hand(seat).expect("hand");
        for card in &legal {
            assert!(hand.contains(card), "legal cards come from the hand");
        }
        let card = bots[seat].select_card(&view, &legal);
        round.play_card(seat, card).expect("legal play accepted");
    }
}

#[test]
fn deals_partition_the_deck_for_all_player_counts() {
    for num_players in [3usize, 4, 5] {
        let mut rng = StdRng::seed_from_u64(404 + num_players as u64);
        let deal = deal(num_players, &mut rng).expect("deal");
        let mut cards: Vec<Card> = deal.dog.clone();
        for hand in &deal.hands {
            cards.extend_from_slice(hand);
        }
        validate_deck(&cards).expect("hands plus dog equal the deck");
    }
}

#[test]
fn point_pool_is_invariant_across_playouts() {
    for num_players in [3usize, 4, 5] {
        for seed in [1u64, 17, 3021] {
            let mut round = start_round(num_players, seed);
            random_playout(&mut round, seed ^ 0xB07);
            let outcome = round.outcome().expect("outcome");
            assert_eq!(
                outcome.taker_team_points + outcome.defense_team_points,
                TOTAL_CARD_POINTS,
                "{num_players} players, seed {seed}"
            );
            assert_eq!(outcome.score_deltas.iter().sum::<i64>(), 0);
            assert_eq!(
                round.tricks().len(),
                round.settings().trick_count,
                "every card ends up in exactly one trick"
            );
        }
    }
}

#[test]
fn trick_winners_always_played_into_the_trick() {
    let mut round = start_round(4, 99);
    random_playout(&mut round, 7);
    for trick in round.tricks() {
        assert!(
            trick.plays.iter().any(|(seat, _)| *seat == trick.winner),
            "winner must have played into the trick"
        );
        assert_eq!(trick.plays.len(), 4);
    }
}

#[test]
fn identical_seed_and_actions_produce_identical_snapshots() {
    let run = || {
        let mut round = start_round(4, 2024);
        random_playout(&mut round, 515);
        round.snapshot().expect("snapshot")
    };
    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert_eq!(first.to_bytes(), second.to_bytes());
}

#[test]
fn different_seeds_change_the_deal() {
    let a = Round::builder(4).unwrap().with_seed(1).build().unwrap();
    let b = Round::builder(4).unwrap().with_seed(2).build().unwrap();
    assert_ne!(a.hand(0).unwrap(), b.hand(0).unwrap());
}

#[test]
fn snapshot_cards_round_trip_through_the_text_codec() {
    let mut round = start_round(4, 31);
    random_playout(&mut round, 8);
    let snapshot = round.snapshot().expect("snapshot");
    assert_eq!(snapshot.num_players, 4);
    assert_eq!(snapshot.initial_hands.len(), 4);
    assert_eq!(snapshot.tricks.len(), 18);
    for hand in &snapshot.initial_hands {
        for text in hand {
            let card: Card = text.parse().expect("snapshot cards parse");
            assert_eq!(card.to_string(), *text);
        }
    }
    let needed = snapshot.contract_points_needed;
    assert!([36.0, 41.0, 51.0, 56.0].contains(&needed));
    assert_eq!(
        snapshot.contract_won,
        snapshot.taker_team_points >= needed
    );
}

/// Scripted deal used by the legality scenarios below: seat 1 is void in
/// hearts and long in trumps, seats 2 and 3 hold no trumps at all.
fn scripted_round() -> Round {
    let hands = vec![
        (1..=14)
            .map(|rank| Card::Suited(Suit::Hearts, rank))
            .chain((1..=4).map(|rank| Card::Suited(Suit::Spades, rank)))
            .collect::<Vec<_>>(),
        (1..=18).map(Card::Trump).collect::<Vec<_>>(),
        (5..=14)
            .map(|rank| Card::Suited(Suit::Spades, rank))
            .chain((1..=8).map(|rank| Card::Suited(Suit::Diamonds, rank)))
            .collect::<Vec<_>>(),
        (9..=14)
            .map(|rank| Card::Suited(Suit::Diamonds, rank))
            .chain((1..=12).map(|rank| Card::Suited(Suit::Clubs, rank)))
            .collect::<Vec<_>>(),
    ];
    let dog = vec![
        Card::Suited(Suit::Clubs, 13),
        Card::Suited(Suit::Clubs, 14),
        Card::Trump(19),
        Card::Trump(20),
        Card::Trump(21),
        Card::Excuse,
    ];
    let mut round = Round::builder(4)
        .unwrap()
        .with_deal(hands, dog)
        .build()
        .unwrap();
    round
        .resolve_auction(AuctionOutcome::new(0, ContractLevel::GardeSans))
        .unwrap();
    round
}

#[test]
fn void_seat_must_trump_never_discard() {
    let mut round = scripted_round();
    round.play_card(0, Card::Suited(Suit::Hearts, 9)).unwrap();
    // Seat 1 holds no hearts but a fistful of trumps: the legal set is
    // trumps only, never a free discard.
    let legal = round.legal_moves(1).unwrap();
    assert_eq!(legal.len(), 18);
    assert!(legal.iter().all(Card::is_trump));
    round.play_card(1, Card::Trump(18)).unwrap();
}

#[test]
fn rejected_moves_name_the_violated_obligation() {
    let mut round = scripted_round();
    round.play_card(0, Card::Suited(Suit::Spades, 2)).unwrap();
    // Seat 1 holds no spades, so trumps are forced; seat 2 holds spades and
    // must follow them.
    round.play_card(1, Card::Trump(6)).unwrap();
    let err = round.play_card(2, Card::Suited(Suit::Diamonds, 1));
    assert!(matches!(
        err,
        Err(RoundError::IllegalMove(IllegalMove::MustFollowSuit))
    ));
    round.play_card(2, Card::Suited(Suit::Spades, 14)).unwrap();
    round.play_card(3, Card::Suited(Suit::Clubs, 1)).unwrap();
    // The trump took the trick despite the king of spades.
    assert_eq!(round.current_seat(), 1);
}

#[test]
fn under_trumped_seat_never_wins_the_trick() {
    // Seat 2 holds only low trumps and must under-trump seat 1's high one;
    // seat 3 overtrumps and takes the trick.
    let hands = vec![
        (1..=14)
            .map(|rank| Card::Suited(Suit::Hearts, rank))
            .chain((1..=4).map(|rank| Card::Suited(Suit::Spades, rank)))
            .collect::<Vec<_>>(),
        (5..=18).map(Card::Trump).chain(
            (5..=8).map(|rank| Card::Suited(Suit::Spades, rank)),
        )
        .collect::<Vec<_>>(),
        (1..=4)
            .map(Card::Trump)
            .chain((1..=14).map(|rank| Card::Suited(Suit::Diamonds, rank)))
            .collect::<Vec<_>>(),
        (9..=14)
            .map(|rank| Card::Suited(Suit::Spades, rank))
            .chain((1..=12).map(|rank| Card::Suited(Suit::Clubs, rank)))
            .collect::<Vec<_>>(),
    ];
    let dog = vec![
        Card::Suited(Suit::Clubs, 13),
        Card::Suited(Suit::Clubs, 14),
        Card::Trump(19),
        Card::Trump(20),
        Card::Trump(21),
        Card::Excuse,
    ];
    let mut round = Round::builder(4)
        .unwrap()
        .with_deal(hands, dog)
        .build()
        .unwrap();
    round
        .resolve_auction(AuctionOutcome::new(1, ContractLevel::GardeContre))
        .unwrap();

    round.play_card(0, Card::Suited(Suit::Hearts, 3)).unwrap();
    round.play_card(1, Card::Trump(10)).unwrap();

    // Seat 2 is void in hearts, holds only trumps 1-4: forced under-trump.
    let legal = round.legal_moves(2).unwrap();
    assert_eq!(
        legal,
        vec![Card::Trump(1), Card::Trump(2), Card::Trump(3), Card::Trump(4)]
    );
    round.play_card(2, Card::Trump(4)).unwrap();

    // Seat 3 holds no trumps: free discard closes the trick.
    let outcome = round.play_card(3, Card::Suited(Suit::Clubs, 2)).unwrap();
    match outcome {
        TrickOutcome::Closed { winner, .. } => assert_eq!(winner, 1),
        other => panic!("expected a closed trick, got {other:?}"),
    }
}

#[test]
fn three_oudler_taker_needs_fifty_six() {
    // Seat 0 holds the Petit; the 21 and the Excuse sit in the dog, so the
    // taker's side retains all three oudlers once the dog is resolved and
    // the threshold climbs to the full 56 points.
    let build = || {
        let hands = vec![
            (1..=14)
                .map(|rank| Card::Suited(Suit::Hearts, rank))
                .chain((1..=3).map(|rank| Card::Suited(Suit::Spades, rank)))
                .chain(std::iter::once(Card::Trump(1)))
                .collect::<Vec<_>>(),
            (2..=18)
                .map(Card::Trump)
                .chain(std::iter::once(Card::Suited(Suit::Spades, 4)))
                .collect::<Vec<_>>(),
            (5..=14)
                .map(|rank| Card::Suited(Suit::Spades, rank))
                .chain((1..=8).map(|rank| Card::Suited(Suit::Diamonds, rank)))
                .collect::<Vec<_>>(),
            (9..=14)
                .map(|rank| Card::Suited(Suit::Diamonds, rank))
                .chain((1..=12).map(|rank| Card::Suited(Suit::Clubs, rank)))
                .collect::<Vec<_>>(),
        ];
        let dog = vec![
            Card::Suited(Suit::Clubs, 13),
            Card::Suited(Suit::Clubs, 14),
            Card::Trump(19),
            Card::Trump(20),
            Card::Trump(21),
            Card::Excuse,
        ];
        Round::builder(4).unwrap().with_deal(hands, dog).build().unwrap()
    };

    let mut round = build();
    round
        .resolve_auction(AuctionOutcome::new(0, ContractLevel::GardeSans))
        .unwrap();
    assert_eq!(round.contract().unwrap().oudlers, 3);
    assert_eq!(round.contract().unwrap().points_needed, 56.0);

    // The mirrored check: a garde contre leaves the dog's two oudlers with
    // the defense, so only the Petit counts and the bar drops to 41.
    let mut round = build();
    round
        .resolve_auction(AuctionOutcome::new(0, ContractLevel::GardeContre))
        .unwrap();
    assert_eq!(round.contract().unwrap().oudlers, 1);
    assert_eq!(round.contract().unwrap().points_needed, 41.0);
}

#[test]
fn five_player_called_partner_scores_with_the_taker() {
    let mut bidding = PointBasedBidding::new();
    let mut discard = MaxPointsDiscard;
    'seeds: for seed in 0..256u64 {
        let mut round = Round::builder(5).unwrap().with_seed(seed).build().unwrap();
        let mut highest: Option<(Seat, ContractLevel)> = None;
        for seat in 0..5 {
            let current = highest.map(|(_, level)| level);
            if let Some(bid) = bidding.propose_bid(round.hand(seat).unwrap(), current) {
                if current.is_none_or(|level| bid > level) {
                    highest = Some((seat, bid));
                }
            }
        }
        let Some((taker, level)) = highest else {
            continue 'seeds;
        };
        let partner = (taker + 1) % 5;
        round
            .resolve_auction(AuctionOutcome::new(taker, level).with_partner(partner))
            .unwrap();
        if round.status() == RoundStatus::AwaitingDiscard {
            let hand = round.hand(taker).unwrap().to_vec();
            let ecart = discard.choose_discard(&hand, round.settings().dog_size);
            round.submit_discard(&ecart).unwrap();
        }
        random_playout(&mut round, seed);
        let outcome = round.outcome().expect("outcome");
        assert_eq!(outcome.score_deltas.len(), 5);
        assert_eq!(outcome.score_deltas.iter().sum::<i64>(), 0);
        // Taker and partner always move in the same direction.
        let taker_delta = outcome.score_deltas[taker];
        let partner_delta = outcome.score_deltas[partner];
        assert_eq!(taker_delta.signum(), partner_delta.signum());
        assert_eq!(taker_delta, partner_delta * 2);
        return;
    }
    panic!("no five-player auction succeeded across the seed range");
}
