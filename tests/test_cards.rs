use std::collections::HashSet;

use holdem_mccfr::cards::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_parse_card() {
    let card = parse_card("As").unwrap();
    assert_eq!(card.rank(), Rank::Ace);
    assert_eq!(card.suit(), Suit::Spades);
    assert_eq!(card.index(), 51);
}

#[test]
fn test_parse_card_lowercase_rank() {
    assert_eq!(parse_card("td").unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
}

#[test]
fn test_deuce_of_clubs_is_zero() {
    assert_eq!(parse_card("2c").unwrap().index(), 0);
}

#[test]
fn test_invalid_rank() {
    assert!(parse_card("Xs").is_err());
}

#[test]
fn test_invalid_suit() {
    assert!(parse_card("Ax").is_err());
}

#[test]
fn test_invalid_length() {
    assert!(parse_card("Asd").is_err());
}

#[test]
fn test_display_round_trips_notation() {
    for index in 0..52u8 {
        let card = Card::from_index(index);
        assert_eq!(parse_card(&card.to_string()).unwrap(), card);
    }
}

#[test]
fn test_parse_board_with_separators() {
    let board = parse_board("As Kd, 7h").unwrap();
    assert_eq!(board.len(), 3);
    assert_eq!(board[2].to_string(), "7h");
}

#[test]
fn test_parse_board_odd_length() {
    assert!(parse_board("AsK").is_err());
}

#[test]
fn test_parse_board_duplicate() {
    assert!(parse_board("AsAs").is_err());
}

#[test]
fn test_new_deal_is_unset() {
    let deal = Deal::new();
    assert!(!deal.is_dealt());
    assert!(deal.board.iter().all(|&c| c == UNSET));
    assert!(deal.hands.iter().all(|&c| c == UNSET));
    assert!(deal.board_cards().is_empty());
}

#[test]
fn test_shuffle_deals_nine_distinct_cards() {
    let mut deal = Deal::new();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        deal.shuffle(&mut rng);
        let cards: HashSet<u8> = deal.board.iter().chain(deal.hands.iter()).copied().collect();
        assert_eq!(cards.len(), 9);
        assert!(cards.iter().all(|&c| (c as usize) < DECK_SIZE));
    }
}

#[test]
fn test_shuffle_is_deterministic_per_seed() {
    let mut a = Deal::new();
    let mut b = Deal::new();
    let mut rng_a = StdRng::seed_from_u64(9);
    let mut rng_b = StdRng::seed_from_u64(9);
    for _ in 0..10 {
        a.shuffle(&mut rng_a);
        b.shuffle(&mut rng_b);
        assert_eq!(a, b);
    }
}

#[test]
fn test_hand_splits_players() {
    let mut deal = Deal::new();
    deal.shuffle(&mut StdRng::seed_from_u64(1));
    assert_eq!(deal.hand(0), [deal.hands[0], deal.hands[1]]);
    assert_eq!(deal.hand(1), [deal.hands[2], deal.hands[3]]);
}
