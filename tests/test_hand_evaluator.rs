use holdem_mccfr::cards::*;
use holdem_mccfr::hand_evaluator::*;

fn score(notation: &str) -> u32 {
    let cards = parse_board(notation).unwrap();
    let seven: [Card; 7] = cards.as_slice().try_into().unwrap();
    evaluate_cards(&seven)
}

fn category(notation: &str) -> HandCategory {
    HandCategory::from_score(score(notation))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[test]
fn test_royal_flush() {
    assert_eq!(category("AsKs QsTsJs 2h3d"), HandCategory::StraightFlush);
    assert_eq!(score("AsKs QsTsJs 2h3d"), (9 << 20) | (10 << 16));
}

#[test]
fn test_straight_flush() {
    assert_eq!(category("9h8h 7h6h5h AcKd"), HandCategory::StraightFlush);
}

#[test]
fn test_steel_wheel() {
    assert_eq!(score("Ad2d 3d4d5d KcKh"), (9 << 20) | (1 << 16));
}

#[test]
fn test_four_of_a_kind() {
    assert_eq!(category("KsKh KdKc 5s2h3d"), HandCategory::FourOfAKind);
}

#[test]
fn test_full_house() {
    assert_eq!(category("AsAh AdKsKh 2c3d"), HandCategory::FullHouse);
    // aces full of kings
    assert_eq!(score("AsAh AdKsKh 2c3d"), (7 << 20) | (12 << 16) | (11 << 12));
}

#[test]
fn test_two_trips_make_full_house() {
    // nines full of fives: the lower set plays as the pair
    assert_eq!(score("9s9h9d 5s5h5d Ac"), (7 << 20) | (7 << 16) | (3 << 12));
}

#[test]
fn test_flush() {
    assert_eq!(category("AhJh 8h4h2h KsQd"), HandCategory::Flush);
}

#[test]
fn test_flush_keeps_five_highest() {
    let six_hearts = score("AhJh 8h4h2h 3h Qd");
    let five_hearts = score("AhJh 8h4h3h 2c Qd");
    assert_eq!(six_hearts, five_hearts);
}

#[test]
fn test_straight() {
    assert_eq!(category("9s8h 7d6c5s AcKd"), HandCategory::Straight);
}

#[test]
fn test_three_of_a_kind() {
    assert_eq!(category("7s7h 7dKs2c 9h4d"), HandCategory::ThreeOfAKind);
}

#[test]
fn test_two_pair() {
    assert_eq!(category("AsAh KdKs 5c3h2d"), HandCategory::TwoPair);
}

#[test]
fn test_one_pair() {
    assert_eq!(category("QsQh 9d7s5c3h2d"), HandCategory::OnePair);
}

#[test]
fn test_high_card() {
    assert_eq!(category("AsJh 9d7s5c3h2d"), HandCategory::HighCard);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn test_royal_flush_beats_everything_below_straight_flush() {
    let royal = score("AsKs QsTsJs 2h3d");
    for other in [
        "KsKh KdKc AsAh 3d",
        "AsAh AdKsKh 2c3d",
        "AhJh 8h4h2h KsQd",
        "As Kd QcJhTs 2c3d",
    ] {
        assert!(royal > score(other), "royal flush should beat {}", other);
    }
}

#[test]
fn test_quads_beat_any_full_house() {
    let weakest_quads = score("2s2h 2d2c 3s4h5d");
    let best_boat = score("AsAh AdKsKh Qc Jd");
    assert!(weakest_quads > best_boat);
}

#[test]
fn test_wheel_is_lowest_straight() {
    let wheel = score("As2h 3d4c5s KcKd");
    let six_high = score("6s2h 3d4c5s KcJd");
    let trips = score("AsAh AdKcQs 9c2d");

    assert_eq!(HandCategory::from_score(wheel), HandCategory::Straight);
    assert_eq!(wheel, (5 << 20) | (1 << 16));
    assert!(wheel < six_high);
    assert!(wheel > trips);
}

#[test]
fn test_higher_straight_wins() {
    assert!(score("Ts9h 8d7c6s 2c2d") > score("9s8h 7d6c5s 2c2d"));
}

#[test]
fn test_kicker_decides_pair() {
    let ace_kicker = score("KsKh Ad9s5c 3h2d");
    let queen_kicker = score("KsKh Qd9s5c 3h2d");
    assert!(ace_kicker > queen_kicker);
}

#[test]
fn test_third_pair_can_be_kicker() {
    // AA KK with QQ on board: the queen is the kicker, not the 5
    let with_queens = score("AsAh KdKs QcQh 5d");
    let with_five = score("AsAh KdKs 5c4h 3d");
    assert!(with_queens > with_five);
    assert_eq!(with_queens, (3 << 20) | (12 << 16) | (11 << 12) | (10 << 8));
}

#[test]
fn test_trips_kickers() {
    assert_eq!(
        score("7s7h 7dKs2c 9h4d"),
        (4 << 20) | (5 << 16) | (11 << 12) | (7 << 8)
    );
}

#[test]
fn test_board_plays_is_exact_tie() {
    let board = "AsKd QhJcTs";
    let a = score(&format!("{} 2c3d", board));
    let b = score(&format!("{} 2h4s", board));
    assert_eq!(a, b);
}

#[test]
fn test_flush_beats_straight() {
    assert!(score("AhJh 8h4h2h KsQd") > score("9s8h 7d6c5s AcKd"));
}

#[test]
fn test_raw_rank_suit_interface() {
    // A K Q J T of suit 3 plus two deuces
    let ranks = [12, 11, 10, 9, 8, 0, 0];
    let suits = [3, 3, 3, 3, 3, 0, 1];
    assert_eq!(evaluate(&ranks, &suits), (9 << 20) | (10 << 16));
}

#[test]
fn test_category_display() {
    assert_eq!(HandCategory::FullHouse.to_string(), "Full House");
    assert_eq!(categorize(&[
        parse_card("As").unwrap(),
        parse_card("Ah").unwrap(),
        parse_card("Kd").unwrap(),
        parse_card("Qc").unwrap(),
        parse_card("9s").unwrap(),
        parse_card("5h").unwrap(),
        parse_card("2d").unwrap(),
    ]), HandCategory::OnePair);
}
