//! Seven-card hand ranker.
//!
//! `evaluate` maps seven (rank, suit) pairs to a `u32` whose bits 20.. hold
//! the hand category and whose lower nibbles hold kicker ranks in descending
//! significance, so plain integer comparison orders hands and equal scores
//! are exact ties.

use std::fmt;

use crate::cards::Card;

const CATEGORY_SHIFT: u32 = 20;

/// Five-bit runs of ranks, best straight first. The last entry is the wheel (A-5-4-3-2).
const STRAIGHT_MASKS: [u16; 10] = [
    0b1_1111_0000_0000,
    0b0_1111_1000_0000,
    0b0_0111_1100_0000,
    0b0_0011_1110_0000,
    0b0_0001_1111_0000,
    0b0_0000_1111_1000,
    0b0_0000_0111_1100,
    0b0_0000_0011_1110,
    0b0_0000_0001_1111,
    0b1_0000_0000_1111,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
}

impl HandCategory {
    pub fn from_score(score: u32) -> HandCategory {
        match score >> CATEGORY_SHIFT {
            9 => HandCategory::StraightFlush,
            8 => HandCategory::FourOfAKind,
            7 => HandCategory::FullHouse,
            6 => HandCategory::Flush,
            5 => HandCategory::Straight,
            4 => HandCategory::ThreeOfAKind,
            3 => HandCategory::TwoPair,
            2 => HandCategory::OnePair,
            1 => HandCategory::HighCard,
            other => panic!("score {:#x} has no hand category ({})", score, other),
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
        }
    }
}

#[inline]
fn score(category: HandCategory, kickers: u32) -> u32 {
    ((category as u32) << CATEGORY_SHIFT) | kickers
}

/// Highest straight contained in `ranks`, as 10 (ace high) down to 1 (wheel).
#[inline]
fn straight_high(ranks: u16) -> Option<u32> {
    STRAIGHT_MASKS
        .iter()
        .position(|&mask| ranks & mask == mask)
        .map(|r| 10 - r as u32)
}

/// Clears the lowest set bits of `mask` until only `keep` remain.
#[inline]
fn keep_highest(mut mask: u16, keep: u32) -> u16 {
    while mask.count_ones() > keep {
        mask &= mask - 1;
    }
    mask
}

/// Scores a seven-card hand. Ranks are 0 (deuce) ..= 12 (ace), suits 0..4.
pub fn evaluate(ranks: &[u8; 7], suits: &[u8; 7]) -> u32 {
    let mut rank_counts = [0u8; 13];
    let mut suit_counts = [0u8; 4];
    // count_counts[k] = number of ranks seen exactly k times
    let mut count_counts = [0u8; 5];
    let mut overall: u16 = 0;
    let mut per_suit = [0u16; 4];

    count_counts[0] = 7;
    for (&rank, &suit) in ranks.iter().zip(suits.iter()) {
        let (rank, suit) = (rank as usize, suit as usize);
        count_counts[rank_counts[rank] as usize] -= 1;
        rank_counts[rank] += 1;
        count_counts[rank_counts[rank] as usize] += 1;

        suit_counts[suit] += 1;
        overall |= 1 << rank;
        per_suit[suit] |= 1 << rank;
    }

    // With seven cards at most one suit can reach five.
    let flush_suit = (0..4).find(|&s| suit_counts[s] >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high(per_suit[s]) {
            return score(HandCategory::StraightFlush, high << 16);
        }
    }

    if count_counts[4] > 0 {
        let mut quad = 0u32;
        let mut kicker = 0u32;
        for (r, &count) in rank_counts.iter().enumerate() {
            if count == 4 {
                quad = r as u32;
            } else if count > 0 {
                kicker = r as u32;
            }
        }
        return score(HandCategory::FourOfAKind, (quad << 16) | (kicker << 12));
    }

    // Trips plus a pair, or two sets of trips.
    if count_counts[3] > 0 && count_counts[2] + count_counts[3] > 1 {
        let mut trips: Option<u32> = None;
        let mut pair = 0u32;
        for (r, &count) in rank_counts.iter().enumerate() {
            let r = r as u32;
            match count {
                2 => pair = pair.max(r),
                3 => {
                    if let Some(lower) = trips {
                        pair = pair.max(lower);
                    }
                    trips = Some(r);
                }
                _ => {}
            }
        }
        let trips = trips.unwrap_or_default();
        return score(HandCategory::FullHouse, (trips << 16) | (pair << 12));
    }

    if let Some(s) = flush_suit {
        return score(HandCategory::Flush, keep_highest(per_suit[s], 5) as u32);
    }

    if let Some(high) = straight_high(overall) {
        return score(HandCategory::Straight, high << 16);
    }

    if count_counts[3] > 0 {
        let mut trips = 0u32;
        let mut kickers = [0u32; 2];
        for (r, &count) in rank_counts.iter().enumerate() {
            match count {
                3 => trips = r as u32,
                1 => kickers = [r as u32, kickers[0]],
                _ => {}
            }
        }
        return score(
            HandCategory::ThreeOfAKind,
            (trips << 16) | (kickers[0] << 12) | (kickers[1] << 8),
        );
    }

    if count_counts[2] > 1 {
        // Ascending scan: the two highest pairs win, a third pair competes as kicker.
        let mut pairs = [0u32; 2];
        let mut kicker = 0u32;
        for (r, &count) in rank_counts.iter().enumerate() {
            let r = r as u32;
            match count {
                2 => {
                    if count_counts[2] > 2 {
                        kicker = kicker.max(pairs[1]);
                    }
                    pairs = [r, pairs[0]];
                }
                1 => kicker = kicker.max(r),
                _ => {}
            }
        }
        return score(
            HandCategory::TwoPair,
            (pairs[0] << 16) | (pairs[1] << 12) | (kicker << 8),
        );
    }

    if count_counts[2] > 0 {
        let mut pair = 0u32;
        let mut kickers = [0u32; 3];
        for (r, &count) in rank_counts.iter().enumerate() {
            match count {
                2 => pair = r as u32,
                1 => kickers = [r as u32, kickers[0], kickers[1]],
                _ => {}
            }
        }
        return score(
            HandCategory::OnePair,
            (pair << 16) | (kickers[0] << 12) | (kickers[1] << 8) | (kickers[2] << 4),
        );
    }

    score(HandCategory::HighCard, keep_highest(overall, 5) as u32)
}

/// Scores seven cards by splitting them into rank and suit indices.
pub fn evaluate_cards(cards: &[Card; 7]) -> u32 {
    let mut ranks = [0u8; 7];
    let mut suits = [0u8; 7];
    for (i, card) in cards.iter().enumerate() {
        ranks[i] = card.rank().index();
        suits[i] = card.suit().index();
    }
    evaluate(&ranks, &suits)
}

/// Category of a seven-card hand, for display.
pub fn categorize(cards: &[Card; 7]) -> HandCategory {
    HandCategory::from_score(evaluate_cards(cards))
}
