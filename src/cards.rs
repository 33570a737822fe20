use std::fmt;

use rand::Rng;

use crate::error::{SolverError, SolverResult};

pub const RANKS_STR: &str = "23456789TJQKA";
pub const SUITS_STR: &str = "cdhs";

pub const DECK_SIZE: usize = 52;
pub const BOARD_SIZE: usize = 5;
pub const HANDS_SIZE: usize = 4;

/// Marker stored in the board/hand buffers before the first deal.
pub const UNSET: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

impl Rank {
    pub fn from_char(c: char) -> SolverResult<Rank> {
        RANKS_STR
            .find(c.to_ascii_uppercase())
            .map(|i| ALL_RANKS[i])
            .ok_or(SolverError::InvalidRank(c))
    }

    pub fn to_char(self) -> char {
        RANKS_STR.as_bytes()[self as usize] as char
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

impl Suit {
    pub fn from_char(c: char) -> SolverResult<Suit> {
        match c.to_ascii_lowercase() {
            'c' => Ok(Suit::Clubs),
            'd' => Ok(Suit::Diamonds),
            'h' => Ok(Suit::Hearts),
            's' => Ok(Suit::Spades),
            _ => Err(SolverError::InvalidSuit(c)),
        }
    }

    pub fn to_char(self) -> char {
        SUITS_STR.as_bytes()[self as usize] as char
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// A card as its deck index: `rank * 4 + suit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card(rank.index() * 4 + suit.index())
    }

    pub fn from_index(index: u8) -> Card {
        assert!((index as usize) < DECK_SIZE, "card index {} out of range", index);
        Card(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn rank(self) -> Rank {
        ALL_RANKS[(self.0 / 4) as usize]
    }

    pub fn suit(self) -> Suit {
        ALL_SUITS[(self.0 % 4) as usize]
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().to_char(), self.suit().to_char())
    }
}

pub fn parse_card(notation: &str) -> SolverResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(SolverError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0])?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

/// Parses concatenated card notation such as `"AsKd 7h"`. Duplicates are rejected.
pub fn parse_board(notation: &str) -> SolverResult<Vec<Card>> {
    let notation = notation.trim().replace([' ', ','], "");
    if notation.len() % 2 != 0 {
        return Err(SolverError::InvalidBoardNotation(notation));
    }
    let chars: Vec<char> = notation.chars().collect();
    let mut cards: Vec<Card> = Vec::with_capacity(chars.len() / 2);
    for pair in chars.chunks(2) {
        let s: String = pair.iter().collect();
        let card = parse_card(&s)?;
        if cards.contains(&card) {
            return Err(SolverError::DuplicateCard(s));
        }
        cards.push(card);
    }
    Ok(cards)
}

/// Card storage for one hand: a persistent deck permutation plus the five
/// board slots and four hole-card slots (p0, p0, p1, p1) drawn from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    deck: [u8; DECK_SIZE],
    pub board: [u8; BOARD_SIZE],
    pub hands: [u8; HANDS_SIZE],
}

impl Default for Deal {
    fn default() -> Self {
        Deal::new()
    }
}

impl Deal {
    pub fn new() -> Deal {
        let mut deck = [0u8; DECK_SIZE];
        for (i, slot) in deck.iter_mut().enumerate() {
            *slot = i as u8;
        }
        Deal {
            deck,
            board: [UNSET; BOARD_SIZE],
            hands: [UNSET; HANDS_SIZE],
        }
    }

    /// Partial Fisher-Yates: only the first nine positions are drawn, which is
    /// all a heads-up hand needs. The permutation carries over to the next deal.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let needed = BOARD_SIZE + HANDS_SIZE;
        for i in 0..needed {
            let j = rng.gen_range(i..DECK_SIZE);
            self.deck.swap(i, j);
        }
        self.board.copy_from_slice(&self.deck[..BOARD_SIZE]);
        self.hands.copy_from_slice(&self.deck[BOARD_SIZE..needed]);
    }

    pub fn is_dealt(&self) -> bool {
        self.board[0] != UNSET
    }

    pub fn hand(&self, player: usize) -> [u8; 2] {
        [self.hands[2 * player], self.hands[2 * player + 1]]
    }

    pub fn board_cards(&self) -> Vec<Card> {
        self.board.iter().filter(|&&c| c != UNSET).map(|&c| Card(c)).collect()
    }
}
