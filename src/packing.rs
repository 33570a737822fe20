//! Bit-packed observation encodings and the information-set key built from them.

use std::fmt;
use std::hash::{BuildHasherDefault, Hash, Hasher};

use crate::cards::Card;
use crate::error::SolverError;
use crate::game_state::AbstractAction;

/// Abstract action ids in 3-bit slots. Slot value 0 means empty, so ids are stored +1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PackedActions {
    bits: u64,
    len: u8,
}

impl PackedActions {
    pub const BITS_PER_ACTION: u32 = 3;
    pub const MAX_ACTIONS: usize = (64 / Self::BITS_PER_ACTION) as usize;
    const MASK: u64 = (1 << Self::BITS_PER_ACTION) - 1;

    pub fn push(&mut self, abstract_id: u8) {
        assert!(abstract_id <= 6, "abstract action id {} does not fit a slot", abstract_id);
        if self.len() >= Self::MAX_ACTIONS {
            panic!(
                "{}",
                SolverError::PackingOverflow { what: "actions", max: Self::MAX_ACTIONS }
            );
        }
        let shift = Self::BITS_PER_ACTION * self.len as u32;
        self.bits = (self.bits & !(Self::MASK << shift)) | ((abstract_id as u64 + 1) << shift);
        self.len += 1;
    }

    /// Removes the last slot and zeroes its bits.
    pub fn pop(&mut self) {
        assert!(self.len > 0, "pop from empty action sequence");
        self.len -= 1;
        let shift = Self::BITS_PER_ACTION * self.len as u32;
        self.bits &= !(Self::MASK << shift);
    }

    pub fn get(&self, idx: usize) -> u8 {
        assert!(idx < self.len(), "action slot {} out of range ({})", idx, self.len);
        let shift = Self::BITS_PER_ACTION * idx as u32;
        ((self.bits >> shift) & Self::MASK) as u8 - 1
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

/// Card indices in 6-bit slots, stored +1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PackedCards {
    bits: u64,
    len: u8,
}

impl PackedCards {
    pub const BITS_PER_CARD: u32 = 6;
    pub const MAX_CARDS: usize = (64 / Self::BITS_PER_CARD) as usize;
    const MASK: u64 = (1 << Self::BITS_PER_CARD) - 1;

    pub fn push(&mut self, card: u8) {
        assert!(card < 52, "card index {} out of range", card);
        if self.len() >= Self::MAX_CARDS {
            panic!(
                "{}",
                SolverError::PackingOverflow { what: "cards", max: Self::MAX_CARDS }
            );
        }
        let shift = Self::BITS_PER_CARD * self.len as u32;
        self.bits = (self.bits & !(Self::MASK << shift)) | ((card as u64 + 1) << shift);
        self.len += 1;
    }

    pub fn pop(&mut self) {
        assert!(self.len > 0, "pop from empty card sequence");
        self.len -= 1;
        let shift = Self::BITS_PER_CARD * self.len as u32;
        self.bits &= !(Self::MASK << shift);
    }

    pub fn truncate(&mut self, len: usize) {
        while self.len() > len {
            self.pop();
        }
    }

    pub fn get(&self, idx: usize) -> u8 {
        assert!(idx < self.len(), "card slot {} out of range ({})", idx, self.len);
        let shift = Self::BITS_PER_CARD * idx as u32;
        ((self.bits >> shift) & Self::MASK) as u8 - 1
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        (0..self.len()).map(move |i| Card::from_index(self.get(i)))
    }
}

/// Identity of one player's information set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InfoKey {
    pub cards: u64,
    pub actions: u64,
    /// `pot | my_contribution << 10 | opponent_contribution << 20`
    pub state: u64,
}

const STATE_FIELD_BITS: u32 = 10;
const STATE_FIELD_MASK: u64 = (1 << STATE_FIELD_BITS) - 1;

impl InfoKey {
    pub fn new(cards: &PackedCards, actions: &PackedActions, pot: i32, mine: i32, theirs: i32) -> Self {
        InfoKey {
            cards: cards.bits(),
            actions: actions.bits(),
            state: Self::pack_state(pot, mine, theirs),
        }
    }

    pub fn pack_state(pot: i32, mine: i32, theirs: i32) -> u64 {
        for value in [pot, mine, theirs] {
            assert!(
                (0..1 << STATE_FIELD_BITS).contains(&value),
                "{} does not fit a {}-bit state field",
                value,
                STATE_FIELD_BITS
            );
        }
        pot as u64 | (mine as u64) << STATE_FIELD_BITS | (theirs as u64) << (2 * STATE_FIELD_BITS)
    }

    pub fn pot(&self) -> u32 {
        (self.state & STATE_FIELD_MASK) as u32
    }

    pub fn my_contribution(&self) -> u32 {
        ((self.state >> STATE_FIELD_BITS) & STATE_FIELD_MASK) as u32
    }

    pub fn opponent_contribution(&self) -> u32 {
        ((self.state >> (2 * STATE_FIELD_BITS)) & STATE_FIELD_MASK) as u32
    }

    /// splitmix64 finalizer over the three fields.
    #[inline]
    pub fn mix(&self) -> u64 {
        let mut x = self.cards ^ self.actions.wrapping_add(0x9e37_79b9_7f4a_7c15);
        x ^= self.state.wrapping_mul(0x517c_c1b7_2722_0a95);
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
        x ^ (x >> 31)
    }

    fn cards_iter(&self) -> impl Iterator<Item = Card> {
        let bits = self.cards;
        (0..PackedCards::MAX_CARDS)
            .map(move |i| ((bits >> (PackedCards::BITS_PER_CARD * i as u32)) & PackedCards::MASK) as u8)
            .take_while(|&v| v != 0)
            .map(|v| Card::from_index(v - 1))
    }

    fn actions_iter(&self) -> impl Iterator<Item = AbstractAction> {
        let bits = self.actions;
        (0..PackedActions::MAX_ACTIONS)
            .map(move |i| ((bits >> (PackedActions::BITS_PER_ACTION * i as u32)) & PackedActions::MASK) as u8)
            .take_while(|&v| v != 0)
            .map(|v| AbstractAction::from_id(v - 1))
    }
}

impl Hash for InfoKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.mix());
    }
}

/// `AsKd|7h2c9s [call check half_pot] pot 12 (6/0)`
impl fmt::Display for InfoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<Card> = self.cards_iter().collect();
        let (hole, board) = cards.split_at(cards.len().min(2));
        for card in hole {
            write!(f, "{}", card)?;
        }
        if !board.is_empty() {
            write!(f, "|")?;
            for card in board {
                write!(f, "{}", card)?;
            }
        }
        write!(f, " [")?;
        for (i, action) in self.actions_iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", action.label())?;
        }
        write!(
            f,
            "] pot {} ({}/{})",
            self.pot(),
            self.my_contribution(),
            self.opponent_contribution()
        )
    }
}

/// Pass-through hasher: `InfoKey` already writes a fully mixed u64.
#[derive(Default, Clone, Copy)]
pub struct InfoKeyHasher(u64);

impl Hasher for InfoKeyHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8 | self.0 >> 56) ^ b as u64;
        }
    }

    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }
}

pub type BuildInfoKeyHasher = BuildHasherDefault<InfoKeyHasher>;
