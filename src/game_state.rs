//! Heads-up hold'em state machine with in-place transitions and exact undo.
//!
//! Streets:
//!
//! ```text
//! 0 deal hole cards   1 preflop betting
//! 2 deal flop         3 flop betting
//! 4 deal turn         5 turn betting
//! 6 deal river        7 river betting
//! 8 terminal
//! ```
//!
//! One `GameState` represents every node of a depth-first walk: `apply_*`
//! mutates it and hands back an undo record, and the matching `undo_*` call
//! consumes that record to restore the previous node exactly.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::cards::{Deal, BOARD_SIZE};
use crate::error::{SolverError, SolverResult};
use crate::hand_evaluator::evaluate;
use crate::packing::{InfoKey, PackedActions, PackedCards};

pub const STARTING_STACK: i32 = 400;
/// Forced bets: player 0 posts 2, player 1 posts 1 and acts first preflop.
pub const BLINDS: [i32; 2] = [2, 1];
pub const MIN_RAISE: i32 = 2;
pub const TERMINAL_STREET: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionKind {
    Fold = 0,
    Check = 1,
    Call = 2,
    Raise = 3,
}

/// A concrete action. `amount` is only meaningful for raises and is the
/// total contribution the raiser reaches this round ("raise to").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Action {
    pub kind: ActionKind,
    pub amount: i32,
}

impl Action {
    pub const FOLD: Action = Action { kind: ActionKind::Fold, amount: 0 };
    pub const CHECK: Action = Action { kind: ActionKind::Check, amount: 0 };
    pub const CALL: Action = Action { kind: ActionKind::Call, amount: 0 };

    pub fn raise_to(amount: i32) -> Action {
        Action { kind: ActionKind::Raise, amount }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ActionKind::Fold => write!(f, "fold"),
            ActionKind::Check => write!(f, "check"),
            ActionKind::Call => write!(f, "call"),
            ActionKind::Raise => write!(f, "raise to {}", self.amount),
        }
    }
}

/// The betting abstraction. Discriminants are the ids packed into the action
/// sequence, and their order is the order actions are enumerated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AbstractAction {
    Fold = 0,
    Check = 1,
    Call = 2,
    HalfPot = 3,
    FullPot = 4,
    TwoPot = 5,
}

pub const ALL_ABSTRACT_ACTIONS: [AbstractAction; 6] = [
    AbstractAction::Fold,
    AbstractAction::Check,
    AbstractAction::Call,
    AbstractAction::HalfPot,
    AbstractAction::FullPot,
    AbstractAction::TwoPot,
];

impl AbstractAction {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> AbstractAction {
        match ALL_ABSTRACT_ACTIONS.get(id as usize) {
            Some(&action) => action,
            None => panic!("no abstract action with id {}", id),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AbstractAction::Fold => "fold",
            AbstractAction::Check => "check",
            AbstractAction::Call => "call",
            AbstractAction::HalfPot => "half_pot",
            AbstractAction::FullPot => "full_pot",
            AbstractAction::TwoPot => "2x_pot",
        }
    }
}

/// Everything `undo_action` needs. Consumed by value, once.
#[derive(Debug)]
#[must_use = "an applied action must be undone with its record"]
pub struct ActionUndo {
    last_action: Option<Action>,
    contrib: [i32; 2],
    paid: i32,
    street: u8,
    round_ended: bool,
    abstract_action: AbstractAction,
    acting_player: usize,
}

impl ActionUndo {
    pub fn abstract_action(&self) -> AbstractAction {
        self.abstract_action
    }

    pub fn paid(&self) -> i32 {
        self.paid
    }

    pub fn round_ended(&self) -> bool {
        self.round_ended
    }
}

/// Everything `undo_chance` needs. Consumed by value, once.
#[derive(Debug)]
#[must_use = "an applied chance step must be undone with its record"]
pub struct ChanceUndo {
    /// Board and hole-card buffers as they were before the initial deal.
    dealt_over: Option<([u8; 5], [u8; 4])>,
    revealed: usize,
    stacks: [i32; 2],
    contrib: [i32; 2],
    pot: i32,
    active_player: usize,
    last_action: Option<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    deal: Deal,
    stacks: [i32; 2],
    contrib: [i32; 2],
    pot: i32,
    street: u8,
    active_player: usize,
    last_action: Option<Action>,
    packed_actions: PackedActions,
    packed_cards: [PackedCards; 2],
}

#[inline]
fn check_player(player: usize) {
    if player > 1 {
        panic!("{}", SolverError::InvalidPlayerIndex(player));
    }
}

impl GameState {
    /// A fresh hand at street 0 over the given card storage.
    pub fn new(deal: Deal) -> GameState {
        GameState {
            deal,
            stacks: [STARTING_STACK; 2],
            contrib: [0, 0],
            pot: 0,
            street: 0,
            active_player: 0,
            last_action: None,
            packed_actions: PackedActions::default(),
            packed_cards: [PackedCards::default(); 2],
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn street(&self) -> u8 {
        self.street
    }

    pub fn pot(&self) -> i32 {
        self.pot
    }

    pub fn active_player(&self) -> usize {
        self.active_player
    }

    pub fn contribution(&self, player: usize) -> i32 {
        check_player(player);
        self.contrib[player]
    }

    pub fn stack(&self, player: usize) -> i32 {
        check_player(player);
        self.stacks[player]
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    pub fn board(&self) -> [u8; 5] {
        self.deal.board
    }

    pub fn hand(&self, player: usize) -> [u8; 2] {
        check_player(player);
        self.deal.hand(player)
    }

    pub fn packed_actions(&self) -> &PackedActions {
        &self.packed_actions
    }

    pub fn packed_cards(&self, player: usize) -> &PackedCards {
        check_player(player);
        &self.packed_cards[player]
    }

    pub fn is_terminal(&self) -> bool {
        self.street == TERMINAL_STREET
    }

    pub fn is_chance_node(&self) -> bool {
        self.street % 2 == 0 && self.street != TERMINAL_STREET
    }

    pub fn is_betting_node(&self) -> bool {
        self.street % 2 == 1
    }

    // -----------------------------------------------------------------------
    // Legality
    // -----------------------------------------------------------------------

    fn facing_bet(&self) -> bool {
        self.contrib[self.active_player] < self.contrib[1 - self.active_player]
    }

    /// Inclusive `(min_raise_to, max_raise_to)`. The cap is the shorter
    /// effective stack; when it is below the minimum no raise is legal.
    pub fn raise_bounds(&self) -> (i32, i32) {
        let cur_bet = self.contrib[0].max(self.contrib[1]);
        let last_raise_size = (self.contrib[0] - self.contrib[1]).abs();
        let min_raise_to = cur_bet + MIN_RAISE.max(last_raise_size);
        let max_raise_to =
            (self.contrib[0] + self.stacks[0]).min(self.contrib[1] + self.stacks[1]);
        (min_raise_to, max_raise_to)
    }

    pub fn is_legal_action(&self, action: &Action) -> bool {
        if !self.is_betting_node() {
            return false;
        }
        let facing_bet = self.facing_bet();
        match action.kind {
            ActionKind::Fold | ActionKind::Call => facing_bet && action.amount == 0,
            ActionKind::Check => !facing_bet && action.amount == 0,
            ActionKind::Raise => {
                let (min_raise_to, max_raise_to) = self.raise_bounds();
                (min_raise_to..=max_raise_to).contains(&action.amount)
            }
        }
    }

    /// Appends the legal abstract actions, in abstract-id order, to `out`.
    pub fn legal_actions(&self, out: &mut Vec<(AbstractAction, Action)>) {
        if !self.is_betting_node() {
            return;
        }
        let mine = self.contrib[self.active_player];
        let pot = self.pot;
        let candidates = [
            (AbstractAction::Fold, Action::FOLD),
            (AbstractAction::Check, Action::CHECK),
            (AbstractAction::Call, Action::CALL),
            (AbstractAction::HalfPot, Action::raise_to(mine + pot / 2)),
            (AbstractAction::FullPot, Action::raise_to(mine + pot)),
            (AbstractAction::TwoPot, Action::raise_to(mine + 2 * pot)),
        ];
        out.extend(candidates.into_iter().filter(|(_, a)| self.is_legal_action(a)));
    }

    /// Recovers the abstract id of a concrete action from the current pot.
    ///
    /// Raises are matched on their increment over the raiser's contribution
    /// against `pot / 2`, `pot` and `2 * pot` with integer division, the same
    /// arithmetic `legal_actions` uses to produce them.
    pub fn abstract_action(&self, action: &Action) -> AbstractAction {
        match action.kind {
            ActionKind::Fold => AbstractAction::Fold,
            ActionKind::Check => AbstractAction::Check,
            ActionKind::Call => AbstractAction::Call,
            ActionKind::Raise => {
                let pot = self.pot;
                let increment = action.amount - self.contrib[self.active_player];
                if increment == pot / 2 {
                    AbstractAction::HalfPot
                } else if increment == pot {
                    AbstractAction::FullPot
                } else if increment == 2 * pot {
                    AbstractAction::TwoPot
                } else {
                    panic!("{}", SolverError::AbstractionMismatch { increment, pot });
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Betting transitions
    // -----------------------------------------------------------------------

    /// Applies a legal action in place. An illegal action panics; see
    /// `try_apply_action` for the checked entry.
    pub fn apply_action(&mut self, action: Action) -> ActionUndo {
        assert!(
            self.is_legal_action(&action),
            "{}",
            SolverError::IllegalAction(action.to_string())
        );

        let me = self.active_player;
        let abstract_action = self.abstract_action(&action);
        let paid = match action.kind {
            ActionKind::Fold | ActionKind::Check => 0,
            ActionKind::Call => self.contrib[1 - me] - self.contrib[me],
            ActionKind::Raise => action.amount - self.contrib[me],
        };

        let undo = ActionUndo {
            last_action: self.last_action,
            contrib: self.contrib,
            paid,
            street: self.street,
            round_ended: matches!(
                (self.last_action.map(|a| a.kind), action.kind),
                (_, ActionKind::Fold)
                    | (Some(ActionKind::Check), ActionKind::Check)
                    | (Some(ActionKind::Raise), ActionKind::Call)
            ),
            abstract_action,
            acting_player: me,
        };

        self.contrib[me] += paid;
        self.stacks[me] -= paid;
        self.pot += paid;
        self.packed_actions.push(abstract_action.id());

        if action.kind == ActionKind::Fold {
            self.street = TERMINAL_STREET;
            self.active_player = 1 - me;
            self.last_action = Some(action);
        } else if undo.round_ended {
            self.contrib = [0, 0];
            self.last_action = None;
            self.street += 1;
            self.active_player = 0;
        } else {
            self.active_player = 1 - me;
            self.last_action = Some(action);
        }

        undo
    }

    /// Checked variant of `apply_action` for callers outside the solver.
    pub fn try_apply_action(&mut self, action: Action) -> SolverResult<ActionUndo> {
        if !self.is_betting_node() {
            return Err(SolverError::NotABettingStreet(self.street));
        }
        if !self.is_legal_action(&action) {
            return Err(SolverError::IllegalAction(action.to_string()));
        }
        Ok(self.apply_action(action))
    }

    pub fn undo_action(&mut self, undo: ActionUndo) {
        self.street = undo.street;
        self.stacks[undo.acting_player] += undo.paid;
        self.pot -= undo.paid;
        self.active_player = if undo.round_ended {
            undo.acting_player
        } else {
            1 - self.active_player
        };
        self.contrib = undo.contrib;
        self.last_action = undo.last_action;
        self.packed_actions.pop();
    }

    // -----------------------------------------------------------------------
    // Chance transitions
    // -----------------------------------------------------------------------

    /// Advances one chance street: the initial deal with blinds, or the
    /// reveal of flop, turn or river into both players' observations.
    pub fn apply_chance<R: Rng>(&mut self, rng: &mut R) -> ChanceUndo {
        assert!(
            self.is_chance_node(),
            "apply_chance called on non-chance street {}",
            self.street
        );

        let mut undo = ChanceUndo {
            dealt_over: None,
            revealed: 0,
            stacks: self.stacks,
            contrib: self.contrib,
            pot: self.pot,
            active_player: self.active_player,
            last_action: self.last_action,
        };

        self.contrib = [0, 0];
        self.street += 1;
        self.active_player = 0;
        self.last_action = None;

        match self.street {
            1 => {
                undo.dealt_over = Some((self.deal.board, self.deal.hands));
                self.deal.shuffle(rng);

                for player in 0..2 {
                    self.stacks[player] -= BLINDS[player];
                    self.contrib[player] = BLINDS[player];
                    self.pot += BLINDS[player];
                }
                self.active_player = 1;

                self.packed_cards = [PackedCards::default(); 2];
                for player in 0..2 {
                    for card in self.deal.hand(player) {
                        self.packed_cards[player].push(card);
                    }
                }
            }
            3 => undo.revealed = self.reveal(0..3),
            5 => undo.revealed = self.reveal(3..4),
            7 => undo.revealed = self.reveal(4..BOARD_SIZE),
            street => unreachable!("chance step landed on street {}", street),
        }

        undo
    }

    fn reveal(&mut self, slots: std::ops::Range<usize>) -> usize {
        let count = slots.len();
        for slot in slots {
            let card = self.deal.board[slot];
            for packed in self.packed_cards.iter_mut() {
                packed.push(card);
            }
        }
        count
    }

    pub fn undo_chance(&mut self, undo: ChanceUndo) {
        self.street -= 1;
        self.stacks = undo.stacks;
        self.contrib = undo.contrib;
        self.pot = undo.pot;
        self.active_player = undo.active_player;
        self.last_action = undo.last_action;

        match undo.dealt_over {
            Some((board, hands)) => {
                self.deal.board = board;
                self.deal.hands = hands;
                self.packed_cards = [PackedCards::default(); 2];
            }
            None => {
                for packed in self.packed_cards.iter_mut() {
                    let len = packed.len() - undo.revealed;
                    packed.truncate(len);
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Payoffs and observations
    // -----------------------------------------------------------------------

    /// Net chips won by `player` over the hand. The two players' rewards sum to zero.
    pub fn get_rewards(&self, player: usize) -> f64 {
        check_player(player);
        if !self.is_terminal() {
            panic!("{}", SolverError::NotTerminal(self.street));
        }

        let win_share = match self.last_action {
            Some(Action { kind: ActionKind::Fold, .. }) => {
                // the winner was made active when the opponent folded
                if player == self.active_player {
                    1.0
                } else {
                    0.0
                }
            }
            _ => {
                let mine = self.showdown_score(player);
                let theirs = self.showdown_score(1 - player);
                if mine > theirs {
                    1.0
                } else if mine == theirs {
                    0.5
                } else {
                    0.0
                }
            }
        };

        (self.stacks[player] - STARTING_STACK) as f64 + win_share * self.pot as f64
    }

    fn showdown_score(&self, player: usize) -> u32 {
        let mut ranks = [0u8; 7];
        let mut suits = [0u8; 7];
        let hand = self.deal.hand(player);
        let cards = self.deal.board.iter().chain(hand.iter());
        for (i, &card) in cards.enumerate() {
            ranks[i] = card / 4;
            suits[i] = card % 4;
        }
        evaluate(&ranks, &suits)
    }

    /// The information set `player` is in at this node.
    pub fn get_id(&self, player: usize) -> InfoKey {
        check_player(player);
        InfoKey::new(
            &self.packed_cards[player],
            &self.packed_actions,
            self.pot,
            self.contrib[player],
            self.contrib[1 - player],
        )
    }
}
