pub mod buffer_pool;
pub mod cards;
pub mod cfr;
pub mod cli;
pub mod display;
pub mod error;
pub mod game_state;
pub mod hand_evaluator;
pub mod info_set;
pub mod packing;
