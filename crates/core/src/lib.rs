#![forbid(unsafe_code)]

pub mod hangman;
pub mod model;
pub mod time;

pub use hangman::{GuessResult, HangmanError, HangmanRound, RoundState};
pub use time::Clock;
