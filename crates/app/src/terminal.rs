//! Line-oriented front-end: hangman over stdin/stdout and the gallery listing.

use std::io::{self, BufRead, Write};

use services::{GameError, GameLoopService, StackGallery};
use vocab_core::model::{EntryStatus, Pool};
use vocab_core::{GuessResult, HangmanRound, RoundState};

const GALLOWS: [&str; 8] = [
    "\n\n\n\n\n=====",
    "\n  |\n  |\n  |\n  |\n=====",
    "  +---+\n  |\n  |\n  |\n  |\n=====",
    "  +---+\n  |   O\n  |\n  |\n  |\n=====",
    "  +---+\n  |   O\n  |   |\n  |\n  |\n=====",
    "  +---+\n  |   O\n  |  /|\\\n  |\n  |\n=====",
    "  +---+\n  |   O\n  |  /|\\\n  |  /\n  |\n=====",
    "  +---+\n  |   O\n  |  /|\\\n  |  / \\\n  |\n=====",
];

const HELP: &str = "type a guess, or :hint  :letter  :skip  :reveal  :help  :quit";

/// Why the play loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayExit {
    /// The player quit or input ended.
    Quit,
    /// Every word has been played.
    Exhausted,
}

fn gallows(round: &HangmanRound) -> &'static str {
    let last = GALLOWS.len() - 1;
    let stage = usize::from(round.misses()) * last / usize::from(round.max_misses());
    GALLOWS[stage.min(last)]
}

fn pool_label(pool: Pool) -> &'static str {
    match pool {
        Pool::Known => "review: known",
        Pool::Unknown => "review: missed before",
        Pool::Unseen => "new word",
    }
}

fn status_label(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Unseen | EntryStatus::Pending => "unseen",
        EntryStatus::Known => "known",
        EntryStatus::Unknown => "unknown",
    }
}

fn show_round<W: Write>(game: &GameLoopService, out: &mut W) -> io::Result<()> {
    let Some(round) = game.round() else {
        return Ok(());
    };
    if let Some(board) = game.scoreboard() {
        writeln!(
            out,
            "[unseen {} | known {} | unknown {} | of {}]",
            board.unseen, board.known, board.unknown, board.total
        )?;
    }
    writeln!(out, "{}", gallows(round))?;
    let entry = round.entry();
    let origin = game.source().map(pool_label).unwrap_or_default();
    writeln!(out, "{} ({}, {}) {}", round.masked(), entry.category, entry.difficulty, origin)?;
    writeln!(out, "meaning: {}", entry.meaning)?;
    if let Some(example) = round.example_hint() {
        writeln!(out, "example: {example}")?;
    }
    Ok(())
}

fn show_answer<W: Write>(round: &HangmanRound, out: &mut W) -> io::Result<()> {
    let verdict = match round.state() {
        RoundState::Solved => "correct!",
        RoundState::Hanged => "hanged.",
        RoundState::Revealed => "revealed.",
        RoundState::InProgress => return Ok(()),
    };
    writeln!(out, "{verdict} {}", round.solution())?;
    writeln!(out, "{}", round.entry().short_form())?;
    Ok(())
}

/// Run hangman rounds until the player quits, input ends, or the vocabulary
/// is used up. Saving is left to the caller.
///
/// # Errors
///
/// Returns I/O errors from the terminal and unexpected game errors.
pub fn play<R: BufRead, W: Write>(
    game: &mut GameLoopService,
    input: R,
    out: &mut W,
) -> Result<PlayExit, Box<dyn std::error::Error>> {
    writeln!(out, "{HELP}")?;
    let mut lines = input.lines();

    loop {
        match game.next_word() {
            Ok(_) => {}
            Err(GameError::ContentExhausted) => {
                writeln!(out, "Every word has been played. Import a new vocabulary to go on.")?;
                return Ok(PlayExit::Exhausted);
            }
            Err(e) => return Err(e.into()),
        }
        show_round(game, out)?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            return Ok(PlayExit::Quit);
        };
        let line = line?;

        match line.trim() {
            ":quit" | ":menu" | ":q" => return Ok(PlayExit::Quit),
            ":help" => writeln!(out, "{HELP}")?,
            ":hint" => {
                if game.hint_example()?.is_none() {
                    writeln!(out, "no example for this word")?;
                }
            }
            ":letter" => {
                game.hint_first_letter()?;
            }
            ":skip" => {
                game.skip()?;
                writeln!(out, "skipped")?;
            }
            ":reveal" => {
                let recorded = game.reveal()?;
                if let Some(round) = game.round() {
                    show_answer(round, out)?;
                }
                if recorded.session_completed {
                    writeln!(out, "session complete, starting the next one")?;
                }
            }
            guess => {
                let turn = game.guess(guess)?;
                match turn.guess {
                    GuessResult::Ignored => {}
                    GuessResult::Miss { remaining, .. } => {
                        writeln!(out, "no. {remaining} left")?;
                    }
                    GuessResult::Solved | GuessResult::Hanged => {
                        if let Some(round) = game.round() {
                            show_answer(round, out)?;
                        }
                    }
                }
                if turn.recorded.is_some_and(|r| r.session_completed) {
                    writeln!(out, "session complete, starting the next one")?;
                }
            }
        }
    }
}

/// Print the gallery tiles, and the entries of one tile when asked.
///
/// # Errors
///
/// Returns I/O errors from the output.
pub fn render_gallery<W: Write>(
    gallery: &StackGallery,
    expand: Option<usize>,
    out: &mut W,
) -> io::Result<()> {
    if let Some(overview) = gallery.overview() {
        writeln!(
            out,
            "vocabulary: {} words, {} not yet drawn, {} sessions archived",
            overview.vocabulary, overview.remaining, overview.archived_sessions
        )?;
    } else {
        writeln!(out, "no master session yet")?;
    }

    for tile in gallery.tiles() {
        let when = tile
            .archived_at
            .map_or_else(|| "current".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        let mark = if tile.completed { "done" } else { "open" };
        writeln!(
            out,
            "#{:<3} {:<16} {:<4} {:>3} words  active {:>3}  known {:>3}  unknown {:>3}  unseen {:>3}",
            tile.index, when, mark, tile.total, tile.active, tile.known, tile.unknown, tile.unseen
        )?;
    }

    if let Some(index) = expand {
        match gallery.entries(index) {
            Some(entries) => {
                writeln!(out)?;
                for entry in entries {
                    writeln!(
                        out,
                        "{:<8} {} ({}): {}",
                        status_label(entry.status),
                        entry.word,
                        entry.category,
                        entry.meaning
                    )?;
                    if !entry.example.trim().is_empty() {
                        writeln!(out, "         e.g. {}", entry.example)?;
                    }
                }
            }
            None => writeln!(out, "no tile #{index}")?,
        }
    }
    Ok(())
}
