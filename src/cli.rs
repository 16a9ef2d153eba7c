/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::{Parser, Subcommand};

use crate::{Color, Move, Square};

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(version, about, propagate_version = true)]
pub struct Cli {
    /// What to do. Defaults to starting a game from the standard position.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level modes of the program.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start a two-player game on this terminal.
    Play {
        /// Start from this FEN string instead of the standard position.
        #[arg(short, long)]
        fen: Option<String>,

        /// Moves to play from the starting position before handing over to the players.
        #[arg(short, long, num_args = 1..)]
        moves: Vec<Move>,

        /// Always draw the board from this side's perspective, instead of following the side to move.
        #[arg(short, long)]
        seat: Option<Color>,
    },

    /// Count the positions reachable at every depth up to `depth`, then exit.
    Perft {
        /// How many plies deep to count.
        depth: usize,

        /// Start from this FEN string instead of the standard position.
        #[arg(short, long)]
        fen: Option<String>,

        /// Moves to play from the starting position before counting.
        #[arg(short, long, num_args = 1..)]
        moves: Vec<Move>,

        /// If set, print the node count below each legal move at the root instead.
        #[arg(short, long, default_value = "false")]
        split: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Play {
            fen: None,
            moves: Vec::new(),
            seat: None,
        }
    }
}

/// A line of input during a session.
///
/// Anything that parses as a [`Move`] is played; everything else must be one of these commands.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<MOVE> | <COMMAND>")
)]
pub enum SessionCommand {
    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// End the session.
    #[command(alias = "quit")]
    Exit,

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Reverse the perspective the board is drawn from.
    Flip,

    /// Shows all legal moves in the current position, or for a specific piece.
    Moves { square: Option<Square> },

    /// Start over from the position this session began with.
    New,

    /// Count the positions reachable at every depth up to `depth`.
    Perft { depth: usize },

    /// Play a move for the side to move.
    #[command(skip)]
    Play { mv: Move },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },
}

impl FromStr for SessionCommand {
    type Err = clap::Error;
    /// Attempt to parse a [`SessionCommand`] from a string.
    ///
    /// Moves take priority. If `s` is not a move, it is parsed as a command.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(mv) = Move::from_uci(s) {
            return Ok(Self::Play { mv });
        }

        Self::try_parse_from(s.split_ascii_whitespace())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cli_defaults_to_play() {
        let cli = Cli::try_parse_from(["chessh"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(Command::default(), Command::Play { fen: None, .. }));
    }

    #[test]
    fn test_cli_perft() {
        let cli = Cli::try_parse_from(["chessh", "perft", "3", "--moves", "e2e4", "e7e5", "--split"])
            .unwrap();
        let Some(Command::Perft {
            depth,
            fen,
            moves,
            split,
        }) = cli.command
        else {
            panic!("expected perft");
        };
        assert_eq!(depth, 3);
        assert!(fen.is_none());
        assert_eq!(moves.len(), 2);
        assert!(split);

        assert!(Cli::try_parse_from(["chessh", "perft", "--moves", "e2e9"]).is_err());
    }

    #[test]
    fn test_cli_play_seat() {
        let cli = Cli::try_parse_from(["chessh", "play", "--seat", "black"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Play {
                seat: Some(Color::Black),
                ..
            })
        ));
    }

    #[test]
    fn test_session_commands() {
        let cmd = "e7e8q".parse::<SessionCommand>().unwrap();
        assert!(matches!(cmd, SessionCommand::Play { mv } if mv == "e7e8q"));

        assert!(matches!(
            "d".parse::<SessionCommand>().unwrap(),
            SessionCommand::Display
        ));
        assert!(matches!(
            "quit".parse::<SessionCommand>().unwrap(),
            SessionCommand::Exit
        ));
        assert!(matches!(
            "perft 3".parse::<SessionCommand>().unwrap(),
            SessionCommand::Perft { depth: 3 }
        ));
        assert!(matches!(
            "moves e2".parse::<SessionCommand>().unwrap(),
            SessionCommand::Moves { square: Some(sq) } if sq.to_string() == "e2"
        ));
        assert!("e2e9".parse::<SessionCommand>().is_err());
        assert!("dance".parse::<SessionCommand>().is_err());
    }
}
