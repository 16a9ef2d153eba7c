/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::Instant,
};

use anyhow::{bail, Context, Result};
use log::{info, warn};

use crate::{
    perft, perft_by_depth, splitperft, Color, Game, Move, MoveResult, PieceKind, SessionCommand,
};

/// Sets up a [`Game`] from the supplied FEN string (defaults to the standard startpos if not supplied),
/// and then applies `moves` one-by-one to it.
///
/// Fails if any of the moves is not accepted.
pub fn setup_game<T: AsRef<str>>(fen: Option<T>, moves: &[Move]) -> Result<Game> {
    let mut game = match fen {
        Some(fen) => Game::from_fen(fen.as_ref())?,
        None => Game::default(),
    };

    for (i, &mv) in moves.iter().enumerate() {
        let result = game.make_move(mv);
        if !result.is_accepted() {
            bail!("Cannot play move #{} ({mv}) of the start sequence: {result}", i + 1);
        }
    }

    Ok(game)
}

/// Prints a perft of `game` at `depth`.
///
/// If `split` is set, the node count below every legal root move is printed, followed by the total.
/// Otherwise the count at every depth up to `depth` is printed.
pub fn print_perft(game: &Game, depth: usize, split: bool) {
    let start = Instant::now();

    let nodes = if split {
        let mut nodes = 0;
        for (mv, count) in splitperft(game, depth) {
            println!("{mv}\t{count}");
            nodes += count;
        }
        println!();
        nodes
    } else {
        let counts = perft_by_depth(game, depth);
        for (ply, count) in counts.iter().enumerate() {
            println!("{}\t{count}", ply + 1);
        }
        counts.last().copied().unwrap_or_else(|| perft(game, depth))
    };

    let elapsed = start.elapsed();
    let nps = (nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)) as u64;
    println!("Nodes: {nodes}\nTime: {}ms\nNPS: {nps}", elapsed.as_millis());
}

/// A two-player game played by alternately typing moves on a single terminal.
///
/// Every line of input is either a move for the side to move or a [`SessionCommand`].
#[derive(Debug)]
pub struct Session {
    /// The game being played.
    game: Game,

    /// The game as it was when the session started, restored by the `new` command.
    initial: Game,

    /// If set, the board is always drawn from this side's perspective.
    seat: Option<Color>,

    /// Whether to draw the board from the opposite perspective.
    flipped: bool,

    /// The result that ended the game, if it has ended.
    outcome: Option<MoveResult>,

    /// One half of a channel, responsible for sending commands to the session to execute.
    sender: Sender<SessionCommand>,

    /// One half of a channel, responsible for receiving commands for the session to execute.
    receiver: Receiver<SessionCommand>,
}

impl Session {
    /// Constructs a new [`Session`] starting from `game`, to be executed with [`Session::run`].
    pub fn new(game: Game, seat: Option<Color>) -> Self {
        let (sender, receiver) = channel();

        Self {
            game,
            initial: game,
            seat,
            flipped: false,
            outcome: None,
            sender,
            receiver,
        }
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The result that ended the game, if it has ended.
    pub fn outcome(&self) -> Option<MoveResult> {
        self.outcome
    }

    /// The color whose perspective the board is currently drawn from.
    pub fn perspective(&self) -> Color {
        let perspective = self.seat.unwrap_or(self.game.side_to_move());
        if self.flipped {
            perspective.opponent()
        } else {
            perspective
        }
    }

    /// Execute the main event loop for the session.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                warn!("Input handler thread stopping: {err}");
            }
        });

        self.display();
        self.prompt();

        while let Ok(cmd) = self.receiver.recv() {
            if !self.execute(cmd) {
                break;
            }
        }

        Ok(())
    }

    /// Executes a single [`SessionCommand`], returning `false` if the session should end.
    pub fn execute(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Display => self.display(),

            SessionCommand::Exit => return false,

            SessionCommand::Fen => println!("{}", self.game.to_fen()),

            SessionCommand::Flip => {
                self.flipped = !self.flipped;
                self.display();
            }

            SessionCommand::Moves { square } => {
                let moves = if let Some(square) = square {
                    self.game.legal_moves_from(square)
                } else {
                    self.game.legal_moves()
                };

                let moves_string = if moves.is_empty() {
                    String::from("(none)")
                } else {
                    moves
                        .into_iter()
                        .map(|mv| mv.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("{moves_string}");
            }

            SessionCommand::New => {
                self.game = self.initial;
                self.outcome = None;
                self.flipped = false;
                self.display();
                self.prompt();
            }

            SessionCommand::Perft { depth } => print_perft(&self.game, depth, false),

            SessionCommand::Splitperft { depth } => print_perft(&self.game, depth, true),

            SessionCommand::Play { mv } => self.play(mv),
        }

        true
    }

    /// Plays `mv` for the side to move and reports what happened.
    fn play(&mut self, mv: Move) {
        if let Some(outcome) = self.outcome {
            println!("The game is over ({outcome}). Type `new` to play again.");
            return;
        }

        let result = self.game.make_move(mv);
        match result {
            MoveResult::IllegalMove => {
                println!("Illegal move: {mv}");
                self.prompt();
            }

            MoveResult::MissingPromotion => {
                println!(
                    "Missing promotion: resubmit with q, r, b, or n, such as {}",
                    mv.with_promotion(PieceKind::Queen)
                );
                self.prompt();
            }

            MoveResult::Ok => {
                self.display();
                self.prompt();
            }

            MoveResult::DrawOffer => {
                self.display();
                println!(
                    "{} plies without a capture or pawn move. {result}.",
                    self.game.idle_plies()
                );
                self.prompt();
            }

            MoveResult::WhiteWin | MoveResult::BlackWin | MoveResult::ForcedDraw => {
                self.display();
                println!("{result}");
                info!("Session finished after {} plies", self.game.duration());
                self.outcome = Some(result);
            }
        }
    }

    /// Executes the `display` command, printing the board from the current perspective.
    fn display(&self) {
        println!("{}\n", self.game.position().render(self.perspective()));
    }

    fn prompt(&self) {
        println!("{} to move:", self.game.side_to_move());
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<SessionCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line from stdin")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(SessionCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Session received input of 0 bytes and is quitting");
        }

        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<SessionCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to session")?,

            // Not a move or a command; print the usage and keep going
            Err(err) => eprintln!("{err}"),
        }
    }
}
