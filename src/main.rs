/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::Result;
use chessh::{print_perft, setup_game, Cli, Command, Session};
use clap::Parser;

fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or_default() {
        Command::Play { fen, moves, seat } => {
            let game = setup_game(fen, &moves)?;
            Session::new(game, seat).run()
        }

        Command::Perft {
            depth,
            fen,
            moves,
            split,
        } => {
            let game = setup_game(fen, &moves)?;
            print_perft(&game, depth, split);
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}
