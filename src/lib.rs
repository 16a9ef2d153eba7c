/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The rules of chess: board representation, move validation, and game state.
mod board;

/// Command-line arguments and the commands accepted during a session.
mod cli;

/// Two-player session over standard input.
mod session;

pub use board::*;
pub use cli::*;
pub use session::*;
