/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Attack detection: whether a square is threatened, and whether a King is in check.
mod attacks;

/// A game in progress: turn order, move execution, and the end of the game.
mod game;

/// Moves and their textual notation.
mod moves;

/// Move-count oracle for checking the rules against published node counts.
mod perft;

/// Colors, piece kinds, and pieces with their movement history.
mod piece;

/// The 8x8 grid of pieces.
mod position;

/// Locations on the board.
mod square;

/// Movement rules for every piece kind.
mod validate;

pub use game::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use square::*;
pub use validate::Legality;
