/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Game, Move};

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// # Example
/// ```
/// # use chessh::{perft, Game};
/// assert_eq!(perft(&Game::new(), 2), 400);
/// ```
#[inline(always)]
pub fn perft(game: &Game, depth: usize) -> u64 {
    perft_generic::<true>(game, depth)
}

/// Generic version of [`perft`] that allows you to specify whether to perform bulk counting.
///
/// Perft keeps exploring after a game has ended by inactivity, since the draw thresholds
/// only end a game when [`Game::make_move`] reports them.
pub fn perft_generic<const BULK: bool>(game: &Game, depth: usize) -> u64 {
    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && depth == 1 {
        return game.legal_moves().len() as u64;
    }
    // Recursion limit; return 1, since we're fathoming this node.
    else if depth == 0 {
        return 1;
    }

    game.legal_moves().into_iter().fold(0, |nodes, mv| {
        nodes
            + game
                .with_move_made(mv)
                .map_or(0, |child| perft_generic::<BULK>(&child, depth - 1))
    })
}

/// Perform a splitperft at the specified depth, returning the number of nodes reachable
/// after each move available at the root.
///
/// The moves are in the order [`Game::legal_moves`] produces them.
pub fn splitperft(game: &Game, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    game.legal_moves()
        .into_iter()
        .filter_map(|mv| {
            let child = game.with_move_made(mv)?;
            Some((mv, perft(&child, depth - 1)))
        })
        .collect()
}

/// Counts the positions reachable at every ply from 1 through `depth`.
///
/// The last entry equals [`perft`] at `depth`.
///
/// # Example
/// ```
/// # use chessh::{perft_by_depth, Game};
/// assert_eq!(perft_by_depth(&Game::new(), 3), [20, 400, 8902]);
/// ```
pub fn perft_by_depth(game: &Game, depth: usize) -> Vec<u64> {
    let mut counts = vec![0; depth];
    count_by_depth(game, 0, &mut counts);
    counts
}

fn count_by_depth(game: &Game, ply: usize, counts: &mut [u64]) {
    if ply >= counts.len() {
        return;
    }

    let moves = game.legal_moves();
    counts[ply] += moves.len() as u64;

    // Bulk count the last ply
    if ply + 1 == counts.len() {
        return;
    }

    for mv in moves {
        if let Some(child) = game.with_move_made(mv) {
            count_by_depth(&child, ply + 1, counts);
        }
    }
}
