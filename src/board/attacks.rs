/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{validate::Rules, Color, Game, Move, Square};

impl Game {
    /// Returns `true` if any piece belonging to the opponent of `defender` threatens `square`.
    ///
    /// Only piece geometry and blocked paths matter here. Turn order is ignored, and so is
    /// whether the attacking move would expose the attacker's own King.
    ///
    /// En passant is not considered a threat.
    ///
    /// # Example
    /// ```
    /// # use chessh::{Color, Game, Square};
    /// let game = Game::new();
    /// let f3 = Square::from_uci("f3").unwrap();
    /// let e4 = Square::from_uci("e4").unwrap();
    /// assert!(game.is_attacked(f3, Color::Black));
    /// assert!(!game.is_attacked(e4, Color::Black));
    /// ```
    pub fn is_attacked(&self, square: Square, defender: Color) -> bool {
        let attacker = defender.opponent();

        self.position().pieces_of(attacker).any(|(from, _)| {
            self.validate_as(Move::new(from, square), attacker, Rules::Threat)
                .is_legal()
        })
    }

    /// Returns `true` if the King of `color` is attacked.
    ///
    /// A side without a King is always considered to be in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.position()
            .king_square(color)
            .map_or(true, |king| self.is_attacked(king, color))
    }
}
