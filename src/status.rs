// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::board::Board;
use crate::types::Color;

/// How a finished game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The side to move was checkmated; the given color won.
    Checkmate(Color),

    /// The side to move had no legal move and was not in check. The game is drawn.
    Stalemate,
}

/// The state of play for the side about to move. Displaying a status yields the message shown
/// to the players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// The given color is to move and is not in check.
    ToMove(Color),

    /// The given color is to move and must get out of check.
    Check(Color),

    /// The game is over.
    Over(Outcome),
}

impl Status {
    pub fn is_terminal(self) -> bool {
        match self {
            Status::Over(_) => true,
            _ => false,
        }
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Status::Over(outcome) => Some(outcome),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::ToMove(color) => write!(f, "{}'s Turn", color.name()),
            Status::Check(color) => write!(f, "{}'s Turn - Check!", color.name()),
            Status::Over(Outcome::Checkmate(winner)) => {
                write!(f, "Checkmate! {} wins!", winner.name())
            }
            Status::Over(Outcome::Stalemate) => write!(f, "Stalemate! Game is a draw."),
        }
    }
}

/// Determines the status of the game for `side_to_move`.
///
/// | in check | has moves | status    |
/// |----------|-----------|-----------|
/// | yes      | no        | checkmate |
/// | no       | no        | stalemate |
/// | yes      | yes       | check     |
/// | no       | yes       | to move   |
pub fn evaluate(board: &Board, side_to_move: Color) -> Status {
    let in_check = board.is_check(side_to_move);
    let has_moves = board.has_legal_moves(side_to_move);
    match (in_check, has_moves) {
        (true, false) => Status::Over(Outcome::Checkmate(side_to_move.toggle())),
        (false, false) => Status::Over(Outcome::Stalemate),
        (true, true) => Status::Check(side_to_move),
        (false, true) => Status::ToMove(side_to_move),
    }
}
