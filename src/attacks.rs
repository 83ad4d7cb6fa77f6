// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arrayvec::ArrayVec;

use crate::types::Square;

/// A (row, column) displacement.
pub type Offset = (i8, i8);

pub static KNIGHT_OFFSETS: [Offset; 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub static KING_OFFSETS: [Offset; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub static ROOK_DIRECTIONS: [Offset; 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub static BISHOP_DIRECTIONS: [Offset; 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub static QUEEN_DIRECTIONS: [Offset; 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

type Steps = ArrayVec<[Square; 8]>;

/// Table of the on-board squares reachable in one step from each square, for a fixed set of
/// offsets. Off-board targets are dropped when the table is built, so lookups never need a
/// bounds check.
struct StepTable {
    table: Vec<Steps>,
}

impl StepTable {
    pub fn new(offsets: &[Offset; 8]) -> StepTable {
        let mut st = StepTable {
            table: Vec::with_capacity(64),
        };

        for sq in Square::all() {
            let mut steps = Steps::new();
            for &(d_row, d_col) in offsets.iter() {
                if let Some(target) = sq.offset(d_row, d_col) {
                    steps.push(target);
                }
            }

            st.table.push(steps);
        }

        st
    }

    pub fn steps(&self, sq: Square) -> &[Square] {
        &self.table[sq.index()]
    }
}

lazy_static! {
    static ref KNIGHT_TABLE: StepTable = StepTable::new(&KNIGHT_OFFSETS);
    static ref KING_TABLE: StepTable = StepTable::new(&KING_OFFSETS);
}

pub fn knight_steps(sq: Square) -> &'static [Square] {
    KNIGHT_TABLE.steps(sq)
}

pub fn king_steps(sq: Square) -> &'static [Square] {
    KING_TABLE.steps(sq)
}
