// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The game session. A presentation layer owns a `Board` and a `GameState` and drives them
//! through the functions in this module, one input at a time.
use crate::board::Board;
use crate::status::{self, Outcome, Status};
use crate::types::{Color, Piece, Square, TableIndex};

/// Everything about a game in progress other than piece placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    side_to_move: Color,
    selected: Option<Square>,
    legal_moves: Vec<Square>,
    captured: [Vec<Piece>; 2],
    status: Status,
}

impl GameState {
    pub fn new() -> GameState {
        GameState {
            side_to_move: Color::White,
            selected: None,
            legal_moves: Vec::new(),
            captured: [Vec::new(), Vec::new()],
            status: Status::ToMove(Color::White),
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Legal destinations for the selected piece. Empty when nothing is selected.
    pub fn legal_moves(&self) -> &[Square] {
        &self.legal_moves
    }

    /// Pieces of the given color that have been captured, in the order they were taken.
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.as_index()]
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.status.outcome()
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.legal_moves.clear();
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

/// Why a move was refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The game has already ended.
    GameOver,

    /// `from` is not the currently selected square.
    NotSelected,

    /// `to` is not one of the selected piece's legal destinations.
    IllegalDestination,
}

/// Result of `try_move`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was made. Carries the captured piece, if any, and the status of the side that
    /// now has the move.
    Moved {
        captured: Option<Piece>,
        status: Status,
    },

    /// The move was refused and nothing changed.
    Rejected(RejectReason),
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        match self {
            MoveOutcome::Moved { .. } => true,
            MoveOutcome::Rejected(_) => false,
        }
    }
}

/// Result of `handle_click`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click had no effect.
    Ignored,

    /// A piece of the side to move is now selected.
    Selected(Square),

    /// The previous selection was dropped.
    Deselected,

    /// The selected piece moved to the clicked square.
    Moved {
        from: Square,
        to: Square,
        captured: Option<Piece>,
        status: Status,
    },
}

/// Creates a new game: the standard starting layout with White to move.
pub fn new_game() -> (Board, GameState) {
    (Board::starting(), GameState::new())
}

/// Starts over. Equivalent to `new_game`.
pub fn reset() -> (Board, GameState) {
    new_game()
}

/// Selects `square` and computes the legal destinations of the piece on it. Selecting an empty
/// square, a piece of the side not to move, or anything after the game has ended leaves no
/// selection and an empty move set.
pub fn select_square(board: &Board, state: &mut GameState, square: Square) {
    state.clear_selection();
    if state.is_over() {
        debug!("select {}: game is over", square);
        return;
    }

    match board.piece_at(square) {
        Some(piece) if piece.color == state.side_to_move => {
            state.selected = Some(square);
            state.legal_moves = board.legal_moves(square).into_iter().collect();
        }
        Some(_) => debug!("select {}: not {}'s piece", square, state.side_to_move.name()),
        None => debug!("select {}: empty square", square),
    }
}

/// Moves the selected piece from `from` to `to` if `to` is among the legal destinations
/// computed when `from` was selected. On success the capture is recorded, the turn passes and
/// the new side to move is evaluated.
pub fn try_move(board: &mut Board, state: &mut GameState, from: Square, to: Square) -> MoveOutcome {
    if state.is_over() {
        return MoveOutcome::Rejected(RejectReason::GameOver);
    }

    if state.selected != Some(from) {
        debug!("move {}{} rejected: {} is not selected", from, to, from);
        return MoveOutcome::Rejected(RejectReason::NotSelected);
    }

    if !state.legal_moves.contains(&to) {
        debug!("move {}{} rejected: illegal destination", from, to);
        return MoveOutcome::Rejected(RejectReason::IllegalDestination);
    }

    let captured = board.apply_move(from, to);
    if let Some(piece) = captured {
        state.captured[piece.color.as_index()].push(piece);
    }

    state.clear_selection();
    state.side_to_move = state.side_to_move.toggle();
    state.status = status::evaluate(board, state.side_to_move);
    if let Some(outcome) = state.status.outcome() {
        info!("game over after {}{}: {:?}", from, to, outcome);
    }

    MoveOutcome::Moved {
        captured,
        status: state.status,
    }
}

/// Processes a click on `square` the way a board UI would: a click on a legal destination of the
/// selected piece moves it, a click on another piece of the side to move selects that piece, and
/// any other click drops the selection.
pub fn handle_click(board: &mut Board, state: &mut GameState, square: Square) -> ClickOutcome {
    if state.is_over() {
        return ClickOutcome::Ignored;
    }

    if let Some(from) = state.selected {
        if let MoveOutcome::Moved { captured, status } = try_move(board, state, from, square) {
            return ClickOutcome::Moved {
                from,
                to: square,
                captured,
                status,
            };
        }
    }

    let had_selection = state.selected.is_some();
    select_square(board, state, square);
    match state.selected {
        Some(sq) => ClickOutcome::Selected(sq),
        None if had_selection => ClickOutcome::Deselected,
        None => ClickOutcome::Ignored,
    }
}
