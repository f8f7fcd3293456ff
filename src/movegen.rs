use std::fmt;

use crate::board::{Board, Color, Piece};

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

// One ply, never mutated after construction.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: (usize, usize),
    pub to: (usize, usize),
    pub piece_moved: (Color, Piece),
    pub piece_captured: Option<(Color, Piece)>,
    pub is_pawn_promotion: bool,
    pub is_en_passant: bool,
    pub is_castle: bool,
}

impl Move {
    pub fn new(
        from: (usize, usize),
        to: (usize, usize),
        piece_moved: (Color, Piece),
        piece_captured: Option<(Color, Piece)>,
    ) -> Self {
        Move {
            from,
            to,
            piece_moved,
            piece_captured,
            is_pawn_promotion: Move::reaches_far_rank(piece_moved, to),
            is_en_passant: false,
            is_castle: false,
        }
    }

    // Built from two user-picked squares. The special-move flags stay unset;
    // the caller matches this against the legal list and plays the generated
    // twin, which carries them.
    pub fn from_squares(from: (usize, usize), to: (usize, usize), board: &Board) -> Option<Self> {
        let piece_moved = board.squares[from.0][from.1]?;
        Some(Move::new(from, to, piece_moved, board.squares[to.0][to.1]))
    }

    pub fn new_en_passant(
        from: (usize, usize),
        to: (usize, usize),
        piece_moved: (Color, Piece),
    ) -> Self {
        Move {
            from,
            to,
            piece_moved,
            piece_captured: Some((piece_moved.0.opposite(), Piece::Pawn)),
            is_pawn_promotion: false,
            is_en_passant: true,
            is_castle: false,
        }
    }

    pub fn new_castle(from: (usize, usize), to: (usize, usize), piece_moved: (Color, Piece)) -> Self {
        Move {
            from,
            to,
            piece_moved,
            piece_captured: None,
            is_pawn_promotion: false,
            is_en_passant: false,
            is_castle: true,
        }
    }

    fn reaches_far_rank(piece_moved: (Color, Piece), to: (usize, usize)) -> bool {
        match piece_moved {
            (Color::White, Piece::Pawn) => to.0 == 0,
            (Color::Black, Piece::Pawn) => to.0 == 7,
            _ => false,
        }
    }
}

// Two moves naming the same squares are the same move. Input built from
// user-picked squares carries no flags, so matching it against the legal
// list must ignore everything but the squares.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_castle {
            let notation = if self.to.1 > self.from.1 { "O-O" } else { "O-O-O" };
            return write!(f, "{}", notation);
        }
        let destination = square_name(self.to.0, self.to.1);
        match self.piece_moved.1 {
            Piece::Pawn => {
                if self.piece_captured.is_some() {
                    write!(f, "{}x{}", file_letter(self.from.1), destination)
                } else {
                    write!(f, "{}", destination)
                }
            }
            piece => {
                if self.piece_captured.is_some() {
                    write!(f, "{}x{}", piece.letter(), destination)
                } else {
                    write!(f, "{}{}", piece.letter(), destination)
                }
            }
        }
    }
}

pub fn square_name(row: usize, col: usize) -> String {
    format!("{}{}", file_letter(col), 8 - row)
}

fn file_letter(col: usize) -> char {
    (b'a' + col as u8) as char
}

pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        MoveGenerator
    }

    // Full legal move list for the side to move. Also refreshes the
    // checkmate/stalemate flags, so callers read them right after this.
    pub fn generate_moves(&self, board: &mut Board) -> Vec<Move> {
        let pseudo_moves = self.generate_pseudo_moves(board);
        let mut moves = Vec::with_capacity(pseudo_moves.len());

        for mv in pseudo_moves {
            board.make_move(mv);
            // make_move flipped the turn; flip again to ask about the
            // mover's own king
            board.white_to_move = !board.white_to_move;
            let leaves_king_in_check = self.is_in_check(board);
            board.white_to_move = !board.white_to_move;
            board.undo_move();
            if !leaves_king_in_check {
                moves.push(mv);
            }
        }

        // Castle moves guard their own king safety and skip the filter
        let side = if board.white_to_move { Color::White } else { Color::Black };
        let (king_row, king_col) = board.king_location(side);
        self.generate_castle_moves(board, king_row, king_col, &mut moves);

        if moves.is_empty() {
            if self.is_in_check(board) {
                board.checkmate = true;
            } else {
                board.stalemate = true;
            }
        } else {
            board.checkmate = false;
            board.stalemate = false;
        }

        moves
    }

    // Every move the side to move could play if checks did not exist.
    // Castling is handled separately in generate_moves.
    pub fn generate_pseudo_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::new();
        let color = if board.white_to_move { Color::White } else { Color::Black };

        for row in 0..8 {
            for col in 0..8 {
                if let Some((piece_color, piece)) = board.squares[row][col] {
                    if piece_color != color {
                        continue;
                    }
                    match piece {
                        Piece::Pawn => self.pawn_moves(board, row, col, color, &mut moves),
                        Piece::Knight => self.knight_moves(board, row, col, color, &mut moves),
                        Piece::Bishop => self.sliding_moves(
                            board,
                            row,
                            col,
                            (color, piece),
                            &BISHOP_DIRECTIONS,
                            &mut moves,
                        ),
                        Piece::Rook => self.sliding_moves(
                            board,
                            row,
                            col,
                            (color, piece),
                            &ROOK_DIRECTIONS,
                            &mut moves,
                        ),
                        Piece::Queen => {
                            self.sliding_moves(
                                board,
                                row,
                                col,
                                (color, piece),
                                &ROOK_DIRECTIONS,
                                &mut moves,
                            );
                            self.sliding_moves(
                                board,
                                row,
                                col,
                                (color, piece),
                                &BISHOP_DIRECTIONS,
                                &mut moves,
                            );
                        }
                        Piece::King => self.king_moves(board, row, col, color, &mut moves),
                    }
                }
            }
        }

        moves
    }

    fn pawn_moves(
        &self,
        board: &Board,
        row: usize,
        col: usize,
        color: Color,
        moves: &mut Vec<Move>,
    ) {
        let (direction, start_row) = match color {
            Color::White => (-1i32, 6),
            Color::Black => (1i32, 1),
        };
        let piece_moved = (color, Piece::Pawn);

        // Single and double advances onto empty squares
        let one_ahead = row as i32 + direction;
        if (0..8).contains(&one_ahead) && board.squares[one_ahead as usize][col].is_none() {
            moves.push(Move::new((row, col), (one_ahead as usize, col), piece_moved, None));
            let two_ahead = row as i32 + 2 * direction;
            if row == start_row
                && (0..8).contains(&two_ahead)
                && board.squares[two_ahead as usize][col].is_none()
            {
                moves.push(Move::new((row, col), (two_ahead as usize, col), piece_moved, None));
            }
        }

        // Diagonal captures, ordinary or en passant
        for col_offset in [-1i32, 1] {
            let target_row = row as i32 + direction;
            let target_col = col as i32 + col_offset;
            if !(0..8).contains(&target_row) || !(0..8).contains(&target_col) {
                continue;
            }
            let (target_row, target_col) = (target_row as usize, target_col as usize);
            match board.squares[target_row][target_col] {
                Some((target_color, _)) if target_color != color => {
                    moves.push(Move::new(
                        (row, col),
                        (target_row, target_col),
                        piece_moved,
                        board.squares[target_row][target_col],
                    ));
                }
                None if board.en_passant_target == Some((target_row, target_col)) => {
                    moves.push(Move::new_en_passant(
                        (row, col),
                        (target_row, target_col),
                        piece_moved,
                    ));
                }
                _ => {}
            }
        }
    }

    fn knight_moves(
        &self,
        board: &Board,
        row: usize,
        col: usize,
        color: Color,
        moves: &mut Vec<Move>,
    ) {
        for &(row_offset, col_offset) in KNIGHT_OFFSETS.iter() {
            let target_row = row as i32 + row_offset;
            let target_col = col as i32 + col_offset;
            if !(0..8).contains(&target_row) || !(0..8).contains(&target_col) {
                continue;
            }
            let (target_row, target_col) = (target_row as usize, target_col as usize);
            match board.squares[target_row][target_col] {
                Some((target_color, _)) if target_color == color => {}
                occupant => {
                    moves.push(Move::new(
                        (row, col),
                        (target_row, target_col),
                        (color, Piece::Knight),
                        occupant,
                    ));
                }
            }
        }
    }

    fn king_moves(
        &self,
        board: &Board,
        row: usize,
        col: usize,
        color: Color,
        moves: &mut Vec<Move>,
    ) {
        for &(row_offset, col_offset) in KING_OFFSETS.iter() {
            let target_row = row as i32 + row_offset;
            let target_col = col as i32 + col_offset;
            if !(0..8).contains(&target_row) || !(0..8).contains(&target_col) {
                continue;
            }
            let (target_row, target_col) = (target_row as usize, target_col as usize);
            match board.squares[target_row][target_col] {
                Some((target_color, _)) if target_color == color => {}
                occupant => {
                    moves.push(Move::new(
                        (row, col),
                        (target_row, target_col),
                        (color, Piece::King),
                        occupant,
                    ));
                }
            }
        }
    }

    // Ray walk shared by rooks, bishops and queens. Stops at the board edge
    // or the first occupied square, capturing if it holds an enemy.
    fn sliding_moves(
        &self,
        board: &Board,
        row: usize,
        col: usize,
        piece_moved: (Color, Piece),
        directions: &[(i32, i32)],
        moves: &mut Vec<Move>,
    ) {
        for &(row_step, col_step) in directions {
            for distance in 1..8 {
                let target_row = row as i32 + row_step * distance;
                let target_col = col as i32 + col_step * distance;
                if !(0..8).contains(&target_row) || !(0..8).contains(&target_col) {
                    break;
                }
                let (target_row, target_col) = (target_row as usize, target_col as usize);
                match board.squares[target_row][target_col] {
                    None => {
                        moves.push(Move::new(
                            (row, col),
                            (target_row, target_col),
                            piece_moved,
                            None,
                        ));
                    }
                    Some((target_color, _)) => {
                        if target_color != piece_moved.0 {
                            moves.push(Move::new(
                                (row, col),
                                (target_row, target_col),
                                piece_moved,
                                board.squares[target_row][target_col],
                            ));
                        }
                        break;
                    }
                }
            }
        }
    }

    // Whether the side not on move attacks the given square. Hands the turn
    // over for one pseudo-legal generation, then hands it back.
    pub fn is_square_under_attack(&self, board: &mut Board, row: usize, col: usize) -> bool {
        board.white_to_move = !board.white_to_move;
        let opponent_moves = self.generate_pseudo_moves(board);
        board.white_to_move = !board.white_to_move;
        opponent_moves.iter().any(|mv| mv.to == (row, col))
    }

    pub fn is_in_check(&self, board: &mut Board) -> bool {
        let color = if board.white_to_move { Color::White } else { Color::Black };
        let (row, col) = board.king_location(color);
        self.is_square_under_attack(board, row, col)
    }

    // Castle moves check their own legality: never while in check, never
    // through occupied or attacked squares, and only with the rook still at
    // home. The rook square is an offset from the king, so it gets
    // bounds-checked like any other.
    fn generate_castle_moves(
        &self,
        board: &mut Board,
        row: usize,
        col: usize,
        moves: &mut Vec<Move>,
    ) {
        if self.is_in_check(board) {
            return;
        }
        let color = if board.white_to_move { Color::White } else { Color::Black };
        let (kingside, queenside) = match color {
            Color::White => (
                board.castle_rights.white_kingside,
                board.castle_rights.white_queenside,
            ),
            Color::Black => (
                board.castle_rights.black_kingside,
                board.castle_rights.black_queenside,
            ),
        };
        if kingside {
            self.kingside_castle_moves(board, row, col, color, moves);
        }
        if queenside {
            self.queenside_castle_moves(board, row, col, color, moves);
        }
    }

    fn kingside_castle_moves(
        &self,
        board: &mut Board,
        row: usize,
        col: usize,
        color: Color,
        moves: &mut Vec<Move>,
    ) {
        if col + 2 > 7 {
            return;
        }
        if board.squares[row][col + 1].is_some() || board.squares[row][col + 2].is_some() {
            return;
        }
        let rook_col = col + 3;
        if rook_col > 7 || board.squares[row][rook_col] != Some((color, Piece::Rook)) {
            return;
        }
        if self.is_square_under_attack(board, row, col + 1)
            || self.is_square_under_attack(board, row, col + 2)
        {
            return;
        }
        moves.push(Move::new_castle((row, col), (row, col + 2), (color, Piece::King)));
    }

    fn queenside_castle_moves(
        &self,
        board: &mut Board,
        row: usize,
        col: usize,
        color: Color,
        moves: &mut Vec<Move>,
    ) {
        if col < 3 {
            return;
        }
        if board.squares[row][col - 1].is_some()
            || board.squares[row][col - 2].is_some()
            || board.squares[row][col - 3].is_some()
        {
            return;
        }
        let rook_col = col as i32 - 4;
        if rook_col < 0 || board.squares[row][rook_col as usize] != Some((color, Piece::Rook)) {
            return;
        }
        if self.is_square_under_attack(board, row, col - 1)
            || self.is_square_under_attack(board, row, col - 2)
        {
            return;
        }
        moves.push(Move::new_castle((row, col), (row, col - 2), (color, Piece::King)));
    }
}

// Counts leaf nodes of the legal move tree, driving make/undo at every level.
pub fn perft(board: &mut Board, generator: &MoveGenerator, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generator.generate_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves {
        board.make_move(mv);
        nodes += perft(board, generator, depth - 1);
        board.undo_move();
    }
    nodes
}
