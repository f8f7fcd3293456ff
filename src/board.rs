use std::fmt;

use crate::movegen::Move;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub fn letter(&self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }
}

// Castling availability for both sides. Always passed around by value so a
// saved copy stays untouched by later updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastleRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastleRights {
    pub fn new() -> Self {
        CastleRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

// One live chess position. Row 0 is the eighth rank (black's back rank),
// row 7 the first, so white pawns step toward smaller row numbers.
#[derive(Debug, Clone)]
pub struct Board {
    pub squares: [[Option<(Color, Piece)>; 8]; 8],
    pub white_to_move: bool,
    pub white_king: (usize, usize),
    pub black_king: (usize, usize),
    pub checkmate: bool,
    pub stalemate: bool,
    pub en_passant_target: Option<(usize, usize)>,
    pub castle_rights: CastleRights,
    pub move_log: Vec<Move>,
    // Per-ply history so undo restores state that the board alone cannot
    // reproduce. Both start seeded with the pre-game value.
    en_passant_log: Vec<Option<(usize, usize)>>,
    castle_rights_log: Vec<CastleRights>,
}

impl Board {
    pub fn new() -> Self {
        let mut squares = [[None; 8]; 8];
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for col in 0..8 {
            squares[0][col] = Some((Color::Black, back_rank[col]));
            squares[1][col] = Some((Color::Black, Piece::Pawn));
            squares[6][col] = Some((Color::White, Piece::Pawn));
            squares[7][col] = Some((Color::White, back_rank[col]));
        }

        Board {
            squares,
            white_to_move: true,
            white_king: (7, 4),
            black_king: (0, 4),
            checkmate: false,
            stalemate: false,
            en_passant_target: None,
            castle_rights: CastleRights::new(),
            move_log: Vec::new(),
            en_passant_log: vec![None],
            castle_rights_log: vec![CastleRights::new()],
        }
    }

    // Blank board for setting up positions. Both kings must be placed with
    // place_piece before asking for moves.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            white_to_move: true,
            white_king: (7, 4),
            black_king: (0, 4),
            checkmate: false,
            stalemate: false,
            en_passant_target: None,
            castle_rights: CastleRights::new(),
            move_log: Vec::new(),
            en_passant_log: vec![None],
            castle_rights_log: vec![CastleRights::new()],
        }
    }

    pub fn place_piece(&mut self, row: usize, col: usize, color: Color, piece: Piece) {
        self.squares[row][col] = Some((color, piece));
        if piece == Piece::King {
            match color {
                Color::White => self.white_king = (row, col),
                Color::Black => self.black_king = (row, col),
            }
        }
    }

    pub fn get_piece_at(&self, row: usize, col: usize) -> Option<(Color, Piece)> {
        self.squares[row][col]
    }

    pub fn king_location(&self, color: Color) -> (usize, usize) {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    // Applies a move without any legality checking. Callers only ever feed
    // moves drawn from the generated legal list.
    pub fn make_move(&mut self, mv: Move) {
        let (from_row, from_col) = mv.from;
        let (to_row, to_col) = mv.to;

        self.squares[from_row][from_col] = None;
        self.squares[to_row][to_col] = Some(mv.piece_moved);
        self.move_log.push(mv);
        self.white_to_move = !self.white_to_move;

        if mv.piece_moved == (Color::White, Piece::King) {
            self.white_king = mv.to;
        } else if mv.piece_moved == (Color::Black, Piece::King) {
            self.black_king = mv.to;
        }

        // Pawns reaching the far rank always become queens
        if mv.is_pawn_promotion {
            self.squares[to_row][to_col] = Some((mv.piece_moved.0, Piece::Queen));
        }

        // The pawn captured en passant stands beside the destination, on the
        // capturing pawn's starting rank
        if mv.is_en_passant {
            self.squares[from_row][to_col] = None;
        }

        // A two-square pawn advance exposes the jumped square to en passant
        if mv.piece_moved.1 == Piece::Pawn && from_row.abs_diff(to_row) == 2 {
            self.en_passant_target = Some(((from_row + to_row) / 2, from_col));
        } else {
            self.en_passant_target = None;
        }

        // Castling also carries the rook across the king
        if mv.is_castle {
            if to_col > from_col {
                self.squares[to_row][to_col - 1] = self.squares[to_row][to_col + 1];
                self.squares[to_row][to_col + 1] = None;
            } else {
                self.squares[to_row][to_col + 1] = self.squares[to_row][to_col - 2];
                self.squares[to_row][to_col - 2] = None;
            }
        }

        self.en_passant_log.push(self.en_passant_target);

        self.update_castle_rights(&mv);
        self.castle_rights_log.push(self.castle_rights);
    }

    // Exact inverse of make_move. A no-op when nothing has been played.
    pub fn undo_move(&mut self) {
        let mv = match self.move_log.pop() {
            Some(mv) => mv,
            None => return,
        };
        let (from_row, from_col) = mv.from;
        let (to_row, to_col) = mv.to;

        self.squares[from_row][from_col] = Some(mv.piece_moved);
        self.squares[to_row][to_col] = mv.piece_captured;
        self.white_to_move = !self.white_to_move;

        if mv.piece_moved == (Color::White, Piece::King) {
            self.white_king = mv.from;
        } else if mv.piece_moved == (Color::Black, Piece::King) {
            self.black_king = mv.from;
        }

        // The en-passant victim returns beside the destination square
        if mv.is_en_passant {
            self.squares[to_row][to_col] = None;
            self.squares[from_row][to_col] = mv.piece_captured;
        }

        self.en_passant_log.pop();
        self.en_passant_target = self.en_passant_log.last().copied().unwrap_or(None);

        // Walk the castled rook back to its corner
        if mv.is_castle {
            if to_col > from_col {
                self.squares[to_row][to_col + 1] = self.squares[to_row][to_col - 1];
                self.squares[to_row][to_col - 1] = None;
            } else {
                self.squares[to_row][to_col - 2] = self.squares[to_row][to_col + 1];
                self.squares[to_row][to_col + 1] = None;
            }
        }

        self.castle_rights_log.pop();
        self.castle_rights = self
            .castle_rights_log
            .last()
            .copied()
            .unwrap_or_else(CastleRights::new);

        // The position is live again
        self.checkmate = false;
        self.stalemate = false;
    }

    // Rights only ever tighten: a king move drops both of its sides, a rook
    // leaving or being captured on its home corner drops that side.
    fn update_castle_rights(&mut self, mv: &Move) {
        match mv.piece_moved {
            (Color::White, Piece::King) => {
                self.castle_rights.white_kingside = false;
                self.castle_rights.white_queenside = false;
            }
            (Color::Black, Piece::King) => {
                self.castle_rights.black_kingside = false;
                self.castle_rights.black_queenside = false;
            }
            (Color::White, Piece::Rook) if mv.from.0 == 7 => {
                if mv.from.1 == 0 {
                    self.castle_rights.white_queenside = false;
                } else if mv.from.1 == 7 {
                    self.castle_rights.white_kingside = false;
                }
            }
            (Color::Black, Piece::Rook) if mv.from.0 == 0 => {
                if mv.from.1 == 0 {
                    self.castle_rights.black_queenside = false;
                } else if mv.from.1 == 7 {
                    self.castle_rights.black_kingside = false;
                }
            }
            _ => {}
        }

        match mv.piece_captured {
            Some((Color::White, Piece::Rook)) if mv.to.0 == 7 => {
                if mv.to.1 == 0 {
                    self.castle_rights.white_queenside = false;
                } else if mv.to.1 == 7 {
                    self.castle_rights.white_kingside = false;
                }
            }
            Some((Color::Black, Piece::Rook)) if mv.to.0 == 0 => {
                if mv.to.1 == 0 {
                    self.castle_rights.black_queenside = false;
                } else if mv.to.1 == 7 {
                    self.castle_rights.black_kingside = false;
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for row in 0..8 {
            result.push_str(&format!("{} ", 8 - row));
            for col in 0..8 {
                let symbol = match self.squares[row][col] {
                    Some((Color::White, piece)) => piece.letter(),
                    Some((Color::Black, piece)) => piece.letter().to_ascii_lowercase(),
                    None => '.',
                };
                result.push(symbol);
                result.push(' ');
            }
            result.push('\n');
        }
        result.push_str("  a b c d e f g h");
        write!(f, "{}", result)
    }
}
