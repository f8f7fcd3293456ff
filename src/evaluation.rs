use crate::board::{Board, Color, Piece};

// Score bounds. A forced mate always beats any material count, and the
// search subtracts the mate distance so nearer mates score higher.
pub const CHECKMATE: i32 = 1000;
pub const STALEMATE: i32 = 0;

pub struct Evaluator {
    // Piece values
    pub pawn_value: i32,
    pub knight_value: i32,
    pub bishop_value: i32,
    pub rook_value: i32,
    pub queen_value: i32,
    pub king_value: i32,

    // Positional bonuses
    pub pawn_position_bonus: [[i32; 8]; 8],
    pub knight_position_bonus: [[i32; 8]; 8],
    pub bishop_position_bonus: [[i32; 8]; 8],
    pub rook_position_bonus: [[i32; 8]; 8],
    pub queen_position_bonus: [[i32; 8]; 8],
    pub king_position_bonus: [[i32; 8]; 8],
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            // Piece values in pawn units; the king carries none because it
            // never comes off the board
            pawn_value: 1,
            knight_value: 3,
            bishop_value: 3,
            rook_value: 5,
            queen_value: 9,
            king_value: 0,

            // Pawn position bonus (white's perspective, advancing upward)
            pawn_position_bonus: [
                [8, 8, 8, 8, 8, 8, 8, 8],
                [8, 8, 8, 8, 8, 8, 8, 8],
                [5, 6, 6, 7, 7, 6, 6, 5],
                [2, 3, 3, 5, 5, 3, 3, 2],
                [1, 2, 3, 4, 4, 3, 2, 1],
                [1, 1, 2, 3, 3, 2, 1, 1],
                [1, 1, 1, 0, 0, 1, 1, 1],
                [0, 0, 0, 0, 0, 0, 0, 0],
            ],

            // Knight position bonus (centralization)
            knight_position_bonus: [
                [1, 1, 1, 1, 1, 1, 1, 1],
                [1, 2, 2, 2, 2, 2, 2, 1],
                [1, 2, 3, 3, 3, 3, 2, 1],
                [1, 2, 3, 4, 4, 3, 2, 1],
                [1, 2, 3, 4, 4, 3, 2, 1],
                [1, 2, 3, 3, 3, 3, 2, 1],
                [1, 2, 2, 2, 2, 2, 2, 1],
                [1, 1, 1, 1, 1, 1, 1, 1],
            ],

            // Bishop position bonus (long diagonals)
            bishop_position_bonus: [
                [4, 3, 2, 1, 1, 2, 3, 4],
                [3, 4, 3, 2, 2, 3, 4, 3],
                [2, 3, 4, 3, 3, 4, 3, 2],
                [1, 2, 3, 4, 4, 3, 2, 1],
                [1, 2, 3, 4, 4, 3, 2, 1],
                [2, 3, 4, 3, 3, 4, 3, 2],
                [3, 4, 3, 2, 2, 3, 4, 3],
                [4, 3, 2, 1, 1, 2, 3, 4],
            ],

            // Rook position bonus (open ranks and files)
            rook_position_bonus: [
                [4, 3, 4, 4, 4, 4, 3, 4],
                [4, 4, 4, 4, 4, 4, 4, 4],
                [1, 1, 2, 3, 3, 2, 1, 1],
                [1, 2, 3, 4, 4, 3, 2, 1],
                [1, 2, 3, 4, 4, 3, 2, 1],
                [1, 1, 2, 3, 3, 2, 1, 1],
                [4, 4, 4, 4, 4, 4, 4, 4],
                [4, 3, 4, 4, 4, 4, 3, 4],
            ],

            // Queen position bonus
            queen_position_bonus: [
                [1, 1, 1, 3, 1, 1, 1, 1],
                [1, 2, 3, 3, 3, 1, 1, 1],
                [1, 4, 3, 3, 3, 4, 2, 1],
                [1, 2, 3, 3, 3, 2, 2, 1],
                [1, 2, 3, 3, 3, 2, 2, 1],
                [1, 2, 3, 3, 3, 4, 2, 1],
                [1, 1, 2, 3, 3, 1, 1, 1],
                [1, 1, 1, 3, 1, 1, 1, 1],
            ],

            // King position bonus (stay castled behind pawns)
            king_position_bonus: [
                [0, 0, 0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0, 0, 0],
                [0, 0, 0, 0, 0, 0, 0, 0],
                [2, 2, 1, 0, 0, 1, 2, 2],
                [4, 4, 3, 1, 1, 3, 4, 4],
            ],
        }
    }

    // Score of the whole position, positive favoring white. Terminal flags
    // decide outright; otherwise material plus position, with black reading
    // the bonus tables mirrored.
    pub fn evaluate(&self, board: &Board) -> i32 {
        if board.checkmate {
            return if board.white_to_move { -CHECKMATE } else { CHECKMATE };
        }
        if board.stalemate {
            return STALEMATE;
        }

        let mut score = 0;
        for row in 0..8 {
            for col in 0..8 {
                if let Some((color, piece)) = board.squares[row][col] {
                    match color {
                        Color::White => {
                            score += self.piece_value(piece) + self.position_bonus(piece, row, col);
                        }
                        Color::Black => {
                            score -=
                                self.piece_value(piece) + self.position_bonus(piece, 7 - row, 7 - col);
                        }
                    }
                }
            }
        }
        score
    }

    // Material count alone, in pawn units, for the score readout
    pub fn material(&self, board: &Board) -> i32 {
        let mut material = 0;
        for row in 0..8 {
            for col in 0..8 {
                if let Some((color, piece)) = board.squares[row][col] {
                    match color {
                        Color::White => material += self.piece_value(piece),
                        Color::Black => material -= self.piece_value(piece),
                    }
                }
            }
        }
        material
    }

    pub fn piece_value(&self, piece: Piece) -> i32 {
        match piece {
            Piece::Pawn => self.pawn_value,
            Piece::Knight => self.knight_value,
            Piece::Bishop => self.bishop_value,
            Piece::Rook => self.rook_value,
            Piece::Queen => self.queen_value,
            Piece::King => self.king_value,
        }
    }

    fn position_bonus(&self, piece: Piece, row: usize, col: usize) -> i32 {
        match piece {
            Piece::Pawn => self.pawn_position_bonus[row][col],
            Piece::Knight => self.knight_position_bonus[row][col],
            Piece::Bishop => self.bishop_position_bonus[row][col],
            Piece::Rook => self.rook_position_bonus[row][col],
            Piece::Queen => self.queen_position_bonus[row][col],
            Piece::King => self.king_position_bonus[row][col],
        }
    }
}
