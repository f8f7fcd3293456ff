use std::cmp::Reverse;

use rand::seq::SliceRandom;

use crate::board::Board;
use crate::evaluation::{Evaluator, CHECKMATE, STALEMATE};
use crate::movegen::{Move, MoveGenerator};

pub struct Search {
    evaluator: Evaluator,
    move_generator: MoveGenerator,
    max_depth: u32,
    nodes_searched: u64,
}

impl Search {
    pub fn new() -> Self {
        Search {
            evaluator: Evaluator::new(),
            move_generator: MoveGenerator::new(),
            max_depth: 4,
            nodes_searched: 0,
        }
    }

    // Iterative deepening root. Every depth restarts with a cold window and
    // re-ranks the same root list; the deepest completed pass decides.
    pub fn find_best_move(&mut self, board: &mut Board, valid_moves: &[Move]) -> Option<Move> {
        self.nodes_searched = 0;

        let mut best_move = None;
        let root_turn = if board.white_to_move { 1 } else { -1 };

        for depth in 1..=self.max_depth {
            let mut alpha = -CHECKMATE;
            let beta = CHECKMATE;
            let mut moves = valid_moves.to_vec();
            self.order_moves(&mut moves);
            let mut best_score = -CHECKMATE;

            for mv in &moves {
                board.make_move(*mv);
                let next_moves = self.move_generator.generate_moves(board);
                let score =
                    -self.negamax(board, &next_moves, depth - 1, -beta, -alpha, -root_turn, depth);
                board.undo_move();

                if score > best_score {
                    best_score = score;
                    best_move = Some(*mv);
                }
                if best_score > alpha {
                    alpha = best_score;
                }
                if alpha >= beta {
                    break;
                }
            }
        }

        best_move
    }

    // Fallback opponent with no lookahead at all
    pub fn find_random_move(&self, valid_moves: &[Move]) -> Option<Move> {
        valid_moves.choose(&mut rand::thread_rng()).copied()
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        valid_moves: &[Move],
        depth: u32,
        alpha: i32,
        beta: i32,
        turn: i32,
        root_depth: u32,
    ) -> i32 {
        self.nodes_searched += 1;

        // Mate scores carry their distance below the root so nearer mates
        // rank higher. The sign follows the mated side, not the side whose
        // turn the recursion is folding.
        if board.checkmate {
            let mate_distance = (root_depth - depth) as i32;
            return if board.white_to_move {
                -(CHECKMATE - mate_distance)
            } else {
                CHECKMATE - mate_distance
            };
        }
        if board.stalemate {
            return STALEMATE;
        }
        if depth == 0 {
            return self.quiescence(board, alpha, beta, turn, root_depth);
        }

        let mut moves = valid_moves.to_vec();
        self.order_moves(&mut moves);

        let mut alpha = alpha;
        let mut max_score = -CHECKMATE;
        for mv in &moves {
            board.make_move(*mv);
            let next_moves = self.move_generator.generate_moves(board);
            let score =
                -self.negamax(board, &next_moves, depth - 1, -beta, -alpha, -turn, root_depth);
            board.undo_move();

            if score > max_score {
                max_score = score;
            }
            if max_score > alpha {
                alpha = max_score;
            }
            if alpha >= beta {
                break;
            }
        }
        max_score
    }

    // Capture-only extension at the depth frontier, so the fixed cutoff
    // cannot land in the middle of an exchange.
    pub(crate) fn quiescence(
        &mut self,
        board: &mut Board,
        mut alpha: i32,
        beta: i32,
        turn: i32,
        root_depth: u32,
    ) -> i32 {
        self.nodes_searched += 1;

        // Quiescence sits at remaining depth zero, so a mate found here is
        // root_depth plies from the root
        if board.checkmate {
            let mate_distance = root_depth as i32;
            return if board.white_to_move {
                -(CHECKMATE - mate_distance)
            } else {
                CHECKMATE - mate_distance
            };
        }
        if board.stalemate {
            return STALEMATE;
        }

        // Standing pat is the floor: the mover can always decline to capture
        let stand_pat = turn * self.evaluator.evaluate(board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut captures: Vec<Move> = self
            .move_generator
            .generate_pseudo_moves(board)
            .into_iter()
            .filter(|mv| mv.piece_captured.is_some() || mv.is_en_passant)
            .collect();
        self.order_moves(&mut captures);

        for mv in captures {
            board.make_move(mv);
            let score = -self.quiescence(board, -beta, -alpha, -turn, root_depth);
            board.undo_move();

            if score >= beta {
                return score;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }

    // Captures first, best victim for the cheapest attacker first, then
    // promotions, then a nudge toward the center. The sort is stable, so
    // equal priorities keep generation order and the search stays
    // reproducible.
    pub(crate) fn order_moves(&self, moves: &mut [Move]) {
        moves.sort_by_key(|mv| Reverse(self.move_priority(mv)));
    }

    fn move_priority(&self, mv: &Move) -> i32 {
        let mut priority = 0;
        if let Some((_, victim)) = mv.piece_captured {
            let attacker = mv.piece_moved.1;
            priority += 1000 + self.evaluator.piece_value(victim) * 10
                - self.evaluator.piece_value(attacker);
        }
        if mv.is_pawn_promotion {
            priority += 900;
        }
        // Distance from the board center, doubled to stay in integers
        let (to_row, to_col) = (mv.to.0 as i32, mv.to.1 as i32);
        let center_distance = ((7 - 2 * to_row).abs() + (7 - 2 * to_col).abs()) / 2;
        priority += 3 - center_distance;
        priority
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.max_depth = depth;
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}
