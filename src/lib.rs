pub mod board;
pub mod cli;
pub mod errors;
pub mod evaluation;
pub mod movegen;
pub mod search;

#[cfg(test)]
mod tests {
    use super::*;
    use board::{Board, Color, Piece};
    use evaluation::{Evaluator, CHECKMATE};
    use movegen::{perft, square_name, Move, MoveGenerator};
    use search::Search;

    // Looks the wanted squares up in the legal list and plays the generated
    // move, the same way the console shell applies input.
    fn play(
        board: &mut Board,
        generator: &MoveGenerator,
        from: (usize, usize),
        to: (usize, usize),
    ) -> Move {
        let moves = generator.generate_moves(board);
        let wanted = Move::from_squares(from, to, board).unwrap();
        let mv = *moves.iter().find(|candidate| **candidate == wanted).unwrap();
        board.make_move(mv);
        mv
    }

    fn assert_boards_match(actual: &Board, expected: &Board) {
        assert_eq!(actual.squares, expected.squares);
        assert_eq!(actual.white_to_move, expected.white_to_move);
        assert_eq!(actual.white_king, expected.white_king);
        assert_eq!(actual.black_king, expected.black_king);
        assert_eq!(actual.en_passant_target, expected.en_passant_target);
        assert_eq!(actual.castle_rights, expected.castle_rights);
        assert_eq!(actual.move_log.len(), expected.move_log.len());
        assert_eq!(actual.checkmate, expected.checkmate);
        assert_eq!(actual.stalemate, expected.stalemate);
    }

    #[test]
    fn test_initial_position() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();
        let moves = generator.generate_moves(&mut board);
        assert_eq!(moves.len(), 20);
        assert!(!board.checkmate);
        assert!(!board.stalemate);
    }

    #[test]
    fn test_pawn_moves() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();
        let moves = generator.generate_moves(&mut board);

        let single = Move::from_squares((6, 4), (5, 4), &board).unwrap();
        let double = Move::from_squares((6, 4), (4, 4), &board).unwrap();
        assert!(moves.contains(&single));
        assert!(moves.contains(&double));

        // A piece in front of the pawn blocks both advances
        board.place_piece(5, 4, Color::White, Piece::Knight);
        let moves = generator.generate_moves(&mut board);
        assert!(!moves.iter().any(|m| m.from == (6, 4) && m.to == (5, 4)));
        assert!(!moves.iter().any(|m| m.from == (6, 4) && m.to == (4, 4)));
    }

    #[test]
    fn test_perft_initial_position() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();
        assert_eq!(perft(&mut board, &generator, 1), 20);
        assert_eq!(perft(&mut board, &generator, 2), 400);
        assert_eq!(perft(&mut board, &generator, 3), 8_902);
        assert!(board.move_log.is_empty());
    }

    #[test]
    fn test_make_undo_round_trip() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();
        let line = [
            ((6, 4), (4, 4)), // e4
            ((1, 3), (3, 3)), // d5
            ((4, 4), (3, 3)), // exd5
            ((0, 3), (3, 3)), // Qxd5
        ];

        for (from, to) in line {
            let before = board.clone();
            let mv = play(&mut board, &generator, from, to);
            board.undo_move();
            assert_boards_match(&board, &before);
            board.make_move(mv);
        }

        for _ in 0..line.len() {
            board.undo_move();
        }
        assert_boards_match(&board, &Board::new());
    }

    #[test]
    fn test_undo_with_no_history() {
        let mut board = Board::new();
        board.undo_move();
        assert_boards_match(&board, &Board::new());
    }

    #[test]
    fn test_check_detection() {
        let mut board = Board::empty();
        board.place_piece(0, 4, Color::Black, Piece::King);
        board.place_piece(0, 0, Color::White, Piece::Rook);
        board.place_piece(7, 4, Color::White, Piece::King);
        board.white_to_move = false;
        let generator = MoveGenerator::new();

        let turn_before = board.white_to_move;
        assert!(generator.is_square_under_attack(&mut board, 0, 4));
        assert_eq!(board.white_to_move, turn_before);
        assert!(generator.is_in_check(&mut board));

        // A blocker on the rank shields the king
        board.place_piece(0, 2, Color::Black, Piece::Knight);
        assert!(!generator.is_in_check(&mut board));

        // So does removing the rook
        board.squares[0][2] = None;
        board.squares[0][0] = None;
        assert!(!generator.is_in_check(&mut board));
    }

    #[test]
    fn test_en_passant() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();

        play(&mut board, &generator, (6, 4), (4, 4)); // e4
        assert_eq!(board.en_passant_target, Some((5, 4)));
        play(&mut board, &generator, (1, 3), (3, 3)); // d5
        assert_eq!(board.en_passant_target, Some((2, 3)));
        play(&mut board, &generator, (4, 4), (3, 4)); // e5, a single step
        assert_eq!(board.en_passant_target, None);
        play(&mut board, &generator, (1, 5), (3, 5)); // f5
        assert_eq!(board.en_passant_target, Some((2, 5)));

        let moves = generator.generate_moves(&mut board);
        let capture = *moves.iter().find(|m| m.is_en_passant).unwrap();
        assert_eq!(capture.from, (3, 4));
        assert_eq!(capture.to, (2, 5));

        // The captured pawn leaves its own rank, not the destination rank
        board.make_move(capture);
        assert!(board.squares[3][5].is_none());
        assert_eq!(board.squares[2][5], Some((Color::White, Piece::Pawn)));
        assert_eq!(board.en_passant_target, None);

        board.undo_move();
        assert_eq!(board.squares[3][5], Some((Color::Black, Piece::Pawn)));
        assert_eq!(board.squares[3][4], Some((Color::White, Piece::Pawn)));
        assert!(board.squares[2][5].is_none());
        assert_eq!(board.en_passant_target, Some((2, 5)));
    }

    #[test]
    fn test_castling() {
        let mut board = Board::empty();
        board.place_piece(7, 4, Color::White, Piece::King);
        board.place_piece(7, 0, Color::White, Piece::Rook);
        board.place_piece(7, 7, Color::White, Piece::Rook);
        board.place_piece(0, 4, Color::Black, Piece::King);
        let generator = MoveGenerator::new();

        let moves = generator.generate_moves(&mut board);
        let queenside = *moves
            .iter()
            .find(|m| m.is_castle && m.to == (7, 2))
            .unwrap();
        assert_eq!(queenside.to_string(), "O-O-O");
        assert!(moves.iter().any(|m| m.is_castle && m.to == (7, 6)));

        // Castling applies from plain square input like any other move
        let castle = play(&mut board, &generator, (7, 4), (7, 6));
        assert!(castle.is_castle);
        assert_eq!(castle.to_string(), "O-O");
        assert_eq!(board.squares[7][6], Some((Color::White, Piece::King)));
        assert_eq!(board.squares[7][5], Some((Color::White, Piece::Rook)));
        assert!(board.squares[7][7].is_none());
        assert!(board.squares[7][4].is_none());
        assert_eq!(board.white_king, (7, 6));
        assert!(!board.castle_rights.white_kingside);
        assert!(!board.castle_rights.white_queenside);

        board.undo_move();
        assert_eq!(board.squares[7][4], Some((Color::White, Piece::King)));
        assert_eq!(board.squares[7][7], Some((Color::White, Piece::Rook)));
        assert!(board.squares[7][5].is_none());
        assert!(board.squares[7][6].is_none());
        assert_eq!(board.white_king, (7, 4));
        assert!(board.castle_rights.white_kingside);
        assert!(board.castle_rights.white_queenside);
    }

    #[test]
    fn test_castling_refused() {
        let generator = MoveGenerator::new();

        // Occupied path
        let mut board = Board::empty();
        board.place_piece(7, 4, Color::White, Piece::King);
        board.place_piece(7, 0, Color::White, Piece::Rook);
        board.place_piece(7, 7, Color::White, Piece::Rook);
        board.place_piece(7, 1, Color::White, Piece::Knight);
        board.place_piece(0, 4, Color::Black, Piece::King);
        let moves = generator.generate_moves(&mut board);
        assert!(moves.iter().any(|m| m.is_castle && m.to == (7, 6)));
        assert!(!moves.iter().any(|m| m.is_castle && m.to == (7, 2)));

        // Attacked pass-through square
        let mut board = Board::empty();
        board.place_piece(7, 4, Color::White, Piece::King);
        board.place_piece(7, 0, Color::White, Piece::Rook);
        board.place_piece(7, 7, Color::White, Piece::Rook);
        board.place_piece(0, 4, Color::Black, Piece::King);
        board.place_piece(0, 5, Color::Black, Piece::Rook);
        let moves = generator.generate_moves(&mut board);
        assert!(!moves.iter().any(|m| m.is_castle && m.to == (7, 6)));
        assert!(moves.iter().any(|m| m.is_castle && m.to == (7, 2)));

        // Never while in check
        let mut board = Board::empty();
        board.place_piece(7, 4, Color::White, Piece::King);
        board.place_piece(7, 0, Color::White, Piece::Rook);
        board.place_piece(7, 7, Color::White, Piece::Rook);
        board.place_piece(0, 7, Color::Black, Piece::King);
        board.place_piece(0, 4, Color::Black, Piece::Rook);
        let moves = generator.generate_moves(&mut board);
        assert!(!moves.iter().any(|m| m.is_castle));
    }

    #[test]
    fn test_castle_rights_updates() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();

        // A king move drops both of its rights, and undo restores them
        play(&mut board, &generator, (6, 4), (4, 4)); // e4
        play(&mut board, &generator, (1, 4), (3, 4)); // e5
        play(&mut board, &generator, (7, 4), (6, 4)); // Ke2
        assert!(!board.castle_rights.white_kingside);
        assert!(!board.castle_rights.white_queenside);
        assert!(board.castle_rights.black_kingside);
        assert!(board.castle_rights.black_queenside);
        board.undo_move();
        assert!(board.castle_rights.white_kingside);
        assert!(board.castle_rights.white_queenside);

        // A rook move drops only its own side
        play(&mut board, &generator, (6, 0), (4, 0)); // a4
        play(&mut board, &generator, (1, 7), (2, 7)); // h6
        play(&mut board, &generator, (7, 0), (5, 0)); // Ra3
        assert!(!board.castle_rights.white_queenside);
        assert!(board.castle_rights.white_kingside);

        // Losing a rook on its home square drops the victim's side
        let mut board = Board::empty();
        board.place_piece(7, 4, Color::White, Piece::King);
        board.place_piece(6, 1, Color::White, Piece::Bishop);
        board.place_piece(0, 7, Color::Black, Piece::Rook);
        board.place_piece(0, 4, Color::Black, Piece::King);
        play(&mut board, &generator, (6, 1), (0, 7)); // Bxh8
        assert!(!board.castle_rights.black_kingside);
        assert!(board.castle_rights.black_queenside);
        board.undo_move();
        assert!(board.castle_rights.black_kingside);
    }

    #[test]
    fn test_promotion() {
        let mut board = Board::empty();
        board.place_piece(1, 0, Color::White, Piece::Pawn);
        board.place_piece(7, 4, Color::White, Piece::King);
        board.place_piece(0, 7, Color::Black, Piece::King);
        let generator = MoveGenerator::new();

        let moves = generator.generate_moves(&mut board);
        let promotion = *moves.iter().find(|m| m.is_pawn_promotion).unwrap();
        assert_eq!(promotion.to, (0, 0));

        board.make_move(promotion);
        assert_eq!(board.squares[0][0], Some((Color::White, Piece::Queen)));

        board.undo_move();
        assert_eq!(board.squares[1][0], Some((Color::White, Piece::Pawn)));
        assert!(board.squares[0][0].is_none());
    }

    #[test]
    fn test_checkmate() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();

        // Fool's mate
        play(&mut board, &generator, (6, 5), (5, 5)); // f3
        play(&mut board, &generator, (1, 4), (3, 4)); // e5
        play(&mut board, &generator, (6, 6), (4, 6)); // g4
        let mate = play(&mut board, &generator, (0, 3), (4, 7)); // Qh4
        assert_eq!(mate.to_string(), "Qh4");

        let moves = generator.generate_moves(&mut board);
        assert!(moves.is_empty());
        assert!(board.checkmate);
        assert!(!board.stalemate);
    }

    #[test]
    fn test_stalemate() {
        let mut board = Board::empty();
        board.place_piece(7, 0, Color::White, Piece::King);
        board.place_piece(5, 1, Color::Black, Piece::Queen);
        board.place_piece(0, 7, Color::Black, Piece::King);
        let generator = MoveGenerator::new();

        let moves = generator.generate_moves(&mut board);
        assert!(moves.is_empty());
        assert!(board.stalemate);
        assert!(!board.checkmate);
    }

    #[test]
    fn test_evaluation() {
        let evaluator = Evaluator::new();
        let board = Board::new();
        assert_eq!(evaluator.material(&board), 0);

        // Bonus tables read mirrored for black
        let mut board = Board::empty();
        board.place_piece(1, 3, Color::White, Piece::Pawn);
        assert_eq!(evaluator.evaluate(&board), 9);
        board.squares[1][3] = None;
        board.place_piece(6, 3, Color::Black, Piece::Pawn);
        assert_eq!(evaluator.evaluate(&board), -9);
    }

    #[test]
    fn test_evaluation_terminal() {
        let evaluator = Evaluator::new();
        let mut board = Board::new();

        board.checkmate = true;
        assert_eq!(evaluator.evaluate(&board), -CHECKMATE);
        board.white_to_move = false;
        assert_eq!(evaluator.evaluate(&board), CHECKMATE);

        board.checkmate = false;
        board.stalemate = true;
        assert_eq!(evaluator.evaluate(&board), 0);
    }

    #[test]
    fn test_move_ordering() {
        let search = Search::new();
        let pawn_takes_queen = Move::new(
            (6, 3),
            (5, 4),
            (Color::White, Piece::Pawn),
            Some((Color::Black, Piece::Queen)),
        );
        let queen_takes_pawn = Move::new(
            (3, 3),
            (3, 6),
            (Color::White, Piece::Queen),
            Some((Color::Black, Piece::Pawn)),
        );
        let quiet_center = Move::new((5, 5), (4, 4), (Color::White, Piece::Knight), None);

        let mut moves = vec![quiet_center, queen_takes_pawn, pawn_takes_queen];
        search.order_moves(&mut moves);
        assert_eq!(moves[0], pawn_takes_queen);
        assert_eq!(moves[1], queen_takes_pawn);
        assert_eq!(moves[2], quiet_center);

        // Equal priorities keep their original order
        let left = Move::new((6, 0), (5, 0), (Color::White, Piece::Pawn), None);
        let right = Move::new((6, 7), (5, 7), (Color::White, Piece::Pawn), None);
        let mut moves = vec![left, right];
        search.order_moves(&mut moves);
        assert_eq!(moves[0], left);
        let mut moves = vec![right, left];
        search.order_moves(&mut moves);
        assert_eq!(moves[0], right);
    }

    #[test]
    fn test_move_notation() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();

        assert_eq!(square_name(7, 0), "a1");
        assert_eq!(square_name(0, 7), "h8");

        assert_eq!(play(&mut board, &generator, (6, 4), (4, 4)).to_string(), "e4");
        assert_eq!(play(&mut board, &generator, (1, 3), (3, 3)).to_string(), "d5");
        assert_eq!(play(&mut board, &generator, (4, 4), (3, 3)).to_string(), "exd5");
        assert_eq!(play(&mut board, &generator, (0, 3), (3, 3)).to_string(), "Qxd5");
        assert_eq!(play(&mut board, &generator, (7, 6), (5, 5)).to_string(), "Nf3");
    }

    #[test]
    fn test_quiescence_quiet_position() {
        let mut board = Board::new();
        let mut search = Search::new();
        let evaluator = Evaluator::new();

        let stand_pat = evaluator.evaluate(&board);
        let score = search.quiescence(&mut board, -CHECKMATE, CHECKMATE, 1, 4);
        assert_eq!(score, stand_pat);
        assert!(board.move_log.is_empty());

        // Same from black's side after a quiet opening move
        let generator = MoveGenerator::new();
        play(&mut board, &generator, (6, 4), (4, 4)); // e4
        let stand_pat = -evaluator.evaluate(&board);
        let score = search.quiescence(&mut board, -CHECKMATE, CHECKMATE, -1, 4);
        assert_eq!(score, stand_pat);
        assert_eq!(board.move_log.len(), 1);
    }

    #[test]
    fn test_search_prefers_quicker_mate() {
        // Black mates in one with Qh4 or Qh8; every other line is slower
        let mut board = Board::empty();
        board.place_piece(7, 7, Color::White, Piece::King);
        board.place_piece(6, 5, Color::Black, Piece::King);
        board.place_piece(4, 3, Color::Black, Piece::Queen);
        board.white_to_move = false;
        let generator = MoveGenerator::new();
        let valid_moves = generator.generate_moves(&mut board);

        let mut search = Search::new();
        let best = search.find_best_move(&mut board, &valid_moves).unwrap();
        board.make_move(best);
        generator.generate_moves(&mut board);
        assert!(board.checkmate);
    }

    #[test]
    fn test_search_finds_hanging_capture() {
        let mut board = Board::empty();
        board.place_piece(7, 7, Color::White, Piece::King);
        board.place_piece(5, 1, Color::White, Piece::Knight);
        board.place_piece(4, 3, Color::Black, Piece::Queen);
        board.place_piece(0, 7, Color::Black, Piece::King);
        let generator = MoveGenerator::new();
        let valid_moves = generator.generate_moves(&mut board);

        let mut search = Search::new();
        search.set_max_depth(2);
        let best = search.find_best_move(&mut board, &valid_moves).unwrap();
        assert_eq!(best.to, (4, 3));
        assert_eq!(best.piece_captured, Some((Color::Black, Piece::Queen)));
        assert!(board.move_log.is_empty());
    }

    #[test]
    fn test_search_returns_legal_move() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();
        let valid_moves = generator.generate_moves(&mut board);

        let mut search = Search::new();
        search.set_max_depth(2);
        let best = search.find_best_move(&mut board, &valid_moves).unwrap();
        assert!(valid_moves.contains(&best));
        assert!(board.move_log.is_empty());
        assert!(search.get_nodes_searched() > 0);
    }

    #[test]
    fn test_find_random_move() {
        let mut board = Board::new();
        let generator = MoveGenerator::new();
        let valid_moves = generator.generate_moves(&mut board);
        let search = Search::new();

        for _ in 0..10 {
            let mv = search.find_random_move(&valid_moves).unwrap();
            assert!(valid_moves.contains(&mv));
        }
        assert!(search.find_random_move(&[]).is_none());
    }
}
