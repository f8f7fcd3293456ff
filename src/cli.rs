use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::board::Board;
use crate::errors::ChessError;
use crate::evaluation::Evaluator;
use crate::movegen::{Move, MoveGenerator};
use crate::search::Search;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Player {
    Human,
    Engine,
}

// Console front end. Owns the live position and replays the engine for
// whichever sides it has been given.
pub struct GameShell {
    board: Board,
    move_generator: MoveGenerator,
    evaluator: Evaluator,
    search: Search,
    valid_moves: Vec<Move>,
    white_player: Player,
    black_player: Player,
    level: u32,
}

impl GameShell {
    pub fn new() -> Self {
        let mut board = Board::new();
        let move_generator = MoveGenerator::new();
        let valid_moves = move_generator.generate_moves(&mut board);

        GameShell {
            board,
            move_generator,
            evaluator: Evaluator::new(),
            search: Search::new(),
            valid_moves,
            white_player: Player::Human,
            black_player: Player::Engine,
            level: 4,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();

        println!("woodpusher, a console chess engine. Type 'help' for commands.");
        println!("{}", self.board);

        loop {
            self.play_engine_turns();

            print!("> ");
            stdout.flush()?;
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let command = line.trim();

            match command {
                "" => {}
                "quit" => break,
                "help" => self.print_help(),
                "board" => println!("{}", self.board),
                "moves" => self.print_moves(),
                "log" => self.print_log(),
                "eval" => self.print_eval(),
                "undo" => self.undo(),
                "new" => self.new_game(),
                "go" => self.engine_move(),
                cmd if cmd.starts_with("play") => self.set_players(cmd),
                cmd if cmd.starts_with("level") => self.set_level(cmd),
                cmd => self.play_human_move(cmd),
            }
        }
        Ok(())
    }

    // Lets the engine answer for every side it owns before the next prompt
    fn play_engine_turns(&mut self) {
        while self.engine_to_move() && !self.game_over() {
            self.engine_move();
        }
    }

    fn engine_to_move(&self) -> bool {
        let player = if self.board.white_to_move {
            self.white_player
        } else {
            self.black_player
        };
        player == Player::Engine
    }

    fn game_over(&self) -> bool {
        self.board.checkmate || self.board.stalemate
    }

    fn engine_move(&mut self) {
        if self.game_over() {
            return;
        }
        let mover = if self.board.white_to_move { "white" } else { "black" };
        let chosen = if self.level == 0 {
            self.search.find_random_move(&self.valid_moves)
        } else {
            let moves = self.valid_moves.clone();
            self.search.find_best_move(&mut self.board, &moves)
        };
        let mv = match chosen {
            Some(mv) => mv,
            None => return,
        };
        if self.level == 0 {
            println!("{} plays {}", mover, mv);
        } else {
            println!(
                "{} plays {} ({} nodes at depth {})",
                mover,
                mv,
                self.search.get_nodes_searched(),
                self.level
            );
        }
        self.apply_move(mv);
    }

    fn play_human_move(&mut self, input: &str) {
        match self.parse_move(input) {
            Ok(mv) => self.apply_move(mv),
            Err(err) => println!("{}", err),
        }
    }

    fn apply_move(&mut self, mv: Move) {
        self.board.make_move(mv);
        self.refresh_moves();
        println!("{}", self.board);
        self.announce_result();
    }

    fn refresh_moves(&mut self) {
        self.valid_moves = self.move_generator.generate_moves(&mut self.board);
    }

    fn announce_result(&self) {
        if self.board.checkmate {
            let winner = if self.board.white_to_move { "black" } else { "white" };
            println!("checkmate, {} wins", winner);
        } else if self.board.stalemate {
            println!("stalemate, the game is drawn");
        }
    }

    // Maps square-pair input such as e2e4 onto the generated legal list.
    // The matched list entry is the one to play, since it carries the
    // en passant and castle flags the raw input cannot express.
    fn parse_move(&self, input: &str) -> Result<Move, ChessError> {
        if !input.is_ascii() || input.len() != 4 {
            return Err(ChessError::IllegalMove(input.to_string()));
        }
        let from = parse_square(&input[0..2])?;
        let to = parse_square(&input[2..4])?;
        let candidate = Move::from_squares(from, to, &self.board)
            .ok_or_else(|| ChessError::EmptySquare(input[0..2].to_string()))?;
        self.valid_moves
            .iter()
            .find(|legal| **legal == candidate)
            .copied()
            .ok_or_else(|| ChessError::IllegalMove(input.to_string()))
    }

    fn undo(&mut self) {
        if self.board.move_log.is_empty() {
            println!("nothing to undo");
            return;
        }
        self.board.undo_move();
        // Step back over the engine's reply too, so the human gets a new try
        if self.engine_to_move() && !self.board.move_log.is_empty() {
            self.board.undo_move();
        }
        self.refresh_moves();
        println!("{}", self.board);
    }

    fn new_game(&mut self) {
        self.board = Board::new();
        self.refresh_moves();
        println!("{}", self.board);
    }

    fn set_players(&mut self, command: &str) {
        let (white, black) = match command.split_whitespace().nth(1) {
            Some("white") => (Player::Engine, Player::Human),
            Some("black") => (Player::Human, Player::Engine),
            Some("both") => (Player::Engine, Player::Engine),
            Some("none") => (Player::Human, Player::Human),
            _ => {
                println!("usage: play <white|black|both|none>");
                return;
            }
        };
        self.white_player = white;
        self.black_player = black;
    }

    fn set_level(&mut self, command: &str) {
        match command
            .split_whitespace()
            .nth(1)
            .and_then(|arg| arg.parse::<u32>().ok())
        {
            Some(level) if level <= 6 => {
                self.level = level;
                if level > 0 {
                    self.search.set_max_depth(level);
                }
                println!("level set to {}", level);
            }
            _ => println!("usage: level <0-6>"),
        }
    }

    fn print_moves(&self) {
        if self.valid_moves.is_empty() {
            println!("no legal moves");
            return;
        }
        let notated: Vec<String> = self.valid_moves.iter().map(|mv| mv.to_string()).collect();
        println!("{}", notated.join(" "));
    }

    fn print_log(&self) {
        if self.board.move_log.is_empty() {
            println!("no moves played yet");
            return;
        }
        let mut text = String::new();
        for (ply, mv) in self.board.move_log.iter().enumerate() {
            if ply % 2 == 0 {
                text.push_str(&format!("{}. ", ply / 2 + 1));
            }
            text.push_str(&format!("{} ", mv));
        }
        println!("{}", text.trim_end());
    }

    fn print_eval(&self) {
        println!(
            "material {:+}, position {:+}",
            self.evaluator.material(&self.board),
            self.evaluator.evaluate(&self.board)
        );
    }

    fn print_help(&self) {
        println!("  e2e4            play the move from e2 to e4");
        println!("  moves           list every legal move");
        println!("  board           print the board");
        println!("  log             print the game so far");
        println!("  eval            print material and position scores");
        println!("  undo            take back the last move");
        println!("  new             start a fresh game");
        println!("  go              let the engine move now");
        println!("  play <side>     give the engine white, black, both or none");
        println!("  level <0-6>     search depth, 0 plays random moves");
        println!("  quit            leave");
    }
}

fn parse_square(text: &str) -> Result<(usize, usize), ChessError> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidSquare(text.to_string()));
    }
    let col = bytes[0].wrapping_sub(b'a') as usize;
    let rank = bytes[1].wrapping_sub(b'1') as usize;
    if col > 7 || rank > 7 {
        return Err(ChessError::InvalidSquare(text.to_string()));
    }
    Ok((7 - rank, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_square() {
        assert_eq!(parse_square("a1"), Ok((7, 0)));
        assert_eq!(parse_square("h8"), Ok((0, 7)));
        assert_eq!(parse_square("e2"), Ok((6, 4)));
        assert!(parse_square("j4").is_err());
        assert!(parse_square("e9").is_err());
        assert!(parse_square("e").is_err());
    }

    #[test]
    fn test_parse_move_matches_legal_list() {
        let shell = GameShell::new();
        let mv = shell.parse_move("e2e4").unwrap();
        assert_eq!(mv.from, (6, 4));
        assert_eq!(mv.to, (4, 4));
        assert_eq!(
            shell.parse_move("e2e5"),
            Err(ChessError::IllegalMove("e2e5".to_string()))
        );
        assert_eq!(
            shell.parse_move("e3e4"),
            Err(ChessError::EmptySquare("e3".to_string()))
        );
        assert!(shell.parse_move("e2").is_err());
        assert!(shell.parse_move("x1x2").is_err());
    }

    #[test]
    fn test_parsed_move_carries_generator_flags() {
        let mut shell = GameShell::new();
        for input in ["e2e4", "d7d5", "e4e5", "f7f5"] {
            let mv = shell.parse_move(input).unwrap();
            shell.board.make_move(mv);
            shell.refresh_moves();
        }
        let capture = shell.parse_move("e5f6").unwrap();
        assert!(capture.is_en_passant);
    }
}
