//! Special positions: mates, pins, promotions, castling restrictions.

use crate::board::{Board, Color, FenError, Piece, Square};

#[test]
fn stalemate_position() {
    let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(!board.is_checkmate());
    assert!(board.is_stalemate());
    assert!(board.generate_moves().is_empty());
}

#[test]
fn checkmate_back_rank() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    board.play_moves(["a1a8"]).unwrap();
    assert!(board.is_in_check());
    assert!(board.is_checkmate());
    assert!(!board.is_stalemate());
}

#[test]
fn all_four_promotions_generated() {
    let board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    let moves = board.generate_moves();
    for piece in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
        assert!(
            moves.iter().any(|m| m.promotion_piece() == Some(piece)),
            "missing promotion to {piece:?}"
        );
    }

    let mut board = board;
    board.play_moves(["a7a8=N"]).unwrap();
    assert_eq!(board.piece_at(Square::A8), Some((Color::White, Piece::Knight)));
}

#[test]
fn captures_mode_keeps_only_queen_promotions() {
    let board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    let captures = board.generate_captures();
    assert_eq!(captures.len(), 1);
    assert_eq!(captures[0].promotion_piece(), Some(Piece::Queen));
}

#[test]
fn en_passant_removes_correct_pawn() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1").unwrap();
    let mv = board.parse_move("e5d6").unwrap();
    assert!(mv.is_en_passant());

    let child = board.play(mv);
    assert_eq!(child.piece_on(Square::new(4, 3)), None);
    assert_eq!(child.piece_at(Square::new(5, 3)), Some((Color::White, Piece::Pawn)));
}

#[test]
fn en_passant_exposing_king_is_illegal() {
    // Taking on d6 would clear the fifth rank between the rook and the king
    let board = Board::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
    let moves = board.generate_moves();
    assert!(!moves.iter().any(|m| m.is_en_passant()));
}

#[test]
fn pinned_piece_moves_along_pin_only() {
    // Bishop on d2 is pinned by the queen on a5
    let board = Board::from_fen("4k3/8/8/q7/8/8/3B4/4K3 w - - 0 1").unwrap();
    assert!(board.pinned(Color::White).contains(Square::new(1, 3)));

    let bishop_moves: Vec<_> = board
        .generate_moves()
        .iter()
        .filter(|m| m.from() == Square::new(1, 3))
        .map(|m| m.to_uci())
        .collect();
    let mut sorted = bishop_moves.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["d2a5", "d2b4", "d2c3"]);
}

#[test]
fn castling_blocked_by_check() {
    let board = Board::from_fen("r3k2r/8/8/8/4Q3/8/8/R3K2R b KQkq - 0 1").unwrap();
    assert!(board.is_in_check());
    assert!(!board.generate_moves().iter().any(|m| m.is_castling()));
}

#[test]
fn castling_through_attacked_square_is_illegal() {
    // Rook on f8 covers f1, so only queenside castling remains
    let board = Board::from_fen("r4rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let castles: Vec<_> = board
        .generate_moves()
        .iter()
        .filter(|m| m.is_castling())
        .map(|m| m.to_uci())
        .collect();
    assert_eq!(castles, vec!["e1c1"]);
}

#[test]
fn double_check_only_king_moves() {
    // Rook a1 and knight e3 both give check; Ra7xa1 would only answer one
    let board = Board::from_fen("4k3/R7/8/8/8/4n3/8/r2K4 w - - 0 1").unwrap();
    assert!(board.checkers().more_than_one());
    let moves = board.generate_moves();
    assert!(!moves.is_empty());
    for mv in moves.iter() {
        assert_eq!(mv.from(), Square::D1, "{mv} is not a king move");
    }
}

#[test]
fn is_legal_rejects_moves_into_check() {
    let board = Board::from_fen("4k3/8/8/8/8/8/4r3/3K4 w - - 0 1").unwrap();
    for mv in board.generate_pseudo_legal_moves().iter() {
        let legal = board.generate_moves().contains(*mv);
        assert_eq!(board.is_legal(*mv), legal, "disagreement on {mv}");
    }
}

#[test]
fn fen_parsing_errors() {
    assert!(matches!(
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
        Err(FenError::TooFewParts { found: 1 })
    ));
    assert!(Board::from_fen("rnbxkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").is_err());
    assert!(Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err());
    assert!(Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XYZ - 0 1").is_err());
    assert!(Board::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1").is_err(), "missing black king");
    assert!(Board::from_fen("k7/8/8/8/8/8/8/K6r b - - 0 1").is_err(), "white to move is in check");
}

#[test]
fn fen_empty_runs_must_be_one_to_eight() {
    assert!(matches!(
        Board::from_fen("08/k7/8/8/8/8/8/K7 w - - 0 1"),
        Err(FenError::InvalidPiece { char: '0' })
    ));
    assert!(matches!(
        Board::from_fen("k7/9/8/8/8/8/8/K7 w - - 0 1"),
        Err(FenError::InvalidPiece { char: '9' })
    ));
    assert!(Board::from_fen("k7/8/8/8/8/8/8/K7 w - - 0 1").is_ok());
}

#[test]
fn square_parsing() {
    assert_eq!("a1".parse::<Square>().unwrap(), Square::A1);
    assert_eq!("h8".parse::<Square>().unwrap(), Square::H8);
    assert_eq!("e4".parse::<Square>().unwrap(), Square::new(3, 4));

    assert!("i1".parse::<Square>().is_err());
    assert!("a9".parse::<Square>().is_err());
    assert!("".parse::<Square>().is_err());
    assert!("a".parse::<Square>().is_err());
}

#[test]
fn board_from_str() {
    let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        .parse()
        .unwrap();
    assert_eq!(board.side_to_move(), Color::White);
    assert_eq!(board, Board::new());

    let result: Result<Board, _> = "invalid fen".parse();
    assert!(result.is_err());
}
