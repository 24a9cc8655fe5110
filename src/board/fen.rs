use std::fmt;
use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Board, CastleSide, CastlingRights, Color, Move, Piece, Square};

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a position from FEN.
    ///
    /// The halfmove clock and fullmove number may be omitted and default to 0 and 1.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }
        if parts.len() > 6 {
            return Err(FenError::TooManyParts { found: parts.len() });
        }

        board.parse_placement(parts[0])?;

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        board.castling_rights = parse_castling(parts[2])?;
        board.en_passant_target = board.parse_en_passant(parts[3])?;

        if let Some(field) = parts.get(4) {
            board.halfmove_clock = field
                .parse()
                .map_err(|_| FenError::InvalidHalfmoveClock {
                    found: (*field).to_string(),
                })?;
        }
        if let Some(field) = parts.get(5) {
            board.fullmove_number = match field.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(FenError::InvalidFullmoveNumber {
                        found: (*field).to_string(),
                    })
                }
            };
        }

        let them = board.side_to_move.opponent();
        if board.is_square_attacked(board.king_square(them), board.side_to_move) {
            return Err(FenError::OpponentInCheck);
        }

        board.reset_hash_and_history();
        Ok(board)
    }

    fn parse_placement(&mut self, placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= 8 {
                    return Err(FenError::InvalidRankLength {
                        rank: rank as usize + 1,
                        files: file + 1,
                    });
                }
                if piece == Piece::Pawn && (rank == 0 || rank == 7) {
                    return Err(FenError::PawnOnBackRank {
                        rank: rank as usize + 1,
                    });
                }
                self.set_piece(Square::new(rank, file as u8), color, piece);
                file += 1;
            }
            if file != 8 {
                return Err(FenError::InvalidRankLength {
                    rank: rank as usize + 1,
                    files: file,
                });
            }
        }

        for color in Color::BOTH {
            let found = self.pieces(color, Piece::King).popcount();
            if found != 1 {
                return Err(FenError::KingCount { color, found });
            }
        }
        Ok(())
    }

    /// The en-passant square must sit behind a pawn that just double-pushed.
    fn parse_en_passant(&self, field: &str) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }
        let invalid = || FenError::InvalidEnPassant {
            found: field.to_string(),
        };
        let sq: Square = field.parse().map_err(|_| invalid())?;

        let mover = self.side_to_move;
        let expected_rank = match mover {
            Color::White => 5,
            Color::Black => 2,
        };
        if sq.rank() != expected_rank || self.piece_on(sq).is_some() {
            return Err(invalid());
        }
        let pushed = sq.offset(-mover.pawn_push());
        if self.piece_at(pushed) != Some((mover.opponent(), Piece::Pawn)) {
            return Err(invalid());
        }
        Ok(Some(sq))
    }

    /// Serialize to FEN. Round-trips with `from_fen`.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8u8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::new(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            self.castling_rights,
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Parse move text (`e2e4`, `e7e8q` or `e7e8=Q`) into the matching legal move.
    ///
    /// # Example
    /// ```
    /// use ferrochess::board::Board;
    ///
    /// let board = Board::new();
    /// let mv = board.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        if !text.is_ascii() || text.len() < 4 || text.len() > 6 {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: text.to_string(),
        };
        let from: Square = text[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = text[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match &text[4..] {
            "" => None,
            suffix => {
                let letter = suffix.strip_prefix('=').unwrap_or(suffix);
                let mut chars = letter.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => match Piece::from_char(c) {
                        Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => {
                            Some(p)
                        }
                        _ => return Err(MoveParseError::InvalidPromotion { char: c }),
                    },
                    _ => return Err(MoveParseError::InvalidLength { len: text.len() }),
                }
            }
        };

        self.generate_moves()
            .into_iter()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }

    /// Parse and play a sequence of moves, e.g. a game record.
    pub fn play_moves<'a, I>(&mut self, moves: I) -> Result<(), MoveParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for text in moves {
            let mv = self.parse_move(text)?;
            self.make_move(mv);
        }
        Ok(())
    }
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        let (color, side) = match c {
            'K' => (Color::White, CastleSide::King),
            'Q' => (Color::White, CastleSide::Queen),
            'k' => (Color::Black, CastleSide::King),
            'q' => (Color::Black, CastleSide::Queen),
            _ => return Err(FenError::InvalidCastling { char: c }),
        };
        rights.set(color, side);
    }
    Ok(rights)
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_round_trips() {
        let board = Board::from_fen(START_FEN).unwrap();
        assert_eq!(board.to_fen(), START_FEN);
        assert_eq!(board, Board::new());
        assert_eq!(board.hash(), Board::new().hash());
    }

    #[test]
    fn counters_are_preserved() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 7 23";
        let board: Board = fen.parse().unwrap();
        assert_eq!(board.halfmove_clock(), 7);
        assert_eq!(board.fullmove_number(), 23);
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn counters_default_when_omitted() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.fullmove_number(), 1);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            Board::from_fen("8/8/8/8 w - -"),
            Err(FenError::WrongRankCount { found: 4 })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3"),
            Err(FenError::TooFewParts { found: 1 })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K2 w - - 0 1"),
            Err(FenError::InvalidRankLength { rank: 1, files: 7 })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w X - 0 1"),
            Err(FenError::InvalidCastling { char: 'X' })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4X3 w - - 0 1"),
            Err(FenError::InvalidPiece { char: 'X' })
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(FenError::KingCount { color: Color::Black, found: 0 })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock { .. })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 0"),
            Err(FenError::InvalidFullmoveNumber { .. })
        ));
    }

    #[test]
    fn rejects_inconsistent_en_passant() {
        // No black pawn on e5 behind e6
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - e6 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));
        assert!(Board::from_fen("4k3/8/8/4p3/8/8/8/4K3 w - e6 0 1").is_ok());
    }

    #[test]
    fn rejects_side_not_to_move_in_check() {
        assert!(Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").is_ok());
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4R2K w - - 0 1"),
            Err(FenError::OpponentInCheck)
        ));
    }

    #[test]
    fn parses_move_text_forms() {
        let board = Board::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let long = board.parse_move("e7e8q").unwrap();
        let marked = board.parse_move("e7e8=Q").unwrap();
        assert_eq!(long, marked);
        assert_eq!(long.to_string(), "e7e8=Q");
        assert_eq!(board.parse_move("e7e8=n").unwrap().promotion_piece(), Some(Piece::Knight));

        assert!(matches!(
            board.parse_move("e7e8"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        assert!(matches!(
            board.parse_move("e7e8k"),
            Err(MoveParseError::InvalidPromotion { char: 'k' })
        ));
        assert!(matches!(
            board.parse_move("z9e8"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert!(matches!(
            board.parse_move("e7"),
            Err(MoveParseError::InvalidLength { len: 2 })
        ));
    }

    #[test]
    fn play_moves_updates_counters() {
        let mut board = Board::new();
        board.play_moves(["e2e4", "e7e5", "g1f3"]).unwrap();
        assert_eq!(
            board.to_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }
}
