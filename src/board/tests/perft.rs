//! Perft node counts against published reference values.

use crate::board::{Board, START_FEN};

struct PerftCase {
    name: &'static str,
    fen: &'static str,
    depths: &'static [(usize, u64)],
}

const QUICK: &[PerftCase] = &[
    PerftCase {
        name: "Initial Position",
        fen: START_FEN,
        depths: &[(1, 20), (2, 400), (3, 8902)],
    },
    PerftCase {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[(1, 48), (2, 2039), (3, 97862)],
    },
    PerftCase {
        name: "Position 3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depths: &[(1, 14), (2, 191), (3, 2812), (4, 43238)],
    },
    PerftCase {
        name: "Position 4",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        depths: &[(1, 6), (2, 264), (3, 9467)],
    },
    PerftCase {
        name: "Position 5",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        depths: &[(1, 44), (2, 1486), (3, 62379)],
    },
    PerftCase {
        name: "En Passant Capture",
        fen: "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        depths: &[(1, 31), (2, 707), (3, 21637)],
    },
    PerftCase {
        name: "Promotion",
        fen: "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        depths: &[(1, 24), (2, 496), (3, 9483)],
    },
    PerftCase {
        name: "Castling",
        fen: "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
        depths: &[(1, 26), (2, 568), (3, 13744)],
    },
];

const DEEP: &[PerftCase] = &[
    PerftCase {
        name: "Initial Position",
        fen: START_FEN,
        depths: &[(4, 197_281), (5, 4_865_609)],
    },
    PerftCase {
        name: "Kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depths: &[(4, 4_085_603)],
    },
    PerftCase {
        name: "Position 3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depths: &[(5, 674_624)],
    },
];

fn run(cases: &[PerftCase]) {
    for case in cases {
        let mut board = Board::from_fen(case.fen).expect("valid perft FEN");
        let before = board.to_fen();
        for &(depth, expected) in case.depths {
            let nodes = board.perft(depth);
            assert_eq!(nodes, expected, "perft({depth}) failed for {}", case.name);
        }
        assert_eq!(board.to_fen(), before, "perft left {} modified", case.name);
    }
}

#[test]
fn perft_reference_positions() {
    run(QUICK);
}

#[test]
#[ignore = "slow in debug builds"]
fn perft_reference_positions_deep() {
    run(DEEP);
}

#[test]
fn divide_sums_to_perft() {
    let mut board = Board::from_fen(QUICK[1].fen).expect("valid FEN");
    let divide = board.perft_divide(2);
    assert_eq!(divide.len(), 48);
    assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 2039);
}

#[test]
fn divide_at_depth_zero_plays_nothing() {
    let mut board = Board::new();
    assert!(board.perft_divide(0).is_empty());
    assert_eq!(board.perft(0), 1);
    assert_eq!(board.perft_divide(1).len(), 20);
}
