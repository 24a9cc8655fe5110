//! Board module tests.
//!
//! - `perft.rs`: move generation node counts
//! - `draw.rs`: fifty-move rule, repetition, insufficient material
//! - `make_unmake.rs`: make/unmake and guard restoration
//! - `edge_cases.rs`: special positions and FEN validation
//! - `search.rs`: search results on small positions
//! - `proptest.rs`: property-based tests

mod edge_cases;
mod perft;
mod search;
