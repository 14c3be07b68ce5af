//! Game rules for TwixT.
//!
//! Pure functions over a [`Board`](crate::Board): where links form when a
//! peg is placed, and whether either player has joined their goal edges.

pub mod crossing;
pub mod links;
pub mod win;

pub use crossing::{links_cross, segments_intersect};
pub use links::{KNIGHT_OFFSETS, candidate_links, place_peg};
pub use win::{find_winner, has_connection};
