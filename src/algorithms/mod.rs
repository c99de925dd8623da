pub mod a_star;
pub mod common;
pub mod d_star_lite;
mod extract;
pub mod frontier;
pub mod key;
pub mod ledger;
