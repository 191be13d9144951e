pub mod block;
pub mod compact;
pub mod file;
pub mod grid;
pub mod position;
pub mod solution;

/// a connected same-color region, as an ordered list of cell positions
pub type Group = Vec<position::Position>;
