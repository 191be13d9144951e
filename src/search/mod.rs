pub mod beam;
pub mod bucket;
pub mod greedy;
pub mod leftover;
pub mod polynom;
pub mod potential;
pub mod score;
pub mod scoring;
pub mod solver;
