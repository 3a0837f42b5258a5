//! Spiel Domain Concerns

pub mod games;
