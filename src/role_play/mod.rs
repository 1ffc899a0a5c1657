//! Scripted customer for sales role-play practice

pub mod simulator;

pub use simulator::{customer_line, evaluate, final_score, Simulator};
