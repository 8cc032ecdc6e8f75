pub mod client;

pub use client::{HttpPredictionClient, PredictionService};
