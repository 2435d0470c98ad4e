pub mod app;
pub mod cli;
pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod grouping;
pub mod loader;
pub mod model;
pub mod occupancy;
pub mod output;
pub mod runner;
pub mod stats;
pub mod utils;
pub mod visitors;

#[cfg(test)]
mod tests;
