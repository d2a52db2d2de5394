pub mod audit;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod output;
pub mod pattern;
pub mod report;
pub mod score;
pub mod site;
pub mod tools;
