pub mod analyzer;
pub mod archiver;
pub mod collector;
pub mod config;
pub mod lexicon;
pub mod models;
pub mod session;
