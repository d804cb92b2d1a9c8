pub mod ai_provider;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logger;
pub mod matcher;
pub mod review;
pub mod scanner;
