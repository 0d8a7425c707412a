// src/lib.rs
pub mod bootstrap;
pub mod checks;
pub mod cli;
pub mod config;
pub mod environment;
pub mod health;
pub mod server;
