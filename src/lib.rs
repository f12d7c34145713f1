// src/lib.rs

pub mod accrual;
pub mod clock;
pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod format;
pub mod models;
pub mod persistence;
pub mod quotes;
pub mod repository;
pub mod session;
pub mod settlement;
pub mod sound;
pub mod streak;
