pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod favorites;
pub mod journal;
pub mod persistence;
pub mod plan;
pub mod planner;
pub mod session;
pub mod state;
pub mod storage;
