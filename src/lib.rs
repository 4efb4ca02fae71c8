pub mod api;
pub mod assistant;
pub mod backend;
pub mod calendar;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod sample;
pub mod services;
pub mod state;
