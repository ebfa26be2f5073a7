pub mod api;
pub mod config;
pub mod db;
pub mod league;
pub mod session;
pub mod standings;
