//! Internal module aggregator for the literal escaper, custom commands, Discord access, persistence
//! and the dashboard web server.

pub mod config;
pub mod custom_command;
pub mod db;
pub mod discord;
pub mod literal;
pub mod model;
pub mod session;
pub mod web;
