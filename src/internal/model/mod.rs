//! SeaORM entities for the tables the dashboard reads and writes: dailies, profiles and custom commands.

pub mod custom_command;
pub mod daily;
pub mod profile;
