//! Loritta dashboard: literal synthesis for generated custom commands, the custom commands editor,
//! and the web server handling Discord OAuth2 logins.

pub mod cli;
pub mod command;
pub mod internal;
pub mod utils;
