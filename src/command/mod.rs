//! Command aggregator for the dashboard CLI.

pub mod custom_command;
pub mod escape;
pub mod serve;

use tokio::io::AsyncReadExt;

/// `text` if given, otherwise everything on stdin.
pub(crate) async fn text_or_stdin(text: Option<String>) -> std::io::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            Ok(buffer)
        }
    }
}
