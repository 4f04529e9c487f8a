//! Guild custom commands: the persisted `(label, code)` record, the typed configuration embedded in
//! generated code, and the code generator that wraps user text into a `sendMessage(...)` script.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::internal::literal::{
    self,
    eval::{self, EvalError},
};

pub mod client;
pub mod editor;

/// First line of every script produced by [`CustomCommand::text`].
pub const GENERATED_HEADER: &str = "// Loritta Auto Generated Custom Command - Do not edit!";
/// Save type under which the command list is persisted.
pub const SAVE_TYPE: &str = "custom_commands";

const COMMENT_PREFIX: &str = "// ";
const SEND_MESSAGE_CALL: &str = "sendMessage(";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("custom command `{0}` was not generated by the dashboard")]
    NotGenerated(String),

    #[error("malformed command data: {0}")]
    MalformedData(#[from] serde_json::Error),

    #[error("malformed generated script: {0}")]
    MalformedScript(String),

    #[error("invalid message literal: {0}")]
    Literal(#[from] EvalError),

    #[error("custom command `{0}` not found")]
    NotFound(String),

    #[error("no guild is attached to the editor")]
    Detached,
}

/// A custom command as stored by the guild configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommand {
    pub label: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCustomCommand {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoroleCustomCommand {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Typed configuration of a generated command, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CustomCommandData {
    Text(TextCustomCommand),
    Autorole(AutoroleCustomCommand),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommandWrapper {
    pub data: CustomCommandData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Text,
    /// Generated, but of a kind the editor cannot render.
    Other,
    /// Hand-written script.
    Script,
}

impl CommandKind {
    pub fn label(&self) -> &'static str {
        match self {
            CommandKind::Text => "Text command",
            CommandKind::Other => "???",
            CommandKind::Script => "Kotlin command",
        }
    }
}

impl CustomCommand {
    /// Generates a text command that replies with `text`.
    pub fn text(label: impl Into<String>, text: &str) -> Result<Self, CommandError> {
        let wrapper = CustomCommandWrapper {
            data: CustomCommandData::Text(TextCustomCommand {
                text: text.to_string(),
            }),
        };
        let data = serde_json::to_string(&wrapper)?;
        let code = format!(
            "{GENERATED_HEADER}\n{COMMENT_PREFIX}{data}\n{SEND_MESSAGE_CALL}{})",
            literal::escape(text)
        );
        Ok(Self {
            label: label.into(),
            code,
        })
    }

    pub fn is_generated(&self) -> bool {
        self.code.starts_with(GENERATED_HEADER)
    }

    /// Parses the embedded configuration, `None` for hand-written scripts.
    pub fn wrapper(&self) -> Option<Result<CustomCommandWrapper, CommandError>> {
        if !self.is_generated() {
            return None;
        }
        let line = self.code.lines().nth(1).unwrap_or_default();
        let json = line.strip_prefix(COMMENT_PREFIX).unwrap_or(line);
        Some(serde_json::from_str(json).map_err(CommandError::from))
    }

    pub fn kind(&self) -> CommandKind {
        match self.wrapper() {
            None => CommandKind::Script,
            Some(Ok(CustomCommandWrapper {
                data: CustomCommandData::Text(_),
            })) => CommandKind::Text,
            Some(_) => CommandKind::Other,
        }
    }

    /// Reads the message back out of the generated `sendMessage(...)` call.
    pub fn message_text(&self) -> Result<String, CommandError> {
        if !self.is_generated() {
            return Err(CommandError::NotGenerated(self.label.clone()));
        }
        let body = self
            .code
            .splitn(3, '\n')
            .nth(2)
            .ok_or_else(|| CommandError::MalformedScript("missing script body".to_string()))?;
        let argument = body.strip_prefix(SEND_MESSAGE_CALL).ok_or_else(|| {
            CommandError::MalformedScript(format!("expected `{SEND_MESSAGE_CALL}`"))
        })?;
        let (text, rest) = eval::parse_literal(argument)?;
        if rest.trim_end() != ")" {
            return Err(CommandError::MalformedScript(format!(
                "unexpected input after message: {rest:?}"
            )));
        }
        Ok(text)
    }
}
