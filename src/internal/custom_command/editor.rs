//! Custom command editor state for one guild page, attached on route entry and released on exit.

use serde::{Deserialize, Serialize};

use super::{CommandError, CommandKind, CustomCommand, CustomCommandData, SAVE_TYPE};

/// Body of the save request sent to the guild configuration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    #[serde(rename = "type")]
    pub save_type: String,
    pub entries: Vec<CustomCommand>,
}

/// Row shown in the command list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub label: String,
    pub kind: CommandKind,
}

/// What the text command dialog is reopened with when editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub label: String,
    pub text: String,
}

struct AttachedGuild {
    guild_id: u64,
    commands: Vec<CustomCommand>,
}

#[derive(Default)]
pub struct CustomCommandsEditor {
    attached: Option<AttachedGuild>,
}

impl CustomCommandsEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the command list of `guild_id`, replacing whatever was attached before.
    pub fn attach(&mut self, guild_id: u64, commands: Vec<CustomCommand>) {
        tracing::debug!(guild_id, count = commands.len(), "attaching custom commands");
        self.attached = Some(AttachedGuild { guild_id, commands });
    }

    /// Drops the attached list; every later operation fails with [`CommandError::Detached`].
    pub fn release(&mut self) {
        self.attached = None;
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn guild_id(&self) -> Result<u64, CommandError> {
        Ok(self.guild()?.guild_id)
    }

    pub fn commands(&self) -> Result<&[CustomCommand], CommandError> {
        Ok(&self.guild()?.commands)
    }

    fn guild(&self) -> Result<&AttachedGuild, CommandError> {
        self.attached.as_ref().ok_or(CommandError::Detached)
    }

    fn guild_mut(&mut self) -> Result<&mut AttachedGuild, CommandError> {
        self.attached.as_mut().ok_or(CommandError::Detached)
    }

    pub fn add_text_command(&mut self, label: &str, text: &str) -> Result<(), CommandError> {
        let command = CustomCommand::text(label, text)?;
        self.guild_mut()?.commands.push(command);
        Ok(())
    }

    /// Removes the first command named `label`.
    pub fn remove(&mut self, label: &str) -> Result<CustomCommand, CommandError> {
        let guild = self.guild_mut()?;
        let index = guild
            .commands
            .iter()
            .position(|command| command.label == label)
            .ok_or_else(|| CommandError::NotFound(label.to_string()))?;
        Ok(guild.commands.remove(index))
    }

    /// Takes a command out of the list so it can be re-added from the dialog.
    ///
    /// Only text commands can be reopened; other kinds are removed and `None` is returned.
    pub fn edit(&mut self, label: &str) -> Result<Option<EditTarget>, CommandError> {
        let command = self.remove(label)?;
        let target = match command.wrapper() {
            Some(Ok(wrapper)) => match wrapper.data {
                CustomCommandData::Text(data) => Some(EditTarget {
                    label: command.label,
                    text: data.text,
                }),
                CustomCommandData::Autorole(_) => None,
            },
            _ => None,
        };
        Ok(target)
    }

    /// Generated commands in list order. Hand-written scripts are not listed.
    pub fn entries(&self) -> Result<Vec<EntrySummary>, CommandError> {
        Ok(self
            .guild()?
            .commands
            .iter()
            .filter(|command| command.is_generated())
            .map(|command| EntrySummary {
                label: command.label.clone(),
                kind: command.kind(),
            })
            .collect())
    }

    pub fn save_request(&self) -> Result<SaveRequest, CommandError> {
        Ok(SaveRequest {
            save_type: SAVE_TYPE.to_string(),
            entries: self.guild()?.commands.clone(),
        })
    }
}
