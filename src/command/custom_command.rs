//! Custom command tooling: generate and inspect scripts locally, or list and edit a guild's commands
//! on a running dashboard.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use url::Url;

use crate::internal::custom_command::{
    CommandKind, CustomCommand, client::DashboardClient, editor::CustomCommandsEditor,
};

#[derive(Subcommand, Debug)]
pub enum CustomCommandCmds {
    /// Generate a text command and print its script
    New {
        /// Command label
        label: String,
        /// Reply text, read from stdin when omitted
        text: Option<String>,
    },
    /// Show the kind and reply text of a script file
    Inspect {
        /// File containing the script
        file: PathBuf,
    },
    /// List the custom commands of a guild
    List(RemoteArgs),
    /// Add a text command to a guild
    Add {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Command label
        label: String,
        /// Reply text, read from stdin when omitted
        text: Option<String>,
    },
    /// Remove a custom command from a guild
    Remove {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Command label
        label: String,
    },
}

#[derive(Args, Debug)]
pub struct RemoteArgs {
    /// Dashboard base url
    #[arg(long, default_value = "https://loritta.website/")]
    pub url: Url,
    /// Guild id
    #[arg(long)]
    pub guild: u64,
    /// Value of the `SESSION_ID` cookie of a logged in session
    #[arg(long, env = "LORITTA_SESSION_ID")]
    pub session: String,
}

impl RemoteArgs {
    fn client(&self) -> DashboardClient {
        DashboardClient::new(self.url.clone()).with_session(self.session.clone())
    }

    async fn load(&self) -> anyhow::Result<(DashboardClient, CustomCommandsEditor)> {
        let client = self.client();
        let mut editor = CustomCommandsEditor::new();
        client.load_editor(&mut editor, self.guild).await?;
        Ok((client, editor))
    }
}

pub async fn execute(cmd: CustomCommandCmds) -> anyhow::Result<()> {
    match cmd {
        CustomCommandCmds::New { label, text } => {
            let text = super::text_or_stdin(text).await?;
            let command = CustomCommand::text(label, &text)?;
            println!("{}", command.code);
        }
        CustomCommandCmds::Inspect { file } => {
            let code = tokio::fs::read_to_string(&file).await?;
            let label = file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            print!("{}", describe(&CustomCommand { label, code })?);
        }
        CustomCommandCmds::List(remote) => {
            let (_, editor) = remote.load().await?;
            let commands = editor.commands()?;
            let entries = editor.entries()?;
            for entry in &entries {
                println!("{}\t{}", entry.label, entry.kind.label());
            }
            let scripts = commands.len() - entries.len();
            if scripts > 0 {
                println!("({scripts} hand-written scripts not shown)");
            }
        }
        CustomCommandCmds::Add {
            remote,
            label,
            text,
        } => {
            let text = super::text_or_stdin(text).await?;
            let (client, mut editor) = remote.load().await?;
            editor.add_text_command(&label, &text)?;
            client.save_editor(&editor).await?;
            println!("Added `{label}` to guild {}", remote.guild);
        }
        CustomCommandCmds::Remove { remote, label } => {
            let (client, mut editor) = remote.load().await?;
            editor.remove(&label)?;
            client.save_editor(&editor).await?;
            println!("Removed `{label}` from guild {}", remote.guild);
        }
    }
    Ok(())
}

/// Human readable summary of a script: its kind, and the reply for text commands.
pub fn describe(command: &CustomCommand) -> anyhow::Result<String> {
    let kind = command.kind();
    let mut out = format!("{}: {}\n", command.label, kind.label());
    if kind == CommandKind::Text {
        out.push_str(&command.message_text()?);
        out.push('\n');
    }
    Ok(out)
}
