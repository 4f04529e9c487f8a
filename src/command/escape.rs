//! Prints text as a string literal, the same way generated custom commands embed their messages.

use clap::Parser;

use crate::internal::literal::{self, LiteralOptions};

#[derive(Parser, Debug)]
pub struct EscapeArgs {
    /// Text to escape, read from stdin when omitted
    pub text: Option<String>,

    /// Leave `$` unescaped so templates stay live
    #[arg(long)]
    pub raw: bool,

    /// Always emit the single-line form, usable as a constant
    #[arg(long)]
    pub constant: bool,
}

impl EscapeArgs {
    pub fn options(&self) -> LiteralOptions {
        LiteralOptions {
            escape_dollar_sign: !self.raw,
            is_constant_context: self.constant,
        }
    }
}

pub async fn execute(args: EscapeArgs) -> anyhow::Result<()> {
    let options = args.options();
    let text = super::text_or_stdin(args.text).await?;
    println!("{}", literal::string_literal_with_quotes(&text, options));
    Ok(())
}
