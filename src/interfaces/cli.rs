use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

#[derive(Parser, Debug)]
#[command(name = "translate")]
#[command(about = "Transforms text using prompts from ~/.config/translate/prompts/")]
#[command(version)]
pub struct Cli {
    /// Name of the prompt file (without .txt extension)
    pub prompt_name: Option<String>,

    /// The input string to be transformed
    pub text: Vec<String>,

    /// List all available prompts
    #[arg(short = 'l', long)]
    pub list: bool,

    /// The Ollama model to use. Recommended: llama3.2:3b, phi3:mini, or qwen2.5:3b
    #[arg(long)]
    pub model: Option<String>,

    /// Show loading/unloading messages and other status information
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// What the invocation asks for, after validation
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    List,
    Transform {
        prompt_name: String,
        text: Vec<String>,
    },
}

impl Cli {
    /// Validate positional arguments. Errors are usage errors (exit status 2).
    pub fn mode(&self) -> Result<Mode, clap::Error> {
        if self.list {
            return Ok(Mode::List);
        }

        let Some(prompt_name) = self.prompt_name.clone() else {
            return Err(Self::command().error(
                ErrorKind::MissingRequiredArgument,
                "prompt_name is required unless using --list",
            ));
        };

        if self.text.is_empty() {
            return Err(Self::command().error(ErrorKind::MissingRequiredArgument, "text is required"));
        }

        Ok(Mode::Transform {
            prompt_name,
            text: self.text.clone(),
        })
    }
}
