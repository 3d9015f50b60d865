use crate::domain::model::PromptListing;
use colored::Colorize;
use std::fmt::Write;
use std::path::Path;

/// Render a prompt listing for stdout
pub fn format_listing(listing: &PromptListing, dir: &Path) -> String {
    let mut output = String::new();
    match listing {
        PromptListing::MissingDirectory => {
            writeln!(output, "No prompts directory found. Create: {}/", dir.display()).ok();
        }
        PromptListing::Empty => {
            writeln!(output, "No prompts found in {}/", dir.display()).ok();
        }
        PromptListing::Found(names) => {
            writeln!(output, "{}", "Available prompts:".green().bold()).ok();
            for name in names {
                writeln!(output, "  {}", name).ok();
            }
        }
    }
    output
}
