use crate::domain::error::TranslateError;
use crate::infrastructure::storage::prompts::PromptStore;
use crate::presentation::listing::format_listing;
use std::io::Write;

/// Print the available prompts (or a notice when there are none)
pub fn list_prompts(store: &PromptStore, out: &mut dyn Write) -> Result<(), TranslateError> {
    let listing = store.list()?;
    write!(out, "{}", format_listing(&listing, store.dir()))?;
    out.flush()?;
    Ok(())
}
