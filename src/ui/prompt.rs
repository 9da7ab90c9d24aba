use dialoguer::Confirm;
use ursync::run::Confirmer;

use crate::ui::theme::UrsyncTheme;

/// Interactive yes/no on the terminal; defaults to no.
pub struct DialoguerConfirmer {
    theme: UrsyncTheme,
}

impl DialoguerConfirmer {
    pub fn new(unicode: bool) -> Self {
        Self {
            theme: UrsyncTheme::new(unicode),
        }
    }
}

impl Confirmer for DialoguerConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        match Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(%err, "confirmation prompt failed; treating as no");
                false
            }
        }
    }
}
