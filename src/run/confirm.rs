//! Confirmation port.

pub trait Confirmer {
    /// Ask the operator; anything but an explicit yes is a no.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt the same way (`--yes`, non-interactive runs).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirmer for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
