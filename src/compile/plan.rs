//! Compiled command sequences.

use std::fmt;

use serde::Serialize;

/// One external command: a program and its argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub(crate) fn push(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }
}

/// Renders as a copy-pasteable shell line.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", display_quote(arg))?;
        }
        Ok(())
    }
}

/// The transfer for one site plus the steps that run after it succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationPlan {
    pub primary: Invocation,
    /// Only populated for real (non dry-run) snapshot transfers
    pub post: Vec<Invocation>,
}

impl InvocationPlan {
    /// Primary first, then post-processing, in execution order.
    pub fn invocations(&self) -> impl Iterator<Item = &Invocation> {
        std::iter::once(&self.primary).chain(self.post.iter())
    }
}

fn display_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_alphanumeric() || "-_./:=@%+,~".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}
