use std::io::{self, Write};

use serde::Serialize;

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &impl Serialize) -> io::Result<()> {
    let line = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Convenience helper that writes to stdout.
pub fn emit(event: &impl Serialize) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, event)
}

/// Emitted once when a command starts.
#[derive(Debug, Clone, Serialize)]
pub struct StartEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub version: &'static str,
}

impl<'a> StartEvent<'a> {
    pub fn new(command: &'a str) -> Self {
        Self {
            event: "start",
            command,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Emitted once when a command ends.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteEvent<'a> {
    pub event: &'static str,
    pub command: &'a str,
    pub success: bool,
    pub exit_code: i32,
}

impl<'a> CompleteEvent<'a> {
    pub fn new(command: &'a str, exit_code: i32) -> Self {
        Self {
            event: "complete",
            command,
            success: exit_code == 0,
            exit_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_event_is_one_line() {
        let mut out = Vec::new();
        write_event(&mut out, &serde_json::json!({"event": "start"})).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"event\":\"start\"}\n");
    }

    #[test]
    fn complete_event_reports_failure() {
        let value = serde_json::to_value(CompleteEvent::new("run", 1)).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["exit_code"], 1);
        assert_eq!(value["command"], "run");
    }
}
