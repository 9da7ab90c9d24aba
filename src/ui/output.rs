//! Human-readable diagnostics on stderr, gated by verbosity.

use std::path::Path;

use crossterm::style::{Color, Stylize};
use ursync::catalog::CatalogWarning;
use ursync::config::ConfigWarning;
use ursync::CatalogError;

use crate::ui::context::UiContext;
use crate::ui::icon::Icon;
use crate::ui::theme::colors;

pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

pub fn print_error(ui: &UiContext, message: &str) {
    if ui.verbosity.shows_errors() {
        eprintln!("{} {}", Icon::Error.colored(ui.color, ui.unicode), message);
    }
}

/// Fatal errors are printed at every verbosity level.
pub fn print_fatal(ui: &UiContext, message: &str) {
    eprintln!(
        "{} {}",
        Icon::Error.colored(ui.color, ui.unicode),
        paint(message, colors::ERROR, ui.color)
    );
}

pub fn print_warning(ui: &UiContext, message: &str) {
    if ui.verbosity.shows_warnings() {
        eprintln!(
            "{} {}",
            Icon::Warning.colored(ui.color, ui.unicode),
            paint(message, colors::WARNING, ui.color)
        );
    }
}

pub fn print_config_warnings(ui: &UiContext, warnings: &[ConfigWarning]) {
    if !ui.verbosity.shows_warnings() {
        return;
    }
    for w in warnings {
        eprint!("{}", render_config_warning(w, ui.unicode));
    }
}

fn render_config_warning(w: &ConfigWarning, unicode: bool) -> String {
    let icon = Icon::Warning.render(unicode);
    let mut out = match w.line {
        Some(line) => format!(
            "{} Unknown config key '{}' in {}:{}\n",
            icon,
            w.key,
            w.file.display(),
            line
        ),
        None => format!(
            "{} Unknown config key '{}' in {}\n",
            icon,
            w.key,
            w.file.display()
        ),
    };
    if let Some(suggestion) = &w.suggestion {
        out.push_str(&format!("   Did you mean '{}'?\n", suggestion));
    }
    out
}

pub fn print_catalog_warnings(ui: &UiContext, warnings: &[CatalogWarning]) {
    for warning in warnings {
        print_warning(ui, &warning.to_string());
    }
}

/// Every violation, then the count. Never suppressed.
pub fn print_catalog_error(ui: &UiContext, err: &CatalogError) {
    if let CatalogError::Invalid { warnings, .. } = err {
        print_catalog_warnings(ui, warnings);
    }
    eprint!("{}", render_catalog_error(err, ui.unicode));
}

pub fn render_catalog_error(err: &CatalogError, unicode: bool) -> String {
    let icon = Icon::Error.render(unicode);
    let mut out = String::new();
    match err {
        CatalogError::Invalid { file, violations, .. } => {
            out.push_str(&format!("{} Invalid site catalog {}\n", icon, file.display()));
            for violation in violations {
                out.push_str(&format!("  {} {}\n", icon, violation));
            }
        }
        CatalogError::Io { .. } | CatalogError::Parse { .. } => {
            out.push_str(&format!("{} {}\n", icon, err));
        }
    }
    out.push_str(&format!("Number of errors: {}\n", err.count()));
    out
}

/// Which catalog file is in use; hidden only at `-qq`.
pub fn print_catalog_location(ui: &UiContext, path: &Path, custom: bool) {
    if ui.verbosity.shows_errors() && !ui.json {
        let kind = if custom { "custom" } else { "default" };
        eprintln!("Using {} site location: {}", kind, path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use ursync::catalog::Violation;

    #[test]
    fn config_warning_with_line_and_suggestion() {
        let w = ConfigWarning {
            key: "verbosty".to_string(),
            file: PathBuf::from("/c/config.toml"),
            line: Some(2),
            suggestion: Some("verbosity".to_string()),
        };
        assert_eq!(
            render_config_warning(&w, true),
            "⚠ Unknown config key 'verbosty' in /c/config.toml:2\n   Did you mean 'verbosity'?\n"
        );
    }

    #[test]
    fn catalog_error_lists_every_violation_and_count() {
        let err = CatalogError::Invalid {
            file: PathBuf::from("sites.toml"),
            violations: vec![
                Violation::NoSites,
                Violation::TooManyNotifications,
            ],
            warnings: Vec::new(),
        };
        let text = render_catalog_error(&err, false);
        assert!(text.starts_with("[FAIL] Invalid site catalog sites.toml\n"));
        assert!(text.contains("  [FAIL] no sites configured in sites file\n"));
        assert!(text.contains("  [FAIL] too many notification scripts in sites file\n"));
        assert!(text.ends_with("Number of errors: 2\n"));
    }

    #[test]
    fn parse_error_counts_as_one() {
        let err = CatalogError::Parse {
            file: PathBuf::from("sites.toml"),
            message: "expected `=`".to_string(),
        };
        assert!(render_catalog_error(&err, true).ends_with("Number of errors: 1\n"));
    }

    #[test]
    fn paint_is_identity_without_color() {
        assert_eq!(paint("x", colors::ERROR, false), "x");
    }
}
