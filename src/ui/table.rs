//! Site listing table.
//!
//! Column widths are measured in terminal cells so wide (CJK) names line up.

use unicode_width::UnicodeWidthStr;
use ursync::Site;

const GAP: usize = 5;

const TITLES: [&str; 5] = [
    "SITE ID",
    "SITE NAME",
    "TRANSFER TYPE",
    "TRANSFER SOURCE",
    "TRANSFER DESTINATION",
];

fn row(site: &Site) -> [String; 5] {
    [
        site.id.clone(),
        site.name.clone(),
        format!("{}->{}", site.source.kind(), site.destination.kind()),
        site.source.path_spec().to_string(),
        site.destination.path_spec().to_string(),
    ]
}

pub fn render_site_table(sites: &[&Site], all: bool) -> String {
    let rows: Vec<[String; 5]> = sites.iter().map(|s| row(s)).collect();

    let mut widths = TITLES.map(UnicodeWidthStr::width);
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r) {
            *w = (*w).max(cell.width());
        }
    }

    let mut out = format!(
        "LISTING ALL {} TRANSFER SITES\n\n",
        if all { "CONFIGURED" } else { "AVAILABLE" }
    );
    out.push_str(&line(&TITLES, &widths));
    let bar: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(&bar, &widths));
    for r in &rows {
        out.push_str(&line(r, &widths));
    }
    out
}

fn line<S: AsRef<str>>(cells: &[S], widths: &[usize; 5]) -> String {
    let mut out = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        let cell = cell.as_ref();
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.width()) + GAP));
    }
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}
