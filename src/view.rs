use std::fmt::Write;

use crate::controller::AppState;
use crate::models::{School, StatusKind, StatusMessage};

pub const EMPTY_LIST_TEXT: &str = "No schools found. Add a school to get started.";

/// Full screen: status, both forms and the school table
pub fn render(state: &AppState) -> String {
    let mut out = String::new();

    out.push_str("School Management System\n");
    if let Some(line) = render_status(&state.status) {
        let _ = writeln!(out, "{}", line);
    }

    let draft = &state.draft;
    out.push_str("\nAdd New School\n");
    let _ = writeln!(out, "  name:      {}", draft.name);
    let _ = writeln!(out, "  address:   {}", draft.address);
    let _ = writeln!(out, "  lat:       {}", draft.latitude);
    let _ = writeln!(out, "  lon:       {}", draft.longitude);

    out.push_str("\nYour Location\n");
    let _ = writeln!(out, "  my-lat:    {}", state.location.latitude);
    let _ = writeln!(out, "  my-lon:    {}", state.location.longitude);

    out.push_str("\nSchool List (Sorted by Distance)");
    if let Some(at) = state.last_refreshed {
        let _ = write!(out, ", updated {}", at.format("%H:%M:%S"));
    }
    out.push('\n');
    out.push_str(&render_schools(&state.schools));

    out
}

pub fn render_status(status: &StatusMessage) -> Option<String> {
    match status.kind {
        StatusKind::None => None,
        StatusKind::Success => Some(format!("[ok] {}", status.text)),
        StatusKind::Error => Some(format!("[error] {}", status.text)),
    }
}

pub fn format_distance(distance: Option<f64>) -> String {
    match distance {
        Some(km) => format!("{:.2} km", km),
        None => "-".to_string(),
    }
}

/// Table rows in the order given
pub fn render_schools(schools: &[School]) -> String {
    if schools.is_empty() {
        return format!("{}\n", EMPTY_LIST_TEXT);
    }

    let distances: Vec<String> = schools.iter().map(|s| format_distance(s.distance)).collect();
    let name_width = column_width("Name", schools.iter().map(|s| s.name.as_str()));
    let address_width = column_width("Address", schools.iter().map(|s| s.address.as_str()));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<nw$}  {:<aw$}  {}",
        "Name",
        "Address",
        "Distance (km)",
        nw = name_width,
        aw = address_width
    );
    for (school, distance) in schools.iter().zip(&distances) {
        let _ = writeln!(
            out,
            "{:<nw$}  {:<aw$}  {}",
            school.name,
            school.address,
            distance,
            nw = name_width,
            aw = address_width
        );
    }
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}
