use gif_core::{AppViewModel, EntryRowView, ScanState};

/// Render the popup view as terminal lines: header, status, rows, toast.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let state_label = match view.scan_state {
        ScanState::Idle => "Idle",
        ScanState::Scanning => "Scanning",
    };

    let mut lines = Vec::with_capacity(view.rows.len() + 3);
    lines.push(format!(
        "GIF URL Grabber | {} | scan: {} | export: {}",
        state_label,
        on_off(view.scan_enabled),
        on_off(view.export_enabled)
    ));
    lines.push(view.status.clone());

    let width = badge_width(&view.rows);
    for (index, row) in view.rows.iter().enumerate() {
        lines.push(format!(
            "{:>3}. [{:<width$}] {}",
            index,
            row.badge,
            row.url,
            width = width
        ));
    }

    if let Some(toast) = &view.toast {
        lines.push(format!("» {}", toast));
    }

    lines
}

fn badge_width(rows: &[EntryRowView]) -> usize {
    rows.iter().map(|row| row.badge.len()).max().unwrap_or(0)
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
