use crate::{AppState, Effect, Msg, ScanState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ScanClicked { active_tab } => {
            // Input stays disabled until the running scan resolves.
            if state.scan_state() == ScanState::Scanning {
                return (state, Vec::new());
            }
            state.begin_scan();
            vec![Effect::RunScan { active_tab }]
        }
        Msg::ScanCompleted { entries } => {
            if state.scan_state() == ScanState::Scanning {
                state.finish_scan(entries);
            }
            Vec::new()
        }
        Msg::ScanFailed { message } => {
            if state.scan_state() == ScanState::Scanning {
                state.fail(message);
            }
            Vec::new()
        }
        Msg::CopyClicked { index } => match state.entries().get(index) {
            Some(entry) => vec![Effect::CopyToClipboard {
                url: entry.url.clone(),
            }],
            None => Vec::new(),
        },
        Msg::Copied => {
            state.show_toast("Copied!");
            Vec::new()
        }
        Msg::CopyFailed { message } => {
            state.show_toast(format!("Copy failed: {message}"));
            Vec::new()
        }
        Msg::ExportClicked { format } => {
            if state.scan_state() == ScanState::Idle && !state.entries().is_empty() {
                vec![Effect::Export {
                    format,
                    entries: state.entries().to_vec(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::ExportFinished { result } => {
            match result {
                Ok(name) => state.show_toast(format!("Saved {name}")),
                Err(message) => state.show_toast(format!("Export failed: {message}")),
            }
            Vec::new()
        }
        Msg::Tick => {
            state.tick();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
