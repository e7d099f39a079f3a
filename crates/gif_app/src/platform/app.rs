use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_debug, engine_info, engine_warn};
use gif_core::{update, AppState, Msg, TabId};
use gif_engine::{
    BackgroundHandle, BrowserEvent, DomSnapshot, EngineConfig, KeyValueStore, MemoryStore,
    Scanner, SnapshotExecutor, TabUrlStore,
};

use super::cli::Cli;
use super::effects::EffectRunner;
use super::persistence::RonFileStore;
use super::ui::render::render;

/// Popup state plus the loop that feeds effect results back into `update`.
struct Session {
    state: AppState,
    inbox: VecDeque<Msg>,
    runner: EffectRunner,
}

impl Session {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            inbox: VecDeque::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        self.inbox.push_back(msg);
        while let Some(next) = self.inbox.pop_front() {
            engine_debug!("dispatch {:?}", next);
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, next);
            self.state = state;
            self.inbox.extend(self.runner.run(effects));
        }
    }

    fn flush_view(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.state.consume_dirty() {
            return Ok(());
        }
        for line in render(&self.state.view()) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    super::logging::initialize(cli.log, cli.verbose);
    engine_info!("gif_app starting");

    let mut config = EngineConfig::default_with_export_dir(cli.out.clone());
    config.message_timeout = Duration::from_millis(cli.timeout_ms);

    let backend: Arc<dyn KeyValueStore> = match &cli.store {
        Some(dir) => Arc::new(RonFileStore::open(dir)),
        None => Arc::new(MemoryStore::new()),
    };
    let store = Arc::new(TabUrlStore::new(backend));
    let background = BackgroundHandle::spawn(store, &config)
        .context("failed to start background worker")?;

    if let Some(path) = &cli.events {
        let posted = replay_events(path, &background)?;
        engine_info!("Replayed {} events from {:?}", posted, path);
    }

    let executor = Arc::new(SnapshotExecutor::new(&config));
    if let (Some(page), Some(url)) = (&cli.page, &cli.url) {
        load_page(&executor, cli.tab, page, url);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to build runtime")?;
    let scanner = Scanner::new(executor, background.query_client());
    let mut session = Session::new(EffectRunner::new(runtime, scanner, config.export_dir.clone()));

    let stdout = io::stdout();
    session.dispatch(Msg::ScanClicked {
        active_tab: cli.active_tab(),
    });
    session.flush_view(&mut stdout.lock())?;

    if let Some(index) = cli.copy {
        session.dispatch(Msg::CopyClicked { index });
        session.flush_view(&mut stdout.lock())?;
    }
    if let Some(format) = cli.format {
        session.dispatch(Msg::ExportClicked { format });
        session.flush_view(&mut stdout.lock())?;
    }

    background.shutdown();
    Ok(())
}

/// Install the saved page as the tab's document. An unreadable page leaves
/// the tab without one, so the scan reports network results only.
fn load_page(executor: &SnapshotExecutor, tab_id: TabId, page: &Path, url: &str) {
    match fs::read(page) {
        Ok(bytes) => executor.insert(tab_id, DomSnapshot::from_bytes(&bytes, None, url)),
        Err(err) => engine_warn!("Failed to read page {:?}: {}", page, err),
    }
}

/// Post each JSON line of `path` to the background worker. Blank and
/// malformed lines are skipped.
fn replay_events(path: &Path, background: &BackgroundHandle) -> anyhow::Result<usize> {
    let file = fs::File::open(path).with_context(|| format!("failed to open {:?}", path))?;
    let mut posted = 0;
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {:?}", path))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<BrowserEvent>(&line) {
            Ok(event) => {
                if !background.post(event) {
                    engine_warn!("Background worker stopped; dropping remaining events");
                    break;
                }
                posted += 1;
            }
            Err(err) => {
                engine_warn!("Skipping event on line {}: {}", line_no + 1, err);
            }
        }
    }
    Ok(posted)
}
