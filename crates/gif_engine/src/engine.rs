use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use gif_core::TabId;
use tokio::sync::oneshot;

use crate::kv::KeyValueStore;
use crate::listeners::{BackgroundListener, BrowserEvent};
use crate::messaging::{MessagingError, StoreQuery, StoreRequest, StoreResponse};
use crate::store::TabUrlStore;
use crate::EngineConfig;

enum EngineCommand {
    Event(BrowserEvent),
    Query {
        request: StoreRequest,
        reply: oneshot::Sender<StoreResponse>,
    },
    Shutdown,
}

/// Background worker that owns the store's event stream.
///
/// Commands are applied one at a time in the order they were posted, so a
/// navigation clear always lands before network events that follow it.
pub struct BackgroundHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    message_timeout: Duration,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BackgroundHandle {
    pub fn spawn<S>(store: Arc<TabUrlStore<S>>, config: &EngineConfig) -> io::Result<Self>
    where
        S: KeyValueStore + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let worker = thread::Builder::new()
            .name("gif-background".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    if matches!(command, EngineCommand::Shutdown) {
                        break;
                    }
                    runtime.block_on(handle_command(store.as_ref(), command));
                }
                engine_info!("background worker stopped");
            })?;

        Ok(Self {
            cmd_tx,
            message_timeout: config.message_timeout,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Fire-and-forget delivery of a host event. Returns `false` once the
    /// worker has stopped.
    pub fn post(&self, event: BrowserEvent) -> bool {
        self.cmd_tx.send(EngineCommand::Event(event)).is_ok()
    }

    pub fn query_client(&self) -> ChannelStoreQuery {
        ChannelStoreQuery {
            cmd_tx: self.cmd_tx.clone(),
            timeout: self.message_timeout,
        }
    }

    /// Stops the worker after it drains the commands posted so far.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(worker) = worker {
            if worker.join().is_err() {
                engine_warn!("background worker panicked");
            }
        }
    }
}

impl Drop for BackgroundHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn handle_command<L: BackgroundListener + ?Sized>(listener: &L, command: EngineCommand) {
    match command {
        EngineCommand::Event(event) => listener.dispatch(&event).await,
        EngineCommand::Query { request, reply } => {
            let response = listener.on_message(request).await;
            // The asking side may have timed out already.
            let _ = reply.send(response);
        }
        EngineCommand::Shutdown => {}
    }
}

/// Request/response client for the background store.
#[derive(Clone)]
pub struct ChannelStoreQuery {
    cmd_tx: mpsc::Sender<EngineCommand>,
    timeout: Duration,
}

impl ChannelStoreQuery {
    pub async fn request(&self, request: StoreRequest) -> Result<StoreResponse, MessagingError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(EngineCommand::Query {
                request,
                reply: reply_tx,
            })
            .map_err(|_| MessagingError::Disconnected)?;

        match tokio::time::timeout(self.timeout, reply_rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(MessagingError::Disconnected),
            Err(_) => Err(MessagingError::Timeout(self.timeout)),
        }
    }
}

#[async_trait::async_trait]
impl StoreQuery for ChannelStoreQuery {
    async fn network_gifs(&self, tab_id: TabId) -> Result<Vec<String>, MessagingError> {
        let response = self.request(StoreRequest::GetNetworkGifs { tab_id }).await?;
        Ok(response.urls)
    }
}
