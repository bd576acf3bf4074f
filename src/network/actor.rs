//! Network actor - runs catalog loads and endpoint calls in Tokio async runtime

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::ConsoleConfig;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, execute_request, fetch_settings};

/// Network actor that processes HTTP commands. Calls run concurrently and are never cancelled.
pub struct NetworkActor {
    client: reqwest::Client,
    media_dir: Arc<PathBuf>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(config: &ConsoleConfig, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client: create_client(config),
            media_dir: Arc::new(config.media_dir()),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::LoadSettings { url }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(%url, "Loading settings");
                                let (settings, fallback) = fetch_settings(&client, &url).await;
                                let _ = response_tx.send(NetworkResponse::SettingsLoaded { settings, fallback });
                            });
                        }

                        Some(NetworkCommand::ExecuteRequest { id, key, method, url }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let media_dir = Arc::clone(&self.media_dir);

                            self.active_requests.spawn(async move {
                                let result = execute_request(&client, id, key, method, url, &media_dir).await;
                                tracing::info!(id, ok = matches!(result, NetworkResponse::Success { .. }), "Request completed");
                                let _ = response_tx.send(result);
                            });
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}
