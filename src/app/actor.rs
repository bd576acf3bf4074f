//! App actor - message loop processing UI events and network responses

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::warn;

use crate::app::state::{AppState, ToastKind};
use crate::clipboard::copy_text;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        origin: impl Into<String>,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(origin),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let _ = self.network_tx.send(self.state.settings_request());
        let _ = self.render_tx.send(self.state.to_render_state());

        let mut ticker = tokio::time::interval(TICK_INTERVAL);

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event).await {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                _ = ticker.tick() => {
                    if self.state.tick(Instant::now()) {
                        let _ = self.render_tx.send(self.state.to_render_state());
                    }
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    async fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Panel navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Catalog tree
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::Toggle => self.state.toggle_selected(),

            // Parameter form
            UiEvent::PrevParam => self.state.prev_param(),
            UiEvent::NextParam => self.state.next_param(),
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Endpoint actions
            UiEvent::Execute => {
                if self.state.input_mode == InputMode::Editing {
                    self.state.stop_editing();
                }
                if let Some(cmd) = self.state.execute_selected() {
                    let _ = self.network_tx.send(cmd);
                }
            }
            UiEvent::ClearEndpoint => self.state.clear_selected(),
            UiEvent::CopyUrl => {
                let text = self.state.url_to_copy();
                self.copy(text, "URL copied to clipboard!", "Failed to copy URL").await;
            }
            UiEvent::CopyResponse => {
                let text = self.state.response_to_copy();
                self.copy(text, "Response copied to clipboard!", "Failed to copy response")
                    .await;
            }

            // Search
            UiEvent::StartSearch => self.state.start_search(),
            UiEvent::SearchChar(c) => self.state.search_char(c),
            UiEvent::SearchBackspace => self.state.search_backspace(),
            UiEvent::ClearSearch => self.state.clear_search(),
            UiEvent::StopSearch => self.state.stop_search(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }

    async fn copy(&mut self, text: Option<String>, success: &str, failure: &str) {
        let Some(text) = text else {
            return;
        };
        match copy_text(text).await {
            Ok(()) => self.state.notify(ToastKind::Success, success),
            Err(e) => {
                warn!(error = %e, "Clipboard copy failed");
                self.state.notify(ToastKind::Error, failure);
            }
        }
    }
}
