//! API Dock console - interactive catalog of gateway endpoints
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use apidock::catalog::ResponsePanel;
use apidock::config::Config;
use apidock::constants::{APP_NAME, APP_VERSION};
use apidock::messages::render::{EndpointView, RowView};
use apidock::messages::ui_events::{key_to_ui_event, InputMode, Panel};
use apidock::network::content::{MediaBlob, ResponseContent};
use apidock::ui::{
    endpoint_status_color, highlight_json, method_color, status_color, toast_color, toast_width,
};
use apidock::{AppActor, NetworkActor, NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "apidock.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(gateway = %config.console.gateway_url, "Starting console");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(&config.console, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(config.console.gateway_url.clone(), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Search
            Constraint::Min(0),    // Catalog
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_header(f, state, main_chunks[0]);
    draw_search_bar(f, state, main_chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_chunks[2]);

    draw_tree(f, state, body[0]);
    draw_detail(f, state, body[1]);
    draw_status_bar(f, state, main_chunks[3]);

    if let Some(toast) = &state.toast {
        draw_toast(f, toast, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn focus_style(focused: bool, editing: bool) -> Style {
    if focused && editing {
        Style::default().fg(Color::Yellow)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_header(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = if state.loading_settings {
        String::from(APP_NAME)
    } else {
        state.title.clone()
    };

    let mut spans = vec![Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold())];
    if !state.creator.is_empty() {
        spans.push(Span::styled(format!("by {} ", state.creator), Style::default().fg(Color::DarkGray)));
    }
    if state.settings_fallback {
        spans.push(Span::styled("[offline] ", Style::default().fg(Color::Red)));
    }

    let description = if state.loading_settings {
        String::from("Loading API catalog...")
    } else {
        state.description.clone()
    };

    for (label, url) in &state.links {
        spans.push(Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(format!("{} ", url), Style::default().fg(Color::Blue).underlined()));
    }

    let header = Paragraph::new(vec![Line::from(spans), Line::from(format!(" {}", description))])
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_search_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let searching = state.input_mode == InputMode::Search;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(searching, searching))
        .title(" Search (/) ");

    let content = if state.search_query.is_empty() && !searching {
        Line::from(Span::styled(
            "Search endpoints by name, path, method or category...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(state.search_query.as_str())
    };
    f.render_widget(Paragraph::new(content).block(block), area);

    if searching {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + state.search_query.chars().count() as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_tree(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Tree;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(is_focused, false))
        .title(" API Catalog ");

    if state.rows.is_empty() {
        let message = if state.loading_settings {
            "Loading..."
        } else if state.no_results {
            "No results\n\nTry a different search term."
        } else {
            "No API data available"
        };
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = state
        .rows
        .iter()
        .map(|row| match row {
            RowView::Category { name, icon, count, expanded } => {
                let arrow = if *expanded { "▾" } else { "▸" };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} {} ", arrow, icon)),
                    Span::styled(name.clone(), Style::default().bold()),
                    Span::styled(format!(" ({} endpoints)", count), Style::default().fg(Color::DarkGray)),
                ]))
            }
            RowView::Endpoint { method, path, name, status, expanded, loading } => {
                let arrow = if *expanded { "▾" } else { "▸" };
                let mut spans = vec![
                    Span::raw(format!("    {} ", arrow)),
                    Span::styled(format!("{:7}", method.as_str()), Style::default().fg(method_color(method)).bold()),
                    Span::raw(path.clone()),
                    Span::styled(format!("  {}", name), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!(" [{}]", status), Style::default().fg(endpoint_status_color(status))),
                ];
                if *loading {
                    spans.push(Span::styled(" [...]", Style::default().fg(Color::Yellow)));
                }
                ListItem::new(Line::from(spans))
            }
        })
        .collect();

    let highlight_style = if is_focused {
        Style::default().bg(Color::DarkGray).bold()
    } else {
        Style::default().bold()
    };

    let list = List::new(items).block(block).highlight_style(highlight_style);
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_row));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_detail(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(endpoint) = &state.selected else {
        let hint = if state.rows.is_empty() {
            ""
        } else {
            "Select an endpoint and press Enter to expand it."
        };
        let block = Block::default().borders(Borders::ALL).title(" Endpoint ");
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)).block(block),
            area,
        );
        return;
    };

    if !endpoint.expanded {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);
        draw_endpoint_info(f, endpoint, chunks[0]);
        let hint = Paragraph::new(" Press Enter to expand, s to execute.")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, chunks[1]);
        return;
    }

    let params_height = endpoint.params.len().max(1) as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),             // Info
            Constraint::Length(params_height), // Parameters
            Constraint::Length(3),             // Request URL
            Constraint::Min(5),                // Response
        ])
        .split(area);

    draw_endpoint_info(f, endpoint, chunks[0]);
    draw_params(f, state, endpoint, chunks[1]);
    draw_url(f, endpoint, chunks[2]);
    draw_response(f, state, endpoint, chunks[3]);
}

fn draw_endpoint_info(f: &mut Frame, endpoint: &EndpointView, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", endpoint.method.as_str()),
                Style::default().fg(method_color(&endpoint.method)).bold(),
            ),
            Span::raw(endpoint.path.clone()),
        ]),
        Line::from(Span::styled(endpoint.desc.clone(), Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(endpoint.status.clone(), Style::default().fg(endpoint_status_color(&endpoint.status))),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", endpoint.name));
    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

fn draw_params(f: &mut Frame, state: &RenderState, endpoint: &EndpointView, area: Rect) {
    let is_focused = state.active_panel == Panel::Params;
    let editing = is_focused && state.input_mode == InputMode::Editing;

    let hint = endpoint
        .params
        .get(state.selected_param)
        .map(|p| format!(" {} ", p.description))
        .unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(is_focused, editing))
        .title(" Parameters ")
        .title_bottom(Line::from(hint).right_aligned());

    if endpoint.params.is_empty() {
        let none = Paragraph::new("No parameters required.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(none, area);
        return;
    }

    let label_width = endpoint.params.iter().map(|p| p.name.chars().count()).max().unwrap_or(0);
    let lines: Vec<Line> = endpoint
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let selected = is_focused && i == state.selected_param;
            let marker = if selected { ">" } else { " " };
            let name_style = if selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().bold()
            };
            Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:width$}", p.name, width = label_width), name_style),
                Span::styled(format!(" {:7}", p.param_type), Style::default().fg(Color::DarkGray)),
                Span::raw(": "),
                Span::raw(p.value.clone()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);

    if editing {
        if let Some(param) = endpoint.params.get(state.selected_param) {
            let cursor = state.cursor_position.min(param.value.len());
            let typed = param.value.get(..cursor).map(|s| s.chars().count()).unwrap_or(0);
            // marker + label + " " + type + ": "
            let offset = 1 + label_width + 8 + 2 + typed;
            let max_x = area.x + area.width.saturating_sub(2);
            let cursor_x = (area.x + 1 + offset as u16).min(max_x);
            let cursor_y = area.y + 1 + state.selected_param as u16;
            f.set_cursor_position(Position::new(cursor_x, cursor_y));
        }
    }
}

fn draw_url(f: &mut Frame, endpoint: &EndpointView, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Request URL (y:copy) ");
    let url = Paragraph::new(Span::styled(endpoint.url.clone(), Style::default().fg(Color::Cyan)))
        .block(block);
    f.render_widget(url, area);
}

fn media_lines(icon: &str, blob: &MediaBlob) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(format!("{} {} ({} bytes)", icon, blob.mime, blob.size))];
    match &blob.path {
        Some(path) => lines.push(Line::from(Span::styled(
            format!("Saved to {}", path.display()),
            Style::default().fg(Color::Cyan),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Body could not be saved",
            Style::default().fg(Color::Red),
        ))),
    }
    lines
}

fn draw_response(f: &mut Frame, state: &RenderState, endpoint: &EndpointView, area: Rect) {
    let is_focused = state.active_panel == Panel::Response;

    let Some(panel) = &endpoint.response else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(focus_style(is_focused, false))
            .title(" Response ");
        let hint = Paragraph::new("Press s to execute.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    };

    let status_style = match panel {
        ResponsePanel::Loading => Style::default().fg(Color::Yellow),
        ResponsePanel::Success { status, .. } => Style::default().fg(status_color(*status)).bold(),
        ResponsePanel::Failed { .. } => Style::default().fg(Color::Red).bold(),
    };

    let mut bottom = panel.time_label();
    if let ResponsePanel::Success { received_at, content, .. } = panel {
        bottom = format!("{} | {} @ {}", bottom, content.kind().as_str(), received_at.format("%H:%M:%S"));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(is_focused, false))
        .title(Span::styled(format!(" {} ", panel.status_label()), status_style))
        .title_bottom(Line::from(format!(" {} ", bottom)).right_aligned());

    let lines: Vec<Line> = match panel {
        ResponsePanel::Loading => vec![Line::from("Loading...")],
        ResponsePanel::Failed { message } => vec![
            Line::from(Span::styled("Error Occurred", Style::default().fg(Color::Red).bold())),
            Line::from(message.clone()),
        ],
        ResponsePanel::Success { content, .. } => match content {
            ResponseContent::Json(text) => highlight_json(text),
            ResponseContent::Text(text) | ResponseContent::Binary(text) => {
                text.lines().map(|l| Line::from(l.to_string())).collect()
            }
            ResponseContent::Image(blob) => media_lines("🖼", blob),
            ResponseContent::Audio(blob) => media_lines("🔊", blob),
            ResponseContent::Video(blob) => media_lines("🎬", blob),
        },
    };

    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.response_scroll, 0));
    f.render_widget(response, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = match state.input_mode {
        InputMode::Editing => " Esc/Enter:stop editing | ←/→:move | Tab/↑/↓:next field ",
        InputMode::Search => " Type to filter | Enter/Esc:done | Ctrl+U:clear ",
        InputMode::Normal => " Tab:panel | Enter:expand/edit | s:execute | x:clear | y/Y:copy | /:search | ?:help | q:quit ",
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_toast(f: &mut Frame, toast: &apidock::Toast, area: Rect) {
    let width = toast_width(&toast.message, area.width);
    let toast_area = Rect::new(
        area.x.saturating_add(area.width.saturating_sub(width.saturating_add(1))),
        area.y.saturating_add(1),
        width,
        3,
    )
        .intersection(area);
    let color = toast_color(toast.kind);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Black));
    let text = Paragraph::new(Span::styled(toast.message.clone(), Style::default().fg(color)))
        .block(block);

    f.render_widget(Clear, toast_area);
    f.render_widget(text, toast_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 NAVIGATION
   Tab / Shift+Tab    Switch panes (catalog, parameters, response)
   ↑ / ↓ / j / k      Move selection, parameter or scroll
   Enter / Space      Expand or collapse (catalog), edit (parameters)

 ENDPOINT
   s / F5             Execute request
   x                  Clear form and response
   y                  Copy request URL
   Y                  Copy response

 SEARCH
   /                  Start searching
   Ctrl+U             Clear search

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} v{} - Keyboard Shortcuts ", APP_NAME, APP_VERSION))
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
