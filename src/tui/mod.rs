// SPDX-FileCopyrightText: 2026 Patchdeck Authors
// SPDX-License-Identifier: MIT

//! Terminal UI.
//!
//! Single-threaded render loop over three panels: input ports and output
//! ports side by side, active connections below, one status line at the
//! bottom. Every keystroke is handled to completion — including any backend
//! call and the full re-query that follows a successful action — before the
//! next one is read, so connect/disconnect requests never interleave.

use std::error::Error;
use std::io;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::backend::{default_backends, BackendError, PortBackend};
use crate::model::{Backend, Connection, ConnectionRegistry, Direction as PortDirection, Port};

mod panel;
pub(crate) mod theme;

pub use panel::{Move, PanelEntry, PanelModel};
use theme::Theme;

/// Which panel receives navigation keystrokes. Cycled by TAB in fixed
/// order, wrapping back to the input panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Inputs,
    Outputs,
    Connections,
}

impl Focus {
    pub fn cycle(self) -> Self {
        match self {
            Self::Inputs => Self::Outputs,
            Self::Outputs => Self::Connections,
            Self::Connections => Self::Inputs,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Inputs => "inputs",
            Self::Outputs => "outputs",
            Self::Connections => "connections",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendHealth {
    Ok,
    Unavailable,
}

#[derive(Debug, Clone, Default)]
struct BackendSnapshot {
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    connections: Vec<Connection>,
}

/// Runs the interactive patchbay until the user quits.
pub fn run() -> Result<(), Box<dyn Error>> {
    let theme = Theme::from_env()?;
    let (alsa, jack) = default_backends();
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(alsa, jack);
    app.refresh();

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app, &theme))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
            _ => {}
        }
    }

    Ok(())
}

struct App {
    alsa: Box<dyn PortBackend>,
    jack: Box<dyn PortBackend>,
    inputs: PanelModel<Port>,
    outputs: PanelModel<Port>,
    connections: PanelModel<Connection>,
    registry: ConnectionRegistry,
    focus: Focus,
    // The two halves of a connect/disconnect pair survive focus changes:
    // the user picks an input, tabs away, picks an output, and presses `c`
    // from wherever focus happens to be.
    last_input_selection: Option<Port>,
    last_output_selection: Option<Port>,
    alsa_health: BackendHealth,
    jack_health: BackendHealth,
    status: String,
    should_quit: bool,
}

impl App {
    fn new(alsa: Box<dyn PortBackend>, jack: Box<dyn PortBackend>) -> Self {
        Self {
            alsa,
            jack,
            inputs: PanelModel::new(),
            outputs: PanelModel::new(),
            connections: PanelModel::new(),
            registry: ConnectionRegistry::default(),
            focus: Focus::Inputs,
            last_input_selection: None,
            last_output_selection: None,
            alsa_health: BackendHealth::Ok,
            jack_health: BackendHealth::Ok,
            status: "Welcome to patchdeck.".to_owned(),
            should_quit: false,
        }
    }

    fn backend_for(&self, tag: Backend) -> &dyn PortBackend {
        match tag {
            Backend::Alsa => self.alsa.as_ref(),
            Backend::Jack => self.jack.as_ref(),
        }
    }

    /// Re-queries both backends and rebuilds all three panels and the
    /// registry from scratch. A backend whose query fails (either list)
    /// contributes nothing for this cycle and is flagged unavailable; its
    /// possibly-partial data is never mixed in.
    fn refresh(&mut self) {
        let alsa_result = query_backend(self.alsa.as_ref());
        let jack_result = query_backend(self.jack.as_ref());

        let mut failures = Vec::new();
        let alsa_snapshot = match alsa_result {
            Ok(snapshot) => {
                self.alsa_health = BackendHealth::Ok;
                snapshot
            }
            Err(err) => {
                self.alsa_health = BackendHealth::Unavailable;
                failures.push(format!("{} ({err})", Backend::Alsa));
                BackendSnapshot::default()
            }
        };
        let jack_snapshot = match jack_result {
            Ok(snapshot) => {
                self.jack_health = BackendHealth::Ok;
                snapshot
            }
            Err(err) => {
                self.jack_health = BackendHealth::Unavailable;
                failures.push(format!("{} ({err})", Backend::Jack));
                BackendSnapshot::default()
            }
        };

        if !failures.is_empty() {
            self.status = format!("Query failed: {}", failures.join("; "));
        }

        let mut input_rows = alsa_snapshot.inputs;
        input_rows.extend(jack_snapshot.inputs);
        let mut output_rows = alsa_snapshot.outputs;
        output_rows.extend(jack_snapshot.outputs);

        self.registry =
            ConnectionRegistry::merge(&alsa_snapshot.connections, &jack_snapshot.connections);
        self.inputs.replace_rows(input_rows);
        self.outputs.replace_rows(output_rows);
        self.connections.replace_rows(self.registry.connections().to_vec());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => self.focus = self.focus.cycle(),
            KeyCode::Up => self.navigate(Move::Up),
            KeyCode::Down => self.navigate(Move::Down),
            KeyCode::Char('c') => self.connect_selected(),
            KeyCode::Char('d') => self.disconnect_selected(),
            KeyCode::Char('r') => {
                self.status = "Views refreshed.".to_owned();
                self.refresh();
            }
            _ => {}
        }
        false
    }

    fn navigate(&mut self, direction: Move) {
        match self.focus {
            Focus::Inputs => {
                self.inputs.navigate(direction);
                self.last_input_selection = self.inputs.current().cloned();
            }
            Focus::Outputs => {
                self.outputs.navigate(direction);
                self.last_output_selection = self.outputs.current().cloned();
            }
            Focus::Connections => self.connections.navigate(direction),
        }
    }

    fn connect_selected(&mut self) {
        let (Some(input), Some(output)) =
            (self.last_input_selection.clone(), self.last_output_selection.clone())
        else {
            self.status = "Select an input and an output port first.".to_owned();
            return;
        };
        if input.backend != output.backend {
            self.status = "Cannot connect ports of different types.".to_owned();
            return;
        }

        match self.backend_for(input.backend).connect(&input.id, &output.id) {
            Ok(()) => {
                self.status = format!("Connected ({}).", input.backend);
                self.refresh();
            }
            Err(err) => {
                self.status = format!("{} connect error: {err}", input.backend);
            }
        }
    }

    fn disconnect_selected(&mut self) {
        if self.focus == Focus::Connections {
            let Some(conn) = self.connections.current().cloned() else {
                self.status = "No active connections to disconnect.".to_owned();
                return;
            };
            self.disconnect_connection(&conn);
            return;
        }

        let (Some(input), Some(output)) =
            (self.last_input_selection.clone(), self.last_output_selection.clone())
        else {
            self.status = "Select an input and an output port first.".to_owned();
            return;
        };
        if input.backend != output.backend {
            self.status = "Cannot disconnect ports of different types.".to_owned();
            return;
        }
        // Only tear down a wire the registry actually holds; the backend is
        // never called speculatively for a pair that is not connected.
        let Some(conn) = self.registry.find(input.backend, &input.id, &output.id).cloned() else {
            self.status = "Selected ports are not connected.".to_owned();
            return;
        };
        self.disconnect_connection(&conn);
    }

    fn disconnect_connection(&mut self, conn: &Connection) {
        match self.backend_for(conn.backend).disconnect(&conn.from_id, &conn.to_id) {
            Ok(()) => {
                self.status = format!("Disconnected ({}).", conn.backend);
                self.refresh();
            }
            Err(err) => {
                self.status = format!("{} disconnect error: {err}", conn.backend);
            }
        }
    }

    fn unavailable_backends(&self) -> Vec<Backend> {
        let mut tags = Vec::new();
        if self.alsa_health == BackendHealth::Unavailable {
            tags.push(Backend::Alsa);
        }
        if self.jack_health == BackendHealth::Unavailable {
            tags.push(Backend::Jack);
        }
        tags
    }
}

fn query_backend(backend: &dyn PortBackend) -> Result<BackendSnapshot, BackendError> {
    let inputs = backend.ports(PortDirection::Input)?;
    let outputs = backend.ports(PortDirection::Output)?;
    let connections = backend.connections()?;
    Ok(BackendSnapshot { inputs, outputs, connections })
}

fn draw(frame: &mut Frame<'_>, app: &mut App, theme: &Theme) {
    let area = frame.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(connections_panel_height(area.height)),
            Constraint::Length(1),
        ])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let unavailable = app.unavailable_backends();

    render_ports_panel(
        frame,
        columns[0],
        "Input Ports",
        &mut app.inputs,
        app.focus == Focus::Inputs,
        &unavailable,
        theme,
    );
    render_ports_panel(
        frame,
        columns[1],
        "Output Ports",
        &mut app.outputs,
        app.focus == Focus::Outputs,
        &unavailable,
        theme,
    );
    render_connections_panel(
        frame,
        rows[1],
        &mut app.connections,
        app.focus == Focus::Connections,
        &unavailable,
        theme,
    );

    let footer = Paragraph::new(footer_line(app.focus, &app.status, theme));
    frame.render_widget(footer, rows[2]);
}

/// Bottom panel height including borders: 8 content lines on a roomy
/// terminal, else roughly a third of the screen with a floor of 3.
fn connections_panel_height(total: u16) -> u16 {
    if total >= 18 {
        10
    } else {
        (total / 3).max(3)
    }
}

fn render_ports_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    name: &str,
    panel: &mut PanelModel<Port>,
    focused: bool,
    unavailable: &[Backend],
    theme: &Theme,
) {
    panel.set_viewport(area.height.saturating_sub(2) as usize);

    let selected = panel.selected_index();
    let lines: Vec<Line<'static>> = panel
        .visible()
        .map(|(index, port)| {
            let style = theme.row_style(port.backend, index == selected, focused);
            Line::from(Span::styled(port.display(), style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title(name, unavailable, theme))
        .border_style(theme.panel_border_style(focused));
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_connections_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    panel: &mut PanelModel<Connection>,
    focused: bool,
    unavailable: &[Backend],
    theme: &Theme,
) {
    panel.set_viewport(area.height.saturating_sub(2) as usize);

    let selected = panel.selected_index();
    let lines: Vec<Line<'static>> = if panel.is_empty() {
        vec![Line::raw("No active connections.")]
    } else {
        panel
            .visible()
            .map(|(index, conn)| {
                let style = theme.row_style(conn.backend, index == selected, focused);
                Line::from(Span::styled(conn.to_string(), style))
            })
            .collect()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(panel_title("Active Connections", unavailable, theme))
        .border_style(theme.panel_border_style(focused));
    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn panel_title(name: &str, unavailable: &[Backend], theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::raw(name.to_owned())];
    if !unavailable.is_empty() {
        let tags: Vec<String> = unavailable.iter().map(ToString::to_string).collect();
        spans.push(Span::styled(
            format!(" ({} unavailable)", tags.join(", ")),
            theme.unavailable_style(),
        ));
    }
    Line::from(spans)
}

fn footer_line(focus: Focus, status: &str, theme: &Theme) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("[{}] ", focus.label()), theme.status_label_style()),
        Span::raw(status.to_owned()),
        Span::raw(" "),
    ];
    for (key, label) in [
        ("TAB", "focus"),
        ("↑/↓", "move"),
        ("c", "connect"),
        ("d", "disconnect"),
        ("r", "refresh"),
        ("q", "quit"),
    ] {
        spans.push(Span::styled(format!(" {key}"), theme.status_key_style()));
        spans.push(Span::styled(format!(":{label}"), theme.status_label_style()));
    }
    Line::from(spans)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
