//! Terminal control panel for live sessions
//!
//! Shows the knob and slider positions, the bindings on each control and
//! their current values. It only renders state and turns key presses into
//! [`PanelCommand`]s; the run loop decides what they do.

mod strip;

pub use strip::ControlStrip;

use std::io::Stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::config::Theme;
use crate::controls::{ControlChannel, ControlInput, ControlKind};
use crate::session::Session;

/// Commands the panel can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    Quit,
    ToggleTheme,
    ClearAll,
}

/// Map a key press to a panel command
pub fn command_for_key(key: KeyEvent) -> Option<PanelCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(PanelCommand::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(PanelCommand::Quit),
        (KeyCode::Char('t'), _) => Some(PanelCommand::ToggleTheme),
        (KeyCode::Char('c'), _) => Some(PanelCommand::ClearAll),
        _ => None,
    }
}

/// Current readings of one kind of control, in index order
pub fn readings(input: &dyn ControlInput, kind: ControlKind) -> Vec<f64> {
    ControlChannel::all()
        .filter(|c| c.kind() == kind)
        .map(|c| input.read_channel(c.hardware_channel()))
        .collect()
}

fn palette(theme: Theme) -> (Style, Style) {
    match theme {
        Theme::Light => (
            Style::default().fg(Color::White),
            Style::default().fg(Color::Gray),
        ),
        Theme::Dark => (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::Cyan),
        ),
    }
}

/// Terminal panel. Restores the terminal when dropped.
pub struct Panel {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Panel {
    /// Switch the terminal to the panel screen
    pub fn open() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, session: &Session, input: &dyn ControlInput, ticks: u64) -> Result<()> {
        self.terminal.draw(|f| draw_ui(f, session, input, ticks))?;
        Ok(())
    }

    /// Wait up to `timeout` for a key press
    pub fn poll_command(&self, timeout: Duration) -> Result<Option<PanelCommand>> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                return Ok(command_for_key(key));
            }
        }
        Ok(None)
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}

fn draw_ui(f: &mut Frame, session: &Session, input: &dyn ControlInput, ticks: u64) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Knobs
            Constraint::Length(9), // Sliders
            Constraint::Min(3),    // Bindings
            Constraint::Length(3), // Status
        ])
        .split(area);

    let (frame_style, bar_style) = palette(session.theme());

    let knobs = readings(input, ControlKind::Knob);
    let strip = ControlStrip::new(&knobs)
        .style(bar_style)
        .block(Block::default().borders(Borders::ALL).border_style(frame_style).title(" Knobs "));
    f.render_widget(strip, chunks[0]);

    let sliders = readings(input, ControlKind::Slider);
    let strip = ControlStrip::new(&sliders)
        .style(bar_style)
        .block(Block::default().borders(Borders::ALL).border_style(frame_style).title(" Sliders "));
    f.render_widget(strip, chunks[1]);

    draw_bindings(f, chunks[2], session, frame_style);
    draw_status(f, chunks[3], session, ticks);
}

fn draw_bindings(f: &mut Frame, area: Rect, session: &Session, frame_style: Style) {
    let mut lines = Vec::new();
    for (channel, binding) in session.registry().iter() {
        let target = match (binding.target(), binding.field_path()) {
            (Some(object), Some(field)) => format!("{}.{}", object, field),
            (Some(object), None) => format!("{}.?", object),
            _ => "(unbound)".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<10}", channel.name()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:<32}", target)),
            Span::raw(format!("x{:<4} ", binding.scale())),
            Span::styled(format!("{:>10.3}", binding.value()), Style::default().fg(Color::Yellow)),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from("  No bindings"));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(frame_style)
            .title(" Bindings "),
    );
    f.render_widget(paragraph, area);
}

fn draw_status(f: &mut Frame, area: Rect, session: &Session, ticks: u64) {
    let mode = if session.is_live() { "LIVE" } else { "IDLE" };
    let mode_color = if session.is_live() { Color::Green } else { Color::Yellow };

    let text = Line::from(vec![
        Span::raw("  Mode: "),
        Span::styled(mode, Style::default().fg(mode_color)),
        Span::raw(format!("  |  Ticks: {}", ticks)),
        Span::raw("  |  "),
        Span::raw("t: theme  |  c: clear bindings  |  q: quit"),
    ]);

    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::ALL));

    f.render_widget(paragraph, area);
}
