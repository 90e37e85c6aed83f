pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{AppState, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

const SECTIONS: [Section; 3] = [Section::Transactions, Section::Categories, Section::Budget];

pub fn render(frame: &mut Frame<'_>, state: &AppState, theme: &Theme) {
    let area = frame.area();

    let mut constraints = vec![
        Constraint::Length(1), // Info bar
        Constraint::Length(2), // Tab bar (label + underline)
        Constraint::Min(0),    // Main content
        Constraint::Length(1), // Input line
    ];
    if state.sidebar {
        constraints.push(Constraint::Length(1)); // Hint bar
    }
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_info_bar(frame, layout[0], state, theme);
    render_tabs(frame, layout[1], state.section, theme);

    match state.section {
        Section::Transactions => screens::transactions::render(frame, layout[2], state, theme),
        Section::Categories => screens::categories::render(frame, layout[2], state, theme),
        Section::Budget => screens::budget::render(frame, layout[2], state, theme),
    }

    render_input_line(frame, layout[3], state, theme);
    if state.sidebar {
        render_hint_bar(frame, layout[4], state, theme);
    }
    render_notice(frame, area, state, theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state
        .user
        .as_ref()
        .map(|user| user.username.as_str())
        .unwrap_or("-");

    let line = Line::from(vec![
        Span::styled("Utente", Style::default().fg(theme.dim)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Mese", Style::default().fg(theme.dim)),
        Span::raw(format!(
            ": {:02}/{}  ",
            state.period.month, state.period.year
        )),
        Span::styled("[", Style::default().fg(theme.accent)),
        Span::raw("/"),
        Span::styled("]", Style::default().fg(theme.accent)),
        Span::styled(" cambia mese", Style::default().fg(theme.dim)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_tabs(frame: &mut Frame<'_>, area: Rect, active: Section, theme: &Theme) {
    let mut parts: Vec<Span<'_>> = Vec::new();
    for (index, section) in SECTIONS.iter().enumerate() {
        if index > 0 {
            parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        }
        let style = if *section == active {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        parts.push(Span::styled(section.label(), style));
    }

    let block = Block::default().borders(Borders::BOTTOM).border_style(
        Style::default().fg(theme.border),
    );
    frame.render_widget(Paragraph::new(Line::from(parts)).block(block), area);
}

fn render_input_line(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(input) = &state.input else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(input.purpose.prompt(), Style::default().fg(theme.dim)),
        Span::raw(": "),
        Span::styled(input.buffer.as_str(), Style::default().fg(theme.text)),
        Span::styled("█", Style::default().fg(theme.accent)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_hint_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let hints = match state.section {
        Section::Transactions => {
            "1-5 ordina  / filtra  f categoria  i voce  x azzera  n nuova  r aggiorna  q esci"
        }
        Section::Categories => "n nuova  e rinomina  d elimina  r aggiorna  q esci",
        Section::Budget => {
            "n voce  e importo  d elimina  m crea budget  p copia mese prec.  q esci"
        }
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(theme.dim),
        ))),
        area,
    );
}

/// Blocking notice for failed destructive operations; any key dismisses.
fn render_notice(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(notice) = &state.notice else {
        return;
    };

    let width = (notice.len() as u16 + 6).min(area.width.saturating_sub(4));
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height / 2,
        width,
        height: 4.min(area.height),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error))
        .title("Errore");
    let content = Paragraph::new(vec![
        Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            "premi un tasto per continuare",
            Style::default().fg(theme.dim),
        )),
    ])
    .block(block);

    frame.render_widget(Clear, popup);
    frame.render_widget(content, popup);
}
