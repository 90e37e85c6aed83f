use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::AppState;
use crate::ui::Theme;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, theme);
    render_items(frame, layout[1], state, theme);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut line = Vec::new();
    match &state.budget.budget {
        Some(budget) => {
            let planned: f64 = budget.budget_items.iter().map(|item| item.amount).sum();
            let spent: f64 = budget.budget_items.iter().map(|item| item.spent).sum();
            line.push(Span::styled("Pianificato", Style::default().fg(theme.dim)));
            line.push(Span::raw(format!(": {planned:.2}  ")));
            line.push(Span::styled("Speso", Style::default().fg(theme.dim)));
            line.push(Span::raw(format!(": {spent:.2}  ")));
            line.push(Span::styled("Residuo", Style::default().fg(theme.dim)));
            let remaining = planned - spent;
            let style = if remaining < 0.0 {
                Style::default().fg(theme.error)
            } else {
                Style::default().fg(theme.positive)
            };
            line.push(Span::styled(format!(": {remaining:.2}"), style));
        }
        None => {
            line.push(Span::styled(
                "Nessun budget per questo mese: 'm' lo crea, 'p' copia il mese precedente.",
                Style::default().fg(theme.dim),
            ));
        }
    }
    if let Some(error) = &state.budget.error {
        line.push(Span::raw("   "));
        line.push(Span::styled(error.as_str(), Style::default().fg(theme.error)));
    }

    frame.render_widget(Paragraph::new(Line::from(line)), area);
}

fn render_items(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let items = state
        .budget
        .budget
        .as_ref()
        .map(|budget| budget.budget_items.as_slice())
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(format!("Voci di budget ({})", items.len()));

    if items.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Nessuna voce: premi 'n' per aggiungerne una.",
                Style::default().fg(theme.dim),
            )))
            .block(block),
            area,
        );
        return;
    }

    let rows = items
        .iter()
        .map(|item| {
            let remaining = item.amount - item.spent;
            let text = format!(
                "{:<24} {:>10.2} {:>10.2} {:>10.2}",
                item.name, item.amount, item.spent, remaining,
            );
            ListItem::new(Line::from(text))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.budget.selected.min(items.len() - 1)));

    let list = List::new(rows)
        .block(block)
        .style(Style::default().fg(theme.text))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, area, &mut list_state);
}
