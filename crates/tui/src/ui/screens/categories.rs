use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::AppState;
use crate::ui::Theme;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let categories = &state.categories;

    let mut title = format!("Categorie ({})", categories.items.len());
    if let Some(error) = &categories.error {
        title = format!("{title} — {error}");
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(title);

    if categories.items.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Nessuna categoria: premi 'n' per crearne una.",
                Style::default().fg(theme.dim),
            )))
            .block(block),
            area,
        );
        return;
    }

    let items = categories
        .items
        .iter()
        .map(|category| ListItem::new(Line::from(category.name.clone())))
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(categories.selected.min(categories.items.len() - 1)));

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(theme.text))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(list, area, &mut list_state);
}
