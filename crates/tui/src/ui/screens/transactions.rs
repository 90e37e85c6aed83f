use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::AppState;
use crate::ui::Theme;
use crate::view::{SortDirection, SortKey, SortState};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    render_header(frame, layout[0], state, theme);
    render_list(frame, layout[1], state, theme);
}

fn arrow(sort: SortState, key: SortKey) -> &'static str {
    if sort.key != key {
        return "";
    }
    match sort.direction {
        SortDirection::Ascending => "↑",
        SortDirection::Descending => "↓",
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let transactions = &state.transactions;
    let filters = &transactions.filters;

    let mut line = Vec::new();
    if filters.is_empty() {
        line.push(Span::styled("Nessun filtro", Style::default().fg(theme.dim)));
    } else {
        line.push(Span::styled("Filtri", Style::default().fg(theme.dim)));
        line.push(Span::raw(": "));
        if !filters.text.is_empty() {
            line.push(Span::raw(format!("\"{}\"  ", filters.text)));
        }
        if let Some(id) = &filters.category_id {
            let name = transactions
                .categories
                .iter()
                .find(|category| &category.id == id)
                .map(|category| category.name.as_str())
                .unwrap_or("?");
            line.push(Span::raw(format!("categoria: {name}  ")));
        }
        if let Some(id) = &filters.budget_item_id {
            let name = transactions
                .budget_items
                .iter()
                .find(|item| &item.id == id)
                .map(|item| item.name.as_str())
                .unwrap_or("?");
            line.push(Span::raw(format!("voce: {name}  ")));
        }
    }
    if let Some(error) = &transactions.error {
        line.push(Span::raw("   "));
        line.push(Span::styled(error.as_str(), Style::default().fg(theme.error)));
    }

    let sort = transactions.sort;
    let columns = Line::from(Span::styled(
        format!(
            "{:<12} {:<28} {:<16} {:<16} {:>10}",
            format!("Data{}", arrow(sort, SortKey::Date)),
            format!("Descrizione{}", arrow(sort, SortKey::Description)),
            format!("Voce{}", arrow(sort, SortKey::BudgetItem)),
            format!("Categoria{}", arrow(sort, SortKey::Category)),
            format!("Importo{}", arrow(sort, SortKey::Amount)),
        ),
        Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::BOLD),
    ));

    frame.render_widget(
        Paragraph::new(vec![Line::from(line), columns]),
        area,
    );
}

fn render_list(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let rows = state.transactions.visible();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(format!("Transazioni ({})", rows.len()));

    if rows.is_empty() {
        let message = if state.transactions.filters.is_empty() {
            "Nessuna transazione per questo mese."
        } else {
            "Nessuna transazione corrisponde ai filtri."
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(theme.dim),
            )))
            .block(block),
            area,
        );
        return;
    }

    let items = rows
        .iter()
        .map(|row| {
            let tx = &row.transaction;
            let text = format!(
                "{:<12} {:<28} {:<16} {:<16} {:>10.2}",
                tx.date.format("%Y-%m-%d"),
                truncate(&tx.description, 28),
                truncate(&row.budget_item_name, 16),
                truncate(&row.category_name, 16),
                tx.amount,
            );
            ListItem::new(Line::from(text))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(Some(state.transactions.selected.min(rows.len() - 1)));

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

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let kept: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
