use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use textwrap::wrap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::field::ValueBinding;
use crate::runtime::FormField;

pub struct UiContext<'a> {
    pub title: Option<&'a str>,
    pub fields: &'a [FormField],
    pub focus: usize,
    pub status_message: &'a str,
    pub dirty: bool,
    pub error_count: usize,
    pub help: Option<&'a str>,
}

pub fn draw(frame: &mut Frame<'_>, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], ctx.title);
    render_body(frame, chunks[1], &ctx);
    render_footer(frame, chunks[2], &ctx);
}

fn render_header(frame: &mut Frame<'_>, area: Rect, title: Option<&str>) {
    let text = title.unwrap_or("Form");
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().title("Form").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_body(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    if ctx.fields.is_empty() {
        let placeholder =
            Paragraph::new("No fields configured").block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    let content_width = area.width.saturating_sub(4);
    let items: Vec<ListItem<'static>> = ctx
        .fields
        .iter()
        .enumerate()
        .map(|(idx, entry)| ListItem::new(build_field_rows(entry, idx == ctx.focus, content_width)))
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(ctx.focus.min(ctx.fields.len().saturating_sub(1))));

    let list = List::new(items)
        .block(Block::default().title("Fields").borders(Borders::ALL))
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn build_field_rows(entry: &FormField, focused: bool, width: u16) -> Vec<Line<'static>> {
    let field = &entry.field;
    let mut lines = Vec::new();

    let label_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let mut label = entry.label.clone();
    if field.is_required() {
        label.push_str(" *");
    }
    let mut header = vec![Span::styled(label, label_style)];
    if field.is_disabled() {
        header.push(Span::styled(
            " (disabled)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(header));

    if let Some(description) = field.description() {
        for wrapped in wrap(description, width.max(8) as usize) {
            lines.push(Line::from(Span::styled(
                format!("  {wrapped}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(value_row(entry, width));

    if focused && !field.is_disabled() {
        let selected = field.selected_index();
        for (idx, option) in field.options().iter().enumerate() {
            let marker = if Some(idx) == selected { "●" } else { "○" };
            let style = if Some(idx) == selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(
                format!("    {marker} {}", truncate_display(&option.label, width)),
                style,
            )));
        }
    }

    if let Some(error) = &field.error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(Color::Red),
        )));
    }

    lines
}

fn value_row(entry: &FormField, width: u16) -> Line<'static> {
    let field = &entry.field;
    if field.options_pending() {
        return Line::from(Span::styled(
            "  loading options...",
            Style::default().fg(Color::DarkGray),
        ));
    }
    match field.selected_label().or_else(|| field.value()) {
        Some(text) => Line::from(Span::raw(format!("  {}", truncate_display(text, width)))),
        None => Line::from(Span::styled(
            format!("  {}", truncate_display(field.placeholder(), width)),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    }
}

fn truncate_display(text: &str, width: u16) -> String {
    let budget = width.max(8) as usize;
    if text.width() <= budget {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width + 1 > budget {
            break;
        }
        used += ch_width;
        out.push(ch);
    }
    out.push('…');
    out
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let mut status = ctx.status_message.to_string();
    if ctx.dirty {
        status.push_str(" • unsaved changes");
    }
    if ctx.error_count > 0 {
        status.push_str(&format!(" • {} error(s)", ctx.error_count));
    }
    if let Some(focused) = ctx.fields.get(ctx.focus) {
        status.push_str(" • focus: ");
        status.push_str(&focused.label);
    }
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }

    let status_widget = Paragraph::new(status)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status_widget, chunks[0]);

    let help_text = ctx.help.unwrap_or(" ");
    let help_widget = Paragraph::new(help_text.to_string())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Actions"));
    frame.render_widget(help_widget, chunks[1]);
}
