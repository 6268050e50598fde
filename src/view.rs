use crate::model::Note;
use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::prelude::{Alignment, Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph, Wrap};

/// Everything the list renderer needs from the notebook and the TUI.
pub struct ListView<'a> {
    pub notes: &'a [&'a Note],
    pub selected_id: Option<&'a str>,
    pub cursor: Option<usize>,
    pub offset: usize,
    pub empty_state: &'a str,
}

/// Draws the notes in the given order, or the empty state. Returns the
/// scroll offset to keep for the next frame.
pub fn draw_notes_list(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    view: &ListView<'_>,
    block: Block<'_>,
) -> usize {
    if view.notes.is_empty() {
        let lines = vec![
            Line::from(Span::styled(
                "Nothing here",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                view.empty_state.to_string(),
                Style::default().fg(Color::Gray),
            )),
        ];
        let empty = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(empty, area);
        return 0;
    }

    let inner_width = area.width.saturating_sub(4);
    let items = view
        .notes
        .iter()
        .map(|note| note_item(note, inner_width, view.selected_id == Some(note.id.as_str())))
        .collect::<Vec<_>>();

    let mut state = ListState::default();
    let viewport = (area.height.saturating_sub(2) / ITEM_HEIGHT) as usize;
    let cursor = view.cursor.map(|c| c.min(view.notes.len() - 1));
    let offset = adjust_offset(
        cursor.unwrap_or(0),
        view.offset,
        viewport,
        1,
        view.notes.len(),
    );
    *state.offset_mut() = offset;
    state.select(cursor);

    let list = List::new(items)
        .block(block)
        .highlight_symbol("› ")
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_stateful_widget(list, area, &mut state);
    offset
}

const ITEM_HEIGHT: u16 = 3;

/// One note: title and last-updated time, a body preview, and a spacer.
pub fn note_item(note: &Note, width: u16, selected: bool) -> ListItem<'static> {
    let width = width.max(10) as usize;
    let updated = note.updated_at.as_ref().map(format_timestamp);
    let date_len = updated.as_ref().map(|d| d.chars().count() + 1).unwrap_or(0);
    let title = truncate_text(&note.title, width.saturating_sub(date_len));
    let pad = width
        .saturating_sub(title.chars().count())
        .saturating_sub(date_len);

    let mut title_spans = vec![Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(updated) = updated {
        title_spans.push(Span::raw(" ".repeat(pad + 1)));
        title_spans.push(Span::styled(updated, Style::default().fg(Color::DarkGray)));
    }

    let preview = note.body.lines().next().unwrap_or_default();
    let lines = vec![
        Line::from(title_spans),
        Line::from(Span::styled(
            truncate_text(preview, width),
            Style::default().fg(Color::Gray),
        )),
        Line::raw(""),
    ];

    let mut item = ListItem::new(lines);
    if selected {
        item = item.style(Style::default().bg(Color::Rgb(60, 52, 24)).fg(Color::White));
    }
    item
}

/// Last-updated time in the local zone.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

pub fn adjust_offset(
    selected: usize,
    current_offset: usize,
    viewport: usize,
    scrolloff: usize,
    len: usize,
) -> usize {
    if viewport == 0 || len == 0 {
        return 0;
    }
    let max_offset = len.saturating_sub(viewport);
    let margin = scrolloff.min(viewport.saturating_sub(1));
    let mut offset = current_offset.min(max_offset);
    if selected < offset.saturating_add(margin) {
        offset = selected.saturating_sub(margin);
    } else {
        let upper = offset
            .saturating_add(viewport.saturating_sub(1))
            .saturating_sub(margin);
        if selected > upper {
            offset = selected.saturating_add(margin + 1).saturating_sub(viewport);
        }
    }
    offset.min(max_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::widgets::Borders;
    use ratatui::Terminal;

    fn render(view: &ListView<'_>, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                draw_notes_list(f, area, view, Block::default().borders(Borders::ALL));
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn note(id: &str, title: &str, body: &str) -> Note {
        Note::new(id.into(), title.into(), body.into())
    }

    #[test]
    fn empty_list_shows_the_given_message() {
        let view = ListView {
            notes: &[],
            selected_id: None,
            cursor: None,
            offset: 0,
            empty_state: "No notes match your search.",
        };
        let screen = render(&view, 40, 6).join("\n");
        assert!(screen.contains("Nothing here"));
        assert!(screen.contains("No notes match your search."));
    }

    #[test]
    fn items_render_in_order_with_preview() {
        let a = note("a", "Grocery list", "milk\neggs");
        let b = note("b", "Todo", "call mom");
        let notes = vec![&a, &b];
        let view = ListView {
            notes: &notes,
            selected_id: Some("b"),
            cursor: Some(0),
            offset: 0,
            empty_state: "",
        };
        let rows = render(&view, 60, 10);
        let grocery = rows.iter().position(|r| r.contains("Grocery list")).unwrap();
        let todo = rows.iter().position(|r| r.contains("Todo")).unwrap();
        assert!(grocery < todo);
        assert!(rows[grocery + 1].contains("milk"));
        assert!(!rows.iter().any(|r| r.contains("eggs")));
        assert!(rows[grocery].contains(&format_timestamp(&a.created_at)));
    }

    #[test]
    fn missing_timestamp_is_omitted() {
        let mut a = note("a", "Undated", "body");
        a.updated_at = None;
        let notes = vec![&a];
        let view = ListView {
            notes: &notes,
            selected_id: None,
            cursor: None,
            offset: 0,
            empty_state: "",
        };
        let rows = render(&view, 40, 6);
        let title_row = rows.iter().find(|r| r.contains("Undated")).unwrap();
        assert!(!title_row.contains(':'));
    }

    #[test]
    fn truncate_text_respects_width() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a longer title", 8), "a lon...");
        assert_eq!(truncate_text("abcdef", 2), "ab");
    }

    #[test]
    fn offset_follows_the_cursor() {
        assert_eq!(adjust_offset(0, 0, 3, 1, 10), 0);
        assert_eq!(adjust_offset(5, 0, 3, 1, 10), 4);
        assert_eq!(adjust_offset(9, 4, 3, 1, 10), 7);
        assert_eq!(adjust_offset(2, 0, 0, 1, 10), 0);
    }
}
