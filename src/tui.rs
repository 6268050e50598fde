use crate::form::{FieldValue, FormField, FormMode, NoteForm};
use crate::notebook::Notebook;
use crate::storage::StoreLocation;
use crate::view::{draw_notes_list, ListView};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

pub fn run(notebook: Notebook, location: StoreLocation) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(notebook, location);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    notebook: Notebook,
    location: StoreLocation,
    form: NoteForm,
    search: FieldValue,
    focus: Focus,
    cursor: usize,
    list_offset: usize,
    status: String,
    mode: Mode,
}

enum Mode {
    Normal,
    ConfirmDelete { note_id: String, prompt: String },
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Focus {
    List,
    Search,
    Form,
}

impl App {
    fn new(notebook: Notebook, location: StoreLocation) -> Self {
        let status = format!(
            "Loaded {} note(s) from {}",
            notebook.notes().len(),
            notebook.location()
        );
        let mut app = App {
            notebook,
            location,
            form: NoteForm::new(),
            search: FieldValue::default(),
            focus: Focus::List,
            cursor: 0,
            list_offset: 0,
            status,
            mode: Mode::Normal,
        };
        app.sync();
        app
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Applies one key press. Returns true when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        let quit = match self.mode {
            Mode::ConfirmDelete { .. } => {
                self.handle_confirm_key(key);
                false
            }
            Mode::Normal => match self.focus {
                Focus::List => self.handle_list_key(key),
                Focus::Search => {
                    self.handle_search_key(key);
                    false
                }
                Focus::Form => {
                    self.handle_form_key(key);
                    false
                }
            },
        };
        self.sync();
        quit
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.notebook.filtered_notes().len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => match self.note_at_cursor() {
                Some(id) => {
                    self.notebook.select(&id);
                    self.focus = Focus::Form;
                    self.status = "Editing note (Ctrl+S save, Esc cancel)".into();
                }
                None => self.status = "No note to edit".into(),
            },
            KeyCode::Char('d') => match self.note_at_cursor() {
                Some(id) => {
                    let prompt = self.notebook.delete_prompt(&id);
                    self.status = prompt.clone();
                    self.mode = Mode::ConfirmDelete {
                        note_id: id,
                        prompt,
                    };
                }
                None => self.status = "No note to delete".into(),
            },
            KeyCode::Char('n') => self.new_note(),
            KeyCode::Char('/') => self.focus = Focus::Search,
            KeyCode::Tab | KeyCode::Char('i') => self.focus = Focus::Form,
            KeyCode::Esc => {
                if self.notebook.is_editing() {
                    self.notebook.cancel_edit();
                    self.status = "Switched to add mode".into();
                }
            }
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => self.focus = Focus::List,
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Backspace => {
                self.search.backspace();
                self.apply_query();
            }
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.search.insert_char(c);
                    self.apply_query();
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => match self.form.mode() {
                FormMode::Edit => {
                    self.notebook.cancel_edit();
                    self.status = "Canceled".into();
                }
                FormMode::Add => self.focus = Focus::List,
            },
            KeyCode::Tab => self.form.next_field(),
            KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Left => self.form.active_field_mut().move_left(),
            KeyCode::Right => self.form.active_field_mut().move_right(),
            KeyCode::Up => self.form.active_field_mut().move_up(),
            KeyCode::Down => self.form.active_field_mut().move_down(),
            KeyCode::Enter if control => self.submit_form(),
            KeyCode::Enter => match self.form.field {
                FormField::Title => self.form.next_field(),
                FormField::Body => self.form.active_field_mut().insert_char('\n'),
            },
            KeyCode::Backspace => self.form.active_field_mut().backspace(),
            KeyCode::Char('s') if control => self.submit_form(),
            KeyCode::Char('l') if control => {
                if self.form.mode() == FormMode::Add {
                    self.form.clear();
                    self.status = "Cleared".into();
                }
            }
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.form.active_field_mut().insert_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let note_id = match &self.mode {
            Mode::ConfirmDelete { note_id, .. } => note_id.clone(),
            Mode::Normal => return,
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.notebook.remove(&note_id);
                self.status = "Deleted note".into();
                self.mode = Mode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.status = "Delete canceled".into();
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let draft = match self.form.submit() {
            Some(draft) => draft,
            None => {
                self.status = "Title and body are required".into();
                return;
            }
        };
        match self.form.mode() {
            FormMode::Add => {
                self.notebook.create(&draft);
                self.status = format!("Added \"{}\"", draft.title.trim());
            }
            FormMode::Edit => {
                if self.notebook.update(&draft) {
                    self.status = "Saved changes".into();
                }
            }
        }
        self.focus_selected();
    }

    fn new_note(&mut self) {
        self.notebook.cancel_edit();
        self.focus = Focus::Form;
        self.status = "New note (Tab switch field, Ctrl+S add, Ctrl+L clear)".into();
    }

    fn apply_query(&mut self) {
        self.notebook.set_query(self.search.value.clone());
        self.cursor = 0;
        self.list_offset = 0;
    }

    fn note_at_cursor(&self) -> Option<String> {
        self.notebook
            .filtered_notes()
            .get(self.cursor)
            .map(|n| n.id.clone())
    }

    fn focus_selected(&mut self) {
        let selected = self.notebook.selected_id();
        if let Some(idx) = self
            .notebook
            .filtered_notes()
            .iter()
            .position(|n| Some(n.id.as_str()) == selected)
        {
            self.cursor = idx;
        }
    }

    /// Brings the form and the list cursor in line with the notebook.
    fn sync(&mut self) {
        self.form.sync(self.notebook.selected_note());
        let shown = self.notebook.filtered_notes().len();
        self.cursor = self.cursor.min(shown.saturating_sub(1));
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[1]);
        self.draw_form(f, main[0]);
        self.draw_list(f, main[1]);
        self.draw_footer(f, layout[2]);

        if let Mode::ConfirmDelete { prompt, .. } = &self.mode {
            draw_confirm(f, prompt);
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let (badge, badge_color) = if self.notebook.is_editing() {
            ("Editing", Color::LightYellow)
        } else {
            ("Add", Color::LightCyan)
        };
        let title = Line::from(vec![
            Span::styled(
                "jotter ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("Notes", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  •  "),
            Span::styled(
                "Create, edit, search, and keep notes locally",
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  •  "),
            Span::styled(
                self.location.scope_label(),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  •  "),
            Span::styled(
                badge,
                Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
            ),
        ]);

        let focused = self.focus == Focus::Search && matches!(self.mode, Mode::Normal);
        let query = if focused {
            self.search.with_caret()
        } else if self.search.value.is_empty() {
            "Search by title... (/)".to_string()
        } else {
            self.search.value.clone()
        };
        let search = Line::from(vec![
            Span::styled(
                "Search: ",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                query,
                Style::default().fg(if focused { Color::Cyan } else { Color::White }),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(vec![title, search])
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_form(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::Form;
        let editing = self.form.mode() == FormMode::Edit;
        let mut lines = Vec::new();
        lines.extend(field_lines(
            "Title",
            &self.form.title,
            focused && self.form.field == FormField::Title,
        ));
        if let Some(err) = self.form.title_error() {
            lines.push(error_line(err));
        }
        lines.push(Line::from(""));
        lines.extend(field_lines(
            "Body",
            &self.form.body,
            focused && self.form.field == FormField::Body,
        ));
        if let Some(err) = self.form.body_error() {
            lines.push(error_line(err));
        }
        lines.push(Line::from(""));

        let submit_style = if self.form.can_submit() {
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::styled("Ctrl+S ", Style::default().fg(Color::LightCyan)),
            Span::styled(if editing { "Save changes" } else { "Add note" }, submit_style),
            Span::raw("   "),
            Span::styled(
                if editing { "Esc " } else { "Ctrl+L " },
                Style::default().fg(Color::LightCyan),
            ),
            Span::raw(if editing { "Cancel" } else { "Clear" }),
        ]));

        let accent = if focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .title(Line::from(vec![
                Span::styled(
                    if editing { "Edit note " } else { "Add a note " },
                    Style::default()
                        .fg(if focused { Color::Cyan } else { Color::Gray })
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    if editing { "[Editing]" } else { "[Add]" },
                    Style::default().fg(if editing {
                        Color::LightYellow
                    } else {
                        Color::LightCyan
                    }),
                ),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn draw_list(&mut self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let focused = self.focus == Focus::List;
        let notes = self.notebook.filtered_notes();
        let title = Line::from(vec![
            Span::styled(
                "Your notes",
                Style::default()
                    .fg(if focused { Color::Cyan } else { Color::Gray })
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  Total: {}  Shown: {}",
                self.notebook.notes().len(),
                notes.len()
            )),
        ]);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        let view = ListView {
            notes: &notes,
            selected_id: self.notebook.selected_id(),
            cursor: focused.then_some(self.cursor),
            offset: self.list_offset,
            empty_state: self.notebook.empty_state(),
        };
        let offset = draw_notes_list(f, area, &view, block);
        self.list_offset = offset;
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(self.footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let status = Paragraph::new(self.status.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, bottom[0]);

        let saved = match self.notebook.last_save() {
            Some(at) => format!("saved {}", format_elapsed(at)),
            None => "not saved yet".to_string(),
        };
        let storage = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Saved locally at {}. No backend required.", self.notebook.location()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  "),
            Span::styled(saved, Style::default().fg(Color::Gray)),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(storage, bottom[1]);
    }

    fn footer_help_line(&self) -> Line<'static> {
        let key = |k: &'static str, color: Color| Span::styled(k, Style::default().fg(color));
        let spans = match self.focus {
            Focus::List => vec![
                key("↑↓ / j k", Color::LightCyan),
                Span::raw(" move  "),
                key("Enter/e", Color::LightYellow),
                Span::raw(" edit  "),
                key("n", Color::LightMagenta),
                Span::raw(" new  "),
                key("d", Color::LightRed),
                Span::raw(" delete  "),
                key("/", Color::LightCyan),
                Span::raw(" search  "),
                key("Tab", Color::LightCyan),
                Span::raw(" form  "),
                key("q", Color::LightRed),
                Span::raw(" quit"),
            ],
            Focus::Search => vec![
                Span::raw("type to filter by title  "),
                key("Enter/Esc", Color::LightCyan),
                Span::raw(" back to list"),
            ],
            Focus::Form => vec![
                key("Tab", Color::LightCyan),
                Span::raw(" switch field  "),
                key("Ctrl+S", Color::LightGreen),
                Span::raw(" save  "),
                key("Ctrl+L", Color::LightYellow),
                Span::raw(" clear  "),
                key("Esc", Color::LightRed),
                Span::raw(" cancel/back"),
            ],
        };
        Line::from(spans)
    }
}

fn draw_confirm(f: &mut ratatui::Frame<'_>, prompt: &str) {
    let area = centered_rect(50, 30, f.size());
    let body = vec![
        Line::from(Span::styled(
            prompt.to_string(),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press y to confirm, n or Esc to cancel"),
    ];
    let dialog = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(
                    "Confirm Delete",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
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

fn field_lines(label: &str, field: &FieldValue, active: bool) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::BOLD | Modifier::DIM);
    let value_style = Style::default().fg(if active { Color::Cyan } else { Color::White });
    let prefix = format!("{}: ", label);
    let spacer = " ".repeat(prefix.chars().count());
    let text = if active {
        field.with_caret()
    } else {
        field.value.clone()
    };
    text.split('\n')
        .enumerate()
        .map(|(idx, line)| {
            Line::from(vec![
                Span::styled(
                    if idx == 0 {
                        prefix.clone()
                    } else {
                        spacer.clone()
                    },
                    label_style,
                ),
                Span::styled(line.to_string(), value_style),
            ])
        })
        .collect()
}

fn error_line(message: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        message,
        Style::default().fg(Color::LightRed),
    ))
}

fn format_elapsed(last: Instant) -> String {
    let secs = last.elapsed().as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteDraft;
    use crate::storage::{MemoryStore, StoreScope};
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn app() -> App {
        let notebook = Notebook::open(Box::new(MemoryStore::new()), "notes.app.notes");
        let location = StoreLocation {
            dir: PathBuf::from("/tmp/jotter"),
            scope: StoreScope::Global,
        };
        App::new(notebook, location)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn adding_through_the_form_selects_the_new_note() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_text(&mut app, "Grocery list");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "milk");
        ctrl(&mut app, 's');

        let notes = app.notebook.notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Grocery list");
        assert_eq!(app.notebook.selected_id(), Some(notes[0].id.as_str()));
        assert_eq!(app.form.mode(), FormMode::Edit);
        assert_eq!(app.form.title.value, "Grocery list");
    }

    #[test]
    fn blank_title_shows_error_and_creates_nothing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "body only");
        ctrl(&mut app, 's');

        assert!(app.notebook.notes().is_empty());
        assert!(screen(&mut app).contains("Title is required."));
    }

    #[test]
    fn editing_and_cancelling() {
        let mut app = app();
        app.notebook.create(&NoteDraft::new("Todo", "call"));
        app.notebook.cancel_edit();
        app.sync();

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::Form);
        assert_eq!(app.form.title.value, "Todo");
        type_text(&mut app, "s");
        ctrl(&mut app, 's');
        assert_eq!(app.notebook.notes()[0].title, "Todos");

        press(&mut app, KeyCode::Esc);
        assert!(!app.notebook.is_editing());
        assert_eq!(app.form.mode(), FormMode::Add);
        assert!(app.form.title.value.is_empty());
    }

    #[test]
    fn escape_in_the_list_leaves_edit_mode() {
        let mut app = app();
        app.notebook.create(&NoteDraft::new("Todo", "call"));
        app.sync();
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.form.mode(), FormMode::Edit);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.notebook.selected_id(), None);
        assert_eq!(app.form.mode(), FormMode::Add);
        assert_eq!(app.status, "Switched to add mode");
        assert_eq!(app.notebook.notes().len(), 1);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app();
        app.notebook.create(&NoteDraft::new("Todo", "call"));
        app.sync();

        press(&mut app, KeyCode::Char('d'));
        assert!(screen(&mut app).contains("Delete \"Todo\"? This cannot be undone."));
        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.notebook.notes().len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.notebook.notes().is_empty());
        assert!(!app.notebook.is_editing());
    }

    #[test]
    fn search_filters_the_list() {
        let mut app = app();
        app.notebook.create(&NoteDraft::new("Todo", "x"));
        app.notebook.create(&NoteDraft::new("Grocery list", "y"));
        app.sync();

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "gro");
        press(&mut app, KeyCode::Enter);
        let shown = screen(&mut app);
        assert!(shown.contains("Grocery list"));
        assert!(shown.contains("Shown: 1"));

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "zzz");
        assert!(screen(&mut app).contains("No notes match your search."));
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(ctrl(&mut app, 'c'));
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }
}
