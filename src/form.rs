use crate::model::{Note, NoteDraft};

pub const TITLE_REQUIRED: &str = "Title is required.";
pub const BODY_REQUIRED: &str = "Body is required.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Title,
    Body,
}

/// Input buffer for adding or editing one note.
///
/// A field only reports a missing value after it has been left or a submit
/// was attempted. The buffer follows the note it was hydrated from: when
/// [`NoteForm::sync`] sees a different note (or none) it reloads and drops
/// unsaved input.
pub struct NoteForm {
    pub title: FieldValue,
    pub body: FieldValue,
    pub field: FormField,
    touched_title: bool,
    touched_body: bool,
    source: Option<Note>,
}

#[derive(Clone, Debug, Default)]
pub struct FieldValue {
    pub value: String,
    pub cursor: usize,
}

impl FieldValue {
    pub fn new(value: &str) -> Self {
        FieldValue {
            value: value.to_string(),
            cursor: value.len(),
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = prev_boundary(self.cursor, &self.value);
    }

    pub fn move_right(&mut self) {
        if self.cursor >= self.value.len() {
            return;
        }
        self.cursor = next_boundary(self.cursor, &self.value);
    }

    pub fn move_up(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx == 0 {
            return;
        }
        let target_start = line_starts[line_idx - 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    pub fn move_down(&mut self) {
        let (line_starts, line_idx, col) = line_state(&self.value, self.cursor);
        if line_idx + 1 >= line_starts.len() {
            return;
        }
        let target_start = line_starts[line_idx + 1];
        self.cursor = index_at_col(&self.value, target_start, col);
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_boundary(self.cursor, &self.value);
        self.value.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert_str(self.cursor, "▌");
        text
    }
}

impl NoteForm {
    pub fn new() -> Self {
        NoteForm {
            title: FieldValue::default(),
            body: FieldValue::default(),
            field: FormField::Title,
            touched_title: false,
            touched_body: false,
            source: None,
        }
    }

    /// A form with both fields already typed in, for non-interactive input.
    pub fn filled(title: &str, body: &str) -> Self {
        NoteForm {
            title: FieldValue::new(title),
            body: FieldValue::new(body),
            ..NoteForm::new()
        }
    }

    pub fn mode(&self) -> FormMode {
        if self.source.is_some() {
            FormMode::Edit
        } else {
            FormMode::Add
        }
    }

    /// Re-hydrates from `note` if it differs from the note the buffer was
    /// loaded from. Returns true when the buffer was reset.
    pub fn sync(&mut self, note: Option<&Note>) -> bool {
        if self.source.as_ref() == note {
            return false;
        }
        self.source = note.cloned();
        let (title, body) = match note {
            Some(n) => (n.title.as_str(), n.body.as_str()),
            None => ("", ""),
        };
        self.title = FieldValue::new(title);
        self.body = FieldValue::new(body);
        self.field = FormField::Title;
        self.touched_title = false;
        self.touched_body = false;
        true
    }

    pub fn title_error(&self) -> Option<&'static str> {
        (self.touched_title && self.title.value.trim().is_empty()).then_some(TITLE_REQUIRED)
    }

    pub fn body_error(&self) -> Option<&'static str> {
        (self.touched_body && self.body.value.trim().is_empty()).then_some(BODY_REQUIRED)
    }

    pub fn can_submit(&self) -> bool {
        !self.title.value.trim().is_empty() && !self.body.value.trim().is_empty()
    }

    /// Marks the active field as visited.
    pub fn blur(&mut self) {
        match self.field {
            FormField::Title => self.touched_title = true,
            FormField::Body => self.touched_body = true,
        }
    }

    pub fn next_field(&mut self) {
        self.blur();
        self.field = match self.field {
            FormField::Title => FormField::Body,
            FormField::Body => FormField::Title,
        };
    }

    pub fn prev_field(&mut self) {
        self.next_field();
    }

    pub fn active_field_mut(&mut self) -> &mut FieldValue {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Body => &mut self.body,
        }
    }

    /// Marks every field touched and hands back the untrimmed input if both
    /// fields have content.
    pub fn submit(&mut self) -> Option<NoteDraft> {
        self.touched_title = true;
        self.touched_body = true;
        if !self.can_submit() {
            return None;
        }
        Some(NoteDraft::new(
            self.title.value.clone(),
            self.body.value.clone(),
        ))
    }

    pub fn clear(&mut self) {
        self.title = FieldValue::default();
        self.body = FieldValue::default();
        self.field = FormField::Title;
        self.touched_title = false;
        self.touched_body = false;
    }
}

impl Default for NoteForm {
    fn default() -> Self {
        NoteForm::new()
    }
}

fn prev_boundary(cursor: usize, text: &str) -> usize {
    if cursor == 0 {
        return 0;
    }
    let mut prev = 0;
    for (idx, _) in text.char_indices() {
        if idx >= cursor {
            break;
        }
        prev = idx;
    }
    prev
}

fn next_boundary(cursor: usize, text: &str) -> usize {
    for (idx, ch) in text.char_indices() {
        if idx > cursor {
            return idx;
        }
        if idx == cursor {
            return cursor + ch.len_utf8();
        }
    }
    text.len()
}

fn line_state(text: &str, cursor: usize) -> (Vec<usize>, usize, usize) {
    let mut starts = vec![0];
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(idx + 1);
        }
    }
    let line_idx = starts
        .iter()
        .rposition(|start| *start <= cursor)
        .unwrap_or(0);
    let col = text[starts[line_idx]..cursor].chars().count();
    (starts, line_idx, col)
}

fn index_at_col(text: &str, start: usize, target_col: usize) -> usize {
    let slice = &text[start..];
    let limit = slice.find('\n').unwrap_or(slice.len());
    slice[..limit]
        .char_indices()
        .nth(target_col)
        .map(|(idx, _)| start + idx)
        .unwrap_or(start + limit)
}
