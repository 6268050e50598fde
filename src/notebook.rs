use crate::model::{self, generate_id, Note, NoteDraft, NoteId};
use crate::persist::Persisted;
use crate::storage::KeyValueStore;
use std::time::Instant;

pub const EMPTY_NOTEBOOK: &str = "No notes yet. Add your first note using the form.";
pub const EMPTY_SEARCH: &str = "No notes match your search.";

/// Owns the note collection, the selection and the search query.
///
/// `notes` is the only persisted part and is newest-first. A selection may
/// point at a note that no longer exists; it then resolves to no note and the
/// notebook behaves as if nothing were selected.
pub struct Notebook {
    notes: Persisted<Vec<Note>>,
    selected: Option<NoteId>,
    query: String,
}

impl Notebook {
    pub fn open(store: Box<dyn KeyValueStore>, key: &str) -> Self {
        let notes = Persisted::load(store, key, Vec::new());
        log::info!(
            "event=notebook_open key={} notes={}",
            key,
            notes.get().len()
        );
        Notebook {
            notes,
            selected: None,
            query: String::new(),
        }
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.get()
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes().iter().find(|n| n.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.note(self.selected.as_deref()?)
    }

    pub fn is_editing(&self) -> bool {
        self.selected_note().is_some()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn filtered_notes(&self) -> Vec<&Note> {
        let q = self.query.trim().to_lowercase();
        if q.is_empty() {
            return self.notes().iter().collect();
        }
        self.notes()
            .iter()
            .filter(|n| n.title.to_lowercase().contains(&q))
            .collect()
    }

    pub fn empty_state(&self) -> &'static str {
        if self.query.trim().is_empty() {
            EMPTY_NOTEBOOK
        } else {
            EMPTY_SEARCH
        }
    }

    pub fn location(&self) -> String {
        self.notes.location()
    }

    pub fn last_save(&self) -> Option<Instant> {
        self.notes.last_write()
    }

    /// Adds a note at the front and selects it.
    pub fn create(&mut self, draft: &NoteDraft) -> NoteId {
        let note = Note::new(
            generate_id(),
            draft.title.trim().to_string(),
            draft.body.trim().to_string(),
        );
        let id = note.id.clone();
        self.notes.update(|notes| notes.insert(0, note));
        self.selected = Some(id.clone());
        log::info!("event=note_create id={}", id);
        id
    }

    /// Rewrites the selected note. Returns false when nothing is selected or
    /// the selection is stale.
    pub fn update(&mut self, draft: &NoteDraft) -> bool {
        let id = match &self.selected {
            Some(id) => id.clone(),
            None => return false,
        };
        let idx = match self.notes().iter().position(|n| n.id == id) {
            Some(idx) => idx,
            None => return false,
        };
        let title = draft.title.trim().to_string();
        let body = draft.body.trim().to_string();
        self.notes.update(|notes| {
            let note = &mut notes[idx];
            note.title = title;
            note.body = body;
            note.updated_at = Some(model::now());
        });
        log::info!("event=note_update id={}", id);
        true
    }

    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    pub fn cancel_edit(&mut self) {
        self.selected = None;
    }

    /// Confirmation text shown before deleting `id`.
    pub fn delete_prompt(&self, id: &str) -> String {
        match self.note(id).filter(|n| !n.title.is_empty()) {
            Some(note) => format!("Delete \"{}\"? This cannot be undone.", note.title),
            None => "Delete this note? This cannot be undone.".to_string(),
        }
    }

    /// Asks `confirm` with the delete prompt and removes the note if it
    /// answers yes.
    pub fn delete<F>(&mut self, id: &str, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(&self.delete_prompt(id)) {
            log::debug!("event=note_delete status=declined id={}", id);
            return false;
        }
        self.remove(id)
    }

    /// Removes an already confirmed note. Clears the selection if it pointed
    /// at it.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.note(id).is_none() {
            return false;
        }
        let remaining = self
            .notes()
            .iter()
            .filter(|n| n.id != id)
            .cloned()
            .collect();
        self.notes.set(remaining);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        log::info!("event=note_delete id={}", id);
        true
    }

    #[cfg(test)]
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.notes.into_store()
    }
}
