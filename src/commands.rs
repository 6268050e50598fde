use crate::config::Config;
use crate::form::NoteForm;
use crate::model::{Note, NoteDraft};
use crate::notebook::Notebook;
use crate::storage::{init_project_store, locate_store, KeyValueStore, StoreLocation};
use crate::tui;
use crate::view::format_timestamp;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::io::{self, BufRead, Write};

pub fn init(config: &Config, force: bool) -> Result<()> {
    let location = init_project_store()?;
    let mut store = location.file_store(config);
    let path = store.path_for(&config.storage_key);
    if seed_store(&mut store, &config.storage_key, force)? {
        println!("Initialized note store at {}", path.display());
    } else {
        println!(
            "Note store already exists at {} (use --force to reset)",
            path.display()
        );
    }
    Ok(())
}

pub fn list(config: &Config, query: Option<String>) -> Result<()> {
    let (mut notebook, location) = load_current_notebook(config)?;
    if let Some(q) = query {
        notebook.set_query(q);
    }
    println!(
        "Notes ({}): {}",
        location.scope_label(),
        notebook.location()
    );
    let notes = notebook.filtered_notes();
    if notes.is_empty() {
        println!("  {}", notebook.empty_state());
    }
    for note in notes {
        print_note(note);
    }
    Ok(())
}

pub fn add(config: &Config, title: String, body: String) -> Result<()> {
    let draft = checked_draft(&title, &body)?;
    let (mut notebook, _) = load_current_notebook(config)?;
    let id = notebook.create(&draft);
    println!("Added note {}", id);
    Ok(())
}

pub fn edit(
    config: &Config,
    note_id: String,
    title: Option<String>,
    body: Option<String>,
) -> Result<()> {
    let (mut notebook, _) = load_current_notebook(config)?;
    edit_note(&mut notebook, &note_id, title.as_deref(), body.as_deref())?;
    println!("Updated note {}", note_id);
    Ok(())
}

pub fn delete(config: &Config, note_id: String, yes: bool) -> Result<()> {
    let (mut notebook, _) = load_current_notebook(config)?;
    if delete_note(&mut notebook, &note_id, |prompt| yes || ask(prompt))? {
        println!("Deleted note {}", note_id);
    } else {
        println!("Kept note {}", note_id);
    }
    Ok(())
}

pub fn path(config: &Config) -> Result<()> {
    let cwd = env::current_dir()?;
    let location = locate_store(&cwd, config)?;
    println!(
        "{}",
        location.file_store(config).path_for(&config.storage_key).display()
    );
    Ok(())
}

pub fn tui(config: &Config) -> Result<()> {
    let (notebook, location) = load_current_notebook(config)?;
    tui::run(notebook, location)
}

fn load_current_notebook(config: &Config) -> Result<(Notebook, StoreLocation)> {
    let cwd = env::current_dir()?;
    let location = locate_store(&cwd, config).unwrap_or_else(|err| {
        log::warn!("event=store_locate status=failed reason={:#}", err);
        StoreLocation::session()
    });
    let notebook = Notebook::open(location.open(config), &config.storage_key);
    Ok((notebook, location))
}

/// Writes an empty collection unless one is already stored. Returns whether
/// anything was written.
fn seed_store(store: &mut dyn KeyValueStore, key: &str, force: bool) -> Result<bool> {
    if !force && store.get_item(key)?.is_some() {
        return Ok(false);
    }
    store.set_item(key, "[]")?;
    log::info!("event=store_init key={} force={}", key, force);
    Ok(true)
}

/// Selects then updates `note_id`, keeping the stored title or body for any
/// field not given.
fn edit_note(
    notebook: &mut Notebook,
    note_id: &str,
    title: Option<&str>,
    body: Option<&str>,
) -> Result<()> {
    let current = notebook
        .note(note_id)
        .cloned()
        .ok_or_else(|| anyhow!("note {} not found", note_id))?;
    let draft = checked_draft(
        title.unwrap_or(&current.title),
        body.unwrap_or(&current.body),
    )?;
    notebook.select(note_id);
    if !notebook.update(&draft) {
        bail!("note {} not found", note_id);
    }
    Ok(())
}

fn delete_note<F>(notebook: &mut Notebook, note_id: &str, confirm: F) -> Result<bool>
where
    F: FnOnce(&str) -> bool,
{
    if notebook.note(note_id).is_none() {
        bail!("note {} not found", note_id);
    }
    Ok(notebook.delete(note_id, confirm))
}

/// Applies the form's required-field rule to command-line input.
fn checked_draft(title: &str, body: &str) -> Result<NoteDraft> {
    let mut form = NoteForm::filled(title, body);
    match form.submit() {
        Some(draft) => Ok(draft),
        None => {
            let reason = form
                .title_error()
                .or_else(|| form.body_error())
                .unwrap_or("invalid note");
            bail!("{}", reason)
        }
    }
}

fn ask(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("reading confirmation");
    match read {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(err) => {
            log::warn!("event=confirm status=failed reason={:#}", err);
            false
        }
    }
}

fn print_note(note: &Note) {
    println!("  - {}: {}", note.id, note.title);
    for line in note.body.lines() {
        println!("    {}", line);
    }
    if let Some(updated) = note.updated_at.as_ref() {
        println!("    updated: {}", format_timestamp(updated));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const KEY: &str = "notes.app.notes";

    fn notebook_with(title: &str, body: &str) -> (Notebook, String) {
        let mut notebook = Notebook::open(Box::new(MemoryStore::new()), KEY);
        let id = notebook.create(&NoteDraft::new(title, body));
        notebook.cancel_edit();
        (notebook, id)
    }

    #[test]
    fn checked_draft_reports_the_first_missing_field() {
        let err = checked_draft("  ", "body").unwrap_err();
        assert_eq!(err.to_string(), "Title is required.");
        let err = checked_draft("title", "").unwrap_err();
        assert_eq!(err.to_string(), "Body is required.");
    }

    #[test]
    fn checked_draft_keeps_raw_input() {
        let draft = checked_draft(" A ", "B ").unwrap();
        assert_eq!(draft, NoteDraft::new(" A ", "B "));
    }

    #[test]
    fn unknown_ids_are_errors() {
        let (mut notebook, _) = notebook_with("title", "body");
        let err = edit_note(&mut notebook, "missing", Some("x"), None).unwrap_err();
        assert_eq!(err.to_string(), "note missing not found");
        let err = delete_note(&mut notebook, "missing", |_| true).unwrap_err();
        assert_eq!(err.to_string(), "note missing not found");
        assert_eq!(notebook.notes().len(), 1);
    }

    #[test]
    fn edit_keeps_fields_that_are_not_given() {
        let (mut notebook, id) = notebook_with("old title", "kept body");
        edit_note(&mut notebook, &id, Some(" new title "), None).unwrap();
        let note = notebook.note(&id).unwrap();
        assert_eq!(note.title, "new title");
        assert_eq!(note.body, "kept body");
    }

    #[test]
    fn edit_rejects_a_blank_title() {
        let (mut notebook, id) = notebook_with("title", "body");
        let err = edit_note(&mut notebook, &id, Some("   "), None).unwrap_err();
        assert_eq!(err.to_string(), "Title is required.");
        assert_eq!(notebook.note(&id).unwrap().title, "title");
    }

    #[test]
    fn delete_follows_the_confirmation() {
        let (mut notebook, id) = notebook_with("title", "body");
        assert!(!delete_note(&mut notebook, &id, |_| false).unwrap());
        assert!(notebook.note(&id).is_some());
        assert!(delete_note(&mut notebook, &id, |_| true).unwrap());
        assert!(notebook.notes().is_empty());
    }

    #[test]
    fn seeding_respects_existing_notes_unless_forced() {
        let mut store = MemoryStore::new();
        assert!(seed_store(&mut store, KEY, false).unwrap());
        assert_eq!(store.get_item(KEY).unwrap().as_deref(), Some("[]"));

        store.set_item(KEY, r#"[{"id":"a"}]"#).unwrap();
        assert!(!seed_store(&mut store, KEY, false).unwrap());
        assert_eq!(store.get_item(KEY).unwrap().as_deref(), Some(r#"[{"id":"a"}]"#));

        assert!(seed_store(&mut store, KEY, true).unwrap());
        assert_eq!(store.get_item(KEY).unwrap().as_deref(), Some("[]"));
    }
}
