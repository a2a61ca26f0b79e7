//! Renderer-agnostic view model for the notes screen.
//!
//! # Responsibility
//! - Project a store snapshot through the current filter.
//! - Own the input buffer and forward user intents to the controller.
//! - Produce the plain-text screen used by terminal front-ends.
//!
//! # Invariants
//! - Filtering never mutates the store; it only selects and keeps order.
//! - Row numbers are 1-based positions in the filtered projection.
//! - The input buffer is cleared only after a committed create.

use crate::model::note::{Note, NoteId};
use crate::remote::NoteRemote;
use crate::store::NoteStore;
use crate::sync::{IntentOutcome, SyncController};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const TITLE: &str = "Notes";
const FOOTER: &str = "Note app, Department of Computer Science, University of Helsinki 2024";
const ROW_CONTENT_MAX_CHARS: usize = 60;

/// Which notes the view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    ImportantOnly,
}

impl Filter {
    pub fn toggle(self) -> Self {
        match self {
            Self::All => Self::ImportantOnly,
            Self::ImportantOnly => Self::All,
        }
    }

    pub fn admits(self, note: &Note) -> bool {
        match self {
            Self::All => true,
            Self::ImportantOnly => note.important,
        }
    }

    /// Label of the button that switches to the other filter.
    pub fn button_label(self) -> &'static str {
        match self {
            Self::All => "show important",
            Self::ImportantOnly => "show all",
        }
    }
}

/// Notes admitted by `filter`, in store order.
pub fn visible_notes(store: &NoteStore, filter: Filter) -> Vec<&Note> {
    store.iter().filter(|note| filter.admits(note)).collect()
}

/// Label of the per-row importance toggle.
pub fn importance_label(note: &Note) -> &'static str {
    if note.important {
        "make not important"
    } else {
        "make important"
    }
}

/// Collapses whitespace and caps the length for single-line display.
pub fn display_content(content: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RE.replace_all(content.trim(), " ");
    if collapsed.chars().count() <= max_chars {
        return collapsed.into_owned();
    }
    let mut truncated: String = collapsed.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// View-side state: filter selection and the new-note input buffer.
#[derive(Debug, Clone, Default)]
pub struct NotesView {
    filter: Filter,
    draft: String,
}

impl NotesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn toggle_filter(&mut self) -> Filter {
        self.filter = self.filter.toggle();
        self.filter
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, value: impl Into<String>) {
        self.draft = value.into();
    }

    /// Rows the user currently sees.
    pub fn visible<'a>(&self, store: &'a NoteStore) -> Vec<&'a Note> {
        visible_notes(store, self.filter)
    }

    /// Resolves a 1-based row number in the current projection to a note id.
    pub fn note_at(&self, store: &NoteStore, row: usize) -> Option<NoteId> {
        let index = row.checked_sub(1)?;
        self.visible(store).get(index).map(|note| note.id.clone())
    }

    /// Submits the draft as a create intent.
    ///
    /// The draft is kept on rejection or failure so the user can fix or
    /// resubmit it.
    pub async fn submit<R: NoteRemote>(&mut self, controller: &SyncController<R>) -> IntentOutcome {
        let submitted = self.draft.clone();
        let outcome = controller.create(&submitted).await;
        self.settle_submit(&submitted, outcome);
        outcome
    }

    /// Applies the outcome of a create issued with `submitted`.
    ///
    /// Front-ends that run the create elsewhere call this when it settles.
    /// The draft is cleared only when committed and still unchanged.
    pub fn settle_submit(&mut self, submitted: &str, outcome: IntentOutcome) {
        if outcome == IntentOutcome::Committed && self.draft == submitted {
            self.draft.clear();
        }
    }

    /// Renders the full screen as plain text.
    ///
    /// `in_flight` is the number of requests still waiting on the service.
    pub fn render(&self, store: &NoteStore, notification: Option<&str>, in_flight: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");
        if let Some(message) = notification {
            let _ = writeln!(out, "! {message}");
        }
        if in_flight > 0 {
            let _ = writeln!(out, "~ waiting on {in_flight} request(s)");
        }
        let _ = writeln!(out, "[{}]", self.filter.button_label());

        let rows = self.visible(store);
        if rows.is_empty() {
            let _ = writeln!(out, "  (no notes)");
        }
        for (index, note) in rows.iter().enumerate() {
            let marker = if note.important { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "{:>3}. {marker} {}  [{}] [delete]",
                index + 1,
                display_content(&note.content, ROW_CONTENT_MAX_CHARS),
                importance_label(note)
            );
        }
        let _ = writeln!(out);
        let _ = write!(out, "{FOOTER}");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{display_content, importance_label, visible_notes, Filter, NotesView};
    use crate::model::note::{Note, NoteId};
    use crate::store::NoteStore;
    use crate::sync::IntentOutcome;

    fn store() -> NoteStore {
        NoteStore::from_notes(vec![
            Note::new(1, "buy milk", false),
            Note::new(2, "call mom", true),
            Note::new(3, "walk dog", false),
            Note::new(4, "pay rent", true),
        ])
    }

    #[test]
    fn important_only_keeps_exact_subset_in_order() {
        let store = store();
        let ids: Vec<NoteId> = visible_notes(&store, Filter::ImportantOnly)
            .into_iter()
            .map(|note| note.id.clone())
            .collect();
        assert_eq!(ids, vec![NoteId::Number(2), NoteId::Number(4)]);
        assert_eq!(visible_notes(&store, Filter::All).len(), 4);
    }

    #[test]
    fn toggling_filter_never_touches_store() {
        let store = store();
        let before = store.clone();
        let mut view = NotesView::new();

        assert_eq!(view.toggle_filter(), Filter::ImportantOnly);
        let _ = view.visible(&store);
        assert_eq!(view.toggle_filter(), Filter::All);

        assert!(store.ptr_eq(&before));
        assert_eq!(store.notes(), before.notes());
    }

    #[test]
    fn rows_resolve_against_filtered_projection() {
        let store = store();
        let mut view = NotesView::new();
        assert_eq!(view.note_at(&store, 2), Some(NoteId::Number(2)));

        view.toggle_filter();
        assert_eq!(view.note_at(&store, 2), Some(NoteId::Number(4)));
        assert_eq!(view.note_at(&store, 0), None);
        assert_eq!(view.note_at(&store, 3), None);
    }

    #[test]
    fn labels_follow_state() {
        assert_eq!(Filter::All.button_label(), "show important");
        assert_eq!(Filter::ImportantOnly.button_label(), "show all");
        assert_eq!(importance_label(&Note::new(1, "a", true)), "make not important");
        assert_eq!(importance_label(&Note::new(1, "a", false)), "make important");
    }

    #[test]
    fn display_content_collapses_and_truncates() {
        assert_eq!(display_content("  a \n\t b  ", 10), "a b");
        assert_eq!(display_content("abcdef", 3), "abc...");
    }

    #[test]
    fn render_shows_notification_rows_and_footer() {
        let store = store();
        let view = NotesView::new();
        let screen = view.render(&store, Some("Note content cannot be empty"), 0);

        assert!(screen.starts_with("Notes\n! Note content cannot be empty\n[show important]"));
        assert!(screen.contains("  1.   buy milk  [make important] [delete]"));
        assert!(screen.contains("  2. * call mom  [make not important] [delete]"));
        assert!(screen.ends_with("University of Helsinki 2024"));
        assert!(!screen.contains("waiting on"));
    }

    #[test]
    fn render_shows_busy_marker_while_requests_are_outstanding() {
        let screen = NotesView::new().render(&store(), None, 2);
        assert!(screen.starts_with("Notes\n~ waiting on 2 request(s)\n[show important]"));
    }

    #[test]
    fn settled_submit_clears_only_unchanged_committed_draft() {
        let mut view = NotesView::new();
        view.set_draft("call mom");
        view.settle_submit("call mom", IntentOutcome::Failed);
        assert_eq!(view.draft(), "call mom");

        view.set_draft("call dad");
        view.settle_submit("call mom", IntentOutcome::Committed);
        assert_eq!(view.draft(), "call dad");

        view.settle_submit("call dad", IntentOutcome::Committed);
        assert_eq!(view.draft(), "");
    }

    #[test]
    fn render_marks_empty_projection() {
        let store = NoteStore::from_notes(vec![Note::new(1, "plain", false)]);
        let mut view = NotesView::new();
        view.toggle_filter();
        assert!(view.render(&store, None, 0).contains("(no notes)"));
    }
}
