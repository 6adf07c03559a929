//! Visible side of the widget: open/closed state and the rendered message
//! list.
//!
//! Entries are append-only with one exception: a reply placeholder made by
//! [`ChatPanel::begin_reply`] is overwritten exactly once by
//! [`ChatPanel::resolve_reply`].

pub mod view;

pub use view::{NullView, PanelView, RecordingView, ViewEvent};

use crate::conversation::Role;
use crate::error::TransportError;
use crate::render::Renderer;

pub const PLACEHOLDER: &str = "…";
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry — I couldn't generate a response.";
pub const ERROR_PREFIX: &str = "Sorry — I ran into an issue: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

impl EntryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One bubble in the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelEntry {
    pub id: EntryId,
    pub role: Role,
    /// Display text before sanitizing.
    pub text: String,
    /// Safe markup for the bubble.
    pub markup: String,
    pub pending: bool,
}

/// Claim on a placeholder entry. Consumed by [`ChatPanel::resolve_reply`], so
/// a placeholder cannot be resolved twice.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a reply placeholder stays as \"…\" until resolved"]
pub struct ReplyHandle(EntryId);

impl ReplyHandle {
    pub fn entry(&self) -> EntryId {
        self.0
    }
}

pub struct ChatPanel<V: PanelView = NullView> {
    open: bool,
    entries: Vec<PanelEntry>,
    scrolled_to: Option<EntryId>,
    renderer: Renderer,
    view: V,
}

impl<V: PanelView> ChatPanel<V> {
    pub fn new(renderer: Renderer, view: V) -> Self {
        Self {
            open: false,
            entries: Vec::new(),
            scrolled_to: None,
            renderer,
            view,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.set_open(true);
    }

    pub fn close(&mut self) {
        self.set_open(false);
    }

    pub fn toggle(&mut self) {
        self.set_open(!self.open);
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
        self.view.visibility_changed(open);
    }

    /// Append a new bubble with sanitized `text`.
    pub fn show_message(&mut self, text: &str, role: Role) -> EntryId {
        let markup = self.renderer.render(text);
        self.push(role, text.to_string(), markup, false)
    }

    /// Append a "…" assistant bubble to be filled in later.
    pub fn begin_reply(&mut self) -> ReplyHandle {
        let id = self.push(
            Role::Assistant,
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            true,
        );
        ReplyHandle(id)
    }

    /// Replace the placeholder with the answer, a fallback for an empty
    /// answer, or an error notice. Works whether or not the panel is open.
    pub fn resolve_reply(&mut self, handle: ReplyHandle, outcome: Result<&str, &TransportError>) {
        let text = match outcome {
            Ok(answer) if answer.trim().is_empty() => EMPTY_REPLY_FALLBACK.to_string(),
            Ok(answer) => answer.to_string(),
            Err(err) => format!("{ERROR_PREFIX}{err}"),
        };
        let markup = self.renderer.render(&text);

        let Some(entry) = self.entries.get_mut(handle.0.0) else {
            tracing::warn!(entry = handle.0.0, "reply handle points past the panel");
            return;
        };
        entry.text = text;
        entry.markup = markup;
        entry.pending = false;

        self.view.entry_replaced(entry);
        self.scroll_to(handle.0);
    }

    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&PanelEntry> {
        self.entries.get(id.0)
    }

    /// Entry the list was last scrolled to.
    pub fn scrolled_to(&self) -> Option<EntryId> {
        self.scrolled_to
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn push(&mut self, role: Role, text: String, markup: String, pending: bool) -> EntryId {
        let id = EntryId(self.entries.len());
        self.entries.push(PanelEntry {
            id,
            role,
            text,
            markup,
            pending,
        });
        if let Some(entry) = self.entries.last() {
            self.view.entry_added(entry);
        }
        self.scroll_to(id);
        id
    }

    /// Always lands on the newest entry, even when `changed` is older.
    fn scroll_to(&mut self, changed: EntryId) {
        let newest = self
            .entries
            .last()
            .map_or(changed, |entry| entry.id);
        self.scrolled_to = Some(newest);
        self.view.scrolled_to(newest);
    }
}
