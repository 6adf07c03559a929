use super::{EntryId, PanelEntry};

/// Sink for panel changes: a DOM binding, a terminal printer, or a recorder
/// in tests. Every hook defaults to a no-op.
pub trait PanelView: Send {
    fn visibility_changed(&mut self, _open: bool) {}

    fn entry_added(&mut self, _entry: &PanelEntry) {}

    fn entry_replaced(&mut self, _entry: &PanelEntry) {}

    fn scrolled_to(&mut self, _entry: EntryId) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl PanelView for NullView {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Visibility(bool),
    Added(EntryId),
    Replaced(EntryId),
}

/// Keeps visibility and entry events, skipping scroll noise.
#[derive(Debug, Default, Clone)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
    scrolls: Vec<EntryId>,
}

impl RecordingView {
    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    pub fn scrolls(&self) -> &[EntryId] {
        &self.scrolls
    }
}

impl PanelView for RecordingView {
    fn visibility_changed(&mut self, open: bool) {
        self.events.push(ViewEvent::Visibility(open));
    }

    fn entry_added(&mut self, entry: &PanelEntry) {
        self.events.push(ViewEvent::Added(entry.id));
    }

    fn entry_replaced(&mut self, entry: &PanelEntry) {
        self.events.push(ViewEvent::Replaced(entry.id));
    }

    fn scrolled_to(&mut self, entry: EntryId) {
        self.scrolls.push(entry);
    }
}
