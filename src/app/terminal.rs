use hannah::conversation::Role;
use hannah::panel::{PanelEntry, PanelView};

/// Prints assistant bubbles as plain text.
///
/// While the panel is closed, resolved replies are held back and printed the
/// next time it opens.
#[derive(Debug)]
pub struct TerminalView {
    assistant: String,
    open: bool,
    held: Vec<String>,
}

impl TerminalView {
    pub fn new(assistant: impl Into<String>) -> Self {
        Self {
            assistant: assistant.into(),
            open: false,
            held: Vec::new(),
        }
    }

    fn line(&self, text: &str) -> String {
        format!("{}: {text}", self.assistant)
    }
}

impl PanelView for TerminalView {
    fn visibility_changed(&mut self, open: bool) {
        self.open = open;
        if open {
            println!("[chat open]");
            for line in self.held.drain(..) {
                println!("{line}");
            }
        } else {
            println!("[chat closed]");
        }
    }

    fn entry_replaced(&mut self, entry: &PanelEntry) {
        if entry.role != Role::Assistant {
            return;
        }
        let line = self.line(&entry.text);
        if self.open {
            println!("{line}");
        } else {
            self.held.push(line);
        }
    }
}
