use serde::{Deserialize, Serialize};

/// Whether the context string carries assistant instructions in front of the
/// page data. Direct model endpoints need them; a proxy usually adds its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContextMode {
    #[default]
    Plain,
    Instruction,
}

/// Which anchors make it into the link list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkFilter {
    /// Any anchor with a non-empty destination.
    #[default]
    Any,
    /// Only `http…`, `#…` and `….html` destinations.
    Navigational,
}

impl LinkFilter {
    pub fn accepts(self, href: &str) -> bool {
        if href.is_empty() {
            return false;
        }
        match self {
            Self::Any => true,
            Self::Navigational => {
                href.starts_with("http") || href.starts_with('#') || href.ends_with(".html")
            }
        }
    }
}

/// How body text is gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyMode {
    /// Headings, paragraphs and list items only. Items at or over
    /// `max_item_chars` are dropped as boilerplate.
    Snippets {
        max_item_chars: usize,
        max_items: usize,
    },
    /// All visible text of the page.
    FullText { max_chars: usize },
}

impl Default for BodyMode {
    fn default() -> Self {
        Self::FullText { max_chars: 12_000 }
    }
}

impl BodyMode {
    pub fn snippets() -> Self {
        Self::Snippets {
            max_item_chars: 220,
            max_items: 120,
        }
    }
}

/// When the context snapshot is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContextRefresh {
    #[default]
    PerSend,
    OnLoad,
}

/// A high-priority block pulled out by selector and placed ahead of the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSection {
    pub label: String,
    pub selector: String,
}

impl NamedSection {
    pub fn new(label: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            selector: selector.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default)]
    pub mode: ContextMode,
    /// Used when the page has no usable `<title>`.
    #[serde(default = "default_title")]
    pub default_title: String,
    #[serde(default = "default_max_links")]
    pub max_links: usize,
    #[serde(default)]
    pub link_filter: LinkFilter,
    #[serde(default)]
    pub body: BodyMode,
    #[serde(default = "default_sections")]
    pub sections: Vec<NamedSection>,
    /// Hard cap on the whole context string, headers included.
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
    #[serde(default)]
    pub refresh: ContextRefresh,
    /// Record the load-time context as the first (system) entry of the log.
    #[serde(default)]
    pub seed_history: bool,
}

fn default_title() -> String {
    "Secure Tax".into()
}

fn default_max_links() -> usize {
    60
}

fn default_sections() -> Vec<NamedSection> {
    vec![
        NamedSection::new("Cash Advance", "#cash-advance"),
        NamedSection::new("Locations", "#locations"),
        NamedSection::new("Call Us", "#call-us"),
    ]
}

fn default_max_context_chars() -> usize {
    12_000
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            mode: ContextMode::default(),
            default_title: default_title(),
            max_links: default_max_links(),
            link_filter: LinkFilter::default(),
            body: BodyMode::default(),
            sections: default_sections(),
            max_context_chars: default_max_context_chars(),
            refresh: ContextRefresh::default(),
            seed_history: false,
        }
    }
}

/// One entry of the link list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub label: String,
    pub destination: String,
}

/// Extracted section text; `None` when the selector matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionText {
    pub label: String,
    pub text: Option<String>,
}

/// Structured snapshot of the page before it is flattened into a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContext {
    pub title: String,
    pub location: Option<String>,
    pub links: Vec<PageLink>,
    pub sections: Vec<SectionText>,
    pub body: String,
    pub body_is_snippets: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_filter_rejects_only_empty() {
        assert!(LinkFilter::Any.accepts("tel:4079516379"));
        assert!(LinkFilter::Any.accepts("contact"));
        assert!(!LinkFilter::Any.accepts(""));
    }

    #[test]
    fn navigational_filter() {
        let f = LinkFilter::Navigational;
        assert!(f.accepts("https://securetax.example"));
        assert!(f.accepts("#services"));
        assert!(f.accepts("contact.html"));
        assert!(!f.accepts("mailto:help@securetax.example"));
        assert!(!f.accepts(""));
    }

    #[test]
    fn default_config_matches_full_text_variant() {
        let cfg = ContextConfig::default();
        assert_eq!(cfg.max_links, 60);
        assert_eq!(cfg.body, BodyMode::FullText { max_chars: 12_000 });
        assert_eq!(cfg.max_context_chars, 12_000);
        assert_eq!(cfg.sections.len(), 3);
        assert_eq!(cfg.refresh, ContextRefresh::PerSend);
    }

    #[test]
    fn body_mode_toml_is_tagged() {
        #[derive(Deserialize)]
        struct Wrapper {
            body: BodyMode,
        }
        let parsed: Wrapper =
            toml::from_str("[body]\nkind = \"snippets\"\nmax_item_chars = 200\nmax_items = 50\n")
                .unwrap();
        assert_eq!(
            parsed.body,
            BodyMode::Snippets {
                max_item_chars: 200,
                max_items: 50
            }
        );
    }

    #[test]
    fn mode_display_is_snake_case() {
        assert_eq!(ContextMode::Instruction.to_string(), "instruction");
        assert_eq!(ContextRefresh::OnLoad.to_string(), "on_load");
    }
}
