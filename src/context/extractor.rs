use super::format::render_context;
use super::types::{BodyMode, ContextConfig, PageLink, SectionText, SiteContext};
use crate::config::PersonaConfig;
use crate::page::Page;
use crate::page::text::{collapse_blank_lines, truncate_chars};

/// Elements scanned in snippet mode.
const SNIPPET_SELECTOR: &str = "h1,h2,h3,h4,p,li";

/// Builds the grounding context for chat requests from a parsed page.
#[derive(Debug, Clone, Default)]
pub struct ContextExtractor {
    config: ContextConfig,
    persona: PersonaConfig,
}

impl ContextExtractor {
    pub fn new(config: ContextConfig, persona: PersonaConfig) -> Self {
        Self { config, persona }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Structured snapshot of `page`.
    pub fn extract(&self, page: &Page) -> SiteContext {
        let title = page
            .title()
            .unwrap_or_else(|| self.config.default_title.clone());

        SiteContext {
            title,
            location: page.location().map(str::to_string),
            links: self.links(page),
            sections: self.sections(page),
            body: self.body(page),
            body_is_snippets: matches!(self.config.body, BodyMode::Snippets { .. }),
        }
    }

    /// Flattened context string, never longer than `max_context_chars`.
    pub fn context_string(&self, page: &Page) -> String {
        let context = self.extract(page);
        let rendered = render_context(&context, self.config.mode, &self.persona);
        let capped = truncate_chars(&rendered, self.config.max_context_chars);
        tracing::debug!(
            chars = capped.chars().count(),
            links = context.links.len(),
            "built site context"
        );
        capped.to_string()
    }

    fn links(&self, page: &Page) -> Vec<PageLink> {
        page.anchors()
            .into_iter()
            .filter(|a| self.config.link_filter.accepts(&a.href))
            .take(self.config.max_links)
            .map(|a| PageLink {
                label: if a.text.is_empty() {
                    a.href.clone()
                } else {
                    a.text
                },
                destination: a.href,
            })
            .collect()
    }

    fn sections(&self, page: &Page) -> Vec<SectionText> {
        self.config
            .sections
            .iter()
            .map(|section| SectionText {
                label: section.label.clone(),
                text: page
                    .first_text(&section.selector)
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty()),
            })
            .collect()
    }

    fn body(&self, page: &Page) -> String {
        match self.config.body {
            BodyMode::Snippets {
                max_item_chars,
                max_items,
            } => page
                .texts_of(SNIPPET_SELECTOR)
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty() && t.chars().count() < max_item_chars)
                .take(max_items)
                .collect::<Vec<_>>()
                .join("\n"),
            BodyMode::FullText { max_chars } => {
                let text = collapse_blank_lines(&page.visible_text());
                truncate_chars(&text, max_chars).to_string()
            }
        }
    }
}

/// One-shot helper: context string for `page` under `config`.
pub fn extract_context(page: &Page, config: &ContextConfig, persona: &PersonaConfig) -> String {
    ContextExtractor::new(config.clone(), persona.clone()).context_string(page)
}
