pub mod source;
pub mod text;

pub use source::{FilePage, PageSource, RemotePage, StaticPage, page_source_for};

use scraper::{ElementRef, Html, Selector};

/// An anchor as it appears in the document: visible label and raw `href`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub text: String,
    pub href: String,
}

/// A parsed HTML document the context extractor reads from.
///
/// All accessors degrade to empty values on missing elements or bad
/// selectors; nothing here returns an error.
pub struct Page {
    document: Html,
    location: Option<String>,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Text of the `<title>` element, whitespace-collapsed. `None` when absent
    /// or blank.
    pub fn title(&self) -> Option<String> {
        let sel = Selector::parse("title").ok()?;
        let element = self.document.select(&sel).next()?;
        let title = element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");
        if title.is_empty() { None } else { Some(title) }
    }

    /// Every `<a>` element in document order.
    pub fn anchors(&self) -> Vec<Anchor> {
        let Ok(sel) = Selector::parse("a") else {
            return Vec::new();
        };
        self.document
            .select(&sel)
            .map(|a| Anchor {
                text: text::inner_text(a).trim().to_string(),
                href: a.value().attr("href").unwrap_or_default().to_string(),
            })
            .collect()
    }

    /// Rendered text of each element matching `selector`, in document order.
    pub fn texts_of(&self, selector: &str) -> Vec<String> {
        let Ok(sel) = Selector::parse(selector) else {
            tracing::debug!(selector, "ignoring unparsable selector");
            return Vec::new();
        };
        self.document.select(&sel).map(text::inner_text).collect()
    }

    /// Rendered text of the first element matching `selector`.
    pub fn first_text(&self, selector: &str) -> Option<String> {
        let Ok(sel) = Selector::parse(selector) else {
            tracing::debug!(selector, "ignoring unparsable selector");
            return None;
        };
        self.document.select(&sel).next().map(text::inner_text)
    }

    /// Visible text of the whole page, roughly what a reader sees.
    pub fn visible_text(&self) -> String {
        let root = self.body().unwrap_or_else(|| self.document.root_element());
        text::inner_text(root)
    }

    fn body(&self) -> Option<ElementRef<'_>> {
        let sel = Selector::parse("body").ok()?;
        self.document.select(&sel).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"<html>
<head><title>  Secure Tax
  | Home </title><style>.x{color:red}</style></head>
<body>
  <nav><a href="#services">Services</a> <a href="contact.html"></a></nav>
  <h1>Welcome</h1>
  <p>We file taxes.</p>
  <script>var secret = 1;</script>
  <section id="call-us"><h2>Call us</h2><p>407-951-6379</p></section>
</body>
</html>"##;

    #[test]
    fn title_is_collapsed() {
        let page = Page::parse(SAMPLE);
        assert_eq!(page.title().as_deref(), Some("Secure Tax | Home"));
    }

    #[test]
    fn missing_title_is_none() {
        let page = Page::parse("<html><body><p>hi</p></body></html>");
        assert_eq!(page.title(), None);
    }

    #[test]
    fn anchors_keep_raw_href_and_trimmed_text() {
        let page = Page::parse(SAMPLE);
        let anchors = page.anchors();
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].text, "Services");
        assert_eq!(anchors[0].href, "#services");
        assert_eq!(anchors[1].text, "");
        assert_eq!(anchors[1].href, "contact.html");
    }

    #[test]
    fn visible_text_skips_scripts_and_styles() {
        let page = Page::parse(SAMPLE);
        let text = page.visible_text();
        assert!(text.contains("Welcome"));
        assert!(text.contains("We file taxes."));
        assert!(!text.contains("secret"));
        assert!(!text.contains("color:red"));
    }

    #[test]
    fn first_text_by_selector() {
        let page = Page::parse(SAMPLE);
        let section = page.first_text("#call-us").unwrap();
        assert!(section.contains("Call us"));
        assert!(section.contains("407-951-6379"));
        assert_eq!(page.first_text("#missing"), None);
    }

    #[test]
    fn bad_selector_degrades_to_empty() {
        let page = Page::parse(SAMPLE);
        assert!(page.texts_of("[[[").is_empty());
        assert_eq!(page.first_text("[[["), None);
    }

    #[test]
    fn location_is_optional() {
        let page = Page::parse(SAMPLE);
        assert_eq!(page.location(), None);
        let page = page.with_location("https://securetax.example/");
        assert_eq!(page.location(), Some("https://securetax.example/"));
    }
}
