//! Turns raw user or model text into markup that is safe to drop into the
//! chat panel.
//!
//! The pipeline is fixed:
//! 1. escape `& < > " '`
//! 2. swap known addresses for map-search anchors
//! 3. wrap phone shapes in the remaining text with `tel:` anchors
//! 4. turn line breaks into `<br/>`
//!
//! Escaping runs first so inserted anchors are never re-escaped, and phone
//! detection only sees text outside address anchors.

pub mod escape;
pub mod linkify;

pub use escape::escape_html;
pub use linkify::{AddressRule, LinkifyRule, linkify_phones};

use crate::config::LinkifyConfig;
use crate::error::ConfigError;
use linkify::{Piece, split_addresses};
use url::Url;

pub const DEFAULT_MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1";

/// Sanitizer + linkifier with a fixed rule set.
#[derive(Debug, Clone)]
pub struct Renderer {
    rules: Vec<LinkifyRule>,
    addresses: Vec<AddressRule>,
}

impl Renderer {
    pub fn new(known_addresses: &[String], map_search_base: &Url) -> Self {
        let addresses: Vec<AddressRule> = known_addresses
            .iter()
            .filter_map(|a| AddressRule::new(a, map_search_base))
            .collect();

        let mut rules = vec![LinkifyRule::Phone];
        rules.extend(addresses.iter().cloned().map(LinkifyRule::Address));

        Self { rules, addresses }
    }

    pub fn from_config(config: &LinkifyConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.map_search_base).map_err(|e| {
            ConfigError::Validation(format!(
                "linkify.map_search_base '{}' is not a URL: {e}",
                config.map_search_base
            ))
        })?;
        Ok(Self::new(&config.known_addresses, &base))
    }

    pub fn rules(&self) -> &[LinkifyRule] {
        &self.rules
    }

    /// Safe markup for `raw`. Empty input gives empty output.
    pub fn render(&self, raw: &str) -> String {
        let normalized = raw.replace("\r\n", "\n");
        let escaped = escape_html(&normalized);

        let mut out = String::with_capacity(escaped.len());
        for piece in split_addresses(&escaped, &self.addresses) {
            match piece {
                Piece::Plain(text) => out.push_str(&linkify_phones(text)),
                Piece::Address(rule) => out.push_str(rule.anchor()),
            }
        }

        out.replace('\n', "<br/>")
    }
}

impl Default for Renderer {
    fn default() -> Self {
        match Url::parse(DEFAULT_MAP_SEARCH_BASE) {
            Ok(base) => Self::new(&[], &base),
            Err(_) => Self {
                rules: vec![LinkifyRule::Phone],
                addresses: Vec::new(),
            },
        }
    }
}

/// Render with phone linkification only.
pub fn render(raw: &str) -> String {
    Renderer::default().render(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFICE: &str = "1355 W Vine St, Kissimmee, FL 34741";

    fn renderer() -> Renderer {
        let base = Url::parse(DEFAULT_MAP_SEARCH_BASE).unwrap();
        Renderer::new(&[OFFICE.to_string()], &base)
    }

    /// Strip the anchors this module inserts, leaving only visible text.
    fn without_inserted_anchors(markup: &str) -> String {
        let mut out = String::new();
        let mut rest = markup;
        while let Some(start) = rest.find("<a href=\"") {
            out.push_str(&rest[..start]);
            let Some(open_end) = rest[start..].find('>') else {
                break;
            };
            let after_open = &rest[start + open_end + 1..];
            let Some(close) = after_open.find("</a>") else {
                break;
            };
            out.push_str(&after_open[..close]);
            rest = &after_open[close + 4..];
        }
        out.push_str(rest);
        out.replace("<br/>", "")
    }

    #[test]
    fn reply_with_phone_renders_tel_link() {
        let out = render("Call us at 407-951-6379");
        assert_eq!(
            out,
            "Call us at <a href=\"tel:+14079516379\" class=\"hannah-link\">407-951-6379</a>"
        );
    }

    #[test]
    fn phone_shaped_non_ascii_digits_get_no_tel_link() {
        assert_eq!(render("call ٤٠٧٩٥١٦٣٧٩ now"), "call ٤٠٧٩٥١٦٣٧٩ now");
    }

    #[test]
    fn markup_in_text_is_neutralised() {
        let out = render("<script>alert('x')</script> & \"quotes\"");
        assert_eq!(
            out,
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;quotes&quot;"
        );
    }

    #[test]
    fn no_raw_specials_outside_inserted_anchors() {
        let inputs = [
            "<b>bold</b> 407-951-6379 & more",
            "it's \"fine\" <> &&",
            "Visit 1355 W Vine St, Kissimmee, FL 34741 or call (407) 951-6379\n<i>x</i>",
        ];
        for input in inputs {
            let visible = without_inserted_anchors(&renderer().render(input));
            for ch in ['<', '>', '"', '\''] {
                assert!(!visible.contains(ch), "{input:?} leaked {ch:?}: {visible}");
            }
            let stripped = visible
                .replace("&amp;", "")
                .replace("&lt;", "")
                .replace("&gt;", "")
                .replace("&quot;", "")
                .replace("&#39;", "");
            assert!(!stripped.contains('&'), "{input:?} leaked '&': {visible}");
        }
    }

    #[test]
    fn known_address_becomes_map_link() {
        let out = renderer().render(&format!("Our office: {OFFICE}."));
        assert!(out.starts_with("Our office: <a href=\"https://www.google.com/maps/search/?api=1&amp;query=1355+W+Vine+St%2C+Kissimmee%2C+FL+34741\""));
        assert!(out.ends_with(&format!(">{OFFICE}</a>.")));
    }

    #[test]
    fn unknown_address_stays_plain() {
        let out = renderer().render("We moved from 9 Elm Rd, Orlando, FL 32801");
        assert_eq!(out, "We moved from 9 Elm Rd, Orlando, FL 32801");
    }

    #[test]
    fn phone_detection_skips_address_anchor() {
        let base = Url::parse(DEFAULT_MAP_SEARCH_BASE).unwrap();
        let tricky = "Unit 407-951-6379 Plaza".to_string();
        let renderer = Renderer::new(std::slice::from_ref(&tricky), &base);
        let out = renderer.render(&tricky);
        assert!(!out.contains("tel:"));
        assert!(out.contains("maps/search"));
    }

    #[test]
    fn newlines_become_breaks() {
        assert_eq!(render("a\nb\r\nc"), "a<br/>b<br/>c");
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render(""), "");
        assert_eq!(render("   "), "   ");
    }

    #[test]
    fn rule_list_is_phone_then_addresses() {
        let rules = renderer().rules().to_vec();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], LinkifyRule::Phone);
        assert!(matches!(rules[1], LinkifyRule::Address(_)));
    }

    #[test]
    fn from_config_rejects_bad_base() {
        let config = LinkifyConfig {
            known_addresses: vec![],
            map_search_base: "not a url".into(),
        };
        assert!(Renderer::from_config(&config).is_err());
    }
}
