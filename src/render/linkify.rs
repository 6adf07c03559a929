use super::escape::escape_html;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

/// North-American 10-digit number: optional `(area)`, then 3-3-4 groups with
/// an optional `-`, `.` or space between them. ASCII digits only, since the
/// match is copied into the `tel:` URI.
static PHONE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:\(([0-9]{3})\) ?|\b([0-9]{3})[-. ]?)([0-9]{3})[-. ]?([0-9]{4})\b").ok()
});

/// Static pattern-to-affordance pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkifyRule {
    /// Phone shapes become `tel:+1…` links.
    Phone,
    /// One exact postal address becomes a map-search link.
    Address(AddressRule),
}

/// A known address, stored pre-escaped so it matches escaped text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRule {
    escaped: String,
    anchor: String,
}

impl AddressRule {
    /// `None` for blank addresses.
    pub fn new(address: &str, map_search_base: &Url) -> Option<Self> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        let mut target = map_search_base.clone();
        target.query_pairs_mut().append_pair("query", address);

        let escaped = escape_html(address).into_owned();
        let anchor = format!(
            "<a href=\"{}\" class=\"hannah-link\" target=\"_blank\" rel=\"noopener noreferrer\">{escaped}</a>",
            escape_html(target.as_str()),
        );
        Some(Self { escaped, anchor })
    }

    pub fn escaped(&self) -> &str {
        &self.escaped
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }
}

/// Wrap phone shapes in already-escaped `text` with `tel:` anchors. The
/// visible text is the matched substring, unchanged.
pub fn linkify_phones(text: &str) -> String {
    let Some(pattern) = PHONE_PATTERN.as_ref() else {
        return text.to_string();
    };

    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let area = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            let exchange = caps.get(3).map_or("", |m| m.as_str());
            let line = caps.get(4).map_or("", |m| m.as_str());
            format!(
                "<a href=\"tel:+1{area}{exchange}{line}\" class=\"hannah-link\">{}</a>",
                &caps[0]
            )
        })
        .into_owned()
}

/// Piece of escaped text, either untouched or an address to be swapped for
/// its anchor.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Piece<'a> {
    Plain(&'a str),
    Address(&'a AddressRule),
}

/// Split escaped text around literal address matches. Earliest match wins;
/// on a tie the longer address wins.
pub(super) fn split_addresses<'a>(text: &'a str, rules: &'a [AddressRule]) -> Vec<Piece<'a>> {
    let mut pieces = Vec::new();
    let mut rest = text;

    loop {
        let next = rules
            .iter()
            .filter_map(|rule| rest.find(rule.escaped()).map(|at| (at, rule)))
            .min_by(|(a_at, a), (b_at, b)| {
                a_at.cmp(b_at)
                    .then_with(|| b.escaped().len().cmp(&a.escaped().len()))
            });

        let Some((at, rule)) = next else {
            if !rest.is_empty() {
                pieces.push(Piece::Plain(rest));
            }
            break;
        };

        if at > 0 {
            pieces.push(Piece::Plain(&rest[..at]));
        }
        pieces.push(Piece::Address(rule));
        rest = &rest[at + rule.escaped().len()..];
    }

    pieces
}
