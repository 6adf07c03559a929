use std::borrow::Cow;
use url::Url;

const REDACTED: &str = "[REDACTED]";

/// Query parameters whose values are never logged.
const SECRET_PARAMS: [&str; 5] = ["key", "api_key", "apikey", "access_token", "token"];

const PREFIX_PATTERNS: [&str; 3] = ["sk-", "AIza", "ya29."];

const MARKER_PATTERNS: [&str; 6] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "key=",
    "api_key=",
    "access_token=",
    "\"api_key\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    let mut end = from;
    for (i, c) in input[from..].char_indices() {
        if is_secret_char(c) {
            end = from + i + c.len_utf8();
        } else {
            break;
        }
    }
    end
}

fn scrub_after_marker(scrubbed: &mut String, marker: &str) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        // Bare marker with nothing after it.
        if end == content_start {
            search_from = content_start;
            continue;
        }

        scrubbed.replace_range(content_start..end, REDACTED);
        search_from = content_start + REDACTED.len();
    }
}

/// Redact key-like tokens from text headed for logs or error messages.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let needs_scrubbing = PREFIX_PATTERNS
        .iter()
        .chain(MARKER_PATTERNS.iter())
        .any(|p| input.contains(p));
    if !needs_scrubbing {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in MARKER_PATTERNS {
        scrub_after_marker(&mut scrubbed, marker);
    }
    for prefix in PREFIX_PATTERNS {
        scrub_prefixed_token(&mut scrubbed, prefix);
    }
    Cow::Owned(scrubbed)
}

fn scrub_prefixed_token(scrubbed: &mut String, prefix: &str) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(prefix) {
        let start = search_from + rel;
        let end = token_end(scrubbed, start + prefix.len());
        if end == start + prefix.len() {
            search_from = end;
            continue;
        }
        scrubbed.replace_range(start..end, REDACTED);
        search_from = start + REDACTED.len();
    }
}

/// Endpoint as it may appear in logs: secret query values replaced.
pub fn redact_url(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if SECRET_PARAMS.contains(&k.to_ascii_lowercase().as_str()) {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
