use scraper::ElementRef;

/// Elements whose content never reaches the reader.
const HIDDEN: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe",
];

/// Elements that start on their own line when rendered.
const BLOCK: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Approximate rendered text of an element: hidden elements dropped, runs of
/// source whitespace collapsed, block elements on their own lines, at most one
/// blank line in a row.
pub fn inner_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    walk(element, &mut raw);
    collapse_blank_lines(&raw)
}

fn walk(element: ElementRef<'_>, out: &mut String) {
    let name = element.value().name();
    if HIDDEN.contains(&name) {
        return;
    }
    if name == "br" {
        out.push('\n');
        return;
    }

    let block = BLOCK.contains(&name);
    if block {
        out.push('\n');
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            walk(child_element, out);
        } else if let Some(text) = child.value().as_text() {
            push_inline(out, text);
        }
    }

    if block {
        out.push('\n');
    }
}

fn push_inline(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !out.ends_with(' ') && !out.ends_with('\n') && !out.is_empty() {
                out.push(' ');
            }
        } else {
            out.push(ch);
        }
    }
}

/// Trim every line and cap consecutive line breaks at two.
pub fn collapse_blank_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_breaks = 0usize;

    for line in raw.split('\n') {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            pending_breaks += 1;
            continue;
        }
        if !out.is_empty() {
            let breaks = (pending_breaks + 1).min(2);
            for _ in 0..breaks {
                out.push('\n');
            }
        }
        out.push_str(&line);
        pending_breaks = 0;
    }

    out
}

/// Keep at most `max_chars` characters, cutting on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
