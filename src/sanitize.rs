//! Allowlist sanitizer for message HTML fragments.
//!
//! Every fragment crosses at least one trust boundary before it is assigned
//! to the panel DOM: it is read from a widget the page controls, and on the
//! host side it additionally arrives from an unauthenticated window message.
//! This pass keeps the inline markup chat messages actually use (text, emoji
//! images, simple formatting, links) and drops everything else.
//!
//! Policy:
//! - kept tags: `a b br em i img span strong`, lowercased on output
//! - kept attributes: `a[href]`, `img[src alt]`; any `on*` name is dropped
//! - attribute values are decoded before any check and re-encoded on output
//! - `href`/`src` must be relative, `http(s)`, or `data:image/`
//! - `script`-like subtrees are removed whole, content included
//! - unknown tags are unwrapped, their children kept
//! - comments and declarations are removed, a stray `<` becomes `&lt;`
//! - tags left open by the fragment are closed at the end

/// Tags allowed through.
const ALLOWED_TAGS: [&str; 8] = ["a", "b", "br", "em", "i", "img", "span", "strong"];

/// Tags whose entire subtree is removed, content included.
const DROPPED_SUBTREES: [&str; 8] =
    ["embed", "iframe", "math", "object", "script", "style", "svg", "template"];

/// Allowed tags that take no closing counterpart.
const VOID_TAGS: [&str; 2] = ["br", "img"];

/// Rewrites an HTML fragment down to the allowlisted subset.
#[must_use]
pub fn clean_fragment(html: &str) -> String {
    let bytes = html.as_bytes();
    let mut out = String::with_capacity(html.len());
    let mut stack: Vec<String> = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        match find_byte(bytes, pos, b'<') {
            None => {
                out.push_str(&html[pos..]);
                break;
            }
            Some(lt) => {
                out.push_str(&html[pos..lt]);
                pos = consume_markup(html, lt, &mut out, &mut stack);
            }
        }
    }
    // Close anything the fragment left open so the panel DOM stays balanced.
    while let Some(open) = stack.pop() {
        out.push_str("</");
        out.push_str(&open);
        out.push('>');
    }
    out
}

/// Handles one `<`-introduced construct, returning the position to resume at.
fn consume_markup(html: &str, lt: usize, out: &mut String, stack: &mut Vec<String>) -> usize {
    let bytes = html.as_bytes();
    let after = lt + 1;
    if after >= bytes.len() {
        out.push_str("&lt;");
        return bytes.len();
    }
    match bytes[after] {
        b'!' | b'?' => skip_declaration(html, lt),
        b'/' => close_tag(html, after + 1, out, stack),
        c if c.is_ascii_alphabetic() => open_tag(html, after, out, stack),
        _ => {
            out.push_str("&lt;");
            after
        }
    }
}

/// Skips a comment, doctype, or processing instruction without emitting it.
fn skip_declaration(html: &str, lt: usize) -> usize {
    let rest = &html[lt..];
    if rest.starts_with("<!--") {
        match rest.find("-->") {
            Some(end) => lt + end + 3,
            None => html.len(),
        }
    } else {
        match rest.find('>') {
            Some(end) => lt + end + 1,
            None => html.len(),
        }
    }
}

fn close_tag(html: &str, name_start: usize, out: &mut String, stack: &mut Vec<String>) -> usize {
    let bytes = html.as_bytes();
    let name_end = scan_name(bytes, name_start);
    let name = html[name_start..name_end].to_ascii_lowercase();
    let next = match find_byte(bytes, name_end, b'>') {
        Some(gt) => gt + 1,
        None => html.len(),
    };
    if name.is_empty() || !stack.iter().any(|open| *open == name) {
        // Closer for an unwrapped or never-opened tag; nothing to balance.
        return next;
    }
    while let Some(open) = stack.pop() {
        out.push_str("</");
        out.push_str(&open);
        out.push('>');
        if open == name {
            break;
        }
    }
    next
}

fn open_tag(html: &str, name_start: usize, out: &mut String, stack: &mut Vec<String>) -> usize {
    let bytes = html.as_bytes();
    let name_end = scan_name(bytes, name_start);
    let name = html[name_start..name_end].to_ascii_lowercase();
    let (attrs, tag_end) = scan_attributes(html, name_end);
    if DROPPED_SUBTREES.contains(&name.as_str()) {
        return skip_subtree(html, tag_end, &name);
    }
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return tag_end;
    }
    out.push('<');
    out.push_str(&name);
    for (attr, value) in &attrs {
        if let Some(kept) = clean_attribute(&name, attr, value.as_deref()) {
            out.push(' ');
            out.push_str(&kept);
        }
    }
    out.push('>');
    if !VOID_TAGS.contains(&name.as_str()) {
        stack.push(name);
    }
    tag_end
}

/// Collects raw `name` / `name=value` pairs up to and including the `>`.
fn scan_attributes(html: &str, from: usize) -> (Vec<(String, Option<String>)>, usize) {
    let bytes = html.as_bytes();
    let mut attrs = Vec::new();
    let mut pos = from;
    loop {
        while pos < bytes.len() && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
            pos += 1;
        }
        if pos >= bytes.len() {
            return (attrs, pos);
        }
        if bytes[pos] == b'>' {
            return (attrs, pos + 1);
        }
        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'/' | b'>')
        {
            pos += 1;
        }
        if pos == name_start {
            pos += 1;
            continue;
        }
        let attr = html[name_start..pos].to_ascii_lowercase();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b'=' {
            attrs.push((attr, None));
            continue;
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            attrs.push((attr, None));
            return (attrs, pos);
        }
        let value = match bytes[pos] {
            quote @ (b'"' | b'\'') => {
                let value_start = pos + 1;
                let value_end = find_byte(bytes, value_start, quote).unwrap_or(bytes.len());
                pos = (value_end + 1).min(bytes.len());
                html[value_start..value_end].to_string()
            }
            _ => {
                let value_start = pos;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>' {
                    pos += 1;
                }
                html[value_start..pos].to_string()
            }
        };
        attrs.push((attr, Some(value)));
    }
}

/// Returns the attribute rendered as `name="value"`, or None to drop it.
fn clean_attribute(tag: &str, attr: &str, value: Option<&str>) -> Option<String> {
    if attr.starts_with("on") {
        return None;
    }
    let allowed = match tag {
        "a" => attr == "href",
        "img" => attr == "src" || attr == "alt",
        _ => false,
    };
    if !allowed {
        return None;
    }
    let value = value.unwrap_or_default();
    if attr == "href" || attr == "src" {
        let url = compact_url(value);
        if !safe_url(&url) {
            return None;
        }
        return Some(format!("{attr}=\"{}\"", escape_attribute(&url)));
    }
    Some(format!("{attr}=\"{}\"", escape_attribute(&decode_references(value))))
}

/// URLs may be relative, `http(s)`, or inline image data. Everything else,
/// `javascript:` foremost, is rejected.
fn safe_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    match lower.split_once(':') {
        None => true,
        // The first ':' sits past the start of a path, query, or fragment,
        // so it is not a scheme separator.
        Some((head, _)) if head.contains(['/', '?', '#']) => true,
        Some(("http" | "https", _)) => true,
        Some(("data", rest)) => rest.starts_with("image/"),
        Some(_) => false,
    }
}

/// Resolves character references first, so the checks read the URL the same
/// way a browser will after the cleaned fragment is parsed back into a
/// document. Then strips the control characters browsers ignore inside URLs,
/// which would otherwise smuggle a scheme past the check, and trims
/// surrounding whitespace.
fn compact_url(raw: &str) -> String {
    decode_references(raw).trim().chars().filter(|c| !c.is_ascii_control()).collect()
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

/// Resolves the character references a serialized attribute value can carry.
/// Kept values are checked and re-emitted in decoded form, which keeps the
/// encoding single-pass: the browser's one decode lands back on the text the
/// checks saw.
fn decode_references(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match reference_value(tail) {
            Some((decoded, used)) => {
                out.push(decoded);
                rest = &tail[used..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes the reference at the start of `tail`, just past an `&`, returning
/// the character and the bytes consumed. Numeric forms decode with or
/// without the closing semicolon, as attribute values parse; named forms
/// require it.
fn reference_value(tail: &str) -> Option<(char, usize)> {
    let bytes = tail.as_bytes();
    if bytes.first() == Some(&b'#') {
        let (digits_start, radix) = match bytes.get(1) {
            Some(b'x' | b'X') => (2, 16),
            _ => (1, 10),
        };
        let mut code: u32 = 0;
        let mut pos = digits_start;
        while let Some(digit) = bytes.get(pos).and_then(|b| char::from(*b).to_digit(radix)) {
            code = code.saturating_mul(radix).saturating_add(digit);
            pos += 1;
        }
        if pos == digits_start {
            return None;
        }
        if bytes.get(pos) == Some(&b';') {
            pos += 1;
        }
        let decoded = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
        return Some((decoded, pos));
    }
    let mut pos = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
        pos += 1;
    }
    if pos == 0 || bytes.get(pos) != Some(&b';') {
        return None;
    }
    named_reference(&tail[..pos]).map(|decoded| (decoded, pos + 1))
}

/// What serializers emit, plus the separators worth hiding a scheme behind.
fn named_reference(name: &str) -> Option<char> {
    match name {
        "amp" | "AMP" => Some('&'),
        "lt" | "LT" => Some('<'),
        "gt" | "GT" => Some('>'),
        "quot" | "QUOT" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "colon" => Some(':'),
        "semi" => Some(';'),
        "sol" => Some('/'),
        "Tab" => Some('\t'),
        "NewLine" => Some('\n'),
        _ => None,
    }
}

/// Skips everything up to and including the closer of `name`.
fn skip_subtree(html: &str, from: usize, name: &str) -> usize {
    let lower = html.to_ascii_lowercase();
    let closer = format!("</{name}");
    match lower[from..].find(&closer) {
        Some(at) => {
            let bytes = html.as_bytes();
            match find_byte(bytes, from + at + closer.len(), b'>') {
                Some(gt) => gt + 1,
                None => html.len(),
            }
        }
        None => html.len(),
    }
}

fn scan_name(bytes: &[u8], from: usize) -> usize {
    let mut pos = from;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
        pos += 1;
    }
    pos
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|i| from + i)
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
