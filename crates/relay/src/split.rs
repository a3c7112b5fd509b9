//! HTML escaping and the message splitter.
//!
//! The splitter is deliberately lossless: concatenating the returned chunks
//! (minus the header on the first) reproduces the body byte for byte, so a
//! long transcript survives chunking intact. Escaping happens before length
//! accounting, since escaping changes length.

/// Escape text for the HTML dialect the notifier accepts.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Split `header + body` into chunks of at most `max_len` bytes.
///
/// The first chunk is the header plus as much body as fits; the rest of the
/// body is sliced into fixed windows in original order, cut only at char
/// boundaries. An oversized header still goes out alone rather than being
/// truncated.
#[must_use]
pub fn split_with_header(header: &str, body: &str, max_len: usize) -> Vec<String> {
    if max_len == 0 {
        return Vec::new();
    }
    if header.len() + body.len() <= max_len {
        return vec![format!("{header}{body}")];
    }

    let mut chunks = Vec::new();

    let budget = max_len.saturating_sub(header.len());
    let first_end = floor_char_boundary(body, budget);
    chunks.push(format!("{header}{}", &body[..first_end]));

    let mut rest = &body[first_end..];
    while !rest.is_empty() {
        let mut end = floor_char_boundary(rest, max_len);
        if end == 0 {
            // max_len smaller than one scalar value; still make progress.
            end = rest
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(rest.len());
        }
        chunks.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    chunks
}

/// Largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
