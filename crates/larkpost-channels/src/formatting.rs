//! Markdown-aware text chunking.
//!
//! The host splits oversized replies before handing them to the adapter.
//! Splits prefer paragraph breaks, then line breaks, then spaces, and fall
//! back to a hard cut. A chunk that ends inside a fenced code block gets a
//! closing fence, and the next chunk reopens it with the same info string,
//! so every chunk renders on its own. Inside a code block only line breaks
//! are split points and no code text is dropped.
//!
//! Limits are counted in characters, not bytes.

/// Markdown fence marker.
const FENCE: &str = "```";

/// Characters added when a chunk has to close an open fence (`"\n```"`).
const CLOSE_LEN: usize = 4;

/// Split `text` into chunks of at most `limit` characters.
///
/// `limit == 0` disables splitting. Limits smaller than a fence line plus
/// closing fence cannot always be honoured inside code blocks.
pub fn chunk_markdown_text(text: &str, limit: usize) -> Vec<String> {
    if limit == 0 || text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;
    let mut reopen: Option<String> = None;

    while !remaining.is_empty() {
        let prefix = reopen
            .as_ref()
            .map(|fence| format!("{fence}\n"))
            .unwrap_or_default();
        let prefix_len = prefix.chars().count();

        if prefix_len + remaining.chars().count() <= limit {
            chunks.push(format!("{prefix}{remaining}"));
            break;
        }

        let budget = limit.saturating_sub(prefix_len).max(1);
        let mut piece = next_piece(remaining, budget, reopen.as_deref());

        // Leave room for the closing fence
        if piece.open.is_some() && prefix_len + piece.body.chars().count() + CLOSE_LEN > limit {
            let budget = limit.saturating_sub(prefix_len + CLOSE_LEN).max(1);
            piece = next_piece(remaining, budget, reopen.as_deref());
        }

        let mut chunk = format!("{prefix}{}", piece.body);
        if piece.open.is_some() {
            chunk.push('\n');
            chunk.push_str(FENCE);
        }
        chunks.push(chunk);

        reopen = piece.open.map(|fence| fence.line);
        remaining = piece.rest;
    }

    chunks
}

/// One chunk body cut from the front of the remaining text.
struct Piece<'a> {
    body: &'a str,
    rest: &'a str,
    /// Code block still open at the end of `body`.
    open: Option<OpenFence>,
}

/// A fenced code block that has been opened but not closed.
#[derive(Debug, PartialEq, Eq)]
struct OpenFence {
    /// The opening fence line, info string included.
    line: String,
    /// Byte offset of the fence line; 0 when carried over from the previous chunk.
    line_start: usize,
    /// Byte offset where the code starts.
    code_start: usize,
}

/// Cut the next chunk body of at most `budget` characters from `text`.
///
/// `carried` is the fence left open by the previous chunk.
fn next_piece<'a>(text: &'a str, budget: usize, carried: Option<&str>) -> Piece<'a> {
    let (body, rest) = split_within(text, budget);
    let Some(fence) = scan_fences(body, carried) else {
        return Piece {
            body,
            rest,
            open: None,
        };
    };

    // A fence with no code after it moves whole into the next chunk
    if fence.line_start > 0 && body[fence.code_start..].trim().is_empty() {
        let head = text[..fence.line_start].trim_end_matches('\n');
        if !head.is_empty() {
            return Piece {
                body: head,
                rest: &text[fence.line_start..],
                open: None,
            };
        }
    }

    let (body, mut rest) = split_code(text, budget, fence.code_start);
    let open = scan_fences(body, carried);
    if open.is_none() {
        rest = rest.trim_start_matches('\n');
    }
    Piece { body, rest, open }
}

/// Byte offset of the `n`th character, or `s.len()`.
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

/// Split prose so the head holds at most `budget` characters.
///
/// Returns `(head, rest)` with the separator dropped.
fn split_within(s: &str, budget: usize) -> (&str, &str) {
    let end = byte_offset(s, budget);
    if end == s.len() {
        return (s, "");
    }

    let window = &s[..end];
    let after = &s[end..];

    // Boundary falls exactly on a separator
    if after.starts_with('\n') {
        return (window, after.trim_start_matches('\n'));
    }
    if let Some(i) = window.rfind("\n\n").filter(|&i| i > 0) {
        return (&window[..i], s[i..].trim_start_matches('\n'));
    }
    if let Some(i) = window.rfind('\n').filter(|&i| i > 0) {
        return (&window[..i], s[i..].trim_start_matches('\n'));
    }
    if let Some(rest) = after.strip_prefix(' ') {
        return (window, rest);
    }
    if let Some(i) = window.rfind(' ').filter(|&i| i > 0) {
        return (&window[..i], &s[i + 1..]);
    }

    (window, after)
}

/// Split inside a code block without losing text.
///
/// Only the line break at the cut is consumed; the closing fence takes its
/// place. The head always keeps at least one character past `code_start`.
fn split_code(s: &str, budget: usize, code_start: usize) -> (&str, &str) {
    let mut end = byte_offset(s, budget);
    if end <= code_start {
        end = code_start + s[code_start..].chars().next().map_or(0, char::len_utf8);
    }
    if end >= s.len() {
        return (s, "");
    }

    let window = &s[..end];
    if let Some(rest) = s[end..].strip_prefix('\n') {
        return (window, rest);
    }
    if let Some(i) = window.rfind('\n').filter(|&i| i > code_start) {
        return (&s[..i], &s[i + 1..]);
    }

    (window, &s[end..])
}

/// The fenced code block still open at the end of `text`, if any.
fn scan_fences(text: &str, carried: Option<&str>) -> Option<OpenFence> {
    let mut open = carried.map(|line| OpenFence {
        line: line.to_string(),
        line_start: 0,
        code_start: 0,
    });
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim();
        if trimmed.starts_with(FENCE) {
            open = match open {
                Some(_) => None,
                None => Some(OpenFence {
                    line: trimmed.to_string(),
                    line_start,
                    code_start: offset,
                }),
            };
        }
    }
    open
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
