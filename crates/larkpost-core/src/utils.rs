//! Path and display helpers shared by the library and the CLI.

use std::path::PathBuf;

/// The Larkpost data directory (`~/.larkpost`), or `./.larkpost` when no
/// home directory is known.
pub fn get_data_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".larkpost")
}

/// Resolve a user-supplied path, expanding a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match dirs_next::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Render a chunk on one line for previews: line breaks become `⏎` and the
/// result is cut to `max_chars` characters, ending in `…` when cut.
pub fn one_line_preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', "⏎");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
