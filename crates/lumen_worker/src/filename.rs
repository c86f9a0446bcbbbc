use sha2::{Digest, Sha256};

/// Deterministic cache name for a resource: `{sanitized_file}--{short_hash(url)}`.
///
/// The hash keeps two resources with the same display name apart.
pub fn cache_filename(file: &str, url: &str) -> String {
    let sanitized = sanitize(file);
    let hash = short_hash(url);
    format!("{sanitized}--{hash}")
}

/// Output name for a processed image: `{stem}--{short_hash(source)}.png`.
pub fn processed_filename(source: &str) -> String {
    let stem = source
        .rsplit(['/', '\\'])
        .next()
        .map(|name| name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name))
        .unwrap_or(source);
    format!("{}--{}.png", sanitize(stem), short_hash(source))
}

fn sanitize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);
    if cleaned.is_empty() {
        return "resource".to_string();
    }
    // Collapse runs of underscores.
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    if compacted.len() > 80 {
        let mut end = 80;
        while !compacted.is_char_boundary(end) {
            end -= 1;
        }
        compacted.truncate(end);
    }
    compacted
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
