// ABOUTME: Slug and record key helpers
// ABOUTME: Every collection key is derived from the request title slug

/// Lowercase the title and replace anything outside `[a-z0-9_-]` with `_`
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

pub fn request_key(slug: &str) -> String {
    slug.to_string()
}

pub fn draft_key(slug: &str) -> String {
    format!("{}.draft", slug)
}

pub fn scheduled_key(slug: &str) -> String {
    format!("{}.scheduled", slug)
}

pub fn posted_key(slug: &str) -> String {
    format!("{}.posted", slug)
}
