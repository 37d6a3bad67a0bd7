//! Display helpers for directory cards.

/// Compact count label: below 1000 as is, otherwise `"12.3K+"`.
pub fn format_count(count: usize) -> String {
    if count >= 1000 {
        format!("{:.1}K+", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"<country> • <Category>"` as shown under a channel name.
pub fn display_meta(country_name: &str, category: &str) -> String {
    format!("{} • {}", country_name, capitalize_first(category))
}

/// Generated placeholder image labelled with the first `max_chars` of `name`.
pub fn placeholder_image(width: u32, height: u32, name: &str, max_chars: usize) -> String {
    let label: String = name.chars().take(max_chars).collect();
    format!(
        "https://placehold.co/{width}x{height}?text={}",
        urlencoding::encode(&label)
    )
}

/// Card-sized placeholder logo for channels without one.
pub fn placeholder_logo(name: &str) -> String {
    placeholder_image(320, 180, name, 10)
}
