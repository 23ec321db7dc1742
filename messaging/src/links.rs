use regex::Regex;
use std::sync::OnceLock;

fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("URL pattern is valid"))
}

/// Every `http://` or `https://` link in `text`, in the order they appear.
/// A link runs until the next whitespace character.
pub fn extract_links(text: &str) -> Vec<&str> {
    url_regex().find_iter(text).map(|m| m.as_str()).collect()
}
