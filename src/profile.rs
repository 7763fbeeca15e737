// src/profile.rs
//! Website-profile contract: the record the scraping collaborator hands us,
//! plus normalization of the free-text fields before any keyword matching.

use serde::{Deserialize, Serialize};

/// One social link discovered on the creator's website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Everything the website-analysis collaborator derived from a creator's site.
/// All fields are optional-by-shape: an empty profile is valid input and yields
/// a near-base taste vector with floor confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteProfile {
    pub url: String,
    pub themes: Vec<String>,
    pub hints: Vec<String>,
    /// Absent and present-but-empty both mean "no declared type".
    pub content_type: Option<String>,
    pub social_links: Vec<SocialLink>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub audience_location: Option<String>,
}

impl WebsiteProfile {
    /// Concatenated metadata text (title + description + keywords), normalized.
    /// Used by the metadata-text signal pass.
    pub fn metadata_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(t) = &self.title {
            parts.push(normalize_text(t));
        }
        if let Some(d) = &self.description {
            parts.push(normalize_text(d));
        }
        if !self.keywords.is_empty() {
            parts.push(normalize_text(&self.keywords.join(" ")));
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }

    /// Rough input-richness check used by logging and the confidence floor tests.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
            && self.hints.is_empty()
            && self.content_type.as_deref().is_none_or(|ct| ct.trim().is_empty())
            && self.social_links.is_empty()
            && self.metadata_text().is_empty()
    }
}

/// Normalize scraped text: decode HTML entities, strip tags, collapse
/// whitespace, cap length. Scraped titles/descriptions routinely carry
/// entity noise and stray markup.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize curly quotes to ASCII
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Short anonymized id for a profile URL, safe for logs.
/// Never log the raw URL; creators' sites are identifying.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_entities_tags_and_ws() {
        let s = "  Luxury&nbsp;&amp; <b>Travel</b>   Diaries ";
        assert_eq!(normalize_text(s), "Luxury & Travel Diaries");
    }

    #[test]
    fn metadata_text_joins_present_fields_only() {
        let p = WebsiteProfile {
            title: Some("Nomad Notes".into()),
            description: None,
            keywords: vec!["travel".into(), "vanlife".into()],
            ..Default::default()
        };
        assert_eq!(p.metadata_text(), "Nomad Notes travel vanlife");
    }

    #[test]
    fn empty_profile_is_empty() {
        assert!(WebsiteProfile::default().is_empty());
        let with_theme = WebsiteProfile {
            themes: vec!["food".into()],
            ..Default::default()
        };
        assert!(!with_theme.is_empty());
        let with_blank_type = WebsiteProfile {
            content_type: Some("   ".into()),
            ..Default::default()
        };
        assert!(with_blank_type.is_empty());
    }

    #[test]
    fn anon_hash_is_stable_and_short() {
        let a = anon_hash("https://example.com");
        let b = anon_hash("https://example.com");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn profile_deserializes_camel_case() {
        let json = r#"{
            "url": "https://wanderwithmaya.com",
            "themes": ["adventure"],
            "contentType": "Travel & Adventure",
            "socialLinks": [{"platform": "youtube", "url": "https://youtube.com/@maya"}],
            "audienceLocation": "United States"
        }"#;
        let p: WebsiteProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.content_type.as_deref(), Some("Travel & Adventure"));
        assert_eq!(p.social_links[0].platform, "youtube");
        assert_eq!(p.audience_location.as_deref(), Some("United States"));
        assert!(p.hints.is_empty());
    }
}
