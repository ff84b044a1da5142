//! Article references
//!
//! A reference is any string containing the source domain marker. Nothing
//! else about the URL is checked. The path after the marker doubles as the
//! addressable location (slug) of a summary.

use crate::errors::{Result, SummaryError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain marker every accepted reference must contain
pub const DEFAULT_DOMAIN_MARKER: &str = "techcrunch.com";

/// Host that deep-link slugs are resolved against
pub const DEFAULT_ARTICLE_HOST: &str = "https://techcrunch.com/";

/// Host used when building shareable summary links
pub const DEFAULT_SHARE_HOST: &str = "https://techcrunchsummary.com/";

/// Rules for accepting and locating articles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRules {
    pub domain_marker: String,
    pub article_host: String,
    pub share_host: String,
}

impl Default for SourceRules {
    fn default() -> Self {
        Self {
            domain_marker: DEFAULT_DOMAIN_MARKER.to_string(),
            article_host: DEFAULT_ARTICLE_HOST.to_string(),
            share_host: DEFAULT_SHARE_HOST.to_string(),
        }
    }
}

/// Validated article identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleReference(String);

impl ArticleReference {
    /// Accept `input` unchanged if it contains the domain marker
    pub fn validate(input: &str, rules: &SourceRules) -> Result<Self> {
        if !input.contains(rules.domain_marker.as_str()) {
            return Err(SummaryError::InvalidDomain {
                input: input.to_string(),
            });
        }
        Ok(Self(input.to_string()))
    }

    /// Build a reference from deep-link path segments
    pub fn from_slug<S: AsRef<str>>(segments: &[S], rules: &SourceRules) -> Result<Self> {
        let slug = Slug::from_segments(segments)?;
        let url = format!("{}{}", rules.article_host, slug);
        Self::validate(&url, rules)
    }

    /// Path after the domain marker, e.g. `/2023/01/31/example`
    ///
    /// None when nothing follows the marker.
    pub fn path(&self, rules: &SourceRules) -> Option<&str> {
        let idx = self.0.find(rules.domain_marker.as_str())?;
        let rest = &self.0[idx + rules.domain_marker.len()..];
        if rest.trim_matches('/').is_empty() {
            None
        } else {
            Some(rest)
        }
    }

    /// Slug of this reference
    pub fn slug(&self, rules: &SourceRules) -> Result<Slug> {
        let path = self.path(rules).ok_or_else(|| {
            SummaryError::MalformedSlug(format!("no article path in {}", self.0))
        })?;
        Slug::parse(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty list of non-empty path segments
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(Vec<String>);

impl Slug {
    /// Parse a `/`-separated path; a single leading and trailing `/` is ignored
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(SummaryError::MalformedSlug("empty path".to_string()));
        }
        let segments: Vec<&str> = trimmed.split('/').collect();
        Self::from_segments(&segments)
    }

    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Result<Self> {
        if segments.is_empty() {
            return Err(SummaryError::MalformedSlug("no path segments".to_string()));
        }
        let mut owned = Vec::with_capacity(segments.len());
        for (i, seg) in segments.iter().enumerate() {
            let seg = seg.as_ref();
            if seg.is_empty() || seg.contains('/') {
                return Err(SummaryError::MalformedSlug(format!(
                    "segment {} is invalid: {:?}",
                    i, seg
                )));
            }
            owned.push(seg.to_string());
        }
        Ok(Self(owned))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Location form with a leading slash
    pub fn to_path(&self) -> String {
        format!("/{}", self)
    }

    /// Shareable link on `share_host`
    pub fn share_link(&self, rules: &SourceRules) -> String {
        format!("{}{}", rules.share_host, self)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_techcrunch() {
        let rules = SourceRules::default();
        let url = "https://techcrunch.com/2023/01/31/example";
        let reference = ArticleReference::validate(url, &rules).unwrap();
        assert_eq!(reference.as_str(), url);
    }

    #[test]
    fn test_validate_rejects_other_domain() {
        let rules = SourceRules::default();
        let err = ArticleReference::validate("https://example.com/article", &rules).unwrap_err();
        assert!(matches!(err, SummaryError::InvalidDomain { .. }));
    }

    #[test]
    fn test_validate_is_substring_only() {
        // No structural checks beyond the marker
        let rules = SourceRules::default();
        assert!(ArticleReference::validate("techcrunch.com", &rules).is_ok());
        assert!(ArticleReference::validate("not a url techcrunch.com/x", &rules).is_ok());
        assert!(ArticleReference::validate("", &rules).is_err());
    }

    #[test]
    fn test_path_component() {
        let rules = SourceRules::default();
        let reference =
            ArticleReference::validate("https://techcrunch.com/2023/01/31/example", &rules).unwrap();
        assert_eq!(reference.path(&rules), Some("/2023/01/31/example"));

        let bare = ArticleReference::validate("https://techcrunch.com/", &rules).unwrap();
        assert_eq!(bare.path(&rules), None);
        assert!(matches!(bare.slug(&rules), Err(SummaryError::MalformedSlug(_))));
    }

    #[test]
    fn test_from_slug() {
        let rules = SourceRules::default();
        let reference =
            ArticleReference::from_slug(&["2023", "01", "31", "example"], &rules).unwrap();
        assert_eq!(reference.as_str(), "https://techcrunch.com/2023/01/31/example");
    }

    #[test]
    fn test_from_slug_rejects_empty() {
        let rules = SourceRules::default();
        let empty: [&str; 0] = [];
        assert!(matches!(
            ArticleReference::from_slug(&empty, &rules),
            Err(SummaryError::MalformedSlug(_))
        ));
        assert!(matches!(
            ArticleReference::from_slug(&["2023", ""], &rules),
            Err(SummaryError::MalformedSlug(_))
        ));
    }

    #[test]
    fn test_slug_parse_and_share_link() {
        let rules = SourceRules::default();
        let slug = Slug::parse("/2023/01/31/example/").unwrap();
        assert_eq!(slug.segments().len(), 4);
        assert_eq!(slug.to_path(), "/2023/01/31/example");
        assert_eq!(
            slug.share_link(&rules),
            "https://techcrunchsummary.com/2023/01/31/example"
        );
        assert!(Slug::parse("/").is_err());
        assert!(Slug::parse("a//b").is_err());
    }
}
