//! Preview image selection and iframe capability by host.
//!
//! Preferred sources supply trustworthy previews, so the embeddability
//! question is never asked for them and `iframe_allowed` stays unset.

use url::Url;

use crate::defaults::{EMBEDDABLE_HOSTS, PREFERRED_OG_HOSTS};

/// Outcome of preview selection for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDecision {
    pub og_image: Option<String>,
    pub is_og_image_preferred: bool,
    /// Always `Some` unless the host is a preferred source.
    pub iframe_allowed: Option<bool>,
}

/// Static host allow-lists, built once at startup.
#[derive(Debug, Clone)]
pub struct HostPolicy {
    preferred: Vec<String>,
    embeddable: Vec<String>,
}

impl Default for HostPolicy {
    fn default() -> Self {
        Self {
            preferred: PREFERRED_OG_HOSTS.iter().map(|s| s.to_string()).collect(),
            embeddable: EMBEDDABLE_HOSTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl HostPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add preferred hosts on top of the built-in list. Blank entries are
    /// skipped and entries are lower-cased.
    pub fn with_extra_preferred<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for host in hosts {
            let host = host.as_ref().trim().to_ascii_lowercase();
            if !host.is_empty() && !self.preferred.contains(&host) {
                self.preferred.push(host);
            }
        }
        self
    }

    /// Case-insensitive substring match against the preferred list.
    pub fn is_preferred(&self, host: &str) -> bool {
        contains_any(host, &self.preferred)
    }

    /// Case-insensitive substring match against the embeddable list.
    pub fn is_embeddable(&self, host: &str) -> bool {
        contains_any(host, &self.embeddable)
    }

    /// Decide the preview image and iframe capability for a submission.
    ///
    /// A direct media URL is its own preview and overrides any scraped image.
    pub fn resolve(
        &self,
        submitted_url: &str,
        parsed: &Url,
        scraped_image: Option<String>,
        is_direct_media: bool,
    ) -> PreviewDecision {
        let og_image = if is_direct_media {
            Some(submitted_url.to_string())
        } else {
            scraped_image
        };

        let host = parsed.host_str().unwrap_or_default();
        if self.is_preferred(host) {
            return PreviewDecision {
                og_image,
                is_og_image_preferred: true,
                iframe_allowed: None,
            };
        }

        PreviewDecision {
            og_image,
            is_og_image_preferred: false,
            iframe_allowed: Some(self.is_embeddable(host)),
        }
    }
}

fn contains_any(host: &str, needles: &[String]) -> bool {
    let host = host.to_ascii_lowercase();
    needles.iter().any(|n| host.contains(n.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(url: &str, scraped: Option<&str>, direct: bool) -> PreviewDecision {
        let parsed = Url::parse(url).unwrap();
        HostPolicy::new().resolve(url, &parsed, scraped.map(str::to_string), direct)
    }

    #[test]
    fn test_direct_media_overrides_scraped_image() {
        let d = decide(
            "https://example.com/a.png",
            Some("https://example.com/og.png"),
            true,
        );
        assert_eq!(d.og_image.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn test_scraped_image_used_for_pages() {
        let d = decide(
            "https://example.com/post",
            Some("https://example.com/og.png"),
            false,
        );
        assert_eq!(d.og_image.as_deref(), Some("https://example.com/og.png"));

        let d = decide("https://example.com/post", None, false);
        assert!(d.og_image.is_none());
    }

    #[test]
    fn test_preferred_host_leaves_iframe_unset() {
        let d = decide("https://medium.com/@someone/story", None, false);
        assert!(d.is_og_image_preferred);
        assert_eq!(d.iframe_allowed, None);
    }

    #[test]
    fn test_preferred_host_match_is_case_insensitive_substring() {
        let d = decide("https://WWW.Pinterest.co.uk/pin/1", None, false);
        assert!(d.is_og_image_preferred);
    }

    #[test]
    fn test_embeddable_host_allows_iframe() {
        let d = decide("https://www.youtube.com/watch?v=abc", None, false);
        assert!(!d.is_og_image_preferred);
        assert_eq!(d.iframe_allowed, Some(true));
    }

    #[test]
    fn test_unknown_host_is_explicitly_not_embeddable() {
        let d = decide("https://example.com/", None, false);
        assert!(!d.is_og_image_preferred);
        assert_eq!(d.iframe_allowed, Some(false));
    }

    #[test]
    fn test_extra_preferred_hosts() {
        let policy = HostPolicy::new().with_extra_preferred([" Dribbble.com ", ""]);
        assert!(policy.is_preferred("dribbble.com"));
        assert!(policy.is_preferred("imdb.com"));
        assert!(!policy.is_preferred("example.com"));
    }
}
