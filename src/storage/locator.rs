//! Shareable locator
//!
//! The locator is the fragment of a share link: `https://host/quiz#node-id`.
//! On the command line it is seeded from `--link` or `--at` and read back
//! by `share`.

use url::Url;

use crate::domain::{Locator, NodeId};

/// A URL fragment naming the current node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentLocator {
    fragment: Option<String>,
}

impl FragmentLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the locator with a raw node id; blank ids are ignored
    pub fn from_fragment(fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        let trimmed = fragment.trim().trim_start_matches('#');
        Self {
            fragment: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    /// Seeds the locator from the fragment of a share link
    pub fn from_url(link: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(link)?;
        Ok(url
            .fragment()
            .map(|f| {
                let decoded = urlencoding::decode(f)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| f.to_string());
                Self::from_fragment(decoded)
            })
            .unwrap_or_default())
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

impl Locator for FragmentLocator {
    fn read(&self) -> Option<String> {
        self.fragment.clone()
    }

    fn write(&mut self, id: &NodeId) {
        self.fragment = Some(id.to_string());
    }
}
