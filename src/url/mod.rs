//! URL handling module for Gleaner
//!
//! This module provides authority extraction, the domain filter that scopes
//! the crawl to a single host, and the skip-list matcher.

mod domain;
mod skiplist;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::extract_authority;
pub use skiplist::matches_skip_list;

/// A page's link set split by crawl scope
#[derive(Debug, Default)]
pub struct LinkPartition {
    /// Links on the target host, candidates for scheduling
    pub in_domain: Vec<Url>,

    /// Links off the target host, destined for the external-link log
    pub external: Vec<Url>,
}

/// Decides whether URLs belong to the crawl's target domain
///
/// Membership is exact authority equality with the seed URL's authority.
/// `blog.example.com` is out of domain for a crawl of `example.com`, as is
/// the same host on a different port.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    authority: String,
}

impl DomainFilter {
    /// Builds a filter scoped to the seed URL's host
    pub fn for_seed(seed: &Url) -> UrlResult<Self> {
        let authority = extract_authority(seed).ok_or(UrlError::MissingHost)?;
        Ok(Self { authority })
    }

    /// The authority this crawl is scoped to
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Returns true iff the URL's authority matches the target exactly
    pub fn is_in_domain(&self, url: &Url) -> bool {
        extract_authority(url).as_deref() == Some(self.authority.as_str())
    }

    /// Splits a page's link set into in-domain and external links
    ///
    /// Cross-page dedup is not done here; that is the ledger's job.
    pub fn partition(&self, links: Vec<Url>) -> LinkPartition {
        let mut partition = LinkPartition::default();
        for link in links {
            if self.is_in_domain(&link) {
                partition.in_domain.push(link);
            } else {
                partition.external.push(link);
            }
        }
        partition
    }
}
