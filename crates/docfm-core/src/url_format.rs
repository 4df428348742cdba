//! # URL Format Check
//!
//! Backs the `url` string format of the frontmatter schema. A value is a
//! well-formed URL when it parses as an absolute URL, uses one of the
//! network schemes below, and names a host.

use url::Url;

/// Schemes accepted by [`is_well_formed_url`].
pub const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "git"];

/// Returns `true` if `input` is an absolute `http`, `https`, `ftp` or `git`
/// URL with a non-empty host.
pub fn is_well_formed_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => {
            URL_SCHEMES.contains(&url.scheme())
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_network_urls() {
        assert!(is_well_formed_url("https://example.com"));
        assert!(is_well_formed_url("https://cli.github.com/manual/"));
        assert!(is_well_formed_url("http://localhost:4000/en"));
        assert!(is_well_formed_url("git://github.com/atom/atom.git"));
    }

    #[test]
    fn rejects_relative_and_non_network() {
        assert!(!is_well_formed_url("not a url"));
        assert!(!is_well_formed_url("/en/github/getting-started"));
        assert!(!is_well_formed_url("mailto:someone@example.com"));
        assert!(!is_well_formed_url("javascript:alert(1)"));
        assert!(!is_well_formed_url(""));
    }
}
