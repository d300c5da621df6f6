//! URI parsing and cache key canonicalization.

use url::Url;

use crate::fetch::error::{FetchError, FetchResult};

/// Parse an absolute http(s) URI.
pub fn parse_uri(uri: &str) -> FetchResult<Url> {
    let url = Url::parse(uri.trim()).map_err(|e| FetchError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::InvalidUri {
            uri: uri.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Canonical string form used as the cache key.
///
/// Scheme and host are lowercased, default ports dropped, and the
/// fragment removed since it never reaches the server.
pub fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalent_uris_share_a_key() {
        let a = parse_uri("HTTP://Example.COM:80/weather?city=berlin").unwrap();
        let b = parse_uri("http://example.com/weather?city=berlin#today").unwrap();
        assert_eq!(cache_key(&a), cache_key(&b));
        assert_eq!(cache_key(&a), "http://example.com/weather?city=berlin");
    }

    #[test]
    fn test_query_is_part_of_key() {
        let a = parse_uri("https://example.com/weather?city=berlin").unwrap();
        let b = parse_uri("https://example.com/weather?city=paris").unwrap();
        assert_ne!(cache_key(&a), cache_key(&b));
    }

    #[test]
    fn test_rejects_relative_and_foreign_schemes() {
        assert!(matches!(
            parse_uri("/weather"),
            Err(FetchError::InvalidUri { .. })
        ));
        assert!(matches!(
            parse_uri("ftp://example.com/file"),
            Err(FetchError::InvalidUri { .. })
        ));
    }
}
