use url::Url;

/// A uri the downstream player can actually open.
pub(crate) fn is_http_uri(uri: &str) -> bool {
    Url::parse(uri)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
