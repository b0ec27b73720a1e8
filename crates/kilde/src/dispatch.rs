//! Per-link transport dispatch.

use tracing::warn;

use crate::manifest::{FormatHints, ManifestFetcher};
use crate::model::{AssetKind, AssetTarget, Format, RawLink, Transport};
use crate::{uri, util};

/// Extra query the HDS endpoints require before they answer.
const HDS_QUERY: &str = "hdcore=3.3.0&plugin=aasp-3.3.0.99.43";

/// Per-asset context shared by every link of that asset.
#[derive(Debug, Clone)]
pub struct LinkContext<'a> {
    pub kind: AssetKind,
    pub target: &'a AssetTarget,
    pub preference: Option<i32>,
}

impl<'a> LinkContext<'a> {
    pub fn new(kind: AssetKind, target: &'a AssetTarget) -> Self {
        Self {
            kind,
            target,
            preference: target.preference(),
        }
    }

    fn format_id(&self, transport: Transport) -> String {
        let mut format_id = transport.label().to_string();
        if self.target.is_alternate() {
            format_id.push('-');
            format_id.push_str(self.target.name());
        }
        format_id
    }
}

/// Resolves one stream link into zero or more formats.
///
/// Never fails: undecryptable tokens, unusable uris and manifest fetch
/// errors degrade to a warning and an empty result so sibling links keep
/// resolving.
pub async fn dispatch(
    link: &RawLink,
    ctx: &LinkContext<'_>,
    secret: &str,
    fetcher: &dyn ManifestFetcher,
) -> Vec<Format> {
    let uri = match (&link.uri, &link.encrypted_uri) {
        (Some(uri), _) => uri.clone(),
        (None, Some(token)) => match uri::decrypt_uri(token, secret) {
            Ok(uri) => uri,
            Err(error) => {
                warn!("unable to decrypt stream uri: {error}");
                return Vec::new();
            }
        },
        (None, None) => return Vec::new(),
    };

    if !util::is_http_uri(&uri) {
        return Vec::new();
    }

    let format_id = ctx.format_id(link.transport);
    let hints = FormatHints {
        format_id: format_id.clone(),
        preference: ctx.preference,
    };

    match link.transport {
        Transport::HDS => {
            let manifest_url = format!("{uri}?{HDS_QUERY}");
            let mut formats = fetch_or_warn(fetcher, &manifest_url, link.transport, ctx, &hints).await;
            if ctx.kind == AssetKind::AudioResource {
                // F4M manifests do not self-describe audio-only streams.
                for format in &mut formats {
                    format.video_codec = Some("none".to_string());
                }
            }
            formats
        }
        Transport::HLS | Transport::DASH => {
            fetch_or_warn(fetcher, &uri, link.transport, ctx, &hints).await
        }
        Transport::Direct => {
            let mut format_id = format_id;
            if let Some(bitrate) = link.bitrate {
                format_id.push_str(&format!("-{bitrate}"));
            }
            vec![Format {
                url: uri,
                format_id,
                ext: link.file_format.clone(),
                bitrate: link.bitrate,
                video_codec: (ctx.kind == AssetKind::AudioResource).then(|| "none".to_string()),
                preference: ctx.preference,
            }]
        }
    }
}

async fn fetch_or_warn(
    fetcher: &dyn ManifestFetcher,
    url: &str,
    transport: Transport,
    ctx: &LinkContext<'_>,
    hints: &FormatHints,
) -> Vec<Format> {
    match fetcher.fetch_formats(url, transport, ctx.kind, hints).await {
        Ok(formats) => formats,
        Err(error) => {
            warn!("unable to fetch {} manifest: {error}", transport.label());
            Vec::new()
        }
    }
}
