//! Live channel resolution.
//!
//! Channels expose a list of streaming servers, each with a quality ladder
//! of stream paths relative to the server root.

use kilde::{
    AssetKind, Format, FormatHints, KildeError, KildeResult, ManifestFetcher, Transport,
};
use serde::Deserialize;
use tracing::warn;
use url::Url;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ChannelPayload {
    pub title: Option<String>,
    pub primary_image_uri: Option<String>,
    pub streaming_servers: Vec<StreamingServer>,
}

impl ChannelPayload {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct StreamingServer {
    pub server: Option<String>,
    pub link_type: Option<String>,
    pub qualities: Vec<Quality>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Quality {
    pub kbps: Option<u64>,
    pub streams: Vec<StreamPayload>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct StreamPayload {
    pub stream: Option<String>,
}

/// A resolved live channel.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveChannel {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub formats: Vec<Format>,
    pub is_live: bool,
}

/// Walks every streaming server and expands its manifests.
///
/// A server answering 403 marks the channel as possibly geo-fenced; if no
/// server yields a format and at least one was forbidden, the whole channel
/// is reported as geo-restricted. Other fetch failures are warnings.
pub async fn resolve_channel(
    channel: &ChannelPayload,
    fetcher: &dyn ManifestFetcher,
) -> KildeResult<LiveChannel> {
    let mut formats = Vec::new();
    let mut forbidden = false;

    for streaming_server in &channel.streaming_servers {
        let Some(server) = streaming_server.server.as_deref() else {
            continue;
        };
        let link_type = streaming_server.link_type.as_deref().unwrap_or_default();
        let transport = match link_type {
            "HLS" => Transport::HLS,
            "DASH" | "DASH_B" => Transport::DASH,
            // The remaining HDS endpoints answer 400 or not at all.
            _ => continue,
        };

        for quality in &streaming_server.qualities {
            for stream in &quality.streams {
                let Some(stream_path) = stream.stream.as_deref() else {
                    continue;
                };
                let Ok(stream_url) = stream_url(server, stream_path) else {
                    continue;
                };

                let hints = FormatHints {
                    format_id: link_type.to_string(),
                    preference: None,
                };
                match fetcher
                    .fetch_formats(&stream_url, transport, AssetKind::VideoResource, &hints)
                    .await
                {
                    Ok(more) => formats.extend(more),
                    Err(error) if error.is_forbidden() => forbidden = true,
                    Err(error) => warn!("unable to fetch {link_type} stream: {error}"),
                }
            }
        }
    }

    if forbidden && formats.is_empty() {
        return Err(KildeError::GeoRestricted(crate::geo_countries()));
    }

    Ok(LiveChannel {
        title: channel.title.clone(),
        thumbnail: channel.primary_image_uri.clone(),
        formats,
        is_live: true,
    })
}

/// The streaming edge wants an explicit empty bitrate selector.
fn stream_url(server: &str, path: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(&format!("{server}/{path}"))?;
    url.set_query(Some("b="));
    Ok(url.to_string())
}
