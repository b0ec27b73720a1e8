//! Subtitle track collection and language normalization.

use std::collections::BTreeMap;

use crate::model::{ProviderProfile, RawAsset, Subtitle};
use crate::util;

const DEFAULT_EXT: &str = "vtt";

/// Collects one asset's subtitle references into the shared language map.
///
/// Declared language names normalize through the profile's lookup table;
/// unknown names pass through unchanged. Multiple references for the same
/// code accumulate in declaration order.
pub fn collect(
    asset: &RawAsset,
    profile: &ProviderProfile,
    subtitles: &mut BTreeMap<String, Vec<Subtitle>>,
) {
    for subtitle in &asset.subtitles {
        let Some(url) = subtitle.uri.as_deref().filter(|uri| util::is_http_uri(uri)) else {
            continue;
        };

        let declared = subtitle
            .language
            .clone()
            .unwrap_or_else(|| profile.default_language.clone());
        let language = profile
            .languages
            .get(&declared)
            .cloned()
            .unwrap_or(declared);
        let ext = subtitle
            .mime_type
            .as_deref()
            .and_then(mime_to_ext)
            .unwrap_or(DEFAULT_EXT);

        subtitles.entry(language.clone()).or_default().push(Subtitle {
            language,
            url: url.to_string(),
            ext: ext.to_string(),
        });
    }
}

fn mime_to_ext(mime: &str) -> Option<&'static str> {
    match mime {
        "text/vtt" | "text/webvtt" => Some("vtt"),
        "application/ttml+xml" | "application/ttaf+xml" => Some("ttml"),
        "application/x-subrip" | "text/srt" => Some("srt"),
        _ => None,
    }
}
