//! Serde models of the mu-online programcard payload.

use kilde::{AssetKind, AssetTarget, RawAsset, RawLink, RawSubtitle, Transport};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProgramCard {
    pub title: Option<String>,
    pub description: Option<String>,
    pub primary_broadcast_start_time: Option<String>,
    pub sort_date_time: Option<String>,
    pub series_title: Option<String>,
    pub season_title: Option<String>,
    pub season_number: Option<u32>,
    pub season_urn: Option<String>,
    pub episode_title: Option<String>,
    pub episode_number: Option<u32>,
    pub production_year: Option<u16>,
    pub primary_asset: Option<AssetPayload>,
    pub secondary_assets: Vec<AssetPayload>,
}

impl ProgramCard {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The primary asset first, then secondaries in declaration order.
    /// Assets of a kind the engine does not know are dropped.
    pub fn assets(&self) -> Vec<RawAsset> {
        self.primary_asset
            .iter()
            .chain(self.secondary_assets.iter())
            .filter_map(AssetPayload::to_raw_asset)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssetPayload {
    pub kind: Option<String>,
    pub target: Option<String>,
    /// Image assets carry their uri here instead of in `Links`.
    pub uri: Option<String>,
    pub restricted_to_denmark: Option<bool>,
    pub duration_in_milliseconds: Option<f64>,
    pub links: Vec<LinkPayload>,
    // The provider emits both spellings.
    #[serde(alias = "Subtitleslist")]
    pub subtitles_list: Vec<SubtitlePayload>,
}

impl AssetPayload {
    pub fn to_raw_asset(&self) -> Option<RawAsset> {
        let kind = match self.kind.as_deref() {
            Some("Image") => AssetKind::Image,
            Some("VideoResource") => AssetKind::VideoResource,
            Some("AudioResource") => AssetKind::AudioResource,
            _ => return None,
        };

        let mut links: Vec<RawLink> = self.links.iter().map(LinkPayload::to_raw_link).collect();
        if kind == AssetKind::Image {
            if let Some(uri) = &self.uri {
                links.insert(
                    0,
                    RawLink {
                        uri: Some(uri.clone()),
                        transport: Transport::Direct,
                        ..Default::default()
                    },
                );
            }
        }

        Some(RawAsset {
            kind,
            target: AssetTarget::from_name(self.target.as_deref()),
            restricted_to_region: self.restricted_to_denmark.unwrap_or(false),
            duration_ms: self.duration_in_milliseconds.map(|ms| ms as u64),
            links,
            subtitles: self
                .subtitles_list
                .iter()
                .map(SubtitlePayload::to_raw_subtitle)
                .collect(),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct LinkPayload {
    pub uri: Option<String>,
    pub encrypted_uri: Option<String>,
    pub target: Option<String>,
    pub bitrate: Option<u64>,
    pub file_format: Option<String>,
}

impl LinkPayload {
    fn to_raw_link(&self) -> RawLink {
        RawLink {
            uri: self.uri.clone(),
            encrypted_uri: self.encrypted_uri.clone(),
            transport: transport_from_target(self.target.as_deref()),
            bitrate: self.bitrate,
            file_format: self.file_format.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct SubtitlePayload {
    pub uri: Option<String>,
    pub language: Option<String>,
    pub mime_type: Option<String>,
}

impl SubtitlePayload {
    fn to_raw_subtitle(&self) -> RawSubtitle {
        RawSubtitle {
            language: self.language.clone(),
            uri: self.uri.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Link targets name the delivery technology; anything unrecognized is a
/// progressive file.
fn transport_from_target(target: Option<&str>) -> Transport {
    match target {
        Some("HLS") => Transport::HLS,
        Some("DASH") | Some("DASH_B") => Transport::DASH,
        Some("HDS") => Transport::HDS,
        _ => Transport::Direct,
    }
}
