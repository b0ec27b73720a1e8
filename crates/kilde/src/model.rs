use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What a provider-declared asset carries.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    VideoResource,
    AudioResource,
}

/// Audience rendition of an asset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum AssetTarget {
    Default,
    SpokenSubtitles,
    SignLanguage,
    VisuallyInterpreted,
    Other(String),
}

impl AssetTarget {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("Default") => AssetTarget::Default,
            Some("SpokenSubtitles") => AssetTarget::SpokenSubtitles,
            Some("SignLanguage") => AssetTarget::SignLanguage,
            Some("VisuallyInterpreted") => AssetTarget::VisuallyInterpreted,
            Some(other) => AssetTarget::Other(other.to_string()),
            None => AssetTarget::Other(String::new()),
        }
    }

    /// Alternate-audience renditions are tagged in the format id and rank
    /// below everything else.
    pub fn is_alternate(&self) -> bool {
        matches!(
            self,
            AssetTarget::SpokenSubtitles
                | AssetTarget::SignLanguage
                | AssetTarget::VisuallyInterpreted
        )
    }

    pub fn name(&self) -> &str {
        match self {
            AssetTarget::Default => "Default",
            AssetTarget::SpokenSubtitles => "SpokenSubtitles",
            AssetTarget::SignLanguage => "SignLanguage",
            AssetTarget::VisuallyInterpreted => "VisuallyInterpreted",
            AssetTarget::Other(name) => name.as_str(),
        }
    }

    /// Relative ranking hint, independent of bitrate or resolution.
    pub fn preference(&self) -> Option<i32> {
        if self.is_alternate() {
            Some(-1)
        } else if matches!(self, AssetTarget::Default) {
            Some(1)
        } else {
            None
        }
    }
}

/// Streaming technology delivering one rendition.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    HLS,
    DASH,
    HDS,
    Direct,
}

impl Transport {
    /// Format id prefix. Direct files carry no transport tag.
    pub fn label(&self) -> &'static str {
        match self {
            Transport::HLS => "HLS",
            Transport::DASH => "DASH",
            Transport::HDS => "HDS",
            Transport::Direct => "",
        }
    }
}

/// One concrete stream reference within an asset.
///
/// Exactly one of `uri`/`encrypted_uri` is expected to be populated;
/// neither being set is a non-fatal skip.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RawLink {
    pub uri: Option<String>,
    pub encrypted_uri: Option<String>,
    pub transport: Transport,
    /// kbit/s, when the provider declares one.
    pub bitrate: Option<u64>,
    pub file_format: Option<String>,
}

/// A subtitle reference as the provider declares it.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RawSubtitle {
    pub language: Option<String>,
    pub uri: Option<String>,
    pub mime_type: Option<String>,
}

/// A provider-declared media resource plus its renditions.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RawAsset {
    pub kind: AssetKind,
    pub target: AssetTarget,
    pub restricted_to_region: bool,
    pub duration_ms: Option<u64>,
    pub links: Vec<RawLink>,
    pub subtitles: Vec<RawSubtitle>,
}

impl RawAsset {
    pub fn new(kind: AssetKind) -> Self {
        Self {
            kind,
            target: AssetTarget::Other(String::new()),
            restricted_to_region: false,
            duration_ms: None,
            links: Vec::new(),
            subtitles: Vec::new(),
        }
    }
}

/// A playable stream handed to the downstream selector.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub url: String,
    pub format_id: String,
    pub ext: Option<String>,
    /// kbit/s.
    pub bitrate: Option<u64>,
    /// `Some("none")` marks an audio-only stream.
    pub video_codec: Option<String>,
    pub preference: Option<i32>,
}

/// One subtitle track in its normalized form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Subtitle {
    pub language: String,
    pub url: String,
    pub ext: String,
}

/// Terminal artifact of one resolution call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub formats: Vec<Format>,
    pub subtitles: BTreeMap<String, Vec<Subtitle>>,
    pub is_geo_restricted: bool,
    pub thumbnail: Option<String>,
    pub duration: Option<Duration>,
}

/// Provider constants injected into the engine.
#[derive(Debug, Clone, Default)]
pub struct ProviderProfile {
    /// Shared secret mixed into stream uri key derivation.
    pub secret: String,
    /// Provider language names to short codes.
    pub languages: HashMap<String, String>,
    /// Language assumed when a subtitle declares none.
    pub default_language: String,
    /// Regions the provider is allowed to serve.
    pub countries: Vec<String>,
}
