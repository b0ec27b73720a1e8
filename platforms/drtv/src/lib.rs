pub mod live;
mod model;

pub use model::{AssetPayload, LinkPayload, ProgramCard, SubtitlePayload};

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use kilde::{KildeError, KildeResult, ProviderProfile, ResolutionResult, Resolver};

/// Shared secret DR mixes into stream uri key derivation.
const URI_SECRET: &str = "sRBzYNXBzkKgnjj8pGtkACch";

/// Regions DR is allowed to serve.
const GEO_COUNTRIES: [&str; 3] = ["DK", "FO", "GL"];

/// DR's provider constants, ready to hand to a [`Resolver`].
pub fn profile() -> ProviderProfile {
    ProviderProfile {
        secret: URI_SECRET.to_string(),
        languages: HashMap::from([("Danish".to_string(), "da".to_string())]),
        default_language: "da".to_string(),
        countries: GEO_COUNTRIES.iter().map(|c| c.to_string()).collect(),
    }
}

pub(crate) fn geo_countries() -> Vec<String> {
    GEO_COUNTRIES.iter().map(|c| c.to_string()).collect()
}

/// One resolved program: presentation metadata around the playable media.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub title: Option<String>,
    pub description: Option<String>,
    pub broadcast_time: Option<DateTime<FixedOffset>>,
    pub series: Option<String>,
    pub season: Option<String>,
    pub season_number: Option<u32>,
    pub episode: Option<String>,
    pub episode_number: Option<u32>,
    pub release_year: Option<u16>,
    pub media: ResolutionResult,
}

/// Resolves a programcard into playable media.
///
/// A geo-restricted outcome surfaces as [`KildeError::GeoRestricted`]
/// carrying the permitted regions; it is an expected condition, not a bug.
pub async fn extract(card: &ProgramCard, resolver: &Resolver) -> KildeResult<Program> {
    let assets = card.assets();
    let media = resolver.resolve(&assets).await?;
    if media.is_geo_restricted {
        return Err(KildeError::GeoRestricted(
            resolver.profile().countries.clone(),
        ));
    }

    Ok(Program {
        title: card.title.clone(),
        description: card.description.clone(),
        broadcast_time: broadcast_time(card),
        series: card.series_title.clone(),
        season: card.season_title.clone(),
        season_number: card.season_number,
        episode: card.episode_title.clone(),
        episode_number: card.episode_number,
        release_year: card.production_year,
        media,
    })
}

/// The broadcast start when the card has one, else the sort timestamp.
fn broadcast_time(card: &ProgramCard) -> Option<DateTime<FixedOffset>> {
    card.primary_broadcast_start_time
        .as_deref()
        .or(card.sort_date_time.as_deref())
        .and_then(|timestamp| DateTime::parse_from_rfc3339(timestamp).ok())
}
