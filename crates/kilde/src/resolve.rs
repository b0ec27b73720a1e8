//! Resolution coordination over one provider's raw asset list.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::dispatch::{self, LinkContext};
use crate::error::{KildeError, KildeResult};
use crate::manifest::{ManifestFetcher, Prober};
use crate::model::{AssetKind, ProviderProfile, RawAsset, ResolutionResult};
use crate::{aggregate, restrict, subtitle, util};

/// Resolves raw provider assets into a normalized format list.
///
/// All state lives in the asset list being walked; resolving two videos
/// concurrently needs no shared locks.
pub struct Resolver {
    profile: ProviderProfile,
    fetcher: Box<dyn ManifestFetcher>,
    prober: Box<dyn Prober>,
}

impl Resolver {
    pub fn new(
        profile: ProviderProfile,
        fetcher: Box<dyn ManifestFetcher>,
        prober: Box<dyn Prober>,
    ) -> Self {
        Self {
            profile,
            fetcher,
            prober,
        }
    }

    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    /// Resolves one asset list.
    ///
    /// Individual link failures degrade to warnings. The call itself only
    /// fails when nothing playable remains and no region restriction
    /// explains it.
    pub async fn resolve(&self, assets: &[RawAsset]) -> KildeResult<ResolutionResult> {
        let mut formats = Vec::new();
        let mut subtitles = BTreeMap::new();
        let mut thumbnail = None;
        let mut duration_ms = None;
        let mut restricted = false;

        for asset in assets {
            match asset.kind {
                // Last image asset wins, even one without a usable uri.
                AssetKind::Image => {
                    thumbnail = asset
                        .links
                        .iter()
                        .find_map(|link| link.uri.as_deref().filter(|uri| util::is_http_uri(uri)))
                        .map(str::to_string);
                }
                AssetKind::VideoResource | AssetKind::AudioResource => {
                    duration_ms = duration_ms.max(asset.duration_ms);
                    restricted |= asset.restricted_to_region;

                    let ctx = LinkContext::new(asset.kind, &asset.target);
                    for link in &asset.links {
                        let resolved =
                            dispatch::dispatch(link, &ctx, &self.profile.secret, self.fetcher.as_ref())
                                .await;
                        formats.extend(resolved);
                    }
                }
            }

            subtitle::collect(asset, &self.profile, &mut subtitles);
        }

        let formats = aggregate::aggregate(formats, self.prober.as_ref()).await;

        let is_geo_restricted = restrict::detect(&formats, restricted);
        if formats.is_empty() && !is_geo_restricted {
            return Err(KildeError::NoPlayableSource);
        }

        Ok(ResolutionResult {
            formats,
            subtitles,
            is_geo_restricted,
            thumbnail,
            duration: duration_ms.map(Duration::from_millis),
        })
    }
}
