//! Format collection and ordering.

use crate::manifest::Prober;
use crate::model::Format;

/// Formats expanded from HLS sub-playlists carry this id prefix.
const HLS_PREFIX: &str = "HLS-";

/// Stable HLS-last partition: two output buffers, relative order within
/// each preserved.
pub fn partition_hls_last(formats: Vec<Format>) -> (Vec<Format>, Vec<Format>) {
    let mut rest = Vec::with_capacity(formats.len());
    let mut hls = Vec::new();
    for format in formats {
        if format.format_id.starts_with(HLS_PREFIX) {
            hls.push(format);
        } else {
            rest.push(format);
        }
    }
    (rest, hls)
}

/// Reorders collected formats: probed non-HLS formats first, HLS
/// sub-playlists last.
///
/// The non-HLS partition passes through the reachability collaborator,
/// which may silently drop entries; HLS sub-playlists are trusted without a
/// probe. Duplicate format ids are tolerated.
pub async fn aggregate(formats: Vec<Format>, prober: &dyn Prober) -> Vec<Format> {
    let (rest, hls) = partition_hls_last(formats);

    let mut verified = Vec::with_capacity(rest.len() + hls.len());
    for format in rest {
        if prober.is_reachable(&format).await {
            verified.push(format);
        } else {
            tracing::debug!("dropping unreachable format {}", format.format_id);
        }
    }

    verified.extend(hls);
    verified
}
