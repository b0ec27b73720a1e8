//! Geographic restriction detection.

use crate::model::Format;

/// True iff aggregation yielded nothing playable and at least one asset was
/// region-locked. Callers surface this with the permitted region set, not
/// as an internal error.
pub fn detect(formats: &[Format], any_asset_restricted: bool) -> bool {
    formats.is_empty() && any_asset_restricted
}
