pub mod aggregate;
pub mod dispatch;
pub mod error;
pub mod manifest;
pub mod model;
pub mod resolve;
pub mod restrict;
pub mod subtitle;
pub mod uri;
mod util;

pub use error::{KildeError, KildeResult};
pub use manifest::{
    FormatHints, HttpManifestFetcher, HttpProber, ManifestError, ManifestFetcher, Prober,
};
pub use model::{
    AssetKind, AssetTarget, Format, ProviderProfile, RawAsset, RawLink, RawSubtitle,
    ResolutionResult, Subtitle, Transport,
};
pub use resolve::Resolver;
pub use uri::{decrypt_uri, DecryptError};
