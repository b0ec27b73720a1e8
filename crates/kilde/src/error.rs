use thiserror::Error;

use crate::manifest::ManifestError;
use crate::uri::DecryptError;

#[derive(Error, Debug)]
pub enum KildeError {
    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Expected failure: the provider refuses to serve this program outside
    /// the listed regions.
    #[error("this program is only available in: {}", .0.join(", "))]
    GeoRestricted(Vec<String>),

    #[error("no playable source found")]
    NoPlayableSource,
}

pub type KildeResult<T> = Result<T, KildeError>;
