//! Obfuscated stream uri resolution.
//!
//! Providers that hide their stream locations hand out a framed hex token:
//! a two-digit tag, an 8-hex-digit big-endian length of the ciphertext
//! segment, the AES-256-CBC ciphertext, then the IV. The IV doubles as key
//! material: the key is `SHA-256("<iv hex text>:<secret>")`.

use aes::cipher::{BlockDecryptMut, KeyIvInit};
use sha2::{Digest, Sha256};
use thiserror::Error;

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const BLOCK_SIZE: usize = 16;

#[derive(Error, Debug)]
pub enum DecryptError {
    #[error("token too short")]
    TruncatedToken,

    #[error("invalid ciphertext length field")]
    InvalidLength(#[from] std::num::ParseIntError),

    #[error(transparent)]
    HexDecode(#[from] hex::FromHexError),

    #[error("ciphertext is not block aligned: {0} bytes")]
    BlockAlignment(usize),

    #[error("invalid iv length: {0}")]
    InvalidIv(usize),

    #[error("declared padding of {pad} bytes exceeds {len} byte plaintext")]
    InvalidPadding { pad: usize, len: usize },

    #[error("decrypted uri is not utf-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Decrypts an obfuscated stream uri token.
///
/// The plaintext carries a volatile query string which is always discarded.
/// Any malformed token fails with [`DecryptError`]; callers treat that as a
/// per-link skip, not a fatal condition.
pub fn decrypt_uri(token: &str, secret: &str) -> Result<String, DecryptError> {
    let length = token.get(2..10).ok_or(DecryptError::TruncatedToken)?;
    let length = usize::from_str_radix(length, 16)?;

    let ciphertext = token
        .get(10..10 + length)
        .ok_or(DecryptError::TruncatedToken)?;
    let iv_hex = &token[10 + length..];

    let mut data = hex::decode(ciphertext)?;
    let iv: [u8; BLOCK_SIZE] = hex::decode(iv_hex)?
        .try_into()
        .map_err(|iv: Vec<u8>| DecryptError::InvalidIv(iv.len()))?;
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(DecryptError::BlockAlignment(data.len()));
    }

    // The IV enters key derivation as hex text, not as raw bytes.
    let key = Sha256::digest(format!("{iv_hex}:{secret}"));
    let mut decryptor = Aes256CbcDec::new(&key, &iv.into());
    for block in data.chunks_exact_mut(BLOCK_SIZE) {
        decryptor.decrypt_block_mut(block.into());
    }

    // Only the declared padding count is honoured; the padding bytes
    // themselves are not checked against it. Providers do not emit strict
    // PKCS#7 here.
    let pad = data[data.len() - 1] as usize;
    if pad == 0 || pad > data.len() {
        return Err(DecryptError::InvalidPadding {
            pad,
            len: data.len(),
        });
    }
    data.truncate(data.len() - pad);

    let uri = String::from_utf8(data)?;
    Ok(uri.split('?').next().unwrap_or_default().to_string())
}
