//! Optional AES-256-GCM bulk encryption for indexed documents.
//!
//! Independent of the secure index: each document gets a fresh 32-byte key,
//! and the 12-byte random nonce is prepended to the ciphertext+tag blob.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{Error, Result};

pub const DATA_SUFFIX: &str = ".encrypted.data";
pub const DATA_KEY_SUFFIX: &str = ".encrypted.private";
pub const DATA_KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;

pub type DataKey = [u8; DATA_KEY_LEN];

/// Encrypts `plaintext` under a fresh random key; returns the key and the
/// `nonce || ciphertext+tag` blob.
pub fn encrypt(plaintext: &[u8]) -> Result<(DataKey, Vec<u8>)> {
    let mut key = [0u8; DATA_KEY_LEN];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(Error::RngUnavailable)?;
    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(Error::RngUnavailable)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| Error::Crypto("AES-GCM encryption failed".into()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok((key, blob))
}

/// Decrypts a `nonce || ciphertext+tag` blob.
pub fn decrypt(blob: &[u8], key: &DataKey) -> Result<Vec<u8>> {
    if blob.len() < NONCE_LEN {
        return Err(Error::Crypto(format!(
            "ciphertext shorter than the {NONCE_LEN}-byte nonce"
        )));
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::Crypto("AES-GCM authentication failed".into()))
}

/// Encrypts `doc_path` to `<doc_path>.encrypted.data` and drops the raw key
/// next to the owner's key material as `<name>.encrypted.private`.
/// Returns the (data, key) paths.
pub fn encrypt_file(doc_path: &Path, key_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let plaintext = fs::read(doc_path).map_err(|err| Error::io(doc_path, err))?;
    let (key, blob) = encrypt(&plaintext)?;

    let data_path = PathBuf::from(format!("{}{DATA_SUFFIX}", doc_path.display()));
    fs::write(&data_path, &blob).map_err(|err| Error::io(&data_path, err))?;

    let doc_name = doc_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::Precondition(format!("{} has no file name", doc_path.display())))?;
    let key_path = key_dir.join(format!("{doc_name}{DATA_KEY_SUFFIX}"));
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(&key_path)
        .map_err(|err| Error::io(&key_path, err))?;
    file.write_all(&key)
        .map_err(|err| Error::io(&key_path, err))?;

    Ok((data_path, key_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let (key, blob) = encrypt(b"down the rabbit hole").unwrap();
        assert_eq!(decrypt(&blob, &key).unwrap(), b"down the rabbit hole");
    }

    #[test]
    fn nonce_is_prepended_and_fresh() {
        let (_, a) = encrypt(b"same plaintext").unwrap();
        let (_, b) = encrypt(b"same plaintext").unwrap();
        assert_ne!(a[..NONCE_LEN], b[..NONCE_LEN]);
        assert_eq!(a.len(), NONCE_LEN + b"same plaintext".len() + 16);
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let (key, mut blob) = encrypt(b"integrity matters").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(matches!(decrypt(&blob, &key), Err(Error::Crypto(_))));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let (_, blob) = encrypt(b"secret").unwrap();
        assert!(matches!(decrypt(&blob, &[0u8; 32]), Err(Error::Crypto(_))));
    }

    #[test]
    fn short_blob_is_rejected() {
        assert!(matches!(decrypt(&[0u8; 4], &[0u8; 32]), Err(Error::Crypto(_))));
    }

    #[test]
    fn file_encryption_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("alice.txt");
        fs::write(&doc, b"curiouser and curiouser").unwrap();
        let (data_path, key_path) = encrypt_file(&doc, dir.path()).unwrap();
        assert_eq!(data_path, dir.path().join("alice.txt.encrypted.data"));
        assert_eq!(key_path, dir.path().join("alice.txt.encrypted.private"));

        let blob = fs::read(&data_path).unwrap();
        let key: DataKey = fs::read(&key_path).unwrap().try_into().unwrap();
        assert_eq!(decrypt(&blob, &key).unwrap(), b"curiouser and curiouser");
    }
}
