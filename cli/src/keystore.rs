//! Plain key files.
//!
//! A key pair named `nickname` lives in two files under the key directory:
//! `<nickname>_<algorithm>` holds the base58 secret key and
//! `<nickname>_<algorithm>.pub` the base58 public key. The directory is
//! created `0o700` and the secret file `0o600` on unix.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use iost_sdk::crypto::{Algorithm, KeyPair};

const MAX_NICKNAME_LEN: usize = 16;
const FORBIDDEN_CHARS: &[char] = &['?', '*', ':', '|', '/', '\\'];

#[derive(Debug, Clone)]
pub struct KeyStore {
    dir: PathBuf,
}

impl KeyStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the secret key file.
    pub fn key_path(&self, nickname: &str, algorithm: Algorithm) -> Result<PathBuf> {
        validate_nickname(nickname)?;
        Ok(self.dir.join(format!("{nickname}_{}", algorithm.name())))
    }

    /// Writes `keypair` under `nickname`. Refuses to replace an existing key
    /// unless `overwrite` is set.
    pub fn save(&self, nickname: &str, keypair: &KeyPair, overwrite: bool) -> Result<PathBuf> {
        let path = self.key_path(nickname, keypair.algorithm())?;
        if path.exists() && !overwrite {
            bail!("key file already exists: {}", path.display());
        }

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create key directory: {}", self.dir.display()))?;
        restrict(&self.dir, 0o700)?;

        let pub_path = public_path(&path);
        fs::write(&pub_path, keypair.public_key_base58())
            .with_context(|| format!("failed to write public key to {}", pub_path.display()))?;
        fs::write(&path, keypair.secret_key_base58())
            .with_context(|| format!("failed to write secret key to {}", path.display()))?;
        restrict(&path, 0o600)?;

        tracing::debug!(path = %path.display(), account_id = keypair.id(), "key pair saved");
        Ok(path)
    }

    /// Reads the key pair stored under `nickname`.
    pub fn load(&self, nickname: &str, algorithm: Algorithm) -> Result<KeyPair> {
        let path = self.key_path(nickname, algorithm)?;
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read key file: {}", path.display()))?;
        let keypair = KeyPair::from_base58(algorithm, contents.trim())
            .with_context(|| format!("corrupt key file: {}", path.display()))?;
        Ok(keypair)
    }
}

/// Nicknames are at most 16 characters and exclude `?*:|/\`.
pub fn validate_nickname(nickname: &str) -> Result<()> {
    if nickname.is_empty()
        || nickname.chars().count() > MAX_NICKNAME_LEN
        || nickname.contains(FORBIDDEN_CHARS)
    {
        bail!(
            "invalid nickname {nickname:?}: use 1 to {MAX_NICKNAME_LEN} characters, none of ?*:|/\\"
        );
    }
    Ok(())
}

fn public_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".pub");
    PathBuf::from(name)
}

#[cfg(unix)]
fn restrict(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("failed to restrict permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::new(dir.path().join("wallet"));

        for algorithm in Algorithm::ALL {
            let keypair = KeyPair::generate(algorithm);
            let path = store.save("id", &keypair, false).unwrap();
            assert!(path.ends_with(format!("id_{}", algorithm.name())));

            let loaded = store.load("id", algorithm).unwrap();
            assert_eq!(loaded, keypair);

            let public = fs::read_to_string(public_path(&path)).unwrap();
            assert_eq!(public, keypair.public_key_base58());
        }
    }

    #[test]
    fn refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::new(dir.path());
        let first = KeyPair::generate(Algorithm::Ed25519);
        let second = KeyPair::generate(Algorithm::Ed25519);

        store.save("alice", &first, false).unwrap();
        assert!(store.save("alice", &second, false).is_err());
        assert_eq!(store.load("alice", Algorithm::Ed25519).unwrap(), first);

        store.save("alice", &second, true).unwrap();
        assert_eq!(store.load("alice", Algorithm::Ed25519).unwrap(), second);
    }

    #[cfg(unix)]
    #[test]
    fn secret_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::new(dir.path());
        let path = store
            .save("id", &KeyPair::generate(Algorithm::Secp256k1), false)
            .unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn nickname_rules() {
        assert!(validate_nickname("id").is_ok());
        assert!(validate_nickname("sixteen_chars_ok").is_ok());
        assert!(validate_nickname("seventeen_chars_x").is_err());
        assert!(validate_nickname("").is_err());
        for bad in ["a?b", "a*b", "a:b", "a|b", "a/b", "a\\b"] {
            assert!(validate_nickname(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn missing_or_corrupt_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = KeyStore::new(dir.path());
        assert!(store.load("ghost", Algorithm::Ed25519).is_err());

        fs::write(dir.path().join("bad_ed25519"), "not base58 0OIl").unwrap();
        assert!(store.load("bad", Algorithm::Ed25519).is_err());
    }
}
