//!
//! Key generation and hex-encoded key files.
//!
//! Keys are provisioned out-of-band: the authority host receives `<name>.key`
//! (private) and every verifier host receives only `<name>.pub`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{SuiteSigner, SuiteVerifier};
use crate::error::{ConfigError, CryptoError};
use crate::types::AlgSuite;

/// Paths of a written key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFiles {
    pub private: PathBuf,
    pub public: PathBuf,
}

fn io_err(path: &Path, err: std::io::Error) -> ConfigError {
    ConfigError::Io { path: path.display().to_string(), reason: err.to_string() }
}

fn read_hex(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    hex::decode(text.trim()).map_err(|e| {
        ConfigError::Key(CryptoError::InvalidKey(format!("{}: {}", path.display(), e)))
    })
}

fn write_private(path: &Path, contents: &str) -> Result<(), ConfigError> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(|e| io_err(path, e))?;
    file.write_all(contents.as_bytes()).map_err(|e| io_err(path, e))
}

/// Writes `signer` and its public half into `dir` as `<name>.key` / `<name>.pub`.
///
/// Refuses to overwrite an existing private key file.
pub fn write_keypair(dir: &Path, name: &str, signer: &SuiteSigner) -> Result<KeyFiles, ConfigError> {
    let files = KeyFiles {
        private: dir.join(format!("{}.key", name)),
        public: dir.join(format!("{}.pub", name)),
    };
    write_private(&files.private, &hex::encode(signer.secret_bytes()))?;
    fs::write(&files.public, hex::encode(signer.verifier().to_bytes()))
        .map_err(|e| io_err(&files.public, e))?;
    tracing::info!(suite = %signer.suite(), path = %files.public.display(), "wrote key pair");
    Ok(files)
}

/// Generates a new key pair for `suite` and writes it into `dir`.
pub fn generate_keypair(dir: &Path, name: &str, suite: AlgSuite) -> Result<KeyFiles, ConfigError> {
    write_keypair(dir, name, &SuiteSigner::generate(suite))
}

pub fn read_signer(suite: AlgSuite, path: &Path) -> Result<SuiteSigner, ConfigError> {
    Ok(SuiteSigner::from_bytes(suite, &read_hex(path)?)?)
}

pub fn read_verifier(suite: AlgSuite, path: &Path) -> Result<SuiteVerifier, ConfigError> {
    Ok(SuiteVerifier::from_bytes(suite, &read_hex(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{TokenSigner, TokenVerifier};

    #[test]
    fn test_generate_and_reload_keypair() {
        let dir = tempfile::tempdir().unwrap();
        for suite in [AlgSuite::Classic, AlgSuite::Fips] {
            let name = suite.to_string();
            let files = generate_keypair(dir.path(), &name, suite).unwrap();
            let signer = read_signer(suite, &files.private).unwrap();
            let verifier = read_verifier(suite, &files.public).unwrap();
            let sig = signer.sign(b"payload").unwrap();
            assert!(verifier.verify(b"payload", &sig).is_ok());
        }
    }

    #[test]
    fn test_private_key_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        generate_keypair(dir.path(), "authority", AlgSuite::Classic).unwrap();
        let second = generate_keypair(dir.path(), "authority", AlgSuite::Classic);
        assert!(matches!(second, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_read_rejects_non_hex() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.pub");
        fs::write(&path, "zz-not-hex").unwrap();
        assert!(matches!(
            read_verifier(AlgSuite::Classic, &path),
            Err(ConfigError::Key(CryptoError::InvalidKey(_)))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.key");
        assert!(matches!(read_signer(AlgSuite::Fips, &missing), Err(ConfigError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_private_key_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let files = generate_keypair(dir.path(), "authority", AlgSuite::Classic).unwrap();
        let mode = fs::metadata(&files.private).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
