//! Node identity — the long-term X25519 keypair a node is known by.
//!
//! The public key is what other nodes use to route messages to this node;
//! the private key never leaves this struct and is wiped from memory on
//! drop. Key material is stored as the raw 32 private-key bytes; the
//! public key is always re-derived on load.

use std::path::{Path, PathBuf};

use thiserror::Error;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::key::RecipientKey;

/// A node's long-term static X25519 keypair.
///
/// Generated once per node and stored persistently. The public key is the
/// node's routable identity; the private key is held for the transport
/// layer and never exposed directly.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Keypair {
    /// Private key — zeroized on drop.
    private: Zeroizing<[u8; 32]>,
    /// Public key — safe to share.
    pub public: [u8; 32],
}

impl Keypair {
    /// Generate a new random X25519 keypair.
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(rand::thread_rng());
        let public = PublicKey::from(&secret);
        Self {
            private: Zeroizing::new(secret.to_bytes()),
            public: *public.as_bytes(),
        }
    }

    /// Reconstruct a keypair from stored private key bytes.
    /// The public key is derived deterministically from the private key.
    pub fn from_private(private_bytes: [u8; 32]) -> Self {
        let secret = StaticSecret::from(private_bytes);
        let public = PublicKey::from(&secret);
        Self {
            private: Zeroizing::new(private_bytes),
            public: *public.as_bytes(),
        }
    }

    /// Serialize the private key for persistent storage.
    /// Store these bytes with restrictive permissions (mode 0600).
    pub fn private_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(*self.private)
    }

    /// The public key as a directory-ready recipient key.
    pub fn public_key(&self) -> RecipientKey {
        RecipientKey::from_bytes(self.public)
    }

    /// Load the keypair stored at `path`, or generate and store a new one.
    ///
    /// The stored form is exactly the 32 raw private-key bytes. A file of
    /// any other length is treated as corrupt rather than silently
    /// regenerated, since replacing a node's identity orphans every route
    /// other nodes hold for it.
    pub fn load_or_generate(path: &Path) -> Result<Self, IdentityError> {
        match std::fs::read(path) {
            Ok(bytes) => {
                let private: [u8; 32] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| IdentityError::BadLength(path.to_path_buf(), bytes.len()))?;
                let keypair = Self::from_private(private);
                tracing::info!(
                    path = %path.display(),
                    public_key = %keypair.public_key().fingerprint(),
                    "loaded identity keypair"
                );
                Ok(keypair)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let keypair = Self::generate();
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| IdentityError::Io(path.to_path_buf(), e))?;
                }
                let private = keypair.private_bytes();
                std::fs::write(path, &private[..])
                    .map_err(|e| IdentityError::Io(path.to_path_buf(), e))?;
                restrict_permissions(path);
                tracing::info!(
                    path = %path.display(),
                    public_key = %keypair.public_key().fingerprint(),
                    "generated identity keypair"
                );
                Ok(keypair)
            }
            Err(e) => Err(IdentityError::Io(path.to_path_buf(), e)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
        tracing::warn!(error = %e, path = %path.display(), "failed to restrict keypair permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("keypair I/O failed at {0}: {1}")]
    Io(PathBuf, std::io::Error),

    #[error("keypair file {0} is {1} bytes, expected 32")]
    BadLength(PathBuf, usize),
}

// ── Tests ─────────────────────────────────────────────────────────────────────
