//! Node addresses — where a peer can be reached.
//!
//! A `NodeAddr` is scheme + host + port, nothing else. It is parsed once,
//! stored in canonical parts, and compared structurally: two addresses are
//! equal exactly when their canonical textual forms are equal. Everything
//! downstream (the directory's peer set, route values, config entries,
//! the wire representation in API responses) works in terms of this one
//! canonical form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A reachable location for a node: `scheme://host:port`.
///
/// Immutable once constructed. Scheme and host are lowercased and the
/// port is always explicit (scheme defaults applied at parse time), so
/// `http://Node-A` and `http://node-a:80` canonicalize to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeAddr {
    scheme: String,
    host: String,
    port: u16,
}

impl NodeAddr {
    /// Parse and canonicalize an address string.
    ///
    /// Accepts `http` and `https` only. Rejects anything beyond the
    /// endpoint itself — a path, userinfo, query, or fragment means the
    /// caller is holding a URL, not a node address.
    pub fn parse(s: &str) -> Result<Self, AddrError> {
        let url = Url::parse(s)?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(AddrError::UnsupportedScheme(scheme.to_string()));
        }

        if !url.username().is_empty() || url.password().is_some() {
            return Err(AddrError::UnexpectedUserinfo);
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(AddrError::UnexpectedQueryOrFragment);
        }
        let path = url.path();
        if !path.is_empty() && path != "/" {
            return Err(AddrError::UnexpectedPath(path.to_string()));
        }

        let host = url.host_str().ok_or(AddrError::MissingHost)?.to_string();
        let port = url.port_or_known_default().ok_or(AddrError::MissingPort)?;

        Ok(Self {
            scheme: scheme.to_string(),
            host,
            port,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl FromStr for NodeAddr {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NodeAddr {
    type Error = AddrError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<NodeAddr> for String {
    fn from(addr: NodeAddr) -> Self {
        addr.to_string()
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AddrError {
    #[error("not a valid address: {0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("address has no host")]
    MissingHost,

    #[error("address has no port and the scheme has no default")]
    MissingPort,

    #[error("address must not carry a path (got {0:?})")]
    UnexpectedPath(String),

    #[error("address must not carry userinfo")]
    UnexpectedUserinfo,

    #[error("address must not carry a query or fragment")]
    UnexpectedQueryOrFragment,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
