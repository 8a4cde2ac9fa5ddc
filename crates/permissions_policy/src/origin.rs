//! Canonical origins (scheme, host, port tuples).

use std::fmt;
use url::Url;

/// Represents an origin (scheme, host, port tuple).
///
/// This is the unit of same-origin comparison; every origin stored in a policy
/// is canonicalized through this type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Origin {
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl Origin {
    /// Parse an origin from a URL.
    pub fn from_url(url: &Url) -> Option<Self> {
        let scheme = url.scheme().to_lowercase();

        // Opaque origins for certain schemes
        if matches!(scheme.as_str(), "data" | "file" | "blob" | "javascript") {
            return None;
        }

        let host = url.host_str()?.to_lowercase();
        let port = url.port_or_known_default();

        Some(Self { scheme, host, port })
    }

    /// Parse an origin from a string URL. Path, query and fragment are dropped.
    pub fn parse(url_str: &str) -> Option<Self> {
        let url = Url::parse(url_str).ok()?;
        Self::from_url(&url)
    }

    /// Check if this origin is the same as another.
    pub fn is_same_origin(&self, other: &Origin) -> bool {
        self.scheme == other.scheme
            && self.host == other.host
            && self.effective_port() == other.effective_port()
    }

    /// Get the effective port (using default ports for known schemes).
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| match self.scheme.as_str() {
            "http" => 80,
            "https" => 443,
            "ws" => 80,
            "wss" => 443,
            "ftp" => 21,
            _ => 0,
        })
    }

    /// Serialize the origin to `scheme://host[:port]`, omitting default ports.
    pub fn serialize(&self) -> String {
        format!("{}", self)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let default_port = match self.scheme.as_str() {
            "http" | "ws" => Some(80),
            "https" | "wss" => Some(443),
            "ftp" => Some(21),
            _ => None,
        };

        if self.port.is_some() && self.port != default_port {
            write!(f, "{}://{}:{}", self.scheme, self.host, self.port.unwrap())
        } else {
            write!(f, "{}://{}", self.scheme, self.host)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_from_url() {
        let origin = Origin::parse("https://example.com/path").unwrap();
        assert_eq!(origin.scheme, "https");
        assert_eq!(origin.host, "example.com");
        assert_eq!(origin.effective_port(), 443);
    }

    #[test]
    fn test_serialize_drops_path_and_default_port() {
        let origin = Origin::parse("https://www.example.com:443/foo?q=1").unwrap();
        assert_eq!(origin.serialize(), "https://www.example.com");

        let origin = Origin::parse("https://www.example.com:3000/foo").unwrap();
        assert_eq!(origin.serialize(), "https://www.example.com:3000");
    }

    #[test]
    fn test_same_origin() {
        let origin1 = Origin::parse("https://example.com/path1").unwrap();
        let origin2 = Origin::parse("https://example.com/path2").unwrap();
        let origin3 = Origin::parse("http://example.com/path").unwrap();
        let origin4 = Origin::parse("https://other.com/path").unwrap();

        assert!(origin1.is_same_origin(&origin2));
        assert!(!origin1.is_same_origin(&origin3)); // Different scheme
        assert!(!origin1.is_same_origin(&origin4)); // Different host
    }

    #[test]
    fn test_origin_with_port() {
        let origin1 = Origin::parse("https://example.com:443/path").unwrap();
        let origin2 = Origin::parse("https://example.com/path").unwrap();
        let origin3 = Origin::parse("https://example.com:8443/path").unwrap();

        assert!(origin1.is_same_origin(&origin2)); // Same effective port
        assert!(!origin1.is_same_origin(&origin3)); // Different port
    }

    #[test]
    fn test_opaque_origins_fail() {
        assert!(Origin::parse("data:text/plain,hi").is_none());
        assert!(Origin::parse("not a url").is_none());
    }
}
