//! Schema location handling
//!
//! Schema locations are URLs, file paths, or opaque identifiers (URNs,
//! catalog keys). Import hints are frequently relative and are joined
//! against the location of the document that contains them.

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Resource location - can be a URL, file path, or opaque identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// URL (http, https, ftp, etc.)
    Url(Url),
    /// Opaque identifier such as a URN, resolved through catalogs
    Literal(String),
}

impl Location {
    /// Classify a location string
    pub fn parse(s: &str) -> Location {
        if let Ok(url) = Url::parse(s) {
            match url.scheme() {
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return Location::Path(path);
                    }
                }
                "urn" => return Location::Literal(s.to_string()),
                // single letter schemes are Windows drive letters
                scheme if scheme.len() > 1 => return Location::Url(url),
                _ => {}
            }
        }
        Location::Path(PathBuf::from(s))
    }

    /// Get the location as a string
    pub fn as_string(&self) -> String {
        match self {
            Location::Path(p) => p.to_string_lossy().to_string(),
            Location::Url(u) => u.to_string(),
            Location::Literal(s) => s.clone(),
        }
    }

    /// Check if this is a remote location (URL)
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }

    /// Resolve `relative` against this location.
    ///
    /// Absolute hints are returned as they are. Relative hints are joined
    /// against the directory of a path or by URL reference resolution.
    pub fn join(&self, relative: &str) -> Result<Location> {
        if is_absolute(relative) {
            return Ok(Location::parse(relative));
        }
        match self {
            Location::Url(base) => Ok(Location::Url(base.join(relative)?)),
            Location::Path(base) => {
                let dir = base.parent().unwrap_or_else(|| Path::new(""));
                Ok(Location::Path(dir.join(relative)))
            }
            Location::Literal(_) => Ok(Location::parse(relative)),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

/// Whether a location string stands on its own (URL, URN or absolute path)
pub fn is_absolute(location: &str) -> bool {
    match Location::parse(location) {
        Location::Url(_) | Location::Literal(_) => true,
        Location::Path(p) => p.is_absolute(),
    }
}
