//! External tool detection and management.
//!
//! Matroska tags are edited with MKVToolNix: `mkvpropedit` writes, `mkvextract`
//! reads. [`MkvToolnix::discover`] resolves both once so that a missing tool
//! surfaces as a configuration error before a batch starts.

use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Tool that writes Matroska tags in place.
pub const MKVPROPEDIT: &str = "mkvpropedit";

/// Tool that dumps Matroska tags as XML.
pub const MKVEXTRACT: &str = "mkvextract";

/// Information about an external tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// A configured path wins over `PATH` lookup when it resolves.
///
/// # Example
///
/// ```no_run
/// use episodist_av::check_tool;
///
/// let info = check_tool("mkvpropedit", None);
/// if info.available {
///     println!("mkvpropedit version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str, configured: Option<&Path>) -> ToolInfo {
    let Ok(path) = get_tool_path(name, configured) else {
        return ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        };
    };

    match Command::new(&path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            ToolInfo {
                name: name.to_string(),
                available: true,
                version,
                path: Some(path),
            }
        }
        _ => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: Some(path),
        },
    }
}

/// Check the MKVToolNix binaries used for Matroska tagging.
pub fn check_tools(propedit: Option<&Path>, extract: Option<&Path>) -> Vec<ToolInfo> {
    vec![
        check_tool(MKVPROPEDIT, propedit),
        check_tool(MKVEXTRACT, extract),
    ]
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
///
/// The configured value may be an existing file or a bare program name that is
/// looked up on `PATH`; when neither resolves the default `name` is searched.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        if let Ok(found) = which::which(path) {
            return Ok(found);
        }
        tracing::warn!(
            "Configured {} path {:?} not found, falling back to PATH",
            name,
            path
        );
    }

    require_tool(name)
}

/// Resolved MKVToolNix executables. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MkvToolnix {
    pub propedit: Option<PathBuf>,
    pub extract: Option<PathBuf>,
}

impl MkvToolnix {
    /// Resolve both tools from configured overrides and `PATH`.
    pub fn discover(propedit: Option<&Path>, extract: Option<&Path>) -> Self {
        Self {
            propedit: get_tool_path(MKVPROPEDIT, propedit).ok(),
            extract: get_tool_path(MKVEXTRACT, extract).ok(),
        }
    }

    /// Path to `mkvpropedit`, or a tool-not-found error.
    pub fn require_propedit(&self) -> Result<&Path> {
        self.propedit
            .as_deref()
            .ok_or_else(|| Error::tool_not_found(MKVPROPEDIT))
    }

    /// Path to `mkvextract`, or a tool-not-found error.
    pub fn require_extract(&self) -> Result<&Path> {
        self.extract
            .as_deref()
            .ok_or_else(|| Error::tool_not_found(MKVEXTRACT))
    }
}
