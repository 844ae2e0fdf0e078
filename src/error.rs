//! Error types and handling for Packwright
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Packwright operations
#[derive(Error, Diagnostic, Debug)]
pub enum PackwrightError {
    // Resolution errors
    #[error("No candidate bundles to choose from")]
    #[diagnostic(
        code(packwright::resolve::empty_candidate_set),
        help("The listing returned no entries for this name")
    )]
    EmptyCandidateSet,

    #[error("Unknown bundle: {name}")]
    #[diagnostic(
        code(packwright::resolve::unknown_bundle),
        help("Check the bundle name, or add the repo that lists it with 'packwright repo add <source>'")
    )]
    UnknownBundle { name: String },

    #[error("Could not resolve asset {name} ({cid})")]
    #[diagnostic(
        code(packwright::resolve::unresolvable_asset),
        help("No listing knows this content identifier. Add the owning repo with 'packwright repo add <source>'")
    )]
    UnresolvableAsset { cid: String, name: String },

    #[error("Invalid bundle descriptor: {input}")]
    #[diagnostic(
        code(packwright::resolve::invalid_descriptor),
        help("Descriptors have the form <kind>:<name>@<version>#<content-id>")
    )]
    InvalidDescriptor { input: String },

    // Fetch errors
    #[error("Failed to fetch {uri}: {reason}")]
    #[diagnostic(code(packwright::fetch::failed))]
    FetchFailed { uri: String, reason: String },

    #[error("Failed to clone repository: {url}")]
    #[diagnostic(
        code(packwright::fetch::git_clone_failed),
        help("Check that the URL is correct and you have access to the repository")
    )]
    GitCloneFailed { url: String, reason: String },

    // Content store errors
    #[error("Content mismatch: expected {expected}, got {actual}")]
    #[diagnostic(
        code(packwright::store::content_mismatch),
        help("The fetched content does not match the listed identifier. The listing may be stale or tampered with")
    )]
    ContentMismatch { expected: String, actual: String },

    #[error("Invalid content identifier: {input}")]
    #[diagnostic(
        code(packwright::store::invalid_content_id),
        help("Content identifiers have the form blake3:<64 hex digits>")
    )]
    InvalidContentId { input: String },

    #[error("Bundle {name} has no uri to fetch from")]
    #[diagnostic(code(packwright::store::missing_uri))]
    MissingUri { name: String },

    // Publish errors
    #[error("Failed to publish to {target}: {reason}")]
    #[diagnostic(code(packwright::publish::failed))]
    PublishFailed { target: String, reason: String },

    // Machine errors
    #[error("Drive {name} overlaps {other} in the same address range")]
    #[diagnostic(
        code(packwright::machine::drive_overlap),
        help("Pick a disjoint --start/--length for the new drive")
    )]
    DriveOverlap { name: String, other: String },

    #[error("Invalid hexadecimal value: {value}")]
    #[diagnostic(
        code(packwright::machine::invalid_hex),
        help("Drive offsets are hex strings such as 0x8000000000000000")
    )]
    InvalidHexValue { value: String },

    #[error("Drive kind not supported for machine entries: {kind}")]
    #[diagnostic(code(packwright::machine::unsupported_drive))]
    UnsupportedDriveKind { kind: String },

    #[error("Drive {name} is missing its start/length geometry")]
    #[diagnostic(
        code(packwright::machine::missing_geometry),
        help("ram entries need --length; flash entries need --start and --length")
    )]
    MissingDriveGeometry { name: String },

    #[error("Machine package descriptor not found: {path}")]
    #[diagnostic(
        code(packwright::machine::descriptor_missing),
        help("Run 'packwright machine init' to create one")
    )]
    DescriptorMissing { path: String },

    #[error("Machine build failed: {diagnostics}")]
    #[diagnostic(
        code(packwright::machine::build_failed),
        help("The diagnostics above come verbatim from the build container")
    )]
    BuildFailed { diagnostics: String },

    // Repo errors. The uri fields must not be named `source`, or thiserror
    // would wire them up as the std::error::Error cause chain.
    #[error("Listing source unreachable: {uri}")]
    #[diagnostic(
        code(packwright::repo::source_unreachable),
        help("The source must serve a readable bundles.json listing")
    )]
    ListingSourceUnreachable { uri: String, reason: String },

    #[error("Repo source not registered: {uri}")]
    #[diagnostic(code(packwright::repo::unknown_source))]
    UnknownRepoSource { uri: String },

    // Configuration errors
    #[error("Failed to parse {path}: {reason}")]
    #[diagnostic(code(packwright::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Could not determine home directory")]
    #[diagnostic(
        code(packwright::config::home_not_found),
        help("Set PACKWRIGHT_HOME to a writable directory")
    )]
    HomeDirNotFound,

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(packwright::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(packwright::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(packwright::fs::io_error))]
    IoError { message: String },

    // Prompt errors
    #[error("Selection cancelled: {message}")]
    #[diagnostic(code(packwright::prompt::cancelled))]
    PromptFailed { message: String },
}

impl From<std::io::Error> for PackwrightError {
    fn from(err: std::io::Error) -> Self {
        PackwrightError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PackwrightError {
    fn from(err: serde_json::Error) -> Self {
        PackwrightError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for PackwrightError {
    fn from(err: git2::Error) -> Self {
        PackwrightError::FetchFailed {
            uri: "unknown".to_string(),
            reason: err.message().to_string(),
        }
    }
}

impl From<ureq::Error> for PackwrightError {
    fn from(err: ureq::Error) -> Self {
        let reason = match err {
            ureq::Error::StatusCode(code) => format!("HTTP {}", code),
            other => other.to_string(),
        };
        PackwrightError::FetchFailed {
            uri: "unknown".to_string(),
            reason,
        }
    }
}

impl From<inquire::InquireError> for PackwrightError {
    fn from(err: inquire::InquireError) -> Self {
        PackwrightError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias for Packwright operations
pub type Result<T> = std::result::Result<T, PackwrightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PackwrightError::UnknownBundle {
            name: "dapp-test-data".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown bundle: dapp-test-data");
    }

    #[test]
    fn test_error_code() {
        let err = PackwrightError::EmptyCandidateSet;
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("packwright::resolve::empty_candidate_set".to_string())
        );
    }

    #[test]
    fn test_content_mismatch_display() {
        let err = PackwrightError::ContentMismatch {
            expected: "blake3:aa".to_string(),
            actual: "blake3:bb".to_string(),
        };
        assert!(err.to_string().contains("blake3:aa"));
        assert!(err.to_string().contains("blake3:bb"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PackwrightError = io_err.into();
        assert!(matches!(err, PackwrightError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("not json");
        let err: PackwrightError = parse_result.unwrap_err().into();
        assert!(matches!(err, PackwrightError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_git_error_conversion() {
        let git_err = git2::Error::from_str("remote hung up");
        let err: PackwrightError = git_err.into();
        assert!(matches!(err, PackwrightError::FetchFailed { .. }));
    }

    #[test]
    fn test_repo_errors_carry_plain_uris_not_cause_chains() {
        use std::error::Error;

        // the uri fields are data, not wrapped errors
        let err = PackwrightError::ListingSourceUnreachable {
            uri: "/srv/bundles".to_string(),
            reason: "missing listing".to_string(),
        };
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "Listing source unreachable: /srv/bundles");

        let err = PackwrightError::UnknownRepoSource {
            uri: "/srv/bundles".to_string(),
        };
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "Repo source not registered: /srv/bundles");
    }

    #[test]
    fn test_unresolvable_asset_help_mentions_repo_add() {
        let err = PackwrightError::UnresolvableAsset {
            cid: "blake3:ab".to_string(),
            name: "root".to_string(),
        };
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("repo add"));
    }
}
