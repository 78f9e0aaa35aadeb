use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One tracked TikTok account from `config/profiles.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Account handle as entered in the config; may carry a leading `@`.
    pub handle: String,
    pub notes: Option<String>,
}

impl ProfileConfig {
    /// Canonical handle used for actor input and deduplication: trimmed,
    /// lowercased, leading `@` stripped.
    #[must_use]
    pub fn normalized_handle(&self) -> String {
        self.handle.trim().trim_start_matches('@').to_lowercase()
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    pub profiles: Vec<ProfileConfig>,
}

/// Load and validate the tracked-profiles configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profiles(path: &Path) -> Result<ProfilesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfilesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profiles_file: ProfilesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::ProfilesFileParse)?;

    validate_profiles(&profiles_file)?;

    Ok(profiles_file)
}

fn validate_profiles(profiles_file: &ProfilesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for profile in &profiles_file.profiles {
        let handle = profile.normalized_handle();

        if handle.is_empty() {
            return Err(ConfigError::Validation(
                "profile handle must be non-empty".to_string(),
            ));
        }

        if !handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(ConfigError::Validation(format!(
                "profile handle '{}' contains characters outside [a-z0-9_.]",
                profile.handle
            )));
        }

        if !seen.insert(handle.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate profile handle: '{handle}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(handle: &str) -> ProfileConfig {
        ProfileConfig {
            handle: handle.to_string(),
            notes: None,
        }
    }

    #[test]
    fn normalized_handle_strips_at_prefix() {
        assert_eq!(profile("@matchupvault").normalized_handle(), "matchupvault");
    }

    #[test]
    fn normalized_handle_lowercases_and_trims() {
        assert_eq!(
            profile("  Wrestler.Trivia ").normalized_handle(),
            "wrestler.trivia"
        );
    }

    #[test]
    fn validate_rejects_empty_handle() {
        let file = ProfilesFile {
            profiles: vec![profile("@")],
        };
        let err = validate_profiles(&file).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_invalid_characters() {
        let file = ProfilesFile {
            profiles: vec![profile("street slamdown")],
        };
        let err = validate_profiles(&file).unwrap_err();
        assert!(err.to_string().contains("characters"));
    }

    #[test]
    fn validate_rejects_duplicate_after_normalization() {
        let file = ProfilesFile {
            profiles: vec![profile("ragequitguy"), profile("@RageQuitGuy")],
        };
        let err = validate_profiles(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn validate_accepts_valid_handles() {
        let file = ProfilesFile {
            profiles: vec![
                profile("matchupvault"),
                profile("wrestler.trivia"),
                profile("call_the_moment"),
            ],
        };
        assert!(validate_profiles(&file).is_ok());
    }

    #[test]
    fn parse_profiles_yaml() {
        let yaml = "profiles:\n  - handle: \"@matchupvault\"\n  - handle: callthemoment\n    notes: highlight clips\n";
        let file: ProfilesFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.profiles.len(), 2);
        assert_eq!(file.profiles[0].normalized_handle(), "matchupvault");
        assert_eq!(file.profiles[1].notes.as_deref(), Some("highlight clips"));
    }

    #[test]
    fn load_profiles_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("profiles.yaml");
        assert!(
            path.exists(),
            "profiles.yaml missing at {path:?} — required for this test"
        );
        let result = load_profiles(&path);
        assert!(result.is_ok(), "failed to load profiles.yaml: {result:?}");
        let profiles_file = result.unwrap();
        assert!(!profiles_file.profiles.is_empty());
    }
}
