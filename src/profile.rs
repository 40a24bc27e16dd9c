//! Profile activation
//!
//! The selected profile is carried in [`S3ClientConfig`] and handed to the
//! client constructor; nothing process-wide is touched.

use crate::s3::{ProfileManager, S3ClientConfig};

/// Profile used when `--profile` is not given
pub const DEFAULT_PROFILE: &str = "production";

/// Select `profile` on top of `base` connection settings.
///
/// Never fails: an unknown or incomplete profile is only logged, the real
/// error comes from the storage client on the first request.
pub fn activate(profile: &str, base: S3ClientConfig) -> S3ClientConfig {
    match ProfileManager::load() {
        Ok(manager) => check(&manager, profile),
        Err(e) => tracing::debug!("Could not read AWS profiles: {:#}", e),
    }

    S3ClientConfig {
        profile_name: Some(profile.to_string()),
        ..base
    }
}

fn check(manager: &ProfileManager, profile: &str) {
    match manager.validate(profile) {
        Ok(profile_type) => {
            tracing::debug!("Using profile '{}' ({})", profile, profile_type.as_str())
        }
        Err(problem) if manager.get_profile(profile).is_none() && manager.has_profiles() => {
            tracing::warn!(
                "{} (known profiles: {}); requests may fail to authenticate",
                problem,
                manager.profile_names().join(", ")
            )
        }
        Err(problem) => tracing::warn!("{}; requests may fail to authenticate", problem),
    }
}
