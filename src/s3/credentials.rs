//! AWS profile discovery
//!
//! Reads profile definitions from `~/.aws/config` and `~/.aws/credentials`
//! (or the files named by `AWS_CONFIG_FILE` / `AWS_SHARED_CREDENTIALS_FILE`).
//! The SDK does the actual credential resolution; this module only answers
//! "does this profile exist and does it look usable", so a bad `--profile`
//! can be reported before the first request fails with an opaque auth error.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Type of AWS profile based on its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileType {
    /// Profile with static credentials (access_key_id, secret_access_key)
    StaticCredentials,
    /// Profile that assumes a role from another profile
    AssumeRole,
    /// Profile using AWS SSO/IAM Identity Center
    Sso,
    /// Profile delegating to an external `credential_process`
    Process,
    /// Profile relying on the environment or instance metadata
    Environment,
    /// Nothing in the profile says where credentials come from
    Unknown,
}

impl ProfileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::StaticCredentials => "Static Credentials",
            ProfileType::AssumeRole => "Assume Role",
            ProfileType::Sso => "SSO",
            ProfileType::Process => "Credential Process",
            ProfileType::Environment => "Environment",
            ProfileType::Unknown => "Unknown",
        }
    }
}

/// One profile merged from both files
#[derive(Debug, Clone, Default)]
pub struct AwsProfile {
    pub name: String,
    pub region: Option<String>,
    pub source_profile: Option<String>,
    pub role_arn: Option<String>,
    pub credential_source: Option<String>,
    pub credential_process: Option<String>,
    pub sso_start_url: Option<String>,
    pub sso_region: Option<String>,
    pub sso_account_id: Option<String>,
    pub sso_role_name: Option<String>,
    pub sso_session: Option<String>,
    pub has_static_credentials: bool,
}

impl AwsProfile {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Classify the profile by the keys it defines
    pub fn profile_type(&self) -> ProfileType {
        if self.sso_start_url.is_some()
            || self.sso_session.is_some()
            || (self.sso_account_id.is_some() && self.sso_role_name.is_some())
        {
            ProfileType::Sso
        } else if self.role_arn.is_some() {
            ProfileType::AssumeRole
        } else if self.has_static_credentials {
            ProfileType::StaticCredentials
        } else if self.credential_process.is_some() {
            ProfileType::Process
        } else if self.credential_source.is_some() {
            ProfileType::Environment
        } else {
            ProfileType::Unknown
        }
    }
}

/// Profiles known from the local AWS configuration files
#[derive(Debug, Default)]
pub struct ProfileManager {
    profiles: HashMap<String, AwsProfile>,
}

impl ProfileManager {
    /// Load profiles from the standard locations
    pub fn load() -> Result<Self> {
        let aws_dir = dirs::home_dir()
            .map(|h| h.join(".aws"))
            .unwrap_or_else(|| PathBuf::from(".aws"));

        let config_path = std::env::var_os("AWS_CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| aws_dir.join("config"));
        let credentials_path = std::env::var_os("AWS_SHARED_CREDENTIALS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| aws_dir.join("credentials"));

        Self::from_files(&config_path, &credentials_path)
    }

    /// Load profiles from explicit file paths. Missing files are treated as empty.
    pub fn from_files(config_path: &Path, credentials_path: &Path) -> Result<Self> {
        let config = read_optional(config_path)
            .with_context(|| format!("Failed to read AWS config file {:?}", config_path))?;
        let credentials = read_optional(credentials_path).with_context(|| {
            format!("Failed to read AWS credentials file {:?}", credentials_path)
        })?;

        Ok(Self::from_sources(&config, &credentials))
    }

    /// Build from file contents
    pub fn from_sources(config: &str, credentials: &str) -> Self {
        let mut manager = Self::default();

        // credentials file sections are bare profile names
        for (section, entries) in parse_ini(credentials) {
            let profile = manager.entry(&section);
            let has_key = entries.iter().any(|(k, _)| k == "aws_access_key_id");
            let has_secret = entries.iter().any(|(k, _)| k == "aws_secret_access_key");
            profile.has_static_credentials |= has_key && has_secret;
        }

        // config file sections are `default` or `profile <name>`
        for (section, entries) in parse_ini(config) {
            let name = if section == "default" {
                "default"
            } else if let Some(name) = section.strip_prefix("profile ") {
                name.trim()
            } else {
                continue;
            };

            let profile = manager.entry(name);
            for (key, value) in entries {
                let slot = match key.as_str() {
                    "region" => &mut profile.region,
                    "source_profile" => &mut profile.source_profile,
                    "role_arn" => &mut profile.role_arn,
                    "credential_source" => &mut profile.credential_source,
                    "credential_process" => &mut profile.credential_process,
                    "sso_start_url" => &mut profile.sso_start_url,
                    "sso_region" => &mut profile.sso_region,
                    "sso_account_id" => &mut profile.sso_account_id,
                    "sso_role_name" => &mut profile.sso_role_name,
                    "sso_session" => &mut profile.sso_session,
                    "aws_access_key_id" | "aws_secret_access_key" => {
                        // static keys may also live in the config file
                        profile.has_static_credentials = true;
                        continue;
                    }
                    _ => continue,
                };
                *slot = Some(value);
            }
        }

        manager
    }

    fn entry(&mut self, name: &str) -> &mut AwsProfile {
        self.profiles
            .entry(name.to_string())
            .or_insert_with(|| AwsProfile::named(name))
    }

    /// All profile names, `default` first, the rest sorted
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.profiles.keys().cloned().collect();
        names.sort();
        if let Some(pos) = names.iter().position(|n| n == "default") {
            let default = names.remove(pos);
            names.insert(0, default);
        }
        names
    }

    /// Get a profile by name
    pub fn get_profile(&self, name: &str) -> Option<&AwsProfile> {
        self.profiles.get(name)
    }

    /// Check that a profile exists and is complete enough to authenticate.
    pub fn validate(&self, name: &str) -> std::result::Result<ProfileType, String> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| format!("Profile '{}' not found", name))?;

        let profile_type = profile.profile_type();
        match profile_type {
            ProfileType::Sso => validate_sso(profile)?,
            ProfileType::AssumeRole => self.validate_assume_role(profile)?,
            _ => {}
        }
        Ok(profile_type)
    }

    fn validate_assume_role(&self, profile: &AwsProfile) -> std::result::Result<(), String> {
        let Some(source) = &profile.source_profile else {
            if profile.credential_source.is_some() {
                return Ok(());
            }
            return Err("Assume-role profile needs source_profile or credential_source".into());
        };

        let mut visited = vec![profile.name.clone()];
        let mut current = source.clone();

        loop {
            if visited.contains(&current) {
                return Err(format!(
                    "Circular dependency in assume-role chain: {} -> {}",
                    visited.join(" -> "),
                    current
                ));
            }

            let next = self
                .profiles
                .get(&current)
                .ok_or_else(|| format!("Source profile '{}' not found", current))?;

            match (next.role_arn.is_some(), &next.source_profile) {
                (true, Some(source)) => {
                    visited.push(current);
                    current = source.clone();
                }
                // Anything else terminates the chain; the SDK decides whether
                // it actually yields credentials.
                _ => return Ok(()),
            }
        }
    }

    /// Check if any profiles are available
    pub fn has_profiles(&self) -> bool {
        !self.profiles.is_empty()
    }
}

fn validate_sso(profile: &AwsProfile) -> std::result::Result<(), String> {
    let mut missing = Vec::new();

    // With an sso-session reference the start URL and region live in that section
    if profile.sso_session.is_none() {
        if profile.sso_start_url.is_none() {
            missing.push("sso_start_url");
        }
        if profile.sso_region.is_none() {
            missing.push("sso_region");
        }
    }
    if profile.sso_account_id.is_none() {
        missing.push("sso_account_id");
    }
    if profile.sso_role_name.is_none() {
        missing.push("sso_role_name");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("SSO profile missing: {}", missing.join(", ")))
    }
}

fn read_optional(path: &Path) -> std::io::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e),
    }
}

/// Minimal INI reader: `[section]` headers and `key = value` lines.
/// Comment lines start with `#` or `;`. Keys outside a section are dropped.
fn parse_ini(content: &str) -> Vec<(String, Vec<(String, String)>)> {
    let mut sections: Vec<(String, Vec<(String, String)>)> = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push((section.trim().to_string(), Vec::new()));
        } else if let Some((key, value)) = line.split_once('=') {
            if let Some((_, entries)) = sections.last_mut() {
                entries.push((key.trim().to_string(), value.trim().to_string()));
            }
        }
    }

    sections
}
