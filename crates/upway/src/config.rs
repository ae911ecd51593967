//! CLI-side configuration: the shared `upway-config` crate plus
//! `GlobalOpts` overrides.

use std::time::Duration;

use upway_config::{Config, Profile};
use upway_core::{ClientConfig, DataService};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use upway_config::{config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Service selected by flag, else by the active profile.
pub fn selected_service(global: &GlobalOpts, config: &Config) -> Option<DataService> {
    global.service.map(DataService::from).or_else(|| {
        let name = active_profile_name(global, config);
        config.profiles.get(&name).and_then(|p| p.service)
    })
}

/// Build a validated `ClientConfig` from the config file, the active
/// profile, and CLI overrides (flag > env > profile).
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        // No profile: everything comes from flags and env vars.
        None if global.service.is_some() => Profile::default(),
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let mut builder = upway_config::profile_to_builder(
        &profile,
        &profile_name,
        global.service.map(DataService::from),
    )?;

    if let Some(ref username) = global.username {
        builder = builder.username(username.clone());
    }
    if let Some(id) = global.heatpump_id {
        builder = builder.heatpump_id(id);
    }
    if let Some(ref client_id) = global.client_id {
        builder = builder.client_id(client_id.clone());
    }

    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);
    builder = builder.timeout(Duration::from_secs(timeout));

    Ok(builder.build()?)
}
