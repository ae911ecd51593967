//! Config subcommand handlers. None of these touch the network.

use dialoguer::{Input, Select};
use upway_config::{Config, Defaults, Profile};
use upway_core::DataService;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const KEYRING_SERVICE: &str = "upway";

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(service) = p.service {
            let _ = writeln!(out, "service = \"{}\"", service_key(service));
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(id) = p.heatpump_id {
            let _ = writeln!(out, "heatpump_id = {id}");
        }
        if let Some(ref id) = p.client_id {
            let _ = writeln!(out, "client_id = \"{id}\"");
        }
        if p.client_secret.is_some() {
            let _ = writeln!(out, "client_secret = \"****\"");
        }
        if let Some(ref env) = p.client_secret_env {
            let _ = writeln!(out, "client_secret_env = \"{env}\"");
        }
        if let Some(ref url) = p.base_url {
            let _ = writeln!(out, "base_url = \"{url}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Config file spelling of a service.
fn service_key(service: DataService) -> &'static str {
    match service {
        DataService::MyUpway => "myupway",
        DataService::MyUplink => "myuplink",
    }
}

/// Copy of the config with plaintext secrets masked, for structured output.
fn redacted(cfg: &Config) -> Config {
    let mask = |s: &Option<String>| s.as_ref().map(|_| "****".to_owned());
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            output: cfg.defaults.output.clone(),
            timeout: cfg.defaults.timeout,
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                let profile = Profile {
                    password: mask(&p.password),
                    client_secret: mask(&p.client_secret),
                    ..p.clone()
                };
                (name.clone(), profile)
            })
            .collect(),
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn keyring_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "keyring".into(),
        reason: format!("keyring access failed: {e}"),
    }
}

/// Prompt for a secret, rejecting empty input.
fn prompt_secret(prompt: &str, field: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

fn store_in_keyring(key: &str, secret: &str) -> Result<(), CliError> {
    keyring::Entry::new(KEYRING_SERVICE, key)
        .map_err(keyring_err)?
        .set_password(secret)
        .map_err(keyring_err)
}

/// Offer to store a secret in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    secret: &str,
    keyring_key: &str,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        store_in_keyring(keyring_key, secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

/// Interactive profile setup for one service.
fn prompt_profile(profile_name: &str) -> Result<Profile, CliError> {
    let services = &["myUplink API (client credentials)", "MyUpway portal (legacy login)"];
    let selection = Select::new()
        .with_prompt("Data service")
        .items(services)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        let client_id: String = Input::new()
            .with_prompt("Client id")
            .interact_text()
            .map_err(prompt_err)?;
        let secret = prompt_secret("Client secret: ", "client_secret")?;
        let client_secret = prompt_keyring_storage(
            &secret,
            &format!("{profile_name}/client-secret"),
            "client secret",
        )?;

        Ok(Profile {
            service: Some(DataService::MyUplink),
            client_id: Some(client_id),
            client_secret,
            ..Profile::default()
        })
    } else {
        let username: String = Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?;
        let heatpump_id: u64 = Input::new()
            .with_prompt("Heat pump id (from the portal URL)")
            .interact_text()
            .map_err(prompt_err)?;
        let secret = prompt_secret("Password: ", "password")?;
        let password =
            prompt_keyring_storage(&secret, &format!("{profile_name}/password"), "password")?;

        Ok(Profile {
            service: Some(DataService::MyUpway),
            username: Some(username),
            password,
            heatpump_id: Some(heatpump_id),
            ..Profile::default()
        })
    }
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    CliError::ProfileNotFound {
        name,
        available: config::available_profiles(cfg),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config_redacted)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("upway configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let profile = prompt_profile(&profile_name)?;

            // Keep other profiles when re-running init.
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: upway values");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: upway config init");
            } else {
                let lines: Vec<String> = cfg
                    .profiles
                    .keys()
                    .map(|name| {
                        let marker = if name == default { " *" } else { "" };
                        format!("{name}{marker}")
                    })
                    .collect();
                output::print_output(&lines.join("\n"), global.quiet);
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            let Some(prof) = cfg.profiles.get(&profile_name) else {
                return Err(profile_not_found(profile_name, &cfg));
            };

            match prof.service {
                Some(DataService::MyUplink) => {
                    let secret = prompt_secret("Client secret: ", "client_secret")?;
                    store_in_keyring(&format!("{profile_name}/client-secret"), &secret)?;
                }
                _ => {
                    let secret = prompt_secret("Password: ", "password")?;
                    store_in_keyring(&format!("{profile_name}/password"), &secret)?;
                }
            }

            eprintln!("✓ Secret stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                service: Some(DataService::MyUpway),
                username: Some("user@example.com".into()),
                password: Some("hunter2".into()),
                heatpump_id: Some(12345),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn shown_config_masks_secrets() {
        let text = format_config_redacted(&sample());
        assert!(text.contains("[profiles.home]"));
        assert!(text.contains("service = \"myupway\""));
        assert!(text.contains("password = \"****\""));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn structured_output_is_redacted_too() {
        let cfg = redacted(&sample());
        let home = &cfg.profiles["home"];
        assert_eq!(home.password.as_deref(), Some("****"));
        assert_eq!(home.username.as_deref(), Some("user@example.com"));
    }
}
