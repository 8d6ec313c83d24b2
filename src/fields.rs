//! Assembles the set of form fields describing the new version, and reads
//! the account password from whichever source was selected.
//!
//! Field values come from two places with a fixed precedence: an explicit
//! CLI flag always wins, otherwise the corresponding manifest key is used,
//! otherwise the field is omitted entirely and the remote form keeps
//! whatever default it renders with.

use std::collections::BTreeMap;
use std::env;
use std::io::Read;

use serde_json::Value;

use crate::cli::{Cli, PasswordSource};
use crate::error::Error;
use crate::manifest;

/// Environment variable consulted by the `environment` password source.
pub const PASSWORD_ENV_VARIABLE: &str = "FVTT_PASSWORD";

// Field names on the remote "package-form", minus the `versions-{index}-`
// prefix added at submission time.
pub const VERSION_KEY: &str = "version";
pub const NOTES_KEY: &str = "notes";
pub const MANIFEST_KEY: &str = "manifest";
pub const MINIMUM_CORE_VERSION_KEY: &str = "required_core_version";
pub const VERIFIED_CORE_VERSION_KEY: &str = "compatible_core_version";
pub const MAXIMUM_CORE_VERSION_KEY: &str = "maximum_core_version";

/// Manifest dotted path -> form field, checked in order. The manifest's own
/// "manifest" URL is deliberately absent: it is a stable link to the latest
/// manifest, not to the specific version being published.
pub const MANIFEST_KEY_TO_FORM_KEY: &[(&str, &str)] = &[
    ("version", VERSION_KEY),
    ("changelog", NOTES_KEY),
    ("compatibility.minimum", MINIMUM_CORE_VERSION_KEY),
    ("compatibility.verified", VERIFIED_CORE_VERSION_KEY),
    ("compatibility.maximum", MAXIMUM_CORE_VERSION_KEY),
    // Deprecated pre-v10 manifest keys.
    ("minimumCoreVersion", MINIMUM_CORE_VERSION_KEY),
    ("compatibleCoreVersion", VERIFIED_CORE_VERSION_KEY),
];

/// Merge CLI flags and manifest values into the final field set, CLI first.
pub fn resolve_new_version_fields(
    cli: &Cli,
    manifest: Option<&Value>,
) -> Result<BTreeMap<String, String>, Error> {
    let mut fields = BTreeMap::new();

    let cli_values = [
        (&cli.module_version, VERSION_KEY),
        (&cli.changelog_url, NOTES_KEY),
        (&cli.manifest_url, MANIFEST_KEY),
        (&cli.minimum_core_version, MINIMUM_CORE_VERSION_KEY),
        (&cli.verified_core_version, VERIFIED_CORE_VERSION_KEY),
        (&cli.maximum_core_version, MAXIMUM_CORE_VERSION_KEY),
    ];
    for (value, form_key) in cli_values {
        if let Some(value) = value {
            fields.insert(form_key.to_string(), value.clone());
        }
    }

    if let Some(doc) = manifest {
        for (manifest_path, form_key) in MANIFEST_KEY_TO_FORM_KEY {
            if fields.contains_key(*form_key) {
                continue;
            }
            let Some(value) = manifest::get_dotted_path(doc, manifest_path)? else {
                continue;
            };
            let Some(text) = coerce_form_value(value) else {
                continue;
            };
            fields.insert(form_key.to_string(), text);
        }
    }

    Ok(fields)
}

/// Manifest values may be numbers or booleans, but the remote form only
/// accepts strings. Null is treated the same as an absent key.
pub fn coerce_form_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read the account password from the selected source.
pub fn read_password(source: PasswordSource) -> Result<String, Error> {
    match source {
        PasswordSource::Input => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|err| Error::Config(format!("couldn't read password: {err}"))),
        PasswordSource::RawInput => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| Error::Config(format!("couldn't read password: {err}")))?;
            Ok(buf)
        }
        PasswordSource::Environment => read_password_from_env(PASSWORD_ENV_VARIABLE),
    }
}

fn read_password_from_env(variable: &str) -> Result<String, Error> {
    env::var(variable).map_err(|_| {
        Error::Config(format!(
            "couldn't read password: environment variable {variable} is not set"
        ))
    })
}
