use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Where the account password is read from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PasswordSource {
    /// Read the `FVTT_PASSWORD` environment variable.
    Environment,
    /// Prompt on the terminal with echo disabled.
    Input,
    /// Read standard input until end-of-file, unprocessed.
    RawInput,
}

#[derive(Debug, Parser)]
#[command(
    name = "fvtt-autopublish",
    version,
    about = "Publish new module versions to the FoundryVTT package administration site"
)]
pub struct Cli {
    /// Username of the account used to access the administration site.
    /// Note: this is case-sensitive.
    #[arg(long)]
    pub username: String,

    /// Source the account password is read from.
    #[arg(long, value_enum, default_value_t = PasswordSource::Input)]
    pub password_source: PasswordSource,

    /// Numeric id of the module to publish a new version of. Found in the
    /// URL of the module's configuration page on the administration site.
    #[arg(long, value_name = "ID")]
    pub module_id: String,

    /// Manifest URL of the module version being published.
    ///
    /// This is NOT the "manifest" URL inside the manifest file itself: that
    /// one is a stable link to the latest manifest, while this option should
    /// point at the manifest for the specific version being published. For
    /// that reason this option has no manifest-file fallback.
    #[arg(long, value_name = "URL")]
    pub manifest_url: Option<String>,

    /// Path of a module manifest file to read information from. Values found
    /// there are used as defaults for options not given explicitly.
    #[arg(long, value_name = "FILE_PATH")]
    pub manifest_file: Option<PathBuf>,

    /// The new module version to publish. Falls back to the manifest file's
    /// "version" key.
    #[arg(long, value_name = "VERSION")]
    pub module_version: Option<String>,

    /// Release notes URL of the version being published. Falls back to the
    /// manifest file's "changelog" key.
    #[arg(long, value_name = "URL")]
    pub changelog_url: Option<String>,

    /// Oldest Foundry core version required for the module to run. Falls
    /// back to the manifest file's "compatibility.minimum" key.
    #[arg(long, value_name = "VERSION")]
    pub minimum_core_version: Option<String>,

    /// Newest Foundry core version the module is verified to run on. Falls
    /// back to the manifest file's "compatibility.verified" key.
    #[arg(long, visible_alias = "compatible-core-version", value_name = "VERSION")]
    pub verified_core_version: Option<String>,

    /// Newest Foundry core version the module can run on at all. Falls back
    /// to the manifest file's "compatibility.maximum" key.
    #[arg(long, value_name = "VERSION")]
    pub maximum_core_version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_source_defaults_to_input() {
        let cli = Cli::parse_from(["fvtt-autopublish", "--username", "u", "--module-id", "1"]);
        assert_eq!(cli.password_source, PasswordSource::Input);
    }

    #[test]
    fn compatible_core_version_aliases_verified() {
        let cli = Cli::parse_from([
            "fvtt-autopublish",
            "--username",
            "u",
            "--module-id",
            "1",
            "--compatible-core-version",
            "11",
        ]);
        assert_eq!(cli.verified_core_version.as_deref(), Some("11"));
    }

    #[test]
    fn username_and_module_id_are_required() {
        assert!(Cli::try_parse_from(["fvtt-autopublish", "--username", "u"]).is_err());
        assert!(Cli::try_parse_from(["fvtt-autopublish", "--module-id", "1"]).is_err());
    }
}
