// Library root
// -----------
// The binary (`main.rs`) parses the CLI and hands it to `run` below.
//
// Module responsibilities:
// - `cli`: Command-line surface (clap derive).
// - `fields`: Resolves the new-version field set from CLI flags and the
//   manifest file, and reads the account password.
// - `manifest`: JSON manifest parsing and dotted-path lookup.
// - `form`: Loosely-typed model of a fetched HTML form.
// - `session`: The `FormSession` trait and its HTTP-backed `Browser`.
// - `publish`: The login + edit-versions transaction, written against
//   `FormSession` so it can run against a test double.
// - `error`: Error types for all of the above.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub mod cli;
pub mod error;
pub mod fields;
pub mod form;
pub mod manifest;
pub mod publish;
pub mod session;

use cli::Cli;
use error::Error;
use session::{Browser, FormSession};

/// Resolve inputs, log in and submit the new version. This call blocks on
/// network I/O and, depending on the password source, on terminal input.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    // Gather everything we need before touching the network.
    let manifest = match &cli.manifest_file {
        Some(path) => Some(manifest::read_manifest(path)?),
        None => None,
    };
    let new_version_fields = fields::resolve_new_version_fields(&cli, manifest.as_ref())?;
    tracing::debug!(
        fields = ?new_version_fields.keys().collect::<Vec<_>>(),
        "resolved new-version fields"
    );

    let password = fields::read_password(cli.password_source)?;
    if password.is_empty() {
        // Non-fatal: let the site's own validation reject it.
        eprintln!("Warning: Supplied password was empty!");
    }

    let mut browser = Browser::new()?;

    let spinner = progress("Logging in...");
    let result = publish::login(
        &mut browser,
        publish::ADMIN_BASE_URL,
        &cli.username,
        &password,
    );
    spinner.finish_and_clear();
    result?;

    let spinner = progress("Publishing version...");
    let result = publish::publish_version(
        &mut browser,
        publish::ADMIN_BASE_URL,
        &cli.module_id,
        &new_version_fields,
    );
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            tracing::info!(module_id = %cli.module_id, "new version submitted");
            Ok(())
        }
        Err(Error::FormNotFound { id, url }) => {
            let diag = browser.diagnostics();
            eprintln!("Error encountered!");
            eprintln!("Debug information:");
            eprintln!(
                "  Current page URL: {}",
                diag.current_url.as_deref().unwrap_or("<none>")
            );
            eprintln!(
                "  Current page title: {}",
                diag.page_title.as_deref().unwrap_or("<none>")
            );
            eprintln!("  Currently stored cookies: {:?}", diag.cookie_names);
            eprintln!();
            eprintln!("Unable to find the {id:?} form.");
            eprintln!("Are the login credentials correct?");
            eprintln!("The current page URL should be {url}");
            anyhow::bail!("unable to find the package configuration form")
        }
        Err(err) => Err(err.into()),
    }
}

fn progress(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
