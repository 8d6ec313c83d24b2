//! The two-step publishing transaction: log in, then edit the module's
//! version list. Runs against any [`FormSession`], so everything here is
//! exercised in tests with an in-memory session double.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::session::FormSession;

/// Keep at most this many version records; older ones are flagged for
/// deletion on each publish.
pub const MAX_VERSION_COUNT: u32 = 1000;

pub const ADMIN_BASE_URL: &str = "https://foundryvtt.com";

pub const LOGIN_FORM_ID: &str = "login-form";
const LOGIN_USERNAME_KEY: &str = "login_username";
const LOGIN_PASSWORD_KEY: &str = "login_password";

pub const PACKAGE_FORM_ID: &str = "package-form";
const TOTAL_FORMS_FIELD: &str = "versions-TOTAL_FORMS";
const DELETE_FIELD: &str = "DELETE";
const CHECKBOX_ON: &str = "on";

/// The login page lives at the site root.
pub fn login_url(base_url: &str) -> String {
    base_url.to_string()
}

pub fn package_edit_url(base_url: &str, module_id: &str) -> String {
    format!("{base_url}/packages/{module_id}/edit")
}

/// The versions formset names its fields `versions-{index}-{name}`.
pub fn versions_field_name(name: &str, index: u32) -> String {
    format!("versions-{index}-{name}")
}

/// Indices of version records to flag for deletion, oldest first.
///
/// Empty whenever `total <= cap`. Assumes the oldest records occupy the
/// lowest indices contiguously; the remote ordering has not been verified.
pub fn retention_deletions(total: u32, cap: u32) -> std::ops::Range<u32> {
    0..total.saturating_sub(cap)
}

/// Step 1: submit the login form. Success is not verified here; a failed
/// login surfaces in step 2 when the package form is missing.
pub fn login<S: FormSession>(
    session: &mut S,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<(), Error> {
    session.open_page(&login_url(base_url))?;
    session.select_form(LOGIN_FORM_ID)?;
    session.set_field(LOGIN_USERNAME_KEY, username)?;
    session.set_field(LOGIN_PASSWORD_KEY, password)?;
    session.submit()
}

/// Step 2: open the module's configuration page, prune old version records
/// past the retention cap, fill the blank trailing record with the new
/// version's fields and submit.
pub fn publish_version<S: FormSession>(
    session: &mut S,
    base_url: &str,
    module_id: &str,
    new_version_fields: &BTreeMap<String, String>,
) -> Result<(), Error> {
    session.open_page(&package_edit_url(base_url, module_id))?;
    session.select_form(PACKAGE_FORM_ID)?;

    // The formset counter includes the blank trailing record reserved for
    // the version being published.
    let raw_total = session
        .field(TOTAL_FORMS_FIELD)
        .ok_or_else(|| Error::UnknownField(TOTAL_FORMS_FIELD.to_string()))?;
    let total: u32 = raw_total.trim().parse().map_err(|_| Error::InvalidCounter {
        field: TOTAL_FORMS_FIELD.to_string(),
        value: raw_total.clone(),
    })?;
    // The blank trailing record means the counter is never 0 on a healthy
    // page.
    let new_version_index = total.checked_sub(1).ok_or_else(|| Error::CounterOutOfRange {
        field: TOTAL_FORMS_FIELD.to_string(),
        value: raw_total,
    })?;
    let current_version_index = total.checked_sub(2);
    tracing::debug!(
        total,
        new_version_index,
        current_version_index,
        "version formset located"
    );

    for index in retention_deletions(total, MAX_VERSION_COUNT) {
        session.set_field(&versions_field_name(DELETE_FIELD, index), CHECKBOX_ON)?;
    }

    for (name, value) in new_version_fields {
        session.set_field(&versions_field_name(name, new_version_index), value)?;
    }

    session.submit()
}
