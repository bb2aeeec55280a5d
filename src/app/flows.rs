//! Create and delete sub-flows. The gateway-touching cores are plain async
//! functions over `&dyn ResourceGateway` so they can be exercised against a
//! mock; the surrounding functions own the prompting and messaging.

use std::io::{self, stdout};

use thiserror::Error;
use tracing::info;

use crate::error::GatewayError;
use crate::gateway::ResourceGateway;
use crate::model::{Account, Environment, Install, Site, available_environments};
use crate::view::{self, Menu, MenuOutcome};

use super::App;

/// Client-side rejections of a create request. No API call is made for any
/// of these.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("all three environments already have an install")]
    NoEnvironmentsLeft,

    #[error("a {0} install already exists for this site")]
    EnvironmentTaken(Environment),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NameMismatch,
}

/// Delete `install` only when `typed` matches its name exactly. A mismatch
/// is a normal branch, not an error, and issues no network call.
pub async fn delete_install_if_confirmed(
    gateway: &dyn ResourceGateway,
    install: &Install,
    typed: &str,
) -> Result<DeleteOutcome, GatewayError> {
    if typed != install.name {
        return Ok(DeleteOutcome::NameMismatch);
    }
    gateway.delete_install(&install.id).await?;
    info!(install = %install.name, "install deleted");
    Ok(DeleteOutcome::Deleted)
}

pub async fn create_site_checked(
    gateway: &dyn ResourceGateway,
    account: &Account,
    name: &str,
) -> Result<Site, FlowError> {
    if name.is_empty() {
        return Err(FlowError::EmptyName);
    }
    let site = gateway.create_site(&account.id, name).await?;
    info!(site = %site.name, account = %account.name, "site created");
    Ok(site)
}

/// Create an install after re-checking the one-install-per-environment rule
/// against the freshly listed `existing` set.
pub async fn create_install_checked(
    gateway: &dyn ResourceGateway,
    site: &Site,
    account: &Account,
    existing: &[Install],
    name: &str,
    environment: Environment,
) -> Result<Install, FlowError> {
    let remaining = available_environments(existing);
    if remaining.is_empty() {
        return Err(FlowError::NoEnvironmentsLeft);
    }
    if !remaining.contains(&environment) {
        return Err(FlowError::EnvironmentTaken(environment));
    }
    if name.is_empty() {
        return Err(FlowError::EmptyName);
    }
    let install = gateway
        .create_install(&site.id, &account.id, name, environment)
        .await?;
    info!(install = %install.name, site = %site.name, "install created");
    Ok(install)
}

/// "+ Add site": prompt for a name and create it. Blank input cancels.
pub(super) fn run_add_site(app: &mut App, account: &Account) -> io::Result<()> {
    let mut out = stdout();
    view::clear_screen(&mut out)?;
    view::header(&mut out, &format!("Add a site to {}", account.name))?;

    let name = app.keys.read_line("Site name: ")?;
    let name = name.trim().to_string();
    if name.is_empty() {
        view::message("No name entered; site creation cancelled.")?;
        return view::wait_for_ack(&mut app.keys);
    }

    match app.block_on(create_site_checked(app.gateway.as_ref(), account, &name)) {
        Ok(site) => view::message(&format!("Created site \"{}\".", site.name))?,
        Err(e) => view::error_line(&format!("Could not create site: {}", e))?,
    }
    view::wait_for_ack(&mut app.keys)
}

/// "+ Add install": one reusable flow for both the empty and populated
/// install lists. Offers only the unused environments; rejects entry with
/// no API call when none remain.
pub(super) fn run_add_install(
    app: &mut App,
    account: &Account,
    site: &Site,
    existing: &[Install],
) -> io::Result<()> {
    let remaining = available_environments(existing);
    let mut out = stdout();
    view::clear_screen(&mut out)?;
    view::header(&mut out, &format!("Add an install to {}", site.name))?;

    if remaining.is_empty() {
        view::error_line("All three environments already have an install.")?;
        return view::wait_for_ack(&mut app.keys);
    }

    let rows: Vec<String> = remaining.iter().map(|e| e.label().to_string()).collect();
    let environment = match Menu::new("Choose an environment", &rows)
        .preserve_header(true)
        .present(&mut app.keys)?
    {
        MenuOutcome::Selected(i) => remaining[i],
        MenuOutcome::Back => return Ok(()),
    };

    let name = app.keys.read_line("Install name: ")?;
    let name = name.trim().to_string();
    if name.is_empty() {
        view::message("No name entered; install creation cancelled.")?;
        return view::wait_for_ack(&mut app.keys);
    }

    match app.block_on(create_install_checked(
        app.gateway.as_ref(),
        site,
        account,
        existing,
        &name,
        environment,
    )) {
        Ok(install) => view::message(&format!(
            "Created {} install \"{}\".",
            install.environment, install.name
        ))?,
        Err(e) => view::error_line(&format!("Could not create install: {}", e))?,
    }
    view::wait_for_ack(&mut app.keys)
}

/// Delete confirmation: the typed text must equal the install name exactly.
/// Returns true when the install was deleted.
pub(super) fn run_delete_confirm(app: &mut App, install: &Install) -> io::Result<bool> {
    let mut out = stdout();
    view::clear_screen(&mut out)?;
    view::header(&mut out, &format!("Delete install {}", install.name))?;
    view::message("This permanently deletes the install and all of its data.")?;

    let typed = app
        .keys
        .read_line(&format!("Type \"{}\" to confirm: ", install.name))?;

    match app.block_on(delete_install_if_confirmed(
        app.gateway.as_ref(),
        install,
        &typed,
    )) {
        Ok(DeleteOutcome::Deleted) => {
            view::message(&format!("Install \"{}\" deleted.", install.name))?;
            view::wait_for_ack(&mut app.keys)?;
            Ok(true)
        }
        Ok(DeleteOutcome::NameMismatch) => {
            view::error_line("Confirmation did not match; nothing was deleted.")?;
            view::wait_for_ack(&mut app.keys)?;
            Ok(false)
        }
        Err(e) => {
            view::error_line(&format!("Could not delete install: {}", e.summary()))?;
            view::wait_for_ack(&mut app.keys)?;
            Ok(false)
        }
    }
}
