//! Menu option computation for each screen. Pure functions, fixed ordering:
//! entity rows first, then "+ Add …" where applicable, then "← Back",
//! then "Exit".

use crate::model::{Account, Install, Site, available_environments};

pub const ADD_SITE: &str = "+ Add site";
pub const ADD_INSTALL: &str = "+ Add install";
pub const BACK: &str = "← Back";
pub const EXIT: &str = "Exit";
pub const DELETE_INSTALL: &str = "Delete install";

/// Account rows map one-to-one onto the account list; escape is the only
/// way out of the root screen.
pub fn account_rows(accounts: &[Account]) -> Vec<String> {
    accounts.iter().map(|a| a.name.clone()).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SiteEntry {
    Site(usize),
    AddSite,
    Back,
}

pub fn site_menu(sites: &[Site]) -> (Vec<String>, Vec<SiteEntry>) {
    let mut rows = Vec::with_capacity(sites.len() + 2);
    let mut entries = Vec::with_capacity(sites.len() + 2);
    for (i, site) in sites.iter().enumerate() {
        rows.push(site.name.clone());
        entries.push(SiteEntry::Site(i));
    }
    rows.push(ADD_SITE.to_string());
    entries.push(SiteEntry::AddSite);
    rows.push(BACK.to_string());
    entries.push(SiteEntry::Back);
    (rows, entries)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallEntry {
    Install(usize),
    AddInstall,
    Back,
    Exit,
}

/// "+ Add install" disappears once installs cover all three environments.
pub fn install_menu(installs: &[Install]) -> (Vec<String>, Vec<InstallEntry>) {
    let mut rows = Vec::with_capacity(installs.len() + 3);
    let mut entries = Vec::with_capacity(installs.len() + 3);
    for (i, install) in installs.iter().enumerate() {
        rows.push(format!("{} ({})", install.name, install.environment));
        entries.push(InstallEntry::Install(i));
    }
    if !available_environments(installs).is_empty() {
        rows.push(ADD_INSTALL.to_string());
        entries.push(InstallEntry::AddInstall);
    }
    rows.push(BACK.to_string());
    entries.push(InstallEntry::Back);
    rows.push(EXIT.to_string());
    entries.push(InstallEntry::Exit);
    (rows, entries)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManageEntry {
    Delete,
    Back,
    Exit,
}

pub fn manage_menu() -> (Vec<String>, Vec<ManageEntry>) {
    (
        vec![DELETE_INSTALL.to_string(), BACK.to_string(), EXIT.to_string()],
        vec![ManageEntry::Delete, ManageEntry::Back, ManageEntry::Exit],
    )
}
