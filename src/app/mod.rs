mod flows;
mod options;

use std::io::{self, Write, stdout};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crossterm::{
    cursor, execute,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use tracing::{info, warn};

use crate::error::{AppError, GatewayError, StartupError};
use crate::gateway::ResourceGateway;
use crate::input::KeyStream;
use crate::model::{Account, Install, NavOutcome, NavStack, Screen, ScreenEvent, Site};
use crate::view::{self, Menu, MenuOutcome};

pub use flows::{
    DeleteOutcome, FlowError, create_install_checked, create_site_checked,
    delete_install_if_confirmed,
};
pub use options::{
    ADD_INSTALL, ADD_SITE, BACK, DELETE_INSTALL, EXIT, InstallEntry, ManageEntry, SiteEntry,
    account_rows, install_menu, manage_menu, site_menu,
};

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(stdout(), cursor::Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(
        stdout(),
        EnterAlternateScreen,
        Clear(ClearType::All),
        cursor::Hide
    )
}

/// The screen flow controller: owns the navigation stack, the single key
/// stream, and the gateway, and drives one screen at a time.
pub struct App {
    rt: Arc<tokio::runtime::Runtime>,
    pub(crate) gateway: Box<dyn ResourceGateway>,
    nav: NavStack,
    pub(crate) keys: KeyStream,
}

impl App {
    pub fn new(
        rt: Arc<tokio::runtime::Runtime>,
        gateway: Box<dyn ResourceGateway>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            rt,
            gateway,
            nav: NavStack::new(),
            keys: KeyStream::new(shutdown),
        }
    }

    /// Bridge a gateway future into the synchronous control flow. Exactly
    /// one request is ever in flight.
    pub(crate) fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.rt.block_on(fut)
    }

    /// Run the client. Probes the account list before touching the
    /// terminal so fatal startup errors print as plain messages.
    pub fn run(&mut self) -> Result<(), AppError> {
        let accounts = self.block_on(self.gateway.list_accounts())?;
        if accounts.is_empty() {
            return Err(StartupError::NoAccounts.into());
        }
        info!(count = accounts.len(), "startup account probe ok");

        setup_terminal()?;
        let result = self.screen_loop();
        restore_terminal();
        result
    }

    fn screen_loop(&mut self) -> Result<(), AppError> {
        loop {
            let screen = self.nav.current().clone();
            info!(screen = screen.kind(), depth = self.nav.depth(), "entering screen");
            let outcome = match screen {
                Screen::AccountSelect => self.account_screen()?,
                Screen::SiteSelect { account } => self.site_screen(&account)?,
                Screen::InstallSelect { account, site } => {
                    self.install_screen(&account, &site)?
                }
                Screen::InstallManage {
                    account,
                    site,
                    install,
                } => self.manage_screen(&account, &site, &install)?,
            };
            if outcome == NavOutcome::Quit {
                return Ok(());
            }
        }
    }

    /// Inline display for recoverable gateway failures.
    fn show_gateway_error(&mut self, context: &str, err: &GatewayError) -> io::Result<()> {
        warn!(context, error = %err, "recoverable gateway failure");
        view::error_line(&format!("{}: {}", context, err.summary()))?;
        view::wait_for_ack(&mut self.keys)
    }

    fn account_screen(&mut self) -> Result<NavOutcome, AppError> {
        let accounts = match self.block_on(self.gateway.list_accounts()) {
            Ok(accounts) => accounts,
            Err(e) => {
                // The root screen has no parent to fall back to; show the
                // error and re-enter, which retries the fetch.
                self.show_gateway_error("Could not list accounts", &e)?;
                return Ok(NavOutcome::Continue);
            }
        };
        if accounts.is_empty() {
            return Err(StartupError::NoAccounts.into());
        }

        let rows = options::account_rows(&accounts);
        self.nav.clamp_cursor(rows.len());
        let outcome = Menu::new("Select an account", &rows)
            .initial_cursor(self.nav.cursor())
            .present(&mut self.keys)?;
        match outcome {
            MenuOutcome::Selected(i) => {
                self.nav.set_cursor(i);
                Ok(self
                    .nav
                    .apply(ScreenEvent::AccountChosen(accounts[i].clone())))
            }
            // Escape on the root terminates the app.
            MenuOutcome::Back => Ok(self.nav.apply(ScreenEvent::Back)),
        }
    }

    fn site_screen(&mut self, account: &Account) -> Result<NavOutcome, AppError> {
        let sites = match self.block_on(self.gateway.list_sites_for_account(&account.id)) {
            Ok(sites) => sites,
            Err(e) => {
                self.show_gateway_error("Could not list sites", &e)?;
                return Ok(self.nav.apply(ScreenEvent::Back));
            }
        };

        let (rows, entries) = options::site_menu(&sites);
        self.nav.clamp_cursor(rows.len());
        let title = format!("{} — select a site", account.name);
        let outcome = Menu::new(&title, &rows)
            .initial_cursor(self.nav.cursor())
            .present(&mut self.keys)?;
        match outcome {
            MenuOutcome::Selected(i) => {
                self.nav.set_cursor(i);
                match entries[i] {
                    SiteEntry::Site(idx) => {
                        Ok(self.nav.apply(ScreenEvent::SiteChosen(sites[idx].clone())))
                    }
                    SiteEntry::AddSite => {
                        flows::run_add_site(self, account)?;
                        // Stay put; the next pass refreshes the site list.
                        Ok(NavOutcome::Continue)
                    }
                    SiteEntry::Back => Ok(self.nav.apply(ScreenEvent::Back)),
                }
            }
            MenuOutcome::Back => Ok(self.nav.apply(ScreenEvent::Back)),
        }
    }

    fn install_screen(&mut self, account: &Account, site: &Site) -> Result<NavOutcome, AppError> {
        let installs = match self.block_on(self.gateway.list_installs_for_site(&site.id)) {
            Ok(installs) => installs,
            Err(e) => {
                self.show_gateway_error("Could not list installs", &e)?;
                return Ok(self.nav.apply(ScreenEvent::Back));
            }
        };

        let (rows, entries) = options::install_menu(&installs);
        self.nav.clamp_cursor(rows.len());
        let title = format!("{} — select an install", site.name);
        let outcome = Menu::new(&title, &rows)
            .initial_cursor(self.nav.cursor())
            .present(&mut self.keys)?;
        match outcome {
            MenuOutcome::Selected(i) => {
                self.nav.set_cursor(i);
                match entries[i] {
                    InstallEntry::Install(idx) => Ok(self
                        .nav
                        .apply(ScreenEvent::InstallChosen(installs[idx].clone()))),
                    InstallEntry::AddInstall => {
                        flows::run_add_install(self, account, site, &installs)?;
                        Ok(NavOutcome::Continue)
                    }
                    InstallEntry::Back => Ok(self.nav.apply(ScreenEvent::Back)),
                    InstallEntry::Exit => Ok(self.nav.apply(ScreenEvent::Quit)),
                }
            }
            MenuOutcome::Back => Ok(self.nav.apply(ScreenEvent::Back)),
        }
    }

    fn manage_screen(
        &mut self,
        account: &Account,
        site: &Site,
        install: &Install,
    ) -> Result<NavOutcome, AppError> {
        let mut out = stdout();
        view::clear_screen(&mut out)?;
        view::header(
            &mut out,
            &format!("{} / {} / {}", account.name, site.name, install.name),
        )?;
        view::detail(&mut out, "environment", install.environment.label())?;
        view::detail(&mut out, "primary domain", or_dash(&install.primary_domain))?;
        view::detail(&mut out, "cname", or_dash(&install.cname))?;
        view::detail(&mut out, "php version", or_dash(&install.php_version))?;
        view::detail(
            &mut out,
            "multisite",
            if install.is_multisite { "yes" } else { "no" },
        )?;
        view::writeln(&mut out, "")?;
        out.flush()?;

        let (rows, entries) = options::manage_menu();
        self.nav.clamp_cursor(rows.len());
        let outcome = Menu::new("Manage install", &rows)
            .preserve_header(true)
            .initial_cursor(self.nav.cursor())
            .present(&mut self.keys)?;
        match outcome {
            MenuOutcome::Selected(i) => {
                self.nav.set_cursor(i);
                match entries[i] {
                    ManageEntry::Delete => {
                        if flows::run_delete_confirm(self, install)? {
                            // Back to a refreshed install list.
                            Ok(self.nav.apply(ScreenEvent::Back))
                        } else {
                            Ok(NavOutcome::Continue)
                        }
                    }
                    ManageEntry::Back => Ok(self.nav.apply(ScreenEvent::Back)),
                    ManageEntry::Exit => Ok(self.nav.apply(ScreenEvent::Quit)),
                }
            }
            MenuOutcome::Back => Ok(self.nav.apply(ScreenEvent::Back)),
        }
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "—" } else { value }
}
