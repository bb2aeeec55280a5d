use super::{Account, Install, Site};

/// One screen of the navigation hierarchy. Each variant carries the
/// selections made on the way down; child lists are fetched fresh on every
/// entry and never stored.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    AccountSelect,
    SiteSelect {
        account: Account,
    },
    InstallSelect {
        account: Account,
        site: Site,
    },
    InstallManage {
        account: Account,
        site: Site,
        install: Install,
    },
}

impl Screen {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Screen::AccountSelect => "account-select",
            Screen::SiteSelect { .. } => "site-select",
            Screen::InstallSelect { .. } => "install-select",
            Screen::InstallManage { .. } => "install-manage",
        }
    }
}

/// Navigation event produced by a screen's menu outcome.
#[derive(Clone, Debug, PartialEq)]
pub enum ScreenEvent {
    AccountChosen(Account),
    SiteChosen(Site),
    InstallChosen(Install),
    /// Escape key or a "← Back" row.
    Back,
    /// An "Exit" row, or escape on the root screen.
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NavOutcome {
    Continue,
    Quit,
}

struct Frame {
    screen: Screen,
    cursor: usize,
}

/// Stack of navigation frames. Pushing drills into a child screen, popping
/// is "back". The cursor position of each frame survives a round trip into
/// a child so the parent menu re-opens where it was left.
pub struct NavStack {
    frames: Vec<Frame>,
}

impl NavStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                screen: Screen::AccountSelect,
                cursor: 0,
            }],
        }
    }

    pub fn current(&self) -> &Screen {
        // The root frame is never popped.
        &self.frames.last().unwrap().screen
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn cursor(&self) -> usize {
        self.frames.last().unwrap().cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.frames.last_mut().unwrap().cursor = cursor;
    }

    /// Clamp the remembered cursor against a freshly fetched option count.
    pub fn clamp_cursor(&mut self, option_count: usize) {
        let frame = self.frames.last_mut().unwrap();
        frame.cursor = frame.cursor.min(option_count.saturating_sub(1));
    }

    fn push(&mut self, screen: Screen) {
        self.frames.push(Frame { screen, cursor: 0 });
    }

    fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Apply a navigation event. Pure state transition, no I/O.
    pub fn apply(&mut self, event: ScreenEvent) -> NavOutcome {
        match event {
            ScreenEvent::AccountChosen(account) => {
                self.push(Screen::SiteSelect { account });
                NavOutcome::Continue
            }
            ScreenEvent::SiteChosen(site) => {
                if let Screen::SiteSelect { account } = self.current().clone() {
                    self.push(Screen::InstallSelect { account, site });
                }
                NavOutcome::Continue
            }
            ScreenEvent::InstallChosen(install) => {
                if let Screen::InstallSelect { account, site } = self.current().clone() {
                    self.push(Screen::InstallManage {
                        account,
                        site,
                        install,
                    });
                }
                NavOutcome::Continue
            }
            ScreenEvent::Back => {
                if self.frames.len() == 1 {
                    NavOutcome::Quit
                } else {
                    self.pop();
                    NavOutcome::Continue
                }
            }
            ScreenEvent::Quit => NavOutcome::Quit,
        }
    }
}

impl Default for NavStack {
    fn default() -> Self {
        Self::new()
    }
}
