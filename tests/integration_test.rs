//! Integration tests over the public library surface: the navigation state
//! machine, menu option computation, and the create/delete flows driven
//! against an in-memory gateway.

use std::sync::Mutex;

use async_trait::async_trait;

use wpctl::app::{
    ADD_INSTALL, BACK, DeleteOutcome, EXIT, FlowError, create_install_checked,
    create_site_checked, delete_install_if_confirmed, install_menu, site_menu,
};
use wpctl::error::GatewayError;
use wpctl::gateway::ResourceGateway;
use wpctl::model::{
    Account, Environment, Install, NavOutcome, NavStack, ParentRef, ScreenEvent, Site,
};
use wpctl::view::{MenuOutcome, MenuState};

// --- In-memory gateway with call counting ---

#[derive(Default)]
struct MockGateway {
    accounts: Vec<Account>,
    sites: Vec<Site>,
    installs: Vec<Install>,
    fail_delete: bool,
    deleted: Mutex<Vec<String>>,
    created_sites: Mutex<Vec<String>>,
    created_installs: Mutex<Vec<(String, Environment)>>,
}

#[async_trait]
impl ResourceGateway for MockGateway {
    async fn list_accounts(&self) -> Result<Vec<Account>, GatewayError> {
        Ok(self.accounts.clone())
    }

    async fn list_sites_for_account(&self, account_id: &str) -> Result<Vec<Site>, GatewayError> {
        Ok(self
            .sites
            .iter()
            .filter(|s| s.belongs_to(account_id))
            .cloned()
            .collect())
    }

    async fn list_installs_for_site(&self, site_id: &str) -> Result<Vec<Install>, GatewayError> {
        Ok(self
            .installs
            .iter()
            .filter(|i| i.belongs_to(site_id))
            .cloned()
            .collect())
    }

    async fn create_site(&self, account_id: &str, name: &str) -> Result<Site, GatewayError> {
        self.created_sites.lock().unwrap().push(name.to_string());
        Ok(Site {
            id: format!("s-{}", name),
            name: name.to_string(),
            account: Some(ParentRef::Bare(account_id.to_string())),
        })
    }

    async fn create_install(
        &self,
        site_id: &str,
        _account_id: &str,
        name: &str,
        environment: Environment,
    ) -> Result<Install, GatewayError> {
        self.created_installs
            .lock()
            .unwrap()
            .push((name.to_string(), environment));
        Ok(Install {
            id: format!("i-{}", name),
            name: name.to_string(),
            environment,
            primary_domain: String::new(),
            cname: String::new(),
            php_version: String::new(),
            is_multisite: false,
            site: Some(ParentRef::Bare(site_id.to_string())),
        })
    }

    async fn delete_install(&self, install_id: &str) -> Result<(), GatewayError> {
        self.deleted.lock().unwrap().push(install_id.to_string());
        if self.fail_delete {
            return Err(GatewayError::Api {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(())
    }
}

fn account(id: &str, name: &str) -> Account {
    Account {
        id: id.into(),
        name: name.into(),
    }
}

fn site(id: &str, name: &str, account_id: &str) -> Site {
    Site {
        id: id.into(),
        name: name.into(),
        account: Some(ParentRef::Keyed {
            id: account_id.into(),
        }),
    }
}

fn install(id: &str, name: &str, env: Environment, site_id: &str) -> Install {
    Install {
        id: id.into(),
        name: name.into(),
        environment: env,
        primary_domain: String::new(),
        cname: String::new(),
        php_version: String::new(),
        is_multisite: false,
        site: Some(ParentRef::Bare(site_id.into())),
    }
}

// --- Spec scenario: drill from one account down to an empty install list ---

#[tokio::test]
async fn drill_down_to_empty_install_list() {
    let gateway = MockGateway {
        accounts: vec![account("1", "Acme")],
        sites: vec![site("s1", "Blog", "1")],
        ..Default::default()
    };

    let accounts = gateway.list_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);

    let mut nav = NavStack::new();
    nav.apply(ScreenEvent::AccountChosen(accounts[0].clone()));

    let sites = gateway.list_sites_for_account(&accounts[0].id).await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name, "Blog");
    nav.apply(ScreenEvent::SiteChosen(sites[0].clone()));
    assert_eq!(nav.current().kind(), "install-select");

    let installs = gateway.list_installs_for_site(&sites[0].id).await.unwrap();
    assert!(installs.is_empty());

    // No dead end: the empty screen still offers add, back, and exit.
    let (rows, _) = install_menu(&installs);
    assert_eq!(rows, vec![ADD_INSTALL, BACK, EXIT]);
}

// --- Delete confirmation ---

#[tokio::test]
async fn exact_confirmation_deletes_exactly_once() {
    let gateway = MockGateway {
        installs: vec![install("i9", "prod-env", Environment::Production, "s1")],
        ..Default::default()
    };
    let target = gateway.installs[0].clone();

    let outcome = delete_install_if_confirmed(&gateway, &target, "prod-env")
        .await
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(*gateway.deleted.lock().unwrap(), vec!["i9"]);
}

#[tokio::test]
async fn mismatched_confirmation_never_calls_delete() {
    let gateway = MockGateway {
        installs: vec![install("i9", "prod-env", Environment::Production, "s1")],
        ..Default::default()
    };
    let target = gateway.installs[0].clone();

    for typed in ["", "prod", "prod-env ", "PROD-ENV", "prod-env2"] {
        let outcome = delete_install_if_confirmed(&gateway, &target, typed)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::NameMismatch);
    }
    assert!(gateway.deleted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delete_failure_surfaces_the_api_error() {
    let gateway = MockGateway {
        fail_delete: true,
        ..Default::default()
    };
    let target = install("i9", "prod-env", Environment::Production, "s1");

    let err = delete_install_if_confirmed(&gateway, &target, "prod-env")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Api { status: 500, .. }));
}

// --- Add-install guard rails ---

#[tokio::test]
async fn add_install_rejected_when_all_environments_exist() {
    let gateway = MockGateway::default();
    let target_site = site("s1", "Blog", "1");
    let owner = account("1", "Acme");
    let existing = vec![
        install("i1", "p", Environment::Production, "s1"),
        install("i2", "s", Environment::Staging, "s1"),
        install("i3", "d", Environment::Development, "s1"),
    ];

    let err = create_install_checked(
        &gateway,
        &target_site,
        &owner,
        &existing,
        "new",
        Environment::Production,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, FlowError::NoEnvironmentsLeft));
    assert!(gateway.created_installs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn add_install_rejects_a_taken_environment() {
    let gateway = MockGateway::default();
    let target_site = site("s1", "Blog", "1");
    let owner = account("1", "Acme");
    let existing = vec![install("i1", "p", Environment::Production, "s1")];

    let err = create_install_checked(
        &gateway,
        &target_site,
        &owner,
        &existing,
        "another",
        Environment::Production,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        FlowError::EnvironmentTaken(Environment::Production)
    ));
    assert!(gateway.created_installs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn add_install_accepts_a_remaining_environment() {
    let gateway = MockGateway::default();
    let target_site = site("s1", "Blog", "1");
    let owner = account("1", "Acme");
    let existing = vec![
        install("i1", "p", Environment::Production, "s1"),
        install("i2", "s", Environment::Staging, "s1"),
    ];

    let created = create_install_checked(
        &gateway,
        &target_site,
        &owner,
        &existing,
        "dev-env",
        Environment::Development,
    )
    .await
    .unwrap();
    assert_eq!(created.environment, Environment::Development);
    assert_eq!(
        *gateway.created_installs.lock().unwrap(),
        vec![("dev-env".to_string(), Environment::Development)]
    );
}

#[tokio::test]
async fn add_site_rejects_empty_name_without_a_call() {
    let gateway = MockGateway::default();
    let owner = account("1", "Acme");

    let err = create_site_checked(&gateway, &owner, "").await.unwrap_err();
    assert!(matches!(err, FlowError::EmptyName));
    assert!(gateway.created_sites.lock().unwrap().is_empty());
}

// --- Menu and navigation surface ---

#[test]
fn menu_cursor_clamps_at_both_ends() {
    let mut state = MenuState::new(2);
    state.up();
    assert_eq!(state.cursor(), 0);
    state.down();
    state.down();
    state.down();
    assert_eq!(state.cursor(), 1);
}

#[test]
fn back_outcome_is_not_an_index() {
    assert_ne!(MenuOutcome::Back, MenuOutcome::Selected(0));
    assert_ne!(MenuOutcome::Back, MenuOutcome::Selected(usize::MAX));
}

#[test]
fn escape_on_root_screen_quits() {
    let mut nav = NavStack::new();
    assert_eq!(nav.apply(ScreenEvent::Back), NavOutcome::Quit);
}

#[test]
fn site_list_order_puts_rows_before_actions() {
    let sites = vec![site("s1", "Blog", "1"), site("s2", "Shop", "1")];
    let (rows, _) = site_menu(&sites);
    assert_eq!(rows[0], "Blog");
    assert_eq!(rows[1], "Shop");
    assert_eq!(rows[rows.len() - 1], BACK);
}

#[test]
fn parent_ref_shapes_match_identically() {
    for raw in [
        r#"{"id":"s1","name":"Blog","account":"A1"}"#,
        r#"{"id":"s1","name":"Blog","account":{"id":"A1"}}"#,
        r#"{"id":"s1","name":"Blog","accountId":"A1"}"#,
    ] {
        let parsed: Site = serde_json::from_str(raw).unwrap();
        assert!(parsed.belongs_to("A1"), "shape failed: {}", raw);
    }
}
