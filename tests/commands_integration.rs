//! Integration tests for command flows.
//!
//! These tests run command handlers against the mock control-plane client
//! with a scripted prompter and a temp-dir state directory, exercising the
//! full flow: declare inputs → resolve → delegate → update state.

use tempfile::TempDir;

use stratus::api::mock::{FailOn, MockCloudClient};
use stratus::api::types::AppState;
use stratus::api::{ApiError, CloudClient};
use stratus::cli::commands::{
    self, DeleteSpaceOpts, ScaleOpts, TargetOpts,
};
use stratus::cli::Context;
use stratus::config::{TargetConfig, TargetStore};
use stratus::secrets::{token_key, FileSecretStore, SecretStore};
use stratus::ui::prompts::ScriptedPrompter;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture owning a temp state directory.
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn store(&self) -> TargetStore {
        TargetStore::at(self.dir.path())
    }

    /// Seed the saved target state.
    fn set_target(&self, api: Option<&str>, org: Option<&str>, space: Option<&str>) {
        let config = TargetConfig {
            api: api.map(String::from),
            organization: org.map(String::from),
            space: space.map(String::from),
        };
        self.store().save(&config).expect("save target");
    }

    fn target(&self) -> TargetConfig {
        self.store().load().expect("load target")
    }

    /// Context with prompting enabled.
    fn interactive(&self) -> Context {
        Context {
            force: false,
            interactive: true,
            quiet: true,
            debug: false,
            store: self.store(),
        }
    }

    /// Context for batch use: no prompts, no forced confirmation.
    fn batch(&self) -> Context {
        Context {
            force: false,
            interactive: false,
            quiet: true,
            debug: false,
            store: self.store(),
        }
    }

    /// Context with --force: confirmations assumed, prompts suppressed.
    fn forced(&self) -> Context {
        Context {
            force: true,
            interactive: false,
            quiet: true,
            debug: false,
            store: self.store(),
        }
    }
}

/// Mock client seeded with org `acme` containing spaces `space-a`, `space-b`.
fn two_space_client() -> (MockCloudClient, String) {
    let client = MockCloudClient::new();
    let org = client.add_organization("acme");
    client.add_space(&org, "space-a");
    client.add_space(&org, "space-b");
    (client, org)
}

// =============================================================================
// delete-space
// =============================================================================

#[tokio::test]
async fn delete_space_confirms_each_space_independently() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), None);
    let (client, org) = two_space_client();

    // "no" for space-a, "yes" for space-b.
    let mut prompter = ScriptedPrompter::new(&["n", "y"]);
    commands::delete_space(
        &env.interactive(),
        &client,
        &mut prompter,
        DeleteSpaceOpts {
            spaces: vec!["space-a".into(), "space-b".into()],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(client.space_names(&org), vec!["space-a"]);

    let messages = prompter.messages();
    assert!(messages[0].contains("space-a"));
    assert!(messages[1].contains("space-b"));
}

#[tokio::test]
async fn delete_space_continues_past_one_element_failure() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), None);
    let (client, org) = two_space_client();

    let space_a_guid = client
        .space_by_name(&org, "space-a")
        .await
        .unwrap()
        .unwrap()
        .guid;
    client.fail_on(FailOn::DeleteSpace(
        space_a_guid,
        ApiError::Api {
            status: 500,
            message: "internal error".into(),
        },
    ));

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::delete_space(
        &env.forced(),
        &client,
        &mut prompter,
        DeleteSpaceOpts {
            spaces: vec!["space-a".into(), "space-b".into()],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // space-a survived its failure; space-b was still deleted.
    assert_eq!(client.space_names(&org), vec!["space-a"]);
}

#[tokio::test]
async fn delete_space_requires_recursive_for_nonempty_spaces() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), None);
    let client = MockCloudClient::new();
    let org = client.add_organization("acme");
    let space = client.add_space(&org, "staging");
    client.add_app(&space, "web", 512, AppState::Started);

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::delete_space(
        &env.forced(),
        &client,
        &mut prompter,
        DeleteSpaceOpts {
            spaces: vec!["staging".into()],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(client.space_names(&org), vec!["staging"]);

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::delete_space(
        &env.forced(),
        &client,
        &mut prompter,
        DeleteSpaceOpts {
            spaces: vec!["staging".into()],
            recursive: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(client.space_names(&org).is_empty());
}

#[tokio::test]
async fn delete_space_in_batch_mode_without_force_deletes_nothing() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), None);
    let (client, org) = two_space_client();

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::delete_space(
        &env.batch(),
        &client,
        &mut prompter,
        DeleteSpaceOpts {
            spaces: vec!["space-a".into(), "space-b".into()],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(client.space_names(&org), vec!["space-a", "space-b"]);
}

// =============================================================================
// delete-org
// =============================================================================

#[tokio::test]
async fn delete_org_without_recursive_spares_nonempty_orgs() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let client = MockCloudClient::new();
    let full = client.add_organization("full-org");
    client.add_space(&full, "occupied");
    client.add_organization("empty-org");

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::delete_org(
        &env.forced(),
        &client,
        &mut prompter,
        vec!["full-org".into(), "empty-org".into()],
        false,
    )
    .await
    .unwrap();

    assert_eq!(client.organization_names(), vec!["full-org"]);
}

#[tokio::test]
async fn delete_org_recursive_takes_spaces_down_too() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let client = MockCloudClient::new();
    let org = client.add_organization("full-org");
    client.add_space(&org, "occupied");

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::delete_org(
        &env.forced(),
        &client,
        &mut prompter,
        vec!["full-org".into()],
        true,
    )
    .await
    .unwrap();

    assert!(client.organization_names().is_empty());
}

// =============================================================================
// scale
// =============================================================================

#[tokio::test]
async fn scale_converts_memory_and_updates_only_supplied_fields() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), Some("staging"));
    let client = MockCloudClient::new();
    let org = client.add_organization("acme");
    let space = client.add_space(&org, "staging");
    let app = client.add_app(&space, "web", 512, AppState::Started);

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::scale(
        &env.batch(),
        &client,
        &mut prompter,
        ScaleOpts {
            app: Some("web".into()),
            memory: Some("1G".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let scaled = client.app(&app).unwrap();
    assert_eq!(scaled.memory_mb, 1024);
    assert_eq!(scaled.instances, 1);
    assert_eq!(scaled.disk_mb, 1024);
}

#[tokio::test]
async fn scale_restarts_started_app_when_asked() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), Some("staging"));
    let client = MockCloudClient::new();
    let org = client.add_organization("acme");
    let space = client.add_space(&org, "staging");
    let app = client.add_app(&space, "web", 512, AppState::Started);

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::scale(
        &env.batch(),
        &client,
        &mut prompter,
        ScaleOpts {
            app: Some("web".into()),
            memory: Some("1G".into()),
            restart: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    use stratus::api::mock::MockOperation;
    assert!(client
        .operations()
        .iter()
        .any(|op| matches!(op, MockOperation::RestartApp { guid } if guid == &app)));
}

#[tokio::test]
async fn scale_does_not_restart_stopped_apps_or_instance_changes() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), Some("staging"));
    let client = MockCloudClient::new();
    let org = client.add_organization("acme");
    let space = client.add_space(&org, "staging");
    client.add_app(&space, "web", 512, AppState::Stopped);

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::scale(
        &env.batch(),
        &client,
        &mut prompter,
        ScaleOpts {
            app: Some("web".into()),
            memory: Some("1G".into()),
            restart: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    use stratus::api::mock::MockOperation;
    assert!(!client
        .operations()
        .iter()
        .any(|op| matches!(op, MockOperation::RestartApp { .. })));
}

#[tokio::test]
async fn scale_rejects_malformed_sizes() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), Some("staging"));
    let client = MockCloudClient::new();
    let org = client.add_organization("acme");
    let space = client.add_space(&org, "staging");
    client.add_app(&space, "web", 512, AppState::Started);

    let mut prompter = ScriptedPrompter::new(&[]);
    let err = commands::scale(
        &env.batch(),
        &client,
        &mut prompter,
        ScaleOpts {
            app: Some("web".into()),
            memory: Some("lots".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("memory"));
}

// =============================================================================
// passwd
// =============================================================================

#[tokio::test]
async fn passwd_prompts_secretly_and_delegates() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let client = MockCloudClient::new().with_user("dev@example.com", "old-pass");

    let mut prompter = ScriptedPrompter::new(&["old-pass", "brand-new", "brand-new"]);
    commands::passwd(&env.interactive(), &client, &mut prompter, None)
        .await
        .unwrap();

    use stratus::api::mock::MockOperation;
    assert!(client
        .operations()
        .iter()
        .any(|op| matches!(op, MockOperation::ChangePassword { .. })));

    // All three prompts were no-echo, and no prompt text contains a password.
    let records = prompter.records();
    assert_eq!(records.len(), 3);
    for record in records {
        assert!(!record.echo);
        assert!(!record.message.contains("old-pass"));
        assert!(!record.message.contains("brand-new"));
    }
}

#[tokio::test]
async fn passwd_rejects_other_users() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let client = MockCloudClient::new().with_user("dev@example.com", "pw");

    let mut prompter = ScriptedPrompter::new(&[]);
    let err = commands::passwd(
        &env.interactive(),
        &client,
        &mut prompter,
        Some("other@example.com".into()),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("your own password"));
}

#[tokio::test]
async fn passwd_rejects_mismatched_verification() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let client = MockCloudClient::new().with_user("dev@example.com", "pw");

    let mut prompter = ScriptedPrompter::new(&["pw", "new-pass-1", "new-pass-2"]);
    let err = commands::passwd(&env.interactive(), &client, &mut prompter, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("don't match"));

    use stratus::api::mock::MockOperation;
    assert!(!client
        .operations()
        .iter()
        .any(|op| matches!(op, MockOperation::ChangePassword { .. })));
}

// =============================================================================
// login / logout
// =============================================================================

#[tokio::test]
async fn login_stores_token_for_target() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let client = MockCloudClient::new().with_user("dev@example.com", "pw");
    let secrets = FileSecretStore::with_path(env.dir.path().join("secrets.toml"));
    let config = env.target();

    let mut prompter = ScriptedPrompter::new(&["pw"]);
    commands::login(
        &env.interactive(),
        &client,
        &mut prompter,
        &secrets,
        &config,
        Some("dev@example.com".into()),
    )
    .await
    .unwrap();

    let stored = secrets.get(&token_key("https://api.test")).unwrap();
    assert_eq!(stored.as_deref(), Some("mock-token-for-dev@example.com"));

    // The password prompt never echoed.
    assert!(prompter.records().iter().all(|r| !r.echo));
}

#[tokio::test]
async fn login_without_prompts_needs_explicit_inputs() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let client = MockCloudClient::new().with_user("dev@example.com", "pw");
    let secrets = FileSecretStore::with_path(env.dir.path().join("secrets.toml"));
    let config = env.target();

    let mut prompter = ScriptedPrompter::new(&[]);
    let err = commands::login(
        &env.batch(),
        &client,
        &mut prompter,
        &secrets,
        &config,
        Some("dev@example.com".into()),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("password"));
    assert!(prompter.records().is_empty());
}

#[tokio::test]
async fn logout_discards_the_stored_token() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let secrets = FileSecretStore::with_path(env.dir.path().join("secrets.toml"));
    secrets.set(&token_key("https://api.test"), "tok").unwrap();
    let config = env.target();

    commands::logout(&env.batch(), &secrets, &config).unwrap();
    assert_eq!(secrets.get(&token_key("https://api.test")).unwrap(), None);
}

// =============================================================================
// target
// =============================================================================

#[tokio::test]
async fn target_url_clears_organization_and_space() {
    let env = TestEnv::new();
    env.set_target(Some("https://old.test"), Some("acme"), Some("staging"));

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::target(
        &env.batch(),
        None,
        &mut prompter,
        TargetOpts {
            url: Some("https://new.test".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let config = env.target();
    assert_eq!(config.api.as_deref(), Some("https://new.test"));
    assert_eq!(config.organization, None);
    assert_eq!(config.space, None);
}

#[tokio::test]
async fn target_org_switch_prompts_for_space() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), Some("staging"));
    let client = MockCloudClient::new();
    let org2 = client.add_organization("acme-two");
    client.add_space(&org2, "space2");

    let mut prompter = ScriptedPrompter::new(&["space2"]);
    commands::target(
        &env.interactive(),
        Some(&client),
        &mut prompter,
        TargetOpts {
            organization: Some("acme-two".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let config = env.target();
    assert_eq!(config.organization.as_deref(), Some("acme-two"));
    assert_eq!(config.space.as_deref(), Some("space2"));
    assert_eq!(prompter.messages(), vec!["Space"]);
}

#[tokio::test]
async fn target_unknown_org_is_refused() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let client = MockCloudClient::new();
    client.add_organization("acme");

    let mut prompter = ScriptedPrompter::new(&[]);
    let err = commands::target(
        &env.batch(),
        Some(&client),
        &mut prompter,
        TargetOpts {
            organization: Some("nope".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("nope"));
    // The saved target is untouched.
    assert_eq!(env.target().organization, None);
}

// =============================================================================
// create-org / create-space
// =============================================================================

#[tokio::test]
async fn create_org_can_target_the_new_org() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), None, None);
    let client = MockCloudClient::new();

    let mut prompter = ScriptedPrompter::new(&[]);
    commands::create_org(
        &env.batch(),
        &client,
        &mut prompter,
        Some("acme".into()),
        true,
    )
    .await
    .unwrap();

    assert_eq!(client.organization_names(), vec!["acme"]);
    assert_eq!(env.target().organization.as_deref(), Some("acme"));
}

#[tokio::test]
async fn create_space_uses_the_targeted_org_as_given_value() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), None);
    let client = MockCloudClient::new();
    let org = client.add_organization("acme");

    // No -o flag: the organization comes from the saved target.
    let mut prompter = ScriptedPrompter::new(&[]);
    commands::create_space(
        &env.batch(),
        &client,
        &mut prompter,
        Some("staging".into()),
        None,
        false,
    )
    .await
    .unwrap();

    assert_eq!(client.space_names(&org), vec!["staging"]);
}

// =============================================================================
// delete (apps)
// =============================================================================

#[tokio::test]
async fn delete_apps_confirms_per_app() {
    let env = TestEnv::new();
    env.set_target(Some("https://api.test"), Some("acme"), Some("staging"));
    let client = MockCloudClient::new();
    let org = client.add_organization("acme");
    let space = client.add_space(&org, "staging");
    client.add_app(&space, "web", 512, AppState::Started);
    client.add_app(&space, "worker", 512, AppState::Started);

    let mut prompter = ScriptedPrompter::new(&["y", "n"]);
    commands::delete_apps(
        &env.interactive(),
        &client,
        &mut prompter,
        vec!["web".into(), "worker".into()],
    )
    .await
    .unwrap();

    let remaining: Vec<String> = client
        .apps(&space)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(remaining, vec!["worker"]);
}
