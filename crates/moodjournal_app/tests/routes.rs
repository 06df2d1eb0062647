use chrono::NaiveDate;
use moodjournal_app::{
    AppConfig, AppError, EntryForm, JournalApp, RawHtml, Response, StaticSession, LOGIN_PATH,
};
use moodjournal_core::db::DEFAULT_MOODS;
use moodjournal_core::{EntryId, UpdatePolicy, UserId};
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

struct Fixture {
    _dir: TempDir,
    app: JournalApp,
    alice: UserId,
    bob: UserId,
}

fn fixture(update_policy: UpdatePolicy) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        db_path: dir.path().join("journal.db"),
        update_policy,
        ..AppConfig::default()
    };
    let app = JournalApp::new(config);
    app.init_store(DEFAULT_MOODS).unwrap();
    let alice = app.seed_user("alice@example.com", "hash").unwrap();
    let bob = app.seed_user("bob@example.com", "hash").unwrap();
    Fixture {
        _dir: dir,
        app,
        alice,
        bob,
    }
}

fn form(title: &str, body: &str) -> EntryForm {
    EntryForm::from_pairs([("title", title), ("body", body)])
}

fn created_id(response: Response<()>) -> EntryId {
    match response {
        Response::Redirect { location } => {
            let raw = location
                .strip_prefix("/journal/")
                .unwrap_or_else(|| panic!("unexpected redirect: {location}"));
            Uuid::parse_str(raw).unwrap()
        }
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[test]
fn create_then_view_renders_markdown_body() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let session = StaticSession::user(fx.alice);

    let id = created_id(
        fx.app
            .entry_create(&session, &form("Morning reflection", "*calm* today"))
            .unwrap(),
    );

    match fx.app.entry_detail(&session, &id.to_string()).unwrap() {
        Response::Ok { data } => {
            assert_eq!(data.entry.title, "Morning reflection");
            assert_eq!(data.entry.body, "*calm* today");
            assert!(data.entry.moods.is_empty());
            assert_eq!(data.html.trim_end(), "<p><em>calm</em> today</p>");
        }
        other => panic!("expected entry, got {other:?}"),
    }
}

#[test]
fn create_attaches_submitted_moods() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let session = StaticSession::user(fx.alice);
    let moods = fx.app.moods().unwrap();
    let calm = moods.iter().find(|m| m.name == "calm").unwrap();

    let submitted = EntryForm::from_pairs([
        ("title".to_string(), "Tea".to_string()),
        ("body".to_string(), "quiet".to_string()),
        ("moods".to_string(), calm.id.to_string()),
    ]);
    let id = created_id(fx.app.entry_create(&session, &submitted).unwrap());

    let Response::Ok { data } = fx.app.entry_edit_form(&session, &id.to_string()).unwrap() else {
        panic!("entry should load");
    };
    assert_eq!(data.entry.moods, vec![calm.clone()]);
}

#[test]
fn create_with_unknown_mood_surfaces_store_error() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let session = StaticSession::user(fx.alice);
    let submitted = EntryForm::from_pairs([
        ("title".to_string(), "Tea".to_string()),
        ("body".to_string(), "quiet".to_string()),
        ("moods".to_string(), Uuid::new_v4().to_string()),
    ]);

    let err = fx.app.entry_create(&session, &submitted).unwrap_err();
    assert!(matches!(err, AppError::Repo(ref repo) if repo.is_constraint_violation()));

    let Response::Ok { data } = fx.app.journal_index(&session).unwrap() else {
        panic!("index should load");
    };
    assert!(data.entry_list_items.is_empty());
}

#[test]
fn create_reports_first_missing_field() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let session = StaticSession::user(fx.alice);

    let response = fx.app.entry_create(&session, &form("", "")).unwrap();
    assert_eq!(response.status(), 400);
    match response {
        Response::Invalid { errors } => {
            assert_eq!(errors.title.as_deref(), Some("Title is required"));
            assert_eq!(errors.body, None);
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let Response::Invalid { errors } = fx.app.entry_create(&session, &form("t", "")).unwrap()
    else {
        panic!("expected validation error");
    };
    assert_eq!(errors.body.as_deref(), Some("Body is required"));
}

#[test]
fn anonymous_requests_redirect_to_login() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let anonymous = StaticSession::anonymous();

    let response = fx.app.journal_index(&anonymous).unwrap();
    assert_eq!(
        response,
        Response::Unauthorized {
            redirect_to: LOGIN_PATH.to_string()
        }
    );
    assert_eq!(
        fx.app.entry_create(&anonymous, &form("t", "b")).unwrap().status(),
        302
    );
}

#[test]
fn foreign_and_malformed_ids_are_not_found() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let alice = StaticSession::user(fx.alice);
    let bob = StaticSession::user(fx.bob);
    let id = created_id(fx.app.entry_create(&alice, &form("mine", "secret")).unwrap());

    assert_eq!(
        fx.app.entry_detail(&bob, &id.to_string()).unwrap(),
        Response::NotFound
    );
    assert_eq!(
        fx.app.entry_edit_form(&bob, &id.to_string()).unwrap(),
        Response::NotFound
    );
    assert_eq!(
        fx.app.entry_detail(&alice, "definitely-not-an-id").unwrap(),
        Response::NotFound
    );
}

#[test]
fn index_lists_recently_edited_first() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let session = StaticSession::user(fx.alice);
    let first = created_id(fx.app.entry_create(&session, &form("first", "a")).unwrap());
    let second = created_id(fx.app.entry_create(&session, &form("second", "b")).unwrap());
    fx.app
        .entry_create(&StaticSession::user(fx.bob), &form("bob", "c"))
        .unwrap();

    // Editing `first` moves it ahead of `second`.
    let Response::Ok { data: before } = fx.app.journal_index(&session).unwrap() else {
        panic!("index should load");
    };
    assert_eq!(before.entry_list_items.len(), 2);

    std::thread::sleep(Duration::from_millis(5));
    fx.app
        .entry_update(&session, &first.to_string(), &form("first", "edited"))
        .unwrap();
    let Response::Ok { data: after } = fx.app.journal_index(&session).unwrap() else {
        panic!("index should load");
    };
    let ids: Vec<_> = after.entry_list_items.iter().map(|item| item.id).collect();
    assert_eq!(ids[0], first);
    assert!(ids.contains(&second));
}

#[test]
fn unchecked_policy_lets_another_user_update() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let alice = StaticSession::user(fx.alice);
    let bob = StaticSession::user(fx.bob);
    let id = created_id(fx.app.entry_create(&alice, &form("mine", "secret")).unwrap());

    let response = fx
        .app
        .entry_update(&bob, &id.to_string(), &form("changed", "by bob"))
        .unwrap();
    assert_eq!(
        response,
        Response::Redirect {
            location: format!("/journal/{id}")
        }
    );

    let Response::Ok { data } = fx.app.entry_detail(&alice, &id.to_string()).unwrap() else {
        panic!("owner still sees the entry");
    };
    assert_eq!(data.entry.title, "changed");
}

#[test]
fn owner_only_policy_turns_foreign_update_into_not_found() {
    let fx = fixture(UpdatePolicy::OwnerOnly);
    let alice = StaticSession::user(fx.alice);
    let bob = StaticSession::user(fx.bob);
    let id = created_id(fx.app.entry_create(&alice, &form("mine", "secret")).unwrap());

    let response = fx
        .app
        .entry_update(&bob, &id.to_string(), &form("changed", "by bob"))
        .unwrap();
    assert_eq!(response, Response::NotFound);

    let Response::Ok { data } = fx.app.entry_detail(&alice, &id.to_string()).unwrap() else {
        panic!("owner still sees the entry");
    };
    assert_eq!(data.entry.title, "mine");
}

#[test]
fn update_validates_before_touching_the_store() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let session = StaticSession::user(fx.alice);

    let response = fx
        .app
        .entry_update(&session, &Uuid::new_v4().to_string(), &form("", "x"))
        .unwrap();
    assert!(matches!(response, Response::Invalid { .. }));

    let missing = fx
        .app
        .entry_update(&session, &Uuid::new_v4().to_string(), &form("t", "b"))
        .unwrap();
    assert_eq!(missing, Response::NotFound);
}

#[test]
fn delete_always_redirects_and_only_removes_owned_entries() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let alice = StaticSession::user(fx.alice);
    let bob = StaticSession::user(fx.bob);
    let id = created_id(fx.app.entry_create(&alice, &form("keep", "me")).unwrap());
    let journal = Response::Redirect {
        location: "/journal".to_string(),
    };

    assert_eq!(fx.app.entry_delete(&bob, &id.to_string()).unwrap(), journal);
    assert!(matches!(
        fx.app.entry_detail(&alice, &id.to_string()).unwrap(),
        Response::Ok { .. }
    ));

    assert_eq!(fx.app.entry_delete(&alice, "garbage").unwrap(), journal);
    assert_eq!(fx.app.entry_delete(&alice, &id.to_string()).unwrap(), journal);
    assert_eq!(
        fx.app.entry_detail(&alice, &id.to_string()).unwrap(),
        Response::NotFound
    );
}

#[test]
fn new_entry_form_offers_catalog_and_dated_title() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let now = NaiveDate::from_ymd_opt(2023, 1, 9)
        .unwrap()
        .and_hms_opt(7, 30, 0)
        .unwrap();

    let Response::Ok { data } = fx
        .app
        .new_entry_form(&StaticSession::user(fx.alice), now)
        .unwrap()
    else {
        panic!("form should load");
    };
    assert_eq!(data.default_title, "January 09, 2023 // 7:30 AM");
    assert_eq!(data.moods.len(), DEFAULT_MOODS.len());
}

#[test]
fn preview_follows_raw_html_policy() {
    let dir = tempfile::tempdir().unwrap();
    let escaping = JournalApp::new(AppConfig {
        db_path: dir.path().join("a.db"),
        ..AppConfig::default()
    });
    let passthrough = JournalApp::new(AppConfig {
        db_path: dir.path().join("b.db"),
        raw_html: RawHtml::Passthrough,
        ..AppConfig::default()
    });

    assert_eq!(escaping.entry_preview(""), None);
    let escaped = escaping.entry_preview("<i>hi</i>").unwrap();
    assert!(!escaped.contains("<i>"));
    let raw = passthrough.entry_preview("<i>hi</i>").unwrap();
    assert!(raw.contains("<i>hi</i>"));
}

#[test]
fn responses_serialize_as_tagged_json() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let session = StaticSession::user(fx.alice);
    created_id(fx.app.entry_create(&session, &form("json", "body")).unwrap());

    let response = fx.app.journal_index(&session).unwrap();
    let value: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    assert_eq!(value["kind"], "ok");
    assert_eq!(value["data"]["entryListItems"][0]["title"], "json");
    assert!(value["data"]["entryListItems"][0]["createdAt"].is_i64());
}

#[test]
fn update_ignores_submitted_moods() {
    let fx = fixture(UpdatePolicy::Unchecked);
    let session = StaticSession::user(fx.alice);
    let id = created_id(fx.app.entry_create(&session, &form("draft", "old")).unwrap());

    let submitted = EntryForm::from_pairs([
        ("title", "final"),
        ("body", "new"),
        ("moods", "not-a-mood-id"),
    ]);
    let response = fx
        .app
        .entry_update(&session, &id.to_string(), &submitted)
        .unwrap();
    assert_eq!(
        response,
        Response::Redirect {
            location: format!("/journal/{id}")
        }
    );

    let Response::Ok { data } = fx.app.entry_detail(&session, &id.to_string()).unwrap() else {
        panic!("entry should load");
    };
    assert_eq!(data.entry.title, "final");
    assert!(data.entry.moods.is_empty());
}

#[test]
fn bootstrap_reads_config_file_and_prefers_db_override() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("moodjournal.toml");
    std::fs::write(
        &config_path,
        "update_policy = \"owner_only\"\nraw_html = \"passthrough\"\n",
    )
    .unwrap();
    let db_path = dir.path().join("override.db");

    let app = JournalApp::bootstrap(Some(&config_path), Some(db_path.clone())).unwrap();
    assert_eq!(app.config().db_path, db_path);
    assert_eq!(app.config().update_policy, UpdatePolicy::OwnerOnly);
    assert_eq!(app.config().raw_html, RawHtml::Passthrough);
}

#[test]
fn bootstrap_surfaces_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        JournalApp::bootstrap(Some(&missing), None),
        Err(AppError::Config(_))
    ));

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "update_policy = \"sometimes\"\n").unwrap();
    let err = JournalApp::bootstrap(Some(&broken), None).unwrap_err();
    assert!(matches!(err, AppError::Config(_)), "unexpected error: {err}");
}
