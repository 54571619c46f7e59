//! Integration tests for the content storage layer.
//!
//! These tests exercise the plain-text storage handler, the version save
//! protocol, translations and editing locks against a real content tree
//! created with tempfile.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use folio::blueprint::{Blueprint, FieldDefinition};
use folio::config::ContentConfig;
use folio::fields::Fields;
use folio::language::{Language, Languages};
use folio::lock::Lock;
use folio::model::{FileModel, Model, Page, Site, UserModel};
use folio::storage::{ContentStorage, PlainTextStorage, StorageError};
use folio::translation::Translation;
use folio::users::{User, Users};
use folio::version::{Version, VersionId};

// =============================================================================
// Test Helpers
// =============================================================================

/// A temporary content tree with a multilingual setup.
struct TestSite {
    dir: TempDir,
    config: ContentConfig,
    languages: Languages,
}

impl TestSite {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
            config: ContentConfig::default(),
            languages: Languages::new(vec![
                Language::new("en", true).expect("en"),
                Language::new("de", false).expect("de"),
            ])
            .expect("languages"),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn page(&self, id: &str, template: &str, blueprint: Blueprint) -> Model {
        Page::new(self.path().join("content").join(id), template, blueprint).into()
    }

    fn article_blueprint(&self) -> Blueprint {
        Blueprint::new(
            "article",
            vec![
                FieldDefinition::new("title", "text"),
                FieldDefinition::new("text", "textarea"),
                FieldDefinition::new("date", "date").translate(false),
            ],
        )
        .expect("blueprint")
    }

    fn en(&self) -> &Language {
        self.languages.default()
    }

    fn de(&self) -> &Language {
        self.languages.find("de").expect("de registered")
    }
}

fn fields(pairs: &[(&str, &str)]) -> Fields {
    pairs.iter().copied().collect()
}

// =============================================================================
// Upsert protocol
// =============================================================================

#[test]
fn save_protocol_creates_once_then_updates_in_place() {
    let site = TestSite::new();
    let model = site.page("blog/first", "article", site.article_blueprint());
    let storage = PlainTextStorage::new(&model, &site.config);
    let version = Version::new(&model, &storage, VersionId::Published);

    version
        .save(site.en(), fields(&[("title", "First"), ("text", "Hello")]))
        .expect("initial save");

    let file = storage
        .content_file(VersionId::Published, site.en())
        .expect("path");
    assert!(file.is_file());

    version
        .save(site.en(), fields(&[("title", "Updated"), ("text", "World")]))
        .expect("second save");

    // same path, new contents, no duplicate files
    let read = version.read(site.en()).expect("read");
    assert_eq!(read.value("title"), Some("Updated"));

    let entries: Vec<PathBuf> = std::fs::read_dir(file.parent().expect("parent"))
        .expect("read dir")
        .map(|e| e.expect("entry").path())
        .collect();
    assert_eq!(entries, vec![file]);
}

#[test]
fn update_alone_refuses_to_create() {
    let site = TestSite::new();
    let model = site.page("blog/first", "article", site.article_blueprint());
    let storage = PlainTextStorage::new(&model, &site.config);
    let version = Version::new(&model, &storage, VersionId::Published);

    let err = version
        .update(site.en(), fields(&[("title", "First")]))
        .expect_err("update on missing slot");
    assert!(err.is_not_found());
    assert!(!version.exists(site.en()));
}

// =============================================================================
// Multilingual storage
// =============================================================================

#[test]
fn languages_store_in_separate_files() {
    let site = TestSite::new();
    let model = site.page("about", "default", site.article_blueprint());
    let storage = PlainTextStorage::new(&model, &site.config);

    storage
        .create(VersionId::Published, site.en(), fields(&[("title", "About")]))
        .expect("create en");
    storage
        .create(VersionId::Published, site.de(), fields(&[("title", "Info")]))
        .expect("create de");

    let root = site.path().join("content/about");
    assert!(root.join("default.en.txt").is_file());
    assert!(root.join("default.de.txt").is_file());

    let en = storage.read(VersionId::Published, site.en()).expect("read en");
    let de = storage.read(VersionId::Published, site.de()).expect("read de");
    assert_eq!(en.value("title"), Some("About"));
    assert_eq!(de.value("title"), Some("Info"));
}

#[test]
fn non_default_translations_never_carry_untranslatable_content() {
    let site = TestSite::new();
    let model = site.page("blog/first", "article", site.article_blueprint());
    let storage = PlainTextStorage::new(&model, &site.config);

    let incoming = fields(&[
        ("title", "Erster"),
        ("date", "2024-03-01"),
        ("uuid", "page-1"),
    ]);
    storage
        .create(VersionId::Published, site.de(), incoming)
        .expect("create de");

    let read = storage.read(VersionId::Published, site.de()).expect("read");
    assert_eq!(read.value("title"), Some("Erster"));
    assert_eq!(read.value("date"), None);
    assert_eq!(read.value("uuid"), None);

    // the default language keeps both
    storage
        .create(
            VersionId::Published,
            site.en(),
            fields(&[("title", "First"), ("date", "2024-03-01"), ("uuid", "page-1")]),
        )
        .expect("create en");
    let read = storage.read(VersionId::Published, site.en()).expect("read");
    assert_eq!(read.value("date"), Some("2024-03-01"));
    assert_eq!(read.value("uuid"), Some("page-1"));
}

#[test]
fn single_language_site_files_have_no_suffix() {
    let site = TestSite::new();
    let model = site.page("home", "default", Blueprint::empty("default"));
    let storage = PlainTextStorage::new(&model, &site.config);
    let single = Language::single();

    storage
        .create(VersionId::Published, &single, fields(&[("title", "Home")]))
        .expect("create");

    assert!(site.path().join("content/home/default.txt").is_file());
}

// =============================================================================
// Promoting changes
// =============================================================================

#[test]
fn promote_changes_to_published() {
    let site = TestSite::new();
    let model = site.page("blog/first", "article", site.article_blueprint());
    let storage = PlainTextStorage::new(&model, &site.config);
    let published = Version::new(&model, &storage, VersionId::Published);
    let changes = Version::new(&model, &storage, VersionId::Changes);

    published
        .create(site.en(), fields(&[("title", "Old")]))
        .expect("published");
    changes
        .create(site.en(), fields(&[("title", "New")]))
        .expect("changes");

    let root = site.path().join("content/blog/first");
    assert!(root.join("_changes/article.en.txt").is_file());

    changes
        .move_to(site.en(), VersionId::Published, site.en())
        .expect("promote");

    assert!(!changes.exists(site.en()));
    assert_eq!(
        published.read(site.en()).expect("read").value("title"),
        Some("New")
    );

    // the leftover empty _changes directory is collected by delete
    changes.delete(site.en()).expect("gc");
    assert!(!root.join("_changes").exists());
}

#[test]
fn discarding_changes_cleans_up() {
    let site = TestSite::new();
    let model = site.page("blog/first", "article", site.article_blueprint());
    let storage = PlainTextStorage::new(&model, &site.config);
    let changes = Version::new(&model, &storage, VersionId::Changes);

    changes
        .create(site.en(), fields(&[("title", "Scrapped")]))
        .expect("changes");
    changes.delete(site.en()).expect("discard");

    assert!(!site.path().join("content/blog/first/_changes").exists());

    // discarding again is a no-op
    changes.delete(site.en()).expect("discard again");
}

// =============================================================================
// Model kinds
// =============================================================================

#[test]
fn file_model_end_to_end() {
    let site = TestSite::new();
    let dir = site.path().join("content/photography");
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join("sunset.jpg"), b"jpeg").expect("media file");

    let model: Model = FileModel::new(dir.join("sunset.jpg"), Blueprint::empty("image"))
        .expect("file model")
        .template("cover")
        .into();
    let storage = PlainTextStorage::new(&model, &site.config);

    storage
        .create(VersionId::Published, site.en(), fields(&[("alt", "Sunset")]))
        .expect("create");

    assert!(dir.join("sunset.jpg.en.txt").is_file());
    let read = storage.read(VersionId::Published, site.en()).expect("read");
    assert_eq!(read.value("template"), Some("cover"));
    assert_eq!(read.value("alt"), Some("Sunset"));
}

#[test]
fn site_and_user_models_end_to_end() {
    let site = TestSite::new();

    let site_model: Model = Site::new(site.path().join("content"), Blueprint::empty("site")).into();
    let storage = PlainTextStorage::new(&site_model, &site.config);
    storage
        .create(
            VersionId::Published,
            site.en(),
            fields(&[("copyright", "2024"), ("title", "My Site")]),
        )
        .expect("site create");
    let read = storage.read(VersionId::Published, site.en()).expect("read");
    assert_eq!(read.keys().next(), Some("title"));

    let user_model: Model = UserModel::new(
        site.path().join("site/accounts/u1"),
        "u1",
        Blueprint::empty("user"),
    )
    .into();
    let storage = PlainTextStorage::new(&user_model, &site.config);
    storage
        .create(
            VersionId::Published,
            site.en(),
            fields(&[("email", "u@example.com"), ("bio", "Hello")]),
        )
        .expect("user create");
    let read = storage.read(VersionId::Published, site.en()).expect("read");
    assert_eq!(read.keys().collect::<Vec<_>>(), vec!["bio"]);
    assert!(site.path().join("site/accounts/u1/user.en.txt").is_file());
}

#[test]
fn draft_pages_reject_both_versions() {
    let site = TestSite::new();
    let model: Model = Page::new(
        site.path().join("content/_drafts/wip"),
        "article",
        site.article_blueprint(),
    )
    .draft(true)
    .into();
    let storage = PlainTextStorage::new(&model, &site.config);

    for version in [VersionId::Published, VersionId::Changes] {
        let err = storage
            .read(version, site.en())
            .expect_err("draft slot must be rejected");
        assert!(matches!(err, StorageError::InvalidRequest(_)));

        let err = storage
            .create(version, site.en(), fields(&[("title", "Nope")]))
            .expect_err("draft create must be rejected");
        assert!(matches!(err, StorageError::InvalidRequest(_)));
    }
}

// =============================================================================
// Locks
// =============================================================================

#[test]
fn lock_lifecycle_via_changes_slot() {
    let site = TestSite::new();
    let model = site.page("blog/first", "article", site.article_blueprint());
    let storage = PlainTextStorage::new(&model, &site.config);
    let users = Users::new(vec![
        User::new("alice", Some("alice@example.com".into())),
        User::new("bob", Some("bob@example.com".into())),
    ])
    .expect("users");
    let alice = User::new("alice", Some("alice@example.com".into()));
    let bob = User::new("bob", Some("bob@example.com".into()));

    let lock = |authenticated: &User| {
        Lock::for_model(
            &storage,
            &site.languages,
            &users,
            &site.config,
            authenticated,
            None,
        )
        .expect("lock")
        .expect("locking enabled")
    };

    // no pending changes: inactive
    assert!(!lock(&alice).is_active());

    // bob starts editing; the model layer records his id in the slot
    storage
        .create(
            VersionId::Changes,
            site.en(),
            fields(&[("title", "Bob's edit"), ("lock", "bob")]),
        )
        .expect("bob edits");

    let for_alice = lock(&alice);
    assert!(for_alice.is_active());
    assert_eq!(for_alice.user().id(), "bob");
    assert_eq!(for_alice.to_json()["user"]["email"], "bob@example.com");

    let for_bob = lock(&bob);
    assert!(!for_bob.is_active());

    // bob discards his changes; the lock dissolves with the slot
    storage
        .delete(VersionId::Changes, site.en())
        .expect("discard");
    assert!(!lock(&alice).is_active());
}

// =============================================================================
// Translations
// =============================================================================

#[test]
fn translation_views_over_a_version() {
    let site = TestSite::new();
    let model = site.page("blog/first", "article", site.article_blueprint());
    let storage = PlainTextStorage::new(&model, &site.config);
    let version = Version::new(&model, &storage, VersionId::Published);

    version
        .create(site.en(), fields(&[("title", "First")]))
        .expect("en");

    let translation = Translation::create(
        version,
        site.de(),
        fields(&[("title", "Erster")]),
        Some("erster-beitrag"),
    )
    .expect("de translation");

    assert!(translation.exists());
    assert_eq!(translation.slug().expect("slug"), Some("erster-beitrag".into()));
    assert_eq!(
        translation.content().expect("content").get("title").value(),
        Some("Erster")
    );

    // the default translation has no custom slug
    let default = Translation::new(version, site.en());
    assert_eq!(default.slug().expect("slug"), None);
}

// =============================================================================
// Content views over storage
// =============================================================================

#[test]
fn content_conversion_feeds_back_into_storage() {
    let site = TestSite::new();
    let old = Blueprint::new(
        "article",
        vec![
            FieldDefinition::new("title", "text"),
            FieldDefinition::new("color", "text"),
        ],
    )
    .expect("old");
    let new = Blueprint::new(
        "gallery",
        vec![
            FieldDefinition::new("title", "text"),
            FieldDefinition::new("size", "text").default_value("M"),
        ],
    )
    .expect("new");

    let model = site.page("blog/first", "article", old.clone());
    let storage = PlainTextStorage::new(&model, &site.config);
    let version = Version::new(&model, &storage, VersionId::Published);

    version
        .create(site.en(), fields(&[("title", "A"), ("color", "red")]))
        .expect("create");

    let converted = version
        .content(site.en())
        .expect("content")
        .convert_to(&old, &new);
    version.save(site.en(), converted).expect("save converted");

    let read = version.read(site.en()).expect("read");
    assert_eq!(read.value("title"), Some("A"));
    assert_eq!(read.value("size"), Some("M"));
    assert_eq!(read.value("color"), Some("red"));
}
