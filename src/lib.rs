//! Folio - flat-file content versioning and storage
//!
//! Folio maps content-bearing models (pages, files, the site, users) and
//! languages to plain-text files on disk, tracks two simultaneous versions
//! of that content (published vs. pending changes) and derives advisory
//! editing locks from the stored data.
//!
//! # Architecture
//!
//! The crate is layered bottom-up:
//!
//! - [`config`] - Explicit storage configuration (extension, uuids, locking)
//! - [`fields`] - The ordered, case-insensitive raw field map
//! - [`language`] - Languages and the single-language marker
//! - [`users`] - User identities and the lookup registry
//! - [`blueprint`] - Declared field lists for normalization and conversion
//! - [`model`] - The closed set of content-bearing model kinds
//! - [`storage`] - The storage contract and its plain-text implementation
//! - [`version`] - Version identifiers, handles and the save protocol
//! - [`content`] - Keyed field access over stored data
//! - [`translation`] - Per-language views over a version
//! - [`lock`] - Editing-lock state derived from the changes slot
//!
//! # Correctness Invariants
//!
//! 1. At most one file exists per (model, version, language) slot
//! 2. Writes replace content atomically (temp file + rename)
//! 3. `NotFound` from `update` is the only trigger for create fallback
//! 4. Deleting an absent slot succeeds; empty changes directories are
//!    removed
//! 5. Field maps are normalized exactly once, on write, never on read

pub mod blueprint;
pub mod config;
pub mod content;
pub mod fields;
pub mod language;
pub mod lock;
pub mod model;
pub mod storage;
pub mod translation;
pub mod users;
pub mod version;
