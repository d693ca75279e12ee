//! # gae-setup
//!
//! Prepares a Lumen application for deployment to Google App Engine by
//! patching its env and config files in place. Every rewrite is idempotent
//! and preceded by a backup of the original.
//!
//! ## Usage
//!
//! ```bash
//! gae-setup configure [--path DIR] [--app-id ID] [--generate-config] [--db-socket S --db-name N]
//! gae-setup restore config/database.php
//! ```
//!
//! ## Modules
//!
//! - `store` - Ordered env-file model that round-trips comments and blank lines
//! - `rules` - Named text transformations and the registry that dispatches them
//! - `backup` - Backup naming, restore and listing
//! - `processor` - Read, transform, back up and write a single file
//! - `generator` - `.env.production` and `.env.local` derived from `.env`
//! - `artifacts` - `app.yaml`, `php.ini` and stock framework config seeding
//! - `configurator` - The full setup run with per-step reporting
//! - `config` - Resolved paths and setup options
//! - `env` - Filesystem abstraction with real and in-memory implementations
//! - `interaction` - Console output and confirmation prompts
pub mod artifacts;
pub mod backup;
pub mod cli;
pub mod config;
pub mod configurator;
pub mod env;
pub mod error;
pub mod generator;
pub mod interaction;
pub mod processor;
pub mod rules;
pub mod store;

pub use configurator::{Configurator, SetupReport};
pub use error::{SetupError, SetupResult};
