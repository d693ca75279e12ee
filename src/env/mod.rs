//! Filesystem abstraction for dependency injection and testing
//!
//! Every file the setup engine touches goes through [`FileEnv`], so the
//! engine can run against the real disk or against an in-memory tree.
//!
//! - **Traits**: [`FileEnv`] defines the capabilities the engine relies on
//! - **Real Implementation**: [`RealFileEnv`] delegates to `std::fs`, with
//!   atomic writes through a same-directory temp file
//! - **Mock Implementation**: [`MockFileEnv`] keeps files in memory
//!
//! # Usage
//!
//! ```
//! use gae_setup::env::{FileEnv, MockFileEnv};
//! use std::path::Path;
//!
//! let fs = MockFileEnv::new();
//! fs.add_file("/app/.env", "APP_ENV=local\n");
//!
//! let content = fs.read_to_string(Path::new("/app/.env")).unwrap();
//! assert_eq!(content, "APP_ENV=local\n");
//! ```

mod mock;
mod real;
mod traits;

pub use mock::MockFileEnv;
pub use real::RealFileEnv;
pub use traits::FileEnv;
