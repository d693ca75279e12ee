//! Common test utilities and helpers
#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BASE_ENV: &str = "APP_ENV=local\nAPP_DEBUG=true\n";

pub const BOOTSTRAP_APP: &str = r#"<?php

require_once __DIR__.'/../vendor/autoload.php';

$app = new Laravel\Lumen\Application(
    realpath(__DIR__.'/../')
);

return $app;
"#;

pub const VIEW_CONFIG: &str = r#"<?php

return [
    'paths' => [
        realpath(base_path('resources/views')),
    ],

    'compiled' => realpath(storage_path('framework/views')),
];
"#;

pub const QUEUE_CONFIG: &str = r#"<?php

return [
    'default' => env('QUEUE_DRIVER', 'sync'),

    'connections' => [

        'sync' => [
            'driver' => 'sync',
        ],
    ],
];
"#;

pub const DATABASE_CONFIG: &str = r#"<?php

return [
    'default' => 'mysql',

    'connections' => [

        'mysql' => [
            'driver'   => 'mysql',
            'host'     => env('DB_HOST', 'localhost'),
            'database' => env('DB_DATABASE', 'forge'),
        ],
    ],
];
"#;

pub const FILESYSTEMS_CONFIG: &str = r#"<?php

return [
    'default' => 'local',

    'cloud' => 's3',

    'disks' => [

        'local' => [
            'driver' => 'local',
            'root'   => storage_path('app'),
        ],
    ],
];
"#;

const FRAMEWORK_CONFIG_DIR: &str = "vendor/laravel/lumen-framework/config";

/// Test context builder for setting up test environments
pub struct TestContextBuilder {
    temp_dir: TempDir,
    with_lumen_app: bool,
    initial_files: Vec<(PathBuf, String)>,
}

impl TestContextBuilder {
    /// Create a new test context builder
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            with_lumen_app: false,
            initial_files: Vec::new(),
        })
    }

    /// Lay out a fresh Lumen install: `.env`, bootstrap, stock framework
    /// config and a public directory with a couple of asset dirs
    pub fn with_lumen_app(mut self) -> Self {
        self.with_lumen_app = true;
        self
    }

    /// Add an initial file
    pub fn with_file(mut self, path: impl AsRef<Path>, content: &str) -> Self {
        self.initial_files
            .push((path.as_ref().to_path_buf(), content.to_string()));
        self
    }

    /// Build the test context
    pub fn build(self) -> Result<TestContext> {
        let context = TestContext {
            temp_dir: self.temp_dir,
        };

        if self.with_lumen_app {
            create_lumen_app(context.path())?;
        }

        for (file_path, content) in self.initial_files {
            context.create_file(file_path, &content)?;
        }

        Ok(context)
    }
}

/// Test context that manages temporary directories and cleanup
pub struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    /// Get the path to the test directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file in the test directory
    pub fn create_file(&self, path: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let full_path = self.temp_dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)?;
        Ok(full_path)
    }

    /// Read a file from the test directory
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let full_path = self.temp_dir.path().join(path);
        Ok(fs::read_to_string(full_path)?)
    }

    /// Check if a file exists
    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.temp_dir.path().join(path).exists()
    }

    /// Every `.bak` file under the test directory, sorted
    pub fn backup_files(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        collect_backups(self.path(), &mut found)?;
        found.sort();
        Ok(found)
    }
}

fn collect_backups(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_backups(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext == "bak") {
            found.push(path);
        }
    }
    Ok(())
}

/// Write the files of a freshly installed Lumen application under `path`
pub fn create_lumen_app(path: &Path) -> Result<()> {
    let stock = path.join(FRAMEWORK_CONFIG_DIR);
    fs::create_dir_all(&stock)?;
    fs::write(stock.join("view.php"), VIEW_CONFIG)?;
    fs::write(stock.join("queue.php"), QUEUE_CONFIG)?;
    fs::write(stock.join("database.php"), DATABASE_CONFIG)?;
    fs::write(stock.join("filesystems.php"), FILESYSTEMS_CONFIG)?;

    fs::create_dir_all(path.join("bootstrap"))?;
    fs::write(path.join("bootstrap/app.php"), BOOTSTRAP_APP)?;
    fs::write(path.join(".env"), BASE_ENV)?;

    fs::create_dir_all(path.join("public/css"))?;
    fs::create_dir_all(path.join("public/js"))?;
    fs::write(path.join("public/index.php"), "<?php\n")?;
    Ok(())
}

/// Common assertion helpers
pub mod assertions {
    use std::path::Path;

    /// Assert that a file contains specific content
    pub fn assert_file_contains(path: &Path, content: &str) {
        let file_content = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Failed to read file: {}", path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content: {}",
            path.display(),
            content
        );
    }

    /// Assert that a file does not contain specific content
    pub fn assert_file_not_contains(path: &Path, content: &str) {
        let file_content = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Failed to read file: {}", path.display()));
        assert!(
            !file_content.contains(content),
            "File {} contains unexpected content: {}",
            path.display(),
            content
        );
    }
}
