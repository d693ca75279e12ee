//! The built-in App Engine rules
//!
//! Each function takes the current file text and returns the patched text,
//! or the input unchanged when the edit is absent or already applied.

use super::primitives::{guarded_rewrite, replace_literal, replace_pattern, Occurrences};
use once_cell::sync::Lazy;
use regex::Regex;

pub const LUMEN_APPLICATION_CLASS: &str = r"Laravel\Lumen\Application";
pub const GAE_APPLICATION_CLASS: &str = r"Shpasser\GaeSupportLumen\Foundation\Application";

const COMPILED_PATH_LINE: &str =
    "'compiled' => env('COMPILED_PATH', storage_path().'/framework/views'),";
const DB_DEFAULT_LINE: &str = "'default' => env('DB_CONNECTION', 'mysql')";
const FILESYSTEM_DEFAULT_LINE: &str = "'default' => env('FILESYSTEM', 'local')";

const GAE_QUEUE_CONNECTION: &str = "'connections' => [

        'gae' => [
            'driver'  => 'gae',
            'queue'   => 'default',
            'url'     => '/tasks',
            'encrypt' => true,
        ],";

const CLOUD_SQL_CONNECTION: &str = "'connections' => [

        'cloudsql' => [
            'driver'      => 'mysql',
            'unix_socket' => env('CLOUD_SQL_SOCKET'),
            'host'        => env('CLOUD_SQL_HOST'),
            'database'    => env('CLOUD_SQL_DATABASE'),
            'username'    => env('CLOUD_SQL_USERNAME'),
            'password'    => env('CLOUD_SQL_PASSWORD'),
            'charset'     => 'utf8',
            'collation'   => 'utf8_unicode_ci',
            'prefix'      => '',
            'strict'      => false,
        ],";

const GAE_DISK: &str = "'disks' => [

        'gae' => [
            'driver' => 'gae',
            'root'   => storage_path().'/app',
        ],";

static COMPILED_PATH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)'compiled'\s*=>.*$").expect("Valid regex pattern"));

/// A `'default' => '<name>'` selector line
static DEFAULT_SELECTOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'default'.*=>\s*'\b.+\b'").expect("Valid regex pattern"));

static CONNECTIONS_ANCHOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'connections'\s*=>\s*\[").expect("Valid regex pattern"));

static DISKS_ANCHOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'disks'\s*=>\s*\[").expect("Valid regex pattern"));

/// Swap the Lumen application class for the App Engine one
pub fn replace_app_class(contents: &str) -> String {
    replace_literal(contents, LUMEN_APPLICATION_CLASS, GAE_APPLICATION_CLASS)
}

/// Point the compiled views path at an env-overridable location
pub fn replace_compiled_path(contents: &str) -> String {
    replace_pattern(
        contents,
        &COMPILED_PATH_REGEX,
        COMPILED_PATH_LINE,
        Occurrences::All,
    )
}

/// Insert the `gae` queue connection
pub fn add_queue_config(contents: &str) -> String {
    guarded_rewrite(
        contents,
        "'gae'",
        &[(&CONNECTIONS_ANCHOR_REGEX, GAE_QUEUE_CONNECTION)],
    )
}

/// Insert the `cloudsql` connection and make the default env-selectable
pub fn add_cloud_sql_config(contents: &str) -> String {
    guarded_rewrite(
        contents,
        "'cloudsql'",
        &[
            (&DEFAULT_SELECTOR_REGEX, DB_DEFAULT_LINE),
            (&CONNECTIONS_ANCHOR_REGEX, CLOUD_SQL_CONNECTION),
        ],
    )
}

/// Insert the `gae` disk and make the default env-selectable
pub fn add_gae_disk(contents: &str) -> String {
    guarded_rewrite(
        contents,
        "'gae'",
        &[
            (&DEFAULT_SELECTOR_REGEX, FILESYSTEM_DEFAULT_LINE),
            (&DISKS_ANCHOR_REGEX, GAE_DISK),
        ],
    )
}
