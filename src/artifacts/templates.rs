//! Text templates for App Engine deployment files

/// Cloud Storage bucket the runtime may include files from
pub fn storage_bucket(app_id: &str, bucket_id: Option<&str>) -> String {
    match bucket_id {
        Some(bucket) => bucket.to_string(),
        None => format!("{app_id}.appspot.com"),
    }
}

/// `app.yaml` with one static handler per public subdirectory
pub fn render_app_yaml(app_id: &str, static_dirs: &[String]) -> String {
    let mut handlers = String::new();
    for dir in static_dirs {
        handlers.push_str(&format!(
            "\n        - url: /{dir}\n          static_dir: public/{dir}\n"
        ));
    }

    format!(
        r"application:    {app_id}
version:        1
runtime:        php55
api_version:    1

handlers:
        - url: /favicon\.ico
          static_files: public/favicon.ico
          upload: public/favicon\.ico
{handlers}
        - url: /.*
          script: public/index.php

skip_files:
        - ^(.*/)?#.*#$
        - ^(.*/)?.*~$
        - ^(.*/)?.*\.py[co]$
        - ^(.*/)?.*/RCS/.*$
        - ^(.*/)?\.(?!env).*$
        - ^(.*/)?node_modules.*$
        - ^(.*/)?_ide_helper\.php$
        - ^(.*/)?\.DS_Store$

env_variables:
        GAE_SKIP_GCS_INIT: false
"
    )
}

/// `php.ini` enabling the functions Lumen needs on App Engine
pub fn render_php_ini(storage_bucket: &str) -> String {
    format!(
        r#"; enable function that are disabled by default in the App Engine PHP runtime
google_app_engine.enable_functions = "php_sapi_name, php_uname, getmypid"
google_app_engine.allow_include_gs_buckets = "{storage_bucket}"
allow_url_include = 1
"#
    )
}
