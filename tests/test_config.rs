//! Configuration layering tests
//!
//! Tests touching process environment variables run under `#[serial]`.

use std::io::Write;

use serial_test::serial;

use github_toolkit::config::{
    ConfigError, ENV_API_URL, ENV_APP_ID, ENV_APP_PRIVATE_KEY, ENV_PERSONAL_ACCESS_TOKEN,
    ENV_REPOSITORY, WrapperConfig, resolve_access_token,
};
use github_toolkit::loaders::GitHubIssuesLoader;

const WRAPPER_VARS: [&str; 4] = [ENV_REPOSITORY, ENV_APP_ID, ENV_APP_PRIVATE_KEY, ENV_API_URL];

fn clear_env(keys: &[&str]) {
    for key in keys {
        unsafe { std::env::remove_var(key) };
    }
}

fn set_env(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) };
}

#[test]
#[serial]
fn test_from_env_reads_wrapper_variables() {
    clear_env(&WRAPPER_VARS);
    set_env(ENV_REPOSITORY, "owner/repo");
    set_env(ENV_APP_ID, "12345");
    set_env(ENV_APP_PRIVATE_KEY, "secret");
    set_env(ENV_API_URL, "   ");

    let config = WrapperConfig::from_env();
    assert_eq!(config.repository.as_deref(), Some("owner/repo"));
    assert_eq!(config.app_id.as_deref(), Some("12345"));
    assert_eq!(config.private_key.as_deref(), Some("secret"));
    // blank values count as unset
    assert_eq!(config.api_base_url, None);

    let validated = config.validate().unwrap();
    assert_eq!(validated.repository.full_name(), "owner/repo");
    clear_env(&WRAPPER_VARS);
}

#[test]
#[serial]
fn test_env_fallback_only_fills_gaps() {
    clear_env(&WRAPPER_VARS);
    set_env(ENV_REPOSITORY, "env/repo");
    set_env(ENV_APP_ID, "1");
    set_env(ENV_APP_PRIVATE_KEY, "env-key");

    let explicit = WrapperConfig {
        repository: Some("flag/repo".to_string()),
        active_branch: Some("feature".to_string()),
        ..Default::default()
    };
    let config = explicit.with_env_fallback();

    assert_eq!(config.repository.as_deref(), Some("flag/repo"));
    assert_eq!(config.private_key.as_deref(), Some("env-key"));
    assert_eq!(config.active_branch.as_deref(), Some("feature"));
    clear_env(&WRAPPER_VARS);
}

#[test]
#[serial]
fn test_missing_environment_reports_repository_first() {
    clear_env(&WRAPPER_VARS);
    let err = WrapperConfig::from_env().validate().unwrap_err();
    assert_eq!(err, ConfigError::MissingRepository);
}

#[test]
#[serial]
fn test_access_token_resolution() {
    clear_env(&[ENV_PERSONAL_ACCESS_TOKEN]);
    assert_eq!(
        resolve_access_token(None).unwrap_err(),
        ConfigError::MissingAccessToken
    );

    set_env(ENV_PERSONAL_ACCESS_TOKEN, "from-env");
    assert_eq!(resolve_access_token(None).unwrap(), "from-env");
    assert_eq!(
        resolve_access_token(Some("explicit".to_string())).unwrap(),
        "explicit"
    );
    assert_eq!(resolve_access_token(Some(String::new())).unwrap(), "from-env");
    clear_env(&[ENV_PERSONAL_ACCESS_TOKEN]);
}

#[test]
#[serial]
fn test_loader_without_token_fails() {
    clear_env(&[ENV_PERSONAL_ACCESS_TOKEN]);
    let err = GitHubIssuesLoader::new("owner/repo", None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "GITHUB_PERSONAL_ACCESS_TOKEN environment variable is required"
    );
}

#[test]
fn test_toml_file_layered_under_flags() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
repository = "file/repo"
app_id = "42"
private_key = "file-key"
base_branch = "develop"
timeout_secs = 30
"#
    )
    .unwrap();

    let from_file = WrapperConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(from_file.base_branch.as_deref(), Some("develop"));
    assert_eq!(from_file.timeout_secs, Some(30));

    let flags = WrapperConfig {
        app_id: Some("7".to_string()),
        ..Default::default()
    };
    let validated = flags.merge(from_file).validate().unwrap();
    assert_eq!(validated.app_id, "7");
    assert_eq!(validated.repository.full_name(), "file/repo");
    assert_eq!(validated.base_branch.as_deref(), Some("develop"));
    assert_eq!(validated.timeout, Some(std::time::Duration::from_secs(30)));
}

#[test]
fn test_malformed_toml_file_names_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "repository = [unterminated").unwrap();

    let err = WrapperConfig::from_toml_file(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse config file"));
}
