use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
endpoint_url = "https://sheet.example/exec"
mutation_policy = "strict"
request_timeout_secs = 20
"#,
    )
    .expect("parse");

    assert_eq!(
        settings.endpoint_url.as_deref(),
        Some("https://sheet.example/exec")
    );
    assert_eq!(settings.mutation_policy, MutationPolicy::RequireSuccessStatus);
    assert_eq!(settings.request_timeout_secs, Some(20));
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let mut settings = Settings {
        endpoint_url: Some("https://file.example/exec".into()),
        ..Settings::default()
    };
    apply_env(
        &mut settings,
        env_of(&[
            ("PORTAL_ENDPOINT_URL", "https://plain.example/exec"),
            ("APP__ENDPOINT_URL", "https://app.example/exec"),
            ("APP__MUTATION_POLICY", "Strict"),
            ("APP__REQUEST_TIMEOUT_SECS", "7"),
        ]),
    );

    assert_eq!(
        settings.endpoint_url.as_deref(),
        Some("https://app.example/exec")
    );
    assert_eq!(settings.mutation_policy, MutationPolicy::RequireSuccessStatus);
    assert_eq!(settings.request_timeout_secs, Some(7));
}

#[test]
fn invalid_env_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_of(&[
            ("APP__MUTATION_POLICY", "sometimes"),
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
        ]),
    );
    assert_eq!(settings, Settings::default());
}

#[test]
fn flag_overrides_settings_endpoint() {
    let settings = Settings {
        endpoint_url: Some("https://file.example/exec".into()),
        request_timeout_secs: Some(3),
        ..Settings::default()
    };
    let cfg = gateway_config(&settings, Some("http://127.0.0.1:9000/exec")).expect("config");
    assert_eq!(cfg.endpoint.as_str(), "http://127.0.0.1:9000/exec");
    assert_eq!(cfg.mutation_policy, MutationPolicy::Lenient);
    assert_eq!(cfg.request_timeout, Some(Duration::from_secs(3)));
}

#[test]
fn missing_endpoint_is_an_error() {
    assert!(gateway_config(&Settings::default(), None).is_err());
}

#[test]
fn non_http_endpoint_is_rejected() {
    assert!(gateway_config(&Settings::default(), Some("ftp://sheet.example")).is_err());
    assert!(gateway_config(&Settings::default(), Some("not a url")).is_err());
}

#[test]
fn explicit_config_file_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("portal_missing_{suffix}.toml"));
    assert!(load_settings(Some(&missing)).is_err());
}

#[test]
fn loads_explicit_config_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("portal_config_{suffix}.toml"));
    fs::write(&path, "request_timeout_secs = 12\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.request_timeout_secs, Some(12));

    fs::remove_file(path).expect("cleanup");
}
