//! Tests for layered settings.

use config::Map;
use panelcraft::{Genre, PanelcraftConfig, VoiceHandle};
use std::io::Write;

const TOML: &str = r#"
[provider]
base_url = "http://localhost:8080/v1"
chat_model = "local-chat"
timeout_secs = 30

[pipeline]
retry_backoff_ms = 250
placeholder_mode = true

[session]
default_panel_count = 8
default_genre = "noir"

[narration]
voice = "Daniel"
words_per_minute = 150
"#;

fn env(pairs: &[(&str, &str)]) -> Map<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_toml_sections_are_read() {
    let config = PanelcraftConfig::from_toml(TOML, Map::new()).unwrap();
    assert_eq!(config.provider().base_url(), "http://localhost:8080/v1");
    assert_eq!(config.provider().chat_model(), "local-chat");
    assert_eq!(config.provider().image_model(), "gpt-image-1");
    assert_eq!(*config.provider().timeout_secs(), 30);
    assert_eq!(*config.pipeline().retry_backoff_ms(), 250);
    assert!(*config.pipeline().placeholder_mode());
    assert_eq!(config.session().default_panel_count().get(), 8);
    assert_eq!(*config.session().default_genre(), Genre::Noir);
    assert_eq!(config.narration().voice(), &Some(VoiceHandle::from("Daniel")));
    assert_eq!(*config.narration().words_per_minute(), 150);
}

#[test]
fn test_environment_overrides_file() {
    let config = PanelcraftConfig::from_toml(
        TOML,
        env(&[
            ("PANELCRAFT_PROVIDER__API_KEY", "sk-test"),
            ("PANELCRAFT_PIPELINE__PLACEHOLDER_MODE", "false"),
            ("PANELCRAFT_SESSION__DEFAULT_GENRE", "sci-fi"),
            ("UNRELATED_VARIABLE", "ignored"),
        ]),
    )
    .unwrap();
    assert_eq!(config.provider().api_key(), "sk-test");
    assert!(!*config.pipeline().placeholder_mode());
    assert_eq!(*config.session().default_genre(), Genre::SciFi);
    assert_eq!(config.provider().chat_model(), "local-chat");
}

#[test]
fn test_out_of_range_panel_count_is_rejected() {
    let toml = "[session]\ndefault_panel_count = 12\n";
    assert!(PanelcraftConfig::from_toml(toml, Map::new()).is_err());
}

#[test]
fn test_api_key_is_redacted_in_debug() {
    let config = PanelcraftConfig::from_toml("", env(&[("PANELCRAFT_PROVIDER__API_KEY", "sk-secret")])).unwrap();
    assert!(!format!("{config:?}").contains("sk-secret"));
}

#[test]
fn test_load_reads_explicit_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(TOML.as_bytes()).unwrap();
    let config = PanelcraftConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.session().default_panel_count().get(), 8);
}

#[test]
fn test_load_fails_on_missing_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PanelcraftConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
}
