use resume_submit::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../resume-submit.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.http.api_base, "http://localhost:3001");
    assert_eq!(cfg.http.timeout_seconds, 30);
    assert!(!cfg.logging.write_to_file);
}

#[test]
fn partial_config_keeps_defaults() {
    let cfg: Config = toml::from_str("[http]\napi_base = \"https://api.example.com\"\n").unwrap();
    assert_eq!(cfg.http.api_base, "https://api.example.com");
    assert_eq!(cfg.http.timeout_seconds, 30);
    assert_eq!(cfg.http.max_redirects, 10);
    assert_eq!(cfg.logging.level, "warn");
}

#[test]
fn empty_config_is_default() {
    let cfg: Config = toml::from_str("").unwrap();
    assert_eq!(cfg.http.api_base, Config::default().http.api_base);
}
