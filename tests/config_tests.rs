// Configuration loading tests

use anyhow::Result;
use dilse::session::SessionMode;
use dilse::Config;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_toml(contents: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn test_shipped_config_loads() -> Result<()> {
    let cfg = Config::load("config/dilse")?;

    assert_eq!(cfg.service.name, "dilse");
    assert_eq!(cfg.session.mode, SessionMode::Freeform);
    assert!(cfg.session.greeting);
    assert!(!cfg.nats.enabled);
    assert_eq!(cfg.storage.sessions_path, "~/.dilse/sessions");
    assert_eq!(cfg.profile.full_name.as_deref(), Some("Guest"));

    Ok(())
}

#[test]
fn test_optional_sections_default() -> Result<()> {
    let file = write_toml(
        r#"
[service]
name = "minimal"

[service.http]
bind = "0.0.0.0"
port = 9000

[storage]
sessions_path = "/tmp/sessions"
"#,
    )?;

    let cfg = Config::load(file.path().to_str().expect("utf-8 temp path"))?;

    assert_eq!(cfg.service.http.port, 9000);
    assert_eq!(cfg.session.mode, SessionMode::Freeform);
    assert!(cfg.session.greeting);
    assert!(!cfg.nats.enabled);
    assert_eq!(cfg.nats.url, "nats://localhost:4222");
    assert!(cfg.profile.focus_areas.is_empty());

    Ok(())
}

#[test]
fn test_guided_mode_and_focus_areas() -> Result<()> {
    let file = write_toml(
        r#"
[service]
name = "guided"

[service.http]
bind = "127.0.0.1"
port = 8089

[session]
mode = "guided"
greeting = false

[storage]
sessions_path = "/tmp/sessions"

[profile]
focus_areas = ["anxiety", "sleep"]
"#,
    )?;

    let cfg = Config::load(file.path().to_str().expect("utf-8 temp path"))?;

    assert_eq!(cfg.session.mode, SessionMode::Guided);
    assert!(!cfg.session.greeting);
    assert_eq!(cfg.profile.focus_areas, vec!["anxiety", "sleep"]);

    Ok(())
}

#[test]
fn test_missing_required_section_fails() -> Result<()> {
    let file = write_toml(
        r#"
[service]
name = "no-storage"

[service.http]
bind = "127.0.0.1"
port = 8088
"#,
    )?;

    assert!(Config::load(file.path().to_str().expect("utf-8 temp path")).is_err());

    Ok(())
}
