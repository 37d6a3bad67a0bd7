//! Environment layering on top of the config file.

use figment::Jail;
use std::time::Duration;

use channel_player::config::Config;

const FILE: &str = r#"
[web]
port = 8081

[player]
fallback_timeout = "7s"
"#;

fn load(jail: &mut Jail) -> figment::error::Result<Config> {
    jail.create_file("config.toml", FILE)?;
    Config::load_from_file("config.toml").map_err(|e| e.to_string().into())
}

#[test]
fn prefixed_variables_override_file_and_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("CHANNEL_PLAYER_WEB__PORT", "9000");
        jail.set_env("CHANNEL_PLAYER_CATALOG__REFRESH_INTERVAL", "6h");
        jail.set_env("CHANNEL_PLAYER_PLAYER__ADAPTIVE__LOW_LATENCY_MODE", "false");

        let config = load(jail)?;
        assert_eq!(config.web.port, 9000);
        assert_eq!(
            config.catalog.refresh_interval,
            Some(Duration::from_secs(6 * 3600))
        );
        // Untouched by the environment
        assert_eq!(config.player.fallback_timeout, Duration::from_secs(7));
        assert_eq!(config.web.host, "0.0.0.0");
        assert!(!config.player.adaptive.low_latency_mode);
        assert!(config.player.adaptive.enable_worker);
        Ok(())
    });
}

#[test]
fn unprefixed_variables_are_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("WEB__PORT", "9000");
        jail.set_env("CHANNEL_PLAYERWEB__PORT", "9001");

        let config = load(jail)?;
        assert_eq!(config.web.port, 8081);
        assert_eq!(config.catalog.refresh_interval, None);
        Ok(())
    });
}

#[test]
fn environment_values_are_validated() {
    Jail::expect_with(|jail| {
        jail.set_env("CHANNEL_PLAYER_LIBRARY__RECENT_LIMIT", "0");
        jail.create_file("config.toml", FILE)?;

        let err = Config::load_from_file("config.toml").unwrap_err();
        assert!(err.to_string().contains("recent_limit"));
        Ok(())
    });
}
