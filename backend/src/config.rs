use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use log::info;

/// Runtime settings, all environment-driven with logged defaults so a bare
/// `cargo run` comes up on localhost with a database file in the working
/// directory.
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub media_dir: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Config {
            host: try_load("PORTAL_HOST", "127.0.0.1"),
            port: try_load("PORTAL_PORT", "8080"),
            db_path: PathBuf::from(try_load::<String>("PORTAL_DB", "portal.sqlite")),
            media_dir: PathBuf::from(try_load::<String>("PORTAL_MEDIA_DIR", "media")),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    });
    match raw.parse() {
        Ok(value) => value,
        Err(e) => panic!("invalid value for {}: {}", key, e),
    }
}
