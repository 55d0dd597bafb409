use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Layered config loading. An optional settings file (`FILE`, any format the `config` crate
/// detects from the extension) sits below `APP_`-prefixed environment variables, with `__`
/// separating nested keys (`APP_AUTH__JWT_SECRET` -> `auth.jwt_secret`).
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";
    const FILE: Option<&'static str> = None;

    fn load_dotenv() {
        // crate root first, then the working directory
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        if let Err(err) =
            dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv())
        {
            if !err.not_found() {
                eprintln!("ignoring unreadable .env: {err}");
            }
        }
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn settings() -> Result<config_rs::Config> {
        let mut builder = config_rs::Config::builder();
        if let Some(file) = Self::FILE {
            builder = builder.add_source(config_rs::File::with_name(file).required(false));
        }
        builder
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("failed to read config sources")
    }

    fn from_settings(settings: config_rs::Config) -> Result<Self> {
        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();
        Self::from_settings(Self::settings()?)
    }
}
