use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,
    pub seed_demo_data: bool,

    // Server
    pub port: u16,

    // Admin
    pub admin_pin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let admin_pin = std::env::var("ADMIN_PIN")
            .unwrap_or_else(|_| "2468".to_string())
            .trim()
            .to_string();
        if admin_pin.is_empty() {
            bail!("ADMIN_PIN cannot be empty");
        }

        Ok(Self {
            // Database
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/wayfinder.sqlite".to_string()),
            seed_demo_data: match std::env::var("SEED_DEMO_DATA") {
                Ok(value) => parse_bool(&value).context("SEED_DEMO_DATA must be true or false")?,
                Err(_) => true,
            },

            // Server
            port: match std::env::var("PORT") {
                Ok(value) => value.parse().context("PORT must be a valid port number")?,
                Err(_) => 8080,
            },

            admin_pin,
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("invalid boolean: {}", other),
    }
}
