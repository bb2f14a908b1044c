use std::env;
use std::str::FromStr;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Staging,
    Production,
    Testing,
}

impl FromStr for AppEnv {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            "testing" => Ok(Self::Testing),
            other => Err(AppError::Config(format!("APP_ENV has unknown value `{}`", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_env: AppEnv,
    pub server_host: String,
    pub server_port: u16,
    pub run_migrations: bool,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::Config("DATABASE_URL must be set".to_string()))?;

        let app_env: AppEnv = lookup("APP_ENV")
            .unwrap_or_else(|| "development".to_string())
            .parse()?;

        let run_migrations = match lookup("RUN_MIGRATIONS") {
            Some(value) => parse_var("RUN_MIGRATIONS", &value)?,
            None => matches!(app_env, AppEnv::Development | AppEnv::Testing),
        };

        Ok(Self {
            database_url,
            app_env,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_var(
                "SERVER_PORT",
                &lookup("SERVER_PORT").unwrap_or_else(|| "3000".to_string()),
            )?,
            run_migrations,
            rate_limit_burst: parse_var(
                "RATE_LIMIT_BURST",
                &lookup("RATE_LIMIT_BURST").unwrap_or_else(|| "1000".to_string()),
            )?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn is_development(&self) -> bool {
        self.app_env == AppEnv::Development
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::Config(format!("{} has invalid value `{}`", key, value)))
}
