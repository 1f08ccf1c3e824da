//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Se carga una vez al
//! arrancar y se inyecta en `AppState`.

use chrono::FixedOffset;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errores de configuración detectados al arrancar
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Credenciales de Supabase Storage
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_role_key: String,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub company_id: Uuid,
    pub default_branch_id: Option<Uuid>,
    pub api_token: Option<String>,
    pub cors_origins: Vec<String>,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub supabase: Option<SupabaseConfig>,
    pub exports_bucket: String,
    pub signed_url_ttl: Duration,
    pub report_utc_offset: FixedOffset,
}

impl EnvironmentConfig {
    /// Lee la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda.
    /// Los valores vacíos se tratan como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let company_id = parse(
            "COMPANY_ID",
            get("COMPANY_ID").ok_or(ConfigError::Missing("COMPANY_ID"))?,
        )?;

        let default_branch_id = get("DEFAULT_BRANCH_ID")
            .map(|v| parse::<Uuid>("DEFAULT_BRANCH_ID", v))
            .transpose()?;

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_SERVICE_ROLE_KEY")) {
            (Some(url), Some(service_role_key)) => Some(SupabaseConfig {
                url,
                service_role_key,
            }),
            (Some(_), None) => return Err(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY")),
            _ => None,
        };

        let offset_minutes: i32 = parse_or(
            "REPORT_UTC_OFFSET_MINUTES",
            get("REPORT_UTC_OFFSET_MINUTES"),
            -180,
        )?;
        let report_utc_offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid {
                name: "REPORT_UTC_OFFSET_MINUTES",
                value: offset_minutes.to_string(),
            }
        })?;

        let run_migrations = match get("RUN_MIGRATIONS").as_deref() {
            None => false,
            Some("1") | Some("true") | Some("TRUE") | Some("yes") => true,
            Some("0") | Some("false") | Some("FALSE") | Some("no") => false,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "RUN_MIGRATIONS",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", get("PORT"), 3000)?,
            company_id,
            default_branch_id,
            api_token: get("API_TOKEN"),
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                10,
            )?,
            run_migrations,
            supabase,
            exports_bucket: get("EXPORTS_BUCKET").unwrap_or_else(|| "exports".to_string()),
            signed_url_ttl: Duration::from_secs(parse_or(
                "SIGNED_URL_TTL_SECS",
                get("SIGNED_URL_TTL_SECS"),
                600,
            )?),
            report_utc_offset,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => parse(name, value),
        None => Ok(default),
    }
}
