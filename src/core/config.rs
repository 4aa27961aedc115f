use std::env;
use std::str::FromStr;

use crate::core::{AppError, AppResult};
use crate::models::{Identity, Role};

/// Token estático entregado por el proveedor de identidad.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub token: String,
    pub identity: Identity,
}

impl FromStr for TokenGrant {
    type Err = AppError;

    /// Formato: `token:user_id:email:role`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() < 3 || parts.iter().take(3).any(|p| p.is_empty()) {
            return Err(AppError::Config(format!(
                "Token inválido en API_TOKENS: {}",
                s
            )));
        }

        let role = match parts.get(3) {
            Some(role) if !role.is_empty() => Some(role.parse::<Role>()?),
            _ => None,
        };

        Ok(TokenGrant {
            token: parts[0].to_string(),
            identity: Identity {
                id: parts[1].to_string(),
                email: parts[2].to_string(),
                role,
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub api_tokens: Vec<TokenGrant>,
    pub enable_compression: bool,
    /// Minutos sin uso tras los que una sesión del asistente se descarta.
    pub session_idle_minutes: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            api_tokens: Vec::new(),
            enable_compression: true,
            session_idle_minutes: 120,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let default = AppConfig::default();

        let port = match env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("PORT inválido: {}", e)))?,
            Err(_) => default.port,
        };

        let session_idle_minutes = match env::var("SESSION_IDLE_MINUTES") {
            Ok(minutes) => minutes.parse::<u32>().map_err(|e| {
                AppError::Config(format!("SESSION_IDLE_MINUTES inválido: {}", e))
            })?,
            Err(_) => default.session_idle_minutes,
        };

        let api_tokens = match env::var("API_TOKENS") {
            Ok(tokens) => parse_tokens(&tokens)?,
            Err(_) => default.api_tokens,
        };

        Ok(AppConfig {
            host: env::var("HOST").unwrap_or(default.host),
            port,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            api_tokens,
            enable_compression: env::var("ENABLE_COMPRESSION")
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(default.enable_compression),
            session_idle_minutes,
        })
    }
}

/// Lista separada por comas de `token:user_id:email:role`.
pub fn parse_tokens(raw: &str) -> AppResult<Vec<TokenGrant>> {
    raw.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(str::parse)
        .collect()
}
