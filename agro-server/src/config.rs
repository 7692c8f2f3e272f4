use std::{env, fmt::Display, str::FromStr};

use tracing::info;

/// 配置错误：环境变量存在但无法解析
#[derive(Debug, thiserror::Error)]
#[error("invalid {key} value '{value}': {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// 编码冲突时最多尝试次数
    pub code_retries: usize,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            host: try_load("AGRO_HOST", "0.0.0.0")?,
            port: try_load("AGRO_PORT", "5000")?,
            code_retries: try_load("AGRO_CODE_RETRIES", "3")?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            code_retries: agro_domain::code_allocator::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
