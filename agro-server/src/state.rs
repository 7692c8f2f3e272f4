use agro_application::Application;
use agro_application::error::AppError;
use agro_application::{AppOptions, Stores};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub app: Application,
}

impl AppState {
    pub fn new(app: Application) -> Self {
        Self { app }
    }

    /// 全内存存储的状态
    pub fn in_memory(config: &Config) -> Result<Self, AppError> {
        let options = AppOptions::builder()
            .code_attempts(config.code_retries)
            .build();
        Ok(Self::new(Application::new(Stores::in_memory(), options)?))
    }
}
