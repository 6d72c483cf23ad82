use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
    pub file_path: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AlipayChannelConfig {
    pub app_id: String,
    pub gateway_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WechatChannelConfig {
    pub app_id: String,
    pub mch_id: String,
    pub api_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// 渠道不配置就不注册
    pub alipay: Option<AlipayChannelConfig>,
    pub wechat: Option<WechatChannelConfig>,
    pub environment: String,
    pub service_name: String,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let config_path = dotenvy::var("CONFIG_PATH").unwrap_or_else(|_| {
            format!("{}/config/application.toml", env!("CARGO_MANIFEST_DIR"))
        });

        info!("Loading configuration from {}", &config_path);

        let builder = Config::builder()
            .add_source(File::from(Path::new(&config_path)))
            .add_source(Environment::with_prefix("APP").separator("__"));

        let config = builder.build()?;
        let config: AppConfig = config.try_deserialize()?;

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
                file_path: None,
            },
            alipay: None,
            wechat: None,
            environment: "development".to_string(),
            service_name: "unipay-demo".to_string(),
        }
    }
}
