use core_config::tracing::LogFileConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use domain_vector::{OpenAIConfig, VearchConfig};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub vearch: VearchConfig,
    pub encoder: OpenAIConfig,
    pub log_file: LogFileConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let vearch = VearchConfig::from_env()?;
        let encoder = OpenAIConfig::from_env()?;
        let log_file = LogFileConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            vearch,
            encoder,
            log_file,
            environment,
        })
    }
}
