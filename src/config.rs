use clap::Parser;
use std::path::PathBuf;

/// Runtime configuration for the ExApp server
///
/// Every option can also be supplied through the environment, which is how
/// the AppAPI deploy daemon passes them to the container.
#[derive(Debug, Clone, Parser)]
#[command(name = "ironcalc-exapp", about = "IronCalc external app for Nextcloud")]
pub struct Config {
    /// Base URL of the Nextcloud instance, e.g. `http://nextcloud.local`
    #[arg(long, env = "NEXTCLOUD_URL")]
    pub nextcloud_url: String,

    #[arg(long, env = "APP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "APP_PORT", default_value_t = 2180)]
    pub port: u16,

    /// Directory served under `/assets`
    #[arg(long, env = "APP_ASSETS_DIR", default_value = "assets")]
    pub assets_dir: PathBuf,
}

impl Config {
    pub fn new(nextcloud_url: &str) -> Self {
        Config {
            nextcloud_url: nextcloud_url.trim_end_matches('/').to_string(),
            host: "127.0.0.1".to_string(),
            port: 2180,
            assets_dir: PathBuf::from("assets"),
        }
    }

    /// Address to listen on; `host` may be an IP or a hostname to resolve
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
