use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON file backing the workbook; `None` keeps everything in memory.
    pub workbook_path: Option<PathBuf>,
    pub asset_dir: PathBuf,
    pub asset_cache_dir: PathBuf,
    pub asset_cache_name: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let workbook_path = env::var("WORKBOOK_PATH").ok().map(PathBuf::from);
        let asset_dir = env::var("ASSET_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("assets"));
        let asset_cache_dir = env::var("ASSET_CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".asset-cache"));
        let asset_cache_name =
            env::var("ASSET_CACHE_NAME").unwrap_or_else(|_| "orders-dashboard-v1".to_string());
        Ok(Self {
            host,
            port,
            workbook_path,
            asset_dir,
            asset_cache_dir,
            asset_cache_name,
        })
    }
}
