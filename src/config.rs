use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: String,
    pub database_path: String,
    pub max_connections: u32,
    pub uploads_dir: String,
    /// Public host serving attached acta files.
    pub files_base_url: String,
    pub project_list_url: String,
    /// Accepts `{id}` and `{anio}` placeholders.
    pub project_detail_url: String,
    pub redirect_delay_secs: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            database_path: "./actas.sqlite3".to_string(),
            max_connections: 8,
            uploads_dir: "./uploads/actas".to_string(),
            files_base_url: "https://archivos.example.org/actas/".to_string(),
            project_list_url: "/proyectos".to_string(),
            project_detail_url: "/proyectos/{id}?anio={anio}".to_string(),
            redirect_delay_secs: 2,
        }
    }
}

impl Config {
    /// Reads `path`, writing the defaults there first if it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
        } else {
            let default_config = Config::default();
            let toml_string = toml::to_string_pretty(&default_config)?;
            std::fs::write(path, toml_string)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(default_config)
        }
    }

    /// Config file from the first CLI argument or `ACTAS_CONFIG`, then env overrides.
    pub fn from_args_env() -> anyhow::Result<Self> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var("ACTAS_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Self::load(Path::new(&path))?;
        cfg.apply_env(|key| std::env::var(key).ok());
        std::fs::create_dir_all(&cfg.uploads_dir)
            .with_context(|| format!("create uploads dir {}", cfg.uploads_dir))?;
        Ok(cfg)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(listen) = var("ACTAS_LISTEN") {
            self.listen = listen;
        }
        if let Some(db) = var("ACTAS_DATABASE") {
            self.database_path = db;
        }
        if let Some(dir) = var("ACTAS_UPLOADS_DIR") {
            self.uploads_dir = dir;
        }
    }

    pub fn project_detail_url(&self, id: i64, anio: i32) -> String {
        self.project_detail_url
            .replace("{id}", &id.to_string())
            .replace("{anio}", &anio.to_string())
    }

    pub fn file_url(&self, filename: &str) -> String {
        let base = self.files_base_url.trim_end_matches('/');
        format!("{}/{}", base, urlencoding::encode(filename))
    }
}
