use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub datasets: DatasetSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub debug: bool,
    pub secret_key: String,
    pub allowed_hosts: Vec<String>,
    pub static_dir: String,
    pub static_url: String,
}

pub const DEFAULT_SECRET_KEY: &str = "dev-insecure-secret";

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            debug: false,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            allowed_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
            static_dir: "static".to_string(),
            static_url: "/static".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address `{}`", self.bind_addr))
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatasetSettings {
    /// Fixed seed for the random sample data; entropy when absent.
    pub seed: Option<u64>,
}

/// Variables set by the hosting platform rather than by our own config files.
#[derive(Debug, Clone, Default)]
pub struct HostingEnv {
    pub secret_key: Option<String>,
    pub debug: Option<String>,
    pub external_hostname: Option<String>,
    pub port: Option<String>,
}

impl HostingEnv {
    pub fn from_process() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            secret_key: var("SECRET_KEY"),
            debug: var("DEBUG"),
            external_hostname: var("RENDER_EXTERNAL_HOSTNAME"),
            port: var("PORT"),
        }
    }
}

impl AppConfig {
    pub fn apply_hosting_env(&mut self, env: &HostingEnv) -> anyhow::Result<()> {
        if let Some(secret) = &env.secret_key {
            self.server.secret_key = secret.clone();
        }
        if let Some(debug) = &env.debug {
            self.server.debug = debug == "1";
        }
        if let Some(host) = &env.external_hostname {
            if !self.server.allowed_hosts.contains(host) {
                self.server.allowed_hosts.push(host.clone());
            }
        }
        if let Some(port) = &env.port {
            let port: u16 = port
                .parse()
                .with_context(|| format!("Invalid PORT `{}`", port))?;
            let mut addr = self.server.socket_addr()?;
            addr.set_port(port);
            self.server.bind_addr = addr.to_string();
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetsConfig {
    #[serde(default = "default_pages")]
    pub pages: Vec<PageConfig>,
    #[serde(default)]
    pub readings: ReadingsConfig,
}

impl Default for WidgetsConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            readings: ReadingsConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageConfig {
    pub path: String,
    pub title: String,
    #[serde(default)]
    pub widgets: Vec<String>,
}

/// Gauge and progress readings. Out-of-range values are clamped when drawn.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReadingsConfig {
    pub innovation: f64,
    pub execution_speed: f64,
    pub progress: f64,
}

impl Default for ReadingsConfig {
    fn default() -> Self {
        Self {
            innovation: 91.0,
            execution_speed: 75.0,
            progress: 85.0,
        }
    }
}

fn default_pages() -> Vec<PageConfig> {
    let page = |path: &str, title: &str, widgets: &[&str]| PageConfig {
        path: path.to_string(),
        title: title.to_string(),
        widgets: widgets.iter().map(|w| w.to_string()).collect(),
    };
    vec![
        page(
            "/",
            "Overview",
            &[
                "heart-rate",
                "innovation-gauge",
                "execution-speed",
                "progress",
                "feedback-word-cloud",
            ],
        ),
        page(
            "/newpage/",
            "Health",
            &["daily-scores", "sleep", "sleep-weekly"],
        ),
    ]
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.allowed_hosts")
                .try_parsing(true),
        )
        .build()?;

    let mut app_config: AppConfig = settings.try_deserialize()?;
    app_config.apply_hosting_env(&HostingEnv::from_process())?;
    Ok(app_config)
}

pub fn load_widgets_config() -> anyhow::Result<WidgetsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/widgets").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}
