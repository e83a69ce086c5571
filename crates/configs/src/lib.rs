use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Missing keys fall back to `Default`, so `[server]` may set only the port.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 9090, worker_threads: Some(4) }
    }
}

/// Where the collection files live.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir() }
    }
}

/// Daily reminder trigger. `cron` uses the six-field form (seconds first)
/// and is evaluated in the server's local time zone.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cron")]
    pub cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { enabled: true, cron: default_cron() }
    }
}

/// Outbound mail. When `smtp_host` is unset reminders are only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default = "default_from_address")]
    pub from_address: String,
    #[serde(default = "default_company_name")]
    pub company_name: String,
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            from_address: default_from_address(),
            company_name: default_company_name(),
            send_timeout_secs: default_send_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: default_token_ttl() }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_true() -> bool { true }
fn default_cron() -> String { "0 0 8 * * *".into() }
fn default_smtp_port() -> u16 { 587 }
fn default_from_address() -> String { "Weigh Lanka <no-reply@weighlanka.lk>".into() }
fn default_company_name() -> String { "Weigh Lanka".into() }
fn default_send_timeout() -> u64 { 30 }
fn default_token_ttl() -> i64 { 12 }

/// Read `path` as TOML. An absent file yields the defaults; a file that
/// exists but does not parse is an error.
pub fn load_file_or_default(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => from_toml_str(&content).map_err(|e| anyhow!("{}: {}", path, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("{}: {}", path, e)),
    }
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file (`CONFIG_PATH`, default `config.toml`) if present, otherwise
    /// defaults; environment overrides applied on top. Not validated, so tools
    /// that only touch storage can use it.
    pub fn load_or_default() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = load_file_or_default(&path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = Self::load_or_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Environment variables win over the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(threads) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(threads);
        }
        if let Some(dir) = lookup("DATA_DIR") {
            self.storage.data_dir = dir;
        }
        if let Some(cron) = lookup("REMINDER_CRON") {
            self.scheduler.cron = cron;
        }
        if let Some(host) = lookup("SMTP_HOST") {
            self.mail.smtp_host = Some(host);
        }
        if let Some(port) = lookup("SMTP_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.mail.smtp_port = port;
        }
        if let Some(user) = lookup("SMTP_USERNAME") {
            self.mail.smtp_username = Some(user);
        }
        if let Some(pass) = lookup("SMTP_PASSWORD") {
            self.mail.smtp_password = Some(pass);
        }
        if let Some(from) = lookup("MAIL_FROM") {
            self.mail.from_address = from;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.scheduler.validate()?;
        self.mail.normalize_and_validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir is empty"));
        }
        Ok(())
    }
}

impl SchedulerConfig {
    fn validate(&self) -> Result<()> {
        if self.enabled && self.cron.split_whitespace().count() != 6 {
            return Err(anyhow!("scheduler.cron must have six fields (sec min hour day month weekday)"));
        }
        Ok(())
    }
}

impl MailConfig {
    fn normalize_and_validate(&mut self) -> Result<()> {
        // blank host in TOML means "not configured"
        if self.smtp_host.as_deref().is_some_and(|h| h.trim().is_empty()) {
            self.smtp_host = None;
        }
        if self.send_timeout_secs == 0 {
            return Err(anyhow!("mail.send_timeout_secs must be a positive number of seconds"));
        }
        if self.company_name.trim().is_empty() {
            return Err(anyhow!("mail.company_name is empty"));
        }
        Ok(())
    }

    pub fn smtp_enabled(&self) -> bool {
        self.smtp_host.is_some()
    }

    pub fn send_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.send_timeout_secs)
    }
}

impl AuthConfig {
    fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().len() < 16 {
            return Err(anyhow!("auth.jwt_secret must be at least 16 characters; set it in config.toml or JWT_SECRET"));
        }
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        Ok(())
    }
}
