//! Layered settings: built-in defaults, then `PICKER__*` environment
//! variables (`__` separates nested keys).

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, Source};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub request_timeout_secs: u64,
    pub upstream: UpstreamSettings,
    pub paging: PagingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub user: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PagingSettings {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl PagingSettings {
    /// Normalise caller paging: page at least 1, page size defaulted when
    /// missing or non-positive and capped at the maximum.
    pub fn clamp(&self, page: Option<i64>, page_size: Option<i64>) -> (u32, u32) {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let page = u32::try_from(page).unwrap_or(u32::MAX);

        let max = i64::from(self.max_page_size);
        let size = match page_size {
            Some(s) if s >= 1 => s.min(max),
            _ => i64::from(self.default_page_size).min(max),
        };
        let size = u32::try_from(size).unwrap_or(self.max_page_size);
        (page, size)
    }
}

impl Settings {
    /// Defaults overlaid with `PICKER__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(
            Environment::with_prefix("PICKER")
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Defaults overlaid with an arbitrary source.
    pub fn build<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        defaults()?.add_source(source).build()?.try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let paging = PagingSettings::default();
    Config::builder()
        .set_default("bind_addr", "0.0.0.0:8080")?
        .set_default("request_timeout_secs", 60_i64)?
        .set_default("upstream.base_url", "http://localhost")?
        .set_default("upstream.user", "admin")?
        .set_default("upstream.timeout_secs", 30_i64)?
        .set_default("paging.default_page_size", i64::from(paging.default_page_size))?
        .set_default("paging.max_page_size", i64::from(paging.max_page_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn defaults_apply_without_overrides() {
        let settings = Settings::build(File::from_str("{}", FileFormat::Json)).unwrap();

        assert_eq!(settings.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.request_timeout_secs, 60);
        assert_eq!(settings.upstream.base_url, "http://localhost");
        assert_eq!(settings.upstream.user, "admin");
        assert_eq!(settings.upstream.timeout_secs, 30);
        assert_eq!(settings.paging.default_page_size, 20);
        assert_eq!(settings.paging.max_page_size, 100);
    }

    #[test]
    fn nested_overrides_win() {
        let settings = Settings::build(File::from_str(
            r#"{"upstream": {"base_url": "https://dam.example.com"}, "paging": {"max_page_size": 50}}"#,
            FileFormat::Json,
        ))
        .unwrap();

        assert_eq!(settings.upstream.base_url, "https://dam.example.com");
        assert_eq!(settings.upstream.user, "admin");
        assert_eq!(settings.paging.max_page_size, 50);
    }

    #[test]
    fn clamp_fills_defaults() {
        let paging = PagingSettings::default();
        assert_eq!(paging.clamp(None, None), (1, 20));
        assert_eq!(paging.clamp(Some(0), Some(0)), (1, 20));
        assert_eq!(paging.clamp(Some(-3), Some(-1)), (1, 20));
    }

    #[test]
    fn clamp_caps_page_size() {
        let paging = PagingSettings::default();
        assert_eq!(paging.clamp(Some(4), Some(500)), (4, 100));
        assert_eq!(paging.clamp(Some(2), Some(35)), (2, 35));
    }
}
