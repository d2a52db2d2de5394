use crate::discovery::network::{Endpoint, EndpointCategory};
use crate::error::{Error, Result};
use crate::site::SiteRoot;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level siteaudit configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub paths: PathsConfig,
    pub site: SiteConfig,
    pub network: NetworkConfig,
    pub robots: RobotsConfig,
    pub images: ImagesConfig,
    /// Replaces the built-in endpoint table when non-empty.
    pub endpoints: Vec<EndpointSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding `page.tsx` route files.
    pub pages: String,
    pub components: String,
    /// Static assets served from the site root.
    pub public: String,
    /// Static export of the built site.
    pub build_output: String,
    /// Where report files are written.
    pub reports: String,
    /// Directory names never descended into.
    pub exclude: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            pages: "src/app".to_string(),
            components: "src/components".to_string(),
            public: "public".to_string(),
            build_output: "out".to_string(),
            reports: ".".to_string(),
            exclude: [
                "api",
                "auth",
                "node_modules",
                ".next",
                "out",
                "dist",
                "build",
                ".git",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    /// Host every sitemap and robots reference must point at.
    pub domain: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.example.com".to_string(),
            domain: "example.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
    /// Delay between runs in continuous mode.
    pub interval_secs: u64,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            interval_secs: 300,
            user_agent: format!(
                "siteaudit-bot/{} (+crawlability monitor)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    /// Paths that must appear in a `Disallow:` directive.
    pub required_disallow: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            required_disallow: vec![
                "/api/".to_string(),
                "/admin/".to_string(),
                "/portal/".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    pub large_bytes: u64,
    pub medium_bytes: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            large_bytes: 500 * 1024,
            medium_bytes: 100 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Absolute URL, or a path joined onto `site.base_url`.
    pub path: String,
    #[serde(default)]
    pub category: EndpointCategory,
    #[serde(default)]
    pub critical: bool,
}

const DEFAULT_ENDPOINTS: &[(&str, EndpointCategory, bool)] = &[
    ("/", EndpointCategory::Page, true),
    ("/robots.txt", EndpointCategory::Robots, true),
    ("/sitemap.xml", EndpointCategory::Sitemap, true),
    ("/pricing", EndpointCategory::Page, false),
    ("/faq", EndpointCategory::Page, false),
    ("/blog", EndpointCategory::Page, false),
    ("/locations", EndpointCategory::Page, false),
    ("/conditions", EndpointCategory::Page, false),
];

impl AuditConfig {
    /// The endpoint table with every path resolved against `site.base_url`.
    pub fn endpoint_table(&self) -> Vec<Endpoint> {
        let specs: Vec<EndpointSpec> = if self.endpoints.is_empty() {
            DEFAULT_ENDPOINTS
                .iter()
                .map(|(path, category, critical)| EndpointSpec {
                    path: path.to_string(),
                    category: *category,
                    critical: *critical,
                })
                .collect()
        } else {
            self.endpoints.clone()
        };

        specs
            .into_iter()
            .map(|spec| Endpoint {
                url: self.resolve_url(&spec.path),
                category: spec.category,
                critical: spec.critical,
            })
            .collect()
    }

    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.site.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

const PROJECT_CONFIG: &str = "siteaudit.toml";

fn read_toml(path: &Path) -> Result<toml::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

/// Load an implicit config layer, warning instead of failing when it is broken.
fn load_layer(path: &Path) -> Option<toml::Value> {
    if !path.exists() {
        return None;
    }
    match read_toml(path) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("ignoring config layer: {}", e);
            None
        }
    }
}

/// Load the user config file (~/.config/siteaudit/config.toml) if it exists.
fn load_user() -> Option<toml::Value> {
    let dir = dirs::config_dir()?;
    load_layer(&dir.join("siteaudit").join("config.toml"))
}

/// Recursively merge two TOML values. Tables are merged key-by-key;
/// all other types in `overlay` replace `base`.
fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_values(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

fn from_value(value: toml::Value) -> Result<AuditConfig> {
    value
        .try_into()
        .map_err(|e| Error::Config(format!("invalid configuration: {}", e)))
}

/// Load the merged config: user file, then the project's `siteaudit.toml`.
/// If `override_path` is provided, use only that file; failing to read or parse it is fatal.
pub fn load(site: &SiteRoot, override_path: Option<&Path>) -> Result<AuditConfig> {
    if let Some(path) = override_path {
        return from_value(read_toml(path)?);
    }

    let user = load_user();
    let project = load_layer(&site.path(PROJECT_CONFIG));

    let merged = match (user, project) {
        (Some(u), Some(p)) => Some(merge_values(u, p)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    };

    match merged {
        Some(value) => from_value(value).or_else(|e| {
            log::warn!("{}; falling back to defaults", e);
            Ok(AuditConfig::default())
        }),
        None => Ok(AuditConfig::default()),
    }
}
