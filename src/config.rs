use crate::errors::{Error, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Prefix of the environment variables overriding the configuration
pub const ENV_PREFIX: &str = "NOWASTE_";

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>[a-zA-Z][a-zA-Z0-9+.\-]*)://(?P<host>[a-zA-Z0-9.\-]+)(:(?P<port>\d{1,5}))?(?P<prefix>/[^?#\s]*)?$")
        .unwrap()
});

/// Client configuration
///
/// Layered as: defaults, then the YAML file if one is given, then `NOWASTE_*`
/// environment variables. The binary applies its command line flags last.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST API, e.g. `http://localhost:3000/api`
    pub api_url: String,
    /// Where the session cache lives. `None` means the platform data directory.
    pub storage_path: Option<PathBuf>,
    /// Replace failed reads with sample data instead of reporting the failure
    pub mock_fallback: bool,
    /// Socket read/write timeout
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: None,
            mock_fallback: true,
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(Yaml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(file: Option<&Path>) -> Result<Config> {
        if let Some(file) = file {
            if !file.is_file() {
                return Err(Error::NotFound(format!(
                    "config file {}",
                    file.display()
                )));
            }
        }
        let config: Config = Self::figment(file).extract()?;
        ApiUrl::parse(&config.api_url)?;
        if config.timeout_secs == 0 {
            let err = figment::Error::from("timeout_secs must be at least 1".to_string());
            return Err(err.into());
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn api_url(&self) -> Result<ApiUrl> {
        ApiUrl::parse(&self.api_url)
    }

    /// Resolve the session database location
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("nowaste").join("session.sqlite3"))
                .unwrap_or_else(|| PathBuf::from("nowaste-session.sqlite3"))
        })
    }
}

/// The parsed pieces of the API base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrl {
    pub host: String,
    pub port: u16,
    /// Path prefix without trailing slash, empty for the root
    pub prefix: String,
}

impl ApiUrl {
    pub fn parse(url: &str) -> Result<ApiUrl> {
        let caps = URL
            .captures(url.trim())
            .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

        let scheme = caps["scheme"].to_ascii_lowercase();
        if scheme != "http" {
            return Err(Error::UnsupportedScheme(scheme));
        }

        let port = match caps.name("port") {
            Some(port) => port
                .as_str()
                .parse::<u16>()
                .map_err(|_| Error::InvalidUrl(url.to_string()))?,
            None => 80,
        };

        let prefix = caps
            .name("prefix")
            .map(|p| p.as_str().trim_end_matches('/').to_string())
            .unwrap_or_default();

        Ok(ApiUrl {
            host: caps["host"].to_string(),
            port,
            prefix,
        })
    }

    /// `host:port`, suitable for `TcpStream::connect`
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Value of the `Host` header
    pub fn host_header(&self) -> String {
        if self.port == 80 {
            self.host.clone()
        } else {
            self.authority()
        }
    }

    /// Request target for an API path, with the prefix applied
    pub fn target(&self, path: &str) -> String {
        format!("{}/{}", self.prefix, path.strip_prefix('/').unwrap_or(path))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_parse_api_url() {
        let url = ApiUrl::parse(DEFAULT_API_URL).unwrap();
        assert_eq!(url.host, "localhost");
        assert_eq!(url.port, 3000);
        assert_eq!(url.prefix, "/api");
        assert_eq!(url.authority(), "localhost:3000");
        assert_eq!(url.target("auth/login"), "/api/auth/login");
        assert_eq!(url.target("/offers"), "/api/offers");

        let url = ApiUrl::parse("http://example.org").unwrap();
        assert_eq!(url.port, 80);
        assert_eq!(url.prefix, "");
        assert_eq!(url.host_header(), "example.org");
        assert_eq!(url.target("offers"), "/offers");

        let url = ApiUrl::parse("http://127.0.0.1:8000/api/v1/").unwrap();
        assert_eq!(url.prefix, "/api/v1");
    }

    #[test]
    fn test_parse_bad_urls() {
        assert!(matches!(
            ApiUrl::parse("https://example.org/api"),
            Err(Error::UnsupportedScheme(_))
        ));
        assert!(matches!(
            ApiUrl::parse("localhost:3000"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiUrl::parse("http://localhost:99999"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(ApiUrl::parse(""), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_config_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "nowaste.yaml",
                "api_url: http://127.0.0.1:8000/api\ntimeout_secs: 3\n",
            )?;
            jail.set_env("NOWASTE_MOCK_FALLBACK", "false");
            jail.set_env("NOWASTE_TIMEOUT_SECS", "7");

            let config = Config::load(Some(Path::new("nowaste.yaml"))).unwrap();
            assert_eq!(config.api_url, "http://127.0.0.1:8000/api");
            assert!(!config.mock_fallback);
            assert_eq!(config.timeout_secs, 7);
            Ok(())
        });
    }

    #[test]
    fn test_config_defaults() {
        Jail::expect_with(|_| {
            let config = Config::load(None).unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_zero_timeout_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("nowaste.yaml", "timeout_secs: 0\n")?;
            assert!(matches!(
                Config::load(Some(Path::new("nowaste.yaml"))),
                Err(Error::Config(_))
            ));

            jail.set_env("NOWASTE_TIMEOUT_SECS", "2");
            let config = Config::load(Some(Path::new("nowaste.yaml"))).unwrap();
            assert_eq!(config.timeout(), Duration::from_secs(2));
            Ok(())
        });
    }

    #[test]
    fn test_config_missing_file() {
        assert!(matches!(
            Config::load(Some(Path::new("/definitely/not/here.yaml"))),
            Err(Error::NotFound(_))
        ));
    }
}
