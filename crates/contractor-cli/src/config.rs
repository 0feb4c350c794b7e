//! Connection settings.
//!
//! Read from the `[contractor]` section of an INI file, by default
//! `~/.contractorcli.ini`, with `CONTRACTOR_<KEY>` environment variables
//! taking precedence:
//!
//! ```ini
//! [contractor]
//! host = contractor.example.com
//! proto = https
//! username = root
//! password = secret
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use cinp::ClientOptions;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::error::{CliError, CliResult};

const DEFAULT_FILE_NAME: &str = ".contractorcli.ini";

fn default_proto() -> String {
    "https".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    contractor: Option<Settings>,
}

/// Settings for one Contractor server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub host: Option<String>,
    pub port: Option<u16>,
    #[serde(default = "default_proto")]
    pub proto: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub proxy: Option<String>,
    #[serde(default)]
    pub insecure: bool,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Settings {
    /// Load settings from `path`, or from the default file if `path` is
    /// `None`. An explicit file must exist; the default one is optional.
    ///
    /// # Errors
    /// Fails if the file can not be parsed or `host` is not set anywhere.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load_from(Some(path), true),
            None => Self::load_from(default_path().as_deref(), false),
        }
    }

    fn load_from(path: Option<&Path>, required: bool) -> CliResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), required, "Reading config file");
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Ini)
                    .required(required),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("CONTRACTOR")
                .keep_prefix(true)
                .separator("_")
                .try_parsing(true),
        );

        let file: ConfigFile = builder.build()?.try_deserialize()?;
        let settings = file
            .contractor
            .ok_or_else(|| CliError::Config("host is not configured".into()))?;
        if settings.host.as_deref().map_or(true, str::is_empty) {
            return Err(CliError::Config("host is not configured".into()));
        }
        Ok(settings)
    }

    /// Root URL of the server, e.g. `https://contractor:8443`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.as_deref().unwrap_or_default();
        match self.port {
            Some(port) => format!("{}://{host}:{port}", self.proto),
            None => format!("{}://{host}", self.proto),
        }
    }

    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            proxy: self.proxy.clone().filter(|p| !p.is_empty()),
            insecure: self.insecure,
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn clear_env() {
        for key in [
            "HOST", "PORT", "PROTO", "USERNAME", "PASSWORD", "PROXY", "INSECURE", "TIMEOUT",
        ] {
            std::env::remove_var(format!("CONTRACTOR_{key}"));
        }
    }

    #[test]
    #[serial]
    fn test_load_file_with_defaults() {
        clear_env();
        let file = write_config("[contractor]\nhost = contractor.local\nusername = root\n");

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.host.as_deref(), Some("contractor.local"));
        assert_eq!(settings.proto, "https");
        assert_eq!(settings.timeout, 30);
        assert!(!settings.insecure);
        assert_eq!(settings.base_url(), "https://contractor.local");
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        clear_env();
        let file = write_config("[contractor]\nhost = file-host\nport = 80\nproto = http\n");
        std::env::set_var("CONTRACTOR_HOST", "env-host");
        std::env::set_var("CONTRACTOR_INSECURE", "true");

        let settings = Settings::load(Some(file.path())).unwrap();
        clear_env();

        assert_eq!(settings.base_url(), "http://env-host:80");
        assert!(settings.insecure);
    }

    #[test]
    #[serial]
    fn test_explicit_file_must_exist() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.ini");

        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    #[serial]
    fn test_host_is_required() {
        clear_env();
        let file = write_config("[contractor]\nusername = root\n");

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn test_client_options() {
        let settings = Settings {
            host: Some("c".into()),
            port: None,
            proto: default_proto(),
            username: None,
            password: None,
            proxy: Some(String::new()),
            insecure: true,
            timeout: 5,
        };
        let options = settings.client_options();
        assert!(options.proxy.is_none());
        assert!(options.insecure);
        assert_eq!(options.timeout, Duration::from_secs(5));
    }
}
