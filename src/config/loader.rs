//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::BootkubeFile;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

/// Load a TOML config file. CIDR values are checked while deserializing.
pub fn load_config(path: &Path) -> Result<BootkubeFile, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse config file contents.
pub fn parse_config(content: &str) -> Result<BootkubeFile, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = parse_config("").unwrap();
        assert!(file.start.asset_dir.is_none());
        assert_eq!(file.etcd.binary, PathBuf::from("etcd"));
        assert_eq!(file.etcd.ready_attempts, 10);
    }

    #[test]
    fn test_parse_full_file() {
        let file = parse_config(
            r#"
            [start]
            etcd_server = "https://10.0.0.5:2379"
            etcd_auth_enabled = true
            asset_dir = "/opt/bootkube/assets"
            experimental_self_hosted_etcd = true
            service_cluster_ip_range = "10.96.0.0/12"
            cluster_cidr = "10.244.0.0/16"
            pod_manifest_path = "/var/lib/kubelet/manifests"

            [etcd]
            binary = "/usr/local/bin/etcd"
            ready_attempts = 3
            "#,
        )
        .unwrap();

        assert_eq!(file.start.etcd_server.as_deref(), Some("https://10.0.0.5:2379"));
        assert_eq!(file.start.etcd_auth_enabled, Some(true));
        assert_eq!(file.start.experimental_self_hosted_etcd, Some(true));
        assert_eq!(
            file.start.service_cluster_ip_range.map(|c| c.to_string()),
            Some("10.96.0.0/12".to_string())
        );
        assert_eq!(file.etcd.binary, PathBuf::from("/usr/local/bin/etcd"));
        assert_eq!(file.etcd.ready_attempts, 3);
        // untouched keys keep their defaults
        assert_eq!(file.etcd.name, "boot-etcd");
    }

    #[test]
    fn test_bad_cidr_is_parse_error() {
        let err = parse_config("[start]\ncluster_cidr = \"10.2.0.0\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_config("[start]\nasset_directory = \"/tmp\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/bootkube.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
