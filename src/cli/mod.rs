//! Command line surface.
//!
//! # Responsibilities
//! - Define the `bootkube` command tree with clap derive
//! - Merge `start` flags with the optional config file into [`StartOptions`]
//!
//! # Design Decisions
//! - Every start flag is optional at the clap layer so "not given" can fall
//!   back to the config file; required-ness is checked by config validation
//! - Precedence: command line / `BOOTKUBE_*` env, then config file, then defaults

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{StartFileSection, StartOptions};
use crate::net::Cidr;
use crate::observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "bootkube")]
#[command(about = "Bootkube bootstraps a self-hosted Kubernetes control plane", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the bootkube service
    Start(StartArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Default, Args)]
pub struct StartArgs {
    /// Single etcd node to use during bootkube bootstrap process [default: http://127.0.0.1:2379]
    #[arg(long, env = "BOOTKUBE_ETCD_SERVER", value_name = "URL")]
    pub etcd_server: Option<String>,

    /// Etcd requires authentication through client certificates
    #[arg(
        long,
        env = "BOOTKUBE_ETCD_AUTH_ENABLED",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub etcd_auth_enabled: Option<bool>,

    /// Path to the cluster asset directory. Expected layout generated by the `bootkube render` command
    #[arg(long, env = "BOOTKUBE_ASSET_DIR", value_name = "DIR")]
    pub asset_dir: Option<String>,

    /// Self hosted etcd mode. Includes starting the initial etcd member by bootkube
    #[arg(
        long = "experimental-self-hosted-etcd",
        env = "BOOTKUBE_EXPERIMENTAL_SELF_HOSTED_ETCD",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub self_hosted_etcd: Option<bool>,

    /// A CIDR notation IP range from which to assign service cluster IPs [default: 10.3.0.0/24]
    #[arg(long, env = "BOOTKUBE_SERVICE_CLUSTER_IP_RANGE", value_name = "CIDR")]
    pub service_cluster_ip_range: Option<Cidr>,

    /// CIDR Range for Pods in cluster [default: 10.2.0.0/16]
    #[arg(long, env = "BOOTKUBE_CLUSTER_CIDR", value_name = "CIDR")]
    pub cluster_cidr: Option<Cidr>,

    /// Directory the kubelet watches for static pod manifests [default: /etc/kubernetes/manifests]
    #[arg(long, env = "BOOTKUBE_POD_MANIFEST_PATH", value_name = "DIR")]
    pub pod_manifest_path: Option<PathBuf>,

    /// TOML file supplying defaults for these flags and the local etcd launcher
    #[arg(long, env = "BOOTKUBE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl StartArgs {
    /// Merge flags with the `[start]` table of the config file.
    pub fn resolve(&self, file: &StartFileSection) -> StartOptions {
        let defaults = StartOptions::default();
        StartOptions {
            etcd_server: self
                .etcd_server
                .clone()
                .or_else(|| file.etcd_server.clone())
                .unwrap_or(defaults.etcd_server),
            etcd_auth_enabled: self
                .etcd_auth_enabled
                .or(file.etcd_auth_enabled)
                .unwrap_or(defaults.etcd_auth_enabled),
            asset_dir: self
                .asset_dir
                .clone()
                .or_else(|| file.asset_dir.clone())
                .unwrap_or(defaults.asset_dir),
            self_hosted_etcd: self
                .self_hosted_etcd
                .or(file.experimental_self_hosted_etcd)
                .unwrap_or(defaults.self_hosted_etcd),
            service_cluster_ip_range: self
                .service_cluster_ip_range
                .or(file.service_cluster_ip_range)
                .unwrap_or(defaults.service_cluster_ip_range),
            cluster_cidr: self
                .cluster_cidr
                .or(file.cluster_cidr)
                .unwrap_or(defaults.cluster_cidr),
            pod_manifest_path: self
                .pod_manifest_path
                .clone()
                .or_else(|| file.pod_manifest_path.clone())
                .unwrap_or(defaults.pod_manifest_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_args(args: &[&str]) -> StartArgs {
        let argv = ["bootkube", "start"].iter().chain(args.iter());
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Start(args) => args,
            Command::Version => panic!("expected start"),
        }
    }

    #[test]
    fn test_defaults_when_nothing_given() {
        let opts = start_args(&[]).resolve(&StartFileSection::default());
        assert_eq!(opts, StartOptions::default());
    }

    #[test]
    fn test_parse_all_flags() {
        let args = start_args(&[
            "--etcd-server",
            "https://10.0.0.5:2379",
            "--etcd-auth-enabled",
            "--asset-dir",
            "/tmp/assets",
            "--experimental-self-hosted-etcd=false",
            "--service-cluster-ip-range",
            "10.96.0.0/12",
            "--cluster-cidr",
            "10.244.0.0/16",
            "--log-format",
            "json",
        ]);
        assert_eq!(args.etcd_auth_enabled, Some(true));
        assert_eq!(args.self_hosted_etcd, Some(false));
        assert_eq!(args.log_format, LogFormat::Json);

        let opts = args.resolve(&StartFileSection::default());
        assert_eq!(opts.etcd_server, "https://10.0.0.5:2379");
        assert_eq!(opts.asset_dir, "/tmp/assets");
        assert!(opts.etcd_auth_enabled);
        assert!(!opts.self_hosted_etcd);
        assert_eq!(opts.service_cluster_ip_range.to_string(), "10.96.0.0/12");
        assert_eq!(opts.cluster_cidr.to_string(), "10.244.0.0/16");
    }

    #[test]
    fn test_malformed_cidr_rejected_at_flag_boundary() {
        let argv = ["bootkube", "start", "--cluster-cidr", "10.2.0.0"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let file = StartFileSection {
            etcd_server: Some("http://10.0.0.9:2379".to_string()),
            asset_dir: Some("/from/file".to_string()),
            experimental_self_hosted_etcd: Some(true),
            ..StartFileSection::default()
        };
        let opts = start_args(&["--asset-dir", "/from/flag"]).resolve(&file);

        assert_eq!(opts.asset_dir, "/from/flag");
        assert_eq!(opts.etcd_server, "http://10.0.0.9:2379");
        assert!(opts.self_hosted_etcd);
    }

    #[test]
    fn test_empty_etcd_server_flag_kept() {
        let opts = start_args(&["--etcd-server", "", "--asset-dir", "/tmp/assets"])
            .resolve(&StartFileSection::default());
        assert!(opts.etcd_server.is_empty());
    }

    #[test]
    fn test_version_subcommand() {
        let cli = Cli::try_parse_from(["bootkube", "version"]).unwrap();
        assert!(matches!(cli.command, Command::Version));
    }
}
