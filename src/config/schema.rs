//! Configuration schema definitions.
//!
//! Two shapes live here: the raw [`StartOptions`] gathered from flags and the
//! optional config file, and the validated, immutable [`StartupConfig`] handed
//! to the bootstrap engine.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::net::Cidr;

/// Default etcd endpoint used when neither flag nor file sets one.
pub const DEFAULT_ETCD_SERVER: &str = "http://127.0.0.1:2379";

/// Default kubelet static pod directory the bootstrap manifests are staged into.
pub const DEFAULT_POD_MANIFEST_PATH: &str = "/etc/kubernetes/manifests";

/// Default service cluster IP range (10.3.0.0/24).
pub const DEFAULT_SERVICE_CLUSTER_IP_RANGE: Cidr = Cidr::v4(Ipv4Addr::new(10, 3, 0, 0), 24);

/// Default pod network range (10.2.0.0/16).
pub const DEFAULT_CLUSTER_CIDR: Cidr = Cidr::v4(Ipv4Addr::new(10, 2, 0, 0), 16);

/// Raw `start` parameters after flag parsing, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOptions {
    /// Single etcd node to use during the bootstrap process.
    pub etcd_server: String,

    /// etcd requires client certificate authentication.
    pub etcd_auth_enabled: bool,

    /// Path to the rendered cluster asset directory.
    pub asset_dir: String,

    /// Start the initial etcd member locally instead of using an external one.
    pub self_hosted_etcd: bool,

    /// Range service cluster IPs are assigned from.
    pub service_cluster_ip_range: Cidr,

    /// Range pod IPs are assigned from.
    pub cluster_cidr: Cidr,

    /// Directory the kubelet watches for static pod manifests.
    pub pod_manifest_path: PathBuf,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            etcd_server: DEFAULT_ETCD_SERVER.to_string(),
            etcd_auth_enabled: false,
            asset_dir: String::new(),
            self_hosted_etcd: false,
            service_cluster_ip_range: DEFAULT_SERVICE_CLUSTER_IP_RANGE,
            cluster_cidr: DEFAULT_CLUSTER_CIDR,
            pod_manifest_path: PathBuf::from(DEFAULT_POD_MANIFEST_PATH),
        }
    }
}

/// Where the coordination store comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordStore {
    /// An etcd cluster that already runs somewhere.
    External(Url),
    /// An etcd member launched by this process before the engine runs.
    SelfHosted(Url),
}

impl CoordStore {
    pub fn new(endpoint: Url, self_hosted: bool) -> Self {
        if self_hosted {
            CoordStore::SelfHosted(endpoint)
        } else {
            CoordStore::External(endpoint)
        }
    }

    pub fn endpoint(&self) -> &Url {
        match self {
            CoordStore::External(url) | CoordStore::SelfHosted(url) => url,
        }
    }

    pub fn is_self_hosted(&self) -> bool {
        matches!(self, CoordStore::SelfHosted(_))
    }
}

/// Validated startup configuration consumed by the bootstrap engine.
///
/// Built once per process and moved into the engine; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    asset_dir: PathBuf,
    etcd: CoordStore,
    etcd_auth_enabled: bool,
    service_cluster_ip_range: Cidr,
    cluster_cidr: Cidr,
    pod_manifest_path: PathBuf,
}

impl StartupConfig {
    pub fn new(opts: &StartOptions, etcd: CoordStore) -> Self {
        Self {
            asset_dir: PathBuf::from(&opts.asset_dir),
            etcd,
            etcd_auth_enabled: opts.etcd_auth_enabled,
            service_cluster_ip_range: opts.service_cluster_ip_range,
            cluster_cidr: opts.cluster_cidr,
            pod_manifest_path: opts.pod_manifest_path.clone(),
        }
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    pub fn etcd_endpoint(&self) -> &Url {
        self.etcd.endpoint()
    }

    pub fn self_hosted_etcd(&self) -> bool {
        self.etcd.is_self_hosted()
    }

    /// Passed through to the engine; it decides which client certificates to load.
    pub fn etcd_auth_enabled(&self) -> bool {
        self.etcd_auth_enabled
    }

    pub fn service_cluster_ip_range(&self) -> &Cidr {
        &self.service_cluster_ip_range
    }

    pub fn cluster_cidr(&self) -> &Cidr {
        &self.cluster_cidr
    }

    pub fn pod_manifest_path(&self) -> &Path {
        &self.pod_manifest_path
    }
}

/// Root of the optional TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootkubeFile {
    /// Defaults for `bootkube start` flags.
    pub start: StartFileSection,

    /// Settings for a locally launched etcd member.
    pub etcd: EtcdLaunchConfig,
}

/// `[start]` table. Any key left out falls back to the flag default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StartFileSection {
    pub etcd_server: Option<String>,
    pub etcd_auth_enabled: Option<bool>,
    pub asset_dir: Option<String>,
    pub experimental_self_hosted_etcd: Option<bool>,
    pub service_cluster_ip_range: Option<Cidr>,
    pub cluster_cidr: Option<Cidr>,
    pub pod_manifest_path: Option<PathBuf>,
}

/// `[etcd]` table: how the self-hosted etcd member is launched.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EtcdLaunchConfig {
    /// etcd binary, resolved through `PATH` when relative.
    pub binary: PathBuf,

    /// Data directory for the bootstrap member.
    pub data_dir: PathBuf,

    /// Member name.
    pub name: String,

    /// Peer URL the member listens and advertises on.
    pub peer_url: String,

    /// Health checks before giving up on the member.
    pub ready_attempts: u32,

    /// Base delay for exponential backoff between health checks in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay between health checks in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for EtcdLaunchConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("etcd"),
            data_dir: PathBuf::from("/var/etcd/bootkube"),
            name: "boot-etcd".to_string(),
            peer_url: "http://127.0.0.1:2380".to_string(),
            ready_attempts: 10,
            base_delay_ms: 200,
            max_delay_ms: 5000,
        }
    }
}
