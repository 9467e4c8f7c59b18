//! Network value types shared by the CLI, config and engine.
//!
//! # Data Flow
//! ```text
//! --etcd-server "http://127.0.0.1:2379"
//!     → endpoint.rs (parse into url::Url)
//!     → CoordStore::{External, SelfHosted}
//!
//! --service-cluster-ip-range / --cluster-cidr
//!     → cidr.rs (parse, validate prefix)
//!     → engine overlap check
//! ```

pub mod cidr;
pub mod endpoint;

pub use cidr::{Cidr, CidrError};
pub use endpoint::{parse_endpoint, EndpointError};
