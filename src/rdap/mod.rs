//! RDAP endpoint knowledge used by the registry lookup provider.

pub mod registry;

pub use registry::{rdap_base_url, RdapRegistry};
