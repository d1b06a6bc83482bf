//! Share link domain: access policy, token generation, the link registry,
//! and the service exposed to transports.

pub mod gate;
pub mod link;
pub mod registry;
pub mod service;

pub use gate::{AccessDenied, AccessGate};
pub use link::LinkService;
pub use registry::{AccessGrant, MemoryShareRegistry, ShareLinkRegistry, TokenSource};
pub use service::{CreateShareRequest, ShareService};
