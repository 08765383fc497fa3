//! Clone factory — mass-produce lightweight forwarding instances.
//!
//! Every clone is a minimal immutable stub that delegates all invocations to
//! one shared, already-deployed implementation. The factory:
//! - constructs the stub byte sequence with the target baked in at a fixed
//!   offset (no mutable slot, no post-creation redirection);
//! - allocates it through an injected [`AllocationHost`], either sequentially
//!   (host-assigned address) or content-addressed (salted, address derivable
//!   off-line before creation);
//! - enforces the funding precondition and surfaces exactly two failure
//!   kinds, [`AllocError::InsufficientFunds`] and
//!   [`AllocError::DeploymentFailed`].

pub mod factory;
pub mod host;
pub mod stub;
pub mod types;

pub use factory::{predicted_address_for, AllocError, CloneFactory};
pub use host::{derived_address, AllocationHost, MemHost};
pub use stub::{implementation_of, is_stub, runtime_bytes, stub_bytes};
pub use types::{Address, HexParseError, Salt};
