//! The clone factory: funding precondition, stub construction, allocation.
//!
//! Each call is one atomic attempt with two outcomes — a fresh address, or
//! one of exactly two failure kinds. Nothing is retried internally:
//! [`AllocError::InsufficientFunds`] cannot succeed without caller action,
//! and a deterministic collision is permanent, not a transient race.

use tracing::debug;

use crate::host::{derived_address, AllocationHost};
use crate::stub;
use crate::types::{Address, Salt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// Funding precondition failed before any allocation attempt. Fully
    /// recoverable; no side effects occurred.
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds { available: u128, requested: u128 },
    /// The allocation primitive returned the null identifier. Covers both
    /// resource exhaustion and, on the salted path, an occupied derived
    /// address — the primitive does not say which.
    #[error("deployment failed")]
    DeploymentFailed,
}

/// Creates forwarding clones of a fixed implementation through an injected
/// [`AllocationHost`].
///
/// `identity` is the deploying party: the balance the funding precondition
/// reads, and the first input of the salted address derivation.
pub struct CloneFactory<H: AllocationHost> {
    identity: Address,
    host: H,
}

impl<H: AllocationHost> CloneFactory<H> {
    pub fn new(identity: Address, host: H) -> Self {
        Self { identity, host }
    }

    pub fn identity(&self) -> &Address {
        &self.identity
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    fn check_funding(&self, requested: u128) -> Result<(), AllocError> {
        let available = self.host.balance_of(&self.identity);
        if requested > available {
            return Err(AllocError::InsufficientFunds {
                available,
                requested,
            });
        }
        Ok(())
    }

    /// Allocate a clone of `implementation` at a host-assigned address.
    ///
    /// `funding` moves into the new instance atomically with creation.
    pub fn allocate(
        &mut self,
        implementation: &Address,
        funding: u128,
    ) -> Result<Address, AllocError> {
        self.check_funding(funding)?;
        let code = stub::stub_bytes(implementation);
        let instance = self
            .host
            .create(&self.identity, &code, funding)
            .ok_or(AllocError::DeploymentFailed)?;
        debug!(implementation = %implementation, instance = %instance, funding, "clone allocated");
        Ok(instance)
    }

    /// Allocate a clone of `implementation` at the address fixed by
    /// `(identity, salt, stub bytes)`.
    ///
    /// Repeating the call with the same arguments fails with
    /// [`AllocError::DeploymentFailed`]: the derived address is occupied
    /// permanently by the first success.
    pub fn allocate_deterministic(
        &mut self,
        implementation: &Address,
        salt: &Salt,
        funding: u128,
    ) -> Result<Address, AllocError> {
        self.check_funding(funding)?;
        let code = stub::stub_bytes(implementation);
        let instance = self
            .host
            .create_salted(&self.identity, salt, &code, funding)
            .ok_or(AllocError::DeploymentFailed)?;
        debug!(implementation = %implementation, salt = %salt, instance = %instance, funding, "deterministic clone allocated");
        Ok(instance)
    }

    /// The address [`allocate_deterministic`](Self::allocate_deterministic)
    /// will return for these arguments, without allocating anything.
    pub fn predicted_address(&self, implementation: &Address, salt: &Salt) -> Address {
        predicted_address_for(&self.identity, implementation, salt)
    }
}

/// Off-line address prediction for an arbitrary deploying party. Any third
/// party can compute a clone's address before it exists.
pub fn predicted_address_for(
    deployer: &Address,
    implementation: &Address,
    salt: &Salt,
) -> Address {
    derived_address(deployer, salt, &stub::stub_bytes(implementation))
}

// ── Tests ───────────────────────────────────────────────────────────────
