//! The allocation primitive this factory is layered on.
//!
//! Instance creation is a capability of the surrounding execution
//! environment, not something this crate can implement for real. It is
//! modeled as an injected trait with exactly the two modes the factory
//! needs, plus the balance read backing the funding precondition.

use crate::types::{Address, Salt};

/// Domain prefix for salted address derivation. Keeps derivation input
/// disjoint from any plain code hash.
const SALTED_DOMAIN: u8 = 0xff;

/// Host capability: create a new instance from a byte sequence.
///
/// Contract:
/// - Either mode signals failure only by returning `None` — never by
///   panicking. `None` covers resource exhaustion and, for the salted mode,
///   an occupied derived address; the two are not distinguished.
/// - `create_salted` must place the instance at exactly
///   [`derived_address`]`(deployer, salt, code)` and refuse if that address
///   is occupied. Occupation is permanent; a refused salted creation never
///   succeeds on retry with the same inputs.
/// - `funding` moves from `deployer` to the new instance atomically with
///   creation; a failed attempt moves nothing.
pub trait AllocationHost {
    /// Available balance of `owner`.
    fn balance_of(&self, owner: &Address) -> u128;

    /// Sequential mode: the host assigns a fresh address by its own scheme.
    fn create(&mut self, deployer: &Address, code: &[u8], funding: u128) -> Option<Address>;

    /// Salted mode: the address is fixed by `(deployer, salt, code)` and
    /// computable off-line before the call.
    fn create_salted(
        &mut self,
        deployer: &Address,
        salt: &Salt,
        code: &[u8],
        funding: u128,
    ) -> Option<Address>;
}

/// The public address derivation for the salted mode:
///
/// ```text
/// trailing 20 bytes of blake3(0xff ++ deployer ++ salt ++ blake3(code))
/// ```
///
/// Reproducible bit-exactly by any party without executing an allocation;
/// every conforming [`AllocationHost`] honors this formula.
pub fn derived_address(deployer: &Address, salt: &Salt, code: &[u8]) -> Address {
    let code_hash = blake3::hash(code);
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[SALTED_DOMAIN]);
    hasher.update(deployer.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(code_hash.as_bytes());
    let digest = hasher.finalize();
    let bytes = digest.as_bytes();
    let mut out = [0u8; Address::LEN];
    out.copy_from_slice(&bytes[bytes.len() - Address::LEN..]);
    Address::from_bytes(out)
}

pub mod mem;

pub use mem::MemHost;

// ── Tests ───────────────────────────────────────────────────────────────
