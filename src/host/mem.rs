//! In-memory reference host (fast tests/dev).
//!
//! Single-owner by construction — `&mut self` on the creating methods stands
//! in for the global serialization a real host provides. Implementations are
//! native closures registered per address; `call` dispatches through one
//! level of stub forwarding so clone-vs-original equivalence is observable.

use std::collections::HashMap;

use crate::host::{derived_address, AllocationHost};
use crate::stub;
use crate::types::{Address, Salt};

/// Domain prefix for sequential address assignment, disjoint from the salted
/// derivation domain.
const SEQUENTIAL_DOMAIN: u8 = 0xfe;

/// Native implementation body: `(caller, input) -> output | failure`, both
/// payloads verbatim byte sequences.
pub type Handler = Box<dyn Fn(&Address, &[u8]) -> Result<Vec<u8>, Vec<u8>>>;

#[derive(Default)]
pub struct MemHost {
    balances: HashMap<Address, u128>,
    code: HashMap<Address, Vec<u8>>,
    handlers: HashMap<Address, Handler>,
    sequence: u64,
}

impl MemHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `owner` with spendable balance.
    pub fn credit(&mut self, owner: &Address, amount: u128) {
        *self.balances.entry(*owner).or_insert(0) += amount;
    }

    /// Install a native implementation at `addr`.
    pub fn register(&mut self, addr: Address, handler: Handler) {
        self.handlers.insert(addr, handler);
    }

    /// Deployed code at `addr`, if any.
    pub fn code_at(&self, addr: &Address) -> Option<&[u8]> {
        self.code.get(addr).map(Vec::as_slice)
    }

    /// Whether `addr` can never be assigned to a new instance.
    pub fn is_occupied(&self, addr: &Address) -> bool {
        addr.is_zero() || self.code.contains_key(addr) || self.handlers.contains_key(addr)
    }

    /// Invoke `target` as `caller`.
    ///
    /// A registered handler runs directly. Stub code forwards to its embedded
    /// target's handler with `caller` preserved — the target observes the
    /// original caller, not the stub.
    pub fn call(&self, caller: &Address, target: &Address, input: &[u8]) -> Result<Vec<u8>, Vec<u8>> {
        if let Some(handler) = self.handlers.get(target) {
            return handler(caller, input);
        }
        if let Some(code) = self.code.get(target) {
            if let Some(implementation) = stub::implementation_of(code) {
                if let Some(handler) = self.handlers.get(&implementation) {
                    return handler(caller, input);
                }
            }
        }
        Err(b"no code at target".to_vec())
    }

    fn next_address(&mut self, deployer: &Address) -> Address {
        self.sequence += 1;
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[SEQUENTIAL_DOMAIN]);
        hasher.update(deployer.as_bytes());
        hasher.update(&self.sequence.to_be_bytes());
        let digest = hasher.finalize();
        let bytes = digest.as_bytes();
        let mut out = [0u8; Address::LEN];
        out.copy_from_slice(&bytes[bytes.len() - Address::LEN..]);
        Address::from_bytes(out)
    }

    /// Install the instance and move funding in one step.
    fn install(&mut self, deployer: &Address, addr: Address, code: &[u8], funding: u128) {
        // The runtime routine is what persists; the bootstrap is consumed.
        let deployed = if code.len() == stub::CREATION_LEN
            && code[..stub::CREATION_PREFIX.len()] == stub::CREATION_PREFIX
        {
            code[stub::CREATION_PREFIX.len()..].to_vec()
        } else {
            code.to_vec()
        };
        self.code.insert(addr, deployed);
        if funding > 0 {
            *self.balances.entry(*deployer).or_insert(0) -= funding;
            *self.balances.entry(addr).or_insert(0) += funding;
        }
    }
}

impl AllocationHost for MemHost {
    fn balance_of(&self, owner: &Address) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn create(&mut self, deployer: &Address, code: &[u8], funding: u128) -> Option<Address> {
        if funding > self.balance_of(deployer) {
            return None;
        }
        let addr = self.next_address(deployer);
        if self.is_occupied(&addr) {
            return None;
        }
        self.install(deployer, addr, code, funding);
        Some(addr)
    }

    fn create_salted(
        &mut self,
        deployer: &Address,
        salt: &Salt,
        code: &[u8],
        funding: u128,
    ) -> Option<Address> {
        if funding > self.balance_of(deployer) {
            return None;
        }
        let addr = derived_address(deployer, salt, code);
        if self.is_occupied(&addr) {
            return None;
        }
        self.install(deployer, addr, code, funding);
        Some(addr)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn deployer() -> Address {
        Address::from_bytes([0xaa; 20])
    }

    #[test]
    fn sequential_addresses_are_fresh() {
        let mut host = MemHost::new();
        let a = host.create(&deployer(), b"code-a", 0).unwrap();
        let b = host.create(&deployer(), b"code-a", 0).unwrap();
        assert_ne!(a, b);
        assert!(!a.is_zero());
        assert!(!b.is_zero());
    }

    #[test]
    fn salted_address_matches_derivation_and_refuses_repeat() {
        let mut host = MemHost::new();
        let salt = Salt::from_u64(1);
        let predicted = derived_address(&deployer(), &salt, b"code");
        let got = host.create_salted(&deployer(), &salt, b"code", 0).unwrap();
        assert_eq!(got, predicted);
        assert_eq!(host.create_salted(&deployer(), &salt, b"code", 0), None);
    }

    #[test]
    fn funding_moves_with_creation_only() {
        let mut host = MemHost::new();
        host.credit(&deployer(), 100);
        let addr = host.create(&deployer(), b"code", 30).unwrap();
        assert_eq!(host.balance_of(&deployer()), 70);
        assert_eq!(host.balance_of(&addr), 30);

        // Underfunded attempt moves nothing.
        assert_eq!(host.create(&deployer(), b"code", 1000), None);
        assert_eq!(host.balance_of(&deployer()), 70);
    }

    #[test]
    fn creation_sequence_deploys_runtime_tail() {
        let mut host = MemHost::new();
        let target = Address::from_bytes([0x77; 20]);
        let addr = host.create(&deployer(), &stub::stub_bytes(&target), 0).unwrap();
        let code = host.code_at(&addr).unwrap();
        assert!(stub::is_stub(code));
        assert_eq!(stub::implementation_of(code), Some(target));
    }

    #[test]
    fn call_dispatches_and_forwards() {
        let mut host = MemHost::new();
        let target = Address::from_bytes([0x77; 20]);
        host.register(
            target,
            Box::new(|caller, input| {
                let mut out = caller.as_bytes().to_vec();
                out.extend_from_slice(input);
                Ok(out)
            }),
        );
        let clone = host.create(&deployer(), &stub::stub_bytes(&target), 0).unwrap();

        let user = Address::from_bytes([0x05; 20]);
        let direct = host.call(&user, &target, b"ping").unwrap();
        let via_clone = host.call(&user, &clone, b"ping").unwrap();
        assert_eq!(direct, via_clone);
        // The implementation saw the original caller, not the clone.
        assert_eq!(&via_clone[..Address::LEN], user.as_bytes());
    }

    #[test]
    fn call_to_empty_address_fails() {
        let host = MemHost::new();
        let user = Address::from_bytes([0x05; 20]);
        assert!(host.call(&user, &Address::from_bytes([9; 20]), b"x").is_err());
    }
}
