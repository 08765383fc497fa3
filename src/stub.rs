//! Forwarding-stub construction and inspection.
//!
//! The stub is a fixed 45-byte delegation routine: forward the incoming
//! payload verbatim to the embedded target, preserve the original caller as
//! observed by the target, and return the target's output (or failure)
//! verbatim. The target address sits at a fixed offset inside the routine
//! itself — baked in at construction, never stored in a mutable slot — so a
//! deployed stub can never be redirected and pays no storage read per call.
//!
//! The 55-byte creation sequence is the routine plus a 10-byte bootstrap that
//! copies the routine into place and returns it as the instance's code.

use crate::types::Address;

/// Creation bootstrap: copy the trailing [`RUNTIME_LEN`] bytes and return
/// them as the new instance's code.
pub const CREATION_PREFIX: [u8; 10] = [0x3d, 0x60, 0x2d, 0x80, 0x60, 0x0a, 0x3d, 0x39, 0x81, 0xf3];

/// Delegation prologue: stage the incoming payload and push the target.
pub const RUNTIME_PREFIX: [u8; 10] = [0x36, 0x3d, 0x3d, 0x37, 0x3d, 0x3d, 0x3d, 0x36, 0x3d, 0x73];

/// Delegation epilogue: delegate, then propagate output or failure verbatim.
pub const RUNTIME_SUFFIX: [u8; 15] = [
    0x5a, 0xf4, 0x3d, 0x82, 0x80, 0x3e, 0x90, 0x3d, 0x91, 0x60, 0x2b, 0x57, 0xfd, 0x5b, 0xf3,
];

/// Length of the deployed routine.
pub const RUNTIME_LEN: usize = RUNTIME_PREFIX.len() + Address::LEN + RUNTIME_SUFFIX.len();

/// Length of the creation sequence submitted to the allocation primitive.
pub const CREATION_LEN: usize = CREATION_PREFIX.len() + RUNTIME_LEN;

/// Byte offset of the embedded target within the deployed routine.
pub const TARGET_OFFSET: usize = RUNTIME_PREFIX.len();

/// The deployed forwarding routine for `implementation`.
pub fn runtime_bytes(implementation: &Address) -> [u8; RUNTIME_LEN] {
    let mut out = [0u8; RUNTIME_LEN];
    out[..TARGET_OFFSET].copy_from_slice(&RUNTIME_PREFIX);
    out[TARGET_OFFSET..TARGET_OFFSET + Address::LEN].copy_from_slice(implementation.as_bytes());
    out[TARGET_OFFSET + Address::LEN..].copy_from_slice(&RUNTIME_SUFFIX);
    out
}

/// The full creation sequence for `implementation`, ready for the allocation
/// primitive in either mode.
pub fn stub_bytes(implementation: &Address) -> [u8; CREATION_LEN] {
    let mut out = [0u8; CREATION_LEN];
    out[..CREATION_PREFIX.len()].copy_from_slice(&CREATION_PREFIX);
    out[CREATION_PREFIX.len()..].copy_from_slice(&runtime_bytes(implementation));
    out
}

/// Whether `code` is a deployed forwarding routine (any target).
pub fn is_stub(code: &[u8]) -> bool {
    code.len() == RUNTIME_LEN
        && code[..TARGET_OFFSET] == RUNTIME_PREFIX
        && code[TARGET_OFFSET + Address::LEN..] == RUNTIME_SUFFIX
}

/// Recover the embedded target from a deployed routine.
///
/// Returns `None` for anything that is not byte-exactly a forwarding routine;
/// a mutated prologue or epilogue does not count.
pub fn implementation_of(code: &[u8]) -> Option<Address> {
    if !is_stub(code) {
        return None;
    }
    Address::from_slice(&code[TARGET_OFFSET..TARGET_OFFSET + Address::LEN]).ok()
}

// ── Tests ───────────────────────────────────────────────────────────────
