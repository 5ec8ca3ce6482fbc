//! Wraparound-aware counter comparison

/// Compare packet counters in u32 space with wraparound using the half-range rule.
/// Returns true if `a` is considered newer than `b`.
pub fn sequence_after(a: u32, b: u32) -> bool {
    if a == b {
        return false;
    }
    a.wrapping_sub(b) < 0x8000_0000
}
