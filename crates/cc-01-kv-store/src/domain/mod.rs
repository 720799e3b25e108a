//! Key helpers and commit identifiers.

/// A key/value pair returned by range reads.
pub type Pair = (Vec<u8>, Vec<u8>);

/// What happened to a touched key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyOp {
    Set,
    Delete,
}

/// Version and app hash produced by a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitId {
    pub version: u64,
    pub hash: [u8; 32],
}

/// Smallest key strictly greater than every key starting with `prefix`.
///
/// Returns `None` when no such key exists (empty prefix or all `0xff`).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

/// `true` if `key` lies in `[start, end)`; a missing `end` is unbounded.
pub fn in_range(key: &[u8], start: &[u8], end: Option<&[u8]>) -> bool {
    key >= start && end.map_or(true, |end| key < end)
}
