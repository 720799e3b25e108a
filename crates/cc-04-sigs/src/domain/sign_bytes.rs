use shared_types::StdSignature;

use super::keys::PrivateKey;

const SIGN_PREFIX: &[u8] = b"\x00\xCA\xFE\x00";

/// Bytes a signer commits to: prefix, length-prefixed chain id, sequence
/// and the transaction without its signatures.
pub fn build_sign_bytes(tx_bytes: &[u8], chain_id: &str, sequence: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(SIGN_PREFIX.len() + 1 + chain_id.len() + 8 + tx_bytes.len());
    out.extend_from_slice(SIGN_PREFIX);
    out.push(chain_id.len() as u8);
    out.extend_from_slice(chain_id.as_bytes());
    out.extend_from_slice(&sequence.to_be_bytes());
    out.extend_from_slice(tx_bytes);
    out
}

/// Produce a signature for `tx_bytes` at `sequence`.
pub fn sign_tx(key: &PrivateKey, tx_bytes: &[u8], chain_id: &str, sequence: u64) -> StdSignature {
    StdSignature {
        sequence,
        pubkey: key.public_key().as_bytes().to_vec(),
        signature: key.sign(&build_sign_bytes(tx_bytes, chain_id, sequence)),
    }
}
