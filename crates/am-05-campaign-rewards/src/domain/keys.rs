//! Key handling for reward payments.

use am_01_transaction_bundle::opcodes::{OP_CHECKSIG, OP_DUP, OP_EQUALVERIFY, OP_HASH160};
use am_01_transaction_bundle::{LockingScript, ScriptChunk};
use base64::Engine;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{PublicKey, SecretKey};
use rand::RngCore;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::domain::errors::CampaignError;

const DERIVATION_ID_BYTES: usize = 10;
const CAMPAIGN_ID_BYTES: usize = 12;
const PRIVATE_KEY_BYTES: usize = 32;

/// RIPEMD-160 of SHA-256.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// Pay-to-public-key-hash script for a hex public key.
///
/// The key is hashed in compressed form whatever its input encoding.
pub fn p2pkh_locking_script(public_key_hex: &str) -> Result<LockingScript, CampaignError> {
    let invalid = || CampaignError::InvalidPublicKey(public_key_hex.to_string());
    let bytes = hex::decode(public_key_hex).map_err(|_| invalid())?;
    let key = PublicKey::from_sec1_bytes(&bytes).map_err(|_| invalid())?;
    let compressed = key.to_encoded_point(true);

    Ok(LockingScript::from_chunks(&[
        ScriptChunk::op(OP_DUP),
        ScriptChunk::op(OP_HASH160),
        ScriptChunk::push(hash160(compressed.as_bytes()).to_vec()),
        ScriptChunk::op(OP_EQUALVERIFY),
        ScriptChunk::op(OP_CHECKSIG),
    ]))
}

/// Compressed public key (hex) of a hex-encoded 32-byte private key.
pub fn identity_key_from_private_hex(private_key_hex: &str) -> Result<String, CampaignError> {
    let bytes = hex::decode(private_key_hex.trim()).map_err(|_| CampaignError::InvalidServerKey)?;
    if bytes.len() != PRIVATE_KEY_BYTES {
        return Err(CampaignError::InvalidServerKey);
    }
    let secret = SecretKey::from_slice(&bytes).map_err(|_| CampaignError::InvalidServerKey)?;
    Ok(hex::encode(secret.public_key().to_encoded_point(true).as_bytes()))
}

/// Fresh base64 derivation prefix or suffix.
pub fn random_derivation_id() -> String {
    let mut bytes = [0u8; DERIVATION_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Fresh campaign id: 24 lowercase hex characters.
pub fn random_campaign_id() -> String {
    let mut bytes = [0u8; CAMPAIGN_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
