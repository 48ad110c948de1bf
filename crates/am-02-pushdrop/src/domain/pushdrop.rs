//! # PushDrop Scripts
//!
//! Decoding accepts fields pushed either as raw data or as minimally
//! encoded small integers, and normalises the latter back to bytes:
//!
//! | Opcode | Field |
//! |--------|-------|
//! | `OP_0` | `[0x00]` |
//! | `OP_1`..`OP_16` | `[n]` |
//! | `OP_1NEGATE` | `[0x81]` |
//! | any other opcode | `[]` |
//!
//! An empty field is locked as `OP_0` and therefore decodes as `[0x00]`.
//! Wallets that build these tokens do the same.

use am_01_transaction_bundle::{opcodes::*, LockingScript, ScriptChunk};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;

use crate::domain::errors::PushDropError;

const COMPRESSED_KEY_LEN: usize = 33;

/// A decoded PushDrop output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDropToken {
    pub locking_public_key: PublicKey,
    pub fields: Vec<Vec<u8>>,
}

impl PushDropToken {
    /// Compressed SEC1 encoding of the locking key, hex.
    pub fn locking_public_key_hex(&self) -> String {
        hex::encode(self.locking_public_key.to_encoded_point(true).as_bytes())
    }
}

/// PushDrop codec.
pub struct PushDrop;

impl PushDrop {
    /// Decode a PushDrop locking script.
    ///
    /// Fields run from the third chunk up to and including the chunk
    /// followed by `OP_DROP` / `OP_2DROP`, or to the end of the script.
    pub fn decode(script: &LockingScript) -> Result<PushDropToken, PushDropError> {
        let chunks = script.chunks()?;

        let key_bytes = match chunks.first() {
            Some(ScriptChunk { data: Some(data), .. }) if data.len() == COMPRESSED_KEY_LEN => data,
            _ => return Err(PushDropError::MissingLockingKey),
        };
        let locking_public_key =
            PublicKey::from_sec1_bytes(key_bytes).map_err(|_| PushDropError::InvalidLockingKey)?;

        match chunks.get(1) {
            Some(chunk) if chunk.op == OP_CHECKSIG && !chunk.is_push() => {}
            Some(chunk) => return Err(PushDropError::MissingChecksig(chunk.op)),
            None => return Err(PushDropError::MissingChecksig(OP_0)),
        }

        let mut fields = Vec::new();
        for position in 2..chunks.len() {
            fields.push(field_bytes(&chunks[position]));
            if matches!(chunks.get(position + 1), Some(next) if is_drop(next)) {
                break;
            }
        }

        Ok(PushDropToken {
            locking_public_key,
            fields,
        })
    }

    /// Build a PushDrop locking script with minimally encoded fields.
    pub fn lock(locking_public_key: &PublicKey, fields: &[Vec<u8>]) -> LockingScript {
        let key = locking_public_key.to_encoded_point(true);
        let mut chunks = Vec::with_capacity(fields.len() + 4);
        chunks.push(ScriptChunk::push(key.as_bytes()));
        chunks.push(ScriptChunk::op(OP_CHECKSIG));
        chunks.extend(fields.iter().map(|field| minimal_push(field)));

        let mut remaining = fields.len();
        while remaining > 1 {
            chunks.push(ScriptChunk::op(OP_2DROP));
            remaining -= 2;
        }
        if remaining == 1 {
            chunks.push(ScriptChunk::op(OP_DROP));
        }

        LockingScript::from_chunks(&chunks)
    }
}

/// Encode `data` as the shortest push, folding small values into opcodes.
pub fn minimal_push(data: &[u8]) -> ScriptChunk {
    match data {
        [] | [0] => ScriptChunk::op(OP_0),
        [n @ 1..=16] => ScriptChunk::op(OP_1 - 1 + *n),
        [0x81] => ScriptChunk::op(OP_1NEGATE),
        _ => ScriptChunk::push(data),
    }
}

fn field_bytes(chunk: &ScriptChunk) -> Vec<u8> {
    if let Some(data) = &chunk.data {
        return data.clone();
    }
    match chunk.op {
        OP_0 => vec![0],
        OP_1..=OP_16 => vec![chunk.op - OP_1 + 1],
        OP_1NEGATE => vec![0x81],
        _ => Vec::new(),
    }
}

fn is_drop(chunk: &ScriptChunk) -> bool {
    !chunk.is_push() && (chunk.op == OP_DROP || chunk.op == OP_2DROP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::SecretKey;

    fn test_key() -> PublicKey {
        SecretKey::random(&mut rand::thread_rng()).public_key()
    }

    #[test]
    fn test_lock_layout() {
        let key = test_key();
        let script = PushDrop::lock(&key, &[b"abc".to_vec(), b"de".to_vec(), b"f".to_vec()]);
        let bytes = script.as_bytes();

        assert_eq!(bytes[0], 0x21);
        assert_eq!(bytes[34], OP_CHECKSIG);
        // Three fields: one OP_2DROP, one OP_DROP.
        assert_eq!(&bytes[bytes.len() - 2..], &[OP_2DROP, OP_DROP]);
    }

    #[test]
    fn test_lock_decode_preserves_fields() {
        let key = test_key();
        let fields = vec![
            b"1AdDtKreEzbHYKFjmoBuduFmSXXUGZG".to_vec(),
            vec![0xaa; 80],
            vec![0xbb; 300],
            vec![7],
            vec![0x81],
            vec![0],
        ];
        let token = PushDrop::decode(&PushDrop::lock(&key, &fields)).unwrap();
        assert_eq!(token.locking_public_key, key);
        assert_eq!(token.fields, fields);
    }

    #[test]
    fn test_small_integers_use_opcodes() {
        assert_eq!(minimal_push(&[1]), ScriptChunk::op(OP_1));
        assert_eq!(minimal_push(&[16]), ScriptChunk::op(OP_16));
        assert_eq!(minimal_push(&[17]), ScriptChunk::push(vec![17]));
        assert_eq!(minimal_push(&[]), ScriptChunk::op(OP_0));
    }

    #[test]
    fn test_empty_field_decodes_as_zero() {
        let key = test_key();
        let token = PushDrop::decode(&PushDrop::lock(&key, &[Vec::new(), b"x".to_vec()])).unwrap();
        assert_eq!(token.fields, vec![vec![0], b"x".to_vec()]);
    }

    #[test]
    fn test_fields_stop_at_first_drop() {
        let key = test_key();
        let mut chunks = vec![
            ScriptChunk::push(key.to_encoded_point(true).as_bytes()),
            ScriptChunk::op(OP_CHECKSIG),
            ScriptChunk::push(b"one".to_vec()),
            ScriptChunk::op(OP_DROP),
        ];
        // Anything after the drop is not a field.
        chunks.push(ScriptChunk::push(b"tail".to_vec()));
        let token = PushDrop::decode(&LockingScript::from_chunks(&chunks)).unwrap();
        assert_eq!(token.fields, vec![b"one".to_vec()]);
    }

    #[test]
    fn test_stray_opcode_in_fields_is_an_empty_field() {
        let key = test_key();
        let chunks = vec![
            ScriptChunk::push(key.to_encoded_point(true).as_bytes()),
            ScriptChunk::op(OP_CHECKSIG),
            ScriptChunk::push(b"one".to_vec()),
            ScriptChunk::op(OP_DUP),
            ScriptChunk::push(b"three".to_vec()),
            ScriptChunk::op(OP_2DROP),
            ScriptChunk::op(OP_DROP),
        ];
        let token = PushDrop::decode(&LockingScript::from_chunks(&chunks)).unwrap();
        assert_eq!(token.fields, vec![b"one".to_vec(), Vec::new(), b"three".to_vec()]);
    }

    #[test]
    fn test_no_fields() {
        let key = test_key();
        let token = PushDrop::decode(&PushDrop::lock(&key, &[])).unwrap();
        assert!(token.fields.is_empty());
        assert_eq!(token.locking_public_key_hex().len(), 66);
    }

    #[test]
    fn test_rejects_p2pkh() {
        let script = LockingScript::from_hex(&format!("76a914{}88ac", "11".repeat(20))).unwrap();
        assert_eq!(PushDrop::decode(&script), Err(PushDropError::MissingLockingKey));
    }

    #[test]
    fn test_rejects_invalid_point() {
        let mut bytes = vec![0x21, 0x05];
        bytes.extend_from_slice(&[0x11; 32]);
        bytes.push(OP_CHECKSIG);
        let script = LockingScript::from_bytes(bytes);
        assert_eq!(PushDrop::decode(&script), Err(PushDropError::InvalidLockingKey));
    }

    #[test]
    fn test_rejects_missing_checksig() {
        let key = test_key();
        let chunks = vec![
            ScriptChunk::push(key.to_encoded_point(true).as_bytes()),
            ScriptChunk::push(b"field".to_vec()),
        ];
        assert!(matches!(
            PushDrop::decode(&LockingScript::from_chunks(&chunks)),
            Err(PushDropError::MissingChecksig(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_script() {
        let key = test_key();
        let script = PushDrop::lock(&key, &[vec![0xcc; 40]]);
        let cut = LockingScript::from_bytes(&script.as_bytes()[..50]);
        assert!(matches!(PushDrop::decode(&cut), Err(PushDropError::Script(_))));
    }
}
