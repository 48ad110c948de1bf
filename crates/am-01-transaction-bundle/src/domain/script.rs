//! # Locking Scripts
//!
//! Scripts are stored as raw bytes and split into chunks on demand.

use crate::domain::errors::ScriptError;

/// Opcodes referenced by the overlay codecs.
pub mod opcodes {
    pub const OP_0: u8 = 0x00;
    /// Largest opcode that is itself a push length.
    pub const OP_PUSHBYTES_75: u8 = 0x4b;
    pub const OP_PUSHDATA1: u8 = 0x4c;
    pub const OP_PUSHDATA2: u8 = 0x4d;
    pub const OP_PUSHDATA4: u8 = 0x4e;
    pub const OP_1NEGATE: u8 = 0x4f;
    pub const OP_1: u8 = 0x51;
    pub const OP_16: u8 = 0x60;
    pub const OP_RETURN: u8 = 0x6a;
    pub const OP_2DROP: u8 = 0x6d;
    pub const OP_DROP: u8 = 0x75;
    pub const OP_DUP: u8 = 0x76;
    pub const OP_EQUALVERIFY: u8 = 0x88;
    pub const OP_HASH160: u8 = 0xa9;
    pub const OP_CHECKSIG: u8 = 0xac;
}

use opcodes::*;

/// One parsed script element: a bare opcode, or a push with its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptChunk {
    pub op: u8,
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// A non-push opcode.
    pub fn op(op: u8) -> Self {
        Self { op, data: None }
    }

    /// Push `data` with the shortest length-prefix opcode.
    ///
    /// Small values are NOT folded into `OP_0`..`OP_16`; callers that want
    /// minimal encoding do that themselves.
    pub fn push(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let op = match data.len() {
            0..=0x4b => data.len() as u8,
            0x4c..=0xff => OP_PUSHDATA1,
            0x100..=0xffff => OP_PUSHDATA2,
            _ => OP_PUSHDATA4,
        };
        Self { op, data: Some(data) }
    }

    pub fn is_push(&self) -> bool {
        self.data.is_some()
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.op);
        if let Some(data) = &self.data {
            match self.op {
                OP_PUSHDATA1 => out.push(data.len() as u8),
                OP_PUSHDATA2 => out.extend_from_slice(&(data.len() as u16).to_le_bytes()),
                OP_PUSHDATA4 => out.extend_from_slice(&(data.len() as u32).to_le_bytes()),
                _ => {}
            }
            out.extend_from_slice(data);
        }
    }
}

/// Output locking script.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct LockingScript(Vec<u8>);

impl LockingScript {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_hex(s: &str) -> Result<Self, ScriptError> {
        hex::decode(s)
            .map(Self)
            .map_err(|_| ScriptError::InvalidHex(s.to_string()))
    }

    pub fn from_chunks(chunks: &[ScriptChunk]) -> Self {
        let mut out = Vec::new();
        for chunk in chunks {
            chunk.write_to(&mut out);
        }
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first_byte(&self) -> Option<u8> {
        self.0.first().copied()
    }

    /// Split into opcodes and pushes.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        let bytes = &self.0;
        let mut chunks = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let offset = pos;
            let op = bytes[pos];
            pos += 1;

            let (len_size, len) = match op {
                0x01..=OP_PUSHBYTES_75 => (0, op as usize),
                OP_PUSHDATA1 => (1, read_len(bytes, pos, 1, offset)?),
                OP_PUSHDATA2 => (2, read_len(bytes, pos, 2, offset)?),
                OP_PUSHDATA4 => (4, read_len(bytes, pos, 4, offset)?),
                _ => {
                    chunks.push(ScriptChunk::op(op));
                    continue;
                }
            };
            pos += len_size;

            let available = bytes.len() - pos;
            if len > available {
                return Err(ScriptError::TruncatedPush {
                    offset,
                    needed: len,
                    available,
                });
            }
            chunks.push(ScriptChunk {
                op,
                data: Some(bytes[pos..pos + len].to_vec()),
            });
            pos += len;
        }

        Ok(chunks)
    }
}

fn read_len(bytes: &[u8], pos: usize, size: usize, offset: usize) -> Result<usize, ScriptError> {
    let available = bytes.len().saturating_sub(pos);
    if available < size {
        return Err(ScriptError::TruncatedPush {
            offset,
            needed: size,
            available,
        });
    }
    let mut buf = [0u8; 4];
    buf[..size].copy_from_slice(&bytes[pos..pos + size]);
    Ok(u32::from_le_bytes(buf) as usize)
}

impl std::fmt::Debug for LockingScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LockingScript({})", hex::encode(&self.0))
    }
}
