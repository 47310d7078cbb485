//! Ed25519 signature-verification instruction.
//!
//! The claim program does not verify voucher signatures itself. It loads the
//! instruction immediately before it from the instructions sysvar and expects
//! a native Ed25519 program call carrying the authorizer key, the signature
//! and the signed message, all inline in that instruction's data.
//!
//! Data layout (single signature):
//! ```text
//! [0]       number of signatures (1)
//! [1]       padding
//! [2..16]   offsets, seven little-endian u16 values
//! [16..48]  public key
//! [48..112] signature
//! [112..]   message
//! ```

use solana_sdk::ed25519_instruction::{
    DATA_START, PUBKEY_SERIALIZED_SIZE, SIGNATURE_OFFSETS_START, SIGNATURE_SERIALIZED_SIZE,
};
use solana_sdk::ed25519_program;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

pub const PUBKEY_SIZE: usize = PUBKEY_SERIALIZED_SIZE;
pub const SIGNATURE_SIZE: usize = SIGNATURE_SERIALIZED_SIZE;

/// Marks an offset as pointing into the verification instruction itself.
const CURRENT_INSTRUCTION: u16 = u16::MAX;

/// Offsets record of one signature, in wire order.
///
/// Mirrors `ed25519_instruction::Ed25519SignatureOffsets`, whose fields are
/// not public in this SDK release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureOffsets {
    pub signature_offset: u16,
    pub signature_instruction_index: u16,
    pub public_key_offset: u16,
    pub public_key_instruction_index: u16,
    pub message_data_offset: u16,
    pub message_data_size: u16,
    pub message_instruction_index: u16,
}

impl SignatureOffsets {
    fn encode(&self, out: &mut Vec<u8>) {
        for field in [
            self.signature_offset,
            self.signature_instruction_index,
            self.public_key_offset,
            self.public_key_instruction_index,
            self.message_data_offset,
            self.message_data_size,
            self.message_instruction_index,
        ] {
            out.extend_from_slice(&field.to_le_bytes());
        }
    }

    /// Decode the offsets record from verification instruction data.
    pub fn decode(data: &[u8]) -> Option<Self> {
        let raw = data.get(SIGNATURE_OFFSETS_START..DATA_START)?;
        let field = |i: usize| u16::from_le_bytes([raw[2 * i], raw[2 * i + 1]]);
        Some(Self {
            signature_offset: field(0),
            signature_instruction_index: field(1),
            public_key_offset: field(2),
            public_key_instruction_index: field(3),
            message_data_offset: field(4),
            message_data_size: field(5),
            message_instruction_index: field(6),
        })
    }
}

/// Build the verification instruction for an already-produced signature.
pub fn verify_signature_instruction(
    authorizer: &Pubkey,
    message: &[u8],
    signature: &[u8; SIGNATURE_SIZE],
) -> BlockchainResult<Instruction> {
    let public_key_offset = DATA_START;
    let signature_offset = public_key_offset + PUBKEY_SIZE;
    let message_data_offset = signature_offset + SIGNATURE_SIZE;

    let message_data_size = u16::try_from(message.len())
        .ok()
        .filter(|_| message_data_offset + message.len() <= u16::MAX as usize)
        .ok_or_else(|| {
            BlockchainError::Voucher(format!(
                "voucher message of {} bytes does not fit in a verification instruction",
                message.len()
            ))
        })?;

    let offsets = SignatureOffsets {
        signature_offset: signature_offset as u16,
        signature_instruction_index: CURRENT_INSTRUCTION,
        public_key_offset: public_key_offset as u16,
        public_key_instruction_index: CURRENT_INSTRUCTION,
        message_data_offset: message_data_offset as u16,
        message_data_size,
        message_instruction_index: CURRENT_INSTRUCTION,
    };

    let mut data = Vec::with_capacity(message_data_offset + message.len());
    data.push(1);
    data.resize(SIGNATURE_OFFSETS_START, 0);
    offsets.encode(&mut data);
    data.extend_from_slice(authorizer.as_ref());
    data.extend_from_slice(signature);
    data.extend_from_slice(message);

    Ok(Instruction {
        program_id: ed25519_program::id(),
        accounts: vec![],
        data,
    })
}

/// Check that every instruction of `program_id` in `message` is directly
/// preceded by an Ed25519 verification instruction.
pub fn ensure_verified_before(message: &Message, program_id: &Pubkey) -> BlockchainResult<()> {
    let program_at = |index: usize| -> Option<&Pubkey> {
        let ix = message.instructions.get(index)?;
        message.account_keys.get(ix.program_id_index as usize)
    };

    let mut found = false;
    for index in 0..message.instructions.len() {
        if program_at(index) != Some(program_id) {
            continue;
        }
        found = true;
        let previous = index.checked_sub(1).and_then(program_at);
        if previous != Some(&ed25519_program::id()) {
            return Err(BlockchainError::InstructionOrder(format!(
                "instruction {} calls {} without a signature verification directly before it",
                index, program_id
            )));
        }
    }

    if !found {
        return Err(BlockchainError::InstructionOrder(format!(
            "message contains no instruction for {}",
            program_id
        )));
    }
    Ok(())
}
