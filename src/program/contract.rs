//! Single-signature verification contracts and authorization programs.
//!
//! A contract script pushes the signer's compressed public key and runs
//! CHECKSIG. A program pairs that script with a parameter script pushing
//! the signature:
//!
//! ```text
//! code      = PUSHBYTES33 <pubkey:33> CHECKSIG      (35 bytes)
//! parameter = PUSHBYTES64 <r||s:64>                 (65 bytes)
//! ```

use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature, VerifyingKey};

use crate::program::constants::{
    opcode, COMPRESSED_PUBKEY_SIZE, SIGNATURE_CONTRACT_SIZE, SIGNATURE_PARAMETER_SIZE,
    SIGNATURE_SIZE,
};
use crate::program::error::{SdkError, SdkResult};
use crate::program::keys::PublicKey;

// ============================================================================
// Contract
// ============================================================================

/// A single-signature verification contract bound to one public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    code: Vec<u8>,
    public_key: PublicKey,
}

/// Build the single-signature contract for `public_key`.
pub fn create_signature_contract(public_key: &PublicKey) -> SdkResult<Contract> {
    let mut code = Vec::with_capacity(SIGNATURE_CONTRACT_SIZE);
    code.push(opcode::PUSHBYTES33);
    code.extend_from_slice(&public_key.encode_point());
    code.push(opcode::CHECKSIG);

    let contract = Contract::from_code(&code)?;
    if contract.public_key() != public_key {
        return Err(SdkError::Contract(format!(
            "script key {} does not match {}",
            contract.public_key(),
            public_key
        )));
    }
    Ok(contract)
}

impl Contract {
    /// Parse a single-signature contract script.
    pub fn from_code(code: &[u8]) -> SdkResult<Self> {
        if code.len() != SIGNATURE_CONTRACT_SIZE {
            return Err(SdkError::Contract(format!(
                "script is {} bytes, expected {}",
                code.len(),
                SIGNATURE_CONTRACT_SIZE
            )));
        }
        if code[0] != opcode::PUSHBYTES33 || code[SIGNATURE_CONTRACT_SIZE - 1] != opcode::CHECKSIG {
            return Err(SdkError::Contract(
                "not a single-signature script".to_string(),
            ));
        }
        let public_key = PublicKey::decode_point(&code[1..1 + COMPRESSED_PUBKEY_SIZE])
            .map_err(|e| SdkError::Contract(e.to_string()))?;

        Ok(Self {
            code: code.to_vec(),
            public_key,
        })
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Pair this contract with a signature to form a program.
    pub fn program(&self, signature: &[u8; SIGNATURE_SIZE]) -> Program {
        let mut parameter = Vec::with_capacity(SIGNATURE_PARAMETER_SIZE);
        parameter.push(opcode::PUSHBYTES64);
        parameter.extend_from_slice(signature);
        Program::new(self.code.clone(), parameter)
    }

    /// Check `signature` over `message` against this contract's key.
    pub fn verify(&self, message: &[u8], signature: &[u8; SIGNATURE_SIZE]) -> SdkResult<()> {
        let verifying_key = VerifyingKey::from_sec1_bytes(&self.public_key.encode_point())
            .map_err(|e| SdkError::Contract(e.to_string()))?;
        let signature =
            Signature::from_slice(signature).map_err(|_| SdkError::SignatureVerificationFailed)?;
        verifying_key
            .verify(message, &signature)
            .map_err(|_| SdkError::SignatureVerificationFailed)
    }
}

// ============================================================================
// Program
// ============================================================================

/// An authorization program: verification script plus parameter script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    code: Vec<u8>,
    parameter: Vec<u8>,
}

impl Program {
    pub fn new(code: Vec<u8>, parameter: Vec<u8>) -> Self {
        Self { code, parameter }
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn parameter(&self) -> &[u8] {
        &self.parameter
    }

    /// The public key the verification script is bound to.
    pub fn public_key(&self) -> SdkResult<PublicKey> {
        Ok(Contract::from_code(&self.code)?.public_key)
    }

    /// The signature pushed by the parameter script.
    pub fn signature(&self) -> SdkResult<[u8; SIGNATURE_SIZE]> {
        if self.parameter.len() != SIGNATURE_PARAMETER_SIZE
            || self.parameter[0] != opcode::PUSHBYTES64
        {
            return Err(SdkError::Contract(
                "parameter is not a single signature push".to_string(),
            ));
        }
        let mut signature = [0u8; SIGNATURE_SIZE];
        signature.copy_from_slice(&self.parameter[1..]);
        Ok(signature)
    }
}

// ============================================================================
// Authorization Context
// ============================================================================

/// Collects programs for one record during a single authorization.
///
/// A context is scoped to one record's signing bytes, created per
/// authorization call and consumed when its programs are attached. Every
/// registered signature must verify over those bytes. Registering a second
/// program for the same public key fails with [`SdkError::Attach`].
#[derive(Debug)]
pub struct AuthorizationContext {
    message: Vec<u8>,
    programs: Vec<(PublicKey, Program)>,
}

impl AuthorizationContext {
    /// Start a context scoped to the record whose signing bytes are `message`.
    pub fn new(message: impl Into<Vec<u8>>) -> Self {
        Self {
            message: message.into(),
            programs: Vec::new(),
        }
    }

    /// The signing bytes this context authorizes.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Register a (contract, public key, signature) triple.
    ///
    /// Fails with [`SdkError::SignatureVerificationFailed`] when `signature`
    /// does not cover this context's record.
    pub fn add_contract(
        &mut self,
        contract: &Contract,
        public_key: &PublicKey,
        signature: &[u8; SIGNATURE_SIZE],
    ) -> SdkResult<()> {
        if contract.public_key() != public_key {
            return Err(SdkError::Contract(format!(
                "contract is bound to {}, not {}",
                contract.public_key(),
                public_key
            )));
        }
        if self.programs.iter().any(|(key, _)| key == public_key) {
            return Err(SdkError::Attach {
                public_key: public_key.to_hex(),
            });
        }
        contract.verify(&self.message, signature)?;
        self.programs
            .push((public_key.clone(), contract.program(signature)));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Programs in registration order.
    pub fn into_programs(self) -> Vec<Program> {
        self.programs
            .into_iter()
            .map(|(_, program)| program)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::signer::{Account, Identity};

    fn account(seed: u8) -> Account {
        Account::from_private_key_bytes(&[seed; 32]).unwrap()
    }

    #[test]
    fn test_signature_contract_layout() {
        let key = account(3).public_key();
        let contract = create_signature_contract(&key).unwrap();
        let code = contract.code();

        assert_eq!(code.len(), SIGNATURE_CONTRACT_SIZE);
        assert_eq!(code[0], opcode::PUSHBYTES33);
        assert_eq!(&code[1..34], &key.encode_point());
        assert_eq!(code[34], opcode::CHECKSIG);
    }

    #[test]
    fn test_contract_from_code_roundtrip() {
        let key = account(3).public_key();
        let contract = create_signature_contract(&key).unwrap();
        let parsed = Contract::from_code(contract.code()).unwrap();
        assert_eq!(parsed, contract);
    }

    #[test]
    fn test_contract_from_code_rejects_bad_scripts() {
        assert!(matches!(Contract::from_code(&[0xAC]), Err(SdkError::Contract(_))));

        let key = account(3).public_key();
        let mut code = create_signature_contract(&key).unwrap().code().to_vec();
        code[34] = 0x00;
        assert!(matches!(Contract::from_code(&code), Err(SdkError::Contract(_))));
    }

    #[test]
    fn test_program_parameter_layout() {
        let contract = create_signature_contract(&account(3).public_key()).unwrap();
        let program = contract.program(&[9u8; 64]);

        assert_eq!(program.parameter().len(), SIGNATURE_PARAMETER_SIZE);
        assert_eq!(program.parameter()[0], opcode::PUSHBYTES64);
        assert_eq!(program.signature().unwrap(), [9u8; 64]);
        assert_eq!(program.public_key().unwrap(), account(3).public_key());
    }

    #[test]
    fn test_verify_signature() {
        let signer = account(4);
        let contract = create_signature_contract(&signer.public_key()).unwrap();
        let signature = signer.sign(b"message").unwrap();

        assert!(contract.verify(b"message", &signature).is_ok());
        assert!(matches!(
            contract.verify(b"other message", &signature),
            Err(SdkError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_context_rejects_duplicate_registration() {
        let signer = account(5);
        let key = signer.public_key();
        let contract = create_signature_contract(&key).unwrap();
        let signature = signer.sign(b"record").unwrap();

        let mut context = AuthorizationContext::new(b"record".to_vec());
        context.add_contract(&contract, &key, &signature).unwrap();

        let err = context.add_contract(&contract, &key, &signature).unwrap_err();
        assert!(matches!(err, SdkError::Attach { public_key } if public_key == key.to_hex()));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_context_rejects_mismatched_key() {
        let contract = create_signature_contract(&account(5).public_key()).unwrap();
        let signature = account(6).sign(b"record").unwrap();
        let mut context = AuthorizationContext::new(b"record".to_vec());

        let err = context
            .add_contract(&contract, &account(6).public_key(), &signature)
            .unwrap_err();
        assert!(matches!(err, SdkError::Contract(_)));
        assert!(context.is_empty());
    }

    #[test]
    fn test_context_rejects_signature_over_other_record() {
        let signer = account(5);
        let key = signer.public_key();
        let contract = create_signature_contract(&key).unwrap();
        let signature = signer.sign(b"another record").unwrap();

        let mut context = AuthorizationContext::new(b"record".to_vec());
        let err = context.add_contract(&contract, &key, &signature).unwrap_err();

        assert!(matches!(err, SdkError::SignatureVerificationFailed));
        assert!(context.is_empty());
        assert_eq!(context.message(), b"record");
    }

    #[test]
    fn test_context_preserves_order() {
        let first = account(7);
        let second = account(8);
        let mut context = AuthorizationContext::new(b"record".to_vec());
        for signer in [&first, &second] {
            let key = signer.public_key();
            context
                .add_contract(
                    &create_signature_contract(&key).unwrap(),
                    &key,
                    &signer.sign(b"record").unwrap(),
                )
                .unwrap();
        }

        let programs = context.into_programs();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].public_key().unwrap(), first.public_key());
        assert_eq!(programs[1].public_key().unwrap(), second.public_key());
    }
}
