//! Bookkeeper records, serialization, hashing, and verification.
//!
//! A record starts life as an [`UnsignedRecord`] and becomes a
//! [`SignedRecord`] once an authorization program is attached. Only signed
//! records can be serialized for submission.
//!
//! Layout (unsigned portion, also the signing message):
//! - tx_type (1 byte, `0x02`)
//! - payload_version (1 byte, `0x00`)
//! - target_key (varbytes, 33-byte compressed point)
//! - action (1 byte, 0 = add, 1 = sub)
//! - certificate (varbytes)
//! - issuer_key (varbytes, 33-byte compressed point)
//! - attributes (varint count, each: usage byte + varbytes data)
//!
//! The signed form appends the programs (varint count, each: code varbytes +
//! parameter varbytes).

use std::io::Write;

use sha2::{Digest, Sha256};

use crate::program::constants::{BOOKKEEPER_TX_TYPE, HASH_SIZE, PAYLOAD_VERSION};
use crate::program::contract::{Contract, Program};
use crate::program::error::{SdkError, SdkResult};
use crate::program::keys::PublicKey;
use crate::program::nonce::NonceSource;
use crate::program::types::{AttributeUsage, BookkeeperAction};
use crate::program::utils::{write_u8, write_var_bytes, write_varint, Reader};

// ============================================================================
// Payload
// ============================================================================

/// The bookkeeper change being requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookkeeperPayload {
    /// Key whose bookkeeper status changes
    pub target_key: PublicKey,
    /// Grant or revoke
    pub action: BookkeeperAction,
    /// Opaque certificate, empty when absent
    pub certificate: Vec<u8>,
    /// Identity asserting the change
    pub issuer_key: PublicKey,
}

impl BookkeeperPayload {
    pub fn new(
        target_key: PublicKey,
        action: BookkeeperAction,
        certificate: impl Into<Vec<u8>>,
        issuer_key: PublicKey,
    ) -> Self {
        Self {
            target_key,
            action,
            certificate: certificate.into(),
            issuer_key,
        }
    }

    /// The boolean operation flag (`true` = grant).
    pub fn operation(&self) -> bool {
        self.action.operation()
    }

    fn serialize_into<W: Write>(&self, w: &mut W) -> SdkResult<()> {
        write_var_bytes(w, &self.target_key.encode_point())?;
        write_u8(w, self.action as u8)?;
        write_var_bytes(w, &self.certificate)?;
        write_var_bytes(w, &self.issuer_key.encode_point())
    }

    fn read(reader: &mut Reader<'_>) -> SdkResult<Self> {
        let target_key = PublicKey::decode_point(reader.read_var_bytes()?)?;
        let action = BookkeeperAction::try_from(reader.read_u8()?)?;
        let certificate = reader.read_var_bytes()?.to_vec();
        let issuer_key = PublicKey::decode_point(reader.read_var_bytes()?)?;
        Ok(Self {
            target_key,
            action,
            certificate,
            issuer_key,
        })
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// A labelled transaction attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxAttribute {
    pub usage: AttributeUsage,
    pub data: Vec<u8>,
}

impl TxAttribute {
    pub fn new(usage: AttributeUsage, data: impl Into<Vec<u8>>) -> Self {
        Self {
            usage,
            data: data.into(),
        }
    }

    /// Nonce attribute carrying `value` as decimal ASCII.
    pub fn nonce(value: i64) -> Self {
        Self::new(AttributeUsage::Nonce, value.to_string().into_bytes())
    }

    fn serialize_into<W: Write>(&self, w: &mut W) -> SdkResult<()> {
        write_u8(w, self.usage as u8)?;
        write_var_bytes(w, &self.data)
    }

    fn read(reader: &mut Reader<'_>) -> SdkResult<Self> {
        let usage = AttributeUsage::try_from(reader.read_u8()?)?;
        let data = reader.read_var_bytes()?.to_vec();
        Ok(Self { usage, data })
    }
}

fn serialize_unsigned_into<W: Write>(
    w: &mut W,
    payload: &BookkeeperPayload,
    attributes: &[TxAttribute],
) -> SdkResult<()> {
    write_u8(w, BOOKKEEPER_TX_TYPE)?;
    write_u8(w, PAYLOAD_VERSION)?;
    payload.serialize_into(w)?;
    write_varint(w, attributes.len() as u64)?;
    for attribute in attributes {
        attribute.serialize_into(w)?;
    }
    Ok(())
}

fn double_sha256(data: &[u8]) -> [u8; HASH_SIZE] {
    Sha256::digest(Sha256::digest(data)).into()
}

// ============================================================================
// Unsigned Record
// ============================================================================

/// A built record awaiting authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedRecord {
    payload: BookkeeperPayload,
    attributes: Vec<TxAttribute>,
}

impl UnsignedRecord {
    /// Build a record with a fresh nonce attribute.
    pub fn new(payload: BookkeeperPayload, mut nonces: impl NonceSource) -> Self {
        let nonce = nonces.next_nonce();
        tracing::debug!(
            action = %payload.action,
            target = %payload.target_key,
            nonce,
            "Built bookkeeper record"
        );
        Self {
            payload,
            attributes: vec![TxAttribute::nonce(nonce)],
        }
    }

    pub fn payload(&self) -> &BookkeeperPayload {
        &self.payload
    }

    pub fn attributes(&self) -> &[TxAttribute] {
        &self.attributes
    }

    /// Canonical bytes covered by the signature.
    pub fn signing_bytes(&self) -> SdkResult<Vec<u8>> {
        let mut buf = Vec::new();
        serialize_unsigned_into(&mut buf, &self.payload, &self.attributes)?;
        Ok(buf)
    }

    /// Double SHA-256 of the signing bytes.
    pub fn hash(&self) -> SdkResult<[u8; HASH_SIZE]> {
        Ok(double_sha256(&self.signing_bytes()?))
    }

    /// Attach authorization programs, producing the signed record.
    ///
    /// The payload and attributes move into the signed record unchanged.
    pub(crate) fn into_signed(self, programs: Vec<Program>) -> SdkResult<SignedRecord> {
        if programs.is_empty() {
            return Err(SdkError::MissingPrograms);
        }
        Ok(SignedRecord {
            payload: self.payload,
            attributes: self.attributes,
            programs,
        })
    }
}

/// Build an unsigned record from the raw action fields.
///
/// `operation` is `true` to grant bookkeeper status and `false` to revoke it.
pub fn build(
    target_key: PublicKey,
    operation: bool,
    certificate: impl Into<Vec<u8>>,
    issuer_key: PublicKey,
    nonces: impl NonceSource,
) -> UnsignedRecord {
    let payload = BookkeeperPayload::new(
        target_key,
        BookkeeperAction::from_operation(operation),
        certificate,
        issuer_key,
    );
    UnsignedRecord::new(payload, nonces)
}

// ============================================================================
// Signed Record
// ============================================================================

/// An authorized record, ready for serialization and submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRecord {
    payload: BookkeeperPayload,
    attributes: Vec<TxAttribute>,
    programs: Vec<Program>,
}

impl SignedRecord {
    pub fn payload(&self) -> &BookkeeperPayload {
        &self.payload
    }

    pub fn attributes(&self) -> &[TxAttribute] {
        &self.attributes
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Canonical bytes covered by the signatures.
    pub fn signing_bytes(&self) -> SdkResult<Vec<u8>> {
        let mut buf = Vec::new();
        serialize_unsigned_into(&mut buf, &self.payload, &self.attributes)?;
        Ok(buf)
    }

    /// Record identifier: double SHA-256 of the signing bytes.
    pub fn hash(&self) -> SdkResult<[u8; HASH_SIZE]> {
        Ok(double_sha256(&self.signing_bytes()?))
    }

    /// Record identifier as a hex string.
    pub fn hash_hex(&self) -> SdkResult<String> {
        Ok(hex::encode(self.hash()?))
    }

    /// Write the full signed encoding.
    pub fn serialize_into<W: Write>(&self, w: &mut W) -> SdkResult<()> {
        serialize_unsigned_into(w, &self.payload, &self.attributes)?;
        write_varint(w, self.programs.len() as u64)?;
        for program in &self.programs {
            write_var_bytes(w, program.code())?;
            write_var_bytes(w, program.parameter())?;
        }
        Ok(())
    }

    /// Serialize to bytes.
    pub fn to_bytes(&self) -> SdkResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf)?;
        Ok(buf)
    }

    /// Serialize and hex-encode for the `sendrawtransaction` call.
    pub fn to_hex(&self) -> SdkResult<String> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Deserialize from bytes.
    pub fn from_bytes(data: &[u8]) -> SdkResult<Self> {
        let mut reader = Reader::new(data);

        let tx_type = reader.read_u8()?;
        if tx_type != BOOKKEEPER_TX_TYPE {
            return Err(SdkError::InvalidTransactionType(tx_type));
        }
        let version = reader.read_u8()?;
        if version != PAYLOAD_VERSION {
            return Err(SdkError::InvalidPayloadVersion(version));
        }

        let payload = BookkeeperPayload::read(&mut reader)?;

        let attribute_count = reader.read_varint()?;
        let mut attributes = Vec::new();
        for _ in 0..attribute_count {
            attributes.push(TxAttribute::read(&mut reader)?);
        }

        let program_count = reader.read_varint()?;
        let mut programs = Vec::new();
        for _ in 0..program_count {
            let code = reader.read_var_bytes()?.to_vec();
            let parameter = reader.read_var_bytes()?.to_vec();
            programs.push(Program::new(code, parameter));
        }
        reader.finish()?;

        if programs.is_empty() {
            return Err(SdkError::MissingPrograms);
        }

        Ok(Self {
            payload,
            attributes,
            programs,
        })
    }

    /// Decode a hex transport string.
    pub fn from_hex(value: &str) -> SdkResult<Self> {
        let bytes = hex::decode(value.trim())
            .map_err(|e| SdkError::Serialization(format!("not valid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Nonce attributes carried by this record.
    pub fn nonces(&self) -> impl Iterator<Item = &TxAttribute> {
        self.attributes
            .iter()
            .filter(|a| a.usage == AttributeUsage::Nonce)
    }

    /// Verify every program: script shape, key binding, and signature over
    /// the signing bytes. One program must be bound to the payload's issuer.
    pub fn verify(&self) -> SdkResult<()> {
        let message = self.signing_bytes()?;
        let mut issuer_signed = false;
        for program in &self.programs {
            let contract = Contract::from_code(program.code())?;
            contract.verify(&message, &program.signature()?)?;
            issuer_signed |= contract.public_key() == &self.payload.issuer_key;
        }
        if !issuer_signed {
            return Err(SdkError::MissingIssuerSignature {
                issuer: self.payload.issuer_key.to_hex(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::contract::create_signature_contract;
    use crate::program::signer::{Account, Identity};

    struct FixedNonces(Vec<i64>);

    impl NonceSource for FixedNonces {
        fn next_nonce(&mut self) -> i64 {
            self.0.remove(0)
        }
    }

    fn account(seed: u8) -> Account {
        Account::from_private_key_bytes(&[seed; 32]).unwrap()
    }

    fn unsigned(nonce: i64) -> UnsignedRecord {
        build(
            account(1).public_key(),
            true,
            b"cert".to_vec(),
            account(2).public_key(),
            FixedNonces(vec![nonce]),
        )
    }

    fn signed_by(record: UnsignedRecord, signer: &Account) -> SignedRecord {
        let signature = signer.sign(&record.signing_bytes().unwrap()).unwrap();
        let contract = create_signature_contract(&signer.public_key()).unwrap();
        let program = contract.program(&signature);
        record.into_signed(vec![program]).unwrap()
    }

    #[test]
    fn test_build_attaches_single_nonce() {
        let record = unsigned(12345);
        assert_eq!(record.attributes().len(), 1);
        assert_eq!(record.attributes()[0].usage, AttributeUsage::Nonce);
        assert_eq!(record.attributes()[0].data, b"12345".to_vec());
    }

    #[test]
    fn test_nonce_encoded_as_decimal() {
        assert_eq!(TxAttribute::nonce(i64::MAX).data, b"9223372036854775807".to_vec());
        assert_eq!(TxAttribute::nonce(0).data, b"0".to_vec());
    }

    #[test]
    fn test_signing_bytes_layout() {
        let record = unsigned(7);
        let bytes = record.signing_bytes().unwrap();

        assert_eq!(bytes[0], BOOKKEEPER_TX_TYPE);
        assert_eq!(bytes[1], PAYLOAD_VERSION);
        assert_eq!(bytes[2], 33);
        assert_eq!(&bytes[3..36], &account(1).public_key().encode_point());
        assert_eq!(bytes[36], 0x00); // add
        assert_eq!(&bytes[37..42], &[4, b'c', b'e', b'r', b't']);
        assert_eq!(bytes[42], 33);
        assert_eq!(&bytes[43..76], &account(2).public_key().encode_point());
        assert_eq!(&bytes[76..], &[1, 0x00, 1, b'7']);
    }

    #[test]
    fn test_signed_serialization_roundtrip() {
        let signer = account(2);
        let signed = signed_by(unsigned(99), &signer);

        let decoded = SignedRecord::from_hex(&signed.to_hex().unwrap()).unwrap();
        assert_eq!(decoded, signed);
        assert!(decoded.verify().is_ok());
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let signed = signed_by(unsigned(5), &account(2));
        assert_eq!(signed.to_bytes().unwrap(), signed.to_bytes().unwrap());
        assert_eq!(signed.hash().unwrap(), signed.hash().unwrap());
    }

    #[test]
    fn test_hash_matches_unsigned_hash() {
        let record = unsigned(5);
        let unsigned_hash = record.hash().unwrap();
        let signed = signed_by(record, &account(2));
        assert_eq!(signed.hash().unwrap(), unsigned_hash);
        assert_eq!(signed.hash_hex().unwrap().len(), 64);
    }

    #[test]
    fn test_into_signed_rejects_empty_programs() {
        assert!(matches!(
            unsigned(1).into_signed(Vec::new()),
            Err(SdkError::MissingPrograms)
        ));
    }

    #[test]
    fn test_from_bytes_rejects_wrong_type() {
        let mut bytes = signed_by(unsigned(1), &account(2)).to_bytes().unwrap();
        bytes[0] = 0x80;
        assert!(matches!(
            SignedRecord::from_bytes(&bytes),
            Err(SdkError::InvalidTransactionType(0x80))
        ));
    }

    #[test]
    fn test_from_bytes_rejects_trailing_data() {
        let mut bytes = signed_by(unsigned(1), &account(2)).to_bytes().unwrap();
        bytes.push(0);
        assert!(matches!(
            SignedRecord::from_bytes(&bytes),
            Err(SdkError::InvalidDataLength { .. })
        ));
    }

    #[test]
    fn test_from_bytes_rejects_unsigned_encoding() {
        let record = unsigned(1);
        let mut bytes = record.signing_bytes().unwrap();
        bytes.push(0); // zero programs
        assert!(matches!(
            SignedRecord::from_bytes(&bytes),
            Err(SdkError::MissingPrograms)
        ));
    }

    #[test]
    fn test_verify_detects_tampered_payload() {
        let signed = signed_by(unsigned(1), &account(2));
        let mut bytes = signed.to_bytes().unwrap();
        // flip the action byte: add -> sub
        bytes[36] = 0x01;
        let tampered = SignedRecord::from_bytes(&bytes).unwrap();
        assert!(matches!(
            tampered.verify(),
            Err(SdkError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_verify_requires_issuer_program() {
        // Valid signature, but by a key other than the payload's issuer
        let signed = signed_by(unsigned(1), &account(3));
        assert!(matches!(
            signed.verify(),
            Err(SdkError::MissingIssuerSignature { issuer }) if issuer == account(2).public_key().to_hex()
        ));
    }

    #[test]
    fn test_serialize_into_failing_writer() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let signed = signed_by(unsigned(1), &account(2));
        assert!(matches!(
            signed.serialize_into(&mut Broken),
            Err(SdkError::Serialization(_))
        ));
    }
}
