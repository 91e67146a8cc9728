//! Record authorization.
//!
//! Signs an [`UnsignedRecord`] and attaches the resulting single-signature
//! program. Signing and contract construction fail independently so the
//! cause of a failure is always attributable.

use crate::program::contract::{create_signature_contract, AuthorizationContext};
use crate::program::error::{SdkError, SdkResult};
use crate::program::signer::Identity;
use crate::program::transaction::{SignedRecord, UnsignedRecord};

/// Sign `record` with `signer` and attach the authorization program.
///
/// The signer must be the record's issuer. A fresh [`AuthorizationContext`]
/// is used for every call. The first failure aborts the call and no record
/// is returned.
pub fn authorize<I: Identity + ?Sized>(record: UnsignedRecord, signer: &I) -> SdkResult<SignedRecord> {
    let public_key = signer.public_key();
    if public_key != record.payload().issuer_key {
        return Err(SdkError::InvalidInput(format!(
            "signer {} is not the record issuer {}",
            public_key,
            record.payload().issuer_key
        )));
    }

    let message = record.signing_bytes()?;
    let signature = signer.sign(&message)?;
    let contract = create_signature_contract(&public_key)?;

    let mut context = AuthorizationContext::new(message);
    context.add_contract(&contract, &public_key, &signature)?;

    tracing::debug!(
        record = %hex::encode(record.hash()?),
        signer = %public_key,
        programs = context.len(),
        "Authorized bookkeeper record"
    );

    record.into_signed(context.into_programs())
}

impl UnsignedRecord {
    /// Sign and attach the authorization program. See [`authorize`].
    pub fn authorize<I: Identity + ?Sized>(self, signer: &I) -> SdkResult<SignedRecord> {
        authorize(self, signer)
    }
}
