//! Stateless transaction validation: signature recovery against the sender.

use crate::canonical::payload_digest;
use crate::error::ValidationError;
use crate::signer::Verifier;
use crate::transaction::Transaction;
use crate::types::Address;

/// Check that `tx` was signed by the account it names as `from`.
///
/// The digest is recomputed from the payload; whatever digest the submitter
/// may have used is never trusted. Returns the recovered address on success.
pub fn verify_transaction_signature<V: Verifier + ?Sized>(
    tx: &Transaction,
    verifier: &V,
) -> Result<Address, ValidationError> {
    let digest = payload_digest(&tx.payload);
    let recovered = verifier.recover(&tx.signature, &digest)?;

    if recovered != tx.payload.from {
        return Err(ValidationError::SignatureMismatch {
            expected: tx.payload.from,
            recovered,
        });
    }

    Ok(recovered)
}
