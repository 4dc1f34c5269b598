//! Typed views over serialized objects: transactions, ledger entries,
//! metadata, validations, proposals and ledger headers.

pub mod format;
pub mod ledger;
pub mod ledger_entry;
pub mod metadata;
pub mod proposal;
pub mod result;
pub mod transaction;
pub mod validation;

pub use ledger::LedgerHeader;
pub use ledger_entry::{LedgerEntry, LedgerEntryType};
pub use metadata::{AffectedNode, NodeEffect, TransactionMeta, TransactionWithMetaData};
pub use proposal::Proposal;
pub use result::TransactionResult;
pub use transaction::{Transaction, TransactionType};
pub use validation::Validation;

use crate::codec::{self, fields};
use crate::errors::CoreError;
use tracing::debug;

/// A decoded object, typed by its first field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Transaction(Transaction),
    LedgerEntry(LedgerEntry),
}

/// Decodes canonical bytes into a transaction or a ledger entry, depending
/// on whether the first field is `TransactionType` or `LedgerEntryType`.
pub fn decode(bytes: &[u8]) -> Result<Decoded, CoreError> {
    let object = codec::decode(bytes)?;
    match object.first_field().map(|(field, _)| *field) {
        Some(fields::LEDGER_ENTRY_TYPE) => {
            let entry = LedgerEntry::from_object(object)?;
            debug!("Decoded ledger entry {}", entry.entry_type());
            Ok(Decoded::LedgerEntry(entry))
        }
        Some(fields::TRANSACTION_TYPE) => {
            let tx = Transaction::from_object(object)?;
            debug!("Decoded transaction {}", tx.transaction_type());
            Ok(Decoded::Transaction(tx))
        }
        Some(other) => Err(CoreError::UnexpectedFieldType(format!(
            "cannot type an object starting with {}",
            other
        ))),
        None => Err(CoreError::UnexpectedFieldType("empty object".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::amount::Amount;
    use crate::hash::Hash256;
    use crate::st::{StObject, StValue};

    #[test]
    fn test_dispatch_by_first_field() {
        let tx = Transaction::new(
            TransactionType::OfferCancel,
            Account([1; 20]),
            4,
            Amount::from_drops(10).unwrap(),
        )
        .unwrap();
        assert_eq!(
            decode(&tx.to_bytes().unwrap()).unwrap(),
            Decoded::Transaction(tx)
        );

        let entry = LedgerEntry::new(LedgerEntryType::Ticket, Hash256::zero()).unwrap();
        assert_eq!(
            decode(&entry.to_bytes().unwrap()).unwrap(),
            Decoded::LedgerEntry(entry)
        );
    }

    #[test]
    fn test_unsupported_codes() {
        let object = StObject::new()
            .with(fields::TRANSACTION_TYPE, StValue::UInt16(6))
            .unwrap();
        assert_eq!(
            decode(&codec::encode(&object).unwrap()),
            Err(CoreError::UnsupportedTransactionType(6))
        );
        let object = StObject::new()
            .with(fields::LEDGER_ENTRY_TYPE, StValue::UInt16(0x7A))
            .unwrap();
        assert_eq!(
            decode(&codec::encode(&object).unwrap()),
            Err(CoreError::UnsupportedLedgerEntryType(0x7A))
        );
        let object = StObject::new().with(fields::FLAGS, StValue::UInt32(0)).unwrap();
        assert!(decode(&codec::encode(&object).unwrap()).is_err());
    }
}
