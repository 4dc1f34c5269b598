//! Transaction metadata and the transaction-with-metadata pairing stored in
//! transaction tries.

use crate::amount::Amount;
use crate::codec::decoder::Decoder;
use crate::codec::encoder::write_vl;
use crate::codec::fields::{self, FieldId};
use crate::codec::{self, json};
use crate::errors::CoreError;
use crate::hash::Hash256;
use crate::hashing::{HashPrefix, Hashable};
use crate::objects::ledger_entry::LedgerEntryType;
use crate::objects::result::TransactionResult;
use crate::objects::transaction::Transaction;
use crate::st::{StObject, StValue};

/// What happened to one ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEffect {
    pub ledger_entry_type: LedgerEntryType,
    pub ledger_index: Hash256,
    pub previous_txn_id: Option<Hash256>,
    pub previous_txn_lgr_seq: Option<u32>,
    /// Values of changed fields before the transaction
    pub previous_fields: Option<StObject>,
    /// Fields of a created entry
    pub new_fields: Option<StObject>,
    /// Fields of a modified or deleted entry after the transaction
    pub final_fields: Option<StObject>,
}

impl NodeEffect {
    /// An effect with no field sets.
    pub fn new(ledger_entry_type: LedgerEntryType, ledger_index: Hash256) -> Self {
        Self {
            ledger_entry_type,
            ledger_index,
            previous_txn_id: None,
            previous_txn_lgr_seq: None,
            previous_fields: None,
            new_fields: None,
            final_fields: None,
        }
    }

    fn to_object(&self) -> Result<StObject, CoreError> {
        let mut object = StObject::new()
            .with(
                fields::LEDGER_ENTRY_TYPE,
                StValue::UInt16(self.ledger_entry_type.code()),
            )?
            .with(fields::LEDGER_INDEX, StValue::Hash256(self.ledger_index))?;
        if let Some(id) = self.previous_txn_id {
            object.set(fields::PREVIOUS_TXN_ID, StValue::Hash256(id))?;
        }
        if let Some(seq) = self.previous_txn_lgr_seq {
            object.set(fields::PREVIOUS_TXN_LGR_SEQ, StValue::UInt32(seq))?;
        }
        for (field, set) in [
            (fields::PREVIOUS_FIELDS, &self.previous_fields),
            (fields::NEW_FIELDS, &self.new_fields),
            (fields::FINAL_FIELDS, &self.final_fields),
        ] {
            if let Some(set) = set {
                object.set(field, StValue::Object(set.clone()))?;
            }
        }
        Ok(object)
    }

    fn from_object(object: &StObject) -> Result<Self, CoreError> {
        let code = object
            .get_u16(fields::LEDGER_ENTRY_TYPE)
            .ok_or_else(|| missing(fields::LEDGER_ENTRY_TYPE, "AffectedNode"))?;
        let ledger_index = object
            .get_hash256(fields::LEDGER_INDEX)
            .ok_or_else(|| missing(fields::LEDGER_INDEX, "AffectedNode"))?;
        Ok(Self {
            ledger_entry_type: LedgerEntryType::from_code(code)?,
            ledger_index,
            previous_txn_id: object.get_hash256(fields::PREVIOUS_TXN_ID),
            previous_txn_lgr_seq: object.get_u32(fields::PREVIOUS_TXN_LGR_SEQ),
            previous_fields: object.get_object(fields::PREVIOUS_FIELDS).cloned(),
            new_fields: object.get_object(fields::NEW_FIELDS).cloned(),
            final_fields: object.get_object(fields::FINAL_FIELDS).cloned(),
        })
    }
}

/// One element of `AffectedNodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AffectedNode {
    Created(NodeEffect),
    Modified(NodeEffect),
    Deleted(NodeEffect),
}

impl AffectedNode {
    /// The wrapper field this variant is written under.
    pub fn wrapper(&self) -> FieldId {
        match self {
            AffectedNode::Created(_) => fields::CREATED_NODE,
            AffectedNode::Modified(_) => fields::MODIFIED_NODE,
            AffectedNode::Deleted(_) => fields::DELETED_NODE,
        }
    }

    pub fn effect(&self) -> &NodeEffect {
        match self {
            AffectedNode::Created(effect)
            | AffectedNode::Modified(effect)
            | AffectedNode::Deleted(effect) => effect,
        }
    }

    fn from_wrapped(wrapper: FieldId, object: &StObject) -> Result<Self, CoreError> {
        let effect = NodeEffect::from_object(object)?;
        match wrapper {
            fields::CREATED_NODE => Ok(AffectedNode::Created(effect)),
            fields::MODIFIED_NODE => Ok(AffectedNode::Modified(effect)),
            fields::DELETED_NODE => Ok(AffectedNode::Deleted(effect)),
            other => Err(CoreError::UnexpectedFieldType(format!(
                "{} inside AffectedNodes",
                other
            ))),
        }
    }
}

fn missing(field: FieldId, object: &str) -> CoreError {
    CoreError::MissingField {
        field: field.name(),
        object: object.to_string(),
    }
}

/// The outcome of applying a transaction to a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionMeta {
    /// Position of the transaction within its ledger
    pub transaction_index: u32,
    pub transaction_result: TransactionResult,
    /// Entries touched, in application order
    pub affected_nodes: Vec<AffectedNode>,
    /// What a payment actually delivered, when that differs from its `Amount`
    pub delivered_amount: Option<Amount>,
}

impl TransactionMeta {
    /// Metadata with no affected nodes.
    pub fn new(transaction_index: u32, transaction_result: TransactionResult) -> Self {
        Self {
            transaction_index,
            transaction_result,
            affected_nodes: Vec::new(),
            delivered_amount: None,
        }
    }

    /// The generic object form.
    pub fn to_object(&self) -> Result<StObject, CoreError> {
        let nodes = self
            .affected_nodes
            .iter()
            .map(|node| Ok((node.wrapper(), node.effect().to_object()?)))
            .collect::<Result<Vec<_>, CoreError>>()?;
        let mut object = StObject::new()
            .with(
                fields::TRANSACTION_INDEX,
                StValue::UInt32(self.transaction_index),
            )?
            .with(fields::AFFECTED_NODES, StValue::Array(nodes))?
            .with(
                fields::TRANSACTION_RESULT,
                StValue::UInt8(self.transaction_result.0),
            )?;
        if let Some(amount) = &self.delivered_amount {
            object.set(fields::DELIVERED_AMOUNT, StValue::Amount(*amount))?;
        }
        Ok(object)
    }

    /// Reads the generic object form.
    pub fn from_object(object: &StObject) -> Result<Self, CoreError> {
        let transaction_index = object
            .get_u32(fields::TRANSACTION_INDEX)
            .ok_or_else(|| missing(fields::TRANSACTION_INDEX, "TransactionMetaData"))?;
        let result = object
            .get_u8(fields::TRANSACTION_RESULT)
            .ok_or_else(|| missing(fields::TRANSACTION_RESULT, "TransactionMetaData"))?;
        let affected_nodes = object
            .get_array(fields::AFFECTED_NODES)
            .ok_or_else(|| missing(fields::AFFECTED_NODES, "TransactionMetaData"))?
            .iter()
            .map(|(wrapper, node)| AffectedNode::from_wrapped(*wrapper, node))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            transaction_index,
            transaction_result: TransactionResult(result),
            affected_nodes,
            delivered_amount: object.get_amount(fields::DELIVERED_AMOUNT),
        })
    }

    /// Canonical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        codec::encode(&self.to_object()?)
    }

    /// Decodes canonical bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        Self::from_object(&codec::decode(bytes)?)
    }

    /// The JSON form.
    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        Ok(json::to_json(&self.to_object()?))
    }

    /// Parses the JSON form.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CoreError> {
        Self::from_object(&json::from_json(value)?)
    }
}

/// A transaction paired with its metadata: a transaction trie leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionWithMetaData {
    pub transaction: Transaction,
    pub meta: TransactionMeta,
}

impl TransactionWithMetaData {
    pub fn new(transaction: Transaction, meta: TransactionMeta) -> Self {
        Self { transaction, meta }
    }

    /// `VL(transaction) ∥ VL(metadata)`: the leaf data, without the id.
    pub fn leaf_data(&self) -> Result<Vec<u8>, CoreError> {
        let mut out = Vec::new();
        write_vl(&mut out, &self.transaction.to_bytes()?)?;
        write_vl(&mut out, &self.meta.to_bytes()?)?;
        Ok(out)
    }

    /// `VL(transaction) ∥ VL(metadata) ∥ transaction id`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let mut out = self.leaf_data()?;
        out.extend_from_slice(self.transaction.id()?.as_bytes());
        Ok(out)
    }

    /// Decodes [`TransactionWithMetaData::to_bytes`] output, checking the
    /// trailing id against the transaction.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let mut decoder = Decoder::new(bytes);
        let transaction = Transaction::from_bytes(decoder.read_vl()?)?;
        let meta = TransactionMeta::from_bytes(decoder.read_vl()?)?;
        let id = decoder.read_hash256()?;
        if !decoder.is_empty() {
            return Err(CoreError::UnexpectedFieldType(format!(
                "{} trailing bytes after transaction id",
                decoder.remaining()
            )));
        }
        if transaction.id()? != id {
            return Err(CoreError::UnexpectedFieldType(format!(
                "transaction id {} does not match its body",
                id
            )));
        }
        Ok(Self { transaction, meta })
    }
}

impl Hashable for TransactionWithMetaData {
    fn prefix(&self) -> HashPrefix {
        HashPrefix::TxNode
    }

    fn hash_body(&self) -> Result<Vec<u8>, CoreError> {
        self.to_bytes()
    }
}
