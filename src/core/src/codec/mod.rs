//! The field codec: type and field dictionaries, binary encoding and
//! decoding, and the JSON form.

pub mod decoder;
pub mod encoder;
pub mod fields;
pub mod json;
pub mod types;

pub use decoder::{decode, Decoder};
pub use encoder::{encode, encode_for_signing, Encoder, FieldFilter};
pub use fields::FieldId;
pub use types::TypeCode;
