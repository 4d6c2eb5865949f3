//! Recovery of protobuf message schemas from nanopb field descriptor
//! arrays embedded in compiled images.
//!
//! The decode is a one-way pipeline: raw bytes from a [`MemorySource`] →
//! ordered [`FieldInfo`] list ([`Decoder::decode_message`]) → grouped field
//! list ([`group_fields`]) for a downstream schema emitter. Configuration
//! (field width, pointer width, scalar code table) is fixed once per
//! session.

pub mod config;
pub mod consts;
pub mod decode;
pub mod errors;
pub mod group;
pub mod memory;
pub mod record;
pub mod scalar;

pub use config::{DecodeConfig, FieldWidth, PointerWidth};
pub use decode::Decoder;
pub use errors::{PbreconError, Result};
pub use group::{group_fields, ungroup, GroupedField, OneofGroup};
pub use memory::{MemoryImage, MemorySource};
pub use record::{ExtraValue, FieldInfo};
pub use scalar::{
    AllocationType, Nanopb_0_3_9_4, Nanopb_0_3_x, RepeatRule, ScalarCodec, ScalarType,
};
