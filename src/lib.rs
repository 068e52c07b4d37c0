//! `protodyn` is a runtime reflection library for Protocol Buffers (proto3).
//!
//! It represents message schemas as plain data ([`DescriptorPool`], [`MessageDescriptor`],
//! [`FieldDescriptor`], ...) built up at runtime rather than generated at compile time from
//! `.proto` sources. Given a descriptor, [`DynamicMessage`] stores and mutates field values by
//! name or number, and can be translated to and from the two canonical proto3 encodings: the
//! binary wire format (via [`prost::Message`]) and the
//! [canonical JSON mapping](https://protobuf.dev/programming-guides/proto3/#json) (behind the
//! `serde` feature).
//!
//! # Example - building a pool and decoding
//!
//! ```ignore
//! use protodyn::{DescriptorPool, DynamicMessage};
//!
//! let pool = DescriptorPool::decode(include_bytes!("../file_descriptor_set.bin").as_ref())
//!     .unwrap();
//! let message_descriptor = pool.get_message_by_name("package.MyMessage").unwrap();
//!
//! let dynamic_message = DynamicMessage::decode(message_descriptor, b"\x08\x96\x01".as_ref())
//!     .unwrap();
//!
//! assert_eq!(dynamic_message.get_field_by_name("foo").unwrap().as_i32(), Some(150));
//! ```
//!
//! # Example - JSON mapping
//!
//! With the `serde` feature enabled, any [`DynamicMessage`] implements [`serde::Serialize`], and
//! a [`MessageDescriptor`] can be used as a [`serde::de::DeserializeSeed`] to parse one:
//!
//! ```ignore
//! let json = serde_json::to_string(&dynamic_message).unwrap();
//! let dynamic_message = message_descriptor.deserialize(&mut serde_json::Deserializer::from_str(&json)).unwrap();
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_debug_implementations, missing_docs)]
#![deny(unsafe_code)]

#[cfg(feature = "serde1")]
extern crate serde1 as serde;

mod descriptor;
mod dynamic;
mod reflect;

pub use {prost, prost::bytes, prost_types};

pub use self::descriptor::{
    Cardinality, DescriptorError, DescriptorPool, EnumDescriptor, EnumValueDescriptor,
    ExtensionDescriptor, FieldDescriptor, FileDescriptor, Kind, MessageDescriptor,
    MethodDescriptor, OneofDescriptor, ServiceDescriptor, Syntax,
};
pub use self::dynamic::{DecodeOptions, DynamicMessage, MapKey, SetFieldError, UnknownField, Value};
pub use self::reflect::ReflectMessage;

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub use self::dynamic::{DeserializeOptions, SerializeOptions};
