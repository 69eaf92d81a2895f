//! Wire formats shared between a watch app and its paired counterpart
//!
//! Messages exchanged with the phone (or another watch) are dictionaries:
//! an ordered list of key-tagged, typed values.
//!
//! # Dictionary layout
//!
//! ```text
//! ┌───────┬──────────────────────────────────────────────┐
//! │ COUNT │ TUPLE × COUNT                                │
//! │ 1B    │ ┌────────┬──────┬────────┬─────────────────┐ │
//! │       │ │ KEY 4B │ TYPE │ LEN 2B │ VALUE (LEN B)   │ │
//! │       │ └────────┴──────┴────────┴─────────────────┘ │
//! └───────┴──────────────────────────────────────────────┘
//! ```
//!
//! All multi-byte fields are little-endian.
//!
//! The crate also carries the result codes reported by the host's message
//! service and the fixed-size metadata header that identifies an app binary.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod dictionary;
pub mod metadata;
pub mod result;
pub mod tuple;

pub use dictionary::{DictError, Dictionary, DictionaryWriter, Tuples};
pub use metadata::{AppMetadata, MetadataError, METADATA_SIZE};
pub use result::AppMessageError;
pub use tuple::{Tuple, TupleType, TupleValue, Tuplet};
