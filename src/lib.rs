#![doc = include_str!("../README.md")]

mod error;
mod map;
mod raw;

#[cfg(feature = "serde")]
mod serde_impls;

pub use error::Error;
pub use map::{
    Dictionary, DictionaryBuilder, DictionaryRef, Iter, Keys, Values, DEFAULT_BUCKETS,
};
pub use raw::hash::{mmh64, HashFn};
