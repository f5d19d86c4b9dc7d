//! Keyed document store boundary

pub mod codec;
pub mod ports;

pub use codec::{decode_event, decode_profile, encode_event, encode_profile};
pub use ports::{CollectionCallback, Document, DocumentCallback, DocumentStore, SubscriptionHandle};
