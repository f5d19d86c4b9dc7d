//! Blob storage adapters

mod local_blob_store;

pub use local_blob_store::LocalBlobStore;
