// src/core/storage/mod.rs

pub mod stores;
pub mod stream;

pub use stores::{Db, ListStore, PopDirection, PushDirection, StreamStore, StringStore};
