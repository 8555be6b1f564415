//! Persistence collaborator traits and in-memory implementations.
//!
//! The bridge only needs per-row CRUD with key uniqueness; anything beyond
//! that (transactions, cross-row locking) is explicitly not promised here.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use bridge_core::{ForeignLink, ForeignUser, LocalUser};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// CRUD over bridge-link records, keyed by `(user_id, service)`.
pub trait LinkStore: Send + Sync {
    fn link_for_user(&self, user_id: u64, service: u32) -> Result<Option<ForeignLink>, StoreError>;

    /// Insert or replace the link for the record's `(user_id, service)` key.
    fn upsert_link(&self, link: &ForeignLink) -> Result<(), StoreError>;

    fn delete_link(&self, user_id: u64, service: u32) -> Result<(), StoreError>;
}

/// CRUD over cached remote-identity records, keyed by `(remote_id, service)`.
pub trait RemoteUserStore: Send + Sync {
    fn remote_user(
        &self,
        remote_id: u64,
        service: u32,
    ) -> Result<Option<ForeignUser>, StoreError>;

    fn remote_user_by_uri(
        &self,
        uri: &str,
        service: u32,
    ) -> Result<Option<ForeignUser>, StoreError>;

    /// Insert a fresh record; replaces any row sharing the key.
    fn insert_remote_user(&self, user: &ForeignUser) -> Result<(), StoreError>;

    fn delete_remote_user(&self, remote_id: u64, service: u32) -> Result<(), StoreError>;
}

/// Read access to local account records.
pub trait UserDirectory: Send + Sync {
    fn user(&self, user_id: u64) -> Result<Option<LocalUser>, StoreError>;
}

#[derive(Clone, Default)]
pub struct InMemoryLinkStore {
    data: Arc<RwLock<HashMap<(u64, u32), ForeignLink>>>,
}

impl LinkStore for InMemoryLinkStore {
    fn link_for_user(&self, user_id: u64, service: u32) -> Result<Option<ForeignLink>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::Backend("poisoned lock".to_owned()))?;
        Ok(data.get(&(user_id, service)).cloned())
    }

    fn upsert_link(&self, link: &ForeignLink) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::Backend("poisoned lock".to_owned()))?;
        data.insert((link.user_id, link.service), link.clone());
        Ok(())
    }

    fn delete_link(&self, user_id: u64, service: u32) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::Backend("poisoned lock".to_owned()))?;
        if data.remove(&(user_id, service)).is_none() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryRemoteUserStore {
    data: Arc<RwLock<HashMap<(u64, u32), ForeignUser>>>,
}

impl RemoteUserStore for InMemoryRemoteUserStore {
    fn remote_user(
        &self,
        remote_id: u64,
        service: u32,
    ) -> Result<Option<ForeignUser>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::Backend("poisoned lock".to_owned()))?;
        Ok(data.get(&(remote_id, service)).cloned())
    }

    fn remote_user_by_uri(
        &self,
        uri: &str,
        service: u32,
    ) -> Result<Option<ForeignUser>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::Backend("poisoned lock".to_owned()))?;
        Ok(data
            .values()
            .find(|user| user.service == service && user.uri == uri)
            .cloned())
    }

    fn insert_remote_user(&self, user: &ForeignUser) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::Backend("poisoned lock".to_owned()))?;
        data.insert((user.remote_id, user.service), user.clone());
        Ok(())
    }

    fn delete_remote_user(&self, remote_id: u64, service: u32) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::Backend("poisoned lock".to_owned()))?;
        if data.remove(&(remote_id, service)).is_none() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    data: Arc<RwLock<HashMap<u64, LocalUser>>>,
}

impl InMemoryUserDirectory {
    pub fn insert(&self, user: LocalUser) -> Result<(), StoreError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| StoreError::Backend("poisoned lock".to_owned()))?;
        data.insert(user.id, user);
        Ok(())
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn user(&self, user_id: u64) -> Result<Option<LocalUser>, StoreError> {
        let data = self
            .data
            .read()
            .map_err(|_| StoreError::Backend("poisoned lock".to_owned()))?;
        Ok(data.get(&user_id).cloned())
    }
}
