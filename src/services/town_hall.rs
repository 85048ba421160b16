//! In-memory Town Hall session store
//!
//! Sessions are not persisted and are lost on restart.

use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::utils::serde::checksum_address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Live,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownHallSession {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "checksum_address")]
    pub dao_address: Address,
    #[serde(with = "checksum_address")]
    pub creator: Address,
    #[serde(with = "checksum_address")]
    pub presenter: Address,
    pub status: SessionStatus,
    /// Unix milliseconds
    pub start_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub title: String,
    pub description: String,
    pub dao_address: Address,
    pub creator: Address,
    pub presenter: Address,
    pub start_time: i64,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Session has ended")]
    Ended,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, TownHallSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, new: NewSession) -> TownHallSession {
        let session = TownHallSession {
            id: uuid::Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            dao_address: new.dao_address,
            creator: new.creator,
            presenter: new.presenter,
            status: SessionStatus::Scheduled,
            start_time: new.start_time,
            end_time: None,
        };

        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());

        log::info!("Created Town Hall session {} for DAO {:?}", session.id, session.dao_address);
        session
    }

    pub async fn get(&self, id: &str) -> Result<TownHallSession, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(SessionError::NotFound)
    }

    /// Sessions for a DAO ordered by start time
    pub async fn list_for_dao(&self, dao_address: Address) -> Vec<TownHallSession> {
        let mut sessions: Vec<TownHallSession> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.dao_address == dao_address)
            .cloned()
            .collect();

        sessions.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        sessions
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn start(&self, id: &str) -> Result<TownHallSession, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(SessionError::NotFound)?;

        if session.status == SessionStatus::Ended {
            return Err(SessionError::Ended);
        }

        session.status = SessionStatus::Live;
        Ok(session.clone())
    }

    /// Mark a session ended. Ending twice keeps the first end time.
    pub async fn end(&self, id: &str, now_ms: i64) -> Result<TownHallSession, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id).ok_or(SessionError::NotFound)?;

        if session.status != SessionStatus::Ended {
            session.status = SessionStatus::Ended;
            session.end_time = Some(now_ms);
        }

        Ok(session.clone())
    }
}
