use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgConnection;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::Transaction;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to acquire a database session: {0}")]
    Acquire(String),
    #[error("failed to commit the session transaction: {0}")]
    Commit(String),
    #[error("failed to roll back the session transaction: {0}")]
    Rollback(String),
    #[error("session has already been released")]
    Released,
}

/// A request-scoped database session wrapping one transaction.
///
/// The session middleware acquires one per request, hands it to the
/// handlers through request extensions, and settles it when the response
/// comes back: commit on success, rollback on error, release always.
#[derive(Debug)]
pub struct DbSession {
    inner: SessionInner,
}

#[derive(Debug)]
enum SessionInner {
    Postgres(Option<Transaction<'static, Postgres>>),
    #[cfg(test)]
    Probe(probe::ProbeState),
}

impl DbSession {
    fn postgres(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            inner: SessionInner::Postgres(Some(tx)),
        }
    }

    /// The connection underlying this session's transaction.
    pub fn conn(&mut self) -> Result<&mut PgConnection, SessionError> {
        match &mut self.inner {
            SessionInner::Postgres(Some(tx)) => Ok(&mut **tx),
            SessionInner::Postgres(None) => Err(SessionError::Released),
            #[cfg(test)]
            SessionInner::Probe(_) => unreachable!("probe sessions have no connection"),
        }
    }

    pub async fn commit(&mut self) -> Result<(), SessionError> {
        match &mut self.inner {
            SessionInner::Postgres(tx) => match tx.take() {
                Some(tx) => tx
                    .commit()
                    .await
                    .map_err(|e| SessionError::Commit(e.to_string())),
                None => Err(SessionError::Released),
            },
            #[cfg(test)]
            SessionInner::Probe(state) => state.commit(),
        }
    }

    pub async fn rollback(&mut self) -> Result<(), SessionError> {
        match &mut self.inner {
            SessionInner::Postgres(tx) => match tx.take() {
                Some(tx) => tx
                    .rollback()
                    .await
                    .map_err(|e| SessionError::Rollback(e.to_string())),
                None => Err(SessionError::Released),
            },
            #[cfg(test)]
            SessionInner::Probe(state) => state.rollback(),
        }
    }

    /// Give the underlying connection back. Idempotent; a transaction that
    /// was neither committed nor rolled back is rolled back on drop.
    pub async fn release(&mut self) {
        match &mut self.inner {
            SessionInner::Postgres(tx) => {
                if let Some(tx) = tx.take() {
                    if let Err(e) = tx.rollback().await {
                        tracing::warn!(error = %e, "rollback on release failed");
                    }
                }
            }
            #[cfg(test)]
            SessionInner::Probe(state) => state.release(),
        }
    }
}

/// A [`DbSession`] that can be cloned into request extensions and shared
/// between the middleware and the handlers running under it.
#[derive(Debug, Clone)]
pub struct SharedSession(Arc<Mutex<DbSession>>);

impl SharedSession {
    pub fn new(session: DbSession) -> Self {
        Self(Arc::new(Mutex::new(session)))
    }

    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, DbSession> {
        self.0.lock().await
    }
}

/// Source of fresh database sessions, one per request.
#[async_trait]
pub trait SessionFactory: Send + Sync + 'static {
    async fn acquire(&self) -> Result<DbSession, SessionError>;
}

/// Session factory backed by a Postgres connection pool; each acquired
/// session opens its own transaction.
#[derive(Debug, Clone)]
pub struct PgSessionFactory {
    pool: PgPool,
}

impl PgSessionFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionFactory for PgSessionFactory {
    async fn acquire(&self) -> Result<DbSession, SessionError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SessionError::Acquire(e.to_string()))?;

        Ok(DbSession::postgres(tx))
    }
}
