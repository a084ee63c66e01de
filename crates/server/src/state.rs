//! Shared application state

use ayur_core::intake::{IntakeError, IntakeSession, IntakeStep};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::ai::DietPlanGenerator;
use crate::config::Environment;
use crate::db::PatientRepository;

/// Idle time after which an unfinished intake is discarded
pub const INTAKE_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
pub const MAX_INTAKE_SESSIONS: usize = 10_000;

#[derive(Clone)]
pub struct AppState {
    pub repo: PatientRepository,
    pub generator: Arc<DietPlanGenerator>,
    pub intake: IntakeSessions,
    pub environment: Environment,
}

struct IntakeEntry {
    session: IntakeSession,
    last_active: Instant,
}

/// In-flight intake sessions, expired after `ttl` of inactivity and capped
/// at `capacity` entries (oldest idle session evicted first)
#[derive(Clone)]
pub struct IntakeSessions {
    entries: Arc<RwLock<HashMap<Uuid, IntakeEntry>>>,
    ttl: Duration,
    capacity: usize,
}

impl Default for IntakeSessions {
    fn default() -> Self {
        Self::new(INTAKE_SESSION_TTL, MAX_INTAKE_SESSIONS)
    }
}

impl IntakeSessions {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Store a fresh session, sweeping expired ones first
    pub async fn start(&self, session: IntakeSession) -> Uuid {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let before = entries.len();
        entries.retain(|_, e| now.duration_since(e.last_active) < self.ttl);
        let swept = before - entries.len();
        if swept > 0 {
            tracing::debug!(swept, "Expired intake sessions removed");
        }

        if entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.last_active)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                tracing::warn!(session_id = %oldest, "Intake session evicted at capacity");
            }
        }

        let id = Uuid::new_v4();
        entries.insert(
            id,
            IntakeEntry {
                session,
                last_active: now,
            },
        );
        id
    }

    /// Answer the current question of session `id`.
    ///
    /// `None` when the session is unknown or expired. A completed session is
    /// removed. The returned step index is the one after this answer.
    pub async fn answer(
        &self,
        id: &Uuid,
        text: &str,
    ) -> Option<Result<(usize, IntakeStep), IntakeError>> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let expired = entries
            .get(id)
            .is_some_and(|e| now.duration_since(e.last_active) >= self.ttl);
        if expired {
            entries.remove(id);
            return None;
        }

        let entry = entries.get_mut(id)?;
        let result = entry.session.answer(text).map(|next| (entry.session.step(), next));
        entry.last_active = now;
        if matches!(result, Ok((_, IntakeStep::Complete(_)))) {
            entries.remove(id);
        }
        Some(result)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire() {
        let sessions = IntakeSessions::new(Duration::from_secs(60), 10);
        let stale = sessions.start(IntakeSession::new()).await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(sessions.answer(&stale, "Vata: 3").await.is_none());

        let other = sessions.start(IntakeSession::new()).await;
        tokio::time::advance(Duration::from_secs(61)).await;
        let fresh = sessions.start(IntakeSession::new()).await;

        assert_eq!(sessions.len().await, 1);
        assert!(sessions.answer(&other, "Vata: 3").await.is_none());
        assert!(matches!(sessions.answer(&fresh, "Vata: 3").await, Some(Ok((1, _)))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_answering_keeps_session_alive() {
        let sessions = IntakeSessions::new(Duration::from_secs(60), 10);
        let id = sessions.start(IntakeSession::new()).await;

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(matches!(sessions.answer(&id, "Vata: 3").await, Some(Ok(_))));
        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(matches!(sessions.answer(&id, "Pitta: 2").await, Some(Ok((2, _)))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_oldest() {
        let sessions = IntakeSessions::new(Duration::from_secs(600), 2);
        let first = sessions.start(IntakeSession::new()).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        let second = sessions.start(IntakeSession::new()).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        let third = sessions.start(IntakeSession::new()).await;

        assert_eq!(sessions.len().await, 2);
        assert!(sessions.answer(&first, "x").await.is_none());
        assert!(sessions.answer(&second, "x").await.is_some());
        assert!(sessions.answer(&third, "x").await.is_some());
    }

    #[tokio::test]
    async fn test_empty_answer_rejected() {
        let sessions = IntakeSessions::default();
        let id = sessions.start(IntakeSession::new()).await;
        assert!(matches!(
            sessions.answer(&id, "  ").await,
            Some(Err(IntakeError::EmptyAnswer))
        ));
    }
}
