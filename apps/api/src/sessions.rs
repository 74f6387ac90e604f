//! In-memory session store. A session holds a job description, the ingested
//! CVs, and the last computed ranking. Sessions are discarded explicitly or
//! lost at process exit; nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::ingest::CvDocument;
use crate::ranking::engine::RankingOutcome;

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job_description: Option<String>,
    pub cvs: Vec<CvDocument>,
    pub outcome: Option<RankingOutcome>,
}

impl Session {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            job_description: None,
            cvs: Vec::new(),
            outcome: None,
        }
    }
}

/// Session metadata returned by the status endpoint.
#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub has_job_description: bool,
    pub cv_count: usize,
    pub ranked: bool,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(id, Session::new(id));
        id
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    pub async fn status(&self, id: Uuid) -> Option<SessionStatus> {
        self.inner.read().await.get(&id).map(|s| SessionStatus {
            session_id: s.id,
            created_at: s.created_at,
            has_job_description: s.job_description.is_some(),
            cv_count: s.cvs.len(),
            ranked: s.outcome.is_some(),
        })
    }

    /// Returns false when the session does not exist.
    pub async fn set_job_description(&self, id: Uuid, text: String) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(session) => {
                session.job_description = Some(text);
                // A new job description invalidates any previous ranking
                session.outcome = None;
                true
            }
            None => false,
        }
    }

    /// Appends accepted CVs to the session in upload order.
    /// Returns false when the session does not exist.
    pub async fn add_cvs(&self, id: Uuid, cvs: Vec<CvDocument>) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(session) => {
                session.cvs.extend(cvs);
                session.outcome = None;
                true
            }
            None => false,
        }
    }

    /// Clones the inputs needed for a ranking run.
    pub async fn snapshot(&self, id: Uuid) -> Option<(Option<String>, Vec<CvDocument>)> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(|s| (s.job_description.clone(), s.cvs.clone()))
    }

    pub async fn set_outcome(&self, id: Uuid, outcome: RankingOutcome) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(session) => {
                session.outcome = Some(outcome);
                true
            }
            None => false,
        }
    }

    /// Outer `None` means the session does not exist; inner `None` means no
    /// ranking has been computed yet.
    pub async fn outcome(&self, id: Uuid) -> Option<Option<RankingOutcome>> {
        self.inner
            .read()
            .await
            .get(&id)
            .map(|s| s.outcome.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(filename: &str) -> CvDocument {
        CvDocument {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            text: "some cv text".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_status() {
        let store = SessionStore::new();
        let id = store.create().await;

        let status = store.status(id).await.unwrap();
        assert_eq!(status.session_id, id);
        assert!(!status.has_job_description);
        assert_eq!(status.cv_count, 0);
        assert!(!status.ranked);
    }

    #[tokio::test]
    async fn test_missing_session_operations_report_absence() {
        let store = SessionStore::new();
        let id = Uuid::new_v4();

        assert!(store.status(id).await.is_none());
        assert!(!store.set_job_description(id, "jd".to_string()).await);
        assert!(!store.add_cvs(id, vec![doc("a.pdf")]).await);
        assert!(store.snapshot(id).await.is_none());
        assert!(store.outcome(id).await.is_none());
        assert!(!store.remove(id).await);
    }

    #[tokio::test]
    async fn test_cvs_accumulate_in_upload_order() {
        let store = SessionStore::new();
        let id = store.create().await;

        assert!(store.add_cvs(id, vec![doc("a.pdf"), doc("b.pdf")]).await);
        assert!(store.add_cvs(id, vec![doc("c.pdf")]).await);

        let (_, cvs) = store.snapshot(id).await.unwrap();
        let names: Vec<&str> = cvs.iter().map(|c| c.filename.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn test_new_job_description_invalidates_outcome() {
        let store = SessionStore::new();
        let id = store.create().await;

        store.set_outcome(id, RankingOutcome::empty(0)).await;
        assert!(store.outcome(id).await.unwrap().is_some());

        store.set_job_description(id, "new jd".to_string()).await;
        assert!(store.outcome(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_discards_session() {
        let store = SessionStore::new();
        let id = store.create().await;
        assert!(store.remove(id).await);
        assert!(store.status(id).await.is_none());
    }
}
