//! In-memory stand-ins for the database-backed seams, used by unit and router tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::Utc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::content::models::ContentOwner;
use crate::features::content::services::ContentSource;
use crate::features::content::ContentKind;
use crate::features::members::MemberDirectory;
use crate::features::violations::models::{
    NewViolation, StatusTransition, Violation, ViolationFilter, ViolationStatus,
};
use crate::features::violations::ViolationStore;
use crate::shared::constants::ROLE_ADMIN;

pub fn member(member_id: i64) -> AuthenticatedUser {
    AuthenticatedUser {
        member_id,
        sub: member_id.to_string(),
        roles: vec!["member".to_string()],
    }
}

pub fn admin(member_id: i64) -> AuthenticatedUser {
    AuthenticatedUser {
        member_id,
        sub: member_id.to_string(),
        roles: vec![ROLE_ADMIN.to_string()],
    }
}

/// Inject `user` into every request, in place of the JWT middleware
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

#[derive(Default)]
struct StoreState {
    next_id: i64,
    rows: BTreeMap<i64, Violation>,
}

/// `ViolationStore` over a map; every operation runs under one lock
#[derive(Default)]
pub struct InMemoryViolationStore {
    state: Mutex<StoreState>,
}

impl InMemoryViolationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    pub fn get(&self, id: i64) -> Option<Violation> {
        self.state.lock().unwrap().rows.get(&id).cloned()
    }
}

fn matches_filter(v: &Violation, filter: &ViolationFilter) -> bool {
    filter.status.map_or(true, |s| v.status == s)
        && filter.reason.map_or(true, |r| v.reason == r)
        && filter.reporter_id.map_or(true, |id| v.reporter_id == id)
        && filter
            .reported_member_id
            .map_or(true, |id| v.reported_member_id == Some(id))
        && filter
            .target_kind
            .map_or(true, |k: ContentKind| v.target.kind() == k)
}

#[async_trait]
impl ViolationStore for InMemoryViolationStore {
    async fn create(&self, new: NewViolation) -> Result<Violation> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let now = Utc::now();
        let violation = Violation {
            id: state.next_id,
            reason: new.reason,
            detail_reason: new.detail_reason,
            status: ViolationStatus::Pending,
            reporter_id: new.reporter_id,
            reported_member_id: new.reported_member_id,
            target: new.target,
            delete_requested: false,
            processed_by: None,
            processed_at: None,
            content_deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        state.rows.insert(violation.id, violation.clone());
        Ok(violation)
    }

    async fn find_by_id(&self, id: i64) -> Result<Violation> {
        self.get(id)
            .ok_or_else(|| AppError::NotFound(format!("Violation {} not found", id)))
    }

    async fn update_status(&self, id: i64, transition: StatusTransition) -> Result<Violation> {
        let mut state = self.state.lock().unwrap();
        let violation = state
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Violation {} not found", id)))?;

        if violation.status != ViolationStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Violation {} was already processed as {}",
                id, violation.status
            )));
        }

        let now = Utc::now();
        violation.status = transition.status;
        violation.processed_by = Some(transition.processed_by);
        violation.processed_at = Some(now);
        violation.delete_requested = transition.delete_requested;
        violation.updated_at = now;
        Ok(violation.clone())
    }

    async fn list(
        &self,
        filter: &ViolationFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Violation>, i64)> {
        let state = self.state.lock().unwrap();
        let matching: Vec<Violation> = state
            .rows
            .values()
            .rev()
            .filter(|v| matches_filter(v, filter))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_cleanup_pending(&self, limit: i64) -> Result<Vec<Violation>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .rows
            .values()
            .filter(|v| v.needs_cleanup())
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn mark_content_deleted(&self, id: i64) -> Result<Violation> {
        let mut state = self.state.lock().unwrap();
        let violation = state
            .rows
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Violation {} not found", id)))?;
        let now = Utc::now();
        violation.content_deleted_at.get_or_insert(now);
        violation.updated_at = now;
        Ok(violation.clone())
    }
}

#[derive(Default)]
struct ContentState {
    authors: HashMap<i64, Option<i64>>,
    deleted: HashSet<i64>,
    delete_calls: HashMap<i64, usize>,
}

/// `ContentSource` for one content kind, with switchable delete failures
#[derive(Default)]
pub struct InMemoryContentSource {
    state: Mutex<ContentState>,
    fail_deletes: AtomicBool,
}

impl InMemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: i64, author_id: Option<i64>) {
        self.state.lock().unwrap().authors.insert(id, author_id);
    }

    /// Drop the row entirely, as if it was purged
    pub fn remove(&self, id: i64) {
        let mut state = self.state.lock().unwrap();
        state.authors.remove(&id);
        state.deleted.remove(&id);
    }

    pub fn is_deleted(&self, id: i64) -> bool {
        self.state.lock().unwrap().deleted.contains(&id)
    }

    pub fn delete_calls(&self, id: i64) -> usize {
        self.state
            .lock()
            .unwrap()
            .delete_calls
            .get(&id)
            .copied()
            .unwrap_or(0)
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentSource for InMemoryContentSource {
    async fn find_live(&self, id: i64) -> Result<Option<ContentOwner>> {
        let state = self.state.lock().unwrap();
        if state.deleted.contains(&id) {
            return Ok(None);
        }
        Ok(state
            .authors
            .get(&id)
            .map(|author_id| ContentOwner {
                id,
                author_id: *author_id,
            }))
    }

    async fn soft_delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        *state.delete_calls.entry(id).or_insert(0) += 1;

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("content store unavailable".to_string()));
        }
        if !state.authors.contains_key(&id) {
            return Err(AppError::NotFound(format!("Content {} not found", id)));
        }
        state.deleted.insert(id);
        Ok(())
    }
}

/// `MemberDirectory` over a fixed set of ids
pub struct InMemoryMemberDirectory {
    members: HashSet<i64>,
}

impl InMemoryMemberDirectory {
    pub fn with_members(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            members: ids.into_iter().collect(),
        }
    }
}

#[async_trait]
impl MemberDirectory for InMemoryMemberDirectory {
    async fn exists(&self, member_id: i64) -> Result<bool> {
        Ok(self.members.contains(&member_id))
    }
}
