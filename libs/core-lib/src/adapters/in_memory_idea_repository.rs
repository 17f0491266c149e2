use crate::domain::idea::{Comment, Idea};
use crate::domain::user::{User, UserSummary};
use crate::{CoreError, IdeaRepository};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

/// In-memory implementation of the IdeaRepository port for testing and
/// database-less runs.
///
/// Ideas are stored per tenant in insertion order. Numbering happens while the
/// tenant's map entry is held, so creations within one tenant are serialized.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdeaRepository {
    // User ID -> (Tenant ID, author snapshot)
    users: Arc<DashMap<i32, (i32, UserSummary)>>,
    // Tenant ID -> ideas, oldest first
    ideas: Arc<DashMap<i32, Vec<Idea>>>,
    // Idea ID -> Tenant ID
    idea_tenants: Arc<DashMap<i32, i32>>,
    // Idea ID -> comments, oldest first
    comments: Arc<DashMap<i32, Vec<Comment>>>,
    next_id: Arc<AtomicI32>,
}

impl InMemoryIdeaRepository {
    /// Registers a user so it can author ideas and comments in `tenant_id`.
    pub fn add_user(&self, tenant_id: i32, user: &User) {
        self.users
            .insert(user.id, (tenant_id, UserSummary::from(user)));
    }

    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn author(&self, user_id: i32) -> Result<(i32, UserSummary), CoreError> {
        self.users
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CoreError::NotFound(format!("user {user_id}")))
    }

    fn find_idea(
        &self,
        tenant_id: i32,
        predicate: impl Fn(&Idea) -> bool,
    ) -> Option<Idea> {
        self.ideas
            .get(&tenant_id)
            .and_then(|ideas| ideas.iter().find(|idea| predicate(idea)).cloned())
    }
}

#[async_trait]
impl IdeaRepository for InMemoryIdeaRepository {
    async fn list_ideas(&self, tenant_id: i32) -> Result<Vec<Idea>, CoreError> {
        match self.ideas.get(&tenant_id) {
            Some(ideas) => Ok(ideas.iter().rev().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    async fn get_idea(&self, tenant_id: i32, idea_id: i32) -> Result<Idea, CoreError> {
        self.find_idea(tenant_id, |idea| idea.id == idea_id)
            .ok_or_else(|| CoreError::NotFound(format!("idea id {idea_id} in tenant {tenant_id}")))
    }

    async fn get_idea_by_number(&self, tenant_id: i32, number: i32) -> Result<Idea, CoreError> {
        self.find_idea(tenant_id, |idea| idea.number == number)
            .ok_or_else(|| {
                CoreError::NotFound(format!("idea number {number} in tenant {tenant_id}"))
            })
    }

    async fn list_comments(&self, tenant_id: i32, idea_id: i32) -> Result<Vec<Comment>, CoreError> {
        let belongs_to_tenant = self
            .idea_tenants
            .get(&idea_id)
            .is_some_and(|owner| *owner == tenant_id);
        if !belongs_to_tenant {
            return Ok(Vec::new());
        }
        match self.comments.get(&idea_id) {
            Some(comments) => Ok(comments.iter().rev().cloned().collect()),
            None => Ok(Vec::new()),
        }
    }

    async fn create_idea(
        &self,
        tenant_id: i32,
        user_id: i32,
        title: &str,
        description: &str,
    ) -> Result<Idea, CoreError> {
        let (user_tenant, user) = self.author(user_id)?;
        if user_tenant != tenant_id {
            return Err(CoreError::NotFound(format!(
                "user {user_id} in tenant {tenant_id}"
            )));
        }

        let mut ideas = self.ideas.entry(tenant_id).or_default();
        let number = ideas.iter().map(|idea| idea.number).max().unwrap_or(0) + 1;
        let idea = Idea {
            id: self.next_id(),
            number,
            title: title.to_string(),
            description: description.to_string(),
            created_on: Utc::now(),
            user,
        };
        ideas.push(idea.clone());
        self.idea_tenants.insert(idea.id, tenant_id);

        Ok(idea)
    }

    async fn add_comment(&self, user_id: i32, idea_id: i32, content: &str) -> Result<i32, CoreError> {
        let (_, user) = self.author(user_id)?;
        if !self.idea_tenants.contains_key(&idea_id) {
            return Err(CoreError::NotFound(format!("idea id {idea_id}")));
        }

        let id = self.next_id();
        self.comments.entry(idea_id).or_default().push(Comment {
            id,
            content: content.to_string(),
            created_on: Utc::now(),
            user,
        });
        Ok(id)
    }
}
