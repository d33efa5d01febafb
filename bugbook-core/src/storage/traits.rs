use crate::common::error::Result;
use crate::domain::*;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage trait for persisting domain data (users, contacts, phones, bugs,
/// and comments).
///
/// `create_*` assigns a fresh id when the entity has none and writes it back.
/// `update_*` and `delete_*` fail with `NotFound` for unknown ids. Deleting a
/// contact deletes its phones; deleting a bug deletes its comments.
#[async_trait]
pub trait Storage: Send + Sync {
    // User operations
    async fn create_user(&self, user: &mut User) -> Result<()>;
    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>>;
    async fn get_all_users(&self) -> Result<Vec<User>>;

    // Contact operations
    async fn create_contact(&self, contact: &mut Contact) -> Result<()>;
    async fn get_contact_by_id(&self, contact_id: Uuid) -> Result<Option<Contact>>;
    async fn get_all_contacts(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Contact>>;
    async fn update_contact(&self, contact: &Contact) -> Result<()>;
    async fn delete_contact(&self, contact_id: Uuid) -> Result<()>;

    // Phone operations
    async fn create_phone(&self, phone: &mut Phone) -> Result<()>;
    async fn get_phone_by_id(&self, phone_id: Uuid) -> Result<Option<Phone>>;
    async fn get_phones_by_contact_id(&self, contact_id: Uuid) -> Result<Vec<Phone>>;
    async fn delete_phone(&self, phone_id: Uuid) -> Result<()>;

    // Bug operations
    async fn create_bug(&self, bug: &mut Bug) -> Result<()>;
    async fn get_bug_by_id(&self, bug_id: Uuid) -> Result<Option<Bug>>;
    async fn get_all_bugs(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Bug>>;
    async fn update_bug(&self, bug: &Bug) -> Result<()>;
    async fn delete_bug(&self, bug_id: Uuid) -> Result<()>;

    // Comment operations
    async fn create_comment(&self, comment: &mut Comment) -> Result<()>;
    async fn get_comments_by_bug_id(&self, bug_id: Uuid) -> Result<Vec<Comment>>;
}
