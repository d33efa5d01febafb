use super::traits::Storage;
use crate::common::error::{BugbookError, Result};
use crate::domain::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// In-memory storage implementation for development/testing.
pub struct InMemoryStorage {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    contacts: Arc<Mutex<HashMap<Uuid, Contact>>>,
    phones: Arc<Mutex<HashMap<Uuid, Phone>>>,
    bugs: Arc<Mutex<HashMap<Uuid, Bug>>>,
    comments: Arc<Mutex<HashMap<Uuid, Comment>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            contacts: Arc::new(Mutex::new(HashMap::new())),
            phones: Arc::new(Mutex::new(HashMap::new())),
            bugs: Arc::new(Mutex::new(HashMap::new())),
            comments: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

fn page<T>(mut items: Vec<T>, limit: Option<usize>, offset: Option<usize>) -> Vec<T> {
    let offset = offset.unwrap_or(0).min(items.len());
    let mut items = items.split_off(offset);
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user(&self, user: &mut User) -> Result<()> {
        let id = user.id.unwrap_or_else(Uuid::new_v4);
        user.id = Some(id);

        let mut users = self.users.lock().unwrap();
        users.insert(id, user.clone());

        debug!("Created user: {} with id {}", user.name, id);
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&user_id).cloned())
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        let users = self.users.lock().unwrap();
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn create_contact(&self, contact: &mut Contact) -> Result<()> {
        let id = contact.id.unwrap_or_else(Uuid::new_v4);
        contact.id = Some(id);

        let mut contacts = self.contacts.lock().unwrap();
        contacts.insert(id, contact.clone());

        debug!("Created contact: {} with id {}", contact.name, id);
        Ok(())
    }

    async fn get_contact_by_id(&self, contact_id: Uuid) -> Result<Option<Contact>> {
        let contacts = self.contacts.lock().unwrap();
        Ok(contacts.get(&contact_id).cloned())
    }

    async fn get_all_contacts(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Contact>> {
        let contacts = self.contacts.lock().unwrap();
        let mut all: Vec<Contact> = contacts.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page(all, limit, offset))
    }

    async fn update_contact(&self, contact: &Contact) -> Result<()> {
        let contact_id = contact.id.ok_or_else(|| BugbookError::Database {
            message: "Cannot update contact without ID".to_string(),
        })?;

        let mut contacts = self.contacts.lock().unwrap();
        if !contacts.contains_key(&contact_id) {
            return Err(BugbookError::NotFound {
                entity: "contact",
                id: contact_id,
            });
        }
        contacts.insert(contact_id, contact.clone());

        debug!("Updated contact: {} with id {}", contact.name, contact_id);
        Ok(())
    }

    async fn delete_contact(&self, contact_id: Uuid) -> Result<()> {
        let mut contacts = self.contacts.lock().unwrap();
        if contacts.remove(&contact_id).is_none() {
            return Err(BugbookError::NotFound {
                entity: "contact",
                id: contact_id,
            });
        }

        // Cascade: phones go with their contact
        let mut phones = self.phones.lock().unwrap();
        phones.retain(|_, phone| phone.contact_id != contact_id);

        debug!("Deleted contact {} and its phones", contact_id);
        Ok(())
    }

    async fn create_phone(&self, phone: &mut Phone) -> Result<()> {
        let id = phone.id.unwrap_or_else(Uuid::new_v4);
        phone.id = Some(id);

        let mut phones = self.phones.lock().unwrap();
        phones.insert(id, phone.clone());

        debug!("Created phone: {} with id {}", phone.number, id);
        Ok(())
    }

    async fn get_phone_by_id(&self, phone_id: Uuid) -> Result<Option<Phone>> {
        let phones = self.phones.lock().unwrap();
        Ok(phones.get(&phone_id).cloned())
    }

    async fn get_phones_by_contact_id(&self, contact_id: Uuid) -> Result<Vec<Phone>> {
        let phones = self.phones.lock().unwrap();
        let mut matching: Vec<Phone> = phones
            .values()
            .filter(|phone| phone.contact_id == contact_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn delete_phone(&self, phone_id: Uuid) -> Result<()> {
        let mut phones = self.phones.lock().unwrap();
        if phones.remove(&phone_id).is_none() {
            return Err(BugbookError::NotFound {
                entity: "phone",
                id: phone_id,
            });
        }
        debug!("Deleted phone {}", phone_id);
        Ok(())
    }

    async fn create_bug(&self, bug: &mut Bug) -> Result<()> {
        let id = bug.id.unwrap_or_else(Uuid::new_v4);
        bug.id = Some(id);

        let mut bugs = self.bugs.lock().unwrap();
        bugs.insert(id, bug.clone());

        debug!("Created bug: {} with id {}", bug.title, id);
        Ok(())
    }

    async fn get_bug_by_id(&self, bug_id: Uuid) -> Result<Option<Bug>> {
        let bugs = self.bugs.lock().unwrap();
        Ok(bugs.get(&bug_id).cloned())
    }

    async fn get_all_bugs(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Bug>> {
        let bugs = self.bugs.lock().unwrap();
        let mut all: Vec<Bug> = bugs.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(page(all, limit, offset))
    }

    async fn update_bug(&self, bug: &Bug) -> Result<()> {
        let bug_id = bug.id.ok_or_else(|| BugbookError::Database {
            message: "Cannot update bug without ID".to_string(),
        })?;

        let mut bugs = self.bugs.lock().unwrap();
        if !bugs.contains_key(&bug_id) {
            return Err(BugbookError::NotFound {
                entity: "bug",
                id: bug_id,
            });
        }
        bugs.insert(bug_id, bug.clone());

        debug!("Updated bug: {} with id {}", bug.title, bug_id);
        Ok(())
    }

    async fn delete_bug(&self, bug_id: Uuid) -> Result<()> {
        let mut bugs = self.bugs.lock().unwrap();
        if bugs.remove(&bug_id).is_none() {
            return Err(BugbookError::NotFound {
                entity: "bug",
                id: bug_id,
            });
        }

        // Cascade: comments go with their bug
        let mut comments = self.comments.lock().unwrap();
        comments.retain(|_, comment| comment.bug_id != bug_id);

        debug!("Deleted bug {} and its comments", bug_id);
        Ok(())
    }

    async fn create_comment(&self, comment: &mut Comment) -> Result<()> {
        let id = comment.id.unwrap_or_else(Uuid::new_v4);
        comment.id = Some(id);

        let mut comments = self.comments.lock().unwrap();
        comments.insert(id, comment.clone());

        debug!("Created comment with id {}", id);
        Ok(())
    }

    async fn get_comments_by_bug_id(&self, bug_id: Uuid) -> Result<Vec<Comment>> {
        let comments = self.comments.lock().unwrap();
        let mut matching: Vec<Comment> = comments
            .values()
            .filter(|comment| comment.bug_id == bug_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }
}
