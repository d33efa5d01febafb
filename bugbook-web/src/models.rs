use std::collections::HashMap;

use bugbook_core::domain::{Bug, Comment, Contact, Phone, User};
use serde::Deserialize;
use uuid::Uuid;

// View models for the HTML templates. The JSON surface serializes the domain
// entities directly; these carry display-ready strings only.

#[derive(Debug, Clone)]
pub struct WebContact {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Contact> for WebContact {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.map(|id| id.to_string()).unwrap_or_default(),
            name: contact.name.clone(),
            email: contact.email.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebPhone {
    pub id: String,
    pub number: String,
}

impl From<&Phone> for WebPhone {
    fn from(phone: &Phone) -> Self {
        Self {
            id: phone.id.map(|id| id.to_string()).unwrap_or_default(),
            number: phone.number.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for WebUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_string()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebBug {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reporter: String,
    pub assignee: String,
}

impl WebBug {
    /// Resolve reporter/assignee ids to display names; unknown ids fall back
    /// to the raw id so the row still renders.
    pub fn with_names(bug: &Bug, names: &HashMap<Uuid, String>) -> Self {
        let resolve = |id: Uuid| {
            names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| id.to_string())
        };
        Self {
            id: bug.id.map(|id| id.to_string()).unwrap_or_default(),
            title: bug.title.clone(),
            description: bug.description.clone(),
            reporter: resolve(bug.reporter_id),
            assignee: bug.assignee_id.map(resolve).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebComment {
    pub body: String,
    pub author: String,
    pub created_at: String,
}

impl WebComment {
    pub fn with_names(comment: &Comment, names: &HashMap<Uuid, String>) -> Self {
        Self {
            body: comment.body.clone(),
            author: comment
                .author_id
                .map(|id| names.get(&id).cloned().unwrap_or_else(|| id.to_string()))
                .unwrap_or_default(),
            created_at: comment.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One-shot success message carried across a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}
