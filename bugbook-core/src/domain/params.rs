use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Bug, Comment, Contact, Phone, User};

/// Accumulated validation failures, keyed by field name.
///
/// Serializes to the conventional 422 payload shape:
/// `{"name": ["can't be blank"]}`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded against a single field.
    pub fn on(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// "title can't be blank"-style messages for rendering in views.
    pub fn full_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| format!("{field} {m}"))
            })
            .collect()
    }

    fn require(&mut self, field: &str, value: &Option<String>) {
        if presence(value).is_none() {
            self.add(field, "can't be blank");
        }
    }

    fn check_uuid(&mut self, field: &str, value: &Option<String>) {
        if let Some(raw) = presence(value) {
            if Uuid::parse_str(raw).is_err() {
                self.add(field, "is invalid");
            }
        }
    }
}

fn presence(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn clean(value: Option<String>) -> Option<String> {
    presence(&value).map(str::to_string)
}

fn parse_uuid(value: &Option<String>) -> Option<Uuid> {
    presence(value).and_then(|raw| Uuid::parse_str(raw).ok())
}

/// Request parameters for creating or updating a contact.
///
/// All fields are optional strings so blank form inputs surface as field
/// errors instead of deserialization failures.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ContactParams {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ContactParams {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.require("name", &self.name);
        errors
    }

    pub fn into_contact(self) -> Result<Contact, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let now = Utc::now();
        Ok(Contact {
            id: None,
            name: clean(self.name).unwrap_or_default(),
            email: clean(self.email),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Request parameters for creating a phone under a contact. The owning
/// contact comes from the route, never from the body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PhoneParams {
    pub number: Option<String>,
}

impl PhoneParams {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.require("number", &self.number);
        errors
    }

    pub fn into_phone(self, contact_id: Uuid) -> Result<Phone, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Phone {
            id: None,
            contact_id,
            number: clean(self.number).unwrap_or_default(),
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct BugParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reporter_id: Option<String>,
    pub assignee_id: Option<String>,
}

impl BugParams {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.require("title", &self.title);
        errors.require("description", &self.description);
        errors.require("reporter_id", &self.reporter_id);
        errors.check_uuid("reporter_id", &self.reporter_id);
        errors.check_uuid("assignee_id", &self.assignee_id);
        errors
    }

    pub fn reporter_uuid(&self) -> Option<Uuid> {
        parse_uuid(&self.reporter_id)
    }

    pub fn assignee_uuid(&self) -> Option<Uuid> {
        parse_uuid(&self.assignee_id)
    }

    pub fn into_bug(self) -> Result<Bug, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let now = Utc::now();
        Ok(Bug {
            id: None,
            title: clean(self.title).unwrap_or_default(),
            description: clean(self.description).unwrap_or_default(),
            reporter_id: parse_uuid(&self.reporter_id).unwrap_or_default(),
            assignee_id: parse_uuid(&self.assignee_id),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Request parameters for commenting on a bug. The bug comes from the route.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CommentParams {
    pub body: Option<String>,
    pub author_id: Option<String>,
}

impl CommentParams {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.require("body", &self.body);
        errors.check_uuid("author_id", &self.author_id);
        errors
    }

    pub fn author_uuid(&self) -> Option<Uuid> {
        parse_uuid(&self.author_id)
    }

    pub fn into_comment(self, bug_id: Uuid) -> Result<Comment, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Comment {
            id: None,
            bug_id,
            author_id: parse_uuid(&self.author_id),
            body: clean(self.body).unwrap_or_default(),
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserParams {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserParams {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.require("name", &self.name);
        errors
    }

    pub fn into_user(self) -> Result<User, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(User {
            id: None,
            name: clean(self.name).unwrap_or_default(),
            email: clean(self.email),
            created_at: Utc::now(),
        })
    }
}
