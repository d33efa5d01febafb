use super::traits::Storage;
use crate::common::error::{BugbookError, Result};
use crate::database::DatabaseManager;
use crate::domain::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// SQLite-backed storage implementation.
///
/// Rows keep UUIDs as TEXT and timestamps as RFC 3339 TEXT. Child rows are
/// declared `ON DELETE CASCADE`, so deleting a contact or bug removes its
/// phones or comments inside the database itself.
pub struct SqliteStorage {
    db: Arc<DatabaseManager>,
}

impl SqliteStorage {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    fn parse_id(entity: &'static str, raw: &str) -> Result<Uuid> {
        Uuid::parse_str(raw).map_err(|e| BugbookError::Database {
            message: format!("Invalid {entity} UUID: {e}"),
        })
    }

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| BugbookError::Database {
                message: format!("Invalid timestamp: {e}"),
            })
    }

    fn user_from_row(
        id: String,
        name: String,
        email: Option<String>,
        created_at: String,
    ) -> Result<User> {
        Ok(User {
            id: Some(Self::parse_id("user", &id)?),
            name,
            email,
            created_at: Self::parse_timestamp(&created_at)?,
        })
    }

    fn contact_from_row(
        id: String,
        name: String,
        email: Option<String>,
        created_at: String,
        updated_at: String,
    ) -> Result<Contact> {
        Ok(Contact {
            id: Some(Self::parse_id("contact", &id)?),
            name,
            email,
            created_at: Self::parse_timestamp(&created_at)?,
            updated_at: Self::parse_timestamp(&updated_at)?,
        })
    }

    fn phone_from_row(
        id: String,
        contact_id: String,
        number: String,
        created_at: String,
    ) -> Result<Phone> {
        Ok(Phone {
            id: Some(Self::parse_id("phone", &id)?),
            contact_id: Self::parse_id("contact", &contact_id)?,
            number,
            created_at: Self::parse_timestamp(&created_at)?,
        })
    }

    fn bug_from_row(
        id: String,
        title: String,
        description: String,
        reporter_id: String,
        assignee_id: Option<String>,
        created_at: String,
        updated_at: String,
    ) -> Result<Bug> {
        let assignee_id = match assignee_id {
            Some(raw) => Some(Self::parse_id("user", &raw)?),
            None => None,
        };
        Ok(Bug {
            id: Some(Self::parse_id("bug", &id)?),
            title,
            description,
            reporter_id: Self::parse_id("user", &reporter_id)?,
            assignee_id,
            created_at: Self::parse_timestamp(&created_at)?,
            updated_at: Self::parse_timestamp(&updated_at)?,
        })
    }

    fn comment_from_row(
        id: String,
        bug_id: String,
        author_id: Option<String>,
        body: String,
        created_at: String,
    ) -> Result<Comment> {
        let author_id = match author_id {
            Some(raw) => Some(Self::parse_id("user", &raw)?),
            None => None,
        };
        Ok(Comment {
            id: Some(Self::parse_id("comment", &id)?),
            bug_id: Self::parse_id("bug", &bug_id)?,
            author_id,
            body,
            created_at: Self::parse_timestamp(&created_at)?,
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_user(&self, user: &mut User) -> Result<()> {
        let id = user.id.unwrap_or_else(Uuid::new_v4);
        user.id = Some(id);

        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO users (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                user.name,
                user.email,
                user.created_at.to_rfc3339()
            ],
        )
        .map_err(|e| BugbookError::Database {
            message: format!("Failed to insert user: {e}"),
        })?;

        info!("Created user: {} with id {}", user.name, id);
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let conn = self.db.connection();
        let row = conn
            .query_row(
                "SELECT id, name, email, created_at FROM users WHERE id = ?1",
                params![user_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query user: {e}"),
            })?;

        match row {
            Some((id, name, email, created_at)) => {
                Ok(Some(Self::user_from_row(id, name, email, created_at)?))
            }
            None => Ok(None),
        }
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare("SELECT id, name, email, created_at FROM users ORDER BY name")
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query users: {e}"),
            })?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query users: {e}"),
            })?;

        let mut users = Vec::new();
        for row in rows {
            let (id, name, email, created_at) = row.map_err(|e| BugbookError::Database {
                message: format!("Failed to read user row: {e}"),
            })?;
            users.push(Self::user_from_row(id, name, email, created_at)?);
        }
        Ok(users)
    }

    async fn create_contact(&self, contact: &mut Contact) -> Result<()> {
        let id = contact.id.unwrap_or_else(Uuid::new_v4);
        contact.id = Some(id);

        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO contacts (id, name, email, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id.to_string(),
                contact.name,
                contact.email,
                contact.created_at.to_rfc3339(),
                contact.updated_at.to_rfc3339()
            ],
        )
        .map_err(|e| BugbookError::Database {
            message: format!("Failed to insert contact: {e}"),
        })?;

        info!("Created contact: {} with id {}", contact.name, id);
        Ok(())
    }

    async fn get_contact_by_id(&self, contact_id: Uuid) -> Result<Option<Contact>> {
        let conn = self.db.connection();
        let row = conn
            .query_row(
                "SELECT id, name, email, created_at, updated_at FROM contacts WHERE id = ?1",
                params![contact_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query contact: {e}"),
            })?;

        match row {
            Some((id, name, email, created_at, updated_at)) => Ok(Some(
                Self::contact_from_row(id, name, email, created_at, updated_at)?,
            )),
            None => Ok(None),
        }
    }

    async fn get_all_contacts(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Contact>> {
        // A negative LIMIT means unlimited in SQLite
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let offset = offset.unwrap_or(0) as i64;

        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, email, created_at, updated_at FROM contacts
                 ORDER BY name LIMIT ?1 OFFSET ?2",
            )
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query contacts: {e}"),
            })?;

        let rows = stmt
            .query_map(params![limit, offset], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query contacts: {e}"),
            })?;

        let mut contacts = Vec::new();
        for row in rows {
            let (id, name, email, created_at, updated_at) =
                row.map_err(|e| BugbookError::Database {
                    message: format!("Failed to read contact row: {e}"),
                })?;
            contacts.push(Self::contact_from_row(
                id, name, email, created_at, updated_at,
            )?);
        }
        Ok(contacts)
    }

    async fn update_contact(&self, contact: &Contact) -> Result<()> {
        let contact_id = contact.id.ok_or_else(|| BugbookError::Database {
            message: "Cannot update contact without ID".to_string(),
        })?;

        let conn = self.db.connection();
        let changed = conn
            .execute(
                "UPDATE contacts SET name = ?2, email = ?3, updated_at = ?4 WHERE id = ?1",
                params![
                    contact_id.to_string(),
                    contact.name,
                    contact.email,
                    contact.updated_at.to_rfc3339()
                ],
            )
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to update contact: {e}"),
            })?;

        if changed == 0 {
            return Err(BugbookError::NotFound {
                entity: "contact",
                id: contact_id,
            });
        }

        info!("Updated contact: {} with id {}", contact.name, contact_id);
        Ok(())
    }

    async fn delete_contact(&self, contact_id: Uuid) -> Result<()> {
        let conn = self.db.connection();
        let changed = conn
            .execute(
                "DELETE FROM contacts WHERE id = ?1",
                params![contact_id.to_string()],
            )
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to delete contact: {e}"),
            })?;

        if changed == 0 {
            return Err(BugbookError::NotFound {
                entity: "contact",
                id: contact_id,
            });
        }

        info!("Deleted contact {} and its phones", contact_id);
        Ok(())
    }

    async fn create_phone(&self, phone: &mut Phone) -> Result<()> {
        let id = phone.id.unwrap_or_else(Uuid::new_v4);
        phone.id = Some(id);

        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO phones (id, contact_id, number, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                phone.contact_id.to_string(),
                phone.number,
                phone.created_at.to_rfc3339()
            ],
        )
        .map_err(|e| BugbookError::Database {
            message: format!("Failed to insert phone: {e}"),
        })?;

        debug!("Created phone: {} with id {}", phone.number, id);
        Ok(())
    }

    async fn get_phone_by_id(&self, phone_id: Uuid) -> Result<Option<Phone>> {
        let conn = self.db.connection();
        let row = conn
            .query_row(
                "SELECT id, contact_id, number, created_at FROM phones WHERE id = ?1",
                params![phone_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query phone: {e}"),
            })?;

        match row {
            Some((id, contact_id, number, created_at)) => Ok(Some(Self::phone_from_row(
                id, contact_id, number, created_at,
            )?)),
            None => Ok(None),
        }
    }

    async fn get_phones_by_contact_id(&self, contact_id: Uuid) -> Result<Vec<Phone>> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, contact_id, number, created_at FROM phones
                 WHERE contact_id = ?1 ORDER BY created_at",
            )
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query phones: {e}"),
            })?;

        let rows = stmt
            .query_map(params![contact_id.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query phones: {e}"),
            })?;

        let mut phones = Vec::new();
        for row in rows {
            let (id, contact_id, number, created_at) =
                row.map_err(|e| BugbookError::Database {
                    message: format!("Failed to read phone row: {e}"),
                })?;
            phones.push(Self::phone_from_row(id, contact_id, number, created_at)?);
        }
        Ok(phones)
    }

    async fn delete_phone(&self, phone_id: Uuid) -> Result<()> {
        let conn = self.db.connection();
        let changed = conn
            .execute(
                "DELETE FROM phones WHERE id = ?1",
                params![phone_id.to_string()],
            )
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to delete phone: {e}"),
            })?;

        if changed == 0 {
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

        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO bugs (id, title, description, reporter_id, assignee_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id.to_string(),
                bug.title,
                bug.description,
                bug.reporter_id.to_string(),
                bug.assignee_id.map(|a| a.to_string()),
                bug.created_at.to_rfc3339(),
                bug.updated_at.to_rfc3339()
            ],
        )
        .map_err(|e| BugbookError::Database {
            message: format!("Failed to insert bug: {e}"),
        })?;

        info!("Created bug: {} with id {}", bug.title, id);
        Ok(())
    }

    async fn get_bug_by_id(&self, bug_id: Uuid) -> Result<Option<Bug>> {
        let conn = self.db.connection();
        let row = conn
            .query_row(
                "SELECT id, title, description, reporter_id, assignee_id, created_at, updated_at
                 FROM bugs WHERE id = ?1",
                params![bug_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query bug: {e}"),
            })?;

        match row {
            Some((id, title, description, reporter_id, assignee_id, created_at, updated_at)) => {
                Ok(Some(Self::bug_from_row(
                    id,
                    title,
                    description,
                    reporter_id,
                    assignee_id,
                    created_at,
                    updated_at,
                )?))
            }
            None => Ok(None),
        }
    }

    async fn get_all_bugs(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Bug>> {
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let offset = offset.unwrap_or(0) as i64;

        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, title, description, reporter_id, assignee_id, created_at, updated_at
                 FROM bugs ORDER BY created_at LIMIT ?1 OFFSET ?2",
            )
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query bugs: {e}"),
            })?;

        let rows = stmt
            .query_map(params![limit, offset], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query bugs: {e}"),
            })?;

        let mut bugs = Vec::new();
        for row in rows {
            let (id, title, description, reporter_id, assignee_id, created_at, updated_at) =
                row.map_err(|e| BugbookError::Database {
                    message: format!("Failed to read bug row: {e}"),
                })?;
            bugs.push(Self::bug_from_row(
                id,
                title,
                description,
                reporter_id,
                assignee_id,
                created_at,
                updated_at,
            )?);
        }
        Ok(bugs)
    }

    async fn update_bug(&self, bug: &Bug) -> Result<()> {
        let bug_id = bug.id.ok_or_else(|| BugbookError::Database {
            message: "Cannot update bug without ID".to_string(),
        })?;

        let conn = self.db.connection();
        let changed = conn
            .execute(
                "UPDATE bugs SET title = ?2, description = ?3, reporter_id = ?4,
                 assignee_id = ?5, updated_at = ?6 WHERE id = ?1",
                params![
                    bug_id.to_string(),
                    bug.title,
                    bug.description,
                    bug.reporter_id.to_string(),
                    bug.assignee_id.map(|a| a.to_string()),
                    bug.updated_at.to_rfc3339()
                ],
            )
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to update bug: {e}"),
            })?;

        if changed == 0 {
            return Err(BugbookError::NotFound {
                entity: "bug",
                id: bug_id,
            });
        }

        info!("Updated bug: {} with id {}", bug.title, bug_id);
        Ok(())
    }

    async fn delete_bug(&self, bug_id: Uuid) -> Result<()> {
        let conn = self.db.connection();
        let changed = conn
            .execute("DELETE FROM bugs WHERE id = ?1", params![bug_id.to_string()])
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to delete bug: {e}"),
            })?;

        if changed == 0 {
            return Err(BugbookError::NotFound {
                entity: "bug",
                id: bug_id,
            });
        }

        info!("Deleted bug {} and its comments", bug_id);
        Ok(())
    }

    async fn create_comment(&self, comment: &mut Comment) -> Result<()> {
        let id = comment.id.unwrap_or_else(Uuid::new_v4);
        comment.id = Some(id);

        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO comments (id, bug_id, author_id, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id.to_string(),
                comment.bug_id.to_string(),
                comment.author_id.map(|a| a.to_string()),
                comment.body,
                comment.created_at.to_rfc3339()
            ],
        )
        .map_err(|e| BugbookError::Database {
            message: format!("Failed to insert comment: {e}"),
        })?;

        debug!("Created comment with id {}", id);
        Ok(())
    }

    async fn get_comments_by_bug_id(&self, bug_id: Uuid) -> Result<Vec<Comment>> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, bug_id, author_id, body, created_at FROM comments
                 WHERE bug_id = ?1 ORDER BY created_at",
            )
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query comments: {e}"),
            })?;

        let rows = stmt
            .query_map(params![bug_id.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(|e| BugbookError::Database {
                message: format!("Failed to query comments: {e}"),
            })?;

        let mut comments = Vec::new();
        for row in rows {
            let (id, bug_id, author_id, body, created_at) =
                row.map_err(|e| BugbookError::Database {
                    message: format!("Failed to read comment row: {e}"),
                })?;
            comments.push(Self::comment_from_row(
                id, bug_id, author_id, body, created_at,
            )?);
        }
        Ok(comments)
    }
}
