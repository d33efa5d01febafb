use askama::Template;
use bugbook_core::domain::{BugParams, ContactParams, FieldErrors, PhoneParams, UserParams};
use uuid::Uuid;

use crate::models::{WebBug, WebComment, WebContact, WebPhone, WebUser};

fn field(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

#[derive(Template)]
#[template(path = "contacts/index.html")]
pub struct ContactsIndexTemplate {
    pub contacts: Vec<WebContact>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "contacts/show.html")]
pub struct ContactShowTemplate {
    pub contact: WebContact,
    pub phones: Vec<WebPhone>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "contacts/new.html")]
pub struct NewContactTemplate {
    pub name: String,
    pub email: String,
    pub errors: FieldErrors,
}

impl NewContactTemplate {
    pub fn new(params: &ContactParams, errors: FieldErrors) -> Self {
        Self {
            name: field(&params.name),
            email: field(&params.email),
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "contacts/edit.html")]
pub struct EditContactTemplate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub errors: FieldErrors,
}

impl EditContactTemplate {
    pub fn new(id: Uuid, params: &ContactParams, errors: FieldErrors) -> Self {
        Self {
            id: id.to_string(),
            name: field(&params.name),
            email: field(&params.email),
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "phones/new.html")]
pub struct PhoneNewTemplate {
    pub contact: WebContact,
    pub number: String,
    pub errors: FieldErrors,
}

impl PhoneNewTemplate {
    pub fn new(contact: WebContact, params: &PhoneParams, errors: FieldErrors) -> Self {
        Self {
            contact,
            number: field(&params.number),
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "bugs/index.html")]
pub struct BugsIndexTemplate {
    pub bugs: Vec<WebBug>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "bugs/show.html")]
pub struct BugShowTemplate {
    pub bug: WebBug,
    pub comments: Vec<WebComment>,
    pub users: Vec<WebUser>,
    pub comment_errors: FieldErrors,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "bugs/new.html")]
pub struct NewBugTemplate {
    pub title: String,
    pub description: String,
    pub reporter_id: String,
    pub assignee_id: String,
    pub users: Vec<WebUser>,
    pub errors: FieldErrors,
}

impl NewBugTemplate {
    pub fn new(params: &BugParams, users: Vec<WebUser>, errors: FieldErrors) -> Self {
        Self {
            title: field(&params.title),
            description: field(&params.description),
            reporter_id: field(&params.reporter_id),
            assignee_id: field(&params.assignee_id),
            users,
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "bugs/edit.html")]
pub struct EditBugTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reporter_id: String,
    pub assignee_id: String,
    pub users: Vec<WebUser>,
    pub errors: FieldErrors,
}

impl EditBugTemplate {
    pub fn new(id: Uuid, params: &BugParams, users: Vec<WebUser>, errors: FieldErrors) -> Self {
        Self {
            id: id.to_string(),
            title: field(&params.title),
            description: field(&params.description),
            reporter_id: field(&params.reporter_id),
            assignee_id: field(&params.assignee_id),
            users,
            errors,
        }
    }
}

#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub users: Vec<WebUser>,
    pub name: String,
    pub email: String,
    pub errors: FieldErrors,
    pub notice: Option<String>,
}

impl UsersIndexTemplate {
    pub fn new(
        users: Vec<WebUser>,
        params: &UserParams,
        errors: FieldErrors,
        notice: Option<String>,
    ) -> Self {
        Self {
            users,
            name: field(&params.name),
            email: field(&params.email),
            errors,
            notice,
        }
    }
}
