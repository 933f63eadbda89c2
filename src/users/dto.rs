use serde::Deserialize;

/// Body of create and update requests, from an HTML form or JSON.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
}

/// Fully populated create request, password still in plaintext.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
}

/// The fields an update actually supplied, password still in plaintext.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.birth_date.is_none()
    }
}

/// A value counts as supplied only if it has non-whitespace content.
/// Supplied values are kept verbatim.
///
/// Stricter than a plain emptiness check: `" "` is treated as absent, so a
/// whitespace-only create is a 400 and a whitespace-only update is "No fields
/// to update" rather than storing the blank.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl UserForm {
    /// `None` if any of the five fields is missing or blank.
    pub fn into_create(self) -> Option<CreateUser> {
        Some(CreateUser {
            email: present(self.email)?,
            password: present(self.password)?,
            first_name: present(self.first_name)?,
            last_name: present(self.last_name)?,
            birth_date: present(self.birth_date)?,
        })
    }

    pub fn into_update(self) -> UpdateUser {
        UpdateUser {
            email: present(self.email),
            password: present(self.password),
            first_name: present(self.first_name),
            last_name: present(self.last_name),
            birth_date: present(self.birth_date),
        }
    }
}
