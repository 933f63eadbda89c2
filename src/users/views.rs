use askama::Template;
use axum::response::Html;

use crate::error::AppError;
use crate::users::repo_types::{format_date, User, UserSummary};

/// User fields as shown on pages. The password hash is never rendered.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
}

impl From<UserSummary> for UserView {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            birth_date: format_date(u.birth_date),
        }
    }
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        UserSummary::from(u).into()
    }
}

#[derive(Template)]
#[template(path = "users/list.html")]
pub struct UserListTemplate {
    pub users: Vec<UserView>,
}

#[derive(Template)]
#[template(path = "users/add.html")]
pub struct AddUserTemplate {
    pub action: &'static str,
}

#[derive(Template)]
#[template(path = "users/show.html")]
pub struct ShowUserTemplate {
    pub user: UserView,
}

#[derive(Template)]
#[template(path = "users/edit.html")]
pub struct EditUserTemplate {
    pub user: UserView,
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}
