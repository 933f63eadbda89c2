use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::get,
    Router,
};
use tracing::{info, instrument};

use crate::{
    error::AppError,
    extract::FormOrJson,
    state::AppState,
    users::{
        dto::UserForm,
        password::hash_password_async,
        repo_types::{NewUser, User, UserChanges},
        views::{
            render, AddUserTemplate, EditUserTemplate, ShowUserTemplate, UserListTemplate,
            UserView,
        },
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/add", get(add_user_form))
        .route("/users/edit/:id", get(edit_user_form))
        .route(
            "/users/:id",
            get(show_user).put(update_user).delete(delete_user),
        )
}

/// Ids are integers; anything else can't name a row.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}

async fn load_user(state: &AppState, raw_id: &str) -> Result<User, AppError> {
    let id = parse_id(raw_id)?;
    state
        .users
        .find(id)
        .await
        .map_err(AppError::storage("Error querying the database"))?
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let users = state
        .users
        .list()
        .await
        .map_err(AppError::storage("Error querying the database"))?;
    render(&UserListTemplate {
        users: users.into_iter().map(UserView::from).collect(),
    })
}

pub async fn add_user_form() -> Result<Html<String>, AppError> {
    render(&AddUserTemplate { action: "/users" })
}

#[instrument(skip(state))]
pub async fn show_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let user = load_user(&state, &id).await?;
    render(&ShowUserTemplate { user: user.into() })
}

#[instrument(skip(state))]
pub async fn edit_user_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let user = load_user(&state, &id).await?;
    render(&EditUserTemplate { user: user.into() })
}

#[instrument(skip(state, form))]
pub async fn create_user(
    State(state): State<AppState>,
    FormOrJson(form): FormOrJson<UserForm>,
) -> Result<Redirect, AppError> {
    let input = form
        .into_create()
        .ok_or(AppError::Validation("All fields are required"))?;

    let password_hash = hash_password_async(input.password).await?;

    let id = state
        .users
        .create(NewUser {
            email: input.email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            birth_date: input.birth_date,
        })
        .await
        .map_err(AppError::storage("Error inserting user into the database"))?;

    info!(user_id = id, "user created");
    Ok(Redirect::to("/users"))
}

#[instrument(skip(state, form))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    FormOrJson(form): FormOrJson<UserForm>,
) -> Result<Redirect, AppError> {
    let update = form.into_update();
    if update.is_empty() {
        return Err(AppError::Validation("No fields to update"));
    }

    let password_hash = match update.password {
        Some(plain) => Some(hash_password_async(plain).await?),
        None => None,
    };
    let changes = UserChanges {
        email: update.email,
        password_hash,
        first_name: update.first_name,
        last_name: update.last_name,
        birth_date: update.birth_date,
    };

    let id = parse_id(&raw_id)?;
    let updated = state
        .users
        .update(id, changes)
        .await
        .map_err(AppError::storage("Error updating user in the database"))?;
    if !updated {
        return Err(AppError::NotFound);
    }

    info!(user_id = id, "user updated");
    Ok(Redirect::to(&format!("/users/edit/{id}")))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&raw_id)?;
    let deleted = state
        .users
        .delete(id)
        .await
        .map_err(AppError::storage("Error deleting user from the database"))?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    info!(user_id = id, "user deleted");
    Ok(Redirect::to("/users"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_ids_are_not_found() {
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound)));
        assert!(matches!(parse_id("1.5"), Err(AppError::NotFound)));
        assert_eq!(parse_id("42").unwrap(), 42);
    }
}
