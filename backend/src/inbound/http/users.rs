//! Users API handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! GET    /api/users/email/{email}
//! POST   /api/users {"name":"Alice","email":"alice@example.com","age":30}
//! PUT    /api/users/{id} {"age":31}
//! DELETE /api/users/{id}
//! GET    /api/users/search?name=ali
//! GET    /api/users/age-range?minAge=18&maxAge=65
//! GET    /api/users/statistics
//! GET    /api/users/adults/count
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::UserFields;
use crate::domain::{Error, ErrorCode, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::malformed_input;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/users` and `PUT /api/users/{id}`.
///
/// Every field is optional on the wire; creation requires `name` and
/// `email`, while updates ignore absent or blank fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UserRequest {
    #[schema(example = "Alice Smith")]
    pub name: Option<String>,
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[schema(example = 30)]
    pub age: Option<i32>,
}

impl From<UserRequest> for UserFields {
    fn from(value: UserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            age: value.age,
        }
    }
}

/// Query string for `GET /api/users/search`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive name fragment. Absent or blank lists every user.
    pub name: Option<String>,
}

/// Query string for `GET /api/users/age-range`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct AgeRangeQuery {
    /// Inclusive lower bound.
    pub min_age: Option<i32>,
    /// Inclusive upper bound.
    pub max_age: Option<i32>,
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("User with id {id} not found")).with_details(json!({
        "id": id.get(),
        "code": "user_not_found",
    }))
}

fn email_not_found(email: &str) -> Error {
    Error::not_found(format!("User with email {email} not found"))
        .with_details(json!({ "code": "user_not_found" }))
}

/// List every user ordered by id.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserSchema]),
        (status = 503, description = "User store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}

/// Fetch a single user by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserById"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<User>> {
    let id = UserId::new(path.into_inner());
    let user = state
        .users
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| user_not_found(id))?;
    Ok(web::Json(user))
}

/// Fetch a single user by exact email.
#[utoipa::path(
    get,
    path = "/api/users/email/{email}",
    params(("email" = String, Path, description = "Exact email address")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 400, description = "Blank email", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserByEmail"
)]
#[get("/users/email/{email}")]
pub async fn get_user_by_email(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let email = path.into_inner();
    let user = state
        .users
        .get_user_by_email(&email)
        .await?
        .ok_or_else(|| email_not_found(&email))?;
    Ok(web::Json(user))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequest,
    responses(
        (
            status = 201,
            description = "User created",
            headers(("Location" = String, description = "Path of the new user")),
            body = UserSchema
        ),
        (status = 400, description = "Invalid user or email in use", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let user = state
        .users_command
        .create_user(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/users/{}", user.id())))
        .json(user))
}

/// Update the present, non-blank fields of a user.
///
/// A missing user is reported as 400 like any other rejected update.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid update or unknown user", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = UserId::new(path.into_inner());
    let user = state
        .users_command
        .update_user(id, payload.into_inner().into())
        .await?;
    Ok(web::Json(user))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "No such user", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(path.into_inner());
    state
        .users_command
        .delete_user(id)
        .await
        .map_err(|err| match err.code() {
            ErrorCode::InvalidRequest => err.with_code(ErrorCode::NotFound),
            _ => err,
        })?;
    Ok(HttpResponse::NoContent().finish())
}

/// Search users by name fragment.
#[utoipa::path(
    get,
    path = "/api/users/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching users", body = [UserSchema]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "searchUsers"
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<User>>> {
    let users = state
        .users
        .search_users_by_name(query.into_inner().name)
        .await?;
    Ok(web::Json(users))
}

/// List users whose age lies within an inclusive range.
#[utoipa::path(
    get,
    path = "/api/users/age-range",
    params(AgeRangeQuery),
    responses(
        (status = 200, description = "Users in range", body = [UserSchema]),
        (status = 400, description = "Missing, negative or inverted bounds", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUsersByAgeRange"
)]
#[get("/users/age-range")]
pub async fn get_users_by_age_range(
    state: web::Data<HttpState>,
    query: web::Query<AgeRangeQuery>,
) -> ApiResult<web::Json<Vec<User>>> {
    let AgeRangeQuery { min_age, max_age } = query.into_inner();
    let users = state.users.get_users_by_age_range(min_age, max_age).await?;
    Ok(web::Json(users))
}

/// Summary line of total, adult and minor counts.
#[utoipa::path(
    get,
    path = "/api/users/statistics",
    responses(
        (
            status = 200,
            description = "Statistics summary",
            content_type = "text/plain",
            body = String
        ),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserStatistics"
)]
#[get("/users/statistics")]
pub async fn get_user_statistics(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let summary = state.users.get_user_statistics().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(summary))
}

/// Number of users aged 18 or over.
#[utoipa::path(
    get,
    path = "/api/users/adults/count",
    responses(
        (status = 200, description = "Adult count", body = u64),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getAdultUserCount"
)]
#[get("/users/adults/count")]
pub async fn get_adult_user_count(state: web::Data<HttpState>) -> ApiResult<web::Json<u64>> {
    let count = state.users.get_adult_user_count().await?;
    Ok(web::Json(count))
}

/// Register the users API and its extractor error handlers under `/api`.
///
/// Fixed paths are registered before `/users/{id}` so they are not captured
/// as ids.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use userbase::inbound::http::users::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| {
        malformed_input("JSON body", "invalid_json", err, req)
    }))
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, req| malformed_input("path", "invalid_path", err, req)),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, req| malformed_input("query", "invalid_query", err, req)),
    )
    .service(
        web::scope("/api")
            .service(search_users)
            .service(get_users_by_age_range)
            .service(get_user_statistics)
            .service(get_adult_user_count)
            .service(get_user_by_email)
            .service(list_users)
            .service(create_user)
            .service(get_user)
            .service(update_user)
            .service(delete_user),
    );
}
