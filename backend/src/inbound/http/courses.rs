//! Course directory HTTP handlers.
//!
//! ```text
//! GET  /api/v1/courses
//! GET  /api/v1/courses/{id}/users
//! POST /api/v1/users/search
//! GET  /api/v1/lms/site-info
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::CourseId;
use crate::domain::ports::{Course, CourseUsersView, LmsUser, SiteInfo, UserSearchView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Course as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i64,
    pub fullname: String,
    pub shortname: String,
    pub category_id: Option<i64>,
}

impl From<Course> for CourseResponse {
    fn from(value: Course) -> Self {
        Self {
            id: value.id.get(),
            fullname: value.fullname,
            shortname: value.shortname,
            category_id: value.category_id,
        }
    }
}

/// Learning-platform user as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LmsUserResponse {
    pub id: i64,
    pub username: String,
    pub fullname: String,
    pub email: String,
}

impl From<LmsUser> for LmsUserResponse {
    fn from(value: LmsUser) -> Self {
        Self {
            id: value.id.get(),
            username: value.username,
            fullname: value.fullname,
            email: value.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseUsersResponse {
    pub course_id: i64,
    pub course_name: String,
    pub users: Vec<LmsUserResponse>,
}

impl From<CourseUsersView> for CourseUsersResponse {
    fn from(value: CourseUsersView) -> Self {
        Self {
            course_id: value.course_id.get(),
            course_name: value.course_name,
            users: value.users.into_iter().map(LmsUserResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UserSearchRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSearchResponse {
    pub email: String,
    pub user: Option<LmsUserResponse>,
    pub courses: Vec<CourseResponse>,
    /// Always true once a search ran, even when no user matched.
    pub searched: bool,
}

impl From<UserSearchView> for UserSearchResponse {
    fn from(value: UserSearchView) -> Self {
        Self {
            email: value.email,
            user: value.user.map(LmsUserResponse::from),
            courses: value.courses.into_iter().map(CourseResponse::from).collect(),
            searched: value.searched,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfoResponse {
    pub site_name: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub release: Option<String>,
    pub version: Option<String>,
}

impl From<SiteInfo> for SiteInfoResponse {
    fn from(value: SiteInfo) -> Self {
        Self {
            site_name: value.site_name,
            username: value.username,
            full_name: value.full_name,
            release: value.release,
            version: value.version,
        }
    }
}

/// List the learning platform's course catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses((status = 200, description = "Course catalogue", body = [CourseResponse])),
    tags = ["courses"],
    operation_id = "listCourses"
)]
#[get("/courses")]
pub async fn list_courses(state: web::Data<HttpState>) -> web::Json<Vec<CourseResponse>> {
    let courses = state.courses.list_courses().await;
    web::Json(courses.into_iter().map(CourseResponse::from).collect())
}

/// List users enrolled in one course.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/users",
    params(("id" = i64, Path, description = "Course identifier")),
    responses((status = 200, description = "Enrolled users", body = CourseUsersResponse)),
    tags = ["courses"],
    operation_id = "listCourseUsers"
)]
#[get("/courses/{id}/users")]
pub async fn course_users(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> web::Json<CourseUsersResponse> {
    let view = state
        .courses
        .course_users(CourseId::new(path.into_inner()))
        .await;
    web::Json(CourseUsersResponse::from(view))
}

/// Find a learning-platform user by email and list their courses.
#[utoipa::path(
    post,
    path = "/api/v1/users/search",
    request_body = UserSearchRequest,
    responses(
        (status = 200, description = "Search result", body = UserSearchResponse),
        (status = 400, description = "Blank email", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "searchUser"
)]
#[post("/users/search")]
pub async fn search_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserSearchRequest>,
) -> ApiResult<web::Json<UserSearchResponse>> {
    let view = state.courses.search_user(&payload.email).await?;
    Ok(web::Json(UserSearchResponse::from(view)))
}

/// Connectivity check against the learning platform.
#[utoipa::path(
    get,
    path = "/api/v1/lms/site-info",
    responses(
        (status = 200, description = "Site information", body = SiteInfoResponse),
        (status = 503, description = "Learning platform unreachable", body = ErrorSchema)
    ),
    tags = ["courses"],
    operation_id = "lmsSiteInfo"
)]
#[get("/lms/site-info")]
pub async fn site_info(state: web::Data<HttpState>) -> ApiResult<web::Json<SiteInfoResponse>> {
    let info = state.courses.site_info().await?;
    Ok(web::Json(SiteInfoResponse::from(info)))
}
