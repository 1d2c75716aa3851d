//! Request boundary: JSON bodies in, status plus JSON envelope out.
//!
//! # Responsibility
//! - Decode request bodies and path/header values for each use-case.
//! - Render results as `{ "success": true, ... }` or `{ "error", "code" }`
//!   with an HTTP-equivalent status.
//!
//! # Invariants
//! - Never panics on caller input; malformed bodies become status 400.
//! - Password hashes and student identifiers never appear in a body.

use crate::config::{AdminCredentials, CoreConfig, StorageBackend};
use crate::model::college::StaffEntry;
use crate::model::id::RecordId;
use crate::service::auth_service::{AdminLoginRequest, AuthService, LoginRequest, RegisterRequest};
use crate::service::college_service::CollegeService;
use crate::service::{ServiceError, ServiceResult};
use crate::session::{InMemorySessionStore, SessionStore};
use crate::store::{AnyStore, JsonFileStore, RecordStore, SqliteStore, StoreResult};
use log::error;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Header carrying the session token on authenticated requests.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Status plus JSON body for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn success() -> Self {
        Self::ok(json!({ "success": true }))
    }

    fn failure(err: &ServiceError) -> Self {
        if let ServiceError::Storage(source) = err {
            error!("event=request module=api status=error error_code=storage_failure error={source}");
        }
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string(), "code": err.kind().as_str() }),
        }
    }

    fn from_result<T>(result: ServiceResult<T>, render: impl FnOnce(T) -> Value) -> Self {
        match result {
            Ok(value) => Self::ok(render(value)),
            Err(err) => Self::failure(&err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[derive(Debug, Default, Deserialize)]
struct CollegeBody {
    name: Option<String>,
    info: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaffBody {
    college_id: Option<RecordId>,
    name: Option<String>,
    role: Option<String>,
    staff_index: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FacilityBody {
    college_id: Option<RecordId>,
    facility: Option<String>,
    facility_index: Option<i64>,
}

/// Both services wired over one shared store and one session registry.
pub struct CampusApi<S: RecordStore, R: SessionStore> {
    store: Arc<S>,
    auth: AuthService<Arc<S>, R>,
    colleges: CollegeService<Arc<S>>,
}

impl CampusApi<AnyStore, InMemorySessionStore> {
    /// Opens the configured backend with a fresh in-memory session registry.
    pub fn open(config: &CoreConfig) -> StoreResult<Self> {
        let store = match config.backend {
            StorageBackend::Json => AnyStore::Json(JsonFileStore::new(&config.data_file)),
            StorageBackend::Sqlite => AnyStore::Sqlite(SqliteStore::open(&config.data_file)?),
        };
        let sessions = match config.session_ttl() {
            Some(ttl) => InMemorySessionStore::with_ttl(ttl),
            None => InMemorySessionStore::new(),
        };
        Ok(Self::new(store, sessions, config.admin.clone()))
    }
}

impl<S: RecordStore, R: SessionStore> CampusApi<S, R> {
    pub fn new(store: S, sessions: R, admin: Option<AdminCredentials>) -> Self {
        let store = Arc::new(store);
        Self {
            auth: AuthService::new(Arc::clone(&store), sessions).with_admin(admin),
            colleges: CollegeService::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn auth(&self) -> &AuthService<Arc<S>, R> {
        &self.auth
    }

    pub fn colleges(&self) -> &CollegeService<Arc<S>> {
        &self.colleges
    }

    pub fn register(&self, body: &Value) -> ApiResponse {
        match parse_body::<RegisterRequest>(body) {
            Ok(request) => {
                ApiResponse::from_result(self.auth.register(&request), |_| json!({ "success": true }))
            }
            Err(err) => ApiResponse::failure(&err),
        }
    }

    pub fn login(&self, body: &Value) -> ApiResponse {
        match parse_body::<LoginRequest>(body) {
            Ok(request) => ApiResponse::from_result(self.auth.login(&request), |outcome| {
                json!({ "success": true, "token": outcome.token, "user": outcome.user })
            }),
            Err(err) => ApiResponse::failure(&err),
        }
    }

    /// `token` is the value of the `x-session-token` header, if sent.
    pub fn session(&self, token: Option<&str>) -> ApiResponse {
        ApiResponse::from_result(self.auth.check_session(token), |user| {
            json!({ "success": true, "user": user })
        })
    }

    pub fn logout(&self, token: Option<&str>) -> ApiResponse {
        self.auth.logout(token);
        ApiResponse::success()
    }

    pub fn admin_login(&self, body: &Value) -> ApiResponse {
        match parse_body::<AdminLoginRequest>(body) {
            Ok(request) => {
                ApiResponse::from_result(self.auth.admin_login(&request), |()| json!({ "success": true }))
            }
            Err(err) => ApiResponse::failure(&err),
        }
    }

    pub fn list_colleges(&self) -> ApiResponse {
        ApiResponse::from_result(self.colleges.list(), |colleges| json!(colleges))
    }

    pub fn add_college(&self, body: &Value) -> ApiResponse {
        let result = parse_body::<CollegeBody>(body).and_then(|body| {
            self.colleges
                .add_college(body.name.as_deref(), body.info.as_deref())
        });
        ApiResponse::from_result(result, |college| {
            json!({ "success": true, "id": college.id })
        })
    }

    pub fn edit_college(&self, college_id: &str, body: &Value) -> ApiResponse {
        let result = parse_body::<CollegeBody>(body).and_then(|body| {
            self.colleges
                .edit_college(college_id, body.name.as_deref(), body.info.as_deref())
        });
        ApiResponse::from_result(result, |_| json!({ "success": true }))
    }

    pub fn delete_college(&self, college_id: &str) -> ApiResponse {
        ApiResponse::from_result(self.colleges.delete_college(college_id), |_| {
            json!({ "success": true })
        })
    }

    pub fn add_staff(&self, body: &Value) -> ApiResponse {
        let result = parse_body::<StaffBody>(body).and_then(|body| {
            let college_id = college_id_of(body.college_id.as_ref())?;
            let entry = StaffEntry::new(body.name.unwrap_or_default(), body.role.unwrap_or_default());
            self.colleges.add_staff(&college_id, entry)
        });
        ApiResponse::from_result(result, |_| json!({ "success": true }))
    }

    pub fn remove_staff(&self, body: &Value) -> ApiResponse {
        let result = parse_body::<StaffBody>(body).and_then(|body| {
            let college_id = college_id_of(body.college_id.as_ref())?;
            let index = index_of(body.staff_index, "staff")?;
            self.colleges.remove_staff(&college_id, index)
        });
        ApiResponse::from_result(result, |_| json!({ "success": true }))
    }

    pub fn add_facility(&self, body: &Value) -> ApiResponse {
        let result = parse_body::<FacilityBody>(body).and_then(|body| {
            let college_id = college_id_of(body.college_id.as_ref())?;
            self.colleges
                .add_facility(&college_id, body.facility.as_deref().unwrap_or_default())
        });
        ApiResponse::from_result(result, |_| json!({ "success": true }))
    }

    pub fn remove_facility(&self, body: &Value) -> ApiResponse {
        let result = parse_body::<FacilityBody>(body).and_then(|body| {
            let college_id = college_id_of(body.college_id.as_ref())?;
            let index = index_of(body.facility_index, "facility")?;
            self.colleges.remove_facility(&college_id, index)
        });
        ApiResponse::from_result(result, |_| json!({ "success": true }))
    }
}

/// Decodes a request body; `null` is read as an empty object.
fn parse_body<T: DeserializeOwned + Default>(body: &Value) -> ServiceResult<T> {
    if body.is_null() {
        return Ok(T::default());
    }
    T::deserialize(body).map_err(|err| ServiceError::InvalidInput(format!("malformed body: {err}")))
}

/// A missing college id can match nothing, so it reads as not found.
fn college_id_of(id: Option<&RecordId>) -> ServiceResult<String> {
    id.map(RecordId::to_string)
        .ok_or_else(|| ServiceError::NotFound("college".to_string()))
}

fn index_of(index: Option<i64>, what: &str) -> ServiceResult<usize> {
    index
        .and_then(|value| usize::try_from(value).ok())
        .ok_or_else(|| ServiceError::NotFound(what.to_string()))
}
