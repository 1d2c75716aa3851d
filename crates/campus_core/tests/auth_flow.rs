use campus_core::{
    verify_password, AdminCredentials, AdminLoginRequest, AuthService, ErrorKind,
    InMemorySessionStore, JsonFileStore, LoginRequest, RecordStore, RegisterRequest,
    ServiceError, SessionStore,
};
use serde_json::Value;

fn admin() -> Option<AdminCredentials> {
    Some(AdminCredentials {
        username: "registrar".to_string(),
        password: "correct horse".to_string(),
    })
}

#[test]
fn register_twice_with_same_email_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("database.json"));
    let service = AuthService::new(&store, InMemorySessionStore::new());

    service
        .register(&RegisterRequest::new("Ann", "ann@x.com", "pw123"))
        .unwrap();
    let err = service
        .register(&RegisterRequest::new("Ann Again", "ann@x.com", "other"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateUser));
    assert_eq!(store.load().unwrap().students.len(), 1);
}

#[test]
fn register_rejects_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("database.json"));
    let service = AuthService::new(&store, InMemorySessionStore::new());

    let cases = [
        RegisterRequest::new("", "ann@x.com", "pw123"),
        RegisterRequest::new("Ann", "   ", "pw123"),
        RegisterRequest::new("Ann", "ann@x.com", ""),
        RegisterRequest::default(),
    ];
    for request in &cases {
        let err = service.register(request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput, "{request:?}");
    }
    assert!(store.load().unwrap().students.is_empty());
}

#[test]
fn stored_password_is_a_salted_hash() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    let store = JsonFileStore::new(&path);
    let service = AuthService::new(&store, InMemorySessionStore::new());

    service
        .register(&RegisterRequest::new("Ann", "ann@x.com", "pw123").with_percentage(88.5))
        .unwrap();

    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let stored = on_disk["students"][0]["password"].as_str().unwrap();
    assert_ne!(stored, "pw123");
    assert!(!stored.contains("pw123"));
    assert!(verify_password("pw123", stored));
    assert!(!verify_password("pw124", stored));
    assert_eq!(on_disk["students"][0]["percentage"], 88.5);
}

#[test]
fn percentage_defaults_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("database.json"));
    let service = AuthService::new(&store, InMemorySessionStore::new());

    service
        .register(&RegisterRequest::new("Ann", "ann@x.com", "pw123"))
        .unwrap();
    let outcome = service
        .login(&LoginRequest::new("ann@x.com", "pw123"))
        .unwrap();
    assert_eq!(outcome.user.percentage, 0.0);
}

#[test]
fn login_then_check_session_returns_same_profile() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("database.json"));
    let service = AuthService::new(&store, InMemorySessionStore::new());
    service
        .register(&RegisterRequest::new("Ann", "ann@x.com", "pw123").with_percentage(72.0))
        .unwrap();

    let outcome = service
        .login(&LoginRequest::new("ann@x.com", "pw123"))
        .unwrap();
    assert_eq!(outcome.user.name, "Ann");
    assert_eq!(outcome.user.percentage, 72.0);

    let profile = service.check_session(Some(&outcome.token)).unwrap();
    assert_eq!(profile, outcome.user);
}

#[test]
fn login_failures_are_invalid_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("database.json"));
    let service = AuthService::new(&store, InMemorySessionStore::new());
    service
        .register(&RegisterRequest::new("Ann", "ann@x.com", "pw123"))
        .unwrap();

    let wrong_password = service
        .login(&LoginRequest::new("ann@x.com", "wrong"))
        .unwrap_err();
    assert!(matches!(wrong_password, ServiceError::InvalidCredentials));

    let unknown = service
        .login(&LoginRequest::new("bob@x.com", "pw123"))
        .unwrap_err();
    assert!(matches!(unknown, ServiceError::InvalidCredentials));

    let missing = service.login(&LoginRequest::default()).unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::InvalidInput);

    assert!(service.sessions().is_empty());
}

#[test]
fn logout_invalidates_the_token() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("database.json"));
    let service = AuthService::new(&store, InMemorySessionStore::new());
    service
        .register(&RegisterRequest::new("Ann", "ann@x.com", "pw123"))
        .unwrap();
    let token = service
        .login(&LoginRequest::new("ann@x.com", "pw123"))
        .unwrap()
        .token;

    service.logout(Some(&token));
    let err = service.check_session(Some(&token)).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidSession));

    service.logout(Some(&token));
    service.logout(Some("unknown-token"));
    service.logout(None);
}

#[test]
fn check_session_fails_when_student_record_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("database.json"));
    let service = AuthService::new(&store, InMemorySessionStore::new());
    service
        .register(&RegisterRequest::new("Ann", "ann@x.com", "pw123"))
        .unwrap();
    let token = service
        .login(&LoginRequest::new("ann@x.com", "pw123"))
        .unwrap()
        .token;

    let mut document = store.load().unwrap();
    document.students.clear();
    store.save(&document).unwrap();

    let err = service.check_session(Some(&token)).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidSession));
    assert!(matches!(
        service.check_session(None).unwrap_err(),
        ServiceError::InvalidSession
    ));
}

#[test]
fn sessions_do_not_survive_a_new_registry() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("database.json"));
    let token = {
        let service = AuthService::new(&store, InMemorySessionStore::new());
        service
            .register(&RegisterRequest::new("Ann", "ann@x.com", "pw123"))
            .unwrap();
        service
            .login(&LoginRequest::new("ann@x.com", "pw123"))
            .unwrap()
            .token
    };

    let restarted = AuthService::new(&store, InMemorySessionStore::new());
    assert!(restarted.check_session(Some(&token)).is_err());
}

#[test]
fn admin_login_checks_configured_pair() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("database.json"));
    let service = AuthService::new(&store, InMemorySessionStore::new()).with_admin(admin());

    let ok = AdminLoginRequest {
        username: Some("registrar".to_string()),
        password: Some("correct horse".to_string()),
    };
    service.admin_login(&ok).unwrap();

    let wrong = AdminLoginRequest {
        password: Some("battery staple".to_string()),
        ..ok.clone()
    };
    assert!(matches!(
        service.admin_login(&wrong).unwrap_err(),
        ServiceError::InvalidCredentials
    ));

    let missing = AdminLoginRequest {
        username: None,
        ..ok.clone()
    };
    assert_eq!(
        service.admin_login(&missing).unwrap_err().kind(),
        ErrorKind::InvalidInput
    );

    let unconfigured = AuthService::new(&store, InMemorySessionStore::new());
    assert!(matches!(
        unconfigured.admin_login(&ok).unwrap_err(),
        ServiceError::InvalidCredentials
    ));
}

#[test]
fn student_with_legacy_bcrypt_hash_can_log_in() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    let hash = bcrypt::hash("pw123", 4).unwrap();
    let legacy = serde_json::json!({
        "students": [
            { "id": 1700000000001_u64, "name": "Ann", "email": "ann@x.com", "password": hash, "percentage": "77.5" }
        ],
        "colleges": []
    });
    std::fs::write(&path, legacy.to_string()).unwrap();

    let store = JsonFileStore::new(&path);
    let service = AuthService::new(&store, InMemorySessionStore::new());
    let outcome = service
        .login(&LoginRequest::new("ann@x.com", "pw123"))
        .unwrap();
    assert_eq!(outcome.user.name, "Ann");
    assert_eq!(outcome.user.percentage, 77.5);

    let err = service
        .login(&LoginRequest::new("ann@x.com", "pw124"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCredentials));
}
