/// Session store tests: sign-in persists a user record, sign-out clears it
use ripple_core::backend::{AuthSource, Credentials, MockBackend};
use ripple_core::session::SessionStore;
use ripple_core::types::User;
use tempfile::TempDir;

fn user() -> User {
    User {
        id: "u-1".to_string(),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        provider: None,
    }
}

#[test]
fn save_load_clear_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path()).unwrap();

    assert!(store.load().unwrap().is_none());

    let user = user();
    store.save(&user).unwrap();
    assert_eq!(store.load().unwrap(), Some(user));

    assert!(store.clear().unwrap());
    assert!(store.load().unwrap().is_none());
    // Clearing an empty store reports nothing removed
    assert!(!store.clear().unwrap());
}

#[test]
fn session_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = SessionStore::new(dir.path()).unwrap();
        store.save(&user()).unwrap();
    }
    let store = SessionStore::new(dir.path()).unwrap();
    let restored = store.load().unwrap().unwrap();
    assert_eq!(restored.email, "john@example.com");
}

#[tokio::test]
async fn mock_sign_in_result_persists_and_signs_out() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path()).unwrap();
    let backend = MockBackend::instant();

    let user = backend
        .sign_in(Credentials {
            email: "alex@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    store.save(&user).unwrap();

    let restored = store.load().unwrap().unwrap();
    assert_eq!(restored.email, "alex@example.com");

    assert!(store.clear().unwrap());
    assert!(store.load().unwrap().is_none());
}
