use parley::gate::storage::digest_code;
use parley::gate::{AccessCodeStore, AccessGate, GateError, build_gate};
use parley::session::SessionState;

/// Helper: a store in a temp dir that outlives the test body.
fn temp_store() -> (AccessCodeStore, String, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parley.db");
    let path = path.to_str().unwrap().to_string();
    let store = AccessCodeStore::open(&path).unwrap();
    (store, path, dir)
}

#[test]
fn code_added_by_one_process_unlocks_another() {
    let (store, path, _dir) = temp_store();
    store.add("recruiter-acme", "acme").unwrap();
    drop(store);

    let gate = build_gate(None, Some(AccessCodeStore::open(&path).unwrap()));
    let mut session = SessionState::new("hi");
    gate.unlock(&mut session, "recruiter-acme").unwrap();
    assert!(session.is_authenticated());
}

#[test]
fn removed_code_no_longer_unlocks() {
    let (store, path, _dir) = temp_store();
    store.add("temp", "").unwrap();
    store.remove("temp").unwrap();

    let gate = build_gate(None, Some(AccessCodeStore::open(&path).unwrap()));
    let mut session = SessionState::new("hi");
    assert_eq!(gate.unlock(&mut session, "temp"), Err(GateError::Denied));
}

#[test]
fn database_never_holds_plaintext() {
    let (store, path, _dir) = temp_store();
    store.add("super-secret-code", "label").unwrap();
    drop(store);

    let raw = std::fs::read(&path).unwrap();
    let haystack = String::from_utf8_lossy(&raw);
    assert!(!haystack.contains("super-secret-code"));
    assert!(haystack.contains(&digest_code("super-secret-code")));
}

#[test]
fn list_codes_and_env_codes_both_work() {
    let (store, _path, _dir) = temp_store();
    store.add("stored", "").unwrap();

    let gate = build_gate(Some("env-one,env-two"), Some(store));
    for code in ["stored", "env-one", "env-two"] {
        assert!(gate.check(code), "{code} should pass");
    }
    assert!(!gate.check("env"));
}

#[test]
fn repeated_failures_then_success() {
    let gate = AccessGate::new(["right"]);
    let mut session = SessionState::new("hi");
    for wrong in ["", "wrong", "Right", "righ"] {
        assert!(gate.unlock(&mut session, wrong).is_err());
        assert!(!session.is_authenticated());
    }
    gate.unlock(&mut session, "right").unwrap();
    assert_eq!(session.access_code(), Some("right"));
}

#[test]
fn relock_requires_code_again() {
    let gate = AccessGate::new(["right"]);
    let mut session = SessionState::new("hi");
    gate.unlock(&mut session, "right").unwrap();
    session.lock();
    assert!(!session.is_authenticated());
    assert!(gate.unlock(&mut session, "nope").is_err());
    gate.unlock(&mut session, "right").unwrap();
    assert!(session.is_authenticated());
}
