pub mod storage;

pub use storage::AccessCodeStore;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, warn};

use crate::session::SessionState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Invalid Access Code")]
    Denied,
}

/// Checks submitted passcodes against a fixed allow-list.
///
/// The allow-list is built once at startup from plaintext codes (flags and
/// env) plus an optional [`AccessCodeStore`] holding digests.
pub struct AccessGate {
    codes: Vec<String>,
    store: Option<AccessCodeStore>,
}

impl AccessGate {
    /// A gate over plaintext codes. Entries are trimmed, empty ones dropped.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim();
            if !code.is_empty() && !list.iter().any(|c| c == code) {
                list.push(code.to_string());
            }
        }
        Self {
            codes: list,
            store: None,
        }
    }

    /// Also accept codes held in a store.
    pub fn with_store(mut self, store: AccessCodeStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Split a comma-separated list, as found in `PARLEY_ACCESS_CODES`.
    pub fn parse_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether no code could ever pass.
    pub fn is_empty(&self) -> Result<bool> {
        if !self.codes.is_empty() {
            return Ok(false);
        }
        match &self.store {
            Some(store) => store.is_empty(),
            None => Ok(true),
        }
    }

    /// Exact membership test. The empty string never matches.
    pub fn check(&self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            return false;
        }
        if self.codes.iter().any(|c| c == code) {
            return true;
        }
        match &self.store {
            Some(store) => match store.contains(code) {
                Ok(found) => found,
                Err(e) => {
                    warn!(error = %e, "access code store lookup failed");
                    false
                }
            },
            None => false,
        }
    }

    /// Unlock the session if the code is on the list. A miss leaves the
    /// session untouched.
    pub fn unlock(&self, session: &mut SessionState, code: &str) -> std::result::Result<(), GateError> {
        if !self.check(code) {
            debug!(session_id = session.session_id(), "access denied");
            return Err(GateError::Denied);
        }
        session.authenticate(code.trim());
        debug!(session_id = session.session_id(), "access granted");
        Ok(())
    }
}

/// Build the gate from every configured source.
pub fn build_gate(listed: Option<&str>, store: Option<AccessCodeStore>) -> AccessGate {
    let codes = listed.map(AccessGate::parse_list).unwrap_or_default();
    let gate = AccessGate::new(codes);
    match store {
        Some(store) => gate.with_store(store),
        None => gate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AccessGate {
        AccessGate::new(["alpha", "beta"])
    }

    #[test]
    fn listed_code_passes() {
        assert!(gate().check("alpha"));
        assert!(gate().check("beta"));
    }

    #[test]
    fn unlisted_code_fails() {
        assert!(!gate().check("gamma"));
    }

    #[test]
    fn match_is_exact_not_substring() {
        assert!(!gate().check("alp"));
        assert!(!gate().check("alphabet"));
        assert!(!gate().check("ALPHA"));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(gate().check("  alpha\n"));
    }

    #[test]
    fn empty_code_never_passes() {
        let gate = AccessGate::new(["", "  ", "x"]);
        assert!(!gate.check(""));
        assert!(!gate.check("   "));
        assert!(gate.check("x"));
    }

    #[test]
    fn empty_gate_is_empty() {
        assert!(AccessGate::new(Vec::<String>::new()).is_empty().unwrap());
        assert!(!gate().is_empty().unwrap());
    }

    #[test]
    fn parse_list_splits_and_trims() {
        assert_eq!(
            AccessGate::parse_list(" a, b ,,c "),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(AccessGate::parse_list("").is_empty());
    }

    #[test]
    fn unlock_flips_flag() {
        let mut session = SessionState::new("hi");
        gate().unlock(&mut session, " beta ").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.access_code(), Some("beta"));
    }

    #[test]
    fn failed_unlock_leaves_session_locked() {
        let mut session = SessionState::new("hi");
        let err = gate().unlock(&mut session, "nope").unwrap_err();
        assert_eq!(err, GateError::Denied);
        assert_eq!(err.to_string(), "Invalid Access Code");
        assert!(!session.is_authenticated());
        assert!(session.access_code().is_none());
    }

    #[test]
    fn store_codes_are_accepted() {
        let store = AccessCodeStore::open(":memory:").unwrap();
        store.add("stored-code", "team").unwrap();
        let gate = gate().with_store(store);
        assert!(gate.check("stored-code"));
        assert!(gate.check("alpha"));
        assert!(!gate.check("other"));
        assert!(!gate.is_empty().unwrap());
    }

    #[test]
    fn build_gate_merges_sources() {
        let store = AccessCodeStore::open(":memory:").unwrap();
        store.add("from-store", "").unwrap();
        let gate = build_gate(Some("from-env, second"), Some(store));
        assert!(gate.check("from-env"));
        assert!(gate.check("second"));
        assert!(gate.check("from-store"));
    }

    #[test]
    fn empty_store_alone_is_empty() {
        let gate = AccessGate::new(Vec::<String>::new())
            .with_store(AccessCodeStore::open(":memory:").unwrap());
        assert!(gate.is_empty().unwrap());
    }

    #[test]
    fn broken_store_is_an_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.db");
        let path_str = path.to_str().unwrap();

        let store = AccessCodeStore::open(path_str).unwrap();
        rusqlite::Connection::open(path_str)
            .unwrap()
            .execute_batch("DROP TABLE access_codes")
            .unwrap();

        let gate = AccessGate::new(Vec::<String>::new()).with_store(store);
        assert!(gate.is_empty().is_err());
    }
}
