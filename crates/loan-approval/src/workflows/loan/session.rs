use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::LoanApplication;
use super::flow::UiFlowState;

pub const SESSION_COOKIE: &str = "loan_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything one browser session owns: navigation flags plus the last
/// submitted form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    pub flow: UiFlowState,
    pub application: Option<LoanApplication>,
}

/// Session persistence so the service never keeps flags in shared globals.
pub trait SessionStore: Send + Sync {
    fn load(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionError>;
    fn save(&self, id: SessionId, record: SessionRecord) -> Result<(), SessionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Extract the session id from a `Cookie` request header value.
pub fn session_from_cookie_header(header: &str) -> Option<SessionId> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE)
        .and_then(|(_, value)| SessionId::parse(value))
}

/// `Set-Cookie` value binding the browser to `id`.
pub fn session_cookie(id: SessionId, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_header_lookup_finds_session_among_others() {
        let id = SessionId::generate();
        let header = format!("theme=dark; {SESSION_COOKIE}={id}; other=1");
        assert_eq!(session_from_cookie_header(&header), Some(id));
    }

    #[test]
    fn cookie_header_lookup_ignores_malformed_ids() {
        assert_eq!(
            session_from_cookie_header("loan_session=not-a-uuid"),
            None
        );
        assert_eq!(session_from_cookie_header(""), None);
    }

    #[test]
    fn session_cookie_round_trips_and_marks_secure() {
        let id = SessionId::generate();
        let cookie = session_cookie(id, false);
        assert!(cookie.starts_with(&format!("loan_session={id};")));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));
        assert!(session_cookie(id, true).ends_with("; Secure"));

        let value = cookie.split(';').next().expect("name=value pair");
        assert_eq!(session_from_cookie_header(value), Some(id));
    }
}
