//! [`Session`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Debug, Display, Error, From};
use serde::{Deserialize, Serialize};

use super::user::Identity;

/// Client-side record of the current authenticated [`Identity`].
///
/// An [`Identity`] and its [`Token`] are either both present or both absent,
/// so the authentication state can never be observed half-applied.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Session {
    /// No [`Identity`] is authenticated.
    #[default]
    LoggedOut,

    /// An [`Identity`] is authenticated.
    Authenticated(Authenticated),
}

impl Session {
    /// Creates a new [`Session::Authenticated`] starting now.
    #[must_use]
    pub fn authenticated(identity: Identity, token: Token) -> Self {
        Self::Authenticated(Authenticated {
            identity,
            token,
            authenticated_at: AuthenticationDateTime::now(),
        })
    }

    /// Indicates whether this [`Session`] is authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Returns the authenticated [`Identity`], if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(a) => Some(&a.identity),
            Self::LoggedOut => None,
        }
    }

    /// Returns the credential [`Token`], if any.
    #[must_use]
    pub fn token(&self) -> Option<&Token> {
        match self {
            Self::Authenticated(a) => Some(&a.token),
            Self::LoggedOut => None,
        }
    }
}

/// State of an authenticated [`Session`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Authenticated {
    /// Authenticated [`Identity`].
    pub identity: Identity,

    /// Credential [`Token`] of the [`Identity`].
    pub token: Token,

    /// [`DateTime`] when the [`Identity`] has been authenticated.
    pub authenticated_at: AuthenticationDateTime,
}

/// [`DateTime`] of a [`Session`] authentication.
pub type AuthenticationDateTime = DateTimeOf<(Session, unit::Authentication)>;

/// Opaque credential token of a [`Session`].
#[derive(AsRef, Clone, Debug, Eq, PartialEq, Serialize)]
#[as_ref(str)]
#[debug("Token(***)")]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Creates a new [`Token`] if the given `token` is valid.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        Self::check(&token).then_some(Self(token))
    }

    /// Checks whether the given `token` is a valid [`Token`].
    fn check(token: impl AsRef<str>) -> bool {
        let token = token.as_ref();
        !token.is_empty() && !token.contains(char::is_whitespace)
    }
}

impl FromStr for Token {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Token`")
    }
}

impl TryFrom<String> for Token {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `Token`")
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

/// Persisted form of a [`Session`].
///
/// Encoded as `{"state":{..},"version":0}` JSON.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Snapshot {
    /// Persisted [`Session`] fields.
    state: SnapshotState,

    /// Format version of this [`Snapshot`].
    version: u32,
}

/// Persisted [`Session`] fields.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotState {
    /// Authenticated [`Identity`].
    user: Option<Identity>,

    /// Credential [`Token`].
    token: Option<Token>,

    /// Whether the [`Session`] is authenticated.
    is_authenticated: bool,

    /// [`DateTime`] of the authentication.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "common::datetime::serde::rfc3339::option"
    )]
    authenticated_at: Option<AuthenticationDateTime>,
}

impl Snapshot {
    /// Current format version of a [`Snapshot`].
    pub const VERSION: u32 = 0;

    /// Encodes this [`Snapshot`] as a JSON string.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("`Snapshot` is always serializable")
    }

    /// Decodes a [`Snapshot`] from the provided JSON string.
    ///
    /// # Errors
    ///
    /// Errors if the `raw` string is not a well-formed [`Snapshot`] of the
    /// current [`Snapshot::VERSION`], or its fields contradict each other.
    pub fn from_json(raw: &str) -> Result<Self, DecodeError> {
        use DecodeError as E;

        let snapshot = serde_json::from_str::<Self>(raw).map_err(E::Json)?;
        if snapshot.version != Self::VERSION {
            return Err(E::UnsupportedVersion(snapshot.version));
        }

        let SnapshotState {
            user,
            token,
            is_authenticated,
            ..
        } = &snapshot.state;
        match (user, token, is_authenticated) {
            (Some(_), Some(_), true) | (None, None, false) => Ok(snapshot),
            _ => Err(E::Inconsistent),
        }
    }
}

impl From<&Session> for Snapshot {
    fn from(session: &Session) -> Self {
        let state = match session {
            Session::LoggedOut => SnapshotState {
                user: None,
                token: None,
                is_authenticated: false,
                authenticated_at: None,
            },
            Session::Authenticated(a) => SnapshotState {
                user: Some(a.identity.clone()),
                token: Some(a.token.clone()),
                is_authenticated: true,
                authenticated_at: Some(a.authenticated_at),
            },
        };
        Self {
            state,
            version: Self::VERSION,
        }
    }
}

impl From<Snapshot> for Session {
    fn from(snapshot: Snapshot) -> Self {
        let SnapshotState {
            user,
            token,
            authenticated_at,
            ..
        } = snapshot.state;
        match (user, token) {
            (Some(identity), Some(token)) => {
                Self::Authenticated(Authenticated {
                    identity,
                    token,
                    // Snapshots written without the moment of authentication
                    // are treated as authenticated on rehydration.
                    authenticated_at: authenticated_at
                        .unwrap_or_else(AuthenticationDateTime::now),
                })
            }
            _ => Self::LoggedOut,
        }
    }
}

/// Error of decoding a [`Snapshot`].
#[derive(Debug, Display, Error, From)]
pub enum DecodeError {
    /// [`Snapshot`] is not a valid JSON of the expected shape.
    #[display("Malformed `Snapshot` JSON: {_0}")]
    Json(serde_json::Error),

    /// [`Snapshot`] has an unknown format version.
    #[display("Unsupported `Snapshot` version: {_0}")]
    #[from(ignore)]
    UnsupportedVersion(#[error(not(source))] u32),

    /// [`Snapshot`] fields contradict each other.
    #[display("`Snapshot` fields are inconsistent")]
    Inconsistent,
}

#[cfg(test)]
mod spec {
    use super::{DecodeError, Session, Snapshot, Token};
    use crate::domain::user::Identity;

    fn identity() -> Identity {
        serde_json::from_str(
            r#"{"id":"1","email":"u@example.com","name":"User","role":"admin"}"#,
        )
        .unwrap()
    }

    #[test]
    fn derives_authentication_from_both_fields() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert!(session.token().is_none());

        let session =
            Session::authenticated(identity(), Token::new("tok").unwrap());
        assert!(session.is_authenticated());
        assert_eq!(session.identity(), Some(&identity()));
        assert_eq!(session.token().map(AsRef::as_ref), Some("tok"));
    }

    #[test]
    fn hides_token_in_debug() {
        let token = Token::new("secret-value").unwrap();

        assert_eq!(format!("{token:?}"), "Token(***)");
        assert!(Token::new("").is_none());
        assert!(Token::new("has space").is_none());
    }

    #[test]
    fn restores_authenticated_snapshot() {
        let session =
            Session::authenticated(identity(), Token::new("tok").unwrap());

        let json = Snapshot::from(&session).to_json();
        let restored = Session::from(Snapshot::from_json(&json).unwrap());

        assert_eq!(restored, session);
    }

    #[test]
    fn restores_logged_out_snapshot() {
        let json = Snapshot::from(&Session::LoggedOut).to_json();

        assert_eq!(
            json,
            r#"{"state":{"user":null,"token":null,"isAuthenticated":false},"version":0}"#,
        );
        assert_eq!(
            Session::from(Snapshot::from_json(&json).unwrap()),
            Session::LoggedOut,
        );
    }

    #[test]
    fn accepts_snapshot_without_authentication_moment() {
        let json = r#"{
            "state": {
                "user": {"id": "1", "email": "u@example.com"},
                "token": "tok",
                "isAuthenticated": true
            },
            "version": 0
        }"#;

        let session = Session::from(Snapshot::from_json(json).unwrap());

        assert!(session.is_authenticated());
        assert_eq!(session.token().map(AsRef::as_ref), Some("tok"));
    }

    #[test]
    fn rejects_malformed_snapshots() {
        assert!(matches!(
            Snapshot::from_json("{not json"),
            Err(DecodeError::Json(_)),
        ));
        assert!(matches!(
            Snapshot::from_json(
                r#"{"state":{"user":null,"token":null,"isAuthenticated":false},"version":7}"#,
            ),
            Err(DecodeError::UnsupportedVersion(7)),
        ));
        assert!(matches!(
            Snapshot::from_json(
                r#"{"state":{"user":null,"token":"tok","isAuthenticated":true},"version":0}"#,
            ),
            Err(DecodeError::Inconsistent),
        ));
        assert!(matches!(
            Snapshot::from_json(
                r#"{"state":{"user":{"id":"1","email":"u@example.com"},"token":"tok","isAuthenticated":false},"version":0}"#,
            ),
            Err(DecodeError::Inconsistent),
        ));
    }
}
