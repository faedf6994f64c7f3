//! [`Identity`] definitions.

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Debug, Display, From, Into};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};

/// Authenticated user's profile, as returned by the authentication endpoints.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "IdentityRepr")]
pub struct Identity {
    /// ID of this [`Identity`].
    pub id: Id,

    /// [`Email`] of this [`Identity`].
    pub email: Email,

    /// Display [`Name`] of this [`Identity`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,

    /// [`Role`] of this [`Identity`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Identity {
    /// Returns the name this [`Identity`] should be displayed with.
    ///
    /// Falls back to the [`Email`] if no [`Name`] is known.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) => name.as_ref(),
            None => self.email.as_ref(),
        }
    }
}

/// Wire shape of an [`Identity`].
///
/// Servers may send any combination of `name`, `display_name`, `full_name`
/// and `username`. The first present one, in that order, wins.
#[derive(Deserialize)]
struct IdentityRepr {
    id: Id,
    email: Email,
    #[serde(default)]
    name: Option<Name>,
    #[serde(default)]
    display_name: Option<Name>,
    #[serde(default)]
    full_name: Option<Name>,
    #[serde(default)]
    username: Option<Name>,
    #[serde(default)]
    role: Option<Role>,
}

impl From<IdentityRepr> for Identity {
    fn from(repr: IdentityRepr) -> Self {
        let name = repr
            .name
            .or(repr.display_name)
            .or(repr.full_name)
            .or(repr.username);
        Self {
            id: repr.id,
            email: repr.email,
            name,
            role: repr.role,
        }
    }
}

/// ID of an [`Identity`].
///
/// Opaque to the client: it is whatever the server assigns.
#[derive(
    AsRef,
    Clone,
    Debug,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Id(String);

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        /// Either a string or an integer ID.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            UInt(u64),
            Int(i64),
        }

        Ok(Self(match Repr::deserialize(deserializer)? {
            Repr::Str(s) => s,
            Repr::UInt(n) => n.to_string(),
            Repr::Int(n) => n.to_string(),
        }))
    }
}

/// Display name of an [`Identity`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[as_ref(str, String)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        !name.trim().is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

impl TryFrom<String> for Name {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

/// Role of an [`Identity`].
///
/// Roles are assigned and interpreted by the server (`admin`, `operator`,
/// `viewer`, `compliance`, `security`), so any value is accepted.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
#[serde(transparent)]
pub struct Role(String);

/// Email address of an [`Identity`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq, Serialize)]
#[as_ref(str, String)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                "^([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                  |\\x5c[\\x00-\\x7f])*\\x22)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x22([^\\x0d\\x22\\x5c\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x22))*\\x40\
                  ([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                     \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                  |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d)\
                  (\\x2e([^\\x00-\\x20\\x22\\x28\\x29\\x2c\\x2e\\x3a-\
                           \\x3c\\x3e\\x40\\x5b-\\x5d\\x7f-\\xff]+\
                        |\\x5b([^\\x0d\\x5b-\\x5d\\x80-\\xff]\
                        |\\x5c[\\x00-\\x7f])*\\x5d))*$",
            )
            .expect("valid regex")
        });

        REGEX.is_match(address.as_ref())
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl TryFrom<String> for Email {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .try_into()
            .map_err(serde::de::Error::custom)
    }
}

/// Password of a user, never displayed.
#[derive(AsRef, Clone, Debug, Eq, PartialEq)]
#[as_ref(str)]
#[debug("Password(***)")]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        !password.is_empty() && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod spec {
    use super::{Email, Identity, Password};

    #[test]
    fn validates_email() {
        assert!(Email::new("u@example.com").is_some());
        assert!(Email::new("first.last@sub.example.org").is_some());

        assert!(Email::new("").is_none());
        assert!(Email::new("u@").is_none());
        assert!(Email::new("no-at-sign").is_none());
        assert!(Email::new("two@@example.com").is_none());
    }

    #[test]
    fn hides_password_in_debug() {
        let password = Password::new("hunter2").unwrap();

        assert_eq!(format!("{password:?}"), "Password(***)");
        assert!(Password::new("").is_none());
        assert!(Password::new("x".repeat(129)).is_none());
    }

    #[test]
    fn deserializes_identity_with_optional_fields() {
        let identity: Identity =
            serde_json::from_str(r#"{"id":"1","email":"u@example.com"}"#)
                .unwrap();

        assert_eq!(identity.id.as_ref(), "1");
        assert_eq!(identity.email.to_string(), "u@example.com");
        assert!(identity.name.is_none());
        assert!(identity.role.is_none());
        assert_eq!(identity.display_name(), "u@example.com");
    }

    #[test]
    fn accepts_server_name_aliases() {
        let identity: Identity = serde_json::from_str(
            r#"{
                "id": "5f0c",
                "email": "ops@example.com",
                "username": "ops",
                "role": "operator",
                "is_active": true
            }"#,
        )
        .unwrap();

        assert_eq!(identity.display_name(), "ops");
        assert_eq!(identity.role.unwrap().as_ref(), "operator");
    }

    #[test]
    fn picks_one_name_when_several_aliases_are_sent() {
        let identity: Identity = serde_json::from_str(
            r#"{
                "id": "1",
                "email": "u@example.com",
                "username": "u",
                "full_name": "U Ser",
                "role": "admin"
            }"#,
        )
        .unwrap();

        assert_eq!(identity.display_name(), "U Ser");
        assert_eq!(identity.role.unwrap().as_ref(), "admin");

        let identity: Identity = serde_json::from_str(
            r#"{"id":"1","email":"u@example.com","name":"N","username":"u"}"#,
        )
        .unwrap();
        assert_eq!(identity.display_name(), "N");
    }

    #[test]
    fn accepts_numeric_id() {
        let identity: Identity =
            serde_json::from_str(r#"{"id":1,"email":"u@example.com"}"#)
                .unwrap();

        assert_eq!(identity.id.as_ref(), "1");
        assert!(serde_json::from_str::<Identity>(
            r#"{"id":true,"email":"u@example.com"}"#,
        )
        .is_err());
    }

    #[test]
    fn serializes_name_under_canonical_key() {
        let identity: Identity = serde_json::from_str(
            r#"{"id":"1","email":"u@example.com","display_name":"D"}"#,
        )
        .unwrap();

        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["name"], "D");
        assert_eq!(
            serde_json::from_value::<Identity>(json).unwrap(),
            identity,
        );
    }

    #[test]
    fn rejects_invalid_email_on_deserialization() {
        assert!(serde_json::from_str::<Identity>(
            r#"{"id":"1","email":"not-an-email"}"#,
        )
        .is_err());
    }
}
