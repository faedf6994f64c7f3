//! [`Notification`] definitions.

use std::collections::VecDeque;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use uuid::Uuid;

/// Transient, client-local message describing an application or system
/// event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    /// ID of this [`Notification`].
    pub id: Id,

    /// [`Kind`] of this [`Notification`].
    pub kind: Kind,

    /// [`Title`] of this [`Notification`].
    pub title: Title,

    /// [`Message`] of this [`Notification`].
    pub message: Message,

    /// Indicator whether this [`Notification`] has been read.
    pub is_read: bool,

    /// [`DateTime`] when this [`Notification`] was created.
    pub created_at: CreationDateTime,
}

impl Notification {
    /// Creates a new unread [`Notification`] with a fresh [`Id`].
    #[must_use]
    pub fn new(kind: Kind, title: Title, message: Message) -> Self {
        Self {
            id: Id::new(),
            kind,
            title,
            message,
            is_read: false,
            created_at: CreationDateTime::now(),
        }
    }
}

/// ID of a [`Notification`].
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

define_kind! {
    #[doc = "Kind of a [`Notification`], affecting its presentation only."]
    enum Kind {
        #[doc = "Neutral information."]
        Info = 1,

        #[doc = "Successfully finished action."]
        Success = 2,

        #[doc = "Something requiring attention."]
        Warning = 3,

        #[doc = "Failed action."]
        Error = 4,
    }
}

/// Title of a [`Notification`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str)]
#[from(&str, String)]
pub struct Title(String);

/// Message of a [`Notification`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str)]
#[from(&str, String)]
pub struct Message(String);

/// [`DateTime`] when a [`Notification`] was created.
pub type CreationDateTime = DateTimeOf<(Notification, unit::Creation)>;

/// Ordered collection of [`Notification`]s, most recent first.
///
/// The number of unread [`Notification`]s is always computed from the
/// collection itself, so it cannot drift from it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Log(VecDeque<Notification>);

impl Log {
    /// Inserts the provided [`Notification`] in front of this [`Log`].
    pub fn push(&mut self, notification: Notification) {
        self.0.push_front(notification);
    }

    /// Marks the [`Notification`] with the provided [`Id`] as read.
    ///
    /// Returns `false` if there is no such unread [`Notification`].
    pub fn mark_as_read(&mut self, id: Id) -> bool {
        self.0
            .iter_mut()
            .find(|n| n.id == id && !n.is_read)
            .map(|n| n.is_read = true)
            .is_some()
    }

    /// Removes all the [`Notification`]s from this [`Log`].
    ///
    /// Returns `false` if this [`Log`] was empty already.
    pub fn clear(&mut self) -> bool {
        let was_empty = self.0.is_empty();
        self.0.clear();
        !was_empty
    }

    /// Returns the [`Notification`] with the provided [`Id`], if any.
    #[must_use]
    pub fn get(&self, id: Id) -> Option<&Notification> {
        self.0.iter().find(|n| n.id == id)
    }

    /// Iterates over [`Notification`]s, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.0.iter()
    }

    /// Returns the number of [`Notification`]s in this [`Log`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether this [`Log`] has no [`Notification`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Counts the unread [`Notification`]s in this [`Log`].
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.0.iter().filter(|n| !n.is_read).count()
    }
}

#[cfg(test)]
mod spec {
    use super::{Kind, Log, Notification};

    fn add(log: &mut Log, title: &str) -> super::Id {
        let n = Notification::new(Kind::Info, title.into(), "message".into());
        let id = n.id;
        log.push(n);
        id
    }

    fn titles(log: &Log) -> Vec<String> {
        log.iter().map(|n| n.title.to_string()).collect()
    }

    #[test]
    fn keeps_most_recent_first() {
        let mut log = Log::default();
        let a = add(&mut log, "A");
        let b = add(&mut log, "B");
        let c = add(&mut log, "C");

        assert_eq!(titles(&log), ["C", "B", "A"]);
        assert_eq!(log.unread_count(), 3);

        assert!(log.mark_as_read(b));
        assert_eq!(log.unread_count(), 2);
        assert!(log.get(b).unwrap().is_read);
        assert!(!log.get(a).unwrap().is_read);
        assert!(!log.get(c).unwrap().is_read);
        assert_eq!(titles(&log), ["C", "B", "A"]);
    }

    #[test]
    fn marks_as_read_once() {
        let mut log = Log::default();
        let id = add(&mut log, "A");
        _ = add(&mut log, "B");

        assert!(log.mark_as_read(id));
        assert!(!log.mark_as_read(id));
        assert!(!log.mark_as_read(super::Id::new()));
        assert_eq!(log.unread_count(), 1);
    }

    #[test]
    fn clears_everything() {
        let mut log = Log::default();
        assert!(!log.clear());

        let id = add(&mut log, "A");
        _ = add(&mut log, "B");
        assert!(log.mark_as_read(id));

        assert!(log.clear());
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert_eq!(log.unread_count(), 0);
    }

    #[test]
    fn counts_unread_for_any_sequence() {
        let mut log = Log::default();
        let ids = (0..10).map(|i| add(&mut log, &i.to_string())).collect::<Vec<_>>();

        for (read, id) in ids.iter().step_by(3).enumerate() {
            assert!(log.mark_as_read(*id));
            assert_eq!(log.unread_count(), ids.len() - read - 1);
        }
        assert_eq!(
            log.unread_count(),
            log.iter().filter(|n| !n.is_read).count(),
        );
    }

    #[test]
    fn kind_is_lowercase() {
        assert_eq!(Kind::Warning.to_string(), "warning");
        assert_eq!("error".parse::<Kind>().unwrap(), Kind::Error);
    }
}
