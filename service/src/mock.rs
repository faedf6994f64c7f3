//! Test doubles of the [`Service`] infrastructure.

use std::{
    future::{Future, IntoFuture as _},
    io,
    pin::pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use common::operations::{By, Insert, Perform, Select};
use futures::future::{self, Either};
use secrecy::{ExposeSecret as _, SecretBox};
use tokio::sync::{watch, Notify};
use tracerr::Traced;

use crate::{
    command,
    domain::{session::Token, Identity},
    infra::{
        api,
        storage::{self, Memory},
    },
    task::Background,
    Config, Service,
};

/// [`Service`] backed by the test doubles.
pub(crate) type TestService = Service<Memory, Api>;

/// Authentication API accepting `u@example.com` / `pw` only.
#[derive(Clone, Debug, Default)]
pub(crate) struct Api {
    /// Number of requests received so far.
    calls: Arc<AtomicUsize>,

    /// If set, every response waits for a permit of it.
    gate: Option<Arc<Notify>>,
}

impl Api {
    /// Creates a new [`Api`] holding every response until the returned
    /// [`Notify`] is notified.
    pub(crate) fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let api = Self {
            calls: Arc::default(),
            gate: Some(Arc::clone(&gate)),
        };
        (api, gate)
    }

    /// Returns the number of requests received so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Counts a request and waits for the gate, if any.
    async fn receive(&self) {
        _ = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

/// Storage failing every read and write.
#[derive(Clone, Debug)]
pub(crate) struct FailingStorage {
    /// Number of attempted writes so far.
    writes: Arc<watch::Sender<usize>>,
}

impl FailingStorage {
    /// Creates a new [`FailingStorage`].
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            writes: Arc::new(tx),
        }
    }

    /// Subscribes to the number of attempted writes.
    pub(crate) fn subscribe(&self) -> watch::Receiver<usize> {
        self.writes.subscribe()
    }

    /// Error every operation fails with.
    fn error() -> Traced<storage::Error> {
        tracerr::new!(storage::Error::Io(io::Error::other("unavailable")))
    }
}

impl storage::Storage<Select<By<Option<String>, storage::Key>>>
    for FailingStorage
{
    type Ok = Option<String>;
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        _: Select<By<Option<String>, storage::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Err(Self::error())
    }
}

impl storage::Storage<Insert<storage::Entry>> for FailingStorage {
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        _: Insert<storage::Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        self.writes.send_modify(|n| *n += 1);
        Err(Self::error())
    }
}

/// The only [`Identity`] known to the [`Api`].
pub(crate) fn identity() -> Identity {
    serde_json::from_str(r#"{"id":"1","email":"u@example.com"}"#).unwrap()
}

/// [`command::Login`] with the provided credentials.
pub(crate) fn login(email: &str, password: &str) -> command::Login {
    command::Login {
        email: email.parse().unwrap(),
        password: SecretBox::new(Box::new(password.parse().unwrap())),
    }
}

impl api::Api<Perform<api::Credentials>> for Api {
    type Ok = api::Authenticated;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Perform(credentials): Perform<api::Credentials>,
    ) -> Result<Self::Ok, Self::Err> {
        self.receive().await;

        let password: &str = credentials.password.expose_secret().as_ref();
        if credentials.email.to_string() != "u@example.com" || password != "pw"
        {
            return Err(tracerr::new!(api::Error::Rejected(
                http::StatusCode::UNAUTHORIZED
            )));
        }
        Ok(api::Authenticated {
            access_token: Token::new("tok").unwrap(),
            user: identity(),
        })
    }
}

impl api::Api<Select<By<Identity, Token>>> for Api {
    type Ok = Identity;
    type Err = Traced<api::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Identity, Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.receive().await;

        if by.inner().as_ref() == "tok" {
            Ok(identity())
        } else {
            Err(tracerr::new!(api::Error::Rejected(
                http::StatusCode::UNAUTHORIZED
            )))
        }
    }
}

/// Creates a new [`TestService`] on top of the provided [`Memory`] storage.
pub(crate) async fn service(
    storage: Memory,
    api: Api,
) -> (TestService, Background) {
    Service::new(Config::default(), storage, api).await
}

/// Runs the provided `test` while driving the [`Background`] tasks.
pub(crate) async fn with_background<F: Future>(
    bg: Background,
    test: F,
) -> F::Output {
    match future::select(pin!(test), bg.into_future()).await {
        Either::Left((out, _)) => out,
        Either::Right((res, _)) => panic!("`Background` stopped: {res:?}"),
    }
}

