//! [`Context`]-related definitions.

use secrecy::SecretBox;
use service::{
    command::{self, Command as _},
    domain::{self, notification, session::Token, user},
    infra::{api, storage},
    query,
    task::Background,
};
use tracing as log;

use crate::{
    args, config, define_error,
    router::{self, Navigation, Route, Router},
    AsError, Config, Error, Service,
};

/// Application context wiring the [`Service`] with its consumers.
#[derive(Clone, Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// [`Router`] reading the [`Service`] session.
    router: Router,
}

impl Context {
    /// Creates a new [`Context`] out of the provided [`Config`].
    ///
    /// The persisted session is rehydrated before this returns. The returned
    /// [`Background`] must be driven for the session to be persisted.
    ///
    /// # Errors
    ///
    /// Errors if the authentication API client cannot be initialized.
    pub async fn new(config: Config) -> Result<(Self, Background), Error> {
        let Config {
            api: api_conf,
            storage: st,
            ..
        } = config;

        let key = storage::Key::new(st.key)
            .ok_or_else(|| Error::from(InputError::InvalidStorageKey))?;
        let backend = match st.backend {
            config::StorageBackend::File => {
                storage::Backend::from(storage::File::new(st.dir))
            }
            config::StorageBackend::Memory => {
                storage::Backend::from(storage::Memory::new())
            }
        };
        let http = api::Http::new(api_conf.into()).map_err(AsError::into_error)?;

        let (service, bg) = Service::new(
            service::Config { storage_key: key },
            backend,
            http,
        )
        .await;
        let router = Router::new(service.session().clone());

        Ok((Self { service, router }, bg))
    }

    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns [`Router`] of this [`Context`].
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Runs the provided [`args::Command`], reporting its outcome as a
    /// [`domain::Notification`].
    ///
    /// # Errors
    ///
    /// Errors if the [`args::Command`] fails.
    pub async fn run(&self, cmd: args::Command) -> Result<(), Error> {
        let outcome = match cmd {
            args::Command::Login { email, password } => {
                self.login(&email, password).await
            }
            args::Command::Logout => self.logout().await,
            args::Command::Status => self.status().await,
            args::Command::Restore { token } => self.restore(&token).await,
            args::Command::Open { path } => self.open(&path),
        };

        let (kind, title, message) = match &outcome {
            Ok((kind, message)) => (*kind, "Done", message.clone()),
            Err(e) => (notification::Kind::Error, e.code, e.message.clone()),
        };
        self.notify(kind, title, message).await;

        outcome.map(drop)
    }

    /// Logs every unread [`domain::Notification`], oldest first, and marks
    /// them as read.
    pub async fn flush_notifications(&self) {
        let all = self
            .service
            .execute(query::notifications::All)
            .await
            .unwrap_or_else(|e| match e {});
        for n in all.into_iter().rev().filter(|n| !n.is_read) {
            match n.kind {
                notification::Kind::Error => {
                    log::error!("{}: {}", n.title, n.message);
                }
                notification::Kind::Warning => {
                    log::warn!("{}: {}", n.title, n.message);
                }
                notification::Kind::Info | notification::Kind::Success => {
                    log::info!("{}: {}", n.title, n.message);
                }
            }
            _ = self
                .service
                .execute(command::MarkNotificationAsRead { id: n.id })
                .await;
        }
    }

    /// Adds a new [`domain::Notification`].
    async fn notify(
        &self,
        kind: notification::Kind,
        title: &str,
        message: String,
    ) {
        _ = self
            .service
            .execute(command::AddNotification {
                kind,
                title: title.into(),
                message: message.into(),
            })
            .await;
    }

    /// Authenticates with the provided credentials.
    async fn login(&self, email: &str, password: String) -> Outcome {
        let email = email
            .parse::<user::Email>()
            .map_err(|_| Error::from(InputError::InvalidEmail))?;
        let password = user::Password::new(password)
            .ok_or_else(|| Error::from(InputError::InvalidPassword))?;

        let session = self
            .service
            .execute(command::Login {
                email,
                password: SecretBox::new(Box::new(password)),
            })
            .await
            .map_err(AsError::into_error)?;

        Ok((
            notification::Kind::Success,
            format!("Logged in as {}", display_name(&session)),
        ))
    }

    /// Ends the current session.
    async fn logout(&self) -> Outcome {
        self.service
            .execute(command::Logout)
            .await
            .unwrap_or_else(|e| match e {});
        Ok((notification::Kind::Success, "Logged out".to_owned()))
    }

    /// Describes the current session.
    async fn status(&self) -> Outcome {
        let session = self
            .service
            .execute(query::session::Current)
            .await
            .unwrap_or_else(|e| match e {});
        let message = match &session {
            domain::Session::Authenticated(a) => format!(
                "Authenticated as {} since {}",
                a.identity.display_name(),
                a.authenticated_at,
            ),
            domain::Session::LoggedOut => "Not authenticated".to_owned(),
        };
        Ok((notification::Kind::Info, message))
    }

    /// Restores the session from the provided `token`.
    async fn restore(&self, token: &str) -> Outcome {
        let token = Token::new(token)
            .ok_or_else(|| Error::from(InputError::InvalidToken))?;

        let session = self
            .service
            .execute(command::RestoreSession { token })
            .await
            .map_err(AsError::into_error)?;

        Ok((
            notification::Kind::Success,
            format!("Restored session of {}", display_name(&session)),
        ))
    }

    /// Navigates to the provided `path`.
    fn open(&self, path: &str) -> Outcome {
        let route = path.parse::<Route>().map_err(AsError::into_error)?;
        Ok(match self.router.navigate(route) {
            Navigation::Proceed(r) => {
                (notification::Kind::Success, format!("Opened `{r}`"))
            }
            Navigation::Redirect(r) => (
                notification::Kind::Warning,
                format!("Authentication required, redirected to `{r}`"),
            ),
        })
    }
}

/// Outcome of a [`Context::run()`] step: [`notification::Kind`] and message
/// to report.
type Outcome = Result<(notification::Kind, String), Error>;

/// Returns the display name of the authenticated [`domain::Session`].
fn display_name(session: &domain::Session) -> &str {
    session.identity().map_or("nobody", domain::Identity::display_name)
}

impl AsError for router::ParseError {
    fn try_as_error(&self) -> Option<Error> {
        Some(InputError::InvalidRoute.into())
    }
}

define_error! {
    enum InputError {
        #[code = "INVALID_EMAIL"]
        #[message = "Email is invalid"]
        InvalidEmail,

        #[code = "INVALID_PASSWORD"]
        #[message = "Password must be non-empty and at most 128 characters"]
        InvalidPassword,

        #[code = "MALFORMED_TOKEN"]
        #[message = "Token must be non-empty and contain no whitespace"]
        InvalidToken,

        #[code = "INVALID_ROUTE"]
        #[message = "Navigation target must be an absolute path"]
        InvalidRoute,

        #[code = "INVALID_STORAGE_KEY"]
        #[message = "Storage key contains unsupported characters"]
        InvalidStorageKey,
    }
}

#[cfg(test)]
mod spec {
    use service::{
        command::{Command as _, SetIdentity},
        domain::{notification, session::Token, Identity},
    };

    use crate::{args::Command, config, Config};

    use super::Context;

    async fn context() -> Context {
        let mut config = Config::default();
        config.storage.backend = config::StorageBackend::Memory;
        // Nothing listens here, so every request fails to connect.
        config.api.base_url = "http://127.0.0.1:9".to_owned();

        let (ctx, _bg) = Context::new(config).await.unwrap();
        ctx
    }

    fn last(ctx: &Context) -> (notification::Kind, String) {
        let log = ctx.service().notifications().get();
        let n = log.iter().next().unwrap();
        (n.kind, n.message.to_string())
    }

    #[tokio::test]
    async fn redirects_guarded_route_when_logged_out() {
        let ctx = context().await;

        ctx.run(Command::Open {
            path: "/companies".into(),
        })
        .await
        .unwrap();

        let (kind, message) = last(&ctx);
        assert_eq!(kind, notification::Kind::Warning);
        assert!(message.contains("`/login`"), "{message}");
    }

    #[tokio::test]
    async fn opens_guarded_route_when_authenticated() {
        let ctx = context().await;
        _ = ctx
            .service()
            .execute(SetIdentity {
                identity: Identity {
                    id: "1".into(),
                    email: "u@example.com".parse().unwrap(),
                    name: None,
                    role: None,
                },
                token: Token::new("tok").unwrap(),
            })
            .await
            .unwrap();

        ctx.run(Command::Open {
            path: "/companies/5".into(),
        })
        .await
        .unwrap();

        let (kind, message) = last(&ctx);
        assert_eq!(kind, notification::Kind::Success);
        assert!(message.contains("`/companies/5`"), "{message}");

        ctx.run(Command::Logout).await.unwrap();
        ctx.run(Command::Status).await.unwrap();
        assert_eq!(last(&ctx).1, "Not authenticated");
    }

    #[tokio::test]
    async fn reports_invalid_input() {
        let ctx = context().await;

        let err = ctx
            .run(Command::Login {
                email: "not-an-email".into(),
                password: "pw".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, "INVALID_EMAIL");
        assert_eq!(last(&ctx).0, notification::Kind::Error);
        assert_eq!(ctx.service().notifications().unread_count(), 1);
    }

    #[tokio::test]
    async fn reports_unreachable_api() {
        let ctx = context().await;

        let err = ctx
            .run(Command::Login {
                email: "u@example.com".into(),
                password: "pw".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, "AUTHENTICATION_UNAVAILABLE");
        assert!(!ctx.service().session().get().is_authenticated());
    }

    #[tokio::test]
    async fn flushes_notifications_as_read() {
        let ctx = context().await;
        ctx.run(Command::Status).await.unwrap();
        ctx.run(Command::Logout).await.unwrap();
        assert_eq!(ctx.service().notifications().unread_count(), 2);

        ctx.flush_notifications().await;

        assert_eq!(ctx.service().notifications().unread_count(), 0);
        assert_eq!(ctx.service().notifications().get().len(), 2);
    }
}
