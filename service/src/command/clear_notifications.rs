//! [`Command`] for removing all the [`Notification`]s.

use std::convert::Infallible;

use tracing as log;

#[cfg(doc)]
use crate::domain::Notification;
use crate::Service;

use super::Command;

/// [`Command`] for removing all the [`Notification`]s.
#[derive(Clone, Copy, Debug)]
pub struct ClearNotifications;

impl<St, Cl> Command<ClearNotifications> for Service<St, Cl> {
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        _: ClearNotifications,
    ) -> Result<Self::Ok, Self::Err> {
        self.notifications().modify(|log| log.clear());
        log::debug!("`Notification`s cleared");
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{AddNotification, Command as _},
        domain::notification,
        infra::storage::Memory,
        mock,
    };

    use super::ClearNotifications;

    #[tokio::test]
    async fn removes_everything() {
        let (svc, _bg) =
            mock::service(Memory::new(), mock::Api::default()).await;
        for title in ["A", "B"] {
            _ = svc
                .execute(AddNotification {
                    kind: notification::Kind::Warning,
                    title: title.into(),
                    message: "m".into(),
                })
                .await
                .unwrap();
        }

        svc.execute(ClearNotifications).await.unwrap();

        assert!(svc.notifications().get().is_empty());
        assert_eq!(svc.notifications().unread_count(), 0);

        svc.execute(ClearNotifications).await.unwrap();
        assert!(svc.notifications().get().is_empty());
    }
}
