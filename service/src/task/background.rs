//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Result of a [`Task`] spawned into a [`Background`].
type Outcome = Result<(), Box<dyn Error + 'static>>;

/// Background environment for running [`Task`]s on the current thread.
///
/// Does nothing until awaited.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set of tasks.
    set: task::LocalSet,

    /// Names and handles of spawned tasks.
    handles: Vec<(&'static str, task::JoinHandle<Outcome>)>,
}

impl Background {
    /// Spawns a new named [`Task`] inside the [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        let handle = self.set.spawn_local(future.map_err(move |e| {
            log::error!("`{name}` task failed: {e}");
            Box::<dyn Error + 'static>::from(Box::new(e))
        }));
        self.handles.push((name, handle));
    }
}

impl IntoFuture for Background {
    type Output = Outcome;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        future::try_join_all(iter::once(set.map(Ok).boxed_local()).chain(
            handles.into_iter().map(|(name, h)| {
                h.map(move |r| match r {
                    Ok(Ok(())) => {
                        log::debug!("`{name}` task finished");
                        Ok(())
                    }
                    Ok(Err(e)) => Err(e),
                    Err(e) => {
                        Err(Box::<dyn Error + 'static>::from(Box::new(e)))
                    }
                })
                .boxed_local()
            }),
        ))
        .map_ok(drop)
        .boxed_local()
    }
}

#[cfg(test)]
mod spec {
    use std::{fmt, future::IntoFuture as _};

    use super::Background;

    #[derive(Debug)]
    struct Failed;

    impl fmt::Display for Failed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("failed")
        }
    }

    impl std::error::Error for Failed {}

    #[tokio::test]
    async fn completes_once_all_tasks_finish() {
        let mut bg = Background::default();
        bg.spawn("first", async { Ok::<_, Failed>(()) });
        bg.spawn("second", async {
            tokio::task::yield_now().await;
            Ok::<_, Failed>(())
        });
        bg.into_future().await.unwrap();
    }

    #[tokio::test]
    async fn reports_failed_task() {
        let mut bg = Background::default();
        bg.spawn("failing", async { Err(Failed) });

        let err = bg.into_future().await.unwrap_err();
        assert_eq!(err.to_string(), "failed");
    }
}
