//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Error of a [`Task`] running in the [`Background`].
type TaskError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s on the current thread.
///
/// Nothing runs until the [`Background`] is awaited, which resolves once any
/// of its [`Task`]s fails.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set the [`Task`]s are spawned on.
    set: task::LocalSet,

    /// Named handles of the spawned [`Task`]s.
    handles: Vec<(&'static str, task::JoinHandle<Result<(), TaskError>>)>,
}

impl Background {
    /// Spawns a new named [`Task`] inside the [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        let handle = self
            .set
            .spawn_local(async move { future.await.map_err(TaskError::from) });
        self.handles.push((name, handle));
    }
}

impl IntoFuture for Background {
    type Output = Result<(), TaskError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        let tasks = handles.into_iter().map(|(name, handle)| {
            handle
                .map(move |res| {
                    res.map_err(TaskError::from).and_then(|r| r).inspect_err(
                        |e| log::error!("`{name}` background task failed: {e}"),
                    )
                })
                .boxed_local()
        });
        async move {
            set.run_until(future::try_join_all(tasks)).await.map(drop)
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod spec {
    use std::future::IntoFuture as _;

    use derive_more::{Display, Error};

    use super::Background;

    #[derive(Debug, Display, Error)]
    #[display("failure")]
    struct Failure;

    #[tokio::test]
    async fn resolves_once_all_tasks_succeed() {
        let mut bg = Background::default();
        bg.spawn("first", async { Ok::<_, Failure>(()) });
        bg.spawn("second", async { Ok::<_, Failure>(()) });

        assert!(bg.into_future().await.is_ok());
    }

    #[tokio::test]
    async fn fails_once_any_task_fails() {
        let mut bg = Background::default();
        bg.spawn("ok", async { Ok::<_, Failure>(()) });
        bg.spawn("failing", async { Err(Failure) });

        let err = bg.await.unwrap_err();

        assert_eq!(err.to_string(), "failure");
    }
}
