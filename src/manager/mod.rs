//! Aggregation managers, one per backend domain.
//!
//! A manager turns a [`Verified`](crate::Verified) request into one or more
//! backend calls made under the request deadline. Most operations are
//! pass-through; composite resources fan out and merge. Managers only accept
//! a [`Ctx<Authorized>`](crate::Ctx), so they cannot be reached by a request
//! that skipped the organization guard.
//!
//! Backend errors are wrapped in [`BackendFailure`] unchanged in kind.
//! Composite results are all-or-nothing: the first failed call fails the
//! whole operation and nothing partial is returned.

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::timeout_at;

use crate::context::Ctx;
use crate::error::{BackendError, BackendFailure};

mod applications;
mod clusters;
mod devices;
mod inventory;
mod nodes;
mod users;

pub use applications::ApplicationsManager;
pub use clusters::ClustersManager;
pub use devices::DevicesManager;
pub use inventory::InventoryManager;
pub use nodes::NodesManager;
pub use users::UsersManager;

/// Runs one backend call under the request deadline.
pub(crate) async fn call<T, F>(
    ctx: &Ctx,
    operation: &'static str,
    request: F,
) -> Result<T, BackendFailure>
where
    F: Future<Output = Result<T, BackendError>>,
{
    let outcome = match ctx.deadline() {
        Some(deadline) => match timeout_at(deadline, request).await {
            Ok(outcome) => outcome,
            Err(_) => {
                ctx.log()
                    .warn(format_args!("{operation} abandoned: request deadline expired"));
                return Err(BackendFailure::deadline_exceeded(operation));
            }
        },
        None => request.await,
    };

    outcome.map_err(|error| {
        ctx.log().error(format_args!("{operation} failed: {error}"));
        BackendFailure::new(operation, error)
    })
}

/// Issues one call per input concurrently and collects the results in input
/// order.
///
/// Each call runs on its own task. The first failure is returned as soon as
/// it is observed; calls still in flight are detached and their results
/// discarded. The whole phase shares the request deadline.
pub(crate) async fn fan_out<I, T, F, Fut>(
    ctx: &Ctx,
    operation: &'static str,
    inputs: Vec<I>,
    issue: F,
) -> Result<Vec<T>, BackendFailure>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, BackendError>> + Send + 'static,
    T: Send + 'static,
{
    let expected = inputs.len();
    let mut pending: FuturesUnordered<_> = inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let task = tokio::spawn(issue(input));
            async move { (index, task.await) }
        })
        .collect();

    let mut slots: Vec<Option<T>> = (0..expected).map(|_| None).collect();
    let collect = async {
        while let Some((index, joined)) = pending.next().await {
            match joined {
                Ok(Ok(value)) => slots[index] = Some(value),
                Ok(Err(error)) => return Err(error),
                Err(join_error) => {
                    return Err(BackendError::internal(format!(
                        "backend call task failed: {join_error}"
                    )))
                }
            }
        }
        Ok(())
    };

    let outcome = match ctx.deadline() {
        Some(deadline) => match timeout_at(deadline, collect).await {
            Ok(outcome) => outcome,
            Err(_) => {
                ctx.log().warn(format_args!(
                    "{operation} fan-out abandoned: request deadline expired"
                ));
                return Err(BackendFailure::deadline_exceeded(operation));
            }
        },
        None => collect.await,
    };

    if let Err(error) = outcome {
        ctx.log().error(format_args!("{operation} failed: {error}"));
        return Err(BackendFailure::new(operation, error));
    }

    slots
        .into_iter()
        .collect::<Option<Vec<T>>>()
        .ok_or_else(|| BackendFailure::new(operation, BackendError::internal("missing fan-out result")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{sleep, Instant};

    use super::*;
    use crate::error::BackendErrorKind;
    use crate::identity::CallerIdentity;

    fn ctx(deadline: Option<Instant>) -> Ctx {
        Ctx::new_authorized(
            "req-1",
            "test.fan_out",
            CallerIdentity::new("org-1", "alice@example.com"),
            deadline,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn results_keep_input_order() {
        let ctx = ctx(None);
        let delays = vec![30_u64, 10, 20];

        let results = fan_out(&ctx, "delayed", delays, |delay| async move {
            sleep(Duration::from_millis(delay)).await;
            Ok::<_, BackendError>(delay)
        })
        .await
        .expect("all calls succeed");

        assert_eq!(results, vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn first_failure_fails_the_whole_phase() {
        let ctx = ctx(None);

        let failure = fan_out(&ctx, "flaky", vec![1, 2, 3], |n| async move {
            if n == 2 {
                Err(BackendError::unavailable("node backend down"))
            } else {
                Ok(n)
            }
        })
        .await
        .unwrap_err();

        assert_eq!(failure.operation(), "flaky");
        assert_eq!(failure.error().kind(), BackendErrorKind::Unavailable);
    }

    #[tokio::test]
    async fn empty_input_makes_no_calls() {
        let ctx = ctx(None);
        let results: Vec<u32> = fan_out(&ctx, "none", Vec::<u32>::new(), |n| async move {
            Ok::<_, BackendError>(n)
        })
        .await
        .expect("nothing to fail");
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_bounds_the_phase() {
        let ctx = ctx(Some(Instant::now() + Duration::from_millis(50)));

        let failure = fan_out(&ctx, "slow", vec![10_u64, 500], |delay| async move {
            sleep(Duration::from_millis(delay)).await;
            Ok::<_, BackendError>(delay)
        })
        .await
        .unwrap_err();

        assert!(failure.is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn single_call_times_out() {
        let ctx = ctx(Some(Instant::now() + Duration::from_millis(5)));

        let failure = call(&ctx, "get_cluster", async {
            sleep(Duration::from_secs(1)).await;
            Ok::<_, BackendError>(())
        })
        .await
        .unwrap_err();

        assert_eq!(failure.operation(), "get_cluster");
        assert!(failure.is_timeout());
    }

    #[tokio::test]
    async fn single_call_error_is_wrapped_unchanged() {
        let ctx = ctx(None);

        let failure = call(&ctx, "get_user", async {
            Err::<(), _>(BackendError::not_found("user bob@example.com"))
        })
        .await
        .unwrap_err();

        assert_eq!(failure.error().kind(), BackendErrorKind::NotFound);
        assert_eq!(failure.error().message(), "user bob@example.com");
    }
}
