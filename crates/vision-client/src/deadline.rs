//! First-to-settle deadline race
//!
//! [`first_settled`] polls a piece of work and a timer together. Whichever
//! completes first decides the outcome and the other future is dropped.
//! Dropping an in-flight HTTP request abandons it: its eventual result is
//! discarded, nothing is sent upstream to cancel it.
//!
//! The race itself only needs `futures`; [`with_deadline`] supplies a tokio
//! timer.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures::future::{self, Either};
use thiserror::Error;

use crate::error::ClientError;

/// The timer settled before the work did
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("deadline elapsed")]
pub struct Elapsed;

/// Race `work` against `timer`; the first future to complete wins
pub async fn first_settled<W, T>(work: W, timer: T) -> Result<W::Output, Elapsed>
where
    W: Future,
    T: Future<Output = ()>,
{
    let work = pin!(work);
    let timer = pin!(timer);

    match future::select(work, timer).await {
        Either::Left((output, _timer)) => Ok(output),
        Either::Right(((), _abandoned)) => Err(Elapsed),
    }
}

/// Bound an upstream call by `budget`; `None` waits indefinitely
pub async fn with_deadline<F, T>(work: F, budget: Option<Duration>) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    let Some(budget) = budget else {
        return work.await;
    };

    match first_settled(work, tokio::time::sleep(budget)).await {
        Ok(result) => result,
        Err(Elapsed) => {
            tracing::warn!(budget_ms = budget.as_millis() as u64, "Upstream call abandoned");
            Err(ClientError::Timeout(budget.as_millis() as u64))
        }
    }
}
