//! Bounded retry without backoff.
//!
//! Two callers use this: the request executor, which retries only transient
//! transport failures, and the per-track pipeline, which retries on any
//! failure. Neither waits between attempts.

use std::future::Future;

/// Errors that may go away by simply trying again.
pub trait IsTransient {
    fn is_transient(&self) -> bool;
}

/// Runs `operation` up to `max_attempts` times, stopping at the first success
/// or at the first error `should_retry` rejects. The last error is returned
/// once attempts run out.
pub async fn retry_when<F, Fut, T, E, P>(
    max_attempts: u32,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && should_retry(&e) => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Retries only while the error is transient.
pub async fn retry_transport<F, Fut, T, E>(max_attempts: u32, operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsTransient,
{
    retry_when(max_attempts, operation, |e: &E| e.is_transient()).await
}
