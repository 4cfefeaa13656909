/*!
 * Long-running operation handles.
 *
 * Slow jobs such as video generation are submitted once and then polled
 * until they resolve. Callers only see the `LongRunningOperation` trait,
 * so a simulated job and a remote one are interchangeable.
 */

use async_trait::async_trait;
use log::debug;
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::ProviderError;

/// State of a long-running operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationStatus<T> {
    /// Still running
    Pending,
    /// Finished with a result
    Done(T),
    /// Finished with an error message
    Failed(String),
}

/// Handle to a submitted operation
#[async_trait]
pub trait LongRunningOperation: Send + Sync {
    /// Result type of the operation
    type Output: Send;

    /// Short description used in logs
    fn name(&self) -> &str;

    /// Query the current state once
    async fn poll(&self) -> Result<OperationStatus<Self::Output>, ProviderError>;
}

/// Poll an operation until it resolves.
///
/// # Arguments
/// * `operation` - The submitted operation
/// * `poll_interval` - Delay between polls
/// * `timeout` - Maximum total wait, or `None` to wait indefinitely
pub async fn await_operation<O>(
    operation: &O,
    poll_interval: Duration,
    timeout: Option<Duration>,
) -> Result<O::Output, ProviderError>
where
    O: LongRunningOperation + ?Sized,
{
    let started = Instant::now();

    loop {
        match operation.poll().await? {
            OperationStatus::Done(output) => {
                debug!("Operation {} completed in {:?}", operation.name(), started.elapsed());
                return Ok(output);
            }
            OperationStatus::Failed(message) => {
                return Err(ProviderError::OperationFailed(format!("{}: {}", operation.name(), message)));
            }
            OperationStatus::Pending => {}
        }

        if let Some(limit) = timeout {
            if started.elapsed() >= limit {
                return Err(ProviderError::Timeout(format!(
                    "{} did not finish within {:?}",
                    operation.name(),
                    limit
                )));
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}

/// Operation that resolves to a fixed value once a delay has elapsed
#[derive(Debug, Clone)]
pub struct SimulatedOperation<T> {
    name: String,
    ready_at: Instant,
    output: T,
}

impl<T: Clone + Send + Sync> SimulatedOperation<T> {
    /// Start a simulated operation that completes after `delay`
    pub fn start(name: impl Into<String>, delay: Duration, output: T) -> Self {
        Self {
            name: name.into(),
            ready_at: Instant::now() + delay,
            output,
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> LongRunningOperation for SimulatedOperation<T> {
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    async fn poll(&self) -> Result<OperationStatus<T>, ProviderError> {
        if Instant::now() >= self.ready_at {
            Ok(OperationStatus::Done(self.output.clone()))
        } else {
            Ok(OperationStatus::Pending)
        }
    }
}
