//! Remote-asset readiness protocol.
//!
//! After an upload the provider processes the artifact asynchronously; the
//! poller re-fetches its status at a fixed interval until a terminal state
//! is observed or the configured bound is exceeded.

use vidocs_core::{AssetHandle, PollPolicy};

use crate::client::ProviderClient;
use crate::error::ProviderError;
use crate::wire::AssetState;

/// Blocks until the uploaded asset reaches a terminal state.
///
/// - `ready` resolves with the (possibly refreshed) handle.
/// - `failed` is fatal: the upload is not retried.
/// - more than `policy.max_attempts` polls fail with `ProcessingTimeout`.
pub async fn await_ready(
    client: &ProviderClient,
    handle: &AssetHandle,
    policy: &PollPolicy,
) -> Result<AssetHandle, ProviderError> {
    for attempt in 1..=policy.max_attempts {
        let (current, state) = client.asset_state(&handle.name).await?;
        match state {
            AssetState::Ready => return Ok(current),
            AssetState::Failed => {
                return Err(ProviderError::AssetProcessingFailed(format!(
                    "asset {} reported terminal failure",
                    handle.name
                )));
            },
            AssetState::Processing => {
                tracing::debug!(
                    asset = %handle.name,
                    attempt,
                    max = policy.max_attempts,
                    "asset still processing"
                );
                // No point waiting out the interval when no poll follows.
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.interval).await;
                }
            },
        }
    }
    Err(ProviderError::ProcessingTimeout { attempts: policy.max_attempts })
}
