//! Cascade guard for operations that must always produce a value.
//!
//! A request runs through up to three tiers: a primary path (usually a
//! remote collaborator), a fallback path (local computation), and an
//! infallible last resort. Tier failures are absorbed, counted and logged;
//! the caller only ever sees a value plus the tier that produced it.

use std::future::Future;
use std::time::{Duration, Instant};

use metrics::counter;
use tracing::warn;

/// Which tier ended up producing the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Primary,
    Fallback,
    LastResort,
}

/// A value that is guaranteed to exist, plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Guarded<T> {
    pub value: T,
    pub tier: Tier,
    pub elapsed: Duration,
}

impl<T> Guarded<T> {
    /// True when anything other than the primary path answered.
    pub fn degraded(&self) -> bool {
        self.tier != Tier::Primary
    }
}

/// Run `primary`, then `fallback`, each under its own `deadline`, and fall
/// through to `last_resort` when both are exhausted. Never returns an error:
/// tier failures are logged and counted instead of propagated.
pub async fn with_fallback<T, P, PFut, F, FFut, L>(
    operation: &'static str,
    deadline: Duration,
    primary: P,
    fallback: F,
    last_resort: L,
) -> Guarded<T>
where
    P: FnOnce() -> PFut,
    PFut: Future<Output = anyhow::Result<T>>,
    F: FnOnce() -> FFut,
    FFut: Future<Output = anyhow::Result<T>>,
    L: FnOnce() -> T,
{
    let started = Instant::now();

    match tokio::time::timeout(deadline, primary()).await {
        Ok(Ok(value)) => {
            return Guarded {
                value,
                tier: Tier::Primary,
                elapsed: started.elapsed(),
            };
        }
        Ok(Err(e)) => {
            counter!("fallback_primary_errors_total").increment(1);
            warn!(operation, error = %e, "primary path failed; running fallback");
        }
        Err(_) => {
            counter!("fallback_primary_timeouts_total").increment(1);
            warn!(
                operation,
                timeout_ms = deadline.as_millis() as u64,
                "primary path timed out; running fallback"
            );
        }
    }

    match tokio::time::timeout(deadline, fallback()).await {
        Ok(Ok(value)) => Guarded {
            value,
            tier: Tier::Fallback,
            elapsed: started.elapsed(),
        },
        Ok(Err(e)) => {
            counter!("fallback_last_resort_total").increment(1);
            warn!(operation, error = %e, "fallback path failed; using last resort");
            Guarded {
                value: last_resort(),
                tier: Tier::LastResort,
                elapsed: started.elapsed(),
            }
        }
        Err(_) => {
            counter!("fallback_last_resort_total").increment(1);
            warn!(
                operation,
                timeout_ms = deadline.as_millis() as u64,
                "fallback path timed out; using last resort"
            );
            Guarded {
                value: last_resort(),
                tier: Tier::LastResort,
                elapsed: started.elapsed(),
            }
        }
    }
}
