//! A calculation running on the service.

use std::sync::Arc;

use futures_util::FutureExt;
use tokio::task::{JoinError, JoinHandle};

use abacus_client::{CalculationService, TransportError};
use abacus_types::{CalculationRequest, CalculationResponse, Operator};

pub(crate) type CalculationOutcome = Result<Result<CalculationResponse, TransportError>, JoinError>;

/// The single in-flight call. Its existence is the loading state.
#[derive(Debug)]
pub(crate) struct InFlight {
    request: CalculationRequest,
    /// Operator to apply to the result once the call succeeds.
    then: Option<Operator>,
    handle: JoinHandle<Result<CalculationResponse, TransportError>>,
}

pub(crate) struct Completed {
    pub(crate) request: CalculationRequest,
    pub(crate) then: Option<Operator>,
    pub(crate) outcome: CalculationOutcome,
}

impl InFlight {
    pub(crate) fn spawn(
        service: &Arc<dyn CalculationService>,
        request: CalculationRequest,
        then: Option<Operator>,
    ) -> Self {
        let service = Arc::clone(service);
        let task_request = request.clone();
        let handle = tokio::spawn(async move { service.calculate(task_request).await });
        Self {
            request,
            then,
            handle,
        }
    }

    pub(crate) fn request(&self) -> &CalculationRequest {
        &self.request
    }

    pub(crate) fn try_complete_now(mut self) -> Result<Completed, Self> {
        if !self.handle.is_finished() {
            return Err(self);
        }
        let Some(outcome) = (&mut self.handle).now_or_never() else {
            return Err(self);
        };
        Ok(Completed {
            request: self.request,
            then: self.then,
            outcome,
        })
    }

    pub(crate) async fn wait(self) -> Completed {
        let outcome = self.handle.await;
        Completed {
            request: self.request,
            then: self.then,
            outcome,
        }
    }
}
