//! Controller for Abacus - state machine and orchestration.
//!
//! [`App`] owns the calculator, the history book, the in-flight service call,
//! the transient error notice and the view state. It has no terminal
//! dependencies: the TUI turns input into [`Action`]s, calls [`App::tick`]
//! once per frame and renders from the accessors.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use futures_util::FutureExt;
use tokio::task::{JoinError, JoinHandle};

use abacus_core::Selection;

pub use abacus_client::{CalculationService, HttpCalculationService, TransportError};
pub use abacus_config::AbacusConfig;
pub use abacus_core::{
    Calculator, FileStore, History, HistoryBook, KeyValueStore, MemoryStore, Phase,
};
pub use abacus_types::{
    CalculationRequest, CalculationResponse, HealthStatus, HistoryEntry, KeypadMode, Operator,
    UiOptions, format_value,
};

mod calculation;
mod notice;
mod view;

use calculation::{Completed, InFlight};
pub use notice::{ErrorNotice, NOTICE_DURATION};
pub use view::ViewState;

/// Shown for any call that did not produce a service verdict.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Unable to connect to server";

const SPINNER_CADENCE: Duration = Duration::from_millis(100);

/// A user intent, already decoded from keys or clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert(char),
    Pi,
    ToggleSign,
    Backspace,
    Clear,
    Operator(Operator),
    Evaluate,
    ReplayHistory(usize),
    RequestClearHistory,
    ConfirmClearHistory,
    CancelClearHistory,
    ToggleKeypad,
    ToggleHistoryPanel,
    SelectHistoryUp,
    SelectHistoryDown,
    ReplaySelected,
    Quit,
}

impl Action {
    /// Whether the action can change the calculator's operands or operator.
    #[must_use]
    pub fn edits_calculator(self) -> bool {
        matches!(
            self,
            Action::Insert(_)
                | Action::Pi
                | Action::ToggleSign
                | Action::Backspace
                | Action::Clear
                | Action::Operator(_)
                | Action::Evaluate
                | Action::ReplayHistory(_)
                | Action::ReplaySelected
        )
    }
}

/// What the startup health probe found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Unknown,
    Checking,
    Online { version: Option<String> },
    Unhealthy(String),
    Offline,
}

pub struct App {
    calculator: Calculator,
    history: HistoryBook,
    service: Arc<dyn CalculationService>,
    in_flight: Option<InFlight>,
    health_probe: Option<JoinHandle<Result<HealthStatus, TransportError>>>,
    service_status: ServiceStatus,
    service_url: Option<String>,
    notice: ErrorNotice,
    view: ViewState,
    tick: usize,
    last_ui_tick: Instant,
    should_quit: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("calculator", &self.calculator)
            .field("history", &self.history)
            .field("calculating", &self.in_flight.is_some())
            .field("service_status", &self.service_status)
            .field("notice", &self.notice)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(service: Arc<dyn CalculationService>, store: Box<dyn KeyValueStore>) -> Self {
        Self {
            calculator: Calculator::new(),
            history: HistoryBook::load(store),
            service,
            in_flight: None,
            health_probe: None,
            service_status: ServiceStatus::Unknown,
            service_url: None,
            notice: ErrorNotice::default(),
            view: ViewState::default(),
            tick: 0,
            last_ui_tick: Instant::now(),
            should_quit: false,
        }
    }

    /// Build the production app: HTTP service, file-backed history, health probe.
    ///
    /// Must run inside a tokio runtime.
    pub fn from_config(config: Option<&AbacusConfig>) -> anyhow::Result<Self> {
        let fallback = AbacusConfig::default();
        let config = config.unwrap_or(&fallback);

        let url = config.service_url();
        let http = HttpCalculationService::new(&url, config.connect_timeout())
            .context("failed to create calculation service client")?;

        let store: Box<dyn KeyValueStore> = match config.history_dir() {
            Some(dir) => {
                tracing::info!("History directory: {}", dir.display());
                Box::new(FileStore::new(dir))
            }
            None => {
                tracing::warn!("No home directory; history will not outlive this session");
                Box::new(MemoryStore::new())
            }
        };

        let keypad = match config.keypad() {
            Some(raw) => KeypadMode::parse(raw).unwrap_or_else(|| {
                tracing::warn!("Unknown keypad {raw:?}, using basic");
                KeypadMode::Basic
            }),
            None => KeypadMode::Basic,
        };
        let ui_options = UiOptions {
            ascii_only: config.ascii_only(),
            high_contrast: config.high_contrast(),
            reduced_motion: config.reduced_motion(),
        };

        let probe = http.clone();
        let mut app =
            Self::new(Arc::new(http), store).with_view(ViewState::new(keypad, ui_options));
        app.service_url = Some(url);
        app.start_health_probe(async move { probe.health().await });
        Ok(app)
    }

    #[must_use]
    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    /// Run a health check in the background; the result lands in
    /// [`App::service_status`] on a later tick.
    pub fn start_health_probe<F>(&mut self, probe: F)
    where
        F: Future<Output = Result<HealthStatus, TransportError>> + Send + 'static,
    {
        self.service_status = ServiceStatus::Checking;
        self.health_probe = Some(tokio::spawn(probe));
    }

    pub fn dispatch(&mut self, action: Action) {
        if action.edits_calculator() {
            self.notice.release();
        }
        match action {
            Action::Insert(ch) => {
                if let Err(e) = self.calculator.insert(ch) {
                    tracing::trace!("Rejected input: {e}");
                }
            }
            Action::Pi => self.calculator.insert_pi(),
            Action::ToggleSign => {
                if let Err(e) = self.calculator.toggle_sign() {
                    tracing::trace!("Rejected sign toggle: {e}");
                }
            }
            Action::Backspace => self.calculator.backspace(),
            Action::Clear => {
                self.calculator.clear();
                self.notice.dismiss();
            }
            Action::Operator(op) => self.select_operator(op),
            Action::Evaluate => self.evaluate(),
            Action::ReplayHistory(index) => self.replay(index),
            Action::RequestClearHistory => {
                if !self.history.history().is_empty() {
                    self.view.confirm_clear = true;
                }
            }
            Action::ConfirmClearHistory => {
                if self.view.confirm_clear {
                    self.history.clear();
                    self.view.selected = None;
                    self.view.confirm_clear = false;
                    tracing::info!("History cleared");
                }
            }
            Action::CancelClearHistory => self.view.confirm_clear = false,
            Action::ToggleKeypad => self.view.keypad = self.view.keypad.toggle(),
            Action::ToggleHistoryPanel => {
                self.view.history_open = !self.view.history_open;
                if !self.view.history_open {
                    self.view.selected = None;
                }
            }
            Action::SelectHistoryUp => self.view.select_previous(self.history.history().len()),
            Action::SelectHistoryDown => self.view.select_next(self.history.history().len()),
            Action::ReplaySelected => {
                if let Some(index) = self.view.selected {
                    self.replay(index);
                }
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn select_operator(&mut self, op: Operator) {
        if self.ignore_while_calculating("operator") {
            return;
        }
        match self.calculator.select_operator(op) {
            Selection::Deferred => {}
            Selection::Submit(request) => self.submit(request, None),
            Selection::Chain { request, next } => self.submit(request, Some(next)),
        }
    }

    fn evaluate(&mut self) {
        if self.ignore_while_calculating("evaluate") {
            return;
        }
        if let Some(request) = self.calculator.request() {
            self.submit(request, None);
        }
    }

    fn ignore_while_calculating(&self, what: &str) -> bool {
        if let Some(in_flight) = &self.in_flight {
            tracing::debug!(
                "Ignoring {what}: {} still calculating",
                in_flight.request().operator()
            );
            return true;
        }
        false
    }

    fn submit(&mut self, request: CalculationRequest, then: Option<Operator>) {
        tracing::debug!(?request, "Submitting calculation");
        self.in_flight = Some(InFlight::spawn(&self.service, request, then));
    }

    fn replay(&mut self, index: usize) {
        match self.history.replay(index) {
            Some(result) => self.calculator.apply_result(result),
            None => tracing::debug!("No history entry at {index}"),
        }
    }

    /// Advance per-frame state: finished calls, notice expiry, spinner.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        self.poll_calculation(now);
        self.poll_health_probe();
        self.notice.expire(now);

        if now.saturating_duration_since(self.last_ui_tick) >= SPINNER_CADENCE {
            self.last_ui_tick = now;
            self.tick = self.tick.wrapping_add(1);
        }
    }

    /// Wait for any in-flight calculation and health probe, then apply them.
    pub async fn settle(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            let completed = in_flight.wait().await;
            self.finish(completed, Instant::now());
        }
        if let Some(probe) = self.health_probe.take() {
            let result = probe.await;
            self.apply_health(result);
        }
    }

    fn poll_calculation(&mut self, now: Instant) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        match in_flight.try_complete_now() {
            Ok(completed) => self.finish(completed, now),
            Err(in_flight) => self.in_flight = Some(in_flight),
        }
    }

    fn finish(&mut self, completed: Completed, now: Instant) {
        let Completed {
            request,
            then,
            outcome,
        } = completed;

        match outcome {
            Ok(Ok(CalculationResponse::Success {
                operation_label,
                result,
            })) => {
                tracing::info!("{operation_label} = {result}");
                self.history.record(operation_label, result);
                self.view.clamp_selection(self.history.history().len());
                self.calculator.apply_result(result);
                self.notice.release();
                if let Some(next) = then {
                    self.calculator.continue_chain(next);
                }
            }
            Ok(Ok(CalculationResponse::Failure { error_message })) => {
                tracing::info!(
                    operation = %request.operator(),
                    "Service rejected calculation: {error_message}"
                );
                self.notice.show(format!("Error: {error_message}"), now);
            }
            Ok(Err(e)) => {
                tracing::warn!(operation = %request.operator(), "Calculation transport error: {e}");
                self.notice.show(format!("Error: {NETWORK_ERROR_MESSAGE}"), now);
            }
            Err(e) => {
                tracing::error!(operation = %request.operator(), "Calculation task failed: {e}");
                self.notice.show(format!("Error: {NETWORK_ERROR_MESSAGE}"), now);
            }
        }
    }

    fn poll_health_probe(&mut self) {
        let Some(probe) = self.health_probe.as_mut() else {
            return;
        };
        if !probe.is_finished() {
            return;
        }
        let Some(result) = probe.now_or_never() else {
            return;
        };
        self.health_probe = None;
        self.apply_health(result);
    }

    fn apply_health(
        &mut self,
        result: Result<Result<HealthStatus, TransportError>, JoinError>,
    ) {
        self.service_status = match result {
            Ok(Ok(status)) if status.is_healthy() => {
                tracing::info!(version = ?status.version, "Calculation service is healthy");
                ServiceStatus::Online {
                    version: status.version,
                }
            }
            Ok(Ok(status)) => {
                tracing::warn!("Calculation service reports {:?}", status.status);
                ServiceStatus::Unhealthy(status.status)
            }
            Ok(Err(e)) => {
                tracing::warn!("Calculation service unreachable: {e}");
                ServiceStatus::Offline
            }
            Err(e) => {
                tracing::error!("Health probe task failed: {e}");
                ServiceStatus::Offline
            }
        };
    }

    /// Main display text.
    #[must_use]
    pub fn display(&self) -> String {
        self.calculator.display()
    }

    /// The error notice while one is showing, else the pending-operator label.
    ///
    /// Once a notice expires the line stays empty until the next edit.
    #[must_use]
    pub fn operator_line(&self) -> String {
        match self.notice.message() {
            Some(message) => message.to_string(),
            None if self.notice.is_blanked() => String::new(),
            None => self.calculator.pending_label(),
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.notice.message()
    }

    #[must_use]
    pub fn is_calculating(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    #[must_use]
    pub fn history(&self) -> &History {
        self.history.history()
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.view.ui_options
    }

    #[must_use]
    pub fn service_status(&self) -> &ServiceStatus {
        &self.service_status
    }

    #[must_use]
    pub fn service_url(&self) -> Option<&str> {
        self.service_url.as_deref()
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
