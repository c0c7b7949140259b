use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{AbortHandle, AbortRegistration, Abortable, BoxFuture};
use futures::task::{Spawn, SpawnExt};
use futures_timer::Delay;

use super::store::{FieldKey, FieldStore, FormErrors, FormValues};
use super::validation::{FormModel, RuleSet, validate};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

pub const DEFAULT_STATUS_RESET_DELAY: Duration = Duration::from_millis(5_000);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "form-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl SubmissionStatus {
    pub fn is_submitting(self) -> bool {
        self == SubmissionStatus::Submitting
    }

    /// `Success` or `Error`: a finished attempt whose banner is still showing.
    pub fn is_settled(self) -> bool {
        matches!(self, SubmissionStatus::Success | SubmissionStatus::Error)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormOptions {
    /// How long `Success` or `Error` is shown before the form returns to `Idle`.
    pub status_reset_delay: Duration,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            status_reset_delay: DEFAULT_STATUS_RESET_DELAY,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("unknown form field `{0}`")]
    UnknownField(String),
    #[error("more than one rule declared for field `{0}`")]
    DuplicateRule(FieldKey),
    #[error("empty validation message for field `{0}`")]
    EmptyMessage(FieldKey),
    #[error("invalid pattern for field `{field}`: {reason}")]
    InvalidPattern { field: FieldKey, reason: String },
    #[error("invalid submission status transition: {from:?} -> {to:?}")]
    InvalidStateTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("failed to spawn submission task: {0}")]
    SpawnFailed(String),
}

pub type FormResult<T> = Result<T, FormError>;

/// Failure reported by the submit callback. Only logged, never returned from `submit`.
pub type SubmitError = Box<dyn std::error::Error + Send + Sync>;

pub type SubmitFuture = BoxFuture<'static, Result<(), SubmitError>>;

type SubmitFn = Box<dyn Fn(FormValues) -> SubmitFuture + Send + Sync>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// Values passed validation and the callback is running.
    Started,
    /// Validation failed; the errors are now in the store.
    Invalid(FormErrors),
    /// A submission is already in flight, so this call did nothing.
    AlreadySubmitting,
}

#[derive(Clone, Debug)]
pub struct FormSnapshot {
    pub values: FormValues,
    pub errors: FormErrors,
    pub status: SubmissionStatus,
    pub submit_count: u32,
}

impl FormSnapshot {
    pub fn is_submitting(&self) -> bool {
        self.status.is_submitting()
    }
}

pub(super) struct FormState {
    pub(super) id: FormId,
    pub(super) store: FieldStore,
    pub(super) status: SubmissionStatus,
    pub(super) submit_count: u32,
    pub(super) status_timer: Option<AbortHandle>,
    /// Bumped for every scheduled timer; an expiry only applies to the latest one.
    pub(super) timer_generation: u64,
}

/// Runs validate, submit and settle for one form instance.
///
/// Spawned work only holds a weak reference to the form state. Dropping the controller
/// tears the instance down and cancels a pending return-to-idle timer; a submission
/// that settles afterwards is discarded.
pub struct SubmissionController<S>
where
    S: Spawn,
{
    options: FormOptions,
    rules: RuleSet,
    submit_fn: SubmitFn,
    spawner: S,
    state: Arc<RwLock<FormState>>,
}

impl<S> SubmissionController<S>
where
    S: Spawn,
{
    pub fn new<F, Fut>(
        fields: &[FieldKey],
        rules: RuleSet,
        spawner: S,
        options: FormOptions,
        submit: F,
    ) -> FormResult<Self>
    where
        F: Fn(FormValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), SubmitError>> + Send + 'static,
    {
        if let Some(unknown) = rules.keys().find(|key| !fields.contains(key)) {
            return Err(FormError::UnknownField(unknown.to_string()));
        }

        let id = FormId::next();
        tracing::debug!(form_id = %id, fields = fields.len(), "form created");
        Ok(Self {
            options,
            rules,
            submit_fn: Box::new(move |values| submit(values).boxed()),
            spawner,
            state: Arc::new(RwLock::new(FormState {
                id,
                store: FieldStore::new(fields),
                status: SubmissionStatus::Idle,
                submit_count: 0,
                status_timer: None,
                timer_generation: 0,
            })),
        })
    }

    /// Builds a controller for a [`FormModel`]; the callback receives the typed model.
    pub fn for_model<M, F, Fut>(spawner: S, options: FormOptions, submit: F) -> FormResult<Self>
    where
        M: FormModel,
        F: Fn(M) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), SubmitError>> + Send + 'static,
    {
        Self::new(
            M::field_keys(),
            M::rules()?,
            spawner,
            options,
            move |values: FormValues| submit(M::from_values(&values)),
        )
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn handle_change(&self, name: &str, value: impl Into<String>) -> FormResult<()> {
        write_lock(&self.state, "writing field value")?
            .store
            .set_value(name, value)
    }

    pub fn submit(&self) -> FormResult<SubmitOutcome> {
        let (form_id, values) = {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if state.status.is_submitting() {
                tracing::debug!(form_id = %state.id, "submit ignored while a submission is in flight");
                return Ok(SubmitOutcome::AlreadySubmitting);
            }

            let errors = validate(state.store.values(), &self.rules);
            cancel_status_timer(&mut state);
            if !errors.is_empty() {
                state.store.set_errors(errors.clone())?;
                transition_status(&mut state, SubmissionStatus::Idle)?;
                tracing::debug!(
                    form_id = %state.id,
                    invalid_fields = errors.len(),
                    "submit blocked by validation"
                );
                return Ok(SubmitOutcome::Invalid(errors));
            }

            state.store.set_errors(FormErrors::new())?;
            transition_status(&mut state, SubmissionStatus::Submitting)?;
            state.submit_count = state.submit_count.saturating_add(1);
            (state.id, state.store.values().clone())
        };

        tracing::debug!(%form_id, "submission started");
        let submission = (self.submit_fn)(values);
        let task = settle_submission(
            Arc::downgrade(&self.state),
            submission,
            self.options.status_reset_delay,
        );
        if let Err(error) = self.spawner.spawn(task) {
            let mut state = write_lock(&self.state, "reverting unspawned submission")?;
            transition_status(&mut state, SubmissionStatus::Idle)?;
            return Err(FormError::SpawnFailed(error.to_string()));
        }
        Ok(SubmitOutcome::Started)
    }

    /// Clears values and errors. Outside of a submission this also drops the banner.
    pub fn reset(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        state.store.reset();
        if !state.status.is_submitting() {
            cancel_status_timer(&mut state);
            transition_status(&mut state, SubmissionStatus::Idle)?;
        }
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            values: state.store.values().clone(),
            errors: state.store.errors().clone(),
            status: state.status,
            submit_count: state.submit_count,
        })
    }

    pub fn values(&self) -> FormResult<FormValues> {
        Ok(read_lock(&self.state, "reading form values")?
            .store
            .values()
            .clone())
    }

    pub fn errors(&self) -> FormResult<FormErrors> {
        Ok(read_lock(&self.state, "reading form errors")?
            .store
            .errors()
            .clone())
    }

    pub fn status(&self) -> FormResult<SubmissionStatus> {
        Ok(read_lock(&self.state, "reading submission status")?.status)
    }

    pub fn is_submitting(&self) -> FormResult<bool> {
        Ok(self.status()?.is_submitting())
    }
}

impl<S> Drop for SubmissionController<S>
where
    S: Spawn,
{
    fn drop(&mut self) {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cancel_status_timer(&mut state);
        tracing::debug!(form_id = %state.id, "form torn down");
    }
}

async fn settle_submission(
    state: Weak<RwLock<FormState>>,
    submission: SubmitFuture,
    delay: Duration,
) {
    let result = submission.await;
    let (generation, registration) = match apply_settlement(&state, result) {
        Ok(Some(timer)) => timer,
        Ok(None) => return,
        Err(error) => {
            tracing::error!(%error, "failed to settle form submission");
            return;
        }
    };

    if Abortable::new(Delay::new(delay), registration).await.is_err() {
        return;
    }
    if let Err(error) = expire_status(&state, generation) {
        tracing::error!(%error, "failed to expire submission status");
    }
}

fn apply_settlement(
    state: &Weak<RwLock<FormState>>,
    result: Result<(), SubmitError>,
) -> FormResult<Option<(u64, AbortRegistration)>> {
    let Some(shared) = state.upgrade() else {
        tracing::debug!("form torn down before its submission settled");
        return Ok(None);
    };
    let mut state = write_lock(&shared, "settling submission")?;
    match result {
        Ok(()) => {
            state.store.reset();
            transition_status(&mut state, SubmissionStatus::Success)?;
            tracing::debug!(form_id = %state.id, "submission succeeded");
        }
        Err(error) => {
            transition_status(&mut state, SubmissionStatus::Error)?;
            tracing::error!(form_id = %state.id, %error, "form submission failed");
        }
    }

    let (handle, registration) = AbortHandle::new_pair();
    if let Some(previous) = state.status_timer.replace(handle) {
        previous.abort();
    }
    state.timer_generation = state.timer_generation.wrapping_add(1);
    Ok(Some((state.timer_generation, registration)))
}

fn expire_status(state: &Weak<RwLock<FormState>>, generation: u64) -> FormResult<()> {
    let Some(shared) = state.upgrade() else {
        return Ok(());
    };
    let mut state = write_lock(&shared, "expiring submission status")?;
    if state.timer_generation != generation || state.status_timer.is_none() {
        tracing::debug!(form_id = %state.id, generation, "stale status timer ignored");
        return Ok(());
    }
    if state.status.is_settled() {
        state.status_timer = None;
        transition_status(&mut state, SubmissionStatus::Idle)?;
        tracing::debug!(form_id = %state.id, "submission status expired");
    }
    Ok(())
}

fn cancel_status_timer(state: &mut FormState) {
    if let Some(timer) = state.status_timer.take() {
        timer.abort();
    }
}

pub(super) fn transition_status(
    state: &mut FormState,
    next: SubmissionStatus,
) -> FormResult<()> {
    let current = state.status;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmissionStatus::Idle, SubmissionStatus::Submitting)
            | (SubmissionStatus::Success, SubmissionStatus::Submitting)
            | (SubmissionStatus::Error, SubmissionStatus::Submitting)
            | (SubmissionStatus::Submitting, SubmissionStatus::Success)
            | (SubmissionStatus::Submitting, SubmissionStatus::Error)
            | (_, SubmissionStatus::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.status = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
