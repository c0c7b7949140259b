mod controller;
mod store;
mod validation;


pub use contactkit_form_derive::FormModel;
pub use controller::{
    DEFAULT_STATUS_RESET_DELAY, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    SubmissionController, SubmissionStatus, SubmitError, SubmitFuture, SubmitOutcome,
};
pub use store::{FieldKey, FieldStore, FormErrors, FormValues};
pub use validation::{FieldRule, FormModel, RuleSet, validate};
