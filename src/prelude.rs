pub use crate::contact::{ContactMessage, submit_label};
pub use crate::feedback::{BannerKind, StatusBanner};
pub use crate::form::{
    FieldKey, FieldRule, FieldStore, FormError, FormErrors, FormModel, FormOptions, FormResult,
    FormSnapshot, FormValues, RuleSet, SubmissionController, SubmissionStatus, SubmitError,
    SubmitOutcome, validate,
};
