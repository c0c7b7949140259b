pub mod contact;
pub mod feedback;
pub mod form;
pub mod prelude;

pub use contact::ContactMessage;
pub use form::{SubmissionController, SubmissionStatus};
