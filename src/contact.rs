//! The site's contact form.

use crate::form::{FormModel, SubmissionStatus};

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct ContactMessage {
    #[field(
        required = "Name is required",
        min_len = 2,
        min_len_message = "Name must be at least 2 characters"
    )]
    pub name: String,
    #[field(
        required = "Email is required",
        pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
        pattern_message = "Please enter a valid email address"
    )]
    pub email: String,
    #[field(
        required = "Subject is required",
        min_len = 3,
        min_len_message = "Subject must be at least 3 characters"
    )]
    pub subject: String,
    #[field(
        required = "Message is required",
        min_len = 10,
        min_len_message = "Message must be at least 10 characters"
    )]
    pub message: String,
}

pub fn submit_label(status: SubmissionStatus) -> &'static str {
    if status.is_submitting() {
        "Sending..."
    } else {
        "Send Message"
    }
}
