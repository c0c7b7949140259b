use crate::form::SubmissionStatus;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Text of the transient banner shown after a submission attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusBanner {
    pub kind: BannerKind,
    pub title: &'static str,
    pub message: &'static str,
}

impl StatusBanner {
    pub const SUCCESS: Self = Self {
        kind: BannerKind::Success,
        title: "Success!",
        message: "Your message has been sent. We'll get back to you soon.",
    };

    pub const ERROR: Self = Self {
        kind: BannerKind::Error,
        title: "Error!",
        message: "Failed to send message. Please try again later.",
    };

    /// The banner for `status`, if one should be visible.
    pub fn for_status(status: SubmissionStatus) -> Option<Self> {
        match status {
            SubmissionStatus::Success => Some(Self::SUCCESS),
            SubmissionStatus::Error => Some(Self::ERROR),
            SubmissionStatus::Idle | SubmissionStatus::Submitting => None,
        }
    }
}
