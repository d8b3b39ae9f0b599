pub mod document_form;
pub mod follow_up;
pub mod notice;
pub mod rich_text;
pub mod styles;

pub use document_form::DocumentForm;
pub use follow_up::FollowUpForm;
pub use notice::NoticeBanner;
pub use rich_text::{ResultCard, RichText, DISCLAIMER};
pub use styles::APP_STYLES;
