use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Notification channel closed")]
    ChannelClosed,

    #[error("Cannot render event document: {0}")]
    Render(#[from] pmoxsd::XsdError),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}
