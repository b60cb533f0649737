use crate::error::Result;

/// Transport-less email sender. Logs the outbound message instead of
/// delivering it; a real transporter would slot in here. Callers treat
/// failure as non-fatal.
pub async fn send_email(to: &str, subject: &str, message: &str) -> Result<()> {
    tracing::info!("[mock email] to: {} | subject: {} | message: {}", to, subject, message);
    Ok(())
}

pub async fn send_welcome_email(to: &str, name: &str) -> Result<()> {
    send_email(
        to,
        "Welcome to Groovify!",
        &format!("Hi {name},\n\nWelcome to Groovify! We're glad to have you."),
    )
    .await
}
