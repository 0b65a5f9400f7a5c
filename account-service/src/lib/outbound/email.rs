use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::MultiPart;
use lettre::message::SinglePart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::Message;
use lettre::SmtpTransport;
use lettre::Transport;

use crate::config::EmailConfig;
use crate::domain::account::errors::MailerError;
use crate::domain::account::ports::Mailer;

/// SMTP-backed mailer.
///
/// The transport is built once at startup from configuration and shared
/// read-only across requests.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
    forgot_password_url: String,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, MailerError> {
        let transport = SmtpTransport::starttls_relay(&config.host)
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
            forgot_password_url: config.forgot_password_url.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), MailerError> {
        let reset_link = format!("{}?token={}", self.forgot_password_url, token);

        let text_body = format!(
            "We received a request to reset your password.\n\n\
             Open the following link to choose a new one:\n{}\n\n\
             If you did not request this, you can ignore this email.",
            reset_link
        );
        let html_body = format!(
            "<html><body>\
             <h2>Reset your password</h2>\
             <p>We received a request to reset your password.</p>\
             <p><a href=\"{}\">Choose a new password</a></p>\
             <p>If you did not request this, you can ignore this email.</p>\
             </body></html>",
            reset_link
        );

        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e: lettre::address::AddressError| {
                        MailerError::BuildFailed(e.to_string())
                    })?,
            )
            .to(to.parse().map_err(|e: lettre::address::AddressError| {
                MailerError::BuildFailed(e.to_string())
            })?)
            .subject("Reset your password")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body),
                    ),
            )
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?;

        // lettre's sync transport; run it off the async runtime.
        let transport = self.transport.clone();
        let result = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailerError::SendFailed(e.to_string()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to, "Password reset email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, to = %to, "Failed to send password reset email");
                Err(MailerError::SendFailed(e.to_string()))
            }
        }
    }
}
