//! Contact form submission.
//!
//! The generated site posts the contact form to the preview server,
//! which runs it through [`ContactMachine::submit`]: validate, relay
//! the message through EmailJS, then send the visitor a confirmation.
//! The confirmation is strictly best-effort — it starts only after the
//! primary notification succeeded, and its failure never turns a
//! delivered message into a user-facing error.
//!
//! In the interactive original of this flow the form passes through a
//! loading state; here that state is simply the in-flight POST. The
//! outcome page is the post-transition state: success clears the form
//! (and bounces back to the contact section after a few seconds),
//! failure re-renders it with every field retained.
//!
//! Transports are a trait so tests can script delivery outcomes without
//! a network. Transport errors are pre-formatted display strings; the
//! machine maps them to the fixed user-facing messages and keeps the
//! detail for the server log.

use serde::Serialize;

use crate::config::EmailConfig;
use crate::content::Identity;

/// Path of the EmailJS send endpoint, relative to `email.api_base`.
pub const EMAIL_SEND_PATH: &str = "/api/v1.0/email/send";

/// Shown on the success page.
pub const SUCCESS_MESSAGE: &str =
    "Message sent successfully! You'll receive a confirmation email shortly.";

/// Shown when the primary notification could not be delivered.
pub const SEND_ERROR_MESSAGE: &str =
    "Failed to send message. Please try again or contact me directly.";

/// Shown when a required field came back blank.
pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required.";

/// The five contact form fields, matching the generated form's input
/// names (`first_name`, `last_name`, `email`, `subject`, `message`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Build from decoded form pairs. Missing fields read as empty;
    /// repeated fields keep their first value. Values are trimmed.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let field = |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.trim().to_string())
                .unwrap_or_default()
        };
        Self {
            first_name: field("first_name"),
            last_name: field("last_name"),
            email: field("email"),
            subject: field("subject"),
            message: field("message"),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.subject.trim().is_empty()
            && !self.message.trim().is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// One EmailJS send request. This is the exact wire body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmailRequest {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub template_params: serde_json::Value,
}

/// Delivers one email. Errors are display-ready strings.
pub trait MailTransport {
    fn send(&self, request: &EmailRequest) -> Result<(), String>;
}

/// The real transport: POSTs to the EmailJS REST API.
///
/// `api_base` comes from config so tests (and self-hosted relays) can
/// point it elsewhere.
pub struct EmailJsTransport {
    api_base: String,
}

impl EmailJsTransport {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}

impl MailTransport for EmailJsTransport {
    fn send(&self, request: &EmailRequest) -> Result<(), String> {
        let url = format!("{}{}", self.api_base.trim_end_matches('/'), EMAIL_SEND_PATH);
        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| format!("POST {url} failed: {e}"))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| format!("failed to read response from {url}: {e}"))?;

        if !status.is_success() {
            return Err(format!("HTTP {}: {}", status.as_u16(), body_snippet(&body)));
        }
        Ok(())
    }
}

fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

/// What a submission produced.
#[derive(Debug, PartialEq)]
pub enum ContactOutcome {
    /// The notification went out. `auto_reply_error` carries the
    /// swallowed confirmation failure, if any, for the server log.
    Success { auto_reply_error: Option<String> },
    /// Nothing was delivered. `message` is user-facing; `detail` is the
    /// underlying transport error for the log; `form` re-fills the
    /// fields.
    Failure {
        message: String,
        detail: Option<String>,
        form: ContactForm,
    },
}

/// Drives one submission through validation and the two sends.
pub struct ContactMachine<'a, T: MailTransport> {
    email: &'a EmailConfig,
    identity: &'a Identity,
    transport: &'a T,
}

impl<'a, T: MailTransport> ContactMachine<'a, T> {
    pub fn new(email: &'a EmailConfig, identity: &'a Identity, transport: &'a T) -> Self {
        Self {
            email,
            identity,
            transport,
        }
    }

    /// Validate, send the notification, then (on success only) the
    /// confirmation.
    pub fn submit(&self, form: ContactForm) -> ContactOutcome {
        if !form.is_complete() {
            return ContactOutcome::Failure {
                message: MISSING_FIELDS_MESSAGE.to_string(),
                detail: None,
                form,
            };
        }

        let Some((service_id, template_id, public_key)) = credentials(self.email) else {
            let missing = self.email.missing_keys();
            return ContactOutcome::Failure {
                message: format!(
                    "Email sending is not configured. Set {} in config.toml.",
                    missing.join(", ")
                ),
                detail: None,
                form,
            };
        };

        let notification = EmailRequest {
            service_id: service_id.to_string(),
            template_id: template_id.to_string(),
            user_id: public_key.to_string(),
            template_params: serde_json::json!({
                "from_name": form.full_name(),
                "from_email": form.email,
                "subject": form.subject,
                "message": form.message,
                "to_name": self.identity.name,
            }),
        };
        if let Err(detail) = self.transport.send(&notification) {
            return ContactOutcome::Failure {
                message: SEND_ERROR_MESSAGE.to_string(),
                detail: Some(detail),
                form,
            };
        }

        let confirmation = EmailRequest {
            service_id: service_id.to_string(),
            template_id: self.email.auto_reply_template_id.clone(),
            user_id: public_key.to_string(),
            template_params: serde_json::json!({
                "to_name": form.full_name(),
                "to_email": form.email,
                "from_name": self.identity.name,
                "reply_to": self.identity.reply_to,
            }),
        };
        let auto_reply_error = self.transport.send(&confirmation).err();

        ContactOutcome::Success { auto_reply_error }
    }
}

/// The three credentials, present and non-blank, or `None`.
fn credentials(email: &EmailConfig) -> Option<(&str, &str, &str)> {
    fn non_blank(v: &Option<String>) -> Option<&str> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
    Some((
        non_blank(&email.service_id)?,
        non_blank(&email.template_id)?,
        non_blank(&email.public_key)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_AUTO_REPLY_TEMPLATE;
    use crate::content::Profile;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Scripted transport: pops one result per send, records requests.
    struct MockTransport {
        script: RefCell<VecDeque<Result<(), String>>>,
        sent: RefCell<Vec<EmailRequest>>,
    }

    impl MockTransport {
        fn scripted(results: Vec<Result<(), String>>) -> Self {
            Self {
                script: RefCell::new(results.into()),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<EmailRequest> {
            self.sent.borrow().clone()
        }
    }

    impl MailTransport for MockTransport {
        fn send(&self, request: &EmailRequest) -> Result<(), String> {
            self.sent.borrow_mut().push(request.clone());
            self.script
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err("unscripted send".to_string()))
        }
    }

    fn configured_email() -> EmailConfig {
        EmailConfig {
            service_id: Some("service_abc".into()),
            template_id: Some("template_main".into()),
            public_key: Some("pk_123".into()),
            ..EmailConfig::default()
        }
    }

    fn identity() -> Identity {
        Profile::default().identity
    }

    fn filled_form() -> ContactForm {
        ContactForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            subject: "Engines".into(),
            message: "Loved the analytical engine write-up.".into(),
        }
    }

    #[test]
    fn sends_notification_then_confirmation() {
        let email = configured_email();
        let ident = identity();
        let transport = MockTransport::scripted(vec![Ok(()), Ok(())]);
        let machine = ContactMachine::new(&email, &ident, &transport);

        let outcome = machine.submit(filled_form());
        assert_eq!(outcome, ContactOutcome::Success { auto_reply_error: None });

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].template_id, "template_main");
        assert_eq!(sent[1].template_id, DEFAULT_AUTO_REPLY_TEMPLATE);
        // Notification goes to the site owner, confirmation to the visitor.
        assert_eq!(sent[0].template_params["to_name"], ident.name.as_str());
        assert_eq!(sent[1].template_params["to_email"], "ada@example.com");
    }

    #[test]
    fn notification_params_carry_the_form() {
        let email = configured_email();
        let ident = identity();
        let transport = MockTransport::scripted(vec![Ok(()), Ok(())]);
        let machine = ContactMachine::new(&email, &ident, &transport);

        let mut form = filled_form();
        form.first_name = "  Ada ".into();
        form.last_name = " Lovelace ".into();
        machine.submit(form);

        let sent = transport.sent();
        let params = &sent[0].template_params;
        assert_eq!(params["from_name"], "Ada Lovelace");
        assert_eq!(params["from_email"], "ada@example.com");
        assert_eq!(params["subject"], "Engines");
        assert_eq!(params["message"], "Loved the analytical engine write-up.");
        assert_eq!(sent[0].user_id, "pk_123");
        assert_eq!(sent[1].user_id, "pk_123");
    }

    #[test]
    fn confirmation_params_reverse_the_direction() {
        let email = configured_email();
        let ident = identity();
        let transport = MockTransport::scripted(vec![Ok(()), Ok(())]);
        let machine = ContactMachine::new(&email, &ident, &transport);
        machine.submit(filled_form());

        let sent = transport.sent();
        let params = &sent[1].template_params;
        assert_eq!(params["to_name"], "Ada Lovelace");
        assert_eq!(params["from_name"], ident.name.as_str());
        assert_eq!(params["reply_to"], ident.reply_to.as_str());
    }

    #[test]
    fn failed_notification_stops_everything() {
        let email = configured_email();
        let ident = identity();
        let transport = MockTransport::scripted(vec![Err("HTTP 500: relay down".into())]);
        let machine = ContactMachine::new(&email, &ident, &transport);

        let outcome = machine.submit(filled_form());
        match outcome {
            ContactOutcome::Failure {
                message,
                detail,
                form,
            } => {
                assert_eq!(message, SEND_ERROR_MESSAGE);
                assert_eq!(detail.as_deref(), Some("HTTP 500: relay down"));
                assert_eq!(form, filled_form());
            }
            other => panic!("expected failure, got {other:?}"),
        }
        // No confirmation after a failed notification.
        assert_eq!(transport.sent().len(), 1);
    }

    #[test]
    fn failed_confirmation_is_still_a_success() {
        let email = configured_email();
        let ident = identity();
        let transport =
            MockTransport::scripted(vec![Ok(()), Err("HTTP 400: bad template".into())]);
        let machine = ContactMachine::new(&email, &ident, &transport);

        let outcome = machine.submit(filled_form());
        assert_eq!(
            outcome,
            ContactOutcome::Success {
                auto_reply_error: Some("HTTP 400: bad template".into())
            }
        );
        assert_eq!(transport.sent().len(), 2);
    }

    #[test]
    fn unconfigured_email_short_circuits() {
        let email = EmailConfig::default();
        let ident = identity();
        let transport = MockTransport::scripted(vec![]);
        let machine = ContactMachine::new(&email, &ident, &transport);

        let outcome = machine.submit(filled_form());
        match outcome {
            ContactOutcome::Failure { message, .. } => {
                assert!(message.contains("email.service_id"));
                assert!(message.contains("config.toml"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn blank_credentials_count_as_unconfigured() {
        let email = EmailConfig {
            service_id: Some("  ".into()),
            ..configured_email()
        };
        let ident = identity();
        let transport = MockTransport::scripted(vec![]);
        let machine = ContactMachine::new(&email, &ident, &transport);

        assert!(matches!(
            machine.submit(filled_form()),
            ContactOutcome::Failure { .. }
        ));
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn padded_credentials_send_trimmed() {
        let email = EmailConfig {
            service_id: Some("  service_abc ".into()),
            template_id: Some("template_main  ".into()),
            public_key: Some(" pk_123".into()),
            ..EmailConfig::default()
        };
        let ident = identity();
        let transport = MockTransport::scripted(vec![Ok(()), Ok(())]);
        let machine = ContactMachine::new(&email, &ident, &transport);

        let outcome = machine.submit(filled_form());
        assert!(matches!(outcome, ContactOutcome::Success { .. }));

        let sent = transport.sent();
        assert_eq!(sent[0].service_id, "service_abc");
        assert_eq!(sent[0].template_id, "template_main");
        assert_eq!(sent[0].user_id, "pk_123");
    }

    #[test]
    fn incomplete_form_never_reaches_the_transport() {
        let email = configured_email();
        let ident = identity();
        let transport = MockTransport::scripted(vec![]);
        let machine = ContactMachine::new(&email, &ident, &transport);

        let mut form = filled_form();
        form.subject = "   ".into();
        let outcome = machine.submit(form.clone());
        match outcome {
            ContactOutcome::Failure { message, form: kept, .. } => {
                assert_eq!(message, MISSING_FIELDS_MESSAGE);
                assert_eq!(kept, form);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn form_pairs_trim_and_take_first_value() {
        let pairs = vec![
            ("first_name".to_string(), " Ada ".to_string()),
            ("last_name".to_string(), "Lovelace".to_string()),
            ("email".to_string(), "ada@example.com".to_string()),
            ("email".to_string(), "second@example.com".to_string()),
            ("subject".to_string(), "Hi".to_string()),
            ("message".to_string(), "Hello".to_string()),
        ];
        let form = ContactForm::from_pairs(&pairs);
        assert_eq!(form.first_name, "Ada");
        assert_eq!(form.email, "ada@example.com");
        assert!(form.is_complete());
    }

    #[test]
    fn missing_pairs_read_as_empty() {
        let form = ContactForm::from_pairs(&[]);
        assert_eq!(form, ContactForm::default());
        assert!(!form.is_complete());
    }

    #[test]
    fn wire_body_has_exactly_four_fields() {
        let request = EmailRequest {
            service_id: "s".into(),
            template_id: "t".into(),
            user_id: "u".into(),
            template_params: serde_json::json!({"k": "v"}),
        };
        let value = serde_json::to_value(&request).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["service_id", "template_id", "template_params", "user_id"]);
    }
}
