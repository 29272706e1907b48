//! Contact relay against a scripted EmailJS endpoint.
//!
//! A local `tiny_http` stub plays the email API: it records every POST
//! body and answers with a scripted status code. The tests drive the
//! relay both directly through `ContactMachine` and end-to-end through
//! the preview server's `POST /contact`.
//!
//! Run with: cargo test --test contact_relay

use devfolio::config::EmailConfig;
use devfolio::contact::{
    ContactForm, ContactMachine, ContactOutcome, EMAIL_SEND_PATH, EmailJsTransport,
    SEND_ERROR_MESSAGE,
};
use devfolio::content::{Identity, Profile};
use devfolio::generate;
use devfolio::projects::{self, ProjectsManifest};
use devfolio::scan;
use devfolio::serve::{ServeContext, handle_request};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;

// ---------------------------------------------------------------------------
// The endpoint stub
// ---------------------------------------------------------------------------

/// One recorded send: the request path and the parsed JSON body.
type Recorded = (String, serde_json::Value);

struct EmailStub {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl EmailStub {
    /// Answers requests in order with the given statuses; 200 once the
    /// script runs out.
    fn spawn(statuses: Vec<u16>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            let mut statuses = statuses.into_iter();
            for mut request in server.incoming_requests() {
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let json: serde_json::Value =
                    serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
                recorded
                    .lock()
                    .unwrap()
                    .push((request.url().to_string(), json));

                let status = statuses.next().unwrap_or(200);
                let _ = request.respond(
                    tiny_http::Response::from_string("relay says no")
                        .with_status_code(tiny_http::StatusCode(status)),
                );
            }
        });

        Self { addr, requests }
    }

    fn api_base(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn recorded(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn configured_email(api_base: String) -> EmailConfig {
    EmailConfig {
        service_id: Some("service_abc".into()),
        template_id: Some("template_main".into()),
        public_key: Some("pk_123".into()),
        api_base,
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

// ---------------------------------------------------------------------------
// Machine against the stub
// ---------------------------------------------------------------------------

#[test]
fn notification_and_confirmation_hit_the_send_endpoint() {
    let stub = EmailStub::spawn(vec![200, 200]);
    let email = configured_email(stub.api_base());
    let ident = identity();
    let transport = EmailJsTransport::new(&email.api_base);
    let machine = ContactMachine::new(&email, &ident, &transport);

    let outcome = machine.submit(filled_form());
    assert_eq!(outcome, ContactOutcome::Success { auto_reply_error: None });

    let sent = stub.recorded();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, EMAIL_SEND_PATH);
    assert_eq!(sent[1].0, EMAIL_SEND_PATH);
}

#[test]
fn wire_bodies_carry_credentials_and_params() {
    let stub = EmailStub::spawn(vec![200, 200]);
    let email = configured_email(stub.api_base());
    let ident = identity();
    let transport = EmailJsTransport::new(&email.api_base);
    let machine = ContactMachine::new(&email, &ident, &transport);

    machine.submit(filled_form());

    let sent = stub.recorded();
    let notification = &sent[0].1;
    assert_eq!(notification["service_id"], "service_abc");
    assert_eq!(notification["template_id"], "template_main");
    assert_eq!(notification["user_id"], "pk_123");
    assert_eq!(notification["template_params"]["from_name"], "Ada Lovelace");
    assert_eq!(notification["template_params"]["from_email"], "ada@example.com");
    assert_eq!(notification["template_params"]["subject"], "Engines");
    assert_eq!(notification["template_params"]["to_name"], ident.name.as_str());

    let confirmation = &sent[1].1;
    assert_eq!(confirmation["template_id"], email.auto_reply_template_id.as_str());
    assert_eq!(confirmation["template_params"]["to_email"], "ada@example.com");
    assert_eq!(confirmation["template_params"]["from_name"], ident.name.as_str());
}

#[test]
fn rejected_notification_is_a_failure_and_stops_there() {
    let stub = EmailStub::spawn(vec![500]);
    let email = configured_email(stub.api_base());
    let ident = identity();
    let transport = EmailJsTransport::new(&email.api_base);
    let machine = ContactMachine::new(&email, &ident, &transport);

    let outcome = machine.submit(filled_form());
    match outcome {
        ContactOutcome::Failure { message, detail, form } => {
            assert_eq!(message, SEND_ERROR_MESSAGE);
            assert_eq!(detail.as_deref(), Some("HTTP 500: relay says no"));
            assert_eq!(form, filled_form());
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(stub.recorded().len(), 1);
}

#[test]
fn rejected_confirmation_is_still_a_success() {
    let stub = EmailStub::spawn(vec![200, 502]);
    let email = configured_email(stub.api_base());
    let ident = identity();
    let transport = EmailJsTransport::new(&email.api_base);
    let machine = ContactMachine::new(&email, &ident, &transport);

    let outcome = machine.submit(filled_form());
    assert_eq!(
        outcome,
        ContactOutcome::Success {
            auto_reply_error: Some("HTTP 502: relay says no".into())
        }
    );
    assert_eq!(stub.recorded().len(), 2);
}

#[test]
fn unreachable_endpoint_is_a_failure_with_detail() {
    // Nothing listens here; connect fails immediately.
    let email = configured_email("http://127.0.0.1:1".into());
    let ident = identity();
    let transport = EmailJsTransport::new(&email.api_base);
    let machine = ContactMachine::new(&email, &ident, &transport);

    match machine.submit(filled_form()) {
        ContactOutcome::Failure { message, detail, .. } => {
            assert_eq!(message, SEND_ERROR_MESSAGE);
            assert!(detail.unwrap().contains("POST http://127.0.0.1:1"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// End-to-end through POST /contact
// ---------------------------------------------------------------------------

/// Build a site whose config points the email relay at `api_base`, then
/// serve it on an ephemeral port.
fn start_site_with_relay(root: &Path, api_base: &str) -> SocketAddr {
    let content = root.join("content");
    let temp = root.join("temp");
    let output = root.join("dist");

    fs::create_dir_all(&content).unwrap();
    fs::write(
        content.join("config.toml"),
        format!(
            r#"
[email]
service_id = "service_abc"
template_id = "template_main"
public_key = "pk_123"
api_base = "{api_base}"
"#
        ),
    )
    .unwrap();

    let manifest = scan::scan(&content).unwrap();
    fs::create_dir_all(&temp).unwrap();
    fs::write(
        temp.join(scan::MANIFEST_FILENAME),
        serde_json::to_string_pretty(&manifest).unwrap(),
    )
    .unwrap();
    projects::write_projects_manifest(&temp, &ProjectsManifest::loaded(Vec::new())).unwrap();
    generate::generate(&temp, &content, &output).unwrap();

    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let ctx = ServeContext::new(manifest, output);
    thread::spawn(move || {
        for request in server.incoming_requests() {
            let _ = handle_request(request, &ctx);
        }
    });
    addr
}

#[test]
fn posted_form_relays_and_renders_the_success_page() {
    let stub = EmailStub::spawn(vec![200, 200]);
    let dir = tempfile::tempdir().unwrap();
    let addr = start_site_with_relay(dir.path(), &stub.api_base());

    let resp = reqwest::blocking::Client::new()
        .post(format!("http://{addr}/contact"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(
            "role=frontend&first_name=Ada&last_name=Lovelace\
             &email=ada%40example.com&subject=Hello&message=A+fine+site",
        )
        .send()
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body = resp.text().unwrap();
    assert!(body.contains("Message sent"));
    // Bounces back to the page the form was on.
    assert!(body.contains("3;url=/frontend/#contact"));

    let sent = stub.recorded();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].1["template_params"]["message"], "A fine site");
    assert_eq!(sent[1].1["template_params"]["to_name"], "Ada Lovelace");
}

#[test]
fn posted_form_renders_the_error_page_when_the_relay_rejects() {
    let stub = EmailStub::spawn(vec![503]);
    let dir = tempfile::tempdir().unwrap();
    let addr = start_site_with_relay(dir.path(), &stub.api_base());

    let body = reqwest::blocking::Client::new()
        .post(format!("http://{addr}/contact"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("first_name=Ada&last_name=Lovelace&email=ada%40example.com&subject=Hi&message=Hello")
        .send()
        .unwrap()
        .text()
        .unwrap();

    assert!(body.contains("Message not sent"));
    assert!(body.contains(SEND_ERROR_MESSAGE));
    // The form comes back filled in.
    assert!(body.contains(r#"value="Ada""#));
    assert!(body.contains(r#"value="ada@example.com""#));
    assert_eq!(stub.recorded().len(), 1);
}
