//! Local preview server.
//!
//! Serves the generated site over HTTP for review before deploying the
//! output directory to real hosting. Almost everything is static file
//! serving; the two dynamic behaviors are:
//!
//! - **Role queries**: a page request whose query carries a role signal
//!   (`/?frontend`, `/?role=backend`) is answered with that role's
//!   pre-generated page, so query-style role links keep working
//!   alongside the path-style ones.
//! - **`POST /contact`**: parses the form body, relays the message
//!   through the configured email service, and responds with a rendered
//!   outcome page. The success page carries a meta refresh back to the
//!   contact section; the error page re-fills the form.
//!
//! Built on `tiny_http`. The accept loop blocks on the main thread and
//! a Ctrl+C handler unblocks it for clean shutdown.

use crate::contact::{ContactForm, ContactMachine, ContactOutcome, EmailJsTransport};
use crate::content::RoleKey;
use crate::generate;
use crate::render;
use crate::resolve;
use crate::scan::{self, Manifest, ScanError};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Cursor};
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Consecutive ports to try past the configured one.
const MAX_PORT_RETRIES: u16 = 10;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("{0} not found; run 'devfolio build' first")]
    MissingSite(String),
    #[error("invalid scan manifest: {0}")]
    Manifest(ScanError),
    #[error("invalid serve.interface {value:?}: {source}")]
    Interface {
        value: String,
        source: AddrParseError,
    },
    #[error("failed to bind after {attempts} attempts (ports {first}-{last}): {source}")]
    Bind {
        attempts: u16,
        first: u16,
        last: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to set Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Everything a request handler needs, assembled once at startup.
pub struct ServeContext {
    manifest: Manifest,
    output_dir: PathBuf,
    /// Stylesheet for the contact outcome pages. No typed-text
    /// keyframes or filter rules; those pages have neither.
    outcome_css: String,
}

impl ServeContext {
    pub fn new(manifest: Manifest, output_dir: PathBuf) -> Self {
        let outcome_css = generate::base_css(&manifest);
        Self {
            manifest,
            output_dir,
            outcome_css,
        }
    }
}

/// Serve the generated site until Ctrl+C.
pub fn serve(temp_dir: &Path, output_dir: &Path) -> Result<(), ServeError> {
    let manifest = scan::read_manifest(temp_dir).map_err(|err| match err {
        ScanError::Io(source) if source.kind() == io::ErrorKind::NotFound => {
            ServeError::MissingSite(temp_dir.join(scan::MANIFEST_FILENAME).display().to_string())
        }
        ScanError::Io(source) => ServeError::Io(source),
        other => ServeError::Manifest(other),
    })?;
    if !output_dir.join("index.html").is_file() {
        return Err(ServeError::MissingSite(
            output_dir.join("index.html").display().to_string(),
        ));
    }

    let interface: IpAddr =
        manifest
            .config
            .serve
            .interface
            .parse()
            .map_err(|source| ServeError::Interface {
                value: manifest.config.serve.interface.clone(),
                source,
            })?;
    let (server, addr) = try_bind_port(interface, manifest.config.serve.port)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        println!("Shutting down");
        server_for_signal.unblock();
    })?;

    let ctx = ServeContext::new(manifest, output_dir.to_path_buf());
    println!("Serving {} at http://{addr}", output_dir.display());

    for request in server.incoming_requests() {
        if let Err(err) = handle_request(request, &ctx) {
            eprintln!("Request error: {err}");
        }
    }

    Ok(())
}

/// Bind the base port, falling forward through the next ports when it
/// is taken.
fn try_bind_port(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr), ServeError> {
    let mut last_err: Option<Box<dyn std::error::Error + Send + Sync>> = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    println!("Port {base_port} in use, using {port} instead");
                }
                return Ok((server, addr));
            }
            Err(err) => last_err = Some(err),
        }
    }
    Err(ServeError::Bind {
        attempts: MAX_PORT_RETRIES,
        first: base_port,
        last: base_port.saturating_add(MAX_PORT_RETRIES - 1),
        source: last_err.unwrap_or_else(|| "no bind attempts made".into()),
    })
}

/// Handle one request.
///
/// Resolution order: `POST /contact`, then query-selected role pages,
/// then exact file match, then directory `index.html`, then 404.
pub fn handle_request(request: Request, ctx: &ServeContext) -> io::Result<()> {
    let url = request.url().to_string();
    let (raw_path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
    let request_path = percent_decode(raw_path).trim_matches('/').to_string();

    if *request.method() == Method::Post && request_path == "contact" {
        return handle_contact(request, ctx);
    }

    // No parent-directory escapes.
    if request_path.split('/').any(|segment| segment == "..") {
        return serve_not_found(request, ctx);
    }

    // A page path with an explicit role query answers with that role's
    // page regardless of which page path was asked for.
    if page_role(&request_path).is_some() {
        let resolution = resolve::resolve_role(query);
        if resolution.is_custom {
            let page = generate::role_page_path(&ctx.output_dir, resolution.key);
            if page.is_file() {
                return serve_file(request, &page);
            }
        }
    }

    let local_path = ctx.output_dir.join(&request_path);
    if local_path.is_file() {
        return serve_file(request, &local_path);
    }
    if local_path.is_dir() {
        let index_path = local_path.join("index.html");
        if index_path.is_file() {
            return serve_file(request, &index_path);
        }
    }

    serve_not_found(request, ctx)
}

/// Relay the contact form and answer with an outcome page.
fn handle_contact(mut request: Request, ctx: &ServeContext) -> io::Result<()> {
    let mut body = String::new();
    request.as_reader().read_to_string(&mut body)?;

    let pairs = resolve::parse_form(&body);
    let role = pairs
        .iter()
        .find(|(key, _)| key == "role")
        .map_or(RoleKey::Fullstack, |(_, value)| form_role(value));
    let form = ContactForm::from_pairs(&pairs);

    let transport = EmailJsTransport::new(&ctx.manifest.config.email.api_base);
    let machine = ContactMachine::new(
        &ctx.manifest.config.email,
        &ctx.manifest.profile.identity,
        &transport,
    );

    match machine.submit(form) {
        ContactOutcome::Success { auto_reply_error } => {
            if let Some(err) = auto_reply_error {
                eprintln!("Confirmation email failed: {err}");
            }
            let html = render::render_contact_success(&ctx.manifest, role, &ctx.outcome_css);
            serve_html(request, html.into_string())
        }
        ContactOutcome::Failure {
            message,
            detail,
            form,
        } => {
            if let Some(detail) = detail {
                eprintln!("Contact send failed: {detail}");
            }
            let html =
                render::render_contact_failure(&ctx.manifest, role, &message, &form, &ctx.outcome_css);
            serve_html(request, html.into_string())
        }
    }
}

/// Decode percent escapes; undecodable input passes through unchanged.
fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// The role whose pre-generated page this path names, if any.
fn page_role(request_path: &str) -> Option<RoleKey> {
    RoleKey::ALL.iter().copied().find(|role| {
        let dir = role.page_dir();
        if dir.is_empty() {
            request_path.is_empty() || request_path == "index.html"
        } else {
            request_path == dir || request_path == format!("{dir}/index.html")
        }
    })
}

/// Map the hidden form field back to a role.
fn form_role(value: &str) -> RoleKey {
    RoleKey::ALL
        .iter()
        .copied()
        .find(|role| role.as_str() == value)
        .unwrap_or(RoleKey::Fullstack)
}

fn serve_file(request: Request, path: &Path) -> io::Result<()> {
    let content = fs::read(path)?;
    let content_type = guess_content_type(path);

    let response = Response::from_data(content)
        .with_header(Header::from_bytes("Content-Type", content_type).unwrap());
    request.respond(response)
}

fn serve_html(request: Request, content: String) -> io::Result<()> {
    let response = Response::from_string(content)
        .with_header(Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap());
    request.respond(response)
}

/// Answer with the generated 404 page, or plain text when the build
/// didn't produce one.
fn serve_not_found(request: Request, ctx: &ServeContext) -> io::Result<()> {
    if let Ok(content) = fs::read(ctx.output_dir.join("404.html")) {
        let response = Response::from_data(content)
            .with_status_code(StatusCode(404))
            .with_header(Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap());
        return request.respond(response);
    }

    let response = Response::new(
        StatusCode(404),
        vec![Header::from_bytes("Content-Type", "text/plain").unwrap()],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)
}

/// MIME type from the file extension. `application/octet-stream` for
/// anything unrecognized.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_cover_site_files() {
        assert_eq!(
            guess_content_type(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            guess_content_type(Path::new("resumes/fullstack-resume.pdf")),
            "application/pdf"
        );
        assert_eq!(guess_content_type(Path::new("assets/favicon.ico")), "image/x-icon");
        assert_eq!(guess_content_type(Path::new("assets/photo.webp")), "image/webp");
        assert_eq!(
            guess_content_type(Path::new("mystery.bin")),
            "application/octet-stream"
        );
        assert_eq!(
            guess_content_type(Path::new("no-extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn page_role_matches_page_paths_only() {
        assert_eq!(page_role(""), Some(RoleKey::Fullstack));
        assert_eq!(page_role("index.html"), Some(RoleKey::Fullstack));
        assert_eq!(page_role("frontend"), Some(RoleKey::Frontend));
        assert_eq!(page_role("frontend/index.html"), Some(RoleKey::Frontend));
        assert_eq!(page_role("backend"), Some(RoleKey::Backend));
        assert_eq!(page_role("assets/favicon.ico"), None);
        assert_eq!(page_role("404.html"), None);
    }

    #[test]
    fn form_role_falls_back_to_default() {
        assert_eq!(form_role("frontend"), RoleKey::Frontend);
        assert_eq!(form_role("backend"), RoleKey::Backend);
        assert_eq!(form_role("fullstack"), RoleKey::Fullstack);
        assert_eq!(form_role("designer"), RoleKey::Fullstack);
        assert_eq!(form_role(""), RoleKey::Fullstack);
    }

    #[test]
    fn percent_decode_handles_escapes_and_garbage() {
        assert_eq!(percent_decode("/r%C3%A9sum%C3%A9.pdf"), "/résumé.pdf");
        assert_eq!(percent_decode("/plain/path"), "/plain/path");
        assert_eq!(percent_decode("/bad%zz"), "/bad%zz");
    }
}
