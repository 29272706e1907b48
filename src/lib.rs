//! # Devfolio
//!
//! A static site generator for a role-aware developer portfolio. Your
//! content directory is the data source: TOML files override the stock
//! profile and settings, résumé PDFs are picked up by filename, and the
//! projects section is populated from a remote API at build time.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! Devfolio builds the site through three independent stages, each
//! producing a JSON artifact that the next stage consumes:
//!
//! ```text
//! 1. Scan      content/   →  manifest.json    (config + profile → structured data)
//! 2. Fetch     API        →  projects.json    (remote project list, cached)
//! 3. Generate  manifests  →  dist/            (one HTML page per role)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: each artifact is human-readable JSON you can inspect.
//! - **Offline rebuilds**: the fetch stage caches endpoint responses, so
//!   iterating on content or styling doesn't hammer (or require) the API.
//! - **Testability**: scan and generate are functions from directory to
//!   manifest and manifest to HTML, so tests drive them with plain files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — resolves config, profile, and résumé files into the scan manifest |
//! | [`projects`] | Stage 2 — fetches the project list, caches it, models the gallery states |
//! | [`generate`] | Stage 3 — assembles CSS and writes the role pages from the staged manifests |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS variable generation |
//! | [`content`] | Profile data model with complete stock content and `profile.toml` overrides |
//! | [`render`] | Maud components and page renderers shared by generate and serve |
//! | [`typewriter`] | Typed-text animation state machine and its CSS keyframe compiler |
//! | [`resolve`] | Role resolution from URL queries and form-body decoding |
//! | [`contact`] | Contact form validation and the two-email send sequence |
//! | [`serve`] | Local preview server: static files, role queries, `POST /contact` |
//! | [`output`] | CLI output formatting — inventory display of pipeline results |
//!
//! # Design Decisions
//!
//! ## One Page Per Role
//!
//! The portfolio presents the same person as a full-stack, frontend, or
//! backend developer. Rather than switching content at runtime, the
//! generator writes one complete page per role (`/`, `/frontend/`,
//! `/backend/`) and cross-links them in the footer. Query-style links
//! (`/?frontend`) keep working in serve mode through [`resolve`], which
//! maps them onto the same pre-generated pages.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a
//! compile-time HTML macro system, rather than Handlebars or Tera:
//! malformed markup is a build error, template variables are Rust
//! expressions, interpolation is escaped by default, and there is no
//! template directory to ship or get out of sync.
//!
//! ## Interactivity Without JavaScript
//!
//! The generated pages carry no scripts. The typed-text headline is a
//! stack of spans revealed by generated `@keyframes` ([`typewriter`]),
//! category filtering is radio inputs plus sibling selectors
//! ([`projects::filter_css`]), the mobile nav is a checkbox, and long
//! project descriptions use `<details>`. The one thing that genuinely
//! needs a server — the contact form — degrades to a clear error page
//! when the site is hosted without the serve binary.
//!
//! ## Errors As Page States
//!
//! A missing API endpoint or a failed fetch must not take the whole
//! portfolio down. The projects manifest carries a state
//! (`loaded` / `config_error` / `fetch_error`) and the renderer shows a
//! notice for the error states, so the build always completes and the
//! rest of the page is unaffected.
//!
//! # The Static Premise
//!
//! The output is plain HTML and CSS. It can be dropped on any file
//! server or CDN — no Node, no database, no client-side hydration. The
//! binary is only needed at build time and, optionally, in serve mode
//! to relay contact form submissions.

pub mod config;
pub mod contact;
pub mod content;
pub mod generate;
pub mod output;
pub mod projects;
pub mod render;
pub mod resolve;
pub mod scan;
pub mod serve;
pub mod typewriter;
