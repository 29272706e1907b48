//! HTML components and page templates.
//!
//! Everything here is pure: manifest in, [`Markup`] out. File IO and
//! CSS assembly live in the generate stage; the preview server reuses
//! these renderers for the contact outcome pages.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! templating. Templates are type-safe Rust code with automatic XSS
//! escaping — endpoint data (project titles, descriptions) and form
//! echoes pass through untrusted.
//!
//! ## Interactivity without JavaScript
//!
//! The pages ship no scripts. The moving parts are CSS and HTML:
//!
//! - Typed-text animation: stacked `.typed-frame` spans driven by
//!   generated `@keyframes` (see the typewriter module).
//! - Project filtering: hidden radio inputs; generated sibling rules
//!   hide non-matching cards.
//! - Long project descriptions: `<details>`.
//! - Mobile navigation: the checkbox-hamburger pattern.
//! - Contact success: a `meta refresh` bounce back to the form.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

use crate::contact::{self, ContactForm};
use crate::content::{ContentBundle, Identity, Profile, RoleKey};
use crate::projects::{self, GalleryState, Project, ProjectsManifest};
use crate::scan::{self, Manifest, ResumeFile};
use crate::typewriter::Frame;

/// Numbered anchor links shown in the navbar and the footer.
const NAV_SECTIONS: [(&str, &str, &str); 5] = [
    ("01", "Home", "#home"),
    ("02", "About", "#about"),
    ("03", "Experience", "#experience"),
    ("04", "Work", "#projects"),
    ("05", "Contact", "#contact"),
];

/// Convert markdown to HTML markup.
pub fn markdown_to_html(markdown: &str) -> Markup {
    let parser = Parser::new(markdown);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    PreEscaped(body_html)
}

struct PageMeta {
    title: String,
    description: String,
    /// Canonical URL; also enables the OG/twitter tags.
    canonical: Option<String>,
    json_ld: Option<String>,
    /// `meta http-equiv=refresh` payload, e.g. `"3;url=/#contact"`.
    refresh: Option<String>,
}

/// Renders the base HTML document structure.
fn base_document(page: &PageMeta, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page.title) }
                meta name="description" content=(page.description);
                @if let Some(url) = &page.canonical {
                    link rel="canonical" href=(url);
                    meta property="og:type" content="website";
                    meta property="og:title" content=(page.title);
                    meta property="og:description" content=(page.description);
                    meta property="og:url" content=(url);
                    meta name="twitter:card" content="summary";
                }
                @if let Some(refresh) = &page.refresh {
                    meta http-equiv="refresh" content=(refresh);
                }
                @if let Some(json) = &page.json_ld {
                    script type="application/ld+json" { (PreEscaped(json.as_str())) }
                }
                style { (css) }
            }
            body {
                (content)
            }
        }
    }
}

fn canonical_url(identity: &Identity, role: RoleKey) -> String {
    format!(
        "{}{}",
        identity.site_url.trim_end_matches('/'),
        role.page_path()
    )
}

/// Schema.org Person block for the role page head.
///
/// `<` is escaped to `\u003c` so profile text can never terminate the
/// script element early.
fn person_json_ld(identity: &Identity, bundle: &ContentBundle, canonical: &str) -> String {
    serde_json::json!({
        "@context": "https://schema.org",
        "@type": "Person",
        "name": identity.name,
        "jobTitle": bundle.hero_title,
        "description": bundle.hero_subtitle,
        "url": canonical,
        "email": identity.email,
        "telephone": identity.phone,
        "knowsAbout": [bundle.focus],
        "alumniOf": {
            "@type": "EducationalOrganization",
            "name": identity.alumni_of,
        },
        "address": {
            "@type": "PostalAddress",
            "addressLocality": identity.location,
            "addressCountry": identity.country,
        },
        "sameAs": [identity.github, identity.linkedin],
    })
    .to_string()
    .replace('<', "\\u003c")
}

// ============================================================================
// Components
// ============================================================================

/// Fixed navbar: brand, numbered section links, résumé download.
/// Collapses to a checkbox-driven hamburger panel on small screens.
fn navbar(
    identity: &Identity,
    bundle: &ContentBundle,
    role: RoleKey,
    resume: Option<&ResumeFile>,
) -> Markup {
    html! {
        header.site-header {
            nav.navbar {
                a.brand href=(role.page_path()) {
                    span.brand-name { (identity.name) }
                    span.brand-badge { (bundle.badge) }
                }
                input.nav-toggle type="checkbox" id="nav-toggle";
                label.nav-hamburger for="nav-toggle" {
                    span.hamburger-line {}
                    span.hamburger-line {}
                    span.hamburger-line {}
                }
                div.nav-panel {
                    label.nav-close for="nav-toggle" { "×" }
                    ul.nav-links {
                        @for (number, label, target) in NAV_SECTIONS {
                            li {
                                a href=(target) {
                                    span.nav-number { (number) "." }
                                    " "
                                    (label)
                                }
                            }
                        }
                        @if let Some(resume) = resume {
                            li {
                                a.btn-resume href=(resume_href(resume)) download {
                                    (bundle.resume_label)
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn resume_href(resume: &ResumeFile) -> String {
    format!("/{}/{}", scan::RESUMES_DIR, resume.file)
}

fn hero(identity: &Identity, bundle: &ContentBundle, frames: &[Frame]) -> Markup {
    html! {
        section.hero id="home" {
            div.hero-inner {
                span.availability-badge {
                    span.pulse-dot aria-hidden="true" {}
                    (identity.availability)
                }
                p.hero-greeting { "Hello, I'm" }
                h1.hero-name { (identity.name) }
                h2.hero-title { (bundle.hero_title) }
                p.typed-line {
                    span.typed-text aria-hidden="true" {
                        @for frame in frames {
                            span.typed-frame { (frame.text) }
                        }
                    }
                    span.sr-only { (bundle.typing_roles.join(", ")) }
                }
                p.hero-subtitle { (bundle.hero_subtitle) }
                div.hero-actions {
                    a.btn.btn-primary href="#projects" { "Explore My Work" }
                    a.btn.btn-secondary href="#contact" { "Get In Touch" }
                }
                div.hero-socials {
                    a href=(identity.github) target="_blank" rel="noopener" { "GitHub" }
                    a href=(identity.linkedin) target="_blank" rel="noopener" { "LinkedIn" }
                    a href={ "mailto:" (identity.email) } { "Email" }
                    a href={ "tel:" (identity.phone) } { "Phone" }
                }
            }
        }
    }
}

fn about_section(profile: &Profile, bundle: &ContentBundle) -> Markup {
    html! {
        section.section.about-section id="about" {
            span.section-label { "About" }
            h2.section-heading { "About Me" }
            div.about-body { (markdown_to_html(&bundle.about)) }
            div.stats-row {
                @for stat in &profile.stats {
                    div.stat {
                        span.stat-value { (stat.value) (stat.suffix) }
                        span.stat-label { (stat.label) }
                    }
                }
            }
            h3.subheading { "Areas of Expertise" }
            div.expertise-grid {
                @for area in &bundle.expertise {
                    article.expertise-card {
                        h4 { (area.title) }
                        p { (area.description) }
                        ul.tech-chips {
                            @for tech in &area.technologies {
                                li.chip { (tech) }
                            }
                        }
                    }
                }
            }
            p.expertise-note { (bundle.expertise_note) }
        }
    }
}

/// Work history. Achievements are capped at three per entry to keep the
/// cards scannable; the résumé carries the full list.
fn experience_section(profile: &Profile, resume: Option<&ResumeFile>) -> Markup {
    html! {
        section.section.experience-section id="experience" {
            span.section-label { "Career" }
            h2.section-heading { "Where I've Worked" }
            div.exp-list {
                @for exp in &profile.experience {
                    article.exp-card.(format!("exp-{}", exp.color)) {
                        header.exp-header {
                            div.exp-role {
                                h3.exp-position { (exp.position) }
                                p.exp-company { (exp.company) }
                            }
                            div.exp-meta {
                                span.exp-type { (exp.employment_type) }
                                span.exp-duration { (exp.duration) }
                                span.exp-location { (exp.location) }
                            }
                        }
                        p.exp-description { (exp.description) }
                        ul.exp-achievements {
                            @for achievement in exp.achievements.iter().take(3) {
                                li {
                                    span.ach-icon.(format!("icon-{}", achievement.icon)) aria-hidden="true" {}
                                    span.ach-text { (achievement.text) }
                                    span.ach-metric { (achievement.metric) }
                                }
                            }
                        }
                        ul.tech-chips {
                            @for tech in &exp.technologies {
                                li.chip { (tech) }
                            }
                        }
                    }
                }
            }
            @if let Some(resume) = resume {
                p.resume-callout {
                    a.btn.btn-secondary href=(resume_href(resume)) download { "View Full Resume" }
                }
            }
        }
    }
}

/// The project gallery, with the filter radios as direct children of
/// the section so the generated sibling rules can reach the grids.
fn projects_section(gallery: &ProjectsManifest, role: RoleKey) -> Markup {
    let has_projects =
        gallery.state == GalleryState::Loaded && !gallery.projects.is_empty();
    html! {
        section.section.projects-section id="projects" {
            @if has_projects {
                @for (idx, category) in projects::categories(&gallery.projects).iter().enumerate() {
                    input.filter-input type="radio" name="project-filter"
                        id=(projects::filter_id(category)) checked[idx == 0];
                }
            }
            span.section-label { "Portfolio" }
            h2.section-heading { "Featured Work" }
            (projects_body(gallery, role))
        }
    }
}

fn projects_body(gallery: &ProjectsManifest, role: RoleKey) -> Markup {
    match &gallery.state {
        GalleryState::ConfigError { message } => html! {
            div.gallery-notice.gallery-config-error {
                h3 { "Projects feed not configured" }
                p.notice-detail { (message) }
            }
        },
        GalleryState::FetchError { message } => html! {
            div.gallery-notice.gallery-fetch-error {
                h3 { "Projects unavailable" }
                p.notice-detail { (message) }
                a.btn.btn-secondary href={ (role.page_path()) "#projects" } { "Reload" }
            }
        },
        GalleryState::Loaded if gallery.projects.is_empty() => html! {
            p.gallery-empty { "No projects to show yet." }
        },
        GalleryState::Loaded => {
            let (featured, rest) = projects::partition_featured(&gallery.projects);
            html! {
                div.filter-bar role="group" aria-label="Filter projects by category" {
                    @for category in projects::categories(&gallery.projects) {
                        label.filter-chip for=(projects::filter_id(&category)) {
                            @if category == projects::ALL_CATEGORY { "All" } @else { (category) }
                        }
                    }
                }
                @if !featured.is_empty() {
                    div.featured-projects {
                        h3.subheading { "Featured Projects" }
                        div.projects-grid {
                            @for project in &featured {
                                (project_card(project, true))
                            }
                        }
                    }
                }
                @if !rest.is_empty() {
                    div.more-projects {
                        h3.subheading { "More Projects" }
                        div.projects-grid.projects-grid-compact {
                            @for project in &rest {
                                (project_card(project, false))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn project_card(project: &Project, featured: bool) -> Markup {
    let tags = projects::normalize_technologies(&project.technologies);
    let extra = tags.len().saturating_sub(3);
    html! {
        article.project-card.(projects::filter_id(&project.category)) {
            @if featured {
                @if let Some(image) = non_blank(&project.image) {
                    img.project-image src=(image) alt=(project.title) loading="lazy";
                }
            }
            div.project-body {
                span.project-category { (project.category) }
                h4.project-title { (project.title) }
                p.project-description { (project.description) }
                @if let Some(long) = non_blank(&project.long_description) {
                    details.project-details {
                        summary { "More about this project" }
                        div.project-long { (markdown_to_html(long)) }
                    }
                }
                ul.tech-chips {
                    @for tag in tags.iter().take(3) {
                        li.chip { (tag) }
                    }
                    @if extra > 0 {
                        li.chip.chip-more { "+" (extra) }
                    }
                }
                div.project-links {
                    @if let Some(href) = non_blank(&project.github_link) {
                        a href=(href) target="_blank" rel="noopener" { "Code" }
                    }
                    @if let Some(href) = non_blank(&project.live_link) {
                        a href=(href) target="_blank" rel="noopener" { "Live" }
                    }
                    @if let Some(stats) = &project.stats {
                        span.project-stats {
                            (stats.stars) " stars · " (stats.forks) " forks"
                        }
                    }
                }
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Contact info plus the form. `prefill` echoes a failed submission;
/// `error` renders the banner above the fields.
fn contact_section(
    identity: &Identity,
    role: RoleKey,
    prefill: &ContactForm,
    error: Option<&str>,
) -> Markup {
    html! {
        section.section.contact-section id="contact" {
            span.section-label { "Contact" }
            h2.section-heading { "Let's Connect" }
            div.contact-grid {
                div.contact-info {
                    h3 { "Reach me directly" }
                    ul.contact-list {
                        li {
                            span.contact-label { "Email" }
                            a href={ "mailto:" (identity.email) } { (identity.email) }
                        }
                        li {
                            span.contact-label { "Phone" }
                            a href={ "tel:" (identity.phone) } { (identity.phone_display) }
                        }
                        li {
                            span.contact-label { "Location" }
                            span { (identity.location) }
                        }
                    }
                    p.contact-availability { (identity.availability) }
                }
                form.contact-form action="/contact" method="post" {
                    @if let Some(message) = error {
                        p.form-error role="alert" { (message) }
                    }
                    @if !role.is_default() {
                        input type="hidden" name="role" value=(role.as_str());
                    }
                    div.form-row {
                        label {
                            "First Name"
                            input type="text" name="first_name" value=(prefill.first_name) required;
                        }
                        label {
                            "Last Name"
                            input type="text" name="last_name" value=(prefill.last_name) required;
                        }
                    }
                    label {
                        "Email"
                        input type="email" name="email" value=(prefill.email) required;
                    }
                    label {
                        "Subject"
                        input type="text" name="subject" value=(prefill.subject) required;
                    }
                    label {
                        "Message"
                        textarea name="message" rows="6" required { (prefill.message) }
                    }
                    button.btn.btn-primary type="submit" { "Send Message" }
                }
            }
        }
    }
}

/// Footer: brand + tagline, section links, contact CTA, socials, the
/// role switcher, copyright.
fn site_footer(profile: &Profile, role: RoleKey) -> Markup {
    let identity = &profile.identity;
    let bundle = profile.bundle(role);
    html! {
        footer.site-footer {
            div.footer-grid {
                div.footer-brand {
                    h3 { (identity.name) }
                    p.footer-tagline {
                        (bundle.badge) " crafting elegant digital experiences."
                    }
                    p.footer-availability {
                        "Currently available for freelance work and exciting "
                        "full-time opportunities."
                    }
                }
                nav.footer-nav {
                    h4 { "Navigation" }
                    @for (_, label, target) in NAV_SECTIONS {
                        a href=(target) { (label) }
                    }
                }
                div.footer-cta {
                    h4 { "Let's Connect" }
                    a.btn.btn-primary href="#contact" { "Get in Touch" }
                }
            }
            div.footer-socials {
                a href=(identity.github) target="_blank" rel="noopener" { "GitHub" }
                a href=(identity.linkedin) target="_blank" rel="noopener" { "LinkedIn" }
                a href={ "mailto:" (identity.email) } { "Email" }
            }
            div.role-switcher {
                span.switcher-label { "View as:" }
                @for &other in RoleKey::ALL.iter() {
                    @if other == role {
                        span.role-current { (profile.bundle(other).badge) }
                    } @else {
                        a href=(other.page_path()) { (profile.bundle(other).badge) }
                    }
                }
            }
            p.copyright { "© " (identity.name) ". All rights reserved." }
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// One complete role page (`/`, `/frontend/`, or `/backend/`).
pub fn render_role_page(
    manifest: &Manifest,
    gallery: &ProjectsManifest,
    role: RoleKey,
    frames: &[Frame],
    css: &str,
) -> Markup {
    let identity = &manifest.profile.identity;
    let bundle = manifest.profile.bundle(role);
    let resume = manifest.resume_for(role).filter(|r| r.present);
    let canonical = canonical_url(identity, role);

    let page = PageMeta {
        title: format!("{} - {} Portfolio", identity.name, bundle.hero_title),
        description: bundle.hero_subtitle.clone(),
        json_ld: Some(person_json_ld(identity, bundle, &canonical)),
        canonical: Some(canonical),
        refresh: None,
    };

    let content = html! {
        (navbar(identity, bundle, role, resume))
        main.site-main {
            (hero(identity, bundle, frames))
            (about_section(&manifest.profile, bundle))
            (experience_section(&manifest.profile, resume))
            (projects_section(gallery, role))
            (contact_section(identity, role, &ContactForm::default(), None))
        }
        (site_footer(&manifest.profile, role))
    };

    base_document(&page, css, content)
}

/// Confirmation page after a delivered contact submission. Bounces back
/// to the originating role page after a few seconds.
pub fn render_contact_success(manifest: &Manifest, role: RoleKey, css: &str) -> Markup {
    let identity = &manifest.profile.identity;
    let target = format!("{}#contact", role.page_path());

    let page = PageMeta {
        title: format!("Message sent | {}", identity.name),
        description: contact::SUCCESS_MESSAGE.to_string(),
        canonical: None,
        json_ld: None,
        refresh: Some(format!("3;url={target}")),
    };

    let content = html! {
        main.outcome-page {
            div.outcome-card.outcome-success {
                h1 { "Message sent" }
                p { (contact::SUCCESS_MESSAGE) }
                p.outcome-hint { "Taking you back to the site in a few seconds." }
                a.btn.btn-primary href=(target) { "Back to the site" }
            }
        }
    };

    base_document(&page, css, content)
}

/// Error page after a failed submission: the banner plus the form with
/// every field retained.
pub fn render_contact_failure(
    manifest: &Manifest,
    role: RoleKey,
    message: &str,
    form: &ContactForm,
    css: &str,
) -> Markup {
    let identity = &manifest.profile.identity;

    let page = PageMeta {
        title: format!("Message not sent | {}", identity.name),
        description: message.to_string(),
        canonical: None,
        json_ld: None,
        refresh: None,
    };

    let content = html! {
        main.outcome-page {
            div.outcome-card.outcome-error {
                h1 { "Message not sent" }
            }
            (contact_section(identity, role, form, Some(message)))
            p.outcome-back {
                a href={ (role.page_path()) "#contact" } { "Back to the site" }
            }
        }
    };

    base_document(&page, css, content)
}

pub fn render_not_found(css: &str) -> Markup {
    let page = PageMeta {
        title: "Page not found".to_string(),
        description: "There's nothing at this address.".to_string(),
        canonical: None,
        json_ld: None,
        refresh: None,
    };

    let content = html! {
        main.outcome-page {
            div.outcome-card {
                h1 { "404" }
                p { "There's nothing at this address." }
                a.btn.btn-primary href="/" { "Back to the home page" }
            }
        }
    };

    base_document(&page, css, content)
}

// ============================================================================
// Tests
// ============================================================================
