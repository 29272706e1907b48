//! CLI output formatting for all pipeline stages.
//!
//! Output is information-centric, not file-centric: every entity leads
//! with its semantic identity (role badge, project title, positional
//! index), with file paths shown as indented context lines. The result
//! reads as a content inventory that still lets users trace data back
//! to specific files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Site
//!     Samuel Oluwasegun <oluwasegunsam56@gmail.com>
//!     Lagos, Nigeria
//!     https://www.samuel-oluwasegun.bio
//!
//! Roles
//!     001 Full Stack Developer
//!         Page: /
//!         Typing: 5 labels
//!         Expertise: 5 areas
//!         Résumé: resumes/fullstack-resume.pdf
//!
//! Experience
//!     001 Backend Engineer · Finchat
//!
//! Config
//!     config.toml
//!     assets/
//! ```
//!
//! ## Fetch
//!
//! ```text
//! Projects
//!     001 Issue Tracker (Web App, featured)
//!     002 Transit Maps (Mobile)
//! Fetched 2 projects, 1 featured, 2 categories
//! ```
//!
//! ## Generate
//!
//! ```text
//! 001 Full Stack Developer → index.html
//! 002 Frontend Developer → frontend/index.html
//! 003 Backend Developer → backend/index.html
//! Not found → 404.html
//!
//! Resumes
//!     fullstack-resume.pdf
//!
//! Generated 4 pages, 1 résumé file
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O beyond existence checks, no side effects.

use crate::content::RoleKey;
use crate::projects::{self, GalleryState, ProjectsManifest};
use crate::scan::Manifest;
use std::collections::BTreeSet;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the resolved site content.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let identity = &manifest.profile.identity;

    lines.push("Site".to_string());
    lines.push(format!("    {} <{}>", identity.name, identity.email));
    lines.push(format!("    {}", identity.location));
    lines.push(format!("    {}", identity.site_url));

    lines.push(String::new());
    lines.push("Roles".to_string());
    for (i, &role) in RoleKey::ALL.iter().enumerate() {
        let bundle = manifest.profile.bundle(role);
        lines.push(format!("    {} {}", format_index(i + 1), bundle.badge));
        lines.push(format!("        Page: {}", role.page_path()));
        lines.push(format!("        Typing: {} labels", bundle.typing_roles.len()));
        lines.push(format!("        Expertise: {} areas", bundle.expertise.len()));
        if let Some(resume) = manifest.resume_for(role) {
            let marker = if resume.present { "" } else { " (missing)" };
            lines.push(format!("        Résumé: resumes/{}{}", resume.file, marker));
        }
    }

    if !manifest.profile.experience.is_empty() {
        lines.push(String::new());
        lines.push("Experience".to_string());
        for (i, exp) in manifest.profile.experience.iter().enumerate() {
            lines.push(format!(
                "    {} {} · {}",
                format_index(i + 1),
                exp.position,
                exp.company
            ));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").is_file() {
        lines.push("    config.toml".to_string());
    }
    if source_root.join("profile.toml").is_file() {
        lines.push("    profile.toml".to_string());
    }
    if source_root.join(crate::scan::ASSETS_DIR).is_dir() {
        lines.push(format!("    {}/", crate::scan::ASSETS_DIR));
    }

    if !manifest.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &manifest.warnings {
            lines.push(format!("    {}", warning));
        }
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Fetch output
// ============================================================================

/// Format fetch stage output showing the gallery state.
pub fn format_fetch_output(gallery: &ProjectsManifest, from_cache: bool) -> Vec<String> {
    let mut lines = vec!["Projects".to_string()];

    match &gallery.state {
        GalleryState::ConfigError { message } => {
            lines.push(format!("    Config error: {}", message));
        }
        GalleryState::FetchError { message } => {
            lines.push(format!("    Fetch error: {}", message));
        }
        GalleryState::Loaded => {
            for (i, project) in gallery.projects.iter().enumerate() {
                let detail = if project.featured {
                    format!("{}, featured", project.category)
                } else {
                    project.category.clone()
                };
                lines.push(format!(
                    "    {} {} ({})",
                    format_index(i + 1),
                    project.title,
                    detail
                ));
            }

            let featured = gallery.projects.iter().filter(|p| p.featured).count();
            // categories() always includes the synthetic "all" chip.
            let categories = projects::categories(&gallery.projects).len().saturating_sub(1);
            let cache_marker = if from_cache { " (from cache)" } else { "" };
            lines.push(format!(
                "Fetched {} projects, {} featured, {} categories{}",
                gallery.projects.len(),
                featured,
                categories,
                cache_marker
            ));
        }
    }

    lines
}

/// Print fetch output to stdout.
pub fn print_fetch_output(gallery: &ProjectsManifest, from_cache: bool) {
    for line in format_fetch_output(gallery, from_cache) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 3: Generate output
// ============================================================================

/// Format generate stage output mapping each page to its output path.
pub fn format_generate_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, &role) in RoleKey::ALL.iter().enumerate() {
        let bundle = manifest.profile.bundle(role);
        let target = if role.page_dir().is_empty() {
            "index.html".to_string()
        } else {
            format!("{}/index.html", role.page_dir())
        };
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            bundle.badge,
            target
        ));
    }
    lines.push("Not found \u{2192} 404.html".to_string());

    // Roles may share a résumé file; list each file once.
    let resume_files: BTreeSet<&str> = manifest
        .resumes
        .iter()
        .filter(|r| r.present)
        .map(|r| r.file.as_str())
        .collect();
    if !resume_files.is_empty() {
        lines.push(String::new());
        lines.push("Resumes".to_string());
        for file in &resume_files {
            lines.push(format!("    {}", file));
        }
    }

    lines.push(String::new());
    let resume_word = if resume_files.len() == 1 {
        "résumé file"
    } else {
        "résumé files"
    };
    lines.push(format!(
        "Generated {} pages, {} {}",
        RoleKey::ALL.len() + 1,
        resume_files.len(),
        resume_word
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(manifest: &Manifest) {
    for line in format_generate_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
