//! Static site generation.
//!
//! Stage 3 of the devfolio build pipeline. Reads the scan manifest and
//! the projects manifest from the temp directory, assembles the CSS,
//! renders one page per role, and copies résumés and assets into the
//! output directory.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Full stack page (the default role)
//! ├── frontend/
//! │   └── index.html
//! ├── backend/
//! │   └── index.html
//! ├── 404.html
//! ├── resumes/                   # Copied for roles whose file exists
//! │   └── fullstack-resume.pdf
//! └── assets/                    # Copied verbatim from the content root
//! ```
//!
//! ## CSS
//!
//! Each page's stylesheet is assembled from four layers: the palette
//! and theme variables generated from config, the static base styles
//! embedded at compile time, the typed-text keyframes for that role's
//! labels, and the project filter rules. The role pages differ only in
//! the keyframes layer.

use crate::config;
use crate::content::RoleKey;
use crate::projects::{self, ProjectsError, ProjectsManifest};
use crate::render;
use crate::scan::{self, Manifest, ScanError};
use crate::typewriter::{self, Frame, TypewriterError};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("{file} not found; run 'devfolio {stage}' first")]
    MissingStage { file: String, stage: &'static str },
    #[error("invalid scan manifest: {0}")]
    Scan(ScanError),
    #[error("invalid projects manifest: {0}")]
    Projects(ProjectsError),
    #[error("typing animation: {0}")]
    Typewriter(#[from] TypewriterError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");

pub fn generate(temp_dir: &Path, source_dir: &Path, output_dir: &Path) -> Result<(), GenerateError> {
    let manifest = read_scan_manifest(temp_dir)?;
    let gallery = read_gallery(temp_dir)?;

    fs::create_dir_all(output_dir)?;

    for &role in RoleKey::ALL.iter() {
        let bundle = manifest.profile.bundle(role);
        let frames =
            typewriter::frame_schedule(&bundle.typing_roles, &manifest.config.animation)?;
        let css = assemble_css(&manifest, &gallery, &frames);
        let html = render::render_role_page(&manifest, &gallery, role, &frames, &css);

        let page_path = role_page_path(output_dir, role);
        if let Some(parent) = page_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&page_path, html.into_string())?;
        println!("Generated {}", rel_label(&page_path, output_dir));
    }

    fs::write(
        output_dir.join("404.html"),
        render::render_not_found(&base_css(&manifest)).into_string(),
    )?;
    println!("Generated 404.html");

    let copied = copy_resumes(&manifest, source_dir, output_dir)?;
    if copied > 0 {
        println!("Copied {copied} résumé file(s)");
    }

    let assets_src = source_dir.join(scan::ASSETS_DIR);
    if assets_src.is_dir() {
        let assets_dst = output_dir.join(scan::ASSETS_DIR);
        fs::create_dir_all(&assets_dst)?;
        copy_dir_recursive(&assets_src, &assets_dst)?;
        println!("Copied assets/");
    }

    println!("Site generated at {}", output_dir.display());
    Ok(())
}

fn read_scan_manifest(temp_dir: &Path) -> Result<Manifest, GenerateError> {
    scan::read_manifest(temp_dir).map_err(|err| match err {
        ScanError::Io(source) if source.kind() == io::ErrorKind::NotFound => {
            GenerateError::MissingStage {
                file: temp_dir.join(scan::MANIFEST_FILENAME).display().to_string(),
                stage: "scan",
            }
        }
        ScanError::Io(source) => GenerateError::Io(source),
        other => GenerateError::Scan(other),
    })
}

fn read_gallery(temp_dir: &Path) -> Result<ProjectsManifest, GenerateError> {
    projects::read_projects_manifest(temp_dir).map_err(|err| match err {
        ProjectsError::Io { path, source } if source.kind() == io::ErrorKind::NotFound => {
            GenerateError::MissingStage {
                file: path,
                stage: "fetch",
            }
        }
        ProjectsError::Io { source, .. } => GenerateError::Io(source),
        other => GenerateError::Projects(other),
    })
}

/// Where a role's page lands in the output directory.
pub fn role_page_path(output_dir: &Path, role: RoleKey) -> PathBuf {
    if role.page_dir().is_empty() {
        output_dir.join("index.html")
    } else {
        output_dir.join(role.page_dir()).join("index.html")
    }
}

fn rel_label(path: &Path, output_dir: &Path) -> String {
    path.strip_prefix(output_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Palette and theme variables plus the static base styles. The serve
/// module uses this layer alone for contact outcome pages.
pub(crate) fn base_css(manifest: &Manifest) -> String {
    let mut css = config::generate_color_css(&manifest.config.colors);
    css.push('\n');
    css.push_str(&config::generate_theme_css(&manifest.config.theme));
    css.push('\n');
    css.push_str(CSS_STATIC);
    css
}

/// The full per-page stylesheet: base layer, then the typed-text
/// keyframes for this role's labels, then the filter rules.
fn assemble_css(manifest: &Manifest, gallery: &ProjectsManifest, frames: &[Frame]) -> String {
    let mut css = base_css(manifest);
    css.push('\n');
    css.push_str(&typewriter::typing_keyframes_css(frames));
    css.push_str(&projects::filter_css(&gallery.projects));
    css
}

/// Copy each present résumé into `<output>/resumes/`, overwriting any
/// stale copy from an earlier build.
fn copy_resumes(manifest: &Manifest, source_dir: &Path, output_dir: &Path) -> io::Result<usize> {
    // Roles may share a résumé file; copy each file once.
    let files: BTreeSet<&str> = manifest
        .resumes
        .iter()
        .filter(|r| r.present)
        .map(|r| r.file.as_str())
        .collect();
    if files.is_empty() {
        return Ok(0);
    }
    let dst_dir = output_dir.join(scan::RESUMES_DIR);
    fs::create_dir_all(&dst_dir)?;
    for file in &files {
        let src = source_dir.join(scan::RESUMES_DIR).join(file);
        fs::copy(&src, dst_dir.join(file))?;
    }
    Ok(files.len())
}

/// Copy a directory tree verbatim.
fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::Project;

    fn sample_project() -> Project {
        Project {
            id: "1".to_string(),
            title: "Dashboard".to_string(),
            description: "Analytics".to_string(),
            category: "Web App".to_string(),
            technologies: vec!["React".to_string(), "Node.js".to_string()],
            github_link: None,
            live_link: None,
            image: None,
            long_description: None,
            featured: true,
            stats: None,
        }
    }

    /// Run scan against a content dir and stage both manifests into the
    /// temp dir, the way the build command does.
    fn stage_manifests(content: &Path, temp: &Path, gallery: &ProjectsManifest) {
        let manifest = scan::scan(content).unwrap();
        fs::create_dir_all(temp).unwrap();
        fs::write(
            temp.join(scan::MANIFEST_FILENAME),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        projects::write_projects_manifest(temp, gallery).unwrap();
    }

    #[test]
    fn generates_one_page_per_role() {
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        let temp = root.path().join("temp");
        let out = root.path().join("dist");
        fs::create_dir_all(&content).unwrap();
        stage_manifests(
            &content,
            &temp,
            &ProjectsManifest::loaded(vec![sample_project()]),
        );

        generate(&temp, &content, &out).unwrap();

        for page in ["index.html", "frontend/index.html", "backend/index.html"] {
            let html = fs::read_to_string(out.join(page)).unwrap();
            assert!(html.contains("Samuel Oluwasegun"), "{page} missing name");
        }
        assert!(out.join("404.html").exists());
    }

    #[test]
    fn pages_embed_generated_css_layers() {
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        let temp = root.path().join("temp");
        let out = root.path().join("dist");
        fs::create_dir_all(&content).unwrap();
        stage_manifests(
            &content,
            &temp,
            &ProjectsManifest::loaded(vec![sample_project()]),
        );

        generate(&temp, &content, &out).unwrap();

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("--color-bg:"));
        assert!(html.contains("--section-pad-x:"));
        assert!(html.contains("@keyframes typed-frame-1"));
        assert!(html.contains("#cat-web-app:checked"));
    }

    #[test]
    fn role_pages_have_distinct_typing_cycles() {
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        let temp = root.path().join("temp");
        let out = root.path().join("dist");
        fs::create_dir_all(&content).unwrap();
        stage_manifests(&content, &temp, &ProjectsManifest::loaded(vec![]));

        generate(&temp, &content, &out).unwrap();

        let home = fs::read_to_string(out.join("index.html")).unwrap();
        let backend = fs::read_to_string(out.join("backend/index.html")).unwrap();
        assert!(home.contains("Full Stack Architect"));
        assert!(!backend.contains("Full Stack Architect"));
        assert!(backend.contains("Backend Developer"));
    }

    #[test]
    fn copies_resumes_and_assets() {
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        let temp = root.path().join("temp");
        let out = root.path().join("dist");
        fs::create_dir_all(content.join(scan::RESUMES_DIR)).unwrap();
        fs::write(
            content.join(scan::RESUMES_DIR).join("fullstack-resume.pdf"),
            b"%PDF-1.4",
        )
        .unwrap();
        fs::create_dir_all(content.join(scan::ASSETS_DIR).join("fonts")).unwrap();
        fs::write(content.join(scan::ASSETS_DIR).join("favicon.ico"), b"icon").unwrap();
        fs::write(
            content.join(scan::ASSETS_DIR).join("fonts").join("mono.woff2"),
            b"font",
        )
        .unwrap();
        stage_manifests(&content, &temp, &ProjectsManifest::loaded(vec![]));

        generate(&temp, &content, &out).unwrap();

        assert!(out.join("resumes/fullstack-resume.pdf").exists());
        assert!(!out.join("resumes/backend-resume.pdf").exists());
        assert!(out.join("assets/favicon.ico").exists());
        assert!(out.join("assets/fonts/mono.woff2").exists());
    }

    #[test]
    fn rebuild_refreshes_a_changed_resume() {
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        let temp = root.path().join("temp");
        let out = root.path().join("dist");
        let resume = content.join(scan::RESUMES_DIR).join("fullstack-resume.pdf");
        fs::create_dir_all(content.join(scan::RESUMES_DIR)).unwrap();
        fs::write(&resume, b"%PDF-1.4 v1").unwrap();
        stage_manifests(&content, &temp, &ProjectsManifest::loaded(vec![]));

        generate(&temp, &content, &out).unwrap();
        fs::write(&resume, b"%PDF-1.4 v2").unwrap();
        generate(&temp, &content, &out).unwrap();

        assert_eq!(
            fs::read(out.join("resumes/fullstack-resume.pdf")).unwrap(),
            b"%PDF-1.4 v2"
        );
    }

    #[test]
    fn missing_scan_manifest_names_the_stage() {
        let root = tempfile::tempdir().unwrap();
        let err = generate(
            &root.path().join("temp"),
            &root.path().join("content"),
            &root.path().join("dist"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("devfolio scan"));
    }

    #[test]
    fn missing_projects_manifest_names_the_stage() {
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        let temp = root.path().join("temp");
        fs::create_dir_all(&content).unwrap();
        let manifest = scan::scan(&content).unwrap();
        fs::create_dir_all(&temp).unwrap();
        fs::write(
            temp.join(scan::MANIFEST_FILENAME),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();

        let err = generate(&temp, &content, &root.path().join("dist")).unwrap_err();
        assert!(err.to_string().contains("devfolio fetch"));
    }

    #[test]
    fn fetch_error_manifest_still_generates_a_site() {
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        let temp = root.path().join("temp");
        let out = root.path().join("dist");
        fs::create_dir_all(&content).unwrap();
        stage_manifests(
            &content,
            &temp,
            &ProjectsManifest::fetch_error("GET https://api.example.com failed"),
        );

        generate(&temp, &content, &out).unwrap();

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("Projects unavailable"));
        assert!(html.contains("GET https://api.example.com failed"));
    }
}
