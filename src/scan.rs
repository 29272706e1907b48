//! Content scanning and manifest generation.
//!
//! Stage 1 of the devfolio build pipeline. Resolves the site config and
//! profile from the content directory, checks which résumé files the
//! role pages link to, and produces the manifest the generate stage
//! consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site settings (optional)
//! ├── profile.toml                 # Content overrides (optional)
//! ├── resumes/                     # Role résumés, linked from the hero
//! │   ├── fullstack-resume.pdf
//! │   ├── frontend-resume.pdf
//! │   └── backend-resume.pdf
//! └── assets/                      # Copied verbatim into the site root
//! ```
//!
//! Everything is optional. An empty content directory builds the stock
//! site; a missing résumé drops that role's download link and produces
//! a warning rather than an error, so the pipeline keeps working while
//! content is still being assembled.
//!
//! ## Validation
//!
//! Config and profile files that exist but don't parse (or carry
//! unknown keys, or fail validation) are hard errors — a typo should
//! stop the build, not silently fall back to stock values.

use crate::config::{self, SiteConfig};
use crate::content::{self, Profile, RoleKey};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the scan manifest within the temp directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Directory of résumé PDFs within the content root.
pub const RESUMES_DIR: &str = "resumes";

/// Directory of verbatim-copied assets within the content root.
pub const ASSETS_DIR: &str = "assets";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("content directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Profile error: {0}")]
    Profile(#[from] content::ProfileError),
}

/// Manifest output from the scan stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub profile: Profile,
    pub config: SiteConfig,
    pub resumes: Vec<ResumeFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One role's résumé link target and whether the file exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResumeFile {
    pub role: RoleKey,
    pub file: String,
    pub present: bool,
}

impl Manifest {
    /// The résumé entry for a role. Every role has one; scan builds the
    /// list from [`RoleKey::ALL`].
    pub fn resume_for(&self, role: RoleKey) -> Option<&ResumeFile> {
        self.resumes.iter().find(|r| r.role == role)
    }
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }

    let config = config::load_config(root)?;
    let profile = content::load_profile(root)?;

    let mut warnings = Vec::new();
    let resumes = collect_resumes(root, &profile, &mut warnings);

    Ok(Manifest {
        profile,
        config,
        resumes,
        warnings,
    })
}

/// Read the scan manifest back from the temp directory.
pub fn read_manifest(temp_dir: &Path) -> Result<Manifest, ScanError> {
    let content = std::fs::read_to_string(temp_dir.join(MANIFEST_FILENAME))?;
    Ok(serde_json::from_str(&content)?)
}

/// Check each role's configured résumé file under `resumes/`.
fn collect_resumes(root: &Path, profile: &Profile, warnings: &mut Vec<String>) -> Vec<ResumeFile> {
    RoleKey::ALL
        .iter()
        .map(|&role| {
            let file = profile.bundle(role).resume_file.clone();
            let present = root.join(RESUMES_DIR).join(&file).is_file();
            if !present {
                warnings.push(format!(
                    "{RESUMES_DIR}/{file} not found; the {role} résumé link will be omitted"
                ));
            }
            ResumeFile {
                role,
                file,
                present,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch_resumes(root: &Path, files: &[&str]) {
        let dir = root.join(RESUMES_DIR);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), b"%PDF-1.4").unwrap();
        }
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = scan(Path::new("/no/such/content")).unwrap_err();
        assert!(matches!(err, ScanError::MissingRoot(_)));
        assert!(err.to_string().contains("/no/such/content"));
    }

    #[test]
    fn empty_directory_scans_to_stock_site() {
        let temp = tempfile::tempdir().unwrap();
        let manifest = scan(temp.path()).unwrap();

        assert_eq!(manifest.profile, Profile::default());
        assert_eq!(manifest.config.animation.typing_speed_ms, 100);
        assert_eq!(manifest.resumes.len(), RoleKey::ALL.len());
        assert!(manifest.resumes.iter().all(|r| !r.present));
        // One warning per missing résumé.
        assert_eq!(manifest.warnings.len(), RoleKey::ALL.len());
    }

    #[test]
    fn config_overrides_are_picked_up() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join("config.toml"),
            "[animation]\ntyping_speed_ms = 80\n",
        )
        .unwrap();
        let manifest = scan(temp.path()).unwrap();
        assert_eq!(manifest.config.animation.typing_speed_ms, 80);
        assert_eq!(manifest.config.animation.deleting_speed_ms, 50);
    }

    #[test]
    fn profile_overrides_are_picked_up() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join(content::PROFILE_FILENAME),
            "[identity]\nname = \"Grace Hopper\"\n",
        )
        .unwrap();
        let manifest = scan(temp.path()).unwrap();
        assert_eq!(manifest.profile.identity.name, "Grace Hopper");
    }

    #[test]
    fn present_resumes_produce_no_warnings() {
        let temp = tempfile::tempdir().unwrap();
        touch_resumes(
            temp.path(),
            &[
                "fullstack-resume.pdf",
                "frontend-resume.pdf",
                "backend-resume.pdf",
            ],
        );
        let manifest = scan(temp.path()).unwrap();
        assert!(manifest.resumes.iter().all(|r| r.present));
        assert!(manifest.warnings.is_empty());
    }

    #[test]
    fn missing_resumes_are_warnings_not_errors() {
        let temp = tempfile::tempdir().unwrap();
        touch_resumes(temp.path(), &["fullstack-resume.pdf"]);
        let manifest = scan(temp.path()).unwrap();

        let fullstack = manifest.resume_for(RoleKey::Fullstack).unwrap();
        assert!(fullstack.present);
        let backend = manifest.resume_for(RoleKey::Backend).unwrap();
        assert!(!backend.present);

        assert_eq!(manifest.warnings.len(), 2);
        assert!(manifest.warnings.iter().any(|w| w.contains("backend-resume.pdf")));
        assert!(manifest.warnings.iter().any(|w| w.contains("frontend-resume.pdf")));
    }

    #[test]
    fn renamed_resume_is_looked_up_under_new_name() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join(content::PROFILE_FILENAME),
            "[roles.backend]\nresume_file = \"be.pdf\"\n",
        )
        .unwrap();
        touch_resumes(temp.path(), &["be.pdf"]);
        let manifest = scan(temp.path()).unwrap();
        let backend = manifest.resume_for(RoleKey::Backend).unwrap();
        assert_eq!(backend.file, "be.pdf");
        assert!(backend.present);
    }

    #[test]
    fn invalid_config_stops_the_scan() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("config.toml"), "no_such_key = 1\n").unwrap();
        assert!(matches!(scan(temp.path()), Err(ScanError::Config(_))));
    }

    #[test]
    fn invalid_profile_stops_the_scan() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(
            temp.path().join(content::PROFILE_FILENAME),
            "[identity]\nnmae = \"typo\"\n",
        )
        .unwrap();
        assert!(matches!(scan(temp.path()), Err(ScanError::Profile(_))));
    }

    #[test]
    fn manifest_roundtrips_through_json() {
        let temp = tempfile::tempdir().unwrap();
        touch_resumes(temp.path(), &["fullstack-resume.pdf"]);
        let manifest = scan(temp.path()).unwrap();

        let json = serde_json::to_string_pretty(&manifest).unwrap();
        assert!(json.contains(r#""role": "fullstack""#));
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.profile, manifest.profile);
        assert_eq!(back.resumes, manifest.resumes);
        assert_eq!(back.warnings, manifest.warnings);
    }
}
