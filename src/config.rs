//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Configuration is
//! layered: stock defaults are overridden by an optional user config file in
//! the content root.
//!
//! ## Content Layout
//!
//! ```text
//! content/
//! ├── config.toml    # Site settings (overrides stock defaults)
//! ├── profile.toml   # Content overrides (see the content module)
//! ├── resumes/       # Role-specific résumé PDFs
//! └── assets/        # Copied verbatim into the site root
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [animation]
//! typing_speed_ms = 100     # Typed-text: delay per typed character
//! deleting_speed_ms = 50    # Typed-text: delay per deleted character
//! pause_delay_ms = 1500     # Typed-text: hold after a word completes
//!
//! [projects]
//! # api_url = "https://api.example.com/projects"
//! # source_file = "projects.json"   # Local alternative to api_url
//! cache_ttl_minutes = 60    # Reuse a fetched project list this long
//!
//! [email]
//! # service_id = "service_xxx"
//! # template_id = "template_xxx"
//! # public_key = "xxxxxxxx"
//! auto_reply_template_id = "template_24krlbk"
//! api_base = "https://api.emailjs.com"
//!
//! [serve]
//! interface = "127.0.0.1"
//! port = 8080
//!
//! [theme]
//! content_width = "72rem"   # Max width of section content
//! card_radius = "0.75rem"   # Corner radius for cards and chips
//!
//! [theme.section_x]
//! size = "5vw"              # Preferred horizontal section padding
//! min = "1.25rem"           # Minimum horizontal section padding
//! max = "4rem"              # Maximum horizontal section padding
//!
//! [theme.section_y]
//! size = "8vw"              # Preferred vertical section padding
//! min = "3rem"              # Minimum vertical section padding
//! max = "6rem"              # Maximum vertical section padding
//!
//! [colors.light]
//! background = "#ffffff"
//! surface = "#f6f7f9"       # Cards, chips, form fields
//! text = "#111111"
//! text_muted = "#666666"    # Section labels, captions, meta lines
//! border = "#e0e0e0"
//! accent = "#2563eb"
//! accent_hover = "#1d4ed8"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! surface = "#16181d"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! accent = "#60a5fa"
//! accent_hover = "#93c5fd"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only override the accent color
//! [colors.light]
//! accent = "#7c3aed"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Auto-reply template used when `email.auto_reply_template_id` is not set.
pub const DEFAULT_AUTO_REPLY_TEMPLATE: &str = "template_24krlbk";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Theme/layout settings (section padding, content width).
    pub theme: ThemeConfig,
    /// Typed-text animation timing.
    pub animation: AnimationConfig,
    /// Project gallery source settings.
    pub projects: ProjectsConfig,
    /// Transactional email relay settings.
    pub email: EmailConfig,
    /// Preview server settings.
    pub serve: ServeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            colors: ColorConfig::default(),
            theme: ThemeConfig::default(),
            animation: AnimationConfig::default(),
            projects: ProjectsConfig::default(),
            email: EmailConfig::default(),
            serve: ServeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.animation.typing_speed_ms == 0 {
            return Err(ConfigError::Validation(
                "animation.typing_speed_ms must be greater than 0".into(),
            ));
        }
        if self.animation.deleting_speed_ms == 0 {
            return Err(ConfigError::Validation(
                "animation.deleting_speed_ms must be greater than 0".into(),
            ));
        }
        if self.animation.pause_delay_ms == 0 {
            return Err(ConfigError::Validation(
                "animation.pause_delay_ms must be greater than 0".into(),
            ));
        }
        if self.email.api_base.trim().is_empty() {
            return Err(ConfigError::Validation(
                "email.api_base must not be empty".into(),
            ));
        }
        if self.serve.port == 0 {
            return Err(ConfigError::Validation(
                "serve.port must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Typed-text animation timing, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Delay per typed character.
    pub typing_speed_ms: u64,
    /// Delay per deleted character.
    pub deleting_speed_ms: u64,
    /// Hold after a word is fully typed, before deletion begins.
    pub pause_delay_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            typing_speed_ms: 100,
            deleting_speed_ms: 50,
            pause_delay_ms: 1500,
        }
    }
}

/// Project gallery source settings.
///
/// When neither `api_url` nor `source_file` is set, the gallery renders a
/// configuration-error state instead of project cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectsConfig {
    /// Remote endpoint returning a JSON array of projects.
    pub api_url: Option<String>,
    /// Local JSON file (relative to the content root) used instead of the
    /// remote endpoint. Takes precedence over `api_url` when both are set.
    pub source_file: Option<String>,
    /// How long a fetched project list may be reused before refetching.
    /// `0` disables reuse entirely.
    pub cache_ttl_minutes: u64,
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            source_file: None,
            cache_ttl_minutes: 60,
        }
    }
}

/// Transactional email relay settings.
///
/// `service_id`, `template_id` and `public_key` must all be present before
/// the contact relay will attempt any network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmailConfig {
    /// Email service identifier.
    pub service_id: Option<String>,
    /// Template used for the primary contact notification.
    pub template_id: Option<String>,
    /// Template used for the confirmation sent back to the submitter.
    pub auto_reply_template_id: String,
    /// Public API key identifying the account.
    pub public_key: Option<String>,
    /// Base URL of the email service API.
    pub api_base: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            service_id: None,
            template_id: None,
            auto_reply_template_id: DEFAULT_AUTO_REPLY_TEMPLATE.to_string(),
            public_key: None,
            api_base: "https://api.emailjs.com".to_string(),
        }
    }
}

impl EmailConfig {
    /// Names of the required keys that are absent, in a fixed order.
    ///
    /// Empty means the relay is fully configured.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.service_id.as_deref().unwrap_or("").trim().is_empty() {
            missing.push("email.service_id");
        }
        if self.template_id.as_deref().unwrap_or("").trim().is_empty() {
            missing.push("email.template_id");
        }
        if self.public_key.as_deref().unwrap_or("").trim().is_empty() {
            missing.push("email.public_key");
        }
        missing
    }
}

/// Preview server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// Interface to bind.
    pub interface: String,
    /// Base port. When taken, the next ports are tried in order.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// A responsive CSS size expressed as `clamp(min, size, max)`.
///
/// - `size`: the preferred/fluid value, typically viewport-relative (e.g. `"5vw"`)
/// - `min`: the minimum bound (e.g. `"1.25rem"`)
/// - `max`: the maximum bound (e.g. `"4rem"`)
///
/// Generates `clamp(min, size, max)` in the output CSS.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClampSize {
    /// Preferred/fluid value, typically viewport-relative (e.g. `"5vw"`).
    pub size: String,
    /// Minimum bound (e.g. `"1.25rem"`).
    pub min: String,
    /// Maximum bound (e.g. `"4rem"`).
    pub max: String,
}

impl ClampSize {
    /// Render as a CSS `clamp()` expression.
    pub fn to_css(&self) -> String {
        format!("clamp({}, {}, {})", self.min, self.size, self.max)
    }
}

/// Theme/layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Horizontal section padding (left/right).
    pub section_x: ClampSize,
    /// Vertical section padding (top/bottom).
    pub section_y: ClampSize,
    /// Maximum width of section content (CSS value).
    pub content_width: String,
    /// Corner radius for cards and chips (CSS value).
    pub card_radius: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            section_x: ClampSize {
                size: "5vw".to_string(),
                min: "1.25rem".to_string(),
                max: "4rem".to_string(),
            },
            section_y: ClampSize {
                size: "8vw".to_string(),
                min: "3rem".to_string(),
                max: "6rem".to_string(),
            },
            content_width: "72rem".to_string(),
            card_radius: "0.75rem".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Background color.
    pub background: String,
    /// Raised-surface color (cards, chips, form fields).
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (section labels, captions, meta lines).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Accent color (links, buttons, highlights).
    pub accent: String,
    /// Accent hover color.
    pub accent_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            surface: "#f6f7f9".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            accent: "#2563eb".to_string(),
            accent_hover: "#1d4ed8".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            surface: "#16181d".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            accent: "#60a5fa".to_string(),
            accent_hover: "#93c5fd".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Devfolio Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the content root:
#   content/config.toml
#
# Only the keys you want to override need to be present.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Typed-text animation (hero role labels)
# ---------------------------------------------------------------------------
[animation]
# Delay per typed character, in milliseconds.
typing_speed_ms = 100

# Delay per deleted character, in milliseconds.
deleting_speed_ms = 50

# Hold after a word is fully typed, before deletion begins.
pause_delay_ms = 1500

# ---------------------------------------------------------------------------
# Project gallery
# ---------------------------------------------------------------------------
[projects]
# Remote endpoint returning a JSON array of projects. Without this (or
# source_file below) the gallery shows a configuration notice instead.
# api_url = "https://api.example.com/projects"

# Local JSON file relative to the content root. Takes precedence over
# api_url when both are set. Useful for offline builds.
# source_file = "projects.json"

# How long a fetched project list may be reused before refetching.
# 0 disables reuse entirely. --no-cache always forces a refetch.
cache_ttl_minutes = 60

# ---------------------------------------------------------------------------
# Contact form email relay
# ---------------------------------------------------------------------------
[email]
# All three of service_id, template_id and public_key are required before
# the contact form will relay anything.
# service_id = "service_xxx"
# template_id = "template_xxx"
# public_key = "xxxxxxxx"

# Template for the confirmation sent back to the submitter.
auto_reply_template_id = "template_24krlbk"

# Base URL of the email service API.
api_base = "https://api.emailjs.com"

# ---------------------------------------------------------------------------
# Preview server
# ---------------------------------------------------------------------------
[serve]
interface = "127.0.0.1"

# Base port. When taken, the next ports are tried in order.
port = 8080

# ---------------------------------------------------------------------------
# Theme / layout
# ---------------------------------------------------------------------------
[theme]
# Maximum width of section content (CSS value).
content_width = "72rem"

# Corner radius for cards and chips (CSS value).
card_radius = "0.75rem"

# Horizontal section padding, as CSS clamp(min, size, max).
[theme.section_x]
size = "5vw"
min = "1.25rem"
max = "4rem"

# Vertical section padding, as CSS clamp(min, size, max).
[theme.section_y]
size = "8vw"
min = "3rem"
max = "6rem"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
surface = "#f6f7f9"       # Cards, chips, form fields
text = "#111111"
text_muted = "#666666"    # Section labels, captions, meta lines
border = "#e0e0e0"
accent = "#2563eb"
accent_hover = "#1d4ed8"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
surface = "#16181d"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
accent = "#60a5fa"
accent_hover = "#93c5fd"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-surface: {light_surface};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-accent: {light_accent};
    --color-accent-hover: {light_accent_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-surface: {dark_surface};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-accent: {dark_accent};
        --color-accent-hover: {dark_accent_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_surface = colors.light.surface,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_accent = colors.light.accent,
        light_accent_hover = colors.light.accent_hover,
        dark_bg = colors.dark.background,
        dark_surface = colors.dark.surface,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_accent = colors.dark.accent,
        dark_accent_hover = colors.dark.accent_hover,
    )
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --section-pad-x: {section_x};
    --section-pad-y: {section_y};
    --content-width: {content_width};
    --card-radius: {card_radius};
}}"#,
        section_x = theme.section_x.to_css(),
        section_y = theme.section_y.to_css(),
        content_width = theme.content_width,
        card_radius = theme.card_radius,
    )
}
