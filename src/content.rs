//! Role-keyed site content.
//!
//! The site renders one page per audience role (frontend, backend,
//! full-stack). Each role has a [`ContentBundle`] — hero copy, typing
//! labels, expertise areas, résumé pointer — while the owner identity,
//! stats row and work history are shared across roles. The whole thing
//! ships as compiled-in stock content; `content/profile.toml` overrides
//! any subset of it using the same recursive merge as `config.toml`.
//!
//! ## Profile Overrides
//!
//! ```toml
//! [identity]
//! name = "Ada Lovelace"
//! email = "ada@example.com"
//!
//! [roles.frontend]
//! hero_title = "Interface Engineer"
//! typing_roles = ["Interface Engineer", "Design Systems Lead"]
//! ```
//!
//! Arrays replace wholesale (overriding one experience entry means
//! restating the list). Unknown keys are rejected to catch typos early.
//!
//! [`Profile::bundle`] is an exhaustive match over [`RoleKey`], so a
//! missing bundle is structurally impossible: every key resolves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::merge_toml;

/// File name of the optional content override, relative to the content root.
pub const PROFILE_FILENAME: &str = "profile.toml";

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Profile validation error: {0}")]
    Validation(String),
}

/// The audience a page is rendered for.
///
/// `Fullstack` is the default: any query input that does not explicitly
/// select frontend or backend resolves to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKey {
    Frontend,
    Backend,
    Fullstack,
}

impl RoleKey {
    /// Every role, in page-generation order (default page first).
    pub const ALL: [RoleKey; 3] = [RoleKey::Fullstack, RoleKey::Frontend, RoleKey::Backend];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleKey::Frontend => "frontend",
            RoleKey::Backend => "backend",
            RoleKey::Fullstack => "fullstack",
        }
    }

    /// Output subdirectory of this role's page. The default role lives at
    /// the site root.
    pub fn page_dir(self) -> &'static str {
        match self {
            RoleKey::Frontend => "frontend",
            RoleKey::Backend => "backend",
            RoleKey::Fullstack => "",
        }
    }

    /// Absolute URL path of this role's page.
    pub fn page_path(self) -> &'static str {
        match self {
            RoleKey::Frontend => "/frontend/",
            RoleKey::Backend => "/backend/",
            RoleKey::Fullstack => "/",
        }
    }

    pub fn is_default(self) -> bool {
        matches!(self, RoleKey::Fullstack)
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the site knows about its owner and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    /// Owner identity: name, contact details, social URLs.
    pub identity: Identity,
    /// Headline numbers shown in the about section.
    pub stats: Vec<Stat>,
    /// Work history, shared by all role pages, most relevant first.
    pub experience: Vec<Experience>,
    /// Per-role content bundles.
    pub roles: RoleSet,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            identity: Identity::default(),
            stats: stock_stats(),
            experience: stock_experience(),
            roles: RoleSet::default(),
        }
    }
}

impl Profile {
    /// Look up the content bundle for a role.
    ///
    /// Exhaustive over [`RoleKey`], so this is total: there is no missing-
    /// bundle code path.
    pub fn bundle(&self, key: RoleKey) -> &ContentBundle {
        match key {
            RoleKey::Frontend => &self.roles.frontend,
            RoleKey::Backend => &self.roles.backend,
            RoleKey::Fullstack => &self.roles.fullstack,
        }
    }

    /// Validate the merged profile before any stage consumes it.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.identity.name.trim().is_empty() {
            return Err(ProfileError::Validation(
                "identity.name must not be empty".into(),
            ));
        }
        for key in RoleKey::ALL {
            let bundle = self.bundle(key);
            if bundle.hero_title.trim().is_empty() {
                return Err(ProfileError::Validation(format!(
                    "roles.{key}.hero_title must not be empty"
                )));
            }
            if bundle.typing_roles.is_empty() {
                return Err(ProfileError::Validation(format!(
                    "roles.{key}.typing_roles must not be empty"
                )));
            }
            if bundle.typing_roles.iter().any(|r| r.trim().is_empty()) {
                return Err(ProfileError::Validation(format!(
                    "roles.{key}.typing_roles entries must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Owner identity and contact surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Identity {
    pub name: String,
    /// Hero availability badge text.
    pub availability: String,
    /// Contact address shown on the site and used as the notification target.
    pub email: String,
    /// Reply-to address used in the auto-reply confirmation.
    pub reply_to: String,
    /// Dialable phone number (tel: links).
    pub phone: String,
    /// Human-formatted phone number.
    pub phone_display: String,
    pub location: String,
    /// Canonical site URL, used for og:url and JSON-LD.
    pub site_url: String,
    pub github: String,
    pub linkedin: String,
    /// Programs/institutions for the JSON-LD alumniOf field.
    pub alumni_of: String,
    pub country: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "Samuel Oluwasegun".to_string(),
            availability: "Open to new opportunities".to_string(),
            email: "oluwasegunsam56@gmail.com".to_string(),
            reply_to: "samueloluwasegun999@gmail.com".to_string(),
            phone: "+2349048095407".to_string(),
            phone_display: "+234 904 809 5407".to_string(),
            location: "Lagos, Nigeria".to_string(),
            site_url: "https://www.samuel-oluwasegun.bio".to_string(),
            github: "https://github.com/oluwaseg".to_string(),
            linkedin: "https://www.linkedin.com/in/samuel-oluwasegun-39ab37253".to_string(),
            alumni_of: "HNG Virtual Program".to_string(),
            country: "Nigeria".to_string(),
        }
    }
}

/// A headline number in the about section ("50+ Projects Completed").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stat {
    pub label: String,
    pub value: u32,
    /// Rendered directly after the value ("+", "%").
    pub suffix: String,
}

/// One work-history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Experience {
    pub id: u32,
    pub company: String,
    pub position: String,
    /// Human-readable range ("Jan 2021 – Aug 2022").
    pub duration: String,
    pub location: String,
    /// Employment type badge ("Full-time", "Contract", "Program").
    pub employment_type: String,
    pub description: String,
    pub technologies: Vec<String>,
    /// Presentation color tag, applied as a CSS class (`exp-{color}`).
    pub color: String,
    pub achievements: Vec<Achievement>,
}

/// A single measurable win within an experience entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Achievement {
    /// Icon name, applied as a CSS class (`icon-{name}`).
    pub icon: String,
    pub text: String,
    /// Short metric chip ("30% faster").
    pub metric: String,
}

/// One card under "Areas of Expertise".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpertiseArea {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
}

/// The three role bundles. One named field per role keeps the table and
/// the enum in lock-step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoleSet {
    pub fullstack: ContentBundle,
    pub frontend: ContentBundle,
    pub backend: ContentBundle,
}

impl Default for RoleSet {
    fn default() -> Self {
        Self {
            fullstack: stock_fullstack_bundle(),
            frontend: stock_frontend_bundle(),
            backend: stock_backend_bundle(),
        }
    }
}

/// Per-role page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentBundle {
    /// Hero headline under the owner's name.
    pub hero_title: String,
    pub hero_subtitle: String,
    /// About paragraph. Markdown-capable.
    pub about: String,
    /// Focus keyword for page metadata ("frontend", "backend", "fullstack").
    pub focus: String,
    /// Short badge shown in the navbar brand and page title.
    pub badge: String,
    /// Labels cycled by the typed-text animation. Must not be empty.
    pub typing_roles: Vec<String>,
    /// Role-specific summary line closing the about section.
    pub expertise_note: String,
    /// Résumé file name under `content/resumes/`.
    pub resume_file: String,
    /// Résumé link label.
    pub resume_label: String,
    /// Expertise cards for the about section.
    pub expertise: Vec<ExpertiseArea>,
}

// =============================================================================
// Stock content
// =============================================================================

fn stock_stats() -> Vec<Stat> {
    vec![
        Stat {
            label: "Years Experience".to_string(),
            value: 4,
            suffix: "+".to_string(),
        },
        Stat {
            label: "Projects Completed".to_string(),
            value: 50,
            suffix: "+".to_string(),
        },
        Stat {
            label: "Performance Improvement".to_string(),
            value: 30,
            suffix: "%".to_string(),
        },
        Stat {
            label: "User Satisfaction".to_string(),
            value: 20,
            suffix: "%".to_string(),
        },
    ]
}

fn stock_experience() -> Vec<Experience> {
    vec![
        Experience {
            id: 1,
            company: "Finchat".to_string(),
            position: "Backend Engineer".to_string(),
            duration: "Jan 2021 – Aug 2022".to_string(),
            location: "Remote".to_string(),
            employment_type: "Full-time".to_string(),
            description: "Spearheaded a React-based dashboard overhaul, cutting initial page \
                          load from 4s to 2.8s and lifting NPS by 20%. Implemented Redis \
                          caching and optimized database queries to slash average API response \
                          times by 35%. Built Jest and Supertest suites covering 80% of core \
                          payment endpoints, reducing post-release bugs by 40%. Integrated \
                          WebSockets for real-time balance updates, improving active session \
                          duration by 15%."
                .to_string(),
            technologies: vec![
                "React".to_string(),
                "Redis".to_string(),
                "PostgreSQL".to_string(),
                "Jest".to_string(),
                "Supertest".to_string(),
                "WebSockets".to_string(),
            ],
            color: "blue".to_string(),
            achievements: vec![
                Achievement {
                    icon: "trending-up".to_string(),
                    text: "Cut initial page load from 4s to 2.8s".to_string(),
                    metric: "30% faster".to_string(),
                },
                Achievement {
                    icon: "users".to_string(),
                    text: "Lifted NPS by 20%".to_string(),
                    metric: "20% NPS".to_string(),
                },
                Achievement {
                    icon: "zap".to_string(),
                    text: "Reduced API response times by 35%".to_string(),
                    metric: "35% faster".to_string(),
                },
                Achievement {
                    icon: "shield".to_string(),
                    text: "Built Jest/Supertest suites (80% coverage)".to_string(),
                    metric: "80% coverage".to_string(),
                },
                Achievement {
                    icon: "bug".to_string(),
                    text: "Reduced post-release bugs by 40%".to_string(),
                    metric: "40% fewer bugs".to_string(),
                },
                Achievement {
                    icon: "activity".to_string(),
                    text: "Improved active session duration by 15%".to_string(),
                    metric: "15% longer".to_string(),
                },
            ],
        },
        Experience {
            id: 2,
            company: "Noma Gaming".to_string(),
            position: "Full-Stack Developer".to_string(),
            duration: "Jun 2019 – Dec 2020".to_string(),
            location: "Remote".to_string(),
            employment_type: "Full-time".to_string(),
            description: "Developed Angular modules for live game lobbies, boosting daily \
                          active players by 15%. Enhanced React admin portal, reducing asset \
                          load size by 40% and improving deployment frequency. Designed Node.js \
                          matchmaking service supporting 2,000+ concurrent sessions with <1% \
                          error rate. Automated Docker builds and GitHub Actions workflows, \
                          achieving zero-downtime releases for weekly feature updates."
                .to_string(),
            technologies: vec![
                "Angular".to_string(),
                "React".to_string(),
                "Node.js".to_string(),
                "Docker".to_string(),
                "GitHub Actions".to_string(),
                "WebSockets".to_string(),
            ],
            color: "green".to_string(),
            achievements: vec![
                Achievement {
                    icon: "users".to_string(),
                    text: "Boosted daily active players by 15%".to_string(),
                    metric: "15% growth".to_string(),
                },
                Achievement {
                    icon: "zap".to_string(),
                    text: "Reduced asset load size by 40%".to_string(),
                    metric: "40% smaller".to_string(),
                },
                Achievement {
                    icon: "server".to_string(),
                    text: "Supported 2,000+ concurrent sessions".to_string(),
                    metric: "2K+ sessions".to_string(),
                },
                Achievement {
                    icon: "rocket".to_string(),
                    text: "Achieved zero-downtime releases".to_string(),
                    metric: "Zero downtime".to_string(),
                },
            ],
        },
        Experience {
            id: 3,
            company: "Freelance".to_string(),
            position: "Contract Developer".to_string(),
            duration: "Jan 2021 – Present".to_string(),
            location: "Remote".to_string(),
            employment_type: "Contract".to_string(),
            description: "Delivered full-stack solutions for e-commerce, fintech, and SaaS \
                          clients, building React frontends and Node.js/Express backends. \
                          Designed and optimized SQL and NoSQL schemas; improved query \
                          performance by up to 25%. Set up CI/CD with GitHub Actions and \
                          Docker, cutting manual deployment steps in half. Worked directly \
                          with stakeholders for UI/UX feedback and user acceptance testing, \
                          ensuring polished deliverables."
                .to_string(),
            technologies: vec![
                "React".to_string(),
                "Node.js".to_string(),
                "Express.js".to_string(),
                "SQL".to_string(),
                "NoSQL".to_string(),
                "Docker".to_string(),
                "GitHub Actions".to_string(),
            ],
            color: "purple".to_string(),
            achievements: vec![
                Achievement {
                    icon: "briefcase".to_string(),
                    text: "Delivered full-stack solutions for diverse clients".to_string(),
                    metric: "Multi-industry".to_string(),
                },
                Achievement {
                    icon: "zap".to_string(),
                    text: "Improved query performance by up to 25%".to_string(),
                    metric: "25% faster".to_string(),
                },
                Achievement {
                    icon: "rocket".to_string(),
                    text: "Cut manual deployment steps in half".to_string(),
                    metric: "50% faster".to_string(),
                },
                Achievement {
                    icon: "users".to_string(),
                    text: "Ensured polished deliverables via stakeholder feedback".to_string(),
                    metric: "Client-focused".to_string(),
                },
            ],
        },
        Experience {
            id: 4,
            company: "HNG Virtual Program".to_string(),
            position: "Full-Stack Web Developer".to_string(),
            duration: "Jul 2024".to_string(),
            location: "Remote".to_string(),
            employment_type: "Program".to_string(),
            description: "Built a Next.js demo app with code splitting and caching that \
                          achieved a 95% Lighthouse performance score. Authored \
                          unit/integration tests to maintain 90%+ coverage under tight \
                          deadlines. Configured GitHub Actions for live previews and automated \
                          deployments, reducing feedback loops by 60%."
                .to_string(),
            technologies: vec![
                "Next.js".to_string(),
                "Jest".to_string(),
                "GitHub Actions".to_string(),
                "TypeScript".to_string(),
            ],
            color: "orange".to_string(),
            achievements: vec![
                Achievement {
                    icon: "gauge".to_string(),
                    text: "Achieved 95% Lighthouse performance score".to_string(),
                    metric: "95% score".to_string(),
                },
                Achievement {
                    icon: "shield".to_string(),
                    text: "Maintained 90%+ test coverage".to_string(),
                    metric: "90%+ coverage".to_string(),
                },
                Achievement {
                    icon: "rocket".to_string(),
                    text: "Reduced feedback loops by 60%".to_string(),
                    metric: "60% faster".to_string(),
                },
            ],
        },
    ]
}

fn frontend_development_area() -> ExpertiseArea {
    ExpertiseArea {
        title: "Frontend Development".to_string(),
        description: "React component architecture, Angular SPAs, Next.js SSR/ISR, Tailwind \
                      CSS, responsive/accessibility best practices"
            .to_string(),
        technologies: vec![
            "React".to_string(),
            "Angular".to_string(),
            "Next.js".to_string(),
            "Tailwind CSS".to_string(),
            "Shadcn/ui".to_string(),
            "GSAP".to_string(),
            "Three.js".to_string(),
            "Framer Motion".to_string(),
        ],
    }
}

fn backend_apis_area() -> ExpertiseArea {
    ExpertiseArea {
        title: "Backend & APIs".to_string(),
        description: "Node.js with Express & NestJS, REST and GraphQL endpoints, JWT/OAuth2 \
                      auth, validation & security"
            .to_string(),
        technologies: vec![
            "Node.js".to_string(),
            "Express.js".to_string(),
            "NestJS".to_string(),
            "REST APIs".to_string(),
            "GraphQL".to_string(),
            "JWT".to_string(),
            "OAuth2".to_string(),
        ],
    }
}

fn data_management_area() -> ExpertiseArea {
    ExpertiseArea {
        title: "Data Management".to_string(),
        description: "MySQL/PostgreSQL schema design and optimization, MongoDB modeling, \
                      Redis caching strategies"
            .to_string(),
        technologies: vec![
            "MySQL".to_string(),
            "PostgreSQL".to_string(),
            "MongoDB".to_string(),
            "Redis".to_string(),
        ],
    }
}

fn stock_fullstack_bundle() -> ContentBundle {
    ContentBundle {
        hero_title: "Full Stack Developer".to_string(),
        hero_subtitle: "I bridge design and engineering to build complete solutions.".to_string(),
        about: "I'm a full-stack software engineer with 4+ years of experience building \
                user-centric web applications from concept to production. I led a redesign of \
                Finchat's dashboard, improving load times by 30% and boosting user \
                satisfaction by 20%. During my tenure at Noma Gaming, I developed a \
                matchmaking system that enhanced game session stability and reduced \
                connection errors by 25%."
            .to_string(),
        focus: "fullstack".to_string(),
        badge: "Full Stack Developer".to_string(),
        typing_roles: vec![
            "Full Stack Architect".to_string(),
            "Full Stack Developer".to_string(),
            "Full Stack Engineer".to_string(),
            "UI/UX Designer".to_string(),
            "Tech Innovator".to_string(),
        ],
        expertise_note: "My experience across the stack ensures robust, scalable, and \
                         user-friendly digital solutions."
            .to_string(),
        resume_file: "fullstack-resume.pdf".to_string(),
        resume_label: "Full Stack Resume".to_string(),
        expertise: vec![
            frontend_development_area(),
            backend_apis_area(),
            data_management_area(),
            ExpertiseArea {
                title: "Testing & Quality".to_string(),
                description: "Unit/integration tests (Jest, Supertest), end-to-end workflows \
                              (Cypress, Postman), TDD habits"
                    .to_string(),
                technologies: vec![
                    "Jest".to_string(),
                    "Supertest".to_string(),
                    "Cypress".to_string(),
                    "Postman".to_string(),
                    "TDD".to_string(),
                ],
            },
            ExpertiseArea {
                title: "CI/CD & DevOps".to_string(),
                description: "Docker containerization, GitHub Actions pipelines, automated \
                              builds/tests/deployments, basic monitoring"
                    .to_string(),
                technologies: vec![
                    "Docker".to_string(),
                    "GitHub Actions".to_string(),
                    "CI/CD".to_string(),
                    "DevOps".to_string(),
                ],
            },
        ],
    }
}

fn stock_frontend_bundle() -> ContentBundle {
    ContentBundle {
        hero_title: "Frontend Developer".to_string(),
        hero_subtitle: "I craft pixel-perfect, interactive user experiences.".to_string(),
        about: "I'm a frontend-focused software engineer with 4+ years of experience building \
                user-centric web applications. I specialize in creating beautiful, \
                accessible, and performant user interfaces using modern frontend technologies."
            .to_string(),
        focus: "frontend".to_string(),
        badge: "Frontend Developer".to_string(),
        typing_roles: vec![
            "Frontend Developer".to_string(),
            "UI/UX Designer".to_string(),
            "React Specialist".to_string(),
            "Next.js Developer".to_string(),
            "Frontend Architect".to_string(),
        ],
        expertise_note: "My frontend expertise ensures pixel-perfect, accessible, and \
                         performant user interfaces."
            .to_string(),
        resume_file: "frontend-resume.pdf".to_string(),
        resume_label: "Frontend Resume".to_string(),
        expertise: vec![
            frontend_development_area(),
            ExpertiseArea {
                title: "UI/UX Design".to_string(),
                description: "User interface design, responsive layouts, accessibility \
                              standards, design systems, and user experience optimization"
                    .to_string(),
                technologies: vec![
                    "Figma".to_string(),
                    "Adobe XD".to_string(),
                    "Responsive Design".to_string(),
                    "Accessibility".to_string(),
                    "Design Systems".to_string(),
                    "User Research".to_string(),
                ],
            },
            ExpertiseArea {
                title: "Testing & Quality".to_string(),
                description: "Unit/integration tests (Jest, Cypress), component testing, \
                              accessibility testing, and performance optimization"
                    .to_string(),
                technologies: vec![
                    "Jest".to_string(),
                    "Cypress".to_string(),
                    "Storybook".to_string(),
                    "Lighthouse".to_string(),
                    "Performance".to_string(),
                ],
            },
            ExpertiseArea {
                title: "Build Tools & Optimization".to_string(),
                description: "Webpack, Vite, code splitting, lazy loading, bundle \
                              optimization, and modern build workflows"
                    .to_string(),
                technologies: vec![
                    "Webpack".to_string(),
                    "Vite".to_string(),
                    "Code Splitting".to_string(),
                    "Lazy Loading".to_string(),
                    "Bundle Optimization".to_string(),
                ],
            },
        ],
    }
}

fn stock_backend_bundle() -> ContentBundle {
    ContentBundle {
        hero_title: "Backend Developer".to_string(),
        hero_subtitle: "I design scalable APIs and robust server-side logic.".to_string(),
        about: "I'm a backend-focused software engineer with 4+ years of experience building \
                robust, scalable server-side applications. I specialize in API design, \
                database architecture, and system optimization."
            .to_string(),
        focus: "backend".to_string(),
        badge: "Backend Developer".to_string(),
        typing_roles: vec![
            "Backend Developer".to_string(),
            "API Developer".to_string(),
            "Node.js Specialist".to_string(),
            "Database Engineer".to_string(),
            "Backend Architect".to_string(),
        ],
        expertise_note: "My backend expertise focuses on scalable APIs, robust data \
                         management, and system optimization."
            .to_string(),
        resume_file: "backend-resume.pdf".to_string(),
        resume_label: "Backend Resume".to_string(),
        expertise: vec![
            backend_apis_area(),
            data_management_area(),
            ExpertiseArea {
                title: "Testing & Quality".to_string(),
                description: "Unit/integration tests (Jest, Supertest), API testing, database \
                              testing, and TDD practices"
                    .to_string(),
                technologies: vec![
                    "Jest".to_string(),
                    "Supertest".to_string(),
                    "API Testing".to_string(),
                    "Database Testing".to_string(),
                    "TDD".to_string(),
                ],
            },
            ExpertiseArea {
                title: "CI/CD & DevOps".to_string(),
                description: "Docker containerization, GitHub Actions pipelines, automated \
                              builds/tests/deployments, monitoring"
                    .to_string(),
                technologies: vec![
                    "Docker".to_string(),
                    "GitHub Actions".to_string(),
                    "CI/CD".to_string(),
                    "DevOps".to_string(),
                    "Monitoring".to_string(),
                ],
            },
        ],
    }
}

// =============================================================================
// Profile loading and merging
// =============================================================================

/// Returns the stock profile as a `toml::Value::Table`, the base layer for
/// merging user overrides on top.
pub fn stock_profile_value() -> toml::Value {
    toml::Value::try_from(Profile::default()).expect("stock profile must serialize")
}

/// Load a `profile.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `profile.toml` exists in the directory.
pub fn load_raw_profile(path: &Path) -> Result<Option<toml::Value>, ProfileError> {
    let profile_path = path.join(PROFILE_FILENAME);
    if !profile_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&profile_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the profile for a content root: stock content with the optional
/// `profile.toml` merged on top, validated.
pub fn load_profile(root: &Path) -> Result<Profile, ProfileError> {
    let base = stock_profile_value();
    let merged = match load_raw_profile(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let profile: Profile = merged.try_into()?;
    profile.validate()?;
    Ok(profile)
}

/// Returns the stock profile as commented TOML.
///
/// Used by the `gen-profile` CLI command. The body is serialized from the
/// stock content so it can never drift from the compiled-in defaults.
pub fn stock_profile_toml() -> String {
    let body = toml::to_string_pretty(&Profile::default())
        .expect("stock profile must serialize to TOML");
    format!(
        "# Devfolio Profile\n\
         # ===============\n\
         # Site content, keyed by role. Everything below is the stock content;\n\
         # keep only the parts you want to change. Tables merge key-by-key,\n\
         # arrays replace wholesale. Unknown keys will cause an error.\n\n{body}"
    )
}
