use clap::{Parser, Subcommand};
use devfolio::{config, content, generate, output, projects, scan, serve};
use std::path::PathBuf;

/// Shared flags for commands that fetch projects.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Ignore the fetch cache and contact the projects endpoint again
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "devfolio")]
#[command(about = "Static site generator for a role-aware developer portfolio")]
#[command(long_about = "\
Static site generator for a role-aware developer portfolio

Your content directory is the data source. TOML files override the stock
profile and settings; everything is optional, and an empty directory
builds the complete stock site.

Content structure:

  content/
  ├── config.toml                  # Site settings (colors, animation, projects, email, serve)
  ├── profile.toml                 # Content overrides (identity, role bundles, experience)
  ├── resumes/                     # Role résumés, linked from each page header
  │   ├── fullstack-resume.pdf
  │   ├── frontend-resume.pdf
  │   └── backend-resume.pdf
  └── assets/                      # Static assets (favicon, images) → copied to output root

The site builds one page per role: /, /frontend/, and /backend/. Projects
are fetched from the configured API endpoint at build time; a fetch
failure renders as a notice in the projects section instead of failing
the build.

Run 'devfolio gen-config' for a documented config.toml and
'devfolio gen-profile' for the stock profile.toml to edit.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifests, fetch cache)
    #[arg(long, default_value = ".devfolio-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve content directory and config into a manifest
    Scan,
    /// Fetch projects from the configured endpoint
    Fetch(CacheArgs),
    /// Produce the final HTML site from the staged manifests
    Generate,
    /// Run the full pipeline: scan → fetch → generate
    Build(CacheArgs),
    /// Validate content directory without building
    Check,
    /// Serve the generated site for local preview
    Serve,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Print the stock profile.toml for customizing site content
    GenProfile,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(cli.temp_dir.join(scan::MANIFEST_FILENAME), json)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Fetch(cache_args) => {
            let config = config::load_config(&cli.source)?;
            std::fs::create_dir_all(&cli.temp_dir)?;
            let outcome = projects::gather_projects(
                &config.projects,
                &cli.source,
                &cli.temp_dir,
                !cache_args.no_cache,
                projects::now_unix(),
            )?;
            projects::write_projects_manifest(&cli.temp_dir, &outcome.manifest)?;
            output::print_fetch_output(&outcome.manifest, outcome.from_cache);
        }
        Command::Generate => {
            generate::generate(&cli.temp_dir, &cli.source, &cli.output)?;
            let manifest = scan::read_manifest(&cli.temp_dir)?;
            output::print_generate_output(&manifest);
        }
        Command::Build(cache_args) => {
            std::fs::create_dir_all(&cli.temp_dir)?;

            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(cli.temp_dir.join(scan::MANIFEST_FILENAME), json)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Fetching projects");
            let outcome = projects::gather_projects(
                &manifest.config.projects,
                &cli.source,
                &cli.temp_dir,
                !cache_args.no_cache,
                projects::now_unix(),
            )?;
            projects::write_projects_manifest(&cli.temp_dir, &outcome.manifest)?;
            output::print_fetch_output(&outcome.manifest, outcome.from_cache);

            println!("==> Stage 3: Generating HTML → {}", cli.output.display());
            generate::generate(&cli.temp_dir, &cli.source, &cli.output)?;
            output::print_generate_output(&manifest);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Serve => {
            serve::serve(&cli.temp_dir, &cli.output)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenProfile => {
            print!("{}", content::stock_profile_toml());
        }
    }

    Ok(())
}
