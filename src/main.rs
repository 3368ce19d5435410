use anyhow::Context;
use clap::Parser;
use resume_latex::{Config, Pipeline, Profile, SectionPolicy, DEFAULT_COMPILER, DEFAULT_ENDPOINT};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "resume-latex",
    version,
    author,
    about = "Render a resume profile to LaTeX and compile it to PDF",
    long_about = "Render a resume profile to LaTeX and compile it to PDF.\n\n\
    The profile is a JSON document as produced by the resume form. Every piece of \
    text is escaped for LaTeX, the sections are substituted into the document \
    skeleton, and the result is sent to a remote LaTeX build service.\n\n\
    USAGE EXAMPLES:\n  \
      # Build out/<first>_<last>.tex and .pdf\n  \
      resume-latex --profile profile.json\n\n  \
      # Only print the LaTeX source\n  \
      resume-latex --profile profile.json --preview\n\n  \
      # Keep placeholder text for empty sections, skip the PDF\n  \
      resume-latex --profile profile.json --keep-empty-sections --no-compile"
)]
struct Cli {
    /// Profile JSON file
    #[arg(short, long, value_name = "FILE")]
    profile: PathBuf,

    /// Output directory for the generated files
    #[arg(short, long, default_value = "out", value_name = "PATH")]
    out: PathBuf,

    /// Show placeholder text instead of dropping empty optional sections
    #[arg(long)]
    keep_empty_sections: bool,

    /// Write the LaTeX source only
    #[arg(long)]
    no_compile: bool,

    /// Print the LaTeX source to stdout and exit
    #[arg(long)]
    preview: bool,

    /// Dry run (don't write files or compile)
    #[arg(long)]
    dry_run: bool,

    /// Render even if the profile fails validation
    #[arg(long)]
    lenient: bool,

    /// LaTeX build service endpoint
    #[arg(long, env = "RESUME_LATEX_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Compiler requested from the build service
    #[arg(long, env = "RESUME_LATEX_COMPILER", default_value = DEFAULT_COMPILER)]
    compiler: String,

    /// Compile request timeout in seconds
    #[arg(long, default_value_t = 60, value_name = "SECS")]
    timeout: u64,

    /// Path to a custom Tera document skeleton
    ///
    /// The skeleton receives the rendered sections under `ctx`; see the
    /// built-in `templates/resume.tex.tera` for the available values.
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let json = tokio::fs::read_to_string(&cli.profile)
        .await
        .with_context(|| format!("Failed to read profile {}", cli.profile.display()))?;
    let profile = Profile::from_json(&json).context("Failed to parse profile")?;

    let policy = if cli.keep_empty_sections {
        SectionPolicy::Placeholder
    } else {
        SectionPolicy::Suppress
    };

    let mut builder = Config::builder()
        .output_dir(cli.out)
        .section_policy(policy)
        .endpoint(cli.endpoint)
        .compiler(cli.compiler)
        .timeout(Duration::from_secs(cli.timeout))
        .skip_compile(cli.no_compile)
        .dry_run(cli.dry_run)
        .strict_validation(!cli.lenient);

    if let Some(template_path) = cli.template {
        builder = builder.template_path(template_path);
    }

    let config = builder.build().context("Failed to build configuration")?;

    let pipeline = Pipeline::new(config).context("Failed to create pipeline")?;

    if cli.preview {
        let latex = pipeline
            .preview(&profile)
            .context("Failed to render LaTeX")?;
        print!("{latex}");
        return Ok(ExitCode::SUCCESS);
    }

    let report = pipeline
        .run(&profile)
        .await
        .context("Pipeline execution failed")?;
    report.print_summary();

    if report.succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("resume_latex=info"),
        1 => EnvFilter::new("resume_latex=debug"),
        _ => EnvFilter::new("resume_latex=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}
