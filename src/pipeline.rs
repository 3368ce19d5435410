use crate::{
    compile::{CompileError, Compiler, RemoteCompiler},
    config::Config,
    document::Assembler,
    error::{Error, Result},
    profile::Profile,
    sanitize::artifact_basename,
    validate::{validate_profile, ValidationIssue},
    writer::{self, ArtifactSummary, CompileStatus, Manifest, Writer},
};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Artifact name used when the profile has no usable name.
pub const DEFAULT_BASENAME: &str = "resume";

/// What one pipeline run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Base name of the artifacts, e.g. `anita_rao`
    pub base_name: String,

    /// Size of the generated LaTeX source
    pub latex_bytes: usize,

    /// Written LaTeX source, if any
    pub tex: Option<ArtifactSummary>,

    /// Written PDF, if any
    pub pdf: Option<ArtifactSummary>,

    pub compile_status: CompileStatus,

    /// Why compilation failed; the run itself still succeeds
    #[serde(skip)]
    pub compile_error: Option<CompileError>,

    /// Validation warnings (and errors, in lenient mode)
    pub warnings: Vec<String>,

    /// Total execution time
    pub duration: Duration,

    /// Time spent rendering
    pub render_duration: Duration,

    /// Time spent waiting for the compile service
    pub compile_duration: Duration,

    /// Output directory path
    pub output_directory: String,

    /// Number of files written, manifest included
    pub files_written: usize,
}

impl BuildReport {
    /// Returns true unless compilation was attempted and failed.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.compile_error.is_none()
    }

    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        let artifact = |summary: &Option<ArtifactSummary>| {
            summary.as_ref().map_or_else(
                || "-".to_string(),
                |s| format!("{} ({} bytes)", s.filename, s.bytes),
            )
        };

        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║                 Resume Build Summary                  ║");
        println!("╠═══════════════════════════════════════════════════════╣");
        println!("║ Resume:           {:<36}║", self.base_name);
        println!("║ LaTeX size:       {:>8} bytes                     ║", self.latex_bytes);
        println!("║ Warnings:         {:>8}                           ║", self.warnings.len());
        println!("║                                                       ║");
        println!("║ Source:           {}", artifact(&self.tex));
        println!("║ PDF:              {}", artifact(&self.pdf));
        println!("║ Compile:          {:?}", self.compile_status);
        if let Some(ref err) = self.compile_error {
            println!("║   {err}");
        }
        println!("║                                                       ║");
        println!("║ Files Written:    {:>8}                           ║", self.files_written);
        println!("║ Output Directory:                                     ║");
        println!("║   {}", self.output_directory);
        println!("║                                                       ║");
        println!("║ Timing Breakdown:                                     ║");
        println!(
            "║   - Rendering:    {:>8.2}s                          ║",
            self.render_duration.as_secs_f64()
        );
        println!(
            "║   - Compiling:    {:>8.2}s                          ║",
            self.compile_duration.as_secs_f64()
        );
        println!(
            "║   - Total:        {:>8.2}s                          ║",
            self.duration.as_secs_f64()
        );
        println!("╚═══════════════════════════════════════════════════════╝\n");
    }
}

/// Renders a profile, compiles it and writes the artifacts.
pub struct Pipeline {
    config: Config,
    assembler: Assembler,
    writer: Writer,
    compiler: Box<dyn Compiler>,
}

impl Pipeline {
    /// Creates a pipeline that compiles through the configured service.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The skeleton cannot be loaded
    /// - The HTTP client cannot be built
    pub fn new(config: Config) -> Result<Self> {
        let compiler = RemoteCompiler::new(&config.compile)?;
        Self::with_compiler(config, compiler)
    }

    /// Creates a pipeline with a caller-supplied compiler.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails or the skeleton
    /// cannot be loaded.
    pub fn with_compiler(config: Config, compiler: impl Compiler + 'static) -> Result<Self> {
        config.validate()?;

        let assembler = Assembler::new(&config)?;
        let writer = Writer::new(&config);

        Ok(Self {
            config,
            assembler,
            writer,
            compiler: Box::new(compiler),
        })
    }

    /// Renders the LaTeX source without validating, writing or compiling.
    ///
    /// # Errors
    ///
    /// Returns an error only if the skeleton fails to render.
    pub fn preview(&self, profile: &Profile) -> Result<String> {
        self.assembler.assemble(profile)
    }

    /// Executes the complete pipeline and returns a report.
    ///
    /// # Process
    ///
    /// 1. **Validate**: checks the profile's field rules
    /// 2. **Render**: assembles the LaTeX document
    /// 3. **Write**: stores the `.tex` source
    /// 4. **Compile**: submits the source and stores the `.pdf`
    /// 5. **Manifest**: records what was produced
    ///
    /// A failed compilation does not fail the run; it is reported in
    /// [`BuildReport::compile_error`].
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails in strict mode, or if rendering
    /// or writing fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use resume_latex::{Config, Pipeline, Profile};
    ///
    /// # async fn build() -> anyhow::Result<()> {
    /// let profile = Profile::from_json(&std::fs::read_to_string("profile.json")?)?;
    /// let report = Pipeline::new(Config::builder().build()?)?.run(&profile).await?;
    /// report.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(output_dir = %self.config.output_dir.display()))]
    pub async fn run(&self, profile: &Profile) -> Result<BuildReport> {
        let start_time = Instant::now();

        info!("Stage 1/4: Validating profile...");
        let warnings = self.check_profile(profile)?;

        info!("Stage 2/4: Rendering LaTeX...");
        let render_start = Instant::now();
        let latex = self.assembler.assemble(profile)?;
        let render_duration = render_start.elapsed();
        info!(
            "✓ Rendered {} bytes in {:.3}s",
            latex.len(),
            render_duration.as_secs_f64()
        );

        let base_name =
            artifact_basename(&profile.first_name, &profile.last_name, DEFAULT_BASENAME);

        let mut report = BuildReport {
            base_name,
            latex_bytes: latex.len(),
            tex: None,
            pdf: None,
            compile_status: CompileStatus::Skipped,
            compile_error: None,
            warnings,
            duration: Duration::ZERO,
            render_duration,
            compile_duration: Duration::ZERO,
            output_directory: self.writer.output_dir().display().to_string(),
            files_written: 0,
        };

        if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes and compilation");
            report.duration = start_time.elapsed();
            return Ok(report);
        }

        info!("Stage 3/4: Writing LaTeX source...");
        let tex_name = format!("{}.tex", report.base_name);
        report.tex = Some(self.writer.write_artifact(&tex_name, latex.as_bytes())?);
        report.files_written += 1;

        if self.config.skip_compile {
            info!("Stage 4/4: Compilation skipped");
        } else {
            info!("Stage 4/4: Compiling through {}...", self.config.compile.endpoint);
            let compile_start = Instant::now();
            let outcome = self.compiler.compile(&latex).await;
            report.compile_duration = compile_start.elapsed();

            match outcome {
                Ok(pdf) => {
                    let pdf_name = format!("{}.pdf", report.base_name);
                    report.pdf = Some(self.writer.write_artifact(&pdf_name, &pdf)?);
                    report.files_written += 1;
                    report.compile_status = CompileStatus::Compiled;
                    info!(
                        "✓ Compiled in {:.2}s",
                        report.compile_duration.as_secs_f64()
                    );
                }
                Err(err) => {
                    warn!(transient = err.is_transient(), "Compilation failed: {}", err);
                    report.compile_status = CompileStatus::Failed;
                    report.compile_error = Some(err);
                }
            }
        }

        report.duration = start_time.elapsed();
        self.write_manifest(&report)?;
        report.files_written += 1;

        info!(
            "✓ Pipeline completed in {:.2}s",
            report.duration.as_secs_f64()
        );

        Ok(report)
    }

    /// Logs every issue; fails on errors in strict mode.
    fn check_profile(&self, profile: &Profile) -> Result<Vec<String>> {
        let (errors, warnings): (Vec<ValidationIssue>, Vec<ValidationIssue>) =
            validate_profile(profile)
                .into_iter()
                .partition(ValidationIssue::is_error);

        for issue in &warnings {
            warn!("{}", issue);
        }

        if !errors.is_empty() {
            if self.config.strict_validation {
                return Err(Error::invalid_profile(errors));
            }
            for issue in &errors {
                warn!("Ignoring invalid field {}", issue);
            }
        }

        Ok(errors
            .iter()
            .chain(&warnings)
            .map(ToString::to_string)
            .collect())
    }

    fn write_manifest(&self, report: &BuildReport) -> Result<()> {
        let manifest = Manifest {
            base_name: &report.base_name,
            tex: report.tex.as_ref(),
            pdf: report.pdf.as_ref(),
            section_policy: self.config.section_policy.as_str(),
            compiler: &self.config.compile.compiler,
            compile_status: report.compile_status,
            compile_error: report.compile_error.as_ref().map(ToString::to_string),
            warnings: report.warnings.clone(),
            duration_secs: report.duration.as_secs_f64(),
            output_directory: report.output_directory.clone(),
            generated_at: writer::timestamp(),
        };
        self.writer.write_manifest(&manifest)?;
        Ok(())
    }
}
