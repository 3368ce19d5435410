//! Render preview example
//!
//! Renders the bundled sample profile under both section policies and
//! prints the validation report. Nothing is written or compiled.
//!
//! Run with: cargo run --example render_preview

use resume_latex::{validate_profile, Assembler, Config, Profile, SectionPolicy};

const SAMPLE_PROFILE: &str = include_str!("profile.json");

fn main() -> anyhow::Result<()> {
    let profile = Profile::from_json(SAMPLE_PROFILE)?;

    let issues = validate_profile(&profile);
    println!("Validation: {} issue(s)", issues.len());
    for issue in &issues {
        println!("  - [{:?}] {}", issue.severity, issue);
    }
    println!();

    for policy in [SectionPolicy::Suppress, SectionPolicy::Placeholder] {
        let config = Config::builder().section_policy(policy).build()?;
        let assembler = Assembler::new(&config)?;
        let latex = assembler.assemble(&profile)?;

        println!("=== {} ({} bytes) ===", assembler.policy().as_str(), latex.len());
        // The awards list is empty in the sample, so only the placeholder
        // policy keeps the heading.
        println!(
            "  awards section present: {}",
            latex.contains("AWARDS \\& ACHIEVEMENTS")
        );
    }
    println!();

    print!("{}", resume_latex::render_latex(&profile)?);

    Ok(())
}
