use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// One `cargo check` invocation.
struct Build {
    label: &'static str,
    args: &'static [&'static str],
}

const BUILDS: &[Build] = &[
    Build {
        label: "platform (no_std, thumbv7em)",
        args: &["-p", "platform", "--target", "thumbv7em-none-eabihf", "--no-default-features"],
    },
    Build {
        label: "dual-adc (no_std, thumbv7em)",
        args: &["-p", "dual-adc", "--target", "thumbv7em-none-eabihf", "--no-default-features"],
    },
    Build {
        label: "dual-adc + defmt (thumbv7em)",
        args: &["-p", "dual-adc", "--target", "thumbv7em-none-eabihf", "--features", "defmt"],
    },
    Build {
        label: "dual-adc + std,tracing (host)",
        args: &["-p", "dual-adc", "--features", "std,tracing"],
    },
];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    for build in BUILDS {
        println!("{}", format!("  Checking {}...", build.label).cyan());
        let start = Instant::now();

        let output = Command::new("cargo")
            .arg("check")
            .args(build.args)
            .output()
            .with_context(|| format!("Failed to check {}", build.label))?;

        if !output.status.success() {
            eprintln!("{}", format!("  ✗ {} failed", build.label).red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("Check of {} failed", build.label);
        }

        println!(
            "{}",
            format!("  ✓ {} passed in {:.2}s", build.label, start.elapsed().as_secs_f64()).green()
        );
        println!();
    }

    // Clippy lints
    println!("{}", "  Running clippy lints...".cyan());
    let clippy_start = Instant::now();

    let clippy_output = Command::new("cargo")
        .args(["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .output()
        .context("Failed to run clippy")?;

    if clippy_output.status.success() {
        println!(
            "{}",
            format!("  ✓ Clippy passed in {:.2}s", clippy_start.elapsed().as_secs_f64()).green()
        );
    } else {
        eprintln!("{}", "  ⚠ Clippy warnings found".yellow().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&clippy_output.stderr));
    }
    println!();

    // Format check
    println!("{}", "  Checking code formatting...".cyan());

    let fmt_output = Command::new("cargo")
        .args(["fmt", "--all", "--check"])
        .output()
        .context("Failed to run cargo fmt")?;

    if fmt_output.status.success() {
        println!("{}", "  ✓ Formatting check passed".green());
    } else {
        eprintln!("{}", "  ⚠ Formatting issues found".yellow().bold());
        eprintln!("     Run 'cargo fmt --all' to fix");
    }
    println!();

    println!(
        "{}",
        format!("✓ All checks completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();

    Ok(())
}
