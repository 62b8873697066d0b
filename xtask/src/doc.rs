use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Crates whose docs are built, in dependency order.
const CRATES: [&str; 2] = ["platform", "dual-adc"];

pub fn run(open: bool, private: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.args(["doc", "--no-deps", "--features", "dual-adc/std"]);
    for name in CRATES {
        cmd.args(["-p", name]);
    }
    if private {
        cmd.arg("--document-private-items");
    }
    if open {
        cmd.arg("--open");
    }
    // Broken intra-doc links fail the build.
    cmd.env("RUSTDOCFLAGS", "-D rustdoc::broken_intra_doc_links");

    let output = cmd.output().context("Failed to build documentation")?;

    if !output.status.success() {
        eprintln!("{}", "✗ Documentation build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("Documentation build failed");
    }

    println!(
        "{}",
        format!("✓ Documentation built in {:.2}s", start.elapsed().as_secs_f64()).green()
    );

    if !open {
        println!();
        println!("   {}", "Open target/doc/dual_adc/index.html in your browser".dimmed());
        println!("   {}", "Or run 'cargo run -p xtask -- doc --open'".dimmed());
    }

    println!();

    Ok(())
}
