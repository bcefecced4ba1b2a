pub mod block;
pub mod error;
pub mod generator;
pub mod names;
pub mod order;
pub mod rules;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

use anyhow::{Context, Result};
use block::Workspace;
use generator::{generate_program, GeneratorOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(all(target_arch = "wasm32", feature = "wasm-bindings"))]
pub mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub fn run_cli(args: &cli::Args) -> Result<()> {
    let total_stages = 3 + usize::from(args.output.is_some());
    let progress = CliProgress::new("Generate", total_stages);
    let mut stage = 0usize;

    stage += 1;
    progress.emit(stage, "Resolving input path");
    let input = canonicalize_file(&args.input)?;

    stage += 1;
    progress.emit(stage, "Reading workspace");
    let workspace = read_workspace(&input)?;

    stage += 1;
    progress.emit(stage, "Generating Arduino code");
    let options = args.generator_options(&workspace);
    let sketch = generate_workspace(&workspace, options)
        .with_context(|| format!("Code generation failed for '{}'.", pretty_path(&input)))?;

    if let Some(output) = &args.output {
        stage += 1;
        progress.emit(stage, "Writing sketch");
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, sketch.as_bytes())
            .with_context(|| format!("Failed to write '{}'.", output.display()))?;
    } else {
        print!("{}", sketch);
    }

    Ok(())
}

/// Generates a sketch from workspace JSON, honouring the options the
/// workspace itself carries.
pub fn generate_source(source: &str) -> Result<String> {
    let workspace = parse_workspace(source)?;
    let options = GeneratorOptions::for_workspace(&workspace);
    generate_workspace(&workspace, options)
}

pub fn generate_file(input: &Path) -> Result<String> {
    let input = canonicalize_file(input)?;
    let workspace = read_workspace(&input)?;
    let options = GeneratorOptions::for_workspace(&workspace);
    generate_workspace(&workspace, options)
        .with_context(|| format!("Code generation failed for '{}'.", pretty_path(&input)))
}

pub fn generate_workspace(workspace: &Workspace, options: GeneratorOptions) -> Result<String> {
    Ok(generate_program(workspace, options)?)
}

pub fn parse_workspace(source: &str) -> Result<Workspace> {
    Workspace::from_json_str(source).context("Invalid workspace JSON.")
}

pub fn canonicalize_file(path: &Path) -> Result<PathBuf> {
    if !path.exists() || !path.is_file() {
        return Err(anyhow::anyhow!("Input file not found: '{}'.", path.display()));
    }
    Ok(path.canonicalize()?)
}

fn read_workspace(input: &Path) -> Result<Workspace> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("Failed to read '{}'.", pretty_path(input)))?;
    parse_workspace(&source).with_context(|| format!("While reading '{}'.", pretty_path(input)))
}

fn pretty_path(path: &Path) -> String {
    let raw = path.display().to_string();
    if let Some(stripped) = raw.strip_prefix(r"\\?\") {
        stripped.to_string()
    } else {
        raw
    }
}

#[cfg(not(target_arch = "wasm32"))]
struct CliProgress {
    prefix: &'static str,
    total: usize,
}

#[cfg(not(target_arch = "wasm32"))]
impl CliProgress {
    fn new(prefix: &'static str, total: usize) -> Self {
        Self {
            prefix,
            total: total.max(1),
        }
    }

    fn emit(&self, step: usize, label: &str) {
        let step = step.clamp(1, self.total);
        let bar = render_progress_bar(step, self.total, 14);
        eprintln!(
            "[{}] {}... ({}/{}) {}",
            self.prefix, label, step, self.total, bar
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn render_progress_bar(step: usize, total: usize, width: usize) -> String {
    let width = width.max(1);
    let filled = ((step * width) + (total / 2)) / total;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < filled { '=' } else { '-' });
    }
    s.push(']');
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(render_progress_bar(1, 4, 8), "[==------]");
        assert_eq!(render_progress_bar(4, 4, 8), "[========]");
    }

    #[test]
    fn pretty_path_drops_verbatim_prefix() {
        assert_eq!(pretty_path(Path::new(r"\\?\C:\sketch.json")), r"C:\sketch.json");
        assert_eq!(pretty_path(Path::new("/tmp/sketch.json")), "/tmp/sketch.json");
    }

    #[test]
    fn invalid_json_is_reported_with_context() {
        let err = generate_source("{not json").unwrap_err();
        assert!(err.to_string().contains("Invalid workspace JSON."));
    }
}
