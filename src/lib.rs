pub mod ast;
pub mod builder;
pub mod catalog;
pub mod codegen;
pub mod condition;
pub mod graph;
pub mod ids;
pub mod lexer;
pub mod opcode;
pub mod parser;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

#[cfg(all(target_arch = "wasm32", feature = "wasm-bindings"))]
pub mod wasm;

pub use builder::{GraphBuilder, ScriptLayout, TranslateOptions, Translation};
pub use codegen::CodegenOptions;
pub use graph::BlockGraph;

use anyhow::Result;

/// Translates notation with default placement and random ids.
pub fn translate(source: &str) -> Translation {
    translate_with_options(source, &TranslateOptions::default())
}

pub fn translate_with_options(source: &str, options: &TranslateOptions) -> Translation {
    GraphBuilder::build(source, options)
}

/// Block map of the translated source, keyed by id.
pub fn translate_to_json(source: &str, options: &TranslateOptions) -> serde_json::Value {
    translate_with_options(source, options).graph.to_json()
}

pub fn translate_to_sb3_bytes(
    source: &str,
    options: &TranslateOptions,
    codegen_options: &CodegenOptions,
) -> Result<Vec<u8>> {
    let translation = translate_with_options(source, options);
    codegen::build_sb3_bytes(&translation.graph, codegen_options)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_cli(args: &cli::Args) -> Result<()> {
    use anyhow::Context;
    use log::{info, warn};

    let total_stages = 3 + usize::from(args.json.is_some());
    let progress = CliProgress::new("Translate", total_stages);
    let mut stage = 0usize;

    stage += 1;
    progress.emit(stage, "Reading input");
    let source = cli::read_source(&args.input)?;

    stage += 1;
    progress.emit(stage, "Building block graph");
    let translation = translate_with_options(&source, &args.translate_options());
    info!(
        "Built {} block(s) in {} script(s); {} line(s) skipped",
        translation.graph.len(),
        translation.script_count(),
        translation.skipped.len()
    );
    for problem in translation.graph.check_links() {
        warn!("{}", problem);
    }
    if args.report_skipped {
        for skipped in &translation.skipped {
            eprintln!("Skipped line {}: {}", skipped.line, skipped.text);
        }
    }

    if let Some(json_path) = &args.json {
        stage += 1;
        progress.emit(stage, "Writing block map");
        let rendered = serde_json::to_string_pretty(&translation.graph.to_json())?;
        std::fs::write(json_path, rendered)
            .with_context(|| format!("Failed to write '{}'.", json_path.display()))?;
    }

    stage += 1;
    progress.emit(stage, "Building .sb3");
    let output = args.output_path();
    let mut archive_stage_cb = |step: usize, total: usize, label: &str| {
        progress.emit_with_total(stage + step - 1, stage + total - 1, label);
    };
    codegen::write_sb3_with_progress(
        &translation.graph,
        &output,
        &args.codegen_options(),
        Some(&mut archive_stage_cb),
    )?;
    eprintln!("Wrote '{}'.", output.display());
    Ok(())
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
        self.emit_with_total(step, self.total, label);
    }

    fn emit_with_total(&self, step: usize, total: usize, label: &str) {
        let total = total.max(1);
        let step = step.clamp(1, total);
        let bar = render_progress_bar(step, total, 14);
        eprintln!(
            "[{}] {}... ({}/{}) {}",
            self.prefix, label, step, total, bar
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
        assert_eq!(render_progress_bar(1, 2, 4), "[==--]");
        assert_eq!(render_progress_bar(4, 4, 4), "[====]");
    }

    #[test]
    fn json_output_is_keyed_by_id() {
        let options = TranslateOptions {
            id_seed: Some(11),
            ..TranslateOptions::default()
        };
        let json = translate_to_json("when green flag clicked\nshow", &options);
        let blocks = json.as_object().unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|(id, _)| id.len() == 20));
    }
}
