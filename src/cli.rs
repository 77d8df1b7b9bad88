use crate::builder::{ScriptLayout, TranslateOptions};
use crate::codegen::CodegenOptions;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "sbblocks",
    about = "Translate scratchblocks notation (English or Spanish) into a Scratch 3 project."
)]
pub struct Args {
    #[arg(value_name = "INPUT", help = "Notation file, or '-' to read stdin.")]
    pub input: PathBuf,

    #[arg(value_name = "OUTPUT", help = "Archive path. Defaults to INPUT with an .sb3 extension.")]
    pub output: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Also write the block map as JSON to this path.")]
    pub json: Option<PathBuf>,

    #[arg(long, help = "List lines that matched no block on stderr.")]
    pub report_skipped: bool,

    #[arg(long, help = "Seed block ids for reproducible output.")]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = ScriptLayout::default().x_step, allow_hyphen_values = true, help = "Horizontal distance between scripts.")]
    pub x_step: i32,

    #[arg(long, help = "Disable automatic SVG normalization to 64x64.")]
    pub no_svg_scale: bool,

    #[arg(long, default_value = "Sprite1", help = "Name of the sprite holding the scripts.")]
    pub sprite_name: String,
}

impl Args {
    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            layout: ScriptLayout {
                x_step: self.x_step,
                ..ScriptLayout::default()
            },
            id_seed: self.seed,
        }
    }

    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            scale_svgs: !self.no_svg_scale,
            sprite_name: self.sprite_name.clone(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(output) => output.clone(),
            None if is_stdin(&self.input) => PathBuf::from("project.sb3"),
            None => self.input.with_extension("sb3"),
        }
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub fn read_source(input: &Path) -> Result<String> {
    if is_stdin(input) {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read notation from stdin.")?;
        return Ok(source);
    }
    if !input.is_file() {
        anyhow::bail!("Input file not found: '{}'.", input.display());
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read '{}'.", input.display()))
}
