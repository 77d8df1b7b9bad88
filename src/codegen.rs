use crate::ast::{FieldValue, Literal, LiteralKind};
use crate::graph::{Block, BlockGraph, Input};
use crate::opcode::{Category, Opcode};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Default costume at its natural 48x48 size.
const DEFAULT_COSTUME_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 48 48"><circle cx="24" cy="24" r="20" fill="#ffab19" stroke="#cf8b17" stroke-width="2"/></svg>"##;
/// The same costume normalized to the 64x64 costume box.
const DEFAULT_COSTUME_SVG_64: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64"><g transform="scale(1.333333 1.333333)"><circle cx="24" cy="24" r="20" fill="#ffab19" stroke="#cf8b17" stroke-width="2"/></g></svg>"##;

type CodegenProgressCallback<'a> = dyn FnMut(usize, usize, &str) + 'a;

#[derive(Debug, Clone)]
pub struct CodegenOptions {
    pub scale_svgs: bool,
    pub sprite_name: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            scale_svgs: true,
            sprite_name: "Sprite1".to_string(),
        }
    }
}

pub fn write_sb3(graph: &BlockGraph, output_path: &Path, options: &CodegenOptions) -> Result<()> {
    write_sb3_with_progress(
        graph,
        output_path,
        options,
        Option::<&mut fn(usize, usize, &str)>::None,
    )
}

pub fn write_sb3_with_progress<F>(
    graph: &BlockGraph,
    output_path: &Path,
    options: &CodegenOptions,
    progress: Option<&mut F>,
) -> Result<()>
where
    F: FnMut(usize, usize, &str),
{
    let bytes = build_sb3_bytes_with_progress(graph, options, progress)?;
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'.", parent.display()))?;
        }
    }
    fs::write(output_path, bytes)
        .with_context(|| format!("Failed to write '{}'.", output_path.display()))?;
    Ok(())
}

pub fn build_sb3_bytes(graph: &BlockGraph, options: &CodegenOptions) -> Result<Vec<u8>> {
    build_sb3_bytes_with_progress(graph, options, Option::<&mut fn(usize, usize, &str)>::None)
}

pub fn build_sb3_bytes_with_progress<F>(
    graph: &BlockGraph,
    options: &CodegenOptions,
    progress: Option<&mut F>,
) -> Result<Vec<u8>>
where
    F: FnMut(usize, usize, &str),
{
    let mut progress = progress.map(|cb| cb as &mut CodegenProgressCallback<'_>);
    let mut builder = ProjectBuilder::new(graph, options);
    let (project_json, assets) = builder.build()?;
    let mut buffer = Cursor::new(Vec::<u8>::new());
    let mut zip = zip::ZipWriter::new(&mut buffer);
    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    report_progress(&mut progress, 1, 1, "Writing project.json");
    zip.start_file("project.json", opts)?;
    let project_bytes = serde_json::to_vec(&project_json)?;
    zip.write_all(&project_bytes)?;

    let asset_total = assets.len().max(1);
    for (index, (name, bytes)) in assets.into_iter().enumerate() {
        zip.start_file(name, opts)?;
        zip.write_all(&bytes)?;
        report_progress(&mut progress, index + 1, asset_total, "Packaging assets");
    }
    zip.finish()?;
    Ok(buffer.into_inner())
}

/// Full `project.json` for the graph, without packaging.
pub fn build_project_json(graph: &BlockGraph, options: &CodegenOptions) -> Result<Value> {
    let (project_json, _) = ProjectBuilder::new(graph, options).build()?;
    Ok(project_json)
}

fn report_progress(
    progress: &mut Option<&mut CodegenProgressCallback<'_>>,
    step: usize,
    total: usize,
    label: &str,
) {
    if let Some(cb) = progress.as_deref_mut() {
        cb(step, total, label);
    }
}

/// Renders the block map keyed by block id, in the shape Scratch stores it
/// under a target's `blocks`.
pub fn blocks_to_json(graph: &BlockGraph) -> Map<String, Value> {
    let mut blocks = Map::new();
    for (_, block) in graph.iter() {
        blocks.insert(block.id.clone(), block_json(graph, block));
    }
    blocks
}

fn block_json(graph: &BlockGraph, block: &Block) -> Value {
    let mut inputs = Map::new();
    for (name, input) in &block.inputs {
        let value = match input {
            Input::Literal(literal) => literal_json(literal),
            Input::Block(target) => json!([2, graph.id_of(*target)]),
        };
        inputs.insert((*name).to_string(), value);
    }
    let mut fields = Map::new();
    for (name, field) in &block.fields {
        fields.insert((*name).to_string(), field_json(field));
    }
    let mut out = json!({
        "opcode": block.opcode.as_str(),
        "next": block.next.map(|next| graph.id_of(next)),
        "parent": block.parent.map(|parent| graph.id_of(parent)),
        "inputs": inputs,
        "fields": fields,
        "shadow": block.shadow,
        "topLevel": block.top_level
    });
    if let (Some(obj), Some((x, y))) = (out.as_object_mut(), block.position) {
        obj.insert("x".to_string(), json!(x));
        obj.insert("y".to_string(), json!(y));
    }
    if block.opcode == Opcode::Stop {
        if let Some(obj) = out.as_object_mut() {
            obj.insert("mutation".to_string(), stop_mutation(block));
        }
    }
    out
}

fn literal_json(literal: &Literal) -> Value {
    match literal.kind {
        LiteralKind::Broadcast => json!([1, [literal.kind.code(), literal.value, literal.value]]),
        kind => json!([1, [kind.code(), literal.value]]),
    }
}

fn field_json(field: &FieldValue) -> Value {
    json!([field.display, field.value])
}

/// `stop` keeps a following block only when it stops the sprite's other
/// scripts.
fn stop_mutation(block: &Block) -> Value {
    let option = block
        .field("STOP_OPTION")
        .map(|field| field.display.to_lowercase())
        .unwrap_or_default();
    let has_next = matches!(
        option.as_str(),
        "other scripts in sprite" | "other scripts in stage"
    );
    let has_next = if has_next { "true" } else { "false" };
    json!({
        "tagName": "mutation",
        "children": [],
        "hasnext": has_next
    })
}

struct ProjectBuilder<'a> {
    graph: &'a BlockGraph,
    options: &'a CodegenOptions,
    assets: BTreeMap<String, Vec<u8>>,
}

impl<'a> ProjectBuilder<'a> {
    fn new(graph: &'a BlockGraph, options: &'a CodegenOptions) -> Self {
        Self {
            graph,
            options,
            assets: BTreeMap::new(),
        }
    }

    fn build(&mut self) -> Result<(Value, BTreeMap<String, Vec<u8>>)> {
        let options = self.options;
        let sprite_name = options.sprite_name.trim();
        if sprite_name.is_empty() {
            bail!("Sprite name must not be empty.");
        }
        if sprite_name.eq_ignore_ascii_case("stage") {
            bail!("Sprite name '{}' is reserved for the stage.", sprite_name);
        }
        let stage = self.build_target_json(true, "Stage", Map::new(), 0)?;
        let blocks = blocks_to_json(self.graph);
        let sprite = self.build_target_json(false, sprite_name, blocks, 1)?;
        let project_json = json!({
            "targets": [stage, sprite],
            "monitors": [],
            "extensions": self.collect_extensions(),
            "meta": {
                "semver": "3.0.0",
                "vm": "0.2.0",
                "agent": concat!("sbblocks-rs/", env!("CARGO_PKG_VERSION"))
            }
        });
        Ok((project_json, std::mem::take(&mut self.assets)))
    }

    fn collect_extensions(&self) -> Vec<String> {
        let mut extensions = Vec::new();
        if self.graph.uses_category(Category::Pen) {
            extensions.push("pen".to_string());
        }
        extensions
    }

    fn build_target_json(
        &mut self,
        is_stage: bool,
        name: &str,
        blocks: Map<String, Value>,
        layer_order: i32,
    ) -> Result<Value> {
        let costume = self.build_default_costume(if is_stage { "backdrop1" } else { "costume1" });
        let mut target_json = json!({
            "isStage": is_stage,
            "name": name,
            "variables": {},
            "lists": {},
            "broadcasts": {},
            "blocks": blocks,
            "comments": {},
            "currentCostume": 0,
            "costumes": [costume],
            "sounds": [],
            "volume": 100,
            "layerOrder": layer_order
        });
        if is_stage {
            merge_object(
                &mut target_json,
                json!({
                    "tempo": 60,
                    "videoTransparency": 50,
                    "videoState": "on",
                    "textToSpeechLanguage": Value::Null
                }),
            )?;
        } else {
            merge_object(
                &mut target_json,
                json!({
                    "visible": true,
                    "x": 0,
                    "y": 0,
                    "size": 100,
                    "direction": 90,
                    "draggable": false,
                    "rotationStyle": "all around"
                }),
            )?;
        }
        Ok(target_json)
    }

    /// Both targets wear the same costume, so the archive carries one asset.
    fn build_default_costume(&mut self, name: &str) -> Value {
        let (svg, center) = default_costume(self.options.scale_svgs);
        let data = svg.as_bytes().to_vec();
        let digest = format!("{:x}", md5::compute(&data));
        let md5ext = format!("{}.svg", digest);
        self.assets.insert(md5ext.clone(), data);
        json!({
            "name": name,
            "assetId": digest,
            "md5ext": md5ext,
            "dataFormat": "svg",
            "rotationCenterX": center,
            "rotationCenterY": center
        })
    }
}

/// Costume source and its rotation center.
fn default_costume(scale: bool) -> (&'static str, f64) {
    if scale {
        (DEFAULT_COSTUME_SVG_64, 32.0)
    } else {
        (DEFAULT_COSTUME_SVG, 24.0)
    }
}

fn merge_object(dst: &mut Value, add: Value) -> Result<()> {
    let dst_obj = dst
        .as_object_mut()
        .ok_or_else(|| anyhow!("Expected object in merge_object dst"))?;
    let add_obj = add
        .as_object()
        .ok_or_else(|| anyhow!("Expected object in merge_object add"))?;
    for (k, v) in add_obj {
        dst_obj.insert(k.clone(), v.clone());
    }
    Ok(())
}
