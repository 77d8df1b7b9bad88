//! Reconstructs block nesting from flat notation with an explicit stack of
//! frames, one per open C-block.

use crate::ast::{BlockDescriptor, Literal, LiteralKind, Predicate, SkippedLine};
use crate::condition::parse_condition;
use crate::graph::{Block, BlockGraph, BlockRef, Input};
use crate::ids::IdAllocator;
use crate::lexer::{split_lines, SourceLine};
use crate::parser::{classify_line, structural_marker, Marker};
use log::{debug, warn};

/// Where new scripts are placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLayout {
    pub x_origin: i32,
    pub x_step: i32,
    pub y: i32,
}

impl Default for ScriptLayout {
    fn default() -> Self {
        Self {
            x_origin: 30,
            x_step: 320,
            y: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TranslateOptions {
    pub layout: ScriptLayout,
    /// Fixes the id sequence; random when unset.
    pub id_seed: Option<u64>,
}

/// Result of one translation: the finished graph plus every line that was
/// dropped because nothing recognized it.
#[derive(Debug, Clone)]
pub struct Translation {
    pub graph: BlockGraph,
    pub skipped: Vec<SkippedLine>,
}

impl Translation {
    pub fn script_count(&self) -> usize {
        self.graph.top_level().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Substack,
    Substack2,
}

impl Slot {
    pub fn input_name(self) -> &'static str {
        match self {
            Slot::Substack => "SUBSTACK",
            Slot::Substack2 => "SUBSTACK2",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    owner: BlockRef,
    active_slot: Slot,
    first_in_slot: bool,
}

pub struct GraphBuilder {
    graph: BlockGraph,
    ids: IdAllocator,
    layout: ScriptLayout,
    frames: Vec<Frame>,
    last_sibling: Option<BlockRef>,
    scripts: usize,
    skipped: Vec<SkippedLine>,
}

impl GraphBuilder {
    pub fn new(options: &TranslateOptions) -> Self {
        Self {
            graph: BlockGraph::new(),
            ids: IdAllocator::new(options.id_seed),
            layout: options.layout,
            frames: Vec::new(),
            last_sibling: None,
            scripts: 0,
            skipped: Vec::new(),
        }
    }

    pub fn build(source: &str, options: &TranslateOptions) -> Translation {
        let mut builder = Self::new(options);
        for line in split_lines(source) {
            builder.feed(&line);
        }
        builder.finish()
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn feed(&mut self, line: &SourceLine) {
        if line.text.is_empty() {
            return;
        }
        match structural_marker(&line.text) {
            Some(Marker::Close) => return self.close_frame(line.line),
            Some(Marker::Else) => return self.enter_else(line.line),
            None => {}
        }
        let Some(descriptor) = classify_line(&line.text) else {
            debug!("Skipping unrecognized line {}: {:?}", line.line, line.text);
            self.skipped.push(SkippedLine {
                line: line.line,
                text: line.text.clone(),
            });
            return;
        };
        if descriptor.opcode.is_hat() {
            self.start_script(descriptor);
            return;
        }
        let opens_frame = descriptor.opcode.opens_frame();
        let condition = descriptor.condition.clone();
        let block = self.append(descriptor);
        if let Some(text) = condition {
            self.wire_condition(block, &text);
        }
        if opens_frame {
            self.frames.push(Frame {
                owner: block,
                active_slot: Slot::Substack,
                first_in_slot: true,
            });
        }
    }

    pub fn finish(self) -> Translation {
        if !self.frames.is_empty() {
            debug!(
                "Input ended with {} open frame(s); closing implicitly",
                self.frames.len()
            );
        }
        Translation {
            graph: self.graph,
            skipped: self.skipped,
        }
    }

    fn close_frame(&mut self, line: usize) {
        match self.frames.pop() {
            Some(frame) => self.last_sibling = Some(frame.owner),
            None => warn!("Ignoring closing marker on line {} with nothing open", line),
        }
    }

    fn enter_else(&mut self, line: usize) {
        let Some(frame) = self.frames.last_mut() else {
            warn!("Ignoring else on line {} outside any block", line);
            return;
        };
        let owner = self.graph.get_mut(frame.owner);
        if !owner.opcode.accepts_else() || frame.active_slot == Slot::Substack2 {
            warn!("Ignoring else on line {}: {} cannot take it", line, owner.opcode);
            return;
        }
        owner.opcode = crate::opcode::Opcode::IfElse;
        frame.active_slot = Slot::Substack2;
        frame.first_in_slot = true;
        self.last_sibling = None;
    }

    fn start_script(&mut self, descriptor: BlockDescriptor) -> BlockRef {
        self.frames.clear();
        let block = self.instantiate(&descriptor);
        self.place_top_level(block);
        self.last_sibling = Some(block);
        block
    }

    fn place_top_level(&mut self, block: BlockRef) {
        let slot = i32::try_from(self.scripts).unwrap_or(i32::MAX);
        let x = self
            .layout
            .x_origin
            .saturating_add(self.layout.x_step.saturating_mul(slot));
        self.scripts += 1;
        let entry = self.graph.get_mut(block);
        entry.top_level = true;
        entry.parent = None;
        entry.position = Some((x, self.layout.y));
    }

    fn append(&mut self, descriptor: BlockDescriptor) -> BlockRef {
        let block = self.instantiate(&descriptor);
        let first_slot = self
            .frames
            .last()
            .filter(|frame| frame.first_in_slot || self.last_sibling.is_none())
            .copied();
        if let Some(frame) = first_slot {
            self.graph
                .get_mut(frame.owner)
                .set_input(frame.active_slot.input_name(), Input::Block(block));
            self.graph.get_mut(block).parent = Some(frame.owner);
            if let Some(active) = self.frames.last_mut() {
                active.first_in_slot = false;
            }
        } else if let Some(previous) = self.last_sibling {
            let container = {
                let prev = self.graph.get(previous);
                if prev.opcode.is_hat() {
                    Some(previous)
                } else {
                    prev.parent
                }
            };
            self.graph.get_mut(previous).next = Some(block);
            self.graph.get_mut(block).parent = container;
        } else {
            // A script that does not start with a hat.
            self.place_top_level(block);
        }
        self.last_sibling = Some(block);
        block
    }

    fn instantiate(&mut self, descriptor: &BlockDescriptor) -> BlockRef {
        let mut block = Block::new(self.ids.next_id(), descriptor.opcode);
        for (name, literal) in &descriptor.inputs {
            block.set_input(name, Input::Literal(literal.clone()));
        }
        block.fields = descriptor.fields.clone();
        self.graph.push(block)
    }

    fn wire_condition(&mut self, owner: BlockRef, text: &str) {
        match parse_condition(text) {
            Some(predicate) => {
                let root = self.emit_predicate(&predicate, owner);
                self.graph
                    .get_mut(owner)
                    .set_input("CONDITION", Input::Block(root));
            }
            None => debug!("Leaving CONDITION empty; could not parse {:?}", text),
        }
    }

    fn emit_predicate(&mut self, predicate: &Predicate, parent: BlockRef) -> BlockRef {
        let mut block = Block::new(self.ids.next_id(), predicate.opcode());
        block.parent = Some(parent);
        match predicate {
            Predicate::Compare { left, right, .. } => {
                block.set_input("OPERAND1", Input::Literal(Literal::text(left.clone())));
                block.set_input("OPERAND2", Input::Literal(Literal::text(right.clone())));
            }
            Predicate::TouchingObject(target) => {
                block.set_input(
                    "TOUCHINGOBJECTMENU",
                    Input::Literal(Literal::text(target.clone())),
                );
            }
            Predicate::TouchingColor(color) => {
                block.set_input(
                    "COLOR",
                    Input::Literal(Literal::new(LiteralKind::Color, color.clone())),
                );
            }
            Predicate::KeyPressed(key) => {
                block.set_input("KEY_OPTION", Input::Literal(Literal::text(key.clone())));
            }
            Predicate::And(..) | Predicate::Or(..) | Predicate::Not(_) | Predicate::MouseDown => {}
        }
        let this = self.graph.push(block);
        let operands: Vec<(&'static str, &Option<Box<Predicate>>)> = match predicate {
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                vec![("OPERAND1", left), ("OPERAND2", right)]
            }
            Predicate::Not(inner) => vec![("OPERAND", inner)],
            _ => Vec::new(),
        };
        for (slot, operand) in operands {
            if let Some(operand) = operand {
                let child = self.emit_predicate(operand, this);
                self.graph.get_mut(this).set_input(slot, Input::Block(child));
            }
        }
        this
    }
}
