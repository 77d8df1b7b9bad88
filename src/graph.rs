use crate::ast::{FieldValue, Literal};
use crate::opcode::{Category, Opcode};
use std::collections::{HashMap, HashSet};

/// Index of a block inside its [`BlockGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockRef(usize);

impl BlockRef {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Literal(Literal),
    /// Nested predicate or the head of a sub-stack.
    Block(BlockRef),
}

#[derive(Debug, Clone)]
pub struct Block {
    pub id: String,
    pub opcode: Opcode,
    pub parent: Option<BlockRef>,
    pub next: Option<BlockRef>,
    pub inputs: Vec<(&'static str, Input)>,
    pub fields: Vec<(&'static str, FieldValue)>,
    pub shadow: bool,
    pub top_level: bool,
    pub position: Option<(i32, i32)>,
}

impl Block {
    pub fn new(id: String, opcode: Opcode) -> Self {
        Self {
            id,
            opcode,
            parent: None,
            next: None,
            inputs: Vec::new(),
            fields: Vec::new(),
            shadow: false,
            top_level: false,
            position: None,
        }
    }

    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, input)| input)
    }

    pub fn set_input(&mut self, name: &'static str, input: Input) {
        match self.inputs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = input,
            None => self.inputs.push((name, input)),
        }
    }

    /// Text of a literal input, if the slot holds one.
    pub fn literal(&self, name: &str) -> Option<&str> {
        match self.input(name)? {
            Input::Literal(literal) => Some(literal.value.as_str()),
            Input::Block(_) => None,
        }
    }

    /// Target of a block-reference input, if the slot holds one.
    pub fn block_input(&self, name: &str) -> Option<BlockRef> {
        match self.input(name)? {
            Input::Block(target) => Some(*target),
            Input::Literal(_) => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Arena holding every block of one translation. Blocks are only ever
/// appended; links are indices into the arena.
#[derive(Debug, Clone, Default)]
pub struct BlockGraph {
    blocks: Vec<Block>,
}

impl BlockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn push(&mut self, block: Block) -> BlockRef {
        self.blocks.push(block);
        BlockRef(self.blocks.len() - 1)
    }

    pub fn get(&self, block: BlockRef) -> &Block {
        &self.blocks[block.0]
    }

    pub fn get_mut(&mut self, block: BlockRef) -> &mut Block {
        &mut self.blocks[block.0]
    }

    pub fn id_of(&self, block: BlockRef) -> &str {
        &self.blocks[block.0].id
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockRef, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (BlockRef(index), block))
    }

    pub fn top_level(&self) -> impl Iterator<Item = (BlockRef, &Block)> {
        self.iter().filter(|(_, block)| block.top_level)
    }

    pub fn with_opcode(&self, opcode: Opcode) -> impl Iterator<Item = (BlockRef, &Block)> {
        self.iter().filter(move |(_, block)| block.opcode == opcode)
    }

    pub fn uses_category(&self, category: Category) -> bool {
        self.blocks
            .iter()
            .any(|block| block.opcode.category() == category)
    }

    /// The block map alone, keyed by id.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(crate::codegen::blocks_to_json(self))
    }

    /// Checks the structural invariants of the graph and describes every
    /// violation found. An empty result means the graph is well formed.
    ///
    /// A hat is the container of the chain below it. Blocks chained after a
    /// top-level block that is not a hat share its missing parent.
    pub fn check_links(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen_ids: HashMap<&str, usize> = HashMap::new();
        let mut headless_followers = HashSet::new();
        for (_, block) in self.iter() {
            if block.parent.is_none() && !block.opcode.is_hat() {
                if let Some(next) = block.next {
                    headless_followers.insert(next);
                }
            }
        }
        for (block_ref, block) in self.iter() {
            if let Some(previous) = seen_ids.insert(block.id.as_str(), block_ref.0) {
                problems.push(format!(
                    "Blocks #{} and #{} share id '{}'.",
                    previous, block_ref.0, block.id
                ));
            }
            for link in [block.parent, block.next].into_iter().flatten() {
                if link.0 >= self.blocks.len() {
                    problems.push(format!("Block '{}' links to missing #{}.", block.id, link.0));
                }
            }
            if block.top_level && block.parent.is_some() {
                problems.push(format!("Top-level block '{}' has a parent.", block.id));
            }
            if !block.top_level && block.parent.is_none() && !headless_followers.contains(&block_ref) {
                problems.push(format!("Block '{}' is detached.", block.id));
            }
            for (name, input) in &block.inputs {
                let Input::Block(target) = input else {
                    continue;
                };
                match self.blocks.get(target.0) {
                    None => problems.push(format!(
                        "Input {} of '{}' links to missing #{}.",
                        name, block.id, target.0
                    )),
                    Some(child) if child.parent != Some(block_ref) => problems.push(format!(
                        "Input {} of '{}' holds '{}' whose parent is not the owner.",
                        name, block.id, child.id
                    )),
                    Some(_) => {}
                }
            }
            if let Some(next) = block.next {
                if let Some(follower) = self.blocks.get(next.0) {
                    let expected = if block.opcode.is_hat() {
                        Some(block_ref)
                    } else {
                        block.parent
                    };
                    if follower.parent != expected {
                        problems.push(format!(
                            "Block '{}' follows '{}' but does not share its container.",
                            follower.id, block.id
                        ));
                    }
                }
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_input_replaces_existing_slot() {
        let mut block = Block::new("a".into(), Opcode::If);
        block.set_input("SUBSTACK", Input::Block(BlockRef(3)));
        block.set_input("SUBSTACK", Input::Block(BlockRef(4)));
        assert_eq!(block.inputs.len(), 1);
        assert_eq!(block.block_input("SUBSTACK"), Some(BlockRef(4)));
        assert_eq!(block.literal("SUBSTACK"), None);
    }

    #[test]
    fn follower_of_top_level_non_hat_has_no_parent() {
        let mut graph = BlockGraph::new();
        let mut head = Block::new("a".into(), Opcode::Forever);
        head.top_level = true;
        let head = graph.push(head);
        let mut follower = Block::new("b".into(), Opcode::Show);
        follower.parent = Some(head);
        let follower = graph.push(follower);
        graph.get_mut(head).next = Some(follower);
        assert!(graph
            .check_links()
            .iter()
            .any(|p| p.contains("does not share its container")));

        graph.get_mut(follower).parent = None;
        assert!(graph.check_links().is_empty());
    }

    #[test]
    fn check_links_reports_detached_and_duplicate_blocks() {
        let mut graph = BlockGraph::new();
        graph.push(Block::new("x".into(), Opcode::Show));
        graph.push(Block::new("x".into(), Opcode::Hide));
        let problems = graph.check_links();
        assert!(problems.iter().any(|p| p.contains("share id")));
        assert!(problems.iter().any(|p| p.contains("detached")));
    }
}
