use crate::opcode::Opcode;

/// Shadow type tags Scratch uses for literal inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    PositiveNumber,
    WholeNumber,
    Integer,
    Angle,
    Color,
    Text,
    Broadcast,
}

impl LiteralKind {
    pub fn code(self) -> u8 {
        match self {
            LiteralKind::Number => 4,
            LiteralKind::PositiveNumber => 5,
            LiteralKind::WholeNumber => 6,
            LiteralKind::Integer => 7,
            LiteralKind::Angle => 8,
            LiteralKind::Color => 9,
            LiteralKind::Text => 10,
            LiteralKind::Broadcast => 11,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub value: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self::new(LiteralKind::Number, value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(LiteralKind::Text, value)
    }
}

/// Dropdown field: display text plus the underlying reference, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub display: String,
    pub value: Option<String>,
}

impl FieldValue {
    pub fn plain(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            value: None,
        }
    }

    /// Field whose underlying value is the display name itself (variables,
    /// lists, broadcasts).
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: Some(name.clone()),
            display: name,
        }
    }
}

/// What the line classifier produces for one recognized line. Identity and
/// links are assigned later by the graph builder.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDescriptor {
    pub opcode: Opcode,
    pub inputs: Vec<(&'static str, Literal)>,
    pub fields: Vec<(&'static str, FieldValue)>,
    /// Raw boolean expression text from a control header, parsed by the
    /// builder into a predicate sub-graph.
    pub condition: Option<String>,
}

impl BlockDescriptor {
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            inputs: Vec::new(),
            fields: Vec::new(),
            condition: None,
        }
    }

    pub fn input(mut self, name: &'static str, literal: Literal) -> Self {
        self.inputs.push((name, literal));
        self
    }

    pub fn field(mut self, name: &'static str, value: FieldValue) -> Self {
        self.fields.push((name, value));
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn literal(&self, name: &str) -> Option<&Literal> {
        self.inputs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, literal)| literal)
    }

    pub fn field_value(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    Equal,
}

/// Parsed boolean expression from a control header. Operands that could not
/// be recognized are kept as `None` so the matching slot stays empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    And(Option<Box<Predicate>>, Option<Box<Predicate>>),
    Or(Option<Box<Predicate>>, Option<Box<Predicate>>),
    Not(Option<Box<Predicate>>),
    Compare {
        op: Comparison,
        left: String,
        right: String,
    },
    TouchingObject(String),
    TouchingColor(String),
    KeyPressed(String),
    MouseDown,
}

impl Predicate {
    pub fn opcode(&self) -> Opcode {
        match self {
            Predicate::And(..) => Opcode::And,
            Predicate::Or(..) => Opcode::Or,
            Predicate::Not(_) => Opcode::Not,
            Predicate::Compare { op, .. } => match op {
                Comparison::Greater => Opcode::GreaterThan,
                Comparison::Less => Opcode::LessThan,
                Comparison::Equal => Opcode::Equals,
            },
            Predicate::TouchingObject(_) => Opcode::TouchingObject,
            Predicate::TouchingColor(_) => Opcode::TouchingColor,
            Predicate::KeyPressed(_) => Opcode::KeyPressed,
            Predicate::MouseDown => Opcode::MouseDown,
        }
    }
}

/// A non-blank line that matched no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: usize,
    pub text: String,
}
