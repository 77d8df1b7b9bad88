//! Priority-ordered table of statement recognizers.
//!
//! Rules are tried top to bottom and the first match wins, so a specific form
//! ("say [..] for (..) secs") must sit above the generic one it overlaps
//! ("say [..]"). Each rule carries English and Spanish patterns, an optional
//! list of lowercase substrings that veto it, and a constructor that turns the
//! captures into a block descriptor.
//!
//! Every pattern is anchored at the start of the line, so a statement keyword
//! that only appears inside a message never selects a rule.

use crate::ast::{BlockDescriptor, FieldValue, Literal, LiteralKind};
use crate::lexer::strip_dropdown_marker;
use crate::opcode::Opcode;
use log::error;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

type Build = fn(&Captures<'_>, &str) -> BlockDescriptor;

struct RuleSpec {
    name: &'static str,
    patterns: &'static [&'static str],
    unless: &'static [&'static str],
    build: Build,
}

pub struct Rule {
    pub name: &'static str,
    patterns: Vec<Regex>,
    unless: &'static [&'static str],
    build: Build,
}

impl Rule {
    /// Applies the rule to a trimmed line. `lowered` is the same line in
    /// lowercase, used for veto and keyword checks.
    pub fn apply(&self, line: &str, lowered: &str) -> Option<BlockDescriptor> {
        if self.unless.iter().any(|veto| lowered.contains(veto)) {
            return None;
        }
        self.patterns
            .iter()
            .find_map(|re| re.captures(line))
            .map(|caps| (self.build)(&caps, lowered))
    }
}

static CATALOG: Lazy<Vec<Rule>> = Lazy::new(|| {
    rule_specs()
        .into_iter()
        .map(|spec| {
            let patterns = spec
                .patterns
                .iter()
                .filter_map(|src| match Regex::new(&format!("(?i)^(?:{})", src)) {
                    Ok(re) => Some(re),
                    Err(err) => {
                        error!("Catalog rule '{}' has an invalid pattern: {}", spec.name, err);
                        None
                    }
                })
                .collect();
            Rule {
                name: spec.name,
                patterns,
                unless: spec.unless,
                build: spec.build,
            }
        })
        .collect()
});

pub fn catalog() -> &'static [Rule] {
    &CATALOG
}

fn cap(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn menu(caps: &Captures<'_>, index: usize) -> String {
    strip_dropdown_marker(&cap(caps, index))
}

fn num(caps: &Captures<'_>, index: usize) -> Literal {
    Literal::number(cap(caps, index))
}

fn lit(kind: LiteralKind, caps: &Captures<'_>, index: usize) -> Literal {
    Literal::new(kind, cap(caps, index))
}

/// Strips the reporter/text brackets around a free-form operand:
/// `(0)` → `0`, `[hello v]` → `hello`, `7` → `7`.
pub(crate) fn unwrap_operand(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .or_else(|| trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')));
    match inner {
        Some(inner) => strip_dropdown_marker(inner),
        None => trimmed.to_string(),
    }
}

/// Maps key names to the identifiers the Scratch VM expects.
pub(crate) fn normalize_key(raw: &str) -> String {
    let key = strip_dropdown_marker(raw).to_lowercase();
    match key.as_str() {
        "espacio" | "barra espaciadora" => "space".to_string(),
        "flecha izquierda" => "left arrow".to_string(),
        "flecha derecha" => "right arrow".to_string(),
        "flecha arriba" => "up arrow".to_string(),
        "flecha abajo" => "down arrow".to_string(),
        "cualquiera" => "any".to_string(),
        _ => key,
    }
}

fn sprite_menu(raw: String) -> String {
    match raw.to_lowercase().as_str() {
        "random position" | "posición aleatoria" | "posicion aleatoria" => "_random_".to_string(),
        "mouse-pointer" | "mouse pointer" | "puntero del ratón" | "puntero del raton" => {
            "_mouse_".to_string()
        }
        "myself" | "mí mismo" | "mi mismo" => "_myself_".to_string(),
        _ => raw,
    }
}

/// Maps Spanish stop menu entries onto the options the VM understands.
fn stop_option(raw: String) -> String {
    match raw.to_lowercase().as_str() {
        "all" | "todos" | "todo" => "all".to_string(),
        "this script" | "este programa" | "este script" => "this script".to_string(),
        "other scripts in sprite"
        | "otros programas del objeto"
        | "otros programas en el objeto"
        | "otros programas en este objeto"
        | "otros scripts del objeto" => "other scripts in sprite".to_string(),
        "other scripts in stage" | "otros programas del escenario" => {
            "other scripts in stage".to_string()
        }
        _ => raw,
    }
}

fn layer_option(raw: String) -> String {
    match raw.to_lowercase().as_str() {
        "delante" | "adelante" | "frente" | "front" => "front".to_string(),
        "atrás" | "atras" | "detrás" | "detras" | "back" => "back".to_string(),
        other => other.to_string(),
    }
}

fn turn_is_counter_clockwise(lowered: &str) -> bool {
    ["left", "ccw", "↺", "izquierda"]
        .iter()
        .any(|kw| lowered.contains(kw))
}

fn bare(opcode: Opcode) -> BlockDescriptor {
    BlockDescriptor::new(opcode)
}

fn with_condition(opcode: Opcode, raw: String) -> BlockDescriptor {
    let block = BlockDescriptor::new(opcode);
    if raw.is_empty() {
        block
    } else {
        block.with_condition(raw)
    }
}

fn rule_specs() -> Vec<RuleSpec> {
    vec![
        // ============ EVENTS ============
        RuleSpec {
            name: "when this sprite clicked",
            patterns: &[
                r"when this sprite clicked",
                r"al hacer clic en este objeto",
                r"cuando se haga clic en este objeto",
            ],
            unless: &[],
            build: |_, _| bare(Opcode::WhenThisSpriteClicked),
        },
        RuleSpec {
            name: "when green flag clicked",
            patterns: &[
                r"when (?:green )?flag clicked",
                r"al presionar (?:la )?bandera verde",
                r"cuando se haga clic en",
            ],
            unless: &[],
            build: |_, _| bare(Opcode::WhenFlagClicked),
        },
        RuleSpec {
            name: "when key pressed",
            patterns: &[
                r"when \[([^\]]+)\] key pressed",
                r"al presionar (?:la )?tecla \[([^\]]+)\]",
                r"cuando se presione (?:la )?tecla \[([^\]]+)\]",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::WhenKeyPressed)
                    .field("KEY_OPTION", FieldValue::plain(normalize_key(&cap(c, 1))))
            },
        },
        RuleSpec {
            name: "when I receive",
            patterns: &[r"when i receive \[([^\]]+)\]", r"al recibir \[([^\]]+)\]"],
            unless: &[],
            build: |c, _| {
                bare(Opcode::WhenBroadcastReceived)
                    .field("BROADCAST_OPTION", FieldValue::named(menu(c, 1)))
            },
        },
        RuleSpec {
            name: "when I start as a clone",
            patterns: &[r"when i start as a clone", r"al comenzar como clon"],
            unless: &[],
            build: |_, _| bare(Opcode::StartAsClone),
        },
        RuleSpec {
            name: "broadcast and wait",
            patterns: &[
                r"broadcast \[([^\]]+)\] and wait",
                r"enviar \[([^\]]+)\] y esperar",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::BroadcastAndWait).input(
                    "BROADCAST_INPUT",
                    Literal::new(LiteralKind::Broadcast, menu(c, 1)),
                )
            },
        },
        RuleSpec {
            name: "broadcast",
            patterns: &[r"broadcast \[([^\]]+)\]", r"enviar \[([^\]]+)\]"],
            unless: &[],
            build: |c, _| {
                bare(Opcode::Broadcast).input(
                    "BROADCAST_INPUT",
                    Literal::new(LiteralKind::Broadcast, menu(c, 1)),
                )
            },
        },
        // ============ CONTROL ============
        RuleSpec {
            name: "wait",
            patterns: &[
                r"wait \((.+?)\) (?:secs?|seconds?)",
                r"esperar \((.+?)\) segundos?",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::Wait).input("DURATION", lit(LiteralKind::PositiveNumber, c, 1))
            },
        },
        RuleSpec {
            name: "repeat until",
            patterns: &[r"repeat until\s*(.*)$", r"repetir hasta que\s*(.*)$"],
            unless: &[],
            build: |c, _| with_condition(Opcode::RepeatUntil, cap(c, 1)),
        },
        RuleSpec {
            name: "repeat",
            patterns: &[r"repeat \((.+?)\)", r"repetir \((.+?)\)"],
            unless: &["until", "hasta que"],
            build: |c, _| bare(Opcode::Repeat).input("TIMES", lit(LiteralKind::WholeNumber, c, 1)),
        },
        RuleSpec {
            name: "forever",
            patterns: &[r"forever\b", r"por siempre\b", r"repetir por siempre\b"],
            unless: &[],
            build: |_, _| bare(Opcode::Forever),
        },
        // Must precede the generic `if` header, which would swallow it.
        RuleSpec {
            name: "if on edge, bounce",
            patterns: &[
                r"if on edge,? bounce",
                r"rebotar si (?:está |esta )?toca(?:ndo)? (?:un |el )?borde",
            ],
            unless: &[],
            build: |_, _| bare(Opcode::IfOnEdgeBounce),
        },
        RuleSpec {
            name: "if",
            patterns: &[r"if\b\s*(.*?)\s*(?:then)?$", r"si\b\s*(.*?)\s*(?:entonces)?$"],
            unless: &[],
            build: |c, _| with_condition(Opcode::If, cap(c, 1)),
        },
        RuleSpec {
            name: "stop all sounds",
            patterns: &[r"stop all sounds", r"detener todos los sonidos"],
            unless: &[],
            build: |_, _| bare(Opcode::StopAllSounds),
        },
        RuleSpec {
            name: "stop",
            patterns: &[r"stop \[([^\]]+)\]", r"detener \[([^\]]+)\]"],
            unless: &[],
            build: |c, _| {
                bare(Opcode::Stop).field("STOP_OPTION", FieldValue::plain(stop_option(menu(c, 1))))
            },
        },
        RuleSpec {
            name: "create clone of",
            patterns: &[r"create clone of \[([^\]]+)\]", r"crear clon de \[([^\]]+)\]"],
            unless: &[],
            build: |c, _| {
                bare(Opcode::CreateCloneOf)
                    .input("CLONE_OPTION", Literal::text(sprite_menu(menu(c, 1))))
            },
        },
        RuleSpec {
            name: "delete this clone",
            patterns: &[r"delete this clone", r"borrar este clon", r"eliminar este clon"],
            unless: &[],
            build: |_, _| bare(Opcode::DeleteThisClone),
        },
        // ============ MOTION ============
        RuleSpec {
            name: "move",
            patterns: &[r"move \((.+?)\) steps?", r"mover \((.+?)\) pasos?"],
            unless: &[],
            build: |c, _| bare(Opcode::MoveSteps).input("STEPS", num(c, 1)),
        },
        RuleSpec {
            name: "turn",
            patterns: &[
                r"turn\s*(?:right|left|cw|ccw|↻|↺)?\s*\((.+?)\)\s*degrees?",
                r"girar\s*(?:↻|↺|a la derecha|a la izquierda|derecha|izquierda)?\s*\((.+?)\)\s*grados?",
            ],
            unless: &[],
            build: |c, lowered| {
                let opcode = if turn_is_counter_clockwise(lowered) {
                    Opcode::TurnLeft
                } else {
                    Opcode::TurnRight
                };
                bare(opcode).input("DEGREES", num(c, 1))
            },
        },
        RuleSpec {
            name: "go to layer",
            patterns: &[r"go to \[([^\]]+)\] layer", r"ir a (?:la )?capa \[([^\]]+)\]"],
            unless: &[],
            build: |c, _| {
                bare(Opcode::GoToFrontBack)
                    .field("FRONT_BACK", FieldValue::plain(layer_option(menu(c, 1))))
            },
        },
        RuleSpec {
            name: "glide to xy",
            patterns: &[
                r"glide \((.+?)\) secs? to x:\s*\((.+?)\)\s*y:\s*\((.+?)\)",
                r"deslizar en \((.+?)\) segundos? a x:\s*\((.+?)\)\s*y:\s*\((.+?)\)",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::GlideSecsToXY)
                    .input("SECS", num(c, 1))
                    .input("X", num(c, 2))
                    .input("Y", num(c, 3))
            },
        },
        RuleSpec {
            name: "go to xy",
            patterns: &[
                r"go to x:\s*\((.+?)\)\s*y:\s*\((.+?)\)",
                r"ir a x:\s*\((.+?)\)\s*y:\s*\((.+?)\)",
            ],
            unless: &[],
            build: |c, _| bare(Opcode::GoToXY).input("X", num(c, 1)).input("Y", num(c, 2)),
        },
        RuleSpec {
            name: "go to",
            patterns: &[r"go to \[([^\]]+)\]", r"ir a \[([^\]]+)\]"],
            unless: &["x:"],
            build: |c, _| bare(Opcode::GoTo).input("TO", Literal::text(sprite_menu(menu(c, 1)))),
        },
        RuleSpec {
            name: "point in direction",
            patterns: &[
                r"point in direction \((.+?)\)",
                r"apuntar en direcci[oó]n \((.+?)\)",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::PointInDirection).input("DIRECTION", lit(LiteralKind::Angle, c, 1))
            },
        },
        RuleSpec {
            name: "point towards",
            patterns: &[r"point towards \[([^\]]+)\]", r"apuntar hacia \[([^\]]+)\]"],
            unless: &[],
            build: |c, _| {
                bare(Opcode::PointTowards)
                    .input("TOWARDS", Literal::text(sprite_menu(menu(c, 1))))
            },
        },
        RuleSpec {
            name: "set x",
            patterns: &[r"set x to \((.+?)\)", r"fijar x a \((.+?)\)"],
            unless: &[],
            build: |c, _| bare(Opcode::SetX).input("X", num(c, 1)),
        },
        RuleSpec {
            name: "set y",
            patterns: &[r"set y to \((.+?)\)", r"fijar y a \((.+?)\)"],
            unless: &[],
            build: |c, _| bare(Opcode::SetY).input("Y", num(c, 1)),
        },
        RuleSpec {
            name: "change x",
            patterns: &[r"change x by \((.+?)\)", r"cambiar x en \((.+?)\)"],
            unless: &[],
            build: |c, _| bare(Opcode::ChangeXBy).input("DX", num(c, 1)),
        },
        RuleSpec {
            name: "change y",
            patterns: &[r"change y by \((.+?)\)", r"cambiar y en \((.+?)\)"],
            unless: &[],
            build: |c, _| bare(Opcode::ChangeYBy).input("DY", num(c, 1)),
        },
        // ============ LOOKS ============
        RuleSpec {
            name: "say for secs",
            patterns: &[
                r"say [\[(](.+?)[\])] for \((.+?)\) (?:secs?|seconds?)",
                r"decir [\[(](.+?)[\])] (?:durante|por) \((.+?)\) segundos?",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::SayForSecs)
                    .input("MESSAGE", lit(LiteralKind::Text, c, 1))
                    .input("SECS", num(c, 2))
            },
        },
        RuleSpec {
            name: "say",
            patterns: &[r"say [\[(](.+)[\])]", r"decir [\[(](.+)[\])]"],
            unless: &[],
            build: |c, _| bare(Opcode::Say).input("MESSAGE", lit(LiteralKind::Text, c, 1)),
        },
        RuleSpec {
            name: "think for secs",
            patterns: &[
                r"think [\[(](.+?)[\])] for \((.+?)\) (?:secs?|seconds?)",
                r"pensar [\[(](.+?)[\])] (?:durante|por) \((.+?)\) segundos?",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::ThinkForSecs)
                    .input("MESSAGE", lit(LiteralKind::Text, c, 1))
                    .input("SECS", num(c, 2))
            },
        },
        RuleSpec {
            name: "think",
            patterns: &[r"think [\[(](.+)[\])]", r"pensar [\[(](.+)[\])]"],
            unless: &[],
            build: |c, _| bare(Opcode::Think).input("MESSAGE", lit(LiteralKind::Text, c, 1)),
        },
        RuleSpec {
            name: "show",
            patterns: &[r"show$", r"mostrar$"],
            unless: &[],
            build: |_, _| bare(Opcode::Show),
        },
        RuleSpec {
            name: "hide",
            patterns: &[r"hide$", r"esconder$", r"ocultar$"],
            unless: &[],
            build: |_, _| bare(Opcode::Hide),
        },
        RuleSpec {
            name: "switch costume",
            patterns: &[
                r"switch costume to \[([^\]]+)\]",
                r"cambiar (?:el )?disfraz a \[([^\]]+)\]",
            ],
            unless: &[],
            build: |c, _| bare(Opcode::SwitchCostumeTo).input("COSTUME", Literal::text(menu(c, 1))),
        },
        RuleSpec {
            name: "next costume",
            patterns: &[r"next costume", r"siguiente disfraz"],
            unless: &[],
            build: |_, _| bare(Opcode::NextCostume),
        },
        RuleSpec {
            name: "switch backdrop",
            patterns: &[
                r"switch backdrop to \[([^\]]+)\]",
                r"cambiar (?:el )?fondo a \[([^\]]+)\]",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::SwitchBackdropTo).input("BACKDROP", Literal::text(menu(c, 1)))
            },
        },
        RuleSpec {
            name: "change size",
            patterns: &[r"change size by \((.+?)\)", r"cambiar (?:el )?tamaño en \((.+?)\)"],
            unless: &[],
            build: |c, _| bare(Opcode::ChangeSizeBy).input("CHANGE", num(c, 1)),
        },
        RuleSpec {
            name: "set size",
            patterns: &[r"set size to \((.+?)\)", r"fijar (?:el )?tamaño a \((.+?)\)"],
            unless: &[],
            build: |c, _| bare(Opcode::SetSizeTo).input("SIZE", num(c, 1)),
        },
        // ============ SOUND ============
        RuleSpec {
            name: "play sound until done",
            patterns: &[
                r"play sound \[([^\]]+)\] until done",
                r"tocar sonido \[([^\]]+)\] hasta que termine",
            ],
            unless: &[],
            build: |c, _| bare(Opcode::PlayUntilDone).input("SOUND_MENU", Literal::text(menu(c, 1))),
        },
        RuleSpec {
            name: "start sound",
            patterns: &[
                r"start sound \[([^\]]+)\]",
                r"play sound \[([^\]]+)\]",
                r"iniciar sonido \[([^\]]+)\]",
                r"tocar sonido \[([^\]]+)\]",
            ],
            unless: &[],
            build: |c, _| bare(Opcode::StartSound).input("SOUND_MENU", Literal::text(menu(c, 1))),
        },
        RuleSpec {
            name: "change volume",
            patterns: &[r"change volume by \((.+?)\)", r"cambiar (?:el )?volumen en \((.+?)\)"],
            unless: &[],
            build: |c, _| bare(Opcode::ChangeVolumeBy).input("VOLUME", num(c, 1)),
        },
        RuleSpec {
            name: "set volume",
            patterns: &[r"set volume to \((.+?)\)", r"fijar (?:el )?volumen a \((.+?)\)"],
            unless: &[],
            build: |c, _| bare(Opcode::SetVolumeTo).input("VOLUME", num(c, 1)),
        },
        // ============ SENSING ============
        RuleSpec {
            name: "ask and wait",
            patterns: &[
                r"ask [\[(](.+?)[\])] and wait",
                r"preguntar [\[(](.+?)[\])] y esperar",
            ],
            unless: &[],
            build: |c, _| bare(Opcode::AskAndWait).input("QUESTION", lit(LiteralKind::Text, c, 1)),
        },
        RuleSpec {
            name: "reset timer",
            patterns: &[
                r"reset timer",
                r"reiniciar (?:el )?cronómetro",
                r"reiniciar (?:el )?cronometro",
                r"reiniciar (?:el )?temporizador",
            ],
            unless: &[],
            build: |_, _| bare(Opcode::ResetTimer),
        },
        // ============ VARIABLES ============
        RuleSpec {
            name: "set variable",
            patterns: &[
                r"set \[([^\]]+)\] to (.+)$",
                r"(?:establecer|fijar) \[([^\]]+)\] a (.+)$",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::SetVariableTo)
                    .input("VALUE", Literal::text(unwrap_operand(&cap(c, 2))))
                    .field("VARIABLE", FieldValue::named(menu(c, 1)))
            },
        },
        RuleSpec {
            name: "change variable",
            patterns: &[
                r"change \[([^\]]+)\] by \((.+?)\)",
                r"cambiar \[([^\]]+)\] (?:en|por) \((.+?)\)",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::ChangeVariableBy)
                    .input("VALUE", num(c, 2))
                    .field("VARIABLE", FieldValue::named(menu(c, 1)))
            },
        },
        RuleSpec {
            name: "show variable",
            patterns: &[r"show variable \[([^\]]+)\]", r"mostrar variable \[([^\]]+)\]"],
            unless: &[],
            build: |c, _| {
                bare(Opcode::ShowVariable).field("VARIABLE", FieldValue::named(menu(c, 1)))
            },
        },
        RuleSpec {
            name: "hide variable",
            patterns: &[
                r"hide variable \[([^\]]+)\]",
                r"(?:esconder|ocultar) variable \[([^\]]+)\]",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::HideVariable).field("VARIABLE", FieldValue::named(menu(c, 1)))
            },
        },
        // ============ LISTS ============
        RuleSpec {
            name: "add to list",
            patterns: &[
                r"add [\[(](.+?)[\])] to \[([^\]]+)\]",
                r"añadir [\[(](.+?)[\])] a \[([^\]]+)\]",
                r"agregar [\[(](.+?)[\])] a \[([^\]]+)\]",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::AddToList)
                    .input("ITEM", lit(LiteralKind::Text, c, 1))
                    .field("LIST", FieldValue::named(menu(c, 2)))
            },
        },
        RuleSpec {
            name: "delete all of list",
            patterns: &[r"delete all of \[([^\]]+)\]", r"borrar todo de \[([^\]]+)\]"],
            unless: &[],
            build: |c, _| {
                bare(Opcode::DeleteAllOfList).field("LIST", FieldValue::named(menu(c, 1)))
            },
        },
        RuleSpec {
            name: "delete of list",
            patterns: &[
                r"delete (?:item )?\((.+?)\) of \[([^\]]+)\]",
                r"borrar (?:elemento )?\((.+?)\) de \[([^\]]+)\]",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::DeleteOfList)
                    .input("INDEX", lit(LiteralKind::Integer, c, 1))
                    .field("LIST", FieldValue::named(menu(c, 2)))
            },
        },
        RuleSpec {
            name: "insert at list",
            patterns: &[
                r"insert [\[(](.+?)[\])] at \((.+?)\) of \[([^\]]+)\]",
                r"insertar [\[(](.+?)[\])] en \((.+?)\) de \[([^\]]+)\]",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::InsertAtList)
                    .input("ITEM", lit(LiteralKind::Text, c, 1))
                    .input("INDEX", lit(LiteralKind::Integer, c, 2))
                    .field("LIST", FieldValue::named(menu(c, 3)))
            },
        },
        RuleSpec {
            name: "replace item of list",
            patterns: &[
                r"replace item \((.+?)\) of \[([^\]]+)\] with [\[(](.+?)[\])]",
                r"reemplazar elemento \((.+?)\) de \[([^\]]+)\] (?:por|con) [\[(](.+?)[\])]",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::ReplaceItemOfList)
                    .input("INDEX", lit(LiteralKind::Integer, c, 1))
                    .input("ITEM", lit(LiteralKind::Text, c, 3))
                    .field("LIST", FieldValue::named(menu(c, 2)))
            },
        },
        // ============ PEN ============
        RuleSpec {
            name: "pen down",
            patterns: &[r"pen down$", r"bajar l[aá]piz$"],
            unless: &[],
            build: |_, _| bare(Opcode::PenDown),
        },
        RuleSpec {
            name: "pen up",
            patterns: &[r"pen up$", r"subir l[aá]piz$"],
            unless: &[],
            build: |_, _| bare(Opcode::PenUp),
        },
        RuleSpec {
            name: "erase all",
            patterns: &[r"erase all$", r"clear$", r"borrar todo$"],
            unless: &[],
            build: |_, _| bare(Opcode::PenClear),
        },
        RuleSpec {
            name: "stamp",
            patterns: &[r"stamp$", r"sellar$"],
            unless: &[],
            build: |_, _| bare(Opcode::PenStamp),
        },
        RuleSpec {
            name: "set pen color",
            patterns: &[
                r"set pen colou?r to \[(.+?)\]",
                r"fijar (?:el )?color de(?:l)? l[aá]piz a \[(.+?)\]",
            ],
            unless: &[],
            build: |c, _| {
                bare(Opcode::SetPenColorToColor).input("COLOR", lit(LiteralKind::Color, c, 1))
            },
        },
        RuleSpec {
            name: "change pen size",
            patterns: &[
                r"change pen size by \((.+?)\)",
                r"cambiar (?:el )?tamaño de(?:l)? l[aá]piz en \((.+?)\)",
            ],
            unless: &[],
            build: |c, _| bare(Opcode::ChangePenSizeBy).input("SIZE", num(c, 1)),
        },
        RuleSpec {
            name: "set pen size",
            patterns: &[
                r"set pen size to \((.+?)\)",
                r"fijar (?:el )?tamaño de(?:l)? l[aá]piz a \((.+?)\)",
            ],
            unless: &[],
            build: |c, _| bare(Opcode::SetPenSizeTo).input("SIZE", num(c, 1)),
        },
    ]
}
