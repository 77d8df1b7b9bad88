use crate::ast::BlockDescriptor;
use crate::catalog::catalog;
use log::trace;

/// Lines that carry structure rather than a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Close,
    Else,
}

const CLOSE_MARKERS: &[&str] = &["end", "fin"];
const ELSE_MARKERS: &[&str] = &["else", "sino", "si no"];

pub fn structural_marker(line: &str) -> Option<Marker> {
    let lowered = line.trim().to_lowercase();
    if CLOSE_MARKERS.contains(&lowered.as_str()) {
        Some(Marker::Close)
    } else if ELSE_MARKERS.contains(&lowered.as_str()) {
        Some(Marker::Else)
    } else {
        None
    }
}

/// Classifies one line against the catalog. Blank lines and structural
/// markers never match; everything else matches the first rule that accepts
/// it, or nothing.
pub fn classify_line(line: &str) -> Option<BlockDescriptor> {
    let line = line.trim();
    if line.is_empty() || structural_marker(line).is_some() {
        return None;
    }
    let lowered = line.to_lowercase();
    catalog().iter().find_map(|rule| {
        let matched = rule.apply(line, &lowered)?;
        trace!("'{}' matched rule '{}' -> {}", line, rule.name, matched.opcode);
        Some(matched)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FieldValue, LiteralKind};
    use crate::opcode::Opcode;
    use rstest::rstest;

    fn opcode_of(line: &str) -> Option<Opcode> {
        classify_line(line).map(|d| d.opcode)
    }

    #[rstest]
    #[case("when green flag clicked", Opcode::WhenFlagClicked)]
    #[case("al presionar bandera verde", Opcode::WhenFlagClicked)]
    #[case("when [space v] key pressed", Opcode::WhenKeyPressed)]
    #[case("al presionar tecla [a v]", Opcode::WhenKeyPressed)]
    #[case("when this sprite clicked", Opcode::WhenThisSpriteClicked)]
    #[case("cuando se haga clic en este objeto", Opcode::WhenThisSpriteClicked)]
    #[case("when I receive [start v]", Opcode::WhenBroadcastReceived)]
    #[case("al recibir [inicio v]", Opcode::WhenBroadcastReceived)]
    #[case("broadcast [go v]", Opcode::Broadcast)]
    #[case("broadcast [go v] and wait", Opcode::BroadcastAndWait)]
    #[case("enviar [go v] y esperar", Opcode::BroadcastAndWait)]
    #[case("when I start as a clone", Opcode::StartAsClone)]
    #[case("wait (1) seconds", Opcode::Wait)]
    #[case("esperar (0.5) segundos", Opcode::Wait)]
    #[case("repeat (10)", Opcode::Repeat)]
    #[case("repetir (3)", Opcode::Repeat)]
    #[case("repeat until <mouse down?>", Opcode::RepeatUntil)]
    #[case("repetir hasta que <mouse down?>", Opcode::RepeatUntil)]
    #[case("forever", Opcode::Forever)]
    #[case("por siempre", Opcode::Forever)]
    #[case("if <mouse down?> then", Opcode::If)]
    #[case("si <mouse down?> entonces", Opcode::If)]
    #[case("stop [all v]", Opcode::Stop)]
    #[case("create clone of [myself v]", Opcode::CreateCloneOf)]
    #[case("delete this clone", Opcode::DeleteThisClone)]
    #[case("move (10) steps", Opcode::MoveSteps)]
    #[case("mover (10) pasos", Opcode::MoveSteps)]
    #[case("turn right (15) degrees", Opcode::TurnRight)]
    #[case("turn ↻ (15) degrees", Opcode::TurnRight)]
    #[case("turn (15) degrees", Opcode::TurnRight)]
    #[case("turn left (15) degrees", Opcode::TurnLeft)]
    #[case("turn ccw (15) degrees", Opcode::TurnLeft)]
    #[case("girar ↺ (15) grados", Opcode::TurnLeft)]
    #[case("girar a la izquierda (15) grados", Opcode::TurnLeft)]
    #[case("go to x: (0) y: (0)", Opcode::GoToXY)]
    #[case("ir a x: (10) y: (20)", Opcode::GoToXY)]
    #[case("go to [random position v]", Opcode::GoTo)]
    #[case("glide (1) secs to x: (0) y: (0)", Opcode::GlideSecsToXY)]
    #[case("point in direction (90)", Opcode::PointInDirection)]
    #[case("apuntar en dirección (90)", Opcode::PointInDirection)]
    #[case("point towards [mouse-pointer v]", Opcode::PointTowards)]
    #[case("set x to (0)", Opcode::SetX)]
    #[case("set y to (0)", Opcode::SetY)]
    #[case("change x by (10)", Opcode::ChangeXBy)]
    #[case("change y by (10)", Opcode::ChangeYBy)]
    #[case("if on edge, bounce", Opcode::IfOnEdgeBounce)]
    #[case("rebotar si toca un borde", Opcode::IfOnEdgeBounce)]
    #[case("say [Hello!] for (2) seconds", Opcode::SayForSecs)]
    #[case("decir [Hola] durante (2) segundos", Opcode::SayForSecs)]
    #[case("say [Hello!]", Opcode::Say)]
    #[case("say (answer)", Opcode::Say)]
    #[case("think [Hmm...] for (2) secs", Opcode::ThinkForSecs)]
    #[case("think [Hmm...]", Opcode::Think)]
    #[case("say [I will repeat (3) times]", Opcode::Say)]
    #[case("say [wait (2) secs please]", Opcode::Say)]
    #[case("think [move (10) steps]", Opcode::Think)]
    #[case("say [Thanks for (playing)]", Opcode::Say)]
    #[case("think [I waited for (ages)]", Opcode::Think)]
    #[case("show", Opcode::Show)]
    #[case("ocultar", Opcode::Hide)]
    #[case("switch costume to [costume2 v]", Opcode::SwitchCostumeTo)]
    #[case("next costume", Opcode::NextCostume)]
    #[case("switch backdrop to [blue sky v]", Opcode::SwitchBackdropTo)]
    #[case("change size by (10)", Opcode::ChangeSizeBy)]
    #[case("set size to (100) %", Opcode::SetSizeTo)]
    #[case("go to [front v] layer", Opcode::GoToFrontBack)]
    #[case("play sound [Meow v] until done", Opcode::PlayUntilDone)]
    #[case("start sound [Meow v]", Opcode::StartSound)]
    #[case("stop all sounds", Opcode::StopAllSounds)]
    #[case("change volume by (-10)", Opcode::ChangeVolumeBy)]
    #[case("set volume to (100) %", Opcode::SetVolumeTo)]
    #[case("ask [What's your name?] and wait", Opcode::AskAndWait)]
    #[case("reset timer", Opcode::ResetTimer)]
    #[case("reiniciar cronómetro", Opcode::ResetTimer)]
    #[case("set [score v] to (0)", Opcode::SetVariableTo)]
    #[case("establecer [puntos v] a (0)", Opcode::SetVariableTo)]
    #[case("change [score v] by (1)", Opcode::ChangeVariableBy)]
    #[case("show variable [score v]", Opcode::ShowVariable)]
    #[case("hide variable [score v]", Opcode::HideVariable)]
    #[case("add [thing] to [items v]", Opcode::AddToList)]
    #[case("delete (1) of [items v]", Opcode::DeleteOfList)]
    #[case("delete all of [items v]", Opcode::DeleteAllOfList)]
    #[case("borrar todo de [items v]", Opcode::DeleteAllOfList)]
    #[case("insert [thing] at (1) of [items v]", Opcode::InsertAtList)]
    #[case("replace item (1) of [items v] with [thing]", Opcode::ReplaceItemOfList)]
    #[case("pen down", Opcode::PenDown)]
    #[case("subir lápiz", Opcode::PenUp)]
    #[case("erase all", Opcode::PenClear)]
    #[case("borrar todo", Opcode::PenClear)]
    #[case("stamp", Opcode::PenStamp)]
    #[case("set pen color to [#ff0000]", Opcode::SetPenColorToColor)]
    #[case("change pen size by (1)", Opcode::ChangePenSizeBy)]
    #[case("set pen size to (1)", Opcode::SetPenSizeTo)]
    fn classifies_catalog_forms(#[case] line: &str, #[case] expected: Opcode) {
        assert_eq!(opcode_of(line), Some(expected), "line: {}", line);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("end")]
    #[case("FIN")]
    #[case("else")]
    #[case("si no")]
    #[case("print('hello')")]
    #[case("this is just prose")]
    fn never_matches(#[case] line: &str) {
        assert_eq!(classify_line(line), None);
    }

    #[test]
    fn markers_are_recognized_case_insensitively() {
        assert_eq!(structural_marker(" End "), Some(Marker::Close));
        assert_eq!(structural_marker("Sino"), Some(Marker::Else));
        assert_eq!(structural_marker("end if"), None);
    }

    #[test]
    fn say_prefers_duration_form() {
        let d = classify_line("say [Hi] for (2) secs").unwrap();
        assert_eq!(d.opcode, Opcode::SayForSecs);
        assert_eq!(d.literal("MESSAGE").unwrap().value, "Hi");
        assert_eq!(d.literal("SECS").unwrap().value, "2");
    }

    #[test]
    fn message_keeps_parenthesized_words() {
        let d = classify_line("say [Thanks for (playing)]").unwrap();
        assert_eq!(d.literal("MESSAGE").unwrap().value, "Thanks for (playing)");
        let d = classify_line("say [I will repeat (3) times]").unwrap();
        assert_eq!(d.literal("MESSAGE").unwrap().value, "I will repeat (3) times");
    }

    #[test]
    fn spanish_stop_options_use_vm_names() {
        let d = classify_line("detener [todos v]").unwrap();
        assert_eq!(d.opcode, Opcode::Stop);
        assert_eq!(d.field_value("STOP_OPTION"), Some(&FieldValue::plain("all")));
        let d = classify_line("detener [otros programas del objeto v]").unwrap();
        assert_eq!(
            d.field_value("STOP_OPTION"),
            Some(&FieldValue::plain("other scripts in sprite"))
        );
    }

    #[test]
    fn layer_is_not_motion_goto() {
        let d = classify_line("go to [back v] layer").unwrap();
        assert_eq!(d.field_value("FRONT_BACK"), Some(&FieldValue::plain("back")));
    }

    #[test]
    fn dropdown_markers_are_stripped() {
        let d = classify_line("set [score v] to (0)").unwrap();
        assert_eq!(d.field_value("VARIABLE"), Some(&FieldValue::named("score")));
        assert_eq!(d.literal("VALUE").unwrap().value, "0");

        let d = classify_line("when [Space v] key pressed").unwrap();
        assert_eq!(d.field_value("KEY_OPTION"), Some(&FieldValue::plain("space")));
    }

    #[test]
    fn set_variable_accepts_text_value() {
        let d = classify_line("set [name v] to [Ada]").unwrap();
        assert_eq!(d.literal("VALUE").unwrap().value, "Ada");
        assert_eq!(d.literal("VALUE").unwrap().kind, LiteralKind::Text);
    }

    #[test]
    fn control_headers_carry_condition_text() {
        let d = classify_line("if <touching [edge v]?> then").unwrap();
        assert_eq!(d.condition.as_deref(), Some("<touching [edge v]?>"));
        let d = classify_line("repeat until <key [space v] pressed?>").unwrap();
        assert_eq!(d.condition.as_deref(), Some("<key [space v] pressed?>"));
        let d = classify_line("if").unwrap();
        assert_eq!(d.condition, None);
    }

    #[test]
    fn broadcast_literal_uses_broadcast_tag() {
        let d = classify_line("broadcast [game over v]").unwrap();
        let literal = d.literal("BROADCAST_INPUT").unwrap();
        assert_eq!(literal.kind, LiteralKind::Broadcast);
        assert_eq!(literal.value, "game over");
    }

    #[test]
    fn clone_menu_uses_vm_names() {
        let d = classify_line("create clone of [myself v]").unwrap();
        assert_eq!(d.literal("CLONE_OPTION").unwrap().value, "_myself_");
    }
}
