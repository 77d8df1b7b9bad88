use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Event,
    Control,
    Motion,
    Looks,
    Sound,
    Sensing,
    Operator,
    Variable,
    List,
    Pen,
}

macro_rules! opcodes {
    ($($variant:ident => $text:literal, $category:ident;)*) => {
        /// Every block kind the translator can emit.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Opcode {
            $($variant,)*
        }

        impl Opcode {
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $text,)*
                }
            }

            pub fn category(self) -> Category {
                match self {
                    $(Opcode::$variant => Category::$category,)*
                }
            }
        }
    };
}

opcodes! {
    WhenFlagClicked => "event_whenflagclicked", Event;
    WhenKeyPressed => "event_whenkeypressed", Event;
    WhenThisSpriteClicked => "event_whenthisspriteclicked", Event;
    WhenBroadcastReceived => "event_whenbroadcastreceived", Event;
    Broadcast => "event_broadcast", Event;
    BroadcastAndWait => "event_broadcastandwait", Event;

    StartAsClone => "control_start_as_clone", Control;
    Wait => "control_wait", Control;
    Repeat => "control_repeat", Control;
    RepeatUntil => "control_repeat_until", Control;
    Forever => "control_forever", Control;
    If => "control_if", Control;
    IfElse => "control_if_else", Control;
    Stop => "control_stop", Control;
    CreateCloneOf => "control_create_clone_of", Control;
    DeleteThisClone => "control_delete_this_clone", Control;

    MoveSteps => "motion_movesteps", Motion;
    TurnRight => "motion_turnright", Motion;
    TurnLeft => "motion_turnleft", Motion;
    GoToXY => "motion_gotoxy", Motion;
    GoTo => "motion_goto", Motion;
    GlideSecsToXY => "motion_glidesecstoxy", Motion;
    PointInDirection => "motion_pointindirection", Motion;
    PointTowards => "motion_pointtowards", Motion;
    SetX => "motion_setx", Motion;
    SetY => "motion_sety", Motion;
    ChangeXBy => "motion_changexby", Motion;
    ChangeYBy => "motion_changeyby", Motion;
    IfOnEdgeBounce => "motion_ifonedgebounce", Motion;

    SayForSecs => "looks_sayforsecs", Looks;
    Say => "looks_say", Looks;
    ThinkForSecs => "looks_thinkforsecs", Looks;
    Think => "looks_think", Looks;
    Show => "looks_show", Looks;
    Hide => "looks_hide", Looks;
    SwitchCostumeTo => "looks_switchcostumeto", Looks;
    NextCostume => "looks_nextcostume", Looks;
    SwitchBackdropTo => "looks_switchbackdropto", Looks;
    ChangeSizeBy => "looks_changesizeby", Looks;
    SetSizeTo => "looks_setsizeto", Looks;
    GoToFrontBack => "looks_gotofrontback", Looks;

    PlayUntilDone => "sound_playuntildone", Sound;
    StartSound => "sound_play", Sound;
    StopAllSounds => "sound_stopallsounds", Sound;
    ChangeVolumeBy => "sound_changevolumeby", Sound;
    SetVolumeTo => "sound_setvolumeto", Sound;

    AskAndWait => "sensing_askandwait", Sensing;
    ResetTimer => "sensing_resettimer", Sensing;
    TouchingObject => "sensing_touchingobject", Sensing;
    TouchingColor => "sensing_touchingcolor", Sensing;
    KeyPressed => "sensing_keypressed", Sensing;
    MouseDown => "sensing_mousedown", Sensing;

    And => "operator_and", Operator;
    Or => "operator_or", Operator;
    Not => "operator_not", Operator;
    GreaterThan => "operator_gt", Operator;
    LessThan => "operator_lt", Operator;
    Equals => "operator_equals", Operator;

    SetVariableTo => "data_setvariableto", Variable;
    ChangeVariableBy => "data_changevariableby", Variable;
    ShowVariable => "data_showvariable", Variable;
    HideVariable => "data_hidevariable", Variable;

    AddToList => "data_addtolist", List;
    DeleteOfList => "data_deleteoflist", List;
    DeleteAllOfList => "data_deletealloflist", List;
    InsertAtList => "data_insertatlist", List;
    ReplaceItemOfList => "data_replaceitemoflist", List;

    PenDown => "pen_penDown", Pen;
    PenUp => "pen_penUp", Pen;
    PenClear => "pen_clear", Pen;
    PenStamp => "pen_stamp", Pen;
    SetPenColorToColor => "pen_setPenColorToColor", Pen;
    ChangePenSizeBy => "pen_changePenSizeBy", Pen;
    SetPenSizeTo => "pen_setPenSizeTo", Pen;
}

impl Opcode {
    /// Hat blocks start an independent script.
    pub fn is_hat(self) -> bool {
        matches!(
            self,
            Opcode::WhenFlagClicked
                | Opcode::WhenKeyPressed
                | Opcode::WhenThisSpriteClicked
                | Opcode::WhenBroadcastReceived
                | Opcode::StartAsClone
        )
    }

    /// C-shaped blocks that open a nesting frame.
    pub fn opens_frame(self) -> bool {
        matches!(
            self,
            Opcode::Repeat | Opcode::RepeatUntil | Opcode::Forever | Opcode::If | Opcode::IfElse
        )
    }

    pub fn accepts_else(self) -> bool {
        matches!(self, Opcode::If | Opcode::IfElse)
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn opcode_names_are_distinct() {
        let names = Opcode::ALL.iter().map(|op| op.as_str()).collect::<HashSet<_>>();
        assert_eq!(names.len(), Opcode::ALL.len());
    }

    #[test]
    fn hats_never_open_frames() {
        assert!(Opcode::ALL.iter().all(|op| !(op.is_hat() && op.opens_frame())));
        assert_eq!(Opcode::StartAsClone.category(), Category::Control);
        assert!(Opcode::StartAsClone.is_hat());
    }
}
