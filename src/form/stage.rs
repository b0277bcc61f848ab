use serde::{Deserialize, Serialize};

/// Value reported when no stage option is checked.
pub const NO_STAGE: i32 = -1;

/// AJCC pathologic stage, numbered the way the prediction model was trained.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    I,
    IA,
    IB,
    II,
    IIA,
    IIB,
    III,
    IIIA,
    IIIB,
    IIIC,
    IV,
    X,
}

impl Stage {
    pub const ALL: [Stage; 12] = [
        Stage::I,
        Stage::IA,
        Stage::IB,
        Stage::II,
        Stage::IIA,
        Stage::IIB,
        Stage::III,
        Stage::IIIA,
        Stage::IIIB,
        Stage::IIIC,
        Stage::IV,
        Stage::X,
    ];

    pub fn select_stage(code: i32) -> Result<Self, String> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| format!("Invalid stage selected: {}", code))
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::I => "Stage I",
            Stage::IA => "Stage IA",
            Stage::IB => "Stage IB",
            Stage::II => "Stage II",
            Stage::IIA => "Stage IIA",
            Stage::IIB => "Stage IIB",
            Stage::III => "Stage III",
            Stage::IIIA => "Stage IIIA",
            Stage::IIIB => "Stage IIIB",
            Stage::IIIC => "Stage IIIC",
            Stage::IV => "Stage IV",
            Stage::X => "Stage X",
        }
    }
}

/// Label for a numeric stage, or "Unknown Stage" outside the table.
pub fn stage_label(code: i32) -> &'static str {
    Stage::select_stage(code)
        .map(Stage::label)
        .unwrap_or("Unknown Stage")
}

/// One radio button of the `uiStage` group, as the UI reports it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StageOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub checked: bool,
}

impl StageOption {
    pub fn new(stage: Stage) -> Self {
        Self {
            value: stage.code().to_string(),
            label: stage.label().to_string(),
            checked: false,
        }
    }
}

/// The radio group offered by the form: every stage, none checked.
pub fn standard_stage_options() -> Vec<StageOption> {
    Stage::ALL.iter().copied().map(StageOption::new).collect()
}

/// Integer value of the checked option, or [`NO_STAGE`].
///
/// Every option is scanned; a checked option whose value is not an integer
/// does not count as a selection.
pub fn read_selected_stage(group: &[StageOption]) -> i32 {
    group
        .iter()
        .filter(|option| option.checked)
        .find_map(|option| option.value.trim().parse::<i32>().ok())
        .unwrap_or(NO_STAGE)
}
