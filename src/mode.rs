use serde::{Deserialize, Serialize};

/// Where the sections are being rendered.
///
/// `Generator` is the static export build: no drag-and-drop, and a hidden
/// section only offers to enable itself. `Editor` is the interactive app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Generator,
    #[default]
    Editor,
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildMode::Generator => write!(f, "generator"),
            BuildMode::Editor => write!(f, "editor"),
        }
    }
}

impl std::str::FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generator" => Ok(BuildMode::Generator),
            "editor" => Ok(BuildMode::Editor),
            _ => Err(format!("unknown build mode: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Mobile,
    #[default]
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub drag_and_drop: bool,
    pub fixed_grid: bool,
}

impl Capabilities {
    pub fn resolve(mode: BuildMode, viewport: Viewport) -> Self {
        Self {
            drag_and_drop: mode == BuildMode::Editor && viewport == Viewport::Desktop,
            fixed_grid: mode == BuildMode::Generator,
        }
    }
}
