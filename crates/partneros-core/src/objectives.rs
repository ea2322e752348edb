use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ConfigError, CoreError};

/// The kind of partnership goal an objective expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveType {
    Integrations,
    CoSell,
    CoMarket,
    Marketplace,
    Geography,
    Vertical,
}

impl ObjectiveType {
    pub const ALL: [ObjectiveType; 6] = [
        ObjectiveType::Integrations,
        ObjectiveType::CoSell,
        ObjectiveType::CoMarket,
        ObjectiveType::Marketplace,
        ObjectiveType::Geography,
        ObjectiveType::Vertical,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectiveType::Integrations => "integrations",
            ObjectiveType::CoSell => "co_sell",
            ObjectiveType::CoMarket => "co_market",
            ObjectiveType::Marketplace => "marketplace",
            ObjectiveType::Geography => "geography",
            ObjectiveType::Vertical => "vertical",
        }
    }

    /// Human-readable label used in prompts and user-facing text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ObjectiveType::Integrations => "Integrations",
            ObjectiveType::CoSell => "Co-Sell",
            ObjectiveType::CoMarket => "Co-Marketing",
            ObjectiveType::Marketplace => "Marketplace",
            ObjectiveType::Geography => "Geography",
            ObjectiveType::Vertical => "Vertical",
        }
    }
}

impl std::fmt::Display for ObjectiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectiveType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectiveType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownObjectiveType(s.to_string()))
    }
}

/// A user's partnership goal. Priority 1 is highest, 3 is lowest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: Uuid,
    pub user_id: Uuid,
    pub objective_type: ObjectiveType,
    pub detail: Option<String>,
    pub priority: i16,
}

impl Objective {
    #[must_use]
    pub fn priority_label(&self) -> &'static str {
        match self.priority {
            1 => "highest",
            2 => "medium",
            _ => "low",
        }
    }
}

/// One objective entry in an objectives YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectiveConfig {
    #[serde(rename = "type")]
    pub objective_type: ObjectiveType,
    #[serde(default)]
    pub detail: Option<String>,
    pub priority: i16,
}

#[derive(Debug, Deserialize)]
pub struct ObjectivesFile {
    pub objectives: Vec<ObjectiveConfig>,
}

impl ObjectivesFile {
    /// Turn the file entries into objectives owned by `user_id`, sorted by
    /// ascending priority number (highest priority first).
    #[must_use]
    pub fn into_objectives(self, user_id: Uuid) -> Vec<Objective> {
        let mut objectives: Vec<Objective> = self
            .objectives
            .into_iter()
            .map(|o| Objective {
                id: Uuid::new_v4(),
                user_id,
                objective_type: o.objective_type,
                detail: o.detail,
                priority: o.priority,
            })
            .collect();
        objectives.sort_by_key(|o| o.priority);
        objectives
    }
}

/// Load and validate an objectives YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_objectives(path: &Path) -> Result<ObjectivesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ObjectivesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_objectives(&content)
}

fn parse_objectives(content: &str) -> Result<ObjectivesFile, ConfigError> {
    let file: ObjectivesFile =
        serde_yaml::from_str(content).map_err(ConfigError::ObjectivesFileParse)?;
    validate_objectives(&file)?;
    Ok(file)
}

fn validate_objectives(file: &ObjectivesFile) -> Result<(), ConfigError> {
    if file.objectives.is_empty() {
        return Err(ConfigError::Validation(
            "objectives file must list at least one objective".to_string(),
        ));
    }

    for objective in &file.objectives {
        if !(1..=3).contains(&objective.priority) {
            return Err(ConfigError::Validation(format!(
                "objective '{}' has invalid priority {}; must be 1, 2, or 3",
                objective.objective_type, objective.priority
            )));
        }
    }

    Ok(())
}
