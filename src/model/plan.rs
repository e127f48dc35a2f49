use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{Bmi, FormInput};

// Wire types for the proxy endpoints. A field counts as missing when it is
// absent, null, an empty string or the number zero. Numbers may arrive as
// numeric strings; any other type is a malformed body.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub bmi: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePlanRequest {
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub bmi: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub fitness_goal: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub fitness_level: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
}

/// Validated `/fetch-recommendations` input.
#[derive(Debug, Clone, PartialEq)]
pub struct DietQuery {
    pub age: f64,
    pub gender: String,
    pub bmi: f64,
}

/// Validated `/fetch-exercise-plan` input.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseQuery {
    pub age: f64,
    pub gender: String,
    pub bmi: f64,
    pub fitness_goal: String,
    pub fitness_level: String,
    pub name: Option<String>,
}

impl DietQuery {
    pub fn from_form(input: &FormInput, bmi: Bmi) -> Self {
        Self {
            age: f64::from(input.age),
            gender: input.gender.to_string(),
            bmi: bmi.value(),
        }
    }
}

impl ExerciseQuery {
    /// Goal and level are always set when `input` was parsed for `PlanKind::Exercise`.
    pub fn from_form(input: &FormInput, bmi: Bmi) -> Self {
        Self {
            age: f64::from(input.age),
            gender: input.gender.to_string(),
            bmi: bmi.value(),
            fitness_goal: input.fitness_goal.clone().unwrap_or_default(),
            fitness_level: input.fitness_level.clone().unwrap_or_default(),
            name: Some(input.name.clone()).filter(|n| !n.is_empty()),
        }
    }
}

impl RecommendationRequest {
    pub fn from_form(input: &FormInput, bmi: Bmi) -> Self {
        Self {
            age: Some(f64::from(input.age)),
            gender: Some(input.gender.to_string()),
            bmi: Some(bmi.value()),
        }
    }

    /// Returns the wire names of every missing field on failure.
    pub fn validate(self) -> Result<DietQuery, Vec<&'static str>> {
        match (self.age, self.gender, self.bmi) {
            (Some(age), Some(gender), Some(bmi)) => Ok(DietQuery { age, gender, bmi }),
            (age, gender, bmi) => Err(missing(&[
                ("age", age.is_none()),
                ("gender", gender.is_none()),
                ("bmi", bmi.is_none()),
            ])),
        }
    }
}

impl ExercisePlanRequest {
    pub fn from_form(input: &FormInput, bmi: Bmi) -> Self {
        Self {
            age: Some(f64::from(input.age)),
            gender: Some(input.gender.to_string()),
            bmi: Some(bmi.value()),
            fitness_goal: input.fitness_goal.clone(),
            fitness_level: input.fitness_level.clone(),
            name: Some(input.name.clone()).filter(|n| !n.is_empty()),
        }
    }

    pub fn validate(self) -> Result<ExerciseQuery, Vec<&'static str>> {
        match (
            self.age,
            self.gender,
            self.bmi,
            self.fitness_goal,
            self.fitness_level,
        ) {
            (Some(age), Some(gender), Some(bmi), Some(fitness_goal), Some(fitness_level)) => {
                Ok(ExerciseQuery {
                    age,
                    gender,
                    bmi,
                    fitness_goal,
                    fitness_level,
                    name: self.name,
                })
            }
            (age, gender, bmi, goal, level) => Err(missing(&[
                ("age", age.is_none()),
                ("gender", gender.is_none()),
                ("bmi", bmi.is_none()),
                ("fitnessGoal", goal.is_none()),
                ("fitnessLevel", level.is_none()),
            ])),
        }
    }
}

fn missing(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(name, _)| *name)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExercisePlanResponse {
    #[serde(
        rename = "exercisePlan",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub exercise_plan: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64().filter(|n| n.is_finite() && *n != 0.0)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a number, got \"{s}\""))),
        Some(other) => Err(D::Error::custom(format!(
            "expected a number or numeric string, got {}",
            type_name(&other)
        ))),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
