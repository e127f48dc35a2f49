use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Bmi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(FormError::InvalidValues),
        }
    }
}

/// Which endpoint a submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanKind {
    Diet,
    #[default]
    Exercise,
}

impl PlanKind {
    pub fn from_field(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "diet" | "recommendations" => PlanKind::Diet,
            _ => PlanKind::Exercise,
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            PlanKind::Diet => "Failed to fetch recommendations. Please try again.",
            PlanKind::Exercise => "Failed to fetch exercise plan. Please try again.",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Invalid input values")]
    InvalidValues,
}

/// Field values exactly as typed into the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawForm {
    pub name: String,
    pub weight: String,
    pub height: String,
    pub age: String,
    pub gender: String,
    pub fitness_goal: String,
    pub fitness_level: String,
    pub plan: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormInput {
    pub name: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub gender: Gender,
    pub fitness_goal: Option<String>,
    pub fitness_level: Option<String>,
}

impl FormInput {
    /// Validates a submission. Empty required fields are reported before bad values.
    pub fn parse(raw: &RawForm, kind: PlanKind) -> Result<Self, FormError> {
        let name = raw.name.trim();
        let goal = non_empty(&raw.fitness_goal);
        let level = non_empty(&raw.fitness_level);

        let mut required = vec![&raw.name, &raw.weight, &raw.height, &raw.age, &raw.gender];
        if kind == PlanKind::Exercise {
            required.push(&raw.fitness_goal);
            required.push(&raw.fitness_level);
        }
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(FormError::MissingFields);
        }

        let weight_kg = positive(&raw.weight)?;
        let height_cm = positive(&raw.height)?;
        let age = positive(&raw.age)?.trunc();
        if age < 1.0 || age > u32::MAX as f64 {
            return Err(FormError::InvalidValues);
        }
        let gender = raw.gender.parse::<Gender>()?;
        if Bmi::from_metric(weight_kg, height_cm).value() <= 0.0 {
            return Err(FormError::InvalidValues);
        }

        Ok(Self {
            name: name.to_string(),
            weight_kg,
            height_cm,
            age: age as u32,
            gender,
            fitness_goal: goal,
            fitness_level: level,
        })
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn positive(raw: &str) -> Result<f64, FormError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(FormError::InvalidValues),
    }
}
