use std::fmt;

use serde::{Deserialize, Serialize};

/// Body Mass Index rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bmi(f64);

impl Bmi {
    /// `weight_kg * 10000 / height_cm^2`, rounded to 2 decimals.
    pub fn from_metric(weight_kg: f64, height_cm: f64) -> Self {
        let raw = (weight_kg * 10_000.0) / (height_cm * height_cm);
        Self((raw * 100.0).round() / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn category(self) -> BmiCategory {
        BmiCategory::for_value(self.0)
    }
}

impl fmt::Display for Bmi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn for_value(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
