pub mod bmi;
pub mod plan;
pub mod profile;

pub use bmi::{Bmi, BmiCategory};
pub use plan::{
    DietQuery, ErrorBody, ExercisePlanRequest, ExercisePlanResponse, ExerciseQuery,
    RecommendationRequest, RecommendationResponse,
};
pub use profile::{FormError, FormInput, Gender, PlanKind, RawForm};
