use minijinja::{context, Environment};
use once_cell::sync::Lazy;

use crate::model::{DietQuery, ExerciseQuery};

const DIET_TEMPLATE: &str = "diet.txt";
const EXERCISE_TEMPLATE: &str = "exercise.txt";
const DEFAULT_NAME: &str = "the user";

macro_rules! prompt_file {
    ($name:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/prompts/",
            $name
        ))
    };
}

static PROMPTS: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template(DIET_TEMPLATE, prompt_file!("diet.txt"))
        .expect("invalid diet prompt template");
    env.add_template(EXERCISE_TEMPLATE, prompt_file!("exercise.txt"))
        .expect("invalid exercise prompt template");
    env
});

pub fn diet_prompt(query: &DietQuery) -> Result<String, minijinja::Error> {
    PROMPTS.get_template(DIET_TEMPLATE)?.render(context! {
        age => display_number(query.age),
        gender => query.gender.as_str(),
        bmi => display_number(query.bmi),
    })
}

pub fn exercise_prompt(query: &ExerciseQuery) -> Result<String, minijinja::Error> {
    PROMPTS.get_template(EXERCISE_TEMPLATE)?.render(context! {
        name => query.name.as_deref().unwrap_or(DEFAULT_NAME),
        age => display_number(query.age),
        gender => query.gender.as_str(),
        bmi => display_number(query.bmi),
        goal => query.fitness_goal.as_str(),
        level => query.fitness_level.as_str(),
    })
}

/// `30.0` renders as `30`, `22.86` stays `22.86`.
fn display_number(n: f64) -> String {
    format!("{n}")
}
