//! Static workout and diet recommendation tables.
//!
//! Both tables are keyed by `PlanKind`, so the set of valid keys is closed
//! at compile time; lookups cannot miss.

use crate::{PlanKind, WorkoutPlan};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached workout table - built once and reused across all operations
static WORKOUTS: Lazy<HashMap<PlanKind, WorkoutPlan>> = Lazy::new(build_workout_table);

/// Cached diet table
static DIETS: Lazy<HashMap<PlanKind, String>> = Lazy::new(build_diet_table);

/// Workout recommendation for a plan kind
pub fn recommend_workout(plan: PlanKind) -> &'static WorkoutPlan {
    &WORKOUTS[&plan]
}

/// Diet guide for a plan kind
pub fn recommend_diet(plan: PlanKind) -> &'static str {
    &DIETS[&plan]
}

fn build_workout_table() -> HashMap<PlanKind, WorkoutPlan> {
    let mut workouts = HashMap::new();

    workouts.insert(
        PlanKind::Cut,
        WorkoutPlan {
            title: "Fat Loss Program".into(),
            content: "\
- Cardio: brisk walking / running / cycling (30-40 min, 4-5x per week)
- Strength: full-body circuits (2-3x per week)
- Point: consistency over fasted cardio
"
            .into(),
        },
    );

    workouts.insert(
        PlanKind::Maintain,
        WorkoutPlan {
            title: "Maintenance Program".into(),
            content: "\
- Cardio: light jogging or swimming (20-30 min, 2-3x per week)
- Strength: upper/lower split (3x per week)
- Point: keep the routine fixed
"
            .into(),
        },
    );

    workouts.insert(
        PlanKind::Bulk,
        WorkoutPlan {
            title: "Muscle Gain Program".into(),
            content: "\
- Strength: heavy compound training (4-5x per week)
- Cardio: minimal (10-15 min)
- Point: progressive overload and enough rest
"
            .into(),
        },
    );

    workouts
}

fn build_diet_table() -> HashMap<PlanKind, String> {
    let mut diets = HashMap::new();

    diets.insert(
        PlanKind::Cut,
        "\
- Breakfast: two boiled eggs and a banana
- Lunch: brown rice, chicken breast, greens
- Dinner: tofu or fish with salad
- Snack: greek yogurt
"
        .to_string(),
    );

    diets.insert(
        PlanKind::Maintain,
        "\
- Breakfast: toast and eggs
- Lunch: a regular balanced set meal
- Dinner: balanced plate
- Snack: nuts
"
        .to_string(),
    );

    diets.insert(
        PlanKind::Bulk,
        "\
- Breakfast: oatmeal with milk
- Lunch: rice, meat, sides
- Dinner: protein-heavy meal
- Snack: sweet potato or a shake
"
        .to_string(),
    );

    diets
}
