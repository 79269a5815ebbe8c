//! BMI, BMR and calorie-plan formulas.
//!
//! Everything here is pure computation; derivation happens once at write
//! time and the stored values are never recomputed on read.

use crate::{ActivityLevel, BmiStatus, BmiTrend, Error, PlanKind, Result, Sex, TargetAssessment};

/// Classification bands, highest threshold first.
///
/// Each threshold is the inclusive lower bound of its band; anything below
/// the last entry is underweight.
const BMI_BANDS: [(f64, BmiStatus); 5] = [
    (35.0, BmiStatus::SeverelyObese),
    (30.0, BmiStatus::Stage2Obese),
    (25.0, BmiStatus::Stage1Obese),
    (23.0, BmiStatus::Overweight),
    (18.5, BmiStatus::Normal),
];

/// Compute BMI from height (cm) and weight (kg)
///
/// Fails with `InvalidInput` for non-positive heights; dividing by a zero or
/// negative height would otherwise produce a nonsensical value silently.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Result<f64> {
    if height_cm <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "height must be positive, got {height_cm}"
        )));
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Round a BMI to the 2 decimal places stored in history
pub fn round_bmi(bmi: f64) -> f64 {
    (bmi * 100.0).round() / 100.0
}

/// Classify a BMI by walking the ordered threshold table
pub fn classify(bmi: f64) -> BmiStatus {
    for (lower_bound, status) in BMI_BANDS {
        if bmi >= lower_bound {
            return status;
        }
    }
    BmiStatus::Underweight
}

/// Basal metabolic rate, Mifflin-St Jeor
///
/// Sex selects the trailing constant (+5 male, -161 female). The result is
/// not clamped; implausible inputs give implausible outputs.
pub fn compute_bmr(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Total daily energy expenditure: BMR scaled by the activity factor
pub fn compute_tdee(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.factor()
}

/// Pick a calorie target and plan kind for the current/target BMI pair
///
/// The +-1 band around the target is hysteresis so near-target users don't
/// flip between plan labels on small changes.
pub fn plan_calories(tdee: f64, current_bmi: f64, target_bmi: f64) -> (f64, PlanKind) {
    if current_bmi > target_bmi + 1.0 {
        (tdee - 500.0, PlanKind::Cut)
    } else if current_bmi < target_bmi - 1.0 {
        (tdee + 300.0, PlanKind::Bulk)
    } else {
        (tdee, PlanKind::Maintain)
    }
}

/// Position the latest BMI relative to the target for the dashboard banner
pub fn assess_target(current_bmi: f64, target_bmi: f64) -> TargetAssessment {
    let diff = current_bmi - target_bmi;
    if diff > 3.0 {
        TargetAssessment::Danger
    } else if diff > 1.0 {
        TargetAssessment::Above
    } else if diff > -1.0 {
        TargetAssessment::OnTrack
    } else {
        TargetAssessment::Below
    }
}

/// Compare the latest BMI against the previous record's
pub fn compare_previous(latest_bmi: f64, previous_bmi: f64) -> BmiTrend {
    let delta = latest_bmi - previous_bmi;
    if delta > 0.0 {
        BmiTrend::Up(delta)
    } else if delta < 0.0 {
        BmiTrend::Down(-delta)
    } else {
        BmiTrend::Flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_bmi_formula() {
        let bmi = compute_bmi(170.0, 70.0).unwrap();
        assert_close(round_bmi(bmi), 24.22);

        let bmi = compute_bmi(170.0, 60.0).unwrap();
        assert_close(round_bmi(bmi), 20.76);
    }

    #[test]
    fn test_bmi_rejects_non_positive_height() {
        assert!(matches!(
            compute_bmi(0.0, 70.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_bmi(-170.0, 70.0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bmi_monotone_in_weight_and_height() {
        let base = compute_bmi(170.0, 70.0).unwrap();
        assert!(compute_bmi(170.0, 71.0).unwrap() > base);
        assert!(compute_bmi(170.0, 69.0).unwrap() < base);
        assert!(compute_bmi(171.0, 70.0).unwrap() < base);
        assert!(compute_bmi(169.0, 70.0).unwrap() > base);
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify(22.9), BmiStatus::Normal);
        assert_eq!(classify(23.0), BmiStatus::Overweight);
        assert_eq!(classify(24.99), BmiStatus::Overweight);
        assert_eq!(classify(25.0), BmiStatus::Stage1Obese);
        assert_eq!(classify(34.99), BmiStatus::Stage2Obese);
        assert_eq!(classify(35.0), BmiStatus::SeverelyObese);
        assert_eq!(classify(18.5), BmiStatus::Normal);
        assert_eq!(classify(18.49), BmiStatus::Underweight);
    }

    #[test]
    fn test_bmr_sex_constants() {
        // 10*70 + 6.25*170 - 5*30 = 1612.5
        assert_close(compute_bmr(70.0, 170.0, 30, Sex::Male), 1617.5);
        assert_close(compute_bmr(70.0, 170.0, 30, Sex::Female), 1451.5);
    }

    #[test]
    fn test_tdee_factors() {
        assert_close(compute_tdee(1000.0, ActivityLevel::Sedentary), 1200.0);
        assert_close(compute_tdee(1000.0, ActivityLevel::Light), 1375.0);
        assert_close(compute_tdee(1000.0, ActivityLevel::Moderate), 1550.0);
        assert_close(compute_tdee(1000.0, ActivityLevel::High), 1725.0);
    }

    #[test]
    fn test_activity_level_parse() {
        assert_eq!(
            "moderate".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::Moderate
        );
        assert_eq!(
            "HIGH".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::High
        );
        assert!(matches!(
            "extreme".parse::<ActivityLevel>(),
            Err(Error::UnknownActivityLevel(_))
        ));
    }

    #[test]
    fn test_calorie_plan_selection() {
        let (calories, plan) = plan_calories(2000.0, 27.0, 22.0);
        assert_close(calories, 1500.0);
        assert_eq!(plan, PlanKind::Cut);

        let (calories, plan) = plan_calories(2000.0, 22.0, 22.0);
        assert_close(calories, 2000.0);
        assert_eq!(plan, PlanKind::Maintain);

        let (calories, plan) = plan_calories(2000.0, 20.0, 22.0);
        assert_close(calories, 2300.0);
        assert_eq!(plan, PlanKind::Bulk);
    }

    #[test]
    fn test_calorie_plan_hysteresis_band() {
        // Exactly target+1 and target-1 still maintain
        assert_eq!(plan_calories(2000.0, 23.0, 22.0).1, PlanKind::Maintain);
        assert_eq!(plan_calories(2000.0, 21.0, 22.0).1, PlanKind::Maintain);
        assert_eq!(plan_calories(2000.0, 23.01, 22.0).1, PlanKind::Cut);
        assert_eq!(plan_calories(2000.0, 20.99, 22.0).1, PlanKind::Bulk);
    }

    #[test]
    fn test_target_assessment_bands() {
        assert_eq!(assess_target(25.1, 22.0), TargetAssessment::Danger);
        assert_eq!(assess_target(23.5, 22.0), TargetAssessment::Above);
        assert_eq!(assess_target(22.0, 22.0), TargetAssessment::OnTrack);
        assert_eq!(assess_target(21.1, 22.0), TargetAssessment::OnTrack);
        assert_eq!(assess_target(20.0, 22.0), TargetAssessment::Below);
    }

    #[test]
    fn test_trend_against_previous() {
        assert!(matches!(compare_previous(24.0, 23.5), BmiTrend::Up(_)));
        assert!(matches!(compare_previous(23.0, 23.5), BmiTrend::Down(_)));
        assert_eq!(compare_previous(23.5, 23.5), BmiTrend::Flat);
    }
}
