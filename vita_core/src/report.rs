//! Health report assembly and rendering.
//!
//! The report carries everything the dashboard shows for one subject:
//! BMI summary, calorie analysis, recommendations, target assessment and
//! the trend against the previous record. Rendering produces the plain-text
//! document; typesetting to richer formats is left to external tooling.

use crate::config::ProfileConfig;
use crate::{catalog, metrics, BmiStatus, BmiTrend, HistorySummary, PlanKind, Result, TargetAssessment, WorkoutPlan};
use std::path::{Path, PathBuf};

/// Assembled health report for one subject
#[derive(Clone, Debug)]
pub struct HealthReport {
    pub name: String,
    /// Timestamp of the latest record
    pub date: String,
    pub bmi: f64,
    pub status: BmiStatus,
    pub bmr: f64,
    pub tdee: f64,
    pub recommended_calories: f64,
    pub plan: PlanKind,
    pub workout: WorkoutPlan,
    pub diet: String,
    pub assessment: TargetAssessment,
    /// None when the subject has a single record
    pub trend: Option<BmiTrend>,
}

impl HealthReport {
    /// Assemble a report from a subject's history and profile inputs
    pub fn build(summary: &HistorySummary, profile: &ProfileConfig) -> Self {
        let latest = &summary.latest;

        let bmr = metrics::compute_bmr(latest.weight_kg, latest.height_cm, profile.age, profile.sex);
        let tdee = metrics::compute_tdee(bmr, profile.activity);
        let (recommended_calories, plan) = metrics::plan_calories(tdee, latest.bmi, profile.target_bmi);

        HealthReport {
            name: latest.name.clone(),
            date: latest.recorded_at.clone(),
            bmi: latest.bmi,
            status: latest.status,
            bmr,
            tdee,
            recommended_calories,
            plan,
            workout: catalog::recommend_workout(plan).clone(),
            diet: catalog::recommend_diet(plan).to_string(),
            assessment: metrics::assess_target(latest.bmi, profile.target_bmi),
            trend: summary
                .previous
                .as_ref()
                .map(|previous| metrics::compare_previous(latest.bmi, previous.bmi)),
        }
    }

    /// Render the report as a plain-text document
    ///
    /// Calorie figures print truncated to whole kcal.
    pub fn render(&self) -> String {
        let mut doc = String::new();

        doc.push_str("Personal Health Report\n");
        doc.push_str("======================\n\n");
        doc.push_str(&format!("Name: {}\n", self.name));
        doc.push_str(&format!("Date: {}\n\n", self.date));

        doc.push_str("BMI Summary\n");
        doc.push_str("-----------\n");
        doc.push_str(&format!("BMI: {:.2} ({})\n\n", self.bmi, self.status));

        doc.push_str("Calorie Analysis\n");
        doc.push_str("----------------\n");
        doc.push_str(&format!("BMR: {} kcal\n", self.bmr as i64));
        doc.push_str(&format!("TDEE: {} kcal\n", self.tdee as i64));
        doc.push_str(&format!(
            "Recommended intake: {} kcal ({})\n\n",
            self.recommended_calories as i64, self.plan
        ));

        doc.push_str("Workout Recommendation\n");
        doc.push_str("----------------------\n");
        doc.push_str(&format!("{}\n", self.workout.title));
        doc.push_str(&self.workout.content);
        doc.push('\n');

        doc.push_str("Diet Guide\n");
        doc.push_str("----------\n");
        doc.push_str(&self.diet);
        doc.push('\n');

        doc.push_str("Assessment\n");
        doc.push_str("----------\n");
        doc.push_str(&format!("{}\n", self.assessment.message()));
        if let Some(trend) = self.trend {
            doc.push_str(&format!("{}\n", trend.describe()));
        }

        doc
    }

    /// File name of the report artifact for a subject
    pub fn file_name(name: &str) -> String {
        format!("{name}_health_report.txt")
    }

    /// Render and write the report into `dir`, returning the artifact path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(Self::file_name(&self.name));
        std::fs::write(&path, self.render())?;
        tracing::info!("Wrote health report to {:?}", path);
        Ok(path)
    }
}
