//! Core domain types for the vita health tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Measurement records and their derived fields
//! - Classification bands and calorie plan kinds
//! - Profile inputs (sex, activity level)
//! - Dashboard summaries and assessments

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex, selects the Mifflin-St Jeor constant
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(Error::InvalidInput(format!("unknown sex: {other}"))),
        }
    }
}

/// Activity level, a closed set mapped to fixed TDEE factors
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    High,
}

impl ActivityLevel {
    /// Fixed multiplier applied to BMR
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::High => 1.725,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "high" => Ok(ActivityLevel::High),
            other => Err(Error::UnknownActivityLevel(other.to_string())),
        }
    }
}

// ============================================================================
// Classification and Plan Types
// ============================================================================

/// BMI classification band
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BmiStatus {
    #[serde(rename = "underweight")]
    Underweight,
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "overweight")]
    Overweight,
    #[serde(rename = "stage-1 obese")]
    Stage1Obese,
    #[serde(rename = "stage-2 obese")]
    Stage2Obese,
    #[serde(rename = "severely obese")]
    SeverelyObese,
}

impl BmiStatus {
    /// Label stored in the history table
    pub fn label(self) -> &'static str {
        match self {
            BmiStatus::Underweight => "underweight",
            BmiStatus::Normal => "normal",
            BmiStatus::Overweight => "overweight",
            BmiStatus::Stage1Obese => "stage-1 obese",
            BmiStatus::Stage2Obese => "stage-2 obese",
            BmiStatus::SeverelyObese => "severely obese",
        }
    }

    /// Parse a stored label back into a status
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "underweight" => Some(BmiStatus::Underweight),
            "normal" => Some(BmiStatus::Normal),
            "overweight" => Some(BmiStatus::Overweight),
            "stage-1 obese" => Some(BmiStatus::Stage1Obese),
            "stage-2 obese" => Some(BmiStatus::Stage2Obese),
            "severely obese" => Some(BmiStatus::SeverelyObese),
            _ => None,
        }
    }
}

impl fmt::Display for BmiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calorie plan kind selected by the planner
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Cut,
    Maintain,
    Bulk,
}

impl PlanKind {
    pub fn label(self) -> &'static str {
        match self {
            PlanKind::Cut => "cut",
            PlanKind::Maintain => "maintain",
            PlanKind::Bulk => "bulk",
        }
    }

    /// Every plan kind, in planner order
    pub fn all() -> [PlanKind; 3] {
        [PlanKind::Cut, PlanKind::Maintain, PlanKind::Bulk]
    }
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Record Types
// ============================================================================

/// A new measurement submitted by the user, before derivation
#[derive(Clone, Debug)]
pub struct NewMeasurement {
    pub name: String,
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// One stored measurement event
///
/// `bmi` and `status` are derived at write time and stay consistent with
/// `height_cm`/`weight_kg` as of insertion; records are immutable except
/// for deletion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: i64,
    pub name: String,
    /// Minute-precision creation time, `"YYYY-MM-DD HH:MM"`, the sort key
    pub recorded_at: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// Rounded to 2 decimal places at write time
    pub bmi: f64,
    pub status: BmiStatus,
}

// ============================================================================
// Dashboard Types
// ============================================================================

/// A workout recommendation entry from the catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub title: String,
    pub content: String,
}

/// Per-name history rollup backing the KPI row
#[derive(Clone, Debug)]
pub struct HistorySummary {
    /// Last record by timestamp
    pub latest: Record,
    /// Second-to-last record, if any
    pub previous: Option<Record>,
    pub max_bmi: f64,
    pub min_bmi: f64,
    pub count: usize,
}

/// Position of the latest BMI relative to the target
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetAssessment {
    /// More than 3 above target
    Danger,
    /// More than 1 above target
    Above,
    /// Within the +-1 band
    OnTrack,
    /// More than 1 below target
    Below,
}

impl TargetAssessment {
    pub fn message(self) -> &'static str {
        match self {
            TargetAssessment::Danger => {
                "Well above the target BMI. Weight management is needed."
            }
            TargetAssessment::Above => {
                "Somewhat above the target BMI. Watch diet and exercise."
            }
            TargetAssessment::OnTrack => "Within the target BMI band. Keep it up.",
            TargetAssessment::Below => {
                "Below the target BMI. Consider a general health check."
            }
        }
    }
}

/// Change against the previous record for the same name
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BmiTrend {
    Up(f64),
    Down(f64),
    Flat,
}

impl BmiTrend {
    pub fn describe(self) -> String {
        match self {
            BmiTrend::Up(delta) => {
                format!("BMI up {delta:.2} since the previous record")
            }
            BmiTrend::Down(delta) => {
                format!("BMI down {delta:.2} since the previous record")
            }
            BmiTrend::Flat => "No BMI change since the previous record".to_string(),
        }
    }
}
