use std::collections::BTreeMap;

use crate::display::PatientSource;
use crate::dosha::{Dosha, DoshaScores};
use crate::patient::{PatientProfile, WeightUnit};

pub const DEFAULT_TARGET_CALORIES: u32 = 2000;

/// Patient facts as seen by the prompt builder and the fallback planner.
///
/// Every field is optional; consumers substitute their own defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientContext {
    pub id: Option<String>,
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub prakriti: Option<DoshaScores>,
    /// Free-text constitution when no scores could be read
    pub prakriti_note: Option<String>,
    pub vikriti: Option<DoshaScores>,
    pub vikriti_note: Option<String>,
    pub conditions: Vec<String>,
    pub diet_type: Option<String>,
    pub target_calories: Option<u32>,
    pub food_temperature: Option<String>,
    pub spice_level: Option<String>,
    pub food_preferences: Option<String>,
    pub activity_level: Option<String>,
    pub climate: Option<String>,
    pub season: Option<String>,
    pub agni: Option<String>,
}

impl PatientContext {
    pub fn dominant_prakriti(&self) -> Dosha {
        dominant_of(self.prakriti.as_ref(), self.prakriti_note.as_deref()).unwrap_or(Dosha::Vata)
    }

    /// Current imbalance, falling back to the constitution when unknown
    pub fn dominant_vikriti(&self) -> Dosha {
        dominant_of(self.vikriti.as_ref(), self.vikriti_note.as_deref())
            .unwrap_or_else(|| self.dominant_prakriti())
    }

    pub fn calories(&self) -> u32 {
        self.target_calories.unwrap_or(DEFAULT_TARGET_CALORIES)
    }

    /// Condition names joined for display, "General wellness" when none
    pub fn concerns(&self) -> String {
        if self.conditions.is_empty() {
            "General wellness".to_string()
        } else {
            self.conditions.join(", ")
        }
    }

    fn from_profile(id: &str, profile: &PatientProfile) -> Self {
        let pm = &profile.physical_measurements;
        let unit = match pm.weight.unit {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        };
        let height = match (pm.height.cm, pm.height.feet) {
            (Some(cm), _) if cm > 0.0 => Some(format!("{cm} cm")),
            (_, Some(feet)) => Some(format!("{feet}'{}\"", pm.height.inches.unwrap_or(0.0))),
            _ => None,
        };
        let habits = &profile.dietary_habits;
        let prefs = &habits.food_preferences;
        let tastes: Vec<String> = prefs.taste.iter().map(ToString::to_string).collect();

        Self {
            id: Some(id.to_string()),
            name: Some(profile.name.clone()),
            age: Some(profile.age.to_string()),
            gender: Some(profile.gender.to_string()),
            weight: Some(format!("{} {unit}", pm.weight.value)),
            height,
            prakriti: Some(profile.prakriti),
            prakriti_note: None,
            vikriti: Some(profile.vikriti),
            vikriti_note: None,
            conditions: profile
                .roga
                .iter()
                .map(|c| c.condition.clone())
                .filter(|c| !c.is_empty())
                .collect(),
            diet_type: Some(habits.diet_type.to_string()),
            target_calories: Some(habits.target_calories),
            food_temperature: Some(prefs.temperature.to_string()),
            spice_level: Some(prefs.spice_level.to_string()),
            food_preferences: (!tastes.is_empty()).then(|| tastes.join(", ")),
            activity_level: Some(profile.lifestyle.activity_level.to_string()),
            climate: Some(profile.environment.climate.to_string()),
            season: Some(profile.environment.season.to_string()),
            agni: Some(habits.appetite.to_string()),
        }
    }

    fn from_answers(answers: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            answers
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let prakriti_note = text("prakriti");
        let vikriti_note = text("vikruti").or_else(|| text("vikriti"));

        Self {
            id: text("_id"),
            name: text("name"),
            age: text("age"),
            gender: text("gender"),
            weight: text("weight"),
            height: text("height"),
            prakriti: prakriti_note.as_deref().and_then(DoshaScores::parse),
            prakriti_note,
            vikriti: vikriti_note.as_deref().and_then(DoshaScores::parse),
            vikriti_note,
            conditions: text("roga")
                .map(|r| {
                    r.split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            diet_type: text("dietaryHabits"),
            target_calories: text("targetCalories").and_then(|t| leading_number(&t)),
            food_temperature: None,
            spice_level: None,
            food_preferences: text("foodPreferences"),
            activity_level: text("activityLevel"),
            climate: text("climate"),
            season: text("season"),
            agni: text("agni"),
        }
    }
}

impl From<&PatientSource> for PatientContext {
    fn from(source: &PatientSource) -> Self {
        match source {
            PatientSource::Stored(record) => Self::from_profile(record.id.as_str(), &record.profile),
            PatientSource::Collected(answers) => Self::from_answers(answers),
        }
    }
}

fn dominant_of(scores: Option<&DoshaScores>, note: Option<&str>) -> Option<Dosha> {
    scores
        .map(DoshaScores::dominant)
        .or_else(|| note.and_then(Dosha::first_mentioned))
}

/// First run of digits in `text`, e.g. 2200 from "about 2200 kcal/day"
fn leading_number(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
