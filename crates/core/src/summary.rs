use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dosha::{Dosha, DoshaScores};
use crate::patient::PatientRecord;

/// Compact clinical overview of one patient
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub basic_info: BasicInfo,
    pub constitution: Constitution,
    pub current_health: CurrentHealth,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicInfo {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub bmi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constitution {
    pub dominant_prakriti: Dosha,
    pub dominant_vikriti: Dosha,
    pub prakriti_balance: DoshaScores,
    pub vikriti_balance: DoshaScores,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentHealth {
    pub conditions: Vec<String>,
    pub target_calories: u32,
    pub diet_type: String,
    pub activity_level: String,
}

impl From<&PatientRecord> for PatientSummary {
    fn from(record: &PatientRecord) -> Self {
        let p = &record.profile;
        Self {
            basic_info: BasicInfo {
                name: p.name.clone(),
                age: p.age,
                gender: p.gender.to_string(),
                bmi: p.calculated_bmi(),
            },
            constitution: Constitution {
                dominant_prakriti: p.dominant_prakriti(),
                dominant_vikriti: p.dominant_vikriti(),
                prakriti_balance: p.prakriti,
                vikriti_balance: p.vikriti,
            },
            current_health: CurrentHealth {
                conditions: p.roga.iter().map(|c| c.condition.clone()).collect(),
                target_calories: p.dietary_habits.target_calories,
                diet_type: p.dietary_habits.diet_type.to_string(),
                activity_level: p.lifestyle.activity_level.to_string(),
            },
            last_updated: record.last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::PatientId;
    use crate::patient::tests::sample_payload;

    #[test]
    fn test_summary_shape() {
        let now = Utc::now();
        let profile = serde_json::from_value(sample_payload()).unwrap();
        let record = PatientRecord::new(PatientId::generate(now), profile, now);

        let json = serde_json::to_value(PatientSummary::from(&record)).unwrap();
        assert_eq!(json["basicInfo"]["bmi"], 18.34);
        assert_eq!(json["constitution"]["dominantVikriti"], "Pitta");
        assert_eq!(json["constitution"]["prakritiBalance"]["vata"], 3.0);
        assert_eq!(json["currentHealth"]["conditions"][0], "Acidity");
        assert_eq!(json["currentHealth"]["activityLevel"], "Moderately Active");
    }
}
