use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::dosha::{Dosha, DoshaScores};
use crate::error::ValidationFailure;
use crate::id::PatientId;

/// String-valued enum with fixed wire labels
macro_rules! labelled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            /// Every accepted wire label, in declaration order
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? } default $default:ident) => {
        labelled_enum!($(#[$meta])* $name { $($variant => $label),+ });

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }
    };
}

labelled_enum!(Gender { Male => "Male", Female => "Female", Other => "Other" });
labelled_enum!(Severity { Mild => "Mild", Moderate => "Moderate", Severe => "Severe" } default Moderate);
labelled_enum!(WeightUnit { Kg => "kg", Lbs => "lbs" } default Kg);
labelled_enum!(DietType {
    Vegetarian => "Vegetarian",
    NonVegetarian => "Non-Vegetarian",
    Vegan => "Vegan",
    Jain => "Jain",
    Eggetarian => "Eggetarian",
});
labelled_enum!(Appetite {
    Poor => "Poor",
    Moderate => "Moderate",
    Good => "Good",
    Excessive => "Excessive",
} default Moderate);
labelled_enum!(FoodTemperature {
    Cold => "Cold",
    Warm => "Warm",
    Hot => "Hot",
    RoomTemperature => "Room Temperature",
} default Warm);
labelled_enum!(
    /// The six Ayurvedic tastes
    Taste {
        Sweet => "Sweet",
        Sour => "Sour",
        Salty => "Salty",
        Pungent => "Pungent",
        Bitter => "Bitter",
        Astringent => "Astringent",
    }
);
labelled_enum!(SpiceLevel {
    Mild => "Mild",
    Medium => "Medium",
    Spicy => "Spicy",
    VerySpicy => "Very Spicy",
} default Medium);
labelled_enum!(ActivityLevel {
    Sedentary => "Sedentary",
    LightlyActive => "Lightly Active",
    ModeratelyActive => "Moderately Active",
    VeryActive => "Very Active",
    ExtremelyActive => "Extremely Active",
} default ModeratelyActive);
labelled_enum!(SleepQuality {
    Poor => "Poor",
    Fair => "Fair",
    Good => "Good",
    Excellent => "Excellent",
} default Good);
labelled_enum!(StressLevel {
    Low => "Low",
    Moderate => "Moderate",
    High => "High",
    VeryHigh => "Very High",
});
labelled_enum!(SmokingStatus { Never => "Never", Former => "Former", Current => "Current" });
labelled_enum!(AlcoholConsumption {
    None => "None",
    Occasional => "Occasional",
    Moderate => "Moderate",
    Heavy => "Heavy",
});
labelled_enum!(Climate {
    Tropical => "Tropical",
    Subtropical => "Subtropical",
    Temperate => "Temperate",
    Cold => "Cold",
    Arid => "Arid",
    Humid => "Humid",
} default Tropical);
labelled_enum!(Season {
    Spring => "Spring",
    Summer => "Summer",
    Monsoon => "Monsoon",
    Autumn => "Autumn",
    Winter => "Winter",
} default Summer);

fn default_country() -> String {
    "India".to_string()
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
}

/// One entry of the patient's current disorders (roga)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub condition: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    #[serde(default)]
    pub unit: WeightUnit,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Height {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feet: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inches: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalMeasurements {
    pub weight: Weight,
    #[serde(default)]
    pub height: Height,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPreferences {
    #[serde(default)]
    pub temperature: FoodTemperature,
    #[serde(default)]
    pub taste: Vec<Taste>,
    #[serde(default)]
    pub spice_level: SpiceLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealFrequency {
    #[serde(default = "MealFrequency::default_main_meals")]
    pub main_meals: u32,
    #[serde(default = "MealFrequency::default_snacks")]
    pub snacks: u32,
}

impl MealFrequency {
    fn default_main_meals() -> u32 {
        3
    }

    fn default_snacks() -> u32 {
        1
    }
}

impl Default for MealFrequency {
    fn default() -> Self {
        Self {
            main_meals: Self::default_main_meals(),
            snacks: Self::default_snacks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietaryHabits {
    #[serde(rename = "type")]
    pub diet_type: DietType,
    #[serde(default)]
    pub appetite: Appetite,
    #[serde(default)]
    pub food_preferences: FoodPreferences,
    #[serde(default)]
    pub meal_frequency: MealFrequency,
    pub target_calories: u32,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepPattern {
    #[serde(default = "SleepPattern::default_hours")]
    pub average_hours: f64,
    #[serde(default)]
    pub quality: SleepQuality,
}

impl SleepPattern {
    fn default_hours() -> f64 {
        7.0
    }
}

impl Default for SleepPattern {
    fn default() -> Self {
        Self {
            average_hours: Self::default_hours(),
            quality: SleepQuality::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifestyle {
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub sleep_pattern: SleepPattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<StressLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking_status: Option<SmokingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alcohol_consumption: Option<AlcoholConsumption>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub climate: Climate,
    #[serde(default)]
    pub season: Season,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PastIllness {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FamilyHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Surgery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalHistory {
    #[serde(default)]
    pub current_medications: Vec<Medication>,
    #[serde(default)]
    pub past_illnesses: Vec<PastIllness>,
    #[serde(default)]
    pub family_history: Vec<FamilyHistory>,
    #[serde(default)]
    pub surgeries: Vec<Surgery>,
}

/// Everything a client may write about a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    pub prakriti: DoshaScores,
    pub vikriti: DoshaScores,
    #[serde(default)]
    pub roga: Vec<Condition>,
    pub physical_measurements: PhysicalMeasurements,
    pub dietary_habits: DietaryHabits,
    #[serde(default)]
    pub lifestyle: Lifestyle,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<MedicalHistory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl PatientProfile {
    /// Body-mass index rounded to 2 decimals, `None` when weight or height
    /// is missing or zero
    pub fn calculated_bmi(&self) -> Option<f64> {
        let weight = &self.physical_measurements.weight;
        let height = &self.physical_measurements.height;

        let kg = match weight.unit {
            WeightUnit::Lbs => weight.value * 0.453592,
            WeightUnit::Kg => weight.value,
        };

        let meters = match (height.cm, height.feet) {
            (Some(cm), _) if cm > 0.0 => cm / 100.0,
            (_, Some(feet)) => (feet * 12.0 + height.inches.unwrap_or(0.0)) * 0.0254,
            _ => return None,
        };

        if kg <= 0.0 || meters <= 0.0 {
            return None;
        }

        let bmi = kg / (meters * meters);
        Some((bmi * 100.0).round() / 100.0)
    }

    pub fn dominant_prakriti(&self) -> Dosha {
        self.prakriti.dominant()
    }

    pub fn dominant_vikriti(&self) -> Dosha {
        self.vikriti.dominant()
    }

    pub fn email(&self) -> Option<&str> {
        self.contact_info
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .filter(|e| !e.is_empty())
    }

    pub fn phone(&self) -> Option<&str> {
        self.contact_info
            .as_ref()
            .and_then(|c| c.phone.as_deref())
            .filter(|p| !p.is_empty())
    }

    /// Trim the name and lowercase the email
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        if let Some(email) = self.contact_info.as_mut().and_then(|c| c.email.as_mut()) {
            *email = email.trim().to_lowercase();
        }
    }
}

/// A stored patient: profile plus system-managed fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(rename = "_id")]
    pub id: PatientId,
    #[serde(flatten)]
    pub profile: PatientProfile,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Top-level keys a partial update never overwrites
const SYSTEM_KEYS: &[&str] = &[
    "_id",
    "id",
    "isActive",
    "createdAt",
    "updatedAt",
    "lastUpdated",
    "calculatedBMI",
    "dominantPrakriti",
    "dominantVikriti",
];

impl PatientRecord {
    pub fn new(id: PatientId, profile: PatientProfile, now: DateTime<Utc>) -> Self {
        let mut record = Self {
            id,
            profile,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_updated: now,
        };
        record.touch(now);
        record
    }

    /// Save side effect: refresh the stored BMI and the modification stamps
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.profile.physical_measurements.bmi = self.profile.calculated_bmi();
        self.updated_at = now;
        self.last_updated = now;
    }

    /// Replace the profile with a fully validated one
    pub fn replace(&mut self, profile: PatientProfile, now: DateTime<Utc>) {
        self.profile = profile;
        self.touch(now);
    }

    /// Shallow-merge `patch` into the stored profile.
    ///
    /// Top-level keys of the patch overwrite the stored ones wholesale. Only
    /// the shape is checked: a value of the wrong type fails with its field
    /// path, range and enum rules are not applied.
    pub fn merge_partial(
        &mut self,
        patch: &JsonValue,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationFailure> {
        let Some(patch) = patch.as_object() else {
            return Err(ValidationFailure::single(
                "value",
                "\"value\" must be of type object",
            ));
        };

        let mut merged = match serde_json::to_value(&self.profile) {
            Ok(JsonValue::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        for (key, value) in patch {
            if SYSTEM_KEYS.contains(&key.as_str()) {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }

        let profile: PatientProfile =
            serde_path_to_error::deserialize(JsonValue::Object(merged)).map_err(|err| {
                let path = err.path().to_string();
                ValidationFailure::single(path, err.inner().to_string())
            })?;

        self.profile = profile;
        self.profile.normalize();
        self.touch(now);
        Ok(())
    }

    /// Serializable form including the derived read-only fields
    pub fn view(&self) -> PatientView<'_> {
        PatientView {
            id: self.id.as_str(),
            record: self,
            calculated_bmi: self.profile.calculated_bmi(),
            dominant_prakriti: self.profile.dominant_prakriti(),
            dominant_vikriti: self.profile.dominant_vikriti(),
        }
    }
}

/// Wire shape of a record as returned by the API
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientView<'a> {
    #[serde(flatten)]
    record: &'a PatientRecord,
    id: &'a str,
    #[serde(rename = "calculatedBMI", skip_serializing_if = "Option::is_none")]
    calculated_bmi: Option<f64>,
    dominant_prakriti: Dosha,
    dominant_vikriti: Dosha,
}
