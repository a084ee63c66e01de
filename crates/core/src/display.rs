use serde::Serialize;
use serde_json::{Number, Value as JsonValue};
use std::collections::BTreeMap;

use crate::patient::{PatientProfile, PatientRecord};

/// A patient as handed to generation and display code.
///
/// Records fetched from the store and answers collected by the chat intake
/// have different shapes; each variant is normalized exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum PatientSource {
    Stored(Box<PatientRecord>),
    Collected(BTreeMap<String, String>),
}

impl From<PatientRecord> for PatientSource {
    fn from(record: PatientRecord) -> Self {
        PatientSource::Stored(Box::new(record))
    }
}

impl PatientSource {
    /// Flatten an untyped client document into collected answers.
    ///
    /// Nested fields of the stored-record shape (dietary habits, environment,
    /// measurements) are lifted onto the flat keys the chat intake uses.
    pub fn from_json(value: &JsonValue) -> Self {
        let mut answers = BTreeMap::new();
        let Some(obj) = value.as_object() else {
            return PatientSource::Collected(answers);
        };

        for (key, value) in obj {
            if value.is_object() && !is_dosha_shaped(value) {
                continue;
            }
            let text = render_value(value, "");
            if !text.is_empty() {
                let key = if key == "vikriti" { "vikruti" } else { key.as_str() };
                answers.insert(key.to_string(), text);
            }
        }

        let mut lift = |key: &str, value: Option<&JsonValue>| {
            if let Some(text) = value.map(|v| render_value(v, "")).filter(|t| !t.is_empty()) {
                answers.entry(key.to_string()).or_insert(text);
            }
        };
        let habits = obj.get("dietaryHabits");
        lift("targetCalories", habits.and_then(|h| h.get("targetCalories")));
        lift("agni", habits.and_then(|h| h.get("appetite")));
        lift("foodPreferences", habits.and_then(|h| h.get("foodPreferences")));
        lift("mealFrequency", habits.and_then(|h| h.get("mealFrequency")));
        lift("dietaryHabits", habits.and_then(|h| h.get("type")));
        let env = obj.get("environment");
        lift("climate", env.and_then(|e| e.get("climate")));
        lift("season", env.and_then(|e| e.get("season")));
        let lifestyle = obj.get("lifestyle");
        lift("activityLevel", lifestyle.and_then(|l| l.get("activityLevel")));

        if let Some(weight) = value.pointer("/physicalMeasurements/weight") {
            if let Some(value) = weight.get("value") {
                let unit = weight.get("unit").and_then(JsonValue::as_str).unwrap_or("kg");
                lift("weight", Some(&JsonValue::String(format!("{} {unit}", render_value(value, "")))));
            }
        }
        if let Some(height) = value.pointer("/physicalMeasurements/height") {
            lift("height", height_text(height).map(JsonValue::String).as_ref());
        }

        PatientSource::Collected(answers)
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            PatientSource::Stored(record) => Some(record.id.as_str()),
            PatientSource::Collected(answers) => answers.get("_id").map(String::as_str),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            PatientSource::Stored(record) => Some(record.profile.name.as_str()),
            PatientSource::Collected(answers) => answers.get("name").map(String::as_str),
        }
    }
}

fn height_text(height: &JsonValue) -> Option<String> {
    if let Some(cm) = height.get("cm").filter(|v| truthy(v)) {
        return Some(format!("{} cm", render_value(cm, "")));
    }
    let feet = height.get("feet").filter(|v| truthy(v))?;
    let inches = height.get("inches").map(|v| render_value(v, "0")).unwrap_or_else(|| "0".into());
    Some(format!("{}'{}\"", render_value(feet, ""), inches))
}

/// Display-safe view of a patient: every field is a non-empty string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPatient {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub prakriti: String,
    pub vikruti: String,
    pub roga: String,
    pub climate: String,
    pub agni: String,
    pub food_preferences: String,
    pub target_calories: String,
}

pub fn to_display_safe(source: &PatientSource) -> DisplayPatient {
    match source {
        PatientSource::Stored(record) => display_stored(record.id.as_str(), &record.profile),
        PatientSource::Collected(answers) => display_collected(answers),
    }
}

fn display_stored(id: &str, profile: &PatientProfile) -> DisplayPatient {
    let habits = &profile.dietary_habits;
    let prefs = &habits.food_preferences;
    let mut food = vec![prefs.temperature.to_string(), prefs.spice_level.to_string()];
    food.extend(prefs.taste.iter().map(ToString::to_string));

    let roga: Vec<&str> = profile
        .roga
        .iter()
        .map(|c| c.condition.as_str())
        .filter(|c| !c.is_empty())
        .collect();

    DisplayPatient {
        id: Some(id.to_string()),
        name: non_empty(&profile.name, "Unnamed Patient"),
        age: if profile.age > 0 {
            profile.age.to_string()
        } else {
            "Age not specified".to_string()
        },
        gender: profile.gender.to_string(),
        prakriti: profile.prakriti.to_string(),
        vikruti: profile.vikriti.to_string(),
        roga: non_empty(&roga.join(", "), "No health concerns"),
        climate: format!("{}, {}", profile.environment.climate, profile.environment.season),
        agni: habits.appetite.to_string(),
        food_preferences: food.join(", "),
        target_calories: habits.target_calories.to_string(),
    }
}

fn display_collected(answers: &BTreeMap<String, String>) -> DisplayPatient {
    let get = |key: &str, fallback: &str| {
        answers
            .get(key)
            .map(|v| non_empty(v, fallback))
            .unwrap_or_else(|| fallback.to_string())
    };
    DisplayPatient {
        id: answers.get("_id").cloned(),
        name: get("name", "Unnamed Patient"),
        age: get("age", "Age not specified"),
        gender: get("gender", "Gender not specified"),
        prakriti: get("prakriti", "Not specified"),
        vikruti: get("vikruti", "Not specified"),
        roga: get("roga", "No health concerns"),
        climate: get("climate", "Climate not specified"),
        agni: get("agni", "Appetite not specified"),
        food_preferences: get("foodPreferences", "Food preferences not specified"),
        target_calories: get("targetCalories", "Target calories not specified"),
    }
}

fn non_empty(text: &str, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Render any JSON value as a display string, `fallback` for nothing to show
pub fn render_value(value: &JsonValue, fallback: &str) -> String {
    match value {
        JsonValue::Null => fallback.to_string(),
        JsonValue::String(text) => text.clone(),
        JsonValue::Number(n) => format_number(n),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Array(items) => {
            let parts: Vec<String> = items.iter().map(render_item).collect();
            or_fallback(parts.join(", "), fallback)
        }
        JsonValue::Object(_) if is_dosha_shaped(value) => {
            let score = |key: &str| {
                value
                    .get(key)
                    .filter(|v| truthy(v))
                    .map(|v| render_value(v, "0"))
                    .unwrap_or_else(|| "0".to_string())
            };
            format!(
                "Vata: {}, Pitta: {}, Kapha: {}",
                score("vata"),
                score("pitta"),
                score("kapha")
            )
        }
        JsonValue::Object(map) => {
            let parts: Vec<String> = map
                .values()
                .filter(|v| truthy(v))
                .map(|v| render_value(v, ""))
                .filter(|s| !s.is_empty())
                .collect();
            or_fallback(parts.join(", "), fallback)
        }
    }
}

fn render_item(item: &JsonValue) -> String {
    match item {
        JsonValue::String(text) => text.clone(),
        JsonValue::Object(map) => match map.get("condition").filter(|c| truthy(c)) {
            Some(condition) => render_value(condition, ""),
            None => item.to_string(),
        },
        other => render_value(other, ""),
    }
}

fn or_fallback(text: String, fallback: &str) -> String {
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

fn is_dosha_shaped(value: &JsonValue) -> bool {
    ["vata", "pitta", "kapha"].iter().any(|k| value.get(k).is_some())
}

fn truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Integers without a decimal point, other numbers in shortest form
pub fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}
