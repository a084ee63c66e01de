use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::display::render_value;

/// Meal slots in serving order
pub const MEAL_NAMES: [&str; 4] = ["breakfast", "lunch", "snack", "dinner"];

/// Keys of the per-meal Ayurvedic property map
pub const PROPERTY_KEYS: [&str; 6] = ["Rasa", "Guna", "Virya", "Vipaka", "Dosha", "Prabhava"];

const PLACEHOLDER_NUTRITION: &str = "Calories: Calculating...";
const AI_FAILED: &str = "AI processing failed - using fallback";
const MISSING_DATA: &str = "Missing AI data";
const STRUCTURE_ERROR: &str = "Data structure error";

/// Where a plan came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    #[default]
    Live,
    Fixture,
    Fallback,
}

impl PlanSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanSource::Live => "live",
            PlanSource::Fixture => "fixture",
            PlanSource::Fallback => "fallback",
        }
    }
}

/// Patient facts echoed into the plan as display strings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prakriti: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_dosha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vikruti: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concerns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_preferences: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_calories: Option<String>,
}

/// The six descriptors attached to every meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AyurvedicProperties {
    #[serde(rename = "Rasa")]
    pub rasa: String,
    #[serde(rename = "Guna")]
    pub guna: String,
    #[serde(rename = "Virya")]
    pub virya: String,
    #[serde(rename = "Vipaka")]
    pub vipaka: String,
    #[serde(rename = "Dosha")]
    pub dosha: String,
    #[serde(rename = "Prabhava")]
    pub prabhava: String,
}

impl AyurvedicProperties {
    pub fn new(
        rasa: &str,
        guna: &str,
        virya: &str,
        vipaka: &str,
        dosha: &str,
        prabhava: &str,
    ) -> Self {
        Self {
            rasa: rasa.to_string(),
            guna: guna.to_string(),
            virya: virya.to_string(),
            vipaka: vipaka.to_string(),
            dosha: dosha.to_string(),
            prabhava: prabhava.to_string(),
        }
    }

    /// Label/value pairs in canonical order
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("Rasa", &self.rasa),
            ("Guna", &self.guna),
            ("Virya", &self.virya),
            ("Vipaka", &self.vipaka),
            ("Dosha", &self.dosha),
            ("Prabhava", &self.prabhava),
        ]
    }
}

/// A meal, serialized as the triple `[description, nutrition, properties]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal(pub String, pub String, pub AyurvedicProperties);

impl Meal {
    pub fn new(description: &str, nutrition: &str, properties: AyurvedicProperties) -> Self {
        Self(description.to_string(), nutrition.to_string(), properties)
    }

    pub fn description(&self) -> &str {
        &self.0
    }

    pub fn nutrition(&self) -> &str {
        &self.1
    }

    pub fn properties(&self) -> &AyurvedicProperties {
        &self.2
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlan {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub snack: Meal,
    pub dinner: Meal,
}

impl MealPlan {
    pub fn meals(&self) -> [(&'static str, &Meal); 4] {
        [
            ("breakfast", &self.breakfast),
            ("lunch", &self.lunch),
            ("snack", &self.snack),
            ("dinner", &self.dinner),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyTotals {
    pub calories: String,
    pub carbs: String,
    pub protein: String,
    pub fat: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Micronutrients {
    pub vitamins: String,
    pub minerals: String,
    pub special: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dish {
    pub name: String,
    pub ingredients: Vec<String>,
    pub method: Vec<String>,
}

/// Preparation notes for one meal slot
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub method: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dishes: Vec<Dish>,
    pub ayurvedic_benefit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipes {
    pub breakfast: Recipe,
    pub lunch: Recipe,
    pub snack: Recipe,
    pub dinner: Recipe,
}

impl Recipes {
    pub fn entries(&self) -> [(&'static str, &Recipe); 4] {
        [
            ("breakfast", &self.breakfast),
            ("lunch", &self.lunch),
            ("snack", &self.snack),
            ("dinner", &self.dinner),
        ]
    }
}

/// A generated diet plan. Ephemeral: returned to the caller, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub patient_info: PatientInfo,
    pub meal_plan: MealPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_totals: Option<DailyTotals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub micronutrients: Option<Micronutrients>,
    #[serde(default)]
    pub guidelines: Vec<String>,
    #[serde(default)]
    pub herbs: Vec<String>,
    #[serde(default)]
    pub lifestyle: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipes: Option<Recipes>,
    #[serde(default)]
    pub source: PlanSource,
}

impl DietPlan {
    /// Build a plan from an already repaired document.
    ///
    /// The optional sections are decoded leniently: a malformed
    /// `dailyTotals`, `micronutrients` or `recipes` is dropped instead of
    /// failing the whole plan.
    pub fn from_repaired(value: JsonValue) -> Result<Self, serde_json::Error> {
        let mut map = match value {
            JsonValue::Object(map) => map,
            other => return serde_json::from_value(other),
        };

        let daily_totals = map.remove("dailyTotals");
        let micronutrients = map.remove("micronutrients");
        let recipes = map.remove("recipes");

        let mut plan: DietPlan = serde_json::from_value(JsonValue::Object(map))?;
        plan.daily_totals = daily_totals.and_then(|v| serde_json::from_value(v).ok());
        plan.micronutrients = micronutrients.and_then(|v| serde_json::from_value(v).ok());
        plan.recipes = recipes.and_then(|v| serde_json::from_value(v).ok());
        Ok(plan)
    }
}

/// Force an arbitrary document into the diet-plan shape.
///
/// Total and idempotent. Every meal ends up as a three-slot array of
/// `[string, string, {six string properties}]`, the patient info becomes a
/// map of strings and the three advice lists become string arrays.
pub fn repair(plan: JsonValue) -> JsonValue {
    let mut root = match plan {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    };

    let mut meals = match root.remove("mealPlan") {
        Some(JsonValue::Object(map)) => map,
        _ => Map::new(),
    };
    for name in MEAL_NAMES {
        let repaired = repair_meal(name, meals.remove(name));
        meals.insert(name.to_string(), repaired);
    }
    root.insert("mealPlan".to_string(), JsonValue::Object(meals));

    let info: Map<String, JsonValue> = match root.remove("patientInfo") {
        Some(JsonValue::Object(map)) => map
            .into_iter()
            .map(|(k, v)| {
                let text = render_value(&v, "Not specified");
                (k, JsonValue::String(text))
            })
            .collect(),
        _ => Map::new(),
    };
    root.insert("patientInfo".to_string(), JsonValue::Object(info));

    for key in ["guidelines", "herbs", "lifestyle"] {
        let items = repair_list(root.remove(key));
        root.insert(key.to_string(), JsonValue::Array(items));
    }

    JsonValue::Object(root)
}

fn repair_list(value: Option<JsonValue>) -> Vec<JsonValue> {
    match value {
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| JsonValue::String(render_value(item, "")))
            .collect(),
        Some(JsonValue::String(text)) if !text.is_empty() => vec![JsonValue::String(text)],
        _ => Vec::new(),
    }
}

fn repair_meal(name: &str, value: Option<JsonValue>) -> JsonValue {
    let mut slots = match value {
        Some(JsonValue::Array(slots)) if !slots.is_empty() => slots,
        _ => {
            return JsonValue::Array(vec![
                JsonValue::String(format!("AI-generated {name} recommendation")),
                JsonValue::String(PLACEHOLDER_NUTRITION.to_string()),
                uniform_properties(AI_FAILED),
            ]);
        }
    };

    slots.truncate(3);
    if slots.len() == 1 {
        slots.push(JsonValue::String(PLACEHOLDER_NUTRITION.to_string()));
    }
    if slots.len() == 2 {
        slots.push(uniform_properties(MISSING_DATA));
    }

    for slot in slots.iter_mut().take(2) {
        if !slot.is_string() {
            *slot = JsonValue::String(render_value(slot, "Not specified"));
        }
    }

    slots[2] = match slots[2].take() {
        JsonValue::Object(props) => repair_properties(props),
        _ => uniform_properties(STRUCTURE_ERROR),
    };

    JsonValue::Array(slots)
}

fn repair_properties(mut props: Map<String, JsonValue>) -> JsonValue {
    for key in PROPERTY_KEYS {
        let repaired = match props.remove(key) {
            Some(JsonValue::String(text)) => JsonValue::String(text),
            Some(other) => JsonValue::String(render_value(&other, MISSING_DATA)),
            None => JsonValue::String(MISSING_DATA.to_string()),
        };
        props.insert(key.to_string(), repaired);
    }
    JsonValue::Object(props)
}

fn uniform_properties(text: &str) -> JsonValue {
    JsonValue::Object(
        PROPERTY_KEYS
            .iter()
            .map(|k| (k.to_string(), JsonValue::String(text.to_string())))
            .collect(),
    )
}
