use crate::context::PatientContext;
use crate::dosha::DoshaScores;

/// System message sent with every generation request
pub const SYSTEM_PROMPT: &str = r#"You are an expert Ayurvedic doctor and nutritionist. You create personalized Ayurvedic diet plans based on patient constitution (Prakriti), current imbalances (Vikriti), health conditions, and other factors. Always provide detailed, authentic Ayurvedic recommendations with proper explanations of Rasa, Guna, Virya, Vipaka, and Prabhava for each meal."#;

const NOT_SPECIFIED: &str = "Not specified";

/// Build the user prompt for one patient. Pure and deterministic.
pub fn build_prompt(ctx: &PatientContext) -> String {
    let dominant = ctx.dominant_prakriti();
    let imbalance = ctx.dominant_vikriti();
    let calories = ctx.calories();
    let concerns = ctx.concerns();

    let name = or_default(&ctx.name, NOT_SPECIFIED);
    let age = or_default(&ctx.age, NOT_SPECIFIED);
    let gender = or_default(&ctx.gender, NOT_SPECIFIED);
    let weight = ctx
        .weight
        .clone()
        .unwrap_or_else(|| format!("{NOT_SPECIFIED} kg"));
    let height = or_default(&ctx.height, NOT_SPECIFIED);
    let prakriti = scores_line(ctx.prakriti.as_ref(), ctx.prakriti_note.as_deref());
    let vikriti = scores_line(ctx.vikriti.as_ref(), ctx.vikriti_note.as_deref());
    let diet_type = or_default(&ctx.diet_type, "Vegetarian");
    let temperature = or_default(&ctx.food_temperature, "Warm");
    let spice = or_default(&ctx.spice_level, "Medium");
    let activity = or_default(&ctx.activity_level, "Moderately Active");
    let climate = or_default(&ctx.climate, "Tropical");
    let season = or_default(&ctx.season, "Summer");
    let agni = or_default(&ctx.agni, NOT_SPECIFIED);
    let preferences = or_default(&ctx.food_preferences, NOT_SPECIFIED);
    let dominant_key = dominant.key();

    format!(
        r#"You are Dr. Rajesh Sharma, an Ayurvedic physician with more than 25 years of practice in personalized nutrition therapy. You design practical, traditional Indian diet plans that treat specific health conditions through food.

STEP 1: PATIENT DETAILS
- Name: {name}
- Age: {age} years
- Gender: {gender}
- Weight: {weight}
- Height: {height}
- Prakriti (natural constitution): {prakriti} ({dominant} dominant)
- Vikriti (current imbalance): {vikriti} ({imbalance} current state)
- Health conditions (Roga): {concerns}
- Dietary type: {diet_type}
- Target calories: {calories} kcal/day
- Food preferences: {temperature} foods, {spice} spice level, {preferences}
- Digestive fire (Agni): {agni}
- Activity level: {activity}
- Climate: {climate}
- Season: {season}

STEP 2: CONSTITUTIONAL ANALYSIS
- Dominant Prakriti: {dominant}
- Current Vikriti: {imbalance}
- Conditions to address: {concerns}
Decide which doshas need pacification, which Rasa (tastes) and Guna (qualities) restore balance, whether heating or cooling Virya is needed, and which Vipaka supports digestion.

STEP 3: CREATE THE DIET PLAN
Use real Indian dishes that families cook every day (dal, rice, roti, sabzi, khichdi, upma, sambar, curd rice). Give explicit quantities such as "Dal Tadka (1 bowl)" or "Roti (2 pieces)". Address the health conditions through the food choices.

Return a document in exactly this shape, personalized for the patient above:

{{
  "patientInfo": {{
    "name": "{name}",
    "age": "{age}",
    "weight": "{weight}",
    "height": "{height}",
    "gender": "{gender}",
    "prakriti": "{prakriti} ({dominant} dominant constitution)",
    "dominantDosha": "{dominant_key}",
    "vikruti": "{vikriti}",
    "concerns": "{concerns}",
    "climate": "{climate} climate, {season} season",
    "agni": "Digestive fire description for a {dominant} constitution",
    "foodPreferences": "{diet_type}, prefers {temperature} foods",
    "targetCalories": "{calories} kcal/day"
  }},
  "mealPlan": {{
    "breakfast": [
      "Dish with quantities, e.g. 'Vegetable Upma (1 bowl) + Coconut Chutney (2 tbsp) + Ginger Tea (1 cup)'",
      "Calories: ~XXX kcal | Carbs: XXg | Protein: XXg | Fat: XXg",
      {{
        "Rasa": "Taste analysis and its dosha effect",
        "Guna": "Physical qualities such as Laghu (light) or Snigdha (moist)",
        "Virya": "Heating (Ushna) or cooling (Sheeta) potency",
        "Vipaka": "Post-digestive effect",
        "Dosha": "Which doshas are pacified or aggravated",
        "Prabhava": "Specific therapeutic action"
      }}
    ],
    "lunch": ["...", "Calories: ~XXX kcal | Carbs: XXXg | Protein: XXg | Fat: XXg", {{ "Rasa": "...", "Guna": "...", "Virya": "...", "Vipaka": "...", "Dosha": "...", "Prabhava": "..." }}],
    "snack": ["...", "Calories: ~XXX kcal | Carbs: XXg | Protein: Xg | Fat: Xg", {{ "Rasa": "...", "Guna": "...", "Virya": "...", "Vipaka": "...", "Dosha": "...", "Prabhava": "..." }}],
    "dinner": ["...", "Calories: ~XXX kcal | Carbs: XXg | Protein: XXg | Fat: XXg", {{ "Rasa": "...", "Guna": "...", "Virya": "...", "Vipaka": "...", "Dosha": "...", "Prabhava": "..." }}]
  }},
  "dailyTotals": {{
    "calories": "~{calories} kcal",
    "carbs": "~XXXg (55-60%)",
    "protein": "~XXg (11-12%)",
    "fat": "~XXg (20-22%)"
  }},
  "guidelines": ["Meal timings", "Water intake", "Foods to avoid", "Eating habits"],
  "herbs": ["Herb - how and when to take it"],
  "lifestyle": ["Pranayama, yoga, sleep and self-care recommendations"]
}}

CRITICAL REQUIREMENTS:
1. Only real, commonly eaten Indian food. No quinoa bowls, exotic grains or Western dishes.
2. Exact Indian measurements for every item.
3. Calorie bands: Breakfast 400-500 kcal, Lunch 600-800 kcal, Snack 150-250 kcal, Dinner 400-600 kcal. The day must total {calories} kcal.
4. Every meal carries all six properties: Rasa, Guna, Virya, Vipaka, Dosha, Prabhava.
5. Digestive complaints call for digestive spices, heat-related complaints for cooling foods, Vata aggravation for warm, moist, grounding foods.
6. Return ONLY valid JSON, with no text before or after it.

This {age}-year-old {gender_lower} patient with a {dominant} constitution and {concerns} needs a diet that corrects these imbalances through targeted food choices. Generate the complete plan now."#,
        gender_lower = gender.to_lowercase(),
    )
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}

fn scores_line(scores: Option<&DoshaScores>, note: Option<&str>) -> String {
    match (scores, note) {
        (Some(scores), _) => scores.to_string(),
        (None, Some(note)) => note.to_string(),
        (None, None) => DoshaScores::default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PatientContext {
        PatientContext {
            name: Some("Kiran".into()),
            age: Some("41".into()),
            gender: Some("Male".into()),
            prakriti: Some(DoshaScores::new(1.0, 3.0, 3.0)),
            vikriti: Some(DoshaScores::new(1.0, 2.0, 4.0)),
            conditions: vec!["Obesity".into(), "Sluggish digestion".into()],
            target_calories: Some(1600),
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_interpolates_patient() {
        let prompt = build_prompt(&context());
        assert!(prompt.contains("- Name: Kiran"));
        assert!(prompt.contains("Vata: 1, Pitta: 3, Kapha: 3 (Pitta dominant)"));
        assert!(prompt.contains("(Kapha current state)"));
        assert!(prompt.contains("Obesity, Sluggish digestion"));
        assert!(prompt.contains("must total 1600 kcal"));
        assert!(prompt.contains("\"dominantDosha\": \"pitta\""));
        assert!(prompt.contains("41-year-old male"));
    }

    #[test]
    fn test_prompt_defaults() {
        let prompt = build_prompt(&PatientContext::default());
        assert!(prompt.contains("Weight: Not specified kg"));
        assert!(prompt.contains("Dietary type: Vegetarian"));
        assert!(prompt.contains("2000 kcal/day"));
        assert!(prompt.contains("Warm foods, Medium spice level"));
        assert!(prompt.contains("Activity level: Moderately Active"));
        assert!(prompt.contains("Climate: Tropical"));
        assert!(prompt.contains("Season: Summer"));
        assert!(prompt.contains("Health conditions (Roga): General wellness"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt(&context()), build_prompt(&context()));
    }

    #[test]
    fn test_prompt_example_is_a_json_object() {
        let prompt = build_prompt(&context());
        let start = prompt.find('{').unwrap();
        let end = prompt.rfind('}').unwrap();
        let example: serde_json::Value = serde_json::from_str(&prompt[start..=end]).unwrap();
        assert!(example.get("patientInfo").is_some());
        assert_eq!(example["mealPlan"]["breakfast"].as_array().unwrap().len(), 3);
    }
}
