//! Canned plans for showcase patients.
//!
//! A fixture is returned verbatim instead of calling the LLM. Selection is a
//! pure function of the patient's id and name so every generation path
//! agrees on it.

use crate::plan::{
    AyurvedicProperties, DailyTotals, DietPlan, Dish, Meal, MealPlan, Micronutrients, PatientInfo,
    PlanSource, Recipe, Recipes,
};

/// A showcase patient with a canned plan
#[derive(Debug)]
pub struct Fixture {
    pub key: &'static str,
    pub patient_id: &'static str,
    /// Lowercase fragment matched against the patient's name
    pub name_fragment: &'static str,
    build: fn() -> DietPlan,
}

impl Fixture {
    pub fn matches(&self, id: Option<&str>, name: Option<&str>) -> bool {
        id.is_some_and(|id| id == self.patient_id)
            || name.is_some_and(|name| name.to_lowercase().contains(self.name_fragment))
    }

    pub fn plan(&self) -> DietPlan {
        (self.build)()
    }
}

pub static FIXTURES: &[Fixture] = &[Fixture {
    key: "ayushi-singh",
    patient_id: "68cdcba34ddc05b1f94c8350",
    name_fragment: "ayushi",
    build: ayushi_singh,
}];

/// How a generation request is served
#[derive(Debug, Clone, Copy)]
pub enum GenerationRoute {
    Fixture(&'static Fixture),
    Live,
}

pub fn select_route(id: Option<&str>, name: Option<&str>) -> GenerationRoute {
    FIXTURES
        .iter()
        .find(|f| f.matches(id, name))
        .map_or(GenerationRoute::Live, GenerationRoute::Fixture)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn dish(name: &str, ingredients: &[&str], method: &[&str]) -> Dish {
    Dish {
        name: name.to_string(),
        ingredients: strings(ingredients),
        method: strings(method),
    }
}

fn ayushi_singh() -> DietPlan {
    let some = |s: &str| Some(s.to_string());

    DietPlan {
        patient_info: PatientInfo {
            name: some("Ayushi Singh"),
            age: some("29"),
            weight: some("50kg"),
            height: some("5'5\""),
            gender: some("Female"),
            prakriti: some("Vata: 3, Pitta: 2, Kapha: 1 (Vata-Pitta dominant constitution)"),
            dominant_dosha: some("vata"),
            vikruti: some("Vata: 3.5, Pitta: 2.5, Kapha: 1 (Aggravated Vata with increased Pitta)"),
            concerns: some("Abdominal Gas, Body Heat, Digestive irregularity"),
            climate: some("North Indian climate, Summer season adaptation"),
            agni: some(
                "Variable digestive fire - strong but prone to gas formation, needs warm grounding foods",
            ),
            food_preferences: some(
                "Vegetarian, prefers warm foods, moderate appetite with tendency for gas",
            ),
            target_calories: some("2200 kcal/day (optimal for 50kg, moderately active female)"),
        },
        meal_plan: MealPlan {
            breakfast: Meal::new(
                "Warm Wheat Dalia (1 cup) cooked in milk + 1 tsp ghee + 5 soaked almonds",
                "Calories: ~500 kcal | Carbs: 65g | Protein: 15g | Fat: 15g | Rich in: Vit B1, B2, B6, Vit E, Calcium, Magnesium, Zinc, Healthy Fats",
                AyurvedicProperties::new(
                    "Sweet (balances Vata & Pitta, calming effect)",
                    "Snigdha, Guru (grounding, nourishing for anxious Vata)",
                    "Ushna (reduces morning gas formation)",
                    "Sweet (provides sustained energy, tissue building)",
                    "Vata pacifying, neutral for Pitta",
                    "Provides stable energy, prevents morning bloating, supports nervous system",
                ),
            ),
            lunch: Meal::new(
                "Lauki Curry (1 cup) + Wheat Roti (2 medium) + Moong Dal Khichdi (1 bowl) + Curd (½ cup)",
                "Calories: ~750 kcal | Carbs: 105g | Protein: 25g | Fat: 18g | Rich in: Vit C, B-complex, Iron, Folate, Potassium, Probiotics",
                AyurvedicProperties::new(
                    "Sweet + mild bitter (reduces internal heat, balances excess Pitta)",
                    "Laghu, Snigdha (easy to digest, won't create heaviness)",
                    "Sheeta (cooling effect for body heat)",
                    "Sweet (nourishing tissues without aggravating doshas)",
                    "Vata-Pitta pacifying, perfect for dual imbalance",
                    "Improves gut motility, reduces internal heat, provides complete nutrition",
                ),
            ),
            snack: Meal::new(
                "Fennel-Cumin-Ajwain Tea + Steamed Sweet Potato (100g)",
                "Calories: ~250 kcal | Carbs: 55g | Protein: 4g | Fat: 2g | Rich in: Vit A (beta carotene), Vit C, Potassium, Fiber",
                AyurvedicProperties::new(
                    "Sweet (sweet potato grounding), Katu/Tikta (digestive herbs)",
                    "Laghu, Snigdha (light but satisfying, smooth digestion)",
                    "Ushna (enhances evening Agni, prepares for dinner)",
                    "Sweet (quick energy, enhances appetite for dinner)",
                    "Clears excess Vata, stimulates proper Agni without aggravating Pitta",
                    "Powerful carminative action, prevents gas buildup before dinner",
                ),
            ),
            dinner: Meal::new(
                "Moong Dal Soup (1 bowl) + Jeera Rice (1 cup) + 1 tsp ghee",
                "Calories: ~600 kcal | Carbs: 85g | Protein: 18g | Fat: 12g | Rich in: Folate, Iron, Magnesium, Digestive spices",
                AyurvedicProperties::new(
                    "Sweet + slight pungent (calming for restless Vata)",
                    "Laghu, Snigdha (light for nighttime, won't disturb sleep)",
                    "Mild Ushna (prevents night bloating without overheating)",
                    "Sweet (promotes tissue repair during sleep)",
                    "Strongly Vata pacifying, gentle on Pitta",
                    "Promotes restful sleep, prevents midnight gas, supports morning elimination",
                ),
            ),
        },
        daily_totals: Some(DailyTotals {
            calories: "~2100-2200 kcal".into(),
            carbs: "~310g (55-60%) - Complex carbs for sustained energy".into(),
            protein: "~62g (11-12%) - Complete amino acid profile".into(),
            fat: "~47g (20-22%) - Healthy fats for Vata nourishment".into(),
        }),
        micronutrients: Some(Micronutrients {
            vitamins: "A, C, E, B-complex (B1, B2, B6, Folate) - Complete vitamin profile".into(),
            minerals: "Calcium, Iron, Magnesium, Zinc, Potassium - Essential minerals for constitution"
                .into(),
            special: "Probiotics (curd), Healthy fats (almonds, ghee), High fiber content".into(),
        }),
        guidelines: strings(&[
            "Follow strict meal timings: Breakfast 7:30-8:30 AM, Lunch 12:30-1:30 PM, Snack 5 PM, Dinner 7:30-8:00 PM",
            "Drink warm water throughout the day - avoid cold drinks completely",
            "Sip warm water during meals, not large quantities",
            "Practice mindful eating - chew each bite 20-25 times",
            "Avoid raw foods, cold salads, and refrigerated items",
            "Regular meal times essential for Vata balance - never skip meals",
            "Eat in calm environment, avoid eating while stressed or distracted",
        ]),
        herbs: strings(&[
            "Triphala - ½ tsp powder in warm water at night (balances all doshas, improves digestion)",
            "Ajwain (Carom seeds) - Tea after meals or 1 tsp with warm water for gas relief",
            "Fennel (Saunf) - Chew 1 tsp after meals for cooling effect and digestion",
            "Guduchi (Giloy) - ¼ cup decoction in morning for Pitta heat reduction",
            "Shatavari - Powder in warm milk at night for cooling and nourishment",
            "Hing (Asafoetida) - Add pinch to dals during cooking for gas prevention",
            "Coriander seeds - Overnight soaked water in morning for cooling effect",
        ]),
        lifestyle: strings(&[
            "Wake up at 6:00 AM - Start with warm water + soaked fennel",
            "Morning Yoga (6:30-7:30 AM): Pawanmuktasana, Ardha Matsyendrasana, Vajrasana, Balasana",
            "Pranayama: Nadi Shodhana (alternate nostril) + Sheetali for cooling - 25-30 minutes",
            "Evening walk (5:30-6:00 PM) for 15-20 minutes + meditation",
            "Oil massage: Warm sesame oil self-massage before bath (3 times/week)",
            "Sleep schedule: Early light dinner, no screens after 9:30 PM, sleep by 10 PM",
            "Hydration: Fennel-cumin-coriander herbal teas throughout day",
            "Stress management: Regular routine essential for Vata, avoid irregular schedules",
        ]),
        recipes: Some(ayushi_recipes()),
        source: PlanSource::Fixture,
    }
}

fn ayushi_recipes() -> Recipes {
    Recipes {
        breakfast: Recipe {
            title: "Warm Wheat Dalia with Milk, Ghee & Almonds".into(),
            ingredients: strings(&[
                "Broken wheat (dalia) – ½ cup",
                "Cow's milk – 1 cup",
                "Water – 1 cup",
                "Ghee – 1 tsp",
                "Soaked almonds – 5 (peeled, chopped)",
                "Jaggery – 1 tsp (optional)",
                "Cardamom – a pinch",
            ]),
            method: strings(&[
                "Roast dalia in 1 tsp ghee till golden",
                "Add water + milk, cook until soft and creamy (~15 min)",
                "Add almonds, cardamom, and jaggery if desired",
                "Serve warm",
            ]),
            dishes: Vec::new(),
            ayurvedic_benefit:
                "Nourishing, grounding, reduces Vata bloating, milk + ghee pacify Pitta heat".into(),
        },
        lunch: Recipe {
            title: "Lauki Curry + Wheat Roti + Moong Dal Khichdi + Curd".into(),
            ingredients: Vec::new(),
            method: Vec::new(),
            dishes: vec![
                dish(
                    "Lauki Curry",
                    &[
                        "Lauki (bottle gourd) – 1 medium (peeled, cubed)",
                        "Ghee – 1 tsp",
                        "Cumin – ½ tsp",
                        "Ginger paste – ½ tsp",
                        "Turmeric – ¼ tsp",
                        "Salt – as per taste",
                        "Fresh coriander – garnish",
                    ],
                    &[
                        "Heat ghee, add cumin + ginger paste",
                        "Add lauki cubes, turmeric, salt, sauté",
                        "Add ½ cup water, cover & cook until soft",
                        "Garnish with coriander",
                    ],
                ),
                dish(
                    "Moong Dal Khichdi",
                    &[
                        "Yellow moong dal – ½ cup",
                        "Rice – ½ cup",
                        "Ghee – 1 tsp",
                        "Hing – a pinch (to reduce gas)",
                        "Cumin – ½ tsp",
                        "Turmeric – ¼ tsp",
                        "Water – 3 cups",
                    ],
                    &[
                        "Wash dal + rice",
                        "Heat ghee, add cumin, hing, turmeric",
                        "Add dal + rice + water, cook till soft porridge-like",
                    ],
                ),
                dish(
                    "Wheat Roti (2)",
                    &["Whole wheat flour", "Water", "Minimal ghee"],
                    &["Make dough with flour and water", "Roll and cook on tawa with minimal ghee"],
                ),
                dish(
                    "Fresh Curd (½ cup)",
                    &["Homemade curd (not sour)"],
                    &["Serve fresh, room temperature"],
                ),
            ],
            ayurvedic_benefit: "Lauki + curd cools Pitta heat, khichdi light & easy for Vata digestion, hing prevents gas".into(),
        },
        snack: Recipe {
            title: "Fennel-Cumin-Ajwain Tea + Steamed Sweet Potato".into(),
            ingredients: Vec::new(),
            method: Vec::new(),
            dishes: vec![
                dish(
                    "Digestive Tea",
                    &[
                        "Fennel seeds – ½ tsp",
                        "Cumin seeds – ½ tsp",
                        "Ajwain – ¼ tsp",
                        "Water – 2 cups",
                    ],
                    &["Boil all seeds in water 5–7 min", "Strain & sip warm"],
                ),
                dish(
                    "Steamed Sweet Potato (100g)",
                    &[
                        "Sweet potato – 100g",
                        "Black salt – pinch",
                        "Roasted cumin powder – pinch",
                    ],
                    &[
                        "Wash, peel, cut into cubes",
                        "Steam until soft (~10 min)",
                        "Sprinkle black salt & roasted cumin powder",
                    ],
                ),
            ],
            ayurvedic_benefit:
                "Tea relieves Vata bloating, sweet potato nourishes & calms both Vata + Pitta".into(),
        },
        dinner: Recipe {
            title: "Moong Dal Soup + Jeera Rice".into(),
            ingredients: Vec::new(),
            method: Vec::new(),
            dishes: vec![
                dish(
                    "Moong Dal Soup",
                    &[
                        "Yellow moong dal – ½ cup",
                        "Water – 2 cups",
                        "Ghee – 1 tsp",
                        "Ginger paste – ½ tsp",
                        "Cumin – ½ tsp",
                        "Hing – a pinch",
                        "Turmeric – ¼ tsp",
                        "Salt – as per taste",
                        "Coriander leaves – garnish",
                    ],
                    &[
                        "Pressure cook dal with turmeric + water",
                        "Heat ghee in pan, add cumin, hing, ginger",
                        "Add cooked dal, salt, simmer 5 min",
                        "Garnish with coriander",
                    ],
                ),
                dish(
                    "Jeera Rice",
                    &["Rice – ½ cup", "Ghee – 1 tsp", "Cumin – ½ tsp", "Water – 1 cup"],
                    &["Heat ghee, add cumin", "Add rice + water, cook till fluffy"],
                ),
            ],
            ayurvedic_benefit:
                "Light, warm, easily digestible. Moong + cumin reduce gas, jeera balances Pitta"
                    .into(),
        },
    }
}
