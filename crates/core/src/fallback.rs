//! Deterministic local plan used whenever live generation cannot produce one.

use crate::context::PatientContext;
use crate::dosha::Dosha;
use crate::plan::{AyurvedicProperties, DietPlan, Meal, MealPlan, PatientInfo, PlanSource};

const MAX_HERBS: usize = 6;

/// Items per meal slot: breakfast, lunch, snack, dinner
type DayMenu = [&'static [&'static str]; 4];

static VATA_MENUS: [DayMenu; 3] = [
    [
        &["Warm oatmeal with ghee and dates", "Herbal tea (ginger, cinnamon)", "Soaked almonds (5-7)"],
        &["Dal (moong/masoor) with cumin", "Brown rice", "Steamed vegetables", "Buttermilk"],
        &["Warm milk with turmeric", "Seasonal fruits (banana, mango)"],
        &["Vegetable soup", "Roti with ghee", "Cooked root vegetables"],
    ],
    [
        &["Warm rice porridge with ghee", "Cardamom tea", "Dates and figs (3-4)"],
        &["Khichdi with vegetables", "Sweet lassi", "Cooked spinach"],
        &["Warm almond milk with honey", "Stewed apples with cinnamon"],
        &["Mung dal soup", "Chapati with ghee", "Sautéed beetroot and carrots"],
    ],
    [
        &["Warm semolina upma with nuts", "Ginger-honey tea", "Soaked walnuts (4-5)"],
        &["Basmati rice with ghee", "Yellow dal with hing", "Warm buttermilk", "Cooked okra"],
        &["Golden milk (turmeric latte)", "Sweet bananas"],
        &["Vegetable broth with herbs", "Soft roti", "Steamed pumpkin and sweet potato"],
    ],
];

static PITTA_MENUS: [DayMenu; 3] = [
    [
        &["Oatmeal with coconut", "Fresh mint tea", "Sweet fruits (grapes, pears)"],
        &["Basmati rice", "Yellow moong dal", "Cucumber raita", "Coconut water"],
        &["Fresh fruit juice", "Fennel tea"],
        &["Light khichdi", "Steamed vegetables", "Herbal tea (fennel, coriander)"],
    ],
    [
        &["Coconut rice kheer (cool)", "Rose water tea", "Sweet melons and grapes"],
        &["Coriander rice", "Cucumber and mint salad", "Coconut dal", "Fresh lime water"],
        &["Pomegranate juice", "Sweet pears"],
        &["Lauki soup", "Soft phulka", "Steamed broccoli and cauliflower"],
    ],
    [
        &["Barley porridge with coconut milk", "Hibiscus tea", "Sweet berries"],
        &["Rice with ghee", "Mint and coriander chutney", "Buttermilk", "Tinda sabzi"],
        &["Aloe vera juice", "Sweet apples"],
        &["Clear vegetable broth", "Rice flakes poha", "Steamed zucchini"],
    ],
];

static KAPHA_MENUS: [DayMenu; 3] = [
    [
        &["Light vegetable upma", "Ginger tea", "Warm spiced water"],
        &["Millet roti", "Steamed leafy greens", "Spiced dal", "Warm water"],
        &["Herbal tea (tulsi, ginger)", "Light fruits (apple, pear)"],
        &["Light vegetable soup", "Small portion of roti", "Steamed vegetables with spices"],
    ],
    [
        &["Spiced daliya with vegetables", "Cinnamon-clove tea", "Warm lemon water"],
        &["Bajra with mustard greens", "Spicy lentil curry", "Bitter gourd stir-fry"],
        &["Turmeric-ginger tea", "Roasted chana", "Green apples"],
        &["Spicy vegetable broth", "Small ragi roti", "Cabbage and radish sabzi"],
    ],
    [
        &["Besan cheela", "Black pepper tea", "Warm water with lemon"],
        &["Jowar roti", "Toor dal with mustard seeds", "Cumin water", "Spiced cauliflower"],
        &["Dry ginger tea", "Roasted pumpkin seeds"],
        &["Clear spicy soup", "Ragi roti (small)", "Spiced green beans and carrots"],
    ],
];

/// Share of the daily target per meal slot, in percent
const MEAL_SHARES: [u32; 4] = [25, 35, 10, 30];

fn menus(dosha: Dosha) -> &'static [DayMenu; 3] {
    match dosha {
        Dosha::Vata => &VATA_MENUS,
        Dosha::Pitta => &PITTA_MENUS,
        Dosha::Kapha => &KAPHA_MENUS,
    }
}

fn properties(dosha: Dosha) -> AyurvedicProperties {
    match dosha {
        Dosha::Vata => AyurvedicProperties::new(
            "Sweet, sour, salty (grounding for Vata)",
            "Guru, Snigdha (heavy, moist)",
            "Ushna (warming)",
            "Sweet (nourishing)",
            "Pacifies Vata",
            "Grounds the body and calms the nervous system",
        ),
        Dosha::Pitta => AyurvedicProperties::new(
            "Sweet, bitter, astringent (cooling for Pitta)",
            "Laghu, Snigdha (light, moist)",
            "Sheeta (cooling)",
            "Sweet (soothing)",
            "Pacifies Pitta",
            "Reduces internal heat and inflammation",
        ),
        Dosha::Kapha => AyurvedicProperties::new(
            "Pungent, bitter, astringent (lightening for Kapha)",
            "Laghu, Ruksha (light, dry)",
            "Ushna (warming)",
            "Pungent (stimulating)",
            "Pacifies Kapha",
            "Kindles Agni and reduces heaviness",
        ),
    }
}

fn guidelines(dosha: Dosha) -> &'static [&'static str] {
    match dosha {
        Dosha::Vata => &[
            "Eat warm, cooked foods",
            "Regular meal times are crucial",
            "Favor sweet, sour, and salty tastes",
            "Avoid cold drinks and raw foods",
            "Include healthy fats like ghee and oils",
        ],
        Dosha::Pitta => &[
            "Eat cooling and fresh foods",
            "Avoid spicy, sour, and salty foods",
            "Favor sweet, bitter, and astringent tastes",
            "Drink cool (not ice-cold) water",
            "Eat at regular intervals, don't skip meals",
        ],
        Dosha::Kapha => &[
            "Eat light, warm, and dry foods",
            "Favor pungent, bitter, and astringent tastes",
            "Avoid heavy, oily, and sweet foods",
            "Drink warm water throughout the day",
            "Eat smaller portions, avoid overeating",
        ],
    }
}

fn base_herbs(dosha: Dosha) -> &'static [&'static str] {
    match dosha {
        Dosha::Vata => &["Ashwagandha", "Brahmi", "Jatamansi", "Shatavari"],
        Dosha::Pitta => &["Amalaki", "Neem", "Aloe Vera", "Coriander"],
        Dosha::Kapha => &["Trikatu", "Guggulu", "Turmeric", "Ginger"],
    }
}

const GAS_HERBS: &[&str] = &["Hing (Asafoetida)", "Jeera (Cumin)", "Ajwain"];
const HEAT_HERBS: &[&str] = &["Amalaki", "Fennel", "Mint", "Coriander"];

fn lifestyle_tips(dosha: Dosha) -> &'static [&'static str] {
    match dosha {
        Dosha::Vata => &[
            "Maintain regular sleep schedule (10 PM - 6 AM)",
            "Practice gentle yoga and meditation",
            "Avoid excessive physical or mental stress",
            "Self-massage with warm sesame oil",
        ],
        Dosha::Pitta => &[
            "Avoid excessive heat and sun exposure",
            "Practice cooling pranayama",
            "Engage in moderate exercise",
            "Maintain work-life balance",
        ],
        Dosha::Kapha => &[
            "Wake up early (before 6 AM)",
            "Engage in vigorous exercise",
            "Practice heating pranayama",
            "Avoid daytime sleeping",
        ],
    }
}

/// Dosha herbs first, then concern-specific ones, at most six in total
pub fn herbs_for(dosha: Dosha, concerns: &str) -> Vec<String> {
    let lower = concerns.to_lowercase();
    let mut herbs: Vec<&str> = base_herbs(dosha).to_vec();
    if lower.contains("gas") {
        herbs.extend_from_slice(GAS_HERBS);
    }
    if lower.contains("heat") {
        herbs.extend_from_slice(HEAT_HERBS);
    }
    herbs.truncate(MAX_HERBS);
    herbs.into_iter().map(str::to_string).collect()
}

/// Build the local plan. `variation` rotates through the per-dosha menus.
pub fn fallback_plan(ctx: &PatientContext, variation: usize) -> DietPlan {
    let dosha = ctx.dominant_vikriti();
    let menu = &menus(dosha)[variation % 3];
    let calories = ctx.calories();
    let props = properties(dosha);

    let meal = |slot: usize| {
        let share = u64::from(calories) * u64::from(MEAL_SHARES[slot]) / 100;
        Meal::new(
            &menu[slot].join(" + "),
            &format!("Calories: ~{share} kcal"),
            props.clone(),
        )
    };

    let concerns = ctx.concerns();
    let or = |value: &Option<String>, default: &str| {
        Some(value.clone().unwrap_or_else(|| default.to_string()))
    };

    DietPlan {
        patient_info: PatientInfo {
            name: ctx.name.clone(),
            age: or(&ctx.age, "Not specified"),
            weight: or(&ctx.weight, "Not specified"),
            height: or(&ctx.height, "Not specified"),
            gender: or(&ctx.gender, "Not specified"),
            prakriti: Some(
                ctx.prakriti
                    .map(|p| p.to_string())
                    .or_else(|| ctx.prakriti_note.clone())
                    .unwrap_or_else(|| "Balanced constitution".to_string()),
            ),
            dominant_dosha: Some(dosha.key().to_string()),
            vikruti: ctx
                .vikriti
                .map(|v| v.to_string())
                .or_else(|| ctx.vikriti_note.clone()),
            concerns: Some(concerns.clone()),
            climate: or(&ctx.climate, "Moderate climate"),
            agni: or(&ctx.agni, "Normal digestive capacity"),
            food_preferences: or(&ctx.food_preferences, "No specific preferences mentioned"),
            target_calories: Some(format!("{calories} kcal/day")),
        },
        meal_plan: MealPlan {
            breakfast: meal(0),
            lunch: meal(1),
            snack: meal(2),
            dinner: meal(3),
        },
        daily_totals: None,
        micronutrients: None,
        guidelines: guidelines(dosha).iter().map(|s| s.to_string()).collect(),
        herbs: herbs_for(dosha, &concerns),
        lifestyle: lifestyle_tips(dosha).iter().map(|s| s.to_string()).collect(),
        recipes: None,
        source: PlanSource::Fallback,
    }
}
