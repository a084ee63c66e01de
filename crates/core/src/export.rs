use chrono::NaiveDate;
use std::fmt::Write;

use crate::plan::{DietPlan, Meal, Recipe};

const RULE: &str = "===============================================================";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Plain-text rendering of a plan for download
pub fn plan_to_text(plan: &DietPlan, date: NaiveDate) -> String {
    let info = &plan.patient_info;
    let field = |value: &Option<String>| value.as_deref().unwrap_or("Not specified").to_string();

    let mut out = String::new();
    let _ = writeln!(out, "PERSONALIZED AYURVEDIC DIET PLAN");
    let _ = writeln!(out, "Generated on: {}", date.format(DATE_FORMAT));
    let _ = writeln!(out);
    let _ = writeln!(out, "PATIENT INFORMATION:");
    let _ = writeln!(out, "====================");
    let _ = writeln!(out, "Name: {}", info.name.as_deref().unwrap_or("Patient"));
    let _ = writeln!(out, "Age: {}", field(&info.age));
    let _ = writeln!(out, "Weight: {}", field(&info.weight));
    let _ = writeln!(out, "Height: {}", field(&info.height));
    let _ = writeln!(out, "Gender: {}", field(&info.gender));
    let _ = writeln!(out, "Prakriti: {}", field(&info.prakriti));
    let _ = writeln!(out, "Dominant Dosha: {}", field(&info.dominant_dosha).to_uppercase());
    let _ = writeln!(out, "Vikruti: {}", field(&info.vikruti));
    let _ = writeln!(out, "Health Concerns: {}", field(&info.concerns));
    let _ = writeln!(out, "Target Calories: {}", field(&info.target_calories));
    let _ = writeln!(out);
    let _ = writeln!(out, "DAILY MEAL PLAN:");
    let _ = writeln!(out, "================");
    for (name, meal) in plan.meal_plan.meals() {
        let _ = writeln!(out, "{}:", name.to_uppercase());
        write_meal(&mut out, meal);
        let _ = writeln!(out);
    }

    write_list(&mut out, "DIETARY GUIDELINES:", &plan.guidelines);
    write_list(&mut out, "RECOMMENDED HERBS:", &plan.herbs);
    write_list(&mut out, "LIFESTYLE RECOMMENDATIONS:", &plan.lifestyle);

    let _ = write!(
        out,
        "Note: This diet plan is generated based on Ayurvedic principles. \
         Please consult with a qualified Ayurvedic practitioner for personalized advice."
    );
    out
}

/// Plain-text rendering of the plan's recipes
pub fn recipes_to_text(plan: &DietPlan, date: NaiveDate) -> String {
    let info = &plan.patient_info;
    let name = info.name.as_deref().unwrap_or("Patient");

    let mut out = String::new();
    let Some(recipes) = &plan.recipes else {
        let _ = writeln!(out, "AYURVEDIC RECIPES");
        let _ = writeln!(out, "Generated on: {}", date.format(DATE_FORMAT));
        let _ = writeln!(out);
        let _ = writeln!(out, "Patient: {name}");
        let _ = writeln!(out);
        let _ = writeln!(out, "No detailed recipes available for this diet plan.");
        let _ = write!(out, "Please refer to the main diet plan for food suggestions.");
        return out;
    };

    let _ = writeln!(out, "AYURVEDIC RECIPES FOR {}", name.to_uppercase());
    let _ = writeln!(out, "Generated on: {}", date.format(DATE_FORMAT));
    let _ = writeln!(out);
    if let Some(prakriti) = &info.prakriti {
        let _ = writeln!(out, "Constitution: {prakriti}");
    }
    if let Some(concerns) = &info.concerns {
        let _ = writeln!(out, "Health Concerns: {concerns}");
    }
    if let Some(target) = &info.target_calories {
        let _ = writeln!(out, "Target: {target}");
    }

    for (slot, recipe) in recipes.entries() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out);
        let _ = writeln!(out, "{} RECIPE: {}", slot.to_uppercase(), recipe.title);
        write_recipe(&mut out, recipe);
    }
    let _ = writeln!(out);
    let _ = write!(out, "{RULE}");
    out
}

fn write_meal(out: &mut String, meal: &Meal) {
    let _ = writeln!(out, "• {}", meal.description());
    let _ = writeln!(out, "• {}", meal.nutrition());
    for (label, value) in meal.properties().entries() {
        let _ = writeln!(out, "• {label}: {value}");
    }
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
    for item in items {
        let _ = writeln!(out, "• {item}");
    }
    let _ = writeln!(out);
}

fn write_recipe(out: &mut String, recipe: &Recipe) {
    write_steps(out, &recipe.ingredients, &recipe.method);
    for dish in &recipe.dishes {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- {} ---", dish.name.to_uppercase());
        write_steps(out, &dish.ingredients, &dish.method);
    }
    if !recipe.ayurvedic_benefit.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "AYURVEDIC BENEFIT:");
        let _ = writeln!(out, "{}", recipe.ayurvedic_benefit);
    }
}

fn write_steps(out: &mut String, ingredients: &[String], method: &[String]) {
    if !ingredients.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "INGREDIENTS:");
        for item in ingredients {
            let _ = writeln!(out, "• {item}");
        }
    }
    if !method.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "METHOD:");
        for (i, step) in method.iter().enumerate() {
            let _ = writeln!(out, "{}. {step}", i + 1);
        }
    }
}
