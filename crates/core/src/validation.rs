use serde_json::{Map, Value as JsonValue};

use crate::error::ValidationFailure;
use crate::patient::{
    ActivityLevel, AlcoholConsumption, Appetite, Climate, DietType, FoodTemperature, Gender,
    PatientProfile, Season, Severity, SleepQuality, SmokingStatus, SpiceLevel, StressLevel, Taste,
    WeightUnit,
};

type Object = Map<String, JsonValue>;

/// Validate a create/update payload and build the typed profile.
///
/// All offending fields are reported at once with dotted paths. Unknown keys
/// are rejected at every level; defaults for absent optional fields are
/// applied during deserialization.
pub fn validate_patient(input: &JsonValue) -> Result<PatientProfile, ValidationFailure> {
    let mut v = Validator::default();

    let Some(root) = input.as_object() else {
        v.fail("value", "must be of type object");
        return Err(v.failure);
    };

    v.check_patient(root);
    if !v.failure.is_empty() {
        return Err(v.failure);
    }

    let mut profile: PatientProfile = serde_path_to_error::deserialize(input).map_err(|err| {
        ValidationFailure::single(err.path().to_string(), err.inner().to_string())
    })?;
    profile.normalize();
    Ok(profile)
}

const PATIENT_KEYS: &[&str] = &[
    "name",
    "age",
    "gender",
    "contactInfo",
    "prakriti",
    "vikriti",
    "roga",
    "physicalMeasurements",
    "dietaryHabits",
    "lifestyle",
    "environment",
    "medicalHistory",
    "createdBy",
];

#[derive(Default)]
struct Validator {
    failure: ValidationFailure,
}

/// Whether a missing field is an error
#[derive(Clone, Copy, PartialEq)]
enum Presence {
    Required,
    Optional,
}

use Presence::{Optional, Required};

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

impl Validator {
    fn fail(&mut self, path: &str, message: &str) {
        self.failure.push(path, format!("\"{path}\" {message}"));
    }

    fn check_patient(&mut self, root: &Object) {
        self.unknown_keys(root, "", PATIENT_KEYS);

        if let Some(name) = self.string(root, "", "name", Required) {
            if name.trim().is_empty() {
                self.fail("name", "is not allowed to be empty");
            } else if name.trim().chars().count() > 100 {
                self.fail("name", "length must be less than or equal to 100 characters long");
            }
        }
        self.integer(root, "", "age", Required, 0, 150);
        self.one_of(root, "", "gender", Required, Gender::LABELS);

        if let Some(contact) = self.object(root, "", "contactInfo", Optional, true) {
            self.check_contact(contact);
        }

        for key in ["prakriti", "vikriti"] {
            if let Some(scores) = self.object(root, "", key, Required, false) {
                self.unknown_keys(scores, key, &["vata", "pitta", "kapha"]);
                for dosha in ["vata", "pitta", "kapha"] {
                    self.number(scores, key, dosha, Required, 0.0, 5.0);
                }
            }
        }

        self.array(root, "", "roga", |v, item, path| {
            let Some(entry) = v.expect_object(item, path) else {
                return;
            };
            v.unknown_keys(entry, path, &["condition", "severity", "duration", "notes"]);
            v.non_empty_string(entry, path, "condition", Required);
            v.one_of(entry, path, "severity", Optional, Severity::LABELS);
            v.string(entry, path, "duration", Optional);
            v.string(entry, path, "notes", Optional);
        });

        if let Some(pm) = self.object(root, "", "physicalMeasurements", Required, false) {
            self.check_measurements(pm);
        }
        if let Some(habits) = self.object(root, "", "dietaryHabits", Required, false) {
            self.check_dietary_habits(habits);
        }
        if let Some(lifestyle) = self.object(root, "", "lifestyle", Optional, false) {
            self.check_lifestyle(lifestyle);
        }
        if let Some(env) = self.object(root, "", "environment", Optional, false) {
            self.unknown_keys(env, "environment", &["climate", "season"]);
            self.one_of(env, "environment", "climate", Optional, Climate::LABELS);
            self.one_of(env, "environment", "season", Optional, Season::LABELS);
        }
        if let Some(history) = self.object(root, "", "medicalHistory", Optional, false) {
            self.check_medical_history(history);
        }
        self.string(root, "", "createdBy", Optional);
    }

    fn check_contact(&mut self, contact: &Object) {
        let path = "contactInfo";
        self.unknown_keys(contact, path, &["phone", "email", "address"]);

        if let Some(phone) = self.string(contact, path, "phone", Optional) {
            if !phone.is_empty() && !is_phone(phone) {
                let field = join(path, "phone");
                self.fail(
                    &field,
                    &format!("with value \"{phone}\" fails to match the required pattern"),
                );
            }
        }
        if let Some(email) = self.string(contact, path, "email", Optional) {
            if !email.is_empty() && !is_email(email.trim()) {
                self.fail(&join(path, "email"), "must be a valid email");
            }
        }
        if let Some(address) = self.object(contact, path, "address", Optional, true) {
            let path = "contactInfo.address";
            let keys = ["street", "city", "state", "zipCode", "country"];
            self.unknown_keys(address, path, &keys);
            for key in keys {
                self.string(address, path, key, Optional);
            }
        }
    }

    fn check_measurements(&mut self, pm: &Object) {
        let path = "physicalMeasurements";
        self.unknown_keys(pm, path, &["weight", "height"]);

        if let Some(weight) = self.object(pm, path, "weight", Required, false) {
            let path = "physicalMeasurements.weight";
            self.unknown_keys(weight, path, &["value", "unit"]);
            self.number(weight, path, "value", Required, 0.0, f64::MAX);
            self.one_of(weight, path, "unit", Optional, WeightUnit::LABELS);
        }
        if let Some(height) = self.object(pm, path, "height", Required, false) {
            let path = "physicalMeasurements.height";
            self.unknown_keys(height, path, &["feet", "inches", "cm"]);
            self.number(height, path, "feet", Optional, 0.0, 10.0);
            self.number(height, path, "inches", Optional, 0.0, 11.99);
            self.number(height, path, "cm", Optional, 0.0, 300.0);
        }
    }

    fn check_dietary_habits(&mut self, habits: &Object) {
        let path = "dietaryHabits";
        self.unknown_keys(
            habits,
            path,
            &[
                "type",
                "appetite",
                "foodPreferences",
                "mealFrequency",
                "targetCalories",
                "allergies",
                "dislikes",
            ],
        );

        self.one_of(habits, path, "type", Required, DietType::LABELS);
        self.one_of(habits, path, "appetite", Optional, Appetite::LABELS);

        if let Some(prefs) = self.object(habits, path, "foodPreferences", Optional, false) {
            let path = "dietaryHabits.foodPreferences";
            self.unknown_keys(prefs, path, &["temperature", "taste", "spiceLevel"]);
            self.one_of(prefs, path, "temperature", Optional, FoodTemperature::LABELS);
            self.one_of(prefs, path, "spiceLevel", Optional, SpiceLevel::LABELS);
            self.array(prefs, path, "taste", |v, item, item_path| {
                v.label_in(item, item_path, Taste::LABELS);
            });
        }
        if let Some(freq) = self.object(habits, path, "mealFrequency", Optional, false) {
            let path = "dietaryHabits.mealFrequency";
            self.unknown_keys(freq, path, &["mainMeals", "snacks"]);
            self.integer(freq, path, "mainMeals", Optional, 1, 6);
            self.integer(freq, path, "snacks", Optional, 0, 5);
        }

        self.integer(habits, path, "targetCalories", Required, 800, 5000);

        for key in ["allergies", "dislikes"] {
            self.array(habits, path, key, |v, item, item_path| {
                if !item.is_string() {
                    v.fail(item_path, "must be a string");
                }
            });
        }
    }

    fn check_lifestyle(&mut self, lifestyle: &Object) {
        let path = "lifestyle";
        self.unknown_keys(
            lifestyle,
            path,
            &[
                "activityLevel",
                "sleepPattern",
                "stressLevel",
                "occupation",
                "smokingStatus",
                "alcoholConsumption",
            ],
        );

        self.one_of(lifestyle, path, "activityLevel", Optional, ActivityLevel::LABELS);
        if let Some(sleep) = self.object(lifestyle, path, "sleepPattern", Optional, false) {
            let path = "lifestyle.sleepPattern";
            self.unknown_keys(sleep, path, &["averageHours", "quality"]);
            self.number(sleep, path, "averageHours", Optional, 3.0, 12.0);
            self.one_of(sleep, path, "quality", Optional, SleepQuality::LABELS);
        }
        self.one_of(lifestyle, path, "stressLevel", Optional, StressLevel::LABELS);
        self.string(lifestyle, path, "occupation", Optional);
        self.one_of(lifestyle, path, "smokingStatus", Optional, SmokingStatus::LABELS);
        self.one_of(
            lifestyle,
            path,
            "alcoholConsumption",
            Optional,
            AlcoholConsumption::LABELS,
        );
    }

    fn check_medical_history(&mut self, history: &Object) {
        let path = "medicalHistory";
        self.unknown_keys(
            history,
            path,
            &["currentMedications", "pastIllnesses", "familyHistory", "surgeries"],
        );

        self.array(history, path, "currentMedications", |v, item, p| {
            if let Some(med) = v.expect_object(item, p) {
                v.unknown_keys(med, p, &["name", "dosage", "frequency", "startDate"]);
                for key in ["name", "dosage", "frequency"] {
                    v.string(med, p, key, Optional);
                }
                v.date(med, p, "startDate");
            }
        });
        self.array(history, path, "pastIllnesses", |v, item, p| {
            if let Some(illness) = v.expect_object(item, p) {
                v.unknown_keys(illness, p, &["condition", "year", "treatment"]);
                v.string(illness, p, "condition", Optional);
                v.number(illness, p, "year", Optional, f64::MIN, f64::MAX);
                v.string(illness, p, "treatment", Optional);
            }
        });
        self.array(history, path, "familyHistory", |v, item, p| {
            if let Some(entry) = v.expect_object(item, p) {
                v.unknown_keys(entry, p, &["relation", "condition"]);
                v.string(entry, p, "relation", Optional);
                v.string(entry, p, "condition", Optional);
            }
        });
        self.array(history, path, "surgeries", |v, item, p| {
            if let Some(surgery) = v.expect_object(item, p) {
                v.unknown_keys(surgery, p, &["procedure", "date", "hospital"]);
                v.string(surgery, p, "procedure", Optional);
                v.date(surgery, p, "date");
                v.string(surgery, p, "hospital", Optional);
            }
        });
    }

    // --- primitive rules ---

    fn unknown_keys(&mut self, obj: &Object, parent: &str, allowed: &[&str]) {
        for key in obj.keys() {
            if !allowed.contains(&key.as_str()) {
                self.fail(&join(parent, key), "is not allowed");
            }
        }
    }

    /// Look up `key`, reporting it when required and absent
    fn field<'a>(
        &mut self,
        obj: &'a Object,
        parent: &str,
        key: &str,
        presence: Presence,
    ) -> Option<&'a JsonValue> {
        match obj.get(key) {
            Some(value) => Some(value),
            None => {
                if presence == Required {
                    self.fail(&join(parent, key), "is required");
                }
                None
            }
        }
    }

    fn object<'a>(
        &mut self,
        obj: &'a Object,
        parent: &str,
        key: &str,
        presence: Presence,
        nullable: bool,
    ) -> Option<&'a Object> {
        let value = self.field(obj, parent, key, presence)?;
        if value.is_null() && nullable {
            return None;
        }
        let path = join(parent, key);
        self.expect_object(value, &path)
    }

    fn expect_object<'a>(&mut self, value: &'a JsonValue, path: &str) -> Option<&'a Object> {
        let obj = value.as_object();
        if obj.is_none() {
            self.fail(path, "must be of type object");
        }
        obj
    }

    fn string<'a>(
        &mut self,
        obj: &'a Object,
        parent: &str,
        key: &str,
        presence: Presence,
    ) -> Option<&'a str> {
        let value = self.field(obj, parent, key, presence)?;
        let text = value.as_str();
        if text.is_none() {
            self.fail(&join(parent, key), "must be a string");
        }
        text
    }

    fn non_empty_string(&mut self, obj: &Object, parent: &str, key: &str, presence: Presence) {
        if let Some(text) = self.string(obj, parent, key, presence) {
            if text.trim().is_empty() {
                self.fail(&join(parent, key), "is not allowed to be empty");
            }
        }
    }

    fn number(
        &mut self,
        obj: &Object,
        parent: &str,
        key: &str,
        presence: Presence,
        min: f64,
        max: f64,
    ) -> Option<f64> {
        let value = self.field(obj, parent, key, presence)?;
        let path = join(parent, key);
        let Some(n) = value.as_f64() else {
            self.fail(&path, "must be a number");
            return None;
        };
        if n < min {
            self.fail(&path, &format!("must be greater than or equal to {min}"));
        } else if n > max {
            self.fail(&path, &format!("must be less than or equal to {max}"));
        }
        Some(n)
    }

    fn integer(
        &mut self,
        obj: &Object,
        parent: &str,
        key: &str,
        presence: Presence,
        min: u32,
        max: u32,
    ) {
        let Some(n) = self.number(obj, parent, key, presence, f64::from(min), f64::from(max))
        else {
            return;
        };
        if n.fract() != 0.0 {
            self.fail(&join(parent, key), "must be an integer");
        }
    }

    fn one_of(
        &mut self,
        obj: &Object,
        parent: &str,
        key: &str,
        presence: Presence,
        labels: &[&str],
    ) {
        if let Some(value) = self.field(obj, parent, key, presence) {
            self.label_in(value, &join(parent, key), labels);
        }
    }

    fn label_in(&mut self, value: &JsonValue, path: &str, labels: &[&str]) {
        let known = value.as_str().is_some_and(|s| labels.contains(&s));
        if !known {
            self.fail(path, &format!("must be one of [{}]", labels.join(", ")));
        }
    }

    fn date(&mut self, obj: &Object, parent: &str, key: &str) {
        if let Some(text) = self.string(obj, parent, key, Optional) {
            if !is_date(text) {
                self.fail(&join(parent, key), "must be a valid date");
            }
        }
    }

    fn array(
        &mut self,
        obj: &Object,
        parent: &str,
        key: &str,
        mut each: impl FnMut(&mut Self, &JsonValue, &str),
    ) {
        let Some(value) = self.field(obj, parent, key, Optional) else {
            return;
        };
        let path = join(parent, key);
        let Some(items) = value.as_array() else {
            self.fail(&path, "must be an array");
            return;
        };
        for (index, item) in items.iter().enumerate() {
            each(self, item, &format!("{path}.{index}"));
        }
    }
}

/// Optional leading `+`, then 6 to 15 digits
pub fn is_phone(raw: &str) -> bool {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    (6..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `local@domain.tld` with no whitespace and a dot inside the domain
pub fn is_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || raw.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

fn is_date(raw: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(raw).is_ok()
        || chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}
