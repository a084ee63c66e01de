//! Diet plan generation: fixture, live LLM call, or local fallback

use std::time::Duration;

use ayur_core::fallback::fallback_plan;
use ayur_core::fixture::{GenerationRoute, select_route};
use ayur_core::prompt::{SYSTEM_PROMPT, build_prompt};
use ayur_core::{DietPlan, DomainError, PatientContext, PlanSource, repair};
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::client::{CompletionConfig, CompletionProvider, LlmClient};

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub completion: CompletionConfig,
    /// Simulated latency before a fixture plan is returned
    pub fixture_delay: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            completion: CompletionConfig::default(),
            fixture_delay: Duration::from_secs(3),
        }
    }
}

/// Result of one generation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DietPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationOutcome {
    fn plan(plan: DietPlan, tokens_used: u64) -> Self {
        Self {
            success: true,
            data: Some(plan),
            tokens_used: Some(tokens_used),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            data: None,
            tokens_used: None,
            error: Some(error),
        }
    }
}

/// Turns a patient context into a diet plan
pub struct DietPlanGenerator<P = LlmClient> {
    provider: Option<P>,
    config: GeneratorConfig,
}

impl<P: CompletionProvider> DietPlanGenerator<P> {
    /// `provider` is `None` when no API key is configured
    pub fn new(provider: Option<P>, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model(&self) -> &str {
        &self.config.completion.model
    }

    /// `variation` selects among the local fallback menus, so a caller asking
    /// to regenerate can get a different plan for the same patient.
    pub async fn generate(&self, ctx: &PatientContext, variation: usize) -> GenerationOutcome {
        if let GenerationRoute::Fixture(fixture) = select_route(ctx.id.as_deref(), ctx.name.as_deref()) {
            tracing::info!(fixture = fixture.key, "Serving fixture diet plan");
            tokio::time::sleep(self.config.fixture_delay).await;
            return GenerationOutcome::plan(fixture.plan(), 0);
        }

        let Some(provider) = &self.provider else {
            return GenerationOutcome::failed(
                DomainError::ConfigurationMissing("OpenAI API key".to_string()).to_string(),
            );
        };

        let prompt = build_prompt(ctx);
        let (result, tokens) = match provider
            .complete(SYSTEM_PROMPT, &prompt, &self.config.completion)
            .await
        {
            Ok(completion) => (parse_plan(&completion.text), completion.tokens_used),
            Err(e) => (Err(DomainError::Upstream(e)), 0),
        };

        match result {
            Ok(plan) => {
                tracing::info!(tokens, patient = ?ctx.name, "Generated diet plan");
                GenerationOutcome::plan(plan, tokens)
            }
            Err(e) => {
                tracing::warn!(error = %e, patient = ?ctx.name, "Falling back to local diet plan");
                GenerationOutcome::plan(fallback_plan(ctx, variation), tokens)
            }
        }
    }
}

/// Parse the model's reply into a repaired plan
pub fn parse_plan(text: &str) -> Result<DietPlan, DomainError> {
    let json = extract_json_object(text)
        .ok_or_else(|| DomainError::Upstream("No JSON object in model response".to_string()))?;

    let value: JsonValue = serde_json::from_str(json)
        .map_err(|e| DomainError::Upstream(format!("Invalid JSON in model response: {}", e)))?;

    for key in ["patientInfo", "mealPlan"] {
        if value.get(key).is_none() {
            return Err(DomainError::Upstream(format!("Model response is missing {}", key)));
        }
    }

    let mut plan = DietPlan::from_repaired(repair(value))
        .map_err(|e| DomainError::Upstream(format!("Malformed diet plan: {}", e)))?;
    plan.source = PlanSource::Live;
    Ok(plan)
}

/// The span from the first `{` to the last `}`, which also strips markdown fences
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ayur_core::PatientSource;
    use ayur_core::plan::MEAL_NAMES;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::super::client::Completion;

    struct FakeProvider {
        reply: Result<Completion, String>,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn replying(text: &str, tokens: u64) -> Self {
            Self {
                reply: Ok(Completion {
                    text: text.to_string(),
                    tokens_used: tokens,
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(error: &str) -> Self {
            Self {
                reply: Err(error.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CompletionProvider for FakeProvider {
        async fn complete(
            &self,
            _system: &str,
            _prompt: &str,
            _config: &CompletionConfig,
        ) -> Result<Completion, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn generator(provider: Option<FakeProvider>) -> DietPlanGenerator<FakeProvider> {
        DietPlanGenerator::new(
            provider,
            GeneratorConfig {
                fixture_delay: Duration::from_secs(3),
                ..GeneratorConfig::default()
            },
        )
    }

    fn context(name: &str, vikruti: &str) -> PatientContext {
        let mut answers = BTreeMap::new();
        answers.insert("name".to_string(), name.to_string());
        answers.insert("prakriti".to_string(), "Vata: 3, Pitta: 2, Kapha: 1".to_string());
        answers.insert("vikruti".to_string(), vikruti.to_string());
        answers.insert("roga".to_string(), "acidity, heat".to_string());
        PatientContext::from(&PatientSource::Collected(answers))
    }

    const LIVE_REPLY: &str = r#"Here is the plan:
```json
{
  "patientInfo": {"name": "Meera Nair", "age": 34},
  "mealPlan": {
    "breakfast": ["Oats porridge with dates", "Calories: 400 kcal", {"Rasa": "Sweet", "Guna": "Heavy", "Virya": "Cooling", "Vipaka": "Sweet", "Dosha": "Pacifies Pitta", "Prabhava": "Nourishing"}],
    "lunch": ["Rice with moong dal"],
    "snack": "Coconut water",
    "dinner": ["Khichdi", "Calories: 500 kcal"]
  },
  "guidelines": ["Eat at regular times"]
}
```"#;

    #[tokio::test(start_paused = true)]
    async fn test_fixture_skips_provider() {
        let svc = generator(Some(FakeProvider::replying("{}", 99)));
        let started = tokio::time::Instant::now();

        let outcome = svc.generate(&context("Ayushi Singh", "Pitta: 4"), 0).await;

        assert!(outcome.success);
        assert_eq!(outcome.tokens_used, Some(0));
        let plan = outcome.data.unwrap();
        assert_eq!(plan.source, PlanSource::Fixture);
        assert_eq!(plan.patient_info.name.as_deref(), Some("Ayushi Singh"));
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(svc.provider.as_ref().unwrap().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_provider_fails() {
        let svc = generator(None);
        let outcome = svc.generate(&context("Meera Nair", "Pitta: 4"), 0).await;

        assert!(!outcome.success);
        assert!(outcome.data.is_none());
        assert_eq!(outcome.error.as_deref(), Some("OpenAI API key not configured"));
    }

    #[tokio::test]
    async fn test_live_reply_is_repaired() {
        let svc = generator(Some(FakeProvider::replying(LIVE_REPLY, 1234)));
        let outcome = svc.generate(&context("Meera Nair", "Pitta: 4"), 0).await;

        assert!(outcome.success);
        assert_eq!(outcome.tokens_used, Some(1234));
        let plan = outcome.data.unwrap();
        assert_eq!(plan.source, PlanSource::Live);
        assert_eq!(plan.patient_info.age.as_deref(), Some("34"));
        assert_eq!(plan.meal_plan.breakfast.description(), "Oats porridge with dates");
        assert_eq!(plan.meal_plan.lunch.nutrition(), "Calories: Calculating...");
        assert_eq!(
            plan.meal_plan.snack.description(),
            "AI-generated snack recommendation"
        );
        assert_eq!(plan.meal_plan.dinner.properties().rasa, "Missing AI data");
        assert_eq!(plan.guidelines, vec!["Eat at regular times".to_string()]);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let svc = generator(Some(FakeProvider::failing("OpenAI API error (429): quota")));
        let outcome = svc.generate(&context("Meera Nair", "Vata: 1, Pitta: 5, Kapha: 1"), 0).await;

        assert!(outcome.success);
        assert_eq!(outcome.tokens_used, Some(0));
        let plan = outcome.data.unwrap();
        assert_eq!(plan.source, PlanSource::Fallback);
        assert_eq!(plan.patient_info.dominant_dosha.as_deref(), Some("pitta"));
        for (_, meal) in plan.meal_plan.meals() {
            assert!(!meal.description().is_empty());
        }
    }

    #[tokio::test]
    async fn test_unparseable_reply_keeps_tokens() {
        let svc = generator(Some(FakeProvider::replying("I cannot help with that.", 57)));
        let outcome = svc.generate(&context("Meera Nair", "Kapha: 4"), 0).await;

        assert!(outcome.success);
        assert_eq!(outcome.tokens_used, Some(57));
        assert_eq!(outcome.data.unwrap().source, PlanSource::Fallback);
    }

    #[tokio::test]
    async fn test_fallback_depends_only_on_input() {
        let svc = generator(Some(FakeProvider::failing("connection refused")));
        let ctx = context("Meera Nair", "Vata: 1, Pitta: 5, Kapha: 1");

        let first = svc.generate(&ctx, 0).await.data.unwrap();
        let unrelated = svc.generate(&context("Asha Rao", "Kapha: 4"), 0).await;
        assert!(unrelated.success);
        let again = svc.generate(&ctx, 0).await.data.unwrap();
        assert_eq!(first, again);

        let regenerated = svc.generate(&ctx, 1).await.data.unwrap();
        assert_ne!(first.meal_plan.breakfast, regenerated.meal_plan.breakfast);
    }

    #[test]
    fn test_parse_plan_requires_meal_plan() {
        let err = parse_plan(r#"{"patientInfo": {}}"#).unwrap_err();
        assert!(err.to_string().contains("mealPlan"));
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object("x {\"a\": {}} y"), Some("{\"a\": {}}"));
        assert_eq!(extract_json_object("} no {"), None);
        assert_eq!(extract_json_object("plain text"), None);
        assert_eq!(MEAL_NAMES.len(), 4);
    }
}
