use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::display::PatientSource;

/// One step of the chat intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntakeQuestion {
    pub key: &'static str,
    pub question: &'static str,
    pub placeholder: &'static str,
}

pub static QUESTIONS: [IntakeQuestion; 13] = [
    IntakeQuestion {
        key: "prakriti",
        question: "What is the patient's natural constitution (Prakriti)? Please specify dominant dosha from birth:",
        placeholder: "e.g., Vata-Pitta dominant, Kapha secondary",
    },
    IntakeQuestion {
        key: "vikruti",
        question: "What is the current imbalanced state (Vikruti)? Please provide current dosha levels:",
        placeholder: "e.g., Vata: 3.5, Pitta: 2.5, Kapha: 1",
    },
    IntakeQuestion {
        key: "roga",
        question: "What are the patient's main health concerns or symptoms (Roga)?",
        placeholder: "e.g., Abdominal Gas, Heat in body, Digestive issues",
    },
    IntakeQuestion {
        key: "climate",
        question: "What is the patient's current climate and season?",
        placeholder: "e.g., Hot and humid summer, Cold winter, Rainy season",
    },
    IntakeQuestion {
        key: "age",
        question: "What is the patient's age?",
        placeholder: "e.g., 29",
    },
    IntakeQuestion {
        key: "weight",
        question: "What is the patient's weight?",
        placeholder: "e.g., 50kg",
    },
    IntakeQuestion {
        key: "height",
        question: "What is the patient's height?",
        placeholder: "e.g., 5'5\"",
    },
    IntakeQuestion {
        key: "gender",
        question: "What is the patient's gender?",
        placeholder: "e.g., Female",
    },
    IntakeQuestion {
        key: "agni",
        question: "How is the patient's digestive fire (Agni)? Describe appetite and digestion:",
        placeholder: "e.g., Strong appetite, slow digestion, irregular hunger",
    },
    IntakeQuestion {
        key: "foodPreferences",
        question: "What are the patient's taste preferences (Rasa)? Which tastes do they crave or avoid?",
        placeholder: "e.g., Loves sweet and salty, avoids bitter, craves spicy",
    },
    IntakeQuestion {
        key: "dietaryHabits",
        question: "What are the patient's current dietary habits and lifestyle?",
        placeholder: "e.g., Vegetarian, moderate appetite, prefers warm foods, exercises regularly",
    },
    IntakeQuestion {
        key: "mealFrequency",
        question: "What is the patient's preferred meal frequency and timing?",
        placeholder: "e.g., 3 main meals + 1 snack, dinner by 7 PM",
    },
    IntakeQuestion {
        key: "targetCalories",
        question: "What is the target daily calorie intake based on activity level?",
        placeholder: "e.g., 2200 kcal/day for moderate activity",
    },
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Answer must not be empty")]
    EmptyAnswer,

    #[error("Intake is already complete")]
    AlreadyComplete,
}

/// Result of answering the current question
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeStep {
    Next(&'static IntakeQuestion),
    Complete(PatientSource),
}

/// Forward-only questionnaire: answers are kept verbatim under each key
#[derive(Debug, Clone, Default)]
pub struct IntakeSession {
    answers: BTreeMap<String, String>,
    step: usize,
}

impl IntakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-based index of the question awaiting an answer
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn current_question(&self) -> Option<&'static IntakeQuestion> {
        QUESTIONS.get(self.step)
    }

    pub fn is_complete(&self) -> bool {
        self.step >= QUESTIONS.len()
    }

    pub fn answers(&self) -> &BTreeMap<String, String> {
        &self.answers
    }

    pub fn answer(&mut self, text: &str) -> Result<IntakeStep, IntakeError> {
        let Some(question) = self.current_question() else {
            return Err(IntakeError::AlreadyComplete);
        };
        if text.trim().is_empty() {
            return Err(IntakeError::EmptyAnswer);
        }

        self.answers.insert(question.key.to_string(), text.to_string());
        self.step += 1;

        Ok(match self.current_question() {
            Some(next) => IntakeStep::Next(next),
            None => IntakeStep::Complete(PatientSource::Collected(self.answers.clone())),
        })
    }
}
