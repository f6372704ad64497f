use entity::question::QuestionType;
use uuid::Uuid;

use crate::error::ApiError;

/// Raw answer fields as supplied by the caller, before the question type
/// has been consulted.
#[derive(Debug, Clone, Default)]
pub struct AnswerInput {
    pub feedback_text: Option<String>,
    pub rating: Option<i32>,
    pub option_ids: Vec<Uuid>,
}

/// The answer after shape validation. Fields the question type does not
/// require are cleared, never left stale from caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAnswer {
    pub feedback_text: Option<String>,
    pub rating: Option<i32>,
    pub option_ids: Vec<Uuid>,
}

/// A response's legal shape is entirely determined by its question's type.
/// Each branch is independent: text wants a non-blank feedback string,
/// rating wants an integer in [1, 5], radio wants exactly one selected
/// option, checkbox wants at least one.
pub fn validate_answer(
    question_type: QuestionType,
    input: &AnswerInput,
) -> Result<ValidatedAnswer, ApiError> {
    match question_type {
        QuestionType::Text => match input.feedback_text.as_deref() {
            Some(text) if !text.trim().is_empty() => Ok(ValidatedAnswer {
                feedback_text: Some(text.to_string()),
                rating: None,
                option_ids: Vec::new(),
            }),
            _ => Err(ApiError::validation(
                "feedback_text is required for a text question",
            )),
        },
        QuestionType::Rating => match input.rating {
            Some(rating) if (1..=5).contains(&rating) => Ok(ValidatedAnswer {
                feedback_text: None,
                rating: Some(rating),
                option_ids: Vec::new(),
            }),
            _ => Err(ApiError::validation("rating must be between 1 and 5")),
        },
        QuestionType::Radio => {
            if input.option_ids.len() != 1 {
                return Err(ApiError::validation(
                    "exactly one option_id is required for a radio question",
                ));
            }
            Ok(ValidatedAnswer {
                feedback_text: None,
                rating: None,
                option_ids: input.option_ids.clone(),
            })
        }
        QuestionType::Checkbox => {
            if input.option_ids.is_empty() {
                return Err(ApiError::validation(
                    "at least one option_id is required for a checkbox question",
                ));
            }
            Ok(ValidatedAnswer {
                feedback_text: None,
                rating: None,
                option_ids: input.option_ids.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(
        feedback_text: Option<&str>,
        rating: Option<i32>,
        option_ids: Vec<Uuid>,
    ) -> AnswerInput {
        AnswerInput {
            feedback_text: feedback_text.map(str::to_string),
            rating,
            option_ids,
        }
    }

    #[test]
    fn text_requires_non_blank_feedback() {
        for bad in [None, Some(""), Some("   ")] {
            let err = validate_answer(QuestionType::Text, &input(bad, None, vec![])).unwrap_err();
            assert!(matches!(err, ApiError::Validation(msg) if msg.contains("feedback_text")));
        }
        let ok = validate_answer(QuestionType::Text, &input(Some("fine"), None, vec![])).unwrap();
        assert_eq!(ok.feedback_text.as_deref(), Some("fine"));
    }

    #[test]
    fn text_clears_rating_and_options() {
        let stale = input(Some("fine"), Some(4), vec![Uuid::new_v4()]);
        let ok = validate_answer(QuestionType::Text, &stale).unwrap();
        assert_eq!(ok.rating, None);
        assert!(ok.option_ids.is_empty());
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        for bad in [None, Some(0), Some(6), Some(-1)] {
            let err = validate_answer(QuestionType::Rating, &input(None, bad, vec![])).unwrap_err();
            assert!(matches!(err, ApiError::Validation(msg) if msg.contains("rating")));
        }
        for good in 1..=5 {
            let ok = validate_answer(QuestionType::Rating, &input(None, Some(good), vec![]))
                .unwrap();
            assert_eq!(ok.rating, Some(good));
            assert_eq!(ok.feedback_text, None);
        }
    }

    #[test]
    fn radio_requires_exactly_one_option() {
        let none = input(None, None, vec![]);
        let two = input(None, None, vec![Uuid::new_v4(), Uuid::new_v4()]);
        assert!(validate_answer(QuestionType::Radio, &none).is_err());
        assert!(validate_answer(QuestionType::Radio, &two).is_err());

        let picked = Uuid::new_v4();
        let ok =
            validate_answer(QuestionType::Radio, &input(Some("stale"), Some(3), vec![picked]))
                .unwrap();
        assert_eq!(ok.option_ids, vec![picked]);
        assert_eq!(ok.feedback_text, None);
        assert_eq!(ok.rating, None);
    }

    #[test]
    fn checkbox_requires_at_least_one_option() {
        let err =
            validate_answer(QuestionType::Checkbox, &input(None, None, vec![])).unwrap_err();
        assert!(matches!(err, ApiError::Validation(msg) if msg.contains("option_id")));

        let picked = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let ok = validate_answer(QuestionType::Checkbox, &input(None, None, picked.clone()))
            .unwrap();
        assert_eq!(ok.option_ids, picked);
    }
}
