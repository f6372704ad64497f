mod common;

use api::error::ApiError;
use api::services::response::{CreateResponse, UpdateResponse};
use entity::question::QuestionType;
use uuid::Uuid;

use common::{admin_caller, caller_for, test_env};

#[tokio::test]
async fn radio_answer_round_trip() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Radio).await;
    let options = env.create_options(question.id, 3).await;
    let respondent = env.create_respondent().await;
    let enrollment = env.enroll(&respondent, &survey).await;
    let caller = caller_for(&respondent);

    // Zero selections and two selections both fail shape validation.
    for bad in [vec![], vec![options[0].id, options[1].id]] {
        let err = env
            .services
            .responses
            .create(
                &caller,
                CreateResponse {
                    user_survey_id: enrollment.id,
                    question_id: question.id,
                    feedback_text: None,
                    rating: None,
                    option_ids: bad,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    let created = env
        .services
        .responses
        .create(
            &caller,
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: None,
                rating: None,
                option_ids: vec![options[1].id],
            },
        )
        .await
        .unwrap();
    assert_eq!(created.option_ids, vec![options[1].id]);
    assert_eq!(created.rating, None);
    assert_eq!(created.feedback_text, None);

    let fetched = env.services.responses.get(created.id).await.unwrap();
    assert_eq!(fetched.option_ids, vec![options[1].id]);

    // Updating swaps the stored option set wholesale.
    let updated = env
        .services
        .responses
        .update(
            &caller,
            created.id,
            UpdateResponse {
                question_id: None,
                feedback_text: None,
                rating: None,
                option_ids: vec![options[2].id],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.option_ids, vec![options[2].id]);
}

#[tokio::test]
async fn selected_options_must_belong_to_the_question() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Radio).await;
    env.create_options(question.id, 2).await;
    let other = env.create_question(survey.id, QuestionType::Checkbox).await;
    let foreign = env.create_options(other.id, 2).await;
    let respondent = env.create_respondent().await;
    let enrollment = env.enroll(&respondent, &survey).await;

    let err = env
        .services
        .responses
        .create(
            &caller_for(&respondent),
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: None,
                rating: None,
                option_ids: vec![foreign[0].id],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn text_answer_requires_feedback_and_clears_stale_fields() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Text).await;
    let respondent = env.create_respondent().await;
    let enrollment = env.enroll(&respondent, &survey).await;
    let caller = caller_for(&respondent);

    let err = env
        .services
        .responses
        .create(
            &caller,
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: Some("   ".into()),
                rating: None,
                option_ids: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // A stale rating riding along with valid feedback is dropped, not
    // rejected.
    let created = env
        .services
        .responses
        .create(
            &caller,
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: Some("Loved it".into()),
                rating: Some(4),
                option_ids: vec![],
            },
        )
        .await
        .unwrap();
    assert_eq!(created.feedback_text.as_deref(), Some("Loved it"));
    assert_eq!(created.rating, None);
    assert!(created.option_ids.is_empty());
}

#[tokio::test]
async fn rating_answer_is_bounded() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Rating).await;
    let respondent = env.create_respondent().await;
    let enrollment = env.enroll(&respondent, &survey).await;
    let caller = caller_for(&respondent);

    for bad in [Some(0), Some(6), None] {
        let err = env
            .services
            .responses
            .create(
                &caller,
                CreateResponse {
                    user_survey_id: enrollment.id,
                    question_id: question.id,
                    feedback_text: None,
                    rating: bad,
                    option_ids: vec![],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    let created = env
        .services
        .responses
        .create(
            &caller,
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: None,
                rating: Some(5),
                option_ids: vec![],
            },
        )
        .await
        .unwrap();
    assert_eq!(created.rating, Some(5));
}

#[tokio::test]
async fn respondents_cannot_touch_other_enrollments() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Rating).await;
    let owner = env.create_respondent().await;
    let intruder = env.create_respondent().await;
    let enrollment = env.enroll(&owner, &survey).await;
    env.enroll(&intruder, &survey).await;

    let err = env
        .services
        .responses
        .create(
            &caller_for(&intruder),
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: None,
                rating: Some(3),
                option_ids: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));

    let created = env
        .services
        .responses
        .create(
            &caller_for(&owner),
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: None,
                rating: Some(3),
                option_ids: vec![],
            },
        )
        .await
        .unwrap();

    let err = env
        .services
        .responses
        .delete(&caller_for(&intruder), created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));

    // Administrators bypass the ownership check.
    let updated = env
        .services
        .responses
        .update(
            &admin_caller(),
            created.id,
            UpdateResponse {
                question_id: None,
                feedback_text: None,
                rating: Some(1),
                option_ids: vec![],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.rating, Some(1));

    env.services
        .responses
        .delete(&caller_for(&owner), created.id)
        .await
        .unwrap();
    let err = env.services.responses.get(created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn update_can_retarget_within_the_same_survey() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let rating = env.create_question(survey.id, QuestionType::Rating).await;
    let text = env.create_question(survey.id, QuestionType::Text).await;
    let respondent = env.create_respondent().await;
    let enrollment = env.enroll(&respondent, &survey).await;
    let caller = caller_for(&respondent);

    let created = env
        .services
        .responses
        .create(
            &caller,
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: rating.id,
                feedback_text: None,
                rating: Some(4),
                option_ids: vec![],
            },
        )
        .await
        .unwrap();

    // Validation follows the new target question's type.
    let updated = env
        .services
        .responses
        .update(
            &caller,
            created.id,
            UpdateResponse {
                question_id: Some(text.id),
                feedback_text: Some("Changed my mind".into()),
                rating: None,
                option_ids: vec![],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.question_id, text.id);
    assert_eq!(updated.feedback_text.as_deref(), Some("Changed my mind"));
    assert_eq!(updated.rating, None);
}

#[tokio::test]
async fn response_references_are_checked() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let other_survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(other_survey.id, QuestionType::Rating).await;
    let respondent = env.create_respondent().await;
    let enrollment = env.enroll(&respondent, &survey).await;
    let caller = caller_for(&respondent);

    let err = env
        .services
        .responses
        .create(
            &caller,
            CreateResponse {
                user_survey_id: Uuid::new_v4(),
                question_id: question.id,
                feedback_text: None,
                rating: Some(3),
                option_ids: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // The question exists but belongs to a different survey.
    let err = env
        .services
        .responses
        .create(
            &caller,
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: None,
                rating: Some(3),
                option_ids: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));
}
