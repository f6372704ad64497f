mod common;

use api::error::ApiError;
use api::seed::{seed_demo, ADMIN_EMAIL, RESPONDENT_EMAIL};
use api::services::response::CreateResponse;
use entity::question::QuestionType;

use common::{caller_for, test_env};

#[tokio::test]
async fn deleting_a_question_takes_its_options() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Radio).await;
    let options = env.create_options(question.id, 3).await;

    env.services.questions.delete(question.id).await.unwrap();

    let err = env.services.questions.get(question.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    for option in options {
        let err = env.services.options.get(option.id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}

#[tokio::test]
async fn answered_questions_and_options_resist_deletion() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Radio).await;
    let options = env.create_options(question.id, 2).await;
    let respondent = env.create_respondent().await;
    let enrollment = env.enroll(&respondent, &survey).await;
    let caller = caller_for(&respondent);

    let response = env
        .services
        .responses
        .create(
            &caller,
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: None,
                rating: None,
                option_ids: vec![options[0].id],
            },
        )
        .await
        .unwrap();

    let err = env.services.questions.delete(question.id).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));
    let err = env.services.options.delete(options[0].id).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));
    let err = env.services.surveys.delete(survey.id).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));

    // The unselected option is still free to go.
    env.services.options.delete(options[1].id).await.unwrap();

    // Once the answer is withdrawn everything unlocks.
    env.services
        .responses
        .delete(&caller, response.id)
        .await
        .unwrap();
    env.services.questions.delete(question.id).await.unwrap();
    env.services.surveys.delete(survey.id).await.unwrap();
}

#[tokio::test]
async fn deleting_a_survey_cascades_to_structure_and_enrollments() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Checkbox).await;
    let options = env.create_options(question.id, 2).await;
    let respondent = env.create_respondent().await;
    let enrollment = env.enroll(&respondent, &survey).await;

    env.services.surveys.delete(survey.id).await.unwrap();

    assert!(matches!(
        env.services.surveys.get(survey.id).await.unwrap_err(),
        ApiError::NotFound(_)
    ));
    assert!(matches!(
        env.services.questions.get(question.id).await.unwrap_err(),
        ApiError::NotFound(_)
    ));
    assert!(matches!(
        env.services.options.get(options[0].id).await.unwrap_err(),
        ApiError::NotFound(_)
    ));
    assert!(matches!(
        env.services.enrollments.get(enrollment.id).await.unwrap_err(),
        ApiError::NotFound(_)
    ));
    // The respondent account itself is untouched.
    env.services.users.get(respondent.id).await.unwrap();
}

#[tokio::test]
async fn products_with_surveys_cannot_be_deleted() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;

    let err = env.services.products.delete(product.id).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));

    env.services.surveys.delete(survey.id).await.unwrap();
    env.services.products.delete(product.id).await.unwrap();
}

#[tokio::test]
async fn survey_creators_cannot_be_deleted_but_respondents_cascade() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Rating).await;
    let respondent = env.create_respondent().await;
    let enrollment = env.enroll(&respondent, &survey).await;

    let response = env
        .services
        .responses
        .create(
            &caller_for(&respondent),
            CreateResponse {
                user_survey_id: enrollment.id,
                question_id: question.id,
                feedback_text: None,
                rating: Some(2),
                option_ids: vec![],
            },
        )
        .await
        .unwrap();

    let err = env.services.users.delete(admin.id).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));

    env.services.users.delete(respondent.id).await.unwrap();
    assert!(matches!(
        env.services.enrollments.get(enrollment.id).await.unwrap_err(),
        ApiError::NotFound(_)
    ));
    assert!(matches!(
        env.services.responses.get(response.id).await.unwrap_err(),
        ApiError::NotFound(_)
    ));
}

#[tokio::test]
async fn demo_seed_is_complete_and_idempotent() {
    let env = test_env();
    seed_demo(&env.services).await.unwrap();

    let users = env.services.users.list().await.unwrap();
    let emails: Vec<&str> = users.iter().map(|user| user.email.as_str()).collect();
    assert!(emails.contains(&ADMIN_EMAIL));
    assert!(emails.contains(&RESPONDENT_EMAIL));

    let surveys = env.services.surveys.list().await.unwrap();
    assert_eq!(surveys.len(), 1);
    let questions = env
        .services
        .questions
        .list_by_survey(surveys[0].id)
        .await
        .unwrap();
    assert_eq!(questions.len(), 4);

    // A second run is a no-op, not a duplicate data set.
    seed_demo(&env.services).await.unwrap();
    assert_eq!(env.services.users.list().await.unwrap().len(), users.len());
    assert_eq!(env.services.surveys.list().await.unwrap().len(), 1);
}
