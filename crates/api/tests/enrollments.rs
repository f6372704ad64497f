mod common;

use api::error::ApiError;
use api::services::enrollment::CreateEnrollment;
use api::services::response::CreateResponse;
use entity::question::QuestionType;
use uuid::Uuid;

use common::{caller_for, test_env};

#[tokio::test]
async fn missing_user_wins_over_missing_survey() {
    let env = test_env();
    let err = env
        .services
        .enrollments
        .create(CreateEnrollment {
            user_id: Uuid::new_v4(),
            survey_id: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    match err {
        ApiError::NotFound(msg) => assert_eq!(msg, "user not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn administrators_cannot_be_enrolled() {
    let env = test_env();
    let admin = env.create_admin().await;

    // The role check fires before the survey is even looked at.
    let err = env
        .services
        .enrollments
        .create(CreateEnrollment {
            user_id: admin.id,
            survey_id: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));
}

#[tokio::test]
async fn missing_survey_is_reported_after_user_checks() {
    let env = test_env();
    let respondent = env.create_respondent().await;
    let err = env
        .services
        .enrollments
        .create(CreateEnrollment {
            user_id: respondent.id,
            survey_id: Uuid::new_v4(),
        })
        .await
        .unwrap_err();
    match err {
        ApiError::NotFound(msg) => assert_eq!(msg, "survey not found"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_enrollment_conflicts() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let respondent = env.create_respondent().await;
    env.enroll(&respondent, &survey).await;

    let err = env
        .services
        .enrollments
        .create(CreateEnrollment {
            user_id: respondent.id,
            survey_id: survey.id,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[tokio::test]
async fn unenrolling_drops_recorded_responses() {
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
                rating: Some(4),
                option_ids: vec![],
            },
        )
        .await
        .unwrap();

    env.services.enrollments.delete(enrollment.id).await.unwrap();

    let err = env.services.enrollments.get(enrollment.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    let err = env.services.responses.get(response.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn enrollment_listings_filter_by_survey_and_user() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey_a = env.create_survey(&admin, &product).await;
    let survey_b = env.create_survey(&admin, &product).await;
    let alice = env.create_respondent().await;
    let bob = env.create_respondent().await;
    env.enroll(&alice, &survey_a).await;
    env.enroll(&alice, &survey_b).await;
    env.enroll(&bob, &survey_a).await;

    let by_survey = env
        .services
        .enrollments
        .list_by_survey(survey_a.id)
        .await
        .unwrap();
    assert_eq!(by_survey.len(), 2);

    let by_user = env
        .services
        .enrollments
        .list_by_user(alice.id)
        .await
        .unwrap();
    assert_eq!(by_user.len(), 2);
    assert!(by_user.iter().all(|row| row.user_id == alice.id));
}
