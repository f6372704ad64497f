mod common;

use api::error::ApiError;
use api::services::option::{CreateOption, UpdateOption};
use entity::question::QuestionType;

use common::test_env;

#[tokio::test]
async fn options_are_rejected_on_text_and_rating_questions() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;

    for question_type in [QuestionType::Text, QuestionType::Rating] {
        let question = env.create_question(survey.id, question_type).await;
        let err = env
            .services
            .options
            .create(CreateOption {
                value: "Never".into(),
                display_order: 1,
                question_id: question.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidOperation(_)));
    }
}

#[tokio::test]
async fn options_attach_to_choice_questions_in_display_order() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Radio).await;

    for (value, order) in [("Last", 3), ("First", 1), ("Middle", 2)] {
        env.services
            .options
            .create(CreateOption {
                value: value.into(),
                display_order: order,
                question_id: question.id,
            })
            .await
            .unwrap();
    }

    let listed = env
        .services
        .options
        .list_by_question(question.id)
        .await
        .unwrap();
    let values: Vec<&str> = listed.iter().map(|option| option.value.as_str()).collect();
    assert_eq!(values, vec!["First", "Middle", "Last"]);
}

#[tokio::test]
async fn bulk_create_checks_only_first_question_id() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let radio = env.create_question(survey.id, QuestionType::Radio).await;
    let text = env.create_question(survey.id, QuestionType::Text).await;

    // Only the first element's question is inspected, so a batch that
    // smuggles a text-question id in a later element still goes through.
    let inserted = env
        .services
        .options
        .create_bulk(vec![
            CreateOption {
                value: "Red".into(),
                display_order: 1,
                question_id: radio.id,
            },
            CreateOption {
                value: "Stowaway".into(),
                display_order: 2,
                question_id: text.id,
            },
        ])
        .await
        .unwrap();
    assert_eq!(inserted.len(), 2);

    // The reverse order is caught.
    let err = env
        .services
        .options
        .create_bulk(vec![
            CreateOption {
                value: "Stowaway".into(),
                display_order: 1,
                question_id: text.id,
            },
            CreateOption {
                value: "Red".into(),
                display_order: 2,
                question_id: radio.id,
            },
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));
}

#[tokio::test]
async fn empty_bulk_batch_is_rejected() {
    let env = test_env();
    let err = env.services.options.create_bulk(vec![]).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidOperation(_)));
}

#[tokio::test]
async fn option_update_and_missing_lookups() {
    let env = test_env();
    let admin = env.create_admin().await;
    let product = env.create_product().await;
    let survey = env.create_survey(&admin, &product).await;
    let question = env.create_question(survey.id, QuestionType::Checkbox).await;
    let options = env.create_options(question.id, 2).await;

    let updated = env
        .services
        .options
        .update(
            options[0].id,
            UpdateOption {
                value: "Renamed".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.value, "Renamed");
    // Order and parent question are not updatable.
    assert_eq!(updated.display_order, options[0].display_order);
    assert_eq!(updated.question_id, question.id);

    let err = env
        .services
        .options
        .get(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = env
        .services
        .options
        .list_by_question(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
