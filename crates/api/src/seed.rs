//! Demo data for local development: one administrator, one respondent, a
//! product with a four-question survey (one question of each type) and the
//! respondent enrolled in it.

use entity::question::QuestionType;
use entity::role::ADMIN_ROLE_ID;

use crate::error::ApiError;
use crate::services::auth::RegisterInput;
use crate::services::enrollment::CreateEnrollment;
use crate::services::option::CreateOption;
use crate::services::product::CreateProduct;
use crate::services::question::CreateQuestion;
use crate::services::survey::CreateSurvey;
use crate::services::user::CreateUser;
use crate::services::Services;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const RESPONDENT_EMAIL: &str = "respondent@example.com";
pub const RESPONDENT_PASSWORD: &str = "respondent-password";

pub async fn seed_demo(services: &Services) -> Result<(), ApiError> {
    let already = services
        .users
        .list()
        .await?
        .iter()
        .any(|user| user.email == ADMIN_EMAIL);
    if already {
        tracing::info!("demo data already present, skipping seed");
        return Ok(());
    }

    let admin = services
        .users
        .create(CreateUser {
            name: "Demo Admin".into(),
            email: ADMIN_EMAIL.into(),
            password: ADMIN_PASSWORD.into(),
            role_id: ADMIN_ROLE_ID,
            address: None,
        })
        .await?;

    let respondent = services
        .auth
        .register(RegisterInput {
            name: "Demo Respondent".into(),
            email: RESPONDENT_EMAIL.into(),
            password: RESPONDENT_PASSWORD.into(),
            address: Some("12 Survey Lane".into()),
        })
        .await?;

    let product = services
        .products
        .create(CreateProduct {
            name: "Demo Product".into(),
        })
        .await?;

    let survey = services
        .surveys
        .create(CreateSurvey {
            title: "Demo Product Feedback".into(),
            creator_user_id: admin.id,
            product_id: product.id,
        })
        .await?;

    services
        .questions
        .create(CreateQuestion {
            text: "What did you think of the product overall?".into(),
            question_type: QuestionType::Text,
            is_mandatory: true,
            survey_id: survey.id,
        })
        .await?;

    services
        .questions
        .create(CreateQuestion {
            text: "How would you rate the product?".into(),
            question_type: QuestionType::Rating,
            is_mandatory: true,
            survey_id: survey.id,
        })
        .await?;

    let radio = services
        .questions
        .create(CreateQuestion {
            text: "Which feature do you use most?".into(),
            question_type: QuestionType::Radio,
            is_mandatory: true,
            survey_id: survey.id,
        })
        .await?;
    services
        .options
        .create_bulk(
            ["Dashboards", "Reports", "Alerts"]
                .into_iter()
                .enumerate()
                .map(|(order, value)| CreateOption {
                    value: value.into(),
                    display_order: order as i32 + 1,
                    question_id: radio.id,
                })
                .collect(),
        )
        .await?;

    let checkbox = services
        .questions
        .create(CreateQuestion {
            text: "Where did you hear about us?".into(),
            question_type: QuestionType::Checkbox,
            is_mandatory: false,
            survey_id: survey.id,
        })
        .await?;
    services
        .options
        .create_bulk(
            ["Search", "A friend", "Social media", "Advertising"]
                .into_iter()
                .enumerate()
                .map(|(order, value)| CreateOption {
                    value: value.into(),
                    display_order: order as i32 + 1,
                    question_id: checkbox.id,
                })
                .collect(),
        )
        .await?;

    services
        .enrollments
        .create(CreateEnrollment {
            user_id: respondent.id,
            survey_id: survey.id,
        })
        .await?;

    tracing::info!(survey_id = %survey.id, "demo data seeded");
    Ok(())
}
