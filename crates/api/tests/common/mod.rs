#![allow(dead_code)]

use std::sync::Arc;

use api::auth::{AuthConfig, CurrentUser, UserRole};
use api::repo::Repos;
use api::services::auth::RegisterInput;
use api::services::enrollment::{CreateEnrollment, EnrollmentOut};
use api::services::option::{CreateOption, OptionOut};
use api::services::product::{CreateProduct, ProductOut};
use api::services::question::{CreateQuestion, QuestionOut};
use api::services::survey::{CreateSurvey, SurveyOut};
use api::services::user::{CreateUser, UserOut};
use api::services::Services;
use entity::question::QuestionType;
use entity::role::ADMIN_ROLE_ID;
use uuid::Uuid;

pub struct TestEnv {
    pub services: Services,
}

pub fn test_env() -> TestEnv {
    let config = Arc::new(AuthConfig {
        jwt_secret: "test-secret".into(),
        session_ttl_minutes: 15,
    });
    TestEnv {
        services: Services::new(Repos::in_memory(), config),
    }
}

pub fn admin_caller() -> CurrentUser {
    CurrentUser {
        user_id: Uuid::new_v4(),
        role: UserRole::Admin,
    }
}

pub fn caller_for(user: &UserOut) -> CurrentUser {
    CurrentUser {
        user_id: user.id,
        role: UserRole::User,
    }
}

impl TestEnv {
    pub async fn create_admin(&self) -> UserOut {
        self.services
            .users
            .create(CreateUser {
                name: "Admin".into(),
                email: format!("admin-{}@example.com", Uuid::new_v4()),
                password: "admin-pass".into(),
                role_id: ADMIN_ROLE_ID,
                address: None,
            })
            .await
            .unwrap()
    }

    pub async fn create_respondent(&self) -> UserOut {
        self.services
            .auth
            .register(RegisterInput {
                name: "Respondent".into(),
                email: format!("respondent-{}@example.com", Uuid::new_v4()),
                password: "respondent-pass".into(),
                address: None,
            })
            .await
            .unwrap()
    }

    pub async fn create_product(&self) -> ProductOut {
        self.services
            .products
            .create(CreateProduct {
                name: format!("Product {}", Uuid::new_v4()),
            })
            .await
            .unwrap()
    }

    pub async fn create_survey(&self, creator: &UserOut, product: &ProductOut) -> SurveyOut {
        self.services
            .surveys
            .create(CreateSurvey {
                title: "Feedback".into(),
                creator_user_id: creator.id,
                product_id: product.id,
            })
            .await
            .unwrap()
    }

    pub async fn create_question(
        &self,
        survey_id: Uuid,
        question_type: QuestionType,
    ) -> QuestionOut {
        self.services
            .questions
            .create(CreateQuestion {
                text: match question_type {
                    QuestionType::Text => "Any other thoughts?".into(),
                    QuestionType::Rating => "How would you rate it?".into(),
                    QuestionType::Radio => "Pick your favourite".into(),
                    QuestionType::Checkbox => "Pick all that apply".into(),
                },
                question_type,
                is_mandatory: true,
                survey_id,
            })
            .await
            .unwrap()
    }

    pub async fn create_options(&self, question_id: Uuid, count: usize) -> Vec<OptionOut> {
        let inputs = (0..count)
            .map(|order| CreateOption {
                value: format!("Option {}", order + 1),
                display_order: order as i32 + 1,
                question_id,
            })
            .collect();
        self.services.options.create_bulk(inputs).await.unwrap()
    }

    pub async fn enroll(&self, user: &UserOut, survey: &SurveyOut) -> EnrollmentOut {
        self.services
            .enrollments
            .create(CreateEnrollment {
                user_id: user.id,
                survey_id: survey.id,
            })
            .await
            .unwrap()
    }
}
