//! Per-entity data-access traits and their two implementations: a sea-orm
//! backed one for the server and an in-memory one for tests. Services only
//! ever see the traits.
//!
//! Both implementations stamp the `created_at` / `updated_at` audit columns
//! themselves (created once on insert, refreshed on every write); calling
//! code never touches them.

pub mod db;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use entity::{product, question, question_option, response, role, survey, user, user_survey};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::ApiError;

pub type RepoResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait RoleRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<role::Model>>;
    async fn find(&self, id: i32) -> RepoResult<Option<role::Model>>;
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<user::Model>>;
    async fn find(&self, id: Uuid) -> RepoResult<Option<user::Model>>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<user::Model>>;
    async fn insert(&self, model: user::Model) -> RepoResult<user::Model>;
    async fn update(&self, model: user::Model) -> RepoResult<user::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<product::Model>>;
    async fn find(&self, id: Uuid) -> RepoResult<Option<product::Model>>;
    async fn insert(&self, model: product::Model) -> RepoResult<product::Model>;
    async fn update(&self, model: product::Model) -> RepoResult<product::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait SurveyRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<survey::Model>>;
    async fn find(&self, id: Uuid) -> RepoResult<Option<survey::Model>>;
    async fn exists(&self, id: Uuid) -> RepoResult<bool>;
    async fn any_for_product(&self, product_id: Uuid) -> RepoResult<bool>;
    async fn any_for_creator(&self, user_id: Uuid) -> RepoResult<bool>;
    async fn insert(&self, model: survey::Model) -> RepoResult<survey::Model>;
    async fn update(&self, model: survey::Model) -> RepoResult<survey::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait QuestionRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<question::Model>>;
    async fn find(&self, id: Uuid) -> RepoResult<Option<question::Model>>;
    async fn list_by_survey(&self, survey_id: Uuid) -> RepoResult<Vec<question::Model>>;
    async fn insert(&self, model: question::Model) -> RepoResult<question::Model>;
    async fn update(&self, model: question::Model) -> RepoResult<question::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait OptionRepo: Send + Sync {
    async fn find(&self, id: Uuid) -> RepoResult<Option<question_option::Model>>;
    async fn list_by_question(&self, question_id: Uuid)
        -> RepoResult<Vec<question_option::Model>>;
    async fn insert(&self, model: question_option::Model) -> RepoResult<question_option::Model>;
    async fn insert_many(
        &self,
        models: Vec<question_option::Model>,
    ) -> RepoResult<Vec<question_option::Model>>;
    async fn update(&self, model: question_option::Model) -> RepoResult<question_option::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
    async fn delete_by_question(&self, question_id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait EnrollmentRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<user_survey::Model>>;
    async fn find(&self, id: Uuid) -> RepoResult<Option<user_survey::Model>>;
    async fn list_by_survey(&self, survey_id: Uuid) -> RepoResult<Vec<user_survey::Model>>;
    async fn list_by_user(&self, user_id: Uuid) -> RepoResult<Vec<user_survey::Model>>;
    async fn insert(&self, model: user_survey::Model) -> RepoResult<user_survey::Model>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

#[async_trait]
pub trait ResponseRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<response::Model>>;
    async fn find(&self, id: Uuid) -> RepoResult<Option<response::Model>>;
    /// Persists the response together with its selected options.
    async fn insert(
        &self,
        model: response::Model,
        option_ids: &[Uuid],
    ) -> RepoResult<response::Model>;
    /// Rewrites the response and replaces its stored option set wholesale.
    async fn update(
        &self,
        model: response::Model,
        option_ids: &[Uuid],
    ) -> RepoResult<response::Model>;
    async fn option_ids(&self, response_id: Uuid) -> RepoResult<Vec<Uuid>>;
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
    async fn delete_by_enrollment(&self, user_survey_id: Uuid) -> RepoResult<()>;
    async fn any_for_enrollment(&self, user_survey_id: Uuid) -> RepoResult<bool>;
    async fn any_for_question(&self, question_id: Uuid) -> RepoResult<bool>;
    async fn any_for_option(&self, option_id: Uuid) -> RepoResult<bool>;
}

/// The full repository set handed to services. Cloning is cheap; all
/// members are shared.
#[derive(Clone)]
pub struct Repos {
    pub roles: Arc<dyn RoleRepo>,
    pub users: Arc<dyn UserRepo>,
    pub products: Arc<dyn ProductRepo>,
    pub surveys: Arc<dyn SurveyRepo>,
    pub questions: Arc<dyn QuestionRepo>,
    pub options: Arc<dyn OptionRepo>,
    pub enrollments: Arc<dyn EnrollmentRepo>,
    pub responses: Arc<dyn ResponseRepo>,
}

impl Repos {
    /// Production wiring over a live database connection.
    pub fn database(db: Arc<DatabaseConnection>) -> Self {
        db::build(db)
    }

    /// The swappable test seam: everything in process, role seed included.
    pub fn in_memory() -> Self {
        memory::build()
    }
}
