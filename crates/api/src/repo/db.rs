//! sea-orm repository implementations backing the live server.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use entity::{product, question, question_option, response, response_option, role, survey, user,
    user_survey};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use super::{
    EnrollmentRepo, OptionRepo, ProductRepo, QuestionRepo, RepoResult, Repos, ResponseRepo,
    RoleRepo, SurveyRepo, UserRepo,
};

pub fn build(db: Arc<DatabaseConnection>) -> Repos {
    Repos {
        roles: Arc::new(Roles { db: db.clone() }),
        users: Arc::new(Users { db: db.clone() }),
        products: Arc::new(Products { db: db.clone() }),
        surveys: Arc::new(Surveys { db: db.clone() }),
        questions: Arc::new(Questions { db: db.clone() }),
        options: Arc::new(Options { db: db.clone() }),
        enrollments: Arc::new(Enrollments { db: db.clone() }),
        responses: Arc::new(Responses { db }),
    }
}

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

struct Roles {
    db: Arc<DatabaseConnection>,
}

#[async_trait]
impl RoleRepo for Roles {
    async fn list(&self) -> RepoResult<Vec<role::Model>> {
        Ok(role::Entity::find()
            .order_by_asc(role::Column::Id)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find(&self, id: i32) -> RepoResult<Option<role::Model>> {
        Ok(role::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }
}

struct Users {
    db: Arc<DatabaseConnection>,
}

#[async_trait]
impl UserRepo for Users {
    async fn list(&self) -> RepoResult<Vec<user::Model>> {
        Ok(user::Entity::find()
            .order_by_asc(user::Column::Email)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<user::Model>> {
        Ok(user::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?)
    }

    async fn insert(&self, model: user::Model) -> RepoResult<user::Model> {
        let stamp = now();
        Ok(user::ActiveModel {
            id: Set(model.id),
            name: Set(model.name),
            email: Set(model.email),
            password_hash: Set(model.password_hash),
            role_id: Set(model.role_id),
            address: Set(model.address),
            created_at: Set(stamp),
            updated_at: Set(stamp),
        }
        .insert(self.db.as_ref())
        .await?)
    }

    async fn update(&self, model: user::Model) -> RepoResult<user::Model> {
        Ok(user::ActiveModel {
            id: Unchanged(model.id),
            name: Set(model.name),
            email: Set(model.email),
            password_hash: Set(model.password_hash),
            role_id: Set(model.role_id),
            address: Set(model.address),
            created_at: Unchanged(model.created_at),
            updated_at: Set(now()),
        }
        .update(self.db.as_ref())
        .await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        user::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(())
    }
}

struct Products {
    db: Arc<DatabaseConnection>,
}

#[async_trait]
impl ProductRepo for Products {
    async fn list(&self) -> RepoResult<Vec<product::Model>> {
        Ok(product::Entity::find()
            .order_by_asc(product::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<product::Model>> {
        Ok(product::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn insert(&self, model: product::Model) -> RepoResult<product::Model> {
        let stamp = now();
        Ok(product::ActiveModel {
            id: Set(model.id),
            name: Set(model.name),
            created_at: Set(stamp),
            updated_at: Set(stamp),
        }
        .insert(self.db.as_ref())
        .await?)
    }

    async fn update(&self, model: product::Model) -> RepoResult<product::Model> {
        Ok(product::ActiveModel {
            id: Unchanged(model.id),
            name: Set(model.name),
            created_at: Unchanged(model.created_at),
            updated_at: Set(now()),
        }
        .update(self.db.as_ref())
        .await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        product::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

struct Surveys {
    db: Arc<DatabaseConnection>,
}

#[async_trait]
impl SurveyRepo for Surveys {
    async fn list(&self) -> RepoResult<Vec<survey::Model>> {
        Ok(survey::Entity::find()
            .order_by_asc(survey::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<survey::Model>> {
        Ok(survey::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        Ok(survey::Entity::find_by_id(id)
            .count(self.db.as_ref())
            .await?
            > 0)
    }

    async fn any_for_product(&self, product_id: Uuid) -> RepoResult<bool> {
        Ok(survey::Entity::find()
            .filter(survey::Column::ProductId.eq(product_id))
            .count(self.db.as_ref())
            .await?
            > 0)
    }

    async fn any_for_creator(&self, user_id: Uuid) -> RepoResult<bool> {
        Ok(survey::Entity::find()
            .filter(survey::Column::CreatorUserId.eq(user_id))
            .count(self.db.as_ref())
            .await?
            > 0)
    }

    async fn insert(&self, model: survey::Model) -> RepoResult<survey::Model> {
        let stamp = now();
        Ok(survey::ActiveModel {
            id: Set(model.id),
            title: Set(model.title),
            creator_user_id: Set(model.creator_user_id),
            product_id: Set(model.product_id),
            created_at: Set(stamp),
            updated_at: Set(stamp),
        }
        .insert(self.db.as_ref())
        .await?)
    }

    async fn update(&self, model: survey::Model) -> RepoResult<survey::Model> {
        Ok(survey::ActiveModel {
            id: Unchanged(model.id),
            title: Set(model.title),
            creator_user_id: Set(model.creator_user_id),
            product_id: Set(model.product_id),
            created_at: Unchanged(model.created_at),
            updated_at: Set(now()),
        }
        .update(self.db.as_ref())
        .await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        survey::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

struct Questions {
    db: Arc<DatabaseConnection>,
}

#[async_trait]
impl QuestionRepo for Questions {
    async fn list(&self) -> RepoResult<Vec<question::Model>> {
        Ok(question::Entity::find()
            .order_by_asc(question::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<question::Model>> {
        Ok(question::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?)
    }

    async fn list_by_survey(&self, survey_id: Uuid) -> RepoResult<Vec<question::Model>> {
        Ok(question::Entity::find()
            .filter(question::Column::SurveyId.eq(survey_id))
            .order_by_asc(question::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    async fn insert(&self, model: question::Model) -> RepoResult<question::Model> {
        let stamp = now();
        Ok(question::ActiveModel {
            id: Set(model.id),
            text: Set(model.text),
            question_type: Set(model.question_type),
            is_mandatory: Set(model.is_mandatory),
            survey_id: Set(model.survey_id),
            created_at: Set(stamp),
            updated_at: Set(stamp),
        }
        .insert(self.db.as_ref())
        .await?)
    }

    async fn update(&self, model: question::Model) -> RepoResult<question::Model> {
        Ok(question::ActiveModel {
            id: Unchanged(model.id),
            text: Set(model.text),
            question_type: Set(model.question_type),
            is_mandatory: Set(model.is_mandatory),
            survey_id: Set(model.survey_id),
            created_at: Unchanged(model.created_at),
            updated_at: Set(now()),
        }
        .update(self.db.as_ref())
        .await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        question::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

struct Options {
    db: Arc<DatabaseConnection>,
}

fn option_active(model: question_option::Model, stamp: DateTimeWithTimeZone) -> question_option::ActiveModel {
    question_option::ActiveModel {
        id: Set(model.id),
        value: Set(model.value),
        display_order: Set(model.display_order),
        question_id: Set(model.question_id),
        created_at: Set(stamp),
        updated_at: Set(stamp),
    }
}

#[async_trait]
impl OptionRepo for Options {
    async fn find(&self, id: Uuid) -> RepoResult<Option<question_option::Model>> {
        Ok(question_option::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?)
    }

    async fn list_by_question(
        &self,
        question_id: Uuid,
    ) -> RepoResult<Vec<question_option::Model>> {
        Ok(question_option::Entity::find()
            .filter(question_option::Column::QuestionId.eq(question_id))
            .order_by_asc(question_option::Column::DisplayOrder)
            .all(self.db.as_ref())
            .await?)
    }

    async fn insert(&self, model: question_option::Model) -> RepoResult<question_option::Model> {
        Ok(option_active(model, now()).insert(self.db.as_ref()).await?)
    }

    async fn insert_many(
        &self,
        models: Vec<question_option::Model>,
    ) -> RepoResult<Vec<question_option::Model>> {
        let stamp = now();
        let txn = self.db.begin().await?;
        let mut inserted = Vec::with_capacity(models.len());
        for model in models {
            inserted.push(option_active(model, stamp).insert(&txn).await?);
        }
        txn.commit().await?;
        Ok(inserted)
    }

    async fn update(&self, model: question_option::Model) -> RepoResult<question_option::Model> {
        Ok(question_option::ActiveModel {
            id: Unchanged(model.id),
            value: Set(model.value),
            display_order: Set(model.display_order),
            question_id: Set(model.question_id),
            created_at: Unchanged(model.created_at),
            updated_at: Set(now()),
        }
        .update(self.db.as_ref())
        .await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        question_option::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn delete_by_question(&self, question_id: Uuid) -> RepoResult<()> {
        question_option::Entity::delete_many()
            .filter(question_option::Column::QuestionId.eq(question_id))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

struct Enrollments {
    db: Arc<DatabaseConnection>,
}

#[async_trait]
impl EnrollmentRepo for Enrollments {
    async fn list(&self) -> RepoResult<Vec<user_survey::Model>> {
        Ok(user_survey::Entity::find()
            .order_by_asc(user_survey::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<user_survey::Model>> {
        Ok(user_survey::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?)
    }

    async fn list_by_survey(&self, survey_id: Uuid) -> RepoResult<Vec<user_survey::Model>> {
        Ok(user_survey::Entity::find()
            .filter(user_survey::Column::SurveyId.eq(survey_id))
            .all(self.db.as_ref())
            .await?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> RepoResult<Vec<user_survey::Model>> {
        Ok(user_survey::Entity::find()
            .filter(user_survey::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await?)
    }

    async fn insert(&self, model: user_survey::Model) -> RepoResult<user_survey::Model> {
        let stamp = now();
        Ok(user_survey::ActiveModel {
            id: Set(model.id),
            user_id: Set(model.user_id),
            survey_id: Set(model.survey_id),
            created_at: Set(stamp),
            updated_at: Set(stamp),
        }
        .insert(self.db.as_ref())
        .await?)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        user_survey::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}

struct Responses {
    db: Arc<DatabaseConnection>,
}

fn response_active(model: &response::Model, created_at: DateTimeWithTimeZone, updated_at: DateTimeWithTimeZone, fresh: bool) -> response::ActiveModel {
    response::ActiveModel {
        id: if fresh { Set(model.id) } else { Unchanged(model.id) },
        user_survey_id: Set(model.user_survey_id),
        question_id: Set(model.question_id),
        rating: Set(model.rating),
        feedback_text: Set(model.feedback_text.clone()),
        created_at: if fresh { Set(created_at) } else { Unchanged(created_at) },
        updated_at: Set(updated_at),
    }
}

#[async_trait]
impl ResponseRepo for Responses {
    async fn list(&self) -> RepoResult<Vec<response::Model>> {
        Ok(response::Entity::find()
            .order_by_asc(response::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<response::Model>> {
        Ok(response::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?)
    }

    async fn insert(
        &self,
        model: response::Model,
        option_ids: &[Uuid],
    ) -> RepoResult<response::Model> {
        let stamp = now();
        let txn = self.db.begin().await?;
        let inserted = response_active(&model, stamp, stamp, true).insert(&txn).await?;
        for option_id in option_ids {
            response_option::ActiveModel {
                response_id: Set(inserted.id),
                option_id: Set(*option_id),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        Ok(inserted)
    }

    async fn update(
        &self,
        model: response::Model,
        option_ids: &[Uuid],
    ) -> RepoResult<response::Model> {
        let txn = self.db.begin().await?;
        let updated = response_active(&model, model.created_at, now(), false)
            .update(&txn)
            .await?;
        response_option::Entity::delete_many()
            .filter(response_option::Column::ResponseId.eq(model.id))
            .exec(&txn)
            .await?;
        for option_id in option_ids {
            response_option::ActiveModel {
                response_id: Set(model.id),
                option_id: Set(*option_id),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        Ok(updated)
    }

    async fn option_ids(&self, response_id: Uuid) -> RepoResult<Vec<Uuid>> {
        Ok(response_option::Entity::find()
            .filter(response_option::Column::ResponseId.eq(response_id))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|row| row.option_id)
            .collect())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let txn = self.db.begin().await?;
        response_option::Entity::delete_many()
            .filter(response_option::Column::ResponseId.eq(id))
            .exec(&txn)
            .await?;
        response::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn delete_by_enrollment(&self, user_survey_id: Uuid) -> RepoResult<()> {
        let ids: Vec<Uuid> = response::Entity::find()
            .filter(response::Column::UserSurveyId.eq(user_survey_id))
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|row| row.id)
            .collect();
        if ids.is_empty() {
            return Ok(());
        }
        let txn = self.db.begin().await?;
        response_option::Entity::delete_many()
            .filter(response_option::Column::ResponseId.is_in(ids.clone()))
            .exec(&txn)
            .await?;
        response::Entity::delete_many()
            .filter(response::Column::Id.is_in(ids))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(())
    }

    async fn any_for_enrollment(&self, user_survey_id: Uuid) -> RepoResult<bool> {
        Ok(response::Entity::find()
            .filter(response::Column::UserSurveyId.eq(user_survey_id))
            .count(self.db.as_ref())
            .await?
            > 0)
    }

    async fn any_for_question(&self, question_id: Uuid) -> RepoResult<bool> {
        Ok(response::Entity::find()
            .filter(response::Column::QuestionId.eq(question_id))
            .count(self.db.as_ref())
            .await?
            > 0)
    }

    async fn any_for_option(&self, option_id: Uuid) -> RepoResult<bool> {
        Ok(response_option::Entity::find()
            .filter(response_option::Column::OptionId.eq(option_id))
            .count(self.db.as_ref())
            .await?
            > 0)
    }
}
