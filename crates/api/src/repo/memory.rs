//! In-process repository set used by the test suites and the demo seeder.
//! Mirrors the database implementation's semantics: audit stamping, stable
//! orderings, the role seed, and whole-set replacement of response options.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use entity::{product, question, question_option, response, response_option, role, survey, user,
    user_survey};
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

use super::{
    EnrollmentRepo, OptionRepo, ProductRepo, QuestionRepo, RepoResult, Repos, ResponseRepo,
    RoleRepo, SurveyRepo, UserRepo,
};
use crate::error::ApiError;

pub fn build() -> Repos {
    let store = Arc::new(Store::seeded());
    Repos {
        roles: Arc::new(Roles(store.clone())),
        users: Arc::new(Users(store.clone())),
        products: Arc::new(Products(store.clone())),
        surveys: Arc::new(Surveys(store.clone())),
        questions: Arc::new(Questions(store.clone())),
        options: Arc::new(Options(store.clone())),
        enrollments: Arc::new(Enrollments(store.clone())),
        responses: Arc::new(Responses(store)),
    }
}

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

#[derive(Default)]
struct Tables {
    roles: HashMap<i32, role::Model>,
    users: HashMap<Uuid, user::Model>,
    products: HashMap<Uuid, product::Model>,
    surveys: HashMap<Uuid, survey::Model>,
    questions: HashMap<Uuid, question::Model>,
    options: HashMap<Uuid, question_option::Model>,
    enrollments: HashMap<Uuid, user_survey::Model>,
    responses: HashMap<Uuid, response::Model>,
    response_options: Vec<response_option::Model>,
}

struct Store(Mutex<Tables>);

impl Store {
    fn seeded() -> Self {
        let mut tables = Tables::default();
        for (id, name) in [
            (entity::role::ADMIN_ROLE_ID, "Admin"),
            (entity::role::USER_ROLE_ID, "User"),
        ] {
            tables.roles.insert(
                id,
                role::Model {
                    id,
                    name: name.to_string(),
                },
            );
        }
        Store(Mutex::new(tables))
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.0.lock().expect("store mutex poisoned")
    }
}

fn sorted_by_created<M: Clone>(
    rows: impl Iterator<Item = M>,
    key: impl Fn(&M) -> (DateTimeWithTimeZone, Uuid),
) -> Vec<M> {
    let mut out: Vec<M> = rows.collect();
    out.sort_by_key(|row| key(row));
    out
}

struct Roles(Arc<Store>);

#[async_trait]
impl RoleRepo for Roles {
    async fn list(&self) -> RepoResult<Vec<role::Model>> {
        let tables = self.0.lock();
        let mut out: Vec<role::Model> = tables.roles.values().cloned().collect();
        out.sort_by_key(|row| row.id);
        Ok(out)
    }

    async fn find(&self, id: i32) -> RepoResult<Option<role::Model>> {
        Ok(self.0.lock().roles.get(&id).cloned())
    }
}

struct Users(Arc<Store>);

#[async_trait]
impl UserRepo for Users {
    async fn list(&self) -> RepoResult<Vec<user::Model>> {
        let tables = self.0.lock();
        let mut out: Vec<user::Model> = tables.users.values().cloned().collect();
        out.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(out)
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<user::Model>> {
        Ok(self.0.lock().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<user::Model>> {
        Ok(self
            .0
            .lock()
            .users
            .values()
            .find(|row| row.email == email)
            .cloned())
    }

    async fn insert(&self, mut model: user::Model) -> RepoResult<user::Model> {
        let mut tables = self.0.lock();
        // Same guarantee the unique index gives the database backend.
        if tables.users.values().any(|row| row.email == model.email) {
            return Err(ApiError::conflict("a user with this email already exists"));
        }
        let stamp = now();
        model.created_at = stamp;
        model.updated_at = stamp;
        tables.users.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update(&self, mut model: user::Model) -> RepoResult<user::Model> {
        let mut tables = self.0.lock();
        let existing = tables
            .users
            .get(&model.id)
            .ok_or_else(|| ApiError::not_found("user not found"))?;
        model.created_at = existing.created_at;
        model.updated_at = now();
        tables.users.insert(model.id, model.clone());
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.0.lock().users.remove(&id);
        Ok(())
    }
}

struct Products(Arc<Store>);

#[async_trait]
impl ProductRepo for Products {
    async fn list(&self) -> RepoResult<Vec<product::Model>> {
        let tables = self.0.lock();
        let mut out: Vec<product::Model> = tables.products.values().cloned().collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<product::Model>> {
        Ok(self.0.lock().products.get(&id).cloned())
    }

    async fn insert(&self, mut model: product::Model) -> RepoResult<product::Model> {
        let stamp = now();
        model.created_at = stamp;
        model.updated_at = stamp;
        self.0.lock().products.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update(&self, mut model: product::Model) -> RepoResult<product::Model> {
        let mut tables = self.0.lock();
        let existing = tables
            .products
            .get(&model.id)
            .ok_or_else(|| ApiError::not_found("product not found"))?;
        model.created_at = existing.created_at;
        model.updated_at = now();
        tables.products.insert(model.id, model.clone());
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.0.lock().products.remove(&id);
        Ok(())
    }
}

struct Surveys(Arc<Store>);

#[async_trait]
impl SurveyRepo for Surveys {
    async fn list(&self) -> RepoResult<Vec<survey::Model>> {
        let tables = self.0.lock();
        Ok(sorted_by_created(
            tables.surveys.values().cloned(),
            |row| (row.created_at, row.id),
        ))
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<survey::Model>> {
        Ok(self.0.lock().surveys.get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.0.lock().surveys.contains_key(&id))
    }

    async fn any_for_product(&self, product_id: Uuid) -> RepoResult<bool> {
        Ok(self
            .0
            .lock()
            .surveys
            .values()
            .any(|row| row.product_id == product_id))
    }

    async fn any_for_creator(&self, user_id: Uuid) -> RepoResult<bool> {
        Ok(self
            .0
            .lock()
            .surveys
            .values()
            .any(|row| row.creator_user_id == user_id))
    }

    async fn insert(&self, mut model: survey::Model) -> RepoResult<survey::Model> {
        let stamp = now();
        model.created_at = stamp;
        model.updated_at = stamp;
        self.0.lock().surveys.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update(&self, mut model: survey::Model) -> RepoResult<survey::Model> {
        let mut tables = self.0.lock();
        let existing = tables
            .surveys
            .get(&model.id)
            .ok_or_else(|| ApiError::not_found("survey not found"))?;
        model.created_at = existing.created_at;
        model.updated_at = now();
        tables.surveys.insert(model.id, model.clone());
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.0.lock().surveys.remove(&id);
        Ok(())
    }
}

struct Questions(Arc<Store>);

#[async_trait]
impl QuestionRepo for Questions {
    async fn list(&self) -> RepoResult<Vec<question::Model>> {
        let tables = self.0.lock();
        Ok(sorted_by_created(
            tables.questions.values().cloned(),
            |row| (row.created_at, row.id),
        ))
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<question::Model>> {
        Ok(self.0.lock().questions.get(&id).cloned())
    }

    async fn list_by_survey(&self, survey_id: Uuid) -> RepoResult<Vec<question::Model>> {
        let tables = self.0.lock();
        Ok(sorted_by_created(
            tables
                .questions
                .values()
                .filter(|row| row.survey_id == survey_id)
                .cloned(),
            |row| (row.created_at, row.id),
        ))
    }

    async fn insert(&self, mut model: question::Model) -> RepoResult<question::Model> {
        let stamp = now();
        model.created_at = stamp;
        model.updated_at = stamp;
        self.0.lock().questions.insert(model.id, model.clone());
        Ok(model)
    }

    async fn update(&self, mut model: question::Model) -> RepoResult<question::Model> {
        let mut tables = self.0.lock();
        let existing = tables
            .questions
            .get(&model.id)
            .ok_or_else(|| ApiError::not_found("question not found"))?;
        model.created_at = existing.created_at;
        model.updated_at = now();
        tables.questions.insert(model.id, model.clone());
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.0.lock().questions.remove(&id);
        Ok(())
    }
}

struct Options(Arc<Store>);

#[async_trait]
impl OptionRepo for Options {
    async fn find(&self, id: Uuid) -> RepoResult<Option<question_option::Model>> {
        Ok(self.0.lock().options.get(&id).cloned())
    }

    async fn list_by_question(
        &self,
        question_id: Uuid,
    ) -> RepoResult<Vec<question_option::Model>> {
        let tables = self.0.lock();
        let mut out: Vec<question_option::Model> = tables
            .options
            .values()
            .filter(|row| row.question_id == question_id)
            .cloned()
            .collect();
        out.sort_by_key(|row| (row.display_order, row.id));
        Ok(out)
    }

    async fn insert(&self, mut model: question_option::Model) -> RepoResult<question_option::Model> {
        let stamp = now();
        model.created_at = stamp;
        model.updated_at = stamp;
        self.0.lock().options.insert(model.id, model.clone());
        Ok(model)
    }

    async fn insert_many(
        &self,
        models: Vec<question_option::Model>,
    ) -> RepoResult<Vec<question_option::Model>> {
        let stamp = now();
        let mut tables = self.0.lock();
        let mut inserted = Vec::with_capacity(models.len());
        for mut model in models {
            model.created_at = stamp;
            model.updated_at = stamp;
            tables.options.insert(model.id, model.clone());
            inserted.push(model);
        }
        Ok(inserted)
    }

    async fn update(&self, mut model: question_option::Model) -> RepoResult<question_option::Model> {
        let mut tables = self.0.lock();
        let existing = tables
            .options
            .get(&model.id)
            .ok_or_else(|| ApiError::not_found("option not found"))?;
        model.created_at = existing.created_at;
        model.updated_at = now();
        tables.options.insert(model.id, model.clone());
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.0.lock().options.remove(&id);
        Ok(())
    }

    async fn delete_by_question(&self, question_id: Uuid) -> RepoResult<()> {
        self.0
            .lock()
            .options
            .retain(|_, row| row.question_id != question_id);
        Ok(())
    }
}

struct Enrollments(Arc<Store>);

#[async_trait]
impl EnrollmentRepo for Enrollments {
    async fn list(&self) -> RepoResult<Vec<user_survey::Model>> {
        let tables = self.0.lock();
        Ok(sorted_by_created(
            tables.enrollments.values().cloned(),
            |row| (row.created_at, row.id),
        ))
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<user_survey::Model>> {
        Ok(self.0.lock().enrollments.get(&id).cloned())
    }

    async fn list_by_survey(&self, survey_id: Uuid) -> RepoResult<Vec<user_survey::Model>> {
        let tables = self.0.lock();
        Ok(sorted_by_created(
            tables
                .enrollments
                .values()
                .filter(|row| row.survey_id == survey_id)
                .cloned(),
            |row| (row.created_at, row.id),
        ))
    }

    async fn list_by_user(&self, user_id: Uuid) -> RepoResult<Vec<user_survey::Model>> {
        let tables = self.0.lock();
        Ok(sorted_by_created(
            tables
                .enrollments
                .values()
                .filter(|row| row.user_id == user_id)
                .cloned(),
            |row| (row.created_at, row.id),
        ))
    }

    async fn insert(&self, mut model: user_survey::Model) -> RepoResult<user_survey::Model> {
        let stamp = now();
        model.created_at = stamp;
        model.updated_at = stamp;
        self.0.lock().enrollments.insert(model.id, model.clone());
        Ok(model)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.0.lock().enrollments.remove(&id);
        Ok(())
    }
}

struct Responses(Arc<Store>);

#[async_trait]
impl ResponseRepo for Responses {
    async fn list(&self) -> RepoResult<Vec<response::Model>> {
        let tables = self.0.lock();
        Ok(sorted_by_created(
            tables.responses.values().cloned(),
            |row| (row.created_at, row.id),
        ))
    }

    async fn find(&self, id: Uuid) -> RepoResult<Option<response::Model>> {
        Ok(self.0.lock().responses.get(&id).cloned())
    }

    async fn insert(
        &self,
        mut model: response::Model,
        option_ids: &[Uuid],
    ) -> RepoResult<response::Model> {
        let stamp = now();
        model.created_at = stamp;
        model.updated_at = stamp;
        let mut tables = self.0.lock();
        tables.responses.insert(model.id, model.clone());
        for option_id in option_ids {
            tables.response_options.push(response_option::Model {
                response_id: model.id,
                option_id: *option_id,
            });
        }
        Ok(model)
    }

    async fn update(
        &self,
        mut model: response::Model,
        option_ids: &[Uuid],
    ) -> RepoResult<response::Model> {
        let mut tables = self.0.lock();
        let existing = tables
            .responses
            .get(&model.id)
            .ok_or_else(|| ApiError::not_found("response not found"))?;
        model.created_at = existing.created_at;
        model.updated_at = now();
        tables.responses.insert(model.id, model.clone());
        tables
            .response_options
            .retain(|row| row.response_id != model.id);
        for option_id in option_ids {
            tables.response_options.push(response_option::Model {
                response_id: model.id,
                option_id: *option_id,
            });
        }
        Ok(model)
    }

    async fn option_ids(&self, response_id: Uuid) -> RepoResult<Vec<Uuid>> {
        Ok(self
            .0
            .lock()
            .response_options
            .iter()
            .filter(|row| row.response_id == response_id)
            .map(|row| row.option_id)
            .collect())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.0.lock();
        tables.responses.remove(&id);
        tables.response_options.retain(|row| row.response_id != id);
        Ok(())
    }

    async fn delete_by_enrollment(&self, user_survey_id: Uuid) -> RepoResult<()> {
        let mut tables = self.0.lock();
        let ids: Vec<Uuid> = tables
            .responses
            .values()
            .filter(|row| row.user_survey_id == user_survey_id)
            .map(|row| row.id)
            .collect();
        for id in &ids {
            tables.responses.remove(id);
        }
        tables
            .response_options
            .retain(|row| !ids.contains(&row.response_id));
        Ok(())
    }

    async fn any_for_enrollment(&self, user_survey_id: Uuid) -> RepoResult<bool> {
        Ok(self
            .0
            .lock()
            .responses
            .values()
            .any(|row| row.user_survey_id == user_survey_id))
    }

    async fn any_for_question(&self, question_id: Uuid) -> RepoResult<bool> {
        Ok(self
            .0
            .lock()
            .responses
            .values()
            .any(|row| row.question_id == question_id))
    }

    async fn any_for_option(&self, option_id: Uuid) -> RepoResult<bool> {
        Ok(self
            .0
            .lock()
            .response_options
            .iter()
            .any(|row| row.option_id == option_id))
    }
}
