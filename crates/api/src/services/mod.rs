//! Business-rule layer. Each service owns the rules for one aggregate and
//! talks only to the repository traits, so the whole layer runs unchanged
//! against the database or the in-memory store.

pub mod auth;
pub mod enrollment;
pub mod option;
pub mod product;
pub mod question;
pub mod response;
pub mod survey;
pub mod user;

use std::sync::Arc;

use crate::auth::AuthConfig;
use crate::repo::Repos;

pub use auth::AuthService;
pub use enrollment::EnrollmentService;
pub use option::OptionService;
pub use product::ProductService;
pub use question::QuestionService;
pub use response::ResponseService;
pub use survey::SurveyService;
pub use user::UserService;

/// Every service, wired over one repository set.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub users: UserService,
    pub products: ProductService,
    pub surveys: SurveyService,
    pub questions: QuestionService,
    pub options: OptionService,
    pub enrollments: EnrollmentService,
    pub responses: ResponseService,
}

impl Services {
    pub fn new(repos: Repos, auth_config: Arc<AuthConfig>) -> Self {
        Services {
            auth: AuthService::new(repos.clone(), auth_config),
            users: UserService::new(repos.clone()),
            products: ProductService::new(repos.clone()),
            surveys: SurveyService::new(repos.clone()),
            questions: QuestionService::new(repos.clone()),
            options: OptionService::new(repos.clone()),
            enrollments: EnrollmentService::new(repos.clone()),
            responses: ResponseService::new(repos),
        }
    }
}
