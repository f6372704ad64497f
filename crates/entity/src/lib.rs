pub mod product;
pub mod question;
pub mod question_option;
pub mod response;
pub mod response_option;
pub mod role;
pub mod survey;
pub mod user;
pub mod user_survey;
