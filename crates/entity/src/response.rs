use sea_orm::entity::prelude::*;

/// One answer to one question within one enrollment. Which of the optional
/// fields is populated is dictated by the question's type; the others stay
/// null.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "response")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub user_survey_id: Uuid,
    #[sea_orm(indexed)]
    pub question_id: Uuid,
    pub rating: Option<i32>,
    pub feedback_text: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_survey::Entity",
        from = "Column::UserSurveyId",
        to = "super::user_survey::Column::Id",
        on_delete = "Cascade"
    )]
    UserSurvey,
    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Restrict"
    )]
    Question,
}

impl Related<super::user_survey::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSurvey.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
