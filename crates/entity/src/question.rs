use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    pub is_mandatory: bool,
    #[sea_orm(indexed)]
    pub survey_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::survey::Entity",
        from = "Column::SurveyId",
        to = "super::survey::Column::Id",
        on_delete = "Cascade"
    )]
    Survey,
}

impl Related<super::survey::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Survey.def()
    }
}

impl Related<super::question_option::Entity> for Entity {
    fn to() -> RelationDef {
        super::question_option::Relation::Question.def().rev()
    }
}

/// The 4-way answer-shape discriminator. Fixed at question creation.
#[derive(Copy, Clone, Debug, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum QuestionType {
    #[sea_orm(string_value = "TEXT")]
    Text,
    #[sea_orm(string_value = "RATING")]
    Rating,
    #[sea_orm(string_value = "RADIO")]
    Radio,
    #[sea_orm(string_value = "CHECKBOX")]
    Checkbox,
}

impl ActiveModelBehavior for ActiveModel {}
