use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Role { Table, Id, Name }

#[derive(DeriveIden)]
#[sea_orm(iden = "user")]
enum User { Table, Id, Name, Email, PasswordHash, RoleId, Address, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Product { Table, Id, Name, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Survey { Table, Id, Title, CreatorUserId, ProductId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Question { Table, Id, Text, QuestionType, IsMandatory, SurveyId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum QuestionOption { Table, Id, Value, DisplayOrder, QuestionId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum UserSurvey { Table, Id, UserId, SurveyId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Response { Table, Id, UserSurveyId, QuestionId, Rating, FeedbackText, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum ResponseOption { Table, ResponseId, OptionId }

#[derive(DeriveMigrationName)]
pub struct Migration;
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Extensions (safe if already present)
        manager.get_connection().execute_unprepared(r#"CREATE EXTENSION IF NOT EXISTS "pgcrypto";"#).await?;

        manager.create_table(
            Table::create()
                .table(Role::Table)
                .if_not_exists()
                .col(ColumnDef::new(Role::Id).integer().not_null().primary_key())
                .col(ColumnDef::new(Role::Name).string_len(64).not_null())
                .to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(User::Table)
                .if_not_exists()
                .col(ColumnDef::new(User::Id).uuid().not_null().primary_key().default(Expr::cust("gen_random_uuid()")))
                .col(ColumnDef::new(User::Name).string_len(256).not_null())
                .col(ColumnDef::new(User::Email).string_len(320).not_null())
                .col(ColumnDef::new(User::PasswordHash).string_len(256).not_null())
                .col(ColumnDef::new(User::RoleId).integer().not_null())
                .col(ColumnDef::new(User::Address).string_len(512))
                .col(ColumnDef::new(User::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_user_role")
                    .from(User::Table, User::RoleId)
                    .to(Role::Table, Role::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_user_email").table(User::Table).col(User::Email).unique().to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Product::Table)
                .if_not_exists()
                .col(ColumnDef::new(Product::Id).uuid().not_null().primary_key().default(Expr::cust("gen_random_uuid()")))
                .col(ColumnDef::new(Product::Name).string_len(256).not_null())
                .col(ColumnDef::new(Product::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(Product::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_product_name").table(Product::Table).col(Product::Name).to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Survey::Table)
                .if_not_exists()
                .col(ColumnDef::new(Survey::Id).uuid().not_null().primary_key().default(Expr::cust("gen_random_uuid()")))
                .col(ColumnDef::new(Survey::Title).string_len(512).not_null())
                .col(ColumnDef::new(Survey::CreatorUserId).uuid().not_null())
                .col(ColumnDef::new(Survey::ProductId).uuid().not_null())
                .col(ColumnDef::new(Survey::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(Survey::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_survey_creator")
                    .from(Survey::Table, Survey::CreatorUserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                )
                .foreign_key(ForeignKey::create()
                    .name("fk_survey_product")
                    .from(Survey::Table, Survey::ProductId)
                    .to(Product::Table, Product::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_survey_product").table(Survey::Table).col(Survey::ProductId).to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Question::Table)
                .if_not_exists()
                .col(ColumnDef::new(Question::Id).uuid().not_null().primary_key().default(Expr::cust("gen_random_uuid()")))
                .col(ColumnDef::new(Question::Text).string_len(1024).not_null())
                .col(ColumnDef::new(Question::QuestionType).string_len(16).not_null())
                .col(ColumnDef::new(Question::IsMandatory).boolean().not_null())
                .col(ColumnDef::new(Question::SurveyId).uuid().not_null())
                .col(ColumnDef::new(Question::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(Question::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_question_survey")
                    .from(Question::Table, Question::SurveyId)
                    .to(Survey::Table, Survey::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_question_survey").table(Question::Table).col(Question::SurveyId).to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(QuestionOption::Table)
                .if_not_exists()
                .col(ColumnDef::new(QuestionOption::Id).uuid().not_null().primary_key().default(Expr::cust("gen_random_uuid()")))
                .col(ColumnDef::new(QuestionOption::Value).string_len(512).not_null())
                .col(ColumnDef::new(QuestionOption::DisplayOrder).integer().not_null())
                .col(ColumnDef::new(QuestionOption::QuestionId).uuid().not_null())
                .col(ColumnDef::new(QuestionOption::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(QuestionOption::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_question_option_question")
                    .from(QuestionOption::Table, QuestionOption::QuestionId)
                    .to(Question::Table, Question::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_question_option_question").table(QuestionOption::Table).col(QuestionOption::QuestionId).to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(UserSurvey::Table)
                .if_not_exists()
                .col(ColumnDef::new(UserSurvey::Id).uuid().not_null().primary_key().default(Expr::cust("gen_random_uuid()")))
                .col(ColumnDef::new(UserSurvey::UserId).uuid().not_null())
                .col(ColumnDef::new(UserSurvey::SurveyId).uuid().not_null())
                .col(ColumnDef::new(UserSurvey::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(UserSurvey::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_user_survey_user")
                    .from(UserSurvey::Table, UserSurvey::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(ForeignKey::create()
                    .name("fk_user_survey_survey")
                    .from(UserSurvey::Table, UserSurvey::SurveyId)
                    .to(Survey::Table, Survey::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_user_survey_user").table(UserSurvey::Table).col(UserSurvey::UserId).to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_user_survey_survey").table(UserSurvey::Table).col(UserSurvey::SurveyId).to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Response::Table)
                .if_not_exists()
                .col(ColumnDef::new(Response::Id).uuid().not_null().primary_key().default(Expr::cust("gen_random_uuid()")))
                .col(ColumnDef::new(Response::UserSurveyId).uuid().not_null())
                .col(ColumnDef::new(Response::QuestionId).uuid().not_null())
                .col(ColumnDef::new(Response::Rating).integer())
                .col(ColumnDef::new(Response::FeedbackText).text())
                .col(ColumnDef::new(Response::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(Response::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_response_user_survey")
                    .from(Response::Table, Response::UserSurveyId)
                    .to(UserSurvey::Table, UserSurvey::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                )
                // Responses outlive their question unless explicitly allowed;
                // the service layer refuses deletes that would strand them.
                .foreign_key(ForeignKey::create()
                    .name("fk_response_question")
                    .from(Response::Table, Response::QuestionId)
                    .to(Question::Table, Question::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_response_user_survey").table(Response::Table).col(Response::UserSurveyId).to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_response_question").table(Response::Table).col(Response::QuestionId).to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(ResponseOption::Table)
                .if_not_exists()
                .col(ColumnDef::new(ResponseOption::ResponseId).uuid().not_null())
                .col(ColumnDef::new(ResponseOption::OptionId).uuid().not_null())
                .primary_key(Index::create().col(ResponseOption::ResponseId).col(ResponseOption::OptionId))
                .foreign_key(ForeignKey::create()
                    .name("fk_response_option_response")
                    .from(ResponseOption::Table, ResponseOption::ResponseId)
                    .to(Response::Table, Response::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(ForeignKey::create()
                    .name("fk_response_option_option")
                    .from(ResponseOption::Table, ResponseOption::OptionId)
                    .to(QuestionOption::Table, QuestionOption::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                )
                .to_owned()
        ).await?;

        // Fixed role seed; the auth default and the enrollment eligibility
        // rule both key off these ids.
        manager.get_connection().execute_unprepared(
            r#"INSERT INTO role (id, name) VALUES (1, 'Admin'), (2, 'User') ON CONFLICT (id) DO NOTHING;"#
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ResponseOption::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Response::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(UserSurvey::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(QuestionOption::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Question::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Survey::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Role::Table).to_owned()).await?;
        Ok(())
    }
}
