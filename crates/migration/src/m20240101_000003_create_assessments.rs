//! Create `assessments` and their `assessment_questions`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Assessments::Table)
                    .if_not_exists()
                    .col(uuid(Assessments::Id).primary_key())
                    .col(string_len(Assessments::Name, 255))
                    .col(string_len(Assessments::Slug, 100).unique_key())
                    .col(text_null(Assessments::Description))
                    .col(string_len(Assessments::AssessmentType, 32))
                    .col(integer(Assessments::QuestionsCount).default(0))
                    .col(integer_null(Assessments::EstimatedDuration))
                    .col(integer_null(Assessments::PassingScore))
                    .col(double_null(Assessments::ValidityScore))
                    .col(double_null(Assessments::ReliabilityScore))
                    .col(text_null(Assessments::Instructions))
                    .col(string_len(Assessments::Version, 16).default("1.0"))
                    .col(string_len(Assessments::Language, 10).default("en"))
                    .col(string_len(Assessments::CulturalAdaptation, 32).default("universal"))
                    .col(boolean(Assessments::ResearchBacked).default(false))
                    .col(string_len(Assessments::ScoringMethod, 16).default("likert_5"))
                    .col(string_len(Assessments::Status, 16).default("draft"))
                    .col(timestamp_with_time_zone_null(Assessments::PublishedAt))
                    .col(timestamp_with_time_zone(Assessments::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Assessments::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssessmentQuestions::Table)
                    .if_not_exists()
                    .col(uuid(AssessmentQuestions::Id).primary_key())
                    .col(uuid(AssessmentQuestions::AssessmentId))
                    .col(text(AssessmentQuestions::QuestionText))
                    .col(string_len(AssessmentQuestions::QuestionType, 32))
                    .col(integer(AssessmentQuestions::OrderIndex))
                    .col(boolean(AssessmentQuestions::IsRequired).default(true))
                    .col(string_len_null(AssessmentQuestions::Category, 64))
                    .col(double(AssessmentQuestions::Weight).default(1.0))
                    .col(boolean(AssessmentQuestions::ReverseScored).default(false))
                    .col(string_len_null(AssessmentQuestions::ApestDimension, 16))
                    .col(json_binary_null(AssessmentQuestions::AnswerOptions))
                    .col(timestamp_with_time_zone(AssessmentQuestions::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(AssessmentQuestions::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_assessment")
                            .from(AssessmentQuestions::Table, AssessmentQuestions::AssessmentId)
                            .to(Assessments::Table, Assessments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssessmentQuestions::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Assessments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Assessments {
    Table,
    Id,
    Name,
    Slug,
    Description,
    AssessmentType,
    QuestionsCount,
    EstimatedDuration,
    PassingScore,
    ValidityScore,
    ReliabilityScore,
    Instructions,
    Version,
    Language,
    CulturalAdaptation,
    ResearchBacked,
    ScoringMethod,
    Status,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AssessmentQuestions {
    Table,
    Id,
    AssessmentId,
    QuestionText,
    QuestionType,
    OrderIndex,
    IsRequired,
    Category,
    Weight,
    ReverseScored,
    ApestDimension,
    AnswerOptions,
    CreatedAt,
    UpdatedAt,
}
