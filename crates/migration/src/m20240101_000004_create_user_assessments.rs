//! Create `user_assessments` (one attempt per row) and `assessment_responses`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAssessments::Table)
                    .if_not_exists()
                    .col(uuid(UserAssessments::Id).primary_key())
                    .col(uuid(UserAssessments::UserId))
                    .col(uuid(UserAssessments::AssessmentId))
                    .col(timestamp_with_time_zone(UserAssessments::StartedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone_null(UserAssessments::CompletedAt))
                    .col(integer(UserAssessments::CompletionPercentage).default(0))
                    .col(json_binary_null(UserAssessments::RawScores))
                    .col(integer_null(UserAssessments::TotalScore))
                    .col(integer_null(UserAssessments::MaxPossibleScore))
                    .col(integer_null(UserAssessments::ApostolicScore))
                    .col(integer_null(UserAssessments::PropheticScore))
                    .col(integer_null(UserAssessments::EvangelisticScore))
                    .col(integer_null(UserAssessments::ShepherdingScore))
                    .col(integer_null(UserAssessments::TeachingScore))
                    .col(json_binary_null(UserAssessments::NormalizedScores))
                    .col(string_len_null(UserAssessments::PrimaryGift, 16))
                    .col(string_len_null(UserAssessments::SecondaryGift, 16))
                    .col(double_null(UserAssessments::ResponseConsistency))
                    .col(integer_null(UserAssessments::CompletionTime))
                    .col(integer_null(UserAssessments::ConfidenceLevel))
                    .col(boolean(UserAssessments::CulturalAdjustmentApplied).default(false))
                    .col(double_null(UserAssessments::CulturalAdjustmentFactor))
                    .col(text_null(UserAssessments::AiInsights))
                    .col(json_binary_null(UserAssessments::PersonalizedRecommendations))
                    .col(json_binary(UserAssessments::SuggestedPeers).default(Expr::cust("'[]'::jsonb")))
                    .col(json_binary(UserAssessments::ComplementaryGifts).default(Expr::cust("'[]'::jsonb")))
                    .col(timestamp_with_time_zone(UserAssessments::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(UserAssessments::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_assessment_user")
                            .from(UserAssessments::Table, UserAssessments::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_assessment_assessment")
                            .from(UserAssessments::Table, UserAssessments::AssessmentId)
                            .to(Assessments::Table, Assessments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssessmentResponses::Table)
                    .if_not_exists()
                    .col(uuid(AssessmentResponses::Id).primary_key())
                    .col(uuid(AssessmentResponses::UserAssessmentId))
                    .col(uuid(AssessmentResponses::QuestionId))
                    .col(integer_null(AssessmentResponses::ResponseValue))
                    .col(text_null(AssessmentResponses::ResponseText))
                    .col(integer_null(AssessmentResponses::ResponseTime))
                    .col(integer_null(AssessmentResponses::Confidence))
                    .col(boolean(AssessmentResponses::Skipped).default(false))
                    .col(timestamp_with_time_zone(AssessmentResponses::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(AssessmentResponses::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_user_assessment")
                            .from(AssessmentResponses::Table, AssessmentResponses::UserAssessmentId)
                            .to(UserAssessments::Table, UserAssessments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_question")
                            .from(AssessmentResponses::Table, AssessmentResponses::QuestionId)
                            .to(AssessmentQuestions::Table, AssessmentQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A question is answered at most once per attempt
        manager
            .create_index(
                Index::create()
                    .name("uniq_response_attempt_question")
                    .table(AssessmentResponses::Table)
                    .col(AssessmentResponses::UserAssessmentId)
                    .col(AssessmentResponses::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssessmentResponses::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(UserAssessments::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserAssessments {
    Table,
    Id,
    UserId,
    AssessmentId,
    StartedAt,
    CompletedAt,
    CompletionPercentage,
    RawScores,
    TotalScore,
    MaxPossibleScore,
    ApostolicScore,
    PropheticScore,
    EvangelisticScore,
    ShepherdingScore,
    TeachingScore,
    NormalizedScores,
    PrimaryGift,
    SecondaryGift,
    ResponseConsistency,
    CompletionTime,
    ConfidenceLevel,
    CulturalAdjustmentApplied,
    CulturalAdjustmentFactor,
    AiInsights,
    PersonalizedRecommendations,
    SuggestedPeers,
    ComplementaryGifts,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AssessmentResponses {
    Table,
    Id,
    UserAssessmentId,
    QuestionId,
    ResponseValue,
    ResponseText,
    ResponseTime,
    Confidence,
    Skipped,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles { Table, Id }

#[derive(DeriveIden)]
enum Assessments { Table, Id }

#[derive(DeriveIden)]
enum AssessmentQuestions { Table, Id }
