use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::fallback::CAREER_COACH_APOLOGY;
use crate::conversation::prompts::{responder_instructions, CAREER_COACH_ROLE, GAPS_SECTION_TEMPLATE};
use crate::conversation::responders::{build_context, Reply, Responder};
use crate::conversation::router::ResponderId;
use crate::job::fit_scoring::{FitReport, FitScorer};
use crate::llm_client::{GenerationError, TextGenerator};
use crate::session::context::SessionContext;
use crate::session::turn::{StructuredPayload, Turn};

const MAX_GAPS: usize = 8;
const MAX_PLAN_ITEMS: usize = 3;

/// Deterministic outline sent with a coaching answer: where the profile
/// already meets the target job, and what to work on next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerPlan {
    pub fit_score: f64,
    pub strengths: Vec<String>,
    pub growth_areas: Vec<String>,
    pub next_steps: Vec<String>,
}

impl CareerPlan {
    pub fn from_report(report: &FitReport) -> Self {
        let strengths = report
            .strong_matches
            .iter()
            .take(MAX_PLAN_ITEMS)
            .map(|m| m.keyword.clone())
            .collect();
        let growth_areas = report
            .gaps
            .iter()
            .take(MAX_PLAN_ITEMS)
            .map(|g| g.keyword.clone())
            .collect();

        let mut next_steps: Vec<String> = report
            .gaps
            .iter()
            .take(MAX_PLAN_ITEMS)
            .map(|g| match &g.suggestion {
                Some(related) => format!("Show how your {related} work applies to {}", g.keyword),
                None => format!("Build hands-on experience with {}", g.keyword),
            })
            .collect();
        if next_steps.is_empty() {
            next_steps.push("Lead with your strongest matches when you apply".to_string());
        }

        Self {
            fit_score: report.score,
            strengths,
            growth_areas,
            next_steps,
        }
    }
}

/// Open-ended career guidance. Also handles every message the classifier could not place.
pub struct CareerCoach {
    generator: Arc<dyn TextGenerator>,
    fit_scorer: Arc<dyn FitScorer>,
}

impl CareerCoach {
    pub fn new(generator: Arc<dyn TextGenerator>, fit_scorer: Arc<dyn FitScorer>) -> Self {
        Self {
            generator,
            fit_scorer,
        }
    }
}

#[async_trait]
impl Responder for CareerCoach {
    fn id(&self) -> ResponderId {
        ResponderId::CareerCoach
    }

    fn apology(&self) -> &'static str {
        CAREER_COACH_APOLOGY
    }

    async fn respond(&self, ctx: &SessionContext, turn: &Turn) -> Result<Reply, GenerationError> {
        let report = self.fit_scorer.score(ctx.profile(), ctx.job());
        let extra = GAPS_SECTION_TEMPLATE
            .replace("{score}", &report.percent().to_string())
            .replace("{gaps}", &render_gaps(&report));
        let context = build_context(ctx, turn, &extra);

        let text = self
            .generator
            .generate(&responder_instructions(CAREER_COACH_ROLE), &context)
            .await?;
        Ok(Reply {
            text,
            payload: Some(StructuredPayload::CareerPlan(CareerPlan::from_report(&report))),
        })
    }
}

fn render_gaps(report: &FitReport) -> String {
    if report.gaps.is_empty() {
        return "- none found".to_string();
    }
    report
        .gaps
        .iter()
        .take(MAX_GAPS)
        .map(|g| match &g.suggestion {
            Some(related) => format!("- {} (closest existing skill: {related})", g.keyword),
            None => format!("- {}", g.keyword),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::fit_scoring::{FitMatch, Gap, KeywordFitScorer};
    use crate::testing::{sample_session, ScriptedGenerator};

    #[tokio::test]
    async fn test_context_lists_skill_gaps() {
        let generator = Arc::new(ScriptedGenerator::classifying("career_guidance"));
        let coach = CareerCoach::new(generator.clone(), Arc::new(KeywordFitScorer));
        let ctx = sample_session();

        let reply = coach
            .respond(
                &ctx,
                &Turn::new(1, "What would it take to become a Staff Engineer at Google?"),
            )
            .await
            .unwrap();
        let expected = CareerPlan::from_report(&KeywordFitScorer.score(ctx.profile(), ctx.job()));
        assert_eq!(reply.payload, Some(StructuredPayload::CareerPlan(expected)));

        let contexts = generator.responder_contexts();
        assert!(contexts[0].contains("SKILL GAPS AGAINST TARGET JOB"));
        // "payment" is in the Acme posting but not on the profile
        assert!(contexts[0].contains("- payment"));
    }

    #[test]
    fn test_plan_turns_gaps_into_next_steps() {
        let report = FitReport {
            score: 0.5,
            strong_matches: vec![FitMatch {
                keyword: "rust".to_string(),
                evidence: "skill: Rust".to_string(),
                strength: 1.0,
            }],
            partial_matches: vec![],
            gaps: vec![
                Gap {
                    keyword: "postgres".to_string(),
                    jd_frequency: 2,
                    suggestion: Some("PostgreSQL".to_string()),
                },
                Gap {
                    keyword: "kafka".to_string(),
                    jd_frequency: 1,
                    suggestion: None,
                },
            ],
            recommendation: String::new(),
            scorer_backend: "keyword".to_string(),
        };

        let plan = CareerPlan::from_report(&report);
        assert_eq!(plan.fit_score, 0.5);
        assert_eq!(plan.strengths, vec!["rust"]);
        assert_eq!(plan.growth_areas, vec!["postgres", "kafka"]);
        assert_eq!(
            plan.next_steps,
            vec![
                "Show how your PostgreSQL work applies to postgres",
                "Build hands-on experience with kafka",
            ]
        );
    }

    #[test]
    fn test_plan_without_gaps_still_has_a_next_step() {
        let report = FitReport {
            score: 1.0,
            strong_matches: vec![],
            partial_matches: vec![],
            gaps: vec![],
            recommendation: String::new(),
            scorer_backend: "keyword".to_string(),
        };
        let plan = CareerPlan::from_report(&report);
        assert!(plan.growth_areas.is_empty());
        assert_eq!(plan.next_steps.len(), 1);
    }

    #[test]
    fn test_render_gaps_without_gaps() {
        let report = FitReport {
            score: 1.0,
            strong_matches: vec![],
            partial_matches: vec![],
            gaps: vec![],
            recommendation: String::new(),
            scorer_backend: "keyword".to_string(),
        };
        assert_eq!(render_gaps(&report), "- none found");
    }
}
