mod common;

use common::*;
use serde_json::json;
use taskify::collection::{CollectionError, StaleEditPolicy};
use taskify::models::*;
use taskify::pipeline::*;
use taskify::render;

async fn intake_with_developers(backend: &StubBackend) -> NewProjectIntake {
    backend.respond("/api/developers/", 200, developers_body());
    let mut page = NewProjectIntake::new(backend.client());
    page.load_developers().await.unwrap();
    page
}

fn fill(page: &mut NewProjectIntake) {
    page.idea = "An online shop".to_string();
    page.team_name = "Storefront".to_string();
    page.project_goal = "Launch by spring".to_string();
}

mod intake {
    use super::*;

    #[tokio::test]
    async fn rejects_submit_without_developers_and_makes_no_call() {
        let backend = StubBackend::start().await;
        let mut page = intake_with_developers(&backend).await;
        fill(&mut page);
        let calls_before = backend.requests().len();

        let err = page.submit().await.unwrap_err();

        assert!(matches!(err, StageError::Validation(_)));
        assert_eq!(page.status().error(), Some(MISSING_FIELDS));
        assert!(!page.status().is_loading());
        assert_eq!(backend.requests().len(), calls_before);
    }

    #[tokio::test]
    async fn rejects_blank_fields() {
        let backend = StubBackend::start().await;
        let mut page = intake_with_developers(&backend).await;
        page.toggle_developer("dev-1").unwrap();

        assert_eq!(page.submit().await.unwrap_err().to_string(), MISSING_FIELDS);
        assert!(!backend.paths().contains(&"/api/submit-idea/".to_string()));
    }

    #[tokio::test]
    async fn toggle_selects_and_deselects() {
        let backend = StubBackend::start().await;
        let mut page = intake_with_developers(&backend).await;

        assert!(page.toggle_developer("dev-2").unwrap());
        assert!(page.is_selected("dev-2"));
        assert!(!page.toggle_developer("dev-2").unwrap());
        assert!(page.selected().is_empty());
        assert!(page.toggle_developer("ghost").is_err());
    }

    #[tokio::test]
    async fn submits_idea_with_minted_project_id_and_team() {
        let backend = StubBackend::start().await;
        backend.respond("/api/submit-idea/", 200, analysis_body());
        let mut page = intake_with_developers(&backend).await;
        fill(&mut page);
        page.toggle_developer("dev-2").unwrap();
        page.toggle_developer("dev-1").unwrap();

        let review = page.submit().await.unwrap();

        let request = backend.last_request("/api/submit-idea/").unwrap();
        assert_eq!(request.body["project_id"], review.context().project_id.as_str());
        assert!(!review.context().project_id.as_str().is_empty());
        assert_eq!(request.body["idea"], "An online shop");
        assert_eq!(
            request.body["team_metadata"],
            json!({
                "team_name": "Storefront",
                "members": [
                    {"name": "Ana", "role": "Backend"},
                    {"name": "Ben", "role": "Frontend"}
                ],
                "project_goal": "Launch by spring"
            })
        );
        assert_eq!(review.domain(), "Retail");
        assert_eq!(review.modules().len(), 2);
    }

    #[tokio::test]
    async fn backend_failure_keeps_intake_with_error_banner() {
        let backend = StubBackend::start().await;
        backend.respond("/api/submit-idea/", 500, json!({"error": "LLM unavailable"}));
        let mut page = intake_with_developers(&backend).await;
        fill(&mut page);
        page.toggle_developer("dev-1").unwrap();

        assert!(page.submit().await.is_err());

        assert_eq!(page.status().error(), Some("LLM unavailable"));
        assert!(!page.status().is_loading());
    }
}

mod analysis {
    use super::*;

    fn review(backend: &StubBackend) -> AnalysisReview {
        let analysis: SubmitIdeaResponse = serde_json::from_value(analysis_body()).unwrap();
        AnalysisReview::new(backend.client(), PipelineContext::new("p1"), analysis.analysis)
    }

    #[tokio::test]
    async fn entering_without_data_is_no_data() {
        let backend = StubBackend::start().await;

        let err = AnalysisReview::enter(backend.client(), None, None).unwrap_err();

        assert_eq!(err.to_string(), "No analysis data available");
    }

    #[tokio::test]
    async fn edit_cursor_is_single_per_page() {
        let backend = StubBackend::start().await;
        let mut page = review(&backend);

        page.begin_edit(AnalysisSection::Features, 0).unwrap();
        page.begin_edit(AnalysisSection::Risks, 0).unwrap();

        assert_eq!(page.features().editing(), None);
        assert_eq!(
            page.editing().map(|key| key.section),
            Some(AnalysisSection::Risks)
        );
    }

    #[tokio::test]
    async fn list_edits_do_not_open_a_second_cursor() {
        let backend = StubBackend::start().await;
        let mut page = review(&backend);
        page.begin_edit(AnalysisSection::Personas, 0).unwrap();

        page.apply(&"add:features".parse().unwrap()).unwrap();
        page.apply(&"set:features:1:name=Search".parse().unwrap())
            .unwrap();
        assert_eq!(page.features().editing(), None);
        assert_eq!(page.personas().editing(), Some(0));

        page.begin_edit(AnalysisSection::Features, 1).unwrap();
        assert_eq!(page.personas().editing(), None);
        assert_eq!(page.features().editing(), Some(1));
    }

    #[tokio::test]
    async fn domain_only_has_a_value_field() {
        let backend = StubBackend::start().await;
        let mut page = review(&backend);

        let err = page
            .apply(&"set:domain:0:bogus=X".parse().unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            StageError::Edit(CollectionError::UnknownField(ref field)) if field == "bogus"
        ));
        assert!(page.apply(&"set:domain:1:value=X".parse().unwrap()).is_err());
        assert!(page.apply(&"add:domain".parse().unwrap()).is_err());
        assert_eq!(page.domain(), "Retail");

        page.apply(&"set:domain:0:value=Grocery".parse().unwrap())
            .unwrap();
        assert_eq!(page.domain(), "Grocery");
    }

    #[tokio::test]
    async fn saves_edited_copy() {
        let backend = StubBackend::start().await;
        let mut page = review(&backend);
        page.apply(&"set:domain:0:value=E-commerce".parse().unwrap())
            .unwrap();
        page.apply(&"add:personas".parse().unwrap()).unwrap();
        page.apply(&"remove:modules:1".parse().unwrap()).unwrap();

        let context = page.save().await.unwrap();

        assert_eq!(context.project_id.as_str(), "p1");
        assert_eq!(page.status().success(), Some("Analysis saved successfully!"));
        let body = backend.last_request("/api/save-analysis/").unwrap().body;
        assert_eq!(body["project_id"], "p1");
        assert_eq!(body["analysis"]["domain"], "E-commerce");
        assert_eq!(body["analysis"]["modules"], json!(["catalog"]));
        assert_eq!(
            body["analysis"]["personas"][1],
            json!({"role": "", "needs": ""})
        );
    }
}

mod epics {
    use super::*;

    #[tokio::test]
    async fn fetches_when_nothing_carried_and_shows_empty_sections() {
        let backend = StubBackend::start().await;
        backend.respond(
            "/api/epics/",
            200,
            json!({"epics_stories": {"epics": [], "user_stories": []}}),
        );

        let page = EpicsReview::enter(
            backend.client(),
            Some(ProjectId::from("p1")),
            None,
            StaleEditPolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            backend.last_request("/api/epics/").unwrap().body,
            json!({"project_id": "p1"})
        );
        assert!(page.epics().is_empty());
        assert!(page.user_stories().is_empty());
        assert_eq!(page.status().error(), None);
        assert_eq!(
            page.controls(),
            ["Add Epic", "Add User Story", "Go for Team Matching"]
        );
        let rendered = render::render_epics(&page);
        assert!(rendered.contains("+ Add Epic"));
        assert!(rendered.contains("+ Add User Story"));
        assert!(!rendered.contains('✗'));
    }

    #[tokio::test]
    async fn carried_epics_are_not_fetched() {
        let backend = StubBackend::start().await;
        let carried: EpicsResponse = serde_json::from_value(epics_body()).unwrap();

        let page = EpicsReview::enter(
            backend.client(),
            Some(ProjectId::from("p1")),
            Some(carried.epics_stories),
            StaleEditPolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(page.epics().len(), 1);
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn begin_edit_moves_the_cursor_between_sections() {
        let backend = StubBackend::start().await;
        let carried: EpicsResponse = serde_json::from_value(epics_body()).unwrap();
        let mut page = EpicsReview::new(
            backend.client(),
            PipelineContext::new("p1"),
            carried.epics_stories,
        );

        page.begin_edit(EpicsSection::Epics, 0).unwrap();
        page.begin_edit(EpicsSection::UserStories, 0).unwrap();

        assert_eq!(page.epics().editing(), None);
        assert_eq!(page.user_stories().editing(), Some(0));
    }

    #[tokio::test]
    async fn pending_page_does_not_save_before_fetching() {
        let backend = StubBackend::start().await;
        let mut page = EpicsReview::pending(
            backend.client(),
            PipelineContext::new("p1"),
            StaleEditPolicy::default(),
        );

        let err = page.go_for_team_matching().await.unwrap_err();

        assert_eq!(err.to_string(), "No epics data available");
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn entering_without_project_id_is_no_data() {
        let backend = StubBackend::start().await;

        let err = EpicsReview::enter(backend.client(), None, None, StaleEditPolicy::default())
            .await
            .unwrap_err();

        assert!(matches!(err, StageError::NoData("No epics data available")));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn saves_before_generating_team_matching() {
        let backend = StubBackend::start().await;
        backend.respond("/api/epics/", 200, epics_body());
        backend.respond("/api/team-matcher/", 200, allocations_body());
        let mut page = EpicsReview::load(backend.client(), PipelineContext::new("p1"))
            .await
            .unwrap();
        page.apply(&"set:epics:0:name=Products".parse().unwrap())
            .unwrap();

        let team = page.go_for_team_matching().await.unwrap();

        assert_eq!(
            backend.paths(),
            vec!["/api/epics/", "/api/save-epics-features/", "/api/team-matcher/"]
        );
        let saved = backend.last_request("/api/save-epics-features/").unwrap().body;
        assert_eq!(saved["epics_stories"]["epics"][0]["name"], "Products");
        assert_eq!(team.allocations().len(), 1);
        assert_eq!(page.status().success(), Some("Team matching generated successfully!"));
    }

    #[tokio::test]
    async fn failed_save_skips_generation() {
        let backend = StubBackend::start().await;
        backend.respond("/api/save-epics-features/", 500, json!({}));
        let mut page = EpicsReview::new(
            backend.client(),
            PipelineContext::new("p1"),
            EpicsAndStories::default(),
        );

        let err = page.go_for_team_matching().await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to save epics and features");
        assert_eq!(backend.paths(), vec!["/api/save-epics-features/"]);
        assert_eq!(page.status().error(), Some("Failed to save epics and features"));
    }

    #[tokio::test]
    async fn failed_generation_keeps_save_announcement_and_shows_error() {
        let backend = StubBackend::start().await;
        backend.respond("/api/team-matcher/", 500, json!({"error": "No developers free"}));
        let mut page = EpicsReview::new(
            backend.client(),
            PipelineContext::new("p1"),
            EpicsAndStories::default(),
        );

        assert!(page.go_for_team_matching().await.is_err());

        assert_eq!(page.status().error(), Some("No developers free"));
        assert_eq!(
            page.status().success(),
            Some("Epics and features saved successfully! Generating team matching...")
        );
    }
}

mod team_matching {
    use super::*;

    #[tokio::test]
    async fn load_uses_the_generation_endpoint() {
        let backend = StubBackend::start().await;
        backend.respond("/api/team-matcher/", 200, allocations_body());

        let page = TeamMatchingReview::enter(backend.client(), Some(ProjectId::from("p1")))
            .await
            .unwrap();

        assert_eq!(backend.paths(), vec!["/api/team-matcher/"]);
        assert_eq!(page.allocations().get(0).unwrap().story_title, "Browse");
        assert_eq!(page.status().success(), Some("Team matching fetched successfully!"));
    }

    #[tokio::test]
    async fn failed_fetch_uses_fetch_message() {
        let backend = StubBackend::start().await;
        backend.respond("/api/team-matcher/", 500, json!({}));

        let err = TeamMatchingReview::enter(backend.client(), Some(ProjectId::from("p1")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch team matching");
    }

    #[tokio::test]
    async fn entering_without_project_id_is_no_data() {
        let backend = StubBackend::start().await;

        let err = TeamMatchingReview::enter(backend.client(), None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No team matching data available");
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn save_only_follows_a_generation() {
        let backend = StubBackend::start().await;
        backend.respond("/api/team-matcher/", 200, allocations_body());
        let mut page = TeamMatchingReview::enter(backend.client(), Some(ProjectId::from("p1")))
            .await
            .unwrap();
        page.apply(&"set:allocations:0:assigned_to=Ben".parse().unwrap())
            .unwrap();

        let done = page.save().await.unwrap();

        assert_eq!(done.context.project_id.as_str(), "p1");
        assert_eq!(
            backend.paths(),
            vec!["/api/team-matcher/", "/api/save-team-matching/"]
        );
        let body = backend.last_request("/api/save-team-matching/").unwrap().body;
        assert_eq!(body["allocations"][0]["assigned_to"], "Ben");
        assert_eq!(body["allocations"][0]["story_title"], "Browse");
        assert_eq!(page.status().success(), Some("Team matching saved successfully!"));
    }

    #[tokio::test]
    async fn generated_page_keeps_epics_policy() {
        let backend = StubBackend::start().await;
        backend.respond("/api/team-matcher/", 200, allocations_body());
        let mut epics = EpicsReview::with_policy(
            backend.client(),
            PipelineContext::new("p1"),
            EpicsAndStories::default(),
            StaleEditPolicy::Preserve,
        );

        let page = epics.go_for_team_matching().await.unwrap();

        assert_eq!(page.allocations().policy(), StaleEditPolicy::Preserve);
    }
}

mod pipeline {
    use super::*;

    #[tokio::test]
    async fn advances_from_intake_to_done() {
        let backend = StubBackend::start().await;
        backend.respond("/api/submit-idea/", 200, analysis_body());
        backend.respond("/api/epics/", 200, epics_body());
        backend.respond("/api/team-matcher/", 200, allocations_body());
        let mut page = intake_with_developers(&backend).await;
        fill(&mut page);
        page.toggle_developer("dev-1").unwrap();

        let mut run = Pipeline::Intake(page);
        let mut stages = vec![run.stage()];
        while run.stage() != Stage::Done {
            run = run.advance().await.unwrap();
            stages.push(run.stage());
        }

        assert_eq!(
            stages,
            vec![
                Stage::NewProjectIntake,
                Stage::ProjectAnalysisReview,
                Stage::EpicsReview,
                Stage::TeamMatchingReview,
                Stage::Done,
            ]
        );
        assert_eq!(
            backend.paths(),
            vec![
                "/api/developers/",
                "/api/submit-idea/",
                "/api/save-analysis/",
                "/api/epics/",
                "/api/save-epics-features/",
                "/api/team-matcher/",
                "/api/save-team-matching/",
            ]
        );
        let project_ids: Vec<_> = backend
            .requests()
            .into_iter()
            .filter_map(|r| r.body.get("project_id").cloned())
            .collect();
        assert_eq!(project_ids.len(), 6);
        assert!(project_ids.iter().all(|id| *id == project_ids[0]));
    }

    #[tokio::test]
    async fn stalls_in_place_on_failure() {
        let backend = StubBackend::start().await;
        backend.respond("/api/save-analysis/", 500, json!({"error": "Database down"}));
        let analysis: SubmitIdeaResponse = serde_json::from_value(analysis_body()).unwrap();
        let run = Pipeline::Analysis(AnalysisReview::new(
            backend.client(),
            PipelineContext::new("p1"),
            analysis.analysis,
        ));

        let stalled = run.advance().await.unwrap_err();

        assert_eq!(stalled.pipeline.stage(), Stage::ProjectAnalysisReview);
        assert_eq!(stalled.error.to_string(), "Database down");
        match stalled.pipeline {
            Pipeline::Analysis(page) => {
                assert_eq!(page.status().error(), Some("Database down"))
            }
            other => panic!("unexpected stage {:?}", other.stage()),
        }
        assert!(!backend.paths().contains(&"/api/epics/".to_string()));
    }

    #[tokio::test]
    async fn failed_epics_fetch_shows_on_epics_page_and_retries_without_resaving() {
        let backend = StubBackend::start().await;
        backend.respond("/api/epics/", 500, json!({"error": "Epic agent down"}));
        let analysis: SubmitIdeaResponse = serde_json::from_value(analysis_body()).unwrap();
        let run = Pipeline::Analysis(AnalysisReview::new(
            backend.client(),
            PipelineContext::new("p1"),
            analysis.analysis,
        ));

        let stalled = run.advance().await.unwrap_err();

        assert_eq!(stalled.pipeline.stage(), Stage::EpicsReview);
        assert_eq!(stalled.error.to_string(), "Epic agent down");
        let run = match stalled.pipeline {
            Pipeline::Epics(page) => {
                assert_eq!(page.status().error(), Some("Epic agent down"));
                assert!(!page.is_loaded());
                Pipeline::Epics(page)
            }
            other => panic!("unexpected stage {:?}", other.stage()),
        };

        backend.respond("/api/epics/", 200, epics_body());
        let run = run.advance().await.unwrap();

        assert_eq!(run.stage(), Stage::EpicsReview);
        match run {
            Pipeline::Epics(page) => {
                assert!(page.is_loaded());
                assert_eq!(page.epics().len(), 1);
                assert_eq!(page.status().error(), None);
            }
            other => panic!("unexpected stage {:?}", other.stage()),
        }
        assert_eq!(
            backend.paths(),
            vec!["/api/save-analysis/", "/api/epics/", "/api/epics/"]
        );
    }

    #[tokio::test]
    async fn stale_edit_policy_follows_the_run() {
        let backend = StubBackend::start().await;
        backend.respond("/api/epics/", 200, epics_body());
        let analysis: SubmitIdeaResponse = serde_json::from_value(analysis_body()).unwrap();
        let run = Pipeline::Analysis(AnalysisReview::with_policy(
            backend.client(),
            PipelineContext::new("p1"),
            analysis.analysis,
            StaleEditPolicy::Preserve,
        ));

        match run.advance().await.unwrap() {
            Pipeline::Epics(page) => {
                assert_eq!(page.epics().policy(), StaleEditPolicy::Preserve);
                assert_eq!(page.user_stories().policy(), StaleEditPolicy::Preserve);
            }
            other => panic!("unexpected stage {:?}", other.stage()),
        }
    }

    #[tokio::test]
    async fn done_does_not_advance() {
        let run = Pipeline::Done(Done {
            context: PipelineContext::new("p1"),
        });

        let stalled = run.advance().await.unwrap_err();

        assert_eq!(stalled.pipeline.stage(), Stage::Done);
    }

    #[test]
    fn stages_map_to_manager_routes() {
        assert_eq!(Stage::EpicsReview.route().path(), "/manager/epics");
        assert_eq!(Stage::Done.route().path(), "/manager/home");
    }
}
