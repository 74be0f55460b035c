use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskify::account::{self, LoginPage, SignupPage};
use taskify::collection::EditOp;
use taskify::models::*;
use taskify::pipeline::{
    AnalysisReview, EpicsReview, NewProjectIntake, Pipeline, PipelineContext, TeamMatchingReview,
};
use taskify::render;
use taskify::routes::Route;
use taskify::session::{Access, FileSessionStore, SessionGuard, SessionStore};
use taskify::{Config, TaskifyClient};

#[derive(Parser)]
#[command(name = "taskify")]
#[command(about = "Turn a project idea into epics, user stories and a staffed team")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "TASKIFY_API_URL")]
    api_url: Option<String>,

    /// Print raw JSON payloads instead of pages
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new account
    Signup {
        #[command(subcommand)]
        account: SignupCommand,
    },
    /// Log in and store the session
    Login {
        /// manager or developer
        role: Role,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// List developers available for team matching
    Developers,
    /// Submit a project idea and show its analysis
    NewProject(IntakeArgs),
    /// Project analysis actions
    Analysis {
        #[command(subcommand)]
        action: AnalysisCommand,
    },
    /// Epics and user stories actions
    Epics {
        #[command(subcommand)]
        action: EpicsCommand,
    },
    /// Team matching actions
    TeamMatching {
        #[command(subcommand)]
        action: TeamCommand,
    },
    /// Run the whole pipeline, accepting every generated payload as is
    Run(IntakeArgs),
}

#[derive(Subcommand)]
enum SignupCommand {
    Developer {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Comma-separated, e.g. "rust, sql"
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long, default_value_t = DEFAULT_HOURS_PER_DAY)]
        hours_per_day: u8,
        /// 8-6 or 9-5
        #[arg(long, default_value = "8-6")]
        work_batch: String,
    },
    Manager {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        department: String,
    },
}

#[derive(clap::Args)]
struct IntakeArgs {
    #[arg(long)]
    idea: String,
    #[arg(long)]
    team_name: String,
    #[arg(long)]
    goal: String,
    /// Developer id to add to the team (repeatable)
    #[arg(long = "developer")]
    developers: Vec<String>,
}

#[derive(clap::Args)]
struct PageArgs {
    #[arg(long)]
    project_id: String,
    /// JSON payload to use instead of fetching one
    #[arg(long)]
    file: Option<PathBuf>,
    /// Edit to apply before the action, e.g. "set:epics:0:name=Billing" (repeatable)
    #[arg(long = "edit")]
    edits: Vec<String>,
}

#[derive(Subcommand)]
enum AnalysisCommand {
    /// Save an analysis and show the epics generated from it
    Save {
        #[arg(long)]
        project_id: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long = "edit")]
        edits: Vec<String>,
    },
}

#[derive(Subcommand)]
enum EpicsCommand {
    /// Fetch (or load) and show the epics of a project
    Show(PageArgs),
    /// Save the epics, then generate the team matching
    Generate(PageArgs),
}

/// Team matching pages always start from a fresh generation.
#[derive(clap::Args)]
struct TeamArgs {
    #[arg(long)]
    project_id: String,
    /// Edit to apply before the action, e.g. "set:allocations:0:assigned_to=Ana" (repeatable)
    #[arg(long = "edit")]
    edits: Vec<String>,
}

#[derive(Subcommand)]
enum TeamCommand {
    /// Generate and show the team matching of a project
    Show(TeamArgs),
    /// Generate the team matching, apply edits, then save it
    Save(TeamArgs),
}

/// Initialize tracing on stderr so stdout only carries pages and payloads
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "taskify=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_edits(raw: &[String]) -> Result<Vec<EditOp>> {
    raw.iter()
        .map(|edit| {
            edit.parse::<EditOp>()
                .with_context(|| format!("Invalid --edit '{}'", edit))
        })
        .collect()
}

/// Pass the session guard for a manager route and return a client
/// carrying the stored token.
fn manager_client(config: &Config, store: &dyn SessionStore, route: Route) -> Result<TaskifyClient> {
    match SessionGuard::new(store).check_route(route) {
        Access::Granted(session) => Ok(config.client().with_token(session.token)),
        Access::Open => Ok(config.client()),
        Access::Redirect(path) => bail!("Not logged in as manager. Log in at {}", path),
    }
}

async fn intake(client: TaskifyClient, args: IntakeArgs) -> Result<NewProjectIntake> {
    let mut page = NewProjectIntake::new(client);
    page.load_developers().await?;
    for id in &args.developers {
        page.toggle_developer(id)?;
    }
    page.idea = args.idea;
    page.team_name = args.team_name;
    page.project_goal = args.goal;
    Ok(page)
}

fn show_analysis(page: &AnalysisReview, json: bool) -> Result<()> {
    if json {
        print_json(&page.analysis())
    } else {
        print!("{}", render::render_analysis(page));
        Ok(())
    }
}

fn show_epics(page: &EpicsReview, json: bool) -> Result<()> {
    if json {
        print_json(&page.epics_stories())
    } else {
        print!("{}", render::render_epics(page));
        Ok(())
    }
}

fn show_team(page: &TeamMatchingReview, json: bool) -> Result<()> {
    if json {
        print_json(&page.allocations().items())
    } else {
        print!("{}", render::render_team_matching(page));
        Ok(())
    }
}

fn show_stage(pipeline: &Pipeline, json: bool) -> Result<()> {
    match pipeline {
        Pipeline::Intake(_) => Ok(()),
        Pipeline::Analysis(page) => show_analysis(page, json),
        Pipeline::Epics(page) => show_epics(page, json),
        Pipeline::TeamMatching(page) => show_team(page, json),
        Pipeline::Done(done) => {
            if json {
                print_json(&done.context.project_id)
            } else {
                println!("Project {} is staffed.", done.context.project_id);
                Ok(())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load();
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    let store = FileSessionStore::new(config.session_path()?);
    let json = cli.json;

    match cli.command {
        Commands::Signup { account } => {
            let mut page = SignupPage::new(config.client());
            match account {
                SignupCommand::Developer {
                    name,
                    email,
                    password,
                    skills,
                    hours_per_day,
                    work_batch,
                } => {
                    let mut form = DeveloperSignup::new(name, email, password).with_skills_csv(&skills);
                    form.hours_per_day = hours_per_day;
                    form.work_batch = WorkBatch::from(work_batch);
                    page.submit_developer(&form).await?;
                }
                SignupCommand::Manager {
                    name,
                    email,
                    password,
                    department,
                } => {
                    let form = ManagerSignup {
                        name,
                        email,
                        password,
                        department,
                    };
                    page.submit_manager(&form).await?;
                }
            }
            if let Some(message) = page.status().success() {
                println!("{}", message);
            }
        }
        Commands::Login {
            role,
            email,
            password,
        } => {
            let mut page = LoginPage::new(config.client(), &store, role);
            let session = page.submit(&email, &password).await?;
            if json {
                print_json(&session)?;
            } else if let Some(message) = page.status().success() {
                println!("{}", message);
            }
        }
        Commands::Logout => {
            account::logout(&store).context("Failed to clear session")?;
            println!("Logged out");
        }
        Commands::Whoami => match store.get() {
            Some(session) if json => print_json(&session)?,
            Some(session) => println!(
                "{} ({})",
                session.name.as_deref().unwrap_or("unnamed"),
                session.user_type
            ),
            None => println!("Not logged in"),
        },
        Commands::Developers => {
            let client = manager_client(&config, &store, Route::NewProject)?;
            let developers = client
                .list_developers()
                .await
                .context("Failed to fetch developers")?;
            if json {
                print_json(&developers)?;
            } else {
                print!("{}", render::render_developers(&developers, &[]));
            }
        }
        Commands::NewProject(args) => {
            let client = manager_client(&config, &store, Route::NewProject)?;
            let mut page = intake(client, args).await?;
            let review = page.submit().await?;
            show_analysis(&review, json)?;
        }
        Commands::Analysis {
            action:
                AnalysisCommand::Save {
                    project_id,
                    file,
                    edits,
                },
        } => {
            let client = manager_client(&config, &store, Route::Analysis)?;
            let analysis: ProjectAnalysis = read_json(&file)?;
            let mut page = AnalysisReview::with_policy(
                client,
                PipelineContext::new(project_id),
                analysis,
                config.stale_edit,
            );
            for op in parse_edits(&edits)? {
                page.apply(&op)?;
            }
            let context = page.save().await?;
            let mut epics = EpicsReview::pending(page.client().clone(), context, page.policy());
            epics.fetch().await?;
            show_epics(&epics, json)?;
        }
        Commands::Epics { action } => {
            let client = manager_client(&config, &store, Route::Epics)?;
            let (args, generate) = match action {
                EpicsCommand::Show(args) => (args, false),
                EpicsCommand::Generate(args) => (args, true),
            };
            let carried = args
                .file
                .as_deref()
                .map(read_json::<EpicsAndStories>)
                .transpose()?;
            let mut page = EpicsReview::enter(
                client,
                Some(ProjectId::from(args.project_id)),
                carried,
                config.stale_edit,
            )
            .await?;
            for op in parse_edits(&args.edits)? {
                page.apply(&op)?;
            }
            if generate {
                let team = page.go_for_team_matching().await?;
                show_team(&team, json)?;
            } else {
                show_epics(&page, json)?;
            }
        }
        Commands::TeamMatching { action } => {
            let client = manager_client(&config, &store, Route::TeamMatching)?;
            let (args, save) = match action {
                TeamCommand::Show(args) => (args, false),
                TeamCommand::Save(args) => (args, true),
            };
            let mut page = TeamMatchingReview::enter(client, Some(ProjectId::from(args.project_id)))
                .await?
                .with_policy(config.stale_edit);
            for op in parse_edits(&args.edits)? {
                page.apply(&op)?;
            }
            if save {
                page.save().await?;
            }
            show_team(&page, json)?;
        }
        Commands::Run(args) => {
            let client = manager_client(&config, &store, Route::NewProject)?;
            let mut pipeline = Pipeline::Intake(intake(client, args).await?);
            loop {
                pipeline = match pipeline.advance().await {
                    Ok(next) => next,
                    Err(stalled) => {
                        let stage = stalled.pipeline.stage();
                        return Err(anyhow::Error::new(stalled.error)
                            .context(format!("Pipeline stalled at {}", stage.as_str())));
                    }
                };
                show_stage(&pipeline, json)?;
                if matches!(pipeline, Pipeline::Done(_)) {
                    break;
                }
            }
        }
    }

    Ok(())
}
