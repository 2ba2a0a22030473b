use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use jobmatch_session::{
    Access, AuthGateway, AuthResponse, BackendError, ConfigError, ContextError, FileStore, GuardState, History,
    HttpBackend, LoginForm, RecruiterSignupForm, Role, RouteGuard, SessionConfig, SessionOptions, SessionProvider,
    SessionService, TalentSignupForm, UserProfile,
};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("backend client setup failed: {0}")]
    Backend(#[from] BackendError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("{0}")]
    Failed(String),
    #[error("session context unavailable: {0}")]
    Context(#[from] ContextError),
}

#[derive(Parser, Debug)]
#[command(name = "jobmatch", about = "Job-matching session and access-control client")]
struct Cli {
    /// Backend API base URL; overrides `JOBMATCH_API_BASE_URL`.
    #[arg(long)]
    api_base_url: Option<String>,

    /// Credential file; overrides `JOBMATCH_CREDENTIAL_PATH`.
    #[arg(long)]
    credential_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconcile the session with the stored credential and print it.
    Check,
    Login(LoginArgs),
    Register(RegisterCommand),
    Logout,
    /// Evaluate the route guard for a path and print the outcome.
    Visit(VisitArgs),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "JOBMATCH_PASSWORD")]
    password: String,
}

#[derive(Args, Debug)]
struct RegisterCommand {
    #[command(subcommand)]
    command: RegisterSubcommand,
}

#[derive(Subcommand, Debug)]
enum RegisterSubcommand {
    Talent(TalentArgs),
    Recruiter(RecruiterArgs),
}

#[derive(Args, Debug)]
struct TalentArgs {
    #[arg(long)]
    fname: String,
    #[arg(long)]
    lname: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone_number: String,
    /// YYYY-MM-DD.
    #[arg(long)]
    date_of_birth: String,
    #[arg(long, env = "JOBMATCH_PASSWORD")]
    password: String,
    #[arg(long, env = "JOBMATCH_CONFIRM_PASSWORD")]
    confirm_password: String,
}

#[derive(Args, Debug)]
struct RecruiterArgs {
    #[arg(long)]
    company_name: String,
    #[arg(long)]
    contact_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone_number: String,
    #[arg(long, env = "JOBMATCH_PASSWORD")]
    password: String,
    #[arg(long, env = "JOBMATCH_CONFIRM_PASSWORD")]
    confirm_password: String,
}

#[derive(Args, Debug)]
struct VisitArgs {
    /// Route to visit. `/admin`, `/talent` and `/recruiter` sections require that role.
    path: String,
    /// Role the view requires; overrides the one implied by the path.
    #[arg(long)]
    role: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SessionConfig::from_env()?;
    if let Some(url) = cli.api_base_url {
        config.api_base_url = url.trim_end_matches('/').to_owned();
    }
    if let Some(path) = cli.credential_path {
        config.credential_path = path;
    }

    let history = Arc::new(History::new());
    let session = build_session(&config, history.clone())?;

    match cli.command {
        Command::Check => run_check(&session).await,
        Command::Login(args) => run_login(&session, args).await,
        Command::Register(register) => run_register(&session, register).await,
        Command::Logout => run_logout(&session, &history).await,
        Command::Visit(args) => run_visit(session, &history, args).await,
    }
}

fn build_session(config: &SessionConfig, history: Arc<History>) -> Result<SessionService, CliError> {
    let backend = HttpBackend::from_config(config)?;
    let store = FileStore::new(config.credential_path.clone());
    let gateway = AuthGateway::new(Arc::new(backend), Arc::new(store));
    Ok(SessionService::new(gateway, history, SessionOptions::from_config(config)))
}

async fn run_check(session: &SessionService) -> Result<(), CliError> {
    let snapshot = session.check_auth().await;
    print_json(&json!({
        "authenticated": snapshot.is_authenticated(),
        "user": snapshot.user(),
    }))
}

async fn run_login(session: &SessionService, args: LoginArgs) -> Result<(), CliError> {
    let response = session.login(&LoginForm::new(args.email, args.password)).await;
    let home = response.data.as_ref().and_then(UserProfile::role).and_then(Role::home_route);
    let mut rendered = serde_json::to_value(&response)?;
    if let (Some(home), Value::Object(map)) = (home, &mut rendered) {
        map.insert("home".to_owned(), Value::from(home));
    }
    print_json(&rendered)?;
    finish(&response)
}

async fn run_register(session: &SessionService, register: RegisterCommand) -> Result<(), CliError> {
    let gateway = session.gateway();
    let response = match register.command {
        RegisterSubcommand::Talent(args) => {
            let form = TalentSignupForm {
                fname: args.fname,
                lname: args.lname,
                email: args.email,
                phone_number: args.phone_number,
                date_of_birth: args.date_of_birth,
                password: args.password,
                confirm_password: args.confirm_password,
            };
            gateway.register_talent(&form).await
        }
        RegisterSubcommand::Recruiter(args) => {
            let form = RecruiterSignupForm {
                company_name: args.company_name,
                contact_name: args.contact_name,
                email: args.email,
                phone_number: args.phone_number,
                password: args.password,
                confirm_password: args.confirm_password,
            };
            gateway.register_recruiter(&form).await
        }
    };
    print_json(&serde_json::to_value(&response)?)?;
    finish(&response)
}

async fn run_logout(session: &SessionService, history: &History) -> Result<(), CliError> {
    session.logout().await;
    print_json(&json!({
        "authenticated": session.snapshot().is_authenticated(),
        "redirect": history.current(),
    }))
}

async fn run_visit(session: SessionService, history: &History, args: VisitArgs) -> Result<(), CliError> {
    let access = match args.role.as_deref() {
        Some(raw) => Access::Role(Role::parse(raw)),
        None => Access::for_path(&args.path),
    };
    let required = match &access {
        Access::Authenticated => "authenticated".to_owned(),
        Access::Role(role) => role.to_string(),
    };

    let provider = SessionProvider::mount(session.clone());
    let mut rx = session.subscribe();
    let mut guard = RouteGuard::mount(&provider.scope(), access)?;
    let state = guard.settle(&mut rx).await.clone();

    let outcome = match state {
        GuardState::Allowed => "allowed",
        GuardState::Denied | GuardState::Redirecting(_) => "denied",
        GuardState::Checking => "checking",
    };
    print_json(&json!({
        "path": args.path,
        "access": required,
        "outcome": outcome,
        "redirect": history.current(),
        "role": session.snapshot().role().map(Role::as_str),
    }))
}

fn finish<T>(response: &AuthResponse<T>) -> Result<(), CliError> {
    if response.success {
        return Ok(());
    }
    Err(CliError::Failed(response.message.clone()))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
