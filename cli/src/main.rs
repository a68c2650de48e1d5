//! Evalboard API CLI.
//!
//! SYSTEM CONTEXT
//! ==============
//! Thin client over the REST API plus the NDJSON evaluation stream. Every
//! REST command prints the server's JSON response; `run` streams evaluation
//! events line by line, printing progress to stderr and a result summary to
//! stdout. Authentication is a bearer token from `login`, passed via
//! `--token` or `EVALBOARD_TOKEN`.

mod input;

use clap::{Args, Parser, Subcommand};
use futures_util::StreamExt;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Map, Value};
use uuid::Uuid;

use shared::stream::{LineSplitter, decode_event};
use shared::{DatasetRow, EvalEvent, EvalRequest, RowResult, StoreResultsRequest, VersionStatus};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing bearer token; pass --token or set EVALBOARD_TOKEN")]
    MissingToken,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error(transparent)]
    Input(#[from] input::InputError),
    #[error("server returned error for {endpoint}: {message}")]
    ServerError { endpoint: String, message: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unknown version status `{0}`; expected draft, published, or archived")]
    UnknownStatus(String),
    #[error("evaluation run failed: {0}")]
    Run(String),
}

#[derive(Parser, Debug)]
#[command(name = "evalboard-cli", about = "Evalboard API and evaluation-stream CLI")]
struct Cli {
    #[arg(long, env = "EVALBOARD_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "EVALBOARD_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Auth(AuthCommand),
    Project(ProjectCommand),
    Prompt(PromptCommand),
    Dataset(DatasetCommand),
    Job(JobCommand),
    Metrics(MetricsCommand),
    Run(RunArgs),
}

#[derive(Args, Debug)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuthSubcommand {
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Me,
    Logout,
}

#[derive(Args, Debug)]
struct ProjectCommand {
    #[command(subcommand)]
    command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProjectSubcommand {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Read {
        project_id: Uuid,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        project_id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        project_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct PromptCommand {
    #[command(subcommand)]
    command: PromptSubcommand,
}

#[derive(Subcommand, Debug)]
enum PromptSubcommand {
    List {
        project_id: Uuid,
    },
    Create {
        project_id: Uuid,
        #[arg(long)]
        name: String,
    },
    Delete {
        prompt_id: Uuid,
    },
    Versions {
        prompt_id: Uuid,
    },
    AddVersion {
        prompt_id: Uuid,
        #[arg(long, default_value = "")]
        system_prompt: String,
        #[arg(long, default_value = "{Question}")]
        user_template: String,
    },
    SetStatus {
        version_id: Uuid,
        #[arg(long)]
        status: String,
    },
}

#[derive(Args, Debug)]
struct DatasetCommand {
    #[command(subcommand)]
    command: DatasetSubcommand,
}

#[derive(Subcommand, Debug)]
enum DatasetSubcommand {
    List {
        project_id: Uuid,
    },
    Upload {
        project_id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
        input: String,
    },
    Read {
        dataset_id: Uuid,
    },
    Rows {
        dataset_id: Uuid,
        #[arg(long)]
        limit: Option<u32>,
    },
    Delete {
        dataset_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct JobCommand {
    #[command(subcommand)]
    command: JobSubcommand,
}

#[derive(Subcommand, Debug)]
enum JobSubcommand {
    List {
        project_id: Uuid,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Read {
        job_id: Uuid,
    },
    Entries {
        job_id: Uuid,
    },
    Cancel {
        job_id: Uuid,
    },
    Delete {
        job_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct MetricsCommand {
    #[command(subcommand)]
    command: MetricsSubcommand,
}

#[derive(Subcommand, Debug)]
enum MetricsSubcommand {
    Job { job_id: Uuid },
    Project { project_id: Uuid },
}

#[derive(Args, Debug)]
struct RunArgs {
    #[arg(long, help = "Evaluate rows from an uploaded dataset")]
    dataset_id: Option<Uuid>,

    #[arg(long, help = "Evaluate rows from a local CSV or JSONL file, - for stdin")]
    input: Option<String>,

    #[arg(long, help = "Evaluate at most this many rows")]
    limit: Option<usize>,

    #[arg(long, default_value = "")]
    system_prompt: String,

    #[arg(long, default_value = "{Question}")]
    user_template: String,

    #[arg(long, default_value = "gpt-4o-mini")]
    model_a: String,

    #[arg(long, default_value = "deepseek-chat")]
    model_b: String,

    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    openai_key: String,

    #[arg(long, env = "DEEPSEEK_API_KEY", default_value = "", hide_env_values = true)]
    deepseek_key: String,

    #[arg(long, env = "ANTHROPIC_API_KEY", default_value = "", hide_env_values = true)]
    anthropic_key: String,

    #[arg(long, help = "Persist the finished run as a job in this project")]
    store_in: Option<Uuid>,

    #[arg(long, help = "Job name when storing; defaults to \"A vs B\"")]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, token: cli.token };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Auth(auth) => run_auth(&ctx, auth).await,
        Command::Project(project) => run_project(&ctx, project).await,
        Command::Prompt(prompt) => run_prompt(&ctx, prompt).await,
        Command::Dataset(dataset) => run_dataset(&ctx, dataset).await,
        Command::Job(job) => run_job(&ctx, job).await,
        Command::Metrics(metrics) => run_metrics(&ctx, metrics).await,
        Command::Run(args) => run_evaluation(&ctx, args).await,
    }
}

// =============================================================================
// REST COMMANDS
// =============================================================================

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let url = format!("{}/healthz", cli.base_url.trim_end_matches('/'));
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError {
            endpoint: format!("HTTP {}", status.as_u16()),
            message: "health check failed".to_owned(),
        });
    }
    println!("ok");
    Ok(())
}

async fn run_auth(cli: &CliContext, auth: AuthCommand) -> Result<(), CliError> {
    match auth.command {
        AuthSubcommand::Register { email, password, name } => {
            let json = public_request(
                cli,
                reqwest::Method::POST,
                "/api/auth/register",
                Some(serde_json::json!({ "email": email, "password": password, "name": name })),
            )
            .await?;
            print_json(&json)?;
            Ok(())
        }
        AuthSubcommand::Login { email, password } => {
            let json = public_request(
                cli,
                reqwest::Method::POST,
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await?;
            let token = json
                .get("token")
                .and_then(Value::as_str)
                .ok_or(CliError::MissingField("token"))?;
            eprintln!("export EVALBOARD_TOKEN={token}");
            print_json(&json)?;
            Ok(())
        }
        AuthSubcommand::Me => {
            let json = api_request(cli, reqwest::Method::GET, "/api/auth/me", None).await?;
            print_json(&json)?;
            Ok(())
        }
        AuthSubcommand::Logout => {
            api_request(cli, reqwest::Method::POST, "/api/auth/logout", None).await?;
            println!("logged out");
            Ok(())
        }
    }
}

async fn run_project(cli: &CliContext, project: ProjectCommand) -> Result<(), CliError> {
    match project.command {
        ProjectSubcommand::List { page, limit } => {
            let path = paged_path("/api/projects", page, limit);
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        ProjectSubcommand::Read { project_id } => {
            let path = format!("/api/projects/{project_id}");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        ProjectSubcommand::Create { name, description } => {
            let json = api_request(
                cli,
                reqwest::Method::POST,
                "/api/projects",
                Some(serde_json::json!({ "name": name, "description": description })),
            )
            .await?;
            print_json(&json)?;
            Ok(())
        }
        ProjectSubcommand::Update { project_id, name, description } => {
            let mut body = Map::new();
            if let Some(name) = name {
                body.insert("name".to_owned(), Value::String(name));
            }
            if let Some(description) = description {
                body.insert("description".to_owned(), Value::String(description));
            }
            let path = format!("/api/projects/{project_id}");
            let json =
                api_request(cli, reqwest::Method::PUT, &path, Some(Value::Object(body))).await?;
            print_json(&json)?;
            Ok(())
        }
        ProjectSubcommand::Delete { project_id } => {
            let path = format!("/api/projects/{project_id}");
            api_request(cli, reqwest::Method::DELETE, &path, None).await?;
            println!("deleted {project_id}");
            Ok(())
        }
    }
}

async fn run_prompt(cli: &CliContext, prompt: PromptCommand) -> Result<(), CliError> {
    match prompt.command {
        PromptSubcommand::List { project_id } => {
            let path = format!("/api/projects/{project_id}/prompts");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        PromptSubcommand::Create { project_id, name } => {
            let path = format!("/api/projects/{project_id}/prompts");
            let json = api_request(
                cli,
                reqwest::Method::POST,
                &path,
                Some(serde_json::json!({ "project_id": project_id, "name": name })),
            )
            .await?;
            print_json(&json)?;
            Ok(())
        }
        PromptSubcommand::Delete { prompt_id } => {
            let path = format!("/api/prompts/{prompt_id}");
            api_request(cli, reqwest::Method::DELETE, &path, None).await?;
            println!("deleted {prompt_id}");
            Ok(())
        }
        PromptSubcommand::Versions { prompt_id } => {
            let path = format!("/api/prompts/{prompt_id}/versions");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        PromptSubcommand::AddVersion { prompt_id, system_prompt, user_template } => {
            let path = format!("/api/prompts/{prompt_id}/versions");
            let json = api_request(
                cli,
                reqwest::Method::POST,
                &path,
                Some(serde_json::json!({
                    "system_prompt": system_prompt,
                    "user_prompt_template": user_template,
                })),
            )
            .await?;
            print_json(&json)?;
            Ok(())
        }
        PromptSubcommand::SetStatus { version_id, status } => {
            let parsed = VersionStatus::parse(&status)
                .ok_or_else(|| CliError::UnknownStatus(status.clone()))?;
            let path = format!("/api/prompt-versions/{version_id}/status");
            let json = api_request(
                cli,
                reqwest::Method::PUT,
                &path,
                Some(serde_json::json!({ "status": parsed.as_str() })),
            )
            .await?;
            print_json(&json)?;
            Ok(())
        }
    }
}

async fn run_dataset(cli: &CliContext, dataset: DatasetCommand) -> Result<(), CliError> {
    match dataset.command {
        DatasetSubcommand::List { project_id } => {
            let path = format!("/api/projects/{project_id}/datasets");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        DatasetSubcommand::Upload { project_id, name, input } => {
            // Parse locally first so malformed files fail with a line number
            // instead of a server-side 422.
            let rows = input::load_rows(&input)?;
            let path = format!("/api/projects/{project_id}/datasets");
            let json = api_request(
                cli,
                reqwest::Method::POST,
                &path,
                Some(serde_json::json!({ "name": name, "rows": rows })),
            )
            .await?;
            print_json(&json)?;
            Ok(())
        }
        DatasetSubcommand::Read { dataset_id } => {
            let path = format!("/api/datasets/{dataset_id}");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        DatasetSubcommand::Rows { dataset_id, limit } => {
            let path = match limit {
                Some(limit) => format!("/api/datasets/{dataset_id}/rows?limit={limit}"),
                None => format!("/api/datasets/{dataset_id}/rows"),
            };
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        DatasetSubcommand::Delete { dataset_id } => {
            let path = format!("/api/datasets/{dataset_id}");
            api_request(cli, reqwest::Method::DELETE, &path, None).await?;
            println!("deleted {dataset_id}");
            Ok(())
        }
    }
}

async fn run_job(cli: &CliContext, job: JobCommand) -> Result<(), CliError> {
    match job.command {
        JobSubcommand::List { project_id, page, limit } => {
            let base = format!("/api/projects/{project_id}/jobs");
            let path = paged_path(&base, page, limit);
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        JobSubcommand::Read { job_id } => {
            let path = format!("/api/jobs/{job_id}");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        JobSubcommand::Entries { job_id } => {
            let path = format!("/api/jobs/{job_id}/entries");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        JobSubcommand::Cancel { job_id } => {
            let path = format!("/api/jobs/{job_id}/cancel");
            let json = api_request(cli, reqwest::Method::POST, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        JobSubcommand::Delete { job_id } => {
            let path = format!("/api/jobs/{job_id}");
            api_request(cli, reqwest::Method::DELETE, &path, None).await?;
            println!("deleted {job_id}");
            Ok(())
        }
    }
}

async fn run_metrics(cli: &CliContext, metrics: MetricsCommand) -> Result<(), CliError> {
    match metrics.command {
        MetricsSubcommand::Job { job_id } => {
            let path = format!("/api/jobs/{job_id}/metrics");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
        MetricsSubcommand::Project { project_id } => {
            let path = format!("/api/projects/{project_id}/metrics");
            let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
            print_json(&json)?;
            Ok(())
        }
    }
}

// =============================================================================
// STREAMED EVALUATION
// =============================================================================

async fn run_evaluation(cli: &CliContext, args: RunArgs) -> Result<(), CliError> {
    let mut rows = match (&args.dataset_id, &args.input) {
        (Some(dataset_id), None) => fetch_dataset_rows(cli, *dataset_id).await?,
        (None, Some(path)) => input::load_rows(path)?,
        _ => return Err(CliError::Run("pass exactly one of --dataset-id or --input".to_owned())),
    };
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }
    if rows.is_empty() {
        return Err(CliError::Run("no rows to evaluate".to_owned()));
    }

    let request = EvalRequest {
        system_prompt: args.system_prompt.clone(),
        user_prompt_template: args.user_template.clone(),
        rows,
        model_a: args.model_a.clone(),
        model_b: args.model_b.clone(),
        openai_key: args.openai_key.clone(),
        deepseek_key: args.deepseek_key.clone(),
        anthropic_key: args.anthropic_key.clone(),
    };

    let client = authed_client(cli)?;
    let url = format!("{}/api/evaluate/rows", cli.base_url.trim_end_matches('/'));
    let response = client.post(&url).json(&request).send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(CliError::ServerError {
            endpoint: format!("HTTP {}", status.as_u16()),
            message,
        });
    }

    let results = consume_stream(response).await?;
    summarize(&args, &results);

    if let Some(project_id) = args.store_in {
        let name = args
            .name
            .clone()
            .unwrap_or_else(|| format!("{} vs {}", args.model_a, args.model_b));
        let store = StoreResultsRequest {
            project_id,
            prompt_version: None,
            name,
            model_a: args.model_a.clone(),
            model_b: args.model_b.clone(),
            rows: results,
        };
        let json = api_request(
            cli,
            reqwest::Method::POST,
            "/api/evaluation-results/store",
            Some(serde_json::to_value(&store)?),
        )
        .await?;
        print_json(&json)?;
    }

    Ok(())
}

/// Drain the NDJSON response body, printing progress and collecting the
/// per-row results of completed rows.
async fn consume_stream(response: reqwest::Response) -> Result<Vec<RowResult>, CliError> {
    let mut splitter = LineSplitter::new();
    let mut results = Vec::new();
    let mut terminal = false;
    let mut body = response.bytes_stream();

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for line in splitter.push(&chunk) {
            let Ok(event) = decode_event(&line) else {
                eprintln!("skipping unparseable stream line");
                continue;
            };
            match event {
                EvalEvent::Start { total_rows } => {
                    eprintln!("evaluating {total_rows} rows");
                }
                EvalEvent::RowComplete { row_number, total_rows, progress, result } => {
                    eprintln!(
                        "row {row_number}/{total_rows} ({progress}%): winner {}",
                        result.winner
                    );
                    results.push(result);
                }
                EvalEvent::RowError { row_number, error } => {
                    eprintln!("row {row_number} failed: {error}");
                }
                EvalEvent::Complete { total_rows } => {
                    eprintln!("complete: {total_rows} rows");
                    terminal = true;
                }
                EvalEvent::Error { error } => return Err(CliError::Run(error)),
            }
        }
    }

    if !terminal {
        return Err(CliError::Run("stream closed before a terminal event".to_owned()));
    }
    Ok(results)
}

fn summarize(args: &RunArgs, results: &[RowResult]) {
    let completed = results.len();
    let wins_a = results.iter().filter(|r| r.winner == args.model_a).count();
    let wins_b = results.iter().filter(|r| r.winner == args.model_b).count();
    let tokens: i64 = results.iter().map(|r| r.model_a_tokens + r.model_b_tokens).sum();
    let cost: f64 = results.iter().map(|r| r.model_a_cost + r.model_b_cost).sum();
    println!(
        "{}",
        serde_json::json!({
            "completed_rows": completed,
            "wins_a": wins_a,
            "wins_b": wins_b,
            "total_tokens": tokens,
            "total_cost": cost,
        })
    );
}

async fn fetch_dataset_rows(cli: &CliContext, dataset_id: Uuid) -> Result<Vec<DatasetRow>, CliError> {
    let path = format!("/api/datasets/{dataset_id}/rows");
    let json = api_request(cli, reqwest::Method::GET, &path, None).await?;
    Ok(serde_json::from_value(json)?)
}

// =============================================================================
// HTTP PLUMBING
// =============================================================================

fn authed_client(cli: &CliContext) -> Result<reqwest::Client, CliError> {
    let token = cli.token.as_deref().ok_or(CliError::MissingToken)?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);

    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}

async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = authed_client(cli)?;
    send_request(&client, cli, method, path, body).await
}

/// Request without a bearer token, for login and registration.
async fn public_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = reqwest::Client::new();
    send_request(&client, cli, method, path, body).await
}

async fn send_request(
    client: &reqwest::Client,
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let url = format!("{}{}", cli.base_url.trim_end_matches('/'), path);

    let request = client.request(method, &url);
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or_else(|_| Value::Null);

    if !status.is_success() {
        return Err(CliError::ServerError {
            endpoint: format!("HTTP {}", status.as_u16()),
            message: value.to_string(),
        });
    }

    Ok(value)
}

fn paged_path(base: &str, page: Option<u32>, limit: Option<u32>) -> String {
    match (page, limit) {
        (None, None) => base.to_owned(),
        (Some(page), None) => format!("{base}?page={page}"),
        (None, Some(limit)) => format!("{base}?limit={limit}"),
        (Some(page), Some(limit)) => format!("{base}?page={page}&limit={limit}"),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
