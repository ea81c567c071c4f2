use anyhow::{Context, Result};
use clap::Parser;
use fmg_http::codec::{self, JsonConfig};
use fmg_http::config::{ClientSettings, SystemEnv, TIMEOUT_ENV, USER_AGENT_ENV};
use fmg_http::http::{Body, ContentType, Method, Request};
use fmg_http::register;
use std::io::Read;
use std::process::ExitCode;
use std::time::Duration;

/// fmg-http - send HTTP requests and decode JSON/XML responses
///
/// Examples:
///   fmg-http send https://api.example.com/items -q q="a b"
///   fmg-http send https://api.example.com/items -X POST -d '{"name":"x"}'
///   echo '{"name":"x"}' | fmg-http encode --to xml
#[derive(Parser, Debug)]
#[command(author, version = env!("FMG_HTTP_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// User-Agent header sent with every request
    #[arg(long, env = USER_AGENT_ENV, value_name = "AGENT", global = true)]
    user_agent: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, env = TIMEOUT_ENV, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Pretty-print JSON output with this many spaces of indentation
    #[arg(long, value_name = "SPACES", global = true)]
    json_indent: Option<usize>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send a request and print the response
    Send(SendArgs),

    /// Read JSON from stdin and print it as JSON or XML
    Encode(EncodeArgs),
}

#[derive(clap::Args, Debug)]
struct SendArgs {
    /// Target URL
    #[arg(value_name = "URL")]
    url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Query parameter, repeatable
    #[arg(short = 'q', long = "query", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    query: Vec<(String, String)>,

    /// Request header, repeatable
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Basic auth credentials
    #[arg(short = 'u', long, value_name = "USER:PASSWORD", value_parser = parse_credentials)]
    user: Option<(String, String)>,

    /// Request body
    #[arg(short = 'd', long, value_name = "DATA")]
    data: Option<String>,

    /// Media type family of the request body
    #[arg(long, value_name = "json|xml", default_value = "json")]
    content_type: ContentType,

    /// Only print the body
    #[arg(short = 's', long)]
    silent: bool,
}

#[derive(clap::Args, Debug)]
struct EncodeArgs {
    /// Output format
    #[arg(long, value_name = "json|xml", default_value = "json")]
    to: ContentType,

    /// Root element name for XML output
    #[arg(long, default_value = "root")]
    root: String,
}

fn parse_key_value(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE, got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}

fn parse_header(s: &str) -> Result<(String, String)> {
    let (name, value) = s
        .split_once(':')
        .with_context(|| format!("Expected NAME:VALUE, got '{}'", s))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn parse_credentials(s: &str) -> Result<(String, String)> {
    let (user, password) = s
        .split_once(':')
        .with_context(|| format!("Expected USER:PASSWORD, got '{}'", s))?;
    Ok((user.to_string(), password.to_string()))
}

impl Cli {
    fn client_settings(&self) -> Result<ClientSettings> {
        let mut settings = ClientSettings::from_env(&SystemEnv)?;
        if let Some(user_agent) = &self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(secs) = self.timeout {
            settings.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        Ok(settings)
    }

    fn json_config(&self) -> JsonConfig {
        self.json_indent
            .map(JsonConfig::indented)
            .unwrap_or_default()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Send(args) => send(&cli, args).await,
        Commands::Encode(args) => encode(&cli, args),
    }
}

async fn send(cli: &Cli, args: &SendArgs) -> Result<ExitCode> {
    let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{}'", args.method))?;

    let helper = register()
        .with_client_settings(cli.client_settings()?)
        .with_json_config(cli.json_config())
        .build();

    let mut request = Request::new(method, &args.url);
    for (key, value) in &args.query {
        request = request.query(key, value);
    }
    for (name, value) in &args.headers {
        request = request.header(name, value);
    }
    if let Some((user, password)) = &args.user {
        request = request.basic_auth(user, password);
    }
    if let Some(data) = &args.data {
        request = request.body(Body::Text {
            content: data.clone(),
            content_type: args.content_type,
        });
    }

    let response = helper.send(request).await;

    if let Some(message) = response.error_message() {
        eprintln!("error: {}", message);
        return Ok(ExitCode::FAILURE);
    }

    if !args.silent {
        println!("{}", response.status());
    }

    let exit_code = if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };
    let reindent =
        cli.json_indent.is_some() && response.content_type() == Some(ContentType::Json);

    let raw = response.into_body();
    let body = if reindent {
        // Fall back to the body as received
        codec::from_json::<serde_json::Value>(&raw)
            .and_then(|value| codec::to_json(&value, helper.json_config()))
            .unwrap_or(raw)
    } else {
        raw
    };
    if !body.is_empty() {
        println!("{}", body);
    }

    Ok(exit_code)
}

fn encode(cli: &Cli, args: &EncodeArgs) -> Result<ExitCode> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;

    let value: serde_json::Value = codec::from_json(&input)?;
    let output = match args.to {
        ContentType::Json => codec::to_json(&value, &cli.json_config())?,
        ContentType::Xml => codec::to_xml_with_root(&args.root, &value)?,
        other => anyhow::bail!("Cannot encode to '{}'. Expected json or xml.", other),
    };

    println!("{}", output);
    Ok(ExitCode::SUCCESS)
}
