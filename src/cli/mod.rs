use clap::{ Parser, Subcommand };
use crate::config::DEFAULT_UPSTREAM_URL;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the relay that holds the model API key and forwards chat requests.
    Serve(ServeArgs),
    /// Start an interactive chat session in the terminal.
    Chat(ChatArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host address and port for the relay to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8787")]
    pub server_addr: String,

    /// Key injected into every upstream request. When unset, each request is answered with a 500.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Chat completions endpoint of the upstream model API.
    #[arg(long, env = "UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChatArgs {
    /// Relay address. When set, requests go through the relay and no local key is needed.
    #[arg(long, env = "WORKER_URL")]
    pub worker_url: Option<String>,

    /// Local development key used to call the upstream API directly when no relay is set.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Chat completions endpoint used in direct mode.
    #[arg(long, env = "UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Where the conversation history is kept (memory, redis)
    #[arg(long, env = "SESSION_STORE", default_value = "memory")]
    pub session_store: String,

    /// Session store host endpoint (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "SESSION_HOST", default_value = "redis://127.0.0.1:6379")]
    pub session_host: String,

    /// Prefix for Redis session keys.
    #[arg(long, env = "SESSION_REDIS_PREFIX", default_value = "session:")]
    pub session_prefix: String,

    /// Optional JSON file overriding the system prompt and greeting.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,
}
