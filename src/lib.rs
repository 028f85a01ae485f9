pub mod cli;
pub mod config;
pub mod console;
pub mod conversation;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;
pub mod view;

use cli::{ Args, Command };
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.command {
        Command::Serve(serve_args) => {
            info!("--- Relay Configuration ---");
            info!("Server Address: {}", serve_args.server_addr);
            info!("Upstream URL: {}", serve_args.upstream_url);
            info!("TLS Enabled: {}", serve_args.enable_tls);
            info!("---------------------------");
            let server = Server::new(serve_args);
            server.run().await
        }
        Command::Chat(chat_args) => {
            info!("--- Chat Configuration ---");
            info!("Relay URL: {}", chat_args.worker_url.as_deref().unwrap_or("(none, direct mode)"));
            info!("Session Store: {}", chat_args.session_store);
            info!("Prompts Path: {}", chat_args.prompts_path.as_deref().unwrap_or("(built-in)"));
            info!("--------------------------");
            console::run_chat(chat_args).await
        }
    }
}
