pub mod api;

use crate::cli::ServeArgs;
use log::{ info, warn };
use std::error::Error;

pub struct Server {
    args: ServeArgs,
}

impl Server {
    pub fn new(args: ServeArgs) -> Self {
        let has_key = args.openai_api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
        if has_key {
            info!("Relay configured with an upstream API key.");
        } else {
            warn!("Relay started WITHOUT OPENAI_API_KEY. Every request will fail with 500.");
        }
        Self { args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(self.args.clone()).await
    }
}
