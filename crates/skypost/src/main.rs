//! `skypost` — post one record from the command line.

use std::process::ExitCode;

use clap::Parser;
use skypost::config::Args;
use skypost::logging::init_tracing;
use skypost::prelude::*;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(&args.log_level);

    if let Err(e) = args.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    info!(handle = %args.handle, base_url = %args.base_url, "starting");
    match run(&args).await {
        Ok(response) => {
            println!("{}", response.body);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "sequence failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<ClientResponse, SkypostError> {
    let transport = ReqwestTransport::new(args.transport_config())?;
    let sequencer = Sequencer::builder()
        .link(LinkManager::new(HostDriver::new(), args.link_config()))
        .client(SessionClient::new(transport, args.session_config()))
        .config(args.sequencer_config())
        .build()?;

    let mut session = Session::new();
    sequencer
        .run(&mut session, &args.handle, &args.password, &args.message)
        .await
}
