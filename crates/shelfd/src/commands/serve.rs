//! The `serve` command: runs the JSON API until interrupted.

use std::net::SocketAddr;

use super::*;

/// Options for [`Commands::Serve`].
#[derive(Args, Clone)]
pub struct ServeArgs {
  /// Address to listen on, overriding the configured one
  #[arg(long, short)]
  pub bind: Option<String>,

  /// Also write daily rolling logs into this directory
  #[arg(long)]
  pub log_dir: Option<PathBuf>,
}

/// Function for the [`Commands::Serve`] in the CLI.
pub async fn serve<I: UserInteraction>(interaction: &I, shelf: Shelf, args: ServeArgs) -> Result<()> {
  let bind = args.bind.unwrap_or_else(|| shelf.config.bind.clone());
  let addr: SocketAddr = bind.parse()?;
  let app = server::router(shelf)?;

  let listener = tokio::net::TcpListener::bind(addr).await?;
  let local = listener.local_addr()?;
  info!("Listening on {local}");
  interaction.reply(ResponseContent::Success(&format!("Serving the shelf API on http://{local}")))?;

  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  interaction.reply(ResponseContent::Info("Server stopped"))?;
  Ok(())
}

/// Resolves once Ctrl+C is pressed.
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!("Failed to listen for shutdown signal: {e}");
    std::future::pending::<()>().await;
  }
  info!("Shutdown signal received");
}
