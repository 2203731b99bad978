//! The `cache` command: maintenance of cached catalog responses.

use super::*;

/// Cache maintenance subcommands
#[derive(Subcommand, Clone)]
pub enum CacheCommands {
  /// Drop every cached search response
  Clear,
  /// Drop only responses older than the cache lifetime
  Prune,
}

/// Function for the [`Commands::Cache`] in the CLI.
pub async fn cache<I: UserInteraction>(interaction: &I, shelf: &Shelf, cmd: CacheCommands) -> Result<()> {
  let removed = match cmd {
    CacheCommands::Clear => {
      if !interaction.confirm("Drop every cached search response?")? {
        interaction.reply(ResponseContent::Info("Operation cancelled"))?;
        return Ok(());
      }
      shelf.database.clear_cache().await?
    },
    CacheCommands::Prune => shelf.database.clear_expired_cache().await?,
  };
  interaction.reply(ResponseContent::Success(&format!("Removed {removed} cached responses")))
}
