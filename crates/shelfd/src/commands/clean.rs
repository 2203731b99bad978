//! The `clean` command: removes the database and its side files.

use super::*;

/// Function for the [`Commands::Clean`] in the CLI.
pub fn clean<I: UserInteraction>(interaction: &I, path: &Path) -> Result<()> {
  if !path.exists() {
    return interaction.reply(ResponseContent::Warning(&format!("No database found at: {}", path.display())));
  }

  interaction.reply(ResponseContent::Warning(&format!("Database found at: {}", path.display())))?;
  if !interaction.confirm("Are you sure you want to delete this database?")? {
    interaction.reply(ResponseContent::Info("Operation cancelled"))?;
    return Ok(());
  }

  trace!("Removing database: {}", path.display());
  std::fs::remove_file(path)?;

  // WAL and shared-memory files
  for file in glob::glob(&format!("{}*", path.display()))?.flatten() {
    std::fs::remove_file(file)?;
  }
  interaction.reply(ResponseContent::Success("Database files cleaned"))
}
