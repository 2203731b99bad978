use super::*;

/// Function for the [`Commands::Counts`] in the CLI.
pub async fn counts<I: UserInteraction>(interaction: &I, shelf: &Shelf) -> Result<()> {
  let counts = shelf.status_counts().await?;
  interaction.reply(ResponseContent::Counts(&counts))
}
