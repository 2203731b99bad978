//! The `library` command: one tab of the library.

use super::*;

/// Function for the [`Commands::Library`] in the CLI.
pub async fn library<I: UserInteraction>(
  interaction: &I,
  shelf: &Shelf,
  status: ReadingStatus,
) -> Result<()> {
  let page = shelf.library(status).await?;
  if page.books.is_empty() {
    return interaction.reply(ResponseContent::Info(&format!("No books in {}", status.label())));
  }

  interaction.reply(ResponseContent::Info(&format!("{} ({})", status.label(), page.total)))?;
  interaction.reply(ResponseContent::Books(&page.books))
}
