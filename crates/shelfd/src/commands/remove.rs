use super::*;

/// Function for the [`Commands::Remove`] in the CLI.
pub async fn remove<I: UserInteraction>(interaction: &I, shelf: &Shelf, work_key: &str) -> Result<()> {
  let Some(record) = shelf.get_status(work_key).await? else {
    return Err(ShelfError::NotFound.into());
  };

  if !interaction.confirm(&format!(
    "Remove \"{}\" ({}) from your library?",
    record.metadata.title,
    record.status.label()
  ))? {
    interaction.reply(ResponseContent::Info("Operation cancelled"))?;
    return Ok(());
  }

  shelf.delete_status(work_key).await?;
  interaction.reply(ResponseContent::Success(&format!("Removed \"{}\"", record.metadata.title)))
}
