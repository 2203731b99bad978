//! The `set` command: creates or updates a reading status.

use super::*;

/// Options for [`Commands::Set`].
#[derive(Args, Clone)]
pub struct SetArgs {
  /// OpenLibrary work key, e.g. "/works/OL27448W"
  pub work_key: String,

  /// New status (to-read, did-not-finish, completed)
  #[arg(value_parser = parse_status)]
  pub status: ReadingStatus,

  /// Book title
  #[arg(long)]
  pub title: String,

  /// Author name, repeat for several authors
  #[arg(long = "author")]
  pub authors: Vec<String>,

  /// Cover image URL
  #[arg(long)]
  pub cover_url: Option<String>,

  /// Year of first publication
  #[arg(long)]
  pub year: Option<i32>,
}

/// Function for the [`Commands::Set`] in the CLI.
pub async fn set<I: UserInteraction>(interaction: &I, shelf: &Shelf, args: SetArgs) -> Result<()> {
  let metadata = BookMetadata {
    title:              args.title,
    authors:            args.authors,
    cover_url:          args.cover_url,
    first_publish_year: args.year,
  };

  let previous = shelf.get_status(&args.work_key).await?.map(|record| record.status);
  let record = shelf.set_status(&args.work_key, args.status, &metadata).await?;
  debug!("Set {} from {previous:?} to {}", record.work_key, record.status);

  if let Some(previous) = previous.filter(|previous| *previous != record.status) {
    interaction.reply(ResponseContent::Info(&format!(
      "Moved from {} to {}",
      previous.label(),
      record.status.label()
    )))?;
  }
  interaction.reply(ResponseContent::Record(&record))
}
