//! The `search` command: catalog search with reading statuses merged in.

use super::*;

/// Options for [`Commands::Search`].
#[derive(Args, Clone)]
pub struct SearchArgs {
  /// Search text, e.g. a title or an author
  pub query: String,

  /// Page of results to show
  #[arg(long, default_value_t = 1)]
  pub page: u32,

  /// Results per page, defaults to the configured page size
  #[arg(long)]
  pub limit: Option<u32>,
}

/// Function for the [`Commands::Search`] in the CLI.
pub async fn search<I: UserInteraction>(interaction: &I, shelf: &Shelf, args: SearchArgs) -> Result<()> {
  let limit = args.limit.unwrap_or(shelf.config.search_limit);
  let result = shelf.search(&args.query, args.page, limit).await?;

  if result.books.is_empty() {
    interaction.reply(ResponseContent::Info(&format!("No books found for \"{}\"", args.query.trim())))?;
    return Ok(());
  }

  interaction.reply(ResponseContent::Info(&format!(
    "Found {} books, page {} of {}",
    result.total, result.page, result.total_pages
  )))?;
  interaction.reply(ResponseContent::Books(&result.books))
}
