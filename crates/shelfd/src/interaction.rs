//! Terminal output and prompts.

use dialoguer::Confirm;

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Prefix for user prompts
pub static PROMPT_PREFIX: &str = "❯ ";
/// Prefix of a list item
pub static ITEM_PREFIX: &str = "├─";
/// Prefix of the last list item
pub static LAST_ITEM_PREFIX: &str = "└─";
/// Continuation below a list item
pub static CONTINUE_PREFIX: &str = "│  ";
/// Continuation below the last list item
pub static END_PREFIX: &str = "   ";

/// Something to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// A list of books, e.g. search results or a library tab
  Books(&'a [Book]),
  /// A single status record
  Record(&'a StatusRecord),
  /// Books per status
  Counts(&'a StatusCounts),
  /// A completed action
  Success(&'a str),
  /// A failure
  Error(&'a ShelfdError),
  /// Something worth knowing
  Info(&'a str),
  /// Something that needs attention
  Warning(&'a str),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Shows `content`.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Styled terminal output with interactive confirmation.
pub struct Terminal {
  /// Answer every prompt with yes
  accept_defaults: bool,
}

impl Terminal {
  /// Creates a terminal that prompts unless `accept_defaults` is set.
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).cyan(), message))
        .default(false)
        .wait_for_newline(true)
        .interact()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Books(books) => print!("{}", format_books(books)),
      ResponseContent::Record(record) => {
        println!("{}{}", style(SUCCESS_PREFIX).green(), style(&record.metadata.title).bold());
        println!("{}{} {}", CONTINUE_PREFIX, style("Work:").dim(), record.work_key);
        println!("{}{} {}", CONTINUE_PREFIX, style("Status:").dim(), style(record.status.label()).cyan());
        println!(
          "{}{} {}",
          CONTINUE_PREFIX,
          style("Updated:").dim(),
          record.updated_at.format("%Y-%m-%d %H:%M UTC")
        );
      },
      ResponseContent::Counts(counts) => {
        for (index, status) in ReadingStatus::ALL.into_iter().enumerate() {
          let prefix = if index + 1 == ReadingStatus::ALL.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!("{} {:<14} {}", prefix, status.label(), style(counts.get(status)).yellow());
        }
      },
      ResponseContent::Success(message) => println!("{}{}", style(SUCCESS_PREFIX).green(), message),
      ResponseContent::Error(e) => eprintln!("{}{}", style(ERROR_PREFIX).red(), style(e).red()),
      ResponseContent::Info(message) => println!("{}{}", style(INFO_PREFIX).blue(), message),
      ResponseContent::Warning(message) => println!("{}{}", style(WARNING_PREFIX).yellow(), message),
    }
    Ok(())
  }
}

/// Renders books as a tree, one entry per book.
pub fn format_books(books: &[Book]) -> String {
  let mut out = String::new();
  for (index, book) in books.iter().enumerate() {
    let last = index + 1 == books.len();
    let (head, body) = if last { (LAST_ITEM_PREFIX, END_PREFIX) } else { (ITEM_PREFIX, CONTINUE_PREFIX) };

    let year = book.first_publish_year.map(|year| format!(" ({year})")).unwrap_or_default();
    out.push_str(&format!("{} {}{}\n", head, style(&book.title).bold(), year));
    if !book.authors.is_empty() {
      out.push_str(&format!("{}{}\n", body, book.authors.join(", ")));
    }
    let status = book.status.map(|status| format!(" [{}]", status.label())).unwrap_or_default();
    out.push_str(&format!("{}{}{}\n", body, style(&book.work_key).dim(), style(status).cyan()));
  }
  out
}
