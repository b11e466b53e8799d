//! The interactive command loop
//!
//! A [`Shell`] owns the session, reads operator answers and prints results.
//! Each menu entry is handled by a method in one of the sibling modules;
//! those methods collect their arguments, call the matching operation in
//! `s3i_core::ops` and format what comes back.

use std::io::Write;

use s3i_core::{Error, Session, ops};
use tokio::io::AsyncBufRead;

use super::menu::{self, MenuChoice};
use super::prompt::Prompter;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, ProgressBar};

/// Operator input ended in the middle of a dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputClosed;

/// Outcome of one menu action: keep going, or input ended
pub type Flow = std::result::Result<(), InputClosed>;

/// Interactive session driver
pub struct Shell<R, W: Write> {
    pub(super) session: Session,
    pub(super) input: Prompter<R>,
    pub(super) out: Formatter<W>,
}

impl<R: AsyncBufRead + Unpin, W: Write> Shell<R, W> {
    pub fn new(session: Session, input: Prompter<R>, out: Formatter<W>) -> Self {
        Self {
            session,
            input,
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Take the session and output writer back
    pub fn into_parts(self) -> (Session, W) {
        (self.session, self.out.into_inner())
    }

    /// Ask whether to create a bucket or use an existing one, and make it active
    pub async fn choose_bucket(&mut self) -> Flow {
        let answer = self.ask("Do you want to create a new bucket? (yes/no): ").await?;

        let name = if matches!(answer.to_ascii_lowercase().as_str(), "yes" | "y") {
            let name = self.ask("Enter new bucket name: ").await?;
            match ops::create_bucket(&self.session, &name).await {
                Ok(()) => self.out.success(&format!("Bucket '{name}' created")),
                Err(e) => self.report("Error creating bucket", &e),
            }
            name
        } else {
            self.ask("Enter existing bucket name: ").await?
        };

        if name.is_empty() {
            self.out.warning(
                "No bucket selected. Use 'Create a Bucket' or 'Switch Bucket' to pick one.",
            );
        } else {
            self.session.select_bucket(name);
        }
        Ok(())
    }

    /// Show the menu and run choices until exit or end of input
    pub async fn run(&mut self) -> ExitCode {
        loop {
            self.out.println("");
            self.out.prompt(&menu::render());

            let Ok(line) = self.ask("Enter your choice: ").await else {
                break;
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                self.out.error("Invalid choice. Please try again.");
                continue;
            };

            if choice == MenuChoice::Exit {
                break;
            }

            tracing::debug!(choice = choice.number(), label = choice.label(), "menu choice");
            if self.dispatch(choice).await.is_err() {
                break;
            }
        }

        tracing::debug!("session ended");
        ExitCode::Success
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> Flow {
        match choice {
            MenuChoice::CreateFolder => self.create_folder().await,
            MenuChoice::UploadFile => self.upload_file().await,
            MenuChoice::UploadFiles => self.upload_files().await,
            MenuChoice::DeleteFile => self.delete_file().await,
            MenuChoice::DeleteFiles => self.delete_files().await,
            MenuChoice::DeleteFolder => self.delete_folder().await,
            MenuChoice::DownloadFile => self.download_file().await,
            MenuChoice::DownloadFiles => self.download_files().await,
            MenuChoice::ListBucketsAndObjects => self.list_buckets_and_objects().await,
            MenuChoice::BucketInfo => self.bucket_info().await,
            MenuChoice::ObjectInfo => self.object_info().await,
            MenuChoice::SetBucketPolicy => self.set_bucket_policy().await,
            MenuChoice::DeleteBucketPolicy => self.delete_bucket_policy().await,
            MenuChoice::SetBucketAcl => self.set_bucket_acl().await,
            MenuChoice::DeleteBucket => self.delete_bucket().await,
            MenuChoice::SetRegion => self.set_region().await,
            MenuChoice::MoveFiles => self.move_files().await,
            MenuChoice::RenameFile => self.rename_file().await,
            MenuChoice::MoveFolders => self.move_folders().await,
            MenuChoice::RenameFolders => self.rename_folders().await,
            MenuChoice::PresignedUrl => self.presigned_url().await,
            MenuChoice::GetBucketPolicy => self.get_bucket_policy().await,
            MenuChoice::CreateBucket => self.create_bucket().await,
            MenuChoice::SwitchBucket => self.switch_bucket().await,
            MenuChoice::Exit => Ok(()),
        }
    }

    /// Print `prompt` and read the trimmed answer
    pub(super) async fn ask(&mut self, prompt: &str) -> Result<String, InputClosed> {
        self.out.prompt(prompt);
        match self.input.next_line().await {
            Some(line) => Ok(line.trim().to_string()),
            None => {
                self.out.println("");
                Err(InputClosed)
            }
        }
    }

    /// Ask for a bucket name; a blank answer means the active bucket
    ///
    /// Returns `None` (after reporting) when neither is available.
    pub(super) async fn ask_bucket(&mut self) -> Result<Option<String>, InputClosed> {
        let prompt = match self.session.bucket() {
            Some(active) => format!("Enter bucket name [{active}]: "),
            None => "Enter bucket name: ".to_string(),
        };
        let answer = self.ask(&prompt).await?;
        if !answer.is_empty() {
            return Ok(Some(answer));
        }

        let active = self.session.bucket().map(str::to_string);
        if active.is_none() {
            self.out.error("No bucket name given and no bucket selected");
        }
        Ok(active)
    }

    /// Print an operation failure
    pub(super) fn report(&mut self, context: &str, err: &Error) {
        tracing::debug!(error = ?err, code = err.code(), "{context}");
        self.out.error(&format!("{context}: {err}"));
    }

    pub(super) fn spinner(&self, message: &str) -> ProgressBar {
        ProgressBar::spinner(self.out.config(), message)
    }
}
