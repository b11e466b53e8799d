//! Menu actions for moving and renaming files and folders

use std::io::Write;

use s3i_core::ops::{self, FolderMove, MoveOutcome};
use tokio::io::AsyncBufRead;

use super::shell::{Flow, Shell};

impl<R: AsyncBufRead + Unpin, W: Write> Shell<R, W> {
    pub(super) async fn move_files(&mut self) -> Flow {
        let source = self.ask("Enter source folder: ").await?;
        let destination = self.ask("Enter destination folder: ").await?;
        let keys = self.ask("Enter file keys to move (comma-separated): ").await?;

        let spinner = self.spinner("Moving files");
        let result = ops::move_files(&self.session, &source, &destination, &keys).await;
        spinner.finish_and_clear();

        match result {
            Ok(outcomes) => {
                for outcome in &outcomes {
                    self.print_outcome(outcome, "moved");
                }
            }
            Err(e) => self.report("Error moving files", &e),
        }
        Ok(())
    }

    pub(super) async fn rename_file(&mut self) -> Flow {
        let original = self.ask("Enter original file key: ").await?;
        let new_key = self.ask("Enter new file key: ").await?;

        match ops::rename_file(&self.session, &original, &new_key).await {
            Ok(outcome) => self.print_outcome(&outcome, "renamed"),
            Err(e) => self.report("Error renaming file", &e),
        }
        Ok(())
    }

    pub(super) async fn move_folders(&mut self) -> Flow {
        let sources = self.ask("Enter source folders (comma-separated): ").await?;
        let destinations = self
            .ask("Enter destination folders (comma-separated): ")
            .await?;

        let spinner = self.spinner("Moving folders");
        let result = ops::move_folders(&self.session, &sources, &destinations).await;
        spinner.finish_and_clear();

        match result {
            Ok(moves) => self.print_folder_moves(&moves, "moved"),
            Err(e) => self.report("Error moving folders", &e),
        }
        Ok(())
    }

    pub(super) async fn rename_folders(&mut self) -> Flow {
        let originals = self
            .ask("Enter original folder names (comma-separated): ")
            .await?;
        let new_names = self.ask("Enter new folder names (comma-separated): ").await?;

        let spinner = self.spinner("Renaming folders");
        let result = ops::rename_folders(&self.session, &originals, &new_names).await;
        spinner.finish_and_clear();

        match result {
            Ok(moves) => self.print_folder_moves(&moves, "renamed"),
            Err(e) => self.report("Error renaming folders", &e),
        }
        Ok(())
    }

    fn print_outcome(&mut self, outcome: &MoveOutcome, verb: &str) {
        match outcome {
            MoveOutcome::Moved { from, to } => {
                self.out.success(&format!("'{from}' {verb} to '{to}'"));
            }
            MoveOutcome::CopyFailed { from, to, error } => {
                self.report(&format!("Error copying '{from}' to '{to}'"), error);
            }
            MoveOutcome::DeleteFailed { from, to, error } => {
                self.report(
                    &format!("Copied '{from}' to '{to}' but could not delete the original"),
                    error,
                );
                self.out.warning(&format!(
                    "Both '{from}' and '{to}' now exist; delete '{from}' to finish."
                ));
            }
        }
    }

    fn print_folder_moves(&mut self, moves: &[FolderMove], verb: &str) {
        for folder in moves {
            match &folder.result {
                Ok(outcomes) => {
                    for outcome in outcomes.iter().filter(|o| !o.is_complete()) {
                        self.print_outcome(outcome, verb);
                    }
                    let done = outcomes.iter().filter(|o| o.is_complete()).count();
                    let message = format!(
                        "Folder '{}' {verb} to '{}' ({done} of {} objects)",
                        folder.source,
                        folder.destination,
                        outcomes.len()
                    );
                    if folder.is_complete() {
                        self.out.success(&message);
                    } else {
                        self.out.warning(&message);
                    }
                }
                Err(e) => self.report(&format!("Error listing folder '{}'", folder.source), e),
            }
        }
    }
}
