//! Menu actions for folders, uploads, downloads and deletes

use std::io::Write;
use std::path::Path;

use comfy_table::{Table, presets};
use s3i_core::ObjectInfo;
use s3i_core::ops::{self, BatchReport};
use tokio::io::AsyncBufRead;

use super::shell::{Flow, Shell};

fn format_bytes(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

fn format_time(info: &ObjectInfo) -> String {
    info.last_modified
        .map(|t| t.strftime("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}

impl<R: AsyncBufRead + Unpin, W: Write> Shell<R, W> {
    pub(super) async fn create_folder(&mut self) -> Flow {
        let folder = self.ask("Enter folder name: ").await?;
        match ops::create_folder(&self.session, &folder).await {
            Ok(marker) => self.out.success(&format!("Folder '{marker}' created")),
            Err(e) => self.report("Error creating folder", &e),
        }
        Ok(())
    }

    pub(super) async fn delete_folder(&mut self) -> Flow {
        let folder = self.ask("Enter folder name: ").await?;
        match ops::delete_folder(&self.session, &folder).await {
            Ok(count) => self
                .out
                .success(&format!("Folder '{folder}' deleted ({count} objects removed)")),
            Err(e) => self.report("Error deleting folder", &e),
        }
        Ok(())
    }

    pub(super) async fn upload_file(&mut self) -> Flow {
        let path = self.ask("Enter file path: ").await?;
        let key = self.ask("Enter object key (blank for the file name): ").await?;
        let key = Some(key.as_str()).filter(|k| !k.is_empty());

        match ops::upload_file(&self.session, Path::new(&path), key).await {
            Ok(info) => {
                let size = info.size_human.as_deref().unwrap_or("0 B");
                self.out
                    .success(&format!("Uploaded '{path}' as '{}' ({size})", info.key));
            }
            Err(e) => self.report("Error uploading file", &e),
        }
        Ok(())
    }

    pub(super) async fn upload_files(&mut self) -> Flow {
        let paths = self.ask("Enter file paths (comma-separated): ").await?;

        let spinner = self.spinner("Uploading files");
        let result = ops::upload_files(&self.session, &paths).await;
        spinner.finish_and_clear();

        match result {
            Ok(report) => self.print_batch(&report, "uploaded", |target, info| {
                let size = info.size_human.as_deref().unwrap_or("0 B");
                format!("Uploaded '{target}' as '{}' ({size})", info.key)
            }),
            Err(e) => self.report("Error uploading files", &e),
        }
        Ok(())
    }

    pub(super) async fn delete_file(&mut self) -> Flow {
        let key = self.ask("Enter file key: ").await?;
        match ops::delete_file(&self.session, &key).await {
            Ok(()) => self.out.success(&format!("File '{key}' deleted")),
            Err(e) => self.report("Error deleting file", &e),
        }
        Ok(())
    }

    pub(super) async fn delete_files(&mut self) -> Flow {
        let keys = self.ask("Enter file keys (comma-separated): ").await?;
        match ops::delete_files(&self.session, &keys).await {
            Ok(count) => self.out.success(&format!("{count} files deleted")),
            Err(e) => self.report("Error deleting files", &e),
        }
        Ok(())
    }

    pub(super) async fn download_file(&mut self) -> Flow {
        let key = self.ask("Enter file key: ").await?;
        let destination = self.ask("Enter destination path: ").await?;
        match ops::download_file(&self.session, &key, Path::new(&destination)).await {
            Ok(bytes) => self.out.success(&format!(
                "Downloaded '{key}' to '{destination}' ({})",
                format_bytes(bytes)
            )),
            Err(e) => self.report("Error downloading file", &e),
        }
        Ok(())
    }

    pub(super) async fn download_files(&mut self) -> Flow {
        let pairs = self
            .ask("Enter file keys and destination paths (comma-separated, key:path): ")
            .await?;

        let spinner = self.spinner("Downloading files");
        let result = ops::download_files(&self.session, &pairs).await;
        spinner.finish_and_clear();

        match result {
            Ok(report) => self.print_batch(&report, "downloaded", |target, bytes| {
                format!("Downloaded {target} ({})", format_bytes(*bytes))
            }),
            Err(e) => self.report("Error downloading files", &e),
        }
        Ok(())
    }

    pub(super) async fn object_info(&mut self) -> Flow {
        let Some(bucket) = self.ask_bucket().await? else {
            return Ok(());
        };
        let key = self.ask("Enter object key: ").await?;

        match ops::object_info(&self.session, &bucket, &key).await {
            Ok(info) => {
                let size = match (info.size_bytes, info.size_human.as_deref()) {
                    (Some(bytes), Some(human)) => format!("{bytes} bytes ({human})"),
                    (Some(bytes), None) => format!("{bytes} bytes"),
                    _ => "-".to_string(),
                };

                let mut table = Table::new();
                table.load_preset(presets::UTF8_FULL_CONDENSED);
                table.add_row(vec!["Bucket".to_string(), bucket]);
                table.add_row(vec!["Object Key".to_string(), info.key.clone()]);
                table.add_row(vec!["Size".to_string(), size]);
                table.add_row(vec!["Last Modified".to_string(), format_time(&info)]);
                table.add_row(vec![
                    "Content Type".to_string(),
                    info.content_type.clone().unwrap_or_else(|| "-".to_string()),
                ]);
                table.add_row(vec![
                    "ETag".to_string(),
                    info.etag.clone().unwrap_or_else(|| "-".to_string()),
                ]);
                self.out.println(&table.to_string());
            }
            Err(e) => self.report("Error getting object information", &e),
        }
        Ok(())
    }

    /// One line per item, then a summary
    pub(super) fn print_batch<T>(
        &mut self,
        report: &BatchReport<T>,
        verb: &str,
        describe: impl Fn(&str, &T) -> String,
    ) {
        for item in &report.items {
            match &item.result {
                Ok(value) => self.out.success(&describe(&item.target, value)),
                Err(e) => self.report(&format!("Failed '{}'", item.target), e),
            }
        }

        let total = report.items.len();
        let done = report.success_count();
        if report.is_complete() {
            self.out.println(&format!("{done} of {total} {verb}"));
        } else {
            self.out.warning(&format!("{done} of {total} {verb}"));
        }
    }
}
