//! Menu actions for buckets and the session region

use std::io::Write;

use comfy_table::{Table, presets};
use s3i_core::ops;
use tokio::io::AsyncBufRead;

use super::shell::{Flow, Shell};

impl<R: AsyncBufRead + Unpin, W: Write> Shell<R, W> {
    pub(super) async fn list_buckets_and_objects(&mut self) -> Flow {
        let spinner = self.spinner("Listing buckets");
        let result = ops::list_buckets_and_objects(&self.session).await;
        spinner.finish_and_clear();

        let listings = match result {
            Ok(listings) => listings,
            Err(e) => {
                self.report("Error listing buckets", &e);
                return Ok(());
            }
        };

        self.out.heading("Buckets:");
        let active = self.session.bucket().map(str::to_string);
        for listing in listings {
            if active.as_deref() == Some(listing.name.as_str()) {
                self.out.println(&format!("* {} (active)", listing.name));
            } else {
                self.out.println(&format!("* {}", listing.name));
            }

            match listing.objects {
                Ok(objects) if objects.is_empty() => self.out.println("  (empty)"),
                Ok(objects) => {
                    self.out.println("  Objects:");
                    for object in objects {
                        let size = object.size_human.as_deref().unwrap_or("0 B");
                        self.out.println(&format!("    - {} ({size})", object.key));
                    }
                }
                Err(e) => {
                    self.report(&format!("  Error listing objects in '{}'", listing.name), &e)
                }
            }
        }
        Ok(())
    }

    pub(super) async fn bucket_info(&mut self) -> Flow {
        let Some(bucket) = self.ask_bucket().await? else {
            return Ok(());
        };

        match ops::bucket_info(&self.session, &bucket).await {
            Ok(info) => {
                let mut table = Table::new();
                table.load_preset(presets::UTF8_FULL_CONDENSED);
                table.add_row(vec!["Bucket", info.name.as_str()]);
                table.add_row(vec!["Location", info.location.as_str()]);
                self.out.println(&table.to_string());
            }
            Err(e) => self.report("Error getting bucket information", &e),
        }
        Ok(())
    }

    pub(super) async fn create_bucket(&mut self) -> Flow {
        let name = self.ask("Enter new bucket name: ").await?;
        match ops::create_bucket(&self.session, &name).await {
            Ok(()) => {
                self.out.success(&format!("Bucket '{name}' created"));
                self.session.select_bucket(name);
            }
            Err(e) => self.report("Error creating bucket", &e),
        }
        Ok(())
    }

    pub(super) async fn delete_bucket(&mut self) -> Flow {
        let name = self.ask("Enter bucket name: ").await?;
        if name.is_empty() {
            self.out.error("Bucket name cannot be empty");
            return Ok(());
        }

        match ops::delete_bucket(&mut self.session, &name).await {
            Ok(()) => {
                self.out.success(&format!("Bucket '{name}' deleted"));
                if self.session.bucket().is_none() {
                    self.out.warning("The active bucket was deleted; switch to another bucket.");
                }
            }
            Err(e) => self.report("Error deleting bucket", &e),
        }
        Ok(())
    }

    pub(super) async fn switch_bucket(&mut self) -> Flow {
        let name = self.ask("Enter existing bucket name: ").await?;
        if name.is_empty() {
            self.out.error("Bucket name cannot be empty");
            return Ok(());
        }
        self.out.success(&format!("Active bucket is now '{name}'"));
        self.session.select_bucket(name);
        Ok(())
    }

    pub(super) async fn set_region(&mut self) -> Flow {
        let region = self.ask("Enter new AWS Region (e.g., eu-west-2): ").await?;
        match self.session.set_region(&region).await {
            Ok(()) => self
                .out
                .success(&format!("Region set successfully to: {}", self.session.region())),
            Err(e) => self.report("Error setting region", &e),
        }
        Ok(())
    }
}
