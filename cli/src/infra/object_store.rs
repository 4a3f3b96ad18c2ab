//! S3 infrastructure: implements `ObjectStore` with the `aws` CLI.

use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ObjectStore};
use crate::domain::{DeployError, SiteConfig};
use crate::infra::environment::aws_scope_args;

/// Recursive deletes of a large site can take a while.
const EMPTY_BUCKET_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// `aws s3 rm`-backed object store.
pub struct AwsCliObjectStore<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> AwsCliObjectStore<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ObjectStore for AwsCliObjectStore<R> {
    async fn empty_bucket(&self, bucket: &str, config: &SiteConfig) -> Result<()> {
        let uri = format!("s3://{bucket}");
        let mut args = vec![
            "s3".to_string(),
            "rm".to_string(),
            uri,
            "--recursive".to_string(),
        ];
        args.extend(aws_scope_args(config));
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let output = self
            .runner
            .run_with_timeout("aws", &args, EMPTY_BUCKET_TIMEOUT)
            .await?;
        if !output.status.success() {
            return Err(DeployError::EmptyBucketFailed {
                bucket: bucket.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }
        Ok(())
    }
}
