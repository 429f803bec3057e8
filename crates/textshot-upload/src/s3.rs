//! S3-backed object store
//!
//! Wraps the async AWS client in a current-thread runtime so callers see a
//! plain blocking `put_object`.

use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region, RequestChecksumCalculation},
    error::DisplayErrorContext,
    primitives::ByteStream,
    Client,
};
use textshot_core::error::{Result, UploadError};

use crate::{ObjectStore, UploadConfig};

/// Provider name attached to the static credentials
const CREDENTIALS_SOURCE: &str = "textshot-env";

/// Amazon S3, or any S3-compatible store when an endpoint is configured
pub struct S3Store {
    client: Client,
    bucket: String,
    runtime: tokio::runtime::Runtime,
}

impl S3Store {
    /// Builds a client from explicit settings; no network access happens here
    pub fn new(config: &UploadConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| UploadError::Transport(format!("failed to start runtime: {err}")))?;

        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_SOURCE,
        );

        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = &config.endpoint {
            validate_endpoint(endpoint)?;
            // Self-hosted stores rarely resolve bucket subdomains or
            // understand streaming checksums
            builder = builder
                .endpoint_url(endpoint.clone())
                .force_path_style(true)
                .request_checksum_calculation(RequestChecksumCalculation::WhenRequired);
        }

        let client = {
            let _guard = runtime.enter();
            Client::from_conf(builder.build())
        };

        log::debug!(
            "S3 client ready for bucket {} in {} (endpoint: {})",
            config.bucket,
            config.region,
            config.endpoint.as_deref().unwrap_or("default")
        );

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            runtime,
        })
    }
}

impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let size = body.len();
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body));

        self.runtime.block_on(request.send()).map_err(|err| {
            log::debug!("PutObject {key} failed: {}", DisplayErrorContext(&err));
            match err.raw_response().map(|response| response.status().as_u16()) {
                Some(status) => UploadError::Rejected {
                    key: key.to_string(),
                    status,
                },
                None => UploadError::Transport(DisplayErrorContext(&err).to_string()),
            }
        })?;

        log::debug!("PutObject {key}: {size} bytes accepted");
        Ok(())
    }
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    match url::Url::parse(endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(UploadError::InvalidEndpoint(endpoint.to_string()).into()),
    }
}
