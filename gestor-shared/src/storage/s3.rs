/// S3-compatible blob store backend
///
/// Stores attachment bytes in a single bucket on any S3-compatible service
/// (AWS S3, MinIO, Azurite-style gateways). The bucket is created on startup
/// if it does not exist. Returned URLs are `{public_base_url}/{name}`, where
/// the base URL already points at the bucket.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::BlobStore;

/// Configuration for the S3 blob store backend
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Custom endpoint URL (e.g., a local MinIO); None uses the AWS default
    pub endpoint: Option<String>,

    /// Region name; None falls back to the environment's default chain
    pub region: Option<String>,

    /// Bucket holding the attachment blobs
    pub bucket: String,

    /// Static access key; None uses the default credentials chain
    pub access_key: Option<String>,

    /// Static secret key, paired with `access_key`
    pub secret_key: Option<String>,

    /// Public URL prefix under which blobs are served, including the bucket
    /// (e.g., "http://localhost:9000/anexos"); None derives it from the
    /// endpoint and bucket
    pub public_base_url: Option<String>,

    /// Use path-style addressing (required by MinIO and most emulators)
    pub use_path_style: bool,
}

/// Blob store backed by an S3-compatible service
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3BlobStore {
    /// Builds the client, ensures the bucket exists, and returns the store
    pub async fn new(cfg: &S3Config) -> anyhow::Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &cfg.region {
            loader = loader.region(Region::new(region.clone()));
        }

        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);

        if let (Some(access), Some(secret)) = (&cfg.access_key, &cfg.secret_key) {
            let creds = Credentials::new(
                access.clone(),
                secret.clone(),
                None,
                None,
                "gestor-s3-static",
            );
            builder = builder.credentials_provider(creds);
        }

        if let Some(endpoint) = &cfg.endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }

        if cfg.use_path_style {
            builder = builder.force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        ensure_bucket(&client, &cfg.bucket).await?;

        let public_base_url = match &cfg.public_base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => {
                let endpoint = cfg
                    .endpoint
                    .as_deref()
                    .context("either public_base_url or endpoint must be configured")?;
                format!("{}/{}", endpoint.trim_end_matches('/'), cfg.bucket)
            }
        };

        Ok(Self {
            client,
            bucket: cfg.bucket.clone(),
            public_base_url,
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> anyhow::Result<String> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .body(ByteStream::from(bytes));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .with_context(|| format!("failed to upload object {name}"))?;

        Ok(format!("{}/{}", self.public_base_url, name))
    }

    async fn delete(&self, name: &str) -> anyhow::Result<()> {
        // S3 deletes are idempotent; a missing key is not an error
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(name)
            .send()
            .await
            .with_context(|| format!("failed to delete object {name}"))?;

        Ok(())
    }
}

async fn ensure_bucket(client: &Client, bucket: &str) -> anyhow::Result<()> {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => return Ok(()),
        Err(SdkError::ServiceError(service_err)) => {
            if !matches!(service_err.err(), HeadBucketError::NotFound(_)) {
                return Err(anyhow!(service_err.err().to_string()));
            }
        }
        Err(err) => return Err(anyhow!(err.to_string())),
    }

    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => Ok(()),
        Err(SdkError::ServiceError(service_err)) => match service_err.err() {
            CreateBucketError::BucketAlreadyOwnedByYou(_) => Ok(()),
            CreateBucketError::BucketAlreadyExists(_) => Ok(()),
            other => Err(anyhow!(other.to_string())),
        },
        Err(err) => Err(anyhow!(err.to_string())),
    }
}
