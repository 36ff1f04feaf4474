/// S3 listing adapter: a blocking [`ListingSource`] over `ListObjectsV2`.
///
/// The AWS SDK is async-only, so the adapter owns a current-thread tokio
/// runtime and blocks on exactly one request per [`ListingSource::next_page`]
/// call. Credentials and region come from the standard `aws-config` provider
/// chain; this crate never handles secrets itself.
use super::{ListingPage, ListingSource};
use crate::config::StorageRoot;
use crate::error::{Error, Result};
use crate::model::{ObjectRecord, Timestamp};
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::DateTime as SdkDateTime;
use aws_sdk_s3::types::Object;
use chrono::DateTime;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

/// Region used when neither the operator nor the environment names one.
const FALLBACK_REGION: &str = "us-east-1";

/// Where the paginator stands between calls.
#[derive(Debug)]
enum Cursor {
    Start,
    Continue(String),
    Exhausted,
}

pub struct S3Listing {
    runtime: Runtime,
    client: aws_sdk_s3::Client,
    root: StorageRoot,
    cursor: Cursor,
}

impl S3Listing {
    /// Resolve credentials/region and prepare to list `root`.
    ///
    /// `region` overrides the environment's region when given.
    pub fn connect(root: StorageRoot, region: Option<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Transport {
                root: root.to_string(),
                message: format!("failed to start I/O runtime: {e}"),
            })?;

        let sdk_config = runtime.block_on(async {
            let region_provider = RegionProviderChain::first_try(
                region.map(aws_sdk_s3::config::Region::new),
            )
            .or_default_provider()
            .or_else(FALLBACK_REGION);
            aws_config::defaults(BehaviorVersion::latest())
                .region(region_provider)
                .load()
                .await
        });
        let client = aws_sdk_s3::Client::new(&sdk_config);

        Ok(Self {
            runtime,
            client,
            root,
            cursor: Cursor::Start,
        })
    }
}

impl ListingSource for S3Listing {
    fn describe(&self) -> String {
        self.root.to_string()
    }

    fn next_page(&mut self) -> Result<Option<ListingPage>> {
        let token = match &self.cursor {
            Cursor::Exhausted => return Ok(None),
            Cursor::Start => None,
            Cursor::Continue(token) => Some(token.clone()),
        };

        let request = self
            .client
            .list_objects_v2()
            .bucket(&self.root.bucket)
            .prefix(&self.root.prefix)
            .set_continuation_token(token);

        let output = self
            .runtime
            .block_on(request.send())
            .map_err(|e| Error::Transport {
                root: self.root.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        self.cursor = match output.next_continuation_token() {
            Some(next) => Cursor::Continue(next.to_string()),
            None => Cursor::Exhausted,
        };

        let records: Vec<ObjectRecord> = output.contents().iter().filter_map(to_record).collect();
        debug!(
            listed = output.contents().len(),
            kept = records.len(),
            "received listing page"
        );
        Ok(Some(ListingPage::from_records(records)))
    }
}

/// Convert an SDK object into a record, skipping objects missing either field.
fn to_record(object: &Object) -> Option<ObjectRecord> {
    let Some(key) = object.key() else {
        warn!(
            last_modified = ?object.last_modified(),
            "listed object has no key, skipping"
        );
        return None;
    };
    let Some(modified) = object.last_modified() else {
        warn!(key, "object has no last-modified time, skipping");
        return None;
    };
    match to_timestamp(modified) {
        Some(ts) => Some(ObjectRecord::new(key, ts)),
        None => {
            warn!(key, "object last-modified time is out of range, skipping");
            None
        }
    }
}

fn to_timestamp(value: &SdkDateTime) -> Option<Timestamp> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos()).map(|dt| dt.fixed_offset())
}
