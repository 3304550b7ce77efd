//! MongoDB-backed product store.
//!
//! One collection per sanitized product type; each document keyed by
//! product id. Writes are independent merge-upserts — no transaction
//! spans multiple documents, and a product whose type changes between
//! syncs leaves its old document behind in the previous collection.

use bson::{doc, Document};
use mongodb::options::UpdateOptions;
use mongodb::{Client, Database};

use qsync_core::MappedProduct;

use crate::credentials::ServiceAccount;
use crate::runs::SyncRunRecord;
use crate::sanitize::sanitize_partition;
use crate::StoreError;

const SYNC_RUNS_COLLECTION: &str = "sync_runs";

/// Handle to the product database.
///
/// Constructed once at process start and handed to the server by
/// dependency injection; the driver establishes connections lazily and
/// the handle is cheap to clone.
#[derive(Clone)]
pub struct ProductStore {
    database: Database,
}

impl ProductStore {
    /// Builds the client and database handle from a resolved credential
    /// bundle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the connection string cannot be
    /// parsed.
    pub async fn connect(account: &ServiceAccount) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&account.uri).await?;
        Ok(Self {
            database: client.database(&account.database),
        })
    }

    /// Verifies the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the ping command fails.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// Merge-writes `product` into the collection named by its sanitized
    /// type, keyed by product id.
    ///
    /// `$set` updates the mapped fields and `updatedAt`; `createdAt` is
    /// written only on first insert, so a re-sync of the same product
    /// preserves the original creation timestamp. The target collection
    /// is created implicitly on first write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Bson`] if the record cannot be encoded, or
    /// [`StoreError::Mongo`] if the write fails.
    pub async fn upsert_product(&self, product: &MappedProduct) -> Result<(), StoreError> {
        let partition = sanitize_partition(&product.product_type);
        let fields = bson::to_document(product)?;
        let update = doc! {
            "$set": fields,
            "$currentDate": { "updatedAt": true },
            "$setOnInsert": { "createdAt": bson::DateTime::now() },
        };

        self.database
            .collection::<Document>(&partition)
            .update_one(
                doc! { "_id": &product.product_id },
                update,
                UpdateOptions::builder().upsert(true).build(),
            )
            .await?;

        tracing::debug!(
            partition = %partition,
            product_id = %product.product_id,
            "upserted product"
        );
        Ok(())
    }

    /// Fetches a previously written product document, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the query fails.
    pub async fn fetch_product(
        &self,
        product_type: &str,
        product_id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let partition = sanitize_partition(product_type);
        let found = self
            .database
            .collection::<Document>(&partition)
            .find_one(doc! { "_id": product_id }, None)
            .await?;
        Ok(found)
    }

    /// Appends a sync-run audit document to the `sync_runs` collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Bson`] if the record cannot be encoded, or
    /// [`StoreError::Mongo`] if the insert fails.
    pub async fn record_sync_run(&self, record: &SyncRunRecord) -> Result<(), StoreError> {
        let document = bson::to_document(record)?;
        self.database
            .collection::<Document>(SYNC_RUNS_COLLECTION)
            .insert_one(document, None)
            .await?;
        Ok(())
    }
}
