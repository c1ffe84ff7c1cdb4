//! Export of a whole database to an object store
//!
//! # Architecture
//!
//! 1. **SourceConnector / DocumentSource**: open a database connection, list
//!    collections and read them
//! 2. **ArtifactEncoder** (in `formatter`): turn documents into JSON bodies
//! 3. **ObjectStore** (in `storage`): write the bodies
//!
//! These are orchestrated by the **ExportCoordinator**, which returns an
//! **ExportReport**.
//!
//! # Example
//!
//! ```no_run
//! use mongo_s3_export::config::{Config, DATABASE_NAME};
//! use mongo_s3_export::connection::MongoConnector;
//! use mongo_s3_export::export::ExportCoordinator;
//! use mongo_s3_export::storage::S3ObjectStore;
//!
//! # async fn example() -> mongo_s3_export::Result<()> {
//! let config = Config::load(None)?;
//! let connector = MongoConnector::new(config.mongo.clone(), DATABASE_NAME);
//! let store = S3ObjectStore::from_config(&config.s3).await;
//!
//! let report = ExportCoordinator::new(&connector, &store, DATABASE_NAME)
//!     .run()
//!     .await;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

pub mod coordinator;
pub mod report;
pub mod source;

pub use coordinator::ExportCoordinator;
pub use report::{CollectionOutcome, CollectionStatus, ExportReport};
pub use source::{DocumentSource, SourceConnector};

/// Object key for a collection's artifact
pub fn artifact_key(collection: &str) -> String {
    format!("{collection}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_key() {
        assert_eq!(artifact_key("users"), "users.json");
        assert_eq!(artifact_key("feature.flags"), "feature.flags.json");
    }
}
