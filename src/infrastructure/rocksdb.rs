use crate::domain::ports::TontineStore;
use crate::domain::tontine::Tontine;
use crate::error::{Result, TontineError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing tontine snapshots.
pub const CF_TONTINES: &str = "tontines";
/// Key of the snapshot inside the column family.
pub const STATE_KEY: &[u8] = b"state";

/// A persistent store implementation using RocksDB.
///
/// Holds one tontine snapshot, serialized as JSON, in its own column family.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_tontines = ColumnFamilyDescriptor::new(CF_TONTINES, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_tontines])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_TONTINES).ok_or_else(|| {
            TontineError::InternalError(Box::new(std::io::Error::other(
                "Tontines column family not found",
            )))
        })
    }
}

#[async_trait]
impl TontineStore for RocksDBStore {
    async fn save(&self, tontine: &Tontine) -> Result<()> {
        let cf = self.cf()?;
        let value = serde_json::to_vec(tontine)?;
        self.db.put_cf(cf, STATE_KEY, value)?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<Tontine>> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, STATE_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn remove(&self) -> Result<()> {
        let cf = self.cf()?;
        self.db.delete_cf(cf, STATE_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::TontineConfig;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");
        assert!(store.db.cf_handle(CF_TONTINES).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_tontine_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();
        assert!(store.load().await.unwrap().is_none());

        let mut tontine = Tontine::new(TontineConfig::new(1000, 60, 2, false).unwrap()).unwrap();
        tontine.contribute("alice".into(), 1000, 5).unwrap();
        store.save(&tontine).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(tontine));

        store.remove().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_survives_reopen() {
        let dir = tempdir().unwrap();
        let tontine = Tontine::new(TontineConfig::new(1000, 60, 2, true).unwrap()).unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.save(&tontine).await.unwrap();
        }
        let store = RocksDBStore::open(dir.path()).unwrap();
        assert_eq!(store.load().await.unwrap(), Some(tontine));
    }
}
