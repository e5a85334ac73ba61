use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use rocksdb::Direction;
use rocksdb::IteratorMode;
use rocksdb::Options;
use rocksdb::WriteBatch;
use rocksdb::DB;
use std::sync::Arc;

use crate::types::Authority;
use crate::types::RootRecord;

const RECORD_PREFIX: u8 = b'r';
const SEQ_LEN: usize = 8;
const RECORD_KEY_LEN: usize = 1 + SEQ_LEN;
const EXPIRY_WINDOW_KEY: &[u8] = b"m:expiry_window";
const AUTHORITY_KEY: &[u8] = b"m:authority";

/// Everything a replica needs to resume after a restart.
#[derive(Debug, Clone, Default)]
pub struct StoredReplica {
    pub records: Vec<RootRecord>,
    pub expiry_window: Option<u64>,
    pub authority: Option<Authority>,
}

/// RocksDB-backed audit trail of one replica's root history.
///
/// Records are keyed `'r' || seq_be`, so iteration yields acceptance order.
pub struct RootHistoryStore {
    db: Arc<DB>,
}

impl RootHistoryStore {
    pub fn open(path: &str) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn record_key(seq: u64) -> [u8; RECORD_KEY_LEN] {
        let mut buf = [0u8; RECORD_KEY_LEN];
        buf[0] = RECORD_PREFIX;
        buf[1..].copy_from_slice(&seq.to_be_bytes());
        buf
    }

    fn decode_seq(raw: &[u8]) -> Option<u64> {
        if raw.len() != RECORD_KEY_LEN || raw[0] != RECORD_PREFIX {
            return None;
        }
        let mut seq = [0u8; SEQ_LEN];
        seq.copy_from_slice(&raw[1..]);
        Some(u64::from_be_bytes(seq))
    }

    /// Write a newly accepted record together with the head it supersedes.
    ///
    /// Both land in one batch, so a crash never leaves two heads on disk.
    pub fn persist_accept(
        &self,
        superseded: Option<(u64, &RootRecord)>,
        seq: u64,
        record: &RootRecord,
    ) -> Result<()> {
        let mut batch = WriteBatch::default();
        if let Some((prev_seq, prev)) = superseded {
            batch.put(Self::record_key(prev_seq), serde_json::to_vec(prev)?);
        }
        batch.put(Self::record_key(seq), serde_json::to_vec(record)?);
        self.db.write(batch)?;
        Ok(())
    }

    pub fn put_expiry_window(&self, window: u64) -> Result<()> {
        self.db.put(EXPIRY_WINDOW_KEY, window.to_be_bytes())?;
        Ok(())
    }

    pub fn put_authority(&self, authority: &Authority) -> Result<()> {
        self.db.put(AUTHORITY_KEY, serde_json::to_vec(authority)?)?;
        Ok(())
    }

    /// All records in acceptance order.
    pub fn load_records(&self) -> Result<Vec<RootRecord>> {
        let start = Self::record_key(0);
        let iter = self
            .db
            .iterator(IteratorMode::From(&start, Direction::Forward));

        let mut out = Vec::new();
        for item in iter {
            let (raw_key, value) = item?;
            let Some(seq) = Self::decode_seq(&raw_key) else {
                // Past the record range.
                break;
            };
            if seq != out.len() as u64 {
                bail!("gap in stored records: expected seq {}, found {}", out.len(), seq);
            }
            let record: RootRecord = serde_json::from_slice(&value)
                .with_context(|| format!("decoding record {}", seq))?;
            out.push(record);
        }
        Ok(out)
    }

    pub fn get_expiry_window(&self) -> Result<Option<u64>> {
        match self.db.get(EXPIRY_WINDOW_KEY)? {
            None => Ok(None),
            Some(raw) => {
                let bytes: [u8; 8] = raw
                    .as_slice()
                    .try_into()
                    .context("expiry window must be 8 bytes")?;
                Ok(Some(u64::from_be_bytes(bytes)))
            }
        }
    }

    pub fn get_authority(&self) -> Result<Option<Authority>> {
        match self.db.get(AUTHORITY_KEY)? {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
        }
    }

    pub fn load(&self) -> Result<StoredReplica> {
        Ok(StoredReplica {
            records: self.load_records()?,
            expiry_window: self.get_expiry_window()?,
            authority: self.get_authority()?,
        })
    }
}
