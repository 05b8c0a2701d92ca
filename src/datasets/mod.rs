//! Reference datasets.
//!
//! Four external lists back the checker: the IANA root zone database, the
//! public suffix list, the IPv4 reputation list and the user-agent list.
//! Each one is a file inside the workspace plus a parsed in-memory cache.
//!
//! Caches are populated lazily on first read. A refresh downloads the file
//! again (atomically) and invalidates the cache so the next read repopulates
//! it from the new file. Readers hold an `Arc` to the generation they loaded,
//! so a concurrent refresh never shows them a half-built cache.

mod download;
mod parse;

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use strum_macros::{Display, EnumIter};
use tokio::runtime::Handle;

use crate::config::Sources;
use crate::error_handling::DatasetError;

pub(crate) use download::{fetch_bytes, write_atomically};
pub use parse::{
    parse_iana, parse_ipv4_reputation, parse_public_suffix, parse_user_agents, IanaDb,
    PublicSuffixDb, ReputationDb, UserAgentDb,
};

/// The reference datasets, in refresh order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum DatasetKind {
    #[strum(serialize = "reputation")]
    Ipv4Reputation,
    #[strum(serialize = "user-agent")]
    UserAgents,
    #[strum(serialize = "PSL")]
    PublicSuffix,
    #[strum(serialize = "IANA")]
    Iana,
}

impl DatasetKind {
    /// File name of the dataset inside the workspace.
    pub fn file_name(self) -> &'static str {
        match self {
            DatasetKind::Ipv4Reputation => "ipv4_reputation.data",
            DatasetKind::UserAgents => "user_agents.json",
            DatasetKind::PublicSuffix => "public-suffix.json",
            DatasetKind::Iana => "iana-domains-db.json",
        }
    }

    /// Checks that a payload parses as this dataset.
    fn validate(self, bytes: &[u8]) -> Result<(), String> {
        match self {
            DatasetKind::Ipv4Reputation => parse_ipv4_reputation(bytes).map(|_| ()),
            DatasetKind::UserAgents => parse_user_agents(bytes).map(|_| ()),
            DatasetKind::PublicSuffix => parse_public_suffix(bytes).map(|_| ()),
            DatasetKind::Iana => parse_iana(bytes).map(|_| ()),
        }
    }
}

/// One cache generation slot.
#[derive(Debug)]
struct CacheSlot<T> {
    inner: RwLock<Option<Arc<T>>>,
}

impl<T> CacheSlot<T> {
    fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    fn get(&self) -> Option<Arc<T>> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set(&self, value: Arc<T>) {
        match self.inner.write() {
            Ok(mut guard) => *guard = Some(value),
            Err(poisoned) => *poisoned.into_inner() = Some(value),
        }
    }

    fn invalidate(&self) {
        match self.inner.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

/// Owner of the four reference datasets of one workspace.
#[derive(Debug)]
pub struct DatasetStore {
    dir: PathBuf,
    sources: Sources,
    client: reqwest::Client,
    runtime: Option<Handle>,
    iana: CacheSlot<IanaDb>,
    public_suffix: CacheSlot<PublicSuffixDb>,
    ipv4_reputation: CacheSlot<ReputationDb>,
    user_agents: CacheSlot<UserAgentDb>,
}

impl DatasetStore {
    /// Creates a store rooted at `dir` (the workspace).
    ///
    /// Captures the current tokio runtime, if any, to drive lazy downloads
    /// from blocking checker threads.
    pub fn new(dir: impl Into<PathBuf>, sources: Sources, client: reqwest::Client) -> Self {
        Self {
            dir: dir.into(),
            sources,
            client,
            runtime: Handle::try_current().ok(),
            iana: CacheSlot::new(),
            public_suffix: CacheSlot::new(),
            ipv4_reputation: CacheSlot::new(),
            user_agents: CacheSlot::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: DatasetKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    pub fn url(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::Ipv4Reputation => &self.sources.ipv4_reputation,
            DatasetKind::UserAgents => &self.sources.user_agents,
            DatasetKind::PublicSuffix => &self.sources.public_suffix,
            DatasetKind::Iana => &self.sources.iana,
        }
    }

    /// Downloads a dataset and atomically replaces its file.
    ///
    /// The payload is validated before it replaces the current file, so a
    /// broken response leaves the previous file in place. Returns the number
    /// of bytes written.
    pub async fn download(&self, kind: DatasetKind) -> Result<usize, DatasetError> {
        let url = self.url(kind);
        let target = self.path(kind);

        let bytes = fetch_bytes(&self.client, url).await?;
        kind.validate(&bytes).map_err(|reason| DatasetError::Parse {
            path: target.clone(),
            reason,
        })?;
        write_atomically(&target, &bytes)?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(bytes.len())
    }

    /// Drops the in-memory cache of a dataset.
    pub fn invalidate(&self, kind: DatasetKind) {
        match kind {
            DatasetKind::Ipv4Reputation => self.ipv4_reputation.invalidate(),
            DatasetKind::UserAgents => self.user_agents.invalidate(),
            DatasetKind::PublicSuffix => self.public_suffix.invalidate(),
            DatasetKind::Iana => self.iana.invalidate(),
        }
    }

    /// Whether the in-memory cache of a dataset is populated.
    pub fn is_cached(&self, kind: DatasetKind) -> bool {
        match kind {
            DatasetKind::Ipv4Reputation => self.ipv4_reputation.get().is_some(),
            DatasetKind::UserAgents => self.user_agents.get().is_some(),
            DatasetKind::PublicSuffix => self.public_suffix.get().is_some(),
            DatasetKind::Iana => self.iana.get().is_some(),
        }
    }

    /// Re-downloads a dataset, then invalidates its cache.
    pub async fn refresh(&self, kind: DatasetKind) -> Result<usize, DatasetError> {
        let written = self.download(kind).await?;
        self.invalidate(kind);
        Ok(written)
    }

    // The accessors below may download a missing file. They block, so they
    // must be called from a blocking thread (e.g. `spawn_blocking`), never
    // from an async task.

    pub fn iana(&self) -> Result<Arc<IanaDb>, DatasetError> {
        self.load(DatasetKind::Iana, &self.iana, parse_iana)
    }

    pub fn public_suffix(&self) -> Result<Arc<PublicSuffixDb>, DatasetError> {
        self.load(DatasetKind::PublicSuffix, &self.public_suffix, parse_public_suffix)
    }

    pub fn ipv4_reputation(&self) -> Result<Arc<ReputationDb>, DatasetError> {
        self.load(
            DatasetKind::Ipv4Reputation,
            &self.ipv4_reputation,
            parse_ipv4_reputation,
        )
    }

    pub fn user_agents(&self) -> Result<Arc<UserAgentDb>, DatasetError> {
        self.load(DatasetKind::UserAgents, &self.user_agents, parse_user_agents)
    }

    fn load<T>(
        &self,
        kind: DatasetKind,
        slot: &CacheSlot<T>,
        parse: fn(&[u8]) -> Result<T, String>,
    ) -> Result<Arc<T>, DatasetError> {
        if let Some(cached) = slot.get() {
            return Ok(cached);
        }

        let path = self.path(kind);
        if !path.exists() {
            log::info!("Fetching {} dataset on demand", kind);
            let runtime = self
                .runtime
                .clone()
                .or_else(|| Handle::try_current().ok())
                .ok_or_else(|| DatasetError::NoRuntime(kind.to_string()))?;
            runtime.block_on(self.download(kind))?;
        }

        let bytes = std::fs::read(&path).map_err(|source| DatasetError::Io {
            path: path.clone(),
            source,
        })?;
        let parsed = Arc::new(parse(&bytes).map_err(|reason| DatasetError::Parse {
            path: path.clone(),
            reason,
        })?);
        slot.set(Arc::clone(&parsed));

        Ok(parsed)
    }
}
