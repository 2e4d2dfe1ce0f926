//! Durable TTL inventory cache
//!
//! One plain-text file per cache key under a root directory, with the file
//! mtime as the per-key last-write timestamp. The persisted row format is a
//! compatibility surface: shell tab-completion reads these files directly,
//! so rows stay comma-delimited with no quoting. Names and IPs are assumed
//! not to contain commas.
//!
//! Key namespace: `projects`, `instances_<project>`. Writes go through a
//! temp file and a rename so a concurrent reader sees either the old
//! complete value or the new one, never a partial write.

use crate::error::Result;
use fleetops_cloud::{InstanceRecord, InstanceStatus, Project, ProjectState};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;

/// A cache read: the stored rows plus whether they are still within TTL.
#[derive(Debug, Clone)]
pub struct CacheHit {
    pub rows: Vec<String>,
    pub fresh: bool,
}

/// Filesystem-backed key/value store shared across CLI invocations.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    pub fn open(root: impl AsRef<Path>, ttl: Duration) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, ttl })
    }

    /// Cache keys may embed project ids; anything path-hostile is replaced
    /// before touching the filesystem.
    fn key_path(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.root.join(sanitized)
    }

    /// Staging file for an atomic replace. The suffix is appended, never
    /// substituted: keys may contain dots, and two keys sharing a stem up
    /// to a dot must not share a staging file.
    fn staging_path(&self, key: &str) -> PathBuf {
        self.key_path(&format!("{}.tmp", key))
    }

    /// Whether an entry written at `written` is still valid at `now`.
    /// A write that appears to be in the future (clock skew) counts as fresh.
    pub fn is_fresh(written: SystemTime, now: SystemTime, ttl: Duration) -> bool {
        match now.duration_since(written) {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }

    /// Read an entry. `None` on miss; the hit carries its freshness so the
    /// caller decides whether a stale value still gets used.
    pub async fn get(&self, key: &str) -> Result<Option<CacheHit>> {
        let path = self.key_path(key);
        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let written = metadata.modified()?;
        let fresh = Self::is_fresh(written, SystemTime::now(), self.ttl);

        let content = fs::read_to_string(&path).await?;
        let rows = content
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!("cache get {} (fresh={})", key, fresh);
        Ok(Some(CacheHit { rows, fresh }))
    }

    /// Replace an entry atomically (write to a temp file, then rename).
    pub async fn put(&self, key: &str, rows: &[String]) -> Result<()> {
        let path = self.key_path(key);
        let tmp = self.staging_path(key);

        let mut content = rows.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!("cache put {} ({} rows)", key, rows.len());
        Ok(())
    }

    /// Remove an entry. Removing a key that was never written is a no-op.
    pub async fn invalidate(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("cache invalidate {}", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Drop every entry.
    pub async fn invalidate_all(&self) -> Result<()> {
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                fs::remove_file(entry.path()).await?;
            }
        }
        tracing::debug!("cache cleared");
        Ok(())
    }
}

/// Cache key for a project's instance inventory.
pub fn instances_key(project: &str) -> String {
    format!("instances_{}", project)
}

/// Cache key for the accessible-project list.
pub const PROJECTS_KEY: &str = "projects";

pub fn encode_project(p: &Project) -> String {
    format!("{},{},{}", p.id, p.name, p.lifecycle_state)
}

pub fn decode_project(row: &str) -> Option<Project> {
    let mut fields = row.splitn(3, ',');
    Some(Project {
        id: fields.next()?.to_string(),
        name: fields.next()?.to_string(),
        lifecycle_state: ProjectState::parse(fields.next()?),
    })
}

pub fn encode_instance(i: &InstanceRecord) -> String {
    format!(
        "{},{},{},{},{},{}",
        i.name,
        i.zone,
        i.status,
        i.external_ip.as_deref().unwrap_or(""),
        i.internal_ip,
        i.machine_type,
    )
}

/// Decode an instance row. Accepts the legacy 5-field form (no machine
/// type) as well as the full 6-field one.
pub fn decode_instance(row: &str) -> Option<InstanceRecord> {
    let fields: Vec<&str> = row.split(',').collect();
    if fields.len() < 5 {
        return None;
    }
    let external_ip = match fields[3] {
        "" => None,
        ip => Some(ip.to_string()),
    };
    Some(InstanceRecord {
        name: fields[0].to_string(),
        zone: fields[1].to_string(),
        status: InstanceStatus::parse(fields[2]),
        external_ip,
        internal_ip: fields[4].to_string(),
        machine_type: fields.get(5).unwrap_or(&"").to_string(),
    })
}
