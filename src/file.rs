//! Zone files on disk
//!
//! [`ZoneFileProvider`] reads and writes BIND master files in a single
//! directory, one file per zone, named for the zone itself. Reads go
//! through hickory's zone file parser and are cached per zone name;
//! writes regenerate the whole file from the desired record sets.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

use camino::Utf8PathBuf;
use hickory_proto::rr::RecordType;
use hickory_proto::serialize::txt::Parser;
use serde::{Deserialize, Serialize};

use crate::change::Change;
use crate::error::ZoneError;
use crate::provider::{ZoneList, ZoneSource, ZoneTarget};
use crate::rr::{LowerName, Name, RecordSet, Rr, SerialNumber, ascii_name};

mod writer;

/// Settings for a zone file directory.
///
/// Every field except `directory` has a default matching common BIND
/// deployments, so configuration files only need to name the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Directory holding the zone files.
    pub directory: Utf8PathBuf,

    /// Suffix appended to the zone name to form the filename.
    ///
    /// The zone name keeps its trailing dot in the stem, so the default
    /// of `.` yields filenames like `example.com.`. Platforms that
    /// reject trailing dots can use an extension like `.zone` instead.
    #[serde(default = "default_extension")]
    pub file_extension: String,

    /// Require parsed zones to carry an SOA and NS at the origin.
    #[serde(default = "default_check_origin")]
    pub check_origin: bool,

    /// Hostmaster contact written into synthesized SOA records.
    ///
    /// Either a bare username, which is qualified with the zone name,
    /// or a full `user@domain` address.
    #[serde(default = "default_hostmaster")]
    pub hostmaster_email: String,

    /// TTL of the synthesized SOA record.
    #[serde(default = "default_ttl")]
    pub default_ttl: u32,

    /// SOA refresh interval in seconds.
    #[serde(default = "default_refresh")]
    pub refresh: u32,

    /// SOA retry interval in seconds.
    #[serde(default = "default_retry")]
    pub retry: u32,

    /// SOA expire interval in seconds.
    #[serde(default = "default_expire")]
    pub expire: u32,

    /// Negative-caching TTL written into the SOA minimum field.
    #[serde(default = "default_nxdomain")]
    pub nxdomain: u32,
}

fn default_extension() -> String {
    ".".to_owned()
}

fn default_check_origin() -> bool {
    true
}

fn default_hostmaster() -> String {
    "webmaster".to_owned()
}

fn default_ttl() -> u32 {
    3600
}

fn default_refresh() -> u32 {
    3600
}

fn default_retry() -> u32 {
    600
}

fn default_expire() -> u32 {
    604_800
}

fn default_nxdomain() -> u32 {
    3600
}

impl FileConfig {
    /// Configuration for `directory` with every other knob at its
    /// default.
    pub fn new(directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            file_extension: default_extension(),
            check_origin: default_check_origin(),
            hostmaster_email: default_hostmaster(),
            default_ttl: default_ttl(),
            refresh: default_refresh(),
            retry: default_retry(),
            expire: default_expire(),
            nxdomain: default_nxdomain(),
        }
    }
}

/// Zone files in a directory, one file per zone.
#[derive(Debug)]
pub struct ZoneFileProvider {
    config: FileConfig,
    cache: Mutex<HashMap<LowerName, Vec<Rr>>>,
}

impl ZoneFileProvider {
    pub fn new(config: FileConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    /// Path of the file backing `zone`.
    ///
    /// `/` maps to `-` so RFC 2317 style zone names produce valid
    /// filenames.
    fn zone_path(&self, zone: &Name) -> Utf8PathBuf {
        let ascii = ascii_name(zone);
        let stem = ascii.strip_suffix('.').unwrap_or(&ascii);
        self.config.directory.join(format!(
            "{}{}",
            stem.replace('/', "-"),
            self.config.file_extension
        ))
    }

    /// Drop the cached records for `zone`, forcing the next read to hit
    /// the filesystem.
    pub fn invalidate(&self, zone: &Name) {
        self.cache
            .lock()
            .expect("cache poisoned")
            .remove(&LowerName::from(zone));
    }

    /// Drop every cached zone.
    pub fn clear_cache(&self) {
        self.cache.lock().expect("cache poisoned").clear();
    }

    fn load(&self, zone: &Name) -> Result<Vec<Rr>, ZoneError> {
        let path = self.zone_path(zone);
        let contents = match std::fs::read_to_string(path.as_std_path()) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(ZoneError::NotFound(path));
            }
            Err(error) => return Err(error.into()),
        };

        let (_, parsed) = Parser::new(
            contents,
            Some(path.clone().into_std_path_buf()),
            Some(zone.clone()),
        )
        .parse()
        .map_err(|error| ZoneError::load(zone, error))?;

        if self.config.check_origin {
            for rtype in [RecordType::SOA, RecordType::NS] {
                if !parsed
                    .values()
                    .any(|set| set.record_type() == rtype && set.name() == zone)
                {
                    return Err(ZoneError::load(
                        zone,
                        format!("zone has no {rtype} record at its origin"),
                    ));
                }
            }
        }

        let records: Vec<Rr> = parsed
            .values()
            .flat_map(|set| set.records_without_rrsigs())
            .filter_map(Rr::from_wire)
            .collect();

        tracing::debug!(%zone, path = %path, records = records.len(), "loaded zone file");
        Ok(records)
    }
}

#[async_trait::async_trait]
impl ZoneSource for ZoneFileProvider {
    async fn zone_records(&self, zone: &Name, target: bool) -> Result<Vec<Rr>, ZoneError> {
        let key = LowerName::from(zone);
        {
            let cache = self.cache.lock().expect("cache poisoned");
            if let Some(records) = cache.get(&key) {
                return Ok(records.clone());
            }
        }

        // In target mode the file is about to be regenerated, so its
        // current contents are treated as absent.
        let records = if target { Vec::new() } else { self.load(zone)? };
        tracing::debug!(%zone, target, records = records.len(), "zone records read");

        let mut cache = self.cache.lock().expect("cache poisoned");
        Ok(cache.entry(key).or_insert(records).clone())
    }

    async fn zone_exists(&self, zone: &Name, target: bool) -> Result<bool, ZoneError> {
        if target {
            return Ok(false);
        }
        Ok(self.zone_path(zone).as_std_path().try_exists()?)
    }
}

#[async_trait::async_trait]
impl ZoneList for ZoneFileProvider {
    async fn list_zones(&self) -> Result<Vec<Name>, ZoneError> {
        let mut filenames = Vec::new();
        for entry in std::fs::read_dir(self.config.directory.as_std_path())? {
            if let Ok(filename) = entry?.file_name().into_string() {
                filenames.push(filename);
            }
        }
        filenames.sort();

        let mut zones = Vec::new();
        for filename in filenames {
            let Some(stem) = filename.strip_suffix(&self.config.file_extension) else {
                continue;
            };
            match Name::from_utf8(format!("{stem}.")) {
                Ok(zone) => zones.push(zone),
                Err(error) => {
                    tracing::warn!(
                        filename = %filename,
                        error = %error,
                        "skipping file that is not named for a zone"
                    );
                }
            }
        }
        Ok(zones)
    }
}

#[async_trait::async_trait]
impl ZoneTarget for ZoneFileProvider {
    async fn apply(&self, zone: &Name, changes: &[Change]) -> Result<(), ZoneError> {
        std::fs::create_dir_all(self.config.directory.as_std_path())?;

        let desired: Vec<&RecordSet> = changes.iter().filter_map(Change::desired).collect();
        let text = writer::render(zone, SerialNumber::now(), &self.config, &desired);

        let path = self.zone_path(zone);
        std::fs::write(path.as_std_path(), text)?;

        tracing::debug!(%zone, path = %path, changes = changes.len(), "wrote zone file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_paths_follow_the_extension_convention() {
        let provider = ZoneFileProvider::new(FileConfig::new("/var/zones"));
        let zone = Name::from_utf8("unit.tests.").unwrap();
        assert_eq!(provider.zone_path(&zone), "/var/zones/unit.tests.");

        let mut config = FileConfig::new("/var/zones");
        config.file_extension = ".zone".to_owned();
        let provider = ZoneFileProvider::new(config);
        assert_eq!(provider.zone_path(&zone), "/var/zones/unit.tests.zone");
    }

    #[test]
    fn delegation_slashes_become_dashes() {
        let provider = ZoneFileProvider::new(FileConfig::new("/var/zones"));
        let mut zone = Name::from_labels([
            "0/25".as_bytes(),
            b"2",
            b"0",
            b"192",
            b"in-addr",
            b"arpa",
        ])
        .unwrap();
        zone.set_fqdn(true);
        assert_eq!(
            provider.zone_path(&zone),
            "/var/zones/0-25.2.0.192.in-addr.arpa."
        );
    }

    #[test]
    fn config_defaults_mirror_common_deployments() {
        let config: FileConfig =
            serde_json::from_str(r#"{"directory": "/var/zones"}"#).unwrap();
        assert_eq!(config.file_extension, ".");
        assert!(config.check_origin);
        assert_eq!(config.hostmaster_email, "webmaster");
        assert_eq!(config.default_ttl, 3600);
        assert_eq!(config.refresh, 3600);
        assert_eq!(config.retry, 600);
        assert_eq!(config.expire, 604_800);
        assert_eq!(config.nxdomain, 3600);
    }
}
