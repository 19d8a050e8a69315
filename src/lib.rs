//! The pnp_datadomain crate provides the PNP4Nagios graph templates for the Data Domain check.
//!
//! Given the datasources of one service, [classify] picks the presentation of every datasource
//! from the suffix of its name and returns one [GraphFragment] per datasource: the rrdtool draw
//! options (`$opt`) and element definitions (`$def`) PNP4Nagios hands to rrdtool.
//!
//! ```rust
//! # use pnp_datadomain::{classify, Datasource, HostContext, Mode, SourceRef};
//! let ds = Datasource::new("fs_space_perc", "fs_space_perc", SourceRef::new("dd01.rrd", "1"))
//!     .with_thresholds(Some(80.0), Some(90.0));
//! let host = HostContext::new("dd01", "Filesystem");
//!
//! let fragments = classify(&[ds], &host, Mode::Standard);
//! assert!(fragments[0].opt().contains("-l 0 -u 100"));
//! assert!(fragments[0].def().contains("HRULE:80#FFFF00"));
//! ```

use std::fmt;

#[macro_use]
mod macros;

pub mod kind;
pub mod perfdata;
pub mod rrd;
mod select;

pub use crate::kind::{DatasourceKind, Direction, Unit};
pub use crate::perfdata::PerfdataError;
pub use crate::rrd::{DrawOptions, Element};
pub use crate::select::classify;

/// Where the samples of a datasource are stored: an RRD file and the datasource id inside it.
///
/// This crate only ever references the series, it never reads or writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceRef {
    pub rrd_file: String,
    pub ds: String,
}

impl SourceRef {
    pub fn new(rrd_file: &str, ds: &str) -> Self {
        SourceRef {
            rrd_file: rrd_file.to_owned(),
            ds: ds.to_owned(),
        }
    }
}

/// A single measured stream of the check, as PNP4Nagios knows it.
///
/// `name` is the machine identifier carrying the semantic suffix (`_perc`, `_lastsynced`, ...),
/// `label` the original perfdata label which may embed a path like `/data/col1/backup`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Datasource {
    pub name: String,
    pub label: String,
    pub warning: Option<f64>,
    pub critical: Option<f64>,
    pub source: SourceRef,
}

impl Datasource {
    /// Creates a datasource without thresholds.
    pub fn new(name: &str, label: &str, source: SourceRef) -> Self {
        Datasource {
            name: name.to_owned(),
            label: label.to_owned(),
            warning: None,
            critical: None,
            source,
        }
    }

    pub fn with_thresholds(mut self, warning: Option<f64>, critical: Option<f64>) -> Self {
        self.warning = warning;
        self.critical = critical;
        self
    }

    pub fn kind(&self) -> DatasourceKind {
        DatasourceKind::from_name(&self.name)
    }
}

/// The host and service the graphed datasources belong to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostContext {
    pub hostname: String,
    pub service_description: String,
}

impl HostContext {
    pub fn new(hostname: &str, service_description: &str) -> Self {
        HostContext {
            hostname: hostname.to_owned(),
            service_description: service_description.to_owned(),
        }
    }
}

impl fmt::Display for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.hostname, self.service_description)
    }
}

/// Selects which template set renders the datasources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// One graph per datasource with per-datasource titles, outlines and threshold rules.
    #[default]
    Standard,
    /// Compact replication graphs: canonical names, reversed gradients, no outline, no rules,
    /// grouped by traffic direction.
    Replication,
}

/// The graph recipe of one datasource.
///
/// An unrecognized datasource yields an empty fragment: both [GraphFragment::opt] and
/// [GraphFragment::def] are empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphFragment {
    /// 1-based graph slot, `$opt[index]` / `$def[index]` in PNP4Nagios terms.
    pub index: usize,
    /// Name of the graph as shown in the PNP4Nagios page.
    pub ds_name: String,
    pub kind: DatasourceKind,
    pub options: Option<DrawOptions>,
    pub elements: Vec<Element>,
}

impl GraphFragment {
    pub(crate) fn empty(index: usize, ds_name: &str) -> Self {
        GraphFragment {
            index,
            ds_name: ds_name.to_owned(),
            kind: DatasourceKind::Unrecognized,
            options: None,
            elements: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_none() && self.elements.is_empty()
    }

    /// The rrdtool draw options.
    pub fn opt(&self) -> String {
        self.options
            .as_ref()
            .map(|o| o.to_string())
            .unwrap_or_default()
    }

    /// The rrdtool element definitions, each followed by a space.
    pub fn def(&self) -> String {
        self.elements.iter().map(|e| format!("{} ", e)).collect()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GraphFragment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("GraphFragment", 4)?;
        s.serialize_field("index", &self.index)?;
        s.serialize_field("ds_name", &self.ds_name)?;
        s.serialize_field("opt", &self.opt())?;
        s.serialize_field("def", &self.def())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Datasource, DatasourceKind, GraphFragment, HostContext, Mode, SourceRef};

    #[test]
    fn test_datasource() {
        let ds = Datasource::new(
            "_data_col1_backup_precompsent",
            "/data/col1/backup_precompsent",
            SourceRef::new("dd01.rrd", "3"),
        );
        assert_eq!(ds.kind(), DatasourceKind::PreCompSent);
        assert_eq!(ds.warning, None);
        assert_eq!(ds.critical, None);

        let ds = ds.with_thresholds(Some(1.0), None);
        assert_eq!(ds.warning, Some(1.0));
        assert_eq!(ds.critical, None);
        assert_eq!(ds.source.ds, "3");
    }

    #[test]
    fn test_host_context() {
        let host = HostContext::new("dd01", "Replication");
        assert_eq!(&host.to_string(), "dd01 / Replication");
    }

    #[test]
    fn test_mode_default() {
        assert_eq!(Mode::default(), Mode::Standard);
    }

    #[test]
    fn test_empty_fragment() {
        let fragment = GraphFragment::empty(2, "whatever");
        assert!(fragment.is_empty());
        assert_eq!(&fragment.opt(), "");
        assert_eq!(&fragment.def(), "");
        assert_eq!(fragment.index, 2);
        assert!(fragment.elements.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_fragment_json() {
        let fragment = GraphFragment::empty(1, "x");
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"index": 1, "ds_name": "x", "opt": "", "def": ""})
        );
    }
}
