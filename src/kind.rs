//! Suffix classification of Data Domain datasources and the presentation table per class.

use crate::rrd::Color;

datasource_kinds! {
    /// Pre-compression bytes sent by replication.
    PreCompSent => "_precompsent",
    /// Post-compression bytes sent by replication.
    PostCompSent => "_postcompsent",
    /// Post-compression bytes received by replication.
    PostCompReceived => "_postcomprcv",
    /// Pre-compression bytes still waiting to be replicated.
    PreCompRemaining => "_precompremain",
    /// Seconds since the last successful replication sync.
    LastSynced => "_lastsynced",
    /// Filesystem usage in percent.
    SpaceUsage => "_perc",
    /// Free filesystem space in GiB.
    SpaceAvailable => "_avail",
}

impl DatasourceKind {
    /// Classifies a datasource by the suffix of its machine name. The first matching suffix wins.
    pub fn from_name(name: &str) -> DatasourceKind {
        DatasourceKind::RECOGNIZED
            .iter()
            .copied()
            .find(|kind| name.ends_with(kind.suffix()))
            .unwrap_or(DatasourceKind::Unrecognized)
    }

    pub fn is_recognized(&self) -> bool {
        *self != DatasourceKind::Unrecognized
    }

    pub fn unit(&self) -> Option<Unit> {
        match self {
            DatasourceKind::PreCompSent
            | DatasourceKind::PostCompSent
            | DatasourceKind::PostCompReceived => Some(Unit::BytesPerSecond),
            DatasourceKind::PreCompRemaining => Some(Unit::Bytes),
            DatasourceKind::LastSynced => Some(Unit::Hours),
            DatasourceKind::SpaceUsage => Some(Unit::Percent),
            DatasourceKind::SpaceAvailable => Some(Unit::ScaledBytes),
            DatasourceKind::Unrecognized => None,
        }
    }

    pub fn palette(&self) -> Option<Palette> {
        let palette = match self {
            DatasourceKind::PreCompSent | DatasourceKind::PostCompSent => Palette {
                dark: Color(0xff, 0x33, 0x33),
                light: Color(0xff, 0xaa, 0xaa),
                outline: Color(0x88, 0x00, 0x00),
            },
            DatasourceKind::PostCompReceived => Palette {
                dark: Color(0x33, 0x33, 0xff),
                light: Color(0xaa, 0xaa, 0xff),
                outline: Color(0x00, 0x00, 0x88),
            },
            DatasourceKind::PreCompRemaining => Palette {
                dark: Color(0xaa, 0x00, 0xff),
                light: Color(0xaa, 0x88, 0xff),
                outline: Color(0x33, 0x00, 0x88),
            },
            DatasourceKind::LastSynced => Palette {
                dark: Color(0x00, 0xaa, 0x00),
                light: Color(0x88, 0xff, 0x88),
                outline: Color(0x00, 0x88, 0x00),
            },
            DatasourceKind::SpaceUsage => Palette {
                dark: Color(0x33, 0xaa, 0x33),
                light: Color(0x88, 0xff, 0x88),
                outline: Color(0x00, 0x88, 0x00),
            },
            DatasourceKind::SpaceAvailable => Palette {
                dark: Color(0xb6, 0xb6, 0xb6),
                light: Color(0xd6, 0xd6, 0xd6),
                outline: Color(0x00, 0x33, 0x00),
            },
            DatasourceKind::Unrecognized => return None,
        };

        Some(palette)
    }

    /// Converts a raw stored value (or threshold) into the unit the graph is drawn in.
    ///
    /// ```rust
    /// # use pnp_datadomain::DatasourceKind;
    /// assert_eq!(DatasourceKind::LastSynced.convert(7200.0), 2.0);
    /// assert_eq!(DatasourceKind::SpaceUsage.convert(80.0), 80.0);
    /// ```
    pub fn convert(&self, raw: f64) -> f64 {
        match self {
            DatasourceKind::LastSynced => raw / 3600.0,
            DatasourceKind::SpaceAvailable => raw * 1024.0 * 1024.0 * 1024.0,
            _ => raw,
        }
    }

    /// The rrdtool RPN expression applying [DatasourceKind::convert] to the series `ds1`.
    ///
    /// `None` means the stored series is drawn as is, without an intermediate `CDEF`.
    pub fn rpn(&self) -> Option<&'static str> {
        match self {
            DatasourceKind::LastSynced => Some("ds1,3600,/"),
            DatasourceKind::SpaceUsage => Some("ds1"),
            DatasourceKind::SpaceAvailable => Some("ds1,1024,1024,1024,*,*,*"),
            _ => None,
        }
    }

    /// Whether warning and critical thresholds are drawn as horizontal rules.
    pub fn draws_thresholds(&self) -> bool {
        matches!(
            self,
            DatasourceKind::LastSynced | DatasourceKind::SpaceUsage
        )
    }

    pub fn label_rule(&self) -> LabelRule {
        match self {
            DatasourceKind::SpaceUsage => LabelRule::HostAndName,
            DatasourceKind::SpaceAvailable => LabelRule::HostAndLabel,
            _ => LabelRule::PathSegment,
        }
    }

    /// The phrase titles and legend names start with in standard mode.
    pub fn phrase(&self) -> &'static str {
        match self {
            DatasourceKind::PreCompSent => "Pre-compression Sent for",
            DatasourceKind::PostCompSent => "Post-compression Sent for",
            DatasourceKind::PostCompReceived => "Post-compression Received for",
            DatasourceKind::PreCompRemaining => "Pre-compression remaining for",
            DatasourceKind::LastSynced => "Last synced time for",
            DatasourceKind::SpaceUsage => "FS space usage for",
            DatasourceKind::SpaceAvailable => "Free space for",
            DatasourceKind::Unrecognized => "",
        }
    }

    /// The short display name used in replication mode, independent of the datasource label.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            DatasourceKind::PreCompSent => "Pre-compression traffic",
            DatasourceKind::PostCompSent => "Post-compression traffic",
            DatasourceKind::PostCompReceived => "Post-compression received",
            DatasourceKind::PreCompRemaining => "Pre-compression remaining",
            DatasourceKind::LastSynced => "Last synced",
            DatasourceKind::SpaceUsage => "FS space usage",
            DatasourceKind::SpaceAvailable => "Free space",
            DatasourceKind::Unrecognized => "",
        }
    }

    /// Legend of the gradient fill.
    pub fn fill_legend(&self) -> &'static str {
        match self {
            DatasourceKind::PreCompSent
            | DatasourceKind::PostCompSent
            | DatasourceKind::PostCompReceived => "traffic",
            DatasourceKind::PreCompRemaining => "remaining",
            DatasourceKind::LastSynced => "last synced",
            DatasourceKind::SpaceUsage => "FS usage",
            DatasourceKind::SpaceAvailable => "Free space",
            DatasourceKind::Unrecognized => "",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            DatasourceKind::PreCompSent | DatasourceKind::PostCompSent => Direction::Outbound,
            DatasourceKind::PostCompReceived => Direction::Inbound,
            DatasourceKind::PreCompRemaining => Direction::Backlog,
            DatasourceKind::LastSynced => Direction::SyncLag,
            DatasourceKind::SpaceUsage | DatasourceKind::SpaceAvailable => Direction::Capacity,
            DatasourceKind::Unrecognized => Direction::Unknown,
        }
    }
}

/// The measurement unit a kind is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    BytesPerSecond,
    Bytes,
    Hours,
    Percent,
    /// Free space stored in GiB, drawn in bytes.
    ScaledBytes,
}

impl Unit {
    pub fn vertical_label(&self) -> &'static str {
        match self {
            Unit::BytesPerSecond => "Bytes/s",
            Unit::Bytes => "Bytes",
            Unit::Hours => "hours ago",
            Unit::Percent => "percent",
            Unit::ScaledBytes => "bytes",
        }
    }

    /// The value suffix of `GPRINT` statistics.
    pub fn gprint_format(&self) -> &'static str {
        match self {
            Unit::BytesPerSecond => "%SB/s",
            Unit::Bytes | Unit::ScaledBytes => "%SB",
            Unit::Hours => "hours",
            Unit::Percent => "%%",
        }
    }

    /// The unit named in threshold legends.
    pub fn threshold_suffix(&self) -> &'static str {
        match self {
            Unit::BytesPerSecond => "B/s",
            Unit::Bytes | Unit::ScaledBytes => "B",
            Unit::Hours => "hours",
            Unit::Percent => "%",
        }
    }

    pub fn lower_limit(&self) -> Option<u32> {
        match self {
            Unit::Bytes | Unit::Percent => Some(0),
            _ => None,
        }
    }

    pub fn upper_limit(&self) -> Option<u32> {
        match self {
            Unit::Percent => Some(100),
            _ => None,
        }
    }

    pub fn base(&self) -> Option<u32> {
        match self {
            Unit::Bytes => Some(1024),
            _ => None,
        }
    }
}

/// Colors of one kind: the gradient runs between `dark` and `light`, `outline` strokes the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub dark: Color,
    pub light: Color,
    pub outline: Color,
}

/// How the title and legend name of a standard fragment are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRule {
    /// `<phrase> <label>` for the legend, `<phrase> <last path segment>` for the title.
    PathSegment,
    /// `<phrase> <hostname> / <name>` for both.
    HostAndName,
    /// `<phrase> <hostname> / <label>` for both.
    HostAndLabel,
}

/// Replication fragments are grouped by traffic direction, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Direction {
    Outbound,
    Inbound,
    Backlog,
    SyncLag,
    Capacity,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        let test_data = [
            ("repl_ctx1_precompsent", DatasourceKind::PreCompSent),
            ("repl_ctx1_postcompsent", DatasourceKind::PostCompSent),
            ("repl_ctx1_postcomprcv", DatasourceKind::PostCompReceived),
            ("repl_ctx1_precompremain", DatasourceKind::PreCompRemaining),
            ("repl_ctx1_lastsynced", DatasourceKind::LastSynced),
            ("fs_space_perc", DatasourceKind::SpaceUsage),
            ("fs_space_avail", DatasourceKind::SpaceAvailable),
            ("fs_space_used", DatasourceKind::Unrecognized),
            ("", DatasourceKind::Unrecognized),
            ("_precompsent_old", DatasourceKind::Unrecognized),
        ];

        for (name, expected) in &test_data {
            assert_eq!(DatasourceKind::from_name(name), *expected, "{}", name);
        }
    }

    #[test]
    fn test_suffixes_do_not_collide() {
        for kind in DatasourceKind::RECOGNIZED {
            let matching: Vec<&DatasourceKind> = DatasourceKind::RECOGNIZED
                .iter()
                .filter(|other| kind.suffix().ends_with(other.suffix()))
                .collect();
            assert_eq!(matching, vec![kind], "{:?}", kind);
        }

        assert_eq!(DatasourceKind::RECOGNIZED.len(), 7);
        assert!(!DatasourceKind::RECOGNIZED.contains(&DatasourceKind::Unrecognized));
    }

    #[test]
    fn test_convert() {
        assert_eq!(DatasourceKind::LastSynced.convert(3600.0), 1.0);
        assert_eq!(DatasourceKind::LastSynced.convert(1800.0), 0.5);
        assert_eq!(DatasourceKind::SpaceUsage.convert(90.0), 90.0);
        assert_eq!(DatasourceKind::SpaceAvailable.convert(2.0), 2147483648.0);
        assert_eq!(DatasourceKind::PreCompSent.convert(12.5), 12.5);
    }

    #[test]
    fn test_threshold_policy() {
        let drawing: Vec<DatasourceKind> = DatasourceKind::RECOGNIZED
            .iter()
            .copied()
            .filter(|kind| kind.draws_thresholds())
            .collect();

        assert_eq!(
            drawing,
            vec![DatasourceKind::LastSynced, DatasourceKind::SpaceUsage]
        );
        assert!(!DatasourceKind::Unrecognized.draws_thresholds());
    }

    #[test]
    fn test_unrecognized_has_no_presentation() {
        let kind = DatasourceKind::Unrecognized;
        assert!(!kind.is_recognized());
        assert_eq!(kind.unit(), None);
        assert_eq!(kind.palette(), None);
        assert_eq!(kind.rpn(), None);
        assert_eq!(kind.suffix(), "");
        assert_eq!(kind.direction(), Direction::Unknown);
    }

    #[test]
    fn test_every_recognized_kind_is_complete() {
        for kind in DatasourceKind::RECOGNIZED {
            assert!(kind.is_recognized());
            assert!(kind.unit().is_some(), "{:?}", kind);
            assert!(kind.palette().is_some(), "{:?}", kind);
            assert!(!kind.phrase().is_empty(), "{:?}", kind);
            assert!(!kind.canonical_name().is_empty(), "{:?}", kind);
            assert!(kind.direction() < Direction::Unknown, "{:?}", kind);
        }
    }

    #[test]
    fn test_units() {
        assert_eq!(Unit::Percent.lower_limit(), Some(0));
        assert_eq!(Unit::Percent.upper_limit(), Some(100));
        assert_eq!(Unit::Bytes.base(), Some(1024));
        assert_eq!(Unit::BytesPerSecond.lower_limit(), None);
        assert_eq!(Unit::Hours.vertical_label(), "hours ago");
        assert_eq!(Unit::Percent.gprint_format(), "%%");
        assert_eq!(DatasourceKind::SpaceAvailable.unit(), Some(Unit::ScaledBytes));
        assert_eq!(Unit::ScaledBytes.vertical_label(), "bytes");
        assert_eq!(Unit::ScaledBytes.gprint_format(), "%SB");
    }
}
