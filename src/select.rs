use tracing::{debug, trace};

use crate::kind::{DatasourceKind, LabelRule, Palette, Unit};
use crate::rrd::{self, Color, ConsolidationFn, DrawOptions, Element};
use crate::{Datasource, GraphFragment, HostContext, Mode};

const WARNING_COLOR: Color = Color(0xff, 0xff, 0x00);
const CRITICAL_COLOR: Color = Color(0xff, 0x00, 0x00);

/// Builds one graph fragment per datasource.
///
/// In [Mode::Standard] fragment `i` belongs to datasource `i`. In [Mode::Replication] the
/// fragments are grouped by [crate::Direction] (keeping input order inside a group) and
/// numbered densely in output order.
///
/// ```rust
/// # use pnp_datadomain::{classify, Datasource, HostContext, Mode, SourceRef};
/// let ds = Datasource::new("repl_precompsent", "ctx 1_precompsent", SourceRef::new("r.rrd", "1"));
/// let host = HostContext::new("dd01", "Replication");
///
/// let fragments = classify(&[ds], &host, Mode::Replication);
/// assert_eq!(fragments[0].ds_name, "Pre-compression traffic");
/// assert!(!fragments[0].def().contains("HRULE"));
/// ```
pub fn classify(datasources: &[Datasource], host: &HostContext, mode: Mode) -> Vec<GraphFragment> {
    let mut classified: Vec<(DatasourceKind, &Datasource)> =
        datasources.iter().map(|ds| (ds.kind(), ds)).collect();

    if mode == Mode::Replication {
        classified.sort_by_key(|(kind, _)| kind.direction());
    }

    classified
        .into_iter()
        .enumerate()
        .map(|(i, (kind, ds))| {
            debug!(name = %ds.name, ?kind, ?mode, "classified datasource");
            let fragment = build_fragment(i + 1, kind, ds, host, mode);
            trace!(index = fragment.index, opt = %fragment.opt(), "rendered fragment");
            fragment
        })
        .collect()
}

fn build_fragment(
    index: usize,
    kind: DatasourceKind,
    ds: &Datasource,
    host: &HostContext,
    mode: Mode,
) -> GraphFragment {
    let (Some(unit), Some(palette)) = (kind.unit(), kind.palette()) else {
        return GraphFragment::empty(index, &ds.label);
    };

    let (title, ds_name) = match mode {
        Mode::Standard => titles(kind, ds, host),
        Mode::Replication => (host.to_string(), kind.canonical_name().to_owned()),
    };

    let mut options = DrawOptions::new(unit.vertical_label(), &title);
    options.lower_limit = unit.lower_limit();
    options.upper_limit = unit.upper_limit();
    options.base = unit.base();

    GraphFragment {
        index,
        ds_name,
        kind,
        options: Some(options),
        elements: elements(kind, unit, palette, ds, mode),
    }
}

fn elements(
    kind: DatasourceKind,
    unit: Unit,
    palette: Palette,
    ds: &Datasource,
    mode: Mode,
) -> Vec<Element> {
    let def = |vname: &str| Element::Def {
        vname: vname.to_owned(),
        rrd_file: ds.source.rrd_file.clone(),
        ds: ds.source.ds.clone(),
        cf: ConsolidationFn::Avg,
    };

    let mut elements = match kind.rpn() {
        Some(rpn) => vec![
            def("ds1"),
            Element::Cdef {
                vname: "var1".to_owned(),
                rpn: rpn.to_owned(),
            },
        ],
        None => vec![def("var1")],
    };

    let (start, end) = match mode {
        Mode::Standard => (palette.dark, palette.light),
        Mode::Replication => (palette.light, palette.dark),
    };
    elements.extend(rrd::gradient("var1", start, end, kind.fill_legend()));

    if mode == Mode::Standard {
        elements.push(Element::Line1 {
            vname: "var1".to_owned(),
            color: palette.outline,
        });
    }

    elements.extend(rrd::statistics("var1", unit.gprint_format()));

    if mode == Mode::Standard && kind.draws_thresholds() {
        let rules = [
            (ds.warning, WARNING_COLOR, "Warning "),
            (ds.critical, CRITICAL_COLOR, "Critical"),
        ];

        for (threshold, color, prefix) in rules {
            let converted = threshold.map(|raw| kind.convert(raw));
            if let Some(value) = converted.filter(|v| v.is_finite()) {
                elements.push(Element::Hrule {
                    value,
                    color,
                    legend: format!(
                        "{} {} {}\\n",
                        prefix,
                        legend_value(value),
                        unit.threshold_suffix()
                    ),
                });
            }
        }
    }

    elements
}

/// Formats a threshold for its legend: two decimals, trailing zeros dropped.
fn legend_value(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "" | "-" | "-0" => "0".to_owned(),
        _ => s.to_owned(),
    }
}

/// Returns `(title, ds_name)` of a standard fragment.
fn titles(kind: DatasourceKind, ds: &Datasource, host: &HostContext) -> (String, String) {
    let phrase = kind.phrase();

    match kind.label_rule() {
        LabelRule::PathSegment => {
            let label = strip_tail(&ds.label, kind.suffix());
            (
                format!("{} {}", phrase, last_segment(label)),
                format!("{} {}", phrase, label),
            )
        }
        LabelRule::HostAndName => {
            let name = ds.name.strip_suffix(kind.suffix()).unwrap_or(&ds.name);
            let title = format!("{} {} / {}", phrase, host.hostname, name);
            (title.clone(), title)
        }
        LabelRule::HostAndLabel => {
            let label = strip_tail(&ds.label, kind.suffix());
            let title = format!("{} {} / {}", phrase, host.hostname, label);
            (title.clone(), title)
        }
    }
}

/// Removes `suffix` from `label`. Labels not ending in `suffix` lose as many trailing characters
/// as the suffix has.
fn strip_tail<'a>(label: &'a str, suffix: &str) -> &'a str {
    if let Some(stripped) = label.strip_suffix(suffix) {
        return stripped;
    }

    let keep = label.chars().count().saturating_sub(suffix.chars().count());
    label
        .char_indices()
        .nth(keep)
        .map_or(label, |(i, _)| &label[..i])
}

/// The component after the last `/`, or the whole label if that component is empty.
fn last_segment(label: &str) -> &str {
    match label.rsplit_once('/') {
        Some((_, segment)) if !segment.is_empty() => segment,
        _ => label,
    }
}
