//! Typed rrdtool graph primitives.
//!
//! Every [Element] renders to exactly one rrdtool graph argument via [std::fmt::Display], so a
//! recipe is just the elements joined the way PNP4Nagios joins its `$def` strings.

use std::fmt;

/// Number of bands a gradient fill is split into.
pub const GRADIENT_STEPS: u32 = 20;

/// Legends of gradient fills are cut (or padded) to this many characters.
pub const LEGEND_WIDTH: usize = 18;

/// How rrdtool consolidates the primary data points of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsolidationFn {
    Avg,
    Max,
    Last,
}

impl ConsolidationFn {
    pub(crate) fn as_arg_str(&self) -> &str {
        match self {
            ConsolidationFn::Avg => "AVERAGE",
            ConsolidationFn::Max => "MAX",
            ConsolidationFn::Last => "LAST",
        }
    }
}

/// An opaque RGB color, rendered as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Interpolates between `self` and `other`. A `factor` of 0 yields `self`, 1 yields `other`.
    pub fn blend(&self, other: &Color, factor: f64) -> Color {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * factor).round() as u8;
        Color(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// A single rrdtool graph directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// `DEF:<vname>=<rrd>:<ds>:<cf>`
    Def {
        vname: String,
        rrd_file: String,
        ds: String,
        cf: ConsolidationFn,
    },
    /// `CDEF:<vname>=<rpn>`
    Cdef { vname: String, rpn: String },
    /// `AREA:<vname><color>[:"<legend>"]`
    Area {
        vname: String,
        color: Color,
        legend: Option<String>,
    },
    /// `LINE1:<vname><color>`
    Line1 { vname: String, color: Color },
    /// `GPRINT:<vname>:<cf>:"<format>"`
    Gprint {
        vname: String,
        cf: ConsolidationFn,
        format: String,
    },
    /// `HRULE:<value><color>:"<legend>"`
    Hrule {
        value: f64,
        color: Color,
        legend: String,
    },
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Def {
                vname,
                rrd_file,
                ds,
                cf,
            } => write!(
                f,
                "DEF:{}={}:{}:{}",
                vname,
                escape_colons(rrd_file),
                ds,
                cf.as_arg_str()
            ),
            Element::Cdef { vname, rpn } => write!(f, "CDEF:{}={}", vname, rpn),
            Element::Area {
                vname,
                color,
                legend: Some(legend),
            } => write!(f, "AREA:{}{}:\"{}\"", vname, color, escape_legend(legend)),
            Element::Area {
                vname,
                color,
                legend: None,
            } => write!(f, "AREA:{}{}", vname, color),
            Element::Line1 { vname, color } => write!(f, "LINE1:{}{}", vname, color),
            Element::Gprint { vname, cf, format } => {
                write!(f, "GPRINT:{}:{}:\"{}\"", vname, cf.as_arg_str(), format)
            }
            Element::Hrule {
                value,
                color,
                legend,
            } => write!(f, "HRULE:{}{}:\"{}\"", value, color, escape_legend(legend)),
        }
    }
}

/// Builds the stacked `AREA` bands PNP4Nagios uses for its gradient fills.
///
/// The outermost band (the full value) is drawn in `end` and carries the legend, the innermost
/// band is closest to `start`. Band variables are derived from `vname` so the output is stable
/// across calls.
pub fn gradient(vname: &str, start: Color, end: Color, legend: &str) -> Vec<Element> {
    let minimum = format!("{}minimum", vname);
    let band = |i: u32| format!("{}g{}", vname, i);

    let mut elements = vec![Element::Cdef {
        vname: minimum.clone(),
        rpn: format!("{},{},-", vname, vname),
    }];

    for i in (1..=GRADIENT_STEPS).rev() {
        elements.push(Element::Cdef {
            vname: band(i),
            rpn: format!(
                "{},{},-,{},/,{},*,{},+",
                vname, minimum, GRADIENT_STEPS, i, minimum
            ),
        });
    }

    for i in (1..=GRADIENT_STEPS).rev() {
        let factor = i as f64 / GRADIENT_STEPS as f64;
        elements.push(Element::Area {
            vname: band(i),
            color: start.blend(&end, factor),
            legend: (i == GRADIENT_STEPS).then(|| cut(legend, LEGEND_WIDTH)),
        });
    }

    elements
}

/// The three `GPRINT` statistics printed under every series. The last one ends the legend line.
pub fn statistics(vname: &str, unit_format: &str) -> Vec<Element> {
    [
        (ConsolidationFn::Last, "last"),
        (ConsolidationFn::Avg, "avg"),
        (ConsolidationFn::Max, "max\\n"),
    ]
    .into_iter()
    .map(|(cf, label)| Element::Gprint {
        vname: vname.to_owned(),
        cf,
        format: format!("%7.2lf {} {}", unit_format, label),
    })
    .collect()
}

/// Left aligns `s` in a field of `width` characters, shortening it with `...` when too long.
pub fn cut(s: &str, width: usize) -> String {
    let s = if s.chars().count() > width {
        let mut short: String = s.chars().take(width.saturating_sub(3)).collect();
        short.push_str("...");
        short
    } else {
        s.to_owned()
    };

    format!("{:<width$}", s, width = width)
}

/// Graph-wide options: axis label, title and y axis bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOptions {
    pub vertical_label: String,
    pub title: String,
    pub lower_limit: Option<u32>,
    pub upper_limit: Option<u32>,
    pub base: Option<u32>,
}

impl DrawOptions {
    pub fn new(vertical_label: &str, title: &str) -> Self {
        DrawOptions {
            vertical_label: vertical_label.to_owned(),
            title: title.to_owned(),
            lower_limit: None,
            upper_limit: None,
            base: None,
        }
    }
}

impl fmt::Display for DrawOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "--vertical-label \"{}\" --title \"{}\"",
            escape_quotes(&self.vertical_label),
            escape_quotes(&self.title)
        )?;

        if let Some(lower) = self.lower_limit {
            write!(f, " -l {}", lower)?;
        }
        if let Some(upper) = self.upper_limit {
            write!(f, " -u {}", upper)?;
        }
        if let Some(base) = self.base {
            write!(f, " -b {}", base)?;
        }

        Ok(())
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

fn escape_colons(s: &str) -> String {
    s.replace(':', "\\:")
}

fn escape_legend(s: &str) -> String {
    escape_colons(&escape_quotes(s))
}
