//! Turns Nagios plugin performance data into the datasources of one RRD file.
//!
//! The input is what the Data Domain check prints after the `|`, e.g.
//! `'/data/col1/backup_perc'=42%;80;90 '/data/col1/backup_avail'=1024GB`.

use crate::{Datasource, SourceRef};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PerfdataError {
    #[error("unterminated quote in label \"{0}\"")]
    UnterminatedQuote(String),
    #[error("missing '=' after label \"{0}\"")]
    MissingValue(String),
    #[error("empty label")]
    EmptyLabel,
}

/// Parses a perfdata string into datasources numbered from 1 in input order.
///
/// ```rust
/// # use pnp_datadomain::perfdata;
/// let datasources = perfdata::parse("'/data/col1/x_perc'=42%;80;90 x_avail=10", "dd01.rrd").unwrap();
/// assert_eq!(datasources[0].name, "_data_col1_x_perc");
/// assert_eq!(datasources[0].label, "/data/col1/x_perc");
/// assert_eq!(datasources[0].warning, Some(80.0));
/// assert_eq!(datasources[1].source.ds, "2");
/// ```
pub fn parse(input: &str, rrd_file: &str) -> Result<Vec<Datasource>, PerfdataError> {
    let datasources = tokens(input)?
        .into_iter()
        .enumerate()
        .map(|(i, (label, rest))| {
            let mut fields = rest.split(';').skip(1);
            let warning = fields.next().and_then(parse_threshold);
            let critical = fields.next().and_then(parse_threshold);

            Datasource::new(
                &ds_name(&label),
                &label,
                SourceRef::new(rrd_file, &(i + 1).to_string()),
            )
            .with_thresholds(warning, critical)
        })
        .collect();

    Ok(datasources)
}

/// Derives the machine name of a datasource from its label, the way PNP4Nagios names its
/// datasources: everything but ASCII alphanumerics, `.`, `-` and `_` becomes `_`.
pub fn ds_name(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect()
}

/// Reads a warning or critical field.
///
/// Plain numbers and Nagios ranges are accepted. A range contributes its upper bound, or its
/// lower bound when it is open-ended upwards. Anything else counts as no threshold.
pub fn parse_threshold(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('@').unwrap_or(raw);

    let value = match raw.split_once(':') {
        None => raw,
        Some((_, end)) if !end.is_empty() => end,
        Some(("~", _)) => return None,
        Some((start, _)) => start,
    };

    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Splits perfdata into `(label, value and thresholds)` pairs.
fn tokens(input: &str) -> Result<Vec<(String, String)>, PerfdataError> {
    let mut out = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let quoted = match chars.peek() {
            None => break,
            Some(&c) => c == '\'',
        };

        let mut label = String::new();
        if quoted {
            chars.next();
            loop {
                match chars.next() {
                    Some('\'') if chars.next_if_eq(&'\'').is_some() => label.push('\''),
                    Some('\'') => break,
                    Some(c) => label.push(c),
                    None => return Err(PerfdataError::UnterminatedQuote(label)),
                }
            }
            if chars.next_if_eq(&'=').is_none() {
                return Err(PerfdataError::MissingValue(label));
            }
        } else {
            loop {
                match chars.next() {
                    Some('=') => break,
                    Some(c) if !c.is_whitespace() => label.push(c),
                    _ => return Err(PerfdataError::MissingValue(label)),
                }
            }
        }

        if label.is_empty() {
            return Err(PerfdataError::EmptyLabel);
        }

        let mut rest = String::new();
        while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
            rest.push(c);
        }

        out.push((label, rest));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let input = "'/data/col1/backup_perc'=42.5%;80;90;0;100 \
                     '/data/col1/backup_avail'=1024GB;;;0 \
                     'ctx 2_lastsynced'=7200s;86400;172800";
        let datasources = parse(input, "/var/lib/pnp4nagios/dd01/Space.rrd").unwrap();

        assert_eq!(datasources.len(), 3);

        assert_eq!(datasources[0].name, "_data_col1_backup_perc");
        assert_eq!(datasources[0].label, "/data/col1/backup_perc");
        assert_eq!(datasources[0].warning, Some(80.0));
        assert_eq!(datasources[0].critical, Some(90.0));
        assert_eq!(datasources[0].source.ds, "1");
        assert_eq!(
            datasources[0].source.rrd_file,
            "/var/lib/pnp4nagios/dd01/Space.rrd"
        );

        assert_eq!(datasources[1].warning, None);
        assert_eq!(datasources[1].critical, None);
        assert_eq!(datasources[1].source.ds, "2");

        assert_eq!(datasources[2].name, "ctx_2_lastsynced");
        assert_eq!(datasources[2].label, "ctx 2_lastsynced");
        assert_eq!(datasources[2].warning, Some(86400.0));
        assert_eq!(datasources[2].critical, Some(172800.0));
    }

    #[test]
    fn test_parse_quoting() {
        let datasources = parse("'it''s_perc'=1 plain=2", "a.rrd").unwrap();
        assert_eq!(datasources[0].label, "it's_perc");
        assert_eq!(datasources[0].name, "it_s_perc");
        assert_eq!(datasources[1].label, "plain");

        let datasources = parse("  \n ", "a.rrd").unwrap();
        assert!(datasources.is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse("'open=1", "a.rrd"),
            Err(PerfdataError::UnterminatedQuote("open=1".to_owned()))
        );
        assert_eq!(
            parse("novalue other=1", "a.rrd"),
            Err(PerfdataError::MissingValue("novalue".to_owned()))
        );
        assert_eq!(
            parse("'x' =1", "a.rrd"),
            Err(PerfdataError::MissingValue("x".to_owned()))
        );
        assert_eq!(parse("=1", "a.rrd"), Err(PerfdataError::EmptyLabel));
        assert_eq!(parse("''=1", "a.rrd"), Err(PerfdataError::EmptyLabel));
    }

    #[test]
    fn test_parse_threshold() {
        let test_data = [
            ("80", Some(80.0)),
            (" 0.5 ", Some(0.5)),
            ("", None),
            ("abc", None),
            ("nan", None),
            ("inf", None),
            ("10:", Some(10.0)),
            ("~:20", Some(20.0)),
            ("10:20", Some(20.0)),
            ("@10:20", Some(20.0)),
            ("~:", None),
            ("-5", Some(-5.0)),
        ];

        for (raw, expected) in &test_data {
            assert_eq!(parse_threshold(raw), *expected, "{:?}", raw);
        }
    }

    #[test]
    fn test_ds_name() {
        assert_eq!(ds_name("/data/col1/x y"), "_data_col1_x_y");
        assert_eq!(ds_name("a.b-c_d"), "a.b-c_d");
        assert_eq!(ds_name("ü"), "_");
    }
}
