/// Declares the closed set of datasource kinds from a `Variant => "suffix"` table.
///
/// Generates the enum (with a trailing `Unrecognized` fallback), the `RECOGNIZED` list in match
/// order and the `suffix` accessor, so the suffix test and the variant list cannot drift apart.
macro_rules! datasource_kinds {
    ($( $(#[$doc:meta])* $variant:ident => $suffix:literal ), * $(,)?) => {
        /// The classification of a datasource, derived from the suffix of its name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum DatasourceKind {
            $(
                $(#[$doc])*
                $variant,
            )*
            /// No known suffix matched. Renders as an empty fragment.
            Unrecognized,
        }

        impl DatasourceKind {
            /// All recognized kinds in the order their suffixes are tested.
            pub const RECOGNIZED: &'static [DatasourceKind] = &[$(DatasourceKind::$variant),*];

            /// The name suffix selecting this kind. Empty for [DatasourceKind::Unrecognized].
            pub fn suffix(&self) -> &'static str {
                match self {
                    $(DatasourceKind::$variant => $suffix,)*
                    DatasourceKind::Unrecognized => "",
                }
            }
        }
    };
}

/// Lets you build the ordered datasource collection of one RRD file. It's a bit like the vec!
/// macro; every datasource gets the next datasource id, starting at 1.
/// ```rust
/// # #[macro_use]
/// # extern crate pnp_datadomain;
/// # fn main() {
/// let datasources = datasources!["/var/lib/pnp4nagios/dd01/Space.rrd";
///     "fs_space_perc",
///     "fs_space_avail",
/// ];
/// assert_eq!(datasources.len(), 2);
/// assert_eq!(datasources[1].source.ds, "2");
/// # }
/// ```
#[macro_export]
macro_rules! datasources {
    ($rrd:expr; $( $name:expr ), * $(,)?) => {
        {
            use $crate::{Datasource, SourceRef};
            let mut v: Vec<Datasource> = Vec::new();
            $(
                let ds = (v.len() + 1).to_string();
                v.push(Datasource::new($name, $name, SourceRef::new($rrd, &ds)));
            )*
            v
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_datasources_macro() {
        let datasources = datasources!["a.rrd"; "x_perc", "y_avail"];

        assert_eq!(datasources.len(), 2);
        assert_eq!(datasources[0].name, "x_perc");
        assert_eq!(datasources[0].label, "x_perc");
        assert_eq!(datasources[0].source.ds, "1");
        assert_eq!(datasources[1].source.ds, "2");
        assert_eq!(datasources[1].source.rrd_file, "a.rrd");

        let empty = datasources!["a.rrd";];
        assert!(empty.is_empty());
    }
}
