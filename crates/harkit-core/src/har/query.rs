use crate::{Error, Result};

/// Options for [`parse_query`]
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    /// Keep fields without `=` or with an empty value (value becomes `""`)
    pub keep_blank_values: bool,
    /// Fail on empty segments and fields without `=`
    pub strict_parsing: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_blank_values(mut self) -> Self {
        self.keep_blank_values = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_parsing = true;
        self
    }
}

/// Split a query string into name/value pairs.
///
/// Both `&` and `;` separate fields and `+` becomes a space. Percent escapes
/// are left exactly as they appear so the pairs match what went over the
/// wire.
pub fn parse_query(qs: &str, options: QueryOptions) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();

    for field in qs.split('&').flat_map(|s| s.split(';')) {
        if field.is_empty() && !options.strict_parsing {
            continue;
        }

        let (name, value) = match field.split_once('=') {
            Some(pair) => pair,
            None if options.strict_parsing => {
                return Err(Error::MalformedQuery(field.to_string()));
            }
            None if options.keep_blank_values => (field, ""),
            None => continue,
        };

        if value.is_empty() && !options.keep_blank_values {
            continue;
        }

        pairs.push((name.replace('+', " "), value.replace('+', " ")));
    }

    Ok(pairs)
}

/// The query component of a URL: everything after the first `?` up to any
/// fragment. Nothing is normalized.
pub fn query_component(url: &str) -> Option<&str> {
    let url = url.split_once('#').map_or(url, |(u, _)| u);
    let (_, query) = url.split_once('?')?;
    (!query.is_empty()).then_some(query)
}
