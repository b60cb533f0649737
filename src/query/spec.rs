use std::collections::BTreeMap;
use std::str::FromStr;

use lazy_regex::regex_is_match;

use crate::error::{Error, Result};

/// Parameter names with special meaning. A persisted field literally named
/// one of these is unreachable via equality filtering (accepted limitation).
pub const RESERVED_PARAMS: [&str; 5] = ["page", "sort", "limit", "fields", "search"];

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ComparisonOp {
    pub fn surql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = ();

    fn from_str(s: &str) -> core::result::Result<Self, ()> {
        match s {
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            _ => Err(()),
        }
    }
}

/// A single field constraint, e.g. `genre = "Pop"` or `duration >= "3:00"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub field: String,
    pub op: ComparisonOp,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Immutable filter/sort/projection/pagination specification, built once per
/// request from the raw query parameters and handed to the store adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub constraints: Vec<Constraint>,
    pub search: Option<String>,
    pub sort: Vec<SortKey>,
    /// Explicit projection; `None` means all fields except `created_at`.
    pub fields: Option<Vec<String>>,
    pub page: u32,
    pub limit: u32,
}

impl QuerySpec {
    pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self> {
        let mut constraints = Vec::new();

        for (key, value) in params {
            if RESERVED_PARAMS.contains(&key.as_str()) {
                continue;
            }
            constraints.push(parse_constraint(key, value)?);
        }

        let search = non_empty(params, "search").map(str::to_string);

        let sort = match non_empty(params, "sort") {
            Some(raw) => parse_sort(raw)?,
            None => vec![SortKey {
                field: "created_at".to_string(),
                direction: SortDirection::Desc,
            }],
        };

        let fields = match non_empty(params, "fields") {
            Some(raw) => Some(parse_fields(raw)?),
            None => None,
        };

        // Malformed pagination input silently degrades to the defaults
        // rather than failing the request.
        let page = parse_positive(params.get("page")).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(params.get("limit")).unwrap_or(DEFAULT_LIMIT);

        Ok(Self {
            constraints,
            search,
            sort,
            fields,
            page,
            limit,
        })
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Empty values for reserved parameters are treated as absent.
fn non_empty<'a>(params: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn parse_positive(value: Option<&String>) -> Option<u32> {
    value.and_then(|v| v.parse::<u32>().ok()).filter(|v| *v >= 1)
}

/// Parses a parameter key into a constraint. A bare key is an equality
/// constraint; `field[op]` carries an explicit comparison operator.
fn parse_constraint(key: &str, value: &str) -> Result<Constraint> {
    let (field, op) = match key.split_once('[') {
        None => (key, ComparisonOp::Eq),
        Some((field, rest)) => {
            let op_name = rest.strip_suffix(']').ok_or_else(|| Error::MalformedQuery {
                message: format!("Unterminated operator bracket in parameter '{key}'"),
            })?;
            let op = ComparisonOp::from_str(op_name).map_err(|_| Error::MalformedQuery {
                message: format!("Unknown comparison operator '{op_name}' in parameter '{key}'"),
            })?;
            (field, op)
        }
    };

    validate_field_name(field)?;

    Ok(Constraint {
        field: field.to_string(),
        op,
        value: value.to_string(),
    })
}

fn parse_sort(raw: &str) -> Result<Vec<SortKey>> {
    let mut keys = Vec::new();

    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (field, direction) = match part.strip_prefix('-') {
            Some(field) => (field, SortDirection::Desc),
            None => (part, SortDirection::Asc),
        };
        validate_field_name(field)?;
        keys.push(SortKey {
            field: field.to_string(),
            direction,
        });
    }

    if keys.is_empty() {
        keys.push(SortKey {
            field: "created_at".to_string(),
            direction: SortDirection::Desc,
        });
    }

    Ok(keys)
}

fn parse_fields(raw: &str) -> Result<Vec<String>> {
    let mut fields = Vec::new();

    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        validate_field_name(part)?;
        if !fields.iter().any(|f| f == part) {
            fields.push(part.to_string());
        }
    }

    Ok(fields)
}

/// Field names end up interpolated into SurrealQL, so only bare identifiers
/// are allowed through.
fn validate_field_name(field: &str) -> Result<()> {
    if regex_is_match!(r"^[A-Za-z_][A-Za-z0-9_]*$", field) {
        Ok(())
    } else {
        Err(Error::MalformedQuery {
            message: format!("Invalid field name '{field}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let spec = QuerySpec::from_params(&params(&[])).unwrap();
        assert!(spec.constraints.is_empty());
        assert!(spec.search.is_none());
        assert!(spec.fields.is_none());
        assert_eq!(spec.page, 1);
        assert_eq!(spec.limit, 100);
        assert_eq!(spec.offset(), 0);
        assert_eq!(
            spec.sort,
            vec![SortKey {
                field: "created_at".to_string(),
                direction: SortDirection::Desc,
            }]
        );
    }

    #[test]
    fn test_reserved_params_are_not_filters() {
        let spec = QuerySpec::from_params(&params(&[
            ("page", "2"),
            ("sort", "title"),
            ("limit", "10"),
            ("fields", "title"),
            ("search", "x"),
            ("genre", "Pop"),
        ]))
        .unwrap();

        assert_eq!(spec.constraints.len(), 1);
        assert_eq!(spec.constraints[0].field, "genre");
        assert_eq!(spec.constraints[0].op, ComparisonOp::Eq);
        assert_eq!(spec.constraints[0].value, "Pop");
    }

    #[test]
    fn test_range_operators() {
        let spec = QuerySpec::from_params(&params(&[
            ("duration[gte]", "3:00"),
            ("duration[lt]", "5:00"),
        ]))
        .unwrap();

        assert_eq!(spec.constraints.len(), 2);
        assert!(spec
            .constraints
            .iter()
            .any(|c| c.field == "duration" && c.op == ComparisonOp::Gte && c.value == "3:00"));
        assert!(spec
            .constraints
            .iter()
            .any(|c| c.field == "duration" && c.op == ComparisonOp::Lt && c.value == "5:00"));
    }

    #[test]
    fn test_unknown_operator_fails_whole_query() {
        let err = QuerySpec::from_params(&params(&[("duration[between]", "3:00")])).unwrap_err();
        assert!(matches!(err, Error::MalformedQuery { .. }));
    }

    #[test]
    fn test_unterminated_bracket_fails() {
        let err = QuerySpec::from_params(&params(&[("duration[gte", "3:00")])).unwrap_err();
        assert!(matches!(err, Error::MalformedQuery { .. }));
    }

    #[test]
    fn test_operator_substring_in_field_name_is_not_an_operator() {
        // A field that merely contains "gte" stays a plain equality filter.
        let spec = QuerySpec::from_params(&params(&[("budgeted", "yes")])).unwrap();
        assert_eq!(spec.constraints[0].field, "budgeted");
        assert_eq!(spec.constraints[0].op, ComparisonOp::Eq);
    }

    #[test]
    fn test_bad_field_name_fails() {
        let err = QuerySpec::from_params(&params(&[("ti tle", "x")])).unwrap_err();
        assert!(matches!(err, Error::MalformedQuery { .. }));

        let err = QuerySpec::from_params(&params(&[("sort", "title; DROP")])).unwrap_err();
        assert!(matches!(err, Error::MalformedQuery { .. }));
    }

    #[test]
    fn test_sort_parsing() {
        let spec = QuerySpec::from_params(&params(&[("sort", "-duration,title")])).unwrap();
        assert_eq!(
            spec.sort,
            vec![
                SortKey {
                    field: "duration".to_string(),
                    direction: SortDirection::Desc,
                },
                SortKey {
                    field: "title".to_string(),
                    direction: SortDirection::Asc,
                },
            ]
        );
    }

    #[test]
    fn test_empty_sort_value_falls_back_to_default() {
        let spec = QuerySpec::from_params(&params(&[("sort", "")])).unwrap();
        assert_eq!(spec.sort[0].field, "created_at");
        assert_eq!(spec.sort[0].direction, SortDirection::Desc);
    }

    #[test]
    fn test_fields_parsing_dedupes() {
        let spec =
            QuerySpec::from_params(&params(&[("fields", "title,artist,title")])).unwrap();
        assert_eq!(
            spec.fields,
            Some(vec!["title".to_string(), "artist".to_string()])
        );
    }

    #[test]
    fn test_pagination_silent_degrade() {
        // Non-numeric, zero, and negative inputs all fall back to defaults.
        for (page, limit) in [("abc", "xyz"), ("0", "0"), ("-1", "-5"), ("", "")] {
            let spec = QuerySpec::from_params(&params(&[("page", page), ("limit", limit)]))
                .unwrap();
            assert_eq!(spec.page, 1, "page input {page:?}");
            assert_eq!(spec.limit, 100, "limit input {limit:?}");
        }
    }

    #[test]
    fn test_offset_computation() {
        let spec = QuerySpec::from_params(&params(&[("page", "3"), ("limit", "25")])).unwrap();
        assert_eq!(spec.page, 3);
        assert_eq!(spec.limit, 25);
        assert_eq!(spec.offset(), 50);
    }

    #[test]
    fn test_search_param() {
        let spec = QuerySpec::from_params(&params(&[("search", "lofi beats")])).unwrap();
        assert_eq!(spec.search.as_deref(), Some("lofi beats"));

        let spec = QuerySpec::from_params(&params(&[("search", "")])).unwrap();
        assert!(spec.search.is_none());
    }
}
