use super::spec::{QuerySpec, SortDirection};

/// A rendered SurrealQL statement plus its bind parameters. Filter values
/// always travel as binds; only pre-validated identifiers and integers are
/// interpolated into the statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurqlQuery {
    pub sql: String,
    pub binds: Vec<(String, String)>,
}

/// Renders the song listing statement for a spec.
///
/// Filter and sort run in an inner select over the full field set; the outer
/// select applies only the projection, so hidden fields still participate in
/// filtering and ordering. Pagination is applied in the inner select, after
/// ordering.
pub fn render_song_list(spec: &QuerySpec) -> SurqlQuery {
    let mut binds = Vec::new();
    let mut conditions = Vec::new();

    for (i, constraint) in spec.constraints.iter().enumerate() {
        let name = format!("p{i}");
        conditions.push(format!("{} {} ${}", constraint.field, constraint.op.surql(), name));
        binds.push((name, constraint.value.clone()));
    }

    if let Some(term) = &spec.search {
        conditions.push(
            "(string::lowercase(title) CONTAINS string::lowercase($search) \
             OR string::lowercase(artist) CONTAINS string::lowercase($search))"
                .to_string(),
        );
        binds.push(("search".to_string(), term.clone()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let order_clause = spec
        .sort
        .iter()
        .map(|key| {
            let dir = match key.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            format!("{} {}", key.field, dir)
        })
        .collect::<Vec<_>>()
        .join(", ");

    let inner = format!(
        "SELECT * FROM song{} ORDER BY {} LIMIT {} START {}",
        where_clause,
        order_clause,
        spec.limit,
        spec.offset()
    );

    let projection = match &spec.fields {
        None => "* OMIT created_at".to_string(),
        Some(fields) => {
            let mut selected = vec!["id".to_string()];
            for field in fields {
                if field != "id" {
                    selected.push(field.clone());
                }
            }
            selected.join(", ")
        }
    };

    let sql = format!("SELECT {projection} FROM ({inner});");

    SurqlQuery { sql, binds }
}
