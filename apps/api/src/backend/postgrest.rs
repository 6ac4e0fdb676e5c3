use std::fmt::Display;

/// Sort direction for `order=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Query-string builder for the store's REST tables.
///
/// Produces the PostgREST filter grammar: `select=*`, `column=eq.value`,
/// `order=column.desc`, `limit=n`. Parameters keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(columns: &str) -> Self {
        Self::new().param("select", columns)
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    pub fn order(self, column: &str, direction: Direction) -> Self {
        self.param("order", format!("{column}.{}", direction.as_str()))
    }

    /// Orders the rows of an embedded resource, e.g. `comments.order=created_at.asc`.
    pub fn order_embedded(self, resource: &str, column: &str, direction: Direction) -> Self {
        self.param(
            &format!("{resource}.order"),
            format!("{column}.{}", direction.as_str()),
        )
    }

    pub fn limit(self, n: usize) -> Self {
        self.param("limit", n.to_string())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Encoded form, used for logging.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }
}
