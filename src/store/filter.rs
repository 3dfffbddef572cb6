use serde::Serialize;

/// Default page size for transactional tables.
pub const PAGE_LIMIT: u32 = 20;
/// Reference tables (patients, departments, doctors) are small; one page
/// of this size is treated as the full collection.
pub const REFERENCE_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// Structured description of the conditions sent with a list operation:
/// exact-match equality, an OR group of substring matches, sort and paging.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    equals: Vec<(String, String)>,
    contains_any: Vec<(String, String)>,
    sort: Vec<(String, SortDir)>,
    limit: u32,
    offset: u32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self {
            equals: Vec::new(),
            contains_any: Vec::new(),
            sort: Vec::new(),
            limit: PAGE_LIMIT,
            offset: 0,
        }
    }

    /// One page of a reference table, sorted by display name.
    pub fn reference() -> Self {
        Self::new()
            .order_by("Name", SortDir::Asc)
            .limit(REFERENCE_PAGE_LIMIT)
    }

    pub fn eq(mut self, field: &str, value: &str) -> Self {
        self.equals.push((field.to_string(), value.to_string()));
        self
    }

    /// Substring match on any of `fields`, combined with logical OR.
    pub fn contains_any(mut self, fields: &[&str], term: &str) -> Self {
        for field in fields {
            self.contains_any
                .push((field.to_string(), term.to_string()));
        }
        self
    }

    pub fn order_by(mut self, field: &str, dir: SortDir) -> Self {
        self.sort.push((field.to_string(), dir));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Wire form of the query, with the table's read field allow-list.
    pub fn to_wire(&self, fields: &[&str]) -> WireQuery {
        let where_ = self
            .equals
            .iter()
            .map(|(field, value)| WireCondition {
                field_name: field.clone(),
                operator: "ExactMatch".to_string(),
                values: vec![value.clone()],
            })
            .collect();

        let where_groups = if self.contains_any.is_empty() {
            Vec::new()
        } else {
            vec![WireGroup {
                operator: "OR".to_string(),
                sub_groups: self
                    .contains_any
                    .iter()
                    .map(|(field, term)| WireSubGroup {
                        conditions: vec![WireCondition {
                            field_name: field.clone(),
                            operator: "Contains".to_string(),
                            values: vec![term.clone()],
                        }],
                        operator: String::new(),
                    })
                    .collect(),
            }]
        };

        let order_by = self
            .sort
            .iter()
            .map(|(field, dir)| WireOrder {
                field_name: field.clone(),
                sort_type: match dir {
                    SortDir::Asc => "ASC".to_string(),
                    SortDir::Desc => "DESC".to_string(),
                },
            })
            .collect();

        WireQuery {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            paging: WirePaging {
                limit: self.limit,
                offset: self.offset,
            },
            where_,
            where_groups,
            order_by,
        }
    }
}

/* -------------------------
   Wire query types
--------------------------*/

#[derive(Debug, Clone, Serialize)]
pub struct WireQuery {
    pub fields: Vec<String>,
    #[serde(rename = "pagingInfo")]
    pub paging: WirePaging,
    #[serde(rename = "where", skip_serializing_if = "Vec::is_empty")]
    pub where_: Vec<WireCondition>,
    #[serde(rename = "whereGroups", skip_serializing_if = "Vec::is_empty")]
    pub where_groups: Vec<WireGroup>,
    #[serde(rename = "orderBy", skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<WireOrder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WirePaging {
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireCondition {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    pub operator: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireGroup {
    pub operator: String,
    #[serde(rename = "subGroups")]
    pub sub_groups: Vec<WireSubGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireSubGroup {
    pub conditions: Vec<WireCondition>,
    pub operator: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireOrder {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "SortType")]
    pub sort_type: String,
}
