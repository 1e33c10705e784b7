use serde::Serialize;

/// Back-office tables cleared when no explicit list is given, dependants
/// first so foreign keys never point at already-emptied parents.
pub const BACK_OFFICE_TABLES: &[&str] = &["payments", "shipments", "customer_accounts", "clients"];

/// A named relation a bulk operation is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetTable {
    pub name: String,
    /// Treat "no such table" as `SkippedNotFound` instead of `Failed`.
    pub may_not_exist: bool,
}

impl TargetTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            may_not_exist: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            may_not_exist: true,
        }
    }
}

/// Resolves the table list of a bulk command.
///
/// Names are trimmed and empty entries dropped while keeping the given order.
/// An empty list falls back to [`BACK_OFFICE_TABLES`]. Tables named on the
/// command line, like the defaults, may be absent from a partially migrated
/// store.
pub fn resolve(names: &[String]) -> Vec<TargetTable> {
    let explicit: Vec<TargetTable> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| TargetTable::optional(name))
        .collect();

    if explicit.is_empty() {
        BACK_OFFICE_TABLES.iter().map(|name| TargetTable::optional(*name)).collect()
    } else {
        explicit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_falls_back_to_back_office_tables() {
        let tables = resolve(&[]);
        let names: Vec<&str> = tables.iter().map(|table| table.name.as_str()).collect();
        assert_eq!(names, BACK_OFFICE_TABLES);
        assert!(tables.iter().all(|table| table.may_not_exist));
    }

    #[test]
    fn explicit_list_keeps_order_and_drops_blanks() {
        let tables = resolve(&["clients".to_string(), " ".to_string(), " shipments ".to_string()]);
        assert_eq!(tables, vec![TargetTable::optional("clients"), TargetTable::optional("shipments")]);
    }
}
