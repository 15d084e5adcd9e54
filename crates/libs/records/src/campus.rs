use serde::{Deserialize, Serialize};

/// A campus, as configured for the importer.
///
/// The name doubles as the alias name and the routing value of the campus's
/// fake index; the Salesforce account id scopes the SOQL queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campus {
    pub name: String,
    pub salesforce_account_id: String,
}

impl Campus {
    /// Name of the alias standing in for this campus's index.
    pub fn alias(&self) -> &str {
        &self.name
    }
}

/// Checks that campus names are unique, so that the aliases partition the
/// shared index.
pub fn validate_campuses(campuses: &[Campus]) -> Result<(), String> {
    let mut seen = std::collections::BTreeSet::new();
    for campus in campuses {
        if campus.name.is_empty() {
            return Err("campus with an empty name".to_string());
        }
        if !seen.insert(campus.name.as_str()) {
            return Err(format!("duplicate campus name '{}'", campus.name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campus(name: &str) -> Campus {
        Campus {
            name: name.to_string(),
            salesforce_account_id: format!("001A{name}"),
        }
    }

    #[test]
    fn accepts_distinct_campuses() {
        assert!(validate_campuses(&[campus("bulls"), campus("rauner")]).is_ok());
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = validate_campuses(&[campus("bulls"), campus("bulls")]).unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn rejects_empty_names() {
        assert!(validate_campuses(&[campus("")]).is_err());
    }
}
