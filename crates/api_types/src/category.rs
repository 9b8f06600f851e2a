//! Categories group entries for display and reporting.

use serde::Serialize;
use serde_json::Value;

use crate::{Resource, ResourceId, fields};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Option<ResourceId>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Resource for Category {
    const COLLECTION: &'static str = "api/categories";
    const LABEL: &'static str = "category";

    fn id(&self) -> Option<ResourceId> {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn from_json(raw: &Value) -> Self {
        Self {
            id: fields::id(raw, "id"),
            name: fields::string(raw, "name"),
            description: fields::string(raw, "description"),
        }
    }

    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_json_ignores_unknown_fields() {
        let category = Category::from_json(&json!({
            "id": 3,
            "name": "Salary",
            "description": "Monthly pay",
            "color": "green"
        }));

        assert_eq!(
            category,
            Category {
                id: Some(3),
                name: Some("Salary".to_string()),
                description: Some("Monthly pay".to_string()),
            }
        );
    }

    #[test]
    fn from_json_of_non_object_is_default() {
        assert_eq!(Category::from_json(&json!([1, 2])), Category::default());
        assert_eq!(Category::from_json(&Value::Null), Category::default());
    }

    #[test]
    fn wire_shape_round_trips() {
        let category = Category {
            id: Some(9),
            name: Some("Leisure".to_string()),
            description: None,
        };
        let wire = category.to_json();

        assert_eq!(wire, json!({"id": 9, "name": "Leisure", "description": null}));
        assert_eq!(Category::from_json(&wire), category);
        assert_eq!(Category::from_json(&wire), Category::from_json(&wire));
    }
}
