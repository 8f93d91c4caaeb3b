//! In-memory model carried by an online working copy.
//!
//! This is the client-side view exchanged with the model endpoint: a root
//! holding modules, each with one domain model and its entities. It is
//! mutated locally between checkout and commit and serialized as JSON.

use serde::{Deserialize, Serialize};

/// Position of an entity on the domain model canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Entity {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            documentation: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainModel {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl DomainModel {
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub domain_model: DomainModel,
}

impl Module {
    /// Append a new, empty module to the model and return it for editing.
    pub fn create_in(model: &mut Model, name: impl Into<String>) -> &mut Module {
        model.modules.push(Module {
            name: name.into(),
            domain_model: DomainModel::default(),
        });
        let last = model.modules.len() - 1;
        &mut model.modules[last]
    }
}

/// Root of a working copy's model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Model {
    /// Domain models of all modules, paired with their qualified name.
    pub fn all_domain_models(&self) -> impl Iterator<Item = (&str, &DomainModel)> {
        self.modules
            .iter()
            .map(|m| (m.name.as_str(), &m.domain_model))
    }

    /// Domain model by qualified name (the owning module's name).
    pub fn domain_model(&self, qualified_name: &str) -> Option<&DomainModel> {
        self.modules
            .iter()
            .find(|m| m.name == qualified_name)
            .map(|m| &m.domain_model)
    }

    pub fn domain_model_mut(&mut self, qualified_name: &str) -> Option<&mut DomainModel> {
        self.modules
            .iter_mut()
            .find(|m| m.name == qualified_name)
            .map(|m| &mut m.domain_model)
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_module_and_entity() {
        let mut model = Model::default();
        Module::create_in(&mut model, "MyFirstModule");

        let dm = model.domain_model_mut("MyFirstModule").unwrap();
        dm.add_entity(Entity::new("Customer", Location { x: 100, y: 100 }));

        let names: Vec<&str> = model.all_domain_models().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["MyFirstModule"]);
        assert!(model
            .domain_model("MyFirstModule")
            .unwrap()
            .entity("Customer")
            .is_some());
        assert!(model.domain_model("Missing").is_none());
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let model: Model = serde_json::from_value(json!({
            "modules": [
                { "name": "MyFirstModule" },
                { "name": "Admin", "domainModel": { "entities": [ { "name": "Account" } ] } }
            ]
        }))
        .unwrap();

        assert_eq!(model.modules.len(), 2);
        assert!(model.domain_model("MyFirstModule").unwrap().entities.is_empty());
        let account = model.domain_model("Admin").unwrap().entity("Account").unwrap();
        assert_eq!(account.location, Location::default());
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut model = Model::default();
        Module::create_in(&mut model, "M");
        let value = serde_json::to_value(&model).unwrap();
        assert!(value["modules"][0].get("domainModel").is_some());
    }
}
