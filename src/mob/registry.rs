use super::mob::Mob;
use super::template::MobTemplate;
use crate::item::RegistryError;
use std::collections::HashMap;
use std::path::Path;

/// Built-in mob table
const DEFAULT_MOBS: &str = include_str!("../../assets/mobs.json");

/// All known mob templates, keyed by id
#[derive(Debug, Clone, Default)]
pub struct MobRegistry {
    mobs: HashMap<String, MobTemplate>,
}

impl MobRegistry {
    pub fn new() -> Self {
        MobRegistry {
            mobs: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in mob table registered
    pub fn create_default() -> Self {
        let mut registry = Self::new();

        match registry.load_from_str(DEFAULT_MOBS) {
            Ok(count) => log::debug!("Registered {} built-in mobs", count),
            Err(e) => log::error!("Built-in mob table is broken: {}", e),
        }

        registry
    }

    pub fn register(&mut self, template: MobTemplate) -> Result<(), RegistryError> {
        if template.id.is_empty() {
            return Err(RegistryError::InvalidTemplate {
                id: template.name.clone(),
                reason: "empty id".to_string(),
            });
        }
        if template.max_health <= 0.0 {
            return Err(RegistryError::InvalidTemplate {
                id: template.id.clone(),
                reason: "max health must be positive".to_string(),
            });
        }
        if self.mobs.contains_key(&template.id) {
            return Err(RegistryError::Duplicate(template.id));
        }

        self.mobs.insert(template.id.clone(), template);
        Ok(())
    }

    pub fn load_from_str(&mut self, json: &str) -> Result<usize, RegistryError> {
        let templates: Vec<MobTemplate> = serde_json::from_str(json)?;
        let count = templates.len();

        for template in templates {
            self.register(template)?;
        }

        Ok(count)
    }

    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        self.load_from_str(&json)
    }

    pub fn get(&self, id: &str) -> Option<&MobTemplate> {
        self.mobs.get(id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.mobs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.mobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mobs.is_empty()
    }

    /// Template ids in sorted order, for editor palettes
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.mobs.keys().map(String::as_str).collect();
        ids.sort();
        ids
    }

    /// Spawns a mob of type `id` with its top-left corner at `(x, y)`
    pub fn create(&self, id: &str, x: f32, y: f32) -> Option<Mob> {
        self.mobs.get(id).map(|template| Mob::from_template(template, x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemRegistry;

    #[test]
    fn test_default_table_loads() {
        let registry = MobRegistry::create_default();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.ids(), vec!["cave_bat", "moon_wisp", "slime", "stone_golem"]);

        let golem = registry.get("stone_golem").unwrap();
        assert_eq!(golem.defense, 2.0);
        assert!(!golem.flying);
        assert_eq!(golem.drop_chance, 1.0);
    }

    #[test]
    fn test_every_drop_is_a_real_item() {
        let mobs = MobRegistry::create_default();
        let items = ItemRegistry::create_default();

        for id in mobs.ids() {
            for entry in &mobs.get(id).unwrap().drops {
                assert!(items.exists(&entry.item_id), "{} drops unknown {}", id, entry.item_id);
            }
        }
    }

    #[test]
    fn test_create_places_mob() {
        let registry = MobRegistry::create_default();
        let mob = registry.create("slime", 64.0, 32.0).unwrap();
        assert_eq!(mob.position(), (64.0, 32.0));
        assert_eq!(mob.health.max(), 6.0);
        assert!(registry.create("dragon", 0.0, 0.0).is_none());
    }

    #[test]
    fn test_rejects_duplicates_and_bad_templates() {
        let mut registry = MobRegistry::create_default();
        let slime = registry.get("slime").unwrap().clone();
        assert!(matches!(registry.register(slime.clone()), Err(RegistryError::Duplicate(_))));

        let ghost = MobTemplate {
            id: "ghost".to_string(),
            max_health: 0.0,
            ..slime
        };
        assert!(matches!(
            registry.register(ghost),
            Err(RegistryError::InvalidTemplate { .. })
        ));
    }
}
