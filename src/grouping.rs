//! Model Grouping. Buckets the models subscribed to a group by Application Key and model type so
//! they can be shown as grid sections (one per key) and rows (one per model type).
use crate::access::ModelIdentifier;
use crate::mesh::ModelID;
use crate::models::{GENERIC_LEVEL_SERVER, GENERIC_ONOFF_SERVER};
use crate::network::{ApplicationKey, Group, MeshNetwork};

/// Which models get a grid cell. Matches on the 16-bit model identifier only, so a vendor model
/// reusing a supported identifier is supported too.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportedModels(Vec<ModelID>);
impl SupportedModels {
    pub fn new(model_ids: Vec<ModelID>) -> Self {
        Self(model_ids)
    }
    pub fn is_supported(&self, model: &ModelIdentifier) -> bool {
        self.0.contains(&model.model_id())
    }
    pub fn model_ids(&self) -> &[ModelID] {
        &self.0[..]
    }
}
impl Default for SupportedModels {
    /// Generic OnOff Server and Generic Level Server.
    fn default() -> Self {
        Self(vec![
            GENERIC_ONOFF_SERVER.model_id(),
            GENERIC_LEVEL_SERVER.model_id(),
        ])
    }
}
/// One grid row: how many models of one type share the section's key.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct ModelCount {
    /// `ModelIdentifier::composite_id`.
    pub model_id: u32,
    pub count: usize,
}
/// One grid section. Lives only as long as the screen showing it.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Section {
    pub application_key: ApplicationKey,
    pub models: Vec<ModelCount>,
}
impl Section {
    pub fn new(application_key: ApplicationKey) -> Self {
        Self {
            application_key,
            models: Vec::new(),
        }
    }
    /// Counts one more model with `model_id`, appending a new row the first time it's seen.
    pub fn count(&mut self, model_id: u32) {
        match self.models.iter_mut().find(|m| m.model_id == model_id) {
            Some(entry) => entry.count += 1,
            None => self.models.push(ModelCount { model_id, count: 1 }),
        }
    }
    pub fn total(&self) -> usize {
        self.models.iter().map(|m| m.count).sum()
    }
}
/// Sections in the order their Application Keys were first seen.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Sections(Vec<Section>);
impl Sections {
    pub fn new() -> Self {
        Self(Vec::new())
    }
    /// Groups every `(model, keys)` pair. Each supported model is counted once in the section of
    /// every key it's bound to.
    pub fn group<'a, Models, Keys>(models: Models, supported: &SupportedModels) -> Self
    where
        Models: IntoIterator<Item = (ModelIdentifier, Keys)>,
        Keys: IntoIterator<Item = &'a ApplicationKey>,
    {
        let mut sections = Sections::new();
        for (model, keys) in models {
            for key in keys {
                if supported.is_supported(&model) {
                    sections.section_mut(key).count(model.composite_id());
                }
            }
        }
        sections
    }
    /// Groups the models in `network` subscribed to `group`.
    pub fn for_group(network: &MeshNetwork, group: &Group, supported: &SupportedModels) -> Self {
        Self::group(
            network
                .models_subscribed_to(group)
                .map(|model| (model.identifier, network.bound_application_keys(model))),
            supported,
        )
    }
    /// Find-or-create the section for `key`.
    fn section_mut(&mut self, key: &ApplicationKey) -> &mut Section {
        let index = match self.0.iter().position(|s| &s.application_key == key) {
            Some(index) => index,
            None => {
                self.0.push(Section::new(key.clone()));
                self.0.len() - 1
            }
        };
        &mut self.0[index]
    }
    pub fn get(&self, index: usize) -> Option<&Section> {
        self.0.get(index)
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> core::slice::Iter<'_, Section> {
        self.0.iter()
    }
}
impl<'a> IntoIterator for &'a Sections {
    type Item = &'a Section;
    type IntoIter = core::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
