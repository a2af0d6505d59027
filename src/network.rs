//! In-memory Mesh Network model. Built and kept up to date by the provisioner/network manager, only
//! queried by the group control screen (apart from renaming a group through the edit flow).
use crate::access::ModelIdentifier;
use crate::address::{GroupAddress, UnicastAddress};
use crate::crypto::key::AppKey;
use crate::mesh::{AppKeyIndex, NetKeyIndex};
use core::fmt::{Display, Error, Formatter};

/// Named Group Address models can subscribe to.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub name: String,
    pub address: GroupAddress,
    #[cfg_attr(feature = "serde-1", serde(default))]
    pub parent: Option<GroupAddress>,
}
impl Group {
    pub fn new(name: impl Into<String>, address: GroupAddress) -> Self {
        Self {
            name: name.into(),
            address,
            parent: None,
        }
    }
}
/// Named Application Key. Two `ApplicationKey`s are the same key if their indexes match.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplicationKey {
    pub name: String,
    pub index: AppKeyIndex,
    pub bound_net_key: NetKeyIndex,
    pub key: AppKey,
}
impl ApplicationKey {
    pub fn new(
        name: impl Into<String>,
        index: AppKeyIndex,
        bound_net_key: NetKeyIndex,
        key: AppKey,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            bound_net_key,
            key,
        }
    }
}
impl PartialEq for ApplicationKey {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}
impl Eq for ApplicationKey {}

/// A Model instance on an Element with its App Key bindings and Group subscriptions.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    pub identifier: ModelIdentifier,
    #[cfg_attr(feature = "serde-1", serde(default))]
    bound_keys: Vec<AppKeyIndex>,
    #[cfg_attr(feature = "serde-1", serde(default))]
    subscriptions: Vec<GroupAddress>,
}
impl Model {
    pub fn new(identifier: ModelIdentifier) -> Self {
        Self {
            identifier,
            bound_keys: Vec::new(),
            subscriptions: Vec::new(),
        }
    }
    /// Binds `index` to the model. Binding the same key twice is a no-op.
    pub fn bind(&mut self, index: AppKeyIndex) -> &mut Self {
        if !self.bound_keys.contains(&index) {
            self.bound_keys.push(index);
        }
        self
    }
    /// Subscribes the model to `group`. Subscribing twice is a no-op.
    pub fn subscribe(&mut self, group: GroupAddress) -> &mut Self {
        if !self.subscriptions.contains(&group) {
            self.subscriptions.push(group);
        }
        self
    }
    pub fn bound_keys(&self) -> &[AppKeyIndex] {
        &self.bound_keys[..]
    }
    pub fn subscriptions(&self) -> &[GroupAddress] {
        &self.subscriptions[..]
    }
    pub fn is_subscribed_to(&self, group: GroupAddress) -> bool {
        self.subscriptions.contains(&group)
    }
}
#[derive(Clone, Eq, PartialEq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    #[cfg_attr(feature = "serde-1", serde(default))]
    pub name: Option<String>,
    pub models: Vec<Model>,
}
impl Element {
    pub fn new(models: Vec<Model>) -> Self {
        Self { name: None, models }
    }
}
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub name: String,
    /// Unicast Address of the primary element. The rest follow sequentially.
    pub primary_address: UnicastAddress,
    pub elements: Vec<Element>,
}
impl Node {
    pub fn models(&self) -> impl Iterator<Item = &'_ Model> + '_ {
        self.elements.iter().flat_map(|e| e.models.iter())
    }
}
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub enum NetworkError {
    UnknownGroup(GroupAddress),
    DuplicateGroup(GroupAddress),
    UnknownApplicationKey(AppKeyIndex),
    DuplicateApplicationKey(AppKeyIndex),
}
impl Display for NetworkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            NetworkError::UnknownGroup(g) => write!(f, "no group with address {}", g),
            NetworkError::DuplicateGroup(g) => write!(f, "group {} already exists", g),
            NetworkError::UnknownApplicationKey(i) => write!(f, "no application key {}", i),
            NetworkError::DuplicateApplicationKey(i) => {
                write!(f, "application key {} already exists", i)
            }
        }
    }
}
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshNetwork {
    pub name: String,
    #[cfg_attr(feature = "serde-1", serde(default))]
    nodes: Vec<Node>,
    #[cfg_attr(feature = "serde-1", serde(default))]
    application_keys: Vec<ApplicationKey>,
    #[cfg_attr(feature = "serde-1", serde(default))]
    groups: Vec<Group>,
}
impl MeshNetwork {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
    pub fn nodes(&self) -> &[Node] {
        &self.nodes[..]
    }
    pub fn groups(&self) -> &[Group] {
        &self.groups[..]
    }
    pub fn application_keys(&self) -> &[ApplicationKey] {
        &self.application_keys[..]
    }
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node)
    }
    pub fn add_application_key(&mut self, key: ApplicationKey) -> Result<(), NetworkError> {
        if self.application_key(key.index).is_some() {
            return Err(NetworkError::DuplicateApplicationKey(key.index));
        }
        self.application_keys.push(key);
        Ok(())
    }
    pub fn add_group(&mut self, group: Group) -> Result<(), NetworkError> {
        if self.group(group.address).is_some() {
            return Err(NetworkError::DuplicateGroup(group.address));
        }
        self.groups.push(group);
        Ok(())
    }
    pub fn group(&self, address: GroupAddress) -> Option<&Group> {
        self.groups.iter().find(|g| g.address == address)
    }
    /// Renames the group at `address` and returns the updated group.
    pub fn rename_group(
        &mut self,
        address: GroupAddress,
        name: impl Into<String>,
    ) -> Result<&Group, NetworkError> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.address == address)
            .ok_or(NetworkError::UnknownGroup(address))?;
        group.name = name.into();
        Ok(group)
    }
    pub fn application_key(&self, index: AppKeyIndex) -> Option<&ApplicationKey> {
        self.application_keys.iter().find(|k| k.index == index)
    }
    /// Every model subscribed to `group`, in node, element then model order.
    pub fn models_subscribed_to<'a>(
        &'a self,
        group: &Group,
    ) -> impl Iterator<Item = &'a Model> + 'a {
        let address = group.address;
        self.nodes
            .iter()
            .flat_map(|node| node.models())
            .filter(move |m| m.is_subscribed_to(address))
    }
    /// The network's Application Keys `model` is bound to, in the network's key order. Each key is
    /// yielded once however many times it's bound. Bindings to unknown keys are skipped.
    pub fn bound_application_keys<'a>(
        &'a self,
        model: &'a Model,
    ) -> impl Iterator<Item = &'a ApplicationKey> + 'a {
        self.application_keys
            .iter()
            .filter(move |k| model.bound_keys().contains(&k.index))
    }
}
