//! Small sample network used by the tests and by `mesh_cli generate`.
use crate::access::ModelIdentifier;
use crate::address::{GroupAddress, UnicastAddress};
use crate::crypto::key::AppKey;
use crate::mesh::{AppKeyIndex, CompanyID, KeyIndex, ModelID, NetKeyIndex};
use crate::models::{GENERIC_LEVEL_SERVER, GENERIC_ONOFF_SERVER};
use crate::network::{ApplicationKey, Element, Group, MeshNetwork, Model, Node};

pub const HOME_KEY: AppKeyIndex = AppKeyIndex(KeyIndex::new_masked(0));
pub const GUEST_KEY: AppKeyIndex = AppKeyIndex(KeyIndex::new_masked(1));
pub const PRIMARY_NET_KEY: NetKeyIndex = NetKeyIndex(KeyIndex::new_masked(0));
pub const LIVING_ROOM: GroupAddress = GroupAddress::from_masked_u16(0xC000);
pub const KITCHEN: GroupAddress = GroupAddress::from_masked_u16(0xC001);

/// Nordic Semiconductor (`0x0059`) vendor model `0x0001`.
pub fn vendor_model_identifier() -> ModelIdentifier {
    ModelIdentifier::new_vendor(ModelID(0x0001), CompanyID(0x0059))
}
fn model(identifier: ModelIdentifier, keys: &[AppKeyIndex], groups: &[GroupAddress]) -> Model {
    let mut model = Model::new(identifier);
    for &key in keys {
        model.bind(key);
    }
    for &group in groups {
        model.subscribe(group);
    }
    model
}
/// Network with two Application Keys (`Home`, `Guest`), two groups (`Living Room`, `Kitchen`) and
/// three nodes:
/// - `Lamp 1`: OnOff (Home) and Level (Home, Guest) on separate elements, both in the Living Room.
/// - `Lamp 2`: OnOff (Home, Guest) in the Living Room and the Kitchen.
/// - `Sensor`: a vendor model (Home) in the Living Room and an unsubscribed Configuration Server.
pub fn sample_network() -> MeshNetwork {
    let mut network = MeshNetwork::new("Sample Home");
    let keys = [
        ("Home", HOME_KEY, "63964771734fbd76e3b40519d1d94a48"),
        ("Guest", GUEST_KEY, "3216d1509884b533248541792b877f98"),
    ];
    for &(name, index, hex) in &keys {
        let key = AppKey::from_hex(hex).expect("sample keys are valid hex");
        network
            .add_application_key(ApplicationKey::new(name, index, PRIMARY_NET_KEY, key))
            .expect("sample keys are unique");
    }
    for &(name, address) in &[("Living Room", LIVING_ROOM), ("Kitchen", KITCHEN)] {
        network
            .add_group(Group::new(name, address))
            .expect("sample groups are unique");
    }
    network.add_node(Node {
        name: "Lamp 1".to_owned(),
        primary_address: UnicastAddress::new(0x0001),
        elements: vec![
            Element::new(vec![model(GENERIC_ONOFF_SERVER, &[HOME_KEY], &[LIVING_ROOM])]),
            Element::new(vec![model(
                GENERIC_LEVEL_SERVER,
                &[HOME_KEY, GUEST_KEY],
                &[LIVING_ROOM],
            )]),
        ],
    });
    network.add_node(Node {
        name: "Lamp 2".to_owned(),
        primary_address: UnicastAddress::new(0x0003),
        elements: vec![Element::new(vec![model(
            GENERIC_ONOFF_SERVER,
            &[HOME_KEY, GUEST_KEY],
            &[LIVING_ROOM, KITCHEN],
        )])],
    });
    network.add_node(Node {
        name: "Sensor".to_owned(),
        primary_address: UnicastAddress::new(0x0004),
        elements: vec![Element::new(vec![
            model(ModelIdentifier::new_sig(ModelID(0x0000)), &[], &[]),
            model(vendor_model_identifier(), &[HOME_KEY], &[LIVING_ROOM]),
        ])],
    });
    network
}
