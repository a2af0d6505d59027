//! Grid cells. Each cell controls every model of one type bound to one Application Key in the
//! group and asks its [`CellDelegate`] (the group control screen) to send the messages.
use crate::mesh::AppKeyIndex;
use crate::models::generics::{level, onoff};
use crate::models::{MeshMessage, GENERIC_LEVEL_SERVER, GENERIC_ONOFF_SERVER};
use crate::random::rand_u8;

/// Receives the messages the cells want sent to their group.
pub trait CellDelegate {
    /// Send `message` to the group using the Application Key at `application_key`. `description`
    /// is shown to the user while the message is in flight.
    fn send(&mut self, message: &dyn MeshMessage, description: &str, application_key: AppKeyIndex);
}
/// Which cell a grid row is rendered with.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub enum CellKind {
    OnOff,
    Level,
}
impl CellKind {
    /// Cell for a composite model identifier. Only SIG Generic OnOff/Level Servers have cells.
    pub fn for_model(model_id: u32) -> Option<CellKind> {
        if model_id == GENERIC_ONOFF_SERVER.composite_id() {
            Some(CellKind::OnOff)
        } else if model_id == GENERIC_LEVEL_SERVER.composite_id() {
            Some(CellKind::Level)
        } else {
            None
        }
    }
}
/// Transaction Identifier. Starts at a random value and wraps.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
struct Tid(u8);
impl Tid {
    fn random() -> Tid {
        Tid(rand_u8())
    }
    fn next(&mut self) -> u8 {
        let tid = self.0;
        self.0 = self.0.wrapping_add(1);
        tid
    }
}

#[derive(Clone, Debug)]
pub struct OnOffCell {
    application_key: AppKeyIndex,
    pub number_of_devices: usize,
    tid: Tid,
}
impl OnOffCell {
    pub fn new(application_key: AppKeyIndex, number_of_devices: usize) -> Self {
        Self {
            application_key,
            number_of_devices,
            tid: Tid::random(),
        }
    }
    pub fn on(&mut self, delegate: &mut dyn CellDelegate) {
        self.set(true, delegate)
    }
    pub fn off(&mut self, delegate: &mut dyn CellDelegate) {
        self.set(false, delegate)
    }
    fn set(&mut self, on: bool, delegate: &mut dyn CellDelegate) {
        let message = onoff::SetUnacknowledged::new(on, self.tid.next());
        let description = if on { "Turning ON..." } else { "Turning OFF..." };
        delegate.send(&message, description, self.application_key)
    }
}

#[derive(Clone, Debug)]
pub struct LevelCell {
    application_key: AppKeyIndex,
    pub number_of_devices: usize,
    tid: Tid,
}
impl LevelCell {
    /// Level change of one increase/decrease tap, an eighth of the full range.
    pub const STEP: i32 = 8192;

    pub fn new(application_key: AppKeyIndex, number_of_devices: usize) -> Self {
        Self {
            application_key,
            number_of_devices,
            tid: Tid::random(),
        }
    }
    pub fn increase(&mut self, delegate: &mut dyn CellDelegate) {
        self.delta(Self::STEP, "Increasing level...", delegate)
    }
    pub fn decrease(&mut self, delegate: &mut dyn CellDelegate) {
        self.delta(-Self::STEP, "Decreasing level...", delegate)
    }
    pub fn min(&mut self, delegate: &mut dyn CellDelegate) {
        self.set(i16::min_value(), "Setting minimum level...", delegate)
    }
    pub fn max(&mut self, delegate: &mut dyn CellDelegate) {
        self.set(i16::max_value(), "Setting maximum level...", delegate)
    }
    fn delta(&mut self, delta: i32, description: &str, delegate: &mut dyn CellDelegate) {
        let message = level::DeltaSet::unacknowledged(delta, self.tid.next());
        delegate.send(&message, description, self.application_key)
    }
    fn set(&mut self, level: i16, description: &str, delegate: &mut dyn CellDelegate) {
        let message = level::Set::unacknowledged(level, self.tid.next());
        delegate.send(&message, description, self.application_key)
    }
}
/// Any cell the grid can show.
#[derive(Clone, Debug)]
pub enum GroupCell {
    OnOff(OnOffCell),
    Level(LevelCell),
}
impl GroupCell {
    pub fn new(kind: CellKind, application_key: AppKeyIndex, number_of_devices: usize) -> Self {
        match kind {
            CellKind::OnOff => GroupCell::OnOff(OnOffCell::new(application_key, number_of_devices)),
            CellKind::Level => GroupCell::Level(LevelCell::new(application_key, number_of_devices)),
        }
    }
    pub fn kind(&self) -> CellKind {
        match self {
            GroupCell::OnOff(_) => CellKind::OnOff,
            GroupCell::Level(_) => CellKind::Level,
        }
    }
    pub fn number_of_devices(&self) -> usize {
        match self {
            GroupCell::OnOff(c) => c.number_of_devices,
            GroupCell::Level(c) => c.number_of_devices,
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccessPayload;

    #[derive(Default)]
    struct Recorder(Vec<(AccessPayload, String, AppKeyIndex)>);
    impl CellDelegate for Recorder {
        fn send(
            &mut self,
            message: &dyn MeshMessage,
            description: &str,
            application_key: AppKeyIndex,
        ) {
            self.0.push((
                message.to_access_payload().unwrap(),
                description.to_owned(),
                application_key,
            ))
        }
    }
    #[test]
    fn test_cell_kind() {
        assert_eq!(CellKind::for_model(0x1000), Some(CellKind::OnOff));
        assert_eq!(CellKind::for_model(0x1002), Some(CellKind::Level));
        assert_eq!(CellKind::for_model(0x0059_1000), None);
        assert_eq!(CellKind::for_model(0x1001), None);
    }
    #[test]
    fn test_onoff_cell() {
        let mut recorder = Recorder::default();
        let mut cell = OnOffCell::new(AppKeyIndex::new(2), 3);
        cell.on(&mut recorder);
        cell.off(&mut recorder);
        let (on, description, key) = &recorder.0[0];
        assert_eq!(on.opcode, onoff::SET_UNACKNOWLEDGED);
        assert_eq!(on.parameters[0], 1);
        assert_eq!(description, "Turning ON...");
        assert_eq!(*key, AppKeyIndex::new(2));
        let (off, _, _) = &recorder.0[1];
        assert_eq!(off.parameters[0], 0);
        // Every send is a new transaction.
        assert_eq!(off.parameters[1], on.parameters[1].wrapping_add(1));
    }
    #[test]
    fn test_level_cell() {
        let mut recorder = Recorder::default();
        let mut cell = LevelCell::new(AppKeyIndex::new(0), 1);
        cell.increase(&mut recorder);
        cell.decrease(&mut recorder);
        cell.min(&mut recorder);
        cell.max(&mut recorder);
        let payloads: Vec<&AccessPayload> = recorder.0.iter().map(|(p, _, _)| p).collect();
        assert_eq!(payloads[0].opcode, level::DELTA_SET_UNACKNOWLEDGED);
        assert_eq!(&payloads[0].parameters[..4], &8192_i32.to_le_bytes());
        assert_eq!(&payloads[1].parameters[..4], &(-8192_i32).to_le_bytes());
        assert_eq!(payloads[2].opcode, level::SET_UNACKNOWLEDGED);
        assert_eq!(&payloads[2].parameters[..2], &[0x00, 0x80]);
        assert_eq!(&payloads[3].parameters[..2], &[0xFF, 0x7F]);
    }
    #[test]
    fn test_tid_wraps() {
        let mut tid = Tid(0xFF);
        assert_eq!(tid.next(), 0xFF);
        assert_eq!(tid.next(), 0x00);
    }
}
