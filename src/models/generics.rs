//! Generic OnOff and Generic Level messages (Mesh Model v1.0 Sections 3.2.1 and 3.2.2).
use crate::access::{Opcode, SigOpcode};
use crate::models::MessagePackError;
use core::convert::TryFrom;
use core::time::Duration;

const STEPS_MAX: u8 = 0x3E;
const STEPS_MASK: u8 = 0x3F;

/// Step resolution of a [`TransitionTime`] (upper 2 bits).
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub enum StepResolution {
    Milliseconds100 = 0b00,
    Seconds1 = 0b01,
    Seconds10 = 0b10,
    Minutes10 = 0b11,
}
impl StepResolution {
    pub fn step_millis(self) -> u64 {
        match self {
            StepResolution::Milliseconds100 => 100,
            StepResolution::Seconds1 => 1_000,
            StepResolution::Seconds10 => 10_000,
            StepResolution::Minutes10 => 600_000,
        }
    }
}
/// 8-bit Generic Default Transition Time. 6-bit step count + 2-bit resolution. `0x3F` (unknown)
/// can't be sent so it isn't representable.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct TransitionTime(u8);
impl TransitionTime {
    /// # Panics
    /// Panics if `steps > 0x3E`.
    pub fn new(steps: u8, resolution: StepResolution) -> Self {
        assert!(steps <= STEPS_MAX, "too many transition steps {}", steps);
        TransitionTime(steps | ((resolution as u8) << 6))
    }
    pub const fn immediate() -> Self {
        TransitionTime(0)
    }
    /// Picks the finest resolution able to hold `duration`, rounding down to whole steps. Returns
    /// `None` if the duration is longer than `62 * 10 minutes`.
    pub fn from_duration(duration: Duration) -> Option<Self> {
        let millis = duration.as_millis();
        [
            StepResolution::Milliseconds100,
            StepResolution::Seconds1,
            StepResolution::Seconds10,
            StepResolution::Minutes10,
        ]
        .iter()
        .find_map(|&resolution| {
            let steps = millis / u128::from(resolution.step_millis());
            u8::try_from(steps)
                .ok()
                .filter(|&s| s <= STEPS_MAX)
                .map(|s| TransitionTime::new(s, resolution))
        })
    }
    pub fn steps(self) -> u8 {
        self.0 & STEPS_MASK
    }
    pub fn resolution(self) -> StepResolution {
        match self.0 >> 6 {
            0b00 => StepResolution::Milliseconds100,
            0b01 => StepResolution::Seconds1,
            0b10 => StepResolution::Seconds10,
            _ => StepResolution::Minutes10,
        }
    }
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(u64::from(self.steps()) * self.resolution().step_millis())
    }
}
impl From<TransitionTime> for u8 {
    fn from(t: TransitionTime) -> Self {
        t.0
    }
}
impl TryFrom<u8> for TransitionTime {
    type Error = MessagePackError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value & STEPS_MASK == STEPS_MASK {
            Err(MessagePackError::BadBytes)
        } else {
            Ok(TransitionTime(value))
        }
    }
}
/// Optional transition time + delay (in 5 millisecond steps) carried by the Set messages.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct Transition {
    pub time: TransitionTime,
    pub delay: u8,
}
impl Transition {
    pub const fn byte_len() -> usize {
        2
    }
}
fn transition_len(transition: &Option<Transition>) -> usize {
    transition.map_or(0, |_| Transition::byte_len())
}
fn pack_transition(
    transition: &Option<Transition>,
    buffer: &mut [u8],
) -> Result<(), MessagePackError> {
    if let Some(transition) = transition {
        if buffer.len() < Transition::byte_len() {
            return Err(MessagePackError::SmallBuffer);
        }
        buffer[0] = transition.time.into();
        buffer[1] = transition.delay;
    }
    Ok(())
}
fn unpack_transition(buffer: &[u8]) -> Result<Option<Transition>, MessagePackError> {
    match buffer.len() {
        0 => Ok(None),
        2 => Ok(Some(Transition {
            time: TransitionTime::try_from(buffer[0])?,
            delay: buffer[1],
        })),
        _ => Err(MessagePackError::BadLength),
    }
}
const fn sig_double(opcode: u16) -> Opcode {
    Opcode::SIG(SigOpcode::DoubleOctet(opcode))
}

pub mod onoff {
    use super::{pack_transition, sig_double, transition_len, unpack_transition, Transition};
    use crate::access::Opcode;
    use crate::models::{MeshMessage, MessagePackError, UnpackableMessage};

    pub const SET: Opcode = sig_double(0x8202);
    pub const SET_UNACKNOWLEDGED: Opcode = sig_double(0x8203);
    pub const STATUS: Opcode = sig_double(0x8204);

    #[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
    pub struct SetParameters {
        pub on: bool,
        pub tid: u8,
        pub transition: Option<Transition>,
    }
    impl SetParameters {
        fn byte_len(&self) -> usize {
            2 + transition_len(&self.transition)
        }
        fn pack_into(&self, buffer: &mut [u8]) -> Result<(), MessagePackError> {
            if buffer.len() < self.byte_len() {
                return Err(MessagePackError::SmallBuffer);
            }
            buffer[0] = self.on.into();
            buffer[1] = self.tid;
            pack_transition(&self.transition, &mut buffer[2..])
        }
        fn unpack_from(buffer: &[u8]) -> Result<Self, MessagePackError> {
            if buffer.len() < 2 {
                return Err(MessagePackError::BadLength);
            }
            let on = match buffer[0] {
                0 => false,
                1 => true,
                _ => return Err(MessagePackError::BadBytes),
            };
            Ok(SetParameters {
                on,
                tid: buffer[1],
                transition: unpack_transition(&buffer[2..])?,
            })
        }
    }
    /// Generic OnOff Set. The server answers with a `Status`.
    #[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
    pub struct Set(pub SetParameters);
    /// Generic OnOff Set Unacknowledged. Used for groups where many servers would reply.
    #[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
    pub struct SetUnacknowledged(pub SetParameters);
    impl SetUnacknowledged {
        pub fn new(on: bool, tid: u8) -> Self {
            Self(SetParameters {
                on,
                tid,
                transition: None,
            })
        }
        pub fn with_transition(mut self, transition: Transition) -> Self {
            self.0.transition = Some(transition);
            self
        }
    }
    impl MeshMessage for Set {
        fn opcode(&self) -> Opcode {
            SET
        }
        fn message_size(&self) -> usize {
            self.0.byte_len()
        }
        fn pack_into(&self, buffer: &mut [u8]) -> Result<(), MessagePackError> {
            self.0.pack_into(buffer)
        }
    }
    impl UnpackableMessage for Set {
        const OPCODE: Opcode = SET;
        fn unpack_from(buffer: &[u8]) -> Result<Self, MessagePackError> {
            Ok(Set(SetParameters::unpack_from(buffer)?))
        }
    }
    impl MeshMessage for SetUnacknowledged {
        fn opcode(&self) -> Opcode {
            SET_UNACKNOWLEDGED
        }
        fn message_size(&self) -> usize {
            self.0.byte_len()
        }
        fn pack_into(&self, buffer: &mut [u8]) -> Result<(), MessagePackError> {
            self.0.pack_into(buffer)
        }
    }
    impl UnpackableMessage for SetUnacknowledged {
        const OPCODE: Opcode = SET_UNACKNOWLEDGED;
        fn unpack_from(buffer: &[u8]) -> Result<Self, MessagePackError> {
            Ok(SetUnacknowledged(SetParameters::unpack_from(buffer)?))
        }
    }
    /// Generic OnOff Status. Only the present state is tracked here.
    #[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
    pub struct Status {
        pub present_on: bool,
    }
    impl MeshMessage for Status {
        fn opcode(&self) -> Opcode {
            STATUS
        }
        fn message_size(&self) -> usize {
            1
        }
        fn pack_into(&self, buffer: &mut [u8]) -> Result<(), MessagePackError> {
            let b = buffer.first_mut().ok_or(MessagePackError::SmallBuffer)?;
            *b = self.present_on.into();
            Ok(())
        }
    }
    impl UnpackableMessage for Status {
        const OPCODE: Opcode = STATUS;
        fn unpack_from(buffer: &[u8]) -> Result<Self, MessagePackError> {
            // Target state + remaining time are optional.
            match buffer {
                [0, ..] if buffer.len() == 1 || buffer.len() == 3 => {
                    Ok(Status { present_on: false })
                }
                [1, ..] if buffer.len() == 1 || buffer.len() == 3 => {
                    Ok(Status { present_on: true })
                }
                [_, ..] => Err(MessagePackError::BadBytes),
                [] => Err(MessagePackError::BadLength),
            }
        }
    }
}

pub mod level {
    use super::{pack_transition, sig_double, transition_len, unpack_transition, Transition};
    use crate::access::Opcode;
    use crate::models::{MeshMessage, MessagePackError, UnpackableMessage};
    use core::convert::TryInto;

    pub const SET: Opcode = sig_double(0x8206);
    pub const SET_UNACKNOWLEDGED: Opcode = sig_double(0x8207);
    pub const DELTA_SET: Opcode = sig_double(0x8209);
    pub const DELTA_SET_UNACKNOWLEDGED: Opcode = sig_double(0x820A);
    pub const MOVE_SET_UNACKNOWLEDGED: Opcode = sig_double(0x820C);

    /// Generic Level Set (Unacknowledged when `acknowledged == false`).
    #[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
    pub struct Set {
        pub level: i16,
        pub tid: u8,
        pub transition: Option<Transition>,
        pub acknowledged: bool,
    }
    impl Set {
        pub fn unacknowledged(level: i16, tid: u8) -> Self {
            Set {
                level,
                tid,
                transition: None,
                acknowledged: false,
            }
        }
    }
    impl MeshMessage for Set {
        fn opcode(&self) -> Opcode {
            if self.acknowledged {
                SET
            } else {
                SET_UNACKNOWLEDGED
            }
        }
        fn message_size(&self) -> usize {
            3 + transition_len(&self.transition)
        }
        fn pack_into(&self, buffer: &mut [u8]) -> Result<(), MessagePackError> {
            if buffer.len() < self.message_size() {
                return Err(MessagePackError::SmallBuffer);
            }
            buffer[..2].copy_from_slice(&self.level.to_le_bytes());
            buffer[2] = self.tid;
            pack_transition(&self.transition, &mut buffer[3..])
        }
    }
    /// Generic Delta Set (Unacknowledged when `acknowledged == false`). Moves the level by `delta`
    /// relative to the level at the start of the transaction.
    #[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
    pub struct DeltaSet {
        pub delta: i32,
        pub tid: u8,
        pub transition: Option<Transition>,
        pub acknowledged: bool,
    }
    impl DeltaSet {
        pub fn unacknowledged(delta: i32, tid: u8) -> Self {
            DeltaSet {
                delta,
                tid,
                transition: None,
                acknowledged: false,
            }
        }
    }
    impl MeshMessage for DeltaSet {
        fn opcode(&self) -> Opcode {
            if self.acknowledged {
                DELTA_SET
            } else {
                DELTA_SET_UNACKNOWLEDGED
            }
        }
        fn message_size(&self) -> usize {
            5 + transition_len(&self.transition)
        }
        fn pack_into(&self, buffer: &mut [u8]) -> Result<(), MessagePackError> {
            if buffer.len() < self.message_size() {
                return Err(MessagePackError::SmallBuffer);
            }
            buffer[..4].copy_from_slice(&self.delta.to_le_bytes());
            buffer[4] = self.tid;
            pack_transition(&self.transition, &mut buffer[5..])
        }
    }
    /// Generic Move Set Unacknowledged. Starts changing the level by `delta_level` per transition
    /// time until stopped.
    #[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
    pub struct MoveSetUnacknowledged {
        pub delta_level: i16,
        pub tid: u8,
        pub transition: Option<Transition>,
    }
    impl MeshMessage for MoveSetUnacknowledged {
        fn opcode(&self) -> Opcode {
            MOVE_SET_UNACKNOWLEDGED
        }
        fn message_size(&self) -> usize {
            3 + transition_len(&self.transition)
        }
        fn pack_into(&self, buffer: &mut [u8]) -> Result<(), MessagePackError> {
            if buffer.len() < self.message_size() {
                return Err(MessagePackError::SmallBuffer);
            }
            buffer[..2].copy_from_slice(&self.delta_level.to_le_bytes());
            buffer[2] = self.tid;
            pack_transition(&self.transition, &mut buffer[3..])
        }
    }
    impl UnpackableMessage for MoveSetUnacknowledged {
        const OPCODE: Opcode = MOVE_SET_UNACKNOWLEDGED;
        fn unpack_from(buffer: &[u8]) -> Result<Self, MessagePackError> {
            if buffer.len() < 3 {
                return Err(MessagePackError::BadLength);
            }
            let delta_level = i16::from_le_bytes(
                buffer[..2]
                    .try_into()
                    .map_err(|_| MessagePackError::BadLength)?,
            );
            Ok(MoveSetUnacknowledged {
                delta_level,
                tid: buffer[2],
                transition: unpack_transition(&buffer[3..])?,
            })
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MeshMessage, UnpackableMessage};

    #[test]
    fn test_transition_time() {
        let t = TransitionTime::from_duration(Duration::from_secs(1)).unwrap();
        assert_eq!(t.resolution(), StepResolution::Milliseconds100);
        assert_eq!(t.steps(), 10);
        assert_eq!(u8::from(t), 0x0A);
        let t = TransitionTime::from_duration(Duration::from_secs(20)).unwrap();
        assert_eq!(t.resolution(), StepResolution::Seconds1);
        assert_eq!(t.as_duration(), Duration::from_secs(20));
        assert!(TransitionTime::from_duration(Duration::from_secs(62 * 600 + 600)).is_none());
        assert!(TransitionTime::try_from(0x3F).is_err());
    }
    #[test]
    fn test_onoff_set_with_transition() {
        let msg = onoff::SetUnacknowledged::new(false, 0x21).with_transition(Transition {
            time: TransitionTime::new(1, StepResolution::Seconds1),
            delay: 20,
        });
        let payload = msg.to_access_payload().unwrap();
        assert_eq!(payload.parameters, vec![0x00, 0x21, 0x41, 20]);
        assert_eq!(payload.unpack::<onoff::SetUnacknowledged>(), Ok(msg));
    }
    #[test]
    fn test_onoff_set_bad_state() {
        assert!(onoff::Set::unpack_from(&[2, 0]).is_err());
        assert!(onoff::Set::unpack_from(&[1, 0, 0x0A]).is_err());
    }
    #[test]
    fn test_onoff_status() {
        assert_eq!(
            onoff::Status::unpack_from(&[1]),
            Ok(onoff::Status { present_on: true })
        );
        assert_eq!(
            onoff::Status::unpack_from(&[0, 1, 0x0A]),
            Ok(onoff::Status { present_on: false })
        );
        assert!(onoff::Status::unpack_from(&[0, 1]).is_err());
    }
    #[test]
    fn test_level_messages() {
        let set = level::Set::unacknowledged(-2, 7).to_access_payload().unwrap();
        assert_eq!(set.opcode, level::SET_UNACKNOWLEDGED);
        assert_eq!(set.parameters, vec![0xFE, 0xFF, 7]);
        let delta = level::DeltaSet::unacknowledged(8192, 8)
            .to_access_payload()
            .unwrap();
        assert_eq!(delta.opcode, level::DELTA_SET_UNACKNOWLEDGED);
        assert_eq!(delta.parameters, vec![0x00, 0x20, 0x00, 0x00, 8]);
        let mut small = [0_u8; 2];
        assert!(level::Set::unacknowledged(0, 0).pack_into(&mut small).is_err());
    }
}
