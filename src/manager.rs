//! Boundary to the Mesh Network Manager. The manager owns the network, the bearer and the whole
//! send/deliver pipeline; the group control screen only asks it to send access payloads to a group
//! and reacts to the [`NetworkEvent`]s it reports back.
use crate::access::Opcode;
use crate::address::{Address, GroupAddress, UnicastAddress};
use crate::mesh::AppKeyIndex;
use crate::models::{AccessPayload, MessagePackError};
use crate::network::{ApplicationKey, Group, MeshNetwork};
use core::fmt::{Display, Error, Formatter};

/// Returned when an outgoing message can't be sent (or delivered) for some reason.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub enum SendError {
    BearerClosed,
    UnknownGroup(GroupAddress),
    InvalidAppKeyIndex(AppKeyIndex),
    Pack(MessagePackError),
    ChannelClosed,
}
impl Display for SendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            SendError::BearerClosed => f.write_str("bearer closed"),
            SendError::UnknownGroup(g) => write!(f, "unknown group {}", g),
            SendError::InvalidAppKeyIndex(i) => write!(f, "invalid application key index {}", i),
            SendError::Pack(e) => write!(f, "unable to pack message: {}", e),
            SendError::ChannelClosed => f.write_str("event channel closed"),
        }
    }
}
impl From<MessagePackError> for SendError {
    fn from(e: MessagePackError) -> Self {
        SendError::Pack(e)
    }
}
/// Everything the network manager reports back to its delegate.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum NetworkEvent {
    /// A message was received from `source`.
    Received {
        message: AccessPayload,
        source: UnicastAddress,
    },
    /// A message was delivered to `destination`.
    Delivered { opcode: Opcode, destination: Address },
    FailedToDeliver {
        opcode: Opcode,
        destination: Address,
        error: SendError,
    },
    BearerOpened,
    BearerClosed,
}
pub trait MeshNetworkManager {
    /// The current network, if one has been loaded or created.
    fn network(&self) -> Option<&MeshNetwork>;
    fn is_bearer_open(&self) -> bool;
    /// Queues `payload` to be sent to `destination` encrypted with `app_key`. Delivery (or failure)
    /// is reported later as a [`NetworkEvent`].
    fn send(
        &mut self,
        payload: AccessPayload,
        destination: &Group,
        app_key: &ApplicationKey,
    ) -> Result<(), SendError>;
}
impl<M: MeshNetworkManager + ?Sized> MeshNetworkManager for &mut M {
    fn network(&self) -> Option<&MeshNetwork> {
        (**self).network()
    }
    fn is_bearer_open(&self) -> bool {
        (**self).is_bearer_open()
    }
    fn send(
        &mut self,
        payload: AccessPayload,
        destination: &Group,
        app_key: &ApplicationKey,
    ) -> Result<(), SendError> {
        (**self).send(payload, destination, app_key)
    }
}
#[cfg(feature = "full_stack")]
pub use loopback::{LoopbackManager, SentMessage};

#[cfg(feature = "full_stack")]
mod loopback {
    use super::{MeshNetworkManager, NetworkEvent, SendError};
    use crate::address::{Address, GroupAddress, UnicastAddress};
    use crate::mesh::AppKeyIndex;
    use crate::models::AccessPayload;
    use crate::network::{ApplicationKey, Group, MeshNetwork};
    use tokio::sync::mpsc;

    /// A payload handed to the [`LoopbackManager`].
    #[derive(Clone, Eq, PartialEq, Debug, Hash)]
    pub struct SentMessage {
        pub payload: AccessPayload,
        pub destination: GroupAddress,
        pub app_key_index: AppKeyIndex,
    }
    /// Network manager without a bearer. Every accepted payload is recorded and immediately reported
    /// as delivered (or failed, see [`LoopbackManager::fail_deliveries`]) through the event channel.
    pub struct LoopbackManager {
        network: Option<MeshNetwork>,
        bearer_open: bool,
        delivery_error: Option<SendError>,
        sent: Vec<SentMessage>,
        events: Option<mpsc::UnboundedSender<NetworkEvent>>,
    }
    impl LoopbackManager {
        /// Returns the manager and the receiving end of its event channel. The bearer starts open.
        pub fn new(network: Option<MeshNetwork>) -> (Self, mpsc::UnboundedReceiver<NetworkEvent>) {
            let (events, rx) = mpsc::unbounded_channel();
            (
                Self {
                    network,
                    bearer_open: true,
                    delivery_error: None,
                    sent: Vec::new(),
                    events: Some(events),
                },
                rx,
            )
        }
        pub fn network_mut(&mut self) -> Option<&mut MeshNetwork> {
            self.network.as_mut()
        }
        pub fn sent(&self) -> &[SentMessage] {
            &self.sent[..]
        }
        /// Report every following send as failed with `error` (or delivered again with `None`).
        pub fn fail_deliveries(&mut self, error: Option<SendError>) {
            self.delivery_error = error;
        }
        pub fn open_bearer(&mut self) -> Result<(), SendError> {
            self.bearer_open = true;
            self.emit(NetworkEvent::BearerOpened)
        }
        pub fn close_bearer(&mut self) -> Result<(), SendError> {
            self.bearer_open = false;
            self.emit(NetworkEvent::BearerClosed)
        }
        /// Pretend `message` arrived from `source`.
        pub fn receive(
            &mut self,
            message: AccessPayload,
            source: UnicastAddress,
        ) -> Result<(), SendError> {
            self.emit(NetworkEvent::Received { message, source })
        }
        /// Drops the sending end of the event channel. The receiver ends once it has drained the
        /// events already reported.
        pub fn close_events(&mut self) {
            self.events = None;
        }
        fn emit(&self, event: NetworkEvent) -> Result<(), SendError> {
            self.events
                .as_ref()
                .ok_or(SendError::ChannelClosed)?
                .send(event)
                .map_err(|_| SendError::ChannelClosed)
        }
    }
    impl MeshNetworkManager for LoopbackManager {
        fn network(&self) -> Option<&MeshNetwork> {
            self.network.as_ref()
        }
        fn is_bearer_open(&self) -> bool {
            self.bearer_open
        }
        fn send(
            &mut self,
            payload: AccessPayload,
            destination: &Group,
            app_key: &ApplicationKey,
        ) -> Result<(), SendError> {
            if !self.bearer_open {
                return Err(SendError::BearerClosed);
            }
            let network = self
                .network
                .as_ref()
                .ok_or(SendError::UnknownGroup(destination.address))?;
            if network.group(destination.address).is_none() {
                return Err(SendError::UnknownGroup(destination.address));
            }
            if network.application_key(app_key.index).is_none() {
                return Err(SendError::InvalidAppKeyIndex(app_key.index));
            }
            let opcode = payload.opcode;
            self.sent.push(SentMessage {
                payload,
                destination: destination.address,
                app_key_index: app_key.index,
            });
            let destination = Address::Group(destination.address);
            match self.delivery_error {
                None => self.emit(NetworkEvent::Delivered {
                    opcode,
                    destination,
                }),
                Some(error) => self.emit(NetworkEvent::FailedToDeliver {
                    opcode,
                    destination,
                    error,
                }),
            }
        }
    }
}
#[cfg(all(test, feature = "full_stack"))]
mod tests {
    use super::*;
    use crate::models::config::NodeReset;
    use crate::models::generics::onoff;
    use crate::models::MeshMessage;
    use crate::samples;

    fn living_room_and_home(network: &MeshNetwork) -> (Group, ApplicationKey) {
        (
            network.group(samples::LIVING_ROOM).unwrap().clone(),
            network.application_key(samples::HOME_KEY).unwrap().clone(),
        )
    }
    #[test]
    fn test_loopback_delivers() {
        let (mut manager, mut events) = LoopbackManager::new(Some(samples::sample_network()));
        let (group, key) = living_room_and_home(manager.network().unwrap());
        let payload = onoff::SetUnacknowledged::new(true, 1)
            .to_access_payload()
            .unwrap();
        manager.send(payload.clone(), &group, &key).unwrap();
        assert_eq!(manager.sent().len(), 1);
        assert_eq!(manager.sent()[0].payload, payload);
        assert_eq!(
            events.try_recv().unwrap(),
            NetworkEvent::Delivered {
                opcode: onoff::SET_UNACKNOWLEDGED,
                destination: Address::Group(samples::LIVING_ROOM),
            }
        );
    }
    #[test]
    fn test_loopback_failures() {
        let (mut manager, mut events) = LoopbackManager::new(Some(samples::sample_network()));
        let (group, key) = living_room_and_home(manager.network().unwrap());
        let payload = NodeReset.to_access_payload().unwrap();

        manager.fail_deliveries(Some(SendError::ChannelClosed));
        manager.send(payload.clone(), &group, &key).unwrap();
        match events.try_recv().unwrap() {
            NetworkEvent::FailedToDeliver { error, .. } => assert_eq!(error, SendError::ChannelClosed),
            e => panic!("unexpected event {:?}", e),
        }

        let unknown = Group::new("Unknown", GroupAddress::new(0xC0FF));
        assert_eq!(
            manager.send(payload.clone(), &unknown, &key),
            Err(SendError::UnknownGroup(unknown.address))
        );
        manager.close_bearer().unwrap();
        assert_eq!(events.try_recv().unwrap(), NetworkEvent::BearerClosed);
        assert_eq!(
            manager.send(payload, &group, &key),
            Err(SendError::BearerClosed)
        );
        assert_eq!(manager.sent().len(), 1);
    }
    #[test]
    fn test_closed_channel() {
        let (mut manager, events) = LoopbackManager::new(None);
        drop(events);
        assert_eq!(manager.open_bearer(), Err(SendError::ChannelClosed));
    }
    #[test]
    fn test_close_events() {
        let (mut manager, mut events) = LoopbackManager::new(None);
        manager.close_bearer().unwrap();
        manager.close_events();
        assert_eq!(events.try_recv().unwrap(), NetworkEvent::BearerClosed);
        assert!(events.try_recv().is_err());
        assert_eq!(manager.open_bearer(), Err(SendError::ChannelClosed));
    }
}
