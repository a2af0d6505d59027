//! Group Control screen. Shows the models subscribed to one group as a grid (one section per
//! Application Key, one cell per model type) and sends the messages its cells ask for.
//!
//! All methods are expected to run on one task: lifecycle calls from the UI, cell taps through
//! [`CellDelegate`] and manager reports through [`GroupControl::handle_event`] (or
//! [`GroupControl::run`], which pumps them off the manager's channel).
use crate::cells::{CellDelegate, CellKind, GroupCell};
use crate::config::{GroupControlConfig, ItemSize};
use crate::grouping::{Section, Sections};
use crate::manager::{MeshNetworkManager, NetworkEvent, SendError};
use crate::mesh::AppKeyIndex;
use crate::models::config::NodeReset;
use crate::models::{AccessPayload, MeshMessage};
use crate::network::{ApplicationKey, Group};
use slog::Logger;

pub const CONNECTING_MESSAGE: &str = "Connecting...";
pub const SEND_FAILED_TITLE: &str = "Error";
pub const SEND_FAILED_MESSAGE: &str = "Message could not be sent.";

/// What the screen needs from the UI it's shown in.
pub trait GroupControlView {
    fn set_title(&mut self, title: &str);
    /// The grid data changed. Query it again.
    fn reload(&mut self);
    /// Shows a modal activity indicator with `message`.
    fn show_progress(&mut self, message: &str);
    fn update_progress(&mut self, message: &str);
    fn dismiss_progress(&mut self);
    fn present_alert(&mut self, title: &str, message: &str);
    /// The local node is no longer part of the network. The application should reload it.
    fn network_did_change(&mut self);
    fn pop_to_root(&mut self);
}
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash, Default)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}
impl IndexPath {
    pub fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}
/// Everything needed to set up the cell at an [`IndexPath`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CellConfig {
    /// The composite model identifier as `%08X`.
    pub reuse_identifier: String,
    pub group: Group,
    pub application_key: ApplicationKey,
    pub number_of_devices: usize,
    /// `None` for supported models without a cell of their own.
    pub kind: Option<CellKind>,
}
impl CellConfig {
    pub fn make_cell(&self) -> Option<GroupCell> {
        self.kind
            .map(|kind| GroupCell::new(kind, self.application_key.index, self.number_of_devices))
    }
}
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
enum State {
    Created,
    Loaded,
    /// Visible and the manager's delegate.
    Active,
    /// Popped off the navigation stack. Nothing is observed anymore.
    Dismissed,
}
/// A send waiting for the bearer to open.
#[derive(Clone, Debug)]
struct PendingSend {
    payload: AccessPayload,
    description: String,
    application_key: AppKeyIndex,
}
pub struct GroupControl<M: MeshNetworkManager, V: GroupControlView> {
    group: Group,
    manager: M,
    view: V,
    config: GroupControlConfig,
    sections: Sections,
    state: State,
    pending: Option<PendingSend>,
    progress_shown: bool,
    logger: Logger,
}
impl<M: MeshNetworkManager, V: GroupControlView> GroupControl<M, V> {
    pub fn new(
        group: Group,
        manager: M,
        view: V,
        config: GroupControlConfig,
        logger: Logger,
    ) -> Self {
        let logger = logger.new(o!("group" => group.address.to_string()));
        Self {
            group,
            manager,
            view,
            config,
            sections: Sections::new(),
            state: State::Created,
            pending: None,
            progress_shown: false,
            logger,
        }
    }
    pub fn group(&self) -> &Group {
        &self.group
    }
    pub fn manager(&self) -> &M {
        &self.manager
    }
    pub fn manager_mut(&mut self) -> &mut M {
        &mut self.manager
    }
    pub fn view(&self) -> &V {
        &self.view
    }
    pub fn sections(&self) -> &Sections {
        &self.sections
    }
    pub fn is_dismissed(&self) -> bool {
        self.state == State::Dismissed
    }
    pub fn has_pending_send(&self) -> bool {
        self.pending.is_some()
    }
    /// View did load. Sets the title and groups the subscribed models. Without a network there's
    /// nothing to show.
    pub fn load(&mut self) {
        self.view.set_title(&self.group.name);
        self.sections = match self.manager.network() {
            Some(network) => {
                Sections::for_group(network, &self.group, &self.config.supported_models)
            }
            None => {
                warn!(self.logger, "no mesh network loaded");
                Sections::new()
            }
        };
        debug!(self.logger, "loaded"; "sections" => self.sections.len());
        if self.state == State::Created {
            self.state = State::Loaded;
        }
        self.view.reload();
    }
    /// View did appear. From now on manager events are handled.
    pub fn appear(&mut self) {
        match self.state {
            State::Dismissed => (),
            _ => self.state = State::Active,
        }
    }
    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }
    pub fn number_of_items(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |s| s.models.len())
    }
    /// The section's Application Key name, upper-cased.
    pub fn header_title(&self, section: usize) -> Option<String> {
        self.sections
            .get(section)
            .map(|s| s.application_key.name.to_uppercase())
    }
    pub fn cell(&self, index: IndexPath) -> Option<CellConfig> {
        let section: &Section = self.sections.get(index.section)?;
        let row = section.models.get(index.item)?;
        Some(CellConfig {
            reuse_identifier: format!("{:08X}", row.model_id),
            group: self.group.clone(),
            application_key: section.application_key.clone(),
            number_of_devices: row.count,
            kind: CellKind::for_model(row.model_id),
        })
    }
    pub fn item_size(&self, view_width: f64) -> ItemSize {
        self.config.layout.item_size(view_width)
    }
    /// The group handed to the group editor.
    pub fn edit_target(&self) -> &Group {
        &self.group
    }
    /// The group editor saved `group`.
    pub fn group_changed(&mut self, group: &Group) {
        self.group = group.clone();
        self.view.set_title(&self.group.name);
    }
    /// Sends `message` to the group or queues it until the bearer opens.
    pub fn send_message(
        &mut self,
        message: &dyn MeshMessage,
        description: &str,
        application_key: AppKeyIndex,
    ) {
        if self.state == State::Dismissed {
            debug!(self.logger, "send after dismissal ignored");
            return;
        }
        let payload = match message.to_access_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.fail(SendError::Pack(e));
                return;
            }
        };
        if self.manager.is_bearer_open() {
            self.show_progress(description);
            self.dispatch(payload, application_key);
        } else {
            info!(self.logger, "waiting for bearer"; "opcode" => %payload.opcode);
            self.show_progress(CONNECTING_MESSAGE);
            if self.pending.is_some() {
                debug!(self.logger, "replacing pending send");
            }
            self.pending = Some(PendingSend {
                payload,
                description: description.to_owned(),
                application_key,
            });
        }
    }
    /// The user cancelled while waiting for the bearer. Returns if there was a send to cancel.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                info!(self.logger, "pending send cancelled"; "opcode" => %pending.payload.opcode);
                self.done();
                true
            }
            None => false,
        }
    }
    /// Handles one report from the network manager.
    pub fn handle_event(&mut self, event: NetworkEvent) {
        if self.state != State::Active {
            trace!(self.logger, "event ignored"; "state" => ?self.state);
            return;
        }
        match event {
            NetworkEvent::Received { message, source } => {
                if message.is::<NodeReset>() {
                    warn!(self.logger, "node reset remotely"; "source" => %source);
                    self.pending = None;
                    self.state = State::Dismissed;
                    self.view.network_did_change();
                    self.view.pop_to_root();
                }
            }
            NetworkEvent::Delivered {
                opcode,
                destination,
            } => {
                debug!(self.logger, "delivered"; "opcode" => %opcode, "destination" => %destination);
                self.done();
            }
            NetworkEvent::FailedToDeliver {
                opcode,
                destination,
                error,
            } => {
                warn!(self.logger, "failed to deliver"; "opcode" => %opcode,
                    "destination" => %destination, "error" => %error);
                self.done();
                self.view
                    .present_alert(SEND_FAILED_TITLE, SEND_FAILED_MESSAGE);
            }
            NetworkEvent::BearerOpened => {
                if let Some(pending) = self.pending.take() {
                    self.view.update_progress(&pending.description);
                    self.dispatch(pending.payload, pending.application_key);
                }
            }
            NetworkEvent::BearerClosed => debug!(self.logger, "bearer closed"),
        }
    }
    /// Handles events until the stream ends or the screen is dismissed.
    #[cfg(feature = "full_stack")]
    pub async fn run<S>(&mut self, mut events: S)
    where
        S: futures_util::stream::Stream<Item = NetworkEvent> + Unpin,
    {
        use futures_util::stream::StreamExt;
        while let Some(event) = events.next().await {
            self.handle_event(event);
            if self.is_dismissed() {
                break;
            }
        }
    }
    /// Handles the events already on `events` while a send is waiting for the bearer. Stops as
    /// soon as the queued send went out, leaving its delivery report on the channel.
    #[cfg(feature = "full_stack")]
    pub fn flush_pending(
        &mut self,
        events: &mut tokio::sync::mpsc::UnboundedReceiver<NetworkEvent>,
    ) {
        while self.has_pending_send() {
            match events.try_recv() {
                Ok(event) => self.handle_event(event),
                Err(_) => break,
            }
        }
    }
    fn dispatch(&mut self, payload: AccessPayload, application_key: AppKeyIndex) {
        let key = match self
            .manager
            .network()
            .and_then(|n| n.application_key(application_key))
        {
            Some(key) => key.clone(),
            None => {
                self.fail(SendError::InvalidAppKeyIndex(application_key));
                return;
            }
        };
        info!(self.logger, "sending"; "opcode" => %payload.opcode, "app_key" => %key.index);
        if let Err(e) = self.manager.send(payload, &self.group, &key) {
            self.fail(e);
        }
    }
    fn fail(&mut self, error: SendError) {
        error!(self.logger, "send failed"; "error" => %error);
        self.done();
        self.view
            .present_alert(SEND_FAILED_TITLE, SEND_FAILED_MESSAGE);
    }
    fn show_progress(&mut self, message: &str) {
        if self.progress_shown {
            self.view.update_progress(message);
        } else {
            self.progress_shown = true;
            self.view.show_progress(message);
        }
    }
    fn done(&mut self) {
        if self.progress_shown {
            self.progress_shown = false;
            self.view.dismiss_progress();
        }
    }
}
impl<M: MeshNetworkManager, V: GroupControlView> CellDelegate for GroupControl<M, V> {
    fn send(&mut self, message: &dyn MeshMessage, description: &str, application_key: AppKeyIndex) {
        self.send_message(message, description, application_key)
    }
}
#[cfg(all(test, feature = "full_stack"))]
mod tests {
    use super::*;
    use crate::address::{Address, UnicastAddress};
    use crate::cells::OnOffCell;
    use crate::manager::LoopbackManager;
    use crate::models::generics::onoff;
    use crate::network::MeshNetwork;
    use crate::samples;
    use tokio::sync::mpsc::UnboundedReceiver;

    #[derive(Clone, Eq, PartialEq, Debug)]
    enum ViewCall {
        Title(String),
        Reload,
        Progress(String),
        UpdateProgress(String),
        DismissProgress,
        Alert(String, String),
        NetworkChanged,
        PopToRoot,
    }
    #[derive(Default)]
    struct RecordingView(Vec<ViewCall>);
    impl RecordingView {
        fn last(&self) -> Option<&ViewCall> {
            self.0.last()
        }
    }
    impl GroupControlView for RecordingView {
        fn set_title(&mut self, title: &str) {
            self.0.push(ViewCall::Title(title.to_owned()))
        }
        fn reload(&mut self) {
            self.0.push(ViewCall::Reload)
        }
        fn show_progress(&mut self, message: &str) {
            self.0.push(ViewCall::Progress(message.to_owned()))
        }
        fn update_progress(&mut self, message: &str) {
            self.0.push(ViewCall::UpdateProgress(message.to_owned()))
        }
        fn dismiss_progress(&mut self) {
            self.0.push(ViewCall::DismissProgress)
        }
        fn present_alert(&mut self, title: &str, message: &str) {
            self.0
                .push(ViewCall::Alert(title.to_owned(), message.to_owned()))
        }
        fn network_did_change(&mut self) {
            self.0.push(ViewCall::NetworkChanged)
        }
        fn pop_to_root(&mut self) {
            self.0.push(ViewCall::PopToRoot)
        }
    }
    type Screen = GroupControl<LoopbackManager, RecordingView>;

    fn logger() -> Logger {
        Logger::root(slog::Discard, o!())
    }
    fn screen_with(network: Option<MeshNetwork>) -> (Screen, UnboundedReceiver<NetworkEvent>) {
        let group = samples::sample_network()
            .group(samples::LIVING_ROOM)
            .unwrap()
            .clone();
        let (manager, events) = LoopbackManager::new(network);
        let mut screen = GroupControl::new(
            group,
            manager,
            RecordingView::default(),
            GroupControlConfig::default(),
            logger(),
        );
        screen.load();
        screen.appear();
        (screen, events)
    }
    fn screen() -> (Screen, UnboundedReceiver<NetworkEvent>) {
        screen_with(Some(samples::sample_network()))
    }
    fn alert() -> ViewCall {
        ViewCall::Alert(SEND_FAILED_TITLE.to_owned(), SEND_FAILED_MESSAGE.to_owned())
    }

    #[test]
    fn test_load_data_source() {
        let (screen, _events) = screen();
        assert_eq!(
            screen.view().0[..2],
            [ViewCall::Title("Living Room".to_owned()), ViewCall::Reload]
        );
        assert_eq!(screen.number_of_sections(), 2);
        assert_eq!(screen.number_of_items(0), 2);
        assert_eq!(screen.number_of_items(1), 2);
        assert_eq!(screen.number_of_items(5), 0);
        assert_eq!(screen.header_title(0).as_deref(), Some("HOME"));
        assert_eq!(screen.header_title(1).as_deref(), Some("GUEST"));
        assert_eq!(screen.header_title(2), None);

        let cell = screen.cell(IndexPath::new(0, 0)).unwrap();
        assert_eq!(cell.reuse_identifier, "00001000");
        assert_eq!(cell.number_of_devices, 2);
        assert_eq!(cell.group.address, samples::LIVING_ROOM);
        assert_eq!(cell.application_key.index, samples::HOME_KEY);
        assert_eq!(cell.kind, Some(CellKind::OnOff));
        let cell = screen.cell(IndexPath::new(1, 0)).unwrap();
        assert_eq!(cell.reuse_identifier, "00001002");
        assert_eq!(cell.make_cell().map(|c| c.kind()), Some(CellKind::Level));
        assert!(screen.cell(IndexPath::new(0, 2)).is_none());
    }
    #[test]
    fn test_load_without_network() {
        let (screen, _events) = screen_with(None);
        assert_eq!(screen.number_of_sections(), 0);
        assert_eq!(screen.header_title(0), None);
    }
    #[test]
    fn test_group_changed() {
        let (mut screen, _events) = screen();
        let mut group = screen.edit_target().clone();
        group.name = "Lounge".to_owned();
        screen.group_changed(&group);
        assert_eq!(screen.view().last(), Some(&ViewCall::Title("Lounge".to_owned())));
        assert_eq!(screen.group().name, "Lounge");
    }
    #[test]
    fn test_send_and_deliver() {
        let (mut screen, mut events) = screen();
        let mut cell = OnOffCell::new(samples::HOME_KEY, 2);
        cell.on(&mut screen);
        assert_eq!(
            screen.view().last(),
            Some(&ViewCall::Progress("Turning ON...".to_owned()))
        );
        let sent = &screen.manager().sent()[0];
        assert_eq!(sent.destination, samples::LIVING_ROOM);
        assert_eq!(sent.app_key_index, samples::HOME_KEY);
        assert!(sent.payload.is::<onoff::SetUnacknowledged>());

        let event = events.try_recv().unwrap();
        screen.handle_event(event);
        assert_eq!(screen.view().last(), Some(&ViewCall::DismissProgress));
    }
    #[test]
    fn test_failed_delivery_alerts() {
        let (mut screen, mut events) = screen();
        screen
            .manager_mut()
            .fail_deliveries(Some(SendError::BearerClosed));
        screen.send_message(
            &onoff::SetUnacknowledged::new(false, 0),
            "Turning OFF...",
            samples::GUEST_KEY,
        );
        let event = events.try_recv().unwrap();
        screen.handle_event(event);
        let calls = &screen.view().0;
        assert_eq!(
            calls[calls.len() - 2..],
            [ViewCall::DismissProgress, alert()]
        );
    }
    #[test]
    fn test_unknown_key_alerts() {
        let (mut screen, _events) = screen();
        screen.send_message(
            &onoff::SetUnacknowledged::new(true, 0),
            "Turning ON...",
            AppKeyIndex::new(0x0ABC),
        );
        assert_eq!(screen.view().last(), Some(&alert()));
        assert!(screen.manager().sent().is_empty());
    }
    #[test]
    fn test_send_waits_for_bearer() {
        let (mut screen, mut events) = screen();
        screen.manager_mut().close_bearer().unwrap();
        screen.handle_event(events.try_recv().unwrap());
        screen.send_message(
            &onoff::SetUnacknowledged::new(true, 0),
            "Turning ON...",
            samples::HOME_KEY,
        );
        assert_eq!(
            screen.view().last(),
            Some(&ViewCall::Progress(CONNECTING_MESSAGE.to_owned()))
        );
        assert!(screen.has_pending_send());
        assert!(screen.manager().sent().is_empty());

        screen.manager_mut().open_bearer().unwrap();
        screen.handle_event(events.try_recv().unwrap());
        assert!(!screen.has_pending_send());
        assert_eq!(screen.manager().sent().len(), 1);
        assert!(screen
            .view()
            .0
            .contains(&ViewCall::UpdateProgress("Turning ON...".to_owned())));
        screen.handle_event(events.try_recv().unwrap());
        assert_eq!(screen.view().last(), Some(&ViewCall::DismissProgress));
    }
    #[test]
    fn test_cancel_pending() {
        let (mut screen, _events) = screen();
        screen.manager_mut().close_bearer().unwrap();
        assert!(!screen.cancel_pending());
        screen.send_message(
            &onoff::SetUnacknowledged::new(true, 0),
            "Turning ON...",
            samples::HOME_KEY,
        );
        assert!(screen.cancel_pending());
        assert_eq!(screen.view().last(), Some(&ViewCall::DismissProgress));
        screen.handle_event(NetworkEvent::BearerOpened);
        assert!(screen.manager().sent().is_empty());
    }
    #[test]
    fn test_node_reset_pops_to_root() {
        let (mut screen, _events) = screen();
        let reset = NodeReset.to_access_payload().unwrap();
        screen.handle_event(NetworkEvent::Received {
            message: reset,
            source: UnicastAddress::new(0x0003),
        });
        let calls = &screen.view().0;
        assert_eq!(
            calls[calls.len() - 2..],
            [ViewCall::NetworkChanged, ViewCall::PopToRoot]
        );
        assert!(screen.is_dismissed());
        // Nothing is observed after dismissal.
        let count = screen.view().0.len();
        screen.handle_event(NetworkEvent::FailedToDeliver {
            opcode: onoff::SET_UNACKNOWLEDGED,
            destination: Address::Group(samples::LIVING_ROOM),
            error: SendError::BearerClosed,
        });
        screen.send_message(
            &onoff::SetUnacknowledged::new(true, 0),
            "Turning ON...",
            samples::HOME_KEY,
        );
        assert_eq!(screen.view().0.len(), count);
    }
    #[test]
    fn test_other_messages_ignored() {
        let (mut screen, _events) = screen();
        let count = screen.view().0.len();
        screen.handle_event(NetworkEvent::Received {
            message: onoff::Status { present_on: true }
                .to_access_payload()
                .unwrap(),
            source: UnicastAddress::new(0x0001),
        });
        assert_eq!(screen.view().0.len(), count);
    }
    #[test]
    fn test_events_before_appear_ignored() {
        let group = samples::sample_network()
            .group(samples::LIVING_ROOM)
            .unwrap()
            .clone();
        let (manager, _events) = LoopbackManager::new(Some(samples::sample_network()));
        let mut screen = GroupControl::new(
            group,
            manager,
            RecordingView::default(),
            GroupControlConfig::default(),
            logger(),
        );
        screen.load();
        screen.handle_event(NetworkEvent::Received {
            message: NodeReset.to_access_payload().unwrap(),
            source: UnicastAddress::new(0x0003),
        });
        assert!(!screen.is_dismissed());
        assert_eq!(screen.view().0, vec![ViewCall::Title("Living Room".to_owned()), ViewCall::Reload]);
    }
    #[tokio::test]
    async fn test_run_until_reset() {
        let (mut screen, events) = screen();
        let mut cell = OnOffCell::new(samples::HOME_KEY, 2);
        cell.off(&mut screen);
        screen
            .manager_mut()
            .receive(
                NodeReset.to_access_payload().unwrap(),
                UnicastAddress::new(0x0001),
            )
            .unwrap();
        screen.run(events).await;
        assert!(screen.is_dismissed());
        assert!(screen.view().0.contains(&ViewCall::DismissProgress));
        assert_eq!(screen.view().last(), Some(&ViewCall::PopToRoot));
    }
    #[tokio::test]
    async fn test_queued_send_delivered_after_events_close() {
        let (mut screen, mut events) = screen();
        screen.manager_mut().close_bearer().unwrap();
        let mut cell = OnOffCell::new(samples::HOME_KEY, 2);
        cell.on(&mut screen);
        assert!(screen.has_pending_send());
        screen.manager_mut().open_bearer().unwrap();

        screen.flush_pending(&mut events);
        assert!(!screen.has_pending_send());
        screen.manager_mut().close_events();
        screen.run(events).await;

        assert_eq!(screen.manager().sent().len(), 1);
        assert!(!screen.view().0.contains(&alert()));
        assert_eq!(screen.view().last(), Some(&ViewCall::DismissProgress));
    }
}
