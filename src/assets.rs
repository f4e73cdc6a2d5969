use glam::Vec3;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::animation::DuckyPart;
use crate::config::FOX_CLIP_DURATION;

/// An asset-backed entity that became available.
#[derive(Clone, Debug, PartialEq)]
pub enum AssetEvent {
    /// Fox model loaded: its unscaled local bounds and the run clip length.
    FoxReady {
        bounds_min: Vec3,
        bounds_max: Vec3,
        clip_duration: f32,
    },
    DuckyPartReady(DuckyPart),
}

/// Receiving end polled by the simulation at the start of every tick.
pub struct AssetInbox {
    receiver: Receiver<AssetEvent>,
    disconnected: bool,
}

#[derive(Clone)]
pub struct AssetSender(Sender<AssetEvent>);

impl AssetSender {
    pub fn send(&self, event: AssetEvent) {
        if self.0.send(event).is_err() {
            log::warn!("Asset event dropped: simulation is gone");
        }
    }
}

pub fn channel() -> (AssetSender, AssetInbox) {
    let (sender, receiver) = mpsc::channel();
    (
        AssetSender(sender),
        AssetInbox {
            receiver,
            disconnected: false,
        },
    )
}

impl AssetInbox {
    /// Everything that arrived since the last poll. Never blocks.
    pub fn drain(&mut self) -> Vec<AssetEvent> {
        let mut events = Vec::new();
        if self.disconnected {
            return events;
        }
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::debug!("Asset loader finished");
                    self.disconnected = true;
                    break;
                }
            }
        }
        events
    }
}

/// The stock models, in the order the loader announces them.
pub fn builtin_assets() -> Vec<AssetEvent> {
    vec![
        AssetEvent::DuckyPartReady(DuckyPart::Body),
        AssetEvent::DuckyPartReady(DuckyPart::RightLeg),
        AssetEvent::DuckyPartReady(DuckyPart::LeftLeg),
        AssetEvent::DuckyPartReady(DuckyPart::Bow),
        AssetEvent::FoxReady {
            bounds_min: Vec3::new(-3.0, 0.0, -8.0),
            bounds_max: Vec3::new(3.0, 10.0, 8.0),
            clip_duration: FOX_CLIP_DURATION,
        },
    ]
}

/// Delivers the stock models from a background thread, like a loader whose
/// callbacks land while frames are already running.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_builtin_loader(sender: AssetSender) {
    std::thread::spawn(move || {
        for event in builtin_assets() {
            std::thread::sleep(std::time::Duration::from_millis(50));
            log::debug!("Loaded {:?}", event);
            sender.send(event);
        }
    });
}

#[cfg(target_arch = "wasm32")]
pub fn spawn_builtin_loader(sender: AssetSender) {
    wasm_bindgen_futures::spawn_local(async move {
        for event in builtin_assets() {
            log::debug!("Loaded {:?}", event);
            sender.send(event);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_pending_events_in_order() {
        let (sender, mut inbox) = channel();
        assert!(inbox.drain().is_empty());

        sender.send(AssetEvent::DuckyPartReady(DuckyPart::Bow));
        sender.send(AssetEvent::DuckyPartReady(DuckyPart::Body));
        assert_eq!(
            inbox.drain(),
            vec![
                AssetEvent::DuckyPartReady(DuckyPart::Bow),
                AssetEvent::DuckyPartReady(DuckyPart::Body),
            ]
        );
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn disconnected_loader_keeps_delivered_events() {
        let (sender, mut inbox) = channel();
        sender.send(AssetEvent::DuckyPartReady(DuckyPart::LeftLeg));
        drop(sender);
        assert_eq!(inbox.drain().len(), 1);
        assert!(inbox.drain().is_empty());
    }
}
