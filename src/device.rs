//! Device detection
//!
//! Widths below 768 are mobile, 768 to 1023 tablet, 1024 and above desktop.
//! [`DeviceDetection`] keeps a [`DeviceInfo`] current by listening to
//! [`Viewport`] resizes; the listener is released when the detection is
//! dropped.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use tracing::debug;

pub const TABLET_MIN_WIDTH: u32 = 768;
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

/// Width assumed when no viewport is available
pub const DEFAULT_WIDTH: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

pub fn device_type(width: u32) -> DeviceType {
    if width < TABLET_MIN_WIDTH {
        DeviceType::Mobile
    } else if width < DESKTOP_MIN_WIDTH {
        DeviceType::Tablet
    } else {
        DeviceType::Desktop
    }
}

pub fn is_mobile(width: u32) -> bool {
    device_type(width) == DeviceType::Mobile
}

pub fn is_tablet(width: u32) -> bool {
    device_type(width) == DeviceType::Tablet
}

pub fn is_desktop(width: u32) -> bool {
    device_type(width) == DeviceType::Desktop
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_desktop: bool,
    pub device_type: DeviceType,
    pub width: u32,
}

impl DeviceInfo {
    pub fn from_width(width: u32) -> Self {
        let device_type = device_type(width);
        Self {
            is_mobile: device_type == DeviceType::Mobile,
            is_tablet: device_type == DeviceType::Tablet,
            is_desktop: device_type == DeviceType::Desktop,
            device_type,
            width,
        }
    }
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self::from_width(DEFAULT_WIDTH)
    }
}

type ResizeCallback = Arc<dyn Fn(u32) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    callbacks: BTreeMap<u64, ResizeCallback>,
}

/// Window width plus the resize listeners observing it
#[derive(Clone)]
pub struct Viewport {
    width: Arc<RwLock<u32>>,
    listeners: Arc<Mutex<Listeners>>,
}

impl Viewport {
    pub fn new(width: u32) -> Self {
        Self {
            width: Arc::new(RwLock::new(width)),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    pub fn width(&self) -> u32 {
        *self.width.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Update the width and notify every listener.
    ///
    /// Callbacks run without the listener lock held, so they may register or
    /// drop listeners themselves.
    pub fn resize(&self, width: u32) {
        *self.width.write().unwrap_or_else(PoisonError::into_inner) = width;

        let callbacks: Vec<ResizeCallback> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .values()
            .cloned()
            .collect();

        for callback in callbacks {
            callback(width);
        }
    }

    /// Register a resize callback; it stays registered until the guard drops
    pub fn add_resize_listener<F>(&self, callback: F) -> ResizeListener
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.callbacks.insert(id, Arc::new(callback));

        debug!("Resize listener {} registered", id);

        ResizeListener {
            id,
            listeners: Arc::clone(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .len()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

/// Registration handle; dropping it removes the listener
#[must_use = "the listener is removed as soon as this guard is dropped"]
pub struct ResizeListener {
    id: u64,
    listeners: Arc<Mutex<Listeners>>,
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        listeners.callbacks.remove(&self.id);
        debug!("Resize listener {} removed", self.id);
    }
}

/// Device information that follows viewport resizes while mounted
pub struct DeviceDetection {
    device: Arc<RwLock<DeviceInfo>>,
    _listener: ResizeListener,
}

impl DeviceDetection {
    pub fn mount(viewport: &Viewport) -> Self {
        let device = Arc::new(RwLock::new(DeviceInfo::from_width(viewport.width())));

        let shared = Arc::clone(&device);
        let listener = viewport.add_resize_listener(move |width| {
            *shared.write().unwrap_or_else(PoisonError::into_inner) = DeviceInfo::from_width(width);
        });

        Self {
            device,
            _listener: listener,
        }
    }

    pub fn device(&self) -> DeviceInfo {
        *self.device.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop following the viewport
    pub fn unmount(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_exact() {
        assert_eq!(device_type(0), DeviceType::Mobile);
        assert_eq!(device_type(767), DeviceType::Mobile);
        assert_eq!(device_type(768), DeviceType::Tablet);
        assert_eq!(device_type(1023), DeviceType::Tablet);
        assert_eq!(device_type(1024), DeviceType::Desktop);
        assert_eq!(device_type(u32::MAX), DeviceType::Desktop);
    }

    #[test]
    fn classification_partitions_widths() {
        for width in (0..2048).chain([u32::MAX - 1, u32::MAX]) {
            let flags = [is_mobile(width), is_tablet(width), is_desktop(width)];
            assert_eq!(flags.iter().filter(|f| **f).count(), 1, "width {width}");

            let info = DeviceInfo::from_width(width);
            assert_eq!(
                [info.is_mobile, info.is_tablet, info.is_desktop],
                flags,
                "width {width}"
            );
        }
    }

    #[test]
    fn default_is_desktop() {
        assert_eq!(DeviceInfo::default().device_type, DeviceType::Desktop);
        assert_eq!(Viewport::default().width(), DEFAULT_WIDTH);
    }

    #[test]
    fn detection_follows_resizes_while_mounted() {
        let viewport = Viewport::new(1280);
        let detection = DeviceDetection::mount(&viewport);
        assert_eq!(detection.device().device_type, DeviceType::Desktop);
        assert_eq!(viewport.listener_count(), 1);

        viewport.resize(800);
        assert_eq!(detection.device().device_type, DeviceType::Tablet);
        assert_eq!(detection.device().width, 800);

        viewport.resize(375);
        assert!(detection.device().is_mobile);
    }

    #[test]
    fn unmount_releases_listener() {
        let viewport = Viewport::new(1280);
        let first = DeviceDetection::mount(&viewport);
        let second = DeviceDetection::mount(&viewport);
        assert_eq!(viewport.listener_count(), 2);

        first.unmount();
        assert_eq!(viewport.listener_count(), 1);

        drop(second);
        assert_eq!(viewport.listener_count(), 0);

        // resizing with nobody listening is fine
        viewport.resize(500);
        assert_eq!(viewport.width(), 500);
    }

    #[test]
    fn listeners_may_reenter_the_viewport() {
        use std::sync::mpsc;
        use std::time::Duration;

        let viewport = Viewport::new(1280);
        let (tx, rx) = mpsc::channel();

        let worker = {
            let viewport = viewport.clone();
            std::thread::spawn(move || {
                let inner = viewport.clone();
                let seen = Arc::new(Mutex::new(Vec::new()));
                let record = Arc::clone(&seen);
                let _guard = viewport.add_resize_listener(move |width| {
                    record
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((width, inner.listener_count()));
                });

                // a listener that removes itself while being notified
                let slot: Arc<Mutex<Option<ResizeListener>>> = Arc::new(Mutex::new(None));
                let own = Arc::clone(&slot);
                let once = viewport.add_resize_listener(move |_| {
                    drop(own.lock().unwrap_or_else(PoisonError::into_inner).take());
                });
                *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(once);

                viewport.resize(800);
                viewport.resize(600);

                let seen = seen.lock().unwrap_or_else(PoisonError::into_inner).clone();
                tx.send((seen, viewport.listener_count())).expect("send");
            })
        };

        let (seen, remaining) = rx
            .recv_timeout(Duration::from_secs(3))
            .expect("resize deadlocked while a listener used the viewport");
        worker.join().expect("worker");

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], (600, 1));
        assert_eq!(remaining, 1);
    }

    #[test]
    fn listener_guard_controls_callback_lifetime() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let viewport = Viewport::new(1000);
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let guard = viewport.add_resize_listener(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        viewport.resize(900);
        drop(guard);
        viewport.resize(800);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
