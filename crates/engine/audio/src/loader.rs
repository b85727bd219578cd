//! Background setup of the ambient sound attached to the target
//!
//! Decoding a sound file can take long enough to stall the first frames, so
//! the preload/create/position/play sequence runs on its own thread. The
//! render thread keeps going and consults [`AmbientSound::is_ready`] (through
//! [`AmbientSound::set_position`]) before touching the sound object; until the
//! task finishes, position updates are skipped.
//!
//! The engine stays locked while a file decodes. Per-frame callers go through
//! [`try_lock_engine`](crate::try_lock_engine) and skip a tick rather than wait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use glam::Vec3;
use tracing::{debug, error, info};

use crate::engine::{lock_engine, SharedAudioEngine};
use crate::{Error, Result, SoundObjectId};

/// Current status of the loading task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Task is still running
    Pending,
    /// Sound object exists and is playing
    Ready(SoundObjectId),
    /// Task failed with an error
    Failed(String),
    /// Task was cancelled before publishing a handle
    Cancelled,
}

impl LoadStatus {
    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadStatus::Pending)
    }
}

#[derive(Debug)]
struct Shared {
    status: Mutex<LoadStatus>,
    cancel_flag: AtomicBool,
}

impl Shared {
    fn status(&self) -> LoadStatus {
        self.status
            .lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_status(&self, status: LoadStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel_flag.load(Ordering::Acquire) {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Handle for the looping sound bound to the target
#[derive(Debug)]
pub struct AmbientSound {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl AmbientSound {
    /// Start loading `file` on a background thread
    ///
    /// Once decoded, the sound object is placed at `position` and played in
    /// a loop.
    pub fn spawn(engine: SharedAudioEngine, file: impl Into<String>, position: Vec3) -> Self {
        let file = file.into();
        let shared = Arc::new(Shared {
            status: Mutex::new(LoadStatus::Pending),
            cancel_flag: AtomicBool::new(false),
        });

        let task = Arc::clone(&shared);
        let handle = thread::spawn(move || match load(&engine, &task, &file, position) {
            Ok(id) => info!("Ambient sound {} ready as {}", file, id),
            Err(Error::Cancelled) => {
                debug!("Ambient sound {} cancelled", file);
                task.set_status(LoadStatus::Cancelled);
            }
            Err(e) => {
                error!("Ambient sound {} failed: {}", file, e);
                task.set_status(LoadStatus::Failed(e.to_string()));
            }
        });

        Self {
            shared,
            handle: Some(handle),
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.shared.status()
    }

    /// Handle of the playing sound object, once ready
    pub fn sound_id(&self) -> Option<SoundObjectId> {
        match self.status() {
            LoadStatus::Ready(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.sound_id().is_some()
    }

    /// Request cancellation; takes effect between loading steps
    pub fn cancel(&self) {
        self.shared.cancel_flag.store(true, Ordering::Release);
    }

    /// Block until the loading thread exits
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                self.shared.set_status(LoadStatus::Failed("loader thread panicked".to_string()));
            }
        }
    }

    /// Move the sound object; returns false while the sound is not ready
    pub fn set_position(&self, engine: &SharedAudioEngine, position: Vec3) -> bool {
        let Some(id) = self.sound_id() else {
            return false;
        };
        match lock_engine(engine).set_sound_object_position(id, position) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to move ambient sound: {}", e);
                false
            }
        }
    }

    /// Cancel loading and silence the sound if it already plays
    ///
    /// Waits for the engine, so a loader in the middle of decoding delays
    /// this call. After it returns no sound from this task is playing.
    pub fn stop(&self, engine: &SharedAudioEngine) {
        self.cancel();
        let mut engine = lock_engine(engine);
        if let Some(id) = self.sound_id() {
            match engine.stop_sound(id) {
                Ok(()) => debug!("Ambient sound {} stopped", id),
                Err(e) => error!("Failed to stop ambient sound: {}", e),
            }
        }
    }
}

impl Drop for AmbientSound {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn load(
    engine: &SharedAudioEngine,
    task: &Shared,
    file: &str,
    position: Vec3,
) -> Result<SoundObjectId> {
    task.check_cancelled()?;
    lock_engine(engine).preload_sound_file(file)?;

    // The last cancel check and the Ready publication share one engine lock
    // with `stop`, so a started sound always has a published handle.
    let mut engine = lock_engine(engine);
    task.check_cancelled()?;
    let id = engine.create_sound_object(file)?;
    engine.set_sound_object_position(id, position)?;
    engine.play_sound(id, true)?;
    task.set_status(LoadStatus::Ready(id));
    Ok(id)
}
