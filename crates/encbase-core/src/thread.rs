// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Starting OS threads for encoder workers.
//!
//! A worker is an entry function taking one argument and returning an integer
//! status, the same shape as a native thread start routine. Spawning only
//! creates the thread; joining, detaching and scheduling stay with the caller.

use crate::config::ThreadConfig;
use crate::error::{CoreError, CoreResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::thread::{self, JoinHandle, Thread, ThreadId};

/// A plain worker entry point.
pub type ThreadEntry<T> = fn(T) -> i32;

/// Identifies a started thread.
///
/// Dropping the handle detaches the thread.
#[derive(Debug)]
pub struct ThreadHandle {
    name: String,
    inner: JoinHandle<i32>,
}

impl ThreadHandle {
    /// The name the thread was started with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The OS thread this handle refers to.
    pub fn thread(&self) -> &Thread {
        self.inner.thread()
    }

    /// The unique identifier of the thread.
    pub fn thread_id(&self) -> ThreadId {
        self.inner.thread().id()
    }

    /// Returns `true` once the entry function has returned.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Waits for the thread and returns the status produced by its entry function.
    pub fn join(self) -> CoreResult<i32> {
        let name = self.name;
        self.inner
            .join()
            .map_err(|_| CoreError::ThreadPanicked { name })
    }
}

/// Creates named worker threads from a [`ThreadConfig`].
#[derive(Debug)]
pub struct ThreadSpawner {
    name_prefix: String,
    stack_size: Option<usize>,
    next_index: AtomicUsize,
}

impl ThreadSpawner {
    /// Creates a spawner using the given thread settings.
    pub fn new(config: &ThreadConfig) -> Self {
        Self {
            name_prefix: config.name_prefix.clone(),
            stack_size: config.stack_size,
            next_index: AtomicUsize::new(0),
        }
    }

    /// Starts a new thread running `entry(arg)`.
    ///
    /// Threads are named `"{prefix}-{n}"` where `n` counts the spawns made by
    /// this spawner.
    ///
    /// ## Errors
    /// [`CoreError::ThreadSpawn`] if the OS cannot create the thread.
    pub fn spawn<F, T>(&self, entry: F, arg: T) -> CoreResult<ThreadHandle>
    where
        F: FnOnce(T) -> i32 + Send + 'static,
        T: Send + 'static,
    {
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        let name = format!("{}-{}", self.name_prefix, index);
        self.spawn_named(name, entry, arg)
    }

    /// Starts a new thread with an explicit name.
    pub fn spawn_named<F, T>(
        &self,
        name: impl Into<String>,
        entry: F,
        arg: T,
    ) -> CoreResult<ThreadHandle>
    where
        F: FnOnce(T) -> i32 + Send + 'static,
        T: Send + 'static,
    {
        let name = name.into();
        let mut builder = thread::Builder::new().name(name.clone());
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }

        match builder.spawn(move || entry(arg)) {
            Ok(inner) => {
                log::debug!("Spawned thread '{name}'");
                Ok(ThreadHandle { name, inner })
            }
            Err(source) => {
                log::error!("Failed to spawn thread '{name}': {source}");
                Err(CoreError::ThreadSpawn { name, source })
            }
        }
    }

    /// Number of threads this spawner has been asked to start.
    pub fn spawned_count(&self) -> usize {
        self.next_index.load(Ordering::Relaxed)
    }
}

impl Default for ThreadSpawner {
    fn default() -> Self {
        Self::new(&ThreadConfig::default())
    }
}

/// Starts a new thread running `entry(arg)` with the default thread settings.
pub fn spawn<F, T>(entry: F, arg: T) -> CoreResult<ThreadHandle>
where
    F: FnOnce(T) -> i32 + Send + 'static,
    T: Send + 'static,
{
    static DEFAULT_SPAWNER: OnceLock<ThreadSpawner> = OnceLock::new();
    DEFAULT_SPAWNER
        .get_or_init(ThreadSpawner::default)
        .spawn(entry, arg)
}
