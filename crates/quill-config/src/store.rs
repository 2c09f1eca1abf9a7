//! Observable settings store
//!
//! Values are keyed by option identity. Every `set` synchronously notifies the
//! callbacks subscribed to that option, in subscription order, before it
//! returns. Callbacks run on the caller's thread with no store lock held, so
//! they are free to read the store or set *other* options.
//!
//! Sets of the same option are serialized: storing the value and running its
//! callbacks happen under a per-option gate, so the last value stored is also
//! the last one every callback observed.

use crate::option::SettingOption;
use crate::value::{FromSettingValue, SettingValue};
use quill_foundation::{QuillError, QuillResult};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};
use tracing::{debug, trace, warn};

type Callback = Arc<dyn Fn(&SettingValue) + Send + Sync>;

/// Handle identifying one registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    callback: Callback,
}

/// Per-language option values with change notification
pub struct SettingsStore<O: SettingOption> {
    values: RwLock<HashMap<O, SettingValue>>,
    subscribers: Mutex<HashMap<O, Vec<Subscriber>>>,
    /// Options whose callbacks are currently running, per thread
    dispatching: Mutex<HashSet<(O, ThreadId)>>,
    gates: Mutex<HashMap<O, Arc<Mutex<()>>>>,
    next_id: AtomicU64,
}

impl<O: SettingOption> Default for SettingsStore<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: SettingOption> SettingsStore<O> {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            subscribers: Mutex::new(HashMap::new()),
            dispatching: Mutex::new(HashSet::new()),
            gates: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Read a value, failing if it is unset.
    ///
    /// Unset required options yield `MissingRequiredSetting`, unset optional
    /// ones `UnsetSetting`. Both carry the option name.
    pub fn get<T: FromSettingValue>(&self, option: O) -> QuillResult<T> {
        let Some(value) = self.value(option) else {
            return Err(if option.is_required() {
                QuillError::missing_required(option.name())
            } else {
                QuillError::unset(option.name())
            });
        };

        T::from_setting(&value).ok_or_else(|| {
            QuillError::type_mismatch(option.name(), T::KIND.as_str(), value.kind().as_str())
        })
    }

    /// Read a value if present. Never fails; a value of the wrong kind is
    /// logged and treated as absent.
    pub fn get_optional<T: FromSettingValue>(&self, option: O) -> Option<T> {
        let value = self.value(option)?;
        let converted = T::from_setting(&value);
        if converted.is_none() {
            warn!(
                option = option.name(),
                expected = %T::KIND,
                actual = %value.kind(),
                "Setting read with the wrong type"
            );
        }
        converted
    }

    /// Raw stored value
    pub fn value(&self, option: O) -> Option<SettingValue> {
        read_lock(&self.values).get(&option).cloned()
    }

    /// Store a value and notify the option's subscribers in order.
    ///
    /// Fails without storing if the value kind does not match the option, or
    /// if called from inside one of this option's own callbacks.
    pub fn set(&self, option: O, value: impl Into<SettingValue>) -> QuillResult<()> {
        let value = value.into();
        if value.kind() != option.kind() {
            return Err(QuillError::type_mismatch(
                option.name(),
                option.kind().as_str(),
                value.kind().as_str(),
            ));
        }

        let _guard = DispatchGuard::enter(&self.dispatching, option)?;
        let gate = self.gate(option);
        let _serial = lock(&gate);

        write_lock(&self.values).insert(option, value.clone());

        let callbacks: Vec<Callback> = lock(&self.subscribers)
            .get(&option)
            .map(|subs| subs.iter().map(|s| s.callback.clone()).collect())
            .unwrap_or_default();

        debug!(
            option = option.name(),
            value = %value,
            subscribers = callbacks.len(),
            "Setting changed"
        );

        for callback in callbacks {
            callback(&value);
        }

        Ok(())
    }

    /// Register a change callback.
    ///
    /// With `replay_now`, a callback registered on an option that already has
    /// a value is invoked once with it before this returns, so late
    /// subscribers converge without a separate initialization pass.
    pub fn on_change<F>(&self, option: O, callback: F, replay_now: bool) -> SubscriptionId
    where
        F: Fn(&SettingValue) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let callback: Callback = Arc::new(callback);

        lock(&self.subscribers)
            .entry(option)
            .or_default()
            .push(Subscriber {
                id,
                callback: callback.clone(),
            });

        trace!(option = option.name(), ?id, replay_now, "Subscribed to setting");

        if replay_now {
            // Registering from one of this option's own callbacks already
            // holds its gate.
            let gate = self.gate(option);
            let _serial = (!self.is_dispatching(option)).then(|| lock(&gate));
            if let Some(value) = self.value(option) {
                callback(&value);
            }
        }

        id
    }

    /// Typed variant of [`on_change`](Self::on_change)
    pub fn on_change_as<T, F>(&self, option: O, callback: F, replay_now: bool) -> SubscriptionId
    where
        T: FromSettingValue,
        F: Fn(T) + Send + Sync + 'static,
    {
        self.on_change(
            option,
            move |value| match T::from_setting(value) {
                Some(typed) => callback(typed),
                None => warn!(
                    option = option.name(),
                    expected = %T::KIND,
                    actual = %value.kind(),
                    "Ignoring change notification of the wrong type"
                ),
            },
            replay_now,
        )
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = lock(&self.subscribers);
        for subs in subscribers.values_mut() {
            if let Some(index) = subs.iter().position(|s| s.id == id) {
                subs.remove(index);
                return true;
            }
        }
        false
    }

    /// Number of callbacks registered for `option`
    pub fn subscriber_count(&self, option: O) -> usize {
        lock(&self.subscribers).get(&option).map_or(0, Vec::len)
    }

    fn gate(&self, option: O) -> Arc<Mutex<()>> {
        lock(&self.gates).entry(option).or_default().clone()
    }

    fn is_dispatching(&self, option: O) -> bool {
        lock(&self.dispatching).contains(&(option, thread::current().id()))
    }

    /// Required options without a value, in declaration order
    pub fn missing_required(&self) -> Vec<O> {
        let values = read_lock(&self.values);
        O::all()
            .iter()
            .copied()
            .filter(|option| option.is_required() && !values.contains_key(option))
            .collect()
    }

    /// Fail with the first required option lacking a value
    pub fn validate_required(&self) -> QuillResult<()> {
        match self.missing_required().first() {
            Some(option) => Err(QuillError::missing_required(option.name())),
            None => Ok(()),
        }
    }

    /// Current values in declaration order
    pub fn snapshot(&self) -> Vec<(O, SettingValue)> {
        let values = read_lock(&self.values);
        O::all()
            .iter()
            .filter_map(|option| values.get(option).map(|v| (*option, v.clone())))
            .collect()
    }
}

/// Marks an option as dispatching on the current thread until dropped
struct DispatchGuard<'a, O: SettingOption> {
    dispatching: &'a Mutex<HashSet<(O, ThreadId)>>,
    key: (O, ThreadId),
}

impl<'a, O: SettingOption> DispatchGuard<'a, O> {
    fn enter(dispatching: &'a Mutex<HashSet<(O, ThreadId)>>, option: O) -> QuillResult<Self> {
        let key = (option, thread::current().id());
        if !lock(dispatching).insert(key) {
            warn!(option = option.name(), "Rejected reentrant set from a change callback");
            return Err(QuillError::ReentrantSetting {
                option: option.name().to_string(),
            });
        }
        Ok(Self { dispatching, key })
    }
}

impl<O: SettingOption> Drop for DispatchGuard<'_, O> {
    fn drop(&mut self) {
        lock(self.dispatching).remove(&self.key);
    }
}

// A panicking callback must not wedge the store for everyone else.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
