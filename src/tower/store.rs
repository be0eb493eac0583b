//! Parameter Store
//!
//! Owns the live [`TowerParams`] and forces every write through the curve
//! clamp before telling subscribers what changed. The assembler and any other
//! consumer observe the parameters only through these notifications.

use log::{debug, trace};

use super::curve::{Channel, CurvePoint, HandleId};
use super::params::TowerParams;

/// What kind of edit just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamChange {
    /// Segment count, level count or height changed: the template may need
    /// regenerating and the whole mesh is rebuilt.
    Structural,
    /// Scalars, colors or easings changed: floors are re-instanced.
    Cosmetic,
    /// One channel's curve handles or mode changed.
    Curve(Channel),
}

impl ParamChange {
    pub fn is_structural(&self) -> bool {
        matches!(self, ParamChange::Structural)
    }
}

/// Subscriber callback. Receives the already-clamped parameters.
pub type ParamListener = Box<dyn FnMut(ParamChange, &mut TowerParams)>;

pub struct ParameterStore {
    params: TowerParams,
    listeners: Vec<ParamListener>,
    revision: u64,
}

impl ParameterStore {
    pub fn new(mut params: TowerParams) -> Self {
        params.clamp_curves();
        Self {
            params,
            listeners: Vec::new(),
            revision: 0,
        }
    }

    pub fn params(&self) -> &TowerParams {
        &self.params
    }

    /// Incremented once per notification.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a change listener. It is not called for the current state;
    /// use [`ParameterStore::notify`] to prime it.
    pub fn subscribe(&mut self, listener: ParamListener) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Apply an arbitrary edit, clamp, then notify.
    pub fn update<F>(&mut self, change: ParamChange, edit: F)
    where
        F: FnOnce(&mut TowerParams),
    {
        edit(&mut self.params);
        self.params.clamp_curves();
        self.notify(change);
    }

    /// Write one handle of `channel`. Returns the value actually stored.
    pub fn set_handle(&mut self, channel: Channel, handle: HandleId, point: CurvePoint) -> CurvePoint {
        let stored = self.params.curve_mut(channel).set_handle(handle, point);
        trace!(
            "{} {:?} <- ({:.3}, {:.3})",
            channel, handle, stored.x, stored.y
        );
        self.params.clamp_curves();
        self.notify(ParamChange::Curve(channel));
        stored
    }

    pub fn set_curve_enabled(&mut self, channel: Channel, enabled: bool) {
        self.update(ParamChange::Curve(channel), |p| {
            p.curve_mut(channel).enabled = enabled;
        });
    }

    /// Re-run the clamp on one channel, notifying only if anything moved.
    pub fn reclamp(&mut self, channel: Channel) -> bool {
        let changed = self.params.curve_mut(channel).clamp();
        if changed {
            debug!("{} curve re-clamped", channel);
            self.notify(ParamChange::Curve(channel));
        }
        changed
    }

    /// Replace every parameter (snapshot import). Subscribers see a
    /// structural rebuild followed by a cosmetic update.
    pub fn apply_snapshot(&mut self, mut params: TowerParams) {
        params.clamp_curves();
        self.params = params;
        self.notify(ParamChange::Structural);
        self.notify(ParamChange::Cosmetic);
    }

    pub fn snapshot(&self) -> TowerParams {
        self.params.clone()
    }

    /// Send `change` to every listener with the current parameters.
    pub fn notify(&mut self, change: ParamChange) {
        self.revision += 1;
        for listener in &mut self.listeners {
            listener(change, &mut self.params);
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(TowerParams::default())
    }
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("params", &self.params)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}
