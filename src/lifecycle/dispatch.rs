//! # Lifecycle Dispatch
//!
//! The host-facing callback surface: one thin entry point per engine event,
//! each walking the matching precomputed subscriber list in its order-space
//! order. A failing subscriber is logged with full context and never blocks
//! delivery to the rest: one broken module degrades to "that feature is
//! unavailable this cycle", never to a lost event.
//!
//! Scene-opened and new-scene events with a [`SceneOpenMode::Single`]
//! transition additionally trigger a full module reload once the dispatch
//! pass has finished. Scene events are suppressed entirely while a build is
//! in progress or while the host has blocked scene callbacks.

use tracing::{debug, error, info};

use crate::engine::{BuildInfo, DeleteOptions, DeleteOutcome, SceneOpenMode, SceneRef};
use crate::framework::error::HookResult;
use crate::framework::module::{AssetHooks, BehaviorHooks, BuildHooks, SceneHooks};

use super::ModuleHost;

impl ModuleHost {
    // =====================================================================
    // Behavior forwarding
    // =====================================================================

    /// Forwards the engine's behavior-awake event. The first awake of each
    /// load cycle also re-runs the functionality-injection pass, to catch
    /// providers that did not exist at scene-analysis time.
    pub fn behavior_awake(&mut self) {
        self.dispatch_behavior("awake", |h| h.awake());
        if self.is_loaded() && !self.awake_injection_done {
            self.awake_injection_done = true;
            self.inject_functionality(false);
        }
    }

    pub fn behavior_enable(&mut self) {
        self.dispatch_behavior("enable", |h| h.enable());
    }

    pub fn behavior_start(&mut self) {
        self.dispatch_behavior("start", |h| h.start());
    }

    pub fn behavior_update(&mut self) {
        self.dispatch_behavior("update", |h| h.update());
    }

    pub fn behavior_disable(&mut self) {
        self.dispatch_behavior("disable", |h| h.disable());
    }

    pub fn behavior_destroy(&mut self) {
        self.dispatch_behavior("destroy", |h| h.destroy());
    }

    fn dispatch_behavior(
        &mut self,
        hook: &'static str,
        mut f: impl FnMut(&mut dyn BehaviorHooks) -> HookResult,
    ) {
        for slot in 0..self.behavior_list.len() {
            let i = self.behavior_list[slot];
            let entry = &mut self.modules[i];
            let name = entry.name;
            if let Some(hooks) = entry.module.behavior_hooks() {
                if let Err(e) = f(hooks) {
                    error!(module = name, hook, error = %e, "Behavior hook failed");
                }
            }
        }
    }

    // =====================================================================
    // Scene forwarding
    // =====================================================================

    pub fn scene_opening(&mut self, path: &str, mode: SceneOpenMode) {
        if self.scene_events_suppressed() {
            return;
        }
        self.dispatch_scene("scene_opening", |h| h.scene_opening(path, mode));
    }

    pub fn scene_opened(&mut self, scene: &SceneRef, mode: SceneOpenMode) {
        if self.scene_events_suppressed() {
            return;
        }
        self.dispatch_scene("scene_opened", |h| h.scene_opened(scene, mode));
        if mode == SceneOpenMode::Single {
            info!(scene = %scene.name, "Single-scene transition; reloading modules");
            self.reload_modules();
        }
    }

    pub fn scene_loaded(&mut self, scene: &SceneRef) {
        if self.scene_events_suppressed() {
            return;
        }
        self.dispatch_scene("scene_loaded", |h| h.scene_loaded(scene));
    }

    pub fn scene_unloaded(&mut self, scene: &SceneRef) {
        if self.scene_events_suppressed() {
            return;
        }
        self.dispatch_scene("scene_unloaded", |h| h.scene_unloaded(scene));
    }

    pub fn active_scene_changed(&mut self, previous: &SceneRef, current: &SceneRef) {
        if self.scene_events_suppressed() {
            return;
        }
        self.dispatch_scene("active_scene_changed", |h| {
            h.active_scene_changed(previous, current)
        });
    }

    pub fn new_scene_created(&mut self, scene: &SceneRef, mode: SceneOpenMode) {
        if self.scene_events_suppressed() {
            return;
        }
        self.dispatch_scene("new_scene_created", |h| h.new_scene_created(scene, mode));
        if mode == SceneOpenMode::Single {
            info!(scene = %scene.name, "New single scene; reloading modules");
            self.reload_modules();
        }
    }

    fn scene_events_suppressed(&self) -> bool {
        if self.building {
            debug!("Scene event suppressed: build in progress");
            return true;
        }
        if self.scene_callbacks_blocked {
            debug!("Scene event suppressed: scene callbacks blocked");
            return true;
        }
        false
    }

    fn dispatch_scene(
        &mut self,
        hook: &'static str,
        mut f: impl FnMut(&mut dyn SceneHooks) -> HookResult,
    ) {
        for slot in 0..self.scene_list.len() {
            let i = self.scene_list[slot];
            let entry = &mut self.modules[i];
            let name = entry.name;
            if let Some(hooks) = entry.module.scene_hooks() {
                if let Err(e) = f(hooks) {
                    error!(module = name, hook, error = %e, "Scene hook failed");
                }
            }
        }
    }

    // =====================================================================
    // Build forwarding
    // =====================================================================

    /// Marks the build in progress (which suppresses scene events and drops
    /// load requests) and forwards the pre-process event.
    pub fn build_pre_process(&mut self, build: &BuildInfo) {
        info!(target = %build.target, "Build pre-process");
        self.building = true;
        self.dispatch_build("pre_process", |h| h.pre_process(build));
    }

    pub fn build_process_scene(&mut self, scene: &SceneRef, build: &BuildInfo) {
        self.dispatch_build("process_scene", |h| h.process_scene(scene, build));
    }

    /// Forwards the post-process event and clears the build flag.
    pub fn build_post_process(&mut self, build: &BuildInfo) {
        self.dispatch_build("post_process", |h| h.post_process(build));
        self.building = false;
        info!(target = %build.target, "Build post-process");
    }

    fn dispatch_build(
        &mut self,
        hook: &'static str,
        mut f: impl FnMut(&mut dyn BuildHooks) -> HookResult,
    ) {
        for slot in 0..self.build_list.len() {
            let i = self.build_list[slot];
            let entry = &mut self.modules[i];
            let name = entry.name;
            if let Some(hooks) = entry.module.build_hooks() {
                if let Err(e) = f(hooks) {
                    error!(module = name, hook, error = %e, "Build hook failed");
                }
            }
        }
    }

    // =====================================================================
    // Asset forwarding
    // =====================================================================

    pub fn asset_will_create(&mut self, path: &str) {
        for slot in 0..self.asset_list.len() {
            let i = self.asset_list[slot];
            let entry = &mut self.modules[i];
            let name = entry.name;
            if let Some(hooks) = entry.module.asset_hooks() {
                if let Err(e) = hooks.will_create(path) {
                    error!(module = name, hook = "will_create", error = %e, "Asset hook failed");
                }
            }
        }
    }

    /// Threads the pending save list through every subscriber; each may
    /// filter it. A failing subscriber leaves the list unchanged for the
    /// next one.
    pub fn assets_will_save(&mut self, mut paths: Vec<String>) -> Vec<String> {
        for slot in 0..self.asset_list.len() {
            let i = self.asset_list[slot];
            let entry = &mut self.modules[i];
            let name = entry.name;
            if let Some(hooks) = entry.module.asset_hooks() {
                match hooks.will_save(paths.clone()) {
                    Ok(filtered) => paths = filtered,
                    Err(e) => {
                        error!(module = name, hook = "will_save", error = %e, "Asset hook failed")
                    }
                }
            }
        }
        paths
    }

    /// Asks every subscriber whether it handles the deletion itself. Any
    /// `DidDelete` answer flips the aggregate permanently; failures count as
    /// `DidNotDelete`.
    pub fn asset_will_delete(&mut self, path: &str, options: DeleteOptions) -> DeleteOutcome {
        let mut outcome = DeleteOutcome::DidNotDelete;
        for slot in 0..self.asset_list.len() {
            let i = self.asset_list[slot];
            let entry = &mut self.modules[i];
            let name = entry.name;
            if let Some(hooks) = entry.module.asset_hooks() {
                match hooks.will_delete(path, options) {
                    Ok(DeleteOutcome::DidDelete) => outcome = DeleteOutcome::DidDelete,
                    Ok(DeleteOutcome::DidNotDelete) => {}
                    Err(e) => {
                        error!(module = name, hook = "will_delete", error = %e, "Asset hook failed")
                    }
                }
            }
        }
        outcome
    }
}
