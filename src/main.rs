//! # Engine Shell Demo
//!
//! A minimal host application walking the module lifecycle end to end:
//!
//! 1. Register three module types (an audio output provider, a mixer that
//!    depends on it, and a build stamp module).
//! 2. Load the set and forward a few behavior ticks.
//! 3. Run a build pre/post pass.
//! 4. Tear everything down.
//!
//! Run with `RUST_LOG=info cargo run` to watch the host's structured logs;
//! `RUST_LOG=debug` additionally shows exclusion decisions and per-edge
//! dependency wiring.

use module_host::engine::BuildInfo;
use module_host::framework::{
    BehaviorHooks, BuildHooks, CapabilityId, EngineModule, HookResult, ModuleDescriptor,
    ModuleError, ModuleOrders, ModuleRegistry,
};
use module_host::lifecycle::settings::{ModuleConfig, Platform, RuntimeMode};
use module_host::lifecycle::tracing::setup_tracing;
use module_host::lifecycle::ModuleHost;
use tracing::info;

/// Capability satisfied by the audio output module and consumed by the
/// mixer.
const AUDIO_OUTPUT: CapabilityId = CapabilityId("demo.audio-output");

// =====================================================================
// Audio output: a plain provider module
// =====================================================================

struct AudioOutputModule {
    channels: u32,
}

impl AudioOutputModule {
    fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("demo::AudioOutputModule", |_| {
            Some(Box::new(AudioOutputModule { channels: 2 }))
        })
    }
}

impl EngineModule for AudioOutputModule {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn load(&mut self) -> HookResult {
        info!(channels = self.channels, "Audio output ready");
        Ok(())
    }

    fn provides(&self) -> &[CapabilityId] {
        &[AUDIO_OUTPUT]
    }
}

// =====================================================================
// Mixer: consumes the audio output capability, ticks with the engine
// =====================================================================

struct MixerModule {
    output_channels: Option<u32>,
    ticks: u64,
}

impl MixerModule {
    fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("demo::MixerModule", |_| {
            Some(Box::new(MixerModule {
                output_channels: None,
                ticks: 0,
            }))
        })
    }
}

impl EngineModule for MixerModule {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn behavior_hooks(&mut self) -> Option<&mut dyn BehaviorHooks> {
        Some(self)
    }

    fn dependencies(&self) -> &[CapabilityId] {
        &[AUDIO_OUTPUT]
    }

    fn connect_dependency(
        &mut self,
        _capability: CapabilityId,
        provider: &dyn EngineModule,
    ) -> HookResult {
        if let Some(output) = provider.as_any().downcast_ref::<AudioOutputModule>() {
            self.output_channels = Some(output.channels);
        }
        Ok(())
    }
}

impl BehaviorHooks for MixerModule {
    fn awake(&mut self) -> HookResult {
        info!(channels = ?self.output_channels, "Mixer awake");
        Ok(())
    }

    fn update(&mut self) -> HookResult {
        self.ticks += 1;
        Ok(())
    }
}

// =====================================================================
// Build stamp: build hooks only, loaded ahead of everything else
// =====================================================================

struct BuildStampModule;

impl BuildStampModule {
    fn descriptor() -> ModuleDescriptor {
        ModuleDescriptor::new("demo::BuildStampModule", |_| Some(Box::new(BuildStampModule)))
            .orders(ModuleOrders::default().with_load(-10))
    }
}

impl EngineModule for BuildStampModule {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn build_hooks(&mut self) -> Option<&mut dyn BuildHooks> {
        Some(self)
    }
}

impl BuildHooks for BuildStampModule {
    fn pre_process(&mut self, build: &BuildInfo) -> HookResult {
        info!(target = %build.target, "Stamping build");
        Ok(())
    }

    fn post_process(&mut self, build: &BuildInfo) -> HookResult {
        info!(output = %build.output_path, "Build stamped");
        Ok(())
    }
}

fn main() -> Result<(), ModuleError> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting engine shell");

    let mut registry = ModuleRegistry::new();
    registry.register(AudioOutputModule::descriptor())?;
    registry.register(MixerModule::descriptor())?;
    registry.register(BuildStampModule::descriptor())?;

    let mut host = ModuleHost::new(
        registry,
        ModuleConfig::default(),
        Platform::Linux,
        RuntimeMode::Player,
    );

    host.load_modules();
    info!(modules = ?host.module_names(), "Loaded set");

    // A few engine frames
    host.behavior_awake();
    host.behavior_enable();
    host.behavior_start();
    for _ in 0..3 {
        host.behavior_update();
    }

    if let Some(mixer) = host.get_module::<MixerModule>() {
        info!(
            ticks = mixer.ticks,
            channels = ?mixer.output_channels,
            "Mixer state after frames"
        );
    }

    // One build pass; note that scene events and load requests would be
    // dropped between these two calls.
    let build = BuildInfo {
        target: "linux-x64".to_string(),
        output_path: "build/player".to_string(),
    };
    host.build_pre_process(&build);
    host.build_post_process(&build);

    host.behavior_disable();
    host.behavior_destroy();
    host.unload_modules();

    info!("Engine shell shut down");
    Ok(())
}
