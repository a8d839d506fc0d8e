use module_host::framework::mock::{
    journal_entries, new_journal, ProbeBuilder, ProbeInjector, ProbeModule, RecordingSceneGraph,
};
use module_host::framework::{CapabilityId, IslandId, ModuleRegistry};
use module_host::lifecycle::settings::{ModuleConfig, Platform, RuntimeMode};
use module_host::lifecycle::{LoadState, ModuleHost};

const AUDIO: CapabilityId = CapabilityId("audio");

/// Full end-to-end walk of the load pipeline with wiring, functionality
/// injection, dispatch, and teardown all in one set.
#[test]
fn test_full_lifecycle_integration() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();

    // An injector owning two islands, two providers, and one consumer that
    // depends on a capability both providers satisfy.
    registry
        .register(ProbeInjector::descriptor(
            "inj",
            &journal,
            vec![IslandId(0), IslandId(1)],
            IslandId(0),
        ))
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("dsp", &journal)
                .functionality_provider()
                .provides(AUDIO)
                .descriptor(),
        )
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("reverb", &journal)
                .functionality_provider()
                .provides(AUDIO)
                .descriptor(),
        )
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("mixer", &journal)
                .with_behavior_hooks()
                .with_unload_hooks()
                .depends_on(AUDIO)
                .descriptor(),
        )
        .unwrap();

    let mut host = ModuleHost::new(
        registry,
        ModuleConfig::default(),
        Platform::Linux,
        RuntimeMode::Editor,
    );

    // 1. Load
    host.load_modules();
    assert!(host.is_loaded());
    assert_eq!(host.state(), LoadState::Loaded);
    assert_eq!(host.module_names(), vec!["dsp", "inj", "mixer", "reverb"]);

    let entries = journal_entries(&journal);

    // 2. Both providers triggered one connection call each on the consumer
    let connects: Vec<&String> = entries
        .iter()
        .filter(|e| e.starts_with("mixer:connect:audio:"))
        .collect();
    assert_eq!(connects.len(), 2);

    // 3. Injection sequencing: wiring before the pre-load hook, providers
    //    registered into both islands, injection from the active island
    //    into every module except the injector, all before any load hook.
    let prepare = entries.iter().position(|e| e == "inj:prepare_load").unwrap();
    let last_connect = entries
        .iter()
        .rposition(|e| e.starts_with("mixer:connect:"))
        .unwrap();
    assert!(last_connect < prepare);

    let registrations: Vec<&String> = entries
        .iter()
        .filter(|e| e.starts_with("inj:register:"))
        .collect();
    assert_eq!(registrations.len(), 4); // 2 providers x 2 islands
    assert!(entries.contains(&"inj:register:island-1:reverb".to_string()));

    let injections: Vec<&String> = entries
        .iter()
        .filter(|e| e.starts_with("inj:inject:island-0:"))
        .collect();
    assert_eq!(injections.len(), 3); // dsp, mixer, reverb

    let first_load = entries
        .iter()
        .position(|e| e.ends_with(":load"))
        .unwrap();
    let last_inject = entries
        .iter()
        .rposition(|e| e.starts_with("inj:inject:"))
        .unwrap();
    assert!(last_inject < first_load);

    // 4. First awake re-runs injection, once
    host.behavior_awake();
    host.behavior_awake();
    let probe = host.get_module::<ProbeModule>().unwrap();
    assert_eq!(probe.injected, 2); // load pass + one post-awake pass

    let entries = journal_entries(&journal);
    assert_eq!(
        entries.iter().filter(|e| *e == "inj:prepare_load").count(),
        1,
        "pre-load hook must not fire on the post-awake pass"
    );

    // 5. Behavior dispatch reaches the one behavior subscriber
    host.behavior_update();
    let entries = journal_entries(&journal);
    assert!(entries.contains(&"mixer:update".to_string()));

    // 6. Teardown clears the set and fires the unload hook
    assert!(!host.is_unloading());
    host.unload_modules();
    assert!(!host.is_loaded());
    assert!(!host.is_unloading());
    assert!(host.module_names().is_empty());
    let entries = journal_entries(&journal);
    assert!(entries.contains(&"mixer:unload".to_string()));
    assert!(host.get_module::<ProbeModule>().is_none());
}

/// Scene-backed modules are created inactive under the hidden module root
/// and only activated once the whole pipeline has run.
#[test]
fn test_scene_backed_module_lifecycle() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("overlay", &journal)
                .hosted(module_host::framework::HostingKind::SceneObject)
                .with_unload_hooks()
                .descriptor(),
        )
        .unwrap();

    let scene = RecordingSceneGraph::new(&journal);
    let mut host = ModuleHost::with_collaborators(
        registry,
        ModuleConfig::default(),
        Platform::Linux,
        RuntimeMode::Editor,
        Box::new(scene),
        Box::new(module_host::engine::NullSettings),
    );

    host.load_modules();
    let entries = journal_entries(&journal);

    // Root node first, then the module node parented under it, both inactive
    assert_eq!(
        entries[0],
        "scene:create:node-1:__engine_modules:none:inactive"
    );
    assert_eq!(entries[1], "scene:create:node-2:overlay:node-1:inactive");
    assert_eq!(entries[2], "overlay:construct");

    // Activation is deferred past the load hook
    let load = entries.iter().position(|e| e == "overlay:load").unwrap();
    let activate = entries
        .iter()
        .position(|e| e == "scene:activate:node-2")
        .unwrap();
    assert!(load < activate);

    // Teardown: unload hook, module node, then the root node last
    host.unload_modules();
    let entries = journal_entries(&journal);
    let unload = entries.iter().position(|e| e == "overlay:unload").unwrap();
    let node_gone = entries
        .iter()
        .position(|e| e == "scene:destroy:node-2")
        .unwrap();
    let root_gone = entries
        .iter()
        .position(|e| e == "scene:destroy:node-1")
        .unwrap();
    assert!(unload < node_gone);
    assert!(node_gone < root_gone);
}
