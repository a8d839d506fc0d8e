use module_host::engine::{BuildInfo, DeleteOptions, DeleteOutcome, SceneOpenMode, SceneRef};
use module_host::framework::mock::{journal_entries, new_journal, ProbeBuilder, ProbeJournal};
use module_host::framework::ModuleRegistry;
use module_host::lifecycle::settings::{ModuleConfig, Platform, RuntimeMode};
use module_host::lifecycle::ModuleHost;

fn loaded_host(registry: ModuleRegistry) -> ModuleHost {
    let mut host = ModuleHost::new(
        registry,
        ModuleConfig::default(),
        Platform::Linux,
        RuntimeMode::Editor,
    );
    host.load_modules();
    host
}

fn build_info() -> BuildInfo {
    BuildInfo {
        target: "linux-x64".to_string(),
        output_path: "build/player".to_string(),
    }
}

fn entries_with(journal: &ProbeJournal, suffix: &str) -> Vec<String> {
    journal_entries(journal)
        .into_iter()
        .filter(|e| e.ends_with(suffix))
        .collect()
}

// --- Failure isolation ---

#[test]
fn test_failing_behavior_hook_does_not_block_others() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("alpha", &journal)
                .with_behavior_hooks()
                .descriptor(),
        )
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("beta", &journal)
                .with_behavior_hooks()
                .failing_in("update")
                .descriptor(),
        )
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("gamma", &journal)
                .with_behavior_hooks()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    journal.borrow_mut().clear();
    host.behavior_update();

    // The failing subscriber is recorded and the rest still ran, in order
    assert_eq!(
        journal_entries(&journal),
        vec![
            "alpha:update".to_string(),
            "beta:update".to_string(),
            "gamma:update".to_string(),
        ]
    );
}

#[test]
fn test_failing_unload_hook_does_not_block_teardown() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("alpha", &journal)
                .with_unload_hooks()
                .failing_in("unload")
                .descriptor(),
        )
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("beta", &journal)
                .with_unload_hooks()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    host.unload_modules();
    assert!(!host.is_loaded());
    let unloads = entries_with(&journal, ":unload");
    assert_eq!(unloads, vec!["alpha:unload", "beta:unload"]);
}

#[test]
fn test_failing_connection_does_not_block_other_edges() {
    use module_host::framework::CapabilityId;
    const CAP: CapabilityId = CapabilityId("cap");

    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("consumer", &journal)
                .depends_on(CAP)
                .failing_in("connect")
                .descriptor(),
        )
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("provider_a", &journal)
                .provides(CAP)
                .descriptor(),
        )
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("provider_b", &journal)
                .provides(CAP)
                .descriptor(),
        )
        .unwrap();

    let _host = loaded_host(registry);
    let connects: Vec<String> = journal_entries(&journal)
        .into_iter()
        .filter(|e| e.starts_with("consumer:connect:cap:"))
        .collect();
    // Both edges were attempted even though every connection call fails
    assert_eq!(
        connects,
        vec![
            "consumer:connect:cap:provider_a".to_string(),
            "consumer:connect:cap:provider_b".to_string(),
        ]
    );
}

// --- Capability membership ---

#[test]
fn test_non_subscribers_never_dispatched() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(ProbeBuilder::new("silent", &journal).descriptor())
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("ticking", &journal)
                .with_behavior_hooks()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    journal.borrow_mut().clear();
    host.behavior_update();
    host.scene_loaded(&SceneRef::new("Main"));
    host.asset_will_create("assets/tex.png");

    assert_eq!(journal_entries(&journal), vec!["ticking:update".to_string()]);
}

// --- Asset aggregation ---

#[test]
fn test_asset_delete_aggregate_flips_on_any_did_delete() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("bystander", &journal)
                .with_asset_hooks()
                .descriptor(),
        )
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("janitor", &journal)
                .with_asset_hooks()
                .deletes_assets()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    let outcome = host.asset_will_delete("assets/old.mat", DeleteOptions::MoveToTrash);
    assert_eq!(outcome, DeleteOutcome::DidDelete);
}

#[test]
fn test_asset_delete_aggregate_stays_did_not_delete() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    for name in ["alpha", "beta"] {
        registry
            .register(
                ProbeBuilder::new(name, &journal)
                    .with_asset_hooks()
                    .descriptor(),
            )
            .unwrap();
    }

    let mut host = loaded_host(registry);
    let outcome = host.asset_will_delete("assets/old.mat", DeleteOptions::DeleteOutright);
    assert_eq!(outcome, DeleteOutcome::DidNotDelete);
}

#[test]
fn test_will_save_filters_thread_through_subscribers() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("filter", &journal)
                .with_asset_hooks()
                .drops_saved_paths_containing(".tmp")
                .descriptor(),
        )
        .unwrap();
    registry
        .register(
            ProbeBuilder::new("observer", &journal)
                .with_asset_hooks()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    let kept = host.assets_will_save(vec![
        "scenes/main.scene".to_string(),
        "scratch/cache.tmp".to_string(),
    ]);
    assert_eq!(kept, vec!["scenes/main.scene".to_string()]);
}

#[test]
fn test_failing_save_filter_leaves_list_unchanged() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("filter", &journal)
                .with_asset_hooks()
                .drops_saved_paths_containing("main")
                .failing_in("will_save")
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    let kept = host.assets_will_save(vec!["scenes/main.scene".to_string()]);
    // The subscriber failed before filtering, so the list survives
    assert_eq!(kept, vec!["scenes/main.scene".to_string()]);
}

// --- Scene transitions ---

#[test]
fn test_single_scene_transition_reloads_modules() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("watcher", &journal)
                .with_scene_hooks()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    journal.borrow_mut().clear();
    host.scene_opened(&SceneRef::new("Main"), SceneOpenMode::Single);

    let entries = journal_entries(&journal);
    let dispatched = entries
        .iter()
        .position(|e| e == "watcher:scene_opened")
        .unwrap();
    let reconstructed = entries
        .iter()
        .position(|e| e == "watcher:construct")
        .unwrap();
    assert!(dispatched < reconstructed, "reload happens after the dispatch pass");
    assert!(host.is_loaded());
}

#[test]
fn test_additive_scene_transition_does_not_reload() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("watcher", &journal)
                .with_scene_hooks()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    journal.borrow_mut().clear();
    host.scene_opened(&SceneRef::new("Overlay"), SceneOpenMode::Additive);
    host.new_scene_created(&SceneRef::new("Scratch"), SceneOpenMode::Additive);

    let entries = journal_entries(&journal);
    assert!(entries.contains(&"watcher:scene_opened".to_string()));
    assert!(entries.contains(&"watcher:new_scene_created".to_string()));
    assert!(!entries.iter().any(|e| e.ends_with(":construct")));
}

#[test]
fn test_scene_events_suppressed_while_building() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("watcher", &journal)
                .with_scene_hooks()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    journal.borrow_mut().clear();

    let build = build_info();
    host.build_pre_process(&build);
    assert!(host.is_building());
    host.scene_opened(&SceneRef::new("Main"), SceneOpenMode::Single);
    assert!(journal_entries(&journal).is_empty());
    assert!(host.is_loaded(), "no reload while building");

    host.build_post_process(&build);
    assert!(!host.is_building());
    host.scene_loaded(&SceneRef::new("Main"));
    assert!(journal_entries(&journal).contains(&"watcher:scene_loaded".to_string()));
}

#[test]
fn test_scene_events_suppressed_while_blocked() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("watcher", &journal)
                .with_scene_hooks()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    journal.borrow_mut().clear();

    host.set_scene_callbacks_blocked(true);
    host.scene_opened(&SceneRef::new("Main"), SceneOpenMode::Single);
    host.active_scene_changed(&SceneRef::new("Main"), &SceneRef::new("Other"));
    assert!(journal_entries(&journal).is_empty());

    host.set_scene_callbacks_blocked(false);
    host.scene_unloaded(&SceneRef::new("Main"));
    assert_eq!(
        journal_entries(&journal),
        vec!["watcher:scene_unloaded".to_string()]
    );
}

// --- Build gating ---

#[test]
fn test_load_requests_dropped_while_building() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(ProbeBuilder::new("alpha", &journal).descriptor())
        .unwrap();

    let mut host = ModuleHost::new(
        registry,
        ModuleConfig::default(),
        Platform::Linux,
        RuntimeMode::Editor,
    );

    let build = build_info();
    host.build_pre_process(&build);
    host.load_modules();
    assert!(!host.is_loaded());
    assert!(journal_entries(&journal).is_empty());

    // The request was dropped, not queued: nothing loads on its own after
    // the build finishes either.
    host.build_post_process(&build);
    assert!(!host.is_loaded());

    host.load_modules();
    assert!(host.is_loaded());
}

#[test]
fn test_build_hooks_dispatch_in_order() {
    let journal = new_journal();
    let mut registry = ModuleRegistry::new();
    registry
        .register(
            ProbeBuilder::new("packer", &journal)
                .with_build_hooks()
                .descriptor(),
        )
        .unwrap();

    let mut host = loaded_host(registry);
    journal.borrow_mut().clear();

    let build = build_info();
    host.build_pre_process(&build);
    host.build_process_scene(&SceneRef::new("Main"), &build);
    host.build_post_process(&build);

    assert_eq!(
        journal_entries(&journal),
        vec![
            "packer:pre_process".to_string(),
            "packer:process_scene".to_string(),
            "packer:post_process".to_string(),
        ]
    );
}
