/// Composition rules: join points, parallel stability, export/extend
/// validation and cycle reporting, exercised through full assemblies.
mod common;

use common::resolved;
use weave_core::{action, parallel, sequence, Assembly, Component, WeaveError};

#[test]
fn test_join_point_merge() {
    let x = action("x", || {});
    let y = action("y", || {});
    let z = action("z", || {});

    let nexus = Assembly::new()
        .component(Component::new("interfaces").export("Init"))
        .component(Component::new("A").extend("Init", sequence(&x, &y)))
        .component(Component::new("B").extend("Init", sequence(&y, &z)))
        .build()
        .unwrap();

    assert_eq!(resolved(&nexus, "Init"), vec!["x", "y", "z"]);
}

#[test]
fn test_parallel_order_is_stable_across_assemblies() {
    let build = || {
        let a = action("a", || {});
        let b = action("b", || {});
        Assembly::new()
            .component(Component::new("interfaces").export("Init"))
            .component(Component::new("feature").extend("Init", parallel(&b, &a)))
            .build()
            .unwrap()
    };

    let first = resolved(&build(), "Init");
    for _ in 0..10 {
        assert_eq!(resolved(&build(), "Init"), first);
    }
    assert_eq!(first, vec!["a", "b"]);
}

#[test]
fn test_same_name_actions_are_distinct() {
    // Two components each declare their own "set_pin"
    let led_pin = action("set_pin", || {});
    let buzzer_pin = action("set_pin", || {});
    let led_on = action("led_on", || {});

    let nexus = Assembly::new()
        .component(Component::new("interfaces").export("Init"))
        .component(Component::new("led").extend("Init", sequence(&led_pin, &led_on)))
        .component(Component::new("buzzer").extend("Init", &buzzer_pin))
        .build()
        .unwrap();

    assert_eq!(
        resolved(&nexus, "Init"),
        vec!["set_pin", "led_on", "set_pin"]
    );
}

#[test]
fn test_export_uniqueness() {
    let err = Assembly::new()
        .component(Component::new("c1").export("Init"))
        .component(Component::new("c2").export("Init"))
        .build()
        .unwrap_err();

    assert!(matches!(err, WeaveError::DuplicateExport { .. }));
    assert!(err.to_string().contains("Init"));
}

#[test]
fn test_dangling_extend() {
    let a = action("a", || {});
    let err = Assembly::new()
        .component(Component::new("feature").extend("Unknown", &a))
        .build()
        .unwrap_err();

    assert_eq!(
        err,
        WeaveError::UnexportedExtensionPoint {
            extension_point: "Unknown".to_string(),
            component: "feature".to_string(),
        }
    );
}

#[test]
fn test_cycle_detection_names_participants() {
    let p = action("p", || {});
    let q = action("q", || {});

    let err = Assembly::new()
        .component(Component::new("interfaces").export("Init"))
        .component(Component::new("one").extend("Init", sequence(&p, &q)))
        .component(Component::new("two").extend("Init", sequence(&q, &p)))
        .build()
        .unwrap_err();

    let WeaveError::CycleDetected {
        extension_point,
        cycle,
    } = &err
    else {
        panic!("expected CycleDetected, got {:?}", err);
    };
    assert_eq!(extension_point, "Init");
    assert!(cycle.iter().any(|n| n == "p") || cycle.iter().any(|n| n == "q"));
    let message = err.to_string();
    assert!(message.contains("p") && message.contains("q"), "{}", message);
}

#[test]
fn test_cycle_in_one_point_aborts_whole_build() {
    let p = action("p", || {});
    let q = action("q", || {});
    let ok = action("ok", || {});

    let result = Assembly::new()
        .component(Component::new("interfaces").export("Good").export("Bad"))
        .component(Component::new("fine").extend("Good", &ok))
        .component(
            Component::new("broken")
                .extend("Bad", sequence(&p, &q))
                .extend("Bad", sequence(&q, &p)),
        )
        .build();

    assert!(result.is_err());
}

#[test]
fn test_independent_assemblies_coexist() {
    let a = action("a", || {});
    let b = action("b", || {});

    let forward = Assembly::new()
        .component(Component::new("interfaces").export("Init"))
        .component(Component::new("f").extend("Init", sequence(&a, &b)))
        .build()
        .unwrap();
    let backward = Assembly::new()
        .component(Component::new("interfaces").export("Init"))
        .component(Component::new("f").extend("Init", sequence(&b, &a)))
        .build()
        .unwrap();

    assert_eq!(resolved(&forward, "Init"), vec!["a", "b"]);
    assert_eq!(resolved(&backward, "Init"), vec!["b", "a"]);
    assert_ne!(forward.order_digest(), backward.order_digest());
}
