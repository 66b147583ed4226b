/// Scenario 1: RuntimeInit composed by three components
///
/// Tests that contributions sharing actions merge into one chain and that
/// the resolved order is what runs.
mod common;

use common::{entries, new_log, recording_action, resolved};
use weave_core::{sequence, Assembly, Component};

#[test]
fn test_scenario_01_three_components_chain_through_shared_actions() {
    // GIVEN four actions and three components each ordering one pair
    let log = new_log();
    let clock_init = recording_action(&log, "clockInit");
    let timer_init = recording_action(&log, "timerInit");
    let disable_usart = recording_action(&log, "disableUsart");
    let enable_uart = recording_action(&log, "enableUart");

    let nexus = Assembly::new()
        .component(Component::new("interfaces").export("RuntimeInit"))
        .component(Component::new("C1").extend("RuntimeInit", sequence(&clock_init, &timer_init)))
        .component(Component::new("C2").extend("RuntimeInit", sequence(&timer_init, &disable_usart)))
        .component(Component::new("C3").extend("RuntimeInit", sequence(&disable_usart, &enable_uart)))
        .build()
        .expect("Should assemble");

    // THEN the resolved order follows the chain
    let expected = vec!["clockInit", "timerInit", "disableUsart", "enableUart"];
    assert_eq!(resolved(&nexus, "RuntimeInit"), expected);

    // AND invoking runs exactly that order
    nexus.invoke("RuntimeInit");
    assert_eq!(entries(&log), expected);
}

#[test]
fn test_scenario_01_component_order_does_not_break_chain() {
    // GIVEN the same contributions registered in reverse
    let log = new_log();
    let clock_init = recording_action(&log, "clockInit");
    let timer_init = recording_action(&log, "timerInit");
    let disable_usart = recording_action(&log, "disableUsart");
    let enable_uart = recording_action(&log, "enableUart");

    let nexus = Assembly::new()
        .component(Component::new("C3").extend("RuntimeInit", sequence(&disable_usart, &enable_uart)))
        .component(Component::new("C2").extend("RuntimeInit", sequence(&timer_init, &disable_usart)))
        .component(Component::new("C1").extend("RuntimeInit", sequence(&clock_init, &timer_init)))
        .component(Component::new("interfaces").export("RuntimeInit"))
        .build()
        .expect("Should assemble");

    // THEN every edge still holds, so the chain is unchanged
    assert_eq!(
        resolved(&nexus, "RuntimeInit"),
        vec!["clockInit", "timerInit", "disableUsart", "enableUart"]
    );
}

#[test]
fn test_scenario_01_service_handle_is_reusable() {
    let log = new_log();
    let tick = recording_action(&log, "tick");
    let nexus = Assembly::new()
        .component(Component::new("interfaces").export("MainLoop"))
        .component(Component::new("blink").extend("MainLoop", &tick))
        .build()
        .expect("Should assemble");

    // WHEN resolving the handle once and invoking it repeatedly
    let main_loop = nexus.service("MainLoop").expect("Should exist");
    for _ in 0..3 {
        main_loop.invoke();
    }

    assert_eq!(entries(&log), vec!["tick", "tick", "tick"]);
    assert_eq!(main_loop.exporter().as_str(), "interfaces");
}

#[test]
fn test_scenario_01_nexus_is_shareable_across_threads() {
    let log = new_log();
    let tick = recording_action(&log, "tick");
    let nexus = std::sync::Arc::new(
        Assembly::new()
            .component(Component::new("interfaces").export("MainLoop"))
            .component(Component::new("blink").extend("MainLoop", &tick))
            .build()
            .expect("Should assemble"),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let nexus = std::sync::Arc::clone(&nexus);
            std::thread::spawn(move || nexus.invoke("MainLoop"))
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread should not panic");
    }

    assert_eq!(entries(&log).len(), 4);
}
