use topicbus::shell::{Shell, DEMO_SCRIPT};
use topicbus::EventBus;

#[test]
fn demo_prints_only_before_unsubscribe() {
    let mut shell = Shell::new(EventBus::new());

    let output: Vec<String> = DEMO_SCRIPT
        .iter()
        .flat_map(|line| shell.run_line(line).unwrap_or_default())
        .collect();

    let received: Vec<&String> = output.iter().filter(|l| l.starts_with("[printer]")).collect();
    assert_eq!(
        received,
        vec![
            "[printer] Swift: Hello Swift",
            "[printer] Swift: before-unsubscribe:this-event-is-printed",
        ]
    );
    assert!(output.contains(&"unsubscribed printer from 'Swift': true".to_string()));
    assert!(output.contains(&"published to 'Swift': 0 handler(s)".to_string()));
    assert!(shell.bus().is_empty());
}

#[test]
fn topics_lists_handler_counts() {
    let mut shell = Shell::new(EventBus::new());
    shell.run_line("sub b");
    shell.run_line("sub a");
    shell.run_line("sub a");

    assert_eq!(
        shell.run_line("topics").unwrap(),
        vec!["a: 2 handler(s)".to_string(), "b: 1 handler(s)".to_string()]
    );
}
