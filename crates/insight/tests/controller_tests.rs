//! Integration tests for the per-field suggestion controller.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{CountingSource, ScriptedSource, dashboard_lists, init_tracing, labels};
use insight::{
    ControllerSettings, DropdownState, ElementId, Field, FieldTag, LookupOutcome, NavigationKey,
    SuggestionController, SuggestionFetchError, SuggestionSource,
};
use insight_net::NetworkError;
use parking_lot::Mutex;

fn sector_controller(
    source: Arc<dyn SuggestionSource>,
    settings: ControllerSettings,
) -> SuggestionController {
    SuggestionController::new(
        Field::new("sectorInput", FieldTag::Sector),
        ElementId::new("sectorSuggest"),
        source,
        settings,
    )
}

#[tokio::test]
async fn test_late_answer_for_older_query_is_discarded() {
    init_tracing();
    let source = ScriptedSource::new();
    let controller = sector_controller(source.clone(), ControllerSettings::immediate());

    let ba = controller.input_changed("ba").unwrap();
    let bank = controller.input_changed("bank").unwrap();
    assert!(bank.seq() > ba.seq());

    source.respond(FieldTag::Sector, "bank", Ok(labels(&["Banking"])));
    assert_eq!(bank.settled().await, LookupOutcome::Rendered(1));

    source.respond(FieldTag::Sector, "ba", Ok(labels(&["Banking", "Bakery"])));
    assert_eq!(ba.settled().await, LookupOutcome::Stale);

    assert_eq!(
        controller.dropdown_state(),
        DropdownState::Open {
            items: labels(&["Banking"]),
            highlighted: None,
        }
    );
}

#[tokio::test]
async fn test_any_completion_order_renders_newest_query() {
    let queries = ["b", "ba", "ban"];
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    for order in orders {
        let source = ScriptedSource::new();
        let controller = sector_controller(source.clone(), ControllerSettings::immediate());
        let mut pending: Vec<_> = queries
            .iter()
            .map(|q| Some(controller.input_changed(q).unwrap()))
            .collect();

        for &i in &order {
            source.respond(FieldTag::Sector, queries[i], Ok(vec![format!("answer-{}", queries[i])]));
            let outcome = pending[i].take().unwrap().settled().await;
            if i == 2 {
                assert_eq!(outcome, LookupOutcome::Rendered(1), "order {order:?}");
            } else {
                assert_eq!(outcome, LookupOutcome::Stale, "order {order:?}");
            }
        }

        assert_eq!(
            controller.dropdown_state().items(),
            ["answer-ban".to_string()],
            "order {order:?}"
        );
    }
}

#[tokio::test]
async fn test_empty_or_whitespace_input_issues_no_lookup() {
    let source = ScriptedSource::new();
    let controller = sector_controller(source.clone(), ControllerSettings::immediate());

    assert!(controller.input_changed("").is_none());
    assert!(controller.input_changed("   \t").is_none());
    assert_eq!(controller.latest_seq(), None);
    assert_eq!(source.call_count(), 0);
    assert_eq!(controller.dropdown_state(), DropdownState::Closed);
}

#[tokio::test]
async fn test_clearing_input_closes_and_retires_in_flight_lookup() {
    let source = ScriptedSource::new();
    let controller = sector_controller(source.clone(), ControllerSettings::immediate());

    let first = controller.input_changed("ba").unwrap();
    source.respond(FieldTag::Sector, "ba", Ok(labels(&["Banking", "Bakery"])));
    assert_eq!(first.settled().await, LookupOutcome::Rendered(2));

    let in_flight = controller.input_changed("ban").unwrap();
    assert!(controller.input_changed("").is_none());
    assert!(!controller.is_open());
    assert_eq!(controller.latest_seq(), Some(in_flight.seq()));

    source.respond(FieldTag::Sector, "ban", Ok(labels(&["Banking"])));
    assert_eq!(in_flight.settled().await, LookupOutcome::Stale);
    assert!(!controller.is_open());
}

#[tokio::test]
async fn test_query_is_trimmed_and_case_folded() {
    let source = ScriptedSource::new();
    let controller = sector_controller(source.clone(), ControllerSettings::immediate());

    let pending = controller.input_changed("  BaNk ").unwrap();
    source.respond(FieldTag::Sector, "bank", Ok(labels(&["Banking"])));
    assert_eq!(pending.settled().await, LookupOutcome::Rendered(1));

    assert_eq!(source.calls(), vec![(FieldTag::Sector, "bank".to_string())]);
    assert_eq!(controller.value(), "  BaNk ");
}

#[tokio::test]
async fn test_empty_result_closes() {
    let source = ScriptedSource::new();
    let controller = sector_controller(source.clone(), ControllerSettings::immediate());

    let pending = controller.input_changed("ba").unwrap();
    source.respond(FieldTag::Sector, "ba", Ok(labels(&["Banking"])));
    pending.settled().await;
    assert!(controller.is_open());

    let pending = controller.input_changed("xyz123").unwrap();
    source.respond(FieldTag::Sector, "xyz123", Ok(Vec::new()));
    assert_eq!(pending.settled().await, LookupOutcome::Closed);
    assert_eq!(controller.dropdown_state(), DropdownState::Closed);
}

#[tokio::test]
async fn test_failed_lookup_closes_quietly() {
    init_tracing();
    let source = ScriptedSource::new();
    let controller = sector_controller(source.clone(), ControllerSettings::immediate());

    let pending = controller.input_changed("ba").unwrap();
    source.respond(FieldTag::Sector, "ba", Ok(labels(&["Banking"])));
    pending.settled().await;

    let pending = controller.input_changed("ban").unwrap();
    source.respond(
        FieldTag::Sector,
        "ban",
        Err(SuggestionFetchError::Transport(NetworkError::Timeout)),
    );
    assert_eq!(pending.settled().await, LookupOutcome::Failed);
    assert_eq!(controller.dropdown_state(), DropdownState::Closed);
    assert_eq!(controller.value(), "ban");
}

#[tokio::test]
async fn test_failed_stale_lookup_changes_nothing() {
    let source = ScriptedSource::new();
    let controller = sector_controller(source.clone(), ControllerSettings::immediate());

    let old = controller.input_changed("ba").unwrap();
    let new = controller.input_changed("bak").unwrap();
    source.respond(FieldTag::Sector, "bak", Ok(labels(&["Bakery"])));
    new.settled().await;

    source.respond(
        FieldTag::Sector,
        "ba",
        Err(SuggestionFetchError::Status {
            status: 500,
            message: None,
        }),
    );
    assert_eq!(old.settled().await, LookupOutcome::Stale);
    assert_eq!(controller.dropdown_state().items(), ["Bakery".to_string()]);
}

#[tokio::test]
async fn test_click_commits_row_text_and_closes() {
    let controller = sector_controller(Arc::new(dashboard_lists()), ControllerSettings::immediate());

    let pending = controller.input_changed("ba").unwrap();
    assert_eq!(pending.settled().await, LookupOutcome::Rendered(2));

    controller.hover(0);
    assert_eq!(controller.dropdown_state().highlighted(), Some(0));
    assert_eq!(controller.value(), "ba");

    assert_eq!(controller.select(1), Some("Bakery".to_string()));
    assert_eq!(controller.value(), "Bakery");
    assert_eq!(controller.dropdown_state(), DropdownState::Closed);
}

#[tokio::test]
async fn test_keyboard_navigation() {
    let controller = sector_controller(Arc::new(dashboard_lists()), ControllerSettings::immediate());
    controller.input_changed("b").unwrap().settled().await;

    assert!(controller.key_pressed(NavigationKey::Up));
    assert_eq!(controller.dropdown_state().highlighted(), Some(2));
    assert!(controller.key_pressed(NavigationKey::Down));
    assert_eq!(controller.dropdown_state().highlighted(), Some(0));
    assert!(controller.key_pressed(NavigationKey::Enter));
    assert_eq!(controller.value(), "Banking");

    controller.input_changed("e").unwrap().settled().await;
    assert!(controller.key_pressed(NavigationKey::Escape));
    assert!(!controller.is_open());
    assert!(!controller.key_pressed(NavigationKey::Escape));
}

#[tokio::test]
async fn test_signals_report_visibility_highlight_and_activation() {
    let controller = sector_controller(Arc::new(dashboard_lists()), ControllerSettings::immediate());
    let log = Arc::new(Mutex::new(Vec::<String>::new()));

    let sink = Arc::clone(&log);
    let _visible = controller
        .signals()
        .visibility_changed()
        .connect_scoped(move |open| sink.lock().push(format!("visible:{open}")));
    let sink = Arc::clone(&log);
    let _highlight = controller
        .signals()
        .highlighted()
        .connect_scoped(move |text| sink.lock().push(format!("highlight:{text}")));
    let sink = Arc::clone(&log);
    let _activated = controller
        .signals()
        .activated()
        .connect_scoped(move |text| sink.lock().push(format!("activated:{text}")));

    controller.input_changed("ba").unwrap().settled().await;
    controller.input_changed("bak").unwrap().settled().await;
    controller.hover(0);
    controller.select(0);

    assert_eq!(
        *log.lock(),
        vec![
            "visible:true",
            "highlight:Bakery",
            "visible:false",
            "activated:Bakery",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_debounce_sends_one_lookup_per_burst() {
    let source = CountingSource::new(dashboard_lists());
    let settings = ControllerSettings::default().with_debounce(Duration::from_millis(150));
    let controller = sector_controller(source.clone(), settings);

    let b = controller.input_changed("b").unwrap();
    let ba = controller.input_changed("ba").unwrap();
    let bak = controller.input_changed("bak").unwrap();

    assert_eq!(bak.settled().await, LookupOutcome::Rendered(1));
    assert_eq!(b.settled().await, LookupOutcome::Superseded);
    assert_eq!(ba.settled().await, LookupOutcome::Superseded);
    assert_eq!(source.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_lets_paused_typing_through() {
    let source = CountingSource::new(dashboard_lists());
    let settings = ControllerSettings::default().with_debounce(Duration::from_millis(150));
    let controller = sector_controller(source.clone(), settings);

    let first = controller.input_changed("b").unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(first.is_finished());

    let second = controller.input_changed("bi").unwrap();
    assert_eq!(first.settled().await, LookupOutcome::Rendered(3));
    assert_eq!(second.settled().await, LookupOutcome::Rendered(1));
    assert_eq!(source.call_count(), 2);
    assert_eq!(controller.dropdown_state().items(), ["Biotech".to_string()]);
}
