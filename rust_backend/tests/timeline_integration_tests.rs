//! End-to-end tests driving the application state from raw records through
//! layout, rendering and pointer interaction.
//!
//! These tests ensure that:
//! 1. Parsed chronologies land in the expected continent and region groups
//! 2. Layout and rendering are deterministic for the same input
//! 3. A filter that matches nothing still renders a valid frame
//! 4. Hover and click reach the right entity and its detail text

use std::cell::RefCell;
use std::rc::Rc;

use atlas_rust::config::AtlasConfig;
use atlas_rust::interaction::{bar_rect, hit_test, InteractionEvent, TooltipState};
use atlas_rust::io::DatasetLoader;
use atlas_rust::render::{RecordingSurface, TimeScale};
use atlas_rust::transformations::FilterCriteria;
use atlas_rust::view::{AlertPresenter, AtlasApp, TimelineView, ViewKind, ViewStatus};

// ==================== Helper Functions ====================

const TABLE: &str = "Continente,Región,Cultura,Cronología,Subsistencia,Tecnologías,Escritura\n\
    Asia,Asia Occidental,Sumeria,3500-2000 a.C.,Agricultura de regadío,Bronce,Cuneiforme\n\
    Asia,Asia Meridional,Harappa,2600-1900 a.C.,Agricultura,Bronce,Sí\n\
    Europa,Egeo,Minoica,3000-1100 a.C.,Agricultura y comercio,Bronce,Lineal A\n\
    África,Valle del Nilo,Egipto,c. 3100 a.C.,Agricultura,Bronce,Jeroglífica\n\
    América del Sur,Andes,Inca,s. XV d.C.,Agricultura en terrazas,,No\n\
    Oceanía,Polinesia,Lapita,desconocida,Pesca,,No\n";

type Captured = Rc<RefCell<Vec<String>>>;

fn capturing_presenter() -> (AlertPresenter, Captured) {
    let captured: Captured = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&captured);
    let presenter = AlertPresenter::new(move |text| sink.borrow_mut().push(text.to_string()));
    (presenter, captured)
}

fn loaded_app() -> (AtlasApp<RecordingSurface>, Captured) {
    let records = DatasetLoader::load_from_csv_str(TABLE).unwrap().records;
    let mut app = AtlasApp::new(AtlasConfig::default());
    let (presenter, captured) = capturing_presenter();
    app.init_view(
        ViewKind::Strata,
        Some(RecordingSurface::new(1200.0, 600.0)),
        Box::new(presenter),
    )
    .unwrap();
    app.init_view(
        ViewKind::Rivers,
        Some(RecordingSurface::new(1200.0, 600.0)),
        Box::new(AlertPresenter::logging()),
    )
    .unwrap();
    app.load_records(records).unwrap();
    (app, captured)
}

/// Center of an entity's bar in surface coordinates.
fn bar_center(view: &TimelineView<RecordingSurface>, name: &str) -> (f64, f64) {
    let plot = view.plot_area();
    let scale = TimeScale::for_plot(view.viewport().domain, &plot);
    let entity = view
        .layout()
        .entities()
        .find(|e| e.name == name)
        .unwrap();
    let rect = bar_rect(entity, &scale, &plot, view.config().render.snapping()).unwrap();
    (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

// ==================== Scenarios ====================

#[test]
fn test_single_asian_record() {
    let mut app = AtlasApp::new(AtlasConfig::default());
    app.init_view(
        ViewKind::Strata,
        Some(RecordingSurface::new(1000.0, 400.0)),
        Box::new(AlertPresenter::logging()),
    )
    .unwrap();
    let dataset =
        DatasetLoader::load_from_csv_str("Continente,Cultura,Cronología\nAsia,X,3500-2000 a.C.\n")
            .unwrap();
    assert_eq!(dataset.records.len(), 1);
    app.load_records(dataset.records).unwrap();

    let layout = app.view(ViewKind::Strata).unwrap().layout();
    assert_eq!(layout.continents.len(), 1);
    assert_eq!(layout.continents[0].name, "Asia");
    assert_eq!(layout.continents[0].regions.len(), 1);
    assert_eq!(layout.continents[0].regions[0].name, "Unknown region");

    let entity = layout.entities().next().unwrap();
    assert_eq!(entity.start_year, -3500);
    assert_eq!(entity.end_year, -2000);
}

#[test]
fn test_undatable_records_are_left_out() {
    let (app, _) = loaded_app();
    let strata = app.view(ViewKind::Strata).unwrap();

    assert_eq!(app.records().len(), 6);
    assert_eq!(strata.layout().entity_count(), 5);
    assert!(strata.layout().entities().all(|e| e.name != "Lapita"));
    assert!(strata.layout().continents.iter().all(|c| c.name != "Oceanía"));
}

#[test]
fn test_both_views_group_differently() {
    let (app, _) = loaded_app();
    let strata = app.view(ViewKind::Strata).unwrap().layout();
    let rivers = app.view(ViewKind::Rivers).unwrap().layout();

    let asia_strata = strata.continents.iter().find(|c| c.name == "Asia").unwrap();
    let asia_rivers = rivers.continents.iter().find(|c| c.name == "Asia").unwrap();
    assert_eq!(asia_strata.regions.len(), 2);
    assert_eq!(asia_rivers.regions.len(), 1);
    assert_eq!(strata.entity_count(), rivers.entity_count());
}

#[test]
fn test_relayout_is_deterministic() {
    let (mut app, _) = loaded_app();
    let first = app.view(ViewKind::Strata).unwrap().layout().clone();
    let first_commands = app.view(ViewKind::Strata).unwrap().surface().commands().to_vec();

    app.apply_filter(FilterCriteria::default()).unwrap();
    let view = app.view(ViewKind::Strata).unwrap();
    assert_eq!(&first, view.layout());
    assert_eq!(first_commands, view.surface().commands());
}

#[test]
fn test_filter_to_nothing_renders_cleanly() {
    let (mut app, _) = loaded_app();
    app.apply_filter(FilterCriteria::default().with_search("atlántida"))
        .unwrap();

    for kind in ViewKind::ALL {
        let view = app.view(kind).unwrap();
        assert!(view.layout().is_empty());
        assert_eq!(view.last_frame().bars, 0);
        assert_eq!(view.last_frame().skipped, 0);
        assert_eq!(app.status(kind), ViewStatus::Ready);
    }
}

#[test]
fn test_period_filter() {
    let (mut app, _) = loaded_app();
    app.apply_filter(FilterCriteria::default().with_period("2000-1000"))
        .unwrap();

    let names: Vec<&str> = app
        .filtered_records()
        .iter()
        .map(|r| r.culture.as_str())
        .collect();
    assert_eq!(names, vec!["Sumeria", "Harappa", "Minoica"]);
}

#[test]
fn test_hit_test_matches_layout() {
    let (app, _) = loaded_app();
    let view = app.view(ViewKind::Strata).unwrap();
    let plot = view.plot_area();
    let scale = TimeScale::for_plot(view.viewport().domain, &plot);

    let snapping = view.config().render.snapping();

    let (x, y) = bar_center(view, "Minoica");
    let hit = hit_test(view.layout(), &scale, &plot, snapping, x, y).unwrap();
    assert_eq!(hit.name, "Minoica");

    assert!(hit_test(view.layout(), &scale, &plot, snapping, plot.left - 1.0, y).is_none());
}

#[test]
fn test_hover_then_click_shows_details() {
    let (mut app, captured) = loaded_app();
    let (x, y) = bar_center(app.view(ViewKind::Strata).unwrap(), "Sumeria");

    app.handle_event(
        ViewKind::Strata,
        InteractionEvent::PointerMove { x, y, timestamp_ms: 100.0 },
    )
    .unwrap();
    let strata = app.view(ViewKind::Strata).unwrap();
    assert!(strata.viewport().hovered_entity_id.is_some());
    match strata.tooltip() {
        TooltipState::Visible { content, .. } => assert_eq!(content.title, "Sumeria"),
        TooltipState::Hidden => panic!("tooltip should be visible"),
    }
    assert!(strata.last_frame().highlighted);

    // Hover state is per view
    assert!(app
        .view(ViewKind::Rivers)
        .unwrap()
        .viewport()
        .hovered_entity_id
        .is_none());

    let response = app
        .handle_event(ViewKind::Strata, InteractionEvent::Click { x, y })
        .unwrap();
    assert!(response.activated.is_some());

    let captured = captured.borrow();
    assert_eq!(captured.len(), 1);
    assert!(captured[0].contains("Sumeria"));
    assert!(captured[0].contains("Asia Occidental (Asia)"));
}

#[test]
fn test_zoom_and_reset() {
    let (mut app, _) = loaded_app();
    let initial = app.view(ViewKind::Rivers).unwrap().viewport().domain;

    app.handle_event(ViewKind::Rivers, InteractionEvent::Wheel { x: 600.0, delta_y: -120.0 });
    let zoomed = app.view(ViewKind::Rivers).unwrap().viewport().domain;
    assert!(zoomed.1 - zoomed.0 < initial.1 - initial.0);
    assert_eq!(app.view(ViewKind::Strata).unwrap().viewport().domain, initial);

    app.reset_zoom(ViewKind::Rivers);
    assert_eq!(app.view(ViewKind::Rivers).unwrap().viewport().domain, initial);
}
