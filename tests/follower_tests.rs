//! Integration tests for followers attached to a map.
//! These drive the plugin through map events the way a host would.

use maplet_follower::prelude::*;

fn test_map() -> Map {
    maplet_follower::init_logger();
    Map::new(LatLng::new(0.0, 0.0), 5.0, Point::new(800.0, 600.0))
}

/// Marker whose icon's bottom-center lands on container point (x, y)
fn marker_at(map: &Map, id: &str, x: f64, y: f64) -> Marker {
    let position = map.viewport().container_point_to_lat_lng(&Point::new(x, y));
    Marker::new(id, position).with_icon_size(20.0, 30.0)
}

fn options() -> FollowerOptions {
    FollowerOptions::new()
        .padding(10.0)
        .follower(Element::new("custom-follower", Point::new(40.0, 20.0)))
}

fn attach(map: &mut Map, marker: Marker, options: FollowerOptions) -> String {
    let follower = MarkerFollower::new(marker, options).unwrap();
    let name = follower.name().to_string();
    follower.add_to(map).unwrap();
    name
}

fn follower<'a>(map: &'a Map, name: &str) -> &'a MarkerFollower {
    map.plugin::<MarkerFollower>(name).unwrap()
}

fn element<'a>(map: &'a Map, name: &str) -> &'a Element {
    let id = follower(map, name).element_id().unwrap();
    map.overlay_pane().get(id).unwrap()
}

/// Element position converted back to container space
fn container_position(map: &Map, name: &str) -> Point {
    map.viewport()
        .layer_point_to_container_point(&element(map, name).position)
}

fn assert_close(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 1e-6 && (actual.y - expected.y).abs() < 1e-6,
        "{:?} != {:?}",
        actual,
        expected
    );
}

#[test]
fn test_follower_hidden_while_marker_in_view() {
    let mut map = test_map();
    let marker = marker_at(&map, "home", 400.0, 300.0);
    let name = attach(&mut map, marker, options());

    assert!(!element(&map, &name).visible);
    assert_eq!(element(&map, &name).class, "custom-follower");
    assert_eq!(map.overlay_pane().len(), 1);
}

#[test]
fn test_follower_below_marker_above_view() {
    let mut map = test_map();
    let marker = marker_at(&map, "north", 400.0, -50.0);
    let name = attach(&mut map, marker, options());

    let placement = follower(&map, &name).compute_placement(&map).unwrap();
    assert_eq!(placement.side(), Some(Side::Bottom));
    assert!(element(&map, &name).visible);
    assert_close(container_position(&map, &name), Point::new(380.0, 0.0));
}

#[test]
fn test_follower_tracks_marker_across_pans() {
    let mut map = test_map();
    let marker = marker_at(&map, "west", 100.0, 300.0);
    let name = attach(&mut map, marker, options());
    assert!(!element(&map, &name).visible);

    // Marker ends up at container (-200, 300)
    map.pan_by(Point::new(300.0, 0.0));

    assert!(element(&map, &name).visible);
    assert_close(element(&map, &name).position, Point::new(300.0, 290.0));
    assert_close(container_position(&map, &name), Point::new(0.0, 290.0));

    // And back into view
    map.pan_by(Point::new(-300.0, 0.0));
    assert!(!element(&map, &name).visible);
}

#[test]
fn test_follower_follows_view_reset() {
    let mut map = test_map();
    let marker = marker_at(&map, "center", 400.0, 300.0);
    let position = marker.position();
    let name = attach(&mut map, marker, options());
    assert!(!element(&map, &name).visible);

    // Recentering far away leaves the marker off-screen
    map.set_view(LatLng::new(position.lat + 40.0, position.lng), 5.0);
    assert!(element(&map, &name).visible);
    assert_eq!(
        follower(&map, &name).compute_placement(&map).unwrap().side(),
        Some(Side::Top)
    );

    map.set_view(position, 5.0);
    assert!(!element(&map, &name).visible);
}

#[test]
fn test_open_popup_hides_follower() {
    let mut map = test_map();
    let marker = marker_at(&map, "south", 400.0, 650.0).with_popup(Popup::new("a\nb\nc\nd"));
    let name = attach(&mut map, marker.clone(), FollowerOptions::new().padding(20.0));

    let created = element(&map, &name);
    assert_eq!(created.text.as_deref(), Some("a\nb\nc\nd"));
    assert!(created.visible);

    // The popup reaches up into the comfort rectangle
    map.open_popup(&marker).unwrap();
    assert!(!element(&map, &name).visible);

    map.close_popup(marker.id());
    assert!(element(&map, &name).visible);
    assert_eq!(
        follower(&map, &name).compute_placement(&map).unwrap().side(),
        Some(Side::Top)
    );
}

#[test]
fn test_clicking_follower_pans_to_marker() {
    let mut map = test_map();
    let marker = marker_at(&map, "east", -100.0, 300.0);
    let position = marker.position();
    let name = attach(&mut map, marker, options());
    assert!(element(&map, &name).visible);

    let id = follower(&map, &name).element_id().unwrap();
    map.click_element(id);

    let pan = map.last_pan().unwrap();
    assert_eq!(pan.center, position);
    assert!(pan.options.animate);
    assert_close(
        map.viewport().lat_lng_to_container_point(&position),
        Point::new(400.0, 300.0),
    );
    // The pan's move event relocated the follower
    assert!(!element(&map, &name).visible);
}

#[test]
fn test_remove_and_re_add_follower() {
    let mut map = test_map();
    let marker = marker_at(&map, "gone", -100.0, 300.0);
    let name = attach(&mut map, marker, options());
    assert_eq!(map.listener_count(), 4);

    let removed = map.remove_plugin(&name).unwrap().unwrap();
    assert!(map.overlay_pane().is_empty());
    assert_eq!(map.listener_count(), 0);

    // Nothing is listening any more
    map.pan_by(Point::new(10.0, 10.0));

    map.add_plugin(removed).unwrap();
    assert_eq!(map.listener_count(), 4);
    assert_eq!(element(&map, &name).class, "custom-follower");
    assert!(element(&map, &name).visible);
}

#[test]
fn test_followers_are_independent() {
    let mut map = test_map();
    let left = marker_at(&map, "left", -100.0, 300.0);
    let right = marker_at(&map, "right", 900.0, 300.0);
    let left_name = attach(&mut map, left, options());
    let right_name = attach(&mut map, right, options());

    assert_close(container_position(&map, &left_name), Point::new(0.0, 290.0));
    assert_close(container_position(&map, &right_name), Point::new(760.0, 290.0));

    // Bring the left marker into view; the right one stays out
    map.pan_by(Point::new(-300.0, 0.0));
    assert!(!element(&map, &left_name).visible);
    assert!(element(&map, &right_name).visible);
    assert_close(container_position(&map, &right_name), Point::new(760.0, 290.0));
}

#[test]
fn test_duplicate_follower_for_marker_is_rejected() {
    let mut map = test_map();
    let marker = marker_at(&map, "twice", 400.0, 300.0);
    attach(&mut map, marker.clone(), options());

    let again = MarkerFollower::new(marker, options()).unwrap();
    assert!(matches!(
        map.add_plugin(Box::new(again)),
        Err(MapError::Plugin(_))
    ));
}

#[test]
fn test_strict_padding_rejected_before_attaching() {
    let map = test_map();
    let marker = marker_at(&map, "strict", 400.0, 300.0);
    let result = MarkerFollower::new(marker, options().padding(40.0).strict_padding(true));
    assert!(matches!(
        result,
        Err(MapError::InvalidPaddingConfiguration { .. })
    ));
}

#[test]
fn test_degenerate_placement_keeps_last_position() {
    let mut map = test_map();
    let marker = marker_at(&map, "odd", 400.0, -50.0);
    let name = attach(&mut map, marker, options().padding_left(-50.0));

    assert!(element(&map, &name).visible);
    let before = element(&map, &name).clone();

    // Marker moves to container (-30, -100): outside the comfort rectangle
    // but on none of its sides with a negative left padding
    map.pan_by(Point::new(430.0, 50.0));

    let result = follower(&map, &name).compute_placement(&map);
    assert!(matches!(
        result,
        Err(MapError::InvalidPaddingConfiguration { .. })
    ));
    assert_eq!(element(&map, &name), &before);
}

#[test]
fn test_degenerate_first_placement_starts_hidden() {
    let mut map = test_map();
    let marker = marker_at(&map, "stray", -30.0, -100.0);
    let name = attach(&mut map, marker, options().padding_left(-50.0));

    assert!(follower(&map, &name).compute_placement(&map).is_err());
    assert!(!element(&map, &name).visible);
}

#[test]
fn test_apply_options_places_attached_follower_again() {
    let mut map = test_map();
    let marker = marker_at(&map, "west", 100.0, 300.0);
    let name = attach(&mut map, marker, options());
    assert!(!element(&map, &name).visible);

    // A wide left margin leaves the marker (box 90..110) outside the comfort rectangle
    map.update_plugin(&name, |follower: &mut MarkerFollower, map| {
        follower.apply_options(serde_json::json!({ "paddingLeft": 150.0 }), map)
    })
    .unwrap();

    assert!(element(&map, &name).visible);
    assert_eq!(
        follower(&map, &name).compute_placement(&map).unwrap().side(),
        Some(Side::Right)
    );
    assert_close(container_position(&map, &name), Point::new(110.0, 290.0));
}

#[test]
fn test_resize_reruns_placement() {
    let mut map = test_map();
    let marker = marker_at(&map, "edge", 700.0, 300.0);
    let position = marker.position();
    let name = attach(&mut map, marker, options());
    assert!(!element(&map, &name).visible);

    map.set_size(Point::new(400.0, 600.0));
    let point = map.viewport().lat_lng_to_container_point(&position);
    assert!(point.x > 400.0);
    assert!(element(&map, &name).visible);
    assert_eq!(
        follower(&map, &name).compute_placement(&map).unwrap().side(),
        Some(Side::Left)
    );
}
