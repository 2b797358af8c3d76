use suika::{Action, ActionMapper, ActionSpace, LaneConfig};

fn mapper(space: ActionSpace) -> ActionMapper {
    ActionMapper::new(space, &LaneConfig::default()).expect("valid action space")
}

#[test]
fn fifty_bins_cover_the_lane_monotonically() {
    let lane = LaneConfig::default();
    let m = mapper(ActionSpace::Discrete { bins: 50 });
    let xs: Vec<f32> = (0..50)
        .map(|i| m.target_x(Action::Discrete(i)).expect("in range"))
        .collect();

    assert_eq!(xs[0], lane.left);
    assert_eq!(xs[49], lane.right);
    assert!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "bins must map to distinct, increasing columns: {xs:?}"
    );
}

#[test]
fn debug_sweep_columns() {
    // the five sample actions used for manual checks of a 50-bin space
    let m = mapper(ActionSpace::Discrete { bins: 50 });
    let xs: Vec<f32> = [0, 12, 25, 37, 49]
        .iter()
        .map(|&i| m.target_x(Action::Discrete(i)).expect("in range"))
        .collect();
    assert_eq!(xs, vec![415.0, 524.0, 643.0, 753.0, 863.0]);
}

#[test]
fn continuous_values_are_clamped() {
    let m = mapper(ActionSpace::Continuous);
    for v in [-7.5_f32, -1.0, -0.3, 0.0, 0.42, 1.0, 3.0, f32::INFINITY, f32::NEG_INFINITY] {
        let clamped = v.clamp(-1.0, 1.0);
        assert_eq!(
            m.target_x(Action::Continuous(v)).expect("not NaN"),
            m.target_x(Action::Continuous(clamped)).expect("not NaN"),
            "clamping {v} changed the column"
        );
    }
    assert_eq!(m.target_x(Action::Continuous(-2.0)).expect("not NaN"), 415.0);
    assert_eq!(m.target_x(Action::Continuous(0.0)).expect("not NaN"), 639.0);
}

#[test]
fn pointer_positions_map_back_to_actions() {
    let m = mapper(ActionSpace::Continuous);
    assert_eq!(m.action_for_x(2000.0), Action::Continuous(1.0));
    let action = m.action_for_x(527.0);
    assert_eq!(m.target_x(action).expect("not NaN"), 527.0);
}
