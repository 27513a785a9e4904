use pacman_fear_core::{CellKind, Coordinate, Direction};
use pacman_fear_system_transition::{apply, Transition};
use pacman_fear_world::{WorldDescription, WorldState};

const CORRIDOR: &str = "T=6\nM=3\nP=5\n= = = = =\n= @ . * =\n= . = . =\n= . . F =\n= = = = =\n";

fn corridor() -> WorldState {
    WorldDescription::parse(CORRIDOR)
        .expect("corridor parses")
        .into_parts()
        .1
}

fn assert_untouched(state: &WorldState, before: &WorldState) {
    assert_eq!(state.pacman(), before.pacman());
    assert_eq!(state.ghost(), before.ghost());
    assert_eq!(state.pellets(), before.pellets());
    assert_eq!(state.grid(), before.grid());
}

#[test]
fn moving_into_wall_changes_nothing() {
    let mut state = corridor();
    let before = state.fork();

    assert_eq!(apply(&mut state, Direction::North, 5), Transition::Blocked);
    assert_eq!(apply(&mut state, Direction::West, 5), Transition::Blocked);

    assert_untouched(&state, &before);
}

#[test]
fn moving_into_ghost_changes_nothing() {
    let mut state = corridor();
    assert!(!apply(&mut state, Direction::South, 5).is_blocked());
    assert!(!apply(&mut state, Direction::South, 5).is_blocked());
    assert!(!apply(&mut state, Direction::East, 5).is_blocked());
    let before = state.fork();

    assert_eq!(apply(&mut state, Direction::East, 5), Transition::Blocked);
    assert_untouched(&state, &before);
    assert_eq!(state.ghost().position(), Coordinate::new(3, 3));
}

#[test]
fn plain_move_counts_down_fear_and_steps() {
    let mut state = corridor();

    let outcome = apply(&mut state, Direction::East, 5);

    assert_eq!(
        outcome,
        Transition::Moved {
            from: Coordinate::new(1, 1),
            to: Coordinate::new(1, 2),
        }
    );
    assert_eq!(state.pacman().steps(), 1);
    assert_eq!(state.ghost().fear(), 2);
    assert_eq!(state.pacman().visit_weight(Coordinate::new(1, 2)), Some(2));
    assert_eq!(
        state.grid().get(Coordinate::new(1, 1)).map(|cell| cell.kind()),
        Some(CellKind::Empty)
    );
    assert_eq!(
        state.grid().get(Coordinate::new(1, 2)).map(|cell| cell.kind()),
        Some(CellKind::Pacman)
    );
    assert_eq!(state.pellets().len(), 1);
}

#[test]
fn eating_pellet_resets_fear_and_removes_pellet() {
    let mut state = corridor();
    assert!(!apply(&mut state, Direction::East, 5).is_blocked());

    let outcome = apply(&mut state, Direction::East, 5);

    assert_eq!(
        outcome,
        Transition::Consumed {
            from: Coordinate::new(1, 2),
            to: Coordinate::new(1, 3),
        }
    );
    assert_eq!(state.ghost().fear(), 5);
    assert_eq!(state.pacman().steps(), 2);
    assert!(state.pellets().is_empty());
    assert_eq!(
        state.grid().find_closest(state.pacman().position(), CellKind::Pellet),
        None
    );
}

#[test]
fn revisiting_cells_bumps_their_weight() {
    let mut state = corridor();
    let start = Coordinate::new(1, 1);
    let east = Coordinate::new(1, 2);

    for _ in 0..3 {
        assert!(!apply(&mut state, Direction::East, 5).is_blocked());
        assert!(!apply(&mut state, Direction::West, 5).is_blocked());
    }

    assert_eq!(state.pacman().visit_weight(east), Some(4));
    assert_eq!(state.pacman().visit_weight(start), Some(5));
    assert_eq!(state.pacman().steps(), 6);
    assert_eq!(state.ghost().fear(), -3);
}

#[test]
fn forked_states_do_not_share_storage() {
    let original = corridor();
    let mut branch = original.fork();

    assert!(!apply(&mut branch, Direction::East, 5).is_blocked());
    assert!(!apply(&mut branch, Direction::East, 5).is_blocked());

    assert_untouched(&original, &corridor());
}

#[test]
fn leaving_the_grid_changes_nothing() {
    let mut state = WorldDescription::parse("T=3\nM=3\nP=1\n@ . .\n. . .\n. . F\n")
        .expect("open room parses")
        .into_parts()
        .1;
    let before = state.fork();

    assert_eq!(apply(&mut state, Direction::North, 1), Transition::Blocked);
    assert_eq!(apply(&mut state, Direction::West, 1), Transition::Blocked);

    assert_untouched(&state, &before);
}

#[test]
fn fear_at_lower_bound_keeps_counting_without_overflow() {
    let mut state = WorldDescription::parse("T=3\nM=-2147483648\nP=1\n@ .\n. F\n")
        .expect("extreme fear parses")
        .into_parts()
        .1;

    assert!(!apply(&mut state, Direction::East, 1).is_blocked());
    assert!(!apply(&mut state, Direction::West, 1).is_blocked());

    assert_eq!(state.ghost().fear(), i32::MIN);
    assert_eq!(state.pacman().steps(), 2);
}
