use broadside::{class_name, BoardError, Direction, Ship, FLEET};

#[test]
fn span_follows_the_heading() {
    let ship = Ship::new(5, 5, 3, Direction::Up).unwrap();
    assert_eq!(ship.span().collect::<Vec<_>>(), vec![(5, 5), (4, 5), (3, 5)]);
    let ship = Ship::new(5, 5, 3, Direction::Left).unwrap();
    assert_eq!(ship.span().collect::<Vec<_>>(), vec![(5, 5), (5, 4), (5, 3)]);
    assert!(ship.contains(5, 3));
    assert!(!ship.contains(5, 6));
    assert_eq!(ship.mask().count_ones(), 3);
}

#[test]
fn invalid_ships_are_rejected() {
    assert_eq!(Ship::new(0, 0, 0, Direction::Right), Err(BoardError::InvalidLength));
    assert_eq!(Ship::new(0, 0, 11, Direction::Right), Err(BoardError::InvalidLength));
    assert!(matches!(
        Ship::new(0, 5, 6, Direction::Right),
        Err(BoardError::OutOfBounds { .. })
    ));
    assert!(Ship::new(0, 4, 6, Direction::Right).is_ok());
}

#[test]
fn ship_sinks_once() {
    let mut ship = Ship::new(0, 0, 2, Direction::Down).unwrap();
    assert!(!ship.register_hit());
    assert!(ship.register_hit());
    assert!(ship.is_sunk());
    assert!(!ship.register_hit());
    assert_eq!(ship.hits(), 2);
}

#[test]
fn directions() {
    for (i, dir) in Direction::ALL.iter().enumerate() {
        assert_eq!(Direction::from_index(i as u8), Some(*dir));
        assert_eq!(dir.opposite().opposite(), *dir);
    }
    assert_eq!(Direction::from_index(4), None);
    assert_eq!(Direction::Up.step(0, 3), None);
    assert_eq!(Direction::Right.step(2, 9), None);
    assert_eq!(Direction::Down.offset(2, 2, 3), Some((5, 2)));
    assert_eq!(Direction::Left.to_string(), "left");
}

#[test]
fn fleet_classes() {
    assert_eq!(FLEET.len(), 10);
    assert_eq!(class_name(2), Some("Small"));
    assert_eq!(class_name(6), Some("Cruiser"));
    assert_eq!(class_name(5), None);
}
