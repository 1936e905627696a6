use broadside::{
    check_bounds, format_coord, parse_coord, row_from_label, row_label, BitBoard, BoardError,
    CellState, Direction, Player, BB, GRID,
};

#[test]
fn coordinate_labels_map_both_ways() {
    assert_eq!(row_label(0), Some('A'));
    assert_eq!(row_label(9), Some('J'));
    assert_eq!(row_label(10), None);
    assert_eq!(row_from_label('a'), Some(0));
    assert_eq!(row_from_label('J'), Some(9));
    assert_eq!(row_from_label('K'), None);
    assert_eq!(row_from_label('3'), None);
    for row in 0..GRID {
        for col in 0..GRID {
            assert_eq!(parse_coord(&format_coord(row, col)), Some((row, col)));
        }
    }
}

#[test]
fn parse_coord_rejects_bad_input() {
    assert_eq!(parse_coord("b10"), Some((1, 9)));
    assert_eq!(parse_coord(" C7 "), Some((2, 6)));
    for bad in ["", "A", "A0", "A11", "K1", "1A", "AA", "A-1"] {
        assert_eq!(parse_coord(bad), None, "{:?}", bad);
    }
}

#[test]
fn bounds_check() {
    assert!(check_bounds(9, 9).is_ok());
    assert_eq!(
        check_bounds(10, 0),
        Err(BoardError::OutOfBounds { row: 10, col: 0 })
    );
    assert_eq!(
        check_bounds(0, 10),
        Err(BoardError::OutOfBounds { row: 0, col: 10 })
    );
}

#[test]
fn dilate_covers_the_one_cell_halo() {
    let bb = BB::from_cells([(0, 0)]).unwrap();
    let halo = bb.dilate();
    assert_eq!(halo.count_ones(), 4);
    for cell in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        assert!(halo.get(cell.0, cell.1).unwrap());
    }

    let bb = BB::from_cells([(5, 5)]).unwrap();
    assert_eq!(bb.dilate().count_ones(), 9);

    // no wrap-around between the last and first columns
    let bb = BB::from_cells([(4, 9)]).unwrap();
    let halo = bb.dilate();
    assert_eq!(halo.count_ones(), 6);
    assert!(!halo.get(5, 0).unwrap());
    assert!(!halo.get(4, 0).unwrap());
}

#[test]
fn bitboard_rejects_out_of_range_cells() {
    let mut bb = BitBoard::<u128, 10>::new();
    assert!(bb.set(10, 0).is_err());
    assert!(bb.get(0, 10).is_err());
    assert!(bb.is_empty());
}

#[test]
fn cell_state_prefers_shots_over_ships() {
    let mut p = Player::new("p");
    p.place_next(0, 0, Direction::Right).unwrap();
    let waters = p.own_waters();
    assert_eq!(waters.cell(0, 0).unwrap(), CellState::Ship);
    assert_eq!(waters.cell(0, 2).unwrap(), CellState::Empty);
    assert!(waters.cell(10, 0).is_err());
}
