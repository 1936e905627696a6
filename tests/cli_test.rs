use std::io::Cursor;

use broadside::{
    controller::cli::{read_secret, render_grid},
    layout::apply_layout,
    take_turn, CliController, Controller, Direction, GameSession, Player, ShotResult, Target,
    MAX_PASSWORD_LEN,
};
use rand::{rngs::SmallRng, SeedableRng};

fn controller(input: &str) -> CliController<Cursor<Vec<u8>>, Vec<u8>> {
    CliController::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn output(cli: CliController<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(cli.into_output()).unwrap()
}

#[test]
fn random_command_places_the_fleet() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut cli = controller("show\nrandom\n");
    let mut p = Player::new("p");
    cli.place_fleet(&mut rng, &mut p).unwrap();
    assert!(p.is_fleet_complete());
    assert!(output(cli).contains("All ships placed."));
}

#[test]
fn manual_placement_with_an_edit() {
    let input = "help\nZ9 1\nA1 3\nB2 1\nedit 1 J9 3\nA4 3\nA7 3\nC1 3\n\
                 C4 3\nC8 3\nE1 3\nE5 3\nG1 3\nI1 3\n";
    let mut rng = SmallRng::seed_from_u64(5);
    let mut cli = controller(input);
    let mut p = Player::new("p");
    cli.place_fleet(&mut rng, &mut p).unwrap();
    assert!(p.is_fleet_complete());
    assert!(p.own_waters().has_ship(9, 8).unwrap());
    assert!(!p.own_waters().has_ship(0, 0).unwrap());

    let text = output(cli);
    assert!(text.contains("Unknown command"));
    assert!(text.contains("touch another ship"), "{}", text);
    assert!(text.contains("Ship moved."));
}

#[test]
fn closed_input_aborts_placement() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut cli = controller("A1 3\n");
    let mut p = Player::new("p");
    assert!(cli.place_fleet(&mut rng, &mut p).is_err());
    assert_eq!(p.ship_count(), 1);
}

#[test]
fn targeting_commands() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut me = Player::new("me");
    apply_layout(
        &mut me,
        "A1 3\nA4 3\nA7 3\nC1 3\nC4 3\nC8 3\nE1 3\nE5 3\nG1 3\nI1 3\n",
    )
    .unwrap();
    let mut cli = controller("board\n+5\nZZ\n+2\nb3\n");
    assert_eq!(
        cli.select_target(&mut rng, &me).unwrap(),
        Target::Relative(Direction::Down)
    );
    assert_eq!(cli.select_target(&mut rng, &me).unwrap(), Target::Cell(1, 2));
    assert!(cli.select_target(&mut rng, &me).is_err());
    let text = output(cli);
    assert!(text.contains("Enemy waters"));
    assert!(text.contains("Invalid coordinate"));
}

#[test]
fn hidden_ships_are_not_rendered() {
    let mut p = Player::new("p");
    p.place_next(0, 0, Direction::Right).unwrap();
    let revealed = render_grid(p.own_waters(), true);
    let hidden = render_grid(p.own_waters(), false);
    assert!(revealed.contains('S'));
    assert!(!hidden.contains('S'));
    assert_eq!(revealed.lines().count(), 11);
}

const LAYOUT: &str = "A1 3\nA4 3\nA7 3\nC1 3\nC4 3\nC8 3\nE1 3\nE5 3\nG1 3\nI1 3\n";

#[test]
fn person_may_repeat_a_refused_target_indefinitely() {
    let mut alice = Player::new("alice");
    let mut bob = Player::new("bob");
    apply_layout(&mut alice, LAYOUT).unwrap();
    apply_layout(&mut bob, LAYOUT).unwrap();
    let mut game = GameSession::new(alice, bob).unwrap();
    game.fire(0, 0).unwrap();

    let input = format!("{}B1\n", "A1\n".repeat(150));
    let mut cli = controller(&input);
    let mut rng = SmallRng::seed_from_u64(1);
    let turn = take_turn(&mut game, &mut cli, &mut rng).unwrap();
    assert_eq!(turn.player, 0);
    assert_eq!(turn.cell, (1, 0));
    assert_eq!(turn.result, ShotResult::Miss);
    assert_eq!(cli.retry_limit(), None);
    assert_eq!(output(cli).matches("You already fired there").count(), 150);
}

#[test]
fn secret_is_one_line_without_its_terminator() {
    let mut input = Cursor::new(b"hunter2\r\nnext\n".to_vec());
    assert_eq!(read_secret(&mut input).unwrap().as_str(), "hunter2");
    assert_eq!(read_secret(&mut input).unwrap().as_str(), "next");
    assert!(read_secret(&mut input).is_err());

    let mut last_line = Cursor::new(b"no newline".to_vec());
    assert_eq!(read_secret(&mut last_line).unwrap().as_str(), "no newline");
    let mut empty_line = Cursor::new(b"\n".to_vec());
    assert_eq!(read_secret(&mut empty_line).unwrap().as_str(), "");
}

#[test]
fn overlong_secret_is_refused_and_consumed() {
    let long = "x".repeat(MAX_PASSWORD_LEN + 1);
    let mut input = Cursor::new(format!("{}\nshort\n", long).into_bytes());
    assert!(read_secret(&mut input).is_err());
    assert_eq!(read_secret(&mut input).unwrap().as_str(), "short");

    let exact = "y".repeat(MAX_PASSWORD_LEN);
    let mut input = Cursor::new(format!("{}\n", exact).into_bytes());
    assert_eq!(read_secret(&mut input).unwrap().as_str(), exact);

    let mut bad_utf8 = Cursor::new(vec![0xff, 0xfe, b'\n']);
    assert!(read_secret(&mut bad_utf8).is_err());
}
