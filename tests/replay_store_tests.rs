use std::fs;
use std::path::PathBuf;

use broadside::{
    layout::apply_layout,
    store::{decode_replay, decrypt, encode_replay, encrypt, open_replay, seal_replay},
    BoardError, GameSession, Player, Replay, ReplayRecorder, ReplayStore, ShotResult, StoreError,
    IV_SIZE, MAX_MOVES, SALT_SIZE,
};

const LAYOUT: &str = "A1 3\nA4 3\nA7 3\nC1 3\nC4 3\nC8 3\nE1 3\nE5 3\nG1 3\nI1 3\n";

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("broadside-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

/// A short game: alice sinks A1-A2, misses, bob misses.
fn sample_game() -> (GameSession, Replay) {
    let mut alice = Player::new("alice");
    let mut bob = Player::new("bob");
    apply_layout(&mut alice, LAYOUT).unwrap();
    apply_layout(&mut bob, LAYOUT).unwrap();
    let mut game = GameSession::new(alice, bob).unwrap();
    for (r, c) in [(0, 0), (0, 1), (1, 0), (9, 9)] {
        game.fire(r, c).unwrap();
    }
    let snapshot = game.clone();
    (snapshot, game.finish())
}

#[test]
fn plain_record_round_trips() {
    let (_, replay) = sample_game();
    let bytes = encode_replay(&replay).unwrap();
    let back = decode_replay(&bytes).unwrap();
    assert_eq!(back, replay);
    assert_eq!(back.moves().len(), 4);
    assert_eq!(back.moves()[1].outcome(), ShotResult::Hit { sunk: true, ship_length: 2 });
}

#[test]
fn garbage_is_a_malformed_replay() {
    assert!(matches!(
        decode_replay(&[0xff; 64]),
        Err(StoreError::MalformedReplay(_))
    ));
    assert!(matches!(decode_replay(&[]), Err(StoreError::MalformedReplay(_))));
}

#[test]
fn encrypted_record_round_trips_and_rejects_wrong_password() {
    let (_, replay) = sample_game();
    let sealed = seal_replay(&replay, "hunter2").unwrap();
    let plain_len = encode_replay(&replay).unwrap().len();
    assert_eq!((sealed.len() - SALT_SIZE - IV_SIZE) % 16, 0);
    assert!(sealed.len() - SALT_SIZE - IV_SIZE > plain_len);

    assert_eq!(open_replay(&sealed, "hunter2").unwrap(), replay);
    assert!(matches!(
        open_replay(&sealed, "hunter3"),
        Err(StoreError::DecryptionFailed)
    ));
}

#[test]
fn encryption_uses_fresh_salt_and_iv() {
    let a = encrypt(b"same plaintext", "pw");
    let b = encrypt(b"same plaintext", "pw");
    assert_ne!(a[..SALT_SIZE + IV_SIZE], b[..SALT_SIZE + IV_SIZE]);
    assert_eq!(&decrypt(&a, "pw").unwrap()[..], b"same plaintext");
    assert_eq!(&decrypt(&b, "pw").unwrap()[..], b"same plaintext");
}

#[test]
fn damaged_ciphertext_fails_to_decrypt() {
    let sealed = encrypt(b"0123456789abcdef0123", "pw");
    // header only
    assert!(matches!(
        decrypt(&sealed[..SALT_SIZE + IV_SIZE], "pw"),
        Err(StoreError::DecryptionFailed)
    ));
    // not block aligned
    assert!(matches!(
        decrypt(&sealed[..sealed.len() - 1], "pw"),
        Err(StoreError::DecryptionFailed)
    ));
}

#[test]
fn store_saves_lists_and_loads() {
    let dir = temp_dir("store");
    let store = ReplayStore::new(&dir);
    assert!(store.list().unwrap().is_empty());

    let (_, replay) = sample_game();
    let plain = store.save_plain(&replay).unwrap();
    let sealed = store.save_encrypted(&replay, "secret").unwrap();
    let again = store.save_plain(&replay).unwrap();
    assert_ne!(plain, again);
    for path in [&plain, &sealed, &again] {
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("game_"), "{}", name);
    }
    assert_eq!(plain.extension().unwrap(), "replay");
    assert_eq!(sealed.extension().unwrap(), "encrypted");

    fs::write(dir.join("notes.txt"), "ignored").unwrap();
    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 3);
    let mut sorted = listed.clone();
    sorted.sort();
    assert_eq!(listed, sorted);

    assert_eq!(ReplayStore::load_plain(&plain).unwrap(), replay);
    assert_eq!(ReplayStore::load_encrypted(&sealed, "secret").unwrap(), replay);
    assert!(matches!(
        ReplayStore::load_encrypted(&sealed, "wrong"),
        Err(StoreError::DecryptionFailed)
    ));
    assert!(matches!(
        ReplayStore::load_plain(dir.join("missing.replay")),
        Err(StoreError::FileUnavailable(_))
    ));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn playback_rebuilds_the_final_boards() {
    let (game, replay) = sample_game();
    let mut playback = replay.playback();
    assert_eq!(playback.remaining(), 4);
    assert!(playback.players().iter().all(|p| p.attack_log().attacked().is_empty()));

    let first = playback.step().unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.attacker, 0);
    assert_eq!(first.record.target(), (0, 0));

    playback.run_to_end();
    assert_eq!(playback.remaining(), 0);
    assert!(playback.step().is_none());
    assert_eq!(playback.players(), game.players());
}

#[test]
fn recorder_drops_moves_beyond_capacity() {
    let mut recorder = ReplayRecorder::begin();
    for i in 0..MAX_MOVES {
        recorder.record("p", i % 10, i / 10 % 10, ShotResult::Miss).unwrap();
    }
    assert_eq!(
        recorder.record("p", 0, 0, ShotResult::Miss),
        Err(BoardError::CapacityExceeded)
    );
    let replay = recorder.finalize(Some("p"));
    assert_eq!(replay.moves().len(), MAX_MOVES);
    assert_eq!(replay.winner(), Some("p"));
    assert!(!replay.start_time().is_empty());
    assert!(!replay.end_time().is_empty());
}

/// Encoded game between `ann` and `bob` where ann fires at A1 first.
///
/// With fixed-width integers a player is its name (u64 length + bytes), ten
/// `Option<Ship>` slots of 10 bytes, `ship_count`, two 48-byte grids,
/// `ships_sunk` and one flag byte.
fn ann_vs_bob_bytes() -> Vec<u8> {
    let mut ann = Player::new("ann");
    let mut bob = Player::new("bob");
    apply_layout(&mut ann, LAYOUT).unwrap();
    apply_layout(&mut bob, LAYOUT).unwrap();
    let mut game = GameSession::new(ann, bob).unwrap();
    game.fire(0, 0).unwrap();
    encode_replay(&game.finish()).unwrap()
}

const PLAYER_BYTES: usize = 8 + 3 + 100 + 8 + 48 + 48 + 8 + 1;
const ANN_SHIP_COUNT: usize = 8 + 3 + 100;
const BOB_NAME: usize = PLAYER_BYTES + 8;
// after both players and the move count, past the mover's name
const FIRST_MOVE_ROW: usize = 2 * PLAYER_BYTES + 8 + 8 + 3;

fn assert_malformed(bytes: &[u8]) {
    assert!(matches!(decode_replay(bytes), Err(StoreError::MalformedReplay(_))));
}

#[test]
fn decoded_fleet_must_match_its_ship_count() {
    let bytes = ann_vs_bob_bytes();
    assert!(decode_replay(&bytes).is_ok());
    assert_eq!(bytes[ANN_SHIP_COUNT..ANN_SHIP_COUNT + 8], 10u64.to_le_bytes());

    for count in [11u64, 9, u64::MAX] {
        let mut bad = bytes.clone();
        bad[ANN_SHIP_COUNT..ANN_SHIP_COUNT + 8].copy_from_slice(&count.to_le_bytes());
        assert_malformed(&bad);
    }
}

#[test]
fn decoded_ships_must_match_their_waters() {
    let mut bytes = ann_vs_bob_bytes();
    // first slot: Some tag, then the anchor row
    let row = 8 + 3 + 1;
    assert_eq!(bytes[row], 0);
    bytes[row] = 9;
    assert_malformed(&bytes);

    let mut bytes = ann_vs_bob_bytes();
    let length = row + 2;
    assert_eq!(bytes[length], 2);
    for bad in [0, 11, 200] {
        bytes[length] = bad;
        assert_malformed(&bytes);
    }
}

#[test]
fn decoded_players_must_have_distinct_names() {
    let mut bytes = ann_vs_bob_bytes();
    assert_eq!(&bytes[BOB_NAME..BOB_NAME + 3], b"bob");
    bytes[BOB_NAME..BOB_NAME + 3].copy_from_slice(b"ann");
    assert_malformed(&bytes);
}

#[test]
fn decoded_move_must_target_the_grid() {
    let mut bytes = ann_vs_bob_bytes();
    assert_eq!(bytes[FIRST_MOVE_ROW], 0);
    bytes[FIRST_MOVE_ROW] = 10;
    assert_malformed(&bytes);

    let sealed = {
        let mut plain = ann_vs_bob_bytes();
        plain[FIRST_MOVE_ROW] = 10;
        encrypt(&plain, "pw")
    };
    assert!(matches!(
        open_replay(&sealed, "pw"),
        Err(StoreError::DecryptionFailed)
    ));
}
